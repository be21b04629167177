// Tests for RNG reproducibility and distribution.

use feedforward_net::layers::WeightStore;
use feedforward_net::topology::Topology;
use feedforward_net::utils::SimpleRng;

// ============================================================================
// Reproducibility
// ============================================================================

mod reproducibility_tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SimpleRng::new(12345);
        let mut b = SimpleRng::new(12345);
        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let mut a = SimpleRng::new(1);
        let mut b = SimpleRng::new(2);
        let same = (0..100).filter(|_| a.next_u32() == b.next_u32()).count();
        assert!(same < 5);
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let mut rng = SimpleRng::new(0);
        let values: Vec<u32> = (0..10).map(|_| rng.next_u32()).collect();
        assert!(values.iter().any(|&v| v != 0));
    }

    #[test]
    fn test_known_first_value() {
        // state 1 -> 1 ^ (1 << 13) = 0x2001, ^ (>> 7) = 0x2041, ^ (<< 17)
        let mut rng = SimpleRng::new(1);
        let x: u64 = 0x2041 ^ (0x2041 << 17);
        assert_eq!(rng.next_u32(), (x >> 32) as u32);
    }

    #[test]
    fn test_same_seed_same_weights() {
        let topology = Topology::new(vec![3, 4, 2]).unwrap();
        let a = WeightStore::randomized(&topology, -1.5, 1.5, &mut SimpleRng::new(42));
        let b = WeightStore::randomized(&topology, -1.5, 1.5, &mut SimpleRng::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_time_seeded_generators_produce_values() {
        let mut rng = SimpleRng::from_time();
        let value = rng.next_f64();
        assert!((0.0..=1.0).contains(&value));
    }
}

// ============================================================================
// Distribution
// ============================================================================

mod distribution_tests {
    use super::*;

    #[test]
    fn test_unit_interval() {
        let mut rng = SimpleRng::new(7);
        for _ in 0..10_000 {
            let value = rng.next_f64();
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_range_bounds() {
        let mut rng = SimpleRng::new(99);
        for _ in 0..10_000 {
            let value = rng.gen_range_f64(-1.5, 1.5);
            assert!((-1.5..=1.5).contains(&value));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = SimpleRng::new(3);
        assert_eq!(rng.gen_range_f64(0.5, 0.5), 0.5);
    }

    #[test]
    fn test_mean_near_middle() {
        let mut rng = SimpleRng::new(2024);
        let n = 20_000;
        let mean = (0..n).map(|_| rng.gen_range_f64(-1.0, 1.0)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.05, "mean = {}", mean);
    }
}
