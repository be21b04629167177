//! Flat text persistence for trained weights
//!
//! One value per line, enumerated `layer -> input node -> output node`.
//! Loading requires exactly `Σ n_l * n_{l+1}` values. Values are written with
//! Rust's shortest round-trip formatting, so a save/load cycle is exact.

use crate::error::{ResourceError, Result};
use crate::layers::WeightStore;
use crate::topology::Topology;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Render every weight on its own line.
pub fn format_weights(weights: &WeightStore) -> String {
    let mut out = String::with_capacity(weights.len() * 24);
    for value in weights.iter() {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}", value);
    }
    out
}

/// Parse a whitespace-separated weight listing for `topology`.
///
/// # Errors
///
/// [`ResourceError::Parse`] for a non-numeric token, [`ResourceError::Truncated`]
/// when the count differs from `topology.weight_count()`.
pub fn parse_weights(text: &str, topology: &Topology) -> Result<WeightStore> {
    let values = text
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f64>().map_err(|_| ResourceError::Parse {
                what: "weight".to_string(),
                index,
                token: token.to_string(),
            })
        })
        .collect::<std::result::Result<Vec<f64>, _>>()?;

    WeightStore::from_flat(topology, &values)
}

/// Write `weights` to `path`, replacing any existing file.
pub fn save_weights(path: impl AsRef<Path>, weights: &WeightStore) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ResourceError::io(parent, source))?;
    }

    fs::write(path, format_weights(weights)).map_err(|source| ResourceError::io(path, source))?;
    debug!(path = %path.display(), count = weights.len(), "weights saved");
    Ok(())
}

/// Read weights for `topology` from `path`.
pub fn load_weights(path: impl AsRef<Path>, topology: &Topology) -> Result<WeightStore> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| ResourceError::io(path, source))?;
    let weights = parse_weights(&text, topology)?;
    debug!(path = %path.display(), count = weights.len(), "weights loaded");
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::SimpleRng;

    #[test]
    fn test_format_one_value_per_line() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let weights = WeightStore::from_flat(&topology, &[0.5, -1.25]).unwrap();

        assert_eq!(format_weights(&weights), "0.5\n-1.25\n");
    }

    #[test]
    fn test_parse_round_trip_exact() {
        let topology = Topology::new(vec![3, 4, 2]).unwrap();
        let weights = WeightStore::randomized(&topology, -1.5, 1.5, &mut SimpleRng::new(9));

        let parsed = parse_weights(&format_weights(&weights), &topology).unwrap();
        assert_eq!(parsed, weights);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let topology = Topology::new(vec![2, 1]).unwrap();
        let err = parse_weights("0.5\nnope\n", &topology).unwrap_err();

        assert!(err.is_resource());
        assert!(err.to_string().contains("token 1"));
    }

    #[test]
    fn test_parse_rejects_short_listing() {
        let topology = Topology::new(vec![2, 2]).unwrap();
        let err = parse_weights("0.5\n0.25\n", &topology).unwrap_err();

        assert!(err.is_resource());
        assert!(err.to_string().contains("expected 4"));
    }
}
