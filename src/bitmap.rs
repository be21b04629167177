//! Windows bitmap (BMP/DIB) decoding and grayscale conversion
//!
//! Only uncompressed (`BI_RGB`) images are handled: 1, 4 and 8-bit
//! palettised, and 24 or 32-bit true colour. Every multi-byte header field is
//! decoded as little-endian regardless of host byte order.
//!
//! A positive height means rows are stored bottom-up; a negative height marks
//! a top-down DIB. Decoded pixels are always returned top row first.

use crate::error::{ResourceError, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

const FILE_HEADER_SIZE: usize = 14;
const INFO_HEADER_SIZE: u32 = 40;
const BMP_SIGNATURE: u16 = 0x4D42; // "BM"
const BI_RGB: u32 = 0;

/// BITMAPFILEHEADER followed by BITMAPINFOHEADER.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub file_type: u16,
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    pub pixel_offset: u32,
    pub info_size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub colors_used: u32,
    pub colors_important: u32,
}

impl BitmapHeader {
    /// Rows are stored top row first.
    pub fn is_top_down(&self) -> bool {
        self.height < 0
    }

    /// Colour-table entries that follow the headers.
    pub fn palette_len(&self) -> usize {
        if self.colors_used > 0 {
            return self.colors_used as usize;
        }
        match self.bit_count {
            1 => 2,
            2 => 4,
            4 => 16,
            8 => 256,
            _ => 0,
        }
    }
}

/// One colour sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Weighted luminance `round(0.3 r + 0.589 g + 0.11 b)`, saturated at 255.
    pub fn luminance(&self) -> u8 {
        let lum = 0.3 * self.red as f64 + 0.589 * self.green as f64 + 0.11 * self.blue as f64;
        lum.round().min(255.0) as u8
    }

    /// Luminance scaled into `[0, 1]`.
    pub fn intensity(&self) -> f64 {
        self.luminance() as f64 / 255.0
    }
}

/// Decoded image, pixels row-major from the top row.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    header: BitmapHeader,
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Bitmap {
    /// Read and decode the bitmap at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| ResourceError::io(path, source))?;
        let bitmap = decode(&data)?;
        debug!(
            path = %path.display(),
            width = bitmap.width,
            height = bitmap.height,
            bits = bitmap.header.bit_count,
            "bitmap decoded"
        );
        Ok(bitmap)
    }

    pub fn header(&self) -> &BitmapHeader {
        &self.header
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, row: usize, column: usize) -> Rgb {
        self.pixels[row * self.width + column]
    }

    /// One `[0, 1]` grayscale value per pixel, row-major from the top row.
    pub fn grayscale_intensities(&self) -> Vec<f64> {
        self.pixels.iter().map(Rgb::intensity).collect()
    }
}

/// Decode and flatten the bitmap at `path` to grayscale intensities.
pub fn load_grayscale(path: impl AsRef<Path>) -> Result<Vec<f64>> {
    Ok(Bitmap::open(path)?.grayscale_intensities())
}

/// Decode an in-memory BMP file.
///
/// # Errors
///
/// [`ResourceError::Truncated`] when the data ends early and
/// [`ResourceError::UnsupportedBitmap`] for foreign signatures, compressed
/// images or unsupported bit depths.
pub fn decode(data: &[u8]) -> Result<Bitmap> {
    let header = read_header(data)?;

    if header.file_type != BMP_SIGNATURE {
        return Err(unsupported(format!(
            "bad signature 0x{:04X}",
            header.file_type
        )));
    }
    if header.info_size < INFO_HEADER_SIZE {
        return Err(unsupported(format!(
            "info header of {} bytes is too small",
            header.info_size
        )));
    }
    if header.compression != BI_RGB {
        return Err(unsupported(format!(
            "compression type {} is not supported",
            header.compression
        )));
    }
    if !matches!(header.bit_count, 1 | 4 | 8 | 24 | 32) {
        return Err(unsupported(format!(
            "{} bits per pixel is not supported",
            header.bit_count
        )));
    }
    if header.width <= 0 || header.height == 0 {
        return Err(unsupported(format!(
            "invalid dimensions {}x{}",
            header.width, header.height
        )));
    }

    let width = header.width as usize;
    let height = header.height.unsigned_abs() as usize;

    let mut offset = FILE_HEADER_SIZE + header.info_size as usize;
    let palette = read_palette(data, &mut offset, header.palette_len())?;
    if header.pixel_offset as usize >= offset {
        offset = header.pixel_offset as usize;
    }

    let bits_per_row = width * header.bit_count as usize;
    let row_stride = bits_per_row.div_ceil(32) * 4;
    let needed = row_stride * height;
    if data.len() < offset + needed {
        return Err(ResourceError::Truncated {
            what: "bitmap pixel data".to_string(),
            expected: needed,
            found: data.len().saturating_sub(offset),
        }
        .into());
    }

    let mut pixels = vec![Rgb::default(); width * height];
    for stored_row in 0..height {
        let row = if header.is_top_down() {
            stored_row
        } else {
            height - 1 - stored_row
        };
        let start = offset + stored_row * row_stride;
        let bytes = &data[start..start + row_stride];
        let target = &mut pixels[row * width..(row + 1) * width];
        decode_row(bytes, header.bit_count, &palette, target)?;
    }

    Ok(Bitmap {
        header,
        width,
        height,
        pixels,
    })
}

fn decode_row(bytes: &[u8], bit_count: u16, palette: &[Rgb], target: &mut [Rgb]) -> Result<()> {
    match bit_count {
        24 => {
            for (pixel, chunk) in target.iter_mut().zip(bytes.chunks_exact(3)) {
                *pixel = Rgb::new(chunk[2], chunk[1], chunk[0]);
            }
        }
        32 => {
            for (pixel, chunk) in target.iter_mut().zip(bytes.chunks_exact(4)) {
                *pixel = Rgb::new(chunk[2], chunk[1], chunk[0]);
            }
        }
        bits => {
            let bits = bits as usize;
            let per_byte = 8 / bits;
            let mask = ((1u16 << bits) - 1) as u8;
            for (column, pixel) in target.iter_mut().enumerate() {
                let byte = bytes[column / per_byte];
                let shift = 8 - bits * (column % per_byte + 1);
                let index = ((byte >> shift) & mask) as usize;
                *pixel = *palette.get(index).ok_or_else(|| {
                    unsupported(format!(
                        "palette index {} outside a table of {} colours",
                        index,
                        palette.len()
                    ))
                })?;
            }
        }
    }
    Ok(())
}

fn read_header(data: &[u8]) -> Result<BitmapHeader> {
    let mut offset = 0usize;
    Ok(BitmapHeader {
        file_type: read_le_u16(data, &mut offset)?,
        file_size: read_le_u32(data, &mut offset)?,
        reserved1: read_le_u16(data, &mut offset)?,
        reserved2: read_le_u16(data, &mut offset)?,
        pixel_offset: read_le_u32(data, &mut offset)?,
        info_size: read_le_u32(data, &mut offset)?,
        width: read_le_i32(data, &mut offset)?,
        height: read_le_i32(data, &mut offset)?,
        planes: read_le_u16(data, &mut offset)?,
        bit_count: read_le_u16(data, &mut offset)?,
        compression: read_le_u32(data, &mut offset)?,
        image_size: read_le_u32(data, &mut offset)?,
        x_pels_per_meter: read_le_i32(data, &mut offset)?,
        y_pels_per_meter: read_le_i32(data, &mut offset)?,
        colors_used: read_le_u32(data, &mut offset)?,
        colors_important: read_le_u32(data, &mut offset)?,
    })
}

// Colour-table entries are stored blue, green, red, reserved.
fn read_palette(data: &[u8], offset: &mut usize, count: usize) -> Result<Vec<Rgb>> {
    let bytes = take(data, offset, count * 4, "bitmap colour table")?;
    Ok(bytes
        .chunks_exact(4)
        .map(|entry| Rgb::new(entry[2], entry[1], entry[0]))
        .collect())
}

fn take<'a>(data: &'a [u8], offset: &mut usize, len: usize, what: &str) -> Result<&'a [u8]> {
    let end = *offset + len;
    if data.len() < end {
        return Err(ResourceError::Truncated {
            what: what.to_string(),
            expected: len,
            found: data.len().saturating_sub(*offset),
        }
        .into());
    }
    let bytes = &data[*offset..end];
    *offset = end;
    Ok(bytes)
}

fn read_le_u16(data: &[u8], offset: &mut usize) -> Result<u16> {
    let b = take(data, offset, 2, "bitmap header")?;
    Ok(u16::from_le_bytes([b[0], b[1]]))
}

fn read_le_u32(data: &[u8], offset: &mut usize) -> Result<u32> {
    let b = take(data, offset, 4, "bitmap header")?;
    Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn read_le_i32(data: &[u8], offset: &mut usize) -> Result<i32> {
    let b = take(data, offset, 4, "bitmap header")?;
    Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

fn unsupported(reason: String) -> crate::error::NetworkError {
    ResourceError::UnsupportedBitmap(reason).into()
}
