#![forbid(unsafe_code)]
//! QR code encoding functionality.
//!
//! The pipeline runs strictly in order: text is split into [`QrSegment`]s,
//! assembled into data codewords for the smallest fitting [`Version`],
//! extended with Reed–Solomon ECC codewords, laid out on a [`Grid`] and
//! finally masked with the lowest-penalty [`Mask`].

mod bits;
mod ecc;
mod gf;
mod mask;
mod matrix;
mod segment;
mod tables;

pub use bits::{assemble_codewords, BitBuffer};
pub use ecc::{append_ecc, ReedSolomonGenerator};
pub use gf::Gf256;
pub use mask::{get_penalty_score, select_mask, Mask, Penalty};
pub use matrix::{format_bits, placement_order, Grid, Module, PlacementOrder};
pub use segment::{QrSegment, QrSegmentMode};
pub use tables::{QrCodeEcc, Version};

use tracing::debug;

use crate::error::Result;

/// A QR Code symbol, representing a square grid of dark and light modules.
///
/// Covers versions 1 to 4 at error correction level L with numeric,
/// alphanumeric and byte segments. Instances are immutable after creation.
///
/// # Creation
///
/// - High-level: Use [`encode_text`](QrCode::encode_text) or
///   [`encode_binary`](QrCode::encode_binary).
/// - Mid-level: Use [`encode_segments`](QrCode::encode_segments).
/// - Low-level: Use [`encode_codewords`](QrCode::encode_codewords).
///
/// # Example
///
/// ```rust
/// use minqr::qrcode::QrCode;
///
/// let qr = QrCode::encode_text("HTTPS://GBD.TO/R1", None).unwrap();
/// assert_eq!(qr.version().value(), 1);
/// assert_eq!(qr.size(), 21);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrCode {
    version: Version,
    mask: Mask,
    grid: Grid,
}

impl QrCode {
    /// Encodes a text string into a QR code.
    ///
    /// The text is segmented with [`QrSegment::make_segments`] and the smallest
    /// version that holds it is chosen. The `mask` can be `None` for automatic
    /// selection or a value from 0 to 7.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::CapacityExceeded`](crate::QrError::CapacityExceeded)
    /// if the text does not fit in version 4.
    pub fn encode_text(text: &str, mask: Option<Mask>) -> Result<Self> {
        let segs = QrSegment::make_segments(text)?;
        QrCode::encode_segments(&segs, mask)
    }

    /// Encodes binary data into a QR code as a single byte-mode segment.
    pub fn encode_binary(data: &[u8], mask: Option<Mask>) -> Result<Self> {
        let segs = [QrSegment::make_bytes(data)];
        QrCode::encode_segments(&segs, mask)
    }

    /// Encodes the given segments, in order, at the smallest fitting version.
    pub fn encode_segments(segs: &[QrSegment], mask: Option<Mask>) -> Result<Self> {
        let (datacodewords, version) = assemble_codewords(segs)?;
        Ok(QrCode::encode_codewords(&datacodewords, version, mask))
    }

    /// Creates a QR Code from padded data codewords.
    ///
    /// This is a low-level API that most users should not use directly.
    ///
    /// # Panics
    ///
    /// Panics if `datacodewords` does not hold exactly
    /// [`Version::data_codewords`] bytes.
    pub fn encode_codewords(datacodewords: &[u8], version: Version, mask: Option<Mask>) -> Self {
        let ecl = QrCodeEcc::Low;
        let allcodewords = append_ecc(datacodewords, version);

        let mut grid = Grid::new(version);
        let remainder = grid.draw_codewords(&allcodewords);
        debug_assert_eq!(remainder, version.remainder_bits());

        let mask: Mask = match mask {
            Some(m) => m,
            None => select_mask(&grid, ecl),
        };
        grid.apply_mask(mask);
        grid.draw_format_bits(ecl, mask);
        debug!(version = version.value(), mask = mask.value(), "encoded symbol");
        Self {
            version,
            mask,
            grid,
        }
    }

    /// Returns this QR Code's version, in the range [1, 4].
    pub fn version(&self) -> Version {
        self.version
    }

    /// Returns this QR Code's size, in the range [21, 33].
    pub fn size(&self) -> i32 {
        self.grid.size() as i32
    }

    /// Returns this QR Code's error correction level, as recorded in the
    /// format area.
    pub fn error_correction_level(&self) -> QrCodeEcc {
        let bits = self.grid.read_format_bits() ^ 0x5412;
        QrCodeEcc::from_format_bits((bits >> 13) as u8).unwrap_or_default()
    }

    /// Returns this QR Code's mask, in the range [0, 7].
    pub fn mask(&self) -> Mask {
        self.mask
    }

    /// Returns the color of the module at the given coordinates.
    ///
    /// Returns `true` for dark modules and `false` for light modules. Coordinates outside the QR
    /// code's bounds return `false`.
    ///
    /// # Arguments
    ///
    /// * `x` - X-coordinate (0 is left).
    /// * `y` - Y-coordinate (0 is top).
    pub fn get_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size();
        range.contains(&x) && range.contains(&y) && self.grid.is_dark(x as usize, y as usize)
    }

    /// Whether the module at the given coordinates belongs to a function
    /// pattern or the format area rather than the data region.
    pub fn is_function_module(&self, x: i32, y: i32) -> bool {
        let range = 0..self.size();
        range.contains(&x) && range.contains(&y) && self.grid.is_function(x as usize, y as usize)
    }

    /// The underlying module grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}
