//! Capacity tables for versions 1 to 4 at error correction level L.
//!
//! Index 0 of every per-version table is a placeholder so that a version
//! number can be used as the index directly.

use super::segment::QrSegmentMode;

/// Total codewords (data + ECC) per version.
static TOTAL_CODEWORDS: [u8; 5] = [0, 26, 44, 70, 100];

/// ECC codewords per version at level L. Every version here has one block.
static ECC_CODEWORDS: [u8; 5] = [0, 7, 10, 15, 20];

/// Leftover data-region modules that carry no codeword bit.
static REMAINDER_BITS: [u8; 5] = [0, 0, 7, 7, 7];

/// Centre coordinate of the single alignment pattern, or 0 when absent.
static ALIGNMENT_CENTER: [u8; 5] = [0, 0, 18, 22, 26];

/// Maximum character counts per version, indexed by
/// [numeric, alphanumeric, byte].
static MAX_CHARS: [[u16; 3]; 5] = [
    [0, 0, 0],
    [41, 25, 17],
    [77, 47, 32],
    [127, 77, 53],
    [187, 114, 78],
];

/// A QR code version (1–4).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Version(u8);

impl Version {
    /// The smallest supported version.
    pub const MIN: Version = Version(1);

    /// The largest supported version.
    pub const MAX: Version = Version(4);

    /// Creates a version object from the given number.
    ///
    /// # Panics
    ///
    /// Panics if the number is outside the range [1, 4].
    pub const fn new(ver: u8) -> Self {
        assert!(
            Version::MIN.value() <= ver && ver <= Version::MAX.value(),
            "Version number out of range"
        );
        Self(ver)
    }

    /// Returns the version for the given number, or `None` outside [1, 4].
    pub fn checked_new(ver: u8) -> Option<Self> {
        (Version::MIN.value()..=Version::MAX.value())
            .contains(&ver)
            .then_some(Self(ver))
    }

    /// Returns the value, which is in the range [1, 4].
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Iterates over every supported version, smallest first.
    pub fn all() -> impl Iterator<Item = Version> {
        (Version::MIN.value()..=Version::MAX.value()).map(Version)
    }

    /// Side length of the symbol in modules: `17 + 4 * version`.
    pub const fn size(self) -> usize {
        (self.0 as usize) * 4 + 17
    }

    /// Total codewords (data + ECC) the symbol holds.
    pub fn total_codewords(self) -> usize {
        usize::from(TOTAL_CODEWORDS[self.index()])
    }

    /// ECC codewords generated for this version at level L.
    pub fn ecc_codewords(self) -> usize {
        usize::from(ECC_CODEWORDS[self.index()])
    }

    /// Data codewords available for this version at level L.
    pub fn data_codewords(self) -> usize {
        self.total_codewords() - self.ecc_codewords()
    }

    /// Number of data-region modules left over after all codewords are placed.
    pub fn remainder_bits(self) -> usize {
        usize::from(REMAINDER_BITS[self.index()])
    }

    /// Maximum number of characters a single segment of `mode` can carry.
    pub fn max_chars(self, mode: QrSegmentMode) -> usize {
        let column = match mode {
            QrSegmentMode::Numeric => 0,
            QrSegmentMode::Alphanumeric => 1,
            QrSegmentMode::Byte => 2,
        };
        usize::from(MAX_CHARS[self.index()][column])
    }

    /// Centre of the alignment pattern; version 1 has none.
    pub fn alignment_center(self) -> Option<usize> {
        match ALIGNMENT_CENTER[self.index()] {
            0 => None,
            pos => Some(usize::from(pos)),
        }
    }

    fn index(self) -> usize {
        usize::from(self.0)
    }
}

/// Error correction level for a QR code.
///
/// Only the lowest level is supported.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub enum QrCodeEcc {
    /// Tolerates ~7% erroneous codewords.
    #[default]
    Low,
}

impl QrCodeEcc {
    /// Returns the unsigned 2-bit integer written into the format area.
    pub(crate) fn format_bits(self) -> u8 {
        match self {
            QrCodeEcc::Low => 0b01,
        }
    }

    /// Inverse of [`format_bits`](Self::format_bits).
    pub(crate) fn from_format_bits(bits: u8) -> Option<Self> {
        match bits {
            0b01 => Some(QrCodeEcc::Low),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes() {
        let sizes: Vec<usize> = Version::all().map(Version::size).collect();
        assert_eq!(sizes, vec![21, 25, 29, 33]);
    }

    #[test]
    fn test_codeword_counts_add_up() {
        for ver in Version::all() {
            assert_eq!(ver.data_codewords() + ver.ecc_codewords(), ver.total_codewords());
        }
        assert_eq!(Version::new(1).data_codewords(), 19);
        assert_eq!(Version::new(4).data_codewords(), 80);
    }

    #[test]
    fn test_codewords_fill_data_region() {
        // Raw data modules = size^2 minus function patterns and format areas.
        for ver in Version::all() {
            let size = ver.size();
            let mut function = 3 * 64 + 2 * (size - 16) + 31;
            if ver.alignment_center().is_some() {
                function += 25;
            }
            let raw = size * size - function;
            assert_eq!(raw, ver.total_codewords() * 8 + ver.remainder_bits(), "version {}", ver.value());
        }
    }

    #[test]
    fn test_max_chars_fit_data_codewords() {
        use QrSegmentMode::*;
        for ver in Version::all() {
            let capacity = ver.data_codewords() * 8;
            for mode in [Numeric, Alphanumeric, Byte] {
                let n = ver.max_chars(mode);
                let bits = |chars: usize| {
                    4 + usize::from(mode.num_char_count_bits(ver)) + mode.payload_bits(chars)
                };
                assert!(bits(n) <= capacity, "{:?} v{}", mode, ver.value());
                assert!(bits(n + 1) > capacity, "{:?} v{}", mode, ver.value());
            }
        }
    }

    #[test]
    fn test_checked_new() {
        assert_eq!(Version::checked_new(0), None);
        assert_eq!(Version::checked_new(3), Some(Version::new(3)));
        assert_eq!(Version::checked_new(5), None);
    }

    #[test]
    #[should_panic(expected = "Version number out of range")]
    fn test_version_out_of_range() {
        let _ = Version::new(5);
    }

    #[test]
    fn test_ecc_format_bits() {
        assert_eq!(QrCodeEcc::Low.format_bits(), 1);
        assert_eq!(QrCodeEcc::from_format_bits(1), Some(QrCodeEcc::Low));
        assert_eq!(QrCodeEcc::from_format_bits(0), None);
    }
}
