use tracing::debug;

use super::bits::BitBuffer;
use super::tables::Version;
use crate::error::{QrError, Result};

/// A segment of data in a QR code.
///
/// Holds the mode, the character count and the already-encoded payload bits.
/// Headers are not part of the payload: their count-field width depends on
/// the version, which is only fixed when the segments are assembled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QrSegment {
    mode: QrSegmentMode,
    numchars: usize,
    data: BitBuffer,
}

impl QrSegment {
    /// Creates a segment for binary data in byte mode.
    pub fn make_bytes(data: &[u8]) -> Self {
        let mut bb = BitBuffer::new();
        for &b in data {
            bb.append_bits(u32::from(b), 8);
        }
        QrSegment::new(QrSegmentMode::Byte, data.len(), bb)
    }

    /// Creates a segment for a string of decimal digits in numeric mode.
    ///
    /// Digits are packed in groups of three into 10 bits; a trailing group of
    /// one or two digits takes 4 or 7 bits.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidCharacter`] if `text` contains a non-digit.
    pub fn make_numeric(text: &str) -> Result<Self> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for c in text.chars() {
            let digit = c.to_digit(10).ok_or(QrError::InvalidCharacter {
                mode: QrSegmentMode::Numeric,
                character: c,
            })?;
            accumdata = accumdata * 10 + digit;
            accumcount += 1;
            if accumcount == 3 {
                bb.append_bits(accumdata, 10);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, accumcount * 3 + 1);
        }
        Ok(QrSegment::new(QrSegmentMode::Numeric, text.len(), bb))
    }

    /// Creates a segment for alphanumeric text.
    ///
    /// Allowed characters: 0–9, A–Z (uppercase), space, `$`, `%`, `*`, `+`, `-`, `.`, `/`, `:`.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidCharacter`] for any other character.
    pub fn make_alphanumeric(text: &str) -> Result<Self> {
        let mut bb = BitBuffer::new();
        let mut accumdata: u32 = 0;
        let mut accumcount: u8 = 0;
        for c in text.chars() {
            let i = alphanumeric_index(c).ok_or(QrError::InvalidCharacter {
                mode: QrSegmentMode::Alphanumeric,
                character: c,
            })?;
            accumdata = accumdata * 45 + i;
            accumcount += 1;
            if accumcount == 2 {
                bb.append_bits(accumdata, 11);
                accumdata = 0;
                accumcount = 0;
            }
        }
        if accumcount > 0 {
            bb.append_bits(accumdata, 6);
        }
        Ok(QrSegment::new(QrSegmentMode::Alphanumeric, text.len(), bb))
    }

    /// Splits `text` into segments using the most compact modes.
    ///
    /// All-digit text becomes one numeric segment. Text drawn entirely from
    /// the alphanumeric set becomes one alphanumeric segment unless a mixed
    /// split reaches a smaller version. Anything else is split into runs:
    /// characters outside the alphanumeric set always go to byte mode, and the
    /// remaining characters take whichever mode minimizes the total bit count
    /// including the header paid at every mode switch. Empty text yields no
    /// segments.
    pub fn make_segments(text: &str) -> Result<Vec<Self>> {
        let segs = if text.is_empty() {
            Vec::new()
        } else if QrSegment::is_numeric(text) {
            vec![QrSegment::make_numeric(text)?]
        } else if QrSegment::is_alphanumeric(text) {
            let single = vec![QrSegment::make_alphanumeric(text)?];
            let mixed = QrSegment::make_mixed_segments(text)?;
            match (smallest_version(&single), smallest_version(&mixed)) {
                (Some(a), Some(b)) if b < a => mixed,
                (None, Some(_)) => mixed,
                _ => single,
            }
        } else {
            QrSegment::make_mixed_segments(text)?
        };
        debug!(
            modes = ?segs.iter().map(|s| s.mode).collect::<Vec<_>>(),
            "segmented input"
        );
        Ok(segs)
    }

    /// Splits `text` into runs along the cheapest per-character modes.
    fn make_mixed_segments(text: &str) -> Result<Vec<Self>> {
        let chars: Vec<char> = text.chars().collect();
        let modes = optimal_char_modes(&chars);
        let mut segs = Vec::new();
        let mut start = 0;
        for end in 1..=chars.len() {
            if end < chars.len() && modes[end] == modes[start] {
                continue;
            }
            let run: String = chars[start..end].iter().collect();
            segs.push(match modes[start] {
                QrSegmentMode::Numeric => QrSegment::make_numeric(&run)?,
                QrSegmentMode::Alphanumeric => QrSegment::make_alphanumeric(&run)?,
                QrSegmentMode::Byte => QrSegment::make_bytes(run.as_bytes()),
            });
            start = end;
        }
        Ok(segs)
    }

    pub fn new(mode: QrSegmentMode, numchars: usize, data: BitBuffer) -> Self {
        Self {
            mode,
            numchars,
            data,
        }
    }

    pub fn mode(&self) -> QrSegmentMode {
        self.mode
    }

    pub fn num_chars(&self) -> usize {
        self.numchars
    }

    /// Encoded payload bits, excluding the header.
    pub fn data(&self) -> &BitBuffer {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.data.len()
    }

    /// Total bits needed to encode `segs` at `version`, headers included.
    ///
    /// Returns `None` if a segment's character count overflows its count field.
    pub fn get_total_bits(segs: &[Self], version: Version) -> Option<usize> {
        let mut result: usize = 0;
        for seg in segs {
            let ccbits: u8 = seg.mode.num_char_count_bits(version);
            if seg.numchars >= 1usize << ccbits {
                return None;
            }
            result = result.checked_add(4 + usize::from(ccbits))?;
            result = result.checked_add(seg.bit_len())?;
        }
        Some(result)
    }

    pub fn is_numeric(text: &str) -> bool {
        text.chars().all(|c| c.is_ascii_digit())
    }

    pub fn is_alphanumeric(text: &str) -> bool {
        text.chars().all(|c| ALPHANUMERIC_CHARSET.contains(c))
    }
}

pub(crate) static ALPHANUMERIC_CHARSET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ $%*+-./:";

/// Smallest version whose data capacity holds `segs`, if any.
fn smallest_version(segs: &[QrSegment]) -> Option<Version> {
    Version::all().find(|&ver| {
        QrSegment::get_total_bits(segs, ver).is_some_and(|n| n <= ver.data_codewords() * 8)
    })
}

fn alphanumeric_index(c: char) -> Option<u32> {
    ALPHANUMERIC_CHARSET.find(c).map(|i| i as u32)
}

/// Picks a mode per character by dynamic programming over bit costs.
///
/// Costs are kept in sixths of a bit so that numeric (10/3 bits per digit)
/// and alphanumeric (11/2 bits per character) stay integral.
fn optimal_char_modes(chars: &[char]) -> Vec<QrSegmentMode> {
    const MODES: [QrSegmentMode; 3] = [
        QrSegmentMode::Byte,
        QrSegmentMode::Alphanumeric,
        QrSegmentMode::Numeric,
    ];
    let header_cost: [usize; 3] =
        MODES.map(|m| (4 + usize::from(m.num_char_count_bits(Version::MIN))) * 6);

    let mut prevcosts: [usize; 3] = header_cost;
    let mut charmodes: Vec<[Option<usize>; 3]> = Vec::with_capacity(chars.len());

    for &c in chars {
        let mut curcosts = [usize::MAX; 3];
        let mut cmodes: [Option<usize>; 3] = [None; 3];

        // Staying in a mode costs only the character itself
        curcosts[0] = prevcosts[0] + c.len_utf8() * 8 * 6;
        cmodes[0] = Some(0);
        if ALPHANUMERIC_CHARSET.contains(c) {
            curcosts[1] = prevcosts[1] + 33;
            cmodes[1] = Some(1);
        }
        if c.is_ascii_digit() {
            curcosts[2] = prevcosts[2] + 20;
            cmodes[2] = Some(2);
        }

        // Starting a new segment after this character pays the rounded-up
        // bits so far plus the next header
        let staycosts = curcosts;
        let staymodes = cmodes;
        for j in 0..MODES.len() {
            for k in 0..MODES.len() {
                if staymodes[k].is_none() || k == j {
                    continue;
                }
                let newcost = staycosts[k].div_ceil(6) * 6 + header_cost[j];
                if newcost < curcosts[j] {
                    curcosts[j] = newcost;
                    cmodes[j] = Some(k);
                }
            }
        }
        charmodes.push(cmodes);
        prevcosts = curcosts;
    }

    // Cheapest final mode, then walk the choices backwards
    let mut curmode: usize = 0;
    for i in 1..MODES.len() {
        if prevcosts[i] < prevcosts[curmode] {
            curmode = i;
        }
    }
    let mut result = vec![QrSegmentMode::Byte; chars.len()];
    for i in (0..chars.len()).rev() {
        // Entry k records the mode character i itself was encoded in
        if let Some(k) = charmodes[i][curmode] {
            curmode = k;
        }
        result[i] = MODES[curmode];
    }
    result
}

/// The mode of a segment.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum QrSegmentMode {
    Numeric,
    Alphanumeric,
    Byte,
}

impl QrSegmentMode {
    /// The 4-bit mode indicator.
    pub fn mode_bits(self) -> u32 {
        use QrSegmentMode::*;
        match self {
            Numeric => 0x1,
            Alphanumeric => 0x2,
            Byte => 0x4,
        }
    }

    /// Width of the character-count field at `ver`.
    pub fn num_char_count_bits(self, ver: Version) -> u8 {
        use QrSegmentMode::*;
        // Columns cover versions 1-9, 10-26 and 27-40; only the first is reachable here.
        (match self {
            Numeric => [10, 12, 14],
            Alphanumeric => [9, 11, 13],
            Byte => [8, 16, 16],
        })[usize::from((ver.value() + 7) / 17)]
    }

    /// Payload bits for `numchars` characters (bytes, for byte mode).
    pub fn payload_bits(self, numchars: usize) -> usize {
        use QrSegmentMode::*;
        match self {
            Numeric => numchars / 3 * 10 + [0, 4, 7][numchars % 3],
            Alphanumeric => numchars / 2 * 11 + [0, 6][numchars % 2],
            Byte => numchars * 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modes(text: &str) -> Vec<QrSegmentMode> {
        QrSegment::make_segments(text)
            .unwrap()
            .iter()
            .map(QrSegment::mode)
            .collect()
    }

    #[test]
    fn test_is_numeric() {
        assert!(QrSegment::is_numeric("1234567890"));
        assert!(!QrSegment::is_numeric("1234abc"));
        assert!(!QrSegment::is_numeric("١٢٣"));
    }

    #[test]
    fn test_is_alphanumeric() {
        assert!(QrSegment::is_alphanumeric("HELLO WORLD"));
        assert!(!QrSegment::is_alphanumeric("Hello World"));
    }

    #[test]
    fn test_numeric_bit_lengths() {
        for (text, bits) in [("1", 4), ("12", 7), ("123", 10), ("1234", 14), ("12345", 17)] {
            let seg = QrSegment::make_numeric(text).unwrap();
            assert_eq!(seg.bit_len(), bits, "{}", text);
            assert_eq!(QrSegmentMode::Numeric.payload_bits(text.len()), bits);
        }
    }

    #[test]
    fn test_alphanumeric_pair_packing() {
        // "A1" = 10 * 45 + 1 = 451
        let seg = QrSegment::make_alphanumeric("A1").unwrap();
        assert_eq!(seg.bit_len(), 11);
        assert_eq!(seg.data().as_bytes(), &[(451u32 >> 3) as u8, ((451u32 & 7) << 5) as u8]);
    }

    #[test]
    fn test_invalid_characters_are_rejected() {
        match QrSegment::make_numeric("12a") {
            Err(QrError::InvalidCharacter { mode, character }) => {
                assert_eq!(mode, QrSegmentMode::Numeric);
                assert_eq!(character, 'a');
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            QrSegment::make_alphanumeric("abc"),
            Err(QrError::InvalidCharacter { character: 'a', .. })
        ));
    }

    #[test]
    fn test_byte_segment_counts_bytes() {
        let seg = QrSegment::make_bytes("é!".as_bytes());
        assert_eq!(seg.num_chars(), 3);
        assert_eq!(seg.bit_len(), 24);
    }

    #[test]
    fn test_digits_select_numeric_only() {
        assert_eq!(modes("0123456789"), vec![QrSegmentMode::Numeric]);
    }

    #[test]
    fn test_alphanumeric_text_selects_single_segment() {
        assert_eq!(modes("HTTPS://GBD.TO/R1"), vec![QrSegmentMode::Alphanumeric]);
        // Splitting out the digits would not reach a smaller version
        assert_eq!(modes("AB12CD34EF56"), vec![QrSegmentMode::Alphanumeric]);
    }

    #[test]
    fn test_alphanumeric_text_splits_when_smaller_version_fits() {
        // One segment needs 178 bits (version 2); split it needs 130 (version 1)
        let text = format!("A{}", &"1234567890".repeat(3)[..29]);
        assert_eq!(modes(&text), vec![QrSegmentMode::Alphanumeric, QrSegmentMode::Numeric]);
    }

    #[test]
    fn test_alphanumeric_text_splits_to_fit_at_all() {
        // 1009 bits as one segment, 633 bits split
        let text = format!("A{}", "7".repeat(180));
        let single = [QrSegment::make_alphanumeric(&text).unwrap()];
        assert_eq!(smallest_version(&single), None);
        let segs = QrSegment::make_segments(&text).unwrap();
        assert_eq!(
            segs.iter().map(QrSegment::mode).collect::<Vec<_>>(),
            vec![QrSegmentMode::Alphanumeric, QrSegmentMode::Numeric]
        );
        assert_eq!(QrSegment::get_total_bits(&segs, Version::MAX), Some(633));
        assert_eq!(smallest_version(&segs), Some(Version::MAX));
    }

    #[test]
    fn test_lowercase_forces_byte() {
        assert_eq!(modes("https://gbd.to/r1"), vec![QrSegmentMode::Byte]);
    }

    #[test]
    fn test_empty_text_has_no_segments() {
        assert!(QrSegment::make_segments("").unwrap().is_empty());
    }

    #[test]
    fn test_long_digit_run_splits_out() {
        let text = format!("a{}", "7".repeat(30));
        assert_eq!(modes(&text), vec![QrSegmentMode::Byte, QrSegmentMode::Numeric]);
        let segs = QrSegment::make_segments(&text).unwrap();
        assert_eq!(segs[0].num_chars(), 1);
        assert_eq!(segs[1].num_chars(), 30);
    }

    #[test]
    fn test_short_runs_merge_into_byte() {
        // Headers cost more than packing "A1" separately would save.
        assert_eq!(modes("xA1y"), vec![QrSegmentMode::Byte]);
    }

    #[test]
    fn test_segmentation_never_costs_more_than_bytes() {
        for text in ["https://gbd.to/R1", "abc123456789012DEF", "ÄÖÜ 1234567890123456", "a"] {
            let segs = QrSegment::make_segments(text).unwrap();
            let bytes = [QrSegment::make_bytes(text.as_bytes())];
            assert!(
                QrSegment::get_total_bits(&segs, Version::MIN)
                    <= QrSegment::get_total_bits(&bytes, Version::MIN),
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_count_field_overflow() {
        let data = vec![0u8; 256];
        let segs = [QrSegment::make_bytes(&data)];
        assert_eq!(QrSegment::get_total_bits(&segs, Version::MIN), None);
    }
}
