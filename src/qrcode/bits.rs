//! Bit stream assembly: segment headers, payload, terminator and padding.

use tracing::debug;

use super::segment::QrSegment;
use super::tables::Version;
use crate::error::{QrError, Result};

/// An appendable sequence of bits, packed big-endian into bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BitBuffer {
    data: Vec<u8>,
    length: usize,
}

impl BitBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bits appended so far.
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Appends the low `len` bits of `val`, most significant bit first.
    pub fn append_bits(&mut self, val: u32, len: u8) {
        assert!(len <= 31 && (val >> len) == 0, "Value out of range");
        for i in (0..len).rev() {
            let shift: u8 = 7 - ((self.length as u8) & 7);
            let bit: u8 = ((val >> i) as u8) & 1;
            if shift == 7 {
                self.data.push(bit << shift);
            } else if let Some(last) = self.data.last_mut() {
                *last |= bit << shift;
            }
            self.length += 1;
        }
    }

    /// Returns the bit at `index`, counting from the first appended bit.
    pub fn bit(&self, index: usize) -> bool {
        assert!(index < self.length, "Bit index out of range");
        get_bit(self.data[index >> 3].into(), 7 - ((index as u8) & 7))
    }

    /// The packed bytes; a trailing partial byte is zero-filled.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

/// Assembles `segs` into the data codewords of the smallest version that fits.
///
/// Versions are tried from [`Version::MIN`] to [`Version::MAX`]. The stream
/// gets a terminator of up to four zero bits, zero bits up to the next byte
/// boundary, and then alternating `0xEC` / `0x11` pad bytes until it holds
/// exactly [`Version::data_codewords`] codewords.
pub fn assemble_codewords(segs: &[QrSegment]) -> Result<(Vec<u8>, Version)> {
    let mut version: Version = Version::MIN;
    let datausedbits: usize = loop {
        let datacapacitybits: usize = version.data_codewords() * 8;
        let dataused: Option<usize> = QrSegment::get_total_bits(segs, version);
        match dataused {
            Some(n) if n <= datacapacitybits => break n,
            _ if version >= Version::MAX => {
                return Err(QrError::CapacityExceeded {
                    required_bits: dataused,
                    capacity_bits: datacapacitybits,
                });
            }
            _ => version = Version::new(version.value() + 1),
        }
    };
    let datacapacitybits: usize = version.data_codewords() * 8;
    debug!(
        version = version.value(),
        used_bits = datausedbits,
        capacity_bits = datacapacitybits,
        "selected version"
    );

    let mut bb = BitBuffer::new();
    for seg in segs {
        bb.append_bits(seg.mode().mode_bits(), 4);
        // get_total_bits has already checked that the count fits its field
        bb.append_bits(seg.num_chars() as u32, seg.mode().num_char_count_bits(version));
        for i in 0..seg.bit_len() {
            bb.append_bits(seg.data().bit(i).into(), 1);
        }
    }
    debug_assert_eq!(bb.len(), datausedbits);

    // Terminator, then pad up to a byte
    let numzerobits: usize = (datacapacitybits - bb.len()).min(4);
    bb.append_bits(0, numzerobits as u8);
    let numzerobits: usize = bb.len().wrapping_neg() & 7;
    bb.append_bits(0, numzerobits as u8);
    debug_assert_eq!(bb.len() % 8, 0);

    for &padbyte in [0xec, 0x11].iter().cycle() {
        if bb.len() >= datacapacitybits {
            break;
        }
        bb.append_bits(padbyte, 8);
    }
    debug_assert_eq!(bb.len(), datacapacitybits);
    Ok((bb.into_bytes(), version))
}

pub(crate) fn get_bit(x: u32, i: u8) -> bool {
    ((x >> i) & 1) != 0
}
