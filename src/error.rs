//! Error types for minqr

use std::path::PathBuf;

use thiserror::Error;

use crate::qrcode::QrSegmentMode;

/// Errors surfaced by the encoding pipeline and the file writers.
///
/// Ways to handle [`QrError::CapacityExceeded`]:
///
/// - Change the text or binary data to be shorter.
/// - Change the text to fit the character set of a more compact segment mode
///   (e.g. uppercase letters fit the alphanumeric mode).
/// - Propagate the error upward to the caller/user.
#[derive(Debug, Error)]
pub enum QrError {
    /// The data does not fit in the largest supported version at level L.
    ///
    /// `required_bits` is `None` when a segment's character count cannot be
    /// expressed in its count field at all.
    #[error("{}", capacity_message(.required_bits, .capacity_bits))]
    CapacityExceeded {
        required_bits: Option<usize>,
        capacity_bits: usize,
    },

    /// A character was given to a segment mode that cannot represent it.
    #[error("Character {character:?} cannot be encoded in {mode:?} mode")]
    InvalidCharacter { mode: QrSegmentMode, character: char },

    /// The rendered symbol could not be written to its destination.
    #[error("Failed to write {}: {source}", .path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn capacity_message(required_bits: &Option<usize>, capacity_bits: &usize) -> String {
    match *required_bits {
        Some(n) => format!("Data length = {} bits, Max capacity = {} bits", n, capacity_bits),
        None => format!("Segment too long, Max capacity = {} bits", capacity_bits),
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, QrError>;
