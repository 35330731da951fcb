//! Error types for capture parsing.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while decoding a Radiotap header or an MPDU.
///
/// Only a handful of conditions abort a parse (see the decoder
/// contracts); everything else is accumulated on the record as a
/// [`FieldError`] so callers can still inspect what was decoded.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ParseError {
    /// Radiotap version octet was not 0, the only defined version.
    #[error("unsupported radiotap version {0}")]
    BadVersion(u8),

    /// The buffer ended before a required field could be read.
    #[error("{field}: need {needed} byte(s), {available} available")]
    Truncated {
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// Radiotap `it_len` is inconsistent with the buffer.
    #[error("radiotap length {len} out of range for {available}-byte buffer")]
    BadLength { len: usize, available: usize },

    /// A presence bit was set with no matching catalog entry.
    #[error("no field catalog entry for presence bit {0}")]
    UnknownField(u32),

    /// The protected flag was set but the header bytes match no known
    /// encryption variant.
    #[error("protected frame matches no known encryption header")]
    MalformedCrypt,

    /// A structurally valid but unsupported construct was encountered.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),
}

/// A recoverable decode error tied to the location it occurred at.
///
/// `field` is a dot-separated path into the record, e.g.
/// `ctrl.block-ack.bactrl` or `radiotap.channel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub error: ParseError,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: ParseError) -> Self {
        Self {
            field: field.into(),
            error,
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Result type alias for decoder operations.
pub type Result<T> = std::result::Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_display() {
        let e = ParseError::Truncated {
            field: "framectrl",
            needed: 10,
            available: 3,
        };
        assert_eq!(e.to_string(), "framectrl: need 10 byte(s), 3 available");
    }

    #[test]
    fn test_field_error_display() {
        let fe = FieldError::new("ctrl.pspoll.addr2", ParseError::MalformedCrypt);
        assert!(fe.to_string().starts_with("ctrl.pspoll.addr2: "));
    }
}
