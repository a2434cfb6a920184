use std::fmt;

/// Errors raised while correcting or decoding a QR code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Division by the zero field element or by the zero polynomial.
    DivisionByZero,
    /// More errors than the parity codewords can correct.
    CorrectionFailed(&'static str),
    /// A computed error position lies outside the codeword block.
    BadErrorLocation {
        /// Position as computed from the error locator (may be negative)
        position: isize,
        /// Length of the codeword block
        len: usize,
    },
    /// Version, format information or codeword layout could not be read.
    MalformedStructure(&'static str),
}

impl DecodeError {
    /// Whether the orchestrator should retry the decode with a mirrored reading.
    ///
    /// Division by zero is a logic fault and is never retried.
    pub fn triggers_mirror_retry(&self) -> bool {
        !matches!(self, DecodeError::DivisionByZero)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::DivisionByZero => write!(f, "division by zero in GF(256)"),
            DecodeError::CorrectionFailed(reason) => {
                write!(f, "error correction failed: {}", reason)
            }
            DecodeError::BadErrorLocation { position, len } => {
                write!(
                    f,
                    "bad error location: position {} outside block of {} codewords",
                    position, len
                )
            }
            DecodeError::MalformedStructure(reason) => write!(f, "malformed QR code: {}", reason),
        }
    }
}

impl std::error::Error for DecodeError {}
