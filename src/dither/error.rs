use std::fmt;
use std::num::ParseIntError;

/// Error type for parsing hex color strings.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 characters after stripping '#')
    InvalidLength,
    /// Invalid hexadecimal character encountered
    InvalidHex(ParseIntError),
}

impl From<ParseIntError> for ParseColorError {
    fn from(err: ParseIntError) -> Self {
        ParseColorError::InvalidHex(err)
    }
}

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseColorError::InvalidLength => {
                write!(f, "invalid hex color length (expected 3 or 6 characters)")
            }
            ParseColorError::InvalidHex(err) => {
                write!(f, "invalid hex character: {}", err)
            }
        }
    }
}

impl std::error::Error for ParseColorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseColorError::InvalidHex(err) => Some(err),
            _ => None,
        }
    }
}

/// Error type for the dithering core.
///
/// All validation happens before any pixel is touched; a render either
/// produces a complete output buffer or fails with one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum DitherError {
    /// No colors provided in the palette
    EmptyPalette,
    /// Sampling step below the minimum of 1
    InvalidStep {
        /// The rejected step value
        step: u32,
    },
    /// Raw buffer length does not match 4 * width * height
    BufferSizeMismatch {
        /// Expected byte length for the given dimensions
        expected: usize,
        /// Actual byte length supplied
        actual: usize,
    },
    /// Invalid hex color string
    ParseColor(ParseColorError),
}

impl From<ParseColorError> for DitherError {
    fn from(err: ParseColorError) -> Self {
        DitherError::ParseColor(err)
    }
}

impl fmt::Display for DitherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DitherError::EmptyPalette => {
                write!(f, "palette cannot be empty")
            }
            DitherError::InvalidStep { step } => {
                write!(f, "step must be at least 1, got {}", step)
            }
            DitherError::BufferSizeMismatch { expected, actual } => {
                write!(
                    f,
                    "pixel buffer length mismatch: expected {} bytes, got {}",
                    expected, actual
                )
            }
            DitherError::ParseColor(err) => {
                write!(f, "invalid color: {}", err)
            }
        }
    }
}

impl std::error::Error for DitherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DitherError::ParseColor(err) => Some(err),
            _ => None,
        }
    }
}
