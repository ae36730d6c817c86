//! Error types returned by the fallible conversions and constructors.

/// Errors returned by the "hard" entry points of this crate.
///
/// Every conversion that can fail also has a soft counterpart (`try_parse`, `try_from_slice`,
/// `try_from_base64`, `write_bytes`) that reports failure through `Option` or `bool` instead.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A required input was absent.
    #[error("{what} must not be absent")]
    MissingInput {
        /// Name of the missing input.
        what: &'static str,
    },

    /// An input was present but structurally invalid.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A numeric argument was outside of its accepted domain.
    #[error("{what} out of range: {value} (expected {min}..={max})")]
    OutOfRange {
        /// Name of the argument.
        what: &'static str,
        /// The value received.
        value: u64,
        /// Smallest accepted value.
        min: u64,
        /// Largest accepted value.
        max: u64,
    },

    /// A byte buffer did not have the required fixed size.
    #[error("expected exactly {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length received.
        actual: usize,
    },
}

/// Structural faults found while decoding a textual representation.
#[derive(Clone, Eq, PartialEq, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    /// The text does not have the fixed length of the format.
    #[error("input string must be {expected} characters long, got {actual}")]
    InvalidLength {
        /// Required number of characters.
        expected: usize,
        /// Number of bytes received.
        actual: usize,
    },

    /// A character outside of the format's alphabet.
    #[error("invalid character {found:?} at position {position}")]
    InvalidDigit {
        /// Byte offset of the offending character.
        position: usize,
        /// The offending character.
        found: char,
    },

    /// The leading Base32 character encodes more than 128 bits.
    #[error("Base32 value overflows 128 bits")]
    Overflow,

    /// The text is not valid standard Base64.
    #[error("invalid Base64 string: {0}")]
    Base64(#[from] base64::DecodeError),

    /// The Base64 text decoded to the wrong number of bytes.
    #[error("Base64 string must decode to {expected} bytes, got {actual}")]
    DecodedLength {
        /// Required number of bytes.
        expected: usize,
        /// Number of bytes decoded.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::{Error, FormatError};

    /// Renders descriptive messages
    #[test]
    fn renders_descriptive_messages() {
        assert_eq!(
            Error::MissingInput { what: "input" }.to_string(),
            "input must not be absent"
        );
        assert_eq!(
            Error::from(FormatError::InvalidLength {
                expected: 32,
                actual: 31
            })
            .to_string(),
            "input string must be 32 characters long, got 31"
        );
        assert_eq!(
            Error::OutOfRange {
                what: "version",
                value: 9,
                min: 1,
                max: 8
            }
            .to_string(),
            "version out of range: 9 (expected 1..=8)"
        );
        assert_eq!(
            Error::InvalidLength {
                expected: 16,
                actual: 15
            }
            .to_string(),
            "expected exactly 16 bytes, got 15"
        );
    }
}
