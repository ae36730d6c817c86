//! Byte, Base32, Base64, integer, and standard UUID representations.
//!
//! The byte form places the high word in bytes 0..8 and the low word in bytes 8..16, each word in
//! little-endian order. Base64 and the standard UUID conversion use that byte form. Base32 instead
//! views the identifier as the big-endian 128-bit integer `(high << 64) | low`, which keeps its
//! output in identifier order.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use fstr::FStr;

use crate::{Error, FormatError, Uuid};

/// Crockford-style Base32 alphabet without `I`, `L`, `O`, and `U`.
const BASE32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Lookup table for Base32 decoding, accepting lowercase letters too.
const BASE32_LOOKUP: [u8; 256] = {
    let mut lut = [u8::MAX; 256];
    let mut i = 0;
    while i < 32 {
        let c = BASE32_ALPHABET[i];
        lut[c as usize] = i as u8;
        lut[c.to_ascii_lowercase() as usize] = i as u8;
        i += 1;
    }
    lut
};

impl Uuid {
    /// Returns the 16-byte representation: the high word followed by the low word, each in
    /// little-endian order.
    pub const fn to_bytes(&self) -> [u8; 16] {
        (((self.low() as u128) << 64) | self.high() as u128).to_le_bytes()
    }

    /// Creates an identifier from the 16-byte representation produced by [`Uuid::to_bytes`].
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        let src = u128::from_le_bytes(bytes);
        Self::from_words(src as u64, (src >> 64) as u64)
    }

    /// Creates an identifier from a byte slice holding the 16-byte representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInput`] if `bytes` is `None` and [`Error::InvalidLength`] if the
    /// slice is not exactly 16 bytes long.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::{Error, Uuid};
    ///
    /// let x = Uuid::from_words(1, 2);
    /// assert_eq!(Uuid::from_slice(&x.to_bytes()[..])?, x);
    /// assert!(matches!(Uuid::from_slice(&[0u8; 15][..]), Err(Error::InvalidLength { .. })));
    /// # Ok::<(), tsuid::Error>(())
    /// ```
    pub fn from_slice<'a>(bytes: impl Into<Option<&'a [u8]>>) -> Result<Self, Error> {
        let src = bytes.into().ok_or(Error::MissingInput { what: "bytes" })?;
        <[u8; 16]>::try_from(src)
            .map(Self::from_bytes)
            .map_err(|_| Error::InvalidLength {
                expected: 16,
                actual: src.len(),
            })
    }

    /// Creates an identifier from a byte slice, returning `None` on absent input or wrong length.
    pub fn try_from_slice<'a>(bytes: impl Into<Option<&'a [u8]>>) -> Option<Self> {
        Self::from_slice(bytes).ok()
    }

    /// Writes the 16-byte representation to the beginning of `dest`, returning `false` without
    /// touching `dest` if it is shorter than 16 bytes.
    pub fn write_bytes(&self, dest: &mut [u8]) -> bool {
        match dest.get_mut(..16) {
            Some(head) => {
                head.copy_from_slice(&self.to_bytes());
                true
            }
            None => false,
        }
    }

    /// Writes the 32-digit lowercase hexadecimal representation to the beginning of `dest`,
    /// returning `false` without touching `dest` if it is shorter than 32 bytes.
    pub fn write_hex(&self, dest: &mut [u8]) -> bool {
        match dest.get_mut(..32) {
            Some(head) => {
                head.copy_from_slice(self.encode().as_bytes());
                true
            }
            None => false,
        }
    }

    /// Returns the 26-character Base32 representation.
    ///
    /// Each character encodes five bits of the big-endian 128-bit value, so the leading character
    /// carries the top three bits only and Base32 strings sort in identifier order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::Uuid;
    ///
    /// assert_eq!(Uuid::NIL.to_base32().as_str(), "00000000000000000000000000");
    /// assert_eq!(Uuid::MAX.to_base32().as_str(), "7ZZZZZZZZZZZZZZZZZZZZZZZZZ");
    /// ```
    pub fn to_base32(&self) -> FStr<26> {
        let mut value = self.as_u128();
        let mut buffer = [0u8; 26];
        for e in buffer.iter_mut().rev() {
            *e = BASE32_ALPHABET[(value & 31) as usize];
            value >>= 5;
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: every byte is taken from the ASCII alphabet
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Creates an identifier from the 26-character Base32 representation (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInput`] if `input` is `None` and [`Error::Format`] if it is
    /// malformed or encodes a value wider than 128 bits.
    pub fn from_base32<'a>(input: impl Into<Option<&'a str>>) -> Result<Self, Error> {
        let src = input.into().ok_or(Error::MissingInput { what: "input" })?;
        if src.len() != 26 {
            return Err(FormatError::InvalidLength {
                expected: 26,
                actual: src.len(),
            }
            .into());
        }

        let mut value = 0u128;
        for (position, found) in src.char_indices() {
            let digit = match u8::try_from(found) {
                Ok(c) if BASE32_LOOKUP[c as usize] != u8::MAX => BASE32_LOOKUP[c as usize],
                _ => return Err(FormatError::InvalidDigit { position, found }.into()),
            };
            if position == 0 && digit > 7 {
                return Err(FormatError::Overflow.into());
            }
            value = (value << 5) | digit as u128;
        }
        Ok(Self::from(value))
    }

    /// Returns the standard padded Base64 encoding of [`Uuid::to_bytes`] (24 characters).
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.to_bytes())
    }

    /// Creates an identifier from the standard Base64 encoding of its 16-byte representation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInput`] if `input` is `None` and [`Error::Format`] if the text is
    /// not valid Base64 or does not decode to exactly 16 bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::Uuid;
    ///
    /// let x = Uuid::from_words(0x0123_4567_89ab_7cde, 0x8123_4567_89ab_cdef);
    /// assert_eq!(Uuid::from_base64(x.to_base64().as_str())?, x);
    /// assert!(Uuid::from_base64("AAAA").is_err());
    /// # Ok::<(), tsuid::Error>(())
    /// ```
    pub fn from_base64<'a>(input: impl Into<Option<&'a str>>) -> Result<Self, Error> {
        let src = input.into().ok_or(Error::MissingInput { what: "input" })?;
        let bytes = STANDARD.decode(src).map_err(FormatError::from)?;
        <[u8; 16]>::try_from(bytes.as_slice())
            .map(Self::from_bytes)
            .map_err(|_| {
                FormatError::DecodedLength {
                    expected: 16,
                    actual: bytes.len(),
                }
                .into()
            })
    }

    /// Creates an identifier from its Base64 encoding, returning `None` on absent or malformed
    /// input.
    pub fn try_from_base64<'a>(input: impl Into<Option<&'a str>>) -> Option<Self> {
        Self::from_base64(input).ok()
    }

    /// Returns a lossy 64-bit integer combining the 48-bit timestamp field of the version 7 layout
    /// with a 15-bit hash of the low word.
    ///
    /// The hash XOR-folds the two halves of the low word into a signed 32-bit integer and keeps
    /// the lowest 15 bits of its absolute value. The conversion is deterministic but not
    /// injective: distinct identifiers sharing the same millisecond collide with a probability of
    /// about 1 in 32768, so the result must never be used where uniqueness is required.
    pub const fn to_int64(&self) -> i64 {
        let folded = ((self.low() >> 32) ^ (self.low() & 0xffff_ffff)) as u32 as i32;
        let hash = (folded.wrapping_abs() & 0x7fff) as i64;
        (((self.high() >> 16) as i64) << 15) | hash
    }
}

impl From<Uuid> for [u8; 16] {
    fn from(src: Uuid) -> Self {
        src.to_bytes()
    }
}

impl From<[u8; 16]> for Uuid {
    fn from(src: [u8; 16]) -> Self {
        Self::from_bytes(src)
    }
}

impl TryFrom<&[u8]> for Uuid {
    type Error = Error;

    fn try_from(src: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(src)
    }
}

#[cfg(feature = "uuid")]
#[cfg_attr(docsrs, doc(cfg(feature = "uuid")))]
mod uuid_support {
    use crate::Uuid;

    impl Uuid {
        /// Converts the identifier to the standard [`uuid::Uuid`] type holding the same 16 bytes
        /// as [`Uuid::to_bytes`].
        ///
        /// The byte form stores each word little-endian, so the standard type's version and
        /// variant accessors do not see this crate's version and variant fields.
        ///
        /// # Examples
        ///
        /// ```rust
        /// use tsuid::Uuid;
        ///
        /// let x = Uuid::from_words(0x0102_0304_0506_0708, 0x1112_1314_1516_1718);
        /// let y = x.to_standard_uuid();
        /// assert_eq!(y.as_bytes(), &x.to_bytes());
        /// assert_eq!(y.to_string(), "08070605-0403-0201-1817-161514131211");
        /// assert_eq!(Uuid::from_standard_uuid(y), x);
        /// ```
        pub const fn to_standard_uuid(&self) -> uuid::Uuid {
            uuid::Uuid::from_bytes(self.to_bytes())
        }

        /// Creates an identifier from the bytes of the standard [`uuid::Uuid`] type, read as
        /// [`Uuid::from_bytes`] does.
        pub const fn from_standard_uuid(src: uuid::Uuid) -> Self {
            Self::from_bytes(*src.as_bytes())
        }
    }

    impl From<Uuid> for uuid::Uuid {
        fn from(src: Uuid) -> Self {
            src.to_standard_uuid()
        }
    }

    impl From<uuid::Uuid> for Uuid {
        fn from(src: uuid::Uuid) -> Self {
            Self::from_standard_uuid(src)
        }
    }
}
