use std::{fmt, str};

use fstr::FStr;

use crate::{Error, FormatError};

/// Represents a 128-bit time-ordered unique identifier as two 64-bit words.
///
/// The `high` word precedes the `low` word in every ordering, so identifiers whose timestamp
/// occupies the most significant bits of `high` sort by creation time. The derived [`Ord`] and
/// [`Hash`] consider both words; the [`Default`] value is [`Uuid::NIL`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub struct Uuid {
    high: u64,
    low: u64,
}

/// Error parsing an invalid string representation.
pub type ParseError = Error;

/// The variant field values.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Variant {
    /// The variant field value `0xx`, reserved for NCS backward compatibility.
    Var0,

    /// The variant field value `10`, used by every identifier this crate generates.
    Var10,

    /// The variant field value `110`, reserved for Microsoft backward compatibility.
    Var110,

    /// The variant field value `111`, reserved for future definition.
    VarReserved,
}

impl Uuid {
    /// Nil UUID (00000000000000000000000000000000)
    pub const NIL: Self = Self::from_words(0, 0);

    /// Max UUID (ffffffffffffffffffffffffffffffff)
    pub const MAX: Self = Self::from_words(u64::MAX, u64::MAX);

    /// Creates an identifier from its two words.
    pub const fn from_words(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Returns the high word, which carries the timestamp in the version 7 layout.
    pub const fn high(&self) -> u64 {
        self.high
    }

    /// Returns the low word.
    pub const fn low(&self) -> u64 {
        self.low
    }

    /// Returns the two words as a single big-endian 128-bit integer.
    pub const fn as_u128(&self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }

    /// Creates an identifier from version 7 field values.
    ///
    /// The bits of `rand` that fall on the variant field are overwritten.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 48-bit integer or `counter` is not a 12-bit integer.
    pub const fn from_fields_v7(unix_ts_ms: u64, counter: u16, rand: u64) -> Self {
        if unix_ts_ms >= 1 << 48 || counter >= 1 << 12 {
            panic!("invalid field value");
        }

        Self::from_words((unix_ts_ms << 16) | counter as u64, rand).with_version(7)
    }

    /// Creates an identifier from version 8 field values.
    ///
    /// The timestamp and counter are stored in the low word, whose two most significant bits hold
    /// the variant; the bits of `rand` that fall on the version field are overwritten.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 46-bit integer.
    pub const fn from_fields_v8(unix_ts_ms: u64, counter: u16, rand: u64) -> Self {
        if unix_ts_ms >= 1 << 46 {
            panic!("invalid field value");
        }

        Self::from_words(rand, (unix_ts_ms << 16) | counter as u64).with_version(8)
    }

    /// Returns a copy with the version field set to `version` and the variant field set to `10`.
    pub(crate) const fn with_version(self, version: u8) -> Self {
        Self {
            high: (self.high & !0xf000) | ((version as u64 & 0xf) << 12),
            low: (self.low & 0x3fff_ffff_ffff_ffff) | 0x8000_0000_0000_0000,
        }
    }

    /// Reports the variant field value of the identifier.
    pub const fn variant(&self) -> Variant {
        match self.low >> 61 {
            0..=3 => Variant::Var0,
            4 | 5 => Variant::Var10,
            6 => Variant::Var110,
            _ => Variant::VarReserved,
        }
    }

    /// Returns the raw 4-bit version field regardless of the variant.
    pub const fn version_num(&self) -> u8 {
        ((self.high >> 12) & 0xf) as u8
    }

    /// Returns the version field value if the variant field value is `10`, or `None` otherwise.
    pub const fn version(&self) -> Option<u8> {
        match self.variant() {
            Variant::Var10 => Some(self.version_num()),
            _ => None,
        }
    }

    /// Returns the 32-digit lowercase hexadecimal representation stored in a stack-allocated
    /// string.
    ///
    /// The high word is written first, so string comparison matches identifier comparison.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::Uuid;
    ///
    /// let x = Uuid::parse("0180AE59078C7B80B1132FE14A615FB3")?;
    /// assert_eq!(x.encode().as_str(), "0180ae59078c7b80b1132fe14a615fb3");
    /// assert_eq!(x.to_string(), "0180ae59078c7b80b1132fe14a615fb3");
    /// # Ok::<(), tsuid::Error>(())
    /// ```
    pub fn encode(&self) -> FStr<32> {
        self.encode_with(b"0123456789abcdef")
    }

    /// Returns the 32-digit uppercase hexadecimal representation.
    pub fn encode_upper(&self) -> FStr<32> {
        self.encode_with(b"0123456789ABCDEF")
    }

    fn encode_with(&self, digits: &[u8; 16]) -> FStr<32> {
        let mut buffer = [0u8; 32];
        for (i, e) in self.as_u128().to_be_bytes().iter().enumerate() {
            buffer[2 * i] = digits[(e >> 4) as usize];
            buffer[2 * i + 1] = digits[(e & 15) as usize];
        }
        debug_assert!(buffer.is_ascii());
        // SAFETY: every byte is taken from an ASCII digit table
        unsafe { FStr::from_inner_unchecked(buffer) }
    }

    /// Creates an identifier from the 32-digit hexadecimal representation.
    ///
    /// The input is case-insensitive and must consist of exactly 32 hexadecimal digits without
    /// separators, sign, or surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInput`] if `input` is `None` and [`Error::Format`] if it is
    /// malformed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::{Error, Uuid};
    ///
    /// let x = Uuid::parse("00000000000000010000000000000002")?;
    /// assert_eq!(x, Uuid::from_words(1, 2));
    ///
    /// assert!(matches!(Uuid::parse(None), Err(Error::MissingInput { .. })));
    /// assert!(matches!(Uuid::parse("0123"), Err(Error::Format(_))));
    /// # Ok::<(), tsuid::Error>(())
    /// ```
    pub fn parse<'a>(input: impl Into<Option<&'a str>>) -> Result<Self, Error> {
        let src = input.into().ok_or(Error::MissingInput { what: "input" })?;
        if src.len() != 32 {
            return Err(FormatError::InvalidLength {
                expected: 32,
                actual: src.len(),
            }
            .into());
        }

        let mut value = 0u128;
        for (position, found) in src.char_indices() {
            let digit = found
                .to_digit(16)
                .ok_or(FormatError::InvalidDigit { position, found })?;
            value = (value << 4) | digit as u128;
        }
        Ok(Self::from(value))
    }

    /// Creates an identifier from the 32-digit hexadecimal representation, returning `None` on
    /// absent or malformed input.
    pub fn try_parse<'a>(input: impl Into<Option<&'a str>>) -> Option<Self> {
        Self::parse(input).ok()
    }
}

impl fmt::Display for Uuid {
    /// Returns the 32-digit lowercase hexadecimal representation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::LowerHex for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::UpperHex for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode_upper())
    }
}

impl str::FromStr for Uuid {
    type Err = ParseError;

    /// Creates an object from the 32-digit hexadecimal representation.
    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::parse(src)
    }
}

impl From<Uuid> for u128 {
    fn from(src: Uuid) -> Self {
        src.as_u128()
    }
}

impl From<u128> for Uuid {
    fn from(src: u128) -> Self {
        Self::from_words((src >> 64) as u64, src as u64)
    }
}

impl From<Uuid> for (u64, u64) {
    fn from(src: Uuid) -> Self {
        (src.high, src.low)
    }
}

impl From<(u64, u64)> for Uuid {
    fn from((high, low): (u64, u64)) -> Self {
        Self::from_words(high, low)
    }
}

impl From<Uuid> for String {
    fn from(src: Uuid) -> Self {
        src.to_string()
    }
}

impl TryFrom<String> for Uuid {
    type Error = ParseError;

    fn try_from(src: String) -> Result<Self, Self::Error> {
        Self::parse(src.as_str())
    }
}

impl TryFrom<&str> for Uuid {
    type Error = ParseError;

    fn try_from(src: &str) -> Result<Self, Self::Error> {
        Self::parse(src)
    }
}

#[cfg(feature = "serde")]
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
mod serde_support {
    use super::{fmt, Uuid};
    use serde::{de, Deserializer, Serializer};

    impl serde::Serialize for Uuid {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            if serializer.is_human_readable() {
                serializer.serialize_str(&self.encode())
            } else {
                serializer.serialize_bytes(&self.to_bytes())
            }
        }
    }

    impl<'de> serde::Deserialize<'de> for Uuid {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            if deserializer.is_human_readable() {
                deserializer.deserialize_any(ReadableVisitor)
            } else {
                deserializer.deserialize_bytes(CompactVisitor)
            }
        }
    }

    /// Accepts string tokens only, rejecting `null`, empty strings, and other token types with
    /// descriptive messages.
    struct ReadableVisitor;

    impl<'de> de::Visitor<'de> for ReadableVisitor {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "string value for UUID")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            if value.is_empty() {
                return Err(E::custom("cannot convert empty string to UUID"));
            }
            Uuid::parse(value).map_err(|err| {
                E::custom(format_args!(
                    "failed to parse UUID from string '{value}': {err}"
                ))
            })
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Err(E::custom("cannot convert null value to UUID"))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            self.visit_unit()
        }
    }

    struct CompactVisitor;

    impl<'de> de::Visitor<'de> for CompactVisitor {
        type Value = Uuid;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(formatter, "16 bytes for UUID")
        }

        fn visit_bytes<E: de::Error>(self, value: &[u8]) -> Result<Self::Value, E> {
            Uuid::from_slice(value).map_err(de::Error::custom)
        }
    }

}

#[cfg(test)]
mod tests {
    use super::{Uuid, Variant};
    use crate::{Error, FormatError};

    /// Returns a collection of prepared cases
    fn prepare_cases() -> &'static [((u64, u16, u64), &'static str)] {
        const MAX_UINT48: u64 = (1 << 48) - 1;
        const MAX_UINT12: u16 = (1 << 12) - 1;
        const MAX_UINT62: u64 = (1 << 62) - 1;

        &[
            ((0, 0, 0), "00000000000070008000000000000000"),
            ((MAX_UINT48, 0, 0), "ffffffffffff70008000000000000000"),
            ((0, MAX_UINT12, 0), "0000000000007fff8000000000000000"),
            ((0, 0, MAX_UINT62), "0000000000007000bfffffffffffffff"),
            (
                (MAX_UINT48, MAX_UINT12, MAX_UINT62),
                "ffffffffffff7fffbfffffffffffffff",
            ),
            (
                (0x17f22e279b0, 0xcc3, 0x18c4dc0c0c07398f),
                "017f22e279b07cc398c4dc0c0c07398f",
            ),
        ]
    }

    /// Encodes and decodes prepared cases correctly
    #[test]
    fn encodes_and_decodes_prepared_cases_correctly() {
        for (fs, text) in prepare_cases() {
            let from_fields = Uuid::from_fields_v7(fs.0, fs.1, fs.2);
            assert_eq!(Ok(from_fields), text.parse());
            assert_eq!(Ok(from_fields), text.to_uppercase().parse());
            assert_eq!(from_fields.encode().as_str(), *text);
            assert_eq!(&from_fields.to_string(), text);
            assert_eq!(format!("{from_fields:x}"), *text);
            assert_eq!(format!("{from_fields:X}"), text.to_uppercase());
            assert_eq!(from_fields.version(), Some(7));
            assert_eq!(from_fields.variant(), Variant::Var10);
        }
    }

    /// Returns error to invalid string representation
    #[test]
    fn returns_error_to_invalid_string_representation() {
        let cases = [
            "",
            " 0180a8f05b8275b49fefecad657c30bb",
            "0180a8f05b847438ab50f0626f78002b ",
            "+0180a8f05b847438ab50f06405d35ed",
            "-0180a8f05b847438ab50f06508df4c2",
            "0180a8f0-5b84-7438-ab50-f066aa10a367",
            "0180a8f05b847438ab50f068decfbfd",
            "0180a8f05b847438ab50f068decfbfd70",
            "{0180a8f05b847438ab50f06ac2e5e08}",
            "0180a8f05b8474 8ab50f06bed27bdc7",
            "0180a8g05b847438ab50f06c91175b8a",
            "0180a8f05b847438ab50_f06d3ea2442",
            "0180a8f05b847438ab50f06d3ea2442é",
        ];

        for e in cases {
            assert!(e.parse::<Uuid>().is_err(), "{e:?}");
            assert!(Uuid::try_parse(e).is_none(), "{e:?}");
        }
    }

    /// Distinguishes absent input from malformed input
    #[test]
    fn distinguishes_absent_input_from_malformed_input() {
        assert_eq!(Uuid::parse(None), Err(Error::MissingInput { what: "input" }));
        assert_eq!(Uuid::try_parse(None), None);

        assert_eq!(
            Uuid::parse("0".repeat(31).as_str()),
            Err(Error::Format(FormatError::InvalidLength {
                expected: 32,
                actual: 31
            }))
        );
        assert_eq!(
            Uuid::parse("0".repeat(33).as_str()),
            Err(Error::Format(FormatError::InvalidLength {
                expected: 32,
                actual: 33
            }))
        );
        assert_eq!(
            Uuid::parse("0000000000000000000000000000000z"),
            Err(Error::Format(FormatError::InvalidDigit {
                position: 31,
                found: 'z'
            }))
        );
    }

    /// Returns Nil and Max UUIDs
    #[test]
    fn returns_nil_and_max_uuids() {
        assert_eq!(Uuid::NIL.encode().as_str(), "00000000000000000000000000000000");
        assert_eq!(Uuid::MAX.encode().as_str(), "ffffffffffffffffffffffffffffffff");
        assert_eq!(Uuid::default(), Uuid::NIL);
        assert_eq!(Uuid::NIL.version(), None);
        assert_eq!(Uuid::MAX.variant(), Variant::VarReserved);
    }

    /// Compares high word first and low word second
    #[test]
    fn compares_high_word_first_and_low_word_second() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let a = Uuid::from_words(1, 1);
        let b = Uuid::from_words(1, 2);
        let c = Uuid::from_words(2, 1);
        assert!(a < b);
        assert!(b < c);
        assert!(a < c);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(a, Uuid::from_words(1, 1));
        assert!(Uuid::from_words(0, u64::MAX) < Uuid::from_words(1, 0));

        let hash = |e: &Uuid| {
            let mut hasher = DefaultHasher::new();
            e.hash(&mut hasher);
            hasher.finish()
        };
        assert_eq!(hash(&a), hash(&a));
        assert_eq!(hash(&a), hash(&Uuid::from_words(1, 1)));
    }

    /// Sorts hex strings in the same order as identifiers
    #[test]
    fn sorts_hex_strings_in_the_same_order_as_identifiers() {
        let mut ids = [
            Uuid::from_words(2, 0),
            Uuid::from_words(0, u64::MAX),
            Uuid::from_words(1, 5),
            Uuid::from_words(1, 0x10),
            Uuid::MAX,
            Uuid::NIL,
        ];
        let mut strings: Vec<String> = ids.iter().map(|e| e.to_string()).collect();
        ids.sort();
        strings.sort();
        for (id, text) in ids.iter().zip(&strings) {
            assert_eq!(&id.to_string(), text);
        }
    }

    /// Sets version and variant bits in the canonical positions
    #[test]
    fn sets_version_and_variant_bits_in_the_canonical_positions() {
        let e = Uuid::from_fields_v8(0x0123_4567_89ab, 0xbeef, u64::MAX);
        assert_eq!(e.high(), 0xffff_ffff_ffff_8fff);
        assert_eq!(e.low() >> 62, 0b10);
        assert_eq!(e.version(), Some(8));

        let e = Uuid::from_words(0, 0x4000_0000_0000_0000).with_version(4);
        assert_eq!(e.high(), 0x4000);
        assert_eq!(e.low(), 0x8000_0000_0000_0000);
    }

    /// Panics on field values out of range
    #[test]
    #[should_panic(expected = "invalid field value")]
    fn panics_on_field_values_out_of_range() {
        Uuid::from_fields_v7(1 << 48, 0, 0);
    }

    /// Has symmetric converters
    #[test]
    fn has_symmetric_converters() {
        for (fs, _) in prepare_cases() {
            let e = Uuid::from_fields_v7(fs.0, fs.1, fs.2);
            assert_eq!(Uuid::from(u128::from(e)), e);
            assert_eq!(Uuid::from(<(u64, u64)>::from(e)), e);
            assert_eq!(Uuid::try_from(e.to_string()), Ok(e));
            assert_eq!(Uuid::try_from(e.to_string().to_uppercase()), Ok(e));
            assert_eq!(Uuid::try_from(String::from(e).as_str()), Ok(e));
        }
    }
}
