//! Field extraction and classification that work on identifiers of any layout.

use std::{borrow::Cow, time};

use crate::Uuid;

impl Uuid {
    /// Returns the Unix timestamp in milliseconds embedded in a version 7 or 8 identifier, or
    /// `None` for any other version.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::Uuid;
    ///
    /// let x = Uuid::from_fields_v7(0x0180_ae59_078c, 42, 0);
    /// assert_eq!(x.timestamp_ms(), Some(0x0180_ae59_078c));
    /// assert_eq!(x.sequence(), Some(42));
    ///
    /// let y = Uuid::from_fields_v8(0x0180_ae59_078c, 42, 0);
    /// assert_eq!(y.timestamp_ms(), Some(0x0180_ae59_078c));
    ///
    /// assert_eq!(Uuid::NIL.timestamp_ms(), None);
    /// ```
    pub const fn timestamp_ms(&self) -> Option<u64> {
        match self.version() {
            Some(7) => Some(self.high() >> 16),
            Some(8) => Some((self.low() & 0x3fff_ffff_ffff_ffff) >> 16),
            _ => None,
        }
    }

    /// Returns the embedded timestamp of a version 7 or 8 identifier as [`time::SystemTime`].
    pub fn system_time(&self) -> Option<time::SystemTime> {
        self.timestamp_ms()
            .map(|ms| time::UNIX_EPOCH + time::Duration::from_millis(ms))
    }

    /// Returns the counter of a version 7 (12 bits) or version 8 (16 bits) identifier, or `None`
    /// for any other version.
    pub const fn sequence(&self) -> Option<u16> {
        match self.version() {
            Some(7) => Some((self.high() & 0xfff) as u16),
            Some(8) => Some((self.low() & 0xffff) as u16),
            _ => None,
        }
    }

    /// Returns `true` if the identifier uses one of the database-oriented time-ordered layouts
    /// (version 7 or 8).
    pub const fn is_database_oriented(&self) -> bool {
        matches!(self.version(), Some(7 | 8))
    }

    /// Returns `true` if the identifier is name-based (version 3 or 5).
    pub const fn is_name_based(&self) -> bool {
        matches!(self.version(), Some(3 | 5))
    }

    /// Returns `true` if the identifier is random (version 4).
    pub const fn is_random(&self) -> bool {
        matches!(self.version(), Some(4))
    }

    /// Returns a human-readable label of the identifier's version.
    pub fn version_description(&self) -> Cow<'static, str> {
        match self.version() {
            Some(4) => Cow::Borrowed("Version 4: Random UUID"),
            Some(5) => Cow::Borrowed("Version 5: Name-based UUID using SHA-1 hashing"),
            Some(7) => Cow::Borrowed("Version 7: Time-ordered UUID optimized for PostgreSQL"),
            Some(8) => Cow::Borrowed("Version 8: Time-ordered UUID optimized for SQL Server"),
            _ => Cow::Owned(format!(
                "Version {}: Unknown or unsupported version",
                self.version_num()
            )),
        }
    }

    /// Returns `true` if `self` carries a later timestamp than `other`, or the same timestamp and
    /// a larger counter.
    ///
    /// The timestamp and counter are read from the low word for version 8 identifiers and from
    /// the high word for version 7 identifiers. Identifiers of any other version carry no
    /// timestamp, so the result is `false` whenever either side is not version 7 or 8.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::Uuid;
    ///
    /// let a = Uuid::from_fields_v7(1_000, 0, 0);
    /// let b = Uuid::from_fields_v8(1_000, 1, 0);
    /// assert!(b.is_ordered_after(&a));
    /// assert!(!a.is_ordered_after(&Uuid::NIL));
    /// ```
    pub const fn is_ordered_after(&self, other: &Self) -> bool {
        match (self.ordering_key(), other.ordering_key()) {
            (Some((ts_a, seq_a)), Some((ts_b, seq_b))) => {
                ts_a > ts_b || (ts_a == ts_b && seq_a > seq_b)
            }
            _ => false,
        }
    }

    const fn ordering_key(&self) -> Option<(u64, u16)> {
        match (self.timestamp_ms(), self.sequence()) {
            (Some(ts), Some(seq)) => Some((ts, seq)),
            _ => None,
        }
    }
}

/// Returns `true` if every identifier in `ids` is ordered after its predecessor.
///
/// Empty and single-element sequences are ordered.
///
/// # Examples
///
/// ```rust
/// use tsuid::{are_monotonically_ordered, Uuid};
///
/// let a = Uuid::from_fields_v7(1_000, 0, 0);
/// let b = Uuid::from_fields_v7(1_000, 1, 0);
/// assert!(are_monotonically_ordered(&[a, b]));
/// assert!(!are_monotonically_ordered(&[b, a]));
/// assert!(are_monotonically_ordered(&[]));
/// ```
pub fn are_monotonically_ordered(ids: &[Uuid]) -> bool {
    ids.windows(2).all(|w| w[1].is_ordered_after(&w[0]))
}
