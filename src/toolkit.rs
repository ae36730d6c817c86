//! Version-specific constructors: name-based identifiers, the database-oriented layout selector,
//! and creation helpers backed by the default generator.

use sha1::{Digest, Sha1};

use crate::{generator::Strategy, Error, Uuid};

/// Target database engines known to the layout selector.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[non_exhaustive]
pub enum DatabaseType {
    /// Any engine without a dedicated layout.
    #[default]
    Other,
    /// PostgreSQL, whose B-tree indexes favor timestamp-first keys.
    PostgreSql,
    /// Microsoft SQL Server, which compares the last bytes of a `uniqueidentifier` first.
    SqlServer,
    /// SQLite, whose rowid B-trees favor timestamp-first keys.
    Sqlite,
    /// MySQL, which has no dedicated layout yet and gets random identifiers.
    MySql,
    /// Oracle Database, which has no dedicated layout yet and gets random identifiers.
    Oracle,
}

impl Strategy {
    /// Returns the layout that suits the index structure of the given database engine.
    ///
    /// PostgreSQL and SQLite get the timestamp-first layout (version 7), SQL Server gets the
    /// timestamp-last layout (version 8), and every other engine falls back to random identifiers
    /// (version 4).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::{DatabaseType, Strategy};
    ///
    /// assert_eq!(Strategy::for_database(DatabaseType::PostgreSql), Strategy::TimestampFirst);
    /// assert_eq!(Strategy::for_database(DatabaseType::SqlServer), Strategy::TimestampLast);
    /// assert_eq!(Strategy::for_database(DatabaseType::Oracle), Strategy::Random);
    /// ```
    pub const fn for_database(database: DatabaseType) -> Self {
        match database {
            DatabaseType::PostgreSql | DatabaseType::Sqlite => Self::TimestampFirst,
            DatabaseType::SqlServer => Self::TimestampLast,
            DatabaseType::Other | DatabaseType::MySql | DatabaseType::Oracle => Self::Random,
        }
    }
}

impl Uuid {
    /// Creates a name-based version 5 identifier from a namespace and a name.
    ///
    /// The SHA-1 digest is computed over the byte form of `namespace` (see [`Uuid::to_bytes`])
    /// followed by the UTF-8 bytes of `name`, and its first 16 bytes are read back with
    /// [`Uuid::from_bytes`]. The same inputs always produce the same identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingInput`] if `name` is absent or empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::Uuid;
    ///
    /// let ns = Uuid::from_words(0x6ba7_b810_9dad_11d1, 0x80b4_00c0_4fd4_30c8);
    /// let x = Uuid::new_v5(&ns, "example.com")?;
    /// assert_eq!(x, Uuid::new_v5(&ns, "example.com")?);
    /// assert_eq!(x.version(), Some(5));
    /// assert!(Uuid::new_v5(&ns, None).is_err());
    /// # Ok::<(), tsuid::Error>(())
    /// ```
    pub fn new_v5<'a>(namespace: &Uuid, name: impl Into<Option<&'a str>>) -> Result<Self, Error> {
        let name = match name.into() {
            Some(name) if !name.is_empty() => name,
            _ => return Err(Error::MissingInput { what: "name" }),
        };

        let mut hasher = Sha1::new();
        hasher.update(namespace.to_bytes());
        hasher.update(name.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest[..16]);
        Ok(Self::from_bytes(bytes).with_version(5))
    }
}

#[cfg(feature = "global_gen")]
#[cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]
pub use with_global_gen::*;

#[cfg(feature = "global_gen")]
mod with_global_gen {
    use super::DatabaseType;
    use crate::{generator::Strategy, global_gen::with_global_gen, Error, Uuid};

    impl Uuid {
        /// Generates an identifier with the layout that suits the given database engine.
        ///
        /// # Examples
        ///
        /// ```rust
        /// use tsuid::{DatabaseType, Uuid};
        ///
        /// assert_eq!(Uuid::new_database_friendly(DatabaseType::SqlServer).version(), Some(8));
        /// assert_eq!(Uuid::new_database_friendly(DatabaseType::MySql).version(), Some(4));
        /// ```
        pub fn new_database_friendly(database: DatabaseType) -> Self {
            with_global_gen(|g| g.generate(Strategy::for_database(database)))
        }
    }

    /// Creates a version 7 identifier carrying the given Unix timestamp in milliseconds, a zero
    /// counter, and a random low word.
    ///
    /// The default generator's monotonic state is not consulted or changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `unix_ts_ms` does not fit in 48 bits.
    ///
    /// # Examples
    ///
    /// ```rust
    /// let x = tsuid::toolkit::create_from_timestamp(1_700_000_000_000)?;
    /// assert_eq!(x.timestamp_ms(), Some(1_700_000_000_000));
    /// assert_eq!(x.sequence(), Some(0));
    /// # Ok::<(), tsuid::Error>(())
    /// ```
    pub fn create_from_timestamp(unix_ts_ms: u64) -> Result<Uuid, Error> {
        const MAX_TIMESTAMP: u64 = (1 << 48) - 1;
        if unix_ts_ms > MAX_TIMESTAMP {
            return Err(Error::OutOfRange {
                what: "timestamp",
                value: unix_ts_ms,
                min: 0,
                max: MAX_TIMESTAMP,
            });
        }
        Ok(with_global_gen(|g| g.generate_at(unix_ts_ms)))
    }

    /// Creates a random identifier carrying the given version field value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `version` is not within `1..=8`.
    pub fn create_with_version(version: u8) -> Result<Uuid, Error> {
        with_global_gen(|g| g.generate_with_version(version))
    }

    /// Generates `count` identifiers in generation order with the layout that suits the given
    /// database engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `count` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::{are_monotonically_ordered, toolkit, DatabaseType};
    ///
    /// let batch = toolkit::create_sequential_batch(100, DatabaseType::PostgreSql)?;
    /// assert_eq!(batch.len(), 100);
    /// assert!(are_monotonically_ordered(&batch));
    /// # Ok::<(), tsuid::Error>(())
    /// ```
    pub fn create_sequential_batch(count: usize, database: DatabaseType) -> Result<Vec<Uuid>, Error> {
        with_global_gen(|g| g.generate_batch(count, Strategy::for_database(database)))
    }
}
