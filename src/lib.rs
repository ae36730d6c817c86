//! Time-sortable 128-bit identifiers stored as two 64-bit words
//!
//! ```rust
//! use tsuid::Uuid;
//!
//! let uuid = Uuid::new();
//! println!("{}", uuid); // e.g. "018094243e597c059219566f82fff672"
//! println!("{}", uuid.to_base32()); // e.g. "01G297GFJSFG2S4ACPDY1FZXKJ"
//! println!("{:?}", uuid.to_bytes()); // each word little-endian, high word first
//! ```
//!
//! An identifier is a pair of `u64` words, `high` and `low`, compared lexicographically. The
//! 32-digit hexadecimal form and the 26-character Base32 form both sort in the same order as the
//! identifiers themselves.
//!
//! # Field and bit layout
//!
//! The default layout (version 7) looks like this, `high` first:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        counter        |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                          rand                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                              rand                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field is dedicated to the Unix timestamp in milliseconds.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 12-bit `counter` field accommodates the sequence counter that ensures the monotonic
//!   order of identifiers generated within the same millisecond. The counter starts from zero
//!   whenever `unix_ts_ms` advances and is incremented by one for each new identifier generated
//!   within the same timestamp.
//! - The 2-bit `var` field is set at `10`.
//! - The remaining 62 `rand` bits are filled with a cryptographically strong random number.
//!
//! The version 8 layout swaps the words: `high` is random apart from `ver`, and `low` holds a
//! 46-bit timestamp and a 16-bit counter under the `var` bits. Version 4 identifiers are random
//! apart from `ver` and `var`, and version 5 identifiers are derived from a SHA-1 digest of a
//! namespace and a name (see [`Uuid::new_v5`]).
//!
//! When the counter reaches its maximum within the same timestamp, this library increments the
//! stored timestamp; therefore, `unix_ts_ms` may have a larger value than that of the real-time
//! clock. When the system clock moves back, the generator keeps the last timestamp and goes on
//! incrementing the counter, so identifiers from one generator never go backwards.
//!
//! # Other features
//!
//! ```rust
//! use tsuid::{are_monotonically_ordered, toolkit, DatabaseType, Uuid};
//!
//! let v4 = tsuid::uuid4();
//! let v8 = tsuid::uuid8();
//! let v5 = Uuid::new_v5(&Uuid::NIL, "example")?;
//! assert!(v4.is_random() && v8.is_database_oriented() && v5.is_name_based());
//!
//! let batch = toolkit::create_sequential_batch(8, DatabaseType::SqlServer)?;
//! assert!(are_monotonically_ordered(&batch));
//!
//! let parsed: Uuid = v8.to_string().parse()?;
//! assert_eq!(parsed, v8);
//! assert_eq!(Uuid::from_base64(v8.to_base64().as_str())?, v8);
//! # Ok::<(), tsuid::Error>(())
//! ```
//!
//! # Crate features
//!
//! - `global_gen` (default): the process-wide default generator and the functions built on it.
//! - `uuid` (default): conversions to and from [`uuid::Uuid`](https://docs.rs/uuid).
//! - `serde`: serialization as a hex string or as 16 bytes.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod codec;
mod decoder;
mod error;
mod id;
pub mod toolkit;

pub mod generator;
pub use generator::{Generator, RandSource, StdSystemTime, Strategy, TimeSource};

pub use decoder::are_monotonically_ordered;
pub use error::{Error, FormatError};
pub use id::{ParseError, Uuid, Variant};
pub use toolkit::DatabaseType;

mod global_gen;
#[cfg(feature = "global_gen")]
pub use global_gen::{fill, generate, generate_array, uuid4, uuid7, uuid8};
