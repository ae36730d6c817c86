//! Generator of time-ordered and random identifiers, and related types.

use crate::{Error, Uuid};

pub mod with_rand08;


/// A trait that defines the minimum random number generator interface for [`Generator`].
///
/// Implementations must be backed by a cryptographically secure source. A source that cannot
/// deliver randomness must panic rather than return weak output.
pub trait RandSource {
    /// Returns the next random `u64`.
    fn next_u64(&mut self) -> u64;

    /// Fills `dest` with random data.
    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            chunk.copy_from_slice(&self.next_u64().to_le_bytes()[..chunk.len()]);
        }
    }
}

/// A trait that defines the minimum system clock interface for [`Generator`].
pub trait TimeSource {
    /// Returns the current Unix time in milliseconds.
    fn unix_ts_ms(&mut self) -> u64;
}

/// The default [`TimeSource`] that uses [`std::time::SystemTime`].
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub struct StdSystemTime;

impl TimeSource for StdSystemTime {
    fn unix_ts_ms(&mut self) -> u64 {
        use std::time;
        time::SystemTime::now()
            .duration_since(time::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64)
    }
}

/// The bit layout strategies a [`Generator`] can produce.
///
/// Name-based identifiers are deterministic and are created by [`Uuid::new_v5`] instead.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Strategy {
    /// Version 4: both words random apart from the version and variant fields.
    Random,

    /// Version 7: 48-bit timestamp and 12-bit counter in the high word, random low word.
    #[default]
    TimestampFirst,

    /// Version 8: random high word, 48-bit timestamp and 16-bit counter in the low word.
    TimestampLast,
}

impl Strategy {
    /// Returns the version field value of the identifiers produced with this strategy.
    pub const fn version(self) -> u8 {
        match self {
            Self::Random => 4,
            Self::TimestampFirst => 7,
            Self::TimestampLast => 8,
        }
    }

    /// Returns the largest counter value that fits in the layout, or zero if the layout has no
    /// counter.
    const fn max_counter(self) -> u64 {
        match self {
            Self::Random => 0,
            Self::TimestampFirst => (1 << 12) - 1,
            Self::TimestampLast => (1 << 16) - 1,
        }
    }
}

/// Amount of clock rollback beyond which a warning is logged.
const ROLLBACK_WARN_MS: u64 = 10_000;

/// Represents a generator that encapsulates a per-millisecond counter and guarantees the monotonic
/// order of time-ordered identifiers generated within the same millisecond.
///
/// This type provides the interface to customize the random number generator and system clock of
/// a generator. It also helps control the scope of guaranteed order of the generated identifiers.
/// The following example guarantees the process-wide (cross-thread) monotonicity using Rust's
/// standard synchronization mechanism.
///
/// # Examples
///
/// ```rust
/// use rand::rngs::OsRng;
/// use std::{sync, thread};
/// use tsuid::Generator;
///
/// let g = sync::Arc::new(sync::Mutex::new(Generator::with_rand08(OsRng)));
/// thread::scope(|s| {
///     for i in 0..4 {
///         let g = sync::Arc::clone(&g);
///         s.spawn(move || {
///             for _ in 0..8 {
///                 println!("{} by thread {}", g.lock().unwrap().generate_v7(), i);
///                 thread::yield_now();
///             }
///         });
///     }
/// });
/// ```
///
/// # Clock and counter handling
///
/// When the clock advances, the counter restarts from zero. When the clock reports the same or an
/// earlier millisecond than the last identifier, the generator keeps the last timestamp and
/// increments the counter; a rollback of more than ten seconds is also reported with
/// `log::warn!`. When the counter is exhausted (4096 values for version 7, 65536 for
/// version 8), the stored timestamp is advanced by one millisecond ahead of the clock. Therefore
/// no two identifiers from one generator share a timestamp and counter pair, and the time-ordered
/// identifiers never go backwards.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Generator<R, T = StdSystemTime> {
    timestamp: u64,
    counter: u64,

    /// The random number generator used by the generator.
    rng: R,

    /// The system clock used by the generator.
    time: T,
}

impl<R: RandSource> Generator<R> {
    /// Creates a generator instance that reads the system clock.
    pub const fn new(rng: R) -> Self {
        Self::with_rand_and_time_sources(rng, StdSystemTime)
    }
}

impl<R: RandSource, T: TimeSource> Generator<R, T> {
    /// Creates a generator instance with the specified random number generator and clock.
    pub const fn with_rand_and_time_sources(rng: R, time: T) -> Self {
        Self {
            timestamp: 0,
            counter: 0,
            rng,
            time,
        }
    }

    /// Generates a new identifier with the given strategy from the current timestamp.
    ///
    /// # Panics
    ///
    /// Panics if the timestamp to embed does not fit in the layout (48 bits for version 7, 46 bits
    /// for version 8). This includes a stored timestamp advanced past the limit by a counter
    /// overflow at the largest representable millisecond.
    pub fn generate(&mut self, strategy: Strategy) -> Uuid {
        let unix_ts_ms = self.time.unix_ts_ms();
        self.generate_core(strategy, unix_ts_ms)
    }

    /// Generates a new version 7 identifier from the current timestamp.
    ///
    /// # Panics
    ///
    /// Panics if the timestamp to embed does not fit in the layout (48 bits for version 7, 46 bits
    /// for version 8). This includes a stored timestamp advanced past the limit by a counter
    /// overflow at the largest representable millisecond.
    pub fn generate_v7(&mut self) -> Uuid {
        self.generate(Strategy::TimestampFirst)
    }

    /// Generates a new version 8 identifier from the current timestamp.
    ///
    /// # Panics
    ///
    /// Panics if the timestamp to embed does not fit in the layout (48 bits for version 7, 46 bits
    /// for version 8). This includes a stored timestamp advanced past the limit by a counter
    /// overflow at the largest representable millisecond.
    pub fn generate_v8(&mut self) -> Uuid {
        self.generate(Strategy::TimestampLast)
    }

    /// Generates a new version 4 identifier.
    pub fn generate_v4(&mut self) -> Uuid {
        self.generate_core(Strategy::Random, 0)
    }

    /// Generates a new identifier with the given strategy from the `unix_ts_ms` passed.
    ///
    /// `unix_ts_ms` is ignored by [`Strategy::Random`].
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms`, or the stored timestamp after a counter overflow, does not fit in
    /// the timestamp field of the layout (48 bits for version 7, 46 bits for version 8).
    pub fn generate_core(&mut self, strategy: Strategy, unix_ts_ms: u64) -> Uuid {
        let (high, low) = (self.rng.next_u64(), self.rng.next_u64());
        self.compose(strategy, unix_ts_ms, high, low)
    }

    /// Fills `dest` with new identifiers of the given strategy.
    ///
    /// The random bits of all identifiers are drawn with a single call to the random number
    /// generator and the clock is read once; the counter still advances for every identifier.
    ///
    /// # Panics
    ///
    /// Panics if the timestamp to embed does not fit in the layout (48 bits for version 7, 46 bits
    /// for version 8). This includes a stored timestamp advanced past the limit by a counter
    /// overflow at the largest representable millisecond.
    pub fn fill(&mut self, dest: &mut [Uuid], strategy: Strategy) {
        let mut blocks = vec![[0u8; 16]; dest.len()];
        self.rng.fill_bytes(blocks.as_flattened_mut());
        let unix_ts_ms = self.time.unix_ts_ms();
        log::trace!("filling {} identifiers of {:?}", dest.len(), strategy);
        for (e, block) in dest.iter_mut().zip(&blocks) {
            let src = u128::from_le_bytes(*block);
            *e = self.compose(strategy, unix_ts_ms, (src >> 64) as u64, src as u64);
        }
    }

    /// Generates `count` identifiers of the given strategy in generation order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `count` is zero.
    pub fn generate_batch(&mut self, count: usize, strategy: Strategy) -> Result<Vec<Uuid>, Error> {
        if count == 0 {
            return Err(Error::OutOfRange {
                what: "count",
                value: 0,
                min: 1,
                max: usize::MAX as u64,
            });
        }
        let mut dest = vec![Uuid::NIL; count];
        self.fill(&mut dest, strategy);
        Ok(dest)
    }

    /// Creates a version 7 identifier with the given timestamp and a zero counter, leaving the
    /// generator state untouched.
    ///
    /// # Panics
    ///
    /// Panics if `unix_ts_ms` is not a 48-bit integer.
    pub fn generate_at(&mut self, unix_ts_ms: u64) -> Uuid {
        Uuid::from_fields_v7(unix_ts_ms, 0, self.rng.next_u64())
    }

    /// Generates a random identifier carrying the given version field value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `version` is not within `1..=8`.
    pub fn generate_with_version(&mut self, version: u8) -> Result<Uuid, Error> {
        if !(1..=8).contains(&version) {
            return Err(Error::OutOfRange {
                what: "version",
                value: version.into(),
                min: 1,
                max: 8,
            });
        }
        Ok(Uuid::from_words(self.rng.next_u64(), self.rng.next_u64()).with_version(version))
    }

    /// Builds one identifier from the random words passed, advancing the counter for the
    /// time-ordered layouts.
    fn compose(&mut self, strategy: Strategy, unix_ts_ms: u64, high: u64, low: u64) -> Uuid {
        match strategy {
            Strategy::Random => Uuid::from_words(high, low).with_version(4),
            Strategy::TimestampFirst => {
                self.advance(unix_ts_ms, strategy.max_counter());
                Uuid::from_fields_v7(self.timestamp, self.counter as u16, low)
            }
            Strategy::TimestampLast => {
                self.advance(unix_ts_ms, strategy.max_counter());
                Uuid::from_fields_v8(self.timestamp, self.counter as u16, high)
            }
        }
    }

    /// Moves the `(timestamp, counter)` state to the next unused pair.
    fn advance(&mut self, unix_ts_ms: u64, max_counter: u64) {
        if unix_ts_ms > self.timestamp {
            self.timestamp = unix_ts_ms;
            self.counter = 0;
        } else {
            if unix_ts_ms.saturating_add(ROLLBACK_WARN_MS) < self.timestamp {
                log::warn!(
                    "clock moved back by {} ms; keeping timestamp {}",
                    self.timestamp - unix_ts_ms,
                    self.timestamp
                );
            }
            self.counter += 1;
            if self.counter > max_counter {
                // increment timestamp at counter overflow
                log::debug!("counter overflow at timestamp {}", self.timestamp);
                self.timestamp += 1;
                self.counter = 0;
            }
        }
    }
}

/// Supports operations as an infinite iterator that produces a new version 7 identifier for each
/// call of `next()`.
///
/// # Examples
///
/// ```rust
/// use tsuid::Generator;
///
/// Generator::with_rand08(rand::thread_rng())
///     .enumerate()
///     .skip(4)
///     .take(4)
///     .for_each(|(i, e)| println!("[{i}] {e}"));
/// ```
impl<R: RandSource, T: TimeSource> Iterator for Generator<R, T> {
    type Item = Uuid;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.generate_v7())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

impl<R: RandSource, T: TimeSource> std::iter::FusedIterator for Generator<R, T> {}
