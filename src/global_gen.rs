//! Default generator and entry point functions.

#![cfg(feature = "global_gen")]
#![cfg_attr(docsrs, doc(cfg(feature = "global_gen")))]

use std::sync;

use crate::{generator::Strategy, Generator, Uuid};
use inner::{GlobalGenInner, GlobalGenRng};

/// Runs `f` with the process-wide default generator, creating one if none exists.
///
/// A poisoned lock is recovered because the generator state stays valid after any panic inside
/// `f`.
pub(crate) fn with_global_gen<O>(f: impl FnOnce(&mut Generator<GlobalGenRng>) -> O) -> O {
    static G: sync::OnceLock<sync::Mutex<GlobalGenInner>> = sync::OnceLock::new();
    let mut guard = G
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(sync::PoisonError::into_inner);
    f(guard.get_mut())
}

impl Uuid {
    /// Generates a new version 7 identifier with the default generator.
    ///
    /// Equivalent to [`uuid7()`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tsuid::Uuid;
    ///
    /// let a = Uuid::new();
    /// let b = Uuid::new();
    /// assert!(a < b);
    /// assert!(b.is_ordered_after(&a));
    /// ```
    pub fn new() -> Self {
        uuid7()
    }
}

/// Generates a version 7 identifier.
///
/// This function employs a global generator and guarantees the process-wide monotonic order of
/// time-ordered identifiers generated within the same millisecond. On Unix, this function resets
/// the generator when the process ID changes (i.e., upon process forks) to prevent collisions
/// across processes.
///
/// # Examples
///
/// ```rust
/// let uuid = tsuid::uuid7();
/// println!("{}", uuid); // e.g., "018094243e597c059219566f82fff672"
/// println!("{:?}", uuid.to_bytes()); // as two little-endian words
///
/// let uuid_string: String = tsuid::uuid7().into();
/// ```
pub fn uuid7() -> Uuid {
    with_global_gen(|g| g.generate_v7())
}

/// Generates a version 8 identifier, which places the timestamp and counter in the low word.
///
/// Shares the monotonic state of [`uuid7()`].
///
/// # Examples
///
/// ```rust
/// let uuid = tsuid::uuid8();
/// assert_eq!(uuid.version(), Some(8));
/// ```
pub fn uuid8() -> Uuid {
    with_global_gen(|g| g.generate_v8())
}

/// Generates a version 4 identifier.
///
/// # Examples
///
/// ```rust
/// let uuid = tsuid::uuid4();
/// println!("{}", uuid); // e.g., "2ca4b2ce6c1340d4bccf37d222820f6f"
/// ```
pub fn uuid4() -> Uuid {
    with_global_gen(|g| g.generate_v4())
}

/// Generates an identifier with the given strategy.
pub fn generate(strategy: Strategy) -> Uuid {
    with_global_gen(|g| g.generate(strategy))
}

/// Fills `dest` with new identifiers of the given strategy, in generation order.
pub fn fill(dest: &mut [Uuid], strategy: Strategy) {
    with_global_gen(|g| g.fill(dest, strategy))
}

/// Returns `count` new version 7 identifiers in generation order; `count == 0` yields an empty
/// vector.
///
/// # Examples
///
/// ```rust
/// let ids = tsuid::generate_array(16);
/// assert!(tsuid::are_monotonically_ordered(&ids));
/// assert!(tsuid::generate_array(0).is_empty());
/// ```
pub fn generate_array(count: usize) -> Vec<Uuid> {
    let mut dest = vec![Uuid::NIL; count];
    fill(&mut dest, Strategy::TimestampFirst);
    dest
}

mod inner {
    use rand::rngs::{adapter::ReseedingRng, OsRng};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Core;

    use crate::generator::{Generator, RandSource};

    /// The random number generator of the global generator.
    ///
    /// The global generator currently employs [`ChaCha12Core`] with [`ReseedingRng`] wrapper to
    /// emulate the strategy used by [`rand::rngs::ThreadRng`].
    #[derive(Debug)]
    pub struct GlobalGenRng(ReseedingRng<ChaCha12Core, OsRng>);

    impl RandSource for GlobalGenRng {
        fn next_u64(&mut self) -> u64 {
            rand::RngCore::next_u64(&mut self.0)
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            rand::RngCore::fill_bytes(&mut self.0, dest)
        }
    }

    /// A thin wrapper to reset the state when the process ID changes (i.e., upon Unix forks).
    #[derive(Debug)]
    pub struct GlobalGenInner {
        #[cfg(unix)]
        pid: u32,
        generator: Generator<GlobalGenRng>,
    }

    impl Default for GlobalGenInner {
        fn default() -> Self {
            // no identifier can be produced without a seeded source
            let core = ChaCha12Core::from_rng(OsRng)
                .expect("tsuid: could not initialize global generator");
            Self {
                #[cfg(unix)]
                pid: std::process::id(),
                generator: Generator::new(GlobalGenRng(ReseedingRng::new(core, 1024 * 64, OsRng))),
            }
        }
    }

    impl GlobalGenInner {
        /// Returns a mutable reference to the inner [`Generator`] instance, reseting the
        /// generator state on Unix if the process ID has changed.
        pub fn get_mut(&mut self) -> &mut Generator<GlobalGenRng> {
            #[cfg(unix)]
            if self.pid != std::process::id() {
                log::debug!("process ID changed; resetting global generator");
                *self = Default::default();
            }
            &mut self.generator
        }
    }
}

/// Counts '1' of each bit, most significant bit first.
#[cfg(test)]
fn count_bits(samples: &[Uuid]) -> [u32; 128] {
    let mut bins = [0u32; 128];
    for e in samples {
        let n = e.as_u128();
        for (i, bin) in bins.iter_mut().enumerate() {
            *bin += ((n >> (127 - i)) & 1) as u32;
        }
    }
    bins
}

/// Asserts that `bits` are set to 1 at ~50% probability.
#[cfg(test)]
fn assert_random_bits(bins: &[u32; 128], n_samples: usize, bits: impl Iterator<Item = usize>) {
    // set margin based on binom dist 99.999% confidence interval
    let margin = 4.417173 * (0.5 * 0.5 / n_samples as f64).sqrt();
    for i in bits {
        let p = bins[i] as f64 / n_samples as f64;
        assert!((p - 0.5).abs() < margin, "random bit {}: {}", i, p);
    }
}

#[cfg(test)]
mod tests_v7 {
    use super::{count_bits, uuid7, Uuid};
    use crate::{are_monotonically_ordered, Variant};

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<Uuid> = (0..N_SAMPLES).map(|_| uuid7()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{12}7[0-9a-f]{3}[89ab][0-9a-f]{15}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(&e.to_string()));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&Uuid> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Generates sortable string representation by creation time
    #[test]
    fn generates_sortable_string_representation_by_creation_time() {
        SAMPLES.with(|samples| {
            for i in 1..N_SAMPLES {
                assert!(samples[i - 1].encode().as_str() < samples[i].encode().as_str());
                assert!(samples[i - 1] < samples[i]);
            }
            assert!(are_monotonically_ordered(samples));
        });
    }

    /// Encodes up-to-date timestamp
    #[test]
    fn encodes_up_to_date_timestamp() {
        use crate::Generator;
        use std::time;
        let mut g = Generator::with_rand08(rand::thread_rng());
        for _ in 0..10_000 {
            let ts_now = (time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .expect("clock may have gone backwards")
                .as_millis()) as i64;
            let timestamp = g.generate_v7().timestamp_ms().unwrap() as i64;
            assert!((ts_now - timestamp).abs() < 16);
        }
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        let bins = SAMPLES.with(|samples| count_bits(samples));

        // test if constant bits are all set to 1 or 0
        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], n, "version bit 50");
        assert_eq!(bins[51], n, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        super::assert_random_bits(&bins, N_SAMPLES, 66..128);
    }

    /// Sets correct variant and version bits
    #[test]
    fn sets_correct_variant_and_version_bits() {
        for _ in 0..1_000 {
            let e = Uuid::new();
            assert_eq!(e.variant(), Variant::Var10);
            assert_eq!(e.version(), Some(7));
        }
    }

    /// Generates no IDs sharing same timestamp and counters under multithreading
    #[test]
    fn generates_no_ids_sharing_same_timestamp_and_counters_under_multithreading(
    ) -> Result<(), Box<dyn std::error::Error>> {
        use std::{collections::HashSet, sync::mpsc, thread};

        let (tx, rx) = mpsc::channel();
        for _ in 0..10 {
            let tx = tx.clone();
            thread::Builder::new()
                .spawn(move || {
                    for _ in 0..1_000 {
                        tx.send(uuid7()).unwrap();
                    }
                })
                .map_err(|err| format!("failed to spawn thread: {:?}", err))?;
        }
        drop(tx);

        let mut s = HashSet::new();
        while let Ok(e) = rx.recv() {
            s.insert((e.timestamp_ms(), e.sequence()));
        }

        assert_eq!(s.len(), 10 * 1_000);
        Ok(())
    }
}


#[cfg(test)]
mod tests_v4 {
    use super::{count_bits, uuid4, Uuid};
    use crate::Variant;

    const N_SAMPLES: usize = 100_000;
    thread_local!(static SAMPLES: Vec<Uuid> = (0..N_SAMPLES).map(|_| uuid4()).collect());

    /// Generates canonical string
    #[test]
    fn generates_canonical_string() {
        let pattern = r"^[0-9a-f]{12}4[0-9a-f]{3}[89ab][0-9a-f]{15}$";
        let re = regex::Regex::new(pattern).unwrap();
        SAMPLES.with(|samples| {
            for e in samples {
                assert!(re.is_match(&e.to_string()));
            }
        });
    }

    /// Generates 100k identifiers without collision
    #[test]
    fn generates_100k_identifiers_without_collision() {
        use std::collections::HashSet;
        SAMPLES.with(|samples| {
            let s: HashSet<&Uuid> = samples.iter().collect();
            assert_eq!(s.len(), N_SAMPLES);
        });
    }

    /// Sets constant bits and random bits properly
    #[test]
    fn sets_constant_bits_and_random_bits_properly() {
        let bins = SAMPLES.with(|samples| count_bits(samples));

        let n = N_SAMPLES as u32;
        assert_eq!(bins[48], 0, "version bit 48");
        assert_eq!(bins[49], n, "version bit 49");
        assert_eq!(bins[50], 0, "version bit 50");
        assert_eq!(bins[51], 0, "version bit 51");
        assert_eq!(bins[64], n, "variant bit 64");
        assert_eq!(bins[65], 0, "variant bit 65");

        super::assert_random_bits(&bins, N_SAMPLES, (0..48).chain(52..64).chain(66..128));
    }
}

#[cfg(test)]
mod tests_bulk {
    use super::{fill, generate, generate_array, Strategy};
    use crate::{are_monotonically_ordered, Uuid};

    /// Generates arrays in generation order
    #[test]
    fn generates_arrays_in_generation_order() {
        let ids = generate_array(10_000);
        assert_eq!(ids.len(), 10_000);
        assert!(are_monotonically_ordered(&ids));
        assert!(ids.iter().all(|e| e.version() == Some(7)));
        assert!(generate_array(0).is_empty());
    }

    /// Fills slices with the given strategy
    #[test]
    fn fills_slices_with_the_given_strategy() {
        for strategy in [
            Strategy::Random,
            Strategy::TimestampFirst,
            Strategy::TimestampLast,
        ] {
            let mut ids = [Uuid::NIL; 64];
            fill(&mut ids, strategy);
            assert!(ids.iter().all(|e| e.version() == Some(strategy.version())));
            assert_eq!(generate(strategy).version(), Some(strategy.version()));
        }
    }
}
