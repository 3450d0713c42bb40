//! Copy-on-write query map.
//!
//! # Purpose
//!
//! Serve very frequent, latency-sensitive reads concurrently with rare writes. Reads never
//! lock; writes are serialized and pay for a full clone of the current mapping.
//!
//! # Mental model
//!
//! * The map is a single atomically swapped pointer to an immutable generation.
//! * Readers load the pointer once and query that generation.
//! * Writers take the write lock, clone the current generation, apply their change to the
//!   clone and publish it with one store.
//! * A [`Snapshot`] is a handle to exactly one generation and never changes afterwards.
//!
//! # Key types
//!
//! | Type | Meaning |
//! |---|---|
//! | [`ThreadSafeQueryMap`] | Query/registration contract used by lookups |
//! | [`ThreadSafeQueryHashMap`] | Hash-backed implementation of the contract |
//! | [`Snapshot`] | Read-only view pinned to one published generation |
//! | [`ByAddress`] | Key wrapper comparing shared values by allocation identity |
//!
//! # Invariants
//!
//! * A published generation is never mutated in place.
//!   - Enforced in: [`ThreadSafeQueryHashMap`] write path (clone, apply, store).
//!   - Tested by: `tests::snapshot_is_stable_across_writes`
//! * A reader observes the whole of a write or none of it.
//!   - Enforced in: single `ArcSwap::store` per write.
//!   - Tested by: `tests::readers_never_observe_partial_batches`
//! * Additive writes never drop or rebind an existing key.
//!   - Enforced in: [`ThreadSafeQueryHashMap::put_if_absent`], [`ThreadSafeQueryHashMap::put_all_if_absent`].
//!   - Checked at runtime under `debug_assertions` or the `contracts` feature.
//!
//! # Concurrency & ordering
//!
//! * Reads are wait-free (`ArcSwap` load plus a hash lookup).
//! * Writes hold one mutex for the read-clone-publish sequence; contending writers block.
//! * A completed write happens-before every read that starts after it.

mod hash_map;
mod identity;
mod snapshot;

use std::borrow::Borrow;
use std::hash::Hash;

pub use hash_map::ThreadSafeQueryHashMap;
pub use identity::{Address, ByAddress};
use rustc_hash::FxHashMap;
pub use snapshot::Snapshot;

/// Backing map type of every published generation.
pub type Map<K, V> = FxHashMap<K, V>;

/// Entries a batch registration declined, keyed by the conflicting key and holding the
/// value that was already bound.
pub type Rejected<K, V> = FxHashMap<K, V>;

/// A map built for many simultaneous readers and few writers.
///
/// Writes are expensive (each one copies the map) and should be batched with
/// [`put_all_if_absent`](Self::put_all_if_absent) where possible.
pub trait ThreadSafeQueryMap<K, V> {
	/// Returns the value bound to `key` in the current generation.
	fn get<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized;

	/// Binds `key` to `value` unless it is already bound.
	///
	/// Returns the existing value when the key was present, `None` when the insert happened.
	fn put_if_absent(&self, key: K, value: V) -> Option<V>;

	/// Binds every absent key in `batch` in a single write, returning the keys that were
	/// already bound together with their existing values.
	fn put_all_if_absent<I>(&self, batch: I) -> Rejected<K, V>
	where
		I: IntoIterator<Item = (K, V)>;

	/// Returns the currently published generation.
	fn snapshot(&self) -> Snapshot<K, V>;
}
