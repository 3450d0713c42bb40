//! Hash-backed [`ThreadSafeQueryMap`] implementation.
//!
//! # Role
//!
//! Owns the published generation pointer and the write lock. Every mutation holds
//! `write_lock` from loading the current generation until its replacement is stored.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::trace;

use crate::{Map, Rejected, Snapshot, ThreadSafeQueryMap};

/// Copy-on-write hash map with lock-free reads.
///
/// Keys use their own `Eq`/`Hash`; wrap shared values in [`crate::ByAddress`] to key
/// them by identity.
pub struct ThreadSafeQueryHashMap<K, V> {
	contents: ArcSwap<Map<K, V>>,
	write_lock: Mutex<()>,
}

impl<K, V> Default for ThreadSafeQueryHashMap<K, V> {
	fn default() -> Self {
		Self {
			contents: ArcSwap::from_pointee(Map::default()),
			write_lock: Mutex::new(()),
		}
	}
}

impl<K, V> ThreadSafeQueryHashMap<K, V> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a map whose first generation is pre-sized for `capacity` entries.
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			contents: ArcSwap::from_pointee(Map::with_capacity_and_hasher(
				capacity,
				Default::default(),
			)),
			write_lock: Mutex::new(()),
		}
	}

	pub fn len(&self) -> usize {
		self.contents.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.contents.load().is_empty()
	}

	/// Removes every entry by publishing an empty generation.
	pub fn clear(&self) {
		let _guard = self.write_lock.lock();
		self.contents.store(Arc::new(Map::default()));
		trace!("query map cleared");
	}
}

impl<K, V> ThreadSafeQueryHashMap<K, V>
where
	K: Eq + Hash + Clone,
	V: Clone,
{
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.contents.load().contains_key(key)
	}

	pub fn contains_value(&self, value: &V) -> bool
	where
		V: PartialEq,
	{
		self.contents.load().values().any(|v| v == value)
	}

	/// Binds `key` to `value`, replacing any existing binding, and returns the previous value.
	pub fn insert(&self, key: K, value: V) -> Option<V> {
		self.write(|next| next.insert(key, value))
	}

	/// Unbinds `key`, returning its value. Publishes nothing when the key is absent.
	pub fn remove<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		let _guard = self.write_lock.lock();
		let current = self.contents.load_full();
		if !current.contains_key(key) {
			return None;
		}
		let mut next = Map::clone(&current);
		let removed = next.remove(key);
		self.contents.store(Arc::new(next));
		removed
	}

	/// Binds every entry of `batch` in one write, replacing existing bindings.
	pub fn extend<I>(&self, batch: I)
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let batch: Vec<(K, V)> = batch.into_iter().collect();
		if batch.is_empty() {
			return;
		}
		self.write(|next| {
			next.reserve(batch.len());
			next.extend(batch);
		});
	}

	/// Clones the current generation, applies `apply` and publishes the result.
	fn write<R>(&self, apply: impl FnOnce(&mut Map<K, V>) -> R) -> R {
		let _guard = self.write_lock.lock();
		let current = self.contents.load_full();
		let mut next = Map::clone(&current);
		let out = apply(&mut next);
		trace!(before = current.len(), after = next.len(), "query map generation published");
		self.contents.store(Arc::new(next));
		out
	}
}

impl<K, V> ThreadSafeQueryMap<K, V> for ThreadSafeQueryHashMap<K, V>
where
	K: Eq + Hash + Clone,
	V: Clone,
{
	#[inline]
	fn get<Q>(&self, key: &Q) -> Option<V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.contents.load().get(key).cloned()
	}

	fn put_if_absent(&self, key: K, value: V) -> Option<V> {
		let _guard = self.write_lock.lock();
		let current = self.contents.load_full();
		if let Some(existing) = current.get(&key) {
			return Some(existing.clone());
		}

		let mut next = Map::clone(&current);
		next.insert(key, value);
		check_superset(&current, &next);
		self.contents.store(Arc::new(next));
		None
	}

	fn put_all_if_absent<I>(&self, batch: I) -> Rejected<K, V>
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let _guard = self.write_lock.lock();
		let current = self.contents.load_full();
		let mut rejected = Rejected::default();
		// Cloned on the first accepted entry so an all-duplicate batch publishes nothing.
		let mut next: Option<Map<K, V>> = None;

		for (key, value) in batch {
			let existing = match &next {
				Some(map) => map.get(&key),
				None => current.get(&key),
			};
			if let Some(existing) = existing {
				let existing = existing.clone();
				rejected.entry(key).or_insert(existing);
				continue;
			}
			next.get_or_insert_with(|| Map::clone(&current))
				.insert(key, value);
		}

		if let Some(next) = next {
			check_superset(&current, &next);
			trace!(
				before = current.len(),
				after = next.len(),
				rejected = rejected.len(),
				"query map batch published"
			);
			self.contents.store(Arc::new(next));
		}
		rejected
	}

	fn snapshot(&self) -> Snapshot<K, V> {
		Snapshot {
			map: self.contents.load_full(),
		}
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for ThreadSafeQueryHashMap<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.contents.load().iter()).finish()
	}
}

#[cfg(any(debug_assertions, feature = "contracts"))]
fn check_superset<K: Eq + Hash, V>(previous: &Map<K, V>, next: &Map<K, V>) {
	assert!(
		previous.keys().all(|k| next.contains_key(k)),
		"additive query map write dropped {} published key(s)",
		previous.keys().filter(|k| !next.contains_key(*k)).count()
	);
}

#[cfg(not(any(debug_assertions, feature = "contracts")))]
#[inline(always)]
fn check_superset<K, V>(_previous: &Map<K, V>, _next: &Map<K, V>) {}
