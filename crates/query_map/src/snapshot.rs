use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::Map;

/// Read-only view of one published generation.
///
/// Holding a snapshot keeps its generation alive; later writes to the source map are
/// never reflected here.
pub struct Snapshot<K, V> {
	pub(crate) map: Arc<Map<K, V>>,
}

impl<K, V> Clone for Snapshot<K, V> {
	fn clone(&self) -> Self {
		Self {
			map: Arc::clone(&self.map),
		}
	}
}

impl<K, V> Snapshot<K, V>
where
	K: Eq + Hash,
{
	#[inline]
	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.map.get(key)
	}

	#[inline]
	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: Hash + Eq + ?Sized,
	{
		self.map.contains_key(key)
	}
}

impl<K, V> Snapshot<K, V> {
	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
		self.map.iter()
	}

	pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
		self.map.keys()
	}

	pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
		self.map.values()
	}

	/// Returns the whole generation as a plain map.
	pub fn as_map(&self) -> &Map<K, V> {
		&self.map
	}

	/// Returns true if both snapshots pin the same generation.
	pub fn same_generation(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.map, &other.map)
	}
}

impl<'a, K, V> IntoIterator for &'a Snapshot<K, V> {
	type Item = (&'a K, &'a V);
	type IntoIter = std::collections::hash_map::Iter<'a, K, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.map.iter()
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Snapshot<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.map.iter()).finish()
	}
}
