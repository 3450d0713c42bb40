//! Identifier-keyed registry of attribute lookups.
//!
//! # Role
//!
//! Guarantees a single lookup instance per [`Identifier`] for the registry's lifetime and
//! rejects requests that reuse an identifier with different attribute or context types.
//!
//! # Invariants
//!
//! * At most one record per identifier; records are never removed.
//!   - Tested by: `tests::repeated_requests_return_the_same_instance`
//! * A record's attribute/context tags never change after creation.
//!   - Tested by: `tests::mismatched_attribute_type_is_a_conflict`
//!
//! # Concurrency
//!
//! One coarse mutex covers creation and iteration snapshots. Lookup creation happens once per
//! identifier at startup, so this lock is never on a query path. The constructor runs while
//! the lock is held and must not call back into the same registry.

use std::fmt;
use std::sync::Arc;

use attr_primitives::{Identifier, TypeTag};
use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxBuildHasher;
use tracing::debug;

use crate::error::LookupError;

const DEFAULT_LABEL: &str = "attribute_lookup";

/// Builds a lookup instance the first time its identifier is requested.
pub trait LookupConstructor<L>: Send + Sync {
	fn construct(&self, id: &Identifier, attribute: TypeTag, context: TypeTag) -> L;
}

impl<L, F> LookupConstructor<L> for F
where
	F: Fn(&Identifier, TypeTag, TypeTag) -> L + Send + Sync,
{
	fn construct(&self, id: &Identifier, attribute: TypeTag, context: TypeTag) -> L {
		self(id, attribute, context)
	}
}

struct StoredLookup<L> {
	instance: L,
	attribute: TypeTag,
	context: TypeTag,
}

impl<L: Clone> StoredLookup<L> {
	fn checked(
		&self,
		id: &Identifier,
		attribute: TypeTag,
		context: TypeTag,
	) -> Result<L, LookupError> {
		if self.attribute == attribute && self.context == context {
			return Ok(self.instance.clone());
		}
		Err(LookupError::TypeConflict {
			id: id.clone(),
			registered_attribute: self.attribute,
			registered_context: self.context,
			requested_attribute: attribute,
			requested_context: context,
		})
	}
}

/// Registry mapping each identifier to exactly one lookup of type `L`.
///
/// `L` is typically a cheap handle (`Arc<...>`); requests return clones of the stored handle,
/// so repeated requests observe the same underlying instance.
pub struct AttributeLookupMap<L> {
	label: &'static str,
	lookups: Mutex<IndexMap<Identifier, StoredLookup<L>, FxBuildHasher>>,
	constructor: Box<dyn LookupConstructor<L>>,
}

impl<L> AttributeLookupMap<L> {
	/// Creates an empty registry that builds lookups with `constructor`.
	pub fn create(constructor: impl LookupConstructor<L> + 'static) -> Self {
		Self::with_label(DEFAULT_LABEL, constructor)
	}

	/// Creates an empty registry named `label` in diagnostics.
	pub fn with_label(label: &'static str, constructor: impl LookupConstructor<L> + 'static) -> Self {
		Self {
			label,
			lookups: Mutex::new(IndexMap::default()),
			constructor: Box::new(constructor),
		}
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	pub fn len(&self) -> usize {
		self.lookups.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lookups.lock().is_empty()
	}

	pub fn contains(&self, id: &Identifier) -> bool {
		self.lookups.lock().contains_key(id)
	}

	/// Returns the attribute and context tags `id` was first requested with.
	pub fn registered_types(&self, id: &Identifier) -> Option<(TypeTag, TypeTag)> {
		self.lookups
			.lock()
			.get(id)
			.map(|stored| (stored.attribute, stored.context))
	}
}

impl<L: Clone> AttributeLookupMap<L> {
	/// Returns the lookup for `id`, constructing it on first request.
	///
	/// # Errors
	///
	/// [`LookupError::TypeConflict`] if `id` was first requested with different tags.
	pub fn get_lookup(
		&self,
		id: &Identifier,
		attribute: TypeTag,
		context: TypeTag,
	) -> Result<L, LookupError> {
		let mut lookups = self.lookups.lock();
		if let Some(stored) = lookups.get(id) {
			return stored.checked(id, attribute, context);
		}

		debug!(
			registry = self.label,
			lookup = %id,
			%attribute,
			%context,
			"creating attribute lookup"
		);
		let instance = self.constructor.construct(id, attribute, context);
		lookups.insert(
			id.clone(),
			StoredLookup {
				instance: instance.clone(),
				attribute,
				context,
			},
		);
		Ok(instance)
	}

	/// Returns every registered lookup, in creation order, as of the call.
	pub fn iter(&self) -> std::vec::IntoIter<L> {
		self.lookups
			.lock()
			.values()
			.map(|stored| stored.instance.clone())
			.collect::<Vec<_>>()
			.into_iter()
	}
}

impl<L: Clone> IntoIterator for &AttributeLookupMap<L> {
	type Item = L;
	type IntoIter = std::vec::IntoIter<L>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

impl<L> fmt::Debug for AttributeLookupMap<L> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let lookups = self.lookups.lock();
		f.debug_struct("AttributeLookupMap")
			.field("label", &self.label)
			.field("ids", &lookups.keys().collect::<Vec<_>>())
			.finish()
	}
}

impl<L> AttributeLookupMap<Arc<L>> {
	/// Creates a registry that wraps each constructed lookup in an [`Arc`].
	pub fn create_shared<F>(constructor: F) -> Self
	where
		F: Fn(&Identifier, TypeTag, TypeTag) -> L + Send + Sync + 'static,
	{
		Self::create(move |id: &Identifier, attribute: TypeTag, context: TypeTag| {
			Arc::new(constructor(id, attribute, context))
		})
	}
}
