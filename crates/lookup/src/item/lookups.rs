use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

use attr_primitives::{Identifier, TypeTag};

use super::ItemAttributeLookup;
use crate::error::LookupError;
use crate::map::AttributeLookupMap;

/// Registry record for one item lookup.
///
/// Created untyped by the registry; the typed [`ItemAttributeLookup`] is materialized on the
/// first successful typed request and shared by every later one.
pub struct ItemLookupEntry {
	id: Identifier,
	attribute: TypeTag,
	context: TypeTag,
	lookup: OnceLock<Arc<dyn Any + Send + Sync>>,
}

impl ItemLookupEntry {
	pub fn id(&self) -> &Identifier {
		&self.id
	}

	pub fn attribute_type(&self) -> TypeTag {
		self.attribute
	}

	pub fn context_type(&self) -> TypeTag {
		self.context
	}

	fn typed<A: 'static, C: 'static>(&self) -> Option<Arc<ItemAttributeLookup<A, C>>> {
		let erased = self
			.lookup
			.get_or_init(|| {
				Arc::new(ItemAttributeLookup::<A, C>::new(self.id.clone())) as Arc<dyn Any + Send + Sync>
			});
		Arc::clone(erased).downcast().ok()
	}
}

impl fmt::Debug for ItemLookupEntry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ItemLookupEntry")
			.field("id", &self.id)
			.field("attribute", &self.attribute)
			.field("context", &self.context)
			.finish()
	}
}

/// Application-owned registry of item attribute lookups.
///
/// Construct one at startup and share it with every mod; tests build their own.
pub struct ItemAttributeLookups {
	map: AttributeLookupMap<Arc<ItemLookupEntry>>,
}

impl Default for ItemAttributeLookups {
	fn default() -> Self {
		Self::new()
	}
}

impl ItemAttributeLookups {
	pub fn new() -> Self {
		Self {
			map: AttributeLookupMap::with_label(
				"item_attribute_lookup",
				|id: &Identifier, attribute: TypeTag, context: TypeTag| {
					Arc::new(ItemLookupEntry {
						id: id.clone(),
						attribute,
						context,
						lookup: OnceLock::new(),
					})
				},
			),
		}
	}

	/// Returns the lookup for `id`, creating it on first request.
	///
	/// # Errors
	///
	/// [`LookupError::TypeConflict`] if `id` was first requested with other types.
	pub fn get<A: 'static, C: 'static>(
		&self,
		id: &Identifier,
	) -> Result<Arc<ItemAttributeLookup<A, C>>, LookupError> {
		let attribute = TypeTag::of::<A>();
		let context = TypeTag::of::<C>();
		let entry = self.map.get_lookup(id, attribute, context)?;
		// Tags matched, so the stored lookup has exactly these type parameters.
		entry.typed::<A, C>().ok_or_else(|| LookupError::TypeConflict {
			id: id.clone(),
			registered_attribute: entry.attribute,
			registered_context: entry.context,
			requested_attribute: attribute,
			requested_context: context,
		})
	}

	/// Parses `id` and returns its lookup.
	///
	/// # Errors
	///
	/// [`LookupError::InvalidArgument`] for malformed identifier text, otherwise as [`Self::get`].
	pub fn get_named<A: 'static, C: 'static>(
		&self,
		id: &str,
	) -> Result<Arc<ItemAttributeLookup<A, C>>, LookupError> {
		self.get(&Identifier::parse(id)?)
	}

	/// Returns every registered lookup entry, in creation order, as of the call.
	pub fn entries(&self) -> Vec<Arc<ItemLookupEntry>> {
		self.map.iter().collect()
	}

	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}
}

impl fmt::Debug for ItemAttributeLookups {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ItemAttributeLookups")
			.field("lookups", &self.map)
			.finish()
	}
}
