use std::any::Any;
use std::fmt;

use arc_swap::ArcSwap;
use attr_primitives::{Identifier, TypeTag};
use attr_query_map::{Address, Rejected, Snapshot, ThreadSafeQueryHashMap, ThreadSafeQueryMap};
use tracing::{debug, warn};

use super::{AsItem, Item, ItemAttributeProvider, ItemKey, ItemRef, ItemStack};
use crate::error::{InvalidArgument, LookupError};

/// Items whose registration was declined, with the provider that kept each binding.
pub type RejectedProviders<A, C> = Rejected<ItemKey, ItemAttributeProvider<A, C>>;

/// Lookup of attribute `A` on item stacks, queried with context `C`.
///
/// Obtained from [`super::ItemAttributeLookups::get`]; one instance exists per identifier.
pub struct ItemAttributeLookup<A, C> {
	id: Identifier,
	providers: ThreadSafeQueryHashMap<ItemKey, ItemAttributeProvider<A, C>>,
	/// Append-only, republished on every registration.
	fallbacks: ArcSwap<Vec<ItemAttributeProvider<A, C>>>,
}

impl<A: 'static, C: 'static> ItemAttributeLookup<A, C> {
	pub(crate) fn new(id: Identifier) -> Self {
		Self {
			id,
			providers: ThreadSafeQueryHashMap::new(),
			fallbacks: ArcSwap::from_pointee(Vec::new()),
		}
	}

	/// Resolves the attribute for `stack`.
	///
	/// The item's own provider wins when it yields a value; otherwise fallbacks are tried in
	/// registration order.
	pub fn find(&self, stack: &ItemStack, context: &C) -> Option<A> {
		if let Some(provider) = self.providers.get(&Address::of(stack.item()))
			&& let Some(found) = provider.find(stack, context)
		{
			return Some(found);
		}

		self.fallbacks
			.load()
			.iter()
			.find_map(|fallback| fallback.find(stack, context))
	}

	/// Binds `provider` to each of `items` unless an item already has a provider.
	///
	/// Items that were already bound keep their provider; they are returned and logged at
	/// `warn`, and the call still succeeds.
	///
	/// # Errors
	///
	/// [`InvalidArgument::EmptyKeys`] if `items` is empty.
	pub fn register_for_items<I>(
		&self,
		provider: ItemAttributeProvider<A, C>,
		items: I,
	) -> Result<RejectedProviders<A, C>, LookupError>
	where
		I: IntoIterator,
		I::Item: AsItem,
	{
		let batch: Vec<(ItemKey, ItemAttributeProvider<A, C>)> = items
			.into_iter()
			.map(|item| (ItemKey::new(item.as_item()), provider.clone()))
			.collect();
		if batch.is_empty() {
			return Err(InvalidArgument::EmptyKeys.into());
		}

		let rejected = self.providers.put_all_if_absent(batch);
		for item in rejected.keys() {
			warn!(
				lookup = %self.id,
				item = %item.id(),
				"attribute provider already registered for item; new entry ignored"
			);
		}
		Ok(rejected)
	}

	/// Registers items that are themselves the attribute.
	///
	/// Every item's concrete type must be `A`; this is checked for all items before anything
	/// is registered.
	///
	/// # Errors
	///
	/// [`InvalidArgument::NotSelfAttribute`] naming the first incompatible item, or
	/// [`InvalidArgument::EmptyKeys`] if `items` is empty.
	pub fn register_self<I>(&self, items: I) -> Result<RejectedProviders<A, C>, LookupError>
	where
		A: Clone,
		I: IntoIterator,
		I::Item: AsItem,
	{
		let items: Vec<ItemRef> = items.into_iter().map(|item| item.as_item()).collect();
		if let Some(item) = items.iter().find(|item| !item_is::<A>(&***item)) {
			return Err(InvalidArgument::NotSelfAttribute {
				attribute: TypeTag::of::<A>(),
				item: item.type_name(),
			}
			.into());
		}

		self.register_for_items(ItemAttributeProvider::new(self_provider::<A, C>), items)
	}

	/// Appends a provider consulted after keyed providers miss.
	///
	/// No duplicate detection: registering the same provider twice consults it twice.
	pub fn register_fallback(&self, provider: ItemAttributeProvider<A, C>) {
		let previous = self.fallbacks.rcu(|current| {
			let mut next = Vec::clone(current);
			next.push(provider.clone());
			next
		});
		debug!(
			lookup = %self.id,
			fallbacks = previous.len() + 1,
			"registered fallback attribute provider"
		);
	}

	/// Returns the provider bound to `item`. Inspection only; queries go through [`Self::find`].
	pub fn get_provider(&self, item: &dyn Item) -> Option<ItemAttributeProvider<A, C>> {
		self.providers.get(&Address::of_ref(item))
	}

	/// Returns the keyed providers as of the call.
	pub fn providers(&self) -> Snapshot<ItemKey, ItemAttributeProvider<A, C>> {
		self.providers.snapshot()
	}

	pub fn fallback_count(&self) -> usize {
		self.fallbacks.load().len()
	}

	pub fn id(&self) -> &Identifier {
		&self.id
	}

	pub fn attribute_type(&self) -> TypeTag {
		TypeTag::of::<A>()
	}

	pub fn context_type(&self) -> TypeTag {
		TypeTag::of::<C>()
	}
}

fn item_is<A: 'static>(item: &dyn Item) -> bool {
	let item: &dyn Any = item;
	item.is::<A>()
}

fn self_provider<A: Clone + 'static, C>(stack: &ItemStack, _context: &C) -> Option<A> {
	let item: &dyn Any = &**stack.item();
	item.downcast_ref::<A>().cloned()
}

impl<A: 'static, C: 'static> fmt::Debug for ItemAttributeLookup<A, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ItemAttributeLookup")
			.field("id", &self.id)
			.field("attribute", &self.attribute_type())
			.field("context", &self.context_type())
			.field("providers", &self.providers.len())
			.field("fallbacks", &self.fallback_count())
			.finish()
	}
}
