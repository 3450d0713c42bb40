use std::fmt;
use std::sync::Arc;

use attr_query_map::Address;

use super::ItemStack;

type ProviderFn<A, C> = dyn Fn(&ItemStack, &C) -> Option<A> + Send + Sync;

/// Resolves an attribute from an item stack and a query context, if available.
///
/// Providers may capture the stack but are expected not to modify it. Whether the returned
/// attribute may modify the stack is up to the attribute's own documentation.
///
/// Handles compare by identity: clones of one provider are equal, two separately created
/// providers never are.
pub struct ItemAttributeProvider<A, C>(Arc<ProviderFn<A, C>>);

impl<A, C> ItemAttributeProvider<A, C> {
	pub fn new<F>(find: F) -> Self
	where
		F: Fn(&ItemStack, &C) -> Option<A> + Send + Sync + 'static,
	{
		Self(Arc::new(find))
	}

	#[inline]
	pub fn find(&self, stack: &ItemStack, context: &C) -> Option<A> {
		(self.0)(stack, context)
	}

	pub fn ptr_eq(&self, other: &Self) -> bool {
		Address::of(&self.0) == Address::of(&other.0)
	}
}

impl<A, C> Clone for ItemAttributeProvider<A, C> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<A, C> PartialEq for ItemAttributeProvider<A, C> {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl<A, C> Eq for ItemAttributeProvider<A, C> {}

impl<A, C> fmt::Debug for ItemAttributeProvider<A, C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("ItemAttributeProvider")
			.field(&Address::of(&self.0))
			.finish()
	}
}
