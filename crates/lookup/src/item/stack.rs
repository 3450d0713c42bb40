use std::any::Any;
use std::fmt;
use std::sync::Arc;

use attr_primitives::Identifier;
use attr_query_map::ByAddress;

/// A game item type. Each item exists once and is shared as an [`ItemRef`].
pub trait Item: Any + Send + Sync + fmt::Debug {
	/// Registry identifier, used in diagnostics.
	fn id(&self) -> &Identifier;

	/// Concrete type name, used in diagnostics.
	fn type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

/// Shared handle to a canonical item instance.
pub type ItemRef = Arc<dyn Item>;

/// Item handle compared by identity.
pub type ItemKey = ByAddress<dyn Item>;

/// Anything that names an item: the item itself or a stack of it.
pub trait AsItem {
	fn as_item(&self) -> ItemRef;
}

impl AsItem for ItemRef {
	fn as_item(&self) -> ItemRef {
		Arc::clone(self)
	}
}

impl<T: Item> AsItem for Arc<T> {
	fn as_item(&self) -> ItemRef {
		Arc::clone(self) as ItemRef
	}
}

impl AsItem for ItemStack {
	fn as_item(&self) -> ItemRef {
		Arc::clone(&self.item)
	}
}

impl<T: AsItem + ?Sized> AsItem for &T {
	fn as_item(&self) -> ItemRef {
		(**self).as_item()
	}
}

/// A quantity of one item.
#[derive(Clone, Debug)]
pub struct ItemStack {
	item: ItemRef,
	count: u32,
}

impl ItemStack {
	pub fn new(item: impl AsItem, count: u32) -> Self {
		Self {
			item: item.as_item(),
			count,
		}
	}

	/// A stack of one.
	pub fn of(item: impl AsItem) -> Self {
		Self::new(item, 1)
	}

	pub fn item(&self) -> &ItemRef {
		&self.item
	}

	pub fn count(&self) -> u32 {
		self.count
	}

	pub fn set_count(&mut self, count: u32) {
		self.count = count;
	}

	pub fn is_empty(&self) -> bool {
		self.count == 0
	}
}
