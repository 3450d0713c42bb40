use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Allocation address of a shared value, used as an identity key.
///
/// Only meaningful while the value is alive; keep the owning [`Arc`] reachable (for
/// example through [`ByAddress`]) for as long as the address is used as a key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Address(usize);

impl Address {
	/// Address of the value an [`Arc`] points to.
	#[inline]
	pub fn of<T: ?Sized>(value: &Arc<T>) -> Self {
		Self(Arc::as_ptr(value).cast::<()>().addr())
	}

	/// Address of a borrowed value.
	///
	/// Pass the pointee (`&*arc`), not the `Arc` itself, to match [`Address::of`].
	#[inline]
	pub fn of_ref<T: ?Sized>(value: &T) -> Self {
		Self((value as *const T).cast::<()>().addr())
	}
}

/// Shared value compared and hashed by identity instead of by value.
///
/// Borrows as [`Address`], so maps keyed by `ByAddress<T>` can be queried with
/// `&Address::of(&arc)` without cloning the `Arc`.
pub struct ByAddress<T: ?Sized> {
	address: Address,
	value: Arc<T>,
}

impl<T: ?Sized> ByAddress<T> {
	pub fn new(value: Arc<T>) -> Self {
		Self {
			address: Address::of(&value),
			value,
		}
	}

	#[inline]
	pub fn address(&self) -> Address {
		self.address
	}

	pub fn as_arc(&self) -> &Arc<T> {
		&self.value
	}

	pub fn into_inner(self) -> Arc<T> {
		self.value
	}
}

impl<T: ?Sized> From<Arc<T>> for ByAddress<T> {
	fn from(value: Arc<T>) -> Self {
		Self::new(value)
	}
}

impl<T: ?Sized> Clone for ByAddress<T> {
	fn clone(&self) -> Self {
		Self {
			address: self.address,
			value: Arc::clone(&self.value),
		}
	}
}

impl<T: ?Sized> PartialEq for ByAddress<T> {
	fn eq(&self, other: &Self) -> bool {
		self.address == other.address
	}
}

impl<T: ?Sized> Eq for ByAddress<T> {}

impl<T: ?Sized> Hash for ByAddress<T> {
	fn hash<H: Hasher>(&self, state: &mut H) {
		// Must match `Address`'s hash for the `Borrow` impl.
		self.address.hash(state);
	}
}

impl<T: ?Sized> Borrow<Address> for ByAddress<T> {
	fn borrow(&self) -> &Address {
		&self.address
	}
}

impl<T: ?Sized> Deref for ByAddress<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.value
	}
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for ByAddress<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ByAddress")
			.field("address", &self.address)
			.field("value", &&*self.value)
			.finish()
	}
}
