//! Attribute lookups bound to item stacks.
//!
//! # Resolution order
//!
//! [`ItemAttributeLookup::find`] consults the provider registered for the stack's item first.
//! If there is none, or it returns `None`, fallbacks are tried in registration order and the
//! first `Some` wins.
//!
//! Keyed providers represent an item declaring its own capability; fallbacks are broad
//! compatibility shims. Items are keyed by identity, since every item is a canonical
//! shared instance.

mod lookup;
mod lookups;
mod provider;
mod stack;

pub use lookup::{ItemAttributeLookup, RejectedProviders};
pub use lookups::{ItemAttributeLookups, ItemLookupEntry};
pub use provider::ItemAttributeProvider;
pub use stack::{AsItem, Item, ItemKey, ItemRef, ItemStack};

#[cfg(test)]
mod tests;
