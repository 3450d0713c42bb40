//! Attribute lookups: let independent mods expose and discover per-item capabilities.
//!
//! # Purpose
//!
//! A mod declares an attribute (say "fuel") by requesting a lookup under a stable
//! [`Identifier`]. Other mods register providers into that lookup and query it at runtime,
//! without any compile-time knowledge of each other.
//!
//! # Key types
//!
//! | Type | Role |
//! |---|---|
//! | [`AttributeLookupMap`] | One lookup instance per identifier, type-checked on every request |
//! | [`ItemAttributeLookups`] | Application-owned registry of item-bound lookups |
//! | [`ItemAttributeLookup`] | Keyed providers first, then fallbacks in registration order |
//! | [`ItemAttributeProvider`] | Mod-supplied `(stack, context) -> Option<attribute>` function |
//!
//! # Data flow
//!
//! 1. `ItemAttributeLookups::get::<A, C>(id)` creates or returns the lookup for `id`.
//! 2. Mods call `register_for_items`, `register_self` and `register_fallback` at init.
//! 3. Game logic calls `find(stack, context)` on every capability query.
//!
//! # Errors
//!
//! Hard failures are [`LookupError`]. Duplicate keyed registrations are soft: the existing
//! provider is kept, returned to the caller and logged at `warn`.

pub mod error;
pub mod item;
pub mod map;

pub use attr_primitives::{Identifier, IdentifierError, TypeTag};
pub use attr_query_map::{Address, ByAddress, Rejected, Snapshot};
pub use error::{InvalidArgument, LookupError};
pub use item::{
	AsItem, Item, ItemAttributeLookup, ItemAttributeLookups, ItemAttributeProvider, ItemKey,
	ItemLookupEntry, ItemRef, ItemStack, RejectedProviders,
};
pub use map::{AttributeLookupMap, LookupConstructor};
