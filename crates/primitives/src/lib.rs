//! Shared value types for attribute lookups: namespaced identifiers and runtime type tags.

/// Namespaced identifiers (`namespace:path`).
pub mod identifier;
/// Runtime type identity used for lookup type checks.
pub mod type_tag;

pub use identifier::{DEFAULT_NAMESPACE, Identifier, IdentifierError};
pub use type_tag::TypeTag;
