use attr_primitives::{Identifier, IdentifierError, TypeTag};

/// A required argument was unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidArgument {
	#[error("at least one item must be provided when registering an attribute provider")]
	EmptyKeys,
	#[error(
		"failed to register self-implementing items: attribute type {attribute} is not assignable from item type {item}"
	)]
	NotSelfAttribute {
		attribute: TypeTag,
		item: &'static str,
	},
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
}

/// Hard lookup failures. Both variants indicate a bug in the calling mod.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
	#[error("invalid argument: {0}")]
	InvalidArgument(#[from] InvalidArgument),
	#[error(
		"lookup {id} is already registered with attribute type {registered_attribute} and context type {registered_context}; it cannot be requested with attribute type {requested_attribute} and context type {requested_context}"
	)]
	TypeConflict {
		id: Identifier,
		registered_attribute: TypeTag,
		registered_context: TypeTag,
		requested_attribute: TypeTag,
		requested_context: TypeTag,
	},
}

impl From<IdentifierError> for LookupError {
	fn from(err: IdentifierError) -> Self {
		Self::InvalidArgument(InvalidArgument::Identifier(err))
	}
}
