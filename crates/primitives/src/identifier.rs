use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Namespace assumed when identifier text carries no `namespace:` prefix.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Rejection reasons for identifier text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
	#[error("identifier {text:?} has an empty namespace")]
	EmptyNamespace { text: String },
	#[error("identifier {text:?} has an empty path")]
	EmptyPath { text: String },
	#[error("invalid character {ch:?} in namespace of identifier {text:?}")]
	InvalidNamespaceChar { text: String, ch: char },
	#[error("invalid character {ch:?} in path of identifier {text:?}")]
	InvalidPathChar { text: String, ch: char },
}

/// A namespaced key such as `mymod:fuel`.
///
/// Stored as one shared `namespace:path` string, so clones are a reference-count bump.
/// Equality, ordering and hashing are by value.
#[derive(Clone)]
pub struct Identifier {
	full: Arc<str>,
	split: usize,
}

impl Identifier {
	/// Builds an identifier from an explicit namespace and path.
	pub fn new(namespace: &str, path: &str) -> Result<Self, IdentifierError> {
		let text = format!("{namespace}:{path}");
		validate(&text, namespace, path)?;
		Ok(Self {
			split: namespace.len(),
			full: Arc::from(text),
		})
	}

	/// Parses `namespace:path`, falling back to [`DEFAULT_NAMESPACE`] when the namespace is absent.
	pub fn parse(text: &str) -> Result<Self, IdentifierError> {
		match text.split_once(':') {
			Some(("", path)) => Self::new(DEFAULT_NAMESPACE, path).map_err(|e| e.with_text(text)),
			Some((namespace, path)) => {
				validate(text, namespace, path)?;
				Ok(Self {
					split: namespace.len(),
					full: Arc::from(text),
				})
			}
			None => Self::new(DEFAULT_NAMESPACE, text).map_err(|e| e.with_text(text)),
		}
	}

	pub fn namespace(&self) -> &str {
		&self.full[..self.split]
	}

	pub fn path(&self) -> &str {
		&self.full[self.split + 1..]
	}

	/// Returns the canonical `namespace:path` form.
	pub fn as_str(&self) -> &str {
		&self.full
	}
}

fn validate(text: &str, namespace: &str, path: &str) -> Result<(), IdentifierError> {
	if namespace.is_empty() {
		return Err(IdentifierError::EmptyNamespace { text: text.to_owned() });
	}
	if path.is_empty() {
		return Err(IdentifierError::EmptyPath { text: text.to_owned() });
	}
	if let Some(ch) = namespace.chars().find(|&c| !is_namespace_char(c)) {
		return Err(IdentifierError::InvalidNamespaceChar {
			text: text.to_owned(),
			ch,
		});
	}
	if let Some(ch) = path.chars().find(|&c| !is_path_char(c)) {
		return Err(IdentifierError::InvalidPathChar {
			text: text.to_owned(),
			ch,
		});
	}
	Ok(())
}

fn is_namespace_char(c: char) -> bool {
	matches!(c, 'a'..='z' | '0'..='9' | '_' | '.' | '-')
}

fn is_path_char(c: char) -> bool {
	is_namespace_char(c) || c == '/'
}

impl IdentifierError {
	/// Reports the caller's original text rather than the normalized form.
	fn with_text(self, original: &str) -> Self {
		let text = original.to_owned();
		match self {
			Self::EmptyNamespace { .. } => Self::EmptyNamespace { text },
			Self::EmptyPath { .. } => Self::EmptyPath { text },
			Self::InvalidNamespaceChar { ch, .. } => Self::InvalidNamespaceChar { text, ch },
			Self::InvalidPathChar { ch, .. } => Self::InvalidPathChar { text, ch },
		}
	}
}

impl FromStr for Identifier {
	type Err = IdentifierError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl TryFrom<&str> for Identifier {
	type Error = IdentifierError;

	fn try_from(value: &str) -> Result<Self, Self::Error> {
		Self::parse(value)
	}
}

impl PartialEq for Identifier {
	fn eq(&self, other: &Self) -> bool {
		self.full == other.full
	}
}

impl Eq for Identifier {}

impl Hash for Identifier {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.full.hash(state);
	}
}

impl PartialOrd for Identifier {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Identifier {
	fn cmp(&self, other: &Self) -> Ordering {
		self.namespace()
			.cmp(other.namespace())
			.then_with(|| self.path().cmp(other.path()))
	}
}

impl fmt::Display for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.full)
	}
}

impl fmt::Debug for Identifier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Identifier({})", self.full)
	}
}

impl Serialize for Identifier {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.full)
	}
}

impl<'de> Deserialize<'de> for Identifier {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = String::deserialize(deserializer)?;
		Self::parse(&text).map_err(serde::de::Error::custom)
	}
}
