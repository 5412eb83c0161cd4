use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
	($(#[$meta:meta])* $name:ident) => {
		$(#[$meta])*
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			/// Wraps a raw identifier.
			pub fn new(raw: impl Into<String>) -> Self {
				Self(raw.into())
			}

			/// Returns the raw identifier.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<&str> for $name {
			fn from(raw: &str) -> Self {
				Self(raw.to_owned())
			}
		}

		impl From<String> for $name {
			fn from(raw: String) -> Self {
				Self(raw)
			}
		}
	};
}

string_id! {
	/// Identifier of a loaded document.
	DocumentId
}

string_id! {
	/// Identifier of a node within a loaded document.
	NodeId
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ids_serialize_as_plain_strings() {
		let json = serde_json::to_string(&NodeId::new("node-1")).unwrap();
		assert_eq!(json, "\"node-1\"");

		let id: DocumentId = serde_json::from_str("\"doc7\"").unwrap();
		assert_eq!(id.as_str(), "doc7");
		assert_eq!(id.to_string(), "doc7");
	}
}
