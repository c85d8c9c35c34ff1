//! Hash-bearing strings and hex helpers

use super::error::Fox2Error;
use crate::util::{format_hex, parse_hex};
use foxkit_crypto::{NameLookup, str_code_64};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A StrCode64 hash with the string it was made from, when known
///
/// Writers hash the text when it is present and fall back to the stored hash
/// otherwise, so unresolved values survive a round trip untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HashedString {
    /// Hash as read from the file
    pub hash: u64,
    /// Resolved text
    pub text: Option<String>,
}

impl HashedString {
    /// Resolved string and its hash
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            hash: str_code_64(text.as_bytes()),
            text: Some(text),
        }
    }

    /// Unresolved hash
    pub const fn from_hash(hash: u64) -> Self {
        Self { hash, text: None }
    }

    /// Whether the text is known
    pub const fn is_resolved(&self) -> bool {
        self.text.is_some()
    }

    /// Hash to write: derived from the text when known
    pub fn current_hash(&self) -> u64 {
        self.text
            .as_deref()
            .map_or(self.hash, |t| str_code_64(t.as_bytes()))
    }

    /// Fill in the text from `names` if it is still missing
    pub fn resolve(&mut self, names: &dyn NameLookup) {
        if self.text.is_none() {
            self.text = names.lookup(self.hash).map(ToOwned::to_owned);
        }
    }
}

impl fmt::Display for HashedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => f.write_str(text),
            None => f.write_str(&format_hex(self.hash)),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum HashedRepr {
    Text(String),
    Hash { hash: String },
}

impl Serialize for HashedString {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match &self.text {
            Some(text) => HashedRepr::Text(text.clone()),
            None => HashedRepr::Hash {
                hash: format_hex(self.hash),
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for HashedString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match HashedRepr::deserialize(deserializer)? {
            HashedRepr::Text(text) => Ok(Self::new(text)),
            HashedRepr::Hash { hash } => parse_hex(&hash)
                .map(Self::from_hash)
                .ok_or_else(|| D::Error::custom(Fox2Error::InvalidHex(hash))),
        }
    }
}
