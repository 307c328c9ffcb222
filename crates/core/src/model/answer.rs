use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum OptionKeyError {
    #[error("option key cannot be empty")]
    Empty,
}

/// Label of an answer option ("A".."F"); trimmed and upper-cased.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OptionKey(String);

impl OptionKey {
    /// Create a validated option key.
    ///
    /// # Errors
    ///
    /// Returns `OptionKeyError::Empty` if the key is empty after trimming.
    pub fn new(value: impl AsRef<str>) -> Result<Self, OptionKeyError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(OptionKeyError::Empty);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OptionKey({})", self.0)
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for OptionKey {
    type Err = OptionKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for OptionKey {
    type Error = OptionKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OptionKey> for String {
    fn from(key: OptionKey) -> Self {
        key.0
    }
}

/// One key or a set of keys.
///
/// Used both for a question's correct answer and for what the user picked.
/// `Multiple` is a set, so the order in which keys were chosen never matters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(OptionKey),
    Multiple(BTreeSet<OptionKey>),
}

impl Answer {
    #[must_use]
    pub fn single(key: OptionKey) -> Self {
        Self::Single(key)
    }

    #[must_use]
    pub fn from_keys(keys: impl IntoIterator<Item = OptionKey>) -> Self {
        Self::Multiple(keys.into_iter().collect())
    }

    /// Parse user input such as `"b"` or `"A, d"`.
    ///
    /// A single key yields `Single`, more than one yields `Multiple`.
    ///
    /// # Errors
    ///
    /// Returns `OptionKeyError::Empty` if the input (or any comma-separated part) is blank.
    pub fn parse_keys(input: &str) -> Result<Self, OptionKeyError> {
        let keys = input
            .split(',')
            .map(OptionKey::new)
            .collect::<Result<BTreeSet<_>, _>>()?;
        if keys.len() == 1 {
            let key = keys.into_iter().next().ok_or(OptionKeyError::Empty)?;
            return Ok(Self::Single(key));
        }
        Ok(Self::Multiple(keys))
    }

    /// Iterate over the keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &OptionKey> {
        let (single, multiple) = match self {
            Answer::Single(key) => (Some(key), None),
            Answer::Multiple(keys) => (None, Some(keys.iter())),
        };
        single.into_iter().chain(multiple.into_iter().flatten())
    }

    #[must_use]
    pub fn key_set(&self) -> BTreeSet<&OptionKey> {
        self.keys().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Answer::Single(_) => 1,
            Answer::Multiple(keys) => keys.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, key: &OptionKey) -> bool {
        self.keys().any(|k| k == key)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .keys()
            .map(OptionKey::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &str) -> OptionKey {
        OptionKey::new(k).unwrap()
    }

    #[test]
    fn keys_are_trimmed_and_uppercased() {
        assert_eq!(key(" b ").as_str(), "B");
        assert_eq!(OptionKey::new("  "), Err(OptionKeyError::Empty));
    }

    #[test]
    fn parse_keys_distinguishes_single_and_multiple() {
        assert_eq!(Answer::parse_keys("c").unwrap(), Answer::Single(key("C")));
        assert_eq!(
            Answer::parse_keys("d, a").unwrap(),
            Answer::from_keys([key("A"), key("D")])
        );
        assert!(Answer::parse_keys("a,,b").is_err());
    }

    #[test]
    fn multiple_answers_ignore_pick_order() {
        let first = Answer::from_keys([key("D"), key("A")]);
        let second = Answer::from_keys([key("A"), key("D")]);
        assert_eq!(first, second);
        assert_eq!(first.to_string(), "A, D");
    }
}
