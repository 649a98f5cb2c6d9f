//! Congratulatory messages shown after a goal is reached.
//!
//! The list is configuration, not module state: callers build a
//! [`CongratulatoryMessages`] (usually from [`crate::Config`]) and pick from
//! it with an RNG they own, so tests can seed it.

use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_MESSAGES: [&str; 5] = [
    "Congratulations!",
    "Amazing Job!",
    "Excellent!",
    "Awesome!",
    "Way To Go!",
];

/// Non-empty, immutable list of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CongratulatoryMessages {
    messages: Vec<String>,
}

impl CongratulatoryMessages {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty list.
    pub fn new(messages: Vec<String>) -> Result<Self, ConfigError> {
        if messages.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "messages.congratulatory".into(),
                message: "at least one message is required".into(),
            });
        }
        Ok(Self { messages })
    }

    pub fn as_slice(&self) -> &[String] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Pick one message. Never fails since the list is non-empty.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        pick_random(&self.messages, rng)
            .map(String::as_str)
            .unwrap_or_default()
    }
}

impl Default for CongratulatoryMessages {
    fn default() -> Self {
        Self {
            messages: DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for CongratulatoryMessages {
    type Error = ConfigError;

    fn try_from(messages: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(messages)
    }
}

impl From<CongratulatoryMessages> for Vec<String> {
    fn from(messages: CongratulatoryMessages) -> Self {
        messages.messages
    }
}

/// Uniformly pick an element, or `None` for an empty slice.
pub fn pick_random<'a, T, R: Rng + ?Sized>(list: &'a [T], rng: &mut R) -> Option<&'a T> {
    list.choose(rng)
}

/// RNG for message selection: deterministic with a seed, entropy otherwise.
pub fn message_rng(seed: Option<u64>) -> Mcg128Xsl64 {
    match seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_list_matches_built_in_messages() {
        let messages = CongratulatoryMessages::default();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages.as_slice()[0], "Congratulations!");
        assert_eq!(messages.as_slice()[4], "Way To Go!");
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = CongratulatoryMessages::new(Vec::new()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn pick_random_on_empty_slice_is_none() {
        let empty: [&str; 0] = [];
        let mut rng = message_rng(Some(7));
        assert!(pick_random(&empty, &mut rng).is_none());
    }

    #[test]
    fn pick_random_single_element() {
        let list = ["only"];
        let mut rng = message_rng(Some(1));
        assert_eq!(pick_random(&list, &mut rng), Some(&"only"));
    }

    #[test]
    fn same_seed_same_message() {
        let messages = CongratulatoryMessages::default();
        let first = messages.pick(&mut message_rng(Some(42))).to_string();
        let second = messages.pick(&mut message_rng(Some(42))).to_string();
        assert_eq!(first, second);
    }

    #[test]
    fn picks_cover_the_whole_list() {
        let messages = CongratulatoryMessages::default();
        let mut rng = message_rng(Some(3));
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(messages.pick(&mut rng).to_string());
        }
        assert_eq!(seen.len(), messages.len());
    }

    #[test]
    fn deserializing_empty_list_fails() {
        let result: Result<CongratulatoryMessages, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }
}
