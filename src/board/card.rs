//! Validated card content.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Text printed on a card.
///
/// Content is non-empty and contains no whitespace, enforced at construction.
/// Equality of `Card` values defines the matching relation: two cells match
/// exactly when both still hold a card and the cards compare equal.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Card(String);

/// Rejected card content.
#[derive(Debug, Clone, Display, Error)]
#[display("invalid card content {text:?}: must be non-empty with no whitespace")]
pub struct InvalidCard {
    text: String,
}

impl Card {
    /// Validates and wraps card text.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidCard`] if the text is empty or contains whitespace.
    pub fn new(text: impl Into<String>) -> Result<Self, InvalidCard> {
        let text = text.into();
        if text.is_empty() || text.chars().any(char::is_whitespace) {
            return Err(InvalidCard { text });
        }
        Ok(Self(text))
    }

    /// The card text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Card {
    type Error = InvalidCard;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        Self::new(text)
    }
}

impl From<Card> for String {
    fn from(card: Card) -> Self {
        card.0
    }
}
