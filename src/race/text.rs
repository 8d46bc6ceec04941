use async_trait::async_trait;
use rand::seq::IndexedRandom;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TextSupplyError {
    #[error("text source returned an empty text")]
    Empty,

    #[error("text source unavailable: {0}")]
    Unavailable(String),
}

/// Source of the reference text a round is raced against
#[async_trait]
pub trait TextSupplier: Send + Sync {
    /// Fetch a fresh reference text. May suspend; an empty text is an error.
    async fn fetch_reference_text(&self) -> Result<String, TextSupplyError>;
}

const PASSAGES: &[&str] = &[
    "The old lighthouse keeper climbed the spiral stairs every evening to light the lamp that guided ships safely past the rocks along the northern coast.",
    "A good cup of coffee starts with fresh beans ground just before brewing and water that is hot but never quite boiling when it meets the grounds.",
    "Rain drummed against the window while the cat slept on a pile of warm laundry that nobody had found the time to fold since Sunday afternoon.",
    "Learning to type quickly is mostly a matter of patience and practice because the fingers slowly remember where every key lives on the board.",
    "The market opened before sunrise and by the time the bakery sold its first loaf the square was already full of voices and the smell of bread.",
];

/// Picks one of a fixed set of built-in passages at random
pub struct PassageTextSupplier {
    passages: Vec<String>,
}

impl PassageTextSupplier {
    pub fn new() -> Self {
        Self::with_passages(PASSAGES.iter().map(|p| p.to_string()).collect())
    }

    pub fn with_passages(passages: Vec<String>) -> Self {
        Self { passages }
    }
}

impl Default for PassageTextSupplier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextSupplier for PassageTextSupplier {
    async fn fetch_reference_text(&self) -> Result<String, TextSupplyError> {
        let passage = self
            .passages
            .choose(&mut rand::rng())
            .ok_or_else(|| TextSupplyError::Unavailable("no passages configured".to_string()))?;

        if passage.is_empty() {
            return Err(TextSupplyError::Empty);
        }

        debug!(length = passage.len(), "Picked reference passage");
        Ok(passage.clone())
    }
}

/// Generates nonsense text out of petname word lists
pub struct PetnameTextSupplier {
    words: usize,
}

impl PetnameTextSupplier {
    pub fn new(words: usize) -> Self {
        Self { words }
    }
}

#[async_trait]
impl TextSupplier for PetnameTextSupplier {
    async fn fetch_reference_text(&self) -> Result<String, TextSupplyError> {
        let petnames = petname::Petnames::default();
        let mut words: Vec<String> = Vec::with_capacity(self.words);

        while words.len() < self.words {
            let phrase = petnames.generate_one(3, " ");
            words.extend(phrase.split(' ').map(|w| w.to_string()));
        }
        words.truncate(self.words);

        let text = words.join(" ");
        if text.is_empty() {
            return Err(TextSupplyError::Empty);
        }

        debug!(words = self.words, "Generated reference text");
        Ok(text)
    }
}
