use dictionary_api::get_definitions;
use serde::Deserialize;

mod dictionary;
mod dictionary_api;

pub use dictionary::{PartOfSpeech, Phonetic, Word, WordDefinition, WordMeaning};
pub use reqwest::StatusCode;

/// Entries are fetched from `<base url><lowercased word>`.
pub const FREE_DICTIONARY_BASE_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en/";

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to reach the dictionary service: {0}")]
    Fetch(#[source] reqwest::Error),
    #[error("the dictionary service answered with {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to read the dictionary response: {0}")]
    Deserialize(#[source] reqwest::Error),
    #[error("{0}")]
    NotFound(NotFoundError),
}

impl DictionaryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DictionaryError::NotFound(_))
    }
}

/// Body the service sends along with a 404.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, thiserror::Error)]
#[error("{title}: {message}")]
pub struct NotFoundError {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub resolution: Option<String>,
}

impl NotFoundError {
    pub(crate) fn for_word(word: &str) -> Self {
        Self {
            title: "No Definitions Found".to_owned(),
            message: format!("No definitions were found for {word:?}."),
            resolution: None,
        }
    }
}

/// Anything that can resolve a word into dictionary entries.
#[async_trait::async_trait]
pub trait Lookup: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<Vec<Word>, DictionaryError>;
}

pub struct Dictionary {
    client: reqwest::Client,
    base_url: String,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::with_base_url(FREE_DICTIONARY_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every entry the service has for `word`. The caller is expected
    /// to have trimmed and lowercased it already.
    pub async fn get_definitions(&self, word: &str) -> Result<Vec<Word>, DictionaryError> {
        get_definitions(&self.client, &self.base_url, word).await
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Lookup for Dictionary {
    async fn lookup(&self, word: &str) -> Result<Vec<Word>, DictionaryError> {
        self.get_definitions(word).await
    }
}
