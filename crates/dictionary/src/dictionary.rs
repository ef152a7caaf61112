use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Word {
    pub word: String,
    #[serde(default)]
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub meanings: Vec<WordMeaning>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Phonetic {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordMeaning {
    #[serde(default)]
    pub part_of_speech: PartOfSpeech,
    #[serde(default)]
    pub definitions: Vec<WordDefinition>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

/// Part-of-speech tag of a meaning. Tags the service invents later are kept
/// verbatim in [`PartOfSpeech::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PartOfSpeech {
    Noun,
    Pronoun,
    Verb,
    Adjective,
    Adverb,
    Preposition,
    Conjunction,
    Interjection,
    Other(String),
}

impl From<String> for PartOfSpeech {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "noun" => Self::Noun,
            "pronoun" => Self::Pronoun,
            "verb" => Self::Verb,
            "adjective" => Self::Adjective,
            "adverb" => Self::Adverb,
            "preposition" => Self::Preposition,
            "conjunction" => Self::Conjunction,
            "interjection" => Self::Interjection,
            _ => Self::Other(tag),
        }
    }
}

impl Default for PartOfSpeech {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl PartOfSpeech {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Noun => "noun",
            Self::Pronoun => "pronoun",
            Self::Verb => "verb",
            Self::Adjective => "adjective",
            Self::Adverb => "adverb",
            Self::Preposition => "preposition",
            Self::Conjunction => "conjunction",
            Self::Interjection => "interjection",
            Self::Other(tag) => tag,
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WordDefinition {
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}
