//! Render model of the page, derived entirely from [`Controller`] state.

use dictionary::{Word, WordMeaning};

use crate::controller::{Controller, LookupResult};

pub const TITLE: &str = "Define-a-word";
pub const SUBTITLE: &str = "Very Simple Dictionary";
pub const INPUT_LABEL: &str = "A word to define";
pub const SUBMIT_LABEL: &str = "Define";
pub const SYNONYMS_LABEL: &str = "synonyms";
pub const NOT_FOUND_MESSAGE: &str = r"Word not found ¯\_(ツ)_/¯";

#[derive(Debug, Clone, PartialEq)]
pub struct View {
    pub submit: SubmitButton,
    pub results: ResultsView,
    /// Only populated when unexpected errors are configured to be shown.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButton {
    pub enabled: bool,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Idle,
    Cards(Vec<Card>),
    NotFound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<Section>,
}

/// One part-of-speech block of a card.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub part_of_speech: String,
    pub definitions: Vec<String>,
    pub synonyms: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Subtitle,
    Divider,
    PartOfSpeech,
    Definition,
    SynonymsLabel,
    Synonyms,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLine {
    pub kind: LineKind,
    pub text: String,
}

impl View {
    pub fn from_controller(controller: &Controller, show_errors: bool) -> Self {
        let results = match controller.result() {
            LookupResult::Idle => ResultsView::Idle,
            LookupResult::Found(words) => ResultsView::Cards(words.iter().map(Card::from_word).collect()),
            LookupResult::NotFound => ResultsView::NotFound,
        };
        Self {
            submit: SubmitButton {
                enabled: controller.can_submit(),
                loading: controller.is_pending(),
            },
            results,
            error: if show_errors {
                controller.last_error().map(str::to_owned)
            } else {
                None
            },
        }
    }

    pub fn cards(&self) -> &[Card] {
        match &self.results {
            ResultsView::Cards(cards) => cards,
            ResultsView::Idle | ResultsView::NotFound => &[],
        }
    }
}

impl Card {
    fn from_word(word: &Word) -> Self {
        Self {
            title: word.word.clone(),
            subtitle: word.phonetic.clone().unwrap_or_default(),
            sections: word.meanings.iter().map(Section::from_meaning).collect(),
        }
    }

    /// Flatten the card into display lines, top to bottom. Sections after the
    /// first are preceded by a divider.
    pub fn lines(&self) -> Vec<CardLine> {
        let mut lines = vec![CardLine::new(LineKind::Title, &self.title)];
        if !self.subtitle.is_empty() {
            lines.push(CardLine::new(LineKind::Subtitle, &self.subtitle));
        }
        for (index, section) in self.sections.iter().enumerate() {
            if index > 0 {
                lines.push(CardLine::new(LineKind::Divider, ""));
            }
            lines.push(CardLine::new(LineKind::PartOfSpeech, &section.part_of_speech));
            for definition in &section.definitions {
                lines.push(CardLine::new(LineKind::Definition, definition));
            }
            if let Some(synonyms) = &section.synonyms {
                lines.push(CardLine::new(LineKind::SynonymsLabel, SYNONYMS_LABEL));
                lines.push(CardLine::new(LineKind::Synonyms, synonyms));
            }
        }
        lines
    }
}

impl Section {
    fn from_meaning(meaning: &WordMeaning) -> Self {
        Self {
            part_of_speech: meaning.part_of_speech.to_string(),
            definitions: meaning
                .definitions
                .iter()
                .map(|definition| definition.definition.clone())
                .collect(),
            synonyms: if meaning.synonyms.is_empty() {
                None
            } else {
                Some(meaning.synonyms.join(", "))
            },
        }
    }
}

impl CardLine {
    fn new(kind: LineKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_owned(),
        }
    }
}
