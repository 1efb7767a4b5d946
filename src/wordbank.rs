//! Compiled-in word bank, keyed by language and difficulty.
//!
//! Lookups never fail: an unknown language resolves to [`Language::DEFAULT`]
//! and an unknown difficulty to [`Difficulty::DEFAULT`].

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    English,
    Spanish,
    French,
    German,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Language {
    pub const DEFAULT: Self = Self::English;
    pub const ALL: [Self; 4] = [Self::English, Self::Spanish, Self::French, Self::German];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
        }
    }

    /// Case-insensitive lookup by name, falling back to English.
    pub fn resolve(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(Self::DEFAULT)
    }

    /// Next language in [`Language::ALL`] order, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::English => Self::Spanish,
            Self::Spanish => Self::French,
            Self::French => Self::German,
            Self::German => Self::English,
        }
    }
}

impl Difficulty {
    pub const DEFAULT: Self = Self::Medium;
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Case-insensitive lookup by name, falling back to Medium.
    pub fn resolve(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(name.trim()))
            .unwrap_or(Self::DEFAULT)
    }

    pub fn next(self) -> Self {
        match self {
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard => Self::Easy,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ENGLISH_EASY: &[&str] = &[
    "cat", "dog", "fish", "bird", "tree", "book", "cake", "ball", "sun", "moon", "star", "rain",
    "snow", "wind", "love", "hope", "gift", "play", "jump", "swim", "sing", "dance", "sleep", "eat",
];

const ENGLISH_MEDIUM: &[&str] = &[
    "python", "computer", "keyboard", "monitor", "science", "mathematics", "history", "geography",
    "elephant", "giraffe", "butterfly", "mountain", "ocean", "river", "forest", "desert", "volcano",
    "planet", "galaxy", "rainbow", "thunder", "lightning", "awesome", "wonderful", "beautiful",
];

const ENGLISH_HARD: &[&str] = &[
    "algorithm", "encryption", "repository", "chromosome", "metamorphosis", "photosynthesis",
    "extraordinary", "circumstantial", "acknowledge", "pharmaceutical", "czechoslovakia",
    "xylophone", "kaleidoscope", "onomatopoeia", "simultaneously", "labyrinth", "phenomenon",
    "equilibrium", "protagonist", "anonymous", "sophisticated", "enthusiastic", "revolutionary",
];

const SPANISH_EASY: &[&str] = &[
    "casa", "perro", "gato", "sol", "luna", "amor", "agua", "libro", "mesa", "silla", "vida",
    "noche", "dia", "luz", "paz",
];

const SPANISH_MEDIUM: &[&str] = &[
    "computadora", "biblioteca", "universidad", "hospital", "restaurante", "automovil", "telefono",
    "television", "musica", "cultura", "naturaleza", "montana", "oceano", "planeta",
];

const SPANISH_HARD: &[&str] = &[
    "extraordinario", "internacional", "revolucionario", "arquitectura", "comunicacion",
    "tecnologia", "filosofia", "democracia", "responsabilidad", "caracteristicas", "investigacion",
];

const FRENCH_EASY: &[&str] = &[
    "chat", "chien", "maison", "livre", "soleil", "lune", "eau", "pain", "fromage", "amour", "vie",
    "nuit", "jour",
];

const FRENCH_MEDIUM: &[&str] = &[
    "ordinateur", "bibliotheque", "universite", "restaurant", "telephone", "musique", "montagne",
    "nature", "culture", "histoire", "geographie", "science",
];

const FRENCH_HARD: &[&str] = &[
    "extraordinaire", "internationale", "revolutionnaire", "architecture", "communication",
    "technologie", "philosophie", "responsabilite", "caracteristiques", "developpement",
];

const GERMAN_EASY: &[&str] = &[
    "katze", "hund", "haus", "buch", "sonne", "mond", "wasser", "brot", "liebe", "leben", "nacht",
    "tag", "licht",
];

const GERMAN_MEDIUM: &[&str] = &[
    "computer", "bibliothek", "universitat", "restaurant", "telefon", "musik", "berg", "natur",
    "kultur", "geschichte", "wissenschaft", "geographie",
];

const GERMAN_HARD: &[&str] = &[
    "aussergewohnlich", "international", "revolutionar", "architektur", "kommunikation",
    "technologie", "philosophie", "verantwortung", "eigenschaften", "entwicklung",
];

/// Typed lookup. Every language carries all three tiers.
pub fn words_for(language: Language, difficulty: Difficulty) -> &'static [&'static str] {
    match (language, difficulty) {
        (Language::English, Difficulty::Easy) => ENGLISH_EASY,
        (Language::English, Difficulty::Medium) => ENGLISH_MEDIUM,
        (Language::English, Difficulty::Hard) => ENGLISH_HARD,
        (Language::Spanish, Difficulty::Easy) => SPANISH_EASY,
        (Language::Spanish, Difficulty::Medium) => SPANISH_MEDIUM,
        (Language::Spanish, Difficulty::Hard) => SPANISH_HARD,
        (Language::French, Difficulty::Easy) => FRENCH_EASY,
        (Language::French, Difficulty::Medium) => FRENCH_MEDIUM,
        (Language::French, Difficulty::Hard) => FRENCH_HARD,
        (Language::German, Difficulty::Easy) => GERMAN_EASY,
        (Language::German, Difficulty::Medium) => GERMAN_MEDIUM,
        (Language::German, Difficulty::Hard) => GERMAN_HARD,
    }
}

/// Resolve both keys by name, applying the fallbacks.
pub fn resolve(language: &str, difficulty: &str) -> (Language, Difficulty) {
    (Language::resolve(language), Difficulty::resolve(difficulty))
}

pub fn words(language: &str, difficulty: &str) -> &'static [&'static str] {
    let (language, difficulty) = resolve(language, difficulty);
    words_for(language, difficulty)
}

pub fn languages() -> impl Iterator<Item = &'static str> {
    Language::ALL.into_iter().map(Language::as_str)
}

pub fn difficulties() -> impl Iterator<Item = &'static str> {
    Difficulty::ALL.into_iter().map(Difficulty::as_str)
}
