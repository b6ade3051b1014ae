//! Lexical features shared by the scorers
//!
//! Tokens are Unicode word runs, lower-cased. Lexicons cover French and
//! English since the demo corpora mix both.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

lazy_static! {
    static ref TOKEN_RE: Regex = Regex::new(r"\w+").unwrap();
    static ref SENTENCE_SPLIT_RE: Regex = Regex::new(r"[.!?…]+").unwrap();
    static ref NUMBER_RE: Regex = Regex::new(r"^\d+$").unwrap();

    /// Terms signalling generality / abstraction (∞)
    static ref ABSTRACT_TERMS: HashSet<&'static str> = [
        "intelligence", "énergie", "temps", "espace", "valeur", "système", "information",
        "relation", "transformation", "concept", "concepts", "abstraction", "abstrait",
        "abstraits", "abstraite", "abstraites", "théorie", "théories", "théorique",
        "théoriques", "structure", "principe", "principes", "loi", "lois", "méthode",
        "philosophie", "paradigme", "notion", "notions", "idée", "idées",
        "theory", "theories", "theoretical", "abstract", "principle",
        "principles", "paradigm", "idea", "ideas", "philosophy", "system", "law",
    ]
    .into_iter()
    .collect();

    /// Terms signalling concreteness (Θ)
    static ref CONCRETE_TERMS: HashSet<&'static str> = [
        "capteur", "capteurs", "bâtiment", "voiture", "ordinateur", "serveur", "ville",
        "robot", "kg", "mètre", "euro", "usd", "donnée", "données", "code", "api",
        "requête", "exemple", "exemples", "tutoriel", "production", "déployer", "script",
        "fichier", "commande", "installer", "installation",
        "example", "examples", "tutorial", "deploy", "deployment", "server", "file",
        "command", "request", "install", "step", "steps",
    ]
    .into_iter()
    .collect();

    /// Logic connectors signalling argumentative structure (∆)
    static ref CONNECTORS: HashSet<&'static str> = [
        "donc", "tandis", "cependant", "néanmoins", "pourtant", "ainsi", "mais", "alors",
        "parce", "car", "si",
        "therefore", "however", "thus", "because", "although", "hence",
    ]
    .into_iter()
    .collect();
}

const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '…'];

/// Dimension of [`LexicalFeatures::linguistic_vector`]
pub const LINGUISTIC_FEATURE_DIM: usize = 5;

/// Raw counts extracted from one text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LexicalFeatures {
    pub chars: usize,
    pub tokens: usize,
    pub unique_tokens: usize,
    pub sentences: usize,
    pub connectors: usize,
    pub abstract_hits: usize,
    pub concrete_hits: usize,
    pub numbers: usize,
    pub punctuation: usize,
    pub digits: usize,
    pub uppercase: usize,
}

/// Lower-cased word tokens
pub fn tokenize(text: &str) -> Vec<String> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

impl LexicalFeatures {
    pub fn extract(text: &str) -> Self {
        let text = text.trim();
        let tokens = tokenize(text);
        let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();

        let sentences = SENTENCE_SPLIT_RE
            .split(text)
            .filter(|s| !s.trim().is_empty())
            .count();

        let count_in = |set: &HashSet<&'static str>| {
            tokens.iter().filter(|t| set.contains(t.as_str())).count()
        };

        Self {
            chars: text.chars().count(),
            tokens: tokens.len(),
            unique_tokens: unique.len(),
            sentences,
            connectors: count_in(&CONNECTORS),
            abstract_hits: count_in(&ABSTRACT_TERMS),
            concrete_hits: count_in(&CONCRETE_TERMS),
            numbers: tokens.iter().filter(|t| NUMBER_RE.is_match(t)).count(),
            punctuation: text.chars().filter(|c| PUNCTUATION.contains(c)).count(),
            digits: text.chars().filter(|c| c.is_ascii_digit()).count(),
            uppercase: text.chars().filter(|c| c.is_uppercase()).count(),
        }
    }

    fn per_char(&self, count: usize) -> f64 {
        count as f64 / self.chars.max(1) as f64
    }

    fn per_token(&self, count: usize) -> f64 {
        if self.tokens == 0 {
            0.0
        } else {
            count as f64 / self.tokens as f64
        }
    }

    pub fn punctuation_density(&self) -> f64 {
        self.per_char(self.punctuation)
    }

    pub fn digit_density(&self) -> f64 {
        self.per_char(self.digits)
    }

    pub fn uppercase_density(&self) -> f64 {
        self.per_char(self.uppercase)
    }

    pub fn abstract_density(&self) -> f64 {
        self.per_token(self.abstract_hits)
    }

    pub fn concrete_density(&self) -> f64 {
        self.per_token(self.concrete_hits)
    }

    pub fn lexical_diversity(&self) -> f64 {
        self.per_token(self.unique_tokens)
    }

    /// Input features for the neural regressor heads
    pub fn linguistic_vector(&self) -> [f32; LINGUISTIC_FEATURE_DIM] {
        [
            self.tokens as f32,
            self.chars as f32,
            self.punctuation_density() as f32,
            self.digit_density() as f32,
            self.uppercase_density() as f32,
        ]
    }
}
