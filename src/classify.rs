//! Input classification for the three-category menu.
//!
//! Matching is case- and accent-insensitive, but the name sent to the backend
//! is always the canonical accented form, never derived from the user's text.

use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The three top-level conversation topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Serialize, Deserialize)]
pub enum Category {
    Admision,
    Carreras,
    Academico,
}

impl Category {
    /// Exact name transmitted to the category endpoint.
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Category::Admision => "Admisión",
            Category::Carreras => "Carreras",
            Category::Academico => "Académico",
        }
    }

    /// Numeric token that selects this category ("1".."3").
    pub fn token(&self) -> &'static str {
        match self {
            Category::Admision => "1",
            Category::Carreras => "2",
            Category::Academico => "3",
        }
    }

    /// Label shown on the option buttons.
    pub fn menu_label(&self) -> &'static str {
        match self {
            Category::Admision => "1. Admisión",
            Category::Carreras => "2. Carreras",
            Category::Academico => "3. Académico",
        }
    }
}

/// What a user message resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Numeric token, keyword, or button click for one of the fixed topics.
    Category(Category),
    /// "inicio" / "volver": back to the start screen.
    GoHome,
    /// Anything else goes to the free-text endpoint verbatim.
    FreeText,
}

/// Lowercase and fold the Spanish diacritics used by the recognized keywords.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Resolve a raw user message to an intent. One deterministic mapping for
/// every recognized spelling; unrecognized input is free text.
pub fn classify(raw: &str) -> Intent {
    match normalize(raw).as_str() {
        "1" | "admision" => Intent::Category(Category::Admision),
        "2" | "carreras" => Intent::Category(Category::Carreras),
        "3" | "academico" => Intent::Category(Category::Academico),
        "inicio" | "volver" => Intent::GoHome,
        _ => Intent::FreeText,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_tokens_resolve() {
        assert_eq!(classify("1"), Intent::Category(Category::Admision));
        assert_eq!(classify("2"), Intent::Category(Category::Carreras));
        assert_eq!(classify("3"), Intent::Category(Category::Academico));
    }

    #[test]
    fn keywords_match_with_and_without_diacritics() {
        for input in ["Admisión", "admision", "ADMISION", "aDmIsIóN"] {
            assert_eq!(classify(input), Intent::Category(Category::Admision));
        }
        for input in ["Carreras", "carreras", "CARRERAS"] {
            assert_eq!(classify(input), Intent::Category(Category::Carreras));
        }
        for input in ["Académico", "academico", "ACADÉMICO"] {
            assert_eq!(classify(input), Intent::Category(Category::Academico));
        }
    }

    #[test]
    fn canonical_names_keep_accents() {
        assert_eq!(Category::Admision.canonical_name(), "Admisión");
        assert_eq!(Category::Carreras.canonical_name(), "Carreras");
        assert_eq!(Category::Academico.canonical_name(), "Académico");
    }

    #[test]
    fn home_commands_are_case_insensitive() {
        for input in ["inicio", "INICIO", "Volver", "volver"] {
            assert_eq!(classify(input), Intent::GoHome);
        }
    }

    #[test]
    fn anything_else_is_free_text() {
        for input in ["hola", "4", "admisiones", "¿cuánto cuesta?", "inicio ya"] {
            assert_eq!(classify(input), Intent::FreeText);
        }
    }

    #[test]
    fn normalize_folds_and_trims() {
        assert_eq!(normalize("  Admisión "), "admision");
        assert_eq!(normalize("ACADÉMICO"), "academico");
        assert_eq!(normalize("mañana"), "manana");
    }
}
