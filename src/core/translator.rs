// File: src/core/translator.rs
use crate::core::mappings::Mappings;
use crate::core::types::Direction;
use std::sync::Arc;

/// A stateless character-by-character translator over a fixed set of
/// mappings.
#[derive(Debug, Clone)]
pub struct TranslationEngine {
    mappings: Arc<Mappings>,
}

impl TranslationEngine {
    pub fn new(mappings: Arc<Mappings>) -> Self {
        Self { mappings }
    }

    pub fn mappings(&self) -> &Mappings {
        &self.mappings
    }

    /// Translates a single character.
    ///
    /// Lookup uses the lowercased character; unknown characters come back
    /// unchanged. When the input was uppercase and the result is alphabetic
    /// the result is uppercased. Case conversions that would expand to more
    /// than one character are skipped, so the output is always exactly one
    /// character.
    pub fn translate_char(&self, c: char, direction: Direction) -> char {
        let is_upper = c.is_uppercase();
        let lowered = single_char(c.to_lowercase()).unwrap_or(c);

        let translated = self.mappings.lookup(lowered, direction).unwrap_or(c);

        if is_upper && translated.is_alphabetic() {
            single_char(translated.to_uppercase()).unwrap_or(translated)
        } else {
            translated
        }
    }

    /// Translates a full string. Output has the same character count as the
    /// input.
    pub fn translate(&self, text: &str, direction: Direction) -> String {
        text.chars()
            .map(|c| self.translate_char(c, direction))
            .collect()
    }
}

impl Default for TranslationEngine {
    fn default() -> Self {
        Self::new(Arc::new(Mappings::build()))
    }
}

fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;
    match chars.next() {
        None => Some(first),
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mappings::{DERISIAN_DIGITS, DIGITS, LETTERS};

    fn engine() -> TranslationEngine {
        TranslationEngine::default()
    }

    #[test]
    fn letters_are_involutive() {
        let engine = engine();
        for c in LETTERS.chars() {
            let there = engine.translate_char(c, Direction::EnglishToDerisian);
            let back = engine.translate_char(there, Direction::DerisianToEnglish);
            assert_eq!(back, c);
            // Same table both ways, so translating twice forward also returns.
            assert_eq!(engine.translate_char(there, Direction::EnglishToDerisian), c);
        }
    }

    #[test]
    fn digits_map_to_fixed_symbols() {
        let engine = engine();
        for (digit, symbol) in DIGITS.chars().zip(DERISIAN_DIGITS.chars()) {
            let there = engine.translate(&digit.to_string(), Direction::EnglishToDerisian);
            assert_eq!(there, symbol.to_string());
            assert_eq!(
                engine.translate(&there, Direction::DerisianToEnglish),
                digit.to_string()
            );
        }
    }

    #[test]
    fn uppercase_mirrors_lowercase_translation() {
        let engine = engine();
        for c in 'A'..='Z' {
            let lower = engine.translate_char(c.to_ascii_lowercase(), Direction::EnglishToDerisian);
            assert_eq!(
                engine.translate_char(c, Direction::EnglishToDerisian),
                lower.to_ascii_uppercase()
            );
        }
    }

    #[test]
    fn unknown_characters_pass_through() {
        let engine = engine();
        for c in ['@', '字', '😀', 'é', '\\', '\n'] {
            assert_eq!(engine.translate_char(c, Direction::EnglishToDerisian), c);
            assert_eq!(engine.translate_char(c, Direction::DerisianToEnglish), c);
        }
    }

    #[test]
    fn uppercase_digit_symbol_translates_to_plain_digit() {
        // 'Þ' lowercases to 'þ', the symbol for 2; digits have no case.
        let engine = engine();
        assert_eq!(engine.translate_char('Þ', Direction::DerisianToEnglish), '2');
    }

    #[test]
    fn uppercase_passthrough_stays_uppercase() {
        let engine = engine();
        assert_eq!(engine.translate_char('Æ', Direction::EnglishToDerisian), 'Æ');
    }

    #[test]
    fn multi_char_case_folds_do_not_change_length() {
        let engine = engine();
        // 'İ' lowercases to two characters.
        assert_eq!(engine.translate_char('İ', Direction::EnglishToDerisian), 'İ');
    }

    #[test]
    fn hello_maps_through_reversed_alphabet() {
        let engine = engine();
        let alphabet: Vec<char> = LETTERS.chars().collect();
        let expected: String = "Hello"
            .chars()
            .map(|c| {
                let i = alphabet
                    .iter()
                    .position(|&a| a == c.to_ascii_lowercase())
                    .unwrap();
                let mapped = alphabet[25 - i];
                if c.is_ascii_uppercase() {
                    mapped.to_ascii_uppercase()
                } else {
                    mapped
                }
            })
            .collect();
        assert_eq!(engine.translate("Hello", Direction::EnglishToDerisian), expected);
    }

    #[test]
    fn sentence_round_trip() {
        let engine = engine();
        let text = "Meet me at 10:30, by the gate (north)!";
        let there = engine.translate(text, Direction::EnglishToDerisian);
        assert_eq!(there.chars().count(), text.chars().count());
        assert_eq!(engine.translate(&there, Direction::DerisianToEnglish), text);
    }
}
