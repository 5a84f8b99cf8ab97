// File: src/core/mappings.rs
use crate::core::types::{Direction, SymbolMap};
use crate::error::{Result, TranslatorError};
use serde::Serialize;
use std::collections::HashSet;

pub const LETTERS: &str = "abcdefghijklmnopqrstuvwxyz";
pub const DERISIAN_LETTERS: &str = "zyxwvutsrqponmlkjihgfedcba";

pub const DIGITS: &str = "0123456789";
pub const DERISIAN_DIGITS: &str = "¢µþæøß¶§ð¿";

pub const PUNCTUATION: [char; 15] = [
    ' ', '.', ',', '!', '?', '\'', '"', '(', ')', '-', '_', ':', ';', '/', '\\',
];
/// One symbol short of `PUNCTUATION`: the trailing backslash stays unpaired.
pub const DERISIAN_PUNCTUATION: &str = "•`~!^@#&[]{}|=";

/// Which table a lookup is served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Letters,
    Digits,
    Punctuation,
}

/// The three forward symbol maps plus their inverses.
///
/// Built once and never mutated. Construction is a pure zip of fixed
/// sequences, so two builds always compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mappings {
    letters: SymbolMap,
    digits: SymbolMap,
    punctuation: SymbolMap,
    #[serde(skip)]
    letters_inv: SymbolMap,
    #[serde(skip)]
    digits_inv: SymbolMap,
    #[serde(skip)]
    punctuation_inv: SymbolMap,
    unpaired: Vec<char>,
}

impl Mappings {
    /// Builds the fixed Derisian tables.
    pub fn build() -> Self {
        let letters: Vec<char> = LETTERS.chars().collect();
        let digits: Vec<char> = DIGITS.chars().collect();
        let punct_targets: Vec<char> = DERISIAN_PUNCTUATION.chars().collect();

        let unpaired: Vec<char> = PUNCTUATION
            .iter()
            .skip(punct_targets.len())
            .copied()
            .collect();
        if !unpaired.is_empty() {
            tracing::warn!(
                ?unpaired,
                "punctuation targets are shorter than sources; unpaired characters pass through"
            );
        }

        let mut mappings = Self::from_tables(
            SymbolMap::zip(&letters, &DERISIAN_LETTERS.chars().collect::<Vec<_>>()),
            SymbolMap::zip(&digits, &DERISIAN_DIGITS.chars().collect::<Vec<_>>()),
            SymbolMap::zip(&PUNCTUATION, &punct_targets),
        );
        mappings.unpaired = unpaired;
        mappings
    }

    /// Assembles mappings from arbitrary forward tables, deriving inverses.
    /// No validation happens here; see [`Mappings::validate`].
    pub fn from_tables(letters: SymbolMap, digits: SymbolMap, punctuation: SymbolMap) -> Self {
        Self {
            letters_inv: letters.inverse(),
            digits_inv: digits.inverse(),
            punctuation_inv: punctuation.inverse(),
            letters,
            digits,
            punctuation,
            unpaired: Vec::new(),
        }
    }

    /// Checks that every table inverts exactly and that the source domains
    /// of the three forward tables are pairwise disjoint.
    pub fn validate(&self) -> Result<()> {
        for (kind, forward, inverse) in [
            (TableKind::Letters, &self.letters, &self.letters_inv),
            (TableKind::Digits, &self.digits, &self.digits_inv),
            (TableKind::Punctuation, &self.punctuation, &self.punctuation_inv),
        ] {
            if forward.len() != inverse.len() {
                return Err(TranslatorError::ScriptInit(format!(
                    "{kind:?} table has {} entries but only {} distinct targets",
                    forward.len(),
                    inverse.len()
                )));
            }
        }

        let mut seen: HashSet<char> = HashSet::new();
        for (kind, table) in self.forward_tables() {
            for source in table.sources() {
                if !seen.insert(source) {
                    return Err(TranslatorError::ScriptInit(format!(
                        "source character {source:?} in {kind:?} table already belongs to another table"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn forward_tables(&self) -> [(TableKind, &SymbolMap); 3] {
        [
            (TableKind::Letters, &self.letters),
            (TableKind::Digits, &self.digits),
            (TableKind::Punctuation, &self.punctuation),
        ]
    }

    /// Tables consulted for `direction`, in lookup priority order.
    pub fn tables(&self, direction: Direction) -> [&SymbolMap; 3] {
        match direction {
            Direction::EnglishToDerisian => [&self.letters, &self.digits, &self.punctuation],
            Direction::DerisianToEnglish => {
                [&self.letters_inv, &self.digits_inv, &self.punctuation_inv]
            }
        }
    }

    pub fn lookup(&self, c: char, direction: Direction) -> Option<char> {
        self.tables(direction).iter().find_map(|table| table.get(c))
    }

    /// Source characters that were dropped because their target list ran out.
    pub fn unpaired(&self) -> &[char] {
        &self.unpaired
    }
}

impl Default for Mappings {
    fn default() -> Self {
        Self::build()
    }
}
