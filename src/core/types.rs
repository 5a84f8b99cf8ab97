// src/core/types.rs
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Which way a translation proceeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    EnglishToDerisian,
    DerisianToEnglish,
}

impl Direction {
    /// Label printed in front of a translated phrase, named after the
    /// language the result is written in.
    pub fn output_label(self) -> &'static str {
        match self {
            Direction::EnglishToDerisian => "Derisian",
            Direction::DerisianToEnglish => "English",
        }
    }

    /// Language the user is asked to type.
    pub fn source_language(self) -> &'static str {
        match self {
            Direction::EnglishToDerisian => "English",
            Direction::DerisianToEnglish => "Derisian",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source_language(), self.output_label())
    }
}

/// An ordered one-to-one pairing of source characters to target characters.
///
/// Insertion follows dictionary semantics: a repeated source keeps its first
/// position but takes the last target written for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SymbolMap {
    pairs: Vec<(char, char)>,
    #[serde(skip)]
    index: HashMap<char, usize>,
}

impl SymbolMap {
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (char, char)>,
    {
        let mut map = Self::default();
        for (source, target) in pairs {
            map.insert(source, target);
        }
        map
    }

    /// Zips two sequences positionally. The longer sequence's tail is
    /// dropped.
    pub fn zip(sources: &[char], targets: &[char]) -> Self {
        Self::from_pairs(sources.iter().copied().zip(targets.iter().copied()))
    }

    fn insert(&mut self, source: char, target: char) {
        match self.index.get(&source) {
            Some(&slot) => self.pairs[slot].1 = target,
            None => {
                self.index.insert(source, self.pairs.len());
                self.pairs.push((source, target));
            }
        }
    }

    pub fn get(&self, source: char) -> Option<char> {
        self.index.get(&source).map(|&slot| self.pairs[slot].1)
    }

    /// Swaps every pair. Colliding targets collapse onto the last write.
    pub fn inverse(&self) -> Self {
        Self::from_pairs(self.pairs.iter().map(|&(source, target)| (target, source)))
    }

    pub fn pairs(&self) -> &[(char, char)] {
        &self.pairs
    }

    pub fn sources(&self) -> impl Iterator<Item = char> + '_ {
        self.pairs.iter().map(|&(source, _)| source)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}
