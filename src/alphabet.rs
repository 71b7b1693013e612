// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::HashSet;

pub const STANDARD_AMINO_ACIDS: &str = "ACDEFGHIKLMNPQRSTVWY";
// B, Z, J: any-of codes; X: unknown; U, O: selenocysteine, pyrrolysine; '*': stop; '-': gap.
pub const AMBIGUOUS_AMINO_ACID_CODES: &str = "BZXJUO*-";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Residues {
    Clean,
    // First non-strict (but still acceptable) character.
    Ambiguous(char),
    // First character outside the extended alphabet, with its 0-based position in the body.
    Invalid { ch: char, pos: usize },
}

// The strict alphabet and the ambiguity codes are data, so that other species/alphabets only
// need a different config. Matching is case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct Alphabet {
    strict: HashSet<char>,
    extended: HashSet<char>,
}

impl Alphabet {
    pub fn new(strict: &str, ambiguous: &str) -> Self {
        let strict: HashSet<char> = strict.chars().map(|c| c.to_ascii_uppercase()).collect();
        let mut extended = strict.clone();
        extended.extend(ambiguous.chars().map(|c| c.to_ascii_uppercase()));
        Alphabet { strict, extended }
    }

    pub fn protein() -> Self {
        Alphabet::new(STANDARD_AMINO_ACIDS, AMBIGUOUS_AMINO_ACID_CODES)
    }

    pub fn is_strict(&self, c: char) -> bool {
        self.strict.contains(&c.to_ascii_uppercase())
    }

    pub fn is_extended(&self, c: char) -> bool {
        self.extended.contains(&c.to_ascii_uppercase())
    }

    pub fn classify(&self, body: &str) -> Residues {
        let mut first_ambiguous: Option<char> = None;
        for (pos, ch) in body.chars().enumerate() {
            if self.is_strict(ch) {
                continue;
            }
            if !self.is_extended(ch) {
                return Residues::Invalid { ch, pos };
            }
            first_ambiguous.get_or_insert(ch);
        }
        match first_ambiguous {
            Some(ch) => Residues::Ambiguous(ch),
            None => Residues::Clean,
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Alphabet::protein()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_clean() {
        let ab = Alphabet::protein();
        assert_eq!(ab.classify(STANDARD_AMINO_ACIDS), Residues::Clean);
        assert_eq!(ab.classify("mkvl"), Residues::Clean);
        assert_eq!(ab.classify(""), Residues::Clean);
    }

    #[test]
    fn test_classify_ambiguous() {
        let ab = Alphabet::protein();
        assert_eq!(ab.classify("ACDX"), Residues::Ambiguous('X'));
        assert_eq!(ab.classify("MK-B*"), Residues::Ambiguous('-'));
    }

    #[test]
    fn test_classify_invalid_wins_over_ambiguous() {
        let ab = Alphabet::protein();
        assert_eq!(ab.classify("AXC1D"), Residues::Invalid { ch: '1', pos: 3 });
        assert_eq!(ab.classify("MK L"), Residues::Invalid { ch: ' ', pos: 2 });
    }

    #[test]
    fn test_custom_alphabet() {
        let dna = Alphabet::new("ACGT", "N");
        assert_eq!(dna.classify("acgtn"), Residues::Ambiguous('n'));
        assert_eq!(dna.classify("ACGU"), Residues::Invalid { ch: 'U', pos: 3 });
    }
}
