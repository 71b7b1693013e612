// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::fmt;

use log::{debug, info};

use crate::{
    alphabet::{Alphabet, Residues},
    seq::{
        fasta::{parse_fasta_str, ParseOptions},
        file::SeqMap,
    },
};

pub const DEFAULT_MAX_RECORDS: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationIssue {
    TooManyLines { count: usize, max: usize },
    MissingHeader { line: usize },
    DuplicateHeader { header: String },
    InvalidCharacter { header: String, ch: char, pos: usize },
    TooManyRecords { count: usize, max: usize },
    // The three below are warnings; the batch stays submittable.
    NoSequences,
    EmptySequence { header: String },
    // The code is ignored downstream.
    AmbiguousCharacter { header: String, ch: char },
}

impl ValidationIssue {
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            ValidationIssue::AmbiguousCharacter { .. }
                | ValidationIssue::EmptySequence { .. }
                | ValidationIssue::NoSequences
        )
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ValidationIssue::*;
        match self {
            TooManyLines { count, max } => {
                write!(f, "Input too long: {} lines (max. {}).", count, max)
            }
            MissingHeader { line } => write!(
                f,
                "It seems your input does not contain the header line (line {}).",
                line
            ),
            DuplicateHeader { header } => write!(f, "Duplicate header: {}", header),
            InvalidCharacter { header, ch, pos } => write!(
                f,
                "Invalid character '{}' in {} (position {}).",
                ch,
                header,
                pos + 1
            ),
            TooManyRecords { count, max } => {
                write!(f, "Too many sequences: {} (max. {}).", count, max)
            }
            NoSequences => write!(f, "No sequence found."),
            EmptySequence { header } => write!(f, "Empty sequence: {}", header),
            AmbiguousCharacter { header, ch } => write!(
                f,
                "Ambiguous code '{}' in {} will be ignored.",
                ch, header
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub parse: ParseOptions,
    pub max_records: usize,
    pub alphabet: Alphabet,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            parse: ParseOptions::default(),
            max_records: DEFAULT_MAX_RECORDS,
            alphabet: Alphabet::protein(),
        }
    }
}

// A successfully parsed batch, possibly with a (non-fatal) warning attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub records: SeqMap,
    pub warning: Option<ValidationIssue>,
}

pub fn parse_and_validate(
    raw_text: &str,
    config: &ValidatorConfig,
) -> Result<Validated, ValidationIssue> {
    let records = parse_fasta_str(raw_text, &config.parse)?;

    let mut warning: Option<ValidationIssue> = None;
    for rec in &records {
        match config.alphabet.classify(&rec.sequence) {
            Residues::Clean => {}
            Residues::Ambiguous(ch) => {
                if warning.is_none() {
                    warning = Some(ValidationIssue::AmbiguousCharacter {
                        header: rec.header.clone(),
                        ch,
                    });
                }
            }
            Residues::Invalid { ch, pos } => {
                return Err(ValidationIssue::InvalidCharacter {
                    header: rec.header.clone(),
                    ch,
                    pos,
                });
            }
        }
    }

    if records.len() > config.max_records {
        return Err(ValidationIssue::TooManyRecords {
            count: records.len(),
            max: config.max_records,
        });
    }
    // Ambiguous codes are reported first; an empty body or batch only when nothing else is wrong.
    if warning.is_none() {
        warning = records
            .iter()
            .find(|r| r.sequence.is_empty())
            .map(|rec| ValidationIssue::EmptySequence {
                header: rec.header.clone(),
            });
    }
    if warning.is_none() && records.is_empty() {
        warning = Some(ValidationIssue::NoSequences);
    }

    debug!("validated {} records (warning: {:?})", records.len(), warning);
    Ok(Validated { records, warning })
}

// Single pass/warn/fail outcome that drives the submit gate.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Ok,
    Warning(ValidationIssue),
    Error(ValidationIssue),
}

impl Verdict {
    pub fn of(raw_text: &str, config: &ValidatorConfig) -> Self {
        Verdict::from_outcome(&parse_and_validate(raw_text, config))
    }

    pub fn from_outcome(outcome: &Result<Validated, ValidationIssue>) -> Self {
        let verdict = match outcome {
            Ok(Validated {
                warning: Some(w), ..
            }) => Verdict::Warning(w.clone()),
            Ok(_) => Verdict::Ok,
            Err(issue) => Verdict::Error(issue.clone()),
        };
        info!("verdict: {}", verdict.status_message());
        verdict
    }

    pub fn allows_submit(&self) -> bool {
        !matches!(self, Verdict::Error(_))
    }

    pub fn status_message(&self) -> String {
        match self {
            Verdict::Ok => String::from("OK"),
            Verdict::Warning(issue) | Verdict::Error(issue) => issue.to_string(),
        }
    }
}
