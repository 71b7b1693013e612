// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use log::debug;

use crate::seq::file::SeqMap;
use crate::validate::ValidationIssue;

pub const DEFAULT_HEADER_MARKER: char = '>';
pub const DEFAULT_MAX_LINES: usize = 10_000;

#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    pub marker: char,
    pub max_lines: usize,
    pub reject_duplicates: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            marker: DEFAULT_HEADER_MARKER,
            max_lines: DEFAULT_MAX_LINES,
            reject_duplicates: false,
        }
    }
}

// Structural pass over pasted FastA text: splits into records, nothing more. Residues are not
// looked at here (see validate.rs).
pub fn parse_fasta_str(text: &str, opts: &ParseOptions) -> Result<SeqMap, ValidationIssue> {
    let nb_lines = text.lines().count();
    if nb_lines > opts.max_lines {
        return Err(ValidationIssue::TooManyLines {
            count: nb_lines,
            max: opts.max_lines,
        });
    }

    let mut result = SeqMap::new();
    let mut current_header: Option<&str> = None;

    for (i, line) in text.lines().enumerate() {
        if line.starts_with(opts.marker) {
            let seen_before = result.start_record(line);
            if seen_before {
                if opts.reject_duplicates {
                    return Err(ValidationIssue::DuplicateHeader {
                        header: line.to_string(),
                    });
                }
                debug!("duplicate header '{}' (line {}): earlier body dropped", line, i + 1);
            }
            current_header = Some(line);
        } else if line.trim().is_empty() {
            continue;
        } else {
            match current_header {
                Some(hdr) => result.append(hdr, line),
                None => return Err(ValidationIssue::MissingHeader { line: i + 1 }),
            }
        }
    }
    Ok(result)
}
