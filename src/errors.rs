// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{fmt, io};

use crate::validate::ValidationIssue;

#[derive(Debug)]
pub enum TappError {
    Io(io::Error),
    Format(String),
    Transport(String),
    Validation(String),
    Input(ValidationIssue),
}

// These allow conversion to TappError, required for run() to return Result<()> and for '?' to
// work.

impl From<io::Error> for TappError {
    fn from(e: io::Error) -> Self {
        TappError::Io(e)
    }
}

impl From<String> for TappError {
    fn from(s: String) -> Self {
        TappError::Format(s)
    }
}

impl From<serde_json::Error> for TappError {
    fn from(e: serde_json::Error) -> Self {
        TappError::Format(format!("malformed JSON: {}", e))
    }
}

impl From<reqwest::Error> for TappError {
    fn from(e: reqwest::Error) -> Self {
        TappError::Transport(e.to_string())
    }
}

impl From<ValidationIssue> for TappError {
    fn from(issue: ValidationIssue) -> Self {
        TappError::Input(issue)
    }
}

impl fmt::Display for TappError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TappError::Io(e) => write!(f, "I/O error: {}", e),
            TappError::Format(msg) => write!(f, "Format error: {}", msg),
            TappError::Transport(msg) => write!(f, "Transport error: {}", msg),
            TappError::Validation(msg) => write!(f, "Invalid input: {}", msg),
            TappError::Input(issue) => write!(f, "{}", issue),
        }
    }
}

impl std::error::Error for TappError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_transport() {
        let e = TappError::Transport(String::from("HTTP 502"));
        assert_eq!(e.to_string(), "Transport error: HTTP 502");
    }

    #[test]
    fn test_from_validation_issue() {
        let e: TappError = ValidationIssue::TooManyLines { count: 10001, max: 10000 }.into();
        assert!(matches!(e, TappError::Input(ValidationIssue::TooManyLines { .. })));
    }
}
