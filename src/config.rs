// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use hex_color::HexColor;
use log::{debug, warn};
use serde_json::Value;

use crate::{
    alphabet::{Alphabet, AMBIGUOUS_AMINO_ACID_CODES, STANDARD_AMINO_ACIDS},
    errors::TappError,
    poller::{
        Endpoint, PollPolicy, DEFAULT_BASE_URL, DEFAULT_POLL_INTERVAL_MS,
        DEFAULT_POLL_MAX_ATTEMPTS, DEFAULT_REQUEST_TIMEOUT_MS,
    },
    render::{RenderOptions, DEFAULT_LABEL_PREFIX_LEN, DEFAULT_WRAP_WIDTH},
    result::ClassificationFields,
    seq::fasta::{ParseOptions, DEFAULT_HEADER_MARKER, DEFAULT_MAX_LINES},
    validate::{ValidatorConfig, DEFAULT_MAX_RECORDS},
};

pub const CONFIG_FILE_NAME: &str = ".tappconfig";

const DEFAULT_POSITIVE_COLOR: (u8, u8, u8) = (0x2e, 0x7d, 0x32);
const DEFAULT_NEGATIVE_COLOR: (u8, u8, u8) = (0x9e, 0x9e, 0x9e);

// $HOME first, then the current directory.
pub fn find_tapp_config() -> Option<PathBuf> {
    if let Ok(home) = std::env::var("HOME") {
        let path = PathBuf::from(home).join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let path = cwd.join(CONFIG_FILE_NAME);
        if path.exists() {
            return Some(path);
        }
    }
    None
}

fn get_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

fn get_usize(value: &Value, key: &str) -> Option<usize> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| usize::try_from(n).ok())
}

fn get_u64(value: &Value, key: &str) -> Option<u64> {
    value.get(key).and_then(Value::as_u64)
}

fn get_bool(value: &Value, key: &str) -> Option<bool> {
    value.get(key).and_then(Value::as_bool)
}

fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    match HexColor::parse(s) {
        Ok(c) => Some((c.r, c.g, c.b)),
        Err(e) => {
            warn!("ignoring color '{}': {}", s, e);
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub base_url: String,
    // Used to resolve a relative base_url.
    pub origin: Option<String>,
    pub poll_interval_ms: u64,
    pub poll_max_attempts: u32,
    pub request_timeout_ms: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: String::from(DEFAULT_BASE_URL),
            origin: None,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

impl ServiceConfig {
    pub fn from_value(value: &Value) -> Self {
        let d = ServiceConfig::default();
        ServiceConfig {
            base_url: get_str(value, "base_url").unwrap_or(d.base_url),
            origin: get_str(value, "origin").or(d.origin),
            poll_interval_ms: get_u64(value, "poll_interval_ms").unwrap_or(d.poll_interval_ms),
            poll_max_attempts: get_u64(value, "poll_max_attempts")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(d.poll_max_attempts),
            request_timeout_ms: get_u64(value, "request_timeout_ms")
                .unwrap_or(d.request_timeout_ms),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.base_url.as_str())
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_millis(self.poll_interval_ms),
            max_attempts: self.poll_max_attempts,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    pub header_marker: char,
    pub max_lines: usize,
    pub max_records: usize,
    pub strict_alphabet: String,
    pub ambiguous_codes: String,
    pub reject_duplicates: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            header_marker: DEFAULT_HEADER_MARKER,
            max_lines: DEFAULT_MAX_LINES,
            max_records: DEFAULT_MAX_RECORDS,
            strict_alphabet: String::from(STANDARD_AMINO_ACIDS),
            ambiguous_codes: String::from(AMBIGUOUS_AMINO_ACID_CODES),
            reject_duplicates: false,
        }
    }
}

impl InputConfig {
    pub fn from_value(value: &Value) -> Self {
        let d = InputConfig::default();
        InputConfig {
            header_marker: get_str(value, "header_marker")
                .and_then(|s| s.chars().next())
                .unwrap_or(d.header_marker),
            max_lines: get_usize(value, "max_lines").unwrap_or(d.max_lines),
            max_records: get_usize(value, "max_records").unwrap_or(d.max_records),
            strict_alphabet: get_str(value, "strict_alphabet").unwrap_or(d.strict_alphabet),
            ambiguous_codes: get_str(value, "ambiguous_codes").unwrap_or(d.ambiguous_codes),
            reject_duplicates: get_bool(value, "reject_duplicates").unwrap_or(d.reject_duplicates),
        }
    }

    pub fn validator_config(&self) -> ValidatorConfig {
        ValidatorConfig {
            parse: ParseOptions {
                marker: self.header_marker,
                max_lines: self.max_lines,
                reject_duplicates: self.reject_duplicates,
            },
            max_records: self.max_records,
            alphabet: Alphabet::new(&self.strict_alphabet, &self.ambiguous_codes),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    pub label_prefix_len: usize,
    pub wrap_width: usize,
    pub fields: ClassificationFields,
    pub positive_color: (u8, u8, u8),
    pub negative_color: (u8, u8, u8),
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            label_prefix_len: DEFAULT_LABEL_PREFIX_LEN,
            wrap_width: DEFAULT_WRAP_WIDTH,
            fields: ClassificationFields::default(),
            positive_color: DEFAULT_POSITIVE_COLOR,
            negative_color: DEFAULT_NEGATIVE_COLOR,
        }
    }
}

impl DisplayConfig {
    pub fn from_value(value: &Value) -> Self {
        let d = DisplayConfig::default();
        let mut fields = d.fields.clone();
        if let Some(f) = get_str(value, "positive_field") {
            fields.positive = f;
        }
        if let Some(f) = get_str(value, "feature_field") {
            fields.feature = f;
        }
        let badge = value.get("badge_colors");
        let color = |key: &str| {
            badge
                .and_then(|b| b.get(key))
                .and_then(Value::as_str)
                .and_then(parse_hex)
        };
        DisplayConfig {
            label_prefix_len: get_usize(value, "label_prefix_len").unwrap_or(d.label_prefix_len),
            wrap_width: get_usize(value, "wrap_width")
                .filter(|&w| w > 0)
                .unwrap_or(d.wrap_width),
            fields,
            positive_color: color("positive").unwrap_or(d.positive_color),
            negative_color: color("negative").unwrap_or(d.negative_color),
        }
    }

    pub fn render_options(&self, marker: char) -> RenderOptions {
        RenderOptions {
            marker,
            label_prefix_len: self.label_prefix_len,
            wrap_width: self.wrap_width,
            fields: self.fields.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TappConfig {
    pub service: ServiceConfig,
    pub input: InputConfig,
    pub display: DisplayConfig,
}

impl TappConfig {
    // All groups read from the same flat JSON object; unknown keys are ignored, and so are
    // values of the wrong type (the default is kept).
    pub fn from_value(value: &Value) -> Self {
        TappConfig {
            service: ServiceConfig::from_value(value),
            input: InputConfig::from_value(value),
            display: DisplayConfig::from_value(value),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, TappError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(TappError::Format(String::from(
                "config must be a JSON object",
            )));
        }
        Ok(TappConfig::from_value(&value))
    }

    pub fn from_file(path: &Path) -> Result<Self, TappError> {
        debug!("reading config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        TappConfig::from_json(&text)
    }

    pub fn render_options(&self) -> RenderOptions {
        self.display.render_options(self.input.header_marker)
    }
}
