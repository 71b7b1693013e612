// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::TappError;

// Label used by the predictor for transmembrane positions, and the run length that counts as a
// transmembrane domain.
const TMD_LABEL: char = 'H';
const TMD_MIN_RUN: usize = 15;

/// One per-sequence prediction, as returned by the result endpoint.
///
/// `path` is aligned 1:1 with the submitted sequence. Anything besides the score fields and the
/// path (classification flags, raw state numbers, ...) lands in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    #[serde(default)]
    pub likelihood: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub path: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl ResultRecord {
    /// The score shown to the user: `score` if the deployment computes one, else the raw
    /// likelihood.
    pub fn display_score(&self) -> Option<f64> {
        self.score.or(self.likelihood)
    }

    pub fn flag(&self, field: &str) -> Option<bool> {
        self.extra.get(field).and_then(Value::as_bool)
    }

    pub fn is_positive(&self, fields: &ClassificationFields) -> Option<bool> {
        self.flag(&fields.positive)
            .or_else(|| self.flag(&fields.positive_fallback))
    }

    pub fn has_feature(&self, fields: &ClassificationFields) -> Option<bool> {
        self.flag(&fields.feature)
            .or_else(|| self.flag(&fields.feature_fallback))
            .or_else(|| (!self.path.is_empty()).then(|| has_tmd_run(&self.path)))
    }
}

fn has_tmd_run(path: &str) -> bool {
    let mut run = 0;
    for c in path.chars() {
        if c == TMD_LABEL {
            run += 1;
            if run >= TMD_MIN_RUN {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

// Names of the optional boolean fields. They vary between deployments, hence configurable.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationFields {
    pub positive: String,
    pub positive_fallback: String,
    pub feature: String,
    pub feature_fallback: String,
}

impl Default for ClassificationFields {
    fn default() -> Self {
        ClassificationFields {
            positive: String::from("is_ta"),
            positive_fallback: String::from("isPositive"),
            feature: String::from("has_tmd"),
            feature_fallback: String::from("hasFeature"),
        }
    }
}

/// Result records keyed by sequence identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultSet {
    records: BTreeMap<String, ResultRecord>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, record: ResultRecord) {
        self.records.insert(id.into(), record);
    }

    pub fn has(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&ResultRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultRecord)> {
        self.records.iter().map(|(k, v)| (k.as_str(), v))
    }
}

// An empty body or a JSON `null` means the job is still being computed: that is NOT the same as
// an empty result set.
pub fn decode_response(body: &str) -> Result<Option<ResultSet>, TappError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let decoded: Option<ResultSet> = serde_json::from_str(body)?;
    Ok(decoded)
}
