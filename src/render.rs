// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use itertools::{EitherOrBoth, Itertools};
use log::debug;

use crate::{
    result::{ClassificationFields, ResultRecord, ResultSet},
    seq::fasta::DEFAULT_HEADER_MARKER,
};

pub const DEFAULT_LABEL_PREFIX_LEN: usize = 20;
pub const DEFAULT_WRAP_WIDTH: usize = 60;
pub const ELLIPSIS: &str = "...";
const SUMMARY_SCORE_DIGITS: usize = 5;

// Canonical structural key for an identifier. The header marker (if any) is dropped, so that
// '>s1' from the query and 's1' from the results land on the same anchor; every character
// outside [A-Za-z0-9_-] is backslash-escaped.
pub fn anchor_key(identifier: &str, marker: char) -> String {
    let id = identifier.strip_prefix(marker).unwrap_or(identifier);
    let mut key = String::with_capacity(id.len());
    for c in id.chars() {
        if !(c.is_ascii_alphanumeric() || c == '_' || c == '-') {
            key.push('\\');
        }
        key.push(c);
    }
    key
}

/// Something that owns per-sequence display regions, keyed by [`anchor_key`].
pub trait DisplayAnchorProvider {
    /// The original sequence shown in the anchor registered under `key`, or `None` if there is
    /// no such anchor.
    fn anchor_sequence(&self, key: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Badge {
    Positive,
    Negative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub label: String,
    pub score: String,
    pub badge: Option<Badge>,
    pub feature: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlignedBlock {
    pub sequence: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub identifier: String,
    pub score: String,
    pub blocks: Vec<AlignedBlock>,
}

impl DetailView {
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\nScore: {}\n", self.identifier, self.score);
        for block in &self.blocks {
            out.push_str(&format!("\nSeq : {}\nPath: {}\n", block.sequence, block.path));
        }
        out
    }
}

// Declarative update for one anchor; the host decides how to apply it.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    pub anchor: String,
    pub summary: SummaryView,
    pub detail: DetailView,
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub marker: char,
    pub label_prefix_len: usize,
    pub wrap_width: usize,
    pub fields: ClassificationFields,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            marker: DEFAULT_HEADER_MARKER,
            label_prefix_len: DEFAULT_LABEL_PREFIX_LEN,
            wrap_width: DEFAULT_WRAP_WIDTH,
            fields: ClassificationFields::default(),
        }
    }
}

// Pure projection of a result set onto existing anchors. Results without an anchor are skipped;
// anchors without a result get no update.
pub fn render(
    results: &ResultSet,
    anchors: &impl DisplayAnchorProvider,
    opts: &RenderOptions,
) -> Vec<ViewUpdate> {
    let mut updates = Vec::with_capacity(results.len());
    for (id, record) in results.iter() {
        let key = anchor_key(id, opts.marker);
        match anchors.anchor_sequence(&key) {
            Some(sequence) => updates.push(ViewUpdate {
                summary: summary_view(id, record, opts),
                detail: detail_view(id, record, sequence, opts),
                anchor: key,
            }),
            None => debug!("no anchor for result '{}' (key '{}')", id, key),
        }
    }
    updates
}

fn summary_view(id: &str, record: &ResultRecord, opts: &RenderOptions) -> SummaryView {
    let badge = record.is_positive(&opts.fields).map(|pos| {
        if pos {
            Badge::Positive
        } else {
            Badge::Negative
        }
    });
    SummaryView {
        label: short_label(id, opts.marker, opts.label_prefix_len),
        score: record
            .display_score()
            .map(|s| format!("{:.*}", SUMMARY_SCORE_DIGITS, s))
            .unwrap_or_else(|| String::from("N/A")),
        badge,
        feature: record.has_feature(&opts.fields),
    }
}

fn detail_view(id: &str, record: &ResultRecord, sequence: &str, opts: &RenderOptions) -> DetailView {
    DetailView {
        identifier: id.to_string(),
        score: record
            .display_score()
            .map(|s| s.to_string())
            .unwrap_or_else(|| String::from("N/A")),
        blocks: aligned_blocks(sequence, &record.path, opts.wrap_width),
    }
}

pub fn short_label(id: &str, marker: char, prefix_len: usize) -> String {
    let id = id.strip_prefix(marker).unwrap_or(id);
    if id.chars().count() > prefix_len {
        let mut label: String = id.chars().take(prefix_len).collect();
        label.push_str(ELLIPSIS);
        label
    } else {
        id.to_string()
    }
}

fn wrap(s: &str, width: usize) -> Vec<String> {
    s.chars()
        .chunks(width.max(1))
        .into_iter()
        .map(|chunk| chunk.collect())
        .collect()
}

// Sequence and decoded path, cut into lines of `width` and paired up. A path shorter (or longer)
// than the sequence leaves the other half of the trailing blocks empty.
pub fn aligned_blocks(sequence: &str, path: &str, width: usize) -> Vec<AlignedBlock> {
    wrap(sequence, width)
        .into_iter()
        .zip_longest(wrap(path, width))
        .map(|pair| match pair {
            EitherOrBoth::Both(sequence, path) => AlignedBlock { sequence, path },
            EitherOrBoth::Left(sequence) => AlignedBlock {
                sequence,
                path: String::new(),
            },
            EitherOrBoth::Right(path) => AlignedBlock {
                sequence: String::new(),
                path,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use super::*;

    struct Anchors(HashMap<String, String>);

    impl DisplayAnchorProvider for Anchors {
        fn anchor_sequence(&self, key: &str) -> Option<&str> {
            self.0.get(key).map(String::as_str)
        }
    }

    fn record(score: f64, path: &str) -> ResultRecord {
        ResultRecord {
            likelihood: None,
            score: Some(score),
            path: path.to_string(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_anchor_key_escapes() {
        assert_eq!(anchor_key(">sp|P12345|ABC_HUMAN", '>'), "sp\\|P12345\\|ABC_HUMAN");
        assert_eq!(anchor_key("s1", '>'), "s1");
        assert_eq!(anchor_key(">a b.c", '>'), "a\\ b\\.c");
        assert_eq!(anchor_key("x-y_z", '>'), "x-y_z");
    }

    #[test]
    fn test_short_label() {
        assert_eq!(short_label(">s1", '>', 20), "s1");
        assert_eq!(short_label(">abcdefghij", '>', 4), "abcd...");
        assert_eq!(short_label("abcd", '>', 4), "abcd");
    }

    #[test]
    fn test_render_one_block() {
        let mut results = ResultSet::new();
        results.insert("s1", record(0.123456, "GGCCHH"));
        let anchors = Anchors(HashMap::from([(String::from("s1"), String::from("MKVLAA"))]));

        let updates = render(&results, &anchors, &RenderOptions::default());
        assert_eq!(updates.len(), 1);
        let up = &updates[0];
        assert_eq!(up.anchor, "s1");
        assert_eq!(up.summary.score, "0.12346");
        assert_eq!(up.detail.score, "0.123456");
        assert_eq!(
            up.detail.blocks,
            vec![AlignedBlock {
                sequence: String::from("MKVLAA"),
                path: String::from("GGCCHH")
            }]
        );
        assert_eq!(up.summary.badge, None);
    }

    #[test]
    fn test_render_skips_results_without_anchor() {
        let mut results = ResultSet::new();
        results.insert("s1", record(1.0, "G"));
        results.insert("ghost", record(2.0, "G"));
        let anchors = Anchors(HashMap::from([(String::from("s1"), String::from("M"))]));
        let updates = render(&results, &anchors, &RenderOptions::default());
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].anchor, "s1");
    }

    #[test]
    fn test_render_badges() {
        let mut pos = record(0.5, "GG");
        pos.extra.insert(String::from("is_ta"), serde_json::Value::Bool(true));
        let mut neg = record(-0.5, "GG");
        neg.extra.insert(String::from("is_ta"), serde_json::Value::Bool(false));
        let mut results = ResultSet::new();
        results.insert(">p", pos);
        results.insert(">n", neg);
        let anchors = Anchors(HashMap::from([
            (String::from("p"), String::from("MK")),
            (String::from("n"), String::from("MK")),
        ]));
        let updates = render(&results, &anchors, &RenderOptions::default());
        let badge = |a: &str| updates.iter().find(|u| u.anchor == a).unwrap().summary.badge;
        assert_eq!(badge("p"), Some(Badge::Positive));
        assert_eq!(badge("n"), Some(Badge::Negative));
    }

    #[test]
    fn test_aligned_blocks_wrap() {
        let seq = "A".repeat(130);
        let path = "G".repeat(130);
        let blocks = aligned_blocks(&seq, &path, 60);
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].sequence.len(), 60);
        assert_eq!(blocks[2].path.len(), 10);
    }

    #[test]
    fn test_aligned_blocks_uneven() {
        let blocks = aligned_blocks("MKVL", "GG", 2);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].path, "");
        assert_eq!(blocks[1].sequence, "VL");
    }

    #[test]
    fn test_detail_text() {
        let detail = DetailView {
            identifier: String::from(">s1"),
            score: String::from("0.5"),
            blocks: aligned_blocks("MKVLAA", "GGCCHH", 4),
        };
        insta::assert_snapshot!(detail.to_text(), @r"
        >s1
        Score: 0.5

        Seq : MKVL
        Path: GGCC

        Seq : AA
        Path: HH
        ");
    }
}
