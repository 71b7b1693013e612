// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::HashMap;

use crate::seq::record::SeqRecord;

// A batch of pasted sequences, keyed by header. Records keep the order in which their header was
// first seen; inserting a header again replaces the body in place.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeqMap {
    records: Vec<SeqRecord>,
    index: HashMap<String, usize>,
}

impl SeqMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has(&self, header: &str) -> bool {
        self.index.contains_key(header)
    }

    pub fn get(&self, header: &str) -> Option<&SeqRecord> {
        self.index.get(header).map(|&i| &self.records[i])
    }

    // Starts a new (empty) record for `header`. Returns true IFF the header was already present,
    // in which case its previous body is discarded.
    pub fn start_record(&mut self, header: &str) -> bool {
        match self.index.get(header) {
            Some(&i) => {
                self.records[i].sequence.clear();
                true
            }
            None => {
                self.index.insert(header.to_string(), self.records.len());
                self.records.push(SeqRecord::new(header));
                false
            }
        }
    }

    pub fn append(&mut self, header: &str, line: &str) {
        if let Some(&i) = self.index.get(header) {
            self.records[i].sequence.push_str(line);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeqRecord> {
        self.records.iter()
    }

    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.header.as_str())
    }
}

impl<'a> IntoIterator for &'a SeqMap {
    type Item = &'a SeqRecord;
    type IntoIter = std::slice::Iter<'a, SeqRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
