// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::collections::HashMap;

use log::debug;

use crate::{
    poller::PollState,
    render::{
        anchor_key, render, DetailView, DisplayAnchorProvider, RenderOptions, SummaryView,
        ViewUpdate,
    },
    result::ResultSet,
    seq::file::SeqMap,
    validate::{parse_and_validate, Validated, ValidatorConfig, Verdict},
};

#[derive(Clone, Debug, PartialEq)]
pub enum MessageKind {
    Info,
    Warning,
    Error,
}

// Simple, 1-line message (possibly just "")
#[derive(Clone, Debug, PartialEq)]
pub struct CurrentMessage {
    pub prefix: String,
    pub message: String,
    pub kind: MessageKind,
}

impl CurrentMessage {
    fn empty() -> Self {
        CurrentMessage {
            prefix: String::from(""),
            message: String::from(""),
            kind: MessageKind::Info,
        }
    }
}

// The submit control of the query form: enabled or not, plus exactly one status message.
#[derive(Clone, Debug, PartialEq)]
pub struct SubmitGate {
    pub enabled: bool,
    pub message: CurrentMessage,
}

impl SubmitGate {
    pub fn new() -> Self {
        SubmitGate {
            enabled: false,
            message: CurrentMessage::empty(),
        }
    }

    pub fn update(&mut self, verdict: &Verdict) {
        self.enabled = verdict.allows_submit();
        let (prefix, kind) = match verdict {
            Verdict::Ok => ("", MessageKind::Info),
            Verdict::Warning(_) => ("WARNING: ", MessageKind::Warning),
            Verdict::Error(_) => ("ERROR: ", MessageKind::Error),
        };
        self.message = CurrentMessage {
            prefix: String::from(prefix),
            message: verdict.status_message(),
            kind,
        };
    }

    // Validates `text` and updates the gate accordingly. Returns the parsed records if the
    // query may be submitted.
    pub fn check(&mut self, text: &str, config: &ValidatorConfig) -> Option<Validated> {
        let outcome = parse_and_validate(text, config);
        self.update(&Verdict::from_outcome(&outcome));
        outcome.ok()
    }
}

impl Default for SubmitGate {
    fn default() -> Self {
        SubmitGate::new()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnchorState {
    Placeholder,
    Populated {
        summary: SummaryView,
        detail: DetailView,
    },
}

// Display region reserved for one sequence of the query.
#[derive(Clone, Debug, PartialEq)]
pub struct Anchor {
    pub key: String,
    pub identifier: String,
    pub sequence: String,
    pub state: AnchorState,
}

pub struct App {
    pub job_id: String,
    pub marker: char,
    pub anchors: Vec<Anchor>,
    // anchor key -> index into `anchors`
    index: HashMap<String, usize>,
    poll_state: PollState,
    torn_down: bool,
    current_msg: CurrentMessage,
}

impl App {
    pub fn new(job_id: &str, records: &SeqMap, marker: char) -> Self {
        let mut app = App {
            job_id: job_id.to_string(),
            marker,
            anchors: Vec::with_capacity(records.len()),
            index: HashMap::new(),
            poll_state: PollState::Idle,
            torn_down: false,
            current_msg: CurrentMessage::empty(),
        };
        for rec in records {
            app.add_anchor(&rec.header, &rec.sequence);
        }
        app
    }

    // Without the original query, anchors are made up from the result identifiers; there is no
    // sequence to align the path against.
    pub fn from_results(job_id: &str, results: &ResultSet, marker: char) -> Self {
        let mut app = App::new(job_id, &SeqMap::new(), marker);
        app.add_result_anchors(results);
        app
    }

    pub fn add_result_anchors(&mut self, results: &ResultSet) {
        for (id, _) in results.iter() {
            self.add_anchor(id, "");
        }
    }

    fn add_anchor(&mut self, identifier: &str, sequence: &str) {
        let key = anchor_key(identifier, self.marker);
        if self.index.contains_key(&key) {
            debug!("anchor '{}' already present", key);
            return;
        }
        self.index.insert(key.clone(), self.anchors.len());
        self.anchors.push(Anchor {
            key,
            identifier: identifier.to_string(),
            sequence: sequence.to_string(),
            state: AnchorState::Placeholder,
        });
    }

    pub fn num_anchors(&self) -> usize {
        self.anchors.len()
    }

    pub fn anchor(&self, key: &str) -> Option<&Anchor> {
        self.index.get(key).map(|&i| &self.anchors[i])
    }

    pub fn num_populated(&self) -> usize {
        self.anchors
            .iter()
            .filter(|a| matches!(a.state, AnchorState::Populated { .. }))
            .count()
    }

    // Applies view updates to their anchors. Updates for unknown anchors are dropped, and so is
    // everything once the view has been torn down. Returns the number of anchors touched.
    pub fn apply_updates(&mut self, updates: Vec<ViewUpdate>) -> usize {
        if self.torn_down {
            debug!("view torn down: dropping {} updates", updates.len());
            return 0;
        }
        let mut applied = 0;
        for up in updates {
            match self.index.get(&up.anchor) {
                Some(&i) => {
                    self.anchors[i].state = AnchorState::Populated {
                        summary: up.summary,
                        detail: up.detail,
                    };
                    applied += 1;
                }
                None => debug!("no anchor '{}'", up.anchor),
            }
        }
        applied
    }

    // Outcome of the (single) result request: projects the results onto the anchors, then
    // updates the status.
    pub fn deliver(&mut self, state: PollState, results: Option<&ResultSet>, opts: &RenderOptions) {
        if self.torn_down {
            debug!("view torn down: discarding result");
            return;
        }
        if let Some(results) = results {
            if self.anchors.is_empty() {
                self.add_result_anchors(results);
            }
            let updates = render(results, self, opts);
            let applied = self.apply_updates(updates);
            debug!("{} of {} anchors populated", applied, self.num_anchors());
        }
        self.set_poll_state(state);
    }

    pub fn poll_state(&self) -> &PollState {
        &self.poll_state
    }

    pub fn set_poll_state(&mut self, state: PollState) {
        if self.torn_down {
            return;
        }
        match &state {
            PollState::Failed(msg) => self.error_msg(msg.clone()),
            PollState::Pending => self.warning_msg(state.progress_text()),
            PollState::Populated { .. } => self.info_msg(state.progress_text()),
            PollState::Idle | PollState::Requesting => self.info_msg(state.status_text()),
        }
        self.poll_state = state;
    }

    pub fn tear_down(&mut self) {
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn output_info(&self) {
        println!("job: {}", self.job_id);
        println!("status: {}", self.poll_state);
        println!("nb_sequences: {}", self.num_anchors());
        println!("nb_results: {}", self.num_populated());
        println!();
    }

    // Messages

    pub fn current_message(&self) -> &CurrentMessage {
        &self.current_msg
    }

    pub fn clear_msg(&mut self) {
        self.current_msg = CurrentMessage::empty();
    }

    pub fn info_msg(&mut self, msg: impl Into<String>) {
        self.current_msg = CurrentMessage {
            prefix: String::from(""),
            message: msg.into(),
            kind: MessageKind::Info,
        };
    }

    pub fn warning_msg(&mut self, msg: impl Into<String>) {
        self.current_msg = CurrentMessage {
            prefix: String::from("WARNING: "),
            message: msg.into(),
            kind: MessageKind::Warning,
        };
    }

    pub fn error_msg(&mut self, msg: impl Into<String>) {
        self.current_msg = CurrentMessage {
            prefix: String::from("ERROR: "),
            message: msg.into(),
            kind: MessageKind::Error,
        };
    }
}

impl DisplayAnchorProvider for App {
    fn anchor_sequence(&self, key: &str) -> Option<&str> {
        self.anchor(key).map(|a| a.sequence.as_str())
    }
}

#[cfg(test)]
mod tests;
