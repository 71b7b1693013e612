// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use log::debug;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Paragraph},
    Frame,
};

use super::{
    msg_theme::style_for,
    style::{badge_style, placeholder_style, selected_style, status_style},
    InputMode, UI, USER_GUIDE,
};
use crate::{
    app::{Anchor, AnchorState},
    render::{short_label, Badge, ELLIPSIS},
};

const SCORE_WIDTH: usize = 10;

pub fn render_ui(f: &mut Frame, ui: &mut UI) {
    let [title_area, main_area, msg_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(f.area());
    debug!("main area: {:?}", main_area);

    render_title(f, ui, title_area);
    match ui.input_mode {
        InputMode::Help => render_help(f, main_area),
        InputMode::Normal => {
            if ui.show_detail {
                let [list_area, detail_area] =
                    Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                        .areas(main_area);
                render_summaries(f, ui, list_area);
                render_detail(f, ui, detail_area);
            } else {
                render_summaries(f, ui, main_area);
            }
        }
    }
    render_message(f, ui, msg_area);
}

fn render_title(f: &mut Frame, ui: &UI, area: Rect) {
    let state = ui.app.poll_state();
    let line = Line::from(vec![
        Span::raw(format!("job {} | ", ui.app.job_id)),
        Span::styled(state.status_text(), status_style(ui, state)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(USER_GUIDE).block(Block::bordered().title("Help"));
    f.render_widget(help, area);
}

// Room for a truncated label and its ellipsis.
fn label_width(ui: &UI) -> usize {
    ui.label_prefix_len + ELLIPSIS.chars().count()
}

fn summary_line<'a>(ui: &UI, anchor: &'a Anchor) -> Line<'a> {
    match &anchor.state {
        AnchorState::Placeholder => {
            let label = short_label(&anchor.identifier, ui.app.marker, ui.label_prefix_len);
            Line::from(vec![
                Span::raw(format!("{:<w$} ", label, w = label_width(ui))),
                Span::styled("pending", placeholder_style(ui)),
            ])
        }
        AnchorState::Populated { summary, .. } => {
            let mut spans = vec![Span::raw(format!(
                "{:<lw$} {:>sw$} ",
                summary.label,
                summary.score,
                lw = label_width(ui),
                sw = SCORE_WIDTH
            ))];
            if let Some(badge) = summary.badge {
                let text = match badge {
                    Badge::Positive => " TA ",
                    Badge::Negative => " -- ",
                };
                spans.push(Span::styled(text, badge_style(ui, badge)));
            }
            if summary.feature == Some(true) {
                spans.push(Span::raw(" TMD"));
            }
            Line::from(spans)
        }
    }
}

fn render_summaries(f: &mut Frame, ui: &mut UI, area: Rect) {
    let block = Block::bordered().title(format!(
        "Sequences ({}/{})",
        ui.app.num_populated(),
        ui.app.num_anchors()
    ));
    let inner_height = block.inner(area).height as usize;
    ui.set_list_height(inner_height);
    let ui: &UI = ui;

    let lines: Vec<Line> = ui
        .app
        .anchors
        .iter()
        .enumerate()
        .skip(ui.top_line)
        .take(inner_height)
        .map(|(i, anchor)| {
            let line = summary_line(ui, anchor);
            if i == ui.selected {
                line.patch_style(selected_style())
            } else {
                line
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_detail(f: &mut Frame, ui: &UI, area: Rect) {
    let text = match ui.app.anchors.get(ui.selected) {
        Some(anchor) => match &anchor.state {
            AnchorState::Populated { detail, .. } => Text::from(detail.to_text()),
            AnchorState::Placeholder => Text::from(format!(
                "{}\n\nPrediction pending.\n\n{}",
                anchor.identifier, anchor.sequence
            )),
        },
        None => Text::from("No sequence."),
    };
    let detail = Paragraph::new(text)
        .block(Block::bordered().title("Details"))
        .scroll((ui.detail_scroll, 0));
    f.render_widget(detail, area);
}

fn render_message(f: &mut Frame, ui: &UI, area: Rect) {
    let msg = ui.app.current_message();
    let line = Line::from(format!("{}{}", msg.prefix, msg.message))
        .style(style_for(&msg.kind, ui.monochrome));
    f.render_widget(Paragraph::new(line), area);
}
