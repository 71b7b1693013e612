// SPDX-License-Identifier: MIT 
// Copyright (c) 2025 Thomas Junier 

use ratatui::style::{Color, Modifier, Style};

use super::UI;
use crate::{poller::PollState, render::Badge};

pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

pub fn badge_style(ui: &UI, badge: Badge) -> Style {
    if ui.monochrome {
        return match badge {
            Badge::Positive => Style::default().add_modifier(Modifier::BOLD),
            Badge::Negative => Style::default(),
        };
    }
    let bg = match badge {
        Badge::Positive => ui.positive_color,
        Badge::Negative => ui.negative_color,
    };
    Style::default().fg(Color::White).bg(bg)
}

pub fn placeholder_style(ui: &UI) -> Style {
    if ui.monochrome {
        Style::default()
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn selected_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}

pub fn status_style(ui: &UI, state: &PollState) -> Style {
    let style = Style::default().add_modifier(Modifier::BOLD);
    if ui.monochrome {
        return style;
    }
    match state {
        PollState::Populated { .. } => style.fg(Color::Green),
        PollState::Failed(_) => style.fg(Color::Red),
        PollState::Pending | PollState::Requesting => style.fg(Color::Yellow),
        PollState::Idle => style,
    }
}
