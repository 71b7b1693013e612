// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Thomas Junier
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::{
    InputMode::{Help, Normal},
    UI,
};

// Returns true IFF user quits.
pub fn handle_key_press(ui: &mut UI, key_event: KeyEvent) -> bool {
    match ui.input_mode {
        Normal => handle_normal_key(ui, key_event),
        Help => {
            handle_help_key(ui, key_event);
            false
        }
    }
}

fn handle_normal_key(ui: &mut UI, key_event: KeyEvent) -> bool {
    let mut done = false;
    match key_event.code {
        // Q, q, and Ctrl-C quit
        KeyCode::Char('q') | KeyCode::Char('Q') => done = true,
        KeyCode::Char('c') if key_event.modifiers.contains(KeyModifiers::CONTROL) => done = true,
        KeyCode::Char('?') => ui.enter_help(),
        KeyCode::Down | KeyCode::Char('j') => ui.select_by(1),
        KeyCode::Up | KeyCode::Char('k') => ui.select_by(-1),
        KeyCode::PageDown => ui.select_by(ui.list_height.unwrap_or(1) as isize),
        KeyCode::PageUp => ui.select_by(-(ui.list_height.unwrap_or(1) as isize)),
        KeyCode::Char('g') | KeyCode::Home => ui.select_first(),
        KeyCode::Char('G') | KeyCode::End => ui.select_last(),
        KeyCode::Enter => ui.toggle_detail(),
        KeyCode::Char('J') => ui.scroll_detail(1),
        KeyCode::Char('K') => ui.scroll_detail(-1),
        KeyCode::Esc => {
            ui.hide_detail();
            ui.app.clear_msg();
        }
        _ => {}
    }
    done
}

fn handle_help_key(ui: &mut UI, key_event: KeyEvent) {
    if let KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') = key_event.code {
        ui.leave_help();
    }
}
