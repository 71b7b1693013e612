// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
pub mod key_handling;
mod msg_theme;
pub mod render;
mod style;

use ratatui::style::Color;

use crate::{app::App, config::DisplayConfig};

#[derive(Clone, Copy, Debug, PartialEq)]
enum InputMode {
    Normal,
    Help,
}

pub struct UI<'a> {
    app: &'a mut App,
    selected: usize,
    top_line: usize,
    // Rows available to the summary list, known only once the layout is solved.
    list_height: Option<usize>,
    show_detail: bool,
    detail_scroll: u16,
    monochrome: bool,
    positive_color: Color,
    negative_color: Color,
    label_prefix_len: usize,
    input_mode: InputMode,
    dirty: bool,
}

impl<'a> UI<'a> {
    pub fn new(app: &'a mut App) -> Self {
        let display = DisplayConfig::default();
        app.info_msg("Press '?' for help");
        UI {
            app,
            selected: 0,
            top_line: 0,
            list_height: None,
            show_detail: false,
            detail_scroll: 0,
            monochrome: false,
            positive_color: style::rgb(display.positive_color),
            negative_color: style::rgb(display.negative_color),
            label_prefix_len: display.label_prefix_len,
            input_mode: InputMode::Normal,
            dirty: false,
        }
    }

    pub fn app(&self) -> &App {
        &*self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut *self.app
    }

    pub fn set_monochrome(&mut self) {
        self.monochrome = true;
    }

    // Badge colours and label width; must match the options the summaries were rendered with.
    pub fn set_display(&mut self, display: &DisplayConfig) {
        self.positive_color = style::rgb(display.positive_color);
        self.negative_color = style::rgb(display.negative_color);
        self.label_prefix_len = display.label_prefix_len;
        self.mark_dirty();
    }

    // Selection and scrolling

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    fn max_selected(&self) -> usize {
        self.app.num_anchors().saturating_sub(1)
    }

    pub fn select_by(&mut self, delta: isize) {
        let target = self.selected as isize + delta;
        self.selected = target.clamp(0, self.max_selected() as isize) as usize;
        self.detail_scroll = 0;
        self.adjust_top_line();
        self.mark_dirty();
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.detail_scroll = 0;
        self.adjust_top_line();
        self.mark_dirty();
    }

    pub fn select_last(&mut self) {
        self.selected = self.max_selected();
        self.detail_scroll = 0;
        self.adjust_top_line();
        self.mark_dirty();
    }

    // Keeps the selected line in the visible part of the list.
    pub fn adjust_top_line(&mut self) {
        let Some(height) = self.list_height else {
            return;
        };
        if height == 0 {
            return;
        }
        if self.selected < self.top_line {
            self.top_line = self.selected;
        } else if self.selected >= self.top_line + height {
            self.top_line = self.selected + 1 - height;
        }
    }

    fn set_list_height(&mut self, height: usize) {
        self.list_height = Some(height);
        self.adjust_top_line();
    }

    // Detail pane

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
        self.detail_scroll = 0;
        self.mark_dirty();
    }

    pub fn hide_detail(&mut self) {
        self.show_detail = false;
        self.mark_dirty();
    }

    pub fn detail_shown(&self) -> bool {
        self.show_detail
    }

    pub fn scroll_detail(&mut self, delta: i32) {
        self.detail_scroll = (self.detail_scroll as i32 + delta).max(0) as u16;
        self.mark_dirty();
    }

    // Help

    fn enter_help(&mut self) {
        self.input_mode = InputMode::Help;
        self.mark_dirty();
    }

    fn leave_help(&mut self) {
        self.input_mode = InputMode::Normal;
        self.mark_dirty();
    }

    // Redraw bookkeeping: the main loop only redraws when something changed.

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

pub const USER_GUIDE: &str = "\
Navigation
  j, Down      next sequence
  k, Up        previous sequence
  g, G         first, last sequence
  Enter        show/hide details
  J, K         scroll details
  Esc          hide details
  ?            toggle this help
  q, Ctrl-C    quit
";
