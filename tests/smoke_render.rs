// SPDX-License-Identifier: MIT 
// Copyright (c) 2025 Thomas Junier 

mod common;

use crate::common::utils;

const QUERY: &str = "tests/data/query.fa";
const RESULT: &str = "tests/data/result.json";

#[test]
fn renders_without_panic() {
    let mut app = utils::populated_app(QUERY, None);
    let buf = utils::render(&mut app, 40, 30);
    let screen = utils::buffer_text(&buf);

    assert!(!screen.trim().is_empty());
}

#[test]
fn renders_placeholders_before_results() {
    let mut app = utils::populated_app(QUERY, None);
    let buf = utils::render(&mut app, 80, 12);
    let screen = utils::buffer_text(&buf);

    assert!(utils::screen_line(&buf, 0).starts_with("job TEST | WAITING"));
    assert!(screen.contains("Sequences (0/6)"));
    assert_eq!(6, screen.matches("pending").count());
}

#[test]
fn renders_summaries() {
    let mut app = utils::populated_app(QUERY, Some(RESULT));
    let buf = utils::render(&mut app, 80, 12);
    let screen = utils::buffer_text(&buf);

    assert!(utils::screen_line(&buf, 0).contains("CALCULATION FINISHED"));
    assert!(screen.contains("Sequences (3/6)"));

    // Line 1 is the list's top border
    let first = utils::screen_line(&buf, 2);
    assert!(first.contains("sp|P0ABC1|TAIL_ECOLI..."));
    assert!(first.contains("3.14159"));
    assert!(first.contains(" TA "));
    assert!(first.contains("TMD"));

    let second = utils::screen_line(&buf, 3);
    assert!(second.contains("seq2"));
    assert!(second.contains("-2.50000"));
    assert!(second.contains(" -- "));
    assert!(!second.contains("TMD"));

    // No score: falls back to the likelihood; no flag: no badge
    let fourth = utils::screen_line(&buf, 5);
    assert!(fourth.contains("seq4"));
    assert!(fourth.contains("-8.00000"));
    assert!(!fourth.contains(" TA ") && !fourth.contains(" -- "));

    assert_eq!(3, screen.matches("pending").count());
}

#[test]
fn renders_help() {
    utils::with_rig(QUERY, None, 80, 20, |ui, terminal| {
        tapp::ui::key_handling::handle_key_press(ui, utils::keypress('?'));
        terminal
            .draw(|f| tapp::ui::render::render_ui(f, ui))
            .expect("draw");
        let screen = utils::buffer_text(terminal.backend().buffer());
        assert!(screen.contains("Help"));
        assert!(screen.contains("toggle this help"));
    });
}

// With a short configured label prefix, placeholder and populated rows share one column layout.
#[test]
fn labels_follow_configured_prefix_len() {
    use ratatui::{backend::TestBackend, Terminal};
    use tapp::{
        app::App,
        config::DisplayConfig,
        poller::PollState,
        result::decode_response,
        seq::fasta::{parse_fasta_str, ParseOptions},
        ui::{render::render_ui, UI},
    };

    let records = parse_fasta_str(">abcdefgh\nMK\n>ijklmnop\nMK\n", &ParseOptions::default())
        .expect("parse");
    let results = decode_response(r#"{"abcdefgh": {"score": 1.0, "path": "GG"}}"#)
        .expect("decode")
        .expect("non-empty results");
    let display = DisplayConfig {
        label_prefix_len: 4,
        ..DisplayConfig::default()
    };
    let mut app = App::new("TEST", &records, '>');
    let state = PollState::Populated {
        count: 1,
        elapsed: std::time::Duration::from_millis(5),
    };
    app.deliver(state, Some(&results), &display.render_options('>'));

    let mut ui = UI::new(&mut app);
    ui.set_display(&display);
    let mut terminal = Terminal::new(TestBackend::new(60, 8)).expect("terminal");
    terminal.draw(|f| render_ui(f, &mut ui)).expect("draw");
    let buf = terminal.backend().buffer();

    // x = 0 is the list border; labels take 4 + 3 columns, then one space.
    let populated = utils::screen_line(buf, 2);
    let placeholder = utils::screen_line(buf, 3);
    assert!(populated.starts_with("│abcd...  "));
    assert!(populated.contains("1.00000"));
    assert!(placeholder.starts_with("│ijkl... pending"));
}
