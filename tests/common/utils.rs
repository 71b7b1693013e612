// SPDX-License-Identifier: MIT 
// Copyright (c) 2025 Thomas Junier 

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, KeyEventKind};

use ratatui::{
    backend::TestBackend,
    buffer::Buffer,
    prelude::{Rect, Position, Terminal},
    TerminalOptions,
    Viewport,
};

use tapp::{
    app::App,
    poller::PollState,
    render::RenderOptions,
    result::{decode_response, ResultSet},
    seq::fasta::{parse_fasta_str, ParseOptions},
    ui::{
        render,
        render::render_ui,
        UI,
    },
};

#[allow(dead_code)]
pub fn query_app(path: &str) -> App {
    let text = std::fs::read_to_string(path).expect("read query");
    let records = parse_fasta_str(&text, &ParseOptions::default()).expect("parse query");
    App::new("TEST", &records, '>')
}

#[allow(dead_code)]
pub fn results(path: &str) -> ResultSet {
    let body = std::fs::read_to_string(path).expect("read results");
    decode_response(&body).expect("decode").expect("non-empty results")
}

// App built from the query, with the results (if any) already delivered.
#[allow(dead_code)]
pub fn populated_app(query: &str, result: Option<&str>) -> App {
    let mut app = query_app(query);
    if let Some(path) = result {
        let results = results(path);
        let state = PollState::Populated {
            count: results.len(),
            elapsed: std::time::Duration::from_millis(250),
        };
        app.deliver(state, Some(&results), &RenderOptions::default());
    }
    app
}

#[allow(dead_code)]
pub fn render(app: &mut App, w: u16, h: u16) -> Buffer {
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).expect("terminal");
    let mut ui = UI::new(app);
    terminal.draw(|f| render_ui(f, &mut ui)).expect("draw");
    terminal.backend().buffer().clone()
}

#[allow(dead_code)]
pub fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            out.push(buf.cell(Position::from((x, y)))
                .expect("Wrong position")
                .symbol()
                .chars()
                .next()
                .unwrap_or(' '));
            }
        out.push('\n');
    }
    out
}

#[allow(dead_code)]
pub fn keypress(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: crossterm::event::KeyEventState::NONE,
    }
}

#[allow(dead_code)]
pub fn with_rig<F>(
    query: &str,
    result: Option<&str>,
    term_width: u16,
    term_height: u16,
    mut f: F) 
    where
        F: FnMut(&mut UI, &mut Terminal<TestBackend>),
{
    let mut app = populated_app(query, result);
    let mut ui = UI::new(&mut app);

    let backend = TestBackend::new(term_width, term_height);
    let viewport = Viewport::Fixed(Rect::new(0, 0, term_width, term_height));
    let mut terminal = Terminal::with_options(backend, TerminalOptions { viewport })
        .expect("creating test-backend terminal");
    // Initial draw
    terminal.draw(|f| render::render_ui(f, &mut ui)).expect("initial draw");

    // Events and assertions here
    f(&mut ui, &mut terminal);
}

#[allow(dead_code)]
pub fn screen_line(buffer: &Buffer, y: u16) -> String {
    let screen = buffer.area;
    (0..screen.width)
        .map(|x| buffer.cell(Position::from((x, y)))
            .expect("Wrong position")
            .symbol())
        .collect()
}
