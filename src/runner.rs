// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier
// Modifications (c) 2026 Peter Carlton

use std::{
    io::{self, stdout},
    path::Path,
    sync::Arc,
    time::Duration,
};

use log::{info, warn};

use clap::{Parser, Subcommand};

use crossterm::{
    event::{self, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};

use ratatui::{
    prelude::{CrosstermBackend, Rect, Terminal},
    TerminalOptions, Viewport,
};

use tokio::{
    runtime::Runtime,
    sync::oneshot::{self, error::TryRecvError},
};

use crate::{
    app::{AnchorState, App, SubmitGate},
    config::{find_tapp_config, TappConfig},
    errors::TappError,
    notify::spawn_notification,
    poller::{HttpTransport, PollState, ResultPoller},
    render::{short_label, Badge, RenderOptions},
    result::ResultSet,
    seq::{fasta::parse_fasta_str, file::SeqMap},
    ui::{key_handling::handle_key_press, render::render_ui, UI},
};

#[derive(Debug, Parser)]
#[command(version, about, long_about = None) ]
struct Cli {
    /// Config file (default: ~/.tappconfig, then ./.tappconfig)
    #[arg(short, long)]
    config: Option<String>,

    /// Base URL of the prediction service (overrides config)
    #[arg(short = 'u', long = "base-url")]
    base_url: Option<String>,

    /// Disable color
    #[arg(short = 'C', long = "no-color")]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate a FastA query (read from stdin if no file is given)
    Check { query: Option<String> },

    /// Fetch the prediction result of a job
    Result {
        job_id: String,

        /// Original query, used to align the decoded paths with the sequences
        #[arg(short, long)]
        query: Option<String>,

        /// Keep polling while the job is still running
        #[arg(short, long)]
        poll: bool,

        /// Interactive terminal view
        #[arg(short, long)]
        tui: bool,

        /// Poll wait time [ms]
        #[clap(long = "poll-wait-time", default_value_t = 50)]
        poll_wait_time: u64,

        /// Fixed terminal width (mostly used for testing/debugging)
        #[arg(short, long, requires = "height")]
        width: Option<u16>,

        /// Fixed terminal height ("tall" -- -h is already used)
        #[arg(short = 'T', long, requires = "width")]
        height: Option<u16>,
    },

    /// Ask the service to send an e-mail when a job is done
    Mail { job_id: String, email: String },
}

fn load_config(cli: &Cli) -> (TappConfig, Option<String>) {
    let path = match &cli.config {
        Some(p) => Some(Path::new(p).to_path_buf()),
        None => find_tapp_config(),
    };
    let mut config_err: Option<String> = None;
    let mut config = match path {
        Some(path) => match TappConfig::from_file(&path) {
            Ok(cfg) => cfg,
            Err(e) => {
                config_err = Some(format!("Error reading {}: {}", path.display(), e));
                TappConfig::default()
            }
        },
        None => TappConfig::default(),
    };
    if let Some(url) = &cli.base_url {
        config.service.base_url = url.clone();
    }
    (config, config_err)
}

fn read_query(fname: Option<&str>) -> Result<String, TappError> {
    match fname {
        Some(f) => Ok(std::fs::read_to_string(f)?),
        None => Ok(io::read_to_string(io::stdin())?),
    }
}

fn run_check(config: &TappConfig, query: Option<&str>) -> Result<(), TappError> {
    let text = read_query(query)?;
    let mut gate = SubmitGate::new();
    let validated = gate.check(&text, &config.input.validator_config());
    println!("{}{}", gate.message.prefix, gate.message.message);
    match validated {
        Some(v) => {
            info!("{} sequences ready for submission", v.records.len());
            Ok(())
        }
        None => std::process::exit(1),
    }
}

fn query_records(config: &TappConfig, query: Option<&str>) -> Result<SeqMap, TappError> {
    match query {
        Some(f) => {
            let text = read_query(Some(f))?;
            Ok(parse_fasta_str(
                &text,
                &config.input.validator_config().parse,
            )?)
        }
        None => Ok(SeqMap::new()),
    }
}

fn print_result(app: &App, opts: &RenderOptions) {
    app.output_info();
    let progress = app.poll_state().progress_text();
    if !progress.is_empty() {
        println!("{}", progress);
    }
    for anchor in &app.anchors {
        match &anchor.state {
            AnchorState::Placeholder => println!(
                "{}\tpending",
                short_label(&anchor.identifier, opts.marker, opts.label_prefix_len)
            ),
            AnchorState::Populated { summary, detail } => {
                let badge = match summary.badge {
                    Some(Badge::Positive) => "\tTA",
                    Some(Badge::Negative) => "\tnot TA",
                    None => "",
                };
                let feature = if summary.feature == Some(true) { "\tTMD" } else { "" };
                println!("{}\t{}{}{}", summary.label, summary.score, badge, feature);
                print!("{}", detail.to_text());
            }
        }
        println!();
    }
}

#[allow(clippy::too_many_arguments)]
fn run_result(
    config: &TappConfig,
    job_id: &str,
    query: Option<&str>,
    poll: bool,
    tui: bool,
    poll_wait_time: u64,
    size: Option<(u16, u16)>,
    no_color: bool,
    config_err: Option<String>,
) -> Result<(), TappError> {
    let records = query_records(config, query)?;
    let opts = config.render_options();
    let mut app = App::new(job_id, &records, config.input.header_marker);

    let rt = Runtime::new()?;
    let transport = HttpTransport::new(
        config.service.request_timeout(),
        config.service.origin.as_deref(),
    )?;
    let mut poller = ResultPoller::new(config.service.endpoint(), transport);
    let policy = config.service.poll_policy();

    if !tui {
        app.set_poll_state(PollState::Requesting);
        let job = job_id.to_string();
        let results: Option<ResultSet> = rt.block_on(async {
            if poll {
                poller.poll_until_ready(&job, &policy).await
            } else {
                poller.fetch_result(&job).await
            }
        });
        app.deliver(poller.state().clone(), results.as_ref(), &opts);
        if let Some(msg) = config_err {
            warn!("{}", msg);
        }
        print_result(&app, &opts);
        return match app.poll_state() {
            PollState::Failed(msg) => Err(TappError::Transport(msg.clone())),
            _ => Ok(()),
        };
    }

    // The request runs on the runtime while the terminal loop stays responsive; its outcome
    // arrives (once) through the channel.
    let (tx, rx) = oneshot::channel::<(PollState, Option<ResultSet>)>();
    let job = job_id.to_string();
    rt.spawn(async move {
        let results = if poll {
            poller.poll_until_ready(&job, &policy).await
        } else {
            poller.fetch_result(&job).await
        };
        // The receiver is gone if the user quit in the meantime.
        let _ = tx.send((poller.state().clone(), results));
    });
    let mut rx = Some(rx);

    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;

    let backend = CrosstermBackend::new(stdout());
    // Fix viewport dimensions IFF supplied (mainly for tests)
    let viewport = match size {
        Some((width, height)) => Viewport::Fixed(Rect::new(0, 0, width, height)),
        None => Viewport::Fullscreen,
    };
    let mut terminal = Terminal::with_options(backend, TerminalOptions { viewport })?;
    terminal.clear()?;

    let mut app_ui = UI::new(&mut app);
    app_ui.set_display(&config.display);
    if no_color {
        app_ui.set_monochrome();
    }
    app_ui.app_mut().set_poll_state(PollState::Requesting);
    if let Some(msg) = config_err {
        app_ui.app_mut().error_msg(msg);
    }

    let poll_wait = Duration::from_millis(poll_wait_time);
    terminal.draw(|f| render_ui(f, &mut app_ui))?;

    // main loop
    loop {
        if let Some(receiver) = rx.as_mut() {
            match receiver.try_recv() {
                Ok((state, results)) => {
                    app_ui.app_mut().deliver(state, results.as_ref(), &opts);
                    app_ui.mark_dirty();
                    rx = None;
                }
                Err(TryRecvError::Empty) => {}
                Err(TryRecvError::Closed) => {
                    app_ui
                        .app_mut()
                        .set_poll_state(PollState::Failed(String::from("request aborted")));
                    app_ui.mark_dirty();
                    rx = None;
                }
            }
        }
        // Wait for an event (or timeout)
        if event::poll(poll_wait)? {
            match event::read()? {
                event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_press(&mut app_ui, key) {
                        break;
                    }
                }
                event::Event::Resize(_, _) => app_ui.mark_dirty(),
                _ => {}
            }
        }
        if app_ui.take_dirty() {
            terminal.draw(|f| render_ui(f, &mut app_ui))?;
        }
    }

    // Anything still in flight is discarded.
    app_ui.app_mut().tear_down();
    drop(rx);

    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    rt.shutdown_background();

    Ok(())
}

fn run_mail(config: &TappConfig, job_id: &str, email: &str) -> Result<(), TappError> {
    let rt = Runtime::new()?;
    let transport = Arc::new(HttpTransport::new(
        config.service.request_timeout(),
        config.service.origin.as_deref(),
    )?);
    // Enter the runtime: spawn_notification() needs one.
    let _guard = rt.enter();
    let handle = spawn_notification(
        transport,
        config.service.endpoint(),
        job_id.to_string(),
        email.to_string(),
    )?;
    println!("A mail will be sent to {} when job {} is done.", email, job_id);
    // Don't exit before the request has gone out; its outcome is only logged.
    if let Err(e) = rt.block_on(handle) {
        warn!("notification task: {}", e);
    }
    Ok(())
}

pub fn run() -> Result<(), TappError> {
    env_logger::init();
    info!("Starting log");

    let cli = Cli::parse();
    let (config, config_err) = load_config(&cli);

    match &cli.command {
        Command::Check { query } => {
            if let Some(msg) = &config_err {
                eprintln!("{}", msg);
            }
            run_check(&config, query.as_deref())
        }
        Command::Result {
            job_id,
            query,
            poll,
            tui,
            poll_wait_time,
            width,
            height,
        } => {
            let size = match (width, height) {
                (Some(w), Some(h)) => Some((*w, *h)),
                _ => None,
            };
            run_result(
                &config,
                job_id,
                query.as_deref(),
                *poll,
                *tui,
                *poll_wait_time,
                size,
                cli.no_color,
                config_err,
            )
        }
        Command::Mail { job_id, email } => {
            if let Some(msg) = &config_err {
                eprintln!("{}", msg);
            }
            run_mail(&config, job_id, email)
        }
    }
}
