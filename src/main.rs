//! A terminal client for the gosub rendering engine.
//!
//! Run the binary to browse local pages in tabs.  Run with `--dump` to print
//! a page's display list instead of starting the TUI.

mod app;
mod config;
mod core;
mod ui;

use std::fs::File;
use std::io::{self, stderr, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    load_runtime::{spawn_page_load, PageLoad},
    state::{ActiveView, AppState},
};
use crate::config::AppConfig;
use crate::core::{
    adapter::TreeAdapter,
    display::Drawable,
    engine::{snapshot::SnapshotEngine, RenderEngine},
    url::{self, PageRequest},
};
use crate::ui::{
    layout::AppLayout,
    nav_bar::{self, NavBar},
    page::PageWidget,
    popup::HelpPopup,
    spinner::LoadIndicator,
    tab_bar::{TabBar, TabLabel},
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum EngineChoice {
    /// The gosub engine through its C bindings.
    Native,
    /// Pre-computed render trees in the text snapshot format.
    Snapshot,
}

const DEFAULT_ENGINE: EngineChoice = if cfg!(feature = "native") {
    EngineChoice::Native
} else {
    EngineChoice::Snapshot
};

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal client for the gosub engine")]
struct Cli {
    /// Page to open in the first tab (a path or `file://` URL).
    source: Option<String>,

    /// Rendering back-end.
    #[arg(long, value_enum, default_value_t = DEFAULT_ENGINE)]
    engine: EngineChoice,

    /// Print the display list of SOURCE and exit.
    #[arg(long)]
    dump: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long, value_name = "FILE")]
    log: Option<PathBuf>,

    /// Write the current configuration to the config file and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

fn init_tracing(log: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env();
    match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr) // never pollute stdout
                .init();
        }
    }
    Ok(())
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log.as_deref())?;

    let config = AppConfig::load();
    if cli.write_config {
        let path = config.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    match cli.engine {
        EngineChoice::Snapshot => {
            let engine = SnapshotEngine::new();
            let result = run(engine.clone(), config, &cli).await;
            let stats = engine.stats();
            tracing::debug!(
                inits = stats.inits(),
                frees = stats.frees(),
                live = stats.live(),
                "snapshot trees"
            );
            result
        }
        EngineChoice::Native => run_native(config, &cli).await,
    }
}

#[cfg(feature = "native")]
async fn run_native(config: AppConfig, cli: &Cli) -> Result<()> {
    run(crate::core::engine::native::GosubEngine, config, cli).await
}

#[cfg(not(feature = "native"))]
async fn run_native(_config: AppConfig, _cli: &Cli) -> Result<()> {
    bail!("built without the native engine; rebuild with `--features native` or use `--engine snapshot`")
}

async fn run<E: RenderEngine + Clone>(engine: E, config: AppConfig, cli: &Cli) -> Result<()> {
    tracing::debug!(engine = E::NAME, "starting");
    if cli.dump {
        let source = cli.source.as_deref().context("--dump needs a SOURCE")?;
        return dump(engine, source).await;
    }

    let mut state = AppState::new(engine, config);
    if let Some(source) = &cli.source {
        handler::navigate(&mut state, source);
    }
    run_tui(state).await
}

// ───────────────────────────────────────── dump mode ─────────

/// Print one line per display item: `x y size weight "family" value`.
async fn dump<E: RenderEngine>(engine: E, source: &str) -> Result<()> {
    let markup = match url::resolve(source) {
        PageRequest::File(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("could not read {}", path.display()))?,
        PageRequest::NewTab => engine.blank_page("Tab 0"),
        PageRequest::Blank => String::new(),
        PageRequest::Unsupported(scheme) => bail!("can't load {scheme}: URLs"),
    };

    let adapter = TreeAdapter::construct(engine, &markup)?;
    if adapter.is_empty() {
        tracing::info!(source, "page has no text to dump");
    }
    tracing::debug!(source, items = adapter.len(), "dumping display list");
    let mut out = io::stdout().lock();
    for item in adapter.render_list() {
        let pos = item.position();
        if let Drawable::Text(text) = item.render() {
            writeln!(
                out,
                "{} {} {} {} {:?} {}",
                pos.x,
                pos.y,
                text.point_size,
                text.weight.label(),
                text.font_family,
                text.text
            )?;
        }
    }
    Ok(())
}

// ───────────────────────────────────────── TUI ──────────────

async fn run_tui<E: RenderEngine + Clone>(mut state: AppState<E>) -> Result<()> {
    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(
        stderr_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

async fn event_loop<E: RenderEngine + Clone>(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState<E>,
) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(100));
    let (load_tx, mut load_rx) = mpsc::unbounded_channel::<PageLoad>();

    loop {
        terminal.draw(|frame| draw(frame, state))?;

        // File reads queued by the last event start after the frame that
        // shows their spinner.
        for request in state.pending_loads.drain(..) {
            spawn_page_load(load_tx.clone(), request);
        }

        tokio::select! {
            biased;

            event = events.recv() => {
                match event {
                    Some(AppEvent::Key(k)) => handler::handle_key(state, k),
                    Some(AppEvent::Mouse(m)) => handler::handle_mouse(state, m),
                    Some(AppEvent::Paste(text)) => handler::handle_paste(state, &text),
                    Some(AppEvent::Resize) => {}
                    Some(AppEvent::Tick) => state.tick = state.tick.wrapping_add(1),
                    None => break, // terminal reader gave up
                }
            }

            Some(load) = load_rx.recv() => {
                handler::apply_page_load(state, load);
                while let Ok(load) = load_rx.try_recv() {
                    handler::apply_page_load(state, load);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

fn draw<E: RenderEngine + Clone>(frame: &mut Frame, state: &mut AppState<E>) {
    let area = frame.area();
    state.screen = area;
    let state = &*state;

    let layout = AppLayout::from_area(area);
    let tab = state.tabs.active();
    let editing = state.active_view == ActiveView::UrlBar;

    frame.render_widget(
        NavBar {
            url: state.url_bar.text(),
            cursor: state.url_bar.cursor(),
            focused: editing,
            can_go_back: tab.history.can_go_back(),
            can_go_forward: tab.history.can_go_forward(),
        },
        layout.nav_area,
    );
    if editing {
        frame.set_cursor_position(nav_bar::cursor_position(
            layout.nav_area,
            state.url_bar.cursor(),
        ));
    }

    frame.render_widget(
        TabBar {
            tabs: state
                .tabs
                .iter()
                .map(|t| TabLabel {
                    title: &t.title,
                    loading: t.loading,
                })
                .collect(),
            active: state.tabs.active_index(),
            tick: state.tick,
        },
        layout.tab_area,
    );

    let page_block = Block::default()
        .title(format!(" {} ", tab.title))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(
        PageWidget {
            items: tab.render_list(),
            metrics: state.config.cell_metrics(),
            heading_size: state.config.heading_size,
            scroll: tab.viewport.scroll,
            block: Some(page_block),
            placeholder: tab
                .error
                .as_ref()
                .map(|_| "(this page could not be displayed)"),
        },
        layout.page_area,
    );
    frame.render_widget(
        LoadIndicator {
            visible: tab.loading,
            tick: state.tick,
        },
        layout.page_area,
    );

    let hint = if editing {
        "Enter: go | Esc: cancel".to_string()
    } else {
        state.config.status_bar_hint()
    };
    let status = match (&state.status_message, &tab.error) {
        (Some(message), _) | (None, Some(message)) => {
            Paragraph::new(message.as_str()).style(Theme::error_status_style())
        }
        (None, None) => Paragraph::new(hint).style(Theme::status_bar_style()),
    };
    frame.render_widget(status, layout.status_area);

    if state.active_view == ActiveView::Help {
        frame.render_widget(HelpPopup { config: &state.config }, area);
    }
}
