//! Event Loop - dashboard entry point and key handling

use super::controller::{DashboardMessage, FetchController};
use super::render::draw_ui;
use super::state::UiState;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use miaas_common::{ControlPlaneClient, DashboardConfig, NodeSource};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::info;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What a key press asks the loop to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Refresh,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
    ToggleHelp,
    None,
}

pub fn key_action(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => KeyAction::Quit,
        (KeyCode::Char('r'), _) | (KeyCode::F(5), _) => KeyAction::Refresh,
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => KeyAction::SelectNext,
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => KeyAction::SelectPrev,
        (KeyCode::Home, _) | (KeyCode::Char('g'), _) => KeyAction::SelectFirst,
        (KeyCode::End, _) | (KeyCode::Char('G'), _) => KeyAction::SelectLast,
        (KeyCode::F(1), _) | (KeyCode::Char('?'), _) => KeyAction::ToggleHelp,
        _ => KeyAction::None,
    }
}

/// Run the dashboard until the operator quits
pub async fn run(config: DashboardConfig) -> Result<()> {
    let client =
        ControlPlaneClient::new(&config).context("Failed to create control-plane client")?;

    enable_raw_mode().map_err(|e| {
        anyhow::anyhow!(
            "Failed to enable raw mode: {}. Ensure you're running in a real terminal (TTY).",
            e
        )
    })?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| {
        let _ = disable_raw_mode();
        anyhow::anyhow!("Failed to initialize terminal: {}", e)
    })?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::channel(32);
    let mut controller = FetchController::new(Arc::new(client), config.base_url(), tx);
    let mut ui = UiState::default();

    info!("Dashboard started against {}", config.base_url());

    let result = run_event_loop(&mut terminal, &mut controller, &mut ui, &mut rx).await;

    // Restore terminal (always attempt cleanup)
    let cleanup_result = restore_terminal(&mut terminal);

    info!("Dashboard stopped");
    result.and(cleanup_result)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_event_loop<S: NodeSource>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    controller: &mut FetchController<S>,
    ui: &mut UiState,
    rx: &mut mpsc::Receiver<DashboardMessage>,
) -> Result<()> {
    controller.initialize();

    loop {
        // Apply settled fetch cycles before drawing
        while let Ok(msg) = rx.try_recv() {
            if controller.handle_message(msg) {
                ui.clamp(controller.state().nodes().len());
            }
        }

        terminal.draw(|f| draw_ui(f, controller.state(), ui, controller.base_url()))?;

        if !event::poll(POLL_INTERVAL)? {
            // Let spawned fetches make progress between polls
            tokio::task::yield_now().await;
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let len = controller.state().nodes().len();
        match key_action(key) {
            KeyAction::Quit => break,
            KeyAction::Refresh => {
                let cycle = controller.refresh();
                info!(cycle = cycle.value(), "refresh requested");
            }
            KeyAction::SelectNext => ui.select_next(len),
            KeyAction::SelectPrev => ui.select_prev(),
            KeyAction::SelectFirst => ui.select_first(),
            KeyAction::SelectLast => ui.select_last(len),
            KeyAction::ToggleHelp => ui.toggle_help(),
            KeyAction::None => {}
        }
    }

    Ok(())
}
