//! Keyboard input handling

use adlens_core::View;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, AppResult, InputMode, StatusLevel};

/// Handle a key event
pub async fn handle_key(app: &mut App, key: KeyEvent) -> AppResult {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return AppResult::Quit;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key).await,
        InputMode::Command => handle_command_mode(app, key),
    }
}

async fn handle_normal_mode(app: &mut App, key: KeyEvent) -> AppResult {
    match key.code {
        KeyCode::Char('q') => return AppResult::Quit,

        // Views
        KeyCode::Char('1') => app.navigate(View::Index),
        KeyCode::Char('2') => app.navigate(View::History),
        KeyCode::Char('3') => app.navigate(View::Profile),
        KeyCode::Tab => app.next_view(),

        // History categories
        KeyCode::Char('j') | KeyCode::Down if app.current_view() == View::History => {
            app.category_down();
        }
        KeyCode::Char('k') | KeyCode::Up if app.current_view() == View::History => {
            app.category_up();
        }

        // Session
        KeyCode::Char('r') => {
            app.set_status("Checking session...", StatusLevel::Info);
            app.check_session().await;
        }
        KeyCode::Char('s') => app.select_profile_account(),
        KeyCode::Char('L') => app.logout(),

        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }

        KeyCode::Esc => app.clear_status(),

        KeyCode::Char('?') => {
            app.set_status(
                "1/2/3:view Tab:next r:recheck s:select account L:logout ::command q:quit",
                StatusLevel::Info,
            );
        }

        _ => {}
    }

    AppResult::Continue
}

fn handle_command_mode(app: &mut App, key: KeyEvent) -> AppResult {
    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            let cmd = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            return execute_command(app, &cmd);
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }

    AppResult::Continue
}

/// Execute a command-mode command
fn execute_command(app: &mut App, cmd: &str) -> AppResult {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    match parts.first().copied() {
        Some("q") | Some("quit") => return AppResult::Quit,
        Some("go") | Some("open") => match parts.get(1) {
            Some(path) => app.navigate_path(path),
            None => app.set_status("Usage: go <path>", StatusLevel::Error),
        },
        Some("account") => match parts.get(1) {
            Some(id) => app.select_account(id),
            None => app.set_status("Usage: account <id>", StatusLevel::Error),
        },
        Some("logout") => app.logout(),
        Some(unknown) => {
            app.set_status(format!("Unknown command: {}", unknown), StatusLevel::Error);
        }
        None => {}
    }

    AppResult::Continue
}
