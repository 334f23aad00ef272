use crate::app::App;
use crate::domain::UiMode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

/// Handle one key press. Returns true when the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent, now: Instant) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    // A pending yes/no prompt takes every key until answered
    if app.notifier().is_confirming() {
        handle_confirm_mode(app, key, now);
        return false;
    }

    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key, now),
        UiMode::EditingDescription => {
            handle_editing_mode(app, key);
            false
        }
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut App, key: KeyEvent, now: Instant) -> bool {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Start/stop the selected timer
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(now),

        // Manual correction by one step
        KeyCode::Char('+') | KeyCode::Char('=') => app.adjust_selected(true, now),
        KeyCode::Char('-') | KeyCode::Char('_') => app.adjust_selected(false, now),

        // New task, straight into typing its description
        KeyCode::Char('a') | KeyCode::Char('A') => {
            app.add_task("", now);
            app.begin_edit();
        }
        KeyCode::Char('e') | KeyCode::Char('E') => app.begin_edit(),

        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.request_remove_selected(),
        KeyCode::Char('c') | KeyCode::Char('C') => app.request_clear_all(),

        KeyCode::Char('s') | KeyCode::Char('S') => app.save_in_background(now),
        KeyCode::Char('l') | KeyCode::Char('L') => app.request_load(now),
        KeyCode::Char('w') | KeyCode::Char('W') => app.export_report(now),

        KeyCode::Char('q') | KeyCode::Char('Q') => return true,

        _ => {}
    }
    false
}

/// Handle keys while a confirmation is showing
fn handle_confirm_mode(app: &mut App, key: KeyEvent, now: Instant) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm(now),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel(now),
        _ => {}
    }
}

/// Handle keys while typing a description
fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        // Leaving the field commits the edit
        KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => app.finish_edit(),
        KeyCode::Backspace => app.edit_pop(),
        KeyCode::Char(c) => app.edit_push(c),
        _ => {}
    }
}
