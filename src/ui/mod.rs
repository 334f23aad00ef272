pub mod header_pane;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod status_bar;
pub mod styles;

use crate::app::App;
use crate::notifications::NotificationState;
use header_pane::render_header_pane;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_confirmation_modal;
use ratatui::Frame;
use status_bar::render_status_bar;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &App) {
    let size = f.size();
    let layout = create_layout(size);
    let confirming = matches!(app.notifier().state(), NotificationState::ShowingConfirm(_));

    render_keybindings(f, layout.keybindings_area, app.ui_mode, confirming);
    render_header_pane(f, app, layout.header_area);
    render_list_pane(f, app, layout.list_area);
    render_status_bar(f, app, layout.status_area);

    if confirming {
        render_confirmation_modal(f, app, size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::persistence::{JsonTaskRepository, PersistenceService};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;
    use tempfile::tempdir;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_render_tasks_and_confirmation() {
        let dir = tempdir().unwrap();
        let persistence = PersistenceService::new(JsonTaskRepository::new(dir.path()), dir.path());
        let mut app = App::new(Config::default(), persistence);
        let now = Instant::now();
        app.add_task("Review", now);

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Review"));
        assert!(text.contains("Total Time: 00:00:00"));
        assert!(text.contains(&app.current_time.format("%Y-%m-%d").to_string()));
        assert!(text.contains("Task added."));

        app.request_clear_all();
        terminal.draw(|f| render(f, &app)).unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Confirm reset all timers?"));
    }
}
