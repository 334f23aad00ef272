use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub header_area: Rect,
    pub list_area: Rect,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Header: clock and total (3 rows)
/// - Task list (rest)
/// - Status line: notifications (1 row)
pub fn create_layout(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Task list
            Constraint::Length(1), // Status line
        ])
        .split(area);

    MainLayout {
        keybindings_area: chunks[0],
        header_area: chunks[1],
        list_area: chunks[2],
        status_area: chunks[3],
    }
}

/// Create centered modal area (for confirmations)
pub fn create_modal_area(area: Rect) -> Rect {
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(7),
            Constraint::Percentage(30),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(50),
            Constraint::Percentage(25),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
