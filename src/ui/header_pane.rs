use crate::app::App;
use crate::ui::styles::{border_style, running_style, title_style, unsaved_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the header: date and clock, running task, and total time
pub fn render_header_pane(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(app.current_time.format("%Y-%m-%d %H:%M:%S").to_string(), title_style()),
        Span::raw("   "),
        Span::raw(app.total_time_label()),
    ];

    if let Some(task) = app.tasks.iter().find(|t| t.is_running()) {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(format!("▶ {}", task.description), running_style()));
    }

    let mut title = vec![Span::styled(" Work Time Tracker ", title_style())];
    if app.saves_pending() > 0 {
        title.push(Span::styled("saving… ", unsaved_style()));
    } else if app.has_unsaved_changes() {
        title.push(Span::styled("● unsaved ", unsaved_style()));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Line::from(title)),
    );
    f.render_widget(paragraph, area);
}
