use crate::app::App;
use crate::ui::styles::{error_style, notification_style};
use ratatui::{layout::Rect, text::Span, widgets::Paragraph, Frame};

/// Render the current info notification, if any
pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.notifier().info_message() else {
        return;
    };
    let style = if message.starts_with("Failed") {
        error_style()
    } else {
        notification_style()
    };
    f.render_widget(Paragraph::new(Span::styled(format!(" {}", message), style)), area);
}
