use crate::app::App;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the pending yes/no confirmation
pub fn render_confirmation_modal(f: &mut Frame, app: &App, area: Rect) {
    let Some(message) = app.notifier().confirmation_message() else {
        return;
    };
    let modal_area = create_modal_area(area);

    // Clear the area behind the modal
    f.render_widget(Clear, modal_area);

    let lines = vec![
        Line::raw(""),
        Line::raw(format!("  {}", message)),
        Line::raw(""),
        Line::from(vec![
            Span::styled("  [y]", modal_title_style()),
            Span::raw(" Yes  "),
            Span::styled("[n]", modal_title_style()),
            Span::raw(" No"),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Confirm ", modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
