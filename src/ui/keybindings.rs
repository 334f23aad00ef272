use crate::domain::UiMode;
use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect, mode: UiMode, confirming: bool) {
    let hints = if confirming {
        Line::from(vec![Span::raw(" y confirm   "), Span::raw("n/Esc cancel")])
    } else {
        match mode {
            UiMode::EditingDescription => Line::from(vec![
                Span::raw(" type to edit   "),
                Span::raw("Backspace delete   "),
                Span::raw("Enter/Esc done"),
            ]),
            UiMode::Normal => Line::from(vec![
                Span::raw(" ↑/↓ select   "),
                Span::raw("Enter start/stop   "),
                Span::raw("+ / - adjust   "),
                Span::raw("a add   "),
                Span::raw("e edit   "),
                Span::raw("x delete   "),
                Span::raw("c reset all   "),
                Span::raw("s save   "),
                Span::raw("l load   "),
                Span::raw("w export   "),
                Span::raw("q quit"),
            ]),
        }
    };

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
