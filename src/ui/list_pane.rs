use crate::app::App;
use crate::domain::{format_hms, status_badge, TaskTimer, UiMode};
use crate::ui::styles::{
    border_style, default_style, editing_style, running_style, selected_style, stopped_style,
    title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(format!(" Tasks ({}) ", app.tasks.len()), title_style()));

    if app.tasks.is_empty() {
        let empty = Paragraph::new("No tasks yet. Press 'a' to add one.").block(block);
        f.render_widget(empty, area);
        return;
    }

    let editing = app.ui_mode == UiMode::EditingDescription;
    let items: Vec<ListItem> = app
        .tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let selected = idx == app.selected_index;
            let line = create_task_line(idx + 1, task, selected && editing);
            let style = if selected && !editing {
                selected_style()
            } else {
                default_style()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    // Scroll so the selected row stays on screen
    let mut state = ListState::default().with_selected(Some(app.selected_index));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

/// Create a single line for a task
/// Format: 1. ⏱ RUNNING  01:02:03  Write proposal
fn create_task_line(number: usize, task: &TaskTimer, editing: bool) -> Line<'static> {
    let mut spans = Vec::new();

    spans.push(Span::raw(format!("{:>2}. ", number)));

    let badge_style = if task.is_running() {
        running_style()
    } else {
        stopped_style()
    };
    spans.push(Span::styled(status_badge(task).to_string(), badge_style));
    spans.push(Span::raw(format!("  {}  ", format_hms(task.elapsed()))));

    if editing {
        let marker = if task.has_pending_edit() { "✎ " } else { "" };
        spans.push(Span::raw(marker.to_string()));
        spans.push(Span::styled(format!("{}▏", task.description), editing_style()));
    } else if task.description.is_empty() {
        spans.push(Span::styled("(no description)".to_string(), stopped_style()));
    } else {
        spans.push(Span::raw(task.description.clone()));
    }

    Line::from(spans)
}
