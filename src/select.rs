use crate::error::Result;
use crate::input::InputEvent;
use crate::platform::SystemTable;
use crate::registry::InterfaceRegistry;
use crossterm::event::{self, Event};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
    Terminal,
};
use std::time::Duration;

/// Label of the synthetic entry standing for "monitor everything".
pub const ALL_INTERFACES_LABEL: &str = "All interfaces";

/// Rows for the picker: the registry's interfaces in discovery order,
/// optionally preceded by the synthetic "all interfaces" entry.
pub fn build_selection_items(registry: &InterfaceRegistry, with_all: bool) -> Vec<String> {
    let mut items = Vec::with_capacity(registry.len() + 1);
    if with_all {
        items.push(ALL_INTERFACES_LABEL.to_string());
    }
    items.extend(registry.names());
    items
}

/// Maps a highlighted row back to a result: the synthetic entry becomes
/// the empty string ("all"), anything else is the interface name.
pub fn chosen_name(items: &[String], selected: usize, with_all: bool) -> String {
    if with_all && selected == 0 {
        return String::new();
    }
    items.get(selected).cloned().unwrap_or_default()
}

/// Read-only browse/select dialog over a fresh discovery pass.
///
/// Returns `None` when the user aborted, otherwise the chosen name
/// (empty string for "all interfaces"). The caller owns raw mode and the
/// alternate screen.
pub fn select_interface(table: &dyn SystemTable, with_all: bool) -> Result<Option<String>> {
    let registry = InterfaceRegistry::discover(table)?;
    let items = build_selection_items(&registry, with_all);

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut state = ListState::default();
    state.select(Some(0));

    loop {
        terminal.draw(|frame| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(3), Constraint::Length(1)])
                .split(frame.area());

            let rows: Vec<ListItem> = items
                .iter()
                .map(|name| ListItem::new(name.as_str()))
                .collect();

            let list = List::new(rows)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(" Select Interface "),
                )
                .highlight_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                );

            frame.render_stateful_widget(list, chunks[0], &mut state);

            let help = ratatui::widgets::Paragraph::new("Up/Down move  Enter select  Esc abort")
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(help, chunks[1]);
        })?;

        if !event::poll(Duration::from_millis(100))? {
            continue;
        }
        let Event::Key(key_event) = event::read()? else {
            continue;
        };

        let selected = state.selected().unwrap_or(0);
        match InputEvent::from_key_event(key_event) {
            InputEvent::ScrollTowardTail => {
                if selected + 1 < items.len() {
                    state.select(Some(selected + 1));
                }
            }
            InputEvent::ScrollTowardHead => {
                if selected > 0 {
                    state.select(Some(selected - 1));
                }
            }
            InputEvent::Select => {
                return Ok(Some(chosen_name(&items, selected, with_all)));
            }
            InputEvent::Quit => return Ok(None),
            _ => {}
        }
    }
}
