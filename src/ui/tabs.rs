// Top tab bar. The Console entry carries an unread-error badge so failures
// are visible from any tab.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Tab};

pub fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let badge = app.console.badge();

    let titles = Tab::ALL.map(|tab| {
        let mut spans = vec![Span::raw(tab.title())];
        if tab == Tab::Console {
            if let Some(badge) = &badge {
                spans.push(Span::styled(
                    format!(" {}", badge),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ));
            }
        }
        Line::from(spans)
    });

    let selected = Tab::ALL
        .iter()
        .position(|tab| *tab == app.active_tab)
        .unwrap_or(0);

    let widget = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" pulse ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    frame.render_widget(widget, area);
}
