// Table rendering for breakdown rows and LTV groups.

use ratatui::{prelude::*, widgets::*};

use crate::api::{LtvRow, LtvWindow};

use super::format::{format_count, format_money};

/// Render a two-column users-per-group table (Details tab).
pub fn draw_users_table(
    frame: &mut Frame,
    title: &str,
    rows: &[(String, u64)],
    color: Color,
    area: Rect,
) {
    let header = Row::new(vec!["Group", "Users"]).style(
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let body: Vec<Row> = rows
        .iter()
        .map(|(label, users)| {
            Row::new(vec![
                Cell::from(label.clone()).style(Style::default().fg(color)),
                Cell::from(format_count(*users)),
            ])
        })
        .collect();

    let table = Table::new(
        body,
        [Constraint::Percentage(60), Constraint::Percentage(40)],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", title)),
    );

    frame.render_widget(table, area);
}

/// Render the grouped LTV table with the focused window highlighted.
/// The table state is split out so the rows can be borrowed from the same
/// tab state at the call site.
pub fn draw_ltv_table(
    frame: &mut Frame,
    focused: LtvWindow,
    group_label: &str,
    rows: &[LtvRow],
    table_state: &mut TableState,
    area: Rect,
) {
    let mut header_cells = vec![Cell::from("Group"), Cell::from("Users")];
    for window in LtvWindow::ALL {
        let style = if window == focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        header_cells.push(Cell::from(window.label()).style(style));
    }
    let header = Row::new(header_cells).style(Style::default().add_modifier(Modifier::BOLD));

    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                Cell::from(row.group.clone()).style(Style::default().fg(Color::Cyan)),
                Cell::from(format_count(row.users)),
            ];
            for window in LtvWindow::ALL {
                let style = if window == focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                cells.push(Cell::from(format_money(row.windows.value(window))).style(style));
            }
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Min(12), Constraint::Length(9)];
    widths.extend(LtvWindow::ALL.iter().map(|_| Constraint::Length(10)));

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " LTV by {} ({} rows) ",
            group_label,
            rows.len()
        )))
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, table_state);
}
