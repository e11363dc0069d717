// UI module for rendering the TUI.
// Tab bar, metric cards, timeline chart, breakdown bars/tables, LTV table,
// console log, status bar, and help overlay.

mod cards;
mod charts;
mod format;
mod tables;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::api::NoticeLevel;
use crate::app::{App, Tab};
use crate::state::LoadingState;

use cards::MetricCard;
use format::{format_count, format_money, format_relative_time};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);

    match app.active_tab {
        Tab::Overview => draw_overview_tab(frame, app, chunks[1]),
        Tab::Details => draw_details_tab(frame, app, chunks[1]),
        Tab::Ltv => draw_ltv_tab(frame, app, chunks[1]),
        Tab::Console => draw_console_tab(frame, app, chunks[1]),
    }

    draw_status_bar(frame, app, chunks[2]);

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Render a loading indicator.
fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

/// Render a placeholder for data that could not be fetched.
fn render_unavailable(frame: &mut Frame, area: Rect) {
    let text = Paragraph::new("No data (see Console)")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(text, area);
}

/// Draw the Overview tab: cards, timeline chart, and the two breakdowns.
fn draw_overview_tab(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Summary cards
            Constraint::Min(8),     // Timeline chart
            Constraint::Length(12), // Breakdowns
        ])
        .split(area);

    match &app.overview.summary {
        LoadingState::Loaded(summary) => {
            let cards = [
                MetricCard::new("Users", format_count(summary.user_count), Color::Cyan),
                MetricCard::new("Events", format_count(summary.event_count), Color::Magenta),
                MetricCard::new("Devices", format_count(summary.device_count), Color::Blue),
                MetricCard::new("Revenue", format_money(summary.total_revenue), Color::Green),
            ];
            cards::draw_cards(frame, &cards, chunks[0]);
        }
        LoadingState::Loading | LoadingState::Idle => {
            render_loading(frame, chunks[0], "Loading summary");
        }
        LoadingState::Unavailable => render_unavailable(frame, chunks[0]),
    }

    match &app.overview.timeline {
        LoadingState::Loaded(timeline) => {
            charts::draw_timeline(frame, &timeline.items, app.dates.range_days, chunks[1]);
        }
        LoadingState::Loading | LoadingState::Idle => {
            render_loading(frame, chunks[1], "Loading timeline");
        }
        LoadingState::Unavailable => render_unavailable(frame, chunks[1]),
    }

    let breakdowns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[2]);

    match &app.overview.country {
        LoadingState::Loaded(country) => {
            let rows: Vec<(String, f64)> = country
                .items
                .iter()
                .map(|item| (item.country.clone(), item.revenue))
                .collect();
            charts::draw_revenue_bars(
                frame,
                "Revenue by country",
                &rows,
                Color::Cyan,
                breakdowns[0],
            );
        }
        LoadingState::Loading | LoadingState::Idle => {
            render_loading(frame, breakdowns[0], "Loading countries");
        }
        LoadingState::Unavailable => render_unavailable(frame, breakdowns[0]),
    }

    match &app.overview.device {
        LoadingState::Loaded(device) => {
            let rows: Vec<(String, f64)> = device
                .items
                .iter()
                .map(|item| (item.device.clone(), item.revenue))
                .collect();
            charts::draw_revenue_bars(
                frame,
                "Revenue by device",
                &rows,
                Color::Magenta,
                breakdowns[1],
            );
        }
        LoadingState::Loading | LoadingState::Idle => {
            render_loading(frame, breakdowns[1], "Loading devices");
        }
        LoadingState::Unavailable => render_unavailable(frame, breakdowns[1]),
    }
}

/// Draw the Details tab: one day broken down by country and device.
fn draw_details_tab(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let header = match app.details.data.data() {
        Some(details) => Line::from(vec![
            Span::styled(
                format!(" {} ", app.dates.selected_date),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  Revenue: "),
            Span::styled(
                format_money(details.total_revenue),
                Style::default().fg(Color::Green),
            ),
        ]),
        None => Line::from(vec![
            Span::styled(
                format!(" {} ", app.dates.selected_date),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  [ and ] change the day", Style::default().fg(Color::DarkGray)),
        ]),
    };
    let header_widget = Paragraph::new(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Day details "),
    );
    frame.render_widget(header_widget, chunks[0]);

    match &app.details.data {
        LoadingState::Loaded(details) => {
            let halves = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[1]);

            let countries: Vec<(String, u64)> = details
                .countries
                .iter()
                .map(|row| (row.country.clone(), row.users))
                .collect();
            tables::draw_users_table(frame, "Users by country", &countries, Color::Cyan, halves[0]);

            let devices: Vec<(String, u64)> = details
                .devices
                .iter()
                .map(|row| (row.device.clone(), row.users))
                .collect();
            tables::draw_users_table(frame, "Users by device", &devices, Color::Magenta, halves[1]);
        }
        LoadingState::Loading | LoadingState::Idle => {
            render_loading(frame, chunks[1], "Loading day details");
        }
        LoadingState::Unavailable => render_unavailable(frame, chunks[1]),
    }
}

/// Draw the LTV tab: summary cards and the grouped rows table.
fn draw_ltv_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    match &app.ltv.summary {
        LoadingState::Loaded(summary) => {
            let window = app.ltv.window;
            let cards = [
                MetricCard::new("Users", format_count(summary.user_count), Color::Cyan),
                MetricCard::new(
                    "Paying users",
                    format_count(summary.paying_user_count),
                    Color::Blue,
                ),
                MetricCard::new(
                    "Avg LTV (focused window)",
                    format_money(summary.avg.value(window)),
                    Color::Yellow,
                ),
                MetricCard::new("Avg LTV (total)", format_money(summary.avg.ltv_total), Color::Green),
            ];
            cards::draw_cards(frame, &cards, chunks[0]);
        }
        LoadingState::Loading | LoadingState::Idle => {
            render_loading(frame, chunks[0], "Loading LTV summary");
        }
        LoadingState::Unavailable => render_unavailable(frame, chunks[0]),
    }

    // Window and label are read out first so the table state can be
    // borrowed mutably alongside the rows.
    let window = app.ltv.window;
    let group_label = app.ltv.group_label();
    match &app.ltv.rows {
        LoadingState::Loaded(rows) => {
            let items = rows.items.clone();
            tables::draw_ltv_table(
                frame,
                window,
                group_label,
                &items,
                &mut app.ltv.table,
                chunks[1],
            );
        }
        LoadingState::Loading | LoadingState::Idle => {
            render_loading(frame, chunks[1], "Loading LTV rows");
        }
        LoadingState::Unavailable => render_unavailable(frame, chunks[1]),
    }
}

/// Draw the Console tab with the notice log.
fn draw_console_tab(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if app.console.messages.is_empty() {
        let text = Paragraph::new("No messages")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(text, area);
        return;
    }

    let items: Vec<ListItem> = app
        .console
        .messages
        .iter()
        .map(|msg| {
            let (icon, color) = match msg.level {
                NoticeLevel::Error => ("❌", Color::Red),
                NoticeLevel::Warn => ("⚠️", Color::Yellow),
                NoticeLevel::Info => ("ℹ️", Color::Cyan),
            };

            let time = format_relative_time(&msg.timestamp);

            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(time, Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(msg.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut app.console.list_state);
}

/// Draw the status bar with keybinding hints and the backend address.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" Tab "),
        Span::styled("Switch", Style::default().fg(Color::DarkGray)),
        Span::raw("  r "),
        Span::styled("Refresh", Style::default().fg(Color::DarkGray)),
    ];

    match app.active_tab {
        Tab::Overview => {
            hints.push(Span::raw("  7/3/9 "));
            hints.push(Span::styled("Range", Style::default().fg(Color::DarkGray)));
        }
        Tab::Details => {
            hints.push(Span::raw("  [ ] "));
            hints.push(Span::styled("Day", Style::default().fg(Color::DarkGray)));
        }
        Tab::Ltv => {
            hints.push(Span::raw("  g "));
            hints.push(Span::styled("Group", Style::default().fg(Color::DarkGray)));
            hints.push(Span::raw("  w "));
            hints.push(Span::styled("Window", Style::default().fg(Color::DarkGray)));
        }
        Tab::Console => {
            hints.push(Span::raw("  ↑↓ "));
            hints.push(Span::styled("Scroll", Style::default().fg(Color::DarkGray)));
        }
    }

    hints.push(Span::raw("  ? "));
    hints.push(Span::styled("Help", Style::default().fg(Color::DarkGray)));
    hints.push(Span::raw("  q "));
    hints.push(Span::styled("Quit", Style::default().fg(Color::DarkGray)));

    if app.fetching.is_loading() {
        hints.push(Span::styled("  ⟳ fetching", Style::default().fg(Color::Yellow)));
    }

    hints.push(Span::styled(
        format!("  {}", app.base_url()),
        Style::default().fg(Color::DarkGray),
    ));

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    let popup_width = 52;
    let popup_height = 16;
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Tab/Shift+Tab ", Style::default().fg(Color::Cyan)),
            Span::raw("Switch tabs"),
        ]),
        Line::from(vec![
            Span::styled("  r             ", Style::default().fg(Color::Cyan)),
            Span::raw("Refresh current tab (drops cache)"),
        ]),
        Line::from(vec![
            Span::styled("  7 / 3 / 9     ", Style::default().fg(Color::Cyan)),
            Span::raw("Timeline range 7/30/90 days"),
        ]),
        Line::from(vec![
            Span::styled("  [ / ]         ", Style::default().fg(Color::Cyan)),
            Span::raw("Previous/next day (Details)"),
        ]),
        Line::from(vec![
            Span::styled("  g             ", Style::default().fg(Color::Cyan)),
            Span::raw("Cycle LTV grouping"),
        ]),
        Line::from(vec![
            Span::styled("  w             ", Style::default().fg(Color::Cyan)),
            Span::raw("Cycle LTV window"),
        ]),
        Line::from(vec![
            Span::styled("  ↑/↓           ", Style::default().fg(Color::Cyan)),
            Span::raw("Move table/console selection"),
        ]),
        Line::from(vec![
            Span::styled("  ?             ", Style::default().fg(Color::Cyan)),
            Span::raw("Show/hide this help"),
        ]),
        Line::from(vec![
            Span::styled("  q             ", Style::default().fg(Color::Cyan)),
            Span::raw("Quit"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
