// Chart rendering for the timeline and the breakdown bars.

use ratatui::{prelude::*, widgets::*};

use crate::api::TimelineItem;

use super::format::format_count;

/// Draw the daily users/events chart for the selected range.
/// The backend returns days newest-first, so the series is reversed into
/// chronological order before plotting.
pub fn draw_timeline(frame: &mut Frame, items: &[TimelineItem], range_days: u32, area: Rect) {
    let ordered: Vec<&TimelineItem> = items.iter().rev().collect();

    let users: Vec<(f64, f64)> = ordered
        .iter()
        .enumerate()
        .map(|(i, item)| (i as f64, item.user_count as f64))
        .collect();
    let events: Vec<(f64, f64)> = ordered
        .iter()
        .enumerate()
        .map(|(i, item)| (i as f64, item.event_count as f64))
        .collect();

    let max_y = ordered
        .iter()
        .map(|item| item.user_count.max(item.event_count))
        .max()
        .unwrap_or(1)
        .max(1) as f64;
    let max_x = (ordered.len().saturating_sub(1)).max(1) as f64;

    let x_labels: Vec<Span> = match (ordered.first(), ordered.last()) {
        (Some(first), Some(last)) => vec![
            Span::styled(first.date.clone(), Style::default().fg(Color::DarkGray)),
            Span::styled(last.date.clone(), Style::default().fg(Color::DarkGray)),
        ],
        _ => Vec::new(),
    };

    let datasets = vec![
        Dataset::default()
            .name("Users")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&users),
        Dataset::default()
            .name("Events")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&events),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Timeline (last {} days) ", range_days)),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, max_x])
                .labels(x_labels)
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, max_y])
                .labels(vec![
                    Span::styled("0", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format_count(max_y as u64),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}

/// Draw a horizontal-bar style revenue breakdown (top groups only).
pub fn draw_revenue_bars(
    frame: &mut Frame,
    title: &str,
    rows: &[(String, f64)],
    color: Color,
    area: Rect,
) {
    let visible = rows.len().min(8);
    let data: Vec<(&str, u64)> = rows[..visible]
        .iter()
        .map(|(label, revenue)| (label.as_str(), revenue.round() as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        )
        .data(&data)
        .bar_width(7)
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(chart, area);
}
