// Metric summary cards: a row of boxed headline numbers.

use ratatui::{prelude::*, widgets::*};

/// One headline metric.
pub struct MetricCard {
    pub label: &'static str,
    pub value: String,
    pub color: Color,
}

impl MetricCard {
    pub fn new(label: &'static str, value: String, color: Color) -> Self {
        Self {
            label,
            value,
            color,
        }
    }
}

/// Render a row of equally-sized metric cards.
pub fn draw_cards(frame: &mut Frame, cards: &[MetricCard], area: Rect) {
    if cards.is_empty() {
        return;
    }

    let constraints: Vec<Constraint> = cards
        .iter()
        .map(|_| Constraint::Ratio(1, cards.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, chunk) in cards.iter().zip(chunks.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", card.label));

        let value = Paragraph::new(card.value.clone())
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(card.color)
                    .add_modifier(Modifier::BOLD),
            )
            .block(block);

        frame.render_widget(value, *chunk);
    }
}
