// LTV tab state: summary windows plus grouped rows, with keyboard-driven
// grouping and window focus.

use ratatui::widgets::TableState;

use crate::api::{GroupBy, ListResponse, LtvOverviewData, LtvRow, LtvWindow};

use super::loading::LoadingState;

#[derive(Debug, Default)]
pub struct LtvTabState {
    /// Grouping dimension; `None` asks the backend for the aggregate row.
    pub group_by: Option<GroupBy>,
    /// Window highlighted in the rows table.
    pub window: LtvWindow,
    pub summary: LoadingState<LtvOverviewData>,
    pub rows: LoadingState<ListResponse<LtvRow>>,
    pub table: TableState,
}

impl LtvTabState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.summary.is_idle() && self.rows.is_idle()
    }

    pub fn begin_load(&mut self) {
        self.summary = LoadingState::Loading;
        self.rows = LoadingState::Loading;
    }

    pub fn begin_rows_load(&mut self) {
        self.rows = LoadingState::Loading;
        self.table.select(None);
    }

    /// Cycle grouping: aggregate -> country -> device -> date -> aggregate.
    pub fn cycle_group(&mut self) {
        self.group_by = match self.group_by {
            None => Some(GroupBy::Country),
            Some(GroupBy::Country) => Some(GroupBy::Device),
            Some(GroupBy::Device) => Some(GroupBy::Date),
            Some(GroupBy::Date) => None,
        };
    }

    pub fn cycle_window(&mut self) {
        self.window = self.window.next();
    }

    pub fn group_label(&self) -> &'static str {
        match self.group_by {
            Some(group) => group.label(),
            None => "All users",
        }
    }

    fn row_count(&self) -> usize {
        self.rows.data().map(|rows| rows.items.len()).unwrap_or(0)
    }

    pub fn select_next(&mut self) {
        let count = self.row_count();
        if count == 0 {
            return;
        }
        let i = match self.table.selected() {
            Some(i) if i + 1 < count => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table.select(Some(i));
    }

    pub fn select_prev(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        let i = match self.table.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.table.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_group_covers_all_dimensions() {
        let mut state = LtvTabState::new();
        assert_eq!(state.group_by, None);
        state.cycle_group();
        assert_eq!(state.group_by, Some(GroupBy::Country));
        state.cycle_group();
        assert_eq!(state.group_by, Some(GroupBy::Device));
        state.cycle_group();
        assert_eq!(state.group_by, Some(GroupBy::Date));
        state.cycle_group();
        assert_eq!(state.group_by, None);
    }

    #[test]
    fn test_cycle_window_wraps() {
        let mut state = LtvTabState::new();
        assert_eq!(state.window, LtvWindow::D30);
        for _ in 0..LtvWindow::ALL.len() {
            state.cycle_window();
        }
        assert_eq!(state.window, LtvWindow::D30);
    }

    #[test]
    fn test_selection_ignores_empty_rows() {
        let mut state = LtvTabState::new();
        state.select_next();
        assert_eq!(state.table.selected(), None);
    }
}
