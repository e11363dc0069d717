// Console tab state: the notice log emitted by the API client, with an
// unread-error badge for the tab bar.

use ratatui::widgets::ListState;

use crate::api::{Notice, NoticeLevel};

#[derive(Debug, Default)]
pub struct ConsoleState {
    pub messages: Vec<Notice>,
    pub list_state: ListState,
    /// Errors arrived since the console was last viewed.
    pub unread_errors: usize,
}

impl ConsoleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, notice: Notice) {
        if notice.level == NoticeLevel::Error {
            self.unread_errors += 1;
        }
        self.messages.push(notice);
        self.scroll_to_bottom();
    }

    pub fn mark_viewed(&mut self) {
        self.unread_errors = 0;
    }

    /// Tab-bar badge text while errors are pending, e.g. "(2)".
    pub fn badge(&self) -> Option<String> {
        (self.unread_errors > 0).then(|| format!("({})", self.unread_errors))
    }

    fn scroll_to_bottom(&mut self) {
        if !self.messages.is_empty() {
            self.list_state.select(Some(self.messages.len() - 1));
        }
    }

    pub fn select_prev(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => self.messages.len() - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.messages.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(i));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_errors_count_as_unread() {
        let mut console = ConsoleState::new();
        console.push(Notice::info("retrying (1/2)"));
        console.push(Notice::error("Server internal error"));
        console.push(Notice::error("Resource not found"));
        assert_eq!(console.unread_errors, 2);

        console.mark_viewed();
        assert_eq!(console.unread_errors, 0);
    }

    #[test]
    fn test_badge_tracks_unread_errors() {
        let mut console = ConsoleState::new();
        assert_eq!(console.badge(), None);

        console.push(Notice::error("boom"));
        console.push(Notice::error("boom again"));
        assert_eq!(console.badge().as_deref(), Some("(2)"));

        console.mark_viewed();
        assert_eq!(console.badge(), None);
    }

    #[test]
    fn test_push_follows_tail() {
        let mut console = ConsoleState::new();
        console.push(Notice::info("a"));
        console.push(Notice::info("b"));
        assert_eq!(console.list_state.selected(), Some(1));
    }
}
