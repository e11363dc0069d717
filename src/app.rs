// App state and main event loop.
// Manages tabs, keyboard input, fetch tasks, and the channels that carry
// results and notices back to the UI thread.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{
    ApiClient, CountryItem, DetailsData, DeviceItem, GroupBy, ListResponse, LoadingFlag,
    LtvOverviewData, LtvRow, LtvWindow, Notice, OverviewData, TimelineItem, TimelineQuery,
    endpoints,
};
use crate::cli::StartupConfig;
use crate::error::Result;
use crate::state::{
    ConsoleState, DateContext, DetailsTabState, LoadingState, LtvTabState, OverviewTabState,
};
use crate::ui;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    Details,
    Ltv,
    Console,
}

impl Tab {
    /// Display order in the tab bar.
    pub const ALL: [Tab; 4] = [Tab::Overview, Tab::Details, Tab::Ltv, Tab::Console];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Details => "Details",
            Tab::Ltv => "LTV",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Overview => Tab::Details,
            Tab::Details => Tab::Ltv,
            Tab::Ltv => Tab::Console,
            Tab::Console => Tab::Overview,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Overview => Tab::Console,
            Tab::Details => Tab::Overview,
            Tab::Ltv => Tab::Details,
            Tab::Console => Tab::Ltv,
        }
    }
}

/// Results sent back from fetch tasks. Messages carry the parameters they
/// were fetched for so stale responses can be dropped after the selection
/// changed mid-flight.
#[derive(Debug)]
pub enum DataMessage {
    Summary(Option<OverviewData>),
    Timeline {
        query: TimelineQuery,
        data: Option<ListResponse<TimelineItem>>,
    },
    Country(Option<ListResponse<CountryItem>>),
    Device(Option<ListResponse<DeviceItem>>),
    Details {
        date: NaiveDate,
        data: Option<DetailsData>,
    },
    LtvSummary(Option<LtvOverviewData>),
    LtvRows {
        group_by: Option<GroupBy>,
        window: LtvWindow,
        data: Option<ListResponse<LtvRow>>,
    },
}

/// Main application state.
pub struct App {
    pub active_tab: Tab,
    pub dates: DateContext,
    pub overview: OverviewTabState,
    pub details: DetailsTabState,
    pub ltv: LtvTabState,
    pub console: ConsoleState,
    pub show_help: bool,
    pub should_quit: bool,
    /// Raised while a foreground fetch is in flight (status bar spinner).
    pub fetching: LoadingFlag,
    client: Arc<ApiClient>,
    data_tx: UnboundedSender<DataMessage>,
    data_rx: UnboundedReceiver<DataMessage>,
    notice_rx: UnboundedReceiver<Notice>,
}

impl App {
    pub fn new(config: StartupConfig) -> Result<Self> {
        let (notice_tx, notice_rx) = mpsc::unbounded_channel();
        let (data_tx, data_rx) = mpsc::unbounded_channel();

        let base_url = ApiClient::resolve_base_url(config.api_url.clone());
        let client = Arc::new(ApiClient::new(base_url, notice_tx)?);

        Ok(Self {
            active_tab: Tab::default(),
            dates: DateContext::new(config.timeline_days, config.details_date),
            overview: OverviewTabState::new(),
            details: DetailsTabState::new(),
            ltv: LtvTabState::new(),
            console: ConsoleState::new(),
            show_help: false,
            should_quit: false,
            fetching: LoadingFlag::new(),
            client,
            data_tx,
            data_rx,
            notice_rx,
        })
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.load_overview_tab();

        while !self.should_quit {
            self.drain_channels();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Apply pending fetch results and notices without blocking.
    pub fn drain_channels(&mut self) {
        while let Ok(message) = self.data_rx.try_recv() {
            self.apply(message);
        }
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.console.push(notice);
        }
    }

    pub fn apply(&mut self, message: DataMessage) {
        match message {
            DataMessage::Summary(data) => {
                self.overview.summary = LoadingState::resolve(data);
            }
            DataMessage::Timeline { query, data } => {
                // Drop responses for a range the user has already left.
                if query == self.dates.timeline_query() {
                    self.overview.timeline = LoadingState::resolve(data);
                }
            }
            DataMessage::Country(data) => {
                self.overview.country = LoadingState::resolve(data);
            }
            DataMessage::Device(data) => {
                self.overview.device = LoadingState::resolve(data);
            }
            DataMessage::Details { date, data } => {
                if date == self.dates.selected_date {
                    self.details.data = LoadingState::resolve(data);
                }
            }
            DataMessage::LtvSummary(data) => {
                self.ltv.summary = LoadingState::resolve(data);
            }
            DataMessage::LtvRows {
                group_by,
                window,
                data,
            } => {
                if group_by == self.ltv.group_by && window == self.ltv.window {
                    self.ltv.rows = LoadingState::resolve(data);
                }
            }
        }
    }

    /// Handle keyboard events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Tab => self.switch_tab(self.active_tab.next()),
            KeyCode::BackTab => self.switch_tab(self.active_tab.prev()),
            KeyCode::Char('r') => self.refresh_active_tab(),
            _ => self.handle_tab_key(code),
        }
    }

    fn handle_tab_key(&mut self, code: KeyCode) {
        match self.active_tab {
            Tab::Overview => match code {
                KeyCode::Char('7') => self.set_range_days(7),
                KeyCode::Char('3') => self.set_range_days(30),
                KeyCode::Char('9') => self.set_range_days(90),
                _ => {}
            },
            Tab::Details => match code {
                KeyCode::Char('[') => {
                    self.dates.prev_day();
                    self.load_details_tab();
                }
                KeyCode::Char(']') => {
                    if self.dates.next_day() {
                        self.load_details_tab();
                    } else {
                        self.console
                            .push(Notice::warn("Already at the most recent day"));
                    }
                }
                _ => {}
            },
            Tab::Ltv => match code {
                KeyCode::Char('g') => {
                    self.ltv.cycle_group();
                    self.load_ltv_rows();
                }
                KeyCode::Char('w') => {
                    self.ltv.cycle_window();
                    self.load_ltv_rows();
                }
                KeyCode::Up => self.ltv.select_prev(),
                KeyCode::Down => self.ltv.select_next(),
                _ => {}
            },
            Tab::Console => match code {
                KeyCode::Up => self.console.select_prev(),
                KeyCode::Down => self.console.select_next(),
                _ => {}
            },
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        match tab {
            Tab::Overview => {
                if self.overview.is_idle() {
                    self.load_overview_tab();
                }
            }
            Tab::Details => {
                if self.details.data.is_idle() {
                    self.load_details_tab();
                }
            }
            Tab::Ltv => {
                if self.ltv.is_idle() {
                    self.load_ltv_tab();
                }
            }
            Tab::Console => self.console.mark_viewed(),
        }
    }

    fn set_range_days(&mut self, days: u32) {
        if self.dates.set_range_days(days) {
            self.overview.begin_timeline_load();
            self.load_timeline();
        }
    }

    /// Invalidate the active tab's cache entries and refetch.
    fn refresh_active_tab(&mut self) {
        match self.active_tab {
            Tab::Overview => {
                self.client.invalidate(Some(&endpoints::overview_key()));
                self.client
                    .invalidate(Some(&endpoints::timeline_key(&self.dates.timeline_query())));
                self.client.invalidate(Some(&endpoints::country_key(None)));
                self.client.invalidate(Some(&endpoints::device_key(None)));
                self.load_overview_tab();
            }
            Tab::Details => {
                self.client
                    .invalidate(Some(&endpoints::details_key(self.dates.selected_date)));
                self.load_details_tab();
            }
            Tab::Ltv => {
                self.client.invalidate(Some(&endpoints::ltv_overview_key()));
                self.client
                    .invalidate(Some(&endpoints::ltv_key(self.ltv.group_by, self.ltv.window)));
                self.load_ltv_tab();
            }
            Tab::Console => {}
        }
    }

    /// Fire the four overview requests in parallel.
    fn load_overview_tab(&mut self) {
        self.overview.begin_load();

        let client = self.client.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let data = client.overview(None).await;
            let _ = tx.send(DataMessage::Summary(data));
        });

        self.load_timeline();

        let client = self.client.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let data = client.country(None, None).await;
            let _ = tx.send(DataMessage::Country(data));
        });

        let client = self.client.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let data = client.device(None, None).await;
            let _ = tx.send(DataMessage::Device(data));
        });
    }

    fn load_timeline(&mut self) {
        let client = self.client.clone();
        let tx = self.data_tx.clone();
        let query = self.dates.timeline_query();
        let flag = self.fetching.clone();
        tokio::spawn(async move {
            let data = client.timeline(&query, Some(flag)).await;
            let _ = tx.send(DataMessage::Timeline { query, data });
        });
    }

    fn load_details_tab(&mut self) {
        self.details.begin_load();
        let client = self.client.clone();
        let tx = self.data_tx.clone();
        let date = self.dates.selected_date;
        let flag = self.fetching.clone();
        tokio::spawn(async move {
            let data = client.details(date, Some(flag)).await;
            let _ = tx.send(DataMessage::Details { date, data });
        });
    }

    fn load_ltv_tab(&mut self) {
        self.ltv.begin_load();

        let client = self.client.clone();
        let tx = self.data_tx.clone();
        tokio::spawn(async move {
            let data = client.ltv_overview(None).await;
            let _ = tx.send(DataMessage::LtvSummary(data));
        });

        self.load_ltv_rows_task();
    }

    fn load_ltv_rows(&mut self) {
        self.ltv.begin_rows_load();
        self.load_ltv_rows_task();
    }

    fn load_ltv_rows_task(&mut self) {
        let client = self.client.clone();
        let tx = self.data_tx.clone();
        let group_by = self.ltv.group_by;
        let window = self.ltv.window;
        let flag = self.fetching.clone();
        tokio::spawn(async move {
            let data = client.ltv(group_by, window, Some(flag)).await;
            let _ = tx.send(DataMessage::LtvRows {
                group_by,
                window,
                data,
            });
        });
    }
}
