// Overview tab state: the summary cards, the timeline series, and the two
// breakdowns for the selected range.

use crate::api::{CountryItem, DeviceItem, ListResponse, OverviewData, TimelineItem};

use super::loading::LoadingState;

#[derive(Debug, Default)]
pub struct OverviewTabState {
    pub summary: LoadingState<OverviewData>,
    pub timeline: LoadingState<ListResponse<TimelineItem>>,
    pub country: LoadingState<ListResponse<CountryItem>>,
    pub device: LoadingState<ListResponse<DeviceItem>>,
}

impl OverviewTabState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been requested yet for this tab.
    pub fn is_idle(&self) -> bool {
        self.summary.is_idle()
            && self.timeline.is_idle()
            && self.country.is_idle()
            && self.device.is_idle()
    }

    /// Mark everything as in flight before a (re)load.
    pub fn begin_load(&mut self) {
        self.summary = LoadingState::Loading;
        self.timeline = LoadingState::Loading;
        self.country = LoadingState::Loading;
        self.device = LoadingState::Loading;
    }

    /// Drop the timeline ahead of a range change so the chart shows a
    /// loading state instead of the stale range.
    pub fn begin_timeline_load(&mut self) {
        self.timeline = LoadingState::Loading;
    }
}
