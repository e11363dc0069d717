// Details tab state: the single-day breakdown for the selected date.

use crate::api::DetailsData;

use super::loading::LoadingState;

#[derive(Debug, Default)]
pub struct DetailsTabState {
    pub data: LoadingState<DetailsData>,
}

impl DetailsTabState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_load(&mut self) {
        self.data = LoadingState::Loading;
    }
}
