// State management module.
// Per-tab data and selection state, the shared date context, and the
// console log.

pub mod console;
pub mod dates;
pub mod details;
pub mod loading;
pub mod ltv;
pub mod overview;

pub use console::ConsoleState;
pub use dates::DateContext;
pub use details::DetailsTabState;
pub use loading::LoadingState;
pub use ltv::LtvTabState;
pub use overview::OverviewTabState;
