// State management module.
// Handles the refresh cycle, its scheduling, and the widget state it publishes.

pub mod refresh;
pub mod scheduler;

pub use refresh::{RefreshOutcome, Refresher, Trigger, WidgetState};
pub use scheduler::{DEFAULT_INTERVAL, SchedulerHandle};
