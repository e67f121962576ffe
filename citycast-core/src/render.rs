//! Render seam: the core emits plain data plus a lifecycle signal and never
//! inspects presentation state back.

use crate::model::{CurrentConditions, DailyForecast};

/// One render instruction handed to the presentation layer.
#[derive(Debug, Clone)]
pub enum RenderPayload {
    /// First-run greeting when no last city is known.
    Welcome,
    /// A lookup for `city` is in flight.
    Loading { city: String },
    /// A lookup settled with data.
    Success {
        current: CurrentConditions,
        days: Vec<DailyForecast>,
    },
    /// A lookup failed; `message` is already user-facing.
    Failure { message: String },
    /// The recency list changed; `names` is most-recent-first.
    RecentList { names: Vec<String> },
}

/// External rendering collaborator.
pub trait RenderSink {
    /// Turn one payload into visible output. May fail (broken pipe, UI
    /// teardown); the session controller still restores interactive state.
    fn render(&mut self, payload: RenderPayload) -> anyhow::Result<()>;

    /// Toggle the submit affordance while a lookup is in flight.
    fn set_input_enabled(&mut self, enabled: bool);
}
