use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display status of an event, always derived from its dates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Ongoing,
    Past,
}

impl EventStatus {
    /// Status of an event at instant `now`.
    ///
    /// An event without an end date is a single-day event: it is ongoing for
    /// the rest of its start day (UTC) and past afterwards.
    pub fn at(start: DateTime<Utc>, end: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        if now < start {
            return Self::Upcoming;
        }
        match end {
            Some(end) if now > end => Self::Past,
            Some(_) => Self::Ongoing,
            None if start.date_naive() < now.date_naive() => Self::Past,
            None => Self::Ongoing,
        }
    }

    pub fn is_current_or_future(&self) -> bool {
        !matches!(self, Self::Past)
    }
}
