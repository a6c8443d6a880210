//! # Summary Commands
//!
//! Read-only projections: the daily summary panel and the whole screen.

use agro_core::{project_summary, DailySummary, RegisterView, SummaryView};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::debug;

use crate::state::Register;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    /// Raw figures
    pub summary: DailySummary,
    /// Display labels
    pub view: SummaryView,
}

/// Today's revenue, most sold item and item count.
pub fn get_summary<Tz: TimeZone>(register: &Register, now: &DateTime<Tz>) -> SummaryResponse {
    debug!("get_summary command");

    let summary = register.summary(now);
    SummaryResponse {
        view: project_summary(summary.clone(), register.money()),
        summary,
    }
}

/// Everything the counter screen shows (menu, cart, summary).
pub fn get_view<Tz: TimeZone>(register: &Register, now: &DateTime<Tz>) -> RegisterView {
    debug!("get_view command");
    register.view(now)
}
