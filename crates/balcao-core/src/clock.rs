//! # Clock
//!
//! Timestamp factories. The repositories call these when a record is
//! created or updated; the entities never read the clock on their own.
//!
//! ## Sale Time
//! ```text
//! Utc::now()             2026-10-16T15:04:05Z
//!      │  localize to UTC, convert to America/Sao_Paulo
//!      ▼
//! 2026-10-16T12:04:05-03:00
//!      │  drop the offset
//!      ▼
//! 2026-10-16T12:04:05    (naive, reads as Brazil wall clock)
//! ```

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Zone used to stamp sales unless configured otherwise.
pub const SALE_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

/// Current UTC instant. Used for note timestamps.
#[inline]
pub fn utc_now() -> DateTime<Utc> {
    Utc::now()
}

/// Converts a UTC instant to the civil time of `tz` with the offset removed.
pub fn civil_time(instant: DateTime<Utc>, tz: Tz) -> NaiveDateTime {
    instant.with_timezone(&tz).naive_local()
}

/// Sale time for a sale opened right now in `tz`.
pub fn sale_time_now_in(tz: Tz) -> NaiveDateTime {
    civil_time(Utc::now(), tz)
}

/// Sale time for a sale opened right now in São Paulo.
pub fn sale_time_now() -> NaiveDateTime {
    sale_time_now_in(SALE_TIMEZONE)
}

// =============================================================================
// Unit Tests
// =============================================================================
