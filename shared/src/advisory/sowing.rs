//! Sowing-window advisory

use chrono::Month;

use super::thresholds::SowingCalendar;
use crate::models::{Severity, SowingAdvisory, SowingStatus};
use crate::types::Crop;

/// Classify `month` against a sowing set.
///
/// Months are compared as integers 1 to 12. The next window is the smallest
/// member strictly greater than `month`; with none left this year the cycle
/// wraps to the smallest member of the following year.
pub fn sowing_status<'a>(
    months: impl IntoIterator<Item = &'a u32>,
    month: u32,
    year: i32,
) -> Option<SowingStatus> {
    let mut sorted: Vec<u32> = months.into_iter().copied().collect();
    sorted.sort_unstable();
    sorted.dedup();
    let first = *sorted.first()?;

    if sorted.contains(&month) {
        return Some(SowingStatus::InWindow);
    }

    let status = match sorted.iter().find(|m| **m > month) {
        Some(next) => SowingStatus::UpcomingWindow {
            next_month: *next,
            next_year: year,
        },
        None => SowingStatus::WrapsToNextYear {
            next_month: first,
            next_year: year + 1,
        },
    };
    Some(status)
}

/// Sowing advisory for `crop` in the given month
pub fn sowing_advisory(
    calendar: &SowingCalendar,
    crop: Crop,
    month: u32,
    year: i32,
) -> SowingAdvisory {
    let sowing_months: Vec<u32> = calendar.months(crop).iter().copied().collect();
    // A calendar always holds at least one month per crop
    let status = sowing_status(&sowing_months, month, year).unwrap_or(SowingStatus::InWindow);

    let (severity, message) = match status {
        SowingStatus::InWindow => (
            Severity::Info,
            format!(
                "This month ({} {}) is suitable for sowing {}.",
                month_name(month),
                year,
                crop
            ),
        ),
        SowingStatus::UpcomingWindow {
            next_month,
            next_year,
        } => (
            Severity::Warning,
            format!(
                "Not sowing season now. Next sowing for {} in: {} {}.",
                crop,
                month_name(next_month),
                next_year
            ),
        ),
        SowingStatus::WrapsToNextYear {
            next_month,
            next_year,
        } => (
            Severity::Critical,
            format!(
                "Not sowing season now. Next sowing for {} will be in: {} {}.",
                crop,
                month_name(next_month),
                next_year
            ),
        ),
    };

    SowingAdvisory {
        crop,
        month,
        year,
        sowing_months,
        status,
        severity,
        message,
    }
}

/// English month name for 1 to 12
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("Unknown")
}
