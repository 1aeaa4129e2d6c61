//! Monthly reporting periods.

use crate::error::CoreError;
use crate::lookup::define_lookup_enum;

/// Earliest year a report may cover.
pub const MIN_REPORT_YEAR: i32 = 2000;

/// Latest year a report may cover.
pub const MAX_REPORT_YEAR: i32 = 2100;

define_lookup_enum! {
    /// Calendar month covered by a report.
    Month (field = "month") {
        January = 1 => "JANUARY",
        February = 2 => "FEBRUARY",
        March = 3 => "MARCH",
        April = 4 => "APRIL",
        May = 5 => "MAY",
        June = 6 => "JUNE",
        July = 7 => "JULY",
        August = 8 => "AUGUST",
        September = 9 => "SEPTEMBER",
        October = 10 => "OCTOBER",
        November = 11 => "NOVEMBER",
        December = 12 => "DECEMBER",
    }
}

impl Month {
    /// Accepts a month name in any casing or a month number `1..=12`.
    pub fn resolve(input: &str) -> Result<Self, CoreError> {
        match input.trim().parse::<i16>() {
            Ok(number) => Self::from_id(number).ok_or_else(|| {
                CoreError::invalid_field("month", format!("{number} is not a month number (1-12)"))
            }),
            Err(_) => Self::parse(input),
        }
    }

    /// Title-cased name, e.g. `"January"`.
    pub fn display_name(self) -> String {
        let label = self.as_str();
        let mut name = String::with_capacity(label.len());
        name.push_str(&label[..1]);
        name.push_str(&label[1..].to_ascii_lowercase());
        name
    }
}

/// Human-readable report name used in listings and audit comments,
/// e.g. `"January 2024 Report"`.
pub fn report_display_name(year: i32, month: Month) -> String {
    format!("{} {year} Report", month.display_name())
}

/// Check that a report year lies within the supported range.
pub fn validate_report_year(year: i32) -> Result<(), CoreError> {
    if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
        return Err(CoreError::invalid_field(
            "year",
            format!("must be between {MIN_REPORT_YEAR} and {MAX_REPORT_YEAR}"),
        ));
    }
    Ok(())
}
