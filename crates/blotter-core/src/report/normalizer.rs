//! Field normalization: trimming and the compound date-time field.

use crate::error::MismatchReason;
use crate::models::record::{FieldCapture, PartialRecord};

/// Separator between the date and time in the compound field.
pub const DATE_TIME_SEPARATOR: &str = " / ";

/// Join a date and time into the compound `incident_time` value.
pub fn join_date_time(date: &str, time: &str) -> String {
    format!("{}{}{}", date.trim(), DATE_TIME_SEPARATOR, time.trim())
}

/// Turn a row capture into an open record.
///
/// Every field must be non-empty after trimming.
pub fn normalize(capture: FieldCapture) -> Result<PartialRecord, MismatchReason> {
    let FieldCapture {
        date,
        time,
        case_number,
        address,
        category,
        agency_code,
    } = capture;

    let date = non_empty("date", &date)?;
    let time = non_empty("time", &time)?;

    Ok(PartialRecord::new(
        join_date_time(date, time),
        non_empty("case_number", &case_number)?.to_string(),
        non_empty("address", &address)?.to_string(),
        non_empty("category", &category)?.to_string(),
        non_empty("agency_code", &agency_code)?.to_string(),
    ))
}

fn non_empty<'a>(name: &'static str, value: &'a str) -> Result<&'a str, MismatchReason> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(MismatchReason::EmptyField(name))
    } else {
        Ok(trimmed)
    }
}
