//! Domain models that differ from their wire form.
//!
//! Directory, chat, menu, mural and lesson plan records travel unchanged
//! between storage and the REST layer, so they use the `shared` types
//! directly. Routine records carry typed dates here, and user accounts carry
//! the credential that never leaves the server.

pub mod menu;
pub mod routine;
pub mod user;

use chrono::NaiveDate;
use uuid::Uuid;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Generate a record id of the form `prefix::uuid`
pub fn generate_id(prefix: &str) -> String {
    format!("{}::{}", prefix, Uuid::new_v4())
}

/// Parse a calendar date in `YYYY-MM-DD` form
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    // chrono accepts unpadded components; stored keys must be canonical
    if trimmed.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The canonical `YYYY-MM-DD` form of `raw`, if it is a valid date
pub fn canonical_date(raw: &str) -> Option<String> {
    parse_date(raw).map(format_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_prefixed_and_unique() {
        let first = generate_id("class");
        let second = generate_id("class");

        assert!(first.starts_with("class::"));
        assert_ne!(first, second);
    }

    #[test]
    fn test_parse_date_accepts_iso_calendar_dates() {
        let date = parse_date("2024-05-10").unwrap();
        assert_eq!(format_date(date), "2024-05-10");
        assert_eq!(canonical_date(" 2024-05-10 ").as_deref(), Some("2024-05-10"));
    }

    #[test]
    fn test_parse_date_rejects_malformed_input() {
        for raw in ["", "2024-5-10", "10/05/2024", "2024-02-30", "2024-05-10T08:00:00Z", "yesterday"] {
            assert!(parse_date(raw).is_none(), "accepted {:?}", raw);
        }
    }
}
