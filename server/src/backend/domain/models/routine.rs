use chrono::{DateTime, NaiveDate, Utc};
use shared::{Attendance, RoutineFields};

/// A daily routine record with typed date and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineRecord {
    pub id: String,
    pub student_id: String,
    pub date: NaiveDate,
    pub fields: RoutineFields,
    pub author_id: String,
    pub updated_at: DateTime<Utc>,
}

impl RoutineRecord {
    pub fn generate_id() -> String {
        super::generate_id("routine")
    }

    pub fn is_present(&self) -> bool {
        self.fields.attendance == Attendance::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::domain::models::parse_date;

    #[test]
    fn test_is_present_follows_attendance() {
        let mut record = RoutineRecord {
            id: RoutineRecord::generate_id(),
            student_id: "s1".to_string(),
            date: parse_date("2024-05-10").unwrap(),
            fields: RoutineFields::default(),
            author_id: "teacher-2".to_string(),
            updated_at: Utc::now(),
        };
        assert!(record.is_present());

        record.fields.attendance = Attendance::Absent;
        assert!(!record.is_present());
    }
}
