//! Conversion between routine domain models and their wire forms.

use crate::backend::domain::commands::routines::{RoutineForm, StudentRoutineStatus, SubmitRoutineResult};
use crate::backend::domain::models::format_date;
use crate::backend::domain::models::routine::RoutineRecord as DomainRoutine;
use shared::{
    Attendance, CareDetails, ClassRoutineStatusResponse, GuardianRoutineListResponse,
    GuardianRoutineView, RoutineFormResponse, RoutineListResponse, RoutineRecord as SharedRoutine,
    RoutineStatusEntry, SubmitRoutineResponse, UpsertOutcome,
};

/// Shown to guardians when no activities were written down
pub const DEFAULT_ACTIVITIES: &str = "Playful and interactive activities.";

pub struct RoutineMapper;

impl RoutineMapper {
    pub fn to_dto(domain: DomainRoutine) -> SharedRoutine {
        SharedRoutine {
            id: domain.id,
            student_id: domain.student_id,
            date: format_date(domain.date),
            fields: domain.fields,
            author_id: domain.author_id,
            updated_at: domain.updated_at.to_rfc3339(),
        }
    }

    pub fn to_list_dto(domain_routines: Vec<DomainRoutine>) -> RoutineListResponse {
        RoutineListResponse {
            routines: domain_routines.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_submit_dto(result: SubmitRoutineResult) -> SubmitRoutineResponse {
        let success_message = match result.outcome {
            UpsertOutcome::Created => "Routine saved".to_string(),
            UpsertOutcome::Replaced => "Routine updated".to_string(),
        };

        SubmitRoutineResponse {
            routine: Self::to_dto(result.routine),
            outcome: result.outcome,
            success_message,
        }
    }

    pub fn to_form_dto(form: RoutineForm) -> RoutineFormResponse {
        RoutineFormResponse {
            student_id: form.student_id,
            date: form.date,
            existing: form.existing.is_some(),
            fields: form.fields,
        }
    }

    pub fn to_class_status_dto(
        class_id: &str,
        date: &str,
        statuses: Vec<StudentRoutineStatus>,
    ) -> ClassRoutineStatusResponse {
        ClassRoutineStatusResponse {
            class_id: class_id.to_string(),
            date: date.to_string(),
            students: statuses
                .into_iter()
                .map(|status| RoutineStatusEntry {
                    student_id: status.student_id,
                    student_name: status.student_name,
                    has_routine: status.has_routine,
                })
                .collect(),
        }
    }

    /// What a guardian gets to see of a record
    ///
    /// Care details are dropped entirely when the child was absent, whatever
    /// values were stored for them.
    pub fn to_guardian_view(domain: DomainRoutine) -> GuardianRoutineView {
        let fields = domain.fields;
        let care = match fields.attendance {
            Attendance::Absent => None,
            Attendance::Present => Some(CareDetails {
                breakfast: fields.breakfast,
                lunch: fields.lunch,
                afternoon_snack: fields.afternoon_snack,
                dinner: fields.dinner,
                hydration: fields.hydration,
                bath: fields.bath,
                bowel_movement: fields.bowel_movement,
                diapers: fields.diapers,
                nap: fields.nap,
                mood: fields.mood,
                activities: match fields.activities.trim() {
                    "" => DEFAULT_ACTIVITIES.to_string(),
                    written => written.to_string(),
                },
            }),
        };

        GuardianRoutineView {
            date: format_date(domain.date),
            attendance: fields.attendance,
            observations: fields.observations,
            author_id: domain.author_id,
            care,
        }
    }

    pub fn to_guardian_list_dto(student_id: &str, domain_routines: Vec<DomainRoutine>) -> GuardianRoutineListResponse {
        GuardianRoutineListResponse {
            student_id: student_id.to_string(),
            routines: domain_routines.into_iter().map(Self::to_guardian_view).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use shared::{MealOutcome, RoutineFields};

    fn record(fields: RoutineFields) -> DomainRoutine {
        DomainRoutine {
            id: "routine::1".to_string(),
            student_id: "s1".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            fields,
            author_id: "teacher-2".to_string(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 10, 17, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_to_dto_formats_dates() {
        let dto = RoutineMapper::to_dto(record(RoutineFields::default()));

        assert_eq!(dto.date, "2024-05-10");
        assert_eq!(dto.updated_at, "2024-05-10T17:30:00+00:00");
    }

    #[test]
    fn test_guardian_view_hides_care_of_absent_child() {
        let fields = RoutineFields {
            attendance: Attendance::Absent,
            lunch: MealOutcome::Refused,
            observations: "Had a fever".to_string(),
            ..RoutineFields::default()
        };

        let view = RoutineMapper::to_guardian_view(record(fields));

        assert_eq!(view.attendance, Attendance::Absent);
        assert_eq!(view.observations, "Had a fever");
        assert!(view.care.is_none());
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("care").is_none());
    }

    #[test]
    fn test_guardian_view_of_present_child() {
        let fields = RoutineFields {
            lunch: MealOutcome::AteHalf,
            activities: "   ".to_string(),
            ..RoutineFields::default()
        };

        let care = RoutineMapper::to_guardian_view(record(fields)).care.unwrap();

        assert_eq!(care.lunch, MealOutcome::AteHalf);
        assert_eq!(care.activities, DEFAULT_ACTIVITIES);
    }

    #[test]
    fn test_submit_message_depends_on_outcome() {
        let result = SubmitRoutineResult {
            routine: record(RoutineFields::default()),
            outcome: UpsertOutcome::Replaced,
        };

        let dto = RoutineMapper::to_submit_dto(result);

        assert_eq!(dto.outcome, UpsertOutcome::Replaced);
        assert_eq!(dto.success_message, "Routine updated");
    }
}
