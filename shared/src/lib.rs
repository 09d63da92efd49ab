use serde::{Deserialize, Serialize};
use std::fmt;

/// Error returned when a stored or submitted vocabulary value is not recognised
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown {} value: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Declares a closed vocabulary enum whose wire form and storage form are the
/// same snake_case string.
macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

// ---------------------------------------------------------------------------
// People and groups
// ---------------------------------------------------------------------------

vocabulary! {
    /// Role of a user inside the school
    UserRole {
        Manager => "manager",
        Teacher => "teacher",
        Guardian => "guardian",
    }
}

impl UserRole {
    /// Managers and teachers
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Manager | UserRole::Teacher)
    }
}

/// Public view of a user. Credentials never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// Job function for staff members (e.g. "Director")
    pub function: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Class {
    pub id: String,
    pub name: String,
    pub teacher_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub class_id: String,
    pub guardian_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

/// Registers a new school manager
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub function: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserResponse {
    pub user: User,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserListResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateClassRequest {
    pub name: String,
    pub teacher_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReassignTeacherRequest {
    pub teacher_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassResponse {
    pub class: Class,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassListResponse {
    pub classes: Vec<Class>,
}

/// Enrolls (or re-enrolls) a student. `guardian_emails` is comma-separated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrollStudentRequest {
    pub name: String,
    pub class_id: String,
    pub guardian_emails: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentResponse {
    pub student: Student,
    pub success_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentListResponse {
    pub students: Vec<Student>,
}

// ---------------------------------------------------------------------------
// Daily routine
// ---------------------------------------------------------------------------

vocabulary! {
    Attendance {
        Present => "present",
        Absent => "absent",
    }
}

vocabulary! {
    /// How much of an offered meal the child ate
    MealOutcome {
        AteEverything => "ate_everything",
        AteWell => "ate_well",
        AteHalf => "ate_half",
        Refused => "refused",
        NotOffered => "not_offered",
    }
}

vocabulary! {
    Hydration {
        DrankPlenty => "drank_plenty",
        DrankLittle => "drank_little",
    }
}

vocabulary! {
    BathStatus {
        Yes => "yes",
        No => "no",
        NotApplicable => "not_applicable",
    }
}

vocabulary! {
    DiaperChanges {
        Once => "once",
        Twice => "twice",
        ThreeTimes => "three_times",
        NotApplicable => "not_applicable",
    }
}

vocabulary! {
    NapOutcome {
        Slept => "slept",
        DidNotSleep => "did_not_sleep",
    }
}

vocabulary! {
    Mood {
        Happy => "happy",
        Calm => "calm",
        Tired => "tired",
        Fussy => "fussy",
    }
}

/// Everything a staff member fills in for one child on one day.
///
/// When `attendance` is `Absent` the care fields are still carried and
/// stored, but readers must not present them. Fields left out of a
/// submission take the blank-form values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoutineFields {
    pub attendance: Attendance,
    /// Morning snack
    pub breakfast: MealOutcome,
    pub lunch: MealOutcome,
    pub afternoon_snack: MealOutcome,
    pub dinner: MealOutcome,
    pub hydration: Hydration,
    pub bath: BathStatus,
    pub bowel_movement: bool,
    pub diapers: DiaperChanges,
    pub nap: NapOutcome,
    pub activities: String,
    pub observations: String,
    pub mood: Mood,
}

impl Default for RoutineFields {
    /// Values a blank routine form starts from
    fn default() -> Self {
        Self {
            attendance: Attendance::Present,
            breakfast: MealOutcome::AteEverything,
            lunch: MealOutcome::AteEverything,
            afternoon_snack: MealOutcome::AteEverything,
            dinner: MealOutcome::AteEverything,
            hydration: Hydration::DrankPlenty,
            bath: BathStatus::No,
            bowel_movement: false,
            diapers: DiaperChanges::Once,
            nap: NapOutcome::Slept,
            activities: String::new(),
            observations: String::new(),
            mood: Mood::Happy,
        }
    }
}

/// A stored routine record, identified by (student_id, date)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineRecord {
    pub id: String,
    pub student_id: String,
    pub date: String, // ISO 8601 date (YYYY-MM-DD)
    #[serde(flatten)]
    pub fields: RoutineFields,
    pub author_id: String,
    pub updated_at: String, // RFC 3339 timestamp
}

/// Whether a submission created the record or replaced an existing one
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpsertOutcome {
    Created,
    Replaced,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitRoutineResponse {
    pub routine: RoutineRecord,
    pub outcome: UpsertOutcome,
    pub success_message: String,
}

/// Values an editing form should start from for (student, date)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineFormResponse {
    pub student_id: String,
    pub date: String,
    pub existing: bool,
    pub fields: RoutineFields,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineListResponse {
    pub routines: Vec<RoutineRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoutineStatusEntry {
    pub student_id: String,
    pub student_name: String,
    pub has_routine: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassRoutineStatusResponse {
    pub class_id: String,
    pub date: String,
    pub students: Vec<RoutineStatusEntry>,
}

/// Care details shown to guardians only when the child was present
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareDetails {
    pub breakfast: MealOutcome,
    pub lunch: MealOutcome,
    pub afternoon_snack: MealOutcome,
    pub dinner: MealOutcome,
    pub hydration: Hydration,
    pub bath: BathStatus,
    pub bowel_movement: bool,
    pub diapers: DiaperChanges,
    pub nap: NapOutcome,
    pub mood: Mood,
    pub activities: String,
}

/// Guardian-facing rendition of a routine record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuardianRoutineView {
    pub date: String,
    pub attendance: Attendance,
    pub observations: String,
    pub author_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub care: Option<CareDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GuardianRoutineListResponse {
    pub student_id: String,
    pub routines: Vec<GuardianRoutineView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateSummaryRequest {
    pub activities: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateSummaryResponse {
    pub observation: String,
    /// False when the fallback sentence was used
    pub generated: bool,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// Opening hours of the direct-messaging feature. Managers ignore it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ChatConfig {
    pub start_hour: u32,
    pub end_hour: u32,
    pub is_enabled: bool,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            start_hour: 8,
            end_hour: 18,
            is_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub timestamp: String, // RFC 3339 timestamp
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SendMessageRequest {
    pub receiver_id: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatContactsResponse {
    pub contacts: Vec<User>,
    pub chat_open: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationResponse {
    pub messages: Vec<ChatMessage>,
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

vocabulary! {
    MealSlot {
        Breakfast => "breakfast",
        Lunch => "lunch",
        AfternoonSnack => "afternoon_snack",
        Dinner => "dinner",
    }
}

/// Menu of one school day. Slots without a description are omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DayMenu {
    pub date: String,
    pub breakfast: Option<String>,
    pub lunch: Option<String>,
    pub afternoon_snack: Option<String>,
    pub dinner: Option<String>,
}

impl DayMenu {
    pub fn slot(&self, slot: MealSlot) -> Option<&str> {
        match slot {
            MealSlot::Breakfast => self.breakfast.as_deref(),
            MealSlot::Lunch => self.lunch.as_deref(),
            MealSlot::AfternoonSnack => self.afternoon_snack.as_deref(),
            MealSlot::Dinner => self.dinner.as_deref(),
        }
    }

    pub fn set_slot(&mut self, slot: MealSlot, description: String) {
        let target = match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::AfternoonSnack => &mut self.afternoon_snack,
            MealSlot::Dinner => &mut self.dinner,
        };
        *target = Some(description);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuListResponse {
    pub menus: Vec<DayMenu>,
}

// ---------------------------------------------------------------------------
// Mural
// ---------------------------------------------------------------------------

vocabulary! {
    PostKind {
        General => "general",
        Calendar => "calendar",
        Event => "event",
        Alert => "alert",
    }
}

vocabulary! {
    AttachmentKind {
        Image => "image",
        Video => "video",
        Pdf => "pdf",
        Other => "other",
    }
}

/// Metadata of an already-uploaded file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attachment {
    pub name: String,
    pub url: String,
    pub kind: AttachmentKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedPost {
    pub id: String,
    pub author_id: String,
    pub author_name: String,
    pub author_role: UserRole,
    pub title: String,
    pub content: String,
    pub kind: PostKind,
    pub attachments: Vec<Attachment>,
    pub likes: Vec<String>,
    pub created_at: String, // RFC 3339 timestamp
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub kind: PostKind,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostListResponse {
    pub posts: Vec<FeedPost>,
}

// ---------------------------------------------------------------------------
// Lesson plans
// ---------------------------------------------------------------------------

vocabulary! {
    PlanStatus {
        Pending => "pending",
        Approved => "approved",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LessonPlan {
    pub id: String,
    pub teacher_id: String,
    pub class_id: String,
    /// Grade label printed on the plan, the class name unless given
    pub grade: String,
    pub shift: String,
    /// Teaching structure of the lesson (circle, corners, workshop...)
    pub structure: String,
    pub date: String,
    pub lesson_number: String,
    pub objective: String,
    pub content: String,
    pub materials: String,
    pub curriculum_codes: String,
    pub assessment: String,
    pub status: PlanStatus,
    pub manager_feedback: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmitPlanRequest {
    pub class_id: String,
    pub date: String,
    pub lesson_number: String,
    pub objective: String,
    pub content: String,
    #[serde(default)]
    pub materials: String,
    #[serde(default)]
    pub curriculum_codes: String,
    #[serde(default)]
    pub assessment: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub shift: String,
    #[serde(default)]
    pub structure: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApprovePlanRequest {
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanListResponse {
    pub plans: Vec<LessonPlan>,
}

// ---------------------------------------------------------------------------
// School calendar
// ---------------------------------------------------------------------------

/// A dated happening on the school calendar (party, meeting, outing)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolEvent {
    pub id: String,
    pub title: String,
    pub date: String, // YYYY-MM-DD
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateEventRequest {
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventListResponse {
    pub events: Vec<SchoolEvent>,
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

/// Log line relayed from a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

/// Body of every non-2xx API response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}
