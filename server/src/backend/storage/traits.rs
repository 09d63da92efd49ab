//! # Storage Traits
//!
//! Abstractions over the record store. The domain layer only sees these
//! traits; the SQLite implementations live in [`super::sqlite`].

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use shared::{ChatConfig, ChatMessage, Class, FeedPost, LessonPlan, MealSlot, PlanStatus, SchoolEvent, Student};

use crate::backend::domain::models::{menu::MenuEntry, routine::RoutineRecord, user::UserAccount};

/// Storage operations for daily routine records
///
/// Records are keyed by the natural pair (student_id, date). At most one
/// record exists per pair.
#[async_trait]
pub trait RoutineStorage: Send + Sync {
    /// Insert the record, or replace every field and the author of the record
    /// already stored for the same (student_id, date).
    ///
    /// Returns the id of the stored row: the record's own id when it was
    /// inserted, the previously stored id when it replaced an existing row.
    async fn upsert_routine(&self, record: &RoutineRecord) -> Result<String>;

    /// Retrieve the record for a student on a given day
    async fn get_routine(&self, student_id: &str, date: NaiveDate) -> Result<Option<RoutineRecord>>;

    /// All records of one student, newest date first
    async fn list_routines_for_student(&self, student_id: &str) -> Result<Vec<RoutineRecord>>;

    /// Ids of the students that have a record on the given day
    async fn list_student_ids_with_routine(&self, date: NaiveDate) -> Result<Vec<String>>;
}

/// Storage operations for user accounts
#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn store_user(&self, user: &UserAccount) -> Result<()>;

    async fn get_user(&self, user_id: &str) -> Result<Option<UserAccount>>;

    /// Case-insensitive lookup by email
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserAccount>>;

    /// List all users ordered by name
    async fn list_users(&self) -> Result<Vec<UserAccount>>;

    /// Returns true if the user was found and deleted
    async fn delete_user(&self, user_id: &str) -> Result<bool>;
}

/// Storage operations for classes
#[async_trait]
pub trait ClassStorage: Send + Sync {
    async fn store_class(&self, class: &Class) -> Result<()>;

    async fn get_class(&self, class_id: &str) -> Result<Option<Class>>;

    /// List all classes ordered by name
    async fn list_classes(&self) -> Result<Vec<Class>>;

    async fn list_classes_for_teacher(&self, teacher_id: &str) -> Result<Vec<Class>>;

    async fn update_class(&self, class: &Class) -> Result<()>;

    async fn delete_class(&self, class_id: &str) -> Result<bool>;
}

/// Storage operations for students and their guardian links
#[async_trait]
pub trait StudentStorage: Send + Sync {
    /// Store a student together with its guardian links
    async fn store_student(&self, student: &Student) -> Result<()>;

    async fn get_student(&self, student_id: &str) -> Result<Option<Student>>;

    /// List all students ordered by name
    async fn list_students(&self) -> Result<Vec<Student>>;

    async fn list_students_in_class(&self, class_id: &str) -> Result<Vec<Student>>;

    async fn list_students_for_guardian(&self, guardian_id: &str) -> Result<Vec<Student>>;

    /// Update name and class, and replace the guardian links
    async fn update_student(&self, student: &Student) -> Result<()>;

    async fn delete_student(&self, student_id: &str) -> Result<bool>;
}

/// Storage operations for direct messages and the chat opening hours
#[async_trait]
pub trait ChatStorage: Send + Sync {
    /// The stored opening hours, if they were ever saved
    async fn get_chat_config(&self) -> Result<Option<ChatConfig>>;

    async fn set_chat_config(&self, config: &ChatConfig) -> Result<()>;

    async fn store_message(&self, message: &ChatMessage) -> Result<()>;

    /// Messages exchanged between two users in either direction, oldest first
    async fn list_conversation(&self, user_a: &str, user_b: &str) -> Result<Vec<ChatMessage>>;
}

/// Storage operations for the school menu
#[async_trait]
pub trait MenuStorage: Send + Sync {
    /// Insert or replace the given meals of one day, all or none
    async fn save_menu_day(&self, date: &str, meals: &[(MealSlot, String)]) -> Result<()>;

    /// All entries, newest date first
    async fn list_menu_entries(&self) -> Result<Vec<MenuEntry>>;

    /// Returns the number of entries removed
    async fn delete_menu_day(&self, date: &str) -> Result<u64>;
}

/// Storage operations for the school mural
#[async_trait]
pub trait PostStorage: Send + Sync {
    async fn store_post(&self, post: &FeedPost) -> Result<()>;

    async fn get_post(&self, post_id: &str) -> Result<Option<FeedPost>>;

    /// All posts, newest first
    async fn list_posts(&self) -> Result<Vec<FeedPost>>;

    async fn update_likes(&self, post_id: &str, likes: &[String]) -> Result<()>;
}

/// Storage operations for lesson plans
#[async_trait]
pub trait LessonPlanStorage: Send + Sync {
    async fn store_plan(&self, plan: &LessonPlan) -> Result<()>;

    async fn get_plan(&self, plan_id: &str) -> Result<Option<LessonPlan>>;

    /// All plans, most recent lesson date first
    async fn list_plans(&self) -> Result<Vec<LessonPlan>>;

    async fn list_plans_for_teacher(&self, teacher_id: &str) -> Result<Vec<LessonPlan>>;

    async fn update_plan_review(&self, plan_id: &str, status: PlanStatus, feedback: Option<&str>) -> Result<()>;
}

/// Storage operations for the school calendar
#[async_trait]
pub trait EventStorage: Send + Sync {
    async fn store_event(&self, event: &SchoolEvent) -> Result<()>;

    /// All events, earliest date first
    async fn list_events(&self) -> Result<Vec<SchoolEvent>>;

    /// Returns false when no event had the id
    async fn delete_event(&self, event_id: &str) -> Result<bool>;
}

/// Trait defining the interface for storage connections
///
/// Abstracts the concrete connection type and provides factory methods for
/// the repositories, so services can be written against any backend.
pub trait Connection: Send + Sync + Clone + 'static {
    type RoutineRepository: RoutineStorage + Clone;
    type UserRepository: UserStorage + Clone;
    type ClassRepository: ClassStorage + Clone;
    type StudentRepository: StudentStorage + Clone;
    type ChatRepository: ChatStorage + Clone;
    type MenuRepository: MenuStorage + Clone;
    type PostRepository: PostStorage + Clone;
    type LessonPlanRepository: LessonPlanStorage + Clone;
    type EventRepository: EventStorage + Clone;

    fn create_routine_repository(&self) -> Self::RoutineRepository;
    fn create_user_repository(&self) -> Self::UserRepository;
    fn create_class_repository(&self) -> Self::ClassRepository;
    fn create_student_repository(&self) -> Self::StudentRepository;
    fn create_chat_repository(&self) -> Self::ChatRepository;
    fn create_menu_repository(&self) -> Self::MenuRepository;
    fn create_post_repository(&self) -> Self::PostRepository;
    fn create_lesson_plan_repository(&self) -> Self::LessonPlanRepository;
    fn create_event_repository(&self) -> Self::EventRepository;
}
