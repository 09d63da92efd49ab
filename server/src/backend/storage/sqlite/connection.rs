use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::backend::storage::sqlite::repositories::{
    ChatRepository, ClassRepository, EventRepository, LessonPlanRepository, MenuRepository,
    PostRepository, RoutineRepository, StudentRepository, UserRepository,
};
use crate::backend::storage::Connection;

/// DbConnection manages the SQLite pool shared by every repository
#[derive(Clone)]
pub struct DbConnection {
    pool: Arc<SqlitePool>,
}

impl DbConnection {
    /// Open (creating if needed) the database at `url` and set up the schema
    pub async fn new(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid database URL: {}", url))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", url))?;

        Self::setup_schema(&pool).await?;
        info!("Database ready at {}", url);

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Initialize a private in-memory database for a single test
    ///
    /// A single connection that never expires keeps the memory database
    /// alive for the lifetime of the pool.
    #[cfg(test)]
    pub async fn init_test() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::setup_schema(&pool).await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Set up the required database schema
    async fn setup_schema(pool: &SqlitePool) -> Result<()> {
        // Users of every role; emails compare case-insensitively
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE COLLATE NOCASE,
                role TEXT NOT NULL,
                function TEXT,
                password TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS classes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                teacher_id TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_classes_teacher_id
            ON classes(teacher_id);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS students (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                class_id TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_students_class_id
            ON students(class_id);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS student_guardians (
                student_id TEXT NOT NULL,
                guardian_id TEXT NOT NULL,
                position INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (student_id, guardian_id),
                FOREIGN KEY (student_id) REFERENCES students (id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_student_guardians_guardian_id
            ON student_guardians(guardian_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Routine records are kept when a student is removed
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS routines (
                id TEXT PRIMARY KEY,
                student_id TEXT NOT NULL,
                date TEXT NOT NULL,
                attendance TEXT NOT NULL,
                breakfast TEXT NOT NULL,
                lunch TEXT NOT NULL,
                afternoon_snack TEXT NOT NULL,
                dinner TEXT NOT NULL,
                hydration TEXT NOT NULL,
                bath TEXT NOT NULL,
                bowel_movement BOOLEAN NOT NULL DEFAULT FALSE,
                diapers TEXT NOT NULL,
                nap TEXT NOT NULL,
                activities TEXT NOT NULL DEFAULT '',
                observations TEXT NOT NULL DEFAULT '',
                mood TEXT NOT NULL,
                author_id TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE (student_id, date)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_routines_date
            ON routines(date);
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS messages (
                id TEXT PRIMARY KEY,
                sender_id TEXT NOT NULL,
                receiver_id TEXT NOT NULL,
                content TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_messages_participants
            ON messages(sender_id, receiver_id);
            "#,
        )
        .execute(pool)
        .await?;

        // Single row holding the chat opening hours
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chat_config (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                start_hour INTEGER NOT NULL,
                end_hour INTEGER NOT NULL,
                is_enabled BOOLEAN NOT NULL DEFAULT TRUE,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS menu_entries (
                date TEXT NOT NULL,
                meal TEXT NOT NULL,
                description TEXT NOT NULL,
                PRIMARY KEY (date, meal)
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                location TEXT NOT NULL DEFAULT ''
            );
            "#,
        )
        .execute(pool)
        .await?;

        // Attachments and likes are JSON arrays
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id TEXT PRIMARY KEY,
                author_id TEXT NOT NULL,
                author_name TEXT NOT NULL,
                author_role TEXT NOT NULL,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                kind TEXT NOT NULL,
                attachments TEXT NOT NULL DEFAULT '[]',
                likes TEXT NOT NULL DEFAULT '[]',
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS lesson_plans (
                id TEXT PRIMARY KEY,
                teacher_id TEXT NOT NULL,
                class_id TEXT NOT NULL,
                grade TEXT NOT NULL DEFAULT '',
                shift TEXT NOT NULL DEFAULT '',
                structure TEXT NOT NULL DEFAULT '',
                date TEXT NOT NULL,
                lesson_number TEXT NOT NULL,
                objective TEXT NOT NULL,
                content TEXT NOT NULL,
                materials TEXT NOT NULL DEFAULT '',
                curriculum_codes TEXT NOT NULL DEFAULT '',
                assessment TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                manager_feedback TEXT,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_lesson_plans_teacher_id
            ON lesson_plans(teacher_id);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

impl Connection for DbConnection {
    type RoutineRepository = RoutineRepository;
    type UserRepository = UserRepository;
    type ClassRepository = ClassRepository;
    type StudentRepository = StudentRepository;
    type ChatRepository = ChatRepository;
    type MenuRepository = MenuRepository;
    type PostRepository = PostRepository;
    type LessonPlanRepository = LessonPlanRepository;
    type EventRepository = EventRepository;

    fn create_routine_repository(&self) -> Self::RoutineRepository {
        RoutineRepository::new(self.clone())
    }

    fn create_user_repository(&self) -> Self::UserRepository {
        UserRepository::new(self.clone())
    }

    fn create_class_repository(&self) -> Self::ClassRepository {
        ClassRepository::new(self.clone())
    }

    fn create_student_repository(&self) -> Self::StudentRepository {
        StudentRepository::new(self.clone())
    }

    fn create_chat_repository(&self) -> Self::ChatRepository {
        ChatRepository::new(self.clone())
    }

    fn create_menu_repository(&self) -> Self::MenuRepository {
        MenuRepository::new(self.clone())
    }

    fn create_post_repository(&self) -> Self::PostRepository {
        PostRepository::new(self.clone())
    }

    fn create_lesson_plan_repository(&self) -> Self::LessonPlanRepository {
        LessonPlanRepository::new(self.clone())
    }

    fn create_event_repository(&self) -> Self::EventRepository {
        EventRepository::new(self.clone())
    }
}
