//! Seed data shared by the service tests.

use shared::{Class, Student, UserRole};

use crate::backend::domain::models::user::UserAccount;
use crate::backend::storage::{ClassStorage, Connection, DbConnection, StudentStorage, UserStorage};

pub const MANAGER_ID: &str = "mgr-1";
pub const TEACHER_ID: &str = "teacher-2";
pub const OTHER_TEACHER_ID: &str = "teacher-3";
pub const GUARDIAN_ID: &str = "guardian-1";
pub const CLASS_ID: &str = "c1";
pub const OTHER_CLASS_ID: &str = "c2";
pub const STUDENT_ID: &str = "s1";

pub fn account(id: &str, name: &str, email: &str, role: UserRole) -> UserAccount {
    UserAccount {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
        function: None,
        password: "123".to_string(),
    }
}

/// A small school: one manager, two teachers with a class each, one
/// guardian, and three students.
///
/// | student | class | guardian   |
/// |---------|-------|------------|
/// | s1 Lia  | c1    | guardian-1 |
/// | s2 Theo | c1    |            |
/// | s3 Nina | c2    |            |
pub async fn seeded_school() -> DbConnection {
    let db = DbConnection::init_test().await.expect("test database");

    let users = db.create_user_repository();
    for user in [
        account(MANAGER_ID, "Marta", "marta@school.com", UserRole::Manager),
        account(TEACHER_ID, "Tania", "tania@school.com", UserRole::Teacher),
        account(OTHER_TEACHER_ID, "Otto", "otto@school.com", UserRole::Teacher),
        account(GUARDIAN_ID, "Family of Lia", "family.lia@mail.com", UserRole::Guardian),
    ] {
        users.store_user(&user).await.expect("seed user");
    }

    let classes = db.create_class_repository();
    for (id, name, teacher_id) in [
        (CLASS_ID, "Toddlers", TEACHER_ID),
        (OTHER_CLASS_ID, "Babies", OTHER_TEACHER_ID),
    ] {
        classes
            .store_class(&Class {
                id: id.to_string(),
                name: name.to_string(),
                teacher_id: teacher_id.to_string(),
            })
            .await
            .expect("seed class");
    }

    let students = db.create_student_repository();
    for (id, name, class_id, guardians) in [
        (STUDENT_ID, "Lia", CLASS_ID, vec![GUARDIAN_ID.to_string()]),
        ("s2", "Theo", CLASS_ID, vec![]),
        ("s3", "Nina", OTHER_CLASS_ID, vec![]),
    ] {
        students
            .store_student(&Student {
                id: id.to_string(),
                name: name.to_string(),
                class_id: class_id.to_string(),
                guardian_ids: guardians,
            })
            .await
            .expect("seed student");
    }

    db
}

/// Look up a seeded account
pub async fn user(db: &DbConnection, user_id: &str) -> UserAccount {
    db.create_user_repository()
        .get_user(user_id)
        .await
        .expect("user lookup")
        .expect("seeded user")
}
