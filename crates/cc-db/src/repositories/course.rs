use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{
    CourseAndRegistration, CourseRegistration, CourseRegistrationRow, RegistrationType,
};

/// All courses the user is registered in, newest term first.
pub async fn list_for_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Vec<CourseAndRegistration>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows: Vec<CourseRegistrationRow> = sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                c.id as course_id,
                c.name as course_name,
                c.title as course_title,
                c.url as course_url,
                c.year as course_year,
                t.id as term_id,
                t.name as term_name,
                t.seq as term_seq,
                cr.id as registration_id,
                cr.user_id,
                cr.registration_type,
                cr.section
            FROM course_registrations cr
            JOIN courses c ON c.id = cr.course_id
            JOIN terms t ON t.id = c.term_id
            WHERE cr.user_id = $1
            ORDER BY c.year DESC, t.seq DESC, c.name
        "#,
    )
    .bind(user_id)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(CourseAndRegistration::from).collect())
}

pub async fn find_registration<'e, E>(
    executor: E,
    course_id: i32,
    user_id: Uuid,
) -> Result<Option<CourseRegistration>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, course_id, user_id, registration_type, section
            FROM course_registrations
            WHERE course_id = $1 AND user_id = $2
        "#,
    )
    .bind(course_id)
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn create_term<'e, E>(executor: E, name: &str, seq: i32) -> Result<i32, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO terms (name, seq)
            VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET seq = EXCLUDED.seq
            RETURNING id
        "#,
    )
    .bind(name)
    .bind(seq)
    .fetch_one(executor)
    .await
}

pub async fn create_course<'e, E>(
    executor: E,
    name: &str,
    title: &str,
    term_id: i32,
    year: i32,
) -> Result<i32, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO courses (name, title, term_id, year)
            VALUES ($1, $2, $3, $4)
            RETURNING id
        "#,
    )
    .bind(name)
    .bind(title)
    .bind(term_id)
    .bind(year)
    .fetch_one(executor)
    .await
}

pub async fn register_user<'e, E>(
    executor: E,
    course_id: i32,
    user_id: Uuid,
    registration_type: RegistrationType,
    section: i32,
) -> Result<i32, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            INSERT INTO course_registrations (course_id, user_id, registration_type, section)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (course_id, user_id)
            DO UPDATE SET registration_type = EXCLUDED.registration_type, section = EXCLUDED.section
            RETURNING id
        "#,
    )
    .bind(course_id)
    .bind(user_id)
    .bind(registration_type)
    .bind(section)
    .fetch_one(executor)
    .await
}
