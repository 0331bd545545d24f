use crate::models::{ActivityRow, Video, WatchProgress};
use sqlx::PgPool;
use uuid::Uuid;

const PROGRESS_COLUMNS: &str = "id, student_id, video_id, title, watch_time_secs, \
                                questions_asked, completed, last_watched, created_at, updated_at";

/// Add `seconds` to the student's counter for `video`, creating the record
/// on first report.
///
/// `completion_threshold` is the accumulated time (seconds) at which the
/// video counts as completed; `None` leaves the flag untouched. The flag
/// never goes back to false. Runs as a single upsert so concurrent reports
/// from several tabs all land.
pub async fn add_watch_time(
    pool: &PgPool,
    student_id: Uuid,
    video: &Video,
    seconds: i64,
    completion_threshold: Option<f64>,
) -> Result<WatchProgress, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO watch_progress (student_id, video_id, title, watch_time_secs, completed, last_watched)
        VALUES (
            $1,
            $2,
            $3,
            $4,
            COALESCE($4::float8 >= $5::float8, FALSE),
            NOW()
        )
        ON CONFLICT (student_id, video_id) DO UPDATE
        SET watch_time_secs = watch_progress.watch_time_secs + EXCLUDED.watch_time_secs,
            completed = watch_progress.completed
                OR COALESCE(
                    (watch_progress.watch_time_secs + EXCLUDED.watch_time_secs)::float8 >= $5::float8,
                    FALSE
                ),
            last_watched = NOW(),
            updated_at = NOW()
        RETURNING {PROGRESS_COLUMNS}
        "#
    );

    sqlx::query_as::<_, WatchProgress>(&sql)
        .bind(student_id)
        .bind(video.id)
        .bind(&video.title)
        .bind(seconds)
        .bind(completion_threshold)
        .fetch_one(pool)
        .await
}

/// Count one more question against the student's record for `video`
pub async fn increment_questions(
    pool: &PgPool,
    student_id: Uuid,
    video: &Video,
) -> Result<WatchProgress, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO watch_progress (student_id, video_id, title, questions_asked, last_watched)
        VALUES ($1, $2, $3, 1, NOW())
        ON CONFLICT (student_id, video_id) DO UPDATE
        SET questions_asked = watch_progress.questions_asked + 1,
            last_watched = NOW(),
            updated_at = NOW()
        RETURNING {PROGRESS_COLUMNS}
        "#
    );

    sqlx::query_as::<_, WatchProgress>(&sql)
        .bind(student_id)
        .bind(video.id)
        .bind(&video.title)
        .fetch_one(pool)
        .await
}

/// All records of one student, most recently watched first
pub async fn list_for_student(
    pool: &PgPool,
    student_id: Uuid,
) -> Result<Vec<WatchProgress>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT {PROGRESS_COLUMNS}
        FROM watch_progress
        WHERE student_id = $1
        ORDER BY last_watched DESC, id ASC
        "#
    );

    sqlx::query_as::<_, WatchProgress>(&sql)
        .bind(student_id)
        .fetch_all(pool)
        .await
}

/// Activity of several students at once, joined with current video titles
pub async fn list_activity_for_students(
    pool: &PgPool,
    student_ids: &[Uuid],
) -> Result<Vec<ActivityRow>, sqlx::Error> {
    if student_ids.is_empty() {
        return Ok(Vec::new());
    }

    sqlx::query_as::<_, ActivityRow>(
        r#"
        SELECT wp.student_id, wp.video_id, wp.title, v.title AS video_title,
               wp.watch_time_secs, wp.questions_asked, wp.completed, wp.last_watched
        FROM watch_progress wp
        LEFT JOIN videos v ON v.id = wp.video_id
        WHERE wp.student_id = ANY($1)
        ORDER BY wp.last_watched DESC
        "#,
    )
    .bind(student_ids)
    .fetch_all(pool)
    .await
}
