use crate::models::{CreateVideoRequest, Video};
use sqlx::PgPool;
use uuid::Uuid;

const VIDEO_COLUMNS: &str = "id, teacher_id, title, description, video_url, duration_secs, \
                             transcript, created_at, updated_at";

/// Insert a video record owned by `teacher_id`
pub async fn create_video(
    pool: &PgPool,
    teacher_id: Uuid,
    req: &CreateVideoRequest,
) -> Result<Video, sqlx::Error> {
    let sql = format!(
        r#"
        INSERT INTO videos (teacher_id, title, description, video_url, duration_secs, transcript)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {VIDEO_COLUMNS}
        "#
    );

    sqlx::query_as::<_, Video>(&sql)
        .bind(teacher_id)
        .bind(req.title.trim())
        .bind(req.description.trim())
        .bind(req.video_url.as_deref())
        .bind(req.duration_secs)
        .bind(req.transcript.as_deref())
        .fetch_one(pool)
        .await
}

/// Find a video by ID
pub async fn find_by_id(pool: &PgPool, video_id: Uuid) -> Result<Option<Video>, sqlx::Error> {
    let sql = format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1");

    sqlx::query_as::<_, Video>(&sql)
        .bind(video_id)
        .fetch_optional(pool)
        .await
}

/// List videos newest first, optionally filtered by a case-insensitive
/// substring of the title or description
pub async fn list_videos(
    pool: &PgPool,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Video>, sqlx::Error> {
    let pattern = search.map(|term| format!("%{}%", escape_like(term)));

    let sql = format!(
        r#"
        SELECT {VIDEO_COLUMNS}
        FROM videos
        WHERE $1::text IS NULL
           OR title ILIKE $1 ESCAPE '\'
           OR description ILIKE $1 ESCAPE '\'
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#
    );

    sqlx::query_as::<_, Video>(&sql)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

/// Delete a video, only when `teacher_id` owns it. Returns whether a row went away.
pub async fn delete_owned(
    pool: &PgPool,
    video_id: Uuid,
    teacher_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM videos WHERE id = $1 AND teacher_id = $2")
        .bind(video_id)
        .bind(teacher_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
