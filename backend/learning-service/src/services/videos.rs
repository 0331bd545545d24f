/// Video service - lecture video records
use crate::db::video_repo;
use crate::error::{AppError, Result};
use crate::models::{CreateVideoRequest, ListVideosQuery, User, Video};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct VideoService {
    pool: PgPool,
}

impl VideoService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a video by ID, 404 when missing
    pub async fn get_video(&self, video_id: Uuid) -> Result<Video> {
        video_repo::find_by_id(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }

    pub async fn list_videos(&self, query: &ListVideosQuery) -> Result<Vec<Video>> {
        let videos =
            video_repo::list_videos(&self.pool, query.search_term(), query.limit(), query.offset())
                .await?;
        Ok(videos)
    }

    /// Register a video owned by `teacher`
    pub async fn create_video(&self, teacher: &User, req: &CreateVideoRequest) -> Result<Video> {
        req.validate()?;
        if req.title.trim().is_empty() || req.description.trim().is_empty() {
            return Err(AppError::Validation(
                "title and description are required".to_string(),
            ));
        }

        let video = video_repo::create_video(&self.pool, teacher.id, req).await?;
        tracing::info!(video_id = %video.id, teacher_id = %teacher.id, "video created");
        Ok(video)
    }

    /// Delete one of the teacher's own videos. Someone else's video reads as missing.
    pub async fn delete_video(&self, teacher: &User, video_id: Uuid) -> Result<()> {
        if !video_repo::delete_owned(&self.pool, video_id, teacher.id).await? {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        tracing::info!(video_id = %video_id, teacher_id = %teacher.id, "video deleted");
        Ok(())
    }
}
