/// Progress service - per student/video watch time and question counters
use crate::db::{progress_repo, video_repo};
use crate::error::{AppError, Result};
use crate::metrics::learning::WATCH_SECONDS_TOTAL;
use crate::models::{
    QuestionCount, StudentStats, StudentSummary, TrackQuestionRequest, TrackWatchTimeRequest,
    User, Video, VideoActivity, WatchTimeUpdate,
};
use sqlx::PgPool;
use uuid::Uuid;

const INVALID_WATCH_REPORT: &str = "Invalid video ID or watch time";

pub struct ProgressService {
    pool: PgPool,
    completion_ratio: f64,
}

impl ProgressService {
    pub fn new(pool: PgPool, completion_ratio: f64) -> Self {
        Self {
            pool,
            completion_ratio,
        }
    }

    /// Add a watch-time report to the student's record for a video
    pub async fn track_watch_time(
        &self,
        student: &User,
        req: &TrackWatchTimeRequest,
    ) -> Result<WatchTimeUpdate> {
        let (video_id, seconds) = match (req.video_id, whole_seconds(req.watch_time)) {
            (Some(video_id), Some(seconds)) => (video_id, seconds),
            _ => return Err(AppError::BadRequest(INVALID_WATCH_REPORT.to_string())),
        };

        let video = self.find_video(video_id).await?;
        let threshold = completion_threshold(video.duration_secs, self.completion_ratio);

        let record =
            progress_repo::add_watch_time(&self.pool, student.id, &video, seconds, threshold)
                .await?;

        WATCH_SECONDS_TOTAL.inc_by(seconds as u64);
        tracing::debug!(
            student_id = %student.id,
            video_id = %video.id,
            added = seconds,
            total = record.watch_time_secs,
            completed = record.completed,
            "watch time recorded"
        );

        Ok(WatchTimeUpdate {
            video_id: video.id,
            title: video.title,
            watch_time: record.watch_time_secs,
            completed: record.completed,
        })
    }

    /// Count a question asked while watching a video
    pub async fn track_question(
        &self,
        student: &User,
        req: &TrackQuestionRequest,
    ) -> Result<QuestionCount> {
        let video_id = req
            .video_id
            .ok_or_else(|| AppError::BadRequest("Invalid video ID".to_string()))?;

        let video = self.find_video(video_id).await?;
        self.record_question(student.id, &video).await
    }

    /// Increment the question counter for an already loaded video
    pub async fn record_question(&self, student_id: Uuid, video: &Video) -> Result<QuestionCount> {
        let record = progress_repo::increment_questions(&self.pool, student_id, video).await?;

        Ok(QuestionCount {
            questions_asked: record.questions_asked,
        })
    }

    /// All of the student's records, most recently watched first, with totals
    pub async fn student_summary(&self, student: &User) -> Result<StudentSummary> {
        let records = progress_repo::list_for_student(&self.pool, student.id).await?;

        let videos: Vec<VideoActivity> = records.iter().map(VideoActivity::from).collect();
        let stats = StudentStats::from_activities(&videos);

        Ok(StudentSummary { videos, stats })
    }

    async fn find_video(&self, video_id: Uuid) -> Result<Video> {
        video_repo::find_by_id(&self.pool, video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))
    }
}

/// Longest single watch-time report accepted, one day of playback.
pub const MAX_REPORT_SECS: i64 = 24 * 60 * 60;

/// Whole seconds in a watch-time report, `None` unless between one second
/// and [`MAX_REPORT_SECS`].
pub fn whole_seconds(watch_time: Option<f64>) -> Option<i64> {
    let value = watch_time.filter(|v| v.is_finite() && *v > 0.0)?;
    let seconds = value.trunc();
    if seconds < 1.0 || seconds > MAX_REPORT_SECS as f64 {
        return None;
    }
    Some(seconds as i64)
}

/// Accumulated seconds at which a video counts as completed.
///
/// Videos without a positive duration never complete.
pub fn completion_threshold(duration_secs: Option<f64>, ratio: f64) -> Option<f64> {
    duration_secs
        .filter(|d| d.is_finite() && *d > 0.0)
        .map(|d| d * ratio)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_seconds() {
        assert_eq!(whole_seconds(Some(30.0)), Some(30));
        assert_eq!(whole_seconds(Some(12.9)), Some(12));
        assert_eq!(whole_seconds(Some(0.4)), None);
        assert_eq!(whole_seconds(Some(0.0)), None);
        assert_eq!(whole_seconds(Some(-5.0)), None);
        assert_eq!(whole_seconds(Some(f64::NAN)), None);
        assert_eq!(whole_seconds(Some(f64::INFINITY)), None);
        assert_eq!(whole_seconds(None), None);
    }

    #[test]
    fn test_whole_seconds_rejects_oversized_reports() {
        assert_eq!(whole_seconds(Some(86_400.0)), Some(MAX_REPORT_SECS));
        assert_eq!(whole_seconds(Some(86_401.0)), None);
        assert_eq!(whole_seconds(Some(9.2e18)), None);
    }

    #[test]
    fn test_completion_threshold() {
        assert_eq!(completion_threshold(Some(600.0), 0.9), Some(540.0));
        assert_eq!(completion_threshold(Some(0.0), 0.9), None);
        assert_eq!(completion_threshold(None, 0.9), None);
    }
}
