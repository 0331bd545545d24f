/// Watch progress records and the views built from them.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row per (student, video)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WatchProgress {
    pub id: Uuid,
    pub student_id: Uuid,
    pub video_id: Uuid,
    /// Video title captured when the record was created
    pub title: String,
    pub watch_time_secs: i64,
    pub questions_asked: i32,
    pub completed: bool,
    pub last_watched: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Progress row joined with the current video title, used by admin reports
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRow {
    pub student_id: Uuid,
    pub video_id: Uuid,
    pub title: String,
    pub video_title: Option<String>,
    pub watch_time_secs: i64,
    pub questions_asked: i32,
    pub completed: bool,
    pub last_watched: DateTime<Utc>,
}

/// Render seconds as `HH:MM:SS`; hours keep growing past 99.
pub fn format_watch_time(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hrs = seconds / 3600;
    let mins = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hrs, mins, secs)
}

// ========================================
// Requests
// ========================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackWatchTimeRequest {
    pub video_id: Option<Uuid>,
    /// Seconds watched since the previous report
    pub watch_time: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackQuestionRequest {
    pub video_id: Option<Uuid>,
}

// ========================================
// Responses
// ========================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchTimeUpdate {
    pub video_id: Uuid,
    pub title: String,
    pub watch_time: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionCount {
    pub questions_asked: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoActivity {
    pub video_id: Uuid,
    pub title: String,
    pub watch_time: i64,
    pub formatted_watch_time: String,
    pub questions_asked: i32,
    pub completed: bool,
    pub last_watched: DateTime<Utc>,
}

impl From<&WatchProgress> for VideoActivity {
    fn from(record: &WatchProgress) -> Self {
        Self {
            video_id: record.video_id,
            title: record.title.clone(),
            watch_time: record.watch_time_secs,
            formatted_watch_time: format_watch_time(record.watch_time_secs),
            questions_asked: record.questions_asked,
            completed: record.completed,
            last_watched: record.last_watched,
        }
    }
}

impl From<&ActivityRow> for VideoActivity {
    fn from(row: &ActivityRow) -> Self {
        let title = if !row.title.trim().is_empty() {
            row.title.clone()
        } else {
            row.video_title
                .clone()
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_string())
        };

        Self {
            video_id: row.video_id,
            title,
            watch_time: row.watch_time_secs,
            formatted_watch_time: format_watch_time(row.watch_time_secs),
            questions_asked: row.questions_asked,
            completed: row.completed,
            last_watched: row.last_watched,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentStats {
    pub total_videos: usize,
    pub total_watch_time: i64,
    pub formatted_total_time: String,
    pub videos_completed: usize,
    pub total_questions: i64,
}

impl StudentStats {
    pub fn from_activities(activities: &[VideoActivity]) -> Self {
        let total_watch_time: i64 = activities.iter().map(|a| a.watch_time).sum();

        Self {
            total_videos: activities.len(),
            total_watch_time,
            formatted_total_time: format_watch_time(total_watch_time),
            videos_completed: activities.iter().filter(|a| a.completed).count(),
            total_questions: activities.iter().map(|a| a.questions_asked as i64).sum(),
        }
    }
}

/// The calling student's own dashboard
#[derive(Debug, Clone, Serialize)]
pub struct StudentSummary {
    pub videos: Vec<VideoActivity>,
    pub stats: StudentStats,
}

/// One student's line in the admin report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProgress {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub username: String,
    pub total_watch_time: i64,
    pub formatted_total_time: String,
    pub videos_watched: usize,
    pub videos_completed: usize,
    pub total_questions: i64,
    pub activities: Vec<VideoActivity>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(watch_time: i64, questions: i32, completed: bool) -> VideoActivity {
        VideoActivity {
            video_id: Uuid::new_v4(),
            title: "Lecture".into(),
            watch_time,
            formatted_watch_time: format_watch_time(watch_time),
            questions_asked: questions,
            completed,
            last_watched: Utc::now(),
        }
    }

    #[test]
    fn test_format_watch_time() {
        assert_eq!(format_watch_time(0), "00:00:00");
        assert_eq!(format_watch_time(59), "00:00:59");
        assert_eq!(format_watch_time(3600), "01:00:00");
        assert_eq!(format_watch_time(8100), "02:15:00");
        assert_eq!(format_watch_time(3661), "01:01:01");
        assert_eq!(format_watch_time(360_000), "100:00:00");
        assert_eq!(format_watch_time(-42), "00:00:00");
    }

    #[test]
    fn test_stats_from_activities() {
        let activities = vec![
            activity(3600, 5, true),
            activity(1800, 2, false),
            activity(2700, 3, true),
        ];

        let stats = StudentStats::from_activities(&activities);
        assert_eq!(stats.total_videos, 3);
        assert_eq!(stats.total_watch_time, 8100);
        assert_eq!(stats.formatted_total_time, "02:15:00");
        assert_eq!(stats.videos_completed, 2);
        assert_eq!(stats.total_questions, 10);
    }

    #[test]
    fn test_stats_empty() {
        let stats = StudentStats::from_activities(&[]);
        assert_eq!(stats.total_videos, 0);
        assert_eq!(stats.formatted_total_time, "00:00:00");
    }

    #[test]
    fn test_activity_title_fallbacks() {
        let mut row = ActivityRow {
            student_id: Uuid::new_v4(),
            video_id: Uuid::new_v4(),
            title: "".into(),
            video_title: Some("Renamed lecture".into()),
            watch_time_secs: 90,
            questions_asked: 0,
            completed: false,
            last_watched: Utc::now(),
        };
        assert_eq!(VideoActivity::from(&row).title, "Renamed lecture");

        row.video_title = None;
        assert_eq!(VideoActivity::from(&row).title, "Unknown");

        row.title = "Original".into();
        assert_eq!(VideoActivity::from(&row).title, "Original");
    }

    #[test]
    fn test_activity_serializes_camel_case() {
        let json = serde_json::to_value(activity(61, 1, false)).unwrap();
        assert_eq!(json["formattedWatchTime"], "00:01:01");
        assert_eq!(json["questionsAsked"], 1);
        assert!(json.get("lastWatched").is_some());
    }
}
