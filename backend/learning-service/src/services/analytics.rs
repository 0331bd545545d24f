/// Analytics service - admin view of every student's progress
use crate::db::{progress_repo, user_repo};
use crate::error::Result;
use crate::models::{ActivityRow, Role, StudentProgress, StudentStats, User, VideoActivity};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every student with totals and activities, most watch time first
    pub async fn student_progress(&self) -> Result<Vec<StudentProgress>> {
        let students = user_repo::list_by_role(&self.pool, Role::Student).await?;
        let ids: Vec<Uuid> = students.iter().map(|s| s.id).collect();
        let rows = progress_repo::list_activity_for_students(&self.pool, &ids).await?;

        tracing::debug!(
            students = students.len(),
            records = rows.len(),
            "building student progress report"
        );

        Ok(build_report(students, &rows))
    }
}

/// Group activity rows by student. Students without rows get zero totals.
pub fn build_report(students: Vec<User>, rows: &[ActivityRow]) -> Vec<StudentProgress> {
    let mut by_student: HashMap<Uuid, Vec<VideoActivity>> = HashMap::new();
    for row in rows {
        by_student
            .entry(row.student_id)
            .or_default()
            .push(VideoActivity::from(row));
    }

    let mut report: Vec<StudentProgress> = students
        .into_iter()
        .map(|student| {
            let activities = by_student.remove(&student.id).unwrap_or_default();
            let stats = StudentStats::from_activities(&activities);

            StudentProgress {
                id: student.id,
                name: student.name,
                email: student.email,
                username: student.username,
                total_watch_time: stats.total_watch_time,
                formatted_total_time: stats.formatted_total_time,
                videos_watched: stats.total_videos,
                videos_completed: stats.videos_completed,
                total_questions: stats.total_questions,
                activities,
            }
        })
        .collect();

    // Stable sort keeps the name order from the query among ties.
    report.sort_by(|a, b| b.total_watch_time.cmp(&a.total_watch_time));
    report
}
