/// Business logic layer for learning-service
///
/// - Progress service: watch time and question tracking, student summary
/// - Analytics service: admin report over all students
/// - Video service: lecture video records
/// - QA service: transcript-grounded question answering
pub mod analytics;
pub mod progress;
pub mod qa;
pub mod videos;

pub use analytics::AnalyticsService;
pub use progress::ProgressService;
pub use qa::{QaService, QaSettings};
pub use videos::VideoService;
