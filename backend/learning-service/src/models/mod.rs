/// Data models for learning-service
///
/// - `user`: platform accounts and their role
/// - `video`: lecture video records carrying the transcript
/// - `progress`: per student/video watch progress and its API views
/// - `qa`: question answering payloads
pub mod progress;
pub mod qa;
pub mod user;
pub mod video;

pub use progress::*;
pub use qa::*;
pub use user::*;
pub use video::*;

use serde::Serialize;

/// Success envelope shared by every JSON endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
