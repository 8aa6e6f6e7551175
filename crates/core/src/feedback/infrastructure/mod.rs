pub mod log_capture_feedback;
pub mod recording_capture_feedback;
