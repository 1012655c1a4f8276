pub mod orchestrator;

pub use orchestrator::{Feedback, FeedbackLevel, Session, replay, run, write_accounts};
