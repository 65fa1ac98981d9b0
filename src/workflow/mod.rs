pub mod controller;
pub mod state;

pub use controller::{DownloadOutcome, GenerateOutcome, SessionSnapshot, WorkflowController};
pub use state::WorkflowState;
