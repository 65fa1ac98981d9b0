pub mod artifact;
pub mod file_entry;
pub mod generation;

pub use artifact::Artifact;
pub use file_entry::{FileEntry, FileSource, UploadBatch, ACCEPTED_SUFFIXES, MAX_BATCH_SIZE};
pub use generation::GenerationResult;
