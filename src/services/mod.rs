pub mod artifact_writer;
pub mod download_client;
pub mod file_intake;
pub mod generation_client;
pub mod result_store;

pub use artifact_writer::ArtifactWriter;
pub use download_client::{DownloadClient, DOWNLOAD_FILE_NAME};
pub use file_intake::FileIntake;
pub use generation_client::GenerationClient;
pub use result_store::ResultStore;
