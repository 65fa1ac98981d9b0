//! 基础设施层
//!
//! 持有稀缺资源（HTTP 客户端），只暴露能力，不解释响应内容

pub mod http_api;
pub mod paper_api;

pub use http_api::HttpPaperApi;
pub use paper_api::{ApiResponse, PaperApi, UploadPart, DOWNLOAD_ENDPOINT, FILES_FIELD, GENERATE_ENDPOINT, HEALTH_ENDPOINT};

#[cfg(test)]
pub(crate) mod scripted_api;
