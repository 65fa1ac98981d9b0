use async_trait::async_trait;

use crate::error::AppResult;

pub const GENERATE_ENDPOINT: &str = "/generate";
pub const DOWNLOAD_ENDPOINT: &str = "/download";
pub const HEALTH_ENDPOINT: &str = "/health";

/// multipart 表单中承载文档的字段名（每个文档重复一次）
pub const FILES_FIELD: &str = "files";

/// 一个待上传的 multipart 分片
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPart {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// 服务端原始响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx 视为成功
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// 试卷生成服务的传输能力
///
/// 只负责把请求送出去、把响应原样带回来；
/// 传输失败返回 `Err`，任何收到的 HTTP 响应（包括 4xx/5xx）都返回 `Ok`。
#[async_trait]
pub trait PaperApi: Send + Sync {
    /// `POST /generate`，每个分片放在重复的 `files` 字段下
    async fn post_generate(&self, parts: Vec<UploadPart>) -> AppResult<ApiResponse>;

    /// `GET /download`，有标识时附带 `?id=`
    async fn get_download(&self, generation_id: Option<&str>) -> AppResult<ApiResponse>;

    /// `GET /health`
    async fn health(&self) -> AppResult<ApiResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(ApiResponse::new(200, "").is_success());
        assert!(ApiResponse::new(204, "").is_success());
        assert!(!ApiResponse::new(199, "").is_success());
        assert!(!ApiResponse::new(302, "").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
        assert!(!ApiResponse::new(500, "").is_success());
    }
}
