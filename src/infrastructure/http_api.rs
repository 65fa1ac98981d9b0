//! 基于 reqwest 的 PaperApi 实现

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::infrastructure::paper_api::{
    ApiResponse, PaperApi, UploadPart, DOWNLOAD_ENDPOINT, FILES_FIELD, GENERATE_ENDPOINT,
    HEALTH_ENDPOINT,
};

/// HTTP 客户端
///
/// 职责：
/// - 持有唯一的 reqwest::Client
/// - 构造 multipart 请求
/// - 不认识 GenerationResult / 错误体
pub struct HttpPaperApi {
    client: Client,
    base_url: String,
    download_timeout: Option<Duration>,
}

impl HttpPaperApi {
    /// 创建新的 HTTP 客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::api_request_failed(&config.api_base_url, e))?;

        Ok(Self::with_client(client, config))
    }

    /// 使用已构建的 reqwest::Client
    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            download_timeout: config.download_timeout(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// 发送请求并读取完整响应体
    async fn send(&self, endpoint: &str, request: RequestBuilder) -> AppResult<ApiResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::api_request_failed(endpoint, e))?;

        debug!("{} -> {} ({} 字节)", endpoint, status, body.len());

        Ok(ApiResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl PaperApi for HttpPaperApi {
    async fn post_generate(&self, parts: Vec<UploadPart>) -> AppResult<ApiResponse> {
        let mut form = Form::new();
        for part in parts {
            let file_part = Part::bytes(part.bytes)
                .file_name(part.file_name)
                .mime_str(&part.mime)
                .map_err(|e| AppError::api_request_failed(GENERATE_ENDPOINT, e))?;
            form = form.part(FILES_FIELD, file_part);
        }

        let request = self.client.post(self.url(GENERATE_ENDPOINT)).multipart(form);
        self.send(GENERATE_ENDPOINT, request).await
    }

    async fn get_download(&self, generation_id: Option<&str>) -> AppResult<ApiResponse> {
        let mut request = self.client.get(self.url(DOWNLOAD_ENDPOINT));
        if let Some(id) = generation_id {
            request = request.query(&[("id", id)]);
        }
        if let Some(timeout) = self.download_timeout {
            request = request.timeout(timeout);
        }
        self.send(DOWNLOAD_ENDPOINT, request).await
    }

    async fn health(&self) -> AppResult<ApiResponse> {
        let request = self
            .client
            .get(self.url(HEALTH_ENDPOINT))
            .timeout(Duration::from_secs(5));
        self.send(HEALTH_ENDPOINT, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// 请求头和请求体是否已经完整到达
    fn request_complete(raw: &[u8]) -> bool {
        let Some(header_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let headers = String::from_utf8_lossy(&raw[..header_end]).to_ascii_lowercase();
        let body_len = raw.len() - (header_end + 4);

        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());
        match content_length {
            Some(len) => body_len >= len,
            None if headers.contains("transfer-encoding: chunked") => raw.ends_with(b"0\r\n\r\n"),
            None => true,
        }
    }

    /// 在本地端口上应答一次请求，返回服务地址和收到的原始请求
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 4096];
            while !request_complete(&raw) {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&raw).to_string()
        });

        (format!("http://{}", addr), handle)
    }

    fn api_at(base_url: String) -> HttpPaperApi {
        let config = Config {
            api_base_url: base_url,
            ..Config::default()
        };
        // 本地服务不走环境变量里的代理
        let client = Client::builder().no_proxy().build().unwrap();
        HttpPaperApi::with_client(client, &config)
    }

    #[test]
    fn test_new_builds_default_client() {
        let api = HttpPaperApi::new(&Config::default()).unwrap();
        assert_eq!(api.base_url(), "http://localhost:5000");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let api = api_at("http://localhost:5000/".to_string());
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.url(GENERATE_ENDPOINT), "http://localhost:5000/generate");
    }

    #[tokio::test]
    async fn test_generate_sends_one_files_part_per_document() {
        let (base_url, server) = serve_once(
            "200 OK",
            r#"{"success": true, "modulesFound": 2, "questionsExtracted": 2}"#,
        )
        .await;
        let api = api_at(base_url);

        let response = api
            .post_generate(vec![
                UploadPart {
                    file_name: "paperA.docx".to_string(),
                    mime: "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
                        .to_string(),
                    bytes: b"first-paper".to_vec(),
                },
                UploadPart {
                    file_name: "paperB.doc".to_string(),
                    mime: "application/msword".to_string(),
                    bytes: b"second-paper".to_vec(),
                },
            ])
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert!(response.is_success());

        let raw = server.await.unwrap();
        let lower = raw.to_ascii_lowercase();
        assert!(raw.starts_with("POST /generate HTTP/1.1"));
        assert!(lower.contains("content-type: multipart/form-data; boundary="));
        assert_eq!(lower.matches(r#"form-data; name="files""#).count(), 2);
        assert!(raw.contains(r#"name="files"; filename="paperA.docx""#));
        assert!(raw.contains(r#"name="files"; filename="paperB.doc""#));
        assert!(lower.contains(
            "content-type: application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ));
        assert!(lower.contains("content-type: application/msword"));
        // 文档按批次顺序排列
        let first = raw.find("first-paper").unwrap();
        let second = raw.find("second-paper").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_download_passes_generation_id_and_keeps_error_status() {
        let (base_url, server) = serve_once("404 Not Found", r#"{"error": "File not found"}"#).await;
        let api = api_at(base_url);

        let response = api.get_download(Some("g-42")).await.unwrap();

        assert_eq!(response.status, 404);
        assert_eq!(response.body, br#"{"error": "File not found"}"#.to_vec());

        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /download?id=g-42 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_download_without_id_is_bare() {
        let (base_url, server) = serve_once("200 OK", "docx").await;
        let api = api_at(base_url);

        let response = api.get_download(None).await.unwrap();

        assert_eq!(response.body, b"docx".to_vec());
        let raw = server.await.unwrap();
        assert!(raw.starts_with("GET /download HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        // 绑定后立即释放，得到一个确定没有监听的端口
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = api_at(format!("http://{}", addr));
        let result = api.health().await;
        assert!(matches!(result, Err(AppError::Api(_))));
    }
}
