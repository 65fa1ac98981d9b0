//! 测试用的 PaperApi，按脚本返回响应并记录调用

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};
use crate::infrastructure::paper_api::{ApiResponse, PaperApi, UploadPart};

/// 脚本中的一步
pub(crate) enum Step {
    Respond(ApiResponse),
    TransportError,
}

#[derive(Default)]
pub(crate) struct ScriptedApi {
    generate_steps: Mutex<VecDeque<Step>>,
    download_steps: Mutex<VecDeque<Step>>,
    pub(crate) uploads: Mutex<Vec<Vec<UploadPart>>>,
    pub(crate) download_ids: Mutex<Vec<Option<String>>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn on_generate(self, step: Step) -> Self {
        self.generate_steps.lock().unwrap().push_back(step);
        self
    }

    pub(crate) fn on_download(self, step: Step) -> Self {
        self.download_steps.lock().unwrap().push_back(step);
        self
    }

    pub(crate) fn generate_calls(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    fn next(steps: &Mutex<VecDeque<Step>>, endpoint: &str) -> AppResult<ApiResponse> {
        match steps.lock().unwrap().pop_front() {
            Some(Step::Respond(response)) => Ok(response),
            Some(Step::TransportError) | None => Err(AppError::api_request_failed(
                endpoint,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            )),
        }
    }
}

#[async_trait]
impl PaperApi for ScriptedApi {
    async fn post_generate(&self, parts: Vec<UploadPart>) -> AppResult<ApiResponse> {
        self.uploads.lock().unwrap().push(parts);
        Self::next(&self.generate_steps, "/generate")
    }

    async fn get_download(&self, generation_id: Option<&str>) -> AppResult<ApiResponse> {
        self.download_ids
            .lock()
            .unwrap()
            .push(generation_id.map(str::to_string));
        Self::next(&self.download_steps, "/download")
    }

    async fn health(&self) -> AppResult<ApiResponse> {
        Ok(ApiResponse::new(200, r#"{"status":"healthy"}"#))
    }
}
