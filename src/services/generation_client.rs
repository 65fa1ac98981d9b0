//! 试卷生成服务 - 业务能力层
//!
//! 只负责"提交一批文档并解释结果"能力，不关心状态流转

use std::sync::Arc;

use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ValidationError, WorkflowError, GENERATE_FALLBACK_MESSAGE};
use crate::infrastructure::{ApiResponse, PaperApi, UploadPart};
use crate::models::{GenerationResult, UploadBatch};
use crate::utils::logging::truncate_text;

/// 错误体中识别的字段，按优先级排列
const ERROR_BODY_KEYS: [&str; 2] = ["error", "message"];

/// 试卷生成服务
///
/// 职责：
/// - 本地检查（空批次、总大小）在任何网络请求之前完成
/// - 一次 multipart 提交，失败不重试
/// - 把传输错误过滤成用户可读的信息
pub struct GenerationClient {
    api: Arc<dyn PaperApi>,
    max_upload_bytes: u64,
}

impl GenerationClient {
    pub fn new(api: Arc<dyn PaperApi>, config: &Config) -> Self {
        Self {
            api,
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// 提交批次并生成新试卷
    ///
    /// # 参数
    /// - `batch`: 当前批次
    ///
    /// # 返回
    /// 成功返回生成摘要；本地校验失败为 Validation 类错误，服务端失败为 Remote 类错误
    pub async fn generate(&self, batch: &UploadBatch) -> Result<GenerationResult, WorkflowError> {
        let parts = self.prepare(batch).await?;
        self.submit(parts).await
    }

    /// 本地检查并读取文档内容，不发任何请求
    ///
    /// 依次检查：批次非空、总大小不超限、每个文档可读
    pub async fn prepare(&self, batch: &UploadBatch) -> Result<Vec<UploadPart>, ValidationError> {
        if batch.is_empty() {
            return Err(ValidationError::EmptyBatch);
        }

        let total_size = batch.total_size();
        if total_size > self.max_upload_bytes {
            return Err(ValidationError::PayloadTooLarge {
                size: total_size,
                limit: self.max_upload_bytes,
            });
        }

        let mut parts = Vec::with_capacity(batch.len());
        for entry in batch {
            let bytes = entry.read_bytes().await.map_err(|e| {
                warn!("读取文档失败: {}", e);
                ValidationError::UnreadableFile {
                    name: entry.name.clone(),
                }
            })?;
            parts.push(UploadPart {
                file_name: entry.name.clone(),
                mime: entry.mime_hint.clone(),
                bytes,
            });
        }
        Ok(parts)
    }

    /// 一次 multipart 提交并解释响应
    pub async fn submit(&self, parts: Vec<UploadPart>) -> Result<GenerationResult, WorkflowError> {
        let total_bytes: usize = parts.iter().map(|p| p.bytes.len()).sum();
        info!("📤 正在提交 {} 份文档 ({} 字节)...", parts.len(), total_bytes);

        let response = match self.api.post_generate(parts).await {
            Ok(response) => response,
            Err(e) => {
                warn!("生成请求失败: {}", e);
                return Err(WorkflowError::remote(GENERATE_FALLBACK_MESSAGE));
            }
        };

        let result = interpret_generate_response(&response)?;
        info!(
            "✓ 生成完成: 模块 {} 个，题目 {} 道",
            result.modules_found, result.questions_extracted
        );
        Ok(result)
    }
}

/// 解释 `/generate` 的响应
///
/// 2xx 解析为 GenerationResult；其他状态取错误体中的信息，取不到则用通用提示
pub fn interpret_generate_response(
    response: &ApiResponse,
) -> Result<GenerationResult, WorkflowError> {
    if response.is_success() {
        return serde_json::from_slice(&response.body).map_err(|e| {
            warn!(
                "无法解析生成结果: {} (响应: {})",
                e,
                truncate_text(&String::from_utf8_lossy(&response.body), 200)
            );
            WorkflowError::remote(GENERATE_FALLBACK_MESSAGE)
        });
    }

    let message = extract_error_message(&response.body);
    debug!("生成失败，状态码 {}，服务端信息: {:?}", response.status, message);

    Err(WorkflowError::remote(
        message.unwrap_or_else(|| GENERATE_FALLBACK_MESSAGE.to_string()),
    ))
}

/// 从 JSON 错误体中提取 `error` 或 `message`
pub fn extract_error_message(body: &[u8]) -> Option<String> {
    let value: JsonValue = serde_json::from_slice(body).ok()?;
    ERROR_BODY_KEYS
        .iter()
        .find_map(|key| value.get(key).and_then(JsonValue::as_str))
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}
