//! 试卷下载服务 - 业务能力层

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::WorkflowError;
use crate::infrastructure::PaperApi;
use crate::models::Artifact;

/// 下载的试卷一律以此文件名保存，与服务端给出的名字无关
pub const DOWNLOAD_FILE_NAME: &str = "new_question_paper.docx";

/// 试卷下载服务
///
/// 任何失败都统一为通用的下载错误，不区分具体原因
pub struct DownloadClient {
    api: Arc<dyn PaperApi>,
}

impl DownloadClient {
    pub fn new(api: Arc<dyn PaperApi>) -> Self {
        Self { api }
    }

    /// 下载生成的试卷
    ///
    /// # 参数
    /// - `generation_id`: 生成时服务端返回的标识（如有）
    pub async fn download(&self, generation_id: Option<&str>) -> Result<Artifact, WorkflowError> {
        info!("📥 正在下载试卷...");

        match self.api.get_download(generation_id).await {
            Ok(response) if response.is_success() => {
                info!("✓ 下载完成 ({} 字节)", response.body.len());
                Ok(Artifact::new(DOWNLOAD_FILE_NAME, response.body))
            }
            Ok(response) => {
                warn!("下载失败，状态码 {}", response.status);
                Err(WorkflowError::download())
            }
            Err(e) => {
                warn!("下载请求失败: {}", e);
                Err(WorkflowError::download())
            }
        }
    }
}
