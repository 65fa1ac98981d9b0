//! 应用入口 - 编排层
//!
//! 负责初始化（日志、服务探活）并驱动一次完整会话：
//! 读取文档 → 生成 → 下载保存

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::{HttpPaperApi, PaperApi};
use crate::models::{FileEntry, GenerationResult, MAX_BATCH_SIZE};
use crate::utils::logging::{
    append_log_line, init_log_file, log_batch, log_generation_summary, log_startup,
};
use crate::workflow::{DownloadOutcome, GenerateOutcome, WorkflowController};

/// 一次会话的产出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub result: GenerationResult,
    pub artifact_path: PathBuf,
}

/// 应用主结构
pub struct App {
    config: Config,
    controller: Arc<WorkflowController>,
}

impl App {
    /// 初始化应用，连接真实服务
    pub async fn initialize(config: Config) -> Result<Self> {
        let api = HttpPaperApi::new(&config).context("无法创建 HTTP 客户端")?;
        Self::with_api(config, Arc::new(api)).await
    }

    /// 使用指定的 PaperApi 初始化
    pub async fn with_api(config: Config, api: Arc<dyn PaperApi>) -> Result<Self> {
        init_log_file(&config.log_file)?;
        log_startup(&config);

        probe_health(api.as_ref()).await;

        let controller = Arc::new(WorkflowController::new(api, &config));
        Ok(Self { config, controller })
    }

    pub fn controller(&self) -> &Arc<WorkflowController> {
        &self.controller
    }

    /// 运行一次会话
    ///
    /// # 参数
    /// - `paths`: 待上传的文档路径
    ///
    /// # 返回
    /// 返回生成摘要和保存路径
    pub async fn run(&self, paths: &[PathBuf]) -> Result<RunSummary> {
        let entries = load_entries(paths).await?;

        let batch = self.controller.add_files(entries)?;
        if batch.len() < paths.len() {
            let notice = format!(
                "最多提交 {} 份文档，其余 {} 份已忽略",
                MAX_BATCH_SIZE,
                paths.len() - batch.len()
            );
            warn!("⚠️ {}", notice);
            self.record(&notice);
        }
        log_batch(&batch);

        let result = self.generate_with_interrupt().await?;
        log_generation_summary(&result);
        self.record(&format!(
            "生成成功: 模块 {} 题目 {}",
            result.modules_found, result.questions_extracted
        ));

        let artifact_path = match self.controller.download().await {
            DownloadOutcome::Saved(path) => path,
            DownloadOutcome::Rejected(err) | DownloadOutcome::Failed(err) => {
                self.record(&format!("下载失败: {}", err));
                bail!("{}", err)
            }
            DownloadOutcome::AlreadyDownloading => bail!("已有下载在进行"),
        };
        self.record(&format!("已保存: {}", artifact_path.display()));

        info!("\n日志已保存至: {}", self.config.log_file);

        Ok(RunSummary {
            result,
            artifact_path,
        })
    }

    /// 生成，期间 Ctrl-C 会取消请求
    async fn generate_with_interrupt(&self) -> Result<GenerationResult> {
        let controller = self.controller.clone();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("收到中断信号，正在取消生成...");
                controller.cancel_generation();
            }
        });

        let outcome = self.controller.generate().await;
        interrupt.abort();

        match outcome {
            GenerateOutcome::Ready(result) => Ok(result),
            GenerateOutcome::Failed(err) | GenerateOutcome::Rejected(err) => {
                self.record(&format!("生成失败: {}", err));
                bail!("{}", err)
            }
            GenerateOutcome::Cancelled => bail!("生成已取消"),
            GenerateOutcome::AlreadySubmitting => bail!("已有生成在进行"),
        }
    }

    /// 写入会话日志，失败只告警
    fn record(&self, line: &str) {
        if let Err(e) = append_log_line(&self.config.log_file, line) {
            warn!("写入日志失败: {}", e);
        }
    }
}

/// 读取所有文档的元数据
async fn load_entries(paths: &[PathBuf]) -> Result<Vec<FileEntry>> {
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        let entry = FileEntry::from_path(path)
            .await
            .with_context(|| format!("无法读取文档: {}", path.display()))?;
        entries.push(entry);
    }
    Ok(entries)
}

/// 探测服务是否在线，失败不影响后续流程
async fn probe_health(api: &dyn PaperApi) {
    match api.health().await {
        Ok(response) if response.is_success() => info!("✓ 生成服务在线"),
        Ok(response) => warn!("⚠️ 生成服务状态异常: HTTP {}", response.status),
        Err(e) => warn!("⚠️ 无法连接生成服务: {}", e),
    }
}
