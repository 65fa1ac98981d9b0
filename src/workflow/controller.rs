//! 工作流控制器 - 流程层
//!
//! 核心职责：把接收、生成、下载组合成用户可见的流程
//!
//! 状态流转：
//! 0. 本地校验未通过 → 状态不变
//! 1. Idle / Ready / Failed + 生成 → Submitting
//! 2. Submitting + 成功 → Ready（清除旧错误）
//! 3. Submitting + 失败 → Failed（清除旧结果）
//! 4. Ready + 下载 → 状态不变，失败只留下一条提示

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{oneshot, Semaphore};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ErrorKind, ValidationError, WorkflowError, GENERATE_TIMEOUT_MESSAGE};
use crate::infrastructure::PaperApi;
use crate::models::{FileEntry, GenerationResult, UploadBatch};
use crate::services::{ArtifactWriter, DownloadClient, FileIntake, GenerationClient, ResultStore};
use crate::workflow::state::WorkflowState;

/// 一次生成操作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// 生成成功，进入 Ready
    Ready(GenerationResult),
    /// 提交后失败，进入 Failed
    Failed(WorkflowError),
    /// 本地校验未通过，状态不变
    Rejected(WorkflowError),
    /// 已有生成在进行，本次忽略
    AlreadySubmitting,
    /// 被取消，回到 Idle
    Cancelled,
}

/// 一次下载操作的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// 已保存到该路径
    Saved(PathBuf),
    /// 尚无可下载的试卷
    Rejected(WorkflowError),
    Failed(WorkflowError),
    /// 已有下载在进行，本次忽略
    AlreadyDownloading,
}

/// 会话快照，用于展示
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub files: UploadBatch,
    pub state: WorkflowState,
    /// 不改变状态的临时提示（校验失败、下载失败）
    pub notice: Option<WorkflowError>,
}

impl SessionSnapshot {
    /// 当前应展示给用户的错误
    pub fn visible_error(&self) -> Option<&WorkflowError> {
        self.notice.as_ref().or_else(|| self.state.error())
    }
}

/// 会话内的可变数据
#[derive(Default)]
struct Session {
    intake: FileIntake,
    store: ResultStore,
    notice: Option<WorkflowError>,
    cancel: Option<oneshot::Sender<()>>,
}

/// 工作流控制器
///
/// - 每个会话一个实例，可以放进 Arc 在多个任务间共享
/// - 会话数据在同一把锁后面，锁不会跨 await 持有
/// - 生成与下载各自单飞：各持一个单许可的 Semaphore，许可随 drop 归还
pub struct WorkflowController {
    session: Mutex<Session>,
    generating: Semaphore,
    downloading: Semaphore,
    generation: GenerationClient,
    downloads: DownloadClient,
    writer: ArtifactWriter,
    generation_timeout: Option<Duration>,
}

impl WorkflowController {
    /// 创建新的会话
    pub fn new(api: Arc<dyn PaperApi>, config: &Config) -> Self {
        Self {
            session: Mutex::new(Session::default()),
            generating: Semaphore::new(1),
            downloading: Semaphore::new(1),
            generation: GenerationClient::new(api.clone(), config),
            downloads: DownloadClient::new(api),
            writer: ArtifactWriter::new(config),
            generation_timeout: config.generation_timeout(),
        }
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_generating(&self) -> bool {
        self.generating.available_permits() == 0
    }

    fn is_downloading(&self) -> bool {
        self.downloading.available_permits() == 0
    }

    // ========== 查询 ==========

    pub fn state(&self) -> WorkflowState {
        let session = self.session();
        WorkflowState::derive(self.is_generating(), &session.store)
    }

    pub fn batch(&self) -> UploadBatch {
        self.session().intake.batch().clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let session = self.session();
        SessionSnapshot {
            files: session.intake.batch().clone(),
            state: WorkflowState::derive(self.is_generating(), &session.store),
            notice: session.notice.clone(),
        }
    }

    /// 还能继续添加文档
    pub fn can_add_files(&self) -> bool {
        !self.is_generating() && !self.session().intake.batch().is_full()
    }

    /// 生成按钮是否可用
    pub fn can_generate(&self) -> bool {
        !self.is_generating() && !self.session().intake.batch().is_empty()
    }

    /// 下载按钮是否可用
    pub fn can_download(&self) -> bool {
        !self.is_downloading() && self.state().is_ready()
    }

    // ========== 批次编辑 ==========

    /// 添加文档，整批校验
    pub fn add_files(&self, candidates: Vec<FileEntry>) -> Result<UploadBatch, WorkflowError> {
        let mut session = self.session();
        if self.is_generating() {
            return Err(ValidationError::BatchLocked.into());
        }

        match session.intake.add_files(candidates).map(UploadBatch::clone) {
            Ok(batch) => {
                session.notice = None;
                Ok(batch)
            }
            Err(e) => {
                let err = WorkflowError::from(e);
                session.notice = Some(err.clone());
                Err(err)
            }
        }
    }

    /// 移除指定位置的文档
    pub fn remove_file(&self, index: usize) -> Result<UploadBatch, WorkflowError> {
        let mut session = self.session();
        if self.is_generating() {
            return Err(ValidationError::BatchLocked.into());
        }

        let removed = session.intake.remove_file(index)?;
        debug!("移除文档: {}", removed.name);
        Ok(session.intake.batch().clone())
    }

    // ========== 生成 ==========

    /// 提交当前批次
    ///
    /// 已有生成在进行时直接返回 `AlreadySubmitting`，不发请求；
    /// 本地校验（空批次、总大小、文档可读）失败时返回 `Rejected`，保留上一次结果
    pub async fn generate(&self) -> GenerateOutcome {
        let batch = {
            let mut session = self.session();
            if session.intake.batch().is_empty() {
                let err = WorkflowError::from(ValidationError::EmptyBatch);
                session.notice = Some(err.clone());
                return GenerateOutcome::Rejected(err);
            }
            session.intake.batch().clone()
        };

        let Ok(_in_flight) = self.generating.try_acquire() else {
            debug!("已有生成在进行，忽略本次请求");
            return GenerateOutcome::AlreadySubmitting;
        };

        let parts = match self.generation.prepare(&batch).await {
            Ok(parts) => parts,
            Err(e) => {
                let err = WorkflowError::from(e);
                warn!("⚠️ 本地校验未通过，状态不变: {}", err);
                self.session().notice = Some(err.clone());
                return GenerateOutcome::Rejected(err);
            }
        };

        let cancel_rx = {
            let mut session = self.session();
            session.notice = None;
            session.store.clear();
            let (cancel_tx, cancel_rx) = oneshot::channel();
            session.cancel = Some(cancel_tx);
            cancel_rx
        };

        info!("🚀 开始生成，共 {} 份文档", batch.len());

        let outcome = tokio::select! {
            result = with_deadline(self.generation.submit(parts), self.generation_timeout) => result,
            Ok(()) = cancel_rx => Err(WorkflowError::cancelled()),
        };

        let mut session = self.session();
        session.cancel = None;
        match outcome {
            Ok(result) => {
                info!("✓ 状态 → Ready");
                session.store.record_success(result.clone());
                GenerateOutcome::Ready(result)
            }
            Err(err) if err.kind == ErrorKind::Cancelled => {
                info!("⏹ 生成已取消，状态 → Idle");
                GenerateOutcome::Cancelled
            }
            Err(err) => {
                warn!("⚠️ 生成失败，状态 → Failed: {}", err);
                session.store.record_failure(err.clone());
                GenerateOutcome::Failed(err)
            }
        }
    }

    /// 取消正在进行的生成
    ///
    /// # 返回
    /// 有生成在进行并已发出取消信号时返回 true
    pub fn cancel_generation(&self) -> bool {
        match self.session().cancel.take() {
            Some(cancel_tx) => cancel_tx.send(()).is_ok(),
            None => false,
        }
    }

    // ========== 下载 ==========

    /// 下载并保存最近一次生成的试卷
    ///
    /// 只在 Ready 状态下可用；失败只记录提示，不改变状态
    pub async fn download(&self) -> DownloadOutcome {
        let Ok(_in_flight) = self.downloading.try_acquire() else {
            debug!("已有下载在进行，忽略本次请求");
            return DownloadOutcome::AlreadyDownloading;
        };

        let generation_id = {
            let mut session = self.session();
            let state = WorkflowState::derive(self.is_generating(), &session.store);
            let Some(result) = state.result() else {
                let err = WorkflowError::from(ValidationError::NothingGenerated);
                session.notice = Some(err.clone());
                return DownloadOutcome::Rejected(err);
            };
            session.notice = None;
            result.generation_id.clone()
        };

        let delivered = match self.downloads.download(generation_id.as_deref()).await {
            Ok(artifact) => self.writer.deliver(&artifact).await.map_err(|e| {
                warn!("保存试卷失败: {}", e);
                WorkflowError::download()
            }),
            Err(err) => Err(err),
        };

        match delivered {
            Ok(path) => DownloadOutcome::Saved(path),
            Err(err) => {
                self.session().notice = Some(err.clone());
                DownloadOutcome::Failed(err)
            }
        }
    }
}

/// 给生成请求加上可选的截止时间
async fn with_deadline<F>(
    request: F,
    deadline: Option<Duration>,
) -> Result<GenerationResult, WorkflowError>
where
    F: Future<Output = Result<GenerationResult, WorkflowError>>,
{
    match deadline {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .unwrap_or_else(|_| Err(WorkflowError::remote(GENERATE_TIMEOUT_MESSAGE))),
        None => request.await,
    }
}
