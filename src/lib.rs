//! # Paper Generator Client
//!
//! 试卷生成服务的客户端：收集最多 5 份试卷文档，提交给远程生成服务，
//! 再把生成的新试卷下载保存。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（HTTP 客户端），只暴露能力
//! - `PaperApi` - 传输能力：generate / download / health
//! - `HttpPaperApi` - 基于 reqwest 的实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `FileIntake` - 接收并校验文档
//! - `GenerationClient` - 提交批次并解释结果
//! - `DownloadClient` - 下载生成的试卷
//! - `ResultStore` - 保存最近一次结果
//! - `ArtifactWriter` - 试卷落盘
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义一次会话的状态流转
//! - `WorkflowState` - Idle / Submitting / Ready / Failed
//! - `WorkflowController` - 会话级状态机，生成与下载各自单飞
//!
//! ### ④ 编排层
//! - `app` - 初始化并驱动一次完整会话
//!
//! ## 模块结构

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, RunSummary};
pub use config::Config;
pub use error::{AppError, AppResult, ErrorKind, ValidationError, WorkflowError};
pub use infrastructure::{ApiResponse, HttpPaperApi, PaperApi, UploadPart};
pub use models::{Artifact, FileEntry, GenerationResult, UploadBatch, MAX_BATCH_SIZE};
pub use workflow::{DownloadOutcome, GenerateOutcome, SessionSnapshot, WorkflowController, WorkflowState};
