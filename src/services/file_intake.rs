//! 文档接收服务 - 业务能力层
//!
//! 只负责"接收并校验文档"能力，不关心提交流程

use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::models::{FileEntry, UploadBatch, MAX_BATCH_SIZE};

/// 文档接收服务
///
/// 职责：
/// - 持有当前批次
/// - 整批校验扩展名，任何一个不合格则整批拒绝
/// - 超出上限的文档静默丢弃（先到先留）
#[derive(Debug, Default)]
pub struct FileIntake {
    batch: UploadBatch,
}

impl FileIntake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch(&self) -> &UploadBatch {
        &self.batch
    }

    /// 添加一组文档
    ///
    /// # 参数
    /// - `candidates`: 本次选择的文档，按选择顺序
    ///
    /// # 返回
    /// 成功时返回更新后的批次；存在不合格文档时批次保持不变
    pub fn add_files(
        &mut self,
        candidates: Vec<FileEntry>,
    ) -> Result<&UploadBatch, ValidationError> {
        if let Some(rejected) = candidates.iter().find(|c| !c.has_accepted_extension()) {
            warn!("拒绝本次添加，文件类型不支持: {}", rejected.name);
            return Err(ValidationError::InvalidExtension {
                name: rejected.name.clone(),
            });
        }

        let incoming = candidates.len();
        let dropped = self.batch.append_capped(candidates);
        if dropped > 0 {
            debug!(
                "批次已达上限 {}，丢弃 {} 个文档",
                MAX_BATCH_SIZE, dropped
            );
        }
        debug!(
            "添加 {} 个文档，当前 {}/{}",
            incoming - dropped,
            self.batch.len(),
            MAX_BATCH_SIZE
        );

        Ok(&self.batch)
    }

    /// 按显示顺序移除文档，后续文档前移一位
    ///
    /// 调用方的索引应来自当前列表；越界返回错误且批次不变
    pub fn remove_file(&mut self, index: usize) -> Result<FileEntry, ValidationError> {
        let len = self.batch.len();
        self.batch
            .remove(index)
            .ok_or(ValidationError::IndexOutOfRange { index, len })
    }
}
