//! 试卷保存服务 - 业务能力层
//!
//! 只负责"把下载的试卷落盘"能力

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::models::Artifact;

/// 试卷保存服务
///
/// 先写入同目录下的 `.part` 临时文件再改名；临时文件在任何一步失败时都会被删除
pub struct ArtifactWriter {
    output_dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(config: &Config) -> Self {
        Self::with_dir(&config.output_dir)
    }

    /// 使用自定义目录创建
    pub fn with_dir(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 保存试卷
    ///
    /// # 返回
    /// 返回最终文件路径
    pub async fn deliver(&self, artifact: &Artifact) -> AppResult<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| FileError::DirectoryCreateFailed {
                path: self.output_dir.display().to_string(),
                source,
            })?;

        let final_path = self.output_dir.join(&artifact.file_name);
        let temp = tempfile::Builder::new()
            .prefix(&format!(".{}", artifact.file_name))
            .suffix(".part")
            .tempfile_in(&self.output_dir)
            .map_err(|e| AppError::file_write_failed(self.output_dir.display().to_string(), e))?;

        debug!("写入临时文件: {}", temp.path().display());
        tokio::fs::write(temp.path(), &artifact.bytes)
            .await
            .map_err(|e| AppError::file_write_failed(temp.path().display().to_string(), e))?;

        temp.persist(&final_path)
            .map_err(|e| AppError::file_write_failed(final_path.display().to_string(), e.error))?;

        info!("💾 试卷已保存至: {}", final_path.display());
        Ok(final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn leftover_parts(dir: &Path) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".part"))
            .collect()
    }

    #[tokio::test]
    async fn test_deliver_writes_named_file_and_no_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::with_dir(dir.path());
        let artifact = Artifact::new("new_question_paper.docx", b"docx-bytes".to_vec());

        let path = writer.deliver(&artifact).await.unwrap();

        assert_eq!(path, dir.path().join("new_question_paper.docx"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"docx-bytes".to_vec());
        assert!(leftover_parts(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_deliver_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("output").join("papers");
        let writer = ArtifactWriter::with_dir(&nested);

        let path = writer
            .deliver(&Artifact::new("new_question_paper.docx", b"docx".to_vec()))
            .await
            .unwrap();

        assert_eq!(path, nested.join("new_question_paper.docx"));
    }

    #[tokio::test]
    async fn test_deliver_overwrites_previous_paper() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::with_dir(dir.path());

        writer
            .deliver(&Artifact::new("new_question_paper.docx", b"old".to_vec()))
            .await
            .unwrap();
        let path = writer
            .deliver(&Artifact::new("new_question_paper.docx", b"new".to_vec()))
            .await
            .unwrap();

        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"new".to_vec());
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // 目标位置是一个非空目录，改名必然失败
        let blocker = dir.path().join("new_question_paper.docx");
        tokio::fs::create_dir_all(&blocker).await.unwrap();
        tokio::fs::write(blocker.join("keep"), b"x").await.unwrap();

        let writer = ArtifactWriter::with_dir(dir.path());
        let result = writer
            .deliver(&Artifact::new("new_question_paper.docx", b"docx".to_vec()))
            .await;

        assert!(matches!(result, Err(AppError::File(FileError::WriteFailed { .. }))));
        assert!(leftover_parts(dir.path()).is_empty());
        assert!(blocker.join("keep").exists());
    }
}
