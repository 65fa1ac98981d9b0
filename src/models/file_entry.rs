//! 待上传文档及批次

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{AppError, AppResult};

/// 一个批次最多容纳的文档数
pub const MAX_BATCH_SIZE: usize = 5;

/// 允许的文件后缀（区分大小写，精确匹配结尾）
pub const ACCEPTED_SUFFIXES: [&str; 2] = [".docx", ".doc"];

const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOC_MIME: &str = "application/msword";
const FALLBACK_MIME: &str = "application/octet-stream";

/// 文档内容的来源
///
/// 只保存引用，内容在提交时才读取
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSource {
    Path(PathBuf),
    Memory(Arc<[u8]>),
}

/// 一份待上传的文档
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub size: u64,
    pub mime_hint: String,
    source: FileSource,
}

impl FileEntry {
    /// 从磁盘路径创建，只读取元数据
    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            mime_hint: mime_hint_for(&name).to_string(),
            name,
            size: metadata.len(),
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    /// 从内存中的字节创建
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let bytes: Arc<[u8]> = Arc::from(bytes.into());
        Self {
            mime_hint: mime_hint_for(&name).to_string(),
            size: bytes.len() as u64,
            name,
            source: FileSource::Memory(bytes),
        }
    }

    pub fn source(&self) -> &FileSource {
        &self.source
    }

    /// 文件名是否以允许的后缀结尾
    pub fn has_accepted_extension(&self) -> bool {
        ACCEPTED_SUFFIXES
            .iter()
            .any(|suffix| self.name.ends_with(suffix))
    }

    /// 读取文档内容
    pub async fn read_bytes(&self) -> AppResult<Vec<u8>> {
        match &self.source {
            FileSource::Path(path) => tokio::fs::read(path)
                .await
                .map_err(|e| AppError::file_read_failed(path.display().to_string(), e)),
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
        }
    }

    /// 列表中显示的大小，如 `(12.5 KB)`
    pub fn size_display(&self) -> String {
        format!("({:.1} KB)", self.size as f64 / 1024.0)
    }
}

fn mime_hint_for(name: &str) -> &'static str {
    if name.ends_with(".docx") {
        DOCX_MIME
    } else if name.ends_with(".doc") {
        DOC_MIME
    } else {
        FALLBACK_MIME
    }
}

/// 待提交的文档批次
///
/// 保持插入顺序，长度不超过 [`MAX_BATCH_SIZE`]，允许重名
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadBatch {
    entries: Vec<FileEntry>,
}

impl UploadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_BATCH_SIZE
    }

    pub fn remaining_slots(&self) -> usize {
        MAX_BATCH_SIZE.saturating_sub(self.entries.len())
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.name.as_str()).collect()
    }

    /// 所有文档大小之和
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.size).sum()
    }

    /// 追加文档，超出上限的部分直接丢弃；返回实际丢弃的数量
    pub(crate) fn append_capped(&mut self, incoming: Vec<FileEntry>) -> usize {
        let incoming_len = incoming.len();
        let take = self.remaining_slots().min(incoming_len);
        self.entries.extend(incoming.into_iter().take(take));
        incoming_len - take
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<FileEntry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a UploadBatch {
    type Item = &'a FileEntry;
    type IntoIter = std::slice::Iter<'a, FileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_match_is_case_sensitive_suffix() {
        assert!(FileEntry::from_bytes("paper.docx", b"".to_vec()).has_accepted_extension());
        assert!(FileEntry::from_bytes("paper.doc", b"".to_vec()).has_accepted_extension());
        assert!(!FileEntry::from_bytes("paper.DOCX", b"".to_vec()).has_accepted_extension());
        assert!(!FileEntry::from_bytes("paper.docx.pdf", b"".to_vec()).has_accepted_extension());
        assert!(!FileEntry::from_bytes("notes.pdf", b"".to_vec()).has_accepted_extension());
    }

    #[test]
    fn test_mime_hint_follows_extension() {
        assert_eq!(FileEntry::from_bytes("a.docx", b"".to_vec()).mime_hint, DOCX_MIME);
        assert_eq!(FileEntry::from_bytes("a.doc", b"".to_vec()).mime_hint, DOC_MIME);
        assert_eq!(FileEntry::from_bytes("a.txt", b"".to_vec()).mime_hint, FALLBACK_MIME);
    }

    #[test]
    fn test_size_display_in_kilobytes() {
        let entry = FileEntry::from_bytes("a.docx", vec![0u8; 1536]);
        assert_eq!(entry.size, 1536);
        assert_eq!(entry.size_display(), "(1.5 KB)");
    }

    #[test]
    fn test_append_capped_drops_overflow() {
        let mut batch = UploadBatch::new();
        let incoming: Vec<FileEntry> = (0..7)
            .map(|i| FileEntry::from_bytes(format!("p{}.docx", i), b"".to_vec()))
            .collect();

        let dropped = batch.append_capped(incoming);

        assert_eq!(dropped, 2);
        assert_eq!(batch.len(), MAX_BATCH_SIZE);
        assert!(batch.is_full());
        assert_eq!(batch.remaining_slots(), 0);
        assert_eq!(
            batch.names(),
            vec!["p0.docx", "p1.docx", "p2.docx", "p3.docx", "p4.docx"]
        );
    }

    #[tokio::test]
    async fn test_from_path_reads_metadata_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("paperA.docx");
        tokio::fs::write(&path, b"PK-fake-docx").await.unwrap();

        let entry = FileEntry::from_path(&path).await.unwrap();
        assert_eq!(entry.name, "paperA.docx");
        assert_eq!(entry.size, 12);
        assert_eq!(entry.source(), &FileSource::Path(path.clone()));
        assert_eq!(entry.read_bytes().await.unwrap(), b"PK-fake-docx".to_vec());
    }

    #[tokio::test]
    async fn test_from_path_missing_file_is_error() {
        let result = FileEntry::from_path("/definitely/not/here/paper.docx").await;
        assert!(result.is_err());
    }
}
