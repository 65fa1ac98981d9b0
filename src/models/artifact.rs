/// 下载得到的试卷文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// 保存时使用的文件名，由客户端指定
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}
