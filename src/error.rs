use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 本地校验错误（发生在任何网络请求之前）
    #[error("校验错误: {0}")]
    Validation(#[from] ValidationError),
    /// API 调用错误（传输层）
    #[error("API错误: {0}")]
    Api(#[from] ApiError),
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

/// 本地校验错误
///
/// Display 文本即为展示给用户的提示信息
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 文件扩展名不是 .docx / .doc
    #[error("Only .docx files are allowed")]
    InvalidExtension { name: String },
    /// 批次为空
    #[error("Please upload at least one document")]
    EmptyBatch,
    /// 上传总大小超出限制
    #[error("Files exceed the upload limit of {}", format_limit(.limit))]
    PayloadTooLarge { size: u64, limit: u64 },
    /// 索引超出范围
    #[error("No file at position {index} (batch holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// 尚未成功生成试卷
    #[error("Nothing has been generated yet")]
    NothingGenerated,
    /// 文件无法读取
    #[error("Could not read file: {name}")]
    UnreadableFile { name: String },
    /// 生成进行中，批次不可修改
    #[error("Please wait for the current generation to finish")]
    BatchLocked,
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 上传上限的显示形式：不足 1 MB 时按字节显示
fn format_limit(limit: &u64) -> String {
    const MB: u64 = 1024 * 1024;
    if *limit >= MB {
        format!("{:.1} MB", *limit as f64 / MB as f64)
    } else {
        format!("{} bytes", limit)
    }
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    DirectoryCreateFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {path}: {source}")]
    FileReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 用户可见错误的类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 本地校验，需要用户修正输入
    Validation,
    /// 服务端拒绝或处理失败
    Remote,
    /// 下载失败
    Download,
    /// 用户取消
    Cancelled,
}

/// 工作流错误
///
/// 所有错误最终都在 WorkflowController 处汇聚成这一形式并展示给用户。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct WorkflowError {
    pub kind: ErrorKind,
    pub message: String,
}

/// 生成失败且服务端未给出原因时的提示
pub const GENERATE_FALLBACK_MESSAGE: &str = "Failed to generate question paper";
/// 下载失败时的统一提示
pub const DOWNLOAD_FALLBACK_MESSAGE: &str = "Failed to download the file";
/// 生成超时提示
pub const GENERATE_TIMEOUT_MESSAGE: &str = "Generation timed out";
/// 生成被取消提示
pub const GENERATE_CANCELLED_MESSAGE: &str = "Generation cancelled";

impl WorkflowError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// 服务端错误
    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Remote, message)
    }

    /// 下载错误（不区分具体原因）
    pub fn download() -> Self {
        Self::new(ErrorKind::Download, DOWNLOAD_FALLBACK_MESSAGE)
    }

    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, GENERATE_CANCELLED_MESSAGE)
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }
}

impl From<ValidationError> for WorkflowError {
    fn from(err: ValidationError) -> Self {
        WorkflowError::new(ErrorKind::Validation, err.to_string())
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建API请求失败错误
    pub fn api_request_failed(
        endpoint: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Api(ApiError::RequestFailed {
            endpoint: endpoint.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
