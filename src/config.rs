use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// 生成服务地址
    pub api_base_url: String,
    /// 试卷保存目录
    pub output_dir: String,
    /// 单次提交允许的最大总字节数
    pub max_upload_bytes: u64,
    /// 生成请求的截止时间（秒），None 表示不设限
    pub generation_timeout_secs: Option<u64>,
    /// 下载请求的超时时间（秒）
    pub download_timeout_secs: Option<u64>,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 会话日志文件
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000".to_string(),
            output_dir: "output".to_string(),
            max_upload_bytes: 16 * 1024 * 1024,
            generation_timeout_secs: None,
            download_timeout_secs: None,
            verbose_logging: false,
            log_file: "session.log".to_string(),
        }
    }
}

/// TOML 配置文件的结构，所有字段可选
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    api_base_url: Option<String>,
    output_dir: Option<String>,
    max_upload_bytes: Option<u64>,
    generation_timeout_secs: Option<u64>,
    download_timeout_secs: Option<u64>,
    verbose_logging: Option<bool>,
    log_file: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件加载配置，环境变量优先级更高
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
                path: path.display().to_string(),
                source,
            })?;
        let config = Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            }
        })?;
        Ok(config.with_env_overrides())
    }

    /// 解析 TOML 文本，缺省字段取默认值
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(content)?;
        let default = Self::default();
        Ok(Self {
            api_base_url: file.api_base_url.unwrap_or(default.api_base_url),
            output_dir: file.output_dir.unwrap_or(default.output_dir),
            max_upload_bytes: file.max_upload_bytes.unwrap_or(default.max_upload_bytes),
            generation_timeout_secs: file.generation_timeout_secs.or(default.generation_timeout_secs),
            download_timeout_secs: file.download_timeout_secs.or(default.download_timeout_secs),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
            log_file: file.log_file.unwrap_or(default.log_file),
        })
    }

    fn with_env_overrides(self) -> Self {
        Self {
            api_base_url: std::env::var("PAPER_API_BASE_URL").unwrap_or(self.api_base_url),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(self.output_dir),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES").ok().and_then(|v| v.parse().ok()).unwrap_or(self.max_upload_bytes),
            generation_timeout_secs: std::env::var("GENERATION_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).or(self.generation_timeout_secs),
            download_timeout_secs: std::env::var("DOWNLOAD_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).or(self.download_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(self.verbose_logging),
            log_file: std::env::var("LOG_FILE").unwrap_or(self.log_file),
        }
    }

    pub fn generation_timeout(&self) -> Option<Duration> {
        self.generation_timeout_secs.map(Duration::from_secs)
    }

    pub fn download_timeout(&self) -> Option<Duration> {
        self.download_timeout_secs.map(Duration::from_secs)
    }
}
