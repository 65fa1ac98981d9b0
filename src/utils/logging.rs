/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::io::Write;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{GenerationResult, UploadBatch};

/// 初始化 tracing 日志
///
/// 优先使用 `RUST_LOG`，否则按 `verbose` 选择 debug / info。重复调用无副作用。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化会话日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> AppResult<()> {
    let log_header = format!(
        "{}\n试卷生成会话 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 向会话日志追加一行（带时间戳）
pub fn append_log_line(log_file_path: &str, line: &str) -> AppResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .map_err(|e| AppError::file_write_failed(log_file_path, e))?;

    writeln!(
        file,
        "[{}] {}",
        chrono::Local::now().format("%H:%M:%S"),
        line
    )
    .map_err(|e| AppError::file_write_failed(log_file_path, e))?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 试卷生成客户端");
    info!("🌐 服务地址: {}", config.api_base_url);
    info!("📁 输出目录: {}", config.output_dir);
    if let Some(secs) = config.generation_timeout_secs {
        info!("⏱ 生成截止时间: {} 秒", secs);
    }
    info!("{}", "=".repeat(60));
}

/// 记录批次内容
pub fn log_batch(batch: &UploadBatch) {
    info!("📋 已选择 {} 份文档:", batch.len());
    for (i, entry) in batch.iter().enumerate() {
        info!("  {}. {} {}", i + 1, entry.name, entry.size_display());
    }
}

/// 打印生成统计
pub fn log_generation_summary(result: &GenerationResult) {
    info!("\n{}", "─".repeat(60));
    info!("✅ 试卷生成成功");
    info!("• 找到模块: {}", result.modules_found);
    info!("• 提取题目: {}", result.questions_extracted);
    info!("• 每个模块随机选取一道题");
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大字符数
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
