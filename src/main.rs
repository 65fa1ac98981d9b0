use std::path::PathBuf;

use anyhow::{bail, Result};
use paper_generator_client::utils::logging;
use paper_generator_client::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = match std::env::var("CONFIG_FILE") {
        Ok(path) => Config::from_toml_file(&path)?,
        Err(_) => Config::from_env(),
    };

    // 初始化日志
    logging::init(config.verbose_logging);

    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        bail!("用法: paper-generator <试卷1.docx> [试卷2.docx ...]（最多 5 份）");
    }

    // 初始化并运行应用
    let summary = App::initialize(config).await?.run(&paths).await?;
    println!("{}", summary.artifact_path.display());

    Ok(())
}
