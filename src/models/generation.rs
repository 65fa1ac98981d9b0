use serde::Deserialize;

/// 一次成功生成的摘要
///
/// 服务端返回 `{ modulesFound, questionsExtracted }`，可选地附带
/// `generationId` 和 `message`。其余字段（如 `success`）忽略。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub modules_found: u64,
    pub questions_extracted: u64,
    /// 本次生成的标识，下载时回传给服务端
    #[serde(default)]
    pub generation_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GenerationResult {
    pub fn new(modules_found: u64, questions_extracted: u64) -> Self {
        Self {
            modules_found,
            questions_extracted,
            generation_id: None,
            message: None,
        }
    }
}
