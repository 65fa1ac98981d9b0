use crate::error::WorkflowError;
use crate::models::GenerationResult;

/// 最近一次生成的结果
///
/// 成功与失败互斥，只保留最新一次，不保存历史
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResultStore {
    result: Option<GenerationResult>,
    error: Option<WorkflowError>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录成功结果，同时清除之前的错误
    pub fn record_success(&mut self, result: GenerationResult) {
        self.result = Some(result);
        self.error = None;
    }

    /// 记录失败，同时清除之前的结果
    pub fn record_failure(&mut self, error: WorkflowError) {
        self.error = Some(error);
        self.result = None;
    }

    pub fn clear(&mut self) {
        self.result = None;
        self.error = None;
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }
}
