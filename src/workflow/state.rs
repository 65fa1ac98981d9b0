use std::fmt::Display;

use crate::error::WorkflowError;
use crate::models::GenerationResult;
use crate::services::ResultStore;

/// 工作流状态
///
/// 不单独存储，由"是否在提交中"和 ResultStore 推导
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Idle,
    Submitting,
    Ready(GenerationResult),
    Failed(WorkflowError),
}

impl WorkflowState {
    pub fn derive(submitting: bool, store: &ResultStore) -> Self {
        if submitting {
            return WorkflowState::Submitting;
        }
        match (store.result(), store.error()) {
            (Some(result), _) => WorkflowState::Ready(result.clone()),
            (None, Some(error)) => WorkflowState::Failed(error.clone()),
            (None, None) => WorkflowState::Idle,
        }
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self, WorkflowState::Submitting)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, WorkflowState::Ready(_))
    }

    pub fn result(&self) -> Option<&GenerationResult> {
        match self {
            WorkflowState::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        match self {
            WorkflowState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for WorkflowState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowState::Idle => write!(f, "Idle"),
            WorkflowState::Submitting => write!(f, "Submitting"),
            WorkflowState::Ready(result) => write!(
                f,
                "Ready[模块 {} 题目 {}]",
                result.modules_found, result.questions_extracted
            ),
            WorkflowState::Failed(error) => write!(f, "Failed[{}]", error),
        }
    }
}
