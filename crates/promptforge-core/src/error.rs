use promptforge_llm::LlmError;
use thiserror::Error;

/// Category of a pipeline failure.
///
/// Preserved through aggregation so the transport boundary can pick a
/// status code by matching on the kind instead of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Strategy id not present in the catalog (configuration error)
    UnknownStrategy,
    /// Prompt template missing its substitution slot (configuration error)
    TemplateError,
    /// Enhancement output could not be decoded into the expected shape
    MalformedOutput,
    /// Provider throttled the call; retryable
    RateLimited,
    /// Provider-side fault
    Provider,
    /// Provider unreachable or round trip timed out
    Connection,
    /// Everything else
    Unexpected,
}

/// Single externally-visible failure of one pipeline run.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PipelineError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PipelineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_strategy(name: &str) -> Self {
        Self::new(
            ErrorKind::UnknownStrategy,
            format!("unknown strategy: {}", name),
        )
    }

    pub fn template(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TemplateError, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedOutput, message)
    }

    /// Prefix the message with the pipeline stage that produced it.
    pub fn in_stage(mut self, stage: &str) -> Self {
        self.message = format!("{}: {}", stage, self.message);
        self
    }
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        let kind = match &err {
            LlmError::RateLimited(_) => ErrorKind::RateLimited,
            LlmError::Provider(_) => ErrorKind::Provider,
            LlmError::Connection(_) => ErrorKind::Connection,
            LlmError::Unexpected(_) => ErrorKind::Unexpected,
        };
        Self::new(kind, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_error_kinds_preserved() {
        let err = PipelineError::from(LlmError::RateLimited("quota".to_string()));
        assert_eq!(err.kind, ErrorKind::RateLimited);

        let err = PipelineError::from(LlmError::Connection("refused".to_string()));
        assert_eq!(err.kind, ErrorKind::Connection);

        let err = PipelineError::from(LlmError::Provider("boom".to_string()));
        assert_eq!(err.kind, ErrorKind::Provider);
    }

    #[test]
    fn test_stage_context_prepended() {
        let err = PipelineError::malformed("missing field").in_stage("enhancement");
        assert_eq!(err.kind, ErrorKind::MalformedOutput);
        assert!(err.message.starts_with("enhancement: "));
    }
}
