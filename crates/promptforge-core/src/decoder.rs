use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How enhancement output should be decoded.
///
/// Selected by whether the invoker requested schema-constrained output;
/// both policies must exist because upstream models vary in capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// The provider enforced the output schema; the payload is clean JSON.
    SchemaConstrained,
    /// The model was only *asked* for JSON; the payload may be fenced text.
    BestEffort,
}

/// Canonical decoded enhancement output.
///
/// `final_prompt` is mandatory and drives the pipeline; everything else is
/// informational and never affects control flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnhancedPrompt {
    pub final_prompt: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Decode a raw model payload into the canonical shape.
pub fn decode(policy: DecodePolicy, raw_payload: &str) -> Result<EnhancedPrompt, PipelineError> {
    let text = match policy {
        DecodePolicy::SchemaConstrained => raw_payload.trim(),
        DecodePolicy::BestEffort => strip_fences(raw_payload),
    };

    let value: Value = serde_json::from_str(text).map_err(|e| {
        PipelineError::malformed(format!("enhancement output is not valid JSON: {}", e))
    })?;

    decode_value(value)
}

/// Project an already-parsed JSON value into the canonical shape.
pub fn decode_value(value: Value) -> Result<EnhancedPrompt, PipelineError> {
    let Value::Object(mut fields) = value else {
        return Err(PipelineError::malformed(
            "enhancement output is not a JSON object",
        ));
    };

    let final_prompt = match fields.remove("final_prompt") {
        Some(Value::String(s)) => s,
        Some(_) => {
            return Err(PipelineError::malformed(
                "final_prompt field is not a string",
            ))
        }
        None => {
            return Err(PipelineError::malformed(
                "final_prompt field is missing from enhancement output",
            ))
        }
    };

    Ok(EnhancedPrompt {
        final_prompt,
        extra: fields,
    })
}

/// Strip the markdown code fences models like to wrap JSON in.
fn strip_fences(payload: &str) -> &str {
    let trimmed = payload.trim();
    let opened = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let closed = opened.strip_suffix("```").unwrap_or(opened);
    closed.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_schema_constrained_projects_final_prompt() {
        let result = decode(
            DecodePolicy::SchemaConstrained,
            r#"{"final_prompt": "X", "body": "Y"}"#,
        )
        .unwrap();

        assert_eq!(result.final_prompt, "X");
        assert_eq!(result.extra["body"], "Y");
    }

    #[test]
    fn test_extra_fields_never_interfere() {
        let value = json!({
            "final_prompt": "X",
            "body": "Y",
            "reasoning": ["step 1", "step 2"],
            "confidence": 0.9,
        });

        let result = decode_value(value).unwrap();
        assert_eq!(result.final_prompt, "X");
        assert_eq!(result.extra.len(), 3);
    }

    #[test]
    fn test_best_effort_strips_json_fence() {
        let payload = "```json\n{\"final_prompt\": \"polished\", \"body\": \"because\"}\n```";
        let result = decode(DecodePolicy::BestEffort, payload).unwrap();

        assert_eq!(result.final_prompt, "polished");
    }

    #[test]
    fn test_best_effort_strips_bare_fence() {
        let payload = "```\n{\"final_prompt\": \"polished\"}\n```";
        let result = decode(DecodePolicy::BestEffort, payload).unwrap();

        assert_eq!(result.final_prompt, "polished");
    }

    #[test]
    fn test_best_effort_without_fence() {
        let result = decode(DecodePolicy::BestEffort, r#"{"final_prompt": "plain"}"#).unwrap();
        assert_eq!(result.final_prompt, "plain");
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = decode(DecodePolicy::BestEffort, "not json at all").unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedOutput);
    }

    #[test]
    fn test_missing_final_prompt_is_malformed() {
        let err = decode(DecodePolicy::SchemaConstrained, r#"{"body": "Y"}"#).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedOutput);
    }

    #[test]
    fn test_non_string_final_prompt_is_malformed() {
        let err = decode_value(json!({ "final_prompt": 42 })).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedOutput);
    }

    #[test]
    fn test_non_object_payload_is_malformed() {
        let err = decode_value(json!(["final_prompt"])).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedOutput);
    }
}
