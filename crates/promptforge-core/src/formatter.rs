use crate::error::PipelineError;

/// Substitution slot every prompt template carries.
const PROMPT_SLOT: &str = "{prompt}";

/// Substitute the raw prompt into a strategy template.
///
/// Pure function. A template without the `{prompt}` slot is a
/// configuration defect and fails with `TemplateError`.
pub fn format_template(template: &str, raw_prompt: &str) -> Result<String, PipelineError> {
    if !template.contains(PROMPT_SLOT) {
        return Err(PipelineError::template(format!(
            "template is missing its {} slot",
            PROMPT_SLOT
        )));
    }

    Ok(template.replacen(PROMPT_SLOT, raw_prompt, 1))
}
