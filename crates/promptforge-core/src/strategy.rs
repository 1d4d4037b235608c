use crate::error::PipelineError;
use crate::prompts;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Closed set of enhancement strategies.
///
/// Wire names match the strategy files the prompts were loaded from; an
/// unknown name is rejected at deserialization or by `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyId {
    EnhancePrompt,
    FewShotPrompt,
    ChainOfThoughtPrompt,
    StructureOutputPrompt,
}

impl StrategyId {
    pub const ALL: [StrategyId; 4] = [
        StrategyId::EnhancePrompt,
        StrategyId::FewShotPrompt,
        StrategyId::ChainOfThoughtPrompt,
        StrategyId::StructureOutputPrompt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EnhancePrompt => "enhance_prompt",
            Self::FewShotPrompt => "few_shot_prompt",
            Self::ChainOfThoughtPrompt => "chain_of_thought_prompt",
            Self::StructureOutputPrompt => "structure_output_prompt",
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyId {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enhance_prompt" => Ok(Self::EnhancePrompt),
            "few_shot_prompt" => Ok(Self::FewShotPrompt),
            "chain_of_thought_prompt" => Ok(Self::ChainOfThoughtPrompt),
            "structure_output_prompt" => Ok(Self::StructureOutputPrompt),
            other => Err(PipelineError::unknown_strategy(other)),
        }
    }
}

/// Immutable definition of one enhancement strategy.
///
/// `prompt_template` carries exactly one `{prompt}` substitution slot.
#[derive(Debug, Clone)]
pub struct StrategyDefinition {
    pub id: StrategyId,
    pub name: &'static str,
    pub description: &'static str,
    pub system_prompt: &'static str,
    pub prompt_template: &'static str,
}

impl StrategyDefinition {
    /// JSON schema of the structured enhancement output.
    ///
    /// One canonical shape for every strategy: a mandatory `final_prompt`
    /// plus an open set of informational companion fields.
    pub fn output_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "body": { "type": "string" },
                "final_prompt": { "type": "string" },
            },
            "required": ["final_prompt"],
            "additionalProperties": true,
        })
    }
}

/// Registry of all known strategies.
///
/// Built once at startup; read-only afterwards and safe for any number of
/// concurrent readers.
pub struct StrategyCatalog {
    strategies: HashMap<StrategyId, StrategyDefinition>,
}

impl StrategyCatalog {
    /// Catalog of the built-in strategies.
    pub fn builtin() -> Self {
        let mut strategies = HashMap::new();

        strategies.insert(
            StrategyId::EnhancePrompt,
            StrategyDefinition {
                id: StrategyId::EnhancePrompt,
                name: prompts::enhance::NAME,
                description: prompts::enhance::DESCRIPTION,
                system_prompt: prompts::enhance::SYSTEM_PROMPT,
                prompt_template: prompts::enhance::PROMPT_TEMPLATE,
            },
        );
        strategies.insert(
            StrategyId::FewShotPrompt,
            StrategyDefinition {
                id: StrategyId::FewShotPrompt,
                name: prompts::few_shot::NAME,
                description: prompts::few_shot::DESCRIPTION,
                system_prompt: prompts::few_shot::SYSTEM_PROMPT,
                prompt_template: prompts::few_shot::PROMPT_TEMPLATE,
            },
        );
        strategies.insert(
            StrategyId::ChainOfThoughtPrompt,
            StrategyDefinition {
                id: StrategyId::ChainOfThoughtPrompt,
                name: prompts::chain_of_thought::NAME,
                description: prompts::chain_of_thought::DESCRIPTION,
                system_prompt: prompts::chain_of_thought::SYSTEM_PROMPT,
                prompt_template: prompts::chain_of_thought::PROMPT_TEMPLATE,
            },
        );
        strategies.insert(
            StrategyId::StructureOutputPrompt,
            StrategyDefinition {
                id: StrategyId::StructureOutputPrompt,
                name: prompts::structure_output::NAME,
                description: prompts::structure_output::DESCRIPTION,
                system_prompt: prompts::structure_output::SYSTEM_PROMPT,
                prompt_template: prompts::structure_output::PROMPT_TEMPLATE,
            },
        );

        Self { strategies }
    }

    /// Look up a strategy definition. A miss is a configuration error, not
    /// a runtime condition.
    pub fn lookup(&self, id: StrategyId) -> Result<&StrategyDefinition, PipelineError> {
        self.strategies
            .get(&id)
            .ok_or_else(|| PipelineError::unknown_strategy(id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}
