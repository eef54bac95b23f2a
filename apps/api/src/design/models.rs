use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Inbound request
// ────────────────────────────────────────────────────────────────────────────

/// Request body for POST /generate.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignRequest {
    pub company_name: String,
    #[serde(default)]
    pub previous_data: PreviousData,
    #[serde(default)]
    pub current_prompt_data: CurrentPromptData,
    /// Accepted and carried along; never read by the generator.
    #[serde(default)]
    pub other_input_data: Map<String, Value>,
}

/// Analysis produced by earlier stages of the caller's workflow.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviousData {
    #[serde(default)]
    pub customer_analysis: String,
    #[serde(default)]
    pub loyalty_crm_objectives: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentPromptData {
    pub existing_generated_output: Option<String>,
    pub user_feedback: Option<String>,
}

/// The two halves of a refinement pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refinement<'a> {
    pub existing_output: &'a str,
    pub feedback: &'a str,
}

impl DesignRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.company_name.trim().is_empty() {
            return Err(AppError::Validation(
                "company_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the refinement inputs only when both are present and non-blank.
    pub fn refinement(&self) -> Option<Refinement<'_>> {
        let existing_output = non_blank(&self.current_prompt_data.existing_generated_output)?;
        let feedback = non_blank(&self.current_prompt_data.user_feedback)?;
        Some(Refinement {
            existing_output,
            feedback,
        })
    }

    /// True when exactly one of the refinement inputs was supplied.
    pub fn has_partial_refinement(&self) -> bool {
        let has_output = non_blank(&self.current_prompt_data.existing_generated_output).is_some();
        let has_feedback = non_blank(&self.current_prompt_data.user_feedback).is_some();
        has_output != has_feedback
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Structured design
// ────────────────────────────────────────────────────────────────────────────

/// The fixed-schema loyalty program design.
///
/// program_name, overview, tiers, earning_mechanisms and redemption_options
/// are required; the remaining lists default to empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoyaltyProgramDesign {
    pub program_name: String,
    pub overview: String,
    #[serde(default)]
    pub target_audience: Vec<String>,
    pub tiers: Vec<Tier>,
    pub earning_mechanisms: Vec<EarningMechanism>,
    pub redemption_options: Vec<RedemptionOption>,
    #[serde(default)]
    pub special_features: Vec<String>,
    #[serde(default)]
    pub technology_requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    pub name: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    /// Kept as the model wrote it (`2` stays `2`, `1.5` stays `1.5`).
    pub earning_multiplier: Number,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarningMechanism {
    #[serde(rename = "type")]
    pub mechanism_type: String,
    pub points_ratio: String,
    pub description: String,
    #[serde(default)]
    pub restrictions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedemptionOption {
    pub category: String,
    pub description: String,
    pub points_required: u64,
    #[serde(default)]
    pub restrictions: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Outbound response
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredData {
    pub loyalty_program_design: LoyaltyProgramDesign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignResponse {
    pub generated_output: String,
    pub structured_data: StructuredData,
}
