// All prompt constants for the Design module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Output budget for a design reply (narrative + JSON block).
pub const DESIGN_MAX_TOKENS: u32 = 2000;
/// Kept low so the JSON structure stays stable between calls.
pub const DESIGN_TEMPERATURE: f32 = 0.2;

/// System prompt for loyalty program design.
pub const DESIGN_SYSTEM: &str = "You are an expert loyalty program strategist and CRM consultant. \
    You design practical, commercially viable loyalty programs grounded in the customer \
    analysis and business objectives you are given. \
    You always answer with a narrative explanation followed by exactly one JSON code block.";

/// The exact structure the JSON block must follow.
pub const DESIGN_SCHEMA: &str = r#"{
  "loyalty_program_design": {
    "program_name": "string",
    "overview": "string",
    "target_audience": ["string"],
    "tiers": [
      {
        "name": "string",
        "requirements": ["string"],
        "benefits": ["string"],
        "earning_multiplier": 1.0
      }
    ],
    "earning_mechanisms": [
      {
        "type": "string",
        "points_ratio": "string",
        "description": "string",
        "restrictions": ["string"]
      }
    ],
    "redemption_options": [
      {
        "category": "string",
        "description": "string",
        "points_required": 500,
        "restrictions": ["string"]
      }
    ],
    "special_features": ["string"],
    "technology_requirements": ["string"]
  }
}"#;

/// Design prompt template.
/// Replace: {company_name}, {customer_analysis}, {loyalty_crm_objectives},
///          {refinement_section}, {schema_instruction}, {schema}
pub const DESIGN_PROMPT_TEMPLATE: &str = r#"Design a customer loyalty program for the company below.

COMPANY NAME:
{company_name}

CUSTOMER ANALYSIS:
{customer_analysis}

LOYALTY / CRM OBJECTIVES:
{loyalty_crm_objectives}
{refinement_section}
OUTPUT FORMAT:
1. First, write a narrative explanation of the program: its concept, why it fits this
   company's customers, how the tiers and rewards work, and how it serves the objectives.
2. Then, after the narrative, output ONE JSON object inside a ```json code fence.

{schema_instruction}

SCHEMA:
{schema}

RULES:
- earning_multiplier is a number (e.g. 1.0, 1.5, 2.0)
- points_required is a whole number of points
- List tiers from entry level to highest
- Every list must contain strings only, never nested objects, unless the schema shows objects"#;

/// Refinement block inserted after the objectives when revising a prior output.
/// Replace: {revision_instruction}, {existing_output}, {user_feedback}
pub const REFINEMENT_SECTION_TEMPLATE: &str = r#"
PREVIOUS OUTPUT (to be revised):
{existing_output}

USER FEEDBACK:
{user_feedback}

{revision_instruction}
"#;
