//! Design Generator: turns a `DesignRequest` into a `DesignResponse`.
//!
//! Flow: validate → build prompt → one model call (bounded by a timeout) →
//!       split narrative / JSON → typed design.
//!
//! No retries and no partial results: any upstream or schema failure is
//! returned to the caller as-is.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::design::models::{DesignRequest, DesignResponse, StructuredData};
use crate::design::parser::split_reply;
use crate::design::prompts::{
    DESIGN_MAX_TOKENS, DESIGN_PROMPT_TEMPLATE, DESIGN_SCHEMA, DESIGN_SYSTEM,
    DESIGN_TEMPERATURE, REFINEMENT_SECTION_TEMPLATE,
};
use crate::errors::AppError;
use crate::llm_client::prompts::{fill_template, REVISION_INSTRUCTION, SCHEMA_INSTRUCTION};
use crate::llm_client::{ChatModel, ChatRequest};

#[derive(Clone)]
pub struct DesignGenerator {
    model: Arc<dyn ChatModel>,
    timeout: Duration,
}

impl DesignGenerator {
    pub fn new(model: Arc<dyn ChatModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    pub async fn generate(&self, request: DesignRequest) -> Result<DesignResponse, AppError> {
        // Reject bad input before spending a provider call.
        request.validate()?;

        let generation_id = Uuid::new_v4();
        let mode = if request.refinement().is_some() {
            "refinement"
        } else {
            "fresh"
        };
        if request.has_partial_refinement() {
            warn!(
                "[{generation_id}] Only one of existing_generated_output / user_feedback supplied; generating fresh"
            );
        }

        if !request.other_input_data.is_empty() {
            debug!(
                "[{generation_id}] Ignoring other_input_data keys: {:?}",
                request.other_input_data.keys().collect::<Vec<_>>()
            );
        }

        let prompt = build_design_prompt(&request);
        let prompt_len = prompt.len();
        info!(
            "[{generation_id}] Generating {mode} design for '{}' (model: {}, prompt: {prompt_len} chars)",
            request.company_name,
            self.model.model_name()
        );

        let chat = ChatRequest {
            system: DESIGN_SYSTEM.to_string(),
            prompt,
            max_tokens: DESIGN_MAX_TOKENS,
            temperature: DESIGN_TEMPERATURE,
        };

        let started = Instant::now();
        let reply = match tokio::time::timeout(self.timeout, self.model.complete(&chat)).await {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                error!(
                    "[{generation_id}] Model call failed after {}ms (prompt: {prompt_len} chars): {e}",
                    started.elapsed().as_millis()
                );
                return Err(AppError::Upstream(e.to_string()));
            }
            Err(_) => {
                let elapsed_ms = started.elapsed().as_millis();
                error!(
                    "[{generation_id}] Model call timed out after {elapsed_ms}ms (prompt: {prompt_len} chars)"
                );
                return Err(AppError::UpstreamTimeout { elapsed_ms });
            }
        };
        let elapsed_ms = started.elapsed().as_millis();

        if reply.trim().is_empty() {
            error!("[{generation_id}] Model returned an empty reply after {elapsed_ms}ms");
            return Err(AppError::Upstream("model returned an empty reply".to_string()));
        }

        let parsed = split_reply(&reply).inspect_err(|e| {
            warn!(
                "[{generation_id}] Unusable model reply ({} chars) after {elapsed_ms}ms: {e}",
                reply.len()
            );
        })?;

        if parsed.narrative.is_empty() {
            warn!("[{generation_id}] Model reply had no narrative before the JSON block");
        }

        let design = parsed.design;
        info!(
            "[{generation_id}] Generated '{}' in {elapsed_ms}ms: {} tiers, {} earning mechanisms, {} redemption options",
            design.program_name,
            design.tiers.len(),
            design.earning_mechanisms.len(),
            design.redemption_options.len()
        );

        Ok(DesignResponse {
            generated_output: parsed.narrative,
            structured_data: StructuredData {
                loyalty_program_design: design,
            },
        })
    }
}

/// Builds the user prompt. Section order is fixed: task, company, analysis,
/// objectives, optional refinement block, output format + schema.
pub fn build_design_prompt(request: &DesignRequest) -> String {
    let refinement_section = match request.refinement() {
        Some(refinement) => fill_template(
            REFINEMENT_SECTION_TEMPLATE,
            &[
                ("existing_output", refinement.existing_output),
                ("user_feedback", refinement.feedback),
                ("revision_instruction", REVISION_INSTRUCTION),
            ],
        ),
        None => String::new(),
    };

    fill_template(
        DESIGN_PROMPT_TEMPLATE,
        &[
            ("company_name", request.company_name.trim()),
            (
                "customer_analysis",
                or_placeholder(&request.previous_data.customer_analysis),
            ),
            (
                "loyalty_crm_objectives",
                or_placeholder(&request.previous_data.loyalty_crm_objectives),
            ),
            ("refinement_section", &refinement_section),
            ("schema_instruction", SCHEMA_INSTRUCTION),
            ("schema", DESIGN_SCHEMA),
        ],
    )
}

fn or_placeholder(text: &str) -> &str {
    if text.trim().is_empty() {
        "(not provided)"
    } else {
        text
    }
}
