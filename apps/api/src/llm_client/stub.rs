//! Test double for `ChatModel`: records every request and answers from a closure.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{ChatModel, ChatRequest, LlmError};

type ReplyFn = dyn Fn(&ChatRequest) -> Result<String, LlmError> + Send + Sync;

pub struct StubModel {
    reply: Box<ReplyFn>,
    delay: Duration,
    requests: Mutex<Vec<ChatRequest>>,
}

impl StubModel {
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&ChatRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            reply: Box::new(reply),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with the same text.
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text.clone()))
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        (self.reply)(request)
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

/// A well-formed model reply: narrative, then a fenced design block.
pub fn design_reply(program_name: &str) -> String {
    format!(
        r#"{program_name} is a tiered program built around everyday purchases.

Members climb from Silver to Gold as they spend more.

```json
{{
  "loyalty_program_design": {{
    "program_name": "{program_name}",
    "overview": "Tiered points program",
    "target_audience": ["young urban professionals"],
    "tiers": [
      {{"name": "Silver", "requirements": ["Sign up"], "benefits": ["Birthday reward"], "earning_multiplier": 1}},
      {{"name": "Gold", "requirements": ["$500 annual spend"], "benefits": ["Free shipping"], "earning_multiplier": 1.5}}
    ],
    "earning_mechanisms": [
      {{"type": "purchase", "points_ratio": "1 point per $1", "description": "Base earn on every order", "restrictions": ["Excludes gift cards"]}}
    ],
    "redemption_options": [
      {{"category": "discount", "description": "$5 off next order", "points_required": 500, "restrictions": []}}
    ],
    "special_features": ["Referral bonus"],
    "technology_requirements": ["Mobile app", "CRM integration"]
  }}
}}
```"#
    )
}
