use crate::application::use_cases::prompts::{
    build_analysis_prompt, build_analysis_system_prompt, StudyContext,
};
use crate::application::use_cases::response_parser;
use crate::domain::analysis::AnalysisResult;
use crate::domain::document::Excerpt;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;
use crate::shared::token_counter::TokenCounter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub const RATE_LIMIT_MESSAGE: &str =
    "Too many requests! Please wait a minute before uploading again.";

/// Why the analysis fell back to default metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum AnalysisFailure {
    RateLimited(String),
    Failed(String),
}

impl AnalysisFailure {
    pub fn message(&self) -> &str {
        match self {
            AnalysisFailure::RateLimited(msg) | AnalysisFailure::Failed(msg) => msg,
        }
    }
}

impl From<AppError> for AnalysisFailure {
    fn from(err: AppError) -> Self {
        match err {
            AppError::RateLimited(_) => AnalysisFailure::RateLimited(RATE_LIMIT_MESSAGE.to_string()),
            other => AnalysisFailure::Failed(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    #[serde(flatten)]
    pub result: AnalysisResult,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub failure: Option<AnalysisFailure>,
}

pub struct AnalyzeUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl AnalyzeUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    /// Sends the excerpt to the model and parses its reply.
    pub async fn analyze(
        &self,
        config: &LLMConfig,
        excerpt: &Excerpt,
        context: &StudyContext,
    ) -> Result<AnalysisResult> {
        self.run(config, excerpt.as_str(), context).await
    }

    /// Like [`Self::analyze`], but substitutes default metadata on failure.
    pub async fn analyze_or_default(
        &self,
        config: &LLMConfig,
        excerpt: &Excerpt,
        context: &StudyContext,
    ) -> AnalysisOutcome {
        into_outcome(self.analyze(config, excerpt, context).await)
    }

    /// Analyzes caller-supplied text without a student context.
    pub async fn analyze_text(&self, config: &LLMConfig, text: &str) -> Result<AnalysisOutcome> {
        if text.trim().is_empty() {
            return Err(AppError::ValidationError(
                "The request must include a non-empty \"text\" field".to_string(),
            ));
        }
        let result = self.run(config, text, &StudyContext::default()).await;
        Ok(into_outcome(result))
    }

    async fn run(
        &self,
        config: &LLMConfig,
        material: &str,
        context: &StudyContext,
    ) -> Result<AnalysisResult> {
        let system_prompt = build_analysis_system_prompt();
        let user_prompt = build_analysis_prompt(material, context);
        info!(
            model = %config.model,
            estimated_tokens = TokenCounter::estimate_prompt_tokens(system_prompt, &user_prompt),
            "Requesting study material analysis"
        );

        let raw_output = self
            .llm_client
            .generate(config, system_prompt, &user_prompt)
            .await?;

        let result = response_parser::parse(&clean_llm_response(&raw_output));
        info!(
            subject = %result.subject,
            topics = result.topics.len(),
            summary = result.summary.len(),
            questions = result.questions.len(),
            "Parsed analysis response"
        );
        Ok(result)
    }
}

fn into_outcome(result: Result<AnalysisResult>) -> AnalysisOutcome {
    match result {
        Ok(result) => AnalysisOutcome {
            result,
            failure: None,
        },
        Err(err) => {
            warn!(error = %err, "AI analysis failed, using default metadata");
            AnalysisOutcome {
                result: AnalysisResult::default(),
                failure: Some(err.into()),
            }
        }
    }
}
