//! AI insight gateway - summarize and highlight through a text-generation service.
//!
//! The remote model is an opaque, possibly slow, possibly failing collaborator
//! behind [`TextGenerator`]. [`InsightGateway`] turns every failure (transport
//! error, timeout, off-schema reply) into a fixed degraded result, so callers
//! never fail because the AI is unavailable.

pub mod gemini;
pub mod prompts;
pub mod schema;

pub use gemini::GeminiClient;

use crate::{
    core::reconcile::{mark_failed, reconcile},
    entities::financial_record,
    errors::{Error, Result},
    models::{AnnotatedRecord, RecordAnnotation},
};
use async_trait::async_trait;
use schema::{HighlightResponse, SummaryResponse, response_schema};
use serde_json::Value;
use std::{collections::HashSet, fmt, sync::Arc, time::Duration};
use tracing::{debug, instrument, warn};

/// Shown instead of a summary when the summarize call fails.
pub const SUMMARY_FALLBACK: &str = "Could not generate summary at this time.";

/// Set as every record's insight when the highlight call fails.
pub const INSIGHT_FALLBACK: &str = "Error generating insight.";

/// A remote capability that answers a prompt with JSON text matching a schema.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt`, asking for a reply shaped by `response_schema`, and returns the raw text.
    async fn generate(&self, prompt: &str, response_schema: &Value) -> Result<String>;
}

/// Generator used when no API key is configured; every call fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledGenerator;

#[async_trait]
impl TextGenerator for DisabledGenerator {
    async fn generate(&self, _prompt: &str, _response_schema: &Value) -> Result<String> {
        Err(Error::gateway("no text-generation API key configured"))
    }
}

/// Summarize and highlight operations with their failure fallbacks.
#[derive(Clone)]
pub struct InsightGateway {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl fmt::Debug for InsightGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsightGateway")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl InsightGateway {
    /// Gateway over `generator`; each call is abandoned after `timeout`.
    #[must_use]
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Gateway whose calls always degrade to the fallbacks.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Arc::new(DisabledGenerator), Duration::from_secs(1))
    }

    async fn ask(&self, prompt: &str, schema: &Value) -> Result<String> {
        tokio::time::timeout(self.timeout, self.generator.generate(prompt, schema))
            .await
            .map_err(|_| {
                Error::gateway(format!(
                    "text generation timed out after {:?}",
                    self.timeout
                ))
            })?
    }

    /// Summarizes a customer's records as one paragraph.
    ///
    /// Never fails: any error yields [`SUMMARY_FALLBACK`].
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn summarize(&self, customer_id: &str, records: &[financial_record::Model]) -> String {
        match self.try_summarize(customer_id, records).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Error getting summary: {e}");
                SUMMARY_FALLBACK.to_string()
            }
        }
    }

    async fn try_summarize(
        &self,
        customer_id: &str,
        records: &[financial_record::Model],
    ) -> Result<String> {
        let prompt = prompts::summary_prompt(customer_id, records)?;
        let schema = response_schema::<SummaryResponse>()?;
        let raw = self.ask(&prompt, &schema).await?;
        let reply: SummaryResponse = serde_json::from_str(&raw)?;
        Ok(reply.summary)
    }

    /// Flags key records and attaches a short insight to each.
    ///
    /// Annotations are stripped before sending. The result always holds the input
    /// records in input order; on failure each carries [`INSIGHT_FALLBACK`] and
    /// keeps its previous key flag.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub async fn highlight(&self, records: Vec<AnnotatedRecord>) -> Vec<AnnotatedRecord> {
        if records.is_empty() {
            return records;
        }

        let stripped: Vec<financial_record::Model> =
            records.iter().map(|item| item.record.clone()).collect();

        match self.try_highlight(&stripped).await {
            Ok(annotations) => {
                let flagged = annotations.iter().filter(|a| a.is_key_record).count();
                debug!(flagged, "Highlight completed");
                reconcile(records, &annotations)
            }
            Err(e) => {
                warn!("Error highlighting records: {e}");
                mark_failed(records, INSIGHT_FALLBACK)
            }
        }
    }

    async fn try_highlight(
        &self,
        records: &[financial_record::Model],
    ) -> Result<Vec<RecordAnnotation>> {
        let prompt = prompts::highlight_prompt(records);
        let schema = response_schema::<HighlightResponse>()?;
        let raw = self.ask(&prompt, &schema).await?;
        let reply: HighlightResponse = serde_json::from_str(&raw)?;

        let returned: HashSet<&str> = reply
            .highlighted_records
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        let missing: Vec<&str> = records
            .iter()
            .map(|r| r.id.as_str())
            .filter(|id| !returned.contains(id))
            .collect();
        if !missing.is_empty() {
            return Err(Error::gateway(format!(
                "highlight response is missing records: {}",
                missing.join(", ")
            )));
        }

        Ok(reply.highlighted_records)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        entities::RecordType,
        test_utils::{Reply, ScriptedGenerator, record, scripted_gateway},
    };

    fn three_records() -> Vec<AnnotatedRecord> {
        vec![
            record("R1", "2024-03-01", "500", RecordType::Invoice).into(),
            record("R2", "2024-02-01", "-500", RecordType::Payment).into(),
            record("R3", "2024-01-01", "9000", RecordType::Invoice).into(),
        ]
    }

    #[tokio::test]
    async fn test_summarize_returns_model_summary() {
        let generator = ScriptedGenerator::new([Reply::Text(
            r#"{"summary":"Customer is fully paid up."}"#.to_string(),
        )]);
        let gateway = scripted_gateway(generator.clone());
        let records = [record("R1", "2024-03-01", "500", RecordType::Invoice)];

        let summary = gateway.summarize("C1", &records).await;
        assert_eq!(summary, "Customer is fully paid up.");
        assert!(generator.prompts()[0].contains("customer ID C1"));
    }

    #[tokio::test]
    async fn test_summarize_falls_back_on_failure() {
        let gateway = scripted_gateway(ScriptedGenerator::new([Reply::Fail(
            "503 unavailable".to_string(),
        )]));
        assert_eq!(gateway.summarize("C1", &[]).await, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_summarize_falls_back_on_off_schema_reply() {
        let gateway = scripted_gateway(ScriptedGenerator::new([Reply::Text(
            r#"{"text":"wrong field"}"#.to_string(),
        )]));
        assert_eq!(gateway.summarize("C1", &[]).await, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_summarize_falls_back_on_timeout() {
        let gateway = scripted_gateway(ScriptedGenerator::new([Reply::Slow(
            Duration::from_secs(5),
            r#"{"summary":"too late"}"#.to_string(),
        )]));
        assert_eq!(gateway.summarize("C1", &[]).await, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_disabled_gateway_degrades() {
        let gateway = InsightGateway::disabled();
        assert_eq!(gateway.summarize("C1", &[]).await, SUMMARY_FALLBACK);

        let highlighted = gateway.highlight(three_records()).await;
        assert!(
            highlighted
                .iter()
                .all(|r| r.ai_insight.as_deref() == Some(INSIGHT_FALLBACK))
        );
    }

    #[tokio::test]
    async fn test_highlight_merges_annotations() {
        let generator = ScriptedGenerator::new([Reply::Text(
            r#"{"highlightedRecords":[
                {"id":"R3","aiInsight":"Invoice far above usual size","isKeyRecord":true},
                {"id":"R1","isKeyRecord":false},
                {"id":"R2","aiInsight":"Settles R1","isKeyRecord":false}
            ]}"#
            .to_string(),
        )]);
        let gateway = scripted_gateway(generator);
        let input = three_records();

        let out = gateway.highlight(input.clone()).await;
        assert_eq!(out.len(), 3);
        for (got, original) in out.iter().zip(&input) {
            assert_eq!(got.record, original.record);
        }
        assert_eq!(out[0].is_key_record, Some(false));
        assert_eq!(out[0].ai_insight, None);
        assert_eq!(out[1].ai_insight.as_deref(), Some("Settles R1"));
        assert_eq!(out[2].is_key_record, Some(true));
        assert_eq!(
            out[2].ai_insight.as_deref(),
            Some("Invoice far above usual size")
        );
    }

    #[tokio::test]
    async fn test_highlight_failure_flags_every_record() {
        let gateway = scripted_gateway(ScriptedGenerator::new([Reply::Fail(
            "connection reset".to_string(),
        )]));
        let mut input = three_records();
        input[2].is_key_record = Some(true);

        let out = gateway.highlight(input.clone()).await;
        assert_eq!(out.len(), 3);
        for (got, original) in out.iter().zip(&input) {
            assert_eq!(got.record, original.record);
            assert_eq!(got.ai_insight.as_deref(), Some(INSIGHT_FALLBACK));
            assert_eq!(got.is_key_record, original.is_key_record);
        }
    }

    #[tokio::test]
    async fn test_highlight_partial_response_is_total_failure() {
        let gateway = scripted_gateway(ScriptedGenerator::new([Reply::Text(
            r#"{"highlightedRecords":[{"id":"R1","aiInsight":"ok","isKeyRecord":true}]}"#
                .to_string(),
        )]));

        let out = gateway.highlight(three_records()).await;
        assert!(
            out.iter()
                .all(|r| r.ai_insight.as_deref() == Some(INSIGHT_FALLBACK))
        );
        assert!(out.iter().all(|r| r.is_key_record.is_none()));
    }

    #[tokio::test]
    async fn test_highlight_strips_previous_annotations_from_prompt() {
        let generator = ScriptedGenerator::new([Reply::Fail("ignored".to_string())]);
        let gateway = scripted_gateway(generator.clone());
        let mut input = three_records();
        input[0].ai_insight = Some("PRIOR OPINION".to_string());
        input[0].is_key_record = Some(true);

        gateway.highlight(input).await;
        let prompt = &generator.prompts()[0];
        assert!(!prompt.contains("PRIOR OPINION"));
        assert!(prompt.contains("ID: R1"));
    }

    #[tokio::test]
    async fn test_highlight_empty_input_skips_call() {
        let generator = ScriptedGenerator::new([]);
        let gateway = scripted_gateway(generator.clone());
        assert!(gateway.highlight(Vec::new()).await.is_empty());
        assert!(generator.prompts().is_empty());
    }
}
