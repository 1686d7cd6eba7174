use crate::analyzer::InquiryAnalyzer;
use crate::message::{InquiryMessage, ScoreBreakdown};
use anyhow::Context;
use std::sync::Arc;
use tokio::sync::Semaphore;

pub const DEFAULT_POOL_CAPACITY: usize = 5;

/// Bounded worker pool around the synchronous scoring pipeline. The
/// pipeline is CPU-only and shares nothing mutable, so concurrency needs no
/// locking - the semaphore only caps how many blocking workers run at once.
#[derive(Clone)]
pub struct AnalyzerPool {
    analyzer: Arc<InquiryAnalyzer>,
    permits: Arc<Semaphore>,
}

impl AnalyzerPool {
    pub fn new(analyzer: Arc<InquiryAnalyzer>, capacity: usize) -> Self {
        AnalyzerPool {
            analyzer,
            permits: Arc::new(Semaphore::new(capacity.max(1))),
        }
    }

    /// Score one message on a pool worker, suspending the caller until the
    /// worker returns.
    pub async fn score(&self, message: InquiryMessage) -> anyhow::Result<ScoreBreakdown> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .context("analyzer pool closed")?;
        let analyzer = self.analyzer.clone();
        let breakdown = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            analyzer.calculate_score(&message)
        })
        .await
        .context("scoring task failed")?;
        Ok(breakdown)
    }

    /// Fan out one scoring task per message and join on all of them.
    /// `result[i]` corresponds to `messages[i]` regardless of completion
    /// order. The join is all-or-nothing: the first task failure aborts the
    /// batch and no partial list is returned.
    pub async fn score_batch(
        &self,
        messages: Vec<InquiryMessage>,
    ) -> anyhow::Result<Vec<ScoreBreakdown>> {
        let handles: Vec<_> = messages
            .into_iter()
            .map(|message| {
                let pool = self.clone();
                tokio::spawn(async move { pool.score(message).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.context("batch task panicked")??);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JargonConfig, KeywordConfig};

    fn pool(capacity: usize) -> AnalyzerPool {
        let keywords: KeywordConfig = serde_json::from_str(
            r#"{"buying_intent": {"words": {"order": 60, "quotation": 40}}}"#,
        )
        .unwrap();
        let analyzer = Arc::new(InquiryAnalyzer::new(keywords, JargonConfig::default()));
        AnalyzerPool::new(analyzer, capacity)
    }

    fn message(n: usize) -> InquiryMessage {
        InquiryMessage {
            subject: Some(format!("Inquiry number {n}")),
            body: Some(if n % 2 == 0 {
                "Please confirm our order and send the delivery schedule.".to_string()
            } else {
                "We kindly request your latest quotation for this item.".to_string()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_single_score_matches_sync_pipeline() {
        let pool = pool(5);
        let msg = message(0);
        let expected = pool.analyzer.calculate_score(&msg);
        let got = pool.score(msg).await.unwrap();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_batch_results_are_index_aligned() {
        let pool = pool(5);
        let messages: Vec<InquiryMessage> = (0..20).map(message).collect();
        let results = pool.score_batch(messages.clone()).await.unwrap();
        assert_eq!(results.len(), messages.len());
        for (msg, result) in messages.iter().zip(&results) {
            assert_eq!(*result, pool.analyzer.calculate_score(msg));
        }
        // Even and odd inputs hit different keywords, so alignment is
        // observable, not vacuous
        assert_eq!(results[0].intent, 60.0);
        assert_eq!(results[1].intent, 40.0);
    }

    #[tokio::test]
    async fn test_small_capacity_still_completes_batch() {
        let pool = pool(1);
        let messages: Vec<InquiryMessage> = (0..8).map(message).collect();
        let results = pool.score_batch(messages).await.unwrap();
        assert_eq!(results.len(), 8);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let pool = pool(5);
        let results = pool.score_batch(Vec::new()).await.unwrap();
        assert!(results.is_empty());
    }
}
