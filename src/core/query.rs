//! Knowledge-graph query dispatch bounded by a deadline.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::schema::fact::FactPair;

/// Boxed error used at collaborator boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A service that executes a query and returns `(label, fact)` rows.
///
/// Implementations may take arbitrarily long or never finish; callers go
/// through [`TimedQueryExecutor`] to bound the wait.
#[async_trait]
pub trait KnowledgeGraph: Send + Sync {
    async fn run_query(&self, query: &str) -> Result<Vec<FactPair>, BoxError>;
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("timeout exceeded for query: {query}")]
    Timeout { query: String, timeout_ms: u64 },
    #[error(transparent)]
    Upstream(BoxError),
}

/// Race `graph.run_query(query)` against a `timeout` timer.
///
/// The query runs on its own task. When the timer wins, that task is
/// detached rather than aborted: it may still finish and produce side
/// effects, but its result is dropped.
pub async fn execute_with_timeout(
    graph: Arc<dyn KnowledgeGraph>,
    query: &str,
    timeout: Duration,
) -> Result<Vec<FactPair>, QueryError> {
    let owned = query.to_string();
    let call = tokio::spawn(async move { graph.run_query(&owned).await });

    tokio::select! {
        biased;
        joined = call => match joined {
            Ok(result) => result.map_err(QueryError::Upstream),
            Err(join_err) => Err(QueryError::Upstream(Box::new(join_err))),
        },
        _ = tokio::time::sleep(timeout) => {
            let timeout_ms = timeout.as_millis() as u64;
            tracing::warn!(timeout_ms, query = %query, "Knowledge-graph query timed out");
            Err(QueryError::Timeout {
                query: query.to_string(),
                timeout_ms,
            })
        }
    }
}

/// A knowledge-graph handle paired with a fixed per-query deadline.
#[derive(Clone)]
pub struct TimedQueryExecutor {
    graph: Arc<dyn KnowledgeGraph>,
    timeout: Duration,
}

impl TimedQueryExecutor {
    pub fn new(graph: Arc<dyn KnowledgeGraph>, timeout: Duration) -> Self {
        Self { graph, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn execute(&self, query: &str) -> Result<Vec<FactPair>, QueryError> {
        execute_with_timeout(Arc::clone(&self.graph), query, self.timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct DelayedGraph {
        delay: Duration,
        rows: Vec<FactPair>,
        completed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl KnowledgeGraph for DelayedGraph {
        async fn run_query(&self, _query: &str) -> Result<Vec<FactPair>, BoxError> {
            tokio::time::sleep(self.delay).await;
            self.completed.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows.clone())
        }
    }

    struct RejectingGraph;

    #[async_trait]
    impl KnowledgeGraph for RejectingGraph {
        async fn run_query(&self, _query: &str) -> Result<Vec<FactPair>, BoxError> {
            Err("service unavailable".into())
        }
    }

    fn delayed(ms: u64) -> (Arc<dyn KnowledgeGraph>, Arc<AtomicUsize>) {
        let completed = Arc::new(AtomicUsize::new(0));
        let graph = DelayedGraph {
            delay: Duration::from_millis(ms),
            rows: vec![FactPair::new("Peru", "Lima")],
            completed: Arc::clone(&completed),
        };
        (Arc::new(graph), completed)
    }

    #[tokio::test(start_paused = true)]
    async fn fast_query_returns_result() {
        let (graph, _) = delayed(10);
        let rows = execute_with_timeout(graph, "SELECT fast", Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(rows, vec![FactPair::new("Peru", "Lima")]);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_query_times_out_with_query_text() {
        let (graph, _) = delayed(500);
        let err = execute_with_timeout(graph, "SELECT slow", Duration::from_millis(50))
            .await
            .unwrap_err();
        match err {
            QueryError::Timeout { query, timeout_ms } => {
                assert_eq!(query, "SELECT slow");
                assert_eq!(timeout_ms, 50);
            }
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_message_names_query() {
        let (graph, _) = delayed(500);
        let err = execute_with_timeout(graph, "SELECT slow", Duration::from_millis(50))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "timeout exceeded for query: SELECT slow");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_call_still_completes_in_background() {
        let (graph, completed) = delayed(500);
        let executor = TimedQueryExecutor::new(graph, Duration::from_millis(50));
        assert!(executor.execute("SELECT slow").await.is_err());
        assert_eq!(completed.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn upstream_rejection_propagates_unchanged() {
        let graph: Arc<dyn KnowledgeGraph> = Arc::new(RejectingGraph);
        let err = execute_with_timeout(graph, "SELECT x", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Upstream(_)));
        assert_eq!(err.to_string(), "service unavailable");
    }

    #[test]
    fn executor_keeps_timeout() {
        let (graph, _) = delayed(1);
        let executor = TimedQueryExecutor::new(graph, Duration::from_millis(250));
        assert_eq!(executor.timeout(), Duration::from_millis(250));
    }
}
