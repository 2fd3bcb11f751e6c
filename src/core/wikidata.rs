//! Wikidata SPARQL endpoint as a [`KnowledgeGraph`].

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

use crate::core::query::{BoxError, KnowledgeGraph};
use crate::schema::fact::FactPair;

pub const WIKIDATA_SPARQL_ENDPOINT: &str = "https://query.wikidata.org/sparql";

/// Result variable mapped to `FactPair::image`.
const IMAGE_VAR: &str = "image";

#[derive(Debug, Error)]
pub enum WikidataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("query must select a label and a fact variable, got {0:?}")]
    MissingVariables(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct SparqlResponse {
    head: SparqlHead,
    results: SparqlResults,
}

#[derive(Debug, Deserialize)]
struct SparqlHead {
    vars: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SparqlResults {
    bindings: Vec<HashMap<String, SparqlValue>>,
}

#[derive(Debug, Deserialize)]
struct SparqlValue {
    value: String,
}

/// Convert a SPARQL JSON result document into fact rows.
///
/// The first two non-image variables are the subject label and the fact
/// label, in that order. Rows missing either one are skipped.
pub fn facts_from_sparql_json(body: &str) -> Result<Vec<FactPair>, WikidataError> {
    let response: SparqlResponse = serde_json::from_str(body)?;
    let labels: Vec<&String> = response
        .head
        .vars
        .iter()
        .filter(|v| v.as_str() != IMAGE_VAR)
        .collect();
    let (subject_var, fact_var) = match labels.as_slice() {
        [subject, fact, ..] => (subject.as_str(), fact.as_str()),
        _ => return Err(WikidataError::MissingVariables(response.head.vars.clone())),
    };

    let facts = response
        .results
        .bindings
        .into_iter()
        .filter_map(|mut row| {
            let subject = row.remove(subject_var)?.value;
            let fact = row.remove(fact_var)?.value;
            Some(FactPair {
                subject_label: subject,
                fact_label: fact,
                image: row.remove(IMAGE_VAR).map(|v| v.value),
            })
        })
        .collect();
    Ok(facts)
}

/// HTTP client for a SPARQL endpoint returning JSON results.
#[derive(Debug, Clone)]
pub struct WikidataClient {
    http: reqwest::Client,
    endpoint: String,
}

impl WikidataClient {
    pub fn new() -> Result<Self, WikidataError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("trivia-engine/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            endpoint: WIKIDATA_SPARQL_ENDPOINT.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl KnowledgeGraph for WikidataClient {
    async fn run_query(&self, query: &str) -> Result<Vec<FactPair>, BoxError> {
        let body = self
            .http
            .get(&self.endpoint)
            .query(&[("query", query), ("format", "json")])
            .header(ACCEPT, "application/sparql-results+json")
            .send()
            .await
            .map_err(WikidataError::from)?
            .error_for_status()
            .map_err(WikidataError::from)?
            .text()
            .await
            .map_err(WikidataError::from)?;
        Ok(facts_from_sparql_json(&body)?)
    }
}
