//! Parameter structures for MCP tools

use schemars::JsonSchema;
use serde::Deserialize;

/// Parameters for triad_score tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ScoreParams {
    /// Texts to score (one triad per text)
    #[schemars(description = "Texts to score, one triad per text")]
    pub texts: Vec<String>,
    /// Preset to measure the scored triads against
    #[schemars(description = "Optional preset: 'abstract', 'concrete' or 'balanced'")]
    #[serde(default)]
    pub target: Option<String>,
}

/// One document for triad_index
#[derive(Debug, Deserialize, JsonSchema)]
pub struct DocumentParam {
    #[schemars(description = "Unique document id")]
    pub id: String,
    #[schemars(description = "Document text")]
    pub text: String,
}

/// Parameters for triad_index tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct IndexParams {
    /// Documents to add; the whole batch is rejected if any id already exists
    #[schemars(
        description = "Documents to add. The whole batch is rejected if any id is already indexed or repeated."
    )]
    pub documents: Vec<DocumentParam>,
}

/// Parameters for triad_search tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct SearchParams {
    /// Natural language query
    #[schemars(description = "Natural language search query")]
    pub query: String,
    /// Number of results (default from config)
    #[schemars(description = "Maximum number of results (must be >= 0, default from config)")]
    #[serde(default)]
    pub k: Option<i64>,
    /// Bias preset or raw triple
    #[schemars(
        description = "Optional bias: 'abstract', 'concrete', 'balanced', or three comma-separated scores like '0.1,0.8,0.1'"
    )]
    #[serde(default)]
    pub bias: Option<String>,
    /// Preset that steers the query triad before it is compared with documents
    #[schemars(description = "Optional preset: 'abstract', 'concrete' or 'balanced'")]
    #[serde(default)]
    pub target: Option<String>,
}

/// Parameters for triad_get tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetParams {
    #[schemars(description = "Document id to retrieve")]
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_params_defaults() {
        let params: SearchParams = serde_json::from_str(r#"{"query": "concepts"}"#).unwrap();
        assert_eq!(params.query, "concepts");
        assert!(params.k.is_none());
        assert!(params.bias.is_none());
        assert!(params.target.is_none());

        let params: SearchParams =
            serde_json::from_str(r#"{"query": "q", "k": 2, "target": "concrete"}"#).unwrap();
        assert_eq!(params.k, Some(2));
        assert_eq!(params.target.as_deref(), Some("concrete"));
    }

    #[test]
    fn test_index_params() {
        let params: IndexParams = serde_json::from_str(
            r#"{"documents": [{"id": "a", "text": "Une théorie."}]}"#,
        )
        .unwrap();
        assert_eq!(params.documents.len(), 1);
        assert_eq!(params.documents[0].id, "a");
    }
}
