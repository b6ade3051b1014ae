//! Triad MCP Server implementation

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, ServerInfo},
    tool, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use numtriad::core::config::Config;
use numtriad::scorer::{create_scorer, CompatibilityStatus, TriadScorer};
use numtriad::search::{parse_k, DocumentIndex, SearchOptions, TriadRankingEngine};
use numtriad::triad::{alignment_score, parse_bias};
use numtriad::TriadPreset;

use super::helpers::{json_result, to_mcp_error};
use super::params::{GetParams, IndexParams, ScoreParams, SearchParams};
use super::types::{
    AlignmentJson, DocumentJson, IndexResultJson, ScoreJson, ScoreResultJson, SearchHitJson,
    SearchResultJson, StatusJson,
};

fn parse_target(target: Option<&str>) -> Result<Option<TriadPreset>, McpError> {
    target
        .map(str::parse::<TriadPreset>)
        .transpose()
        .map_err(to_mcp_error)
}

/// Triad MCP Service
///
/// The index sits behind a read-write lock: searches and lookups share the
/// read side, inserts take the write side.
#[derive(Clone)]
pub struct TriadService {
    scorer: Arc<dyn TriadScorer>,
    status: Arc<CompatibilityStatus>,
    index: Arc<RwLock<DocumentIndex>>,
    engine: TriadRankingEngine,
    default_k: usize,
    tool_router: ToolRouter<Self>,
}

impl TriadService {
    pub fn new(config: &Config) -> Result<Self> {
        let engine = TriadRankingEngine::new(config.ranking_config()?);
        let selected = create_scorer(&config.scorer);

        Ok(Self::with_scorer(
            Arc::from(selected.scorer),
            selected.status,
            engine,
            config.ranking.default_k,
        ))
    }

    pub fn with_scorer(
        scorer: Arc<dyn TriadScorer>,
        status: CompatibilityStatus,
        engine: TriadRankingEngine,
        default_k: usize,
    ) -> Self {
        Self {
            scorer,
            status: Arc::new(status),
            index: Arc::new(RwLock::new(DocumentIndex::new())),
            engine,
            default_k,
            tool_router: Self::tool_router(),
        }
    }
}

#[tool_router]
impl TriadService {
    /// Score texts into triads
    #[tool(
        description = "Score texts into triads (delta = structure, infinity = abstraction, theta = concreteness). Each triad sums to 1. With a target preset, also reports the batch's mean alignment with it."
    )]
    async fn triad_score(
        &self,
        params: Parameters<ScoreParams>,
    ) -> Result<CallToolResult, McpError> {
        let target = parse_target(params.0.target.as_deref())?;
        let texts: Vec<&str> = params.0.texts.iter().map(String::as_str).collect();
        let scored = self.scorer.score(&texts, None).map_err(to_mcp_error)?;

        let alignment = match target {
            Some(target) => {
                let targets = vec![target.triad(); scored.len()];
                let (mean_distance, mean_cosine) =
                    alignment_score(scored.triads(), &targets).map_err(to_mcp_error)?;
                Some(AlignmentJson {
                    target,
                    mean_distance,
                    mean_cosine,
                })
            }
            None => None,
        };

        let results = texts
            .iter()
            .zip(scored.embeddings())
            .zip(scored.triads())
            .map(|((text, embedding), triad)| ScoreJson {
                text: text.to_string(),
                triad: *triad,
                embedding_dim: embedding.len(),
            })
            .collect();

        json_result(&ScoreResultJson {
            scorer: self.scorer.name().to_string(),
            kind: scored.kind(),
            results,
            alignment,
        })
    }

    /// Add documents to the shared index
    #[tool(
        description = "Add documents to the in-memory triad index. Ids must be unique; a batch with any duplicate id is rejected as a whole."
    )]
    async fn triad_index(
        &self,
        params: Parameters<IndexParams>,
    ) -> Result<CallToolResult, McpError> {
        let ids: Vec<&str> = params.0.documents.iter().map(|d| d.id.as_str()).collect();
        let texts: Vec<&str> = params.0.documents.iter().map(|d| d.text.as_str()).collect();

        let mut index = self.index.write().await;
        index
            .insert_batch(&ids, &texts, self.scorer.as_ref())
            .map_err(to_mcp_error)?;

        json_result(&IndexResultJson {
            indexed: ids.len(),
            total: index.len(),
        })
    }

    /// Triad-aware search over the shared index
    #[tool(
        description = "Search the triad index. Ranks by semantic similarity plus triad alignment, optionally biased toward 'abstract' or 'concrete' documents. A target preset steers the query's own triad before alignment."
    )]
    async fn triad_search(
        &self,
        params: Parameters<SearchParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let k = match params.k {
            Some(k) => parse_k(k).map_err(to_mcp_error)?,
            None => self.default_k,
        };
        let bias = params
            .bias
            .as_deref()
            .map(parse_bias)
            .transpose()
            .map_err(to_mcp_error)?;
        let target = parse_target(params.target.as_deref())?;
        let options = SearchOptions::top(k).with_bias(bias).with_target(target);

        let index = self.index.read().await;
        let result = self
            .engine
            .search(&params.query, &index, self.scorer.as_ref(), &options)
            .map_err(to_mcp_error)?;

        json_result(&SearchResultJson {
            query: params.query.clone(),
            query_triad: result.query_triad,
            effective_triad: result.effective_triad,
            bias,
            target,
            results: result.hits.iter().map(SearchHitJson::from).collect(),
        })
    }

    /// Fetch one indexed document
    #[tool(description = "Get an indexed document and its triad by id.")]
    async fn triad_get(&self, params: Parameters<GetParams>) -> Result<CallToolResult, McpError> {
        let index = self.index.read().await;
        let doc = index.get(&params.0.id).map_err(to_mcp_error)?;
        json_result(&DocumentJson::from(doc))
    }

    /// Scorer and index status
    #[tool(description = "Show the active scorer, neural dependency status, ranking weights and index size.")]
    async fn triad_status(&self) -> Result<CallToolResult, McpError> {
        let index = self.index.read().await;
        json_result(&StatusJson {
            scorer: self.scorer.name().to_string(),
            kind: self.scorer.kind(),
            compatibility: (*self.status).clone(),
            ranking: *self.engine.config(),
            default_k: self.default_k,
            documents: index.len(),
            dimension: index.dimension(),
        })
    }
}

#[rmcp::tool_handler]
impl ServerHandler for TriadService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Triad MCP Server. Scores text structure / abstraction / concreteness and ranks an in-memory index with optional abstract or concrete bias.".to_string()
            ),
            ..Default::default()
        }
    }
}

/// Run the MCP server
pub async fn run_mcp_server(config: Config) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let service = TriadService::new(&config)?;
    info!("Starting MCP server with {} scorer", service.scorer.kind().as_str());

    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use numtriad::core::config::ScorerSettings;
    use numtriad::scorer::HeuristicScorer;

    fn service() -> TriadService {
        TriadService::with_scorer(
            Arc::new(HeuristicScorer::new()),
            CompatibilityStatus::probe(&ScorerSettings::default()),
            TriadRankingEngine::default(),
            3,
        )
    }

    #[tokio::test]
    async fn test_shared_index_sees_inserts() {
        let service = service();
        let clone = service.clone();

        clone
            .index
            .write()
            .await
            .insert("a", "Une théorie générale.", clone.scorer.as_ref())
            .unwrap();

        let index = service.index.read().await;
        assert!(index.contains("a"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_parse_target() {
        assert_eq!(parse_target(None).unwrap(), None);
        assert_eq!(
            parse_target(Some("abstract")).unwrap(),
            Some(TriadPreset::Abstract)
        );
        assert!(parse_target(Some("sideways")).is_err());
    }
}
