// HTTP facade: one endpoint per partitioning method plus the random graph
// generators. Bodies and responses are JSON strings carrying brace-serialized
// matrices; every library error maps to a 400 with the message as body.

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::algorithms::{Error, Method};
use crate::gen_graph::{random_adjacency, random_weights, rng_from_seed, seed_from_env};
use crate::graph::Graph;
use crate::imbalance::imbalance;
use crate::io::{format_matrix, format_rows, parse_matrix};
use crate::partition::{groups_from_ids, partition_matrix};

fn default_part_count() -> usize {
    2
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartitionRequest {
    pub adjacency_matrix: String,
    #[serde(default)]
    pub weights_matrix: Option<String>,
    #[serde(default = "default_part_count")]
    pub num_of_partitions: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PartitionResponse {
    pub partition_matrix: String,
    pub execution_time: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomGraphQuery {
    pub num_vertices: usize,
    pub max_edges_per_vertex: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdjacencyResponse {
    pub adjacency_matrix: String,
    pub execution_time: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RandomWeightsRequest {
    pub adjacency_matrix: String,
    pub min_weight: f64,
    pub max_weight: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WeightsResponse {
    pub weights_matrix: String,
    pub execution_time: u64,
}

type Rejection = (StatusCode, String);

fn bad_request(error: Error) -> Rejection {
    (StatusCode::BAD_REQUEST, error.to_string())
}

/// The facade router with every partitioning endpoint registered.
pub fn router() -> Router {
    Router::new()
        .route("/randomAdjacencyGraph", get(random_adjacency_graph))
        .route("/randomWeightedAdjacencyGraph", post(random_weighted_adjacency_graph))
        .route("/:algorithm", post(run_algorithm))
}

async fn run_algorithm(
    Path(name): Path<String>,
    Json(request): Json<PartitionRequest>,
) -> Result<Json<PartitionResponse>, Rejection> {
    let start = Instant::now();
    let method = Method::from_name(&name)
        .ok_or((StatusCode::BAD_REQUEST, format!("unknown algorithm {name:?}")))?;

    let adjacency =
        Graph::from_dense(parse_matrix(&request.adjacency_matrix).map_err(bad_request)?)
            .map_err(bad_request)?;
    let weights = match &request.weights_matrix {
        Some(text) => Some(
            Graph::from_dense(parse_matrix(text).map_err(bad_request)?).map_err(bad_request)?,
        ),
        None => None,
    };

    let part_count = request.num_of_partitions;
    let part_ids = method
        .run(&adjacency, weights.as_ref(), part_count, seed_from_env())
        .map_err(bad_request)?;

    let groups = groups_from_ids(&part_ids, part_count);
    let serialized = format_rows(&partition_matrix(&groups));
    let imbalance_of_partition = imbalance(
        part_count,
        &part_ids,
        std::iter::repeat(1.0f64).take(part_ids.len()),
    );
    info!(
        "{name}: partitioned {} vertices into {part_count} parts (imbalance {imbalance_of_partition:.3}) in {:?}",
        adjacency.len(),
        start.elapsed()
    );

    Ok(Json(PartitionResponse {
        partition_matrix: serialized,
        execution_time: start.elapsed().as_millis() as u64,
    }))
}

async fn random_adjacency_graph(
    Query(query): Query<RandomGraphQuery>,
) -> Result<Json<AdjacencyResponse>, Rejection> {
    let start = Instant::now();
    let mut rng = rng_from_seed(seed_from_env());
    let adjacency = random_adjacency(query.num_vertices, query.max_edges_per_vertex, &mut rng);
    Ok(Json(AdjacencyResponse {
        adjacency_matrix: format_matrix(&adjacency),
        execution_time: start.elapsed().as_millis() as u64,
    }))
}

async fn random_weighted_adjacency_graph(
    Json(request): Json<RandomWeightsRequest>,
) -> Result<Json<WeightsResponse>, Rejection> {
    let start = Instant::now();
    let adjacency =
        Graph::from_dense(parse_matrix(&request.adjacency_matrix).map_err(bad_request)?)
            .map_err(bad_request)?;
    let mut rng = rng_from_seed(seed_from_env());
    let weights = random_weights(
        adjacency.dense(),
        request.min_weight,
        request.max_weight,
        &mut rng,
    )
    .map_err(bad_request)?;
    Ok(Json(WeightsResponse {
        weights_matrix: format_matrix(&weights),
        execution_time: start.elapsed().as_millis() as u64,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_algorithm_returns_padded_partition_matrix() {
        // Arrange: 4-cycle, brute force, k = 2.
        let request = PartitionRequest {
            adjacency_matrix: "{{0,1,0,1},{1,0,1,0},{0,1,0,1},{1,0,1,0}}".to_string(),
            weights_matrix: None,
            num_of_partitions: 2,
        };

        // Act
        let response = run_algorithm(Path("bruteForce".to_string()), Json(request))
            .await
            .unwrap();

        // Assert: both optimal bisections of the 4-cycle group opposite or
        // adjacent vertex pairs.
        let body = &response.0.partition_matrix;
        assert!(body == "{{0,1},{2,3}}" || body == "{{0,2},{1,3}}" || body == "{{0,3},{1,2}}");
    }

    #[test]
    fn test_response_wire_field_names() {
        let response = PartitionResponse {
            partition_matrix: "{{0,1},{2,3}}".to_string(),
            execution_time: 12,
        };

        let body = serde_json::to_string(&response).unwrap();

        assert_eq!(body, r#"{"PartitionMatrix":"{{0,1},{2,3}}","ExecutionTime":12}"#);
    }

    #[test]
    fn test_request_wire_field_names() {
        let request: PartitionRequest = serde_json::from_str(
            r#"{"AdjacencyMatrix":"{{0,1},{1,0}}","NumOfPartitions":2}"#,
        )
        .unwrap();

        assert_eq!(request.adjacency_matrix, "{{0,1},{1,0}}");
        assert_eq!(request.num_of_partitions, 2);
        assert!(request.weights_matrix.is_none());
    }

    #[tokio::test]
    async fn test_run_algorithm_rejects_unknown_name() {
        let request = PartitionRequest {
            adjacency_matrix: "{{0,1},{1,0}}".to_string(),
            weights_matrix: None,
            num_of_partitions: 2,
        };

        let result = run_algorithm(Path("quantumAnnealing".to_string()), Json(request)).await;

        let (status, _message) = result.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_run_algorithm_rejects_malformed_matrix() {
        let request = PartitionRequest {
            adjacency_matrix: "{{0,1},{1}}".to_string(),
            weights_matrix: None,
            num_of_partitions: 2,
        };

        let result = run_algorithm(Path("greedyAlgorithm".to_string()), Json(request)).await;

        let (status, message) = result.err().unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(message.contains("malformed matrix"));
    }

    #[tokio::test]
    async fn test_random_endpoints_round_trip() {
        // Arrange
        let query = RandomGraphQuery { num_vertices: 8, max_edges_per_vertex: 3 };

        // Act
        let adjacency = random_adjacency_graph(Query(query)).await.unwrap();
        let weights = random_weighted_adjacency_graph(Json(RandomWeightsRequest {
            adjacency_matrix: adjacency.0.adjacency_matrix.clone(),
            min_weight: 1.0,
            max_weight: 3.0,
        }))
        .await
        .unwrap();

        // Assert: the weighted matrix parses and stays on the adjacency
        // support.
        let adjacency = Graph::from_dense(parse_matrix(&adjacency.0.adjacency_matrix).unwrap())
            .unwrap();
        let weights = Graph::from_dense(parse_matrix(&weights.0.weights_matrix).unwrap()).unwrap();
        crate::graph::check_weight_support(&adjacency, &weights).unwrap();
    }
}
