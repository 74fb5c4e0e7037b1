// Random test/benchmark input: degree-capped random adjacency matrices and
// half-step quantized edge weights over an existing adjacency.

use nalgebra::DMatrix;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::algorithms::Error;

/// Resolve the seed exposed through the `RNG_SEED` environment variable, if
/// one is set and parses as an integer.
pub fn seed_from_env() -> Option<u64> {
    std::env::var("RNG_SEED").ok().and_then(|value| value.parse().ok())
}

/// An RNG seeded from `seed` when given, from entropy otherwise.
pub fn rng_from_seed(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

/// Generate a random symmetric 0/1 adjacency matrix over `num_vertices`
/// vertices.
///
/// Each vertex draws a target degree in `[1, max_edges_per_vertex]` (lower
/// bound 2 when the vertex is already the sole connection of a degree-one
/// neighbor, so the pair does not dangle) and connects to distinct vertices
/// that still have capacity left.
pub fn random_adjacency(
    num_vertices: usize,
    max_edges_per_vertex: usize,
    rng: &mut SmallRng,
) -> DMatrix<f64> {
    let mut adjacency = DMatrix::zeros(num_vertices, num_vertices);
    let mut degrees = vec![0usize; num_vertices];

    for vertex in 0..num_vertices {
        let has_dangling_neighbor = (0..num_vertices).any(|neighbor| {
            adjacency[(vertex, neighbor)] > 0.0 && degrees[neighbor] == 1
        });
        let lower = if has_dangling_neighbor && degrees[vertex] == 1 { 2 } else { 1 };
        if lower > max_edges_per_vertex {
            continue;
        }
        let target = rng.gen_range(lower..=max_edges_per_vertex);

        while degrees[vertex] < target {
            let candidates: Vec<usize> = (0..num_vertices)
                .filter(|&neighbor| {
                    neighbor != vertex
                        && adjacency[(vertex, neighbor)] == 0.0
                        && degrees[neighbor] < max_edges_per_vertex
                })
                .collect();
            let Some(&neighbor) = candidates.get(rng.gen_range(0..candidates.len().max(1))) else {
                break;
            };
            adjacency[(vertex, neighbor)] = 1.0;
            adjacency[(neighbor, vertex)] = 1.0;
            degrees[vertex] += 1;
            degrees[neighbor] += 1;
        }
    }

    adjacency
}

/// Generate random weights over the edges of an existing adjacency matrix.
/// Weights are drawn from `[min_weight, max_weight]` quantized to half steps:
/// `min + 0.5 * round(u * (max - min) / 0.5)`.
pub fn random_weights(
    adjacency: &DMatrix<f64>,
    min_weight: f64,
    max_weight: f64,
    rng: &mut SmallRng,
) -> Result<DMatrix<f64>, Error> {
    if max_weight < min_weight || min_weight <= 0.0 {
        return Err(Error::InvalidWeightRange {
            min: min_weight,
            max: max_weight,
        });
    }

    let n = adjacency.nrows();
    let mut weights = DMatrix::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            if adjacency[(i, j)] > 0.0 {
                let step_count = (rng.gen::<f64>() * (max_weight - min_weight) / 0.5).round();
                let weight = min_weight + 0.5 * step_count;
                weights[(i, j)] = weight;
                weights[(j, i)] = weight;
            }
        }
    }

    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_adjacency_is_symmetric_with_capped_degrees() {
        // Arrange
        let mut rng = rng_from_seed(Some(5));

        // Act
        let adjacency = random_adjacency(12, 3, &mut rng);

        // Assert
        let mut total_edges = 0;
        for i in 0..12 {
            assert_eq!(adjacency[(i, i)], 0.0);
            let degree = (0..12).filter(|&j| adjacency[(i, j)] > 0.0).count();
            assert!(degree <= 3);
            for j in 0..12 {
                assert_eq!(adjacency[(i, j)], adjacency[(j, i)]);
                if j > i && adjacency[(i, j)] > 0.0 {
                    total_edges += 1;
                }
            }
        }
        assert!(total_edges > 0);
    }

    #[test]
    fn test_random_adjacency_is_reproducible_under_a_seed() {
        let first = random_adjacency(10, 4, &mut rng_from_seed(Some(7)));
        let second = random_adjacency(10, 4, &mut rng_from_seed(Some(7)));
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_weights_cover_edges_in_half_steps() {
        // Arrange
        let mut rng = rng_from_seed(Some(5));
        let adjacency = random_adjacency(8, 3, &mut rng);

        // Act
        let weights = random_weights(&adjacency, 1.0, 4.0, &mut rng).unwrap();

        // Assert
        for i in 0..8 {
            for j in 0..8 {
                if adjacency[(i, j)] > 0.0 {
                    let weight = weights[(i, j)];
                    assert!((1.0..=4.0).contains(&weight));
                    let steps = (weight - 1.0) / 0.5;
                    assert!((steps - steps.round()).abs() < 1e-12);
                } else {
                    assert_eq!(weights[(i, j)], 0.0);
                }
            }
        }
    }

    #[test]
    fn test_random_weights_reject_bad_range() {
        let adjacency = DMatrix::zeros(2, 2);
        let mut rng = rng_from_seed(Some(1));
        assert!(random_weights(&adjacency, 3.0, 1.0, &mut rng).is_err());
        assert!(random_weights(&adjacency, 0.0, 1.0, &mut rng).is_err());
    }
}
