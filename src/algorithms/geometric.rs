// Geometric partitioning on the unit sphere: vertices are embedded in the
// plane with two Laplacian eigenvectors, lifted to the sphere by stereographic
// projection and split recursively by random great circles.
//
// # Reference
//
// Gilbert, John R., Gary L. Miller, and Shang-Hua Teng. "Geometric mesh
// partitioning: Implementation and experiments."
// SIAM Journal on Scientific Computing 19.6 (1998): 2091-2110.

use rand::rngs::SmallRng;
use rand::Rng;

use crate::algorithms::Error;
use crate::dense;
use crate::gen_graph::rng_from_seed;
use crate::graph::Graph;
use crate::Partition;

fn geometric(
    part_ids: &mut [usize],
    weights: &Graph,
    part_count: usize,
    seed: Option<u64>,
) -> Result<(), Error> {
    if part_count == 1 {
        part_ids.fill(0);
        return Ok(());
    }
    if part_count == weights.len() {
        // Singleton parts; no embedding needed (and none exists below three
        // vertices).
        for (vertex, part) in part_ids.iter_mut().enumerate() {
            *part = vertex;
        }
        return Ok(());
    }

    let n = weights.len();
    let mut rng = rng_from_seed(seed);

    let points = spherical_embedding(weights)?;

    let vertices: Vec<usize> = (0..n).collect();
    let mut next_part = 0;
    split_recursive(&vertices, part_count, &points, &mut rng, &mut next_part, part_ids);
    debug_assert_eq!(next_part, part_count);
    Ok(())
}

// Embed each vertex with the eigenvectors of the 2nd- and 3rd-smallest
// Laplacian eigenvalues, project the plane points onto the unit sphere and
// shift by the centroid of the sphere points.
fn spherical_embedding(weights: &Graph) -> Result<Vec<[f64; 3]>, Error> {
    let n = weights.len();
    let laplacian = weights.laplacian();
    let eigen = dense::symmetric_eigen(&laplacian)?;
    let (first, second) = dense::embedding_columns(&eigen)?;

    let mut points: Vec<[f64; 3]> = (0..n)
        .map(|vertex| {
            let x = eigen.vectors[(vertex, first)];
            let y = eigen.vectors[(vertex, second)];
            let norm = (x * x + y * y + 1.0).sqrt();
            [x / norm, y / norm, 1.0 / norm]
        })
        .collect();

    let mut centroid = [0.0f64; 3];
    for point in &points {
        for axis in 0..3 {
            centroid[axis] += point[axis] / n as f64;
        }
    }
    for point in &mut points {
        for axis in 0..3 {
            point[axis] -= centroid[axis];
        }
    }
    Ok(points)
}

fn split_recursive(
    vertices: &[usize],
    part_count: usize,
    points: &[[f64; 3]],
    rng: &mut SmallRng,
    next_part: &mut usize,
    part_ids: &mut [usize],
) {
    if part_count <= 1 {
        for &vertex in vertices {
            part_ids[vertex] = *next_part;
        }
        *next_part += 1;
        return;
    }

    let normal = random_unit_normal(rng);
    let distances: Vec<f64> = vertices
        .iter()
        .map(|&vertex| dot(&points[vertex], &normal))
        .collect();
    let median = dense::upper_median(&distances);

    let mut left = Vec::new();
    let mut right = Vec::new();
    for (&vertex, &distance) in vertices.iter().zip(&distances) {
        if distance < median {
            left.push(vertex);
        } else {
            right.push(vertex);
        }
    }
    rebalance(&mut left, &mut right, points);

    split_recursive(&left, part_count / 2, points, rng, next_part, part_ids);
    split_recursive(&right, part_count - part_count / 2, points, rng, next_part, part_ids);
}

// Move vertices from the bigger to the smaller side until the sides differ by
// at most one, picking the vertex whose coordinate sum lies closest to the
// median coordinate sum of the whole call.
fn rebalance(left: &mut Vec<usize>, right: &mut Vec<usize>, points: &[[f64; 3]]) {
    let coordinate_sum = |vertex: usize| points[vertex].iter().sum::<f64>();
    let sums: Vec<f64> = left
        .iter()
        .chain(right.iter())
        .map(|&vertex| coordinate_sum(vertex))
        .collect();
    let median_sum = dense::upper_median(&sums);

    while left.len().abs_diff(right.len()) > 1 {
        let (bigger, smaller) = if left.len() > right.len() {
            (&mut *left, &mut *right)
        } else {
            (&mut *right, &mut *left)
        };
        let closest = bigger
            .iter()
            .enumerate()
            .min_by(|(_, &a), (_, &b)| {
                let da = (coordinate_sum(a) - median_sum).abs();
                let db = (coordinate_sum(b) - median_sum).abs();
                da.total_cmp(&db)
            })
            .map(|(position, _)| position)
            .unwrap();
        let vertex = bigger.swap_remove(closest);
        smaller.push(vertex);
    }
}

// Uniform random direction, by rejection from the unit cube.
fn random_unit_normal(rng: &mut SmallRng) -> [f64; 3] {
    loop {
        let candidate = [
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        ];
        let norm_squared = dot(&candidate, &candidate);
        if norm_squared > 1e-12 && norm_squared <= 1.0 {
            let norm = norm_squared.sqrt();
            return [candidate[0] / norm, candidate[1] / norm, candidate[2] / norm];
        }
    }
}

fn dot(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Geometric Partitioner
///
/// Recursively bisects the spherical embedding of a weighted graph with
/// random great circles; supports any number of parts. The cutting planes
/// are random, so runs differ unless a seed is set.
#[derive(Debug, Clone, Copy)]
pub struct Geometric {
    /// Number of parts to produce.
    pub part_count: usize,

    /// Seed for the random cutting planes.
    pub seed: Option<u64>,
}

impl Default for Geometric {
    fn default() -> Self {
        Geometric { part_count: 2, seed: None }
    }
}

impl<'a> Partition<&'a Graph> for Geometric {
    type Metadata = ();
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [usize],
        weights: &'a Graph,
    ) -> Result<Self::Metadata, Self::Error> {
        if part_ids.len() != weights.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: weights.len(),
            });
        }
        if self.part_count == 0 || self.part_count > weights.len() {
            return Err(Error::InvalidPartCount {
                part_count: self.part_count,
                vertex_count: weights.len(),
            });
        }
        geometric(part_ids, weights, self.part_count, self.seed)
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::DMatrix;
    use crate::gen_graph::{random_adjacency, random_weights};
    use crate::partition::{is_balanced, part_sizes};
    use super::*;

    fn grid_graph(side: usize) -> Graph {
        let n = side * side;
        let mut matrix = DMatrix::zeros(n, n);
        for row in 0..side {
            for col in 0..side {
                let vertex = row * side + col;
                if col + 1 < side {
                    matrix[(vertex, vertex + 1)] = 1.0;
                    matrix[(vertex + 1, vertex)] = 1.0;
                }
                if row + 1 < side {
                    matrix[(vertex, vertex + side)] = 1.0;
                    matrix[(vertex + side, vertex)] = 1.0;
                }
            }
        }
        Graph::from_dense(matrix).unwrap()
    }

    #[test]
    fn test_geometric_bisection_is_balanced() {
        // Arrange
        let graph = grid_graph(4);
        let mut partition = vec![0; graph.len()];

        // Act
        Geometric { part_count: 2, seed: Some(5) }
            .partition(&mut partition, &graph)
            .unwrap();

        // Assert
        assert!(is_balanced(&partition, 2));
        assert_eq!(partition.iter().filter(|&&part| part > 1).count(), 0);
    }

    #[test]
    fn test_geometric_four_parts_cover_all_vertices() {
        // Arrange
        let graph = grid_graph(4);
        let mut partition = vec![0; graph.len()];

        // Act
        Geometric { part_count: 4, seed: Some(5) }
            .partition(&mut partition, &graph)
            .unwrap();

        // Assert
        let sizes = part_sizes(&partition, 4);
        assert_eq!(sizes.iter().sum::<usize>(), 16);
        assert_eq!(sizes, vec![4, 4, 4, 4]);
    }

    #[test]
    fn test_geometric_is_reproducible_under_a_seed() {
        // Arrange
        let mut rng = rng_from_seed(Some(11));
        let adjacency = random_adjacency(10, 3, &mut rng);
        let weights = random_weights(&adjacency, 1.0, 3.0, &mut rng).unwrap();
        let graph = Graph::from_dense(weights).unwrap();

        // Act
        let mut first = vec![0; 10];
        Geometric { part_count: 2, seed: Some(42) }
            .partition(&mut first, &graph)
            .unwrap();
        let mut second = vec![0; 10];
        Geometric { part_count: 2, seed: Some(42) }
            .partition(&mut second, &graph)
            .unwrap();

        // Assert
        assert_eq!(first, second);
    }

    #[test]
    fn test_geometric_single_part_returns_everything() {
        let graph = grid_graph(2);
        let mut partition = vec![9; 4];

        Geometric { part_count: 1, seed: Some(5) }
            .partition(&mut partition, &graph)
            .unwrap();

        assert_eq!(partition, vec![0, 0, 0, 0]);
    }
}
