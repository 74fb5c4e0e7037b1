// This file has code from https://github.com/LIHPC-Computational-Geometry/coupe

use nalgebra::DMatrix;
use rayon::iter::IndexedParallelIterator;
use rayon::iter::IntoParallelRefIterator;
use rayon::iter::ParallelIterator as _;
use sprs::{CsMat, TriMat};
use std::iter::{Cloned, Zip};
use std::slice::Iter;

use crate::algorithms::Error;
use crate::dense;

/// An undirected graph, kept both as a validated dense symmetric matrix (the
/// interchange form used by the linear-algebra pipeline) and as a CSR view
/// used by the traversal-heavy algorithms.
pub struct Graph {
    dense: DMatrix<f64>,
    csr: CsMat<f64>,
}

impl Graph {
    /// Build a graph from a dense symmetric matrix.
    ///
    /// The matrix must be square, symmetric within tolerance and free of
    /// negative entries. A positive entry at (i, j) is the weight of the edge
    /// between i and j; zero means no edge.
    pub fn from_dense(matrix: DMatrix<f64>) -> Result<Self, Error> {
        let (rows, cols) = matrix.shape();
        if rows != cols {
            return Err(Error::NotSquare { rows, cols });
        }
        for i in 0..rows {
            for j in 0..cols {
                if matrix[(i, j)] < 0.0 {
                    return Err(Error::NegativeValues);
                }
                if j > i && (matrix[(i, j)] - matrix[(j, i)]).abs() > dense::SYMMETRY_TOLERANCE {
                    return Err(Error::NotSymmetric);
                }
            }
        }

        let mut triplets = TriMat::new((rows, rows));
        for i in 0..rows {
            for j in 0..rows {
                if i != j && matrix[(i, j)] > 0.0 {
                    triplets.add_triplet(i, j, matrix[(i, j)]);
                }
            }
        }

        Ok(Self {
            csr: triplets.to_csr(),
            dense: matrix,
        })
    }

    /// The dense matrix backing this graph.
    pub fn dense(&self) -> &DMatrix<f64> {
        &self.dense
    }

    /// The Laplacian L = D - M of this graph's matrix.
    pub fn laplacian(&self) -> DMatrix<f64> {
        dense::laplacian(&self.dense)
    }

    /// The number of vertices in the graph.
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.csr.rows(), self.csr.cols());
        self.csr.rows()
    }

    /// Whether the graph has no vertices.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// An iterator over the neighbors of the given vertex and the weights of
    /// the connecting edges.
    pub fn neighbors(&self, vertex: usize) -> Zip<Cloned<Iter<'_, usize>>, Cloned<Iter<'_, f64>>> {
        let (indices, data) = self.csr.outer_view(vertex).unwrap().into_raw_storage();
        indices.iter().cloned().zip(data.iter().cloned())
    }

    /// The edge cut of a partition: the total weight of the edges whose
    /// endpoints lie in different parts.
    pub fn edge_cut(&self, partition: &[usize]) -> f64 {
        debug_assert_eq!(self.len(), partition.len());

        let indptr = self.csr.indptr().into_raw_storage();
        let indices = self.csr.indices();
        let data = self.csr.data();
        indptr
            .par_iter()
            .zip(&indptr[1..])
            .enumerate()
            .map(|(vertex, (start, end))| {
                let neighbors = &indices[*start..*end];
                let edge_weights = &data[*start..*end];
                let vertex_part = partition[vertex];
                neighbors
                    .iter()
                    .zip(edge_weights)
                    .take_while(|(neighbor, _edge_weight)| **neighbor < vertex)
                    .filter(|(neighbor, _edge_weight)| vertex_part != partition[**neighbor])
                    .map(|(_neighbor, edge_weight)| *edge_weight)
                    .sum::<f64>()
            })
            .sum()
    }

    /// The number of edges whose endpoints lie in different parts, ignoring
    /// edge weights.
    pub fn cut_edge_count(&self, partition: &[usize]) -> usize {
        debug_assert_eq!(self.len(), partition.len());

        let indptr = self.csr.indptr().into_raw_storage();
        let indices = self.csr.indices();
        indptr
            .par_iter()
            .zip(&indptr[1..])
            .enumerate()
            .map(|(vertex, (start, end))| {
                indices[*start..*end]
                    .iter()
                    .take_while(|neighbor| **neighbor < vertex)
                    .filter(|neighbor| partition[vertex] != partition[**neighbor])
                    .count()
            })
            .sum()
    }

    /// Clone the graph.
    pub fn clone(&self) -> Self {
        Self {
            dense: self.dense.clone(),
            csr: self.csr.clone(),
        }
    }
}

/// Check that every weighted edge is backed by an adjacency edge.
pub fn check_weight_support(adjacency: &Graph, weights: &Graph) -> Result<(), Error> {
    if adjacency.len() != weights.len() {
        return Err(Error::InputLenMismatch {
            expected: adjacency.len(),
            actual: weights.len(),
        });
    }
    for vertex in 0..weights.len() {
        for (neighbor, _weight) in weights.neighbors(vertex) {
            if adjacency.dense[(vertex, neighbor)] == 0.0 {
                return Err(Error::WeightWithoutEdge {
                    vertex,
                    neighbor,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use nalgebra::dmatrix;
    use super::*;

    fn four_cycle() -> Graph {
        Graph::from_dense(dmatrix![
            0.0, 1.0, 0.0, 1.0;
            1.0, 0.0, 1.0, 0.0;
            0.0, 1.0, 0.0, 1.0;
            1.0, 0.0, 1.0, 0.0;
        ])
        .unwrap()
    }

    #[test]
    fn test_from_dense_rejects_rectangular_matrix() {
        let result = Graph::from_dense(DMatrix::zeros(2, 3));
        assert!(matches!(result, Err(Error::NotSquare { rows: 2, cols: 3 })));
    }

    #[test]
    fn test_from_dense_rejects_asymmetric_matrix() {
        let result = Graph::from_dense(dmatrix![
            0.0, 1.0;
            0.0, 0.0;
        ]);
        assert!(matches!(result, Err(Error::NotSymmetric)));
    }

    #[test]
    fn test_from_dense_rejects_negative_weight() {
        let result = Graph::from_dense(dmatrix![
            0.0, -1.0;
            -1.0, 0.0;
        ]);
        assert!(matches!(result, Err(Error::NegativeValues)));
    }

    #[test]
    fn test_neighbors_of_cycle_vertex() {
        let graph = four_cycle();
        let neighbors: Vec<usize> = graph.neighbors(0).map(|(vertex, _)| vertex).collect();
        assert_eq!(neighbors, vec![1, 3]);
    }

    #[test]
    fn test_edge_cut_counts_crossing_weight_once_per_edge() {
        let graph = Graph::from_dense(dmatrix![
            0.0, 2.0, 0.5;
            2.0, 0.0, 1.0;
            0.5, 1.0, 0.0;
        ])
        .unwrap();

        // Vertex 2 alone in part 1 cuts the edges 0-2 and 1-2.
        assert_abs_diff_eq!(graph.edge_cut(&[0, 0, 1]), 1.5);
    }

    #[test]
    fn test_cut_edge_count_on_four_cycle() {
        let graph = four_cycle();
        assert_eq!(graph.cut_edge_count(&[0, 0, 1, 1]), 2);
        assert_eq!(graph.cut_edge_count(&[0, 1, 0, 1]), 4);
        assert_eq!(graph.cut_edge_count(&[0, 0, 0, 0]), 0);
    }

    #[test]
    fn test_edgeless_graph_has_zero_cut() {
        let graph = Graph::from_dense(DMatrix::zeros(4, 4)).unwrap();
        assert_eq!(graph.cut_edge_count(&[0, 1, 0, 1]), 0);
        assert_abs_diff_eq!(graph.edge_cut(&[0, 1, 2, 3]), 0.0);
    }

    #[test]
    fn test_check_weight_support() {
        let adjacency = four_cycle();
        let weights = Graph::from_dense(dmatrix![
            0.0, 3.0, 0.0, 0.0;
            3.0, 0.0, 0.0, 0.0;
            0.0, 0.0, 0.0, 2.5;
            0.0, 0.0, 2.5, 0.0;
        ])
        .unwrap();
        assert!(check_weight_support(&adjacency, &weights).is_ok());

        let chord = Graph::from_dense(dmatrix![
            0.0, 0.0, 1.0, 0.0;
            0.0, 0.0, 0.0, 0.0;
            1.0, 0.0, 0.0, 0.0;
            0.0, 0.0, 0.0, 0.0;
        ])
        .unwrap();
        assert!(matches!(
            check_weight_support(&adjacency, &chord),
            Err(Error::WeightWithoutEdge { vertex: 0, neighbor: 2 })
        ));
    }
}
