// This file has code from https://github.com/LIHPC-Computational-Geometry/coupe
use std::fmt;

mod brute_force;
mod geometric;
mod greedy;
mod inertial;
mod kernighan_lin;
mod logical;
mod spectral;

pub use brute_force::{BruteForce, BruteForceWeighted};
pub use geometric::Geometric;
pub use greedy::Greedy;
pub use inertial::Inertial;
pub use kernighan_lin::KernighanLin;
pub use logical::LogicalProgramming;
pub use spectral::Spectral;

use crate::graph::{check_weight_support, Graph};
use crate::Partition as _;

/// Common errors thrown by algorithms.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input sets don't have matching lengths.
    InputLenMismatch { expected: usize, actual: usize },

    /// A matrix that must be square is not.
    NotSquare { rows: usize, cols: usize },

    /// An adjacency or weight matrix is not symmetric within tolerance.
    NotSymmetric,

    /// Input contains negative values and such values are not supported.
    NegativeValues,

    /// A weight matrix carries a weight on a vertex pair with no adjacency
    /// edge.
    WeightWithoutEdge { vertex: usize, neighbor: usize },

    /// The requested number of parts is zero or exceeds the vertex count.
    InvalidPartCount { part_count: usize, vertex_count: usize },

    /// When a bi-partitioning algorithm is given other than 2 parts.
    BiPartitioningOnly,

    /// A weight range with max below min, or a non-positive lower bound.
    InvalidWeightRange { min: f64, max: f64 },

    /// Serialized matrix text that does not follow the brace format.
    MalformedMatrix(String),

    /// The algorithm needs an edge-weight matrix and none was supplied.
    WeightsRequired,

    /// An external solver binary could not be started.
    SolverUnavailable(String),

    /// The solver ran but found no (optimal) assignment.
    NoSolution,

    /// Solver output did not match the expected answer structure.
    SolverOutputMalformed(String),

    /// Eigendecomposition failure or an input outside numerical tolerances.
    Numerical(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputLenMismatch { expected, actual } => write!(
                f,
                "input sets don't have the same length (expected {expected} items, got {actual})",
            ),
            Error::NotSquare { rows, cols } => {
                write!(f, "matrix is not square ({rows}x{cols})")
            }
            Error::NotSymmetric => write!(f, "matrix is not symmetric"),
            Error::NegativeValues => write!(f, "input contains negative values"),
            Error::WeightWithoutEdge { vertex, neighbor } => write!(
                f,
                "weight on vertex pair ({vertex}, {neighbor}) without an adjacency edge",
            ),
            Error::InvalidPartCount { part_count, vertex_count } => write!(
                f,
                "cannot split {vertex_count} vertices into {part_count} parts",
            ),
            Error::BiPartitioningOnly => write!(f, "expected exactly two parts"),
            Error::InvalidWeightRange { min, max } => {
                write!(f, "invalid weight range [{min}, {max}]")
            }
            Error::MalformedMatrix(detail) => write!(f, "malformed matrix: {detail}"),
            Error::WeightsRequired => write!(f, "a weight matrix is required"),
            Error::SolverUnavailable(detail) => write!(f, "solver unavailable: {detail}"),
            Error::NoSolution => write!(f, "no solution found"),
            Error::SolverOutputMalformed(detail) => {
                write!(f, "solver output malformed: {detail}")
            }
            Error::Numerical(detail) => write!(f, "numerical failure: {detail}"),
        }
    }
}

impl std::error::Error for Error {}

/// The partitioning methods the crate ships, keyed by name.
///
/// Every method resolves to a value implementing [`crate::Partition`]; this
/// registry gives callers (the HTTP facade in particular) a uniform way to
/// pick one by name and run it against the same `(adjacency, weights, k)`
/// surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Spectral,
    Inertial,
    Geometric,
    KernighanLin,
    Greedy,
    BruteForce,
    BruteForceWeighted,
    LogicalProgramming,
    LogicalProgrammingWeighted,
}

impl Method {
    /// Look a method up by its public name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "spectralAlgorithm" => Some(Method::Spectral),
            "inertialAlgorithm" => Some(Method::Inertial),
            "geometricAlgorithm" => Some(Method::Geometric),
            "kernighanLin" => Some(Method::KernighanLin),
            "greedyAlgorithm" => Some(Method::Greedy),
            "bruteForce" => Some(Method::BruteForce),
            "bruteForceWeighted" => Some(Method::BruteForceWeighted),
            "logicalProgramming" => Some(Method::LogicalProgramming),
            "logicalProgrammingWeighted" => Some(Method::LogicalProgrammingWeighted),
            _ => None,
        }
    }

    /// Run the method over an adjacency graph and optional weight graph,
    /// producing the part id of each vertex.
    pub fn run(
        self,
        adjacency: &Graph,
        weights: Option<&Graph>,
        part_count: usize,
        seed: Option<u64>,
    ) -> Result<Vec<usize>, Error> {
        let vertex_count = adjacency.len();
        if part_count == 0 || part_count > vertex_count {
            return Err(Error::InvalidPartCount { part_count, vertex_count });
        }
        if let Some(weights) = weights {
            check_weight_support(adjacency, weights)?;
        }
        let weighted = || weights.ok_or(Error::WeightsRequired);

        let mut part_ids = vec![0; vertex_count];
        match self {
            Method::Spectral => {
                if part_count != 2 {
                    return Err(Error::BiPartitioningOnly);
                }
                Spectral.partition(&mut part_ids, adjacency)?;
            }
            Method::Inertial => {
                if part_count != 2 {
                    return Err(Error::BiPartitioningOnly);
                }
                Inertial.partition(&mut part_ids, weighted()?)?;
            }
            Method::Geometric => {
                Geometric { part_count, seed }.partition(&mut part_ids, weighted()?)?;
            }
            Method::KernighanLin => {
                KernighanLin { part_count, seed }.partition(&mut part_ids, adjacency)?;
            }
            Method::Greedy => {
                Greedy { part_count, ..Default::default() }
                    .partition(&mut part_ids, adjacency)?;
            }
            Method::BruteForce => {
                BruteForce { part_count }.partition(&mut part_ids, adjacency)?;
            }
            Method::BruteForceWeighted => {
                BruteForceWeighted { part_count }.partition(&mut part_ids, weighted()?)?;
            }
            Method::LogicalProgramming => {
                LogicalProgramming { part_count, ..Default::default() }
                    .partition(&mut part_ids, adjacency)?;
            }
            Method::LogicalProgrammingWeighted => {
                LogicalProgramming { part_count, weighted: true, ..Default::default() }
                    .partition(&mut part_ids, weighted()?)?;
            }
        }
        Ok(part_ids)
    }
}
