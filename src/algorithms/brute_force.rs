// Exhaustive search over all balanced assignments. Both variants are O(k^n)
// and meant for small instances only; they exist as ground truth for the
// heuristic partitioners.

use crate::algorithms::Error;
use crate::graph::Graph;
use crate::partition::is_balanced;
use crate::Partition;

// Depth-first enumeration: assign each vertex in turn to one of the k parts
// and score complete balanced assignments. Relabelings of the same partition
// are visited separately; the first optimum in enumeration order wins.
fn search_unweighted(
    adjacency: &Graph,
    assignment: &mut Vec<usize>,
    part_count: usize,
    best: &mut Option<(usize, Vec<usize>)>,
) {
    if assignment.len() == adjacency.len() {
        if !is_balanced(assignment, part_count) {
            return;
        }
        let cut = adjacency.cut_edge_count(assignment);
        if best.as_ref().map_or(true, |(best_cut, _)| cut < *best_cut) {
            *best = Some((cut, assignment.clone()));
        }
        return;
    }
    for part in 0..part_count {
        assignment.push(part);
        search_unweighted(adjacency, assignment, part_count, best);
        assignment.pop();
    }
}

// The weighted flavor walks the same space with a base-k odometer instead of
// recursion.
fn search_weighted(weights: &Graph, part_count: usize) -> (f64, Vec<usize>) {
    let n = weights.len();
    let mut assignment = vec![0usize; n];
    let mut best_cut = f64::INFINITY;
    let mut best = assignment.clone();

    'enumerate: loop {
        if is_balanced(&assignment, part_count) {
            let cut = weights.edge_cut(&assignment);
            if cut < best_cut {
                best_cut = cut;
                best.copy_from_slice(&assignment);
            }
        }

        let mut position = 0;
        loop {
            assignment[position] += 1;
            if assignment[position] < part_count {
                break;
            }
            assignment[position] = 0;
            position += 1;
            if position == n {
                break 'enumerate;
            }
        }
    }

    (best_cut, best)
}

/// Brute Force Partitioner
///
/// Enumerates every balanced assignment of vertices to parts and returns one
/// minimizing the number of cut edges. Exponential in the vertex count.
#[derive(Debug, Clone, Copy)]
pub struct BruteForce {
    /// Number of parts to produce.
    pub part_count: usize,
}

impl Default for BruteForce {
    fn default() -> Self {
        BruteForce { part_count: 2 }
    }
}

impl<'a> Partition<&'a Graph> for BruteForce {
    type Metadata = ();
    type Error = Error;

    fn partition(
        &mut self,
        part_ids: &mut [usize],
        adjacency: &'a Graph,
    ) -> Result<Self::Metadata, Self::Error> {
        if part_ids.len() != adjacency.len() {
            return Err(Error::InputLenMismatch {
                expected: part_ids.len(),
                actual: adjacency.len(),
            });
        }
        if self.part_count == 0 || self.part_count > adjacency.len() {
            return Err(Error::InvalidPartCount {
                part_count: self.part_count,
                vertex_count: adjacency.len(),
            });
        }

        let mut assignment = Vec::with_capacity(adjacency.len());
        let mut best = None;
        search_unweighted(adjacency, &mut assignment, self.part_count, &mut best);
        let (_cut, ids) = best.ok_or(Error::NoSolution)?;
        part_ids.copy_from_slice(&ids);
        Ok(())
    }
}

/// Brute Force Partitioner over edge weights
///
/// Same exhaustive search as [`BruteForce`], but scoring assignments by the
/// total weight of the cut edges.
#[derive(Debug, Clone, Copy)]
pub struct BruteForceWeighted {
    /// Number of parts to produce.
    pub part_count: usize,
}

impl Default for BruteForceWeighted {
    fn default() -> Self {
        BruteForceWeighted { part_count: 2 }
    }
}

impl<'a> Partition<&'a Graph> for BruteForceWeighted {
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

        let (cut, ids) = search_weighted(weights, self.part_count);
        if cut.is_infinite() {
            return Err(Error::NoSolution);
        }
        part_ids.copy_from_slice(&ids);
        Ok(())
    }
}
