// Greedy BFS growth: seed each part at a vertex far away from the previous
// seeds, grow it breadth-first to its target size, then clean the borders up
// with a bounded swap refinement.

use std::collections::VecDeque;

use crate::algorithms::Error;
use crate::graph::Graph;
use crate::Partition;

const UNASSIGNED: usize = usize::MAX;

fn greedy(
    part_ids: &mut [usize],
    adjacency: &Graph,
    part_count: usize,
    refinement_iterations: usize,
) {
    let n = adjacency.len();
    part_ids.fill(UNASSIGNED);

    // Every part gets floor(n/k) vertices; the first n mod k parts one more.
    let targets: Vec<usize> = (0..part_count)
        .map(|part| n / part_count + usize::from(part < n % part_count))
        .collect();

    let mut seeds: Vec<usize> = Vec::with_capacity(part_count);
    for part in 0..part_count {
        let seed = if part == 0 {
            pseudo_peripheral_vertex(adjacency)
        } else {
            farthest_unassigned_vertex(adjacency, &seeds, part_ids)
        };
        seeds.push(seed);
        grow_part(adjacency, part_ids, part, seed, targets[part]);
    }

    // Disconnected leftovers that no BFS or boundary fill could reach go to
    // the smallest part.
    for vertex in 0..n {
        if part_ids[vertex] == UNASSIGNED {
            let smallest = (0..part_count)
                .min_by_key(|&part| part_ids.iter().filter(|&&id| id == part).count())
                .unwrap();
            part_ids[vertex] = smallest;
        }
    }

    improve_partition(adjacency, part_ids, refinement_iterations);
}

// The vertex with the greatest BFS eccentricity over all start candidates.
fn pseudo_peripheral_vertex(adjacency: &Graph) -> usize {
    (0..adjacency.len())
        .max_by_key(|&vertex| {
            bfs_distances(adjacency, &[vertex])
                .into_iter()
                .filter(|&distance| distance != usize::MAX)
                .max()
                .unwrap_or(0)
        })
        .unwrap()
}

// The unassigned vertex farthest from the already chosen seeds; vertices the
// seeds cannot reach at all count as farthest.
fn farthest_unassigned_vertex(adjacency: &Graph, seeds: &[usize], part_ids: &[usize]) -> usize {
    let distances = bfs_distances(adjacency, seeds);
    (0..adjacency.len())
        .filter(|&vertex| part_ids[vertex] == UNASSIGNED)
        .max_by_key(|&vertex| distances[vertex])
        .unwrap()
}

// Multi-source BFS distance from `sources` to every vertex; unreachable
// vertices keep usize::MAX.
fn bfs_distances(adjacency: &Graph, sources: &[usize]) -> Vec<usize> {
    let mut distances = vec![usize::MAX; adjacency.len()];
    let mut queue = VecDeque::new();
    for &source in sources {
        distances[source] = 0;
        queue.push_back(source);
    }
    while let Some(vertex) = queue.pop_front() {
        for (neighbor, _weight) in adjacency.neighbors(vertex) {
            if distances[neighbor] == usize::MAX {
                distances[neighbor] = distances[vertex] + 1;
                queue.push_back(neighbor);
            }
        }
    }
    distances
}

// Breadth-first growth from the seed over unassigned vertices until the part
// reaches its target size. When the frontier dries up early the part is
// topped up with boundary vertices: unassigned neighbors of any assigned
// vertex.
fn grow_part(
    adjacency: &Graph,
    part_ids: &mut [usize],
    part: usize,
    seed: usize,
    target: usize,
) {
    let mut size = 0;
    let mut queue = VecDeque::new();
    if part_ids[seed] == UNASSIGNED {
        part_ids[seed] = part;
        size += 1;
        queue.push_back(seed);
    }

    while size < target {
        if let Some(vertex) = queue.pop_front() {
            for (neighbor, _weight) in adjacency.neighbors(vertex) {
                if part_ids[neighbor] == UNASSIGNED && size < target {
                    part_ids[neighbor] = part;
                    size += 1;
                    queue.push_back(neighbor);
                }
            }
        } else {
            let Some(boundary) = boundary_vertex(adjacency, part_ids) else {
                break;
            };
            part_ids[boundary] = part;
            size += 1;
            queue.push_back(boundary);
        }
    }
}

// Any unassigned neighbor of an already assigned vertex.
fn boundary_vertex(adjacency: &Graph, part_ids: &[usize]) -> Option<usize> {
    for vertex in 0..adjacency.len() {
        if part_ids[vertex] == UNASSIGNED {
            continue;
        }
        for (neighbor, _weight) in adjacency.neighbors(vertex) {
            if part_ids[neighbor] == UNASSIGNED {
                return Some(neighbor);
            }
        }
    }
    None
}

// Bounded greedy refinement: per sweep, apply every cross-part swap that
// strictly lowers the cut measured before the move. Stops early on a sweep
// with no applied swap.
fn improve_partition(adjacency: &Graph, part_ids: &mut [usize], iterations: usize) {
    let n = adjacency.len();
    for _ in 0..iterations {
        let mut improved = false;
        for u in 0..n {
            for v in (u + 1)..n {
                if part_ids[u] == part_ids[v] {
                    continue;
                }
                let before = adjacency.cut_edge_count(part_ids);
                part_ids.swap(u, v);
                if adjacency.cut_edge_count(part_ids) < before {
                    improved = true;
                } else {
                    part_ids.swap(u, v);
                }
            }
        }
        if !improved {
            break;
        }
    }
}

/// Greedy Partitioner
///
/// Grows each part breadth-first from a pseudo-peripheral seed until it
/// reaches its target size, then applies a bounded swap refinement pass over
/// the part borders.
#[derive(Debug, Clone, Copy)]
pub struct Greedy {
    /// Number of parts to produce.
    pub part_count: usize,

    /// Maximum number of refinement sweeps over all cross-part vertex pairs.
    pub refinement_iterations: usize,
}

impl Default for Greedy {
    fn default() -> Self {
        Greedy { part_count: 2, refinement_iterations: 100 }
    }
}

impl<'a> Partition<&'a Graph> for Greedy {
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
        greedy(part_ids, adjacency, self.part_count, self.refinement_iterations);
        Ok(())
    }
}
