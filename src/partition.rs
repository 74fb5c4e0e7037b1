// Conversions between the per-vertex part-id array the algorithms write and
// the ordered vertex-group view exposed at the output edge.

use crate::imbalance::compute_parts_load;

/// Collect the vertices of each part, in vertex order, from a part-id array.
/// Parts that received no vertex come back as empty groups.
pub fn groups_from_ids(part_ids: &[usize], part_count: usize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); part_count];
    for (vertex, &part) in part_ids.iter().enumerate() {
        if part < part_count {
            groups[part].push(vertex);
        }
    }
    groups
}

/// The number of vertices in each part.
pub fn part_sizes(part_ids: &[usize], part_count: usize) -> Vec<usize> {
    compute_parts_load(part_ids, part_count, std::iter::repeat(1usize).take(part_ids.len()))
}

/// Whether part sizes differ by at most one vertex.
pub fn is_balanced(part_ids: &[usize], part_count: usize) -> bool {
    let sizes = part_sizes(part_ids, part_count);
    let max = sizes.iter().copied().max().unwrap_or(0);
    let min = sizes.iter().copied().min().unwrap_or(0);
    max - min <= 1
}

/// Encode groups as a rectangular (part_count x max group size) matrix, padded
/// with -1 where a group is shorter than the longest. The result serializes
/// with the same brace format as adjacency matrices.
pub fn partition_matrix(groups: &[Vec<usize>]) -> Vec<Vec<i64>> {
    let width = groups.iter().map(Vec::len).max().unwrap_or(0);
    groups
        .iter()
        .map(|group| {
            let mut row: Vec<i64> = group.iter().map(|&vertex| vertex as i64).collect();
            row.resize(width, -1);
            row
        })
        .collect()
}
