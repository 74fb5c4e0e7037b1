// Spectral bisection: the sign pattern of the Fiedler vector of the graph
// Laplacian separates the two most loosely coupled halves of the graph.
//
// # Reference
//
// Fiedler, Miroslav. "Algebraic connectivity of graphs."
// Czechoslovak Mathematical Journal 23.2 (1973): 298-305.

use crate::algorithms::Error;
use crate::dense;
use crate::graph::Graph;
use crate::Partition;

fn spectral(part_ids: &mut [usize], adjacency: &Graph) -> Result<(), Error> {
    let laplacian = adjacency.laplacian();
    let eigen = dense::symmetric_eigen(&laplacian)?;
    let fiedler = dense::fiedler_vector(&eigen)?;

    // Rounding the Fiedler vector to a balanced sign assignment is a median
    // cut: the lower half of the components takes one part, the upper half
    // the other.
    let assignment = dense::balanced_median_split(fiedler.as_slice());
    part_ids.copy_from_slice(&assignment);
    Ok(())
}

/// Spectral Bi-Partitioner
///
/// Splits a graph into two balanced parts along the sign structure of the
/// Fiedler vector of the unweighted Laplacian.
///
/// # Example
///
/// ```rust
/// use kwaycut::algorithms::Spectral;
/// use kwaycut::graph::Graph;
/// use kwaycut::io::parse_matrix;
/// use kwaycut::Partition;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
///
///     let graph = Graph::from_dense(parse_matrix("{{0,1,0,1},{1,0,1,0},{0,1,0,1},{1,0,1,0}}")?)?;
///     let mut partition = vec![0; graph.len()];
///
///     Spectral.partition(&mut partition, &graph)?;
///
///     let cut = graph.cut_edge_count(&partition);
/// #   assert_eq!(cut, 2);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Spectral;

impl<'a> Partition<&'a Graph> for Spectral {
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
        spectral(part_ids, adjacency)
    }
}
