// Dense linear-algebra kernel shared by the spectral, inertial and geometric
// partitioners: Laplacian construction, symmetric eigendecomposition and
// Fiedler-vector extraction.

use itertools::Itertools;
use nalgebra::{DMatrix, DVector, SymmetricEigen};

use crate::algorithms::Error;

/// Tolerance under which two matrix entries are considered equal when
/// checking symmetry.
pub const SYMMETRY_TOLERANCE: f64 = 1e-9;

const EIGEN_MAX_ITERATIONS: usize = 10_000;
const EIGEN_CONVERGENCE_EPS: f64 = 1e-12;

/// Eigendecomposition of a symmetric matrix. Eigenvalues are real and kept in
/// the order the solver emits them; `vectors` holds the matching eigenvectors
/// as columns.
pub struct Eigen {
    pub values: DVector<f64>,
    pub vectors: DMatrix<f64>,
}

/// Sum of each row of `matrix`.
pub fn row_sums(matrix: &DMatrix<f64>) -> DVector<f64> {
    DVector::from_iterator(matrix.nrows(), matrix.row_iter().map(|row| row.sum()))
}

/// Diagonal matrix whose entries are the row sums of `matrix` (the degree
/// matrix when `matrix` is an adjacency or weight matrix).
pub fn degree_diagonal(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    DMatrix::from_diagonal(&row_sums(matrix))
}

/// Graph Laplacian L = D - M of a symmetric matrix M.
///
/// Rows and columns of the result sum to zero and the smallest eigenvalue is
/// zero (with the all-ones eigenvector).
pub fn laplacian(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    degree_diagonal(matrix) - matrix
}

/// Eigendecomposition of a symmetric matrix.
///
/// Fails with [`Error::Numerical`] when the matrix is not symmetric within
/// [`SYMMETRY_TOLERANCE`] or when the solver does not converge.
pub fn symmetric_eigen(matrix: &DMatrix<f64>) -> Result<Eigen, Error> {
    let n = matrix.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            if (matrix[(i, j)] - matrix[(j, i)]).abs() > SYMMETRY_TOLERANCE {
                return Err(Error::Numerical(
                    "matrix is not symmetric within tolerance".to_string(),
                ));
            }
        }
    }

    let decomposition =
        SymmetricEigen::try_new(matrix.clone(), EIGEN_CONVERGENCE_EPS, EIGEN_MAX_ITERATIONS)
            .ok_or_else(|| {
                Error::Numerical("eigendecomposition did not converge".to_string())
            })?;

    Ok(Eigen {
        values: decomposition.eigenvalues,
        vectors: decomposition.eigenvectors,
    })
}

/// Index of the eigenvalue whose eigenvector is the Fiedler vector: the
/// smallest eigenvalue distinct from the minimum. Exact duplicates of the
/// minimum are skipped, so a numerically repeated zero eigenvalue (a
/// disconnected graph) still yields a null-space vector.
///
/// Fails with [`Error::Numerical`] when every eigenvalue is equal.
pub fn fiedler_index(values: &DVector<f64>) -> Result<usize, Error> {
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    values
        .iter()
        .enumerate()
        .filter(|(_, &value)| value != min)
        .min_by(|(_, &a), (_, &b)| a.total_cmp(&b))
        .map(|(index, _)| index)
        .ok_or_else(|| Error::Numerical("all eigenvalues are equal".to_string()))
}

/// The Fiedler vector of a Laplacian eigendecomposition.
pub fn fiedler_vector(eigen: &Eigen) -> Result<DVector<f64>, Error> {
    let index = fiedler_index(&eigen.values)?;
    Ok(eigen.vectors.column(index).into_owned())
}

/// Column indices of the 2nd- and 3rd-smallest eigenvalues, skipping the zero
/// eigenvector. Used by the geometric partitioner to embed vertices in the
/// plane.
pub fn embedding_columns(eigen: &Eigen) -> Result<(usize, usize), Error> {
    let order = (0..eigen.values.len())
        .sorted_by(|&a, &b| eigen.values[a].total_cmp(&eigen.values[b]))
        .collect::<Vec<_>>();

    let min = eigen.values[order[0]];
    let first = order
        .iter()
        .position(|&index| eigen.values[index] != min)
        .ok_or_else(|| Error::Numerical("all eigenvalues are equal".to_string()))?;
    if first + 1 >= order.len() {
        return Err(Error::Numerical(
            "spectrum too small for a 2-D embedding".to_string(),
        ));
    }

    Ok((order[first], order[first + 1]))
}

/// Split values at their upper median: indices whose value is greater than or
/// equal to `sorted[n/2]` go to part 0, the rest to part 1. Ties at the median
/// all land in part 0, so heavily tied inputs may come out uneven.
pub fn median_split(values: &[f64]) -> Vec<usize> {
    let median = upper_median(values);
    values
        .iter()
        .map(|&value| if value >= median { 0 } else { 1 })
        .collect()
}

/// Split values at their median with an exactly balanced outcome: the n/2
/// smallest values go to part 1 and the rest to part 0, ties broken by index.
/// Part 0 gets the extra vertex when n is odd.
pub fn balanced_median_split(values: &[f64]) -> Vec<usize> {
    let order = (0..values.len())
        .sorted_by(|&a, &b| values[a].total_cmp(&values[b]))
        .collect::<Vec<_>>();
    let mut parts = vec![0; values.len()];
    for &index in &order[..values.len() / 2] {
        parts[index] = 1;
    }
    parts
}

/// The upper median of a non-empty slice: `sorted[n/2]`.
pub fn upper_median(values: &[f64]) -> f64 {
    debug_assert!(!values.is_empty());
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted[sorted.len() / 2]
}
