// Matrix (de)serialization for the nested-brace wire format used at the HTTP
// edge: `{{a,b,c},{d,e,f}}`. Inside the crate matrices are typed values; this
// module is the only place the textual form exists.

use itertools::Itertools;
use nalgebra::DMatrix;
use std::fmt::Display;

use crate::algorithms::Error;

/// Parse a nested-brace matrix. Whitespace and newlines are stripped before
/// parsing; rows are split on the literal `},{` and values parsed as reals.
/// Rows must all have the same length, but the matrix may be rectangular
/// (partition matrices are).
pub fn parse_matrix(text: &str) -> Result<DMatrix<f64>, Error> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let inner = compact
        .strip_prefix("{{")
        .and_then(|rest| rest.strip_suffix("}}"))
        .ok_or_else(|| {
            Error::MalformedMatrix("matrix must be enclosed in nested braces".to_string())
        })?;

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for row_text in inner.split("},{") {
        let row = row_text
            .split(',')
            .map(|value| {
                value.parse::<f64>().map_err(|_| {
                    Error::MalformedMatrix(format!("invalid matrix entry {value:?}"))
                })
            })
            .collect::<Result<Vec<f64>, Error>>()?;
        rows.push(row);
    }

    let cols = rows[0].len();
    if rows.iter().any(|row| row.len() != cols) {
        return Err(Error::MalformedMatrix(
            "matrix rows have unequal lengths".to_string(),
        ));
    }

    Ok(DMatrix::from_row_iterator(
        rows.len(),
        cols,
        rows.into_iter().flatten(),
    ))
}

/// Serialize a dense matrix to the nested-brace form.
pub fn format_matrix(matrix: &DMatrix<f64>) -> String {
    let rows = matrix
        .row_iter()
        .map(|row| row.iter().map(|value| value.to_string()).join(","))
        .join("},{");
    format!("{{{{{rows}}}}}")
}

/// Serialize variable-length rows (e.g. the vertex groups of a partition)
/// without padding.
pub fn format_rows<T: Display>(rows: &[Vec<T>]) -> String {
    let body = rows
        .iter()
        .map(|row| format!("{{{}}}", row.iter().map(|value| value.to_string()).join(",")))
        .join(",");
    format!("{{{body}}}")
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use super::*;

    #[test]
    fn test_parse_matrix_strips_whitespace() {
        let text = "{ {0, 1},\n  {1, 0} }";

        let matrix = parse_matrix(text).unwrap();

        assert_eq!(matrix.shape(), (2, 2));
        assert_abs_diff_eq!(matrix[(0, 1)], 1.0);
        assert_abs_diff_eq!(matrix[(0, 0)], 0.0);
    }

    #[test]
    fn test_parse_matrix_reads_reals() {
        let matrix = parse_matrix("{{0,2.5,-1e-2},{2.5,0,3},{-1e-2,3,0}}").unwrap();
        assert_abs_diff_eq!(matrix[(0, 2)], -0.01);
        assert_abs_diff_eq!(matrix[(1, 2)], 3.0);
    }

    #[test]
    fn test_parse_matrix_rejects_bad_input() {
        assert!(matches!(
            parse_matrix("0,1},{1,0"),
            Err(Error::MalformedMatrix(_))
        ));
        assert!(matches!(
            parse_matrix("{{0,1},{1}}"),
            Err(Error::MalformedMatrix(_))
        ));
        assert!(matches!(
            parse_matrix("{{0,x},{1,0}}"),
            Err(Error::MalformedMatrix(_))
        ));
    }

    #[test]
    fn test_round_trip_from_text() {
        let text = "{{0,1,0},{1,0,2.5},{0,2.5,0}}";
        assert_eq!(format_matrix(&parse_matrix(text).unwrap()), text);
    }

    #[test]
    fn test_round_trip_from_matrix() {
        let matrix = parse_matrix("{{0,0.125,-4},{7,1e3,0.2},{1,2,3}}").unwrap();
        let reparsed = parse_matrix(&format_matrix(&matrix)).unwrap();
        assert_eq!(matrix, reparsed);
    }

    #[test]
    fn test_format_rows_without_padding() {
        let groups = vec![vec![0usize, 2], vec![1], vec![3, 4, 5]];
        assert_eq!(format_rows(&groups), "{{0,2},{1},{3,4,5}}");
    }
}
