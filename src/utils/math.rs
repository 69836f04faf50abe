use num::Num;

use crate::error::{Error, Result};

/// Column-wise sum of a vector collection.
///
/// # Arguments
/// * `vectors` - rows of equal length
/// * `width` - row length, used when there are no rows
///
/// # Returns
/// * `Vec<f64>` - one total per column
pub fn column_totals<N, V>(vectors: &[V], width: usize) -> Vec<f64>
where
    N: Num + Copy + Into<f64>,
    V: AsRef<[N]>,
{
    let mut totals = vec![0.0; width];
    for row in vectors {
        for (t, &v) in totals.iter_mut().zip(row.as_ref()) {
            *t += v.into();
        }
    }
    totals
}

/// Fraction of rows in which each column is nonzero.
///
/// ```text
/// [1, 0,   0]
/// [4, 11,  0]   ->  [1.0, 0.666.., 0.0]
/// [7, 100, 0]
/// ```
pub fn proportions<N, V>(vectors: &[V], width: usize) -> Vec<f64>
where
    N: Num + Copy,
    V: AsRef<[N]>,
{
    let mut present = vec![0usize; width];
    for row in vectors {
        for (p, v) in present.iter_mut().zip(row.as_ref()) {
            if !v.is_zero() {
                *p += 1;
            }
        }
    }
    if vectors.is_empty() {
        return vec![0.0; width];
    }
    let rows = vectors.len() as f64;
    present.into_iter().map(|p| p as f64 / rows).collect()
}

/// Check that every row has `width` columns.
pub(crate) fn check_width<N, V>(vectors: &[V], width: usize) -> Result<()>
where
    V: AsRef<[N]>,
{
    match vectors.iter().position(|row| row.as_ref().len() != width) {
        Some(i) => Err(Error::inconsistent(format!(
            "row {i} has {} columns, expected {width}",
            vectors[i].as_ref().len()
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_per_column() {
        let rows = vec![vec![1u32, 0, 2], vec![3, 5, 0]];
        assert_eq!(column_totals(&rows, 3), vec![4.0, 5.0, 2.0]);
        assert_eq!(column_totals::<f64, Vec<f64>>(&[], 2), vec![0.0, 0.0]);
    }

    #[test]
    fn proportions_count_presence() {
        let rows = vec![
            vec![1.0, 0.0, 0.0],
            vec![4.0, 11.0, 0.0],
            vec![7.0, 100.0, 0.0],
        ];
        let p = proportions(&rows, 3);
        assert_eq!(p[0], 1.0);
        assert!((p[1] - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(p[2], 0.0);
    }

    #[test]
    fn ragged_rows_are_inconsistent() {
        let rows = vec![vec![1.0, 2.0], vec![1.0]];
        assert!(check_width(&rows, 2).is_err());
        assert!(check_width(&rows[..1], 2).is_ok());
    }
}
