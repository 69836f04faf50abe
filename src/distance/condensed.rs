use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

static ZERO: f64 = 0.0;

/// Position of `(i, j)`, `i < j < n`, in the condensed upper triangle.
#[inline]
fn condensed_index(n: usize, i: usize, j: usize) -> usize {
    debug_assert!(i < j && j < n);
    n * i - i * (i + 1) / 2 + (j - i - 1)
}

/// Symmetric `n x n` distance matrix with a zero diagonal, storing only the
/// `n (n - 1) / 2` values above the diagonal in row-major order.
///
/// For `n = 4` the storage order is `(0,1) (0,2) (0,3) (1,2) (1,3) (2,3)`.
///
/// # Examples
/// ```
/// use featurize::CondensedDistanceMatrix;
///
/// let m = CondensedDistanceMatrix::new(3, vec![1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(m.get(0, 2), 2.0);
/// assert_eq!(m.get(2, 1), 3.0);
/// assert_eq!(m.get(1, 1), 0.0);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "CondensedRepr")]
pub struct CondensedDistanceMatrix {
    n: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct CondensedRepr {
    n: usize,
    values: Vec<f64>,
}

impl TryFrom<CondensedRepr> for CondensedDistanceMatrix {
    type Error = Error;

    fn try_from(repr: CondensedRepr) -> Result<Self> {
        CondensedDistanceMatrix::new(repr.n, repr.values)
    }
}

impl CondensedDistanceMatrix {
    /// # Arguments
    /// * `n` - number of observations
    /// * `values` - upper triangle in condensed order
    ///
    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` unless `values.len() == n (n - 1) / 2`
    pub fn new(n: usize, values: Vec<f64>) -> Result<Self> {
        let expected = n * n.saturating_sub(1) / 2;
        if values.len() != expected {
            return Err(Error::invalid(format!(
                "{n} observations need {expected} condensed distances, got {}",
                values.len()
            )));
        }
        Ok(Self { n, values })
    }

    /// Inverse of [`squareform`](Self::squareform).
    ///
    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` when `square` is not square,
    ///   not symmetric or has a nonzero diagonal
    pub fn from_square(square: &DistanceMatrix) -> Result<Self> {
        let n = square.rows();
        if square.cols() != n {
            return Err(Error::invalid(format!(
                "a {}x{} matrix is not square",
                n,
                square.cols()
            )));
        }
        let mut values = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            if square.get(i, i) != 0.0 {
                return Err(Error::invalid(format!("diagonal entry ({i}, {i}) is not zero")));
            }
            for j in i + 1..n {
                let (d, mirror) = (square.get(i, j), square.get(j, i));
                if d != mirror && !(d.is_nan() && mirror.is_nan()) {
                    return Err(Error::invalid(format!("entries ({i}, {j}) and ({j}, {i}) differ")));
                }
                values.push(d);
            }
        }
        Ok(Self { n, values })
    }

    /// Number of observations.
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Condensed values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    /// Distance between observations `i` and `j`.
    ///
    /// # Panics
    /// If `i` or `j` is not below [`size`](Self::size).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self[(i, j)]
    }

    /// Like [`get`](Self::get), `InvalidArgument` when out of range.
    pub fn try_get(&self, i: usize, j: usize) -> Result<f64> {
        if i >= self.n || j >= self.n {
            return Err(Error::invalid(format!(
                "index ({i}, {j}) out of range for {} observations",
                self.n
            )));
        }
        Ok(self[(i, j)])
    }

    /// All distances from observation `i`, diagonal included.
    ///
    /// # Panics
    /// If `i` is not below [`size`](Self::size).
    pub fn row(&self, i: usize) -> impl ExactSizeIterator<Item = f64> + '_ {
        assert!(i < self.n, "row {i} out of range for {} observations", self.n);
        (0..self.n).map(move |j| self[(i, j)])
    }

    /// Dense symmetric form.
    pub fn squareform(&self) -> DistanceMatrix {
        let n = self.n;
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            for j in i + 1..n {
                let d = self.values[condensed_index(n, i, j)];
                values[i * n + j] = d;
                values[j * n + i] = d;
            }
        }
        DistanceMatrix {
            rows: n,
            cols: n,
            values,
        }
    }
}

impl Index<(usize, usize)> for CondensedDistanceMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.n && j < self.n,
            "index ({i}, {j}) out of range for {} observations",
            self.n
        );
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => &ZERO,
            std::cmp::Ordering::Less => &self.values[condensed_index(self.n, i, j)],
            std::cmp::Ordering::Greater => &self.values[condensed_index(self.n, j, i)],
        }
    }
}

/// Dense row-major `rows x cols` distance matrix.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "DistanceRepr")]
pub struct DistanceMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct DistanceRepr {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl TryFrom<DistanceRepr> for DistanceMatrix {
    type Error = Error;

    fn try_from(repr: DistanceRepr) -> Result<Self> {
        DistanceMatrix::new(repr.rows, repr.cols, repr.values)
    }
}

impl DistanceMatrix {
    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` unless `values.len() == rows * cols`
    pub fn new(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != rows * cols {
            return Err(Error::invalid(format!(
                "a {rows}x{cols} matrix needs {} values, got {}",
                rows * cols,
                values.len()
            )));
        }
        Ok(Self { rows, cols, values })
    }

    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` for rows of different lengths
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|r| r.len() != cols) {
            return Err(Error::invalid("matrix rows differ in length"));
        }
        let n = rows.len();
        Ok(Self {
            rows: n,
            cols,
            values: rows.into_iter().flatten().collect(),
        })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// # Panics
    /// If `(i, j)` is out of range.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self[(i, j)]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.cols..(i + 1) * self.cols]
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|i| self.row(i).to_vec()).collect()
    }
}

impl Index<(usize, usize)> for DistanceMatrix {
    type Output = f64;

    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        assert!(
            i < self.rows && j < self.cols,
            "index ({i}, {j}) out of range for a {}x{} matrix",
            self.rows,
            self.cols
        );
        &self.values[i * self.cols + j]
    }
}
