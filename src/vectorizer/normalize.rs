use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::math::{check_width, column_totals, proportions};

/// How columns are rescaled.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NormalizeStrategy {
    /// Leave the counts as they are.
    #[serde(rename = "none")]
    None,
    /// Divide every column by its total, so each column sums to 1.
    #[default]
    #[serde(rename = "simple")]
    Simple,
    /// Multiply column `j` by `ln(1 / prop[j])`, `prop[j]` being the
    /// fraction of vectors where the column is nonzero.
    #[serde(rename = "tf-idf", alias = "tfidf")]
    TfIdf,
    /// Multiply column `j` by `1 / prop[j]`.
    #[serde(rename = "tf-idf-nolog", alias = "tfidf-nolog")]
    TfIdfNoLog,
}

impl NormalizeStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            NormalizeStrategy::None => "none",
            NormalizeStrategy::Simple => "simple",
            NormalizeStrategy::TfIdf => "tf-idf",
            NormalizeStrategy::TfIdfNoLog => "tf-idf-nolog",
        }
    }
}

impl fmt::Display for NormalizeStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Case-insensitive; `-` and `_` are ignored, so `TF_IDF` and `tfidf` both work.
impl FromStr for NormalizeStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "none" => Ok(NormalizeStrategy::None),
            "simple" => Ok(NormalizeStrategy::Simple),
            "tfidf" => Ok(NormalizeStrategy::TfIdf),
            "tfidfnolog" => Ok(NormalizeStrategy::TfIdfNoLog),
            _ => Err(Error::invalid(format!("unknown normalization strategy `{s}`"))),
        }
    }
}

/// What to do with a column whose divisor is zero.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ZeroTotalPolicy {
    /// Fail with `DivisionUndefined`.
    #[default]
    Error,
    /// Set the column to 0 and log a warning.
    Zero,
}

/// Per-column multipliers, `None` when the strategy leaves vectors untouched.
///
/// Only the aggregate the strategy needs is read: `totals` for `Simple`,
/// `props` for the tf-idf variants.
pub(crate) fn column_factors(
    strategy: NormalizeStrategy,
    policy: ZeroTotalPolicy,
    totals: impl FnOnce() -> Vec<f64>,
    props: impl FnOnce() -> Vec<f64>,
) -> Result<Option<Vec<f64>>> {
    let (divisors, what) = match strategy {
        NormalizeStrategy::None => return Ok(None),
        NormalizeStrategy::Simple => (totals(), "total"),
        NormalizeStrategy::TfIdf | NormalizeStrategy::TfIdfNoLog => (props(), "proportion"),
    };
    let mut factors = Vec::with_capacity(divisors.len());
    for (column, d) in divisors.into_iter().enumerate() {
        if d == 0.0 {
            match policy {
                ZeroTotalPolicy::Error => return Err(Error::DivisionUndefined { column, what }),
                ZeroTotalPolicy::Zero => {
                    log::warn!("column {column} has a zero {what}, zeroing it");
                    factors.push(0.0);
                    continue;
                }
            }
        }
        let inverse = 1.0 / d;
        factors.push(match strategy {
            NormalizeStrategy::TfIdf => inverse.ln(),
            _ => inverse,
        });
    }
    Ok(Some(factors))
}

pub(crate) fn scale_columns(vectors: &mut [Vec<f64>], factors: &[f64]) {
    for row in vectors.iter_mut() {
        for (v, f) in row.iter_mut().zip(factors) {
            *v *= f;
        }
    }
}

/// Rescale a vector collection in place.
///
/// Nothing is modified when an error is returned.
///
/// # Arguments
/// * `vectors` - rows of equal width
/// * `strategy` - rescaling to apply
/// * `policy` - handling of zero divisors
///
/// # Examples
/// ```
/// use featurize::{normalize, NormalizeStrategy, ZeroTotalPolicy};
///
/// let mut rows = vec![vec![1.0, 2.0], vec![3.0, 2.0]];
/// normalize(&mut rows, NormalizeStrategy::Simple, ZeroTotalPolicy::Error).unwrap();
/// assert_eq!(rows, vec![vec![0.25, 0.5], vec![0.75, 0.5]]);
/// ```
pub fn normalize(vectors: &mut [Vec<f64>], strategy: NormalizeStrategy, policy: ZeroTotalPolicy) -> Result<()> {
    let width = vectors.first().map_or(0, Vec::len);
    let rows: &[Vec<f64>] = vectors;
    check_width(rows, width)?;
    let factors = column_factors(
        strategy,
        policy,
        || column_totals(rows, width),
        || proportions(rows, width),
    )?;
    if let Some(factors) = factors {
        scale_columns(vectors, &factors);
        log::debug!("normalized {} vectors with {}", vectors.len(), strategy);
    }
    Ok(())
}
