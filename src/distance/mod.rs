pub mod condensed;
pub mod kernels;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::utils::math::check_width;

pub use condensed::{CondensedDistanceMatrix, DistanceMatrix};

/// Caller supplied distance between two vectors of equal length.
pub type DistanceFn = Arc<dyn Fn(&[f64], &[f64]) -> f64 + Send + Sync>;

/// Distance between two feature vectors.
///
/// Named metrics parse from their usual names, case-insensitively and
/// ignoring `-`, `_` and spaces: `"bray-curtis"`, `"BrayCurtis"` and
/// `"braycurtis"` are the same metric.
///
/// # Examples
/// ```
/// use featurize::Metric;
///
/// let m: Metric = "city-block".parse().unwrap();
/// assert_eq!(m.distance(&[1.0, 2.0], &[3.0, 1.0]), 3.0);
///
/// let max_gap = Metric::custom(|u, v| {
///     u.iter().zip(v).map(|(a, b)| (a - b).abs()).fold(0.0, f64::max)
/// });
/// assert_eq!(max_gap.distance(&[1.0, 2.0], &[3.0, 1.0]), 2.0);
/// ```
#[derive(Clone, Default)]
pub enum Metric {
    BrayCurtis,
    Canberra,
    Chebyshev,
    CityBlock,
    Correlation,
    Cosine,
    Dice,
    #[default]
    Euclidean,
    Hamming,
    Jaccard,
    Kulsinski,
    Matching,
    RogersTanimoto,
    RussellRao,
    SokalMichener,
    SokalSneath,
    SqEuclidean,
    Yule,
    Custom(DistanceFn),
}

impl Metric {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&[f64], &[f64]) -> f64 + Send + Sync + 'static,
    {
        Metric::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::BrayCurtis => "braycurtis",
            Metric::Canberra => "canberra",
            Metric::Chebyshev => "chebyshev",
            Metric::CityBlock => "cityblock",
            Metric::Correlation => "correlation",
            Metric::Cosine => "cosine",
            Metric::Dice => "dice",
            Metric::Euclidean => "euclidean",
            Metric::Hamming => "hamming",
            Metric::Jaccard => "jaccard",
            Metric::Kulsinski => "kulsinski",
            Metric::Matching => "matching",
            Metric::RogersTanimoto => "rogerstanimoto",
            Metric::RussellRao => "russellrao",
            Metric::SokalMichener => "sokalmichener",
            Metric::SokalSneath => "sokalsneath",
            Metric::SqEuclidean => "sqeuclidean",
            Metric::Yule => "yule",
            Metric::Custom(_) => "custom",
        }
    }

    /// Distance between `u` and `v`.
    ///
    /// Both slices are expected to have the same length; callers going through
    /// [`pairwise_distance`] and [`cross_distance`] get that checked.
    pub fn distance(&self, u: &[f64], v: &[f64]) -> f64 {
        use kernels::*;
        match self {
            Metric::BrayCurtis => bray_curtis(u, v),
            Metric::Canberra => canberra(u, v),
            Metric::Chebyshev => chebyshev(u, v),
            Metric::CityBlock => city_block(u, v),
            Metric::Correlation => correlation(u, v),
            Metric::Cosine => cosine(u, v),
            Metric::Dice => dice(u, v),
            Metric::Euclidean => euclidean(u, v),
            Metric::Hamming => hamming(u, v),
            Metric::Jaccard => jaccard(u, v),
            Metric::Kulsinski => kulsinski(u, v),
            Metric::Matching => matching(u, v),
            Metric::RogersTanimoto | Metric::SokalMichener => rogers_tanimoto(u, v),
            Metric::RussellRao => russell_rao(u, v),
            Metric::SokalSneath => sokal_sneath(u, v),
            Metric::SqEuclidean => sq_euclidean(u, v),
            Metric::Yule => yule(u, v),
            Metric::Custom(f) => (**f)(u, v),
        }
    }
}

impl fmt::Debug for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Custom(_) => f.write_str("Custom(..)"),
            named => f.write_str(named.name()),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let metric = match key.as_str() {
            "braycurtis" => Metric::BrayCurtis,
            "canberra" => Metric::Canberra,
            "chebyshev" | "chebychev" => Metric::Chebyshev,
            "cityblock" | "manhattan" => Metric::CityBlock,
            "correlation" => Metric::Correlation,
            "cosine" => Metric::Cosine,
            "dice" => Metric::Dice,
            "euclidean" => Metric::Euclidean,
            "hamming" => Metric::Hamming,
            "jaccard" => Metric::Jaccard,
            "kulsinski" | "kulsinki" => Metric::Kulsinski,
            "matching" => Metric::Matching,
            "rogerstanimoto" | "rogerstainimoto" => Metric::RogersTanimoto,
            "russellrao" | "russelrao" => Metric::RussellRao,
            "sokalmichener" => Metric::SokalMichener,
            "sokalsneath" => Metric::SokalSneath,
            "sqeuclidean" | "squaredeuclidean" => Metric::SqEuclidean,
            "yule" => Metric::Yule,
            _ => return Err(Error::invalid(format!("unknown metric `{s}`"))),
        };
        Ok(metric)
    }
}

fn common_width<V: AsRef<[f64]>>(vectors: &[V]) -> Result<Option<usize>> {
    let Some(first) = vectors.first() else {
        return Ok(None);
    };
    let width = first.as_ref().len();
    check_width(vectors, width)?;
    Ok(Some(width))
}

/// Distances between every pair of rows of one collection.
///
/// Rows are computed in parallel.
///
/// # Arguments
/// * `vectors` - rows of equal width
/// * `metric` - distance to apply
///
/// # Returns
/// * `Result<CondensedDistanceMatrix>` - `InconsistentState` for rows of different widths
pub fn pairwise_distance<V>(vectors: &[V], metric: &Metric) -> Result<CondensedDistanceMatrix>
where
    V: AsRef<[f64]> + Sync,
{
    common_width(vectors)?;
    let n = vectors.len();
    let rows: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            let u = vectors[i].as_ref();
            vectors[i + 1..]
                .iter()
                .map(|v| metric.distance(u, v.as_ref()))
                .collect()
        })
        .collect();
    log::debug!("pairwise {} distances over {} vectors", metric, n);
    CondensedDistanceMatrix::new(n, rows.concat())
}

/// Distance of every row of `a` to every row of `b`, as an `a.len() x b.len()` matrix.
///
/// # Returns
/// * `Result<DistanceMatrix>` - `InconsistentState` when any two rows differ in width
pub fn cross_distance<A, B>(a: &[A], b: &[B], metric: &Metric) -> Result<DistanceMatrix>
where
    A: AsRef<[f64]> + Sync,
    B: AsRef<[f64]> + Sync,
{
    if let (Some(wa), Some(wb)) = (common_width(a)?, common_width(b)?) {
        if wa != wb {
            return Err(Error::inconsistent(format!(
                "cannot compare vectors of width {wa} with vectors of width {wb}"
            )));
        }
    }
    let values: Vec<Vec<f64>> = a
        .par_iter()
        .map(|u| {
            b.iter()
                .map(|v| metric.distance(u.as_ref(), v.as_ref()))
                .collect()
        })
        .collect();
    log::debug!("cross {} distances, {}x{}", metric, a.len(), b.len());
    DistanceMatrix::new(a.len(), b.len(), values.concat())
}
