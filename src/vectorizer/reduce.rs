use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::utils::math::{check_width, column_totals, proportions};

/// Column filter thresholds. Every bound is inclusive and optional.
///
/// - `minocc` / `maxocc` bound the column total over all vectors
/// - `minfreq` / `maxfreq` bound the fraction of vectors where the column is nonzero
///
/// With no bound set, reduction is the identity.
///
/// # Examples
/// ```
/// use featurize::ReduceOptions;
///
/// let opts = ReduceOptions::new().min_occ(2.0).max_freq(0.9);
/// assert!(!opts.is_empty());
///
/// let parsed = ReduceOptions::from_pairs([("minocc", 2.0), ("maxfreq", 0.9)]).unwrap();
/// assert_eq!(opts, parsed);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReduceOptions {
    #[serde(rename = "minocc", skip_serializing_if = "Option::is_none")]
    pub min_occ: Option<f64>,
    #[serde(rename = "maxocc", skip_serializing_if = "Option::is_none")]
    pub max_occ: Option<f64>,
    #[serde(rename = "minfreq", skip_serializing_if = "Option::is_none")]
    pub min_freq: Option<f64>,
    #[serde(rename = "maxfreq", skip_serializing_if = "Option::is_none")]
    pub max_freq: Option<f64>,
}

impl ReduceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_occ(mut self, v: f64) -> Self {
        self.min_occ = Some(v);
        self
    }

    pub fn max_occ(mut self, v: f64) -> Self {
        self.max_occ = Some(v);
        self
    }

    pub fn min_freq(mut self, v: f64) -> Self {
        self.min_freq = Some(v);
        self
    }

    pub fn max_freq(mut self, v: f64) -> Self {
        self.max_freq = Some(v);
        self
    }

    /// Parse named thresholds.
    ///
    /// # Arguments
    /// * `pairs` - `(name, value)` with name one of `minocc`, `maxocc`, `minfreq`, `maxfreq`
    ///
    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` for an unknown name or a NaN value
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut opts = Self::new();
        for (name, value) in pairs {
            let slot = match name.as_ref().to_ascii_lowercase().as_str() {
                "minocc" => &mut opts.min_occ,
                "maxocc" => &mut opts.max_occ,
                "minfreq" => &mut opts.min_freq,
                "maxfreq" => &mut opts.max_freq,
                other => {
                    return Err(Error::invalid(format!("unknown reduction option `{other}`")))
                }
            };
            *slot = Some(value);
        }
        opts.validate()?;
        Ok(opts)
    }

    /// `true` when no bound is set.
    pub fn is_empty(&self) -> bool {
        self.min_occ.is_none()
            && self.max_occ.is_none()
            && self.min_freq.is_none()
            && self.max_freq.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        let bounds = [
            ("minocc", self.min_occ),
            ("maxocc", self.max_occ),
            ("minfreq", self.min_freq),
            ("maxfreq", self.max_freq),
        ];
        for (name, bound) in bounds {
            if bound.is_some_and(f64::is_nan) {
                return Err(Error::invalid(format!("{name} is NaN")));
            }
        }
        Ok(())
    }

    pub(crate) fn needs_totals(&self) -> bool {
        self.min_occ.is_some() || self.max_occ.is_some()
    }

    pub(crate) fn needs_proportions(&self) -> bool {
        self.min_freq.is_some() || self.max_freq.is_some()
    }

    /// Columns passing every set bound, ascending.
    ///
    /// `totals` and `props` may be empty when the matching bounds are unset.
    pub(crate) fn surviving_columns(&self, width: usize, totals: &[f64], props: &[f64]) -> Vec<usize> {
        let within = |v: f64, lo: Option<f64>, hi: Option<f64>| {
            lo.map_or(true, |lo| v >= lo) && hi.map_or(true, |hi| v <= hi)
        };
        (0..width)
            .filter(|&j| !self.needs_totals() || within(totals[j], self.min_occ, self.max_occ))
            .filter(|&j| !self.needs_proportions() || within(props[j], self.min_freq, self.max_freq))
            .collect()
    }
}

/// Surviving original column indices after a reduction.
///
/// Position in the map is the new column index; entries are strictly increasing
/// and below the original width.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(try_from = "ReductionMapRepr")]
pub struct ReductionMap {
    kept: Vec<usize>,
    original_width: usize,
}

#[derive(Deserialize)]
struct ReductionMapRepr {
    kept: Vec<usize>,
    original_width: usize,
}

impl TryFrom<ReductionMapRepr> for ReductionMap {
    type Error = Error;

    fn try_from(repr: ReductionMapRepr) -> Result<Self> {
        ReductionMap::new(repr.kept, repr.original_width)
    }
}

impl ReductionMap {
    /// Keeps every column of a `width` wide space.
    pub fn identity(width: usize) -> Self {
        Self {
            kept: (0..width).collect(),
            original_width: width,
        }
    }

    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` unless `kept` is strictly increasing and below `original_width`
    pub fn new(kept: Vec<usize>, original_width: usize) -> Result<Self> {
        if kept.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::invalid("reduction map must be strictly increasing"));
        }
        if kept.last().is_some_and(|&last| last >= original_width) {
            return Err(Error::invalid(format!(
                "reduction map refers past the original width {original_width}"
            )));
        }
        Ok(Self { kept, original_width })
    }

    /// Width after the reduction.
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    pub fn original_width(&self) -> usize {
        self.original_width
    }

    pub fn kept(&self) -> &[usize] {
        &self.kept
    }

    /// Original column of new column `new`.
    pub fn original(&self, new: usize) -> Option<usize> {
        self.kept.get(new).copied()
    }

    /// New column of original column `original`, `None` if it was removed.
    pub fn new_index_of(&self, original: usize) -> Option<usize> {
        self.kept.binary_search(&original).ok()
    }

    pub fn is_identity(&self) -> bool {
        self.kept.len() == self.original_width
    }

    /// Map of applying `self` and then `later`.
    ///
    /// # Returns
    /// * `Result<ReductionMap>` - `InconsistentState` when `later` was not computed on the output of `self`
    pub fn compose(&self, later: &ReductionMap) -> Result<ReductionMap> {
        if later.original_width != self.len() {
            return Err(Error::inconsistent(format!(
                "cannot compose a reduction to {} columns with one expecting {}",
                self.len(),
                later.original_width
            )));
        }
        Ok(ReductionMap {
            kept: later.kept.iter().map(|&i| self.kept[i]).collect(),
            original_width: self.original_width,
        })
    }

    /// Keep only the surviving columns of `row`.
    ///
    /// # Returns
    /// * `Result<Vec<f64>>` - `InconsistentState` unless `row` has the original width
    pub fn apply_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.original_width {
            return Err(Error::inconsistent(format!(
                "row of width {} for a reduction of {} columns",
                row.len(),
                self.original_width
            )));
        }
        Ok(self.select(row))
    }

    fn select(&self, row: &[f64]) -> Vec<f64> {
        self.kept.iter().map(|&j| row[j]).collect()
    }

    pub(crate) fn apply(&self, vectors: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        check_width(vectors, self.original_width)?;
        Ok(vectors.iter().map(|row| self.select(row)).collect())
    }
}

/// Filter the columns of a vector collection.
///
/// # Arguments
/// * `vectors` - non-empty collection of equal-width rows
/// * `opts` - thresholds
///
/// # Returns
/// * `Result<(Vec<Vec<f64>>, ReductionMap)>` - reduced rows and the map back to the original columns
pub fn delete_features(vectors: &[Vec<f64>], opts: &ReduceOptions) -> Result<(Vec<Vec<f64>>, ReductionMap)> {
    let width = match vectors.first() {
        Some(row) => row.len(),
        None => return Err(Error::invalid("cannot reduce an empty vector collection")),
    };
    check_width(vectors, width)?;
    opts.validate()?;

    if opts.is_empty() {
        return Ok((vectors.to_vec(), ReductionMap::identity(width)));
    }
    let totals = if opts.needs_totals() {
        column_totals(vectors, width)
    } else {
        Vec::new()
    };
    let props = if opts.needs_proportions() {
        proportions(vectors, width)
    } else {
        Vec::new()
    };
    let map = ReductionMap {
        kept: opts.surviving_columns(width, &totals, &props),
        original_width: width,
    };
    log::debug!("reduction keeps {} of {} columns", map.len(), width);
    if map.is_identity() {
        return Ok((vectors.to_vec(), map));
    }
    let reduced = map.apply(vectors)?;
    Ok((reduced, map))
}
