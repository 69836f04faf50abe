use std::hash::Hash;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::distance::{self, CondensedDistanceMatrix, DistanceMatrix, Metric};
use crate::error::{Error, Result};
use crate::utils::math::{check_width, column_totals, proportions};
use crate::vectorizer::index::FeatureIndex;
use crate::vectorizer::normalize::{column_factors, scale_columns, NormalizeStrategy, ZeroTotalPolicy};
use crate::vectorizer::reduce::{ReduceOptions, ReductionMap};
use crate::vectorizer::stream::Stream;

/// What happens to freshly built vectors.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(default)]
pub struct FeatureOptions {
    /// Column filter applied before normalization.
    pub reduce: ReduceOptions,
    pub normalize: NormalizeStrategy,
    pub zero_total: ZeroTotalPolicy,
}

impl FeatureOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reduce(mut self, reduce: ReduceOptions) -> Self {
        self.reduce = reduce;
        self
    }

    pub fn with_normalize(mut self, normalize: NormalizeStrategy) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_zero_total(mut self, policy: ZeroTotalPolicy) -> Self {
        self.zero_total = policy;
        self
    }

    /// Counts as they are: no reduction, no normalization.
    pub fn raw() -> Self {
        Self::default().with_normalize(NormalizeStrategy::None)
    }
}

/// Column aggregate computed on first read and dropped by every mutation.
#[derive(Debug, Clone, Default)]
struct Aggregate(OnceLock<Vec<f64>>);

impl Aggregate {
    fn get_or_compute(&self, f: impl FnOnce() -> Vec<f64>) -> &[f64] {
        self.0.get_or_init(f)
    }

    #[cfg(test)]
    fn is_valid(&self) -> bool {
        self.0.get().is_some()
    }

    fn invalidate(&mut self) {
        self.0 = OnceLock::new();
    }
}

/// Dense feature vectors of a stream collection, with the index naming their columns.
///
/// Column totals and nonzero proportions are cached. Reduction and
/// normalization invalidate the cache and readers recompute it.
///
/// # Examples
/// ```
/// use featurize::{FeatureOptions, FeatureSet, Metric, Stream};
///
/// let a: Stream<String> = Stream::from_tokens(["a", "b"]);
/// let b: Stream<String> = Stream::from_tokens(["a", "c"]);
/// let set = FeatureSet::from_streams(&[a, b], &FeatureOptions::raw()).unwrap();
///
/// assert_eq!(set.width(), 3);
/// let d = set.dist(0, 1, &Metric::Cosine).unwrap();
/// assert!((d - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct FeatureSet<T>
where
    T: Hash + Eq,
{
    index: FeatureIndex<T>,
    vectors: Vec<Vec<f64>>,
    refs: Vec<usize>,
    normalized: Option<NormalizeStrategy>,
    total: Aggregate,
    proportions: Aggregate,
}

impl<T> FeatureSet<T>
where
    T: Hash + Eq,
{
    /// Index the streams, build one vector per stream and apply `opts`.
    ///
    /// # Arguments
    /// * `streams` - non-empty stream collection
    /// * `opts` - reduction and normalization to apply
    ///
    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` for an empty collection,
    ///   `DivisionUndefined` from normalization
    pub fn from_streams(streams: &[Stream<T>], opts: &FeatureOptions) -> Result<Self>
    where
        T: Clone,
    {
        let mut set = Self::raw(streams)?;
        set.reduce(&opts.reduce)?;
        set.normalize(opts.normalize, opts.zero_total)?;
        Ok(set)
    }

    /// Count vectors without any processing.
    pub fn raw(streams: &[Stream<T>]) -> Result<Self>
    where
        T: Clone,
    {
        if streams.is_empty() {
            return Err(Error::invalid("cannot build features of an empty stream collection"));
        }
        let total: Stream<T> = streams.iter().sum();
        let index = FeatureIndex::from_total(&total);
        let width = index.len();
        let vectors = streams
            .iter()
            .map(|stream| {
                let mut row = vec![0.0; width];
                for (token, count) in stream.iter() {
                    if let Some(j) = index.get(token) {
                        row[j] = count as f64;
                    }
                }
                row
            })
            .collect();
        log::debug!("indexed {} features over {} streams", width, streams.len());
        Ok(FeatureSet {
            index,
            vectors,
            refs: (0..streams.len()).collect(),
            normalized: None,
            total: Aggregate::default(),
            proportions: Aggregate::default(),
        })
    }

    /// Assemble from parts built elsewhere, e.g. with a stored index.
    ///
    /// # Returns
    /// * `Result<Self>` - `InconsistentState` when a row width disagrees with the index
    ///   or `refs` has another length than `vectors`
    pub fn from_parts(index: FeatureIndex<T>, vectors: Vec<Vec<f64>>, refs: Vec<usize>) -> Result<Self> {
        let set = FeatureSet {
            index,
            vectors,
            refs,
            normalized: None,
            total: Aggregate::default(),
            proportions: Aggregate::default(),
        };
        set.check_consistency()?;
        Ok(set)
    }

    pub fn check_consistency(&self) -> Result<()> {
        check_width(&self.vectors, self.index.len())?;
        if self.refs.len() != self.vectors.len() {
            return Err(Error::inconsistent(format!(
                "{} refs for {} vectors",
                self.refs.len(),
                self.vectors.len()
            )));
        }
        Ok(())
    }

    /// Number of vectors.
    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Number of columns.
    #[inline]
    pub fn width(&self) -> usize {
        self.index.len()
    }

    pub fn index(&self) -> &FeatureIndex<T> {
        &self.index
    }

    pub fn vectors(&self) -> &[Vec<f64>] {
        &self.vectors
    }

    pub fn get(&self, i: usize) -> Option<&[f64]> {
        self.vectors.get(i).map(Vec::as_slice)
    }

    /// Position of each vector's source stream in the collection it was built from.
    pub fn refs(&self) -> &[usize] {
        &self.refs
    }

    /// Strategy last applied, `None` while the vectors hold counts.
    pub fn normalized(&self) -> Option<NormalizeStrategy> {
        self.normalized
    }

    /// Sum of every column.
    pub fn total(&self) -> &[f64] {
        self.total
            .get_or_compute(|| column_totals(&self.vectors, self.index.len()))
    }

    /// Fraction of vectors in which each column is nonzero.
    pub fn proportions(&self) -> &[f64] {
        self.proportions
            .get_or_compute(|| proportions(&self.vectors, self.index.len()))
    }

    fn invalidate(&mut self) {
        self.total.invalidate();
        self.proportions.invalidate();
    }

    /// Drop the columns failing `opts` and keep the index in step.
    ///
    /// # Returns
    /// * `Result<ReductionMap>` - map from the new columns to the previous ones
    pub fn reduce(&mut self, opts: &ReduceOptions) -> Result<ReductionMap>
    where
        T: Clone,
    {
        opts.validate()?;
        let width = self.width();
        if opts.is_empty() {
            return Ok(ReductionMap::identity(width));
        }
        let totals: &[f64] = if opts.needs_totals() { self.total() } else { &[] };
        let props: &[f64] = if opts.needs_proportions() { self.proportions() } else { &[] };
        let kept = opts.surviving_columns(width, totals, props);
        let map = ReductionMap::new(kept, width)?;
        log::debug!("reduction keeps {} of {} columns", map.len(), width);
        if map.is_identity() {
            return Ok(map);
        }
        let vectors = map.apply(&self.vectors)?;
        let index = self.index.remap(&map)?;
        self.vectors = vectors;
        self.index = index;
        self.invalidate();
        Ok(map)
    }

    /// Rescale the vectors.
    ///
    /// `NormalizeStrategy::None` changes nothing. A set is normalized at most
    /// once; a second call fails with `InconsistentState`, use
    /// [`renormalize`](Self::renormalize) to rescale again on purpose.
    pub fn normalize(&mut self, strategy: NormalizeStrategy, policy: ZeroTotalPolicy) -> Result<()> {
        if strategy == NormalizeStrategy::None {
            return Ok(());
        }
        if let Some(done) = self.normalized {
            return Err(Error::inconsistent(format!(
                "vectors are already normalized with {done}"
            )));
        }
        self.renormalize(strategy, policy)
    }

    /// Rescale the current values, normalized or not.
    pub fn renormalize(&mut self, strategy: NormalizeStrategy, policy: ZeroTotalPolicy) -> Result<()> {
        let factors = column_factors(strategy, policy, || self.total().to_vec(), || self.proportions().to_vec())?;
        let Some(factors) = factors else {
            return Ok(());
        };
        scale_columns(&mut self.vectors, &factors);
        self.normalized = Some(strategy);
        self.invalidate();
        log::debug!("normalized {} vectors with {}", self.len(), strategy);
        Ok(())
    }

    fn row(&self, i: usize) -> Result<&[f64]> {
        self.get(i).ok_or_else(|| {
            Error::invalid(format!("vector {i} out of range for {} vectors", self.len()))
        })
    }

    fn rows(&self, indices: &[usize]) -> Result<Vec<&[f64]>> {
        indices.iter().map(|&i| self.row(i)).collect()
    }

    /// Distance between vectors `i` and `j`.
    pub fn dist(&self, i: usize, j: usize, metric: &Metric) -> Result<f64> {
        Ok(metric.distance(self.row(i)?, self.row(j)?))
    }

    /// Pairwise distances among the vectors at `indices`, or among all vectors for `None`.
    ///
    /// Observation `k` of the result is `indices[k]`.
    pub fn pdist(&self, indices: Option<&[usize]>, metric: &Metric) -> Result<CondensedDistanceMatrix> {
        match indices {
            None => distance::pairwise_distance(&self.vectors, metric),
            Some(indices) => distance::pairwise_distance(&self.rows(indices)?, metric),
        }
    }

    /// Distance of every vector at `a` to every vector at `b`.
    pub fn cdist(&self, a: &[usize], b: &[usize], metric: &Metric) -> Result<DistanceMatrix> {
        distance::cross_distance(&self.rows(a)?, &self.rows(b)?, metric)
    }

    /// New set holding the vectors at `indices`, in that order.
    ///
    /// The index, refs and normalization state carry over.
    pub fn select(&self, indices: &[usize]) -> Result<Self>
    where
        T: Clone,
    {
        let vectors = self.rows(indices)?.into_iter().map(<[f64]>::to_vec).collect();
        Ok(FeatureSet {
            index: self.index.clone(),
            vectors,
            refs: indices.iter().map(|&i| self.refs[i]).collect(),
            normalized: self.normalized,
            total: Aggregate::default(),
            proportions: Aggregate::default(),
        })
    }

    pub fn into_parts(self) -> (FeatureIndex<T>, Vec<Vec<f64>>) {
        (self.index, self.vectors)
    }
}
