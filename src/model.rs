//! Seams for the models that consume feature vectors.
//!
//! The crate ships no learning algorithm. A classifier or clusterer from
//! another crate is plugged in by implementing these traits over the dense
//! vectors and condensed distances produced here.

use std::hash::Hash;

use crate::distance::CondensedDistanceMatrix;
use crate::error::{Error, Result};
use crate::vectorizer::FeatureSet;

/// Supervised model: learn from labelled vectors, then label new ones.
pub trait Classifier {
    type Model;
    type Label;

    fn fit(&self, vectors: &[Vec<f64>], labels: &[Self::Label]) -> Result<Self::Model>;

    fn predict(&self, model: &Self::Model, vectors: &[Vec<f64>]) -> Result<Vec<Self::Label>>;

    /// [`fit`](Self::fit) on every vector of a feature set, `labels[i]` labelling vector `i`.
    fn fit_features<T>(&self, features: &FeatureSet<T>, labels: &[Self::Label]) -> Result<Self::Model>
    where
        T: Hash + Eq,
    {
        if labels.len() != features.len() {
            return Err(Error::invalid(format!(
                "{} labels for {} vectors",
                labels.len(),
                features.len()
            )));
        }
        self.fit(features.vectors(), labels)
    }
}

/// Unsupervised grouping; returns one cluster id per observation.
pub trait Clusterer {
    fn cluster(&self, vectors: &[Vec<f64>]) -> Result<Vec<usize>>;

    /// Cluster from distances alone.
    fn cluster_precomputed(&self, distances: &CondensedDistanceMatrix) -> Result<Vec<usize>>;
}
