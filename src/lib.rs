//! This crate turns text into fixed-width feature vectors and measures the distances between them.

pub mod distance;
pub mod error;
pub mod model;
pub mod tokenizer;
pub mod utils;
pub mod vectorizer;

/// Error and Result types
/// Every fallible operation of the crate returns `featurize::Result`.
/// Errors are never retried: the failing stage stops and hands the error back.
/// - `InvalidArgument`: a parameter or input is not acceptable
/// - `InconsistentState`: vector widths disagree with their index or reduction map
/// - `DivisionUndefined`: a zero column total met during normalization
/// - `Io`: reading the source failed, including invalid UTF-8
pub use error::{Error, Result};

/// Word Tokenizer
/// Splits a chunked source on whitespace without loading it whole.
/// A word cut by a chunk boundary is held back until its end is seen, so the
/// output does not depend on the chunk size.
///
/// `tokenize(source)` is the shortcut with the default chunk size.
pub use tokenizer::{tokenize, WordTokenizer};

/// N-gram Tokenizer
/// Slides a window of `n` words over the word tokens and emits each full window.
/// `bigrams()` and `trigrams()` build the common sizes.
pub use tokenizer::{NGramTokenizer, Tokenizer};

/// Stream
/// Token counts of one source, built from a token sequence.
/// Streams add element-wise, which is how collection totals are formed.
pub use vectorizer::Stream;

/// Stream Set
/// Non-empty list of streams with optional names and a maintained total.
/// Entry point to build the feature set of a whole collection.
pub use vectorizer::StreamSet;

/// Feature Set and Feature Index
/// One dense vector per stream plus the token to column bijection describing them.
/// Column totals and proportions are cached and refreshed after every mutation.
///
/// `FeatureSet` supports:
/// - reduction by occurrence and frequency thresholds
/// - normalization (simple, tf-idf, tf-idf without log)
/// - distances between its vectors (`dist`, `pdist`, `cdist`)
pub use vectorizer::{FeatureIndex, FeatureOptions, FeatureSet};

/// Reduction
/// `ReduceOptions` holds the inclusive `minocc` / `maxocc` / `minfreq` / `maxfreq` bounds.
/// `ReductionMap` lists the surviving original columns; its position is the new column.
pub use vectorizer::{delete_features, ReduceOptions, ReductionMap};

/// Normalization
/// Column rescaling strategies and the policy for zero divisors.
pub use vectorizer::{normalize, NormalizeStrategy, ZeroTotalPolicy};

/// Pipeline entry points
/// - `build_streams`: tokenize and count every source
/// - `build_streams_par`: same, counting sources in parallel
/// - `build_features`: index, reduce and normalize a stream collection
/// - `stream_distance` / `source_distance`: distance of two streams or two sources
pub use vectorizer::{build_features, build_streams, build_streams_par, source_distance, stream_distance};

/// Distances
/// `Metric` names a distance (bray-curtis, cosine, euclidean, jaccard, ...) or wraps a closure.
/// `pairwise_distance` returns a `CondensedDistanceMatrix`, storing only the upper triangle;
/// `cross_distance` returns a rectangular `DistanceMatrix`.
pub use distance::{cross_distance, pairwise_distance, CondensedDistanceMatrix, DistanceMatrix, Metric};
