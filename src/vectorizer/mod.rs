pub mod features;
pub mod index;
pub mod normalize;
pub mod reduce;
pub mod stream;
pub mod stream_set;

use std::hash::Hash;

use rayon::prelude::*;

use crate::distance::Metric;
use crate::error::Result;
use crate::tokenizer::{ChunkRead, Tokenizer};

pub use features::{FeatureOptions, FeatureSet};
pub use index::FeatureIndex;
pub use normalize::{normalize, NormalizeStrategy, ZeroTotalPolicy};
pub use reduce::{delete_features, ReduceOptions, ReductionMap};
pub use stream::Stream;
pub use stream_set::StreamSet;

/// Tokenize and count every source, one stream per source, in order.
///
/// # Arguments
/// * `tokenizer` - splits each source into tokens
/// * `sources` - chunked sources, each read to its end
///
/// # Returns
/// * `Result<Vec<Stream<Tk::Token>>>` - the first read or tokenizer error aborts
pub fn build_streams<Tk, S, I>(tokenizer: &Tk, sources: I) -> Result<Vec<Stream<Tk::Token>>>
where
    Tk: Tokenizer,
    S: ChunkRead,
    I: IntoIterator<Item = S>,
{
    let streams = sources
        .into_iter()
        .map(|source| Stream::try_from_tokens(tokenizer.tokenize(source)))
        .collect::<Result<Vec<_>>>()?;
    log::debug!("built {} streams", streams.len());
    Ok(streams)
}

/// [`build_streams`] with the sources counted in parallel.
///
/// Only the counting runs concurrently; the streams come back in source order
/// and the vocabulary is merged later, on one thread, when features are built.
pub fn build_streams_par<Tk, S>(tokenizer: &Tk, sources: Vec<S>) -> Result<Vec<Stream<Tk::Token>>>
where
    Tk: Tokenizer + Sync,
    Tk::Token: Send,
    S: ChunkRead + Send,
{
    let streams = sources
        .into_par_iter()
        .map(|source| Stream::try_from_tokens(tokenizer.tokenize(source)))
        .collect::<Result<Vec<_>>>()?;
    log::debug!("built {} streams in parallel", streams.len());
    Ok(streams)
}

/// Vectors of `streams`, reduced by `reduce` and then rescaled by `normalize`.
///
/// Zero divisors during normalization are an error; use
/// [`FeatureSet::from_streams`] with [`FeatureOptions`] to choose otherwise.
pub fn build_features<T>(
    streams: &[Stream<T>],
    reduce: &ReduceOptions,
    normalize: NormalizeStrategy,
) -> Result<FeatureSet<T>>
where
    T: Hash + Eq + Clone,
{
    let opts = FeatureOptions::new()
        .with_reduce(*reduce)
        .with_normalize(normalize);
    FeatureSet::from_streams(streams, &opts)
}

/// Distance between two streams in their shared feature space.
pub fn stream_distance<T>(a: &Stream<T>, b: &Stream<T>, metric: &Metric, opts: &FeatureOptions) -> Result<f64>
where
    T: Hash + Eq + Clone,
{
    let set = FeatureSet::from_streams(&[a.clone(), b.clone()], opts)?;
    set.dist(0, 1, metric)
}

/// Tokenize two sources and measure the distance between their streams.
pub fn source_distance<Tk, A, B>(
    tokenizer: &Tk,
    a: A,
    b: B,
    metric: &Metric,
    opts: &FeatureOptions,
) -> Result<f64>
where
    Tk: Tokenizer,
    A: ChunkRead,
    B: ChunkRead,
{
    let a = Stream::try_from_tokens(tokenizer.tokenize(a))?;
    let b = Stream::try_from_tokens(tokenizer.tokenize(b))?;
    stream_distance(&a, &b, metric, opts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{NGramTokenizer, ReaderSource, StrSource, WordTokenizer};
    use float_cmp::approx_eq;

    const TEXTS: [&str; 3] = [
        "the cat sat on the mat",
        "the dog sat on the log",
        "a cat and a dog",
    ];

    #[test]
    fn streams_in_source_order() {
        let sources = TEXTS.iter().map(|t| StrSource::new(*t));
        let streams = build_streams(&WordTokenizer::new(), sources).unwrap();
        assert_eq!(streams.len(), 3);
        assert_eq!(streams[0].count("the"), 2);
        assert_eq!(streams[2].count("a"), 2);
    }

    #[test]
    fn parallel_matches_sequential() {
        let tk = NGramTokenizer::bigrams();
        let seq = build_streams(&tk, TEXTS.iter().map(|t| StrSource::new(*t))).unwrap();
        let par = build_streams_par(&tk, TEXTS.iter().map(|t| StrSource::new(*t)).collect()).unwrap();
        assert_eq!(seq, par);
    }

    #[test]
    fn read_errors_abort() {
        let bad: &[u8] = &[b'o', b'k', b' ', 0xff];
        let sources = vec![ReaderSource::new(bad)];
        assert!(build_streams(&WordTokenizer::new(), sources).is_err());
    }

    #[test]
    fn features_from_entry_point() {
        let streams = build_streams(&WordTokenizer::new(), TEXTS.iter().map(|t| StrSource::new(*t))).unwrap();
        let set = build_features(&streams, &ReduceOptions::new().min_freq(0.5), NormalizeStrategy::Simple).unwrap();
        // present in at least two of three texts
        let mut kept: Vec<&str> = set.index().iter().map(String::as_str).collect();
        kept.sort_unstable();
        assert_eq!(kept, ["cat", "dog", "on", "sat", "the"]);
        for j in 0..set.width() {
            assert!(approx_eq!(f64, set.total()[j], 1.0, ulps = 4));
        }
    }

    #[test]
    fn distance_of_two_sources() {
        let d = source_distance(
            &WordTokenizer::new(),
            StrSource::new("a b"),
            StrSource::new("a c"),
            &Metric::Cosine,
            &FeatureOptions::raw(),
        )
        .unwrap();
        assert!(approx_eq!(f64, d, 0.5, ulps = 4));

        let same = stream_distance(
            &Stream::<String>::from_tokens(["x", "y"]),
            &Stream::from_tokens(["y", "x"]),
            &Metric::Euclidean,
            &FeatureOptions::default(),
        )
        .unwrap();
        assert_eq!(same, 0.0);
    }
}
