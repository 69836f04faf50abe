use std::hash::Hash;
use std::ops::Add;

use crate::error::{Error, Result};
use crate::vectorizer::features::{FeatureOptions, FeatureSet};
use crate::vectorizer::stream::Stream;

/// Non-empty collection of streams, optionally named, with their running total.
///
/// # Examples
/// ```
/// use featurize::{FeatureOptions, Stream, StreamSet};
///
/// let mut set: StreamSet<String> = StreamSet::new(vec![Stream::from_tokens(["a", "b"])]).unwrap();
/// set.append(Stream::from_tokens(["b", "c"]), Some("second".to_string()));
/// assert_eq!(set.total().count("b"), 2);
/// assert_eq!(set.name(1), Some("second"));
///
/// let features = set.features(&FeatureOptions::raw()).unwrap();
/// assert_eq!(features.width(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct StreamSet<T>
where
    T: Hash + Eq,
{
    streams: Vec<Stream<T>>,
    names: Vec<Option<String>>,
    total: Stream<T>,
}

impl<T> StreamSet<T>
where
    T: Hash + Eq + Clone,
{
    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` for an empty `streams`
    pub fn new(streams: Vec<Stream<T>>) -> Result<Self> {
        let names = vec![None; streams.len()];
        Self::build(streams, names)
    }

    /// Streams labelled by name, e.g. by the file they were read from.
    pub fn with_names<I, S>(named: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Stream<T>)>,
        S: Into<String>,
    {
        let (names, streams) = named
            .into_iter()
            .map(|(name, stream)| (Some(name.into()), stream))
            .unzip();
        Self::build(streams, names)
    }

    fn build(streams: Vec<Stream<T>>, names: Vec<Option<String>>) -> Result<Self> {
        if streams.is_empty() {
            return Err(Error::invalid("a stream set must not be empty"));
        }
        let total = streams.iter().sum();
        Ok(StreamSet { streams, names, total })
    }

    pub fn append(&mut self, stream: Stream<T>, name: Option<String>) -> &mut Self {
        self.total += &stream;
        self.streams.push(stream);
        self.names.push(name);
        self
    }

    /// Take out the stream at `i`; the total no longer counts it.
    ///
    /// # Returns
    /// * `Result<(Option<String>, Stream<T>)>` - `InvalidArgument` when `i` is out of
    ///   range or the stream is the last one left
    pub fn remove(&mut self, i: usize) -> Result<(Option<String>, Stream<T>)> {
        if i >= self.streams.len() {
            return Err(Error::invalid(format!(
                "stream {i} out of range for {} streams",
                self.streams.len()
            )));
        }
        if self.streams.len() == 1 {
            return Err(Error::invalid("cannot remove the last stream of a stream set"));
        }
        let stream = self.streams.remove(i);
        let name = self.names.remove(i);
        self.total -= &stream;
        Ok((name, stream))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Always `false`: a stream set holds at least one stream.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Stream<T>> {
        self.streams.get(i)
    }

    pub fn name(&self, i: usize) -> Option<&str> {
        self.names.get(i).and_then(|n| n.as_deref())
    }

    /// Sum of every stream.
    pub fn total(&self) -> &Stream<T> {
        &self.total
    }

    pub fn streams(&self) -> &[Stream<T>] {
        &self.streams
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Stream<T>> {
        self.streams.iter()
    }

    /// Feature vectors of every stream, see [`FeatureSet::from_streams`].
    pub fn features(&self, opts: &FeatureOptions) -> Result<FeatureSet<T>> {
        FeatureSet::from_streams(&self.streams, opts)
    }
}

/// Concatenation.
impl<T> Add for StreamSet<T>
where
    T: Hash + Eq + Clone,
{
    type Output = StreamSet<T>;

    fn add(mut self, rhs: StreamSet<T>) -> StreamSet<T> {
        self.total += rhs.total;
        self.streams.extend(rhs.streams);
        self.names.extend(rhs.names);
        self
    }
}

impl<'a, T> IntoIterator for &'a StreamSet<T>
where
    T: Hash + Eq + Clone,
{
    type Item = &'a Stream<T>;
    type IntoIter = std::slice::Iter<'a, Stream<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn st(tokens: &[&str]) -> Stream<String> {
        Stream::from_tokens(tokens.iter().copied())
    }

    #[test]
    fn empty_set_is_rejected() {
        assert!(matches!(
            StreamSet::<String>::new(Vec::new()),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn total_follows_membership() {
        let mut set = StreamSet::new(vec![st(&["a", "b"]), st(&["b"])]).unwrap();
        set.append(st(&["c", "c"]), None);
        assert_eq!(set.len(), 3);
        assert_eq!(set.total().total(), 5);

        let (name, removed) = set.remove(0).unwrap();
        assert_eq!(name, None);
        assert_eq!(removed, st(&["a", "b"]));
        assert!(!set.total().contains("a"));
        assert_eq!(set.total().count("b"), 1);
        assert_eq!(set.total().total(), 3);
    }

    #[test]
    fn remove_keeps_the_set_non_empty() {
        let mut set = StreamSet::new(vec![st(&["a"])]).unwrap();
        assert!(set.remove(3).is_err());
        assert!(set.remove(0).is_err());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn concatenation_keeps_names() {
        let left = StreamSet::with_names([("one", st(&["a"]))]).unwrap();
        let right = StreamSet::with_names([("two", st(&["a", "b"]))]).unwrap();
        let both = left + right;
        assert_eq!(both.len(), 2);
        assert_eq!(both.name(0), Some("one"));
        assert_eq!(both.name(1), Some("two"));
        assert_eq!(both.total().count("a"), 2);
        assert_eq!((&both).into_iter().count(), 2);
    }

    #[test]
    fn features_track_stream_positions() {
        let set = StreamSet::new(vec![st(&["x"]), st(&["y"]), st(&["x", "y"])]).unwrap();
        let features = set.features(&FeatureOptions::default()).unwrap();
        assert_eq!(features.len(), 3);
        assert_eq!(features.refs(), &[0, 1, 2]);
    }
}
