use std::borrow::Borrow;
use std::hash::Hash;
use std::iter::Sum;
use std::ops::{Add, AddAssign, SubAssign};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Token counts of one source.
///
/// Tokens keep the order in which they were first seen. Equality ignores that
/// order: two streams are equal when they hold the same counts.
///
/// # Examples
/// ```
/// use featurize::Stream;
///
/// let a: Stream<String> = Stream::from_tokens(["to", "be", "or", "not", "to", "be"]);
/// assert_eq!(a.count("to"), 2);
/// assert_eq!(a.count("question"), 0);
/// assert_eq!(a.total(), 6);
///
/// let b: Stream<String> = Stream::from_tokens(["be", "quick"]);
/// let sum = &a + &b;
/// assert_eq!(sum.count("be"), 3);
/// assert_eq!(sum.len(), 5);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(bound(
    serialize = "T: Serialize + Hash + Eq",
    deserialize = "T: Deserialize<'de> + Hash + Eq"
))]
pub struct Stream<T>
where
    T: Hash + Eq,
{
    #[serde(with = "indexmap::map::serde_seq")]
    counts: IndexMap<T, u64>,
    total: u64,
}

impl<T> Stream<T>
where
    T: Hash + Eq,
{
    pub fn new() -> Self {
        Stream {
            counts: IndexMap::new(),
            total: 0,
        }
    }

    /// Count every token of a sequence.
    pub fn from_tokens<I>(tokens: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        let mut stream = Self::new();
        for token in tokens {
            stream.add_token(token.into());
        }
        stream
    }

    /// Count a fallible token sequence, as produced by a tokenizer.
    ///
    /// # Returns
    /// * `Result<Self>` - the first error of the sequence, if any
    pub fn try_from_tokens<I, E>(tokens: I) -> Result<Self>
    where
        I: IntoIterator<Item = std::result::Result<T, E>>,
        E: Into<crate::Error>,
    {
        let mut stream = Self::new();
        for token in tokens {
            stream.add_token(token.map_err(Into::into)?);
        }
        Ok(stream)
    }

    /// Build from `(token, count)` pairs.
    /// Repeated tokens are summed, zero counts are not stored.
    pub fn from_counts<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (T, u64)>,
    {
        let mut stream = Self::new();
        for (token, count) in pairs {
            stream.add_token_n(token, count);
        }
        stream
    }

    #[inline]
    pub fn add_token(&mut self, token: T) -> &mut Self {
        self.add_token_n(token, 1)
    }

    /// Add `n` occurrences of `token`.
    #[inline]
    pub fn add_token_n(&mut self, token: T, n: u64) -> &mut Self {
        if n > 0 {
            *self.counts.entry(token).or_insert(0) += n;
            self.total += n;
        }
        self
    }

    /// Count of `token`, 0 when absent.
    #[inline]
    pub fn count<Q>(&self, token: &Q) -> u64
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.get(token).copied().unwrap_or(0)
    }

    #[inline]
    pub fn contains<Q>(&self, token: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.counts.contains_key(token)
    }

    /// Sum of all counts.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of distinct tokens.
    #[inline]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> {
        self.counts.iter().map(|(t, &c)| (t, c))
    }

    pub fn tokens(&self) -> impl Iterator<Item = &T> {
        self.counts.keys()
    }

    /// Tokens by descending count, ties in first-seen order.
    ///
    /// # Arguments
    /// * `k` - keep only the first `k` entries, `None` for all
    pub fn most_common(&self, k: Option<usize>) -> Vec<(&T, u64)> {
        let mut entries: Vec<(&T, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(k) = k {
            entries.truncate(k);
        }
        entries
    }
}

impl<T> Default for Stream<T>
where
    T: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> AddAssign<&Stream<T>> for Stream<T>
where
    T: Hash + Eq + Clone,
{
    fn add_assign(&mut self, rhs: &Stream<T>) {
        self.counts.reserve(rhs.len());
        for (token, count) in rhs.iter() {
            self.add_token_n(token.clone(), count);
        }
    }
}

impl<T> AddAssign<Stream<T>> for Stream<T>
where
    T: Hash + Eq,
{
    fn add_assign(&mut self, rhs: Stream<T>) {
        self.counts.reserve(rhs.len());
        for (token, count) in rhs.counts {
            self.add_token_n(token, count);
        }
    }
}

impl<T> Add for Stream<T>
where
    T: Hash + Eq,
{
    type Output = Stream<T>;

    fn add(mut self, rhs: Stream<T>) -> Stream<T> {
        self += rhs;
        self
    }
}

impl<T> Add<&Stream<T>> for &Stream<T>
where
    T: Hash + Eq + Clone,
{
    type Output = Stream<T>;

    fn add(self, rhs: &Stream<T>) -> Stream<T> {
        let mut out = self.clone();
        out += rhs;
        out
    }
}

/// Removes counts; tokens that drop to zero are forgotten.
impl<T> SubAssign<&Stream<T>> for Stream<T>
where
    T: Hash + Eq,
{
    fn sub_assign(&mut self, rhs: &Stream<T>) {
        for (token, count) in rhs.iter() {
            let Some(current) = self.counts.get_mut(token) else {
                continue;
            };
            let taken = count.min(*current);
            *current -= taken;
            self.total -= taken;
            if *current == 0 {
                self.counts.shift_remove(token);
            }
        }
    }
}

impl<T> Sum for Stream<T>
where
    T: Hash + Eq,
{
    fn sum<I: Iterator<Item = Stream<T>>>(iter: I) -> Self {
        iter.fold(Stream::new(), |acc, s| acc + s)
    }
}

impl<'a, T> Sum<&'a Stream<T>> for Stream<T>
where
    T: Hash + Eq + Clone + 'a,
{
    fn sum<I: Iterator<Item = &'a Stream<T>>>(iter: I) -> Self {
        let mut acc = Stream::new();
        for s in iter {
            acc += s;
        }
        acc
    }
}

impl<T> FromIterator<T> for Stream<T>
where
    T: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut stream = Stream::new();
        stream.extend(iter);
        stream
    }
}

impl<T> Extend<T> for Stream<T>
where
    T: Hash + Eq,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for token in iter {
            self.add_token(token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn s(tokens: &[&str]) -> Stream<String> {
        Stream::from_tokens(tokens.iter().copied())
    }

    #[test]
    fn counts_and_total() {
        let st = s(&["a", "b", "a", "c", "a"]);
        assert_eq!(st.count("a"), 3);
        assert_eq!(st.count("z"), 0);
        assert_eq!(st.total(), 5);
        assert_eq!(st.len(), 3);
        assert!(st.contains("c"));
        assert!(!Stream::<String>::new().contains("c"));
    }

    #[test]
    fn equality_ignores_order() {
        assert_eq!(s(&["x", "y", "y"]), s(&["y", "x", "y"]));
        assert_ne!(s(&["x"]), s(&["x", "x"]));
    }

    #[test]
    fn addition_is_element_wise() {
        let a = s(&["a", "b"]);
        let b = s(&["b", "c", "c"]);
        let sum = &a + &b;
        assert_eq!(sum.count("a"), 1);
        assert_eq!(sum.count("b"), 2);
        assert_eq!(sum.count("c"), 2);
        assert_eq!(sum.total(), a.total() + b.total());
        assert_eq!(sum, b + a);
    }

    #[test]
    fn sum_of_many() {
        let parts = vec![s(&["a"]), s(&["a", "b"]), s(&[])];
        let by_ref: Stream<String> = parts.iter().sum();
        let owned: Stream<String> = parts.into_iter().sum();
        assert_eq!(by_ref, owned);
        assert_eq!(owned.count("a"), 2);
    }

    #[test]
    fn subtraction_forgets_exhausted_tokens() {
        let mut a = s(&["a", "a", "b"]);
        a -= &s(&["a", "b", "b", "z"]);
        assert_eq!(a.count("a"), 1);
        assert!(!a.contains("b"));
        assert_eq!(a.total(), 1);
    }

    #[test]
    fn from_counts_drops_zeros_and_merges() {
        let st = Stream::from_counts(vec![("a", 2), ("b", 0), ("a", 1)]);
        assert_eq!(st.count("a"), 3);
        assert!(!st.contains("b"));
        assert_eq!(st.len(), 1);
    }

    #[test]
    fn most_common_ranks_by_count() {
        let st = s(&["c", "a", "b", "a", "b", "a"]);
        let top = st.most_common(Some(2));
        assert_eq!(top.len(), 2);
        assert_eq!((top[0].0.as_str(), top[0].1), ("a", 3));
        assert_eq!((top[1].0.as_str(), top[1].1), ("b", 2));
        assert_eq!(st.most_common(None).len(), 3);
    }

    #[test]
    fn try_from_tokens_stops_at_error() {
        let tokens: Vec<Result<String>> = vec![
            Ok("a".into()),
            Err(Error::invalid("boom")),
            Ok("b".into()),
        ];
        assert!(Stream::try_from_tokens(tokens).is_err());
    }
}
