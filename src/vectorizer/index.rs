use std::borrow::Borrow;
use std::hash::Hash;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::vectorizer::reduce::ReductionMap;
use crate::vectorizer::stream::Stream;

/// Bijection between the tokens of a feature space and the columns `0..len`.
///
/// Columns are assigned in the order tokens appear in the total stream.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(bound(
    serialize = "T: Serialize + Hash + Eq",
    deserialize = "T: Deserialize<'de> + Hash + Eq"
))]
pub struct FeatureIndex<T>
where
    T: Hash + Eq,
{
    tokens: IndexSet<T>,
}

impl<T> FeatureIndex<T>
where
    T: Hash + Eq,
{
    /// One column per distinct token of `total`.
    pub fn from_total(total: &Stream<T>) -> Self
    where
        T: Clone,
    {
        FeatureIndex {
            tokens: total.tokens().cloned().collect(),
        }
    }

    /// Column of `token`.
    #[inline]
    pub fn get<Q>(&self, token: &Q) -> Option<usize>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.tokens.get_index_of(token)
    }

    /// Token at `column`.
    #[inline]
    pub fn token(&self, column: usize) -> Option<&T> {
        self.tokens.get_index(column)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens in column order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.tokens.iter()
    }

    /// Index of the reduced feature space.
    ///
    /// # Returns
    /// * `Result<Self>` - `InconsistentState` when `map` was computed for another width
    pub fn remap(&self, map: &ReductionMap) -> Result<Self>
    where
        T: Clone,
    {
        if map.original_width() != self.len() {
            return Err(Error::inconsistent(format!(
                "reduction map expects {} columns, index has {}",
                map.original_width(),
                self.len()
            )));
        }
        let tokens = map
            .kept()
            .iter()
            .map(|&j| {
                self.tokens.get_index(j).cloned().ok_or_else(|| {
                    Error::inconsistent(format!("reduction map keeps column {j} of a {} wide index", self.len()))
                })
            })
            .collect::<Result<IndexSet<T>>>()?;
        Ok(FeatureIndex { tokens })
    }

    pub fn into_tokens(self) -> Vec<T> {
        self.tokens.into_iter().collect()
    }
}

/// Same tokens in the same columns.
impl<T> PartialEq for FeatureIndex<T>
where
    T: Hash + Eq,
{
    fn eq(&self, other: &Self) -> bool {
        self.tokens.iter().eq(other.tokens.iter())
    }
}

impl<T> Eq for FeatureIndex<T> where T: Hash + Eq {}

impl<T> FromIterator<T> for FeatureIndex<T>
where
    T: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        FeatureIndex {
            tokens: iter.into_iter().collect(),
        }
    }
}
