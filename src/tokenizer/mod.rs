pub mod source;
pub mod words;

use std::hash::Hash;

use crate::error::{Error, Result};

pub use source::{ChunkRead, ReaderSource, StrSource};
pub use words::{NGrams, Words};

/// Units requested from the source per read.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Turns a chunked source into a lazy sequence of tokens.
///
/// The returned iterator owns the source handle it is given; pass `&mut source`
/// to keep ownership on the caller's side. Stopping iteration early is the only
/// form of cancellation.
pub trait Tokenizer {
    type Token: Hash + Eq + Clone;
    type Iter<S: ChunkRead>: Iterator<Item = Result<Self::Token>>;

    fn tokenize<S: ChunkRead>(&self, source: S) -> Self::Iter<S>;
}

/// Splits on whitespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordTokenizer {
    chunk_size: usize,
}

impl WordTokenizer {
    pub fn new() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Use a different read size.
    ///
    /// # Arguments
    /// * `chunk_size` - units per read, must be positive
    pub fn with_chunk_size(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(Error::invalid("chunk size must be positive"));
        }
        Ok(Self { chunk_size })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for WordTokenizer {
    type Token = String;
    type Iter<S: ChunkRead> = Words<S>;

    fn tokenize<S: ChunkRead>(&self, source: S) -> Words<S> {
        Words::new(source, self.chunk_size)
    }
}

/// Emits every run of `n` consecutive words as one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NGramTokenizer {
    n: usize,
    words: WordTokenizer,
}

impl NGramTokenizer {
    /// # Arguments
    /// * `n` - window size, must be at least 1
    ///
    /// # Returns
    /// * `Result<Self>` - `InvalidArgument` when `n` is 0
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::invalid("ngram size must be a positive integer"));
        }
        Ok(Self {
            n,
            words: WordTokenizer::new(),
        })
    }

    pub fn bigrams() -> Self {
        Self {
            n: 2,
            words: WordTokenizer::new(),
        }
    }

    pub fn trigrams() -> Self {
        Self {
            n: 3,
            words: WordTokenizer::new(),
        }
    }

    /// Same window over words read with a different chunk size.
    pub fn with_words(mut self, words: WordTokenizer) -> Self {
        self.words = words;
        self
    }

    pub fn n(&self) -> usize {
        self.n
    }
}

impl Tokenizer for NGramTokenizer {
    type Token = Vec<String>;
    type Iter<S: ChunkRead> = NGrams<Words<S>>;

    fn tokenize<S: ChunkRead>(&self, source: S) -> NGrams<Words<S>> {
        NGrams::with_window(self.words.tokenize(source), self.n)
    }
}

/// Words of `source`, read in chunks of [`DEFAULT_CHUNK_SIZE`].
///
/// # Examples
/// ```
/// use featurize::tokenize;
/// use featurize::tokenizer::StrSource;
///
/// let words: Vec<String> = tokenize(StrSource::new("to be  or\nnot"))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(words, ["to", "be", "or", "not"]);
/// ```
pub fn tokenize<S: ChunkRead>(source: S) -> Words<S> {
    WordTokenizer::new().tokenize(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(matches!(
            WordTokenizer::with_chunk_size(0),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(WordTokenizer::with_chunk_size(7).unwrap().chunk_size(), 7);
    }

    #[test]
    fn trigrams_over_reader() {
        let text = "the quick brown fox jumps";
        let grams = NGramTokenizer::trigrams()
            .tokenize(ReaderSource::new(text.as_bytes()))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(grams.len(), 3);
        assert_eq!(grams[1], vec!["quick", "brown", "fox"]);
    }

    #[test]
    fn ngram_tokenizer_with_small_chunks() {
        let small = WordTokenizer::with_chunk_size(2).unwrap();
        let grams = NGramTokenizer::bigrams()
            .with_words(small)
            .tokenize(StrSource::new("a bb ccc dddd"))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            grams,
            vec![vec!["a", "bb"], vec!["bb", "ccc"], vec!["ccc", "dddd"]]
        );
    }

    #[test]
    fn unigram_matches_words() {
        let grams = NGramTokenizer::new(1)
            .unwrap()
            .tokenize(StrSource::new("x y"))
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(grams, vec![vec!["x"], vec!["y"]]);
        assert!(NGramTokenizer::new(0).is_err());
    }

    #[test]
    fn source_stays_with_caller() {
        let mut src = StrSource::new("one two");
        let n = tokenize(&mut src).count();
        assert_eq!(n, 2);
        assert_eq!(src.remaining(), "");
    }
}
