use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::tokenizer::source::ChunkRead;

/// Whitespace separated words of a chunked source.
///
/// Only one chunk (plus the word straddling its end) is held in memory.
/// A word cut by the end of a chunk is carried into the next chunk and only
/// emitted once whitespace or the end of input confirms it is complete, so the
/// output is the same as `split_whitespace` over the whole text for every
/// chunk size.
#[derive(Debug)]
pub struct Words<S> {
    source: S,
    chunk_size: usize,
    carry: String,
    ready: VecDeque<String>,
    done: bool,
}

impl<S> Words<S>
where
    S: ChunkRead,
{
    pub(crate) fn new(source: S, chunk_size: usize) -> Self {
        Self {
            source,
            chunk_size,
            carry: String::new(),
            ready: VecDeque::new(),
            done: false,
        }
    }

    fn refill(&mut self) -> Result<()> {
        let input = self.source.read_chunk(self.chunk_size)?;
        let exhausted = input.is_empty();
        log::trace!("read {} bytes, carrying {}", input.len(), self.carry.len());
        if exhausted {
            if !self.carry.is_empty() {
                self.ready.push_back(std::mem::take(&mut self.carry));
            }
            self.done = true;
            return Ok(());
        }

        // only the new input is scanned; the carried word is extended in place
        let mut rest = input.as_str();
        if !rest.starts_with(char::is_whitespace) {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            self.carry.push_str(&rest[..end]);
            rest = &rest[end..];
            if rest.is_empty() {
                return Ok(());
            }
        }
        if !self.carry.is_empty() {
            self.ready.push_back(std::mem::take(&mut self.carry));
        }

        let cut = !rest.ends_with(char::is_whitespace);
        let mut words = rest.split_whitespace().peekable();
        while let Some(word) = words.next() {
            if cut && words.peek().is_none() {
                self.carry.push_str(word);
            } else {
                self.ready.push_back(word.to_owned());
            }
        }
        Ok(())
    }
}

impl<S> Iterator for Words<S>
where
    S: ChunkRead,
{
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(word) = self.ready.pop_front() {
                return Some(Ok(word));
            }
            if self.done {
                return None;
            }
            if let Err(e) = self.refill() {
                self.done = true;
                return Some(Err(e));
            }
        }
    }
}

/// Sliding window of `n` consecutive words.
///
/// "to be or not" with n = 2 yields `[to, be]`, `[be, or]`, `[or, not]`.
#[derive(Debug)]
pub struct NGrams<I> {
    words: I,
    n: usize,
    window: VecDeque<String>,
}

impl<I> NGrams<I> {
    pub fn new(words: I, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::invalid("ngram size must be a positive integer"));
        }
        Ok(Self::with_window(words, n))
    }

    /// `n` must already be known to be positive.
    pub(crate) fn with_window(words: I, n: usize) -> Self {
        debug_assert!(n > 0);
        Self {
            words,
            n,
            window: VecDeque::with_capacity(n),
        }
    }
}

impl<I> Iterator for NGrams<I>
where
    I: Iterator<Item = Result<String>>,
{
    type Item = Result<Vec<String>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let word = match self.words.next()? {
                Ok(word) => word,
                Err(e) => return Some(Err(e)),
            };
            if self.window.len() == self.n {
                self.window.pop_front();
            }
            self.window.push_back(word);
            if self.window.len() == self.n {
                return Some(Ok(self.window.iter().cloned().collect()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::source::StrSource;

    fn words(text: &str, chunk: usize) -> Vec<String> {
        Words::new(StrSource::new(text), chunk)
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn word_split_across_chunks() {
        let text = "alpha beta\tgamma\n\ndelta";
        let expected: Vec<String> = text.split_whitespace().map(String::from).collect();
        for chunk in 1..=text.len() + 2 {
            assert_eq!(words(text, chunk), expected, "chunk size {chunk}");
        }
    }

    #[test]
    fn empty_and_blank_inputs() {
        assert!(words("", 4).is_empty());
        assert!(words("   \n\t ", 2).is_empty());
    }

    #[test]
    fn one_long_word() {
        assert_eq!(words("supercalifragilistic", 3), vec!["supercalifragilistic"]);
    }

    #[test]
    fn long_word_in_tiny_chunks() {
        let long = "x".repeat(20_000);
        let text = format!("a {long} b{long}");
        let out = words(&text, 3);
        assert_eq!(out.len(), 3);
        assert_eq!(out[1], long);
        assert_eq!(out[2].len(), long.len() + 1);
    }

    #[test]
    fn chunk_starting_with_whitespace_closes_the_word() {
        assert_eq!(words("ab cd", 2), vec!["ab", "cd"]);
        assert_eq!(words("ab  cd ", 3), vec!["ab", "cd"]);
    }

    #[test]
    fn ngram_window() {
        let w = Words::new(StrSource::new("to be or not to be"), 4);
        let grams = NGrams::new(w, 2)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(grams.len(), 5);
        assert_eq!(grams[0], vec!["to", "be"]);
        assert_eq!(grams[2], vec!["or", "not"]);
        assert_eq!(grams[4], vec!["to", "be"]);
    }

    #[test]
    fn ngram_longer_than_input() {
        let w = Words::new(StrSource::new("just two"), 16);
        assert_eq!(NGrams::new(w, 3).unwrap().count(), 0);
    }

    #[test]
    fn ngram_zero_is_rejected() {
        let w = Words::new(StrSource::new("a b"), 16);
        assert!(matches!(NGrams::new(w, 0), Err(Error::InvalidArgument(_))));
    }
}
