use std::io::{self, Read};

/// A source that hands out its contents in bounded chunks.
///
/// `read_chunk(max)` returns at most `max` units of text. A chunk shorter than
/// requested means the end of the data is (about to be) reached, and once the
/// data is exhausted every further call returns an empty string.
pub trait ChunkRead {
    fn read_chunk(&mut self, max: usize) -> io::Result<String>;
}

impl<S> ChunkRead for &mut S
where
    S: ChunkRead + ?Sized,
{
    #[inline]
    fn read_chunk(&mut self, max: usize) -> io::Result<String> {
        (**self).read_chunk(max)
    }
}

/// In-memory text read through the chunked contract.
///
/// Units are `char`s, so a chunk never splits a character.
///
/// # Examples
/// ```
/// use featurize::tokenizer::{ChunkRead, StrSource};
/// let mut src = StrSource::new("to be or");
/// assert_eq!(src.read_chunk(5).unwrap(), "to be");
/// assert_eq!(src.read_chunk(5).unwrap(), " or");
/// assert_eq!(src.read_chunk(5).unwrap(), "");
/// ```
#[derive(Debug, Clone)]
pub struct StrSource<S> {
    text: S,
    /// byte offset of the next unread char
    pos: usize,
}

impl<S> StrSource<S>
where
    S: AsRef<str>,
{
    pub fn new(text: S) -> Self {
        Self { text, pos: 0 }
    }

    /// Text not handed out yet.
    pub fn remaining(&self) -> &str {
        &self.text.as_ref()[self.pos..]
    }
}

impl<S> ChunkRead for StrSource<S>
where
    S: AsRef<str>,
{
    fn read_chunk(&mut self, max: usize) -> io::Result<String> {
        let rest = self.remaining();
        let end = rest
            .char_indices()
            .nth(max)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let chunk = rest[..end].to_string();
        self.pos += end;
        Ok(chunk)
    }
}

/// Adapts any [`Read`] into a [`ChunkRead`].
///
/// Units are bytes. Input is decoded as UTF-8 incrementally: a multi-byte
/// character cut by a chunk boundary is held back and completed by the next
/// read, so a chunk never exceeds `max` bytes unless a single character is
/// wider than `max`, in which case that character alone is returned.
/// Malformed or truncated UTF-8 fails with [`io::ErrorKind::InvalidData`].
#[derive(Debug)]
pub struct ReaderSource<R> {
    inner: R,
    pending: Vec<u8>,
    eof: bool,
}

impl<R> ReaderSource<R>
where
    R: Read,
{
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: Vec::new(),
            eof: false,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Append up to `max` bytes from the reader, stopping early only at EOF.
    fn fill(&mut self, bytes: &mut Vec<u8>, max: usize) -> io::Result<()> {
        let start = bytes.len();
        bytes.resize(start + max, 0);
        let mut filled = start;
        while filled < bytes.len() {
            match self.inner.read(&mut bytes[filled..]) {
                Ok(0) => {
                    self.eof = true;
                    break;
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    bytes.truncate(filled);
                    return Err(e);
                }
            }
        }
        bytes.truncate(filled);
        Ok(())
    }
}

impl<R> ChunkRead for ReaderSource<R>
where
    R: Read,
{
    fn read_chunk(&mut self, max: usize) -> io::Result<String> {
        if max == 0 || (self.eof && self.pending.is_empty()) {
            return Ok(String::new());
        }
        let mut bytes = std::mem::take(&mut self.pending);
        if !self.eof {
            let room = max.saturating_sub(bytes.len());
            self.fill(&mut bytes, room)?;
        }
        loop {
            match String::from_utf8(bytes) {
                Ok(text) => return Ok(text),
                Err(err) => {
                    let utf8 = err.utf8_error();
                    let mut raw = err.into_bytes();
                    if utf8.error_len().is_some() {
                        return Err(io::Error::new(io::ErrorKind::InvalidData, utf8));
                    }
                    let valid = utf8.valid_up_to();
                    if valid == 0 {
                        if self.eof {
                            return Err(io::Error::new(io::ErrorKind::InvalidData, utf8));
                        }
                        // only a partial character so far, an empty chunk would read as EOF
                        bytes = raw;
                        self.fill(&mut bytes, 1)?;
                        continue;
                    }
                    self.pending = raw.split_off(valid);
                    log::trace!("holding back {} bytes of a split character", self.pending.len());
                    return String::from_utf8(raw)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_source_counts_chars_not_bytes() {
        let mut src = StrSource::new("héllo wörld");
        assert_eq!(src.read_chunk(2).unwrap(), "hé");
        assert_eq!(src.read_chunk(4).unwrap(), "llo ");
        assert_eq!(src.read_chunk(100).unwrap(), "wörld");
        assert_eq!(src.read_chunk(100).unwrap(), "");
        assert_eq!(src.read_chunk(100).unwrap(), "");
    }

    #[test]
    fn str_source_zero_request() {
        let mut src = StrSource::new(String::from("abc"));
        assert_eq!(src.read_chunk(0).unwrap(), "");
        assert_eq!(src.remaining(), "abc");
    }

    #[test]
    fn reader_source_reassembles_split_characters() {
        let text = "añb€c";
        let mut src = ReaderSource::new(text.as_bytes());
        let mut out = String::new();
        loop {
            let chunk = src.read_chunk(1).unwrap();
            if chunk.is_empty() {
                break;
            }
            out.push_str(&chunk);
        }
        assert_eq!(out, text);
    }

    #[test]
    fn reader_source_chunks_stay_within_max_bytes() {
        let text = "abc€de añb𝄞c€€ x";
        for max in 4..12 {
            let mut src = ReaderSource::new(text.as_bytes());
            let mut out = String::new();
            loop {
                let chunk = src.read_chunk(max).unwrap();
                if chunk.is_empty() {
                    break;
                }
                assert!(chunk.len() <= max, "chunk {chunk:?} over {max} bytes");
                out.push_str(&chunk);
            }
            assert_eq!(out, text);
        }

        let mut src = ReaderSource::new("abc€de".as_bytes());
        assert_eq!(src.read_chunk(4).unwrap(), "abc");
        assert_eq!(src.read_chunk(4).unwrap(), "€d");
        assert_eq!(src.read_chunk(4).unwrap(), "e");
    }

    #[test]
    fn reader_source_wide_character_comes_whole() {
        let mut src = ReaderSource::new("€a".as_bytes());
        assert_eq!(src.read_chunk(2).unwrap(), "€");
        assert_eq!(src.read_chunk(2).unwrap(), "a");
        assert_eq!(src.read_chunk(2).unwrap(), "");
    }

    #[test]
    fn reader_source_rejects_invalid_utf8() {
        let bytes: &[u8] = &[b'a', 0xff, b'b'];
        let mut src = ReaderSource::new(bytes);
        let err = src.read_chunk(8).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn reader_source_rejects_truncated_tail() {
        // first two bytes of a three byte character
        let bytes: &[u8] = &[b'x', 0xe2, 0x82];
        let mut src = ReaderSource::new(bytes);
        assert_eq!(src.read_chunk(1).unwrap(), "x");
        assert!(src.read_chunk(1).is_err());
    }

    #[test]
    fn borrowed_source_keeps_position() {
        fn take_two<C: ChunkRead>(mut source: C) -> String {
            source.read_chunk(2).unwrap()
        }
        let mut src = StrSource::new("abcdef");
        assert_eq!(take_two(&mut src), "ab");
        assert_eq!(src.read_chunk(2).unwrap(), "cd");
    }
}
