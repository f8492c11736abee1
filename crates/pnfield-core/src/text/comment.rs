use std::collections::VecDeque;
use std::io::{BufRead, ErrorKind};

use tracing::{debug, trace};

use super::layout;

/// Line reader that drops `<!-- ... -->` blocks from description files.
///
/// Each call to [`read_line`](Self::read_line) returns at most one physical
/// line of content with comments removed. A comment that runs over several
/// lines is swallowed whole, and whatever follows its terminator is joined to
/// the text in front of the comment. When that tail does not fit the
/// caller's capacity it is held back and returned by the next call.
///
/// Comments do not nest and have no escape. Read errors end the stream.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use pnfield_core::CommentStrippingReader;
///
/// let input = "<a><!-- note -->\n<b/>\n";
/// let mut reader = CommentStrippingReader::new(Cursor::new(input));
/// assert_eq!(reader.read_line(256).as_deref(), Some(&b"<a>\n"[..]));
/// assert_eq!(reader.read_line(256).as_deref(), Some(&b"<b/>\n"[..]));
/// assert_eq!(reader.read_line(256), None);
/// ```
#[derive(Debug)]
pub struct CommentStrippingReader<R> {
    inner: R,
    pushback: VecDeque<u8>,
}

impl<R: BufRead> CommentStrippingReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pushback: VecDeque::new(),
        }
    }

    /// Read one line of at most `capacity` bytes with comments stripped.
    ///
    /// Returns `None` once the stream yields nothing more.
    pub fn read_line(&mut self, capacity: usize) -> Option<Vec<u8>> {
        let mut line = self.read_physical(capacity)?;
        let Some(start) = find(&line, layout::COMMENT_START) else {
            return Some(line);
        };

        let body = start + layout::COMMENT_START.len();
        let trailing = match find(&line[body..], layout::COMMENT_END) {
            Some(end) => line[body + end + layout::COMMENT_END.len()..].to_vec(),
            None => match self.skip_to_comment_end() {
                Some(trailing) => trailing,
                None => {
                    line.truncate(start);
                    return Some(line);
                }
            },
        };

        line.truncate(start);
        if line.len() + trailing.len() <= capacity {
            line.extend_from_slice(&trailing);
        } else {
            trace!(bytes = trailing.len(), "comment tail deferred to next read");
            self.unread(&trailing);
        }
        Some(line)
    }

    /// Iterate over stripped lines as (lossy) UTF-8 strings.
    pub fn lines(self, capacity: usize) -> Lines<R> {
        Lines {
            reader: self,
            capacity,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Consume lines until one contains the comment terminator and return
    /// the bytes after it. `None` when the stream ends inside the comment.
    fn skip_to_comment_end(&mut self) -> Option<Vec<u8>> {
        while let Some(scratch) = self.read_physical(layout::MAX_LINE_LENGTH) {
            if let Some(end) = find(&scratch, layout::COMMENT_END) {
                return Some(scratch[end + layout::COMMENT_END.len()..].to_vec());
            }
        }
        debug!("stream ended inside an unterminated comment");
        None
    }

    fn unread(&mut self, bytes: &[u8]) {
        for &b in bytes.iter().rev() {
            self.pushback.push_front(b);
        }
    }

    /// Read up to `limit` bytes, stopping after the first newline. Pushed
    /// back bytes are served before the underlying stream.
    fn read_physical(&mut self, limit: usize) -> Option<Vec<u8>> {
        let mut line = Vec::new();
        while line.len() < limit {
            let Some(b) = self.pushback.pop_front() else {
                break;
            };
            line.push(b);
            if b == b'\n' {
                return Some(line);
            }
        }

        while line.len() < limit {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => {
                    debug!(error = %err, "read failed; treating as end of stream");
                    break;
                }
            };
            if available.is_empty() {
                break;
            }
            let window = &available[..available.len().min(limit - line.len())];
            let (take, newline) = match window.iter().position(|&b| b == b'\n') {
                Some(pos) => (pos + 1, true),
                None => (window.len(), false),
            };
            line.extend_from_slice(&window[..take]);
            self.inner.consume(take);
            if newline {
                break;
            }
        }

        if line.is_empty() { None } else { Some(line) }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Iterator returned by [`CommentStrippingReader::lines`].
#[derive(Debug)]
pub struct Lines<R> {
    reader: CommentStrippingReader<R>,
    capacity: usize,
}

impl<R: BufRead> Iterator for Lines<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.reader
            .read_line(self.capacity)
            .map(|line| String::from_utf8_lossy(&line).into_owned())
    }
}
