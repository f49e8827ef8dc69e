use std::collections::HashSet;
use std::io::{self, Write};
use serde::Serialize;
use crate::config::Capacity;
use crate::error::{Result, SimulationError};

/// A parsed trace file: the cache capacity and the keys accessed, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceFile {
    pub capacity: Capacity,
    pub keys: Vec<i64>,
}

impl TraceFile {
    pub fn new(capacity: Capacity, keys: Vec<i64>) -> Self {
        Self { capacity, keys }
    }

    /// Number of distinct keys in the trace
    pub fn distinct_keys(&self) -> usize {
        self.keys.iter().collect::<HashSet<_>>().len()
    }

    /// Writes the trace in the text format read by [`parse_trace`]: capacity, key count, then the
    /// keys, separated by single spaces with no trailing newline
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{} {}", self.capacity, self.keys.len())?;
        for key in &self.keys {
            write!(writer, " {key}")?;
        }
        writer.flush()
    }
}

/// Iterates over whitespace separated signed decimal integers, yielding each with its byte offset
struct Integers<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Integers<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }
}

impl Iterator for Integers<'_> {
    type Item = Result<(usize, i64)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_whitespace();
        if self.pos >= self.bytes.len() {
            return None;
        }
        let start = self.pos;
        let negative = self.bytes[self.pos] == b'-';
        if negative {
            self.pos += 1;
        }
        let digits_start = self.pos;
        // Accumulate towards the sign so i64::MIN parses without overflowing
        let mut value: i64 = 0;
        while self.pos < self.bytes.len() && !self.bytes[self.pos].is_ascii_whitespace() {
            let byte = self.bytes[self.pos];
            if !byte.is_ascii_digit() {
                self.pos = self.bytes.len();
                return Some(Err(SimulationError::trace_format(
                    start,
                    format!("unexpected character {:?}", byte as char),
                )));
            }
            let digit = (byte - b'0') as i64;
            let next = value.checked_mul(10).and_then(|v| {
                if negative { v.checked_sub(digit) } else { v.checked_add(digit) }
            });
            match next {
                Some(v) => value = v,
                None => {
                    self.pos = self.bytes.len();
                    return Some(Err(SimulationError::trace_format(start, "integer out of range")));
                }
            }
            self.pos += 1;
        }
        if self.pos == digits_start {
            self.pos = self.bytes.len();
            return Some(Err(SimulationError::trace_format(start, "sign without digits")));
        }
        Some(Ok((start, value)))
    }
}

/// Parses a trace from its text form: `capacity count key_1 ... key_count`.
///
/// Parsing works on raw bytes rather than going through `str::parse`, which would need a UTF-8
/// check and a split allocation per token; generated traces run to millions of keys.
///
/// A capacity below one is reported as [`SimulationError::InvalidCapacity`] before any key is read.
/// The number of keys must match the declared count exactly.
///
/// # Examples
///
/// ```
/// use evictlib::trace::parse_trace;
/// let trace = parse_trace(b"2 5\n1 2 3 1 2").unwrap();
/// assert_eq!(trace.capacity.get(), 2);
/// assert_eq!(trace.keys, vec![1, 2, 3, 1, 2]);
/// ```
pub fn parse_trace(bytes: &[u8]) -> Result<TraceFile> {
    let mut integers = Integers::new(bytes);
    let (_, capacity) = integers
        .next()
        .ok_or_else(|| SimulationError::trace_format(0, "missing cache capacity"))??;
    let capacity = Capacity::try_from(capacity)?;
    let (count_offset, count) = integers
        .next()
        .ok_or_else(|| SimulationError::trace_format(bytes.len(), "missing access count"))??;
    let count = usize::try_from(count)
        .map_err(|_| SimulationError::trace_format(count_offset, "negative access count"))?;
    // Never trust the header for the allocation size, each key needs at least two bytes
    let mut keys = Vec::with_capacity(count.min(bytes.len() / 2 + 1));
    for integer in integers {
        let (offset, key) = integer?;
        if keys.len() == count {
            return Err(SimulationError::trace_format(
                offset,
                format!("more keys than the declared {count}"),
            ));
        }
        keys.push(key);
    }
    if keys.len() != count {
        return Err(SimulationError::trace_format(
            bytes.len(),
            format!("expected {count} keys, found {}", keys.len()),
        ));
    }
    Ok(TraceFile { capacity, keys })
}

/// Parses an answer file, a single non-negative hit count
pub fn parse_answer(bytes: &[u8]) -> Result<u64> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| SimulationError::AnswerFormat(format!("not valid UTF-8: {e}")))?
        .trim();
    text.parse::<u64>()
        .map_err(|e| SimulationError::AnswerFormat(format!("{text:?} is not a hit count: {e}")))
}
