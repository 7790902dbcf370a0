//! Call stack capture and frame symbol handling.
//!
//! [`BacktraceStack`] captures the current thread's stack with
//! `std::backtrace::Backtrace` and parses its rendered form into [`Frame`]s.
//! Symbol paths are normalized so they can be compared with the qualified
//! type names produced by `std::any::type_name`:
//!
//! - the trailing `::h0123…` hash is dropped,
//! - `<Type as Trait>::method` is read as `Type::method`,
//! - generic arguments and `{{closure}}` markers are removed.

use std::backtrace::{Backtrace, BacktraceStatus};

/// One frame of a captured stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub symbol: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl Frame {
    pub fn new(symbol: impl Into<String>, file: Option<String>, line: Option<u32>) -> Self {
        Self {
            symbol: symbol.into(),
            file,
            line,
        }
    }

    /// The function this frame executes, e.g. `handle` for
    /// `app::Worker::handle::{{closure}}`.
    pub fn method_name(&self) -> Option<String> {
        path_segments(&self.symbol).pop()
    }

    /// The scope that declares [`Frame::method_name`], e.g. `app::Worker`.
    pub fn declaring_scope(&self) -> Option<String> {
        let mut segments = path_segments(&self.symbol);
        segments.pop()?;
        if segments.is_empty() {
            None
        } else {
            Some(segments.join("::"))
        }
    }

    /// True when the declaring scope, or any scope enclosing it, is `scope`.
    pub fn is_within(&self, scope: &str) -> bool {
        let target = path_segments(scope);
        if target.is_empty() {
            return false;
        }
        let mut declaring = path_segments(&self.symbol);
        declaring.pop();
        // Walk outward: a::B::handle -> a::B -> a
        while !declaring.is_empty() {
            if declaring == target {
                return true;
            }
            declaring.pop();
        }
        false
    }
}

/// Source of stack frames, most recent call first.
pub trait CallStack: Send + Sync {
    fn capture(&self) -> Vec<Frame>;
}

/// Captures the real stack of the calling thread.
///
/// Frames are read from the `Display` rendering of `std::backtrace::Backtrace`,
/// whose format std does not guarantee. If it changes, frames stop matching any
/// log class and caller info falls back to `"?"` without any error.
#[derive(Debug, Clone, Copy, Default)]
pub struct BacktraceStack;

impl CallStack for BacktraceStack {
    fn capture(&self) -> Vec<Frame> {
        let backtrace = Backtrace::force_capture();
        if backtrace.status() != BacktraceStatus::Captured {
            return Vec::new();
        }
        parse_backtrace(&backtrace.to_string())
    }
}

/// Parses the `Display` rendering of a `std::backtrace::Backtrace`.
///
/// ```text
///    0: app::worker::Worker::handle
///              at ./src/worker.rs:42:9
/// ```
pub fn parse_backtrace(text: &str) -> Vec<Frame> {
    let mut frames: Vec<Frame> = Vec::new();
    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if let Some(location) = line.strip_prefix("at ") {
            if let Some(frame) = frames.last_mut() {
                if frame.file.is_none() {
                    let (file, line) = parse_location(location);
                    frame.file = Some(file);
                    frame.line = line;
                }
            }
            continue;
        }
        // Inlined symbols share their frame's index and are printed without one.
        let symbol = match line.split_once(": ") {
            Some((index, rest)) if !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) => rest,
            _ => line,
        };
        frames.push(Frame::new(symbol, None, None));
    }
    frames
}

fn parse_location(text: &str) -> (String, Option<u32>) {
    let mut file = text;
    let mut numbers = Vec::with_capacity(2);
    while numbers.len() < 2 {
        match file.rsplit_once(':') {
            Some((head, tail)) if tail.parse::<u32>().is_ok() => {
                numbers.push(tail);
                file = head;
            }
            _ => break,
        }
    }
    // file:line:col pops col first; the line is the leftmost number.
    let line = numbers.last().and_then(|n| n.parse().ok());
    (file.to_string(), line)
}

/// Splits a symbol or type path into comparable segments.
pub(crate) fn path_segments(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for (i, raw) in split_top_level(path.trim()).into_iter().enumerate() {
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with("{{") || is_symbol_hash(raw) {
            continue;
        }
        if let Some(inner) = raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            // `<Type as Trait>` leads a path; anything later is a turbofish.
            if i == 0 {
                let self_type = split_once_top_level(inner, " as ").map_or(inner, |(ty, _)| ty);
                segments.extend(path_segments(self_type));
            }
            continue;
        }
        segments.push(strip_generics(raw));
    }
    segments
}

fn split_top_level(path: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let bytes = path.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                parts.push(&path[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&path[start..]);
    parts
}

fn split_once_top_level<'a>(text: &'a str, needle: &str) -> Option<(&'a str, &'a str)> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 && text[i..].starts_with(needle) => {
                return Some((&text[..i], &text[i + needle.len()..]));
            }
            _ => {}
        }
    }
    None
}

fn strip_generics(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut depth = 0usize;
    for c in segment.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

fn is_symbol_hash(segment: &str) -> bool {
    segment.len() == 17
        && segment.starts_with('h')
        && segment[1..].bytes().all(|b| b.is_ascii_hexdigit())
}
