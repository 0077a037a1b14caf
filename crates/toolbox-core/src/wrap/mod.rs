//! Line wrapper: re-flows text to a column width without splitting words.
//!
//! Each input line is wrapped on its own. Blank lines pass through so
//! paragraph breaks survive. Tabs are expanded to 8-column stops, runs of
//! whitespace inside a line are kept as they are, and whitespace at the edges
//! of wrapped lines is dropped (except the indentation of the first one).
//! A word longer than the width gets a line to itself.
//!
//! Lines break only at ASCII whitespace (space, `\t`, `\n`, `\x0b`, `\x0c`,
//! `\r`). Ideographic spaces, NBSP and other Unicode spaces stay inside words.

use std::io::{self, BufRead, Write};
use thiserror::Error;

pub const DEFAULT_WIDTH: usize = 100;

const TAB_SIZE: usize = 8;

#[derive(Debug, Error)]
pub enum WrapError {
    #[error("wrap width must be at least 1")]
    ZeroWidth,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Wraps every line of `reader` to `width` columns and writes the result to `writer`.
pub fn wrap_text<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    width: usize,
) -> Result<(), WrapError> {
    if width == 0 {
        return Err(WrapError::ZeroWidth);
    }

    let mut buf = String::new();
    let mut input_lines = 0usize;
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            break;
        }
        input_lines += 1;
        let line = buf.strip_suffix('\n').unwrap_or(&buf);
        if line.is_empty() {
            writeln!(writer)?;
            continue;
        }
        for wrapped in wrap_line(line, width)? {
            writeln!(writer, "{wrapped}")?;
        }
    }
    writer.flush()?;
    tracing::debug!(input_lines, width, "wrap finished");
    Ok(())
}

/// Wraps a single line (without its newline) into lines of at most `width` columns.
///
/// Returns no lines for an empty or whitespace-only input.
pub fn wrap_line(line: &str, width: usize) -> Result<Vec<String>, WrapError> {
    if width == 0 {
        return Err(WrapError::ZeroWidth);
    }

    let expanded = expand_tabs(line);
    let chunks = split_chunks(&expanded);
    let mut lines: Vec<String> = Vec::new();
    let mut i = 0;

    while i < chunks.len() {
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0;

        // Leading whitespace is only kept on the first output line.
        if is_blank(chunks[i]) && !lines.is_empty() {
            i += 1;
        }

        while i < chunks.len() {
            let len = chunks[i].chars().count();
            if current_len + len > width {
                break;
            }
            current.push(chunks[i]);
            current_len += len;
            i += 1;
        }

        if current.is_empty() && i < chunks.len() {
            // Over-long word: never broken.
            current.push(chunks[i]);
            i += 1;
        }

        if current.last().is_some_and(|c| is_blank(c)) {
            current.pop();
        }
        if !current.is_empty() {
            lines.push(current.concat());
        }
    }

    Ok(lines)
}

fn is_break_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

/// Edge trimming treats any Unicode whitespace as blank, so a word made only
/// of ideographic spaces is still dropped at a line edge.
fn is_blank(chunk: &str) -> bool {
    chunk.chars().all(char::is_whitespace)
}

fn expand_tabs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut column = 0;
    for c in text.chars() {
        match c {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\r' | '\n' => {
                out.push(c);
                column = 0;
            }
            _ => {
                out.push(c);
                column += 1;
            }
        }
    }
    out
}

/// Alternating runs of whitespace and non-whitespace.
fn split_chunks(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut prev_blank: Option<bool> = None;
    for (idx, c) in text.char_indices() {
        let blank = is_break_space(c);
        if prev_blank.is_some_and(|p| p != blank) {
            chunks.push(&text[start..idx]);
            start = idx;
        }
        prev_blank = Some(blank);
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}
