//! Single-line string literal scanning and re-escaping.
//!
//! A literal is a span of one line delimited by two instances of the same
//! quote character (see [`QUOTES`]); occurrences of that quote inside the
//! literal are escaped with a backslash. Nothing else about the host language
//! is known: no comments, no multi-line literals, no template placeholders.
//!
//! All offsets are char indices into the line.
//!
//! # Escaping
//!
//! Escaping only ever looks one character ahead. A backslash escapes the next
//! character, so `\\` is an escaped backslash and the quote in `\\"` is *not*
//! escaped.
//!
//! ```
//! use requote_lib::string_literal::{
//!   extract_string_literal_text,
//!   find_paired_wrapping_quote,
//!   transform_quote_escaping,
//! };
//!
//! let line = r#"say "it's" now"#;
//! assert_eq!(find_paired_wrapping_quote(line, 4), Some(9));
//! assert_eq!(find_paired_wrapping_quote(line, 9), Some(4));
//!
//! let body = extract_string_literal_text(line, 4, 9);
//! assert_eq!(body, "it's");
//!
//! // Re-quote the body for single quotes.
//! assert_eq!(transform_quote_escaping(body, '\''), r"it\'s");
//! ```
//!
//! [`QUOTES`]: requote_core::chars::QUOTES

use std::borrow::Cow;

use requote_core::chars::{
  ESCAPE,
  char_is_escape,
  char_is_quote,
};

use crate::{
  position::Position,
  selection::Range,
};

/// Finds the other boundary of the literal whose boundary quote sits at
/// `position`.
///
/// Returns the closing offset when `position` opens a literal, the opening
/// offset when it closes one, and `None` when the char at `position` is not
/// a literal boundary: outside any literal, escaped, strictly inside a
/// literal, or opening a literal that never closes on this line.
pub fn find_paired_wrapping_quote(line: &str, position: usize) -> Option<usize> {
  // (quote, start) of the literal the scan is in.
  let mut literal: Option<(char, usize)> = None;
  let mut escaped = false;

  for (index, ch) in line.chars().enumerate() {
    let Some((quote, start)) = literal else {
      if index > position {
        return None;
      }
      if char_is_quote(ch) {
        literal = Some((ch, index));
      } else if index == position {
        return None;
      }
      continue;
    };

    if escaped {
      if index == position {
        return None;
      }
      escaped = false;
      continue;
    }

    let closes = ch == quote;
    if index == position {
      return closes.then_some(start);
    }

    if closes {
      if start == position {
        return Some(index);
      }
      literal = None;
    } else if char_is_escape(ch) {
      escaped = true;
    }
  }

  None
}

/// Text strictly between two quote offsets, in either order.
pub fn extract_string_literal_text(line: &str, quote: usize, paired_quote: usize) -> &str {
  let start = quote.min(paired_quote) + 1;
  let end = quote.max(paired_quote);
  if start >= end {
    return "";
  }
  &line[char_to_byte(line, start)..char_to_byte(line, end)]
}

/// Range spanning both quotes of a literal, in either order.
pub fn string_literal_range(line: usize, quote: usize, paired_quote: usize) -> Range {
  Range::new(
    Position::new(line, quote.min(paired_quote)),
    Position::new(line, quote.max(paired_quote) + 1),
  )
}

/// Re-escapes a literal body for a new wrapping quote.
///
/// `body` is assumed to be escaped for its current wrapping quote. In the
/// result every quote char is escaped iff it equals `wrapping_quote`: a
/// backslash is inserted before quotes that need one and dropped before
/// quotes that no longer do. Everything else passes through untouched.
///
/// Returns [`Cow::Borrowed`] with `body` itself when nothing had to change.
pub fn transform_quote_escaping(body: &str, wrapping_quote: char) -> Cow<'_, str> {
  let mut escaped = false;
  let mut fixed: Option<String> = None;

  for (byte_idx, ch) in body.char_indices() {
    if char_is_escape(ch) {
      escaped = !escaped;
    } else {
      if char_is_quote(ch) {
        let needs_escaping = ch == wrapping_quote;
        if escaped != needs_escaping {
          let fixed = fixed.get_or_insert_with(|| {
            let mut fixed = String::with_capacity(body.len() + 1);
            fixed.push_str(&body[..byte_idx]);
            fixed
          });
          if needs_escaping {
            fixed.push(ESCAPE);
          } else {
            // `escaped` is only set right after a backslash.
            fixed.pop();
          }
        }
      }
      escaped = false;
    }

    if let Some(fixed) = fixed.as_mut() {
      fixed.push(ch);
    }
  }

  match fixed {
    Some(fixed) => Cow::Owned(fixed),
    None => Cow::Borrowed(body),
  }
}

/// Copy of `line` with the char at `position` replaced by `ch`.
///
/// `position == len` appends. Returns `None` past that.
pub fn with_char_at(line: &str, position: usize, ch: char) -> Option<String> {
  let mut chars = line.chars();
  let mut rebuilt = String::with_capacity(line.len() + ch.len_utf8());
  rebuilt.extend(chars.by_ref().take(position));
  if rebuilt.chars().count() != position {
    return None;
  }
  rebuilt.push(ch);
  chars.next();
  rebuilt.extend(chars);
  Some(rebuilt)
}

pub(crate) fn char_to_byte(line: &str, char_idx: usize) -> usize {
  line
    .char_indices()
    .nth(char_idx)
    .map(|(byte_idx, _)| byte_idx)
    .unwrap_or(line.len())
}
