use ropey::RopeSlice;

#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum LineEnding {
  /// CarriageReturn followed by LineFeed.
  Crlf,

  /// U+000A -- LineFeed
  LF,

  /// U+000B -- VerticalTab
  VT,

  /// U+000C -- FormFeed
  FF,

  /// U+000D -- CarriageReturn
  CR,

  /// U+0085 -- NextLine
  Nel,

  /// U+2028 -- Line Separator
  LS,

  /// U+2029 -- ParagraphSeparator
  PS,
}

impl LineEnding {
  #[inline]
  pub const fn len_chars(&self) -> usize {
    match self {
      Self::Crlf => 2,
      _ => 1,
    }
  }

  #[inline]
  pub const fn from_char(ch: char) -> Option<LineEnding> {
    match ch {
      '\u{000A}' => Some(LineEnding::LF),
      '\u{000B}' => Some(LineEnding::VT),
      '\u{000C}' => Some(LineEnding::FF),
      '\u{000D}' => Some(LineEnding::CR),
      '\u{0085}' => Some(LineEnding::Nel),
      '\u{2028}' => Some(LineEnding::LS),
      '\u{2029}' => Some(LineEnding::PS),
      _ => None,
    }
  }

  // Normally we'd want to implement the FromStr trait, but in this case
  // that would force us into a different return type than from_char,
  // which would be weird.
  #[allow(clippy::should_implement_trait)]
  #[inline]
  pub fn from_str(g: &str) -> Option<LineEnding> {
    match g {
      "\u{000D}\u{000A}" => Some(LineEnding::Crlf),
      "\u{000A}" => Some(LineEnding::LF),
      "\u{000B}" => Some(LineEnding::VT),
      "\u{000C}" => Some(LineEnding::FF),
      "\u{000D}" => Some(LineEnding::CR),
      "\u{0085}" => Some(LineEnding::Nel),
      "\u{2028}" => Some(LineEnding::LS),
      "\u{2029}" => Some(LineEnding::PS),
      _ => None,
    }
  }
}

/// Splits an Enter-style insertion into its line ending and whatever follows
/// it. Only a leading LF or CRLF counts: that is what a host inserts for the
/// Enter key.
pub fn split_leading_newline(text: &str) -> Option<(LineEnding, &str)> {
  if let Some(rest) = text.strip_prefix("\u{000D}\u{000A}") {
    Some((LineEnding::Crlf, rest))
  } else {
    text
      .strip_prefix('\u{000A}')
      .map(|rest| (LineEnding::LF, rest))
  }
}

/// Returns the passed line's line ending, if any.
pub fn get_line_ending(line: &RopeSlice) -> Option<LineEnding> {
  // Last char as str.
  let g1 = line
    .slice(line.len_chars().saturating_sub(1)..)
    .as_str()
    .unwrap_or("");

  // Last 2 chars as str, or empty str if they're not contiguous.
  // It's fine to punt on the non-contiguous case, because Ropey guarantees
  // that CRLF is always contiguous.
  let g2 = line
    .slice(line.len_chars().saturating_sub(2)..)
    .as_str()
    .unwrap_or("");

  // First check the 2-character case for CRLF, then check the single-character
  // case.
  LineEnding::from_str(g2).or_else(|| LineEnding::from_str(g1))
}

/// Returns the char index of the end of the given line, not including its line
/// ending.
pub fn line_end_char_index(slice: &RopeSlice, line: usize) -> usize {
  slice.line_to_char(line + 1)
    - get_line_ending(&slice.line(line))
      .map(|le| le.len_chars())
      .unwrap_or(0)
}
