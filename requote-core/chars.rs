use crate::line_ending::LineEnding;

/// The quote characters that can delimit a string literal.
pub const QUOTES: [char; 3] = ['\'', '"', '`'];

/// Escapes the character right after it inside a literal.
pub const ESCAPE: char = '\\';

#[inline]
pub fn char_is_quote(ch: char) -> bool {
  QUOTES.contains(&ch)
}

#[inline]
pub fn char_is_escape(ch: char) -> bool {
  ch == ESCAPE
}

#[inline]
pub fn char_is_line_ending(ch: char) -> bool {
  LineEnding::from_char(ch).is_some()
}

/// Horizontal whitespace: anything Unicode calls whitespace that does not
/// end a line.
#[inline]
pub fn char_is_whitespace(ch: char) -> bool {
  ch.is_whitespace() && !char_is_line_ending(ch)
}

/// Returns the quote if `text` consists of exactly one quote character.
pub fn str_as_quote(text: &str) -> Option<char> {
  let mut chars = text.chars();
  match (chars.next(), chars.next()) {
    (Some(ch), None) if char_is_quote(ch) => Some(ch),
    _ => None,
  }
}

/// Number of whitespace chars at the start of `text`.
pub fn leading_whitespace_len(text: &str) -> usize {
  text.chars().take_while(|&ch| char_is_whitespace(ch)).count()
}

/// Number of whitespace chars at the end of `text`.
pub fn trailing_whitespace_len(text: &str) -> usize {
  text
    .chars()
    .rev()
    .take_while(|&ch| char_is_whitespace(ch))
    .count()
}
