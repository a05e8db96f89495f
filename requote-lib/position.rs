use requote_core::{
  chars::char_is_line_ending,
  line_ending::line_end_char_index,
};
use ropey::RopeSlice;

/// This is a single point in a text buffer.
/// 0-indexed as all things should be; `col` counts chars within the line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
  pub line: usize,
  pub col:  usize,
}

impl Position {
  pub const fn new(line: usize, col: usize) -> Self {
    Self { line, col }
  }

  /// Same line, column shifted by `delta` (saturating at column 0).
  pub fn translate(self, delta: isize) -> Self {
    Self {
      line: self.line,
      col:  self.col.saturating_add_signed(delta),
    }
  }

  /// Position reached after typing `text` starting at `self`.
  pub fn traverse(self, text: impl AsRef<str>) -> Self {
    let Self { mut line, mut col } = self;
    let mut chars = text.as_ref().chars().peekable();

    while let Some(ch) = chars.next() {
      if char_is_line_ending(ch) && !(ch == '\r' && chars.peek() == Some(&'\n')) {
        line += 1;
        col = 0;
      } else {
        col += 1;
      }
    }

    Self { line, col }
  }
}

/// Convert a `(line, col)` to a character index.
///
/// Returns `None` when the line does not exist or the column lies past the
/// end of the line (its line ending excluded).
pub fn char_idx_at_coords(text: RopeSlice, coords: Position) -> Option<usize> {
  if coords.line >= text.len_lines() {
    return None;
  }

  let line_start = text.line_to_char(coords.line);
  let line_end = line_end_char_index(&text, coords.line);
  let idx = line_start + coords.col;
  (idx <= line_end).then_some(idx)
}

#[cfg(test)]
mod test {
  use ropey::Rope;

  use super::*;

  #[test]
  fn test_ordering() {
    assert!(Position::new(0, 9) < Position::new(1, 0));
    assert!(Position::new(2, 3) < Position::new(2, 4));
    assert_eq!(
      Position::new(1, 2).max(Position::new(1, 1)),
      Position::new(1, 2)
    );
  }

  #[test]
  fn test_translate() {
    assert_eq!(Position::new(3, 4).translate(1), Position::new(3, 5));
    assert_eq!(Position::new(3, 4).translate(-4), Position::new(3, 0));
    assert_eq!(Position::new(3, 0).translate(-1), Position::new(3, 0));
  }

  #[test]
  fn test_traverse() {
    assert_eq!(Position::new(0, 4).traverse("ab"), Position::new(0, 6));
    assert_eq!(Position::new(0, 4).traverse("\n  "), Position::new(1, 2));
    assert_eq!(Position::new(2, 1).traverse("\r\n"), Position::new(3, 0));
    assert_eq!(Position::new(2, 1).traverse(""), Position::new(2, 1));
  }

  #[test]
  fn test_char_idx_at_coords() {
    let text = Rope::from("ab\ncd\r\nef");
    let slice = text.slice(..);
    assert_eq!(char_idx_at_coords(slice, Position::new(0, 0)), Some(0));
    assert_eq!(char_idx_at_coords(slice, Position::new(0, 2)), Some(2));
    assert_eq!(char_idx_at_coords(slice, Position::new(0, 3)), None);
    assert_eq!(char_idx_at_coords(slice, Position::new(1, 2)), Some(5));
    assert_eq!(char_idx_at_coords(slice, Position::new(2, 2)), Some(9));
    assert_eq!(char_idx_at_coords(slice, Position::new(3, 0)), None);
  }
}
