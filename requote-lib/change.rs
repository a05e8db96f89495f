//! Change records as reported by the host.
//!
//! One user action arrives as a [`ChangeEvent`]: an ordered list of
//! [`ChangeRecord`]s. A plain keystroke is one record; auto-surround style
//! paired insertions show up as two. Records are applied in order, so each
//! record's range is expressed against the document after the records before
//! it were applied.

use smallvec::SmallVec;

use crate::{
  Tendril,
  position::Position,
  selection::Range,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
  /// The replaced span.
  pub range:        Range,
  /// Length in chars of the replaced text; 0 for a pure insertion.
  pub range_length: usize,
  /// Inserted text; empty for a pure deletion.
  pub text:         Tendril,
}

pub type ChangeEvent = SmallVec<[ChangeRecord; 2]>;

impl ChangeRecord {
  pub fn new(range: Range, range_length: usize, text: impl Into<Tendril>) -> Self {
    Self {
      range,
      range_length,
      text: text.into(),
    }
  }

  pub fn insert(at: Position, text: impl Into<Tendril>) -> Self {
    Self::new(Range::point(at), 0, text)
  }

  /// Replacement of a span that lies on one line, where `range_length` can be
  /// derived from the range itself.
  pub fn replace_on_line(range: Range, text: impl Into<Tendril>) -> Self {
    debug_assert!(range.is_single_line());
    let range_length = range.end.col - range.start.col;
    Self::new(range, range_length, text)
  }

  pub fn is_insertion(&self) -> bool {
    self.range_length == 0
  }

  pub fn start(&self) -> Position {
    self.range.start
  }
}
