//! What the fixers need from the editor hosting them.
//!
//! [`TextSource`] is the read side, used by classifiers and fix executors.
//! [`Host`] adds the two mutations a fix performs: committing an edit batch
//! and repositioning the single selection afterwards.

use std::borrow::Cow;

use crate::{
  edit::{
    Edit,
    EditError,
  },
  position::Position,
  selection::Range,
};

pub trait TextSource {
  /// Text of line `line` without its line ending.
  fn line(&self, line: usize) -> Option<Cow<'_, str>>;

  /// Text covered by `range`, or `None` if the range is out of bounds.
  fn slice(&self, range: Range) -> Option<String>;

  fn char_at(&self, pos: Position) -> Option<char> {
    self.line(pos.line)?.chars().nth(pos.col)
  }
}

pub trait Host: TextSource {
  /// Apply `edits` as one atomic edit. Returns once the host committed it.
  ///
  /// Every range is expressed against the document before the batch.
  fn apply_edits(&mut self, edits: &[Edit]) -> Result<(), EditError>;

  /// Replace the active selection with `range`.
  fn set_selection(&mut self, range: Range);
}
