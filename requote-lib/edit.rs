//! Edit batches handed to the host.
//!
//! An [`Edit`] replaces the text of a [`Range`] (or deletes it when `text` is
//! `None`). All edits of one batch are expressed against the document as it
//! was *before* the batch, the same way the host applies them: atomically and
//! without any edit observing another one.
//!
//! A [`Fix`] pairs a batch with the selection to set once the host has
//! committed it. A fix with an empty batch only moves the cursor.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
  Tendril,
  position::Position,
  selection::Range,
};

pub type Result<T> = std::result::Result<T, EditError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum EditError {
  #[error("edit range {range:?} is out of bounds")]
  RangeOutOfBounds { range: Range },
  #[error("edit range {range:?} overlaps previous end {prev_end:?}")]
  OverlappingRange { prev_end: Position, range: Range },
  #[error("edit rejected by host: {0}")]
  Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
  pub range: Range,
  pub text:  Option<Tendril>,
}

pub type EditBatch = SmallVec<[Edit; 2]>;

impl Edit {
  pub fn delete(range: Range) -> Self {
    Self { range, text: None }
  }

  pub fn replace(range: Range, text: impl Into<Tendril>) -> Self {
    Self {
      range,
      text: Some(text.into()),
    }
  }

  pub fn text(&self) -> &str {
    self.text.as_deref().unwrap_or("")
  }
}

/// Sorts a batch by position and rejects overlapping ranges.
///
/// Two insertions at the same position are accepted and keep their relative
/// order.
pub fn normalize(edits: &[Edit]) -> Result<EditBatch> {
  let mut sorted: EditBatch = edits.iter().cloned().collect();
  sorted.sort_by_key(|edit| (edit.range.start, edit.range.end));

  let mut last: Option<Position> = None;
  for edit in &sorted {
    if let Some(prev_end) = last
      && edit.range.start < prev_end
    {
      return Err(EditError::OverlappingRange {
        prev_end,
        range: edit.range,
      });
    }
    last = Some(edit.range.end);
  }

  Ok(sorted)
}

/// The outcome of a fix executor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fix {
  pub edits:     EditBatch,
  /// Selection to set after the edits were committed.
  pub selection: Option<Range>,
}

impl Fix {
  pub fn new(edits: impl IntoIterator<Item = Edit>) -> Self {
    Self {
      edits:     edits.into_iter().collect(),
      selection: None,
    }
  }

  pub fn with_selection(mut self, selection: Range) -> Self {
    self.selection = Some(selection);
    self
  }

  pub fn has_edits(&self) -> bool {
    !self.edits.is_empty()
  }
}
