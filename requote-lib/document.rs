//! A rope-backed document with a single selection.
//!
//! [`RopeDocument`] is the reference [`Host`]: it stores text in a
//! [`Rope`], tracks one selection, and applies edit batches atomically. A
//! batch is validated completely before the first character is touched, so a
//! rejected batch leaves the document unchanged.
//!
//! It also replays host-originated [`ChangeRecord`]s, which makes it the
//! document used by the replay tool and the integration tests.
//!
//! ```
//! use requote_lib::{
//!   document::RopeDocument,
//!   edit::{
//!     Edit,
//!     EditError,
//!   },
//!   selection::Range,
//! };
//!
//! fn main() -> Result<(), EditError> {
//!   let mut doc = RopeDocument::from("say 'hi'");
//!   doc.apply(&[Edit::replace(Range::on_line(0, 4, 8), "\"hi\"")])?;
//!   assert_eq!(doc.to_string(), "say \"hi\"");
//!   Ok(())
//! }
//! ```

use std::{
  borrow::Cow,
  fmt,
};

use requote_core::line_ending::line_end_char_index;
use ropey::Rope;

use crate::{
  change::ChangeRecord,
  edit::{
    self,
    Edit,
    EditError,
  },
  position::char_idx_at_coords,
  selection::Range,
  text::{
    Host,
    TextSource,
  },
};

#[derive(Debug, Clone, Default)]
pub struct RopeDocument {
  text:      Rope,
  selection: Range,
  version:   u64,
}

impl RopeDocument {
  pub fn new(text: Rope) -> Self {
    Self {
      text,
      selection: Range::default(),
      version: 0,
    }
  }

  pub fn selection(&self) -> Range {
    self.selection
  }

  /// Incremented on every applied batch or change.
  pub fn version(&self) -> u64 {
    self.version
  }

  fn char_range(&self, range: Range) -> edit::Result<(usize, usize)> {
    let slice = self.text.slice(..);
    let from = char_idx_at_coords(slice, range.start);
    let to = char_idx_at_coords(slice, range.end);
    match (from, to) {
      (Some(from), Some(to)) => Ok((from, to)),
      _ => Err(EditError::RangeOutOfBounds { range }),
    }
  }

  /// Applies `edits` atomically. All ranges refer to the text before the
  /// batch; the selection is left for the caller to update.
  pub fn apply(&mut self, edits: &[Edit]) -> edit::Result<()> {
    let edits = edit::normalize(edits)?;
    let mut changes = Vec::with_capacity(edits.len());
    for edit in &edits {
      let (from, to) = self.char_range(edit.range)?;
      changes.push((from, to, edit.text()));
    }

    // Back to front, so earlier offsets stay valid.
    for (from, to, text) in changes.into_iter().rev() {
      self.text.remove(from..to);
      self.text.insert(from, text);
    }

    self.version += 1;
    log::trace!("applied {} edits, version {}", edits.len(), self.version);
    Ok(())
  }

  /// Plays one host-originated change, placing the cursor after the inserted
  /// text the way typing does.
  pub fn apply_change(&mut self, change: &ChangeRecord) -> edit::Result<()> {
    let (from, to) = self.char_range(change.range)?;
    if to - from != change.range_length {
      return Err(EditError::Rejected(format!(
        "change covers {} chars but reports {}",
        to - from,
        change.range_length
      )));
    }

    self.text.remove(from..to);
    self.text.insert(from, &change.text);
    self.selection = Range::point(change.start().traverse(&change.text));
    self.version += 1;
    Ok(())
  }

  /// Plays a whole change event. Each record is applied on top of the
  /// previous ones.
  pub fn apply_changes(&mut self, changes: &[ChangeRecord]) -> edit::Result<()> {
    let backup = self.clone();
    for change in changes {
      if let Err(err) = self.apply_change(change) {
        *self = backup;
        return Err(err);
      }
    }
    Ok(())
  }
}

impl TextSource for RopeDocument {
  fn line(&self, line: usize) -> Option<Cow<'_, str>> {
    if line >= self.text.len_lines() {
      return None;
    }

    let slice = self.text.slice(..);
    let start = slice.line_to_char(line);
    let end = line_end_char_index(&slice, line);
    Some(self.text.slice(start..end).into())
  }

  fn slice(&self, range: Range) -> Option<String> {
    let (from, to) = self.char_range(range).ok()?;
    Some(self.text.slice(from..to).to_string())
  }
}

impl Host for RopeDocument {
  fn apply_edits(&mut self, edits: &[Edit]) -> Result<(), EditError> {
    self.apply(edits)
  }

  fn set_selection(&mut self, range: Range) {
    self.selection = range;
  }
}

impl From<Rope> for RopeDocument {
  fn from(text: Rope) -> Self {
    Self::new(text)
  }
}

impl From<&str> for RopeDocument {
  fn from(text: &str) -> Self {
    Self::new(Rope::from(text))
  }
}

impl From<String> for RopeDocument {
  fn from(text: String) -> Self {
    Self::new(Rope::from(text))
  }
}

impl fmt::Display for RopeDocument {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for chunk in self.text.chunks() {
      f.write_str(chunk)?;
    }
    Ok(())
  }
}
