//! Ranges and the single-selection snapshot.
//!
//! A [`Range`] is a half-open span between two [`Position`]s, always stored
//! with `start <= end`. Constructors normalize the order so callers can pass
//! either end first.
//!
//! ```text
//! start=(0,4), end=(0,5): "say ['] hi"   (one-character selection)
//! start=(0,4), end=(0,4): "say |' hi"    (point/cursor)
//! ```
//!
//! A [`SelectionSnapshot`] remembers what the user had selected at the most
//! recent selection change, so that a following edit can be compared against
//! it. Only a single selection is ever tracked; see
//! [`SelectionSnapshot::capture`].

use crate::{
  Tendril,
  position::Position,
  text::TextSource,
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
  pub start: Position,
  pub end:   Position,
}

impl Range {
  pub fn new(a: Position, b: Position) -> Self {
    Self {
      start: a.min(b),
      end:   a.max(b),
    }
  }

  pub fn point(pos: Position) -> Self {
    Self {
      start: pos,
      end:   pos,
    }
  }

  /// A range on `line` covering columns `from..to`.
  pub fn on_line(line: usize, from: usize, to: usize) -> Self {
    Self::new(Position::new(line, from), Position::new(line, to))
  }

  /// One-character range starting at `pos`.
  pub fn single_char(pos: Position) -> Self {
    Self::new(pos, pos.translate(1))
  }

  pub fn is_single_line(&self) -> bool {
    self.start.line == self.end.line
  }
}

/// The text covered by the single active selection, captured at the most
/// recent selection change and therefore before the edit being classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
  pub range: Range,
  pub text:  Tendril,
}

impl SelectionSnapshot {
  pub fn new(range: Range, text: impl Into<Tendril>) -> Self {
    Self {
      range,
      text: text.into(),
    }
  }

  /// Snapshot the selection reported by a selection-change event.
  ///
  /// Returns `None` unless exactly one range was reported, or when the
  /// range cannot be read from `text`.
  pub fn capture<T: TextSource + ?Sized>(text: &T, ranges: &[Range]) -> Option<Self> {
    let [range] = ranges else {
      log::trace!("no snapshot - {} selection ranges", ranges.len());
      return None;
    };

    let selected = text.slice(*range)?;
    Some(Self::new(*range, selected))
  }
}
