//! Recognizing user gestures in raw change events.
//!
//! Each classifier looks at one [`ChangeEvent`] (plus the selection snapshot
//! taken before it) and either recognizes the gesture it is responsible for,
//! producing an [`Intent`], or returns `None`. A `None` is the normal outcome
//! for almost every keystroke; the reason is logged at trace level only.
//!
//! Classifiers are tried in [`Classifier::PRIORITY`] order and the first
//! match wins:
//!
//! 1. [`Classifier::EnterWhitespace`] - Enter, possibly followed by
//!    auto-indent.
//! 2. [`Classifier::QuoteWrap`] - a quote typed over a selected quote, which
//!    the host auto-surrounded instead of replacing: `'` becomes `"'"`.
//! 3. [`Classifier::QuoteReplace`] - a quote typed over a selected quote of a
//!    different kind, replacing it.
//!
//! [`ChangeEvent`]: crate::change::ChangeEvent

use std::fmt;

use requote_core::{
  chars::{
    char_is_quote,
    char_is_whitespace,
    str_as_quote,
  },
  line_ending::split_leading_newline,
};

use crate::{
  change::ChangeRecord,
  position::Position,
  selection::SelectionSnapshot,
  text::TextSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classifier {
  EnterWhitespace,
  QuoteWrap,
  QuoteReplace,
}

/// A recognized gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
  /// Enter was pressed; carries the change that inserted the line break.
  EnterWhitespace(ChangeRecord),
  QuoteWrap(QuoteWrap),
  QuoteReplace(QuoteReplace),
}

/// The same quote was inserted on both sides of a single quote char.
///
/// `opening` and `closing` are the positions of the two inserted quotes in
/// the document after the change, so `closing == opening + 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteWrap {
  pub inserted_quote: char,
  pub wrapped_quote:  char,
  pub opening:        Position,
  pub closing:        Position,
}

/// A selected quote was overwritten by a different quote at `position`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteReplace {
  pub new_quote: char,
  pub old_quote: char,
  pub position:  Position,
}

impl Classifier {
  pub const PRIORITY: [Classifier; 3] = [
    Classifier::EnterWhitespace,
    Classifier::QuoteWrap,
    Classifier::QuoteReplace,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Classifier::EnterWhitespace => "enter-whitespace",
      Classifier::QuoteWrap => "quote-wrap",
      Classifier::QuoteReplace => "quote-replace",
    }
  }

  pub fn classify<T: TextSource + ?Sized>(
    self,
    changes: &[ChangeRecord],
    selection: Option<&SelectionSnapshot>,
    text: &T,
  ) -> Option<Intent> {
    match self {
      Classifier::EnterWhitespace => {
        detect_enter_key_press(changes).map(|change| Intent::EnterWhitespace(change.clone()))
      },
      Classifier::QuoteWrap => detect_quote_wrap(changes, text).map(Intent::QuoteWrap),
      Classifier::QuoteReplace => {
        detect_quote_replacement(changes, selection).map(Intent::QuoteReplace)
      },
    }
  }
}

impl fmt::Display for Classifier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl Intent {
  pub fn classifier(&self) -> Classifier {
    match self {
      Intent::EnterWhitespace(_) => Classifier::EnterWhitespace,
      Intent::QuoteWrap(_) => Classifier::QuoteWrap,
      Intent::QuoteReplace(_) => Classifier::QuoteReplace,
    }
  }
}

/// Runs the enabled classifiers in priority order and returns the first
/// match.
pub fn classify<T, F>(
  changes: &[ChangeRecord],
  selection: Option<&SelectionSnapshot>,
  text: &T,
  enabled: F,
) -> Option<Intent>
where
  T: TextSource + ?Sized,
  F: Fn(Classifier) -> bool,
{
  Classifier::PRIORITY
    .into_iter()
    .filter(|&classifier| enabled(classifier))
    .find_map(|classifier| classifier.classify(changes, selection, text))
}

/// Matches a single change inserting a line break followed by nothing but
/// horizontal whitespace.
pub fn detect_enter_key_press(changes: &[ChangeRecord]) -> Option<&ChangeRecord> {
  let [change] = changes else {
    log::trace!("abort - made {} changes", changes.len());
    return None;
  };

  let Some((_, indent)) = split_leading_newline(&change.text) else {
    log::trace!("abort - change does not start with a line break");
    return None;
  };

  if !indent.chars().all(char_is_whitespace) {
    log::trace!("abort - change does not match enter key press pattern");
    return None;
  }

  Some(change)
}

/// Matches a quote typed over a selected quote of another kind.
pub fn detect_quote_replacement(
  changes: &[ChangeRecord],
  selection: Option<&SelectionSnapshot>,
) -> Option<QuoteReplace> {
  let Some(selection) = selection else {
    log::trace!("abort - no active selection");
    return None;
  };

  let Some(old_quote) = str_as_quote(&selection.text) else {
    log::trace!("abort - selected {:?} is not a quote", selection.text);
    return None;
  };

  let [change] = changes else {
    log::trace!("abort - made {} changes", changes.len());
    return None;
  };

  let Some(new_quote) = str_as_quote(&change.text) else {
    log::trace!("abort - inserted {:?} is not a quote", change.text);
    return None;
  };

  if new_quote == old_quote {
    log::trace!("abort - quotes match");
    return None;
  }

  if change.is_insertion() {
    log::trace!("abort - no text replacement detected");
    return None;
  }

  let replacement = QuoteReplace {
    new_quote,
    old_quote,
    position: change.start(),
  };
  log::debug!("single quote replaced by another quote: {replacement:?}");
  Some(replacement)
}

/// Matches the same quote inserted on both sides of exactly one quote char.
///
/// The two records may arrive in either order. Records are applied one after
/// the other, so when the right-hand insertion comes first both positions
/// refer to the original text, and when the left-hand insertion comes first
/// the second position already accounts for it.
pub fn detect_quote_wrap<T: TextSource + ?Sized>(
  changes: &[ChangeRecord],
  text: &T,
) -> Option<QuoteWrap> {
  let [first, second] = changes else {
    log::trace!("abort - made {} changes", changes.len());
    return None;
  };

  if first.text != second.text {
    log::trace!("abort - inserted texts do not match");
    return None;
  }

  let Some(inserted_quote) = str_as_quote(&first.text) else {
    log::trace!("abort - {:?} is not a quote", first.text);
    return None;
  };

  if !first.is_insertion() || !second.is_insertion() {
    log::trace!("abort - some text was replaced");
    return None;
  }

  let line = first.start().line;
  if second.start().line != line {
    log::trace!("abort - insertion in multiple lines");
    return None;
  }

  let insertion1 = first.start().col;
  let insertion2 = second.start().col;
  let (wrapped_count, opening, closing) = if insertion1 > insertion2 {
    (insertion1 - insertion2, insertion2, insertion1 + 1)
  } else {
    let Some(count) = (insertion2 - insertion1).checked_sub(1) else {
      log::trace!("abort - both quotes inserted at the same position");
      return None;
    };
    (count, insertion1, insertion2)
  };

  if wrapped_count != 1 {
    log::trace!("abort - wrapped {wrapped_count} characters");
    return None;
  }

  let opening = Position::new(line, opening);
  let closing = Position::new(line, closing);
  let wrapped_quote = match text.char_at(opening.translate(1)) {
    Some(ch) if char_is_quote(ch) => ch,
    wrapped => {
      log::trace!("abort - wrapped {wrapped:?} is not a quote");
      return None;
    },
  };

  let wrap = QuoteWrap {
    inserted_quote,
    wrapped_quote,
    opening,
    closing,
  };
  log::debug!("single quote wrapped in quotes: {wrap:?}");
  Some(wrap)
}
