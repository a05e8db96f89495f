//! Wiring classifiers and executors to a host.
//!
//! A [`Session`] is fed the two host notifications, selection changes and
//! text changes, and owns the only state that outlives an event: the
//! snapshot of the last single selection.

use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

use crate::{
  change::ChangeRecord,
  classify::{
    self,
    Classifier,
  },
  edit::{
    EditError,
    Fix,
  },
  fix,
  selection::{
    Range,
    SelectionSnapshot,
  },
  text::{
    Host,
    TextSource,
  },
};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
  #[error("host rejected the {classifier} fix: {source}")]
  Edit {
    classifier: Classifier,
    #[source]
    source:     EditError,
  },
}

pub type Result<T> = std::result::Result<T, SessionError>;

/// Which classifiers take part in the priority chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Fixers {
  pub enter_whitespace: bool,
  pub quote_wrap:       bool,
  pub quote_replace:    bool,
}

impl Default for Fixers {
  fn default() -> Self {
    Self {
      enter_whitespace: true,
      quote_wrap:       true,
      quote_replace:    true,
    }
  }
}

impl Fixers {
  pub fn is_enabled(&self, classifier: Classifier) -> bool {
    match classifier {
      Classifier::EnterWhitespace => self.enter_whitespace,
      Classifier::QuoteWrap => self.quote_wrap,
      Classifier::QuoteReplace => self.quote_replace,
    }
  }
}

/// A fix that was committed to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
  pub classifier: Classifier,
  pub fix:        Fix,
}

#[derive(Debug, Default)]
pub struct Session {
  fixers:    Fixers,
  selection: Option<SelectionSnapshot>,
}

impl Session {
  pub fn new(fixers: Fixers) -> Self {
    Self {
      fixers,
      selection: None,
    }
  }

  pub fn selection(&self) -> Option<&SelectionSnapshot> {
    self.selection.as_ref()
  }

  /// Retains a snapshot of `ranges` when there is exactly one, and forgets
  /// the previous one otherwise.
  pub fn on_selection_change<T: TextSource + ?Sized>(&mut self, text: &T, ranges: &[Range]) {
    self.selection = SelectionSnapshot::capture(text, ranges);
    log::trace!("selection snapshot: {:?}", self.selection);
  }

  /// Reacts to one change event the host already applied.
  ///
  /// The first enabled classifier that recognizes the event decides the fix.
  /// Its edits are committed through [`Host::apply_edits`]; the selection is
  /// moved only once that succeeded. Returns `Ok(None)` when the event was
  /// left as typed.
  pub fn on_text_change<H: Host + ?Sized>(
    &mut self,
    host: &mut H,
    changes: &[ChangeRecord],
  ) -> Result<Option<Applied>> {
    let fixers = self.fixers;
    let Some(intent) = classify::classify(changes, self.selection.as_ref(), &*host, |classifier| {
      fixers.is_enabled(classifier)
    }) else {
      return Ok(None);
    };

    let classifier = intent.classifier();
    let Some(fix) = fix::plan(&intent, &*host) else {
      log::debug!("{classifier}: nothing to fix");
      return Ok(None);
    };

    if fix.has_edits() {
      host
        .apply_edits(&fix.edits)
        .map_err(|source| SessionError::Edit { classifier, source })?;
    }
    if let Some(selection) = fix.selection {
      host.set_selection(selection);
    }

    log::debug!("{classifier}: applied {} edits", fix.edits.len());
    Ok(Some(Applied { classifier, fix }))
  }
}
