//! Event-script replay.
//!
//! A script is a JSON array of host notifications:
//!
//! ```json
//! [
//!   { "select": [[0, 4, 0, 5]] },
//!   { "change": [{ "range": [0, 4, 0, 5], "text": "\"" }] }
//! ]
//! ```
//!
//! Ranges are `[start_line, start_col, end_line, end_col]`. Records of one
//! change event are applied in order, each against the document the previous
//! ones left behind. After every change the document's selection is reported
//! back to the session, as an editor would after moving the cursor.

use std::{
  fs,
  path::Path,
};

use requote_lib::{
  Tendril,
  change::{
    ChangeEvent,
    ChangeRecord,
  },
  classify::Classifier,
  document::RopeDocument,
  edit::EditError,
  position::Position,
  selection::Range,
  session::{
    Session,
    SessionError,
  },
  text::TextSource,
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplayError {
  #[error("failed to read event script: {0}")]
  Io(#[from] std::io::Error),
  #[error("malformed event script: {0}")]
  Parse(#[from] serde_json::Error),
  #[error("event {index}: {source}")]
  Change {
    index:  usize,
    #[source]
    source: EditError,
  },
  #[error("event {index}: {source}")]
  Session {
    index:  usize,
    #[source]
    source: SessionError,
  },
}

pub type Result<T> = std::result::Result<T, ReplayError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "[usize; 4]")]
pub struct ScriptRange(pub Range);

impl From<[usize; 4]> for ScriptRange {
  fn from([start_line, start_col, end_line, end_col]: [usize; 4]) -> Self {
    Self(Range::new(
      Position::new(start_line, start_col),
      Position::new(end_line, end_col),
    ))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptChange {
  pub range: ScriptRange,
  #[serde(default)]
  pub text:  String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Event {
  Select(Vec<ScriptRange>),
  Change(Vec<ScriptChange>),
}

pub fn parse_script(json: &str) -> Result<Vec<Event>> {
  Ok(serde_json::from_str(json)?)
}

pub fn read_script(path: &Path) -> Result<Vec<Event>> {
  parse_script(&fs::read_to_string(path)?)
}

/// Counts of what a replay did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
  pub events:           usize,
  pub enter_whitespace: usize,
  pub quote_wrap:       usize,
  pub quote_replace:    usize,
}

impl Summary {
  fn record(&mut self, classifier: Classifier) {
    match classifier {
      Classifier::EnterWhitespace => self.enter_whitespace += 1,
      Classifier::QuoteWrap => self.quote_wrap += 1,
      Classifier::QuoteReplace => self.quote_replace += 1,
    }
  }

  pub fn fixes(&self) -> usize {
    self.enter_whitespace + self.quote_wrap + self.quote_replace
  }
}

pub struct Replay {
  doc:     RopeDocument,
  session: Session,
  summary: Summary,
}

impl Replay {
  pub fn new(doc: RopeDocument, session: Session) -> Self {
    Self {
      doc,
      session,
      summary: Summary::default(),
    }
  }

  pub fn document(&self) -> &RopeDocument {
    &self.doc
  }

  pub fn run(&mut self, events: &[Event]) -> Result<Summary> {
    for (index, event) in events.iter().enumerate() {
      self.step(index, event)?;
    }
    Ok(self.summary)
  }

  pub fn step(&mut self, index: usize, event: &Event) -> Result<()> {
    self.summary.events += 1;
    match event {
      Event::Select(ranges) => {
        let ranges: Vec<Range> = ranges.iter().map(|range| range.0).collect();
        self.session.on_selection_change(&self.doc, &ranges);
      },
      Event::Change(changes) => {
        let records = self
          .play_changes(changes)
          .map_err(|source| ReplayError::Change { index, source })?;

        let applied = self
          .session
          .on_text_change(&mut self.doc, &records)
          .map_err(|source| ReplayError::Session { index, source })?;
        if let Some(applied) = applied {
          log::info!("event {index}: applied {} fix", applied.classifier);
          self.summary.record(applied.classifier);
        }

        let selection = self.doc.selection();
        self.session.on_selection_change(&self.doc, &[selection]);
      },
    }
    Ok(())
  }

  /// Applies the host's own records, measuring each replaced span on the
  /// document as it is at that point.
  fn play_changes(
    &mut self,
    changes: &[ScriptChange],
  ) -> std::result::Result<ChangeEvent, EditError> {
    let mut records = ChangeEvent::new();
    for change in changes {
      let range = change.range.0;
      let replaced = self
        .doc
        .slice(range)
        .ok_or(EditError::RangeOutOfBounds { range })?;
      let record = ChangeRecord::new(
        range,
        replaced.chars().count(),
        Tendril::from(change.text.as_str()),
      );
      self.doc.apply_change(&record)?;
      records.push(record);
    }
    Ok(records)
  }
}

#[cfg(test)]
mod test {
  use std::io::Write;

  use requote_lib::session::Fixers;

  use super::*;

  fn replay(text: &str, script: &str) -> (Replay, Summary) {
    let mut replay = Replay::new(RopeDocument::from(text), Session::default());
    let summary = replay.run(&parse_script(script).unwrap()).unwrap();
    (replay, summary)
  }

  #[test]
  fn test_parse_script() {
    let events = parse_script(
      r#"[
        {"select": [[0, 4, 0, 5]]},
        {"change": [{"range": [0, 5, 0, 5], "text": "x"}, {"range": [0, 1, 0, 0]}]}
      ]"#,
    )
    .unwrap();
    assert_eq!(events, [
      Event::Select(vec![ScriptRange(Range::on_line(0, 4, 5))]),
      Event::Change(vec![
        ScriptChange {
          range: ScriptRange(Range::on_line(0, 5, 5)),
          text:  "x".into(),
        },
        ScriptChange {
          range: ScriptRange(Range::on_line(0, 0, 1)),
          text:  String::new(),
        },
      ]),
    ]);
  }

  #[test]
  fn test_parse_rejects_unknown_events() {
    assert!(parse_script(r#"[{"scroll": 3}]"#).is_err());
    assert!(parse_script(r#"[{"change": [{"range": [0, 1]}]}]"#).is_err());
  }

  #[test]
  fn test_replace_scenario() {
    let (replay, summary) = replay(
      "say 'hi' now",
      r#"[
        {"select": [[0, 4, 0, 5]]},
        {"change": [{"range": [0, 4, 0, 5], "text": "\""}]}
      ]"#,
    );
    assert_eq!(replay.document().to_string(), "say \"hi\" now");
    assert_eq!(replay.document().selection(), Range::on_line(0, 4, 5));
    assert_eq!(summary.quote_replace, 1);
    assert_eq!(summary.events, 2);
  }

  #[test]
  fn test_selection_is_fed_back() {
    // The second change relies on the selection left by the first fix.
    let (replay, summary) = replay(
      "say 'hi' now",
      r#"[
        {"select": [[0, 4, 0, 5]]},
        {"change": [{"range": [0, 4, 0, 5], "text": "\""}]},
        {"change": [{"range": [0, 4, 0, 5], "text": "`"}]}
      ]"#,
    );
    assert_eq!(replay.document().to_string(), "say `hi` now");
    assert_eq!(summary.fixes(), 2);
  }

  #[test]
  fn test_wrap_and_enter() {
    let (replay, summary) = replay(
      "it's   \nplain",
      r#"[
        {"select": [[0, 2, 0, 3]]},
        {"change": [
          {"range": [0, 3, 0, 3], "text": "\""},
          {"range": [0, 2, 0, 2], "text": "\""}
        ]},
        {"change": [{"range": [0, 7, 0, 7], "text": "\n"}]}
      ]"#,
    );
    assert_eq!(replay.document().to_string(), "it\"s\n\nplain");
    assert_eq!(summary.quote_wrap, 1);
    assert_eq!(summary.enter_whitespace, 1);
  }

  #[test]
  fn test_out_of_bounds_change() {
    let mut replay = Replay::new(RopeDocument::from("abc"), Session::new(Fixers::default()));
    let events = parse_script(r#"[{"change": [{"range": [4, 0, 4, 0], "text": "x"}]}]"#).unwrap();
    let err = replay.run(&events).unwrap_err();
    assert!(matches!(err, ReplayError::Change {
      index:  0,
      source: EditError::RangeOutOfBounds { .. },
    }));
    assert_eq!(replay.document().to_string(), "abc");
  }

  #[test]
  fn test_read_script_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"[{{"select": []}}]"#).unwrap();
    let events = read_script(file.path()).unwrap();
    assert_eq!(events, [Event::Select(Vec::new())]);
  }
}
