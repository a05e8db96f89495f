//! Turning a recognized [`Intent`] into the edit that fixes it.
//!
//! Executors only read the document; they describe the correction as a
//! [`Fix`] and leave committing it to the session. Whenever the expected
//! structure is not there (no paired quote, no whitespace to trim) they
//! return `None` and the host's own edit stands as typed.
//!
//! All positions refer to the document *after* the change that was
//! classified.

use std::{
  borrow::Cow,
  iter::once,
};

use requote_core::{
  chars::{
    leading_whitespace_len,
    trailing_whitespace_len,
  },
  line_ending::split_leading_newline,
};

use crate::{
  change::ChangeRecord,
  classify::{
    Intent,
    QuoteReplace,
    QuoteWrap,
  },
  edit::{
    Edit,
    EditBatch,
    Fix,
  },
  selection::Range,
  string_literal::{
    extract_string_literal_text,
    find_paired_wrapping_quote,
    string_literal_range,
    transform_quote_escaping,
    with_char_at,
  },
  text::TextSource,
};

pub fn plan<T: TextSource + ?Sized>(intent: &Intent, text: &T) -> Option<Fix> {
  match intent {
    Intent::EnterWhitespace(change) => erase_touching_whitespace(change, text),
    Intent::QuoteWrap(wrap) => replace_wrapped_quote(wrap, text),
    Intent::QuoteReplace(replacement) => replace_paired_quote(replacement, text),
  }
}

/// Trims whitespace left touching the cursor by an Enter key press: the
/// trailing whitespace of the line that was split, and whitespace after the
/// auto-indent on the new line.
pub fn erase_touching_whitespace<T: TextSource + ?Sized>(
  change: &ChangeRecord,
  text: &T,
) -> Option<Fix> {
  let (_, indent) = split_leading_newline(&change.text)?;
  let indent_len = indent.chars().count();

  let old_line_idx = change.start().line;
  let new_line_idx = old_line_idx + 1;
  let old_line = text.line(old_line_idx)?;
  let new_line = text.line(new_line_idx)?;

  let mut edits = EditBatch::new();

  let trailing = trailing_whitespace_len(&old_line);
  if trailing > 0 {
    let len = old_line.chars().count();
    edits.push(Edit::delete(Range::on_line(
      old_line_idx,
      len - trailing,
      len,
    )));
    log::debug!("remove {trailing} characters from old line");
  }

  let after_indent: String = new_line.chars().skip(indent_len).collect();
  let leading = leading_whitespace_len(&after_indent);
  if leading > 0 {
    edits.push(Edit::delete(Range::on_line(
      new_line_idx,
      indent_len,
      indent_len + leading,
    )));
    log::debug!("remove {leading} characters from new line");
  }

  if edits.is_empty() {
    log::trace!("nothing to do - no touching whitespace");
    return None;
  }

  Some(Fix {
    edits,
    selection: None,
  })
}

/// Re-quotes the whole literal after one of its boundary quotes was replaced
/// with a different quote, re-escaping the body for the new quote.
pub fn replace_paired_quote<T: TextSource + ?Sized>(
  replacement: &QuoteReplace,
  text: &T,
) -> Option<Fix> {
  let QuoteReplace {
    new_quote,
    old_quote,
    position,
  } = *replacement;

  let line = text.line(position.line)?;
  let original_line = with_char_at(&line, position.col, old_quote)?;

  let Some(paired) = find_paired_wrapping_quote(&original_line, position.col) else {
    log::debug!("nothing to do - paired quote not found");
    return None;
  };

  let body = extract_string_literal_text(&original_line, position.col, paired);
  let fixed = transform_quote_escaping(body, new_quote);
  log::debug!("transforming {old_quote}{body}{old_quote} to {new_quote}{fixed}{new_quote}");

  // Replacing the closing quote moves it by however much the body grew.
  let shift = if paired < position.col {
    len_delta(body, &fixed)
  } else {
    0
  };

  let range = string_literal_range(position.line, position.col, paired);
  let edit = Edit::replace(range, format!("{new_quote}{fixed}{new_quote}"));
  Some(Fix::new([edit]).with_selection(Range::single_char(position.translate(shift))))
}

/// Handles a quote that the host wrapped in the typed quote instead of
/// replacing it, e.g. `'` turning into `"'"`.
///
/// The wrap always collapses to a single typed quote. If the wrapped quote
/// bounded a literal, the literal is re-quoted with the typed quote as well.
pub fn replace_wrapped_quote<T: TextSource + ?Sized>(wrap: &QuoteWrap, text: &T) -> Option<Fix> {
  let QuoteWrap {
    inserted_quote: quote,
    wrapped_quote: wrapped,
    opening,
    closing,
  } = *wrap;

  let line_idx = opening.line;
  let line = text.line(line_idx)?;
  let original_line: String = line
    .chars()
    .take(opening.col)
    .chain(once(wrapped))
    .chain(line.chars().skip(closing.col + 1))
    .collect();

  let wrap_range = Range::new(opening, closing.translate(1));
  let selection = Range::single_char(opening);

  let Some(paired) = find_paired_wrapping_quote(&original_line, opening.col) else {
    log::debug!("isolated quote - collapsing wrap into {quote}");
    let edit = Edit::replace(wrap_range, String::from(quote));
    return Some(Fix::new([edit]).with_selection(selection));
  };

  // The partner sits after the wrap when the wrapped quote opened the
  // literal. Offsets past the wrap grow by the two inserted quotes.
  let paired_is_closing = paired > opening.col;
  let body = extract_string_literal_text(&original_line, opening.col, paired);

  match transform_quote_escaping(body, quote) {
    Cow::Owned(fixed) => {
      log::debug!("transforming {wrapped}{body}{wrapped} to {quote}{fixed}{quote}");
      let (start, end, shift) = if paired_is_closing {
        (opening.col, paired + 3, 0)
      } else {
        (paired, closing.col + 1, len_delta(body, &fixed))
      };
      let edit = Edit::replace(
        Range::on_line(line_idx, start, end),
        format!("{quote}{fixed}{quote}"),
      );
      Some(Fix::new([edit]).with_selection(Range::single_char(opening.translate(shift))))
    },
    Cow::Borrowed(_) => {
      // Collapsing the wrap alone would leave the old partner quote unmatched.
      log::debug!("body needs no escaping - swapping {wrapped} boundaries to {quote}");
      let partner = if paired_is_closing { paired + 2 } else { paired };
      let edits = [
        Edit::replace(wrap_range, String::from(quote)),
        Edit::replace(
          Range::on_line(line_idx, partner, partner + 1),
          String::from(quote),
        ),
      ];
      Some(Fix::new(edits).with_selection(selection))
    },
  }
}

fn len_delta(before: &str, after: &str) -> isize {
  after.chars().count() as isize - before.chars().count() as isize
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::{
    document::RopeDocument,
    position::Position,
  };

  fn apply(doc: &str, fix: &Fix) -> String {
    let mut doc = RopeDocument::from(doc);
    doc.apply(&fix.edits).unwrap();
    doc.to_string()
  }

  #[test]
  fn test_enter_trims_both_sides() {
    let doc = "end of line   \n      tail";
    let change = ChangeRecord::insert(Position::new(0, 14), "\n    ");
    let fix = erase_touching_whitespace(&change, &RopeDocument::from(doc)).unwrap();
    assert_eq!(
      fix.edits.as_slice(),
      &[
        Edit::delete(Range::on_line(0, 11, 14)),
        Edit::delete(Range::on_line(1, 4, 6)),
      ]
    );
    assert_eq!(fix.selection, None);
    assert_eq!(apply(doc, &fix), "end of line\n    tail");
  }

  #[test]
  fn test_enter_trailing_only() {
    let doc = "end of line   \n    ";
    let change = ChangeRecord::insert(Position::new(0, 14), "\n    ");
    let fix = erase_touching_whitespace(&change, &RopeDocument::from(doc)).unwrap();
    assert_eq!(apply(doc, &fix), "end of line\n    ");
  }

  #[test]
  fn test_enter_leading_only() {
    // Enter pressed between `foo` and `  bar`.
    let doc = "foo\n  bar";
    let change = ChangeRecord::insert(Position::new(0, 3), "\n");
    let fix = erase_touching_whitespace(&change, &RopeDocument::from(doc)).unwrap();
    assert_eq!(apply(doc, &fix), "foo\nbar");
  }

  #[test]
  fn test_enter_nothing_to_trim() {
    let doc = "foo\n    bar";
    let change = ChangeRecord::insert(Position::new(0, 3), "\n    ");
    assert_eq!(
      erase_touching_whitespace(&change, &RopeDocument::from(doc)),
      None
    );
  }

  #[test]
  fn test_enter_crlf() {
    let doc = "foo  \r\n\t\t  bar";
    let change = ChangeRecord::insert(Position::new(0, 5), "\r\n\t\t");
    let fix = erase_touching_whitespace(&change, &RopeDocument::from(doc)).unwrap();
    assert_eq!(apply(doc, &fix), "foo\r\n\t\tbar");
  }

  #[test]
  fn test_replace_opening_quote() {
    let doc = "say \"hi' now";
    let replacement = QuoteReplace {
      new_quote: '"',
      old_quote: '\'',
      position:  Position::new(0, 4),
    };
    let fix = replace_paired_quote(&replacement, &RopeDocument::from(doc)).unwrap();
    assert_eq!(apply(doc, &fix), "say \"hi\" now");
    assert_eq!(fix.selection, Some(Range::on_line(0, 4, 5)));
  }

  #[test]
  fn test_replace_reescapes_body() {
    // `"a\"b"` with its opening quote turned into a backtick.
    let doc = r#"x = `a\"b""#;
    let replacement = QuoteReplace {
      new_quote: '`',
      old_quote: '"',
      position:  Position::new(0, 4),
    };
    let fix = replace_paired_quote(&replacement, &RopeDocument::from(doc)).unwrap();
    assert_eq!(apply(doc, &fix), "x = `a\"b`");
    assert_eq!(fix.selection, Some(Range::on_line(0, 4, 5)));
  }

  #[test]
  fn test_replace_closing_quote_tracks_shift() {
    // `"it's"` with its closing quote turned into `'`.
    let doc = "f(\"it's')";
    let replacement = QuoteReplace {
      new_quote: '\'',
      old_quote: '"',
      position:  Position::new(0, 7),
    };
    let fix = replace_paired_quote(&replacement, &RopeDocument::from(doc)).unwrap();
    let fixed = apply(doc, &fix);
    assert_eq!(fixed, r"f('it\'s')");
    assert_eq!(fix.selection, Some(Range::on_line(0, 8, 9)));
    assert_eq!(fixed.chars().nth(8), Some('\''));
  }

  #[test]
  fn test_replace_without_pair_is_noop() {
    let doc = "it\"s";
    let replacement = QuoteReplace {
      new_quote: '"',
      old_quote: '\'',
      position:  Position::new(0, 2),
    };
    assert_eq!(
      replace_paired_quote(&replacement, &RopeDocument::from(doc)),
      None
    );
  }

  #[test]
  fn test_wrap_isolated_collapses() {
    let doc = "it\"'\"s plain";
    let wrap = QuoteWrap {
      inserted_quote: '"',
      wrapped_quote:  '\'',
      opening:        Position::new(0, 2),
      closing:        Position::new(0, 4),
    };
    let fix = replace_wrapped_quote(&wrap, &RopeDocument::from(doc)).unwrap();
    assert_eq!(apply(doc, &fix), "it\"s plain");
    assert_eq!(fix.selection, Some(Range::on_line(0, 2, 3)));
  }

  #[test]
  fn test_wrap_opening_quote_reescapes() {
    let doc = "x = \"'\"it\"s'";
    let wrap = QuoteWrap {
      inserted_quote: '"',
      wrapped_quote:  '\'',
      opening:        Position::new(0, 4),
      closing:        Position::new(0, 6),
    };
    let fix = replace_wrapped_quote(&wrap, &RopeDocument::from(doc)).unwrap();
    assert_eq!(apply(doc, &fix), r#"x = "it\"s""#);
    assert_eq!(fix.selection, Some(Range::on_line(0, 4, 5)));
  }

  #[test]
  fn test_wrap_closing_quote_reescapes() {
    // `'it"s'` with its closing quote wrapped in `"`.
    let doc = "x = 'it\"s\"'\"";
    let wrap = QuoteWrap {
      inserted_quote: '"',
      wrapped_quote:  '\'',
      opening:        Position::new(0, 9),
      closing:        Position::new(0, 11),
    };
    let fix = replace_wrapped_quote(&wrap, &RopeDocument::from(doc)).unwrap();
    let fixed = apply(doc, &fix);
    assert_eq!(fixed, r#"x = "it\"s""#);
    assert_eq!(fix.selection, Some(Range::on_line(0, 10, 11)));
    assert_eq!(fixed.chars().nth(10), Some('"'));
  }

  #[test]
  fn test_wrap_without_escaping_swaps_boundaries() {
    let doc = "say \"'\"hi' now";
    let wrap = QuoteWrap {
      inserted_quote: '"',
      wrapped_quote:  '\'',
      opening:        Position::new(0, 4),
      closing:        Position::new(0, 6),
    };
    let fix = replace_wrapped_quote(&wrap, &RopeDocument::from(doc)).unwrap();
    assert_eq!(fix.edits.len(), 2);
    assert_eq!(apply(doc, &fix), "say \"hi\" now");
    assert_eq!(fix.selection, Some(Range::on_line(0, 4, 5)));
  }

  #[test]
  fn test_wrap_closing_without_escaping() {
    let doc = "say 'hi\"'\" now";
    let wrap = QuoteWrap {
      inserted_quote: '"',
      wrapped_quote:  '\'',
      opening:        Position::new(0, 7),
      closing:        Position::new(0, 9),
    };
    let fix = replace_wrapped_quote(&wrap, &RopeDocument::from(doc)).unwrap();
    assert_eq!(apply(doc, &fix), "say \"hi\" now");
    assert_eq!(fix.selection, Some(Range::on_line(0, 7, 8)));
  }

  #[test]
  fn test_plan_dispatches() {
    let doc = RopeDocument::from("say \"hi' now");
    let intent = Intent::QuoteReplace(QuoteReplace {
      new_quote: '"',
      old_quote: '\'',
      position:  Position::new(0, 4),
    });
    assert!(plan(&intent, &doc).is_some());

    let intent = Intent::EnterWhitespace(ChangeRecord::insert(Position::new(0, 2), "\n"));
    assert_eq!(plan(&intent, &doc), None);
  }
}
