use std::fmt;

use csvrec::io::csv_reader;
use csvrec::{decode, DecodeError, DecodeOptions, Record, RowCause, RowReader, Rows, TextCodec};

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Pair {
    #[csv(rename = "A")]
    a: i64,
    #[csv(rename = "B")]
    b: i64,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Single {
    a: i32,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Words {
    first: String,
    second: String,
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Empty;

fn rows(data: &[&[&str]]) -> Rows<std::vec::IntoIter<Vec<String>>> {
    Rows::new(
        data.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect::<Vec<_>>())
            .collect::<Vec<_>>(),
    )
}

fn decode_all<R: Record + Clone>(
    reader: impl RowReader,
    options: DecodeOptions,
) -> Vec<Result<R, DecodeError>> {
    decode::<R, _>(reader, options).unwrap().collect()
}

fn decode_ok<R: Record + Clone + fmt::Debug>(reader: impl RowReader, options: DecodeOptions) -> Vec<R> {
    decode_all::<R>(reader, options)
        .into_iter()
        .enumerate()
        .map(|(i, step)| step.unwrap_or_else(|e| panic!("record {i} should have no error: {e}")))
        .collect()
}

#[test]
fn empty_input_yields_nothing() {
    assert!(decode_all::<Empty>(rows(&[]), DecodeOptions::default()).is_empty());
    assert!(decode_all::<Single>(rows(&[]), DecodeOptions::default()).is_empty());
    assert!(decode_all::<Pair>(csv_reader("".as_bytes()), DecodeOptions::default()).is_empty());
}

#[test]
fn two_integer_columns() {
    let got: Vec<Pair> = decode_ok(csv_reader("1,2\n3,4\n".as_bytes()), DecodeOptions::default());
    similar_asserts::assert_eq!(got, vec![Pair { a: 1, b: 2 }, Pair { a: 3, b: 4 }]);
}

#[test]
fn string_columns() {
    let got: Vec<Words> = decode_ok(
        csv_reader("foo,bar\nbaz,qux\n".as_bytes()),
        DecodeOptions::default(),
    );
    similar_asserts::assert_eq!(
        got,
        vec![
            Words { first: "foo".into(), second: "bar".into() },
            Words { first: "baz".into(), second: "qux".into() },
        ]
    );
}

#[test]
fn extra_columns_are_ignored_regardless_of_options() {
    let strict: Vec<Single> = decode_ok(rows(&[&["1", "2"]]), DecodeOptions::default());
    assert_eq!(strict, vec![Single { a: 1 }]);

    let tolerant: Vec<Words> = decode_ok(
        rows(&[&["foo", "bar", "baz"]]),
        DecodeOptions::default().allow_missing_trailing_fields(true),
    );
    assert_eq!(tolerant, vec![Words { first: "foo".into(), second: "bar".into() }]);
}

#[test]
fn missing_columns_are_an_error_and_decoding_continues() {
    let steps = decode_all::<Pair>(rows(&[&["1"], &["3", "4"]]), DecodeOptions::default());
    assert_eq!(steps.len(), 2);

    let Err(DecodeError::Row(err)) = &steps[0] else {
        panic!("expected row error, got {:?}", steps[0]);
    };
    assert!(matches!(err.cause, RowCause::ColumnCount { expected: 2, actual: 1 }));
    assert_eq!(err.record, ["1"]);
    assert!(err.to_string().contains("wanted exactly 2 columns but record had 1"));

    assert_eq!(steps[1].as_ref().unwrap(), &Pair { a: 3, b: 4 });
}

#[test]
fn missing_trailing_fields_are_zero_filled() {
    let options = DecodeOptions::default().allow_missing_trailing_fields(true);
    let got: Vec<Pair> = decode_ok(rows(&[&["1"], &["3"]]), options);
    similar_asserts::assert_eq!(got, vec![Pair { a: 1, b: 0 }, Pair { a: 3, b: 0 }]);
}

#[test]
fn zero_fill_does_not_leak_from_previous_row() {
    let options = DecodeOptions::default().allow_missing_trailing_fields(true);
    let got: Vec<Pair> = decode_ok(rows(&[&["1", "2"], &["3"], &[]]), options);
    similar_asserts::assert_eq!(
        got,
        vec![Pair { a: 1, b: 2 }, Pair { a: 3, b: 0 }, Pair { a: 0, b: 0 }]
    );
}

#[test]
fn matching_header_row_is_skipped() {
    let options = DecodeOptions::default().skip_matching_header_row(true);
    let got: Vec<Pair> = decode_ok(csv_reader("A,B\n1,2\n3,4\n".as_bytes()), options);
    similar_asserts::assert_eq!(got, vec![Pair { a: 1, b: 2 }, Pair { a: 3, b: 4 }]);
}

#[test]
fn header_uses_declared_names_not_identifiers() {
    let options = DecodeOptions::default().skip_matching_header_row(true);
    let steps = decode_all::<Pair>(rows(&[&["a", "b"], &["1", "2"]]), options);
    assert_eq!(steps.len(), 2);
    assert!(steps[0].is_err());
}

#[test]
fn non_matching_first_row_is_decoded() {
    let options = DecodeOptions::default().skip_matching_header_row(true);
    let got: Vec<Pair> = decode_ok(rows(&[&["5", "6"], &["7", "8"]]), options);
    assert_eq!(got, vec![Pair { a: 5, b: 6 }, Pair { a: 7, b: 8 }]);
}

#[test]
fn header_only_checked_on_first_row() {
    let options = DecodeOptions::default().skip_matching_header_row(true);
    let steps = decode_all::<Pair>(rows(&[&["1", "2"], &["A", "B"]]), options);
    assert_eq!(steps.len(), 2);
    assert!(steps[0].is_ok());
    assert!(steps[1].is_err());
}

#[test]
fn short_header_matches_on_prefix_when_tolerant() {
    let options = DecodeOptions::default()
        .skip_matching_header_row(true)
        .allow_missing_trailing_fields(true);
    let got: Vec<Pair> = decode_ok(rows(&[&["A"], &["1", "2"]]), options);
    assert_eq!(got, vec![Pair { a: 1, b: 2 }]);
}

#[test]
fn continues_past_errors_by_default() {
    let steps = decode_all::<Pair>(
        rows(&[&["x", "1"], &["1", "2"], &["3"], &["4", "5"]]),
        DecodeOptions::default(),
    );
    let shape: Vec<bool> = steps.iter().map(Result::is_ok).collect();
    assert_eq!(shape, [false, true, false, true]);
    let lines: Vec<usize> = steps
        .iter()
        .filter_map(|s| s.as_ref().err())
        .map(DecodeError::line)
        .collect();
    assert_eq!(lines, [0, 2]);
}

#[test]
fn stop_on_first_error_ends_the_sequence() {
    let options = DecodeOptions::default().stop_on_first_error(true);
    let steps = decode_all::<Pair>(rows(&[&["1", "2"], &["x", "1"], &["3", "4"]]), options);
    assert_eq!(steps.len(), 2);
    assert!(steps[0].is_ok());
    assert!(steps[1].is_err());
}

#[test]
fn field_error_reports_ordinal_text_and_kind() {
    let steps = decode_all::<Pair>(rows(&[&["1", "99999999999999999999"]]), DecodeOptions::default());
    let Err(DecodeError::Row(err)) = &steps[0] else {
        panic!("expected row error");
    };
    assert_eq!(err.ordinal(), Some(1));
    let msg = err.to_string();
    assert!(msg.contains("failed to decode field 1"), "{msg}");
    assert!(msg.contains("99999999999999999999"), "{msg}");
    assert!(msg.contains("i64"), "{msg}");
}

#[test]
fn row_error_serializes_record_and_line() {
    let steps = decode_all::<Pair>(rows(&[&["1", "2"], &["oops"]]), DecodeOptions::default());
    let Err(DecodeError::Row(err)) = &steps[1] else {
        panic!("expected row error");
    };
    let json = serde_json::to_value(err).unwrap();
    assert_eq!(json, serde_json::json!({ "record": ["oops"], "line": 1 }));
}

// ═══════════════════════════════════════════════════════════════
//  Text capability
// ═══════════════════════════════════════════════════════════════

/// Decodes to the same value no matter what the cell says.
#[derive(Debug, Default, Clone, PartialEq)]
struct Sentinel(u8);

impl TextCodec for Sentinel {
    type Error = std::convert::Infallible;

    fn encode_text(&self) -> Result<String, Self::Error> {
        Ok("sentinel".into())
    }

    fn decode_text(_text: &str) -> Result<Self, Self::Error> {
        Ok(Sentinel(42))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Marked {
    mark: Sentinel,
}

#[test]
fn text_capability_is_always_used() {
    let got: Vec<Marked> = decode_ok(
        rows(&[&["not a number"], &["7"], &[""]]),
        DecodeOptions::default(),
    );
    assert_eq!(got, vec![Marked { mark: Sentinel(42) }; 3]);
}

/// Text capability that can fail.
#[derive(Debug, Default, Clone, PartialEq)]
enum Side {
    #[default]
    Buy,
    Sell,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown side {0:?}")]
struct BadSide(String);

impl TextCodec for Side {
    type Error = BadSide;

    fn encode_text(&self) -> Result<String, Self::Error> {
        Ok(match self {
            Side::Buy => "B".into(),
            Side::Sell => "S".into(),
        })
    }

    fn decode_text(text: &str) -> Result<Self, Self::Error> {
        match text {
            "B" => Ok(Side::Buy),
            "S" => Ok(Side::Sell),
            other => Err(BadSide(other.to_string())),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Record)]
struct Order {
    id: u32,
    side: Side,
}

#[test]
fn text_capability_failure_is_a_field_error() {
    let steps = decode_all::<Order>(rows(&[&["1", "S"], &["2", "X"]]), DecodeOptions::default());
    assert_eq!(steps[0].as_ref().unwrap(), &Order { id: 1, side: Side::Sell });
    let Err(DecodeError::Row(err)) = &steps[1] else {
        panic!("expected row error");
    };
    assert_eq!(err.ordinal(), Some(1));
    assert!(err.to_string().contains("unknown side \"X\""));
}

// ═══════════════════════════════════════════════════════════════
//  Read errors
// ═══════════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
#[error("transport broke")]
struct Broken;

/// Fails once at the given position, then keeps serving rows.
struct Flaky {
    rows: std::vec::IntoIter<Vec<String>>,
    fail_at: usize,
    pos: usize,
}

impl RowReader for Flaky {
    type Error = Broken;

    fn read_row(&mut self) -> Result<Option<Vec<String>>, Self::Error> {
        let pos = self.pos;
        self.pos += 1;
        if pos == self.fail_at {
            return Err(Broken);
        }
        Ok(self.rows.next())
    }
}

#[test]
fn read_error_is_a_step_and_decoding_continues() {
    let reader = Flaky {
        rows: vec![vec!["1".to_string(), "2".to_string()]].into_iter(),
        fail_at: 0,
        pos: 0,
    };
    let steps = decode_all::<Pair>(reader, DecodeOptions::default());
    assert_eq!(steps.len(), 2);
    assert!(matches!(steps[0], Err(DecodeError::Read { line: 0, .. })));
    assert_eq!(steps[1].as_ref().unwrap(), &Pair { a: 1, b: 2 });
}

#[test]
fn read_error_ends_the_sequence_when_stopping_on_first_error() {
    let mut reader = Flaky {
        rows: vec![vec!["1".to_string(), "2".to_string()]].into_iter(),
        fail_at: 0,
        pos: 0,
    };
    let options = DecodeOptions::default().stop_on_first_error(true);
    let steps = decode_all::<Pair>(&mut reader, options);
    assert_eq!(steps.len(), 1);
    assert!(matches!(steps[0], Err(DecodeError::Read { line: 0, .. })));
    // The row after the failure was never pulled.
    assert_eq!(reader.pos, 1);
}

#[test]
fn csv_parse_error_surfaces_as_read_error() {
    let steps = decode_all::<Words>(
        csv_reader(&b"\xff\xfe,x\nfoo,bar\n"[..]),
        DecodeOptions::default(),
    );
    assert!(matches!(steps[0], Err(DecodeError::Read { line: 0, .. })));
    assert_eq!(
        steps.last().unwrap().as_ref().unwrap(),
        &Words { first: "foo".into(), second: "bar".into() }
    );
}
