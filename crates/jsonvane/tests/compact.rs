#![allow(missing_docs)]

mod common;

use common::init_tracing;
use jsonvane::{CompactOptions, Error, SyntaxError, compact, compact_with};
use rstest::rstest;

fn compacted(src: &str, escape: bool) -> jsonvane::Result<String> {
    let mut out = Vec::new();
    compact(&mut out, src.as_bytes(), escape)?;
    Ok(String::from_utf8(out).expect("compact output is UTF-8 for UTF-8 input"))
}

#[test]
fn removes_insignificant_whitespace() {
    init_tracing();
    assert_eq!(
        compacted(r#"{ "a" : 1 , "b" : [ true , null ] }"#, false).unwrap(),
        r#"{"a":1,"b":[true,null]}"#
    );
    let pretty = serde_json::to_string_pretty(&serde_json::json!({
        "name": "x y",
        "list": [1.5, -2, {"nested": {}}, []],
        "s": "tab\there",
    }))
    .unwrap();
    insta::assert_snapshot!(
        compacted(&pretty, false).unwrap(),
        @r#"{"name":"x y","list":[1.5,-2,{"nested":{}},[]],"s":"tab\there"}"#
    );
}

#[test]
fn escapes_script_tags_only_on_request() {
    let src = r#"{"html":"<script>alert(1)</script>","amp":"a&b"}"#;
    insta::assert_snapshot!(
        compacted(src, true).unwrap(),
        @r#"{"html":"\u003cscript\u003ealert(1)\u003c/script\u003e","amp":"a\u0026b"}"#
    );
    assert_eq!(compacted(src, false).unwrap(), src);
}

#[test]
fn escapes_line_and_paragraph_separators() {
    let src = "[\"a\u{2028}b\", \"\u{2029}\", \"\u{2027}\u{202A}\"]";
    let out = compacted(src, true).unwrap();
    assert_eq!(out, "[\"a\\u2028b\",\"\\u2029\",\"\u{2027}\u{202A}\"]");
    assert!(!compacted(src, false).unwrap().contains('\\'));
}

#[test]
fn html_safe_output_still_means_the_same() {
    let src = r#"{"k<>":["&", "\u003c", "\n"]}"#;
    let safe = compacted(src, true).unwrap();
    let a: serde_json::Value = serde_json::from_str(src).unwrap();
    let b: serde_json::Value = serde_json::from_str(&safe).unwrap();
    assert_eq!(a, b);
}

#[rstest]
#[case::truncated_literal("[tru", 4)]
#[case::wrong_literal("[trux]", 4)]
#[case::bare_minus("-", 1)]
#[case::leading_zero("[01]", 2)]
#[case::missing_exponent("1e", 2)]
#[case::missing_fraction("1.e5", 2)]
#[case::unclosed_object(r#"{"a":1"#, 6)]
#[case::bad_key("{1:2}", 1)]
#[case::mismatched_close("[1}", 2)]
#[case::control_in_string("\"a\nb\"", 2)]
#[case::bad_escape(r#""\q""#, 2)]
#[case::empty("   ", 3)]
#[case::overflowing_number("1e400", 0)]
#[case::overflowing_negative_number("[ -1e400]", 2)]
fn errors_carry_the_exact_offset(#[case] src: &str, #[case] offset: usize) {
    let err = compacted(src, false).unwrap_err();
    assert_eq!(err.offset(), Some(offset), "{err}");
}

#[test]
fn numbers_must_fit_a_double() {
    let err = compacted(r#"{"n": -1e400}"#, false).unwrap_err();
    insta::assert_snapshot!(err, @"syntax error at offset 6: number -1e400 is out of range");
    assert_eq!(compacted("[1e308, 1e-400]", false).unwrap(), "[1e308,1e-400]");
}

#[test]
fn truncation_is_distinguished_from_bad_input() {
    assert!(compacted(r#"{"a":[1,2"#, false).unwrap_err().is_eof());
    assert!(!compacted(r#"{"a":[1,2}"#, false).unwrap_err().is_eof());
}

#[test]
fn trailing_values_are_rejected() {
    let err = compacted("1 2", false).unwrap_err();
    assert!(matches!(
        err,
        Error::Syntax {
            source: SyntaxError::TrailingData(b'2'),
            offset: 2
        }
    ));
    assert_eq!(compacted("1 \n", false).unwrap(), "1");
}

#[test]
fn appends_to_existing_output() {
    let mut out = b"[".to_vec();
    compact(&mut out, b" 1 ", false).unwrap();
    out.push(b',');
    compact(&mut out, b" { } ", false).unwrap();
    assert_eq!(out, b"[1,{}");
}

#[test]
fn options_bound_depth() {
    let options = CompactOptions {
        escape_html: true,
        max_depth: 1,
    };
    let mut out = Vec::new();
    compact_with(&mut out, br#"["<"]"#, &options).unwrap();
    assert_eq!(out, br#"["\u003c"]"#);
    let err = compact_with(&mut out, b"[[]]", &options).unwrap_err();
    assert!(matches!(err, Error::ExceededMaxDepth { byte: b'[', offset: 1 }));
}
