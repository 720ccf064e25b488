// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::token::Token;

#[test]
fn identifiers_and_keywords() {
    let tokens = tokenize("user_name true false null").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Ident("user_name".to_string()),
            Token::True,
            Token::False,
            Token::Null,
        ]
    );
}

#[test]
fn numbers() {
    assert_eq!(tokenize("42").unwrap(), vec![Token::Int(42)]);
    assert_eq!(tokenize("3.25").unwrap(), vec![Token::Float(3.25)]);
}

#[test]
fn dot_after_int_is_access_not_float() {
    let tokens = tokenize("a.b").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Ident("a".to_string()),
            Token::Dot,
            Token::Ident("b".to_string()),
        ]
    );
}

#[yare::parameterized(
    single_quoted = { "'hi'", "hi" },
    double_quoted = { "\"hi\"", "hi" },
    escaped_quote = { r#"'it\'s'"#, "it's" },
    newline_escape = { r#""a\nb""#, "a\nb" },
)]
fn strings(input: &str, expected: &str) {
    assert_eq!(
        tokenize(input).unwrap(),
        vec![Token::Str(expected.to_string())]
    );
}

#[test]
fn operators() {
    let tokens = tokenize("?? || && == != < <= > >= !").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::Coalesce,
            Token::Or,
            Token::And,
            Token::EqEq,
            Token::NotEq,
            Token::Lt,
            Token::Le,
            Token::Gt,
            Token::Ge,
            Token::Bang,
        ]
    );
}

#[test]
fn brackets_and_commas() {
    let tokens = tokenize("[\"a\", \"b\"]").unwrap();
    assert_eq!(
        tokens,
        vec![
            Token::LBracket,
            Token::Str("a".to_string()),
            Token::Comma,
            Token::Str("b".to_string()),
            Token::RBracket,
        ]
    );
}

#[yare::parameterized(
    lone_question = { "a ? b" },
    lone_pipe     = { "a | b" },
    lone_amp      = { "a & b" },
    lone_equals   = { "a = b" },
)]
fn rejects_partial_operators(input: &str) {
    assert!(matches!(
        tokenize(input),
        Err(ExprError::UnexpectedChar { .. })
    ));
}

#[test]
fn rejects_unterminated_string() {
    assert_eq!(
        tokenize("'oops"),
        Err(ExprError::UnterminatedString { pos: 0 })
    );
}
