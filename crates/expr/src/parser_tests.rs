// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn coalesce_binds_loosest() {
    // a || b ?? c  parses as  (a || b) ?? c
    let expr = parse("a || b ?? c").unwrap();
    assert!(matches!(expr, Expr::Binary(BinaryOp::Coalesce, _, _)));
}

#[test]
fn and_binds_tighter_than_or() {
    // a || b && c  parses as  a || (b && c)
    let Expr::Binary(BinaryOp::Or, _, rhs) = parse("a || b && c").unwrap() else {
        panic!("expected ||");
    };
    assert!(matches!(*rhs, Expr::Binary(BinaryOp::And, _, _)));
}

#[test]
fn comparison_binds_tighter_than_and() {
    // a == 1 && b == 2  groups each comparison first
    let Expr::Binary(BinaryOp::And, lhs, rhs) = parse("a == 1 && b == 2").unwrap() else {
        panic!("expected &&");
    };
    assert!(matches!(*lhs, Expr::Binary(BinaryOp::Eq, _, _)));
    assert!(matches!(*rhs, Expr::Binary(BinaryOp::Eq, _, _)));
}

#[test]
fn dotted_access_chains() {
    let expr = parse("user.address.city").unwrap();
    let Expr::Access(base, city) = expr else {
        panic!("expected access");
    };
    assert_eq!(city, "city");
    assert!(matches!(*base, Expr::Access(_, _)));
}

#[test]
fn bang_negates_the_accessed_field() {
    // !a.ok  parses as  !(a.ok)
    let Expr::Unary(UnaryOp::Not, inner) = parse("!a.ok").unwrap() else {
        panic!("expected !");
    };
    assert!(matches!(*inner, Expr::Access(_, _)));
}

#[test]
fn parentheses_group() {
    // (a || b) && c
    let Expr::Binary(BinaryOp::And, lhs, _) = parse("(a || b) && c").unwrap() else {
        panic!("expected &&");
    };
    assert!(matches!(*lhs, Expr::Binary(BinaryOp::Or, _, _)));
}

#[test]
fn array_literals() {
    let expr = parse("[\"a\", \"b\"]").unwrap();
    let Expr::Array(items) = expr else {
        panic!("expected array");
    };
    assert_eq!(items.len(), 2);
}

#[test]
fn empty_array() {
    assert_eq!(parse("[]").unwrap(), Expr::Array(vec![]));
}

#[yare::parameterized(
    dangling_op     = { "a ==" },
    missing_rparen  = { "(a || b" },
    missing_rbracket = { "[1, 2" },
    trailing_tokens = { "a b" },
    dot_without_field = { "a." },
)]
fn rejects_malformed(input: &str) {
    assert!(parse(input).is_err());
}
