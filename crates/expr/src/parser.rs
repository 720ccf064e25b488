// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pratt parser for the expression language

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::ExprError;
use crate::lexer::tokenize;
use crate::token::Token;
use atkins_core::Value;

/// Parse an expression source string into an AST.
pub fn parse(input: &str) -> Result<Expr, ExprError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_expr(0)?;
    match parser.peek() {
        None => Ok(expr),
        Some(tok) => Err(ExprError::UnexpectedToken(tok.to_string())),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Left binding power per infix operator. `??` binds loosest so defaults
/// apply to the whole boolean expression on its left.
fn binding_power(op: &Token) -> Option<(BinaryOp, u8)> {
    match op {
        Token::Coalesce => Some((BinaryOp::Coalesce, 1)),
        Token::Or => Some((BinaryOp::Or, 2)),
        Token::And => Some((BinaryOp::And, 3)),
        Token::EqEq => Some((BinaryOp::Eq, 4)),
        Token::NotEq => Some((BinaryOp::Ne, 4)),
        Token::Lt => Some((BinaryOp::Lt, 4)),
        Token::Le => Some((BinaryOp::Le, 4)),
        Token::Gt => Some((BinaryOp::Gt, 4)),
        Token::Ge => Some((BinaryOp::Ge, 4)),
        _ => None,
    }
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ExprError> {
        match self.next() {
            Some(ref tok) if tok == expected => Ok(()),
            Some(tok) => Err(ExprError::UnexpectedToken(tok.to_string())),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<Expr, ExprError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            // Postfix dotted access binds tightest.
            if self.peek() == Some(&Token::Dot) {
                self.next();
                match self.next() {
                    Some(Token::Ident(field)) => {
                        lhs = Expr::Access(Box::new(lhs), field);
                    }
                    Some(tok) => return Err(ExprError::UnexpectedToken(tok.to_string())),
                    None => return Err(ExprError::UnexpectedEnd),
                }
                continue;
            }

            let Some((op, bp)) = self.peek().and_then(binding_power) else {
                break;
            };
            if bp < min_bp {
                break;
            }
            self.next();
            let rhs = self.parse_expr(bp + 1)?;
            lhs = Expr::Binary(op, Box::new(lhs), Box::new(rhs));
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Expr, ExprError> {
        match self.next() {
            Some(Token::Bang) => {
                // `!` binds tighter than any binary operator.
                let inner = self.parse_prefix()?;
                let inner = self.parse_postfix(inner)?;
                Ok(Expr::Unary(UnaryOp::Not, Box::new(inner)))
            }
            Some(Token::Ident(name)) => Ok(Expr::Ident(name)),
            Some(Token::Int(n)) => Ok(Expr::Literal(Value::Int(n))),
            Some(Token::Float(x)) => Ok(Expr::Literal(Value::Float(x))),
            Some(Token::Str(s)) => Ok(Expr::Literal(Value::String(s))),
            Some(Token::True) => Ok(Expr::Literal(Value::Bool(true))),
            Some(Token::False) => Ok(Expr::Literal(Value::Bool(false))),
            Some(Token::Null) => Ok(Expr::Literal(Value::Null)),
            Some(Token::LParen) => {
                let inner = self.parse_expr(0)?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(Token::LBracket) => {
                let mut items = Vec::new();
                if self.peek() == Some(&Token::RBracket) {
                    self.next();
                    return Ok(Expr::Array(items));
                }
                loop {
                    items.push(self.parse_expr(0)?);
                    match self.next() {
                        Some(Token::Comma) => continue,
                        Some(Token::RBracket) => break,
                        Some(tok) => return Err(ExprError::UnexpectedToken(tok.to_string())),
                        None => return Err(ExprError::UnexpectedEnd),
                    }
                }
                Ok(Expr::Array(items))
            }
            Some(tok) => Err(ExprError::UnexpectedToken(tok.to_string())),
            None => Err(ExprError::UnexpectedEnd),
        }
    }

    /// Apply any dotted access following a prefix expression, so `!a.ok`
    /// negates the field value rather than the mapping.
    fn parse_postfix(&mut self, mut expr: Expr) -> Result<Expr, ExprError> {
        while self.peek() == Some(&Token::Dot) {
            self.next();
            match self.next() {
                Some(Token::Ident(field)) => {
                    expr = Expr::Access(Box::new(expr), field);
                }
                Some(tok) => return Err(ExprError::UnexpectedToken(tok.to_string())),
                None => return Err(ExprError::UnexpectedEnd),
            }
        }
        Ok(expr)
    }
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
