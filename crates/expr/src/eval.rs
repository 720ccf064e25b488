// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Expression evaluation against a variable scope

use crate::ast::{BinaryOp, Expr, UnaryOp};
use crate::error::ExprError;
use crate::parser::parse;
use atkins_core::{Scope, Value};

/// Evaluates parsed expressions against a [`Scope`].
///
/// In allow-undefined mode (used by `if:` guards and interpolation) an
/// unbound identifier evaluates to null instead of erroring, so authors can
/// reference variables that only exist in some invocations.
pub struct Evaluator<'a> {
    scope: &'a Scope,
    allow_undefined: bool,
}

/// Parse and evaluate in one call.
pub fn eval_str(input: &str, scope: &Scope, allow_undefined: bool) -> Result<Value, ExprError> {
    let expr = parse(input)?;
    Evaluator::new(scope, allow_undefined).eval(&expr)
}

/// Evaluate an `if:` guard to a boolean with allow-undefined semantics.
pub fn eval_condition(input: &str, scope: &Scope) -> Result<bool, ExprError> {
    Ok(eval_str(input, scope, true)?.truthy())
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Int(_) | Value::Float(_) => "number",
        Value::String(_) => "string",
        Value::Seq(_) => "sequence",
        Value::Map(_) => "mapping",
    }
}

impl<'a> Evaluator<'a> {
    pub fn new(scope: &'a Scope, allow_undefined: bool) -> Self {
        Self {
            scope,
            allow_undefined,
        }
    }

    pub fn eval(&self, expr: &Expr) -> Result<Value, ExprError> {
        match expr {
            Expr::Literal(v) => Ok(v.clone()),
            Expr::Ident(name) => match self.scope.get(name) {
                Some(v) => Ok(v),
                None if self.allow_undefined => Ok(Value::Null),
                None => Err(ExprError::Undefined(name.clone())),
            },
            Expr::Access(base, field) => {
                let base = self.eval(base)?;
                match &base {
                    Value::Map(map) => Ok(map.get(field).cloned().unwrap_or(Value::Null)),
                    Value::Null if self.allow_undefined => Ok(Value::Null),
                    other => {
                        if self.allow_undefined {
                            Ok(Value::Null)
                        } else {
                            Err(ExprError::BadAccess {
                                field: field.clone(),
                                kind: kind(other),
                            })
                        }
                    }
                }
            }
            Expr::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval(item)?);
                }
                Ok(Value::Seq(out))
            }
            Expr::Unary(UnaryOp::Not, inner) => Ok(Value::Bool(!self.eval(inner)?.truthy())),
            Expr::Binary(op, lhs, rhs) => self.eval_binary(*op, lhs, rhs),
        }
    }

    fn eval_binary(&self, op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Result<Value, ExprError> {
        match op {
            BinaryOp::Coalesce => {
                // Defaulting keys off the left side's nil-ness only; an
                // unbound identifier counts as nil even in strict mode.
                let left = match self.eval(lhs) {
                    Ok(v) => v,
                    Err(ExprError::Undefined(_)) => Value::Null,
                    Err(e) => return Err(e),
                };
                if left.is_null() {
                    self.eval(rhs)
                } else {
                    Ok(left)
                }
            }
            BinaryOp::Or => {
                let left = self.eval(lhs)?;
                if left.truthy() {
                    Ok(Value::Bool(true))
                } else {
                    Ok(Value::Bool(self.eval(rhs)?.truthy()))
                }
            }
            BinaryOp::And => {
                let left = self.eval(lhs)?;
                if !left.truthy() {
                    Ok(Value::Bool(false))
                } else {
                    Ok(Value::Bool(self.eval(rhs)?.truthy()))
                }
            }
            BinaryOp::Eq => Ok(Value::Bool(values_equal(&self.eval(lhs)?, &self.eval(rhs)?))),
            BinaryOp::Ne => Ok(Value::Bool(!values_equal(
                &self.eval(lhs)?,
                &self.eval(rhs)?,
            ))),
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let left = self.eval(lhs)?;
                let right = self.eval(rhs)?;
                let ordering = compare(&left, &right)?;
                Ok(Value::Bool(match op {
                    BinaryOp::Lt => ordering.is_lt(),
                    BinaryOp::Le => ordering.is_le(),
                    BinaryOp::Gt => ordering.is_gt(),
                    _ => ordering.is_ge(),
                }))
            }
        }
    }
}

/// Equality with numeric cross-coercion: `1 == 1.0` holds.
fn values_equal(left: &Value, right: &Value) -> bool {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return a == b;
    }
    left == right
}

fn compare(left: &Value, right: &Value) -> Result<std::cmp::Ordering, ExprError> {
    if let (Some(a), Some(b)) = (left.as_number(), right.as_number()) {
        return a
            .partial_cmp(&b)
            .ok_or(ExprError::BadComparison {
                left: kind(left),
                right: kind(right),
            });
    }
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Ok(a.cmp(b));
    }
    Err(ExprError::BadComparison {
        left: kind(left),
        right: kind(right),
    })
}

#[cfg(test)]
#[path = "eval_tests.rs"]
mod tests;
