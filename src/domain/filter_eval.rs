//! Filter evaluation against a quote.
//!
//! # Evaluation Semantics
//!
//! - Comparison: both operands must resolve; an absent field makes the
//!   comparison `false`
//! - `=`/`!=` compare within [`EQUALITY_EPSILON`](crate::domain::filter::EQUALITY_EPSILON)
//! - `And`: short-circuits on first `false`
//! - `Or`: short-circuits on first `true`
//! - A bare literal or field is not a predicate and evaluates to `false`

use crate::domain::field;
use crate::domain::filter::Expr;
use crate::domain::quote::Quote;

pub fn evaluate(expr: &Expr, quote: &Quote) -> bool {
    match expr {
        Expr::Comparison { op, left, right } => {
            match (resolve_operand(left, quote), resolve_operand(right, quote)) {
                (Some(l), Some(r)) => op.apply(l, r),
                _ => false,
            }
        }
        Expr::And(l, r) => evaluate(l, quote) && evaluate(r, quote),
        Expr::Or(l, r) => evaluate(l, quote) || evaluate(r, quote),
        Expr::Number(_) | Expr::Field(_) => false,
    }
}

fn resolve_operand(operand: &Expr, quote: &Quote) -> Option<f64> {
    match operand {
        Expr::Number(v) => Some(*v),
        Expr::Field(name) => field::resolve(quote, name),
        _ => None,
    }
}
