//! Screening filter expressions.
//!
//! This module defines the expression tree and the parse-once [`Filter`]:
//! - `CompareOp`: the six comparison operators
//! - `Expr`: literals, field references, comparisons and boolean joins
//! - `Filter`: a parsed expression (or match-all) evaluated against quotes

use crate::domain::error::ParseError;
use crate::domain::filter_eval;
use crate::domain::filter_parser;
use crate::domain::quote::Quote;
use std::fmt;

/// Tolerance used by `=` and `!=`.
pub const EQUALITY_EPSILON: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn from_symbol(symbol: &str) -> Option<CompareOp> {
        match symbol {
            "<" => Some(CompareOp::Lt),
            ">" => Some(CompareOp::Gt),
            "<=" => Some(CompareOp::Le),
            ">=" => Some(CompareOp::Ge),
            "=" => Some(CompareOp::Eq),
            "!=" => Some(CompareOp::Ne),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Lt => "<",
            CompareOp::Gt => ">",
            CompareOp::Le => "<=",
            CompareOp::Ge => ">=",
            CompareOp::Eq => "=",
            CompareOp::Ne => "!=",
        }
    }

    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            CompareOp::Lt => left < right,
            CompareOp::Gt => left > right,
            CompareOp::Le => left <= right,
            CompareOp::Ge => left >= right,
            CompareOp::Eq => (left - right).abs() < EQUALITY_EPSILON,
            CompareOp::Ne => (left - right).abs() >= EQUALITY_EPSILON,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Field(String),
    Comparison {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    pub fn comparison(field: &str, op: CompareOp, value: f64) -> Expr {
        Expr::Comparison {
            op,
            left: Box::new(Expr::Field(field.to_string())),
            right: Box::new(Expr::Number(value)),
        }
    }

    pub fn and(left: Expr, right: Expr) -> Expr {
        Expr::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: Expr, right: Expr) -> Expr {
        Expr::Or(Box::new(left), Box::new(right))
    }

    /// Field names referenced anywhere in the tree, in source order.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Expr::Number(_) => Vec::new(),
            Expr::Field(name) => vec![name.as_str()],
            Expr::Comparison { left, right, .. } => {
                let mut names = left.fields();
                names.extend(right.fields());
                names
            }
            Expr::And(l, r) | Expr::Or(l, r) => {
                let mut names = l.fields();
                names.extend(r.fields());
                names
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(v) => write!(f, "{}", v),
            Expr::Field(name) => write!(f, "{}", name),
            Expr::Comparison { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Expr::And(l, r) => write!(f, "({} and {})", l, r),
            Expr::Or(l, r) => write!(f, "({} or {})", l, r),
        }
    }
}

/// A filter parsed once and evaluated against many quotes. An empty
/// expression matches every quote.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    source: String,
    root: Option<Expr>,
}

impl Filter {
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let root = if source.trim().is_empty() {
            None
        } else {
            Some(filter_parser::parse(source)?)
        };
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    pub fn match_all() -> Self {
        Self {
            source: String::new(),
            root: None,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> Option<&Expr> {
        self.root.as_ref()
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        match &self.root {
            Some(expr) => filter_eval::evaluate(expr, quote),
            None => true,
        }
    }
}

/// Parse `source` and evaluate it against a single quote.
pub fn evaluate(source: &str, quote: &Quote) -> Result<bool, ParseError> {
    Ok(Filter::parse(source)?.matches(quote))
}

/// Quotes passing `filter`, in input order.
pub fn screen<'a>(filter: &Filter, quotes: &'a [Quote]) -> Vec<&'a Quote> {
    quotes.iter().filter(|q| filter.matches(q)).collect()
}
