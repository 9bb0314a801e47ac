//! Core domain types and logic: the screening expression engine and the
//! indicator engine. Pure, synchronous, no I/O.

pub mod ohlcv;
pub mod quote;
pub mod field;
pub mod filter;
pub mod filter_lexer;
pub mod filter_parser;
pub mod filter_eval;
pub mod indicator;
pub mod indicator_helpers;
pub mod error;
