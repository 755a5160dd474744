//! Utilities module aggregator exposing console formatting helpers.

pub mod formatting;
