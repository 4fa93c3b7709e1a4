//! BSON value conversion utilities
//!
//! This module provides unified BSON conversion with two strategies:
//! - Extended JSON conversion (relaxed or canonical) for document export
//! - Plain cell text for CSV export, falling back to compact Extended JSON
//!
//! # Design
//!
//! The module uses a strategy pattern with a common trait `BsonConverter`
//! that allows different conversion strategies to be implemented and used
//! interchangeably. Dispatch is a `match` over the `Bson` variants.

mod converter;
mod helpers;
mod strategies;

pub use converter::{BsonConverter, BsonJsonConverter, BsonStringConverter, MAX_NESTING_DEPTH};
pub use strategies::{CellConverter, ExtendedJsonConverter};
