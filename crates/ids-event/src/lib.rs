//! Detection event types for the intrusion detection pipeline.
//!
//! This crate holds the result of running one named input value through the
//! filter set. It does not decide whether a filter matches; rule engines hand
//! it filters that already did.

pub mod event;
pub mod filter;
pub mod scalar;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export event types
pub use event::{Event, InvalidArgument};

// Re-export filter types
pub use filter::{Filter, FilterError, FilterResult};

// Re-export scalar types
pub use scalar::{NotScalar, Scalar};
