//! Sample data fixtures for testing.
//!
//! This module provides ready-made filters and events for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // ids-event = { path = "../ids-event", features = ["test-fixtures"] }
//!
//! use ids_event::fixtures;
//!
//! let filters = fixtures::sample_filters();
//! let events = fixtures::sample_events();
//! ```

use serde::Deserialize;
use serde_json::Value;

use crate::{Event, Filter};

/// Returns sample filter definitions from the fixtures file.
///
/// Contains 6 filters:
/// - 2 html/attribute breaking rules (xss, csrf; impact 4)
/// - 1 embedded php rule (impact 5)
/// - 1 union select rule (sqli; impact 7)
/// - 2 traversal rules (dt; impact 5 and 2)
pub fn sample_filters() -> Vec<Filter> {
    let json = include_str!("../tests/fixtures/sample_filters.json");
    Filter::list_from_json(json).expect("Failed to parse sample_filters.json")
}

/// Returns sample events from the fixtures file.
///
/// Contains 4 events:
/// - `comment`: 2 xss filters, impact 8
/// - `id`: sql injection plus php, impact 12
/// - `file`: traversal with a repeated filter, impact 12
/// - `7`: numeric name, boolean value, no filters
pub fn sample_events() -> Vec<Event> {
    #[derive(Deserialize)]
    struct Sample {
        name: Value,
        value: Value,
        filters: Vec<i64>,
    }

    let filters = sample_filters();
    let json = include_str!("../tests/fixtures/sample_events.json");
    let samples: Vec<Sample> =
        serde_json::from_str(json).expect("Failed to parse sample_events.json");

    samples
        .into_iter()
        .map(|sample| {
            let matched: Vec<Filter> = sample
                .filters
                .iter()
                .map(|id| {
                    filters
                        .iter()
                        .find(|f| f.id == *id)
                        .cloned()
                        .unwrap_or_else(|| panic!("No sample filter with id {}", id))
                })
                .collect();
            Event::new(sample.name, sample.value, matched)
                .unwrap_or_else(|e| panic!("Invalid sample event: {}", e))
        })
        .collect()
}
