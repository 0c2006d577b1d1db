//! Detection Events
//!
//! An [`Event`] is what remains after one named input value has been run
//! through the filter set: the name, the value, and every filter that matched.
//! Its total impact and its tag set are derived from the filters on first use
//! and kept for the lifetime of the event.
//!
//! # Example
//!
//! ```
//! use ids_event::{Event, Filter};
//!
//! let event = Event::new(
//!     "comment",
//!     "<script>alert(1)</script>",
//!     vec![
//!         Filter::new(1, "", "", ["xss", "html"], 4),
//!         Filter::new(2, "", "", ["html", "csrf"], 3),
//!     ],
//! )
//! .unwrap();
//!
//! assert_eq!(event.impact(), 7);
//! assert_eq!(event.tags(), ["xss", "html", "csrf"]);
//! assert_eq!(event.len(), 2);
//! ```

use serde_json::Value;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::filter::{Filter, FilterError, FilterResult};
use crate::scalar::{NotScalar, Scalar};

/// Error raised when an event cannot be built from its inputs.
#[derive(Debug, thiserror::Error)]
pub enum InvalidArgument {
    /// Event name is not a scalar
    #[error("expected name to be a scalar, {found} given")]
    Name { found: &'static str },
    /// Tested value is not a scalar
    #[error("expected value to be a scalar, {found} given")]
    Value { found: &'static str },
    /// A filter does not expose impact and tags
    #[error("filter at index {index} is not a filter result: {source}")]
    Filter { index: usize, source: FilterError },
}

/// The outcome of testing one named value against a set of filters.
#[derive(Debug, Clone)]
pub struct Event<F = Filter> {
    name: Scalar,
    value: Scalar,
    filters: Vec<F>,
    impact: OnceLock<i64>,
    tags: OnceLock<Vec<String>>,
}

impl<F: FilterResult> Event<F> {
    /// Creates an event from a name, the tested value and the matched filters.
    ///
    /// Filters keep the order they are given in.
    pub fn new<N, V>(
        name: N,
        value: V,
        filters: impl IntoIterator<Item = F>,
    ) -> Result<Self, InvalidArgument>
    where
        N: TryInto<Scalar>,
        N::Error: Into<NotScalar>,
        V: TryInto<Scalar>,
        V::Error: Into<NotScalar>,
    {
        let name = name.try_into().map_err(|e| {
            let found = e.into().found;
            tracing::debug!(found, "rejected event with non-scalar name");
            InvalidArgument::Name { found }
        })?;
        let value = value.try_into().map_err(|e| {
            let found = e.into().found;
            tracing::debug!(%name, found, "rejected event with non-scalar value");
            InvalidArgument::Value { found }
        })?;

        Ok(Self {
            name,
            value,
            filters: filters.into_iter().collect(),
            impact: OnceLock::new(),
            tags: OnceLock::new(),
        })
    }

    /// Returns the event name, usually the key of the filtered field.
    pub fn name(&self) -> &Scalar {
        &self.name
    }

    /// Returns the value the filters were applied to.
    pub fn value(&self) -> &Scalar {
        &self.value
    }

    /// Returns the matched filters in construction order.
    pub fn filters(&self) -> &[F] {
        &self.filters
    }

    /// Returns the summed impact of all filters.
    pub fn impact(&self) -> i64 {
        *self.impact.get_or_init(|| {
            let impact: i64 = self.filters.iter().map(|f| f.impact()).sum();
            tracing::trace!(name = %self.name, impact, "computed event impact");
            impact
        })
    }

    /// Returns the tags of all filters, first occurrence kept, duplicates dropped.
    pub fn tags(&self) -> &[String] {
        self.tags.get_or_init(|| {
            let mut seen = HashSet::new();
            self.filters
                .iter()
                .flat_map(|f| f.tags())
                .filter(|tag| seen.insert(*tag))
                .cloned()
                .collect()
        })
    }

    /// Returns the number of filters.
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Returns true if no filter matched.
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterates over the filters from the start.
    pub fn iter(&self) -> std::slice::Iter<'_, F> {
        self.filters.iter()
    }
}

impl Event<Filter> {
    /// Creates an event from untyped input.
    ///
    /// Checks run in order: name, value, then each filter record. The first
    /// failure is returned; no event is built.
    pub fn from_json(
        name: Value,
        value: Value,
        filters: impl IntoIterator<Item = Value>,
    ) -> Result<Self, InvalidArgument> {
        let mut event = Self::new(name, value, Vec::new())?;
        for (index, record) in filters.into_iter().enumerate() {
            let filter = Filter::try_from(record).map_err(|source| {
                tracing::debug!(name = %event.name, index, error = %source, "rejected filter record");
                InvalidArgument::Filter { index, source }
            })?;
            event.filters.push(filter);
        }
        Ok(event)
    }
}

impl<'a, F: FilterResult> IntoIterator for &'a Event<F> {
    type Item = &'a F;
    type IntoIter = std::slice::Iter<'a, F>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
