//! Detection reports: the events raised while filtering one request.
//!
//! A [`Report`] sits on top of `ids-event`. Each input field that tripped at
//! least one filter becomes an [`Event`]; the report collects them by name and
//! sums their impact so callers can decide how to react.
//!
//! # Modules
//!
//! - [`config`]: TOML-configured impact thresholds
//!
//! # Example
//!
//! ```
//! use ids_event::{Event, Filter};
//! use ids_report::{Report, Severity, Thresholds};
//!
//! let mut report = Report::new();
//! report.add_event(Event::new("q", "<script>", vec![Filter::new(1, "", "", ["xss"], 4)]).unwrap());
//!
//! assert_eq!(report.impact(), 4);
//! assert_eq!(report.severity(&Thresholds::default()), Severity::Log);
//! ```

pub mod config;

// Re-export config types
pub use config::{ConfigError, ReportConfig, Thresholds};

use ids_event::{Event, Filter, FilterResult, Scalar};
use std::collections::HashSet;
use std::fmt;
use std::sync::OnceLock;

/// How strongly a request should be reacted to, by total impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Below every threshold
    None,
    Log,
    Mail,
    Warn,
    Kill,
}

impl Severity {
    /// Classifies an impact against the thresholds; the highest level met wins.
    pub fn classify(impact: i64, thresholds: &Thresholds) -> Self {
        if impact >= thresholds.kill {
            Severity::Kill
        } else if impact >= thresholds.warn {
            Severity::Warn
        } else if impact >= thresholds.mail {
            Severity::Mail
        } else if impact >= thresholds.log {
            Severity::Log
        } else {
            Severity::None
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::None => write!(f, "none"),
            Severity::Log => write!(f, "log"),
            Severity::Mail => write!(f, "mail"),
            Severity::Warn => write!(f, "warn"),
            Severity::Kill => write!(f, "kill"),
        }
    }
}

/// Events collected while filtering one request, keyed by event name.
#[derive(Debug, Clone)]
pub struct Report<F = Filter> {
    /// Events in insertion order
    events: Vec<Event<F>>,
    /// Summed impact, reset when events change
    impact: OnceLock<i64>,
    /// Deduplicated tags, reset when events change
    tags: OnceLock<Vec<String>>,
}

impl<F: FilterResult> Default for Report<F> {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            impact: OnceLock::new(),
            tags: OnceLock::new(),
        }
    }
}

impl<F: FilterResult> Report<F> {
    /// Creates an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a report from a batch of events.
    pub fn from_events(events: impl IntoIterator<Item = Event<F>>) -> Self {
        let mut report = Self::new();
        for event in events {
            report.add_event(event);
        }
        report
    }

    /// Adds an event.
    ///
    /// An event with the same name replaces the earlier one in place.
    pub fn add_event(&mut self, event: Event<F>) {
        match self.events.iter().position(|e| e.name() == event.name()) {
            Some(index) => {
                tracing::debug!(name = %event.name(), "replacing event in report");
                self.events[index] = event;
            }
            None => {
                tracing::trace!(name = %event.name(), filters = event.len(), "adding event to report");
                self.events.push(event);
            }
        }
        self.impact = OnceLock::new();
        self.tags = OnceLock::new();
    }

    /// Looks up an event by name.
    pub fn get_event(&self, name: impl Into<Scalar>) -> Option<&Event<F>> {
        let name = name.into();
        self.events.iter().find(|e| *e.name() == name)
    }

    /// Returns true if an event with this name was raised.
    pub fn has_event(&self, name: impl Into<Scalar>) -> bool {
        self.get_event(name).is_some()
    }

    /// Returns the summed impact of all events.
    pub fn impact(&self) -> i64 {
        *self
            .impact
            .get_or_init(|| self.events.iter().map(Event::impact).sum())
    }

    /// Returns the tags of all events, first occurrence kept, duplicates dropped.
    pub fn tags(&self) -> &[String] {
        self.tags.get_or_init(|| {
            let mut seen = HashSet::new();
            self.events
                .iter()
                .flat_map(Event::tags)
                .filter(|tag| seen.insert(*tag))
                .cloned()
                .collect()
        })
    }

    /// Classifies the total impact against the thresholds.
    pub fn severity(&self, thresholds: &Thresholds) -> Severity {
        let impact = self.impact();
        let severity = Severity::classify(impact, thresholds);
        if severity >= Severity::Warn {
            tracing::warn!(impact, %severity, events = self.len(), "report crossed threshold");
        } else {
            tracing::debug!(impact, %severity, "classified report");
        }
        severity
    }

    /// Returns the number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no event was raised.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the events in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event<F>> {
        self.events.iter()
    }
}

impl<'a, F: FilterResult> IntoIterator for &'a Report<F> {
    type Item = &'a Event<F>;
    type IntoIter = std::slice::Iter<'a, Event<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<F: FilterResult> FromIterator<Event<F>> for Report<F> {
    fn from_iter<I: IntoIterator<Item = Event<F>>>(iter: I) -> Self {
        Self::from_events(iter)
    }
}
