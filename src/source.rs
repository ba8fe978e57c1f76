//! Candidate data sources
//!
//! A source is either a static collection, filtered by case-sensitive
//! substring containment, or a host callback handed a delivery sink it is
//! expected to use exactly once - synchronously or after any delay. The
//! engine enforces no timeout and no retry: a callback that never delivers
//! stalls that query cycle forever.

use serde_json::Value;
use std::fmt;
use std::sync::mpsc::Sender;

/// A raw result delivery, stamped with the generation of the query that
/// produced it. Deliveries from superseded queries are dropped on arrival.
#[derive(Debug)]
pub(crate) struct Delivery {
    pub generation: u64,
    pub results: Vec<Value>,
}

/// Delivery handle given to callback sources.
///
/// The sink can be moved anywhere, including across threads, and used
/// once; `deliver` consumes it. Delivering after the owning engine is
/// gone is a silent no-op.
#[derive(Debug)]
pub struct ResultSink {
    generation: u64,
    tx: Sender<Delivery>,
}

impl ResultSink {
    pub(crate) const fn new(generation: u64, tx: Sender<Delivery>) -> Self {
        Self { generation, tx }
    }

    /// Deliver the raw result collection for the query this sink belongs to.
    pub fn deliver(self, results: Vec<Value>) {
        let _ = self.tx.send(Delivery {
            generation: self.generation,
            results,
        });
    }
}

/// Callback source signature: `(token, sink)`
pub type SourceFn = Box<dyn Fn(&str, ResultSink)>;

/// Where candidates come from
pub enum Source {
    /// Static collection, filtered by substring containment of the token
    Static(Vec<String>),
    /// Host callback expected to deliver through the sink exactly once
    Callback(SourceFn),
}

impl Default for Source {
    fn default() -> Self {
        Self::Static(Vec::new())
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(items) => f.debug_tuple("Static").field(items).finish(),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

impl From<Vec<String>> for Source {
    fn from(items: Vec<String>) -> Self {
        Self::Static(items)
    }
}

impl From<Vec<&str>> for Source {
    fn from(items: Vec<&str>) -> Self {
        Self::Static(items.into_iter().map(String::from).collect())
    }
}

impl Source {
    /// Dispatch one query. Static sources deliver synchronously through
    /// the same sink path the callback sources use.
    pub(crate) fn dispatch(&self, token: &str, sink: ResultSink) {
        match self {
            Self::Static(items) => {
                let results = items
                    .iter()
                    .filter(|item| item.contains(token))
                    .cloned()
                    .map(Value::String)
                    .collect();
                sink.deliver(results);
            }
            Self::Callback(query) => query(token, sink),
        }
    }
}
