//! Trailing-edge debouncing for free-text search inputs.
//!
//! The debouncer is driven by caller-supplied instants rather than timers:
//! the view pushes every keystroke and polls on its own tick.

use std::time::{Duration, Instant};

use crate::analysis::{search_values, PropAnalysis, PropValueDistribution};

/// Delivers only the last value pushed within a quiet window.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Records a new value, discarding any value still waiting.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Returns the pending value once its quiet window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.pending {
            Some((_, deadline)) if now >= deadline => self.pending.take().map(|(value, _)| value),
            _ => None,
        }
    }

    /// Returns the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(value, _)| value)
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }
}

/// Search box state of one prop section: what was typed and what has settled.
#[derive(Debug, Clone)]
pub struct ValueSearch {
    query: String,
    settled: String,
    debouncer: Debouncer<String>,
}

impl ValueSearch {
    pub fn new(delay: Duration) -> Self {
        Self {
            query: String::new(),
            settled: String::new(),
            debouncer: Debouncer::new(delay),
        }
    }

    /// Text as typed.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Text the result list is computed from.
    pub fn settled_query(&self) -> &str {
        &self.settled
    }

    pub fn input(&mut self, value: impl Into<String>, now: Instant) {
        let value = value.into();
        self.query = value.clone();
        self.debouncer.push(value, now);
    }

    /// Applies a due value. Returns true if the settled query changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(value) if value != self.settled => {
                self.settled = value;
                true
            }
            _ => false,
        }
    }

    /// Clears both the typed and settled query at once.
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.query.clear();
        self.settled.clear();
    }

    /// True while the typed query has not settled yet.
    pub fn is_searching(&self) -> bool {
        self.query != self.settled
    }

    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Values of `analysis` matching the settled query.
    pub fn results<'a>(&self, analysis: &'a PropAnalysis) -> Vec<&'a PropValueDistribution> {
        search_values(analysis, &self.settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyze;
    use crate::schema::{Instance, PackageIdentity, Prop, Span};

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_value_delivered_after_quiet_window() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.push("a", start);

        assert_eq!(d.poll(start + Duration::from_millis(299)), None);
        assert_eq!(d.poll(start + DELAY), Some("a"));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_superseded_values_are_discarded() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.push("b", start);
        d.push("bu", start + Duration::from_millis(100));
        d.push("but", start + Duration::from_millis(200));

        assert_eq!(d.poll(start + Duration::from_millis(350)), None);
        assert_eq!(d.poll(start + Duration::from_millis(500)), Some("but"));
        assert_eq!(d.poll(start + Duration::from_millis(900)), None);
    }

    #[test]
    fn test_flush_and_cancel() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.push(1, start);
        assert_eq!(d.deadline(), Some(start + DELAY));
        assert_eq!(d.flush(), Some(1));

        d.push(2, start);
        d.cancel();
        assert_eq!(d.poll(start + DELAY), None);
    }

    #[test]
    fn test_value_search_settles() {
        let start = Instant::now();
        let mut search = ValueSearch::new(DELAY);
        search.input("out", start);

        assert!(search.is_searching());
        assert!(search.has_query());
        assert!(!search.poll(start + Duration::from_millis(10)));
        assert!(search.poll(start + DELAY));
        assert!(!search.is_searching());
        assert_eq!(search.settled_query(), "out");

        search.clear();
        assert_eq!(search.query(), "");
        assert!(!search.is_searching());
    }

    #[test]
    fn test_value_search_results_use_settled_query() {
        let instances: Vec<Instance> = ["outline", "solid"]
            .iter()
            .map(|v| Instance {
                file_path: "a.tsx".to_string(),
                raw: String::new(),
                span: Span::default(),
                import_specifier: None,
                resolved_path: String::new(),
                package: PackageIdentity::Native,
                props: vec![Prop {
                    key: "variant".to_string(),
                    raw: v.to_string(),
                    prop_type: "string".to_string(),
                    value: None,
                }],
            })
            .collect();
        let variant = &analyze(&instances)[0];

        let start = Instant::now();
        let mut search = ValueSearch::new(DELAY);
        search.input("sol", start);
        assert_eq!(search.results(variant).len(), 2);

        search.poll(start + DELAY);
        let results = search.results(variant);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].value, "solid");
    }
}
