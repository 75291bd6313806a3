//! Aggregate statistics, computed client-side from one large-page fetch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which figures to derive from the fetched rows.
///
/// Field names may be dotted paths into nested objects (`"customer.tier"`).
///
/// ## Example
///
/// ```
/// use resource_browser::StatsSpec;
///
/// let spec = StatsSpec::new().count_by("status").sum("total");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSpec {
    count_by: Vec<String>,
    sums: Vec<String>,
}

impl StatsSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count rows per distinct value of `field`.
    pub fn count_by(mut self, field: &str) -> Self {
        self.count_by.push(field.to_string());
        self
    }

    /// Sum (and average) the numeric values of `field`.
    pub fn sum(mut self, field: &str) -> Self {
        self.sums.push(field.to_string());
        self
    }

    /// Derive statistics from `rows`. `total` is the server-reported size of
    /// the whole collection.
    pub fn derive<R: Serialize>(&self, rows: &[R], total: u64) -> AggregateStats {
        let mut stats = AggregateStats {
            rows: 0,
            total,
            counts: BTreeMap::new(),
            sums: BTreeMap::new(),
        };

        for row in rows {
            let value = match serde_json::to_value(row) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping row that failed to serialize for stats");
                    continue;
                }
            };
            stats.rows += 1;

            for field in &self.count_by {
                if let Some(key) = lookup(&value, field).and_then(count_key) {
                    *stats
                        .counts
                        .entry(field.clone())
                        .or_default()
                        .entry(key)
                        .or_insert(0) += 1;
                }
            }

            for field in &self.sums {
                if let Some(n) = lookup(&value, field).and_then(numeric) {
                    let acc = stats.sums.entry(field.clone()).or_default();
                    acc.sum += n;
                    acc.count += 1;
                }
            }
        }

        stats
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, segment| v.get(segment))
}

fn count_key(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// Decimal columns often arrive as strings ("12.50")
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
    pub sum: f64,
    pub count: u64,
}

/// Summary over the whole collection, independent of the filtered page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Rows the figures were computed from.
    pub rows: u64,
    /// Server-reported collection size.
    pub total: u64,
    pub counts: BTreeMap<String, BTreeMap<String, u64>>,
    pub sums: BTreeMap<String, Accumulator>,
}

impl AggregateStats {
    pub fn count(&self, field: &str, value: &str) -> u64 {
        self.counts
            .get(field)
            .and_then(|c| c.get(value))
            .copied()
            .unwrap_or(0)
    }

    pub fn counts_for(&self, field: &str) -> Option<&BTreeMap<String, u64>> {
        self.counts.get(field)
    }

    pub fn sum(&self, field: &str) -> f64 {
        self.sums.get(field).map(|a| a.sum).unwrap_or(0.0)
    }

    /// Mean over rows that had a numeric value for `field`.
    pub fn average(&self, field: &str) -> Option<f64> {
        self.sums
            .get(field)
            .filter(|a| a.count > 0)
            .map(|a| a.sum / a.count as f64)
    }

    /// True when the server holds more rows than the stats page could carry.
    pub fn is_truncated(&self) -> bool {
        self.total > self.rows
    }
}

/// Cached statistics with explicit invalidation.
///
/// Loads are tokened: only the most recently begun load may store its result.
#[derive(Debug, Default)]
pub struct StatsCache {
    value: Option<AggregateStats>,
    dirty: bool,
    epoch: u64,
    issued: u64,
    pending: Option<(u64, u64)>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&AggregateStats> {
        self.value.as_ref()
    }

    /// True when the next `load` must hit the endpoint.
    pub fn needs_load(&self) -> bool {
        self.value.is_none() || self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// True when a load begun after the latest invalidation is in flight.
    pub fn has_fresh_load(&self) -> bool {
        matches!(self.pending, Some((_, epoch)) if epoch == self.epoch)
    }

    /// Force the next load to refetch. The cached value stays visible until then.
    pub fn invalidate(&mut self) {
        self.dirty = true;
        self.epoch += 1;
    }

    pub fn begin_load(&mut self) -> u64 {
        self.issued += 1;
        self.pending = Some((self.issued, self.epoch));
        self.issued
    }

    /// Store the result of load `token`. Returns whether it was applied.
    ///
    /// A result of a load begun before an invalidation is stored but stays dirty.
    pub fn finish(&mut self, token: u64, stats: AggregateStats) -> bool {
        let Some((current, epoch)) = self.pending else {
            return false;
        };
        if current != token {
            return false;
        }
        self.pending = None;
        self.value = Some(stats);
        self.dirty = epoch != self.epoch;
        true
    }

    /// Record a failed load; the previous value is retained.
    pub fn fail(&mut self, token: u64) -> bool {
        match self.pending {
            Some((current, _)) if current == token => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }

    /// Forget the value and ignore any outstanding load.
    pub fn clear(&mut self) {
        self.value = None;
        self.dirty = false;
        self.pending = None;
        self.issued += 1;
    }
}
