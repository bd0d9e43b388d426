// src/model/time_key.rs

//! Total order over (year, week) and the train/val/test partition built on it.

use crate::error::{PlannerError, Result};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Number of trailing keys held out for test (and again for validation)
/// once the history is long enough.
const HOLDOUT_WEEKS: usize = 4;

/// Below this many distinct keys the split switches to 60/20/20 proportions.
const MIN_KEYS_FOR_FIXED_HOLDOUT: usize = 12;

/// Sortable integer encoding of an ISO (year, week): `year * 100 + week`.
///
/// Valid because ISO week numbers stay within 1..=53.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TimeKey(u32);

impl TimeKey {
    pub fn from_year_week(year: u32, week: u32) -> Result<Self> {
        if !(1..=53).contains(&week) {
            return Err(PlannerError::InvalidParameter(format!(
                "week {} of year {} is outside 1..=53",
                week, year
            )));
        }
        year.checked_mul(100)
            .and_then(|base| base.checked_add(week))
            .map(TimeKey)
            .ok_or_else(|| {
                PlannerError::InvalidParameter(format!("year {} is too large to encode", year))
            })
    }

    /// Encodes without range checks. Saturates instead of overflowing; keys of
    /// rows that passed [`TimeKey::from_year_week`] are exact.
    pub(crate) fn encode(year: u32, week: u32) -> Self {
        TimeKey(year.saturating_mul(100).saturating_add(week))
    }

    pub fn year(self) -> u32 {
        self.0 / 100
    }

    pub fn week(self) -> u32 {
        self.0 % 100
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which window of a [`TimeSplit`] a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Train,
    Val,
    Test,
}

/// Disjoint, time-ordered train/val/test windows over the distinct time keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSplit {
    pub train: Vec<TimeKey>,
    pub val: Vec<TimeKey>,
    pub test: Vec<TimeKey>,
}

impl TimeSplit {
    /// Splits the distinct keys of `keys`. Order and duplicates in the input
    /// do not matter.
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = TimeKey>,
    {
        let weeks: Vec<TimeKey> = keys
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let n = weeks.len();

        let (n_train, n_val) = if n >= MIN_KEYS_FOR_FIXED_HOLDOUT {
            (n - 2 * HOLDOUT_WEEKS, HOLDOUT_WEEKS)
        } else {
            // ceil(0.6n) and ceil(0.2n) in integer arithmetic, each at least 1,
            // clamped to whatever keys are left.
            let n_train = ((6 * n + 9) / 10).max(1).min(n);
            let n_val = ((2 * n + 9) / 10).max(1).min(n - n_train);
            (n_train, n_val)
        };

        Self {
            train: weeks[..n_train].to_vec(),
            val: weeks[n_train..n_train + n_val].to_vec(),
            test: weeks[n_train + n_val..].to_vec(),
        }
    }

    pub fn segment_of(&self, key: TimeKey) -> Option<Segment> {
        if self.train.binary_search(&key).is_ok() {
            Some(Segment::Train)
        } else if self.val.binary_search(&key).is_ok() {
            Some(Segment::Val)
        } else if self.test.binary_search(&key).is_ok() {
            Some(Segment::Test)
        } else {
            None
        }
    }

    /// First key of the test window; everything strictly before it is pre-test history.
    pub fn first_test_key(&self) -> Option<TimeKey> {
        self.test.first().copied()
    }

    /// Buckets items by the window their key falls in, preserving input order.
    pub fn partition<'a, T, F>(&self, items: &'a [T], key_of: F) -> SplitRows<'a, T>
    where
        F: Fn(&T) -> TimeKey,
    {
        let mut rows = SplitRows {
            train: Vec::new(),
            val: Vec::new(),
            test: Vec::new(),
        };
        for item in items {
            match self.segment_of(key_of(item)) {
                Some(Segment::Train) => rows.train.push(item),
                Some(Segment::Val) => rows.val.push(item),
                Some(Segment::Test) => rows.test.push(item),
                None => {}
            }
        }
        rows
    }
}

/// Rows of a table grouped by split window.
#[derive(Debug)]
pub struct SplitRows<'a, T> {
    pub train: Vec<&'a T>,
    pub val: Vec<&'a T>,
    pub test: Vec<&'a T>,
}
