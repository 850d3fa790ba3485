//! Dated time-interval value type and overlap/subtraction primitives.
//!
//! All booking and availability math in the engine reduces to operations on
//! [`TimeInterval`]. Intervals are half-open: the start instant is included,
//! the end instant is excluded, so two intervals that merely touch
//! (`a.end == b.start`) do not overlap. Intervals never span midnight;
//! intervals on different dates never overlap.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A half-open time range on a single calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeInterval {
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeInterval {
    /// Create a new interval, rejecting empty or inverted ranges.
    pub fn new(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> EngineResult<Self> {
        if start >= end {
            return Err(EngineError::InvalidInterval { date, start, end });
        }
        Ok(Self { date, start, end })
    }

    /// Half-open overlap test. Intervals on different dates never overlap,
    /// and touching endpoints do not count.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    /// Remove the portion of `self` covered by `cut`, returning the zero, one
    /// or two remaining fragments in chronological order.
    ///
    /// Two fragments result when `cut` is strictly interior to `self`
    /// (a split); zero when `cut` covers `self` entirely. A `cut` on another
    /// date, or one that does not overlap, leaves `self` intact. Zero-length
    /// fragments are never emitted.
    pub fn subtract(&self, cut: &TimeInterval) -> Vec<TimeInterval> {
        if !self.overlaps(cut) {
            return vec![*self];
        }

        let mut fragments = Vec::with_capacity(2);
        if self.start < cut.start {
            fragments.push(TimeInterval {
                date: self.date,
                start: self.start,
                end: cut.start,
            });
        }
        if cut.end < self.end {
            fragments.push(TimeInterval {
                date: self.date,
                start: cut.end,
                end: self.end,
            });
        }
        fragments
    }

    /// True when `self` lies entirely within `other` (same date, containment).
    pub fn within(&self, other: &TimeInterval) -> bool {
        self.date == other.date && other.start <= self.start && self.end <= other.end
    }
}

impl std::fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}..{}", self.date, self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn time(s: &str) -> NaiveTime {
        s.parse().unwrap()
    }

    fn interval(d: &str, start: &str, end: &str) -> TimeInterval {
        TimeInterval::new(date(d), time(start), time(end)).unwrap()
    }

    #[test]
    fn test_new_rejects_zero_length() {
        let result = TimeInterval::new(date("2026-03-02"), time("10:00"), time("10:00"));
        assert!(matches!(result, Err(EngineError::InvalidInterval { .. })));
    }

    #[test]
    fn test_new_rejects_inverted() {
        let result = TimeInterval::new(date("2026-03-02"), time("11:00"), time("10:00"));
        assert!(matches!(result, Err(EngineError::InvalidInterval { .. })));
    }

    #[test]
    fn test_overlaps_partial() {
        let a = interval("2026-03-02", "09:00", "11:00");
        let b = interval("2026-03-02", "10:00", "12:00");
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_endpoints_do_not_overlap() {
        let a = interval("2026-03-02", "10:00", "11:00");
        let b = interval("2026-03-02", "11:00", "12:00");
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn test_different_dates_never_overlap() {
        let a = interval("2026-03-02", "09:00", "17:00");
        let b = interval("2026-03-03", "09:00", "17:00");
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_containment_overlaps() {
        let outer = interval("2026-03-02", "09:00", "17:00");
        let inner = interval("2026-03-02", "12:00", "13:00");
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_subtract_interior_cut_splits() {
        let base = interval("2026-03-02", "09:00", "12:00");
        let cut = interval("2026-03-02", "10:00", "11:00");

        let fragments = base.subtract(&cut);
        assert_eq!(
            fragments,
            vec![
                interval("2026-03-02", "09:00", "10:00"),
                interval("2026-03-02", "11:00", "12:00"),
            ]
        );
    }

    #[test]
    fn test_subtract_full_cover_consumes() {
        let base = interval("2026-03-02", "09:00", "10:00");
        let cut = interval("2026-03-02", "09:00", "10:00");
        assert!(base.subtract(&cut).is_empty());
    }

    #[test]
    fn test_subtract_leading_edge() {
        let base = interval("2026-03-02", "09:00", "12:00");
        let cut = interval("2026-03-02", "08:00", "10:00");
        assert_eq!(
            base.subtract(&cut),
            vec![interval("2026-03-02", "10:00", "12:00")]
        );
    }

    #[test]
    fn test_subtract_trailing_edge() {
        let base = interval("2026-03-02", "09:00", "12:00");
        let cut = interval("2026-03-02", "11:00", "13:00");
        assert_eq!(
            base.subtract(&cut),
            vec![interval("2026-03-02", "09:00", "11:00")]
        );
    }

    #[test]
    fn test_subtract_disjoint_leaves_base() {
        let base = interval("2026-03-02", "09:00", "12:00");
        let cut = interval("2026-03-02", "13:00", "14:00");
        assert_eq!(base.subtract(&cut), vec![base]);
    }

    #[test]
    fn test_subtract_touching_cut_leaves_base() {
        // Half-open: a cut starting exactly at base.end removes nothing.
        let base = interval("2026-03-02", "09:00", "12:00");
        let cut = interval("2026-03-02", "12:00", "13:00");
        assert_eq!(base.subtract(&cut), vec![base]);
    }

    #[test]
    fn test_subtract_other_date_leaves_base() {
        let base = interval("2026-03-02", "09:00", "12:00");
        let cut = interval("2026-03-03", "09:00", "12:00");
        assert_eq!(base.subtract(&cut), vec![base]);
    }

    #[test]
    fn test_subtract_exact_boundary_emits_no_zero_length() {
        // Cut shares the base's start: only the trailing fragment survives.
        let base = interval("2026-03-02", "09:00", "12:00");
        let cut = interval("2026-03-02", "09:00", "10:00");
        assert_eq!(
            base.subtract(&cut),
            vec![interval("2026-03-02", "10:00", "12:00")]
        );
    }

    #[test]
    fn test_within() {
        let outer = interval("2026-03-02", "09:00", "17:00");
        let inner = interval("2026-03-02", "09:00", "10:00");
        let straddle = interval("2026-03-02", "08:00", "10:00");
        assert!(inner.within(&outer));
        assert!(outer.within(&outer));
        assert!(!straddle.within(&outer));
    }
}
