/*!
A set of integers represented as a sorted list of disjoint, non-adjacent
half-open intervals, merging on insert.

Used by the head theory-atom transformer ([`crate::program_transformer::head`])
to fold a family of shifted `&tel` head atoms (`p' `, `p''`, `p'''`, ...)
into the smallest number of disjunctive rule instances covering the shifts
actually used.
*/

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub start: i64,
    /// Exclusive.
    pub end: i64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    pub fn new() -> Self {
        IntervalSet {
            intervals: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interval> {
        self.intervals.iter()
    }

    /// Inserts `[start, end)`, merging with any overlapping or adjacent
    /// existing interval.
    pub fn insert(&mut self, start: i64, end: i64) {
        if start >= end {
            return;
        }
        let mut merged = Interval { start, end };
        let mut out = Vec::with_capacity(self.intervals.len() + 1);
        let mut placed = false;
        for existing in &self.intervals {
            if existing.end < merged.start {
                out.push(*existing);
            } else if existing.start > merged.end {
                if !placed {
                    out.push(merged);
                    placed = true;
                }
                out.push(*existing);
            } else {
                merged.start = merged.start.min(existing.start);
                merged.end = merged.end.max(existing.end);
            }
        }
        if !placed {
            out.push(merged);
        }
        self.intervals = out;
    }

    pub fn insert_point(&mut self, point: i64) {
        self.insert(point, point + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_overlapping_and_adjacent() {
        let mut set = IntervalSet::new();
        set.insert(1, 3);
        set.insert(3, 5);
        set.insert(10, 12);
        let collected: Vec<_> = set.iter().cloned().collect();
        assert_eq!(
            collected,
            vec![Interval { start: 1, end: 5 }, Interval { start: 10, end: 12 }]
        );
    }

    #[test]
    fn keeps_disjoint_intervals_separate() {
        let mut set = IntervalSet::new();
        set.insert(1, 2);
        set.insert(5, 6);
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn insert_point_is_insert_of_singleton_range() {
        let mut set = IntervalSet::new();
        set.insert_point(4);
        assert_eq!(
            set.iter().cloned().collect::<Vec<_>>(),
            vec![Interval { start: 4, end: 5 }]
        );
    }
}
