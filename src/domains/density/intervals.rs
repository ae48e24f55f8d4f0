use crate::common::{DomainError, DomainResult};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One occupancy range and the color it maps to. A missing bound is open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    pub color: String,
}

impl Interval {
    pub fn new(min: Option<u32>, max: Option<u32>, color: &str) -> Self {
        Self {
            min,
            max,
            color: color.to_string(),
        }
    }

    pub fn matches(&self, count: usize) -> bool {
        let count = count as u64;
        self.min.map_or(true, |min| count >= u64::from(min))
            && self.max.map_or(true, |max| count <= u64::from(max))
    }
}

pub static DEFAULT_INTERVALS: Lazy<IntervalTable> = Lazy::new(|| IntervalTable {
    intervals: vec![
        Interval::new(Some(0), Some(0), "rgb(245, 245, 245)"),
        Interval::new(Some(1), Some(3), "rgb(120, 200, 245)"),
        Interval::new(Some(4), Some(5), "rgb(1, 160, 210)"),
        Interval::new(Some(6), None, "rgb(0, 50, 99)"),
    ],
});

/// Ordered, contiguous and exhaustive cover of the non-negative counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IntervalTable {
    intervals: Vec<Interval>,
}

impl Default for IntervalTable {
    fn default() -> Self {
        DEFAULT_INTERVALS.clone()
    }
}

impl IntervalTable {
    pub fn new(intervals: Vec<Interval>) -> DomainResult<Self> {
        let invalid = |reason: String| DomainError::InvalidSettings { reason };
        let Some(last) = intervals.last() else {
            return Err(invalid("interval table is empty".to_string()));
        };
        if last.max.is_some() {
            return Err(invalid("last interval must be unbounded".to_string()));
        }
        if intervals[0].min.unwrap_or(0) != 0 {
            return Err(invalid("first interval must start at 0".to_string()));
        }
        for (index, pair) in intervals.windows(2).enumerate() {
            let (Some(max), Some(next_min)) = (pair[0].max, pair[1].min) else {
                return Err(invalid(format!("interval {} has an open inner bound", index)));
            };
            if pair[0].min.map_or(false, |min| min > max) || max.checked_add(1) != Some(next_min) {
                return Err(invalid(format!("interval {} does not meet interval {}", index, index + 1)));
            }
        }
        Ok(Self { intervals })
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Color of the first interval containing `count`.
    pub fn color_for(&self, count: usize) -> &str {
        self.intervals
            .iter()
            .find(|interval| interval.matches(count))
            .or(self.intervals.last())
            .map_or("", |interval| interval.color.as_str())
    }

    /// Color of an empty cell.
    pub fn background(&self) -> &str {
        self.color_for(0)
    }

    /// Upper bounds of the bounded intervals, e.g. `[0, 3, 5]` for the defaults.
    pub fn distribution(&self) -> Vec<u32> {
        self.intervals.iter().filter_map(|interval| interval.max).collect()
    }

    /// Rebuild the breakpoints from ascending upper bounds, keeping each
    /// interval's color and appending the open interval above the last bound.
    pub fn redistribute(&mut self, boundaries: &[u32]) -> DomainResult<()> {
        let expected = self.intervals.len() - 1;
        if boundaries.len() != expected {
            return Err(DomainError::InvalidSettings {
                reason: format!("expected {} boundaries, got {}", expected, boundaries.len()),
            });
        }
        if boundaries.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(DomainError::InvalidSettings {
                reason: "boundaries must be strictly ascending".to_string(),
            });
        }

        let mut rebuilt = Vec::with_capacity(self.intervals.len());
        let mut next_min = 0u32;
        for (interval, &max) in self.intervals.iter().zip(boundaries) {
            rebuilt.push(Interval::new(Some(next_min), Some(max), &interval.color));
            next_min = max.checked_add(1).ok_or_else(|| DomainError::InvalidSettings {
                reason: format!("boundary {} leaves no room for the open interval", max),
            })?;
        }
        let open_color = self.intervals[expected].color.clone();
        rebuilt.push(Interval {
            min: Some(next_min),
            max: None,
            color: open_color,
        });
        self.intervals = rebuilt;
        Ok(())
    }
}

impl<'de> Deserialize<'de> for IntervalTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let intervals = Vec::<Interval>::deserialize(deserializer)?;
        IntervalTable::new(intervals).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_classification() {
        let table = IntervalTable::default();
        assert_eq!(table.color_for(0), "rgb(245, 245, 245)");
        assert_eq!(table.color_for(2), "rgb(120, 200, 245)");
        assert_eq!(table.color_for(4), "rgb(1, 160, 210)");
        assert_eq!(table.color_for(6), "rgb(0, 50, 99)");
        assert_eq!(table.color_for(10_000), "rgb(0, 50, 99)");
        assert_eq!(table.distribution(), vec![0, 3, 5]);
    }

    #[test]
    fn test_redistribute_keeps_colors() {
        let mut table = IntervalTable::default();
        table.redistribute(&[2, 10, 20]).unwrap();

        let bounds: Vec<_> = table.intervals().iter().map(|i| (i.min, i.max)).collect();
        assert_eq!(
            bounds,
            vec![(Some(0), Some(2)), (Some(3), Some(10)), (Some(11), Some(20)), (Some(21), None)]
        );
        assert_eq!(table.color_for(2), "rgb(245, 245, 245)");
        assert_eq!(table.color_for(21), "rgb(0, 50, 99)");
    }

    #[test]
    fn test_largest_boundary_is_rejected_without_change() {
        let mut table = IntervalTable::default();
        let result = table.redistribute(&[0, 1, u32::MAX]);
        assert!(matches!(result, Err(DomainError::InvalidSettings { .. })));
        assert_eq!(table, IntervalTable::default());

        let overflowing = IntervalTable::new(vec![
            Interval::new(Some(0), Some(u32::MAX), "white"),
            Interval::new(Some(0), None, "blue"),
        ]);
        assert!(overflowing.is_err());
    }

    #[test]
    fn test_redistribute_rejects_bad_boundaries() {
        let mut table = IntervalTable::default();
        assert!(table.redistribute(&[3, 3, 5]).is_err());
        assert!(table.redistribute(&[1, 2]).is_err());
        assert_eq!(table, IntervalTable::default());
    }

    #[test]
    fn test_table_with_gap_is_rejected() {
        let result = IntervalTable::new(vec![
            Interval::new(Some(0), Some(1), "a"),
            Interval::new(Some(3), None, "b"),
        ]);
        assert!(result.is_err());
    }
}
