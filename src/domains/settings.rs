use crate::common::{ApplicationResult, DomainError, DomainResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Shortest refresh period the simulation accepts, in milliseconds.
pub const MIN_REFRESH_PERIOD_MS: u64 = 100;

/// One submission of the settings panel. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingsRequest {
    pub population: Option<u64>,
    pub refresh_period_ms: Option<u64>,
    pub radius_m: Option<f64>,
    pub band_count: Option<usize>,
    pub wedge_count: Option<usize>,
    pub zoom_percent: Option<f64>,
    pub boundaries: Option<Vec<u32>>,
}

impl SettingsRequest {
    /// Check every present field; `bounded_intervals` is how many boundaries the
    /// current interval table expects.
    pub fn validate(&self, bounded_intervals: usize) -> DomainResult<()> {
        if self.population == Some(0) {
            return Err(invalid("population must be greater than 0"));
        }
        if let Some(period) = self.refresh_period_ms {
            if period < MIN_REFRESH_PERIOD_MS {
                return Err(invalid(format!(
                    "refresh period must be at least {} ms",
                    MIN_REFRESH_PERIOD_MS
                )));
            }
        }
        if let Some(radius) = self.radius_m {
            if !(radius.is_finite() && radius > 0.0) {
                return Err(invalid("radius must be greater than 0"));
            }
        }
        if self.band_count == Some(0) {
            return Err(invalid("band count must be greater than 0"));
        }
        if self.wedge_count == Some(0) {
            return Err(invalid("wedge count must be greater than 0"));
        }
        if let Some(zoom) = self.zoom_percent {
            if !(zoom.is_finite() && zoom > 0.0) {
                return Err(invalid("zoom must be greater than 0"));
            }
        }
        if let Some(boundaries) = &self.boundaries {
            validate_boundaries(boundaries, bounded_intervals)?;
        }
        Ok(())
    }
}

/// Boundaries are upper bounds, each at least one above the previous.
pub fn validate_boundaries(boundaries: &[u32], expected: usize) -> DomainResult<()> {
    if boundaries.len() != expected {
        return Err(invalid(format!(
            "expected {} interval boundaries, got {}",
            expected,
            boundaries.len()
        )));
    }
    if boundaries
        .windows(2)
        .any(|pair| pair[0].checked_add(1).map_or(true, |floor| pair[1] < floor))
    {
        return Err(invalid("each interval boundary must exceed the previous one"));
    }
    if boundaries.last() == Some(&u32::MAX) {
        return Err(invalid("the last interval boundary must leave room for the open interval"));
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> DomainError {
    DomainError::InvalidSettings {
        reason: reason.into(),
    }
}

/// Remote simulation settings (outbound port).
#[async_trait]
pub trait SettingsApi: Send + Sync {
    async fn put_refresh_period(&self, period_ms: u64) -> ApplicationResult<()>;
    async fn put_population(&self, population: u64) -> ApplicationResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_is_valid() {
        assert!(SettingsRequest::default().validate(3).is_ok());
    }

    #[test]
    fn test_refresh_period_floor() {
        let request = SettingsRequest {
            refresh_period_ms: Some(99),
            ..Default::default()
        };
        assert!(matches!(request.validate(3), Err(DomainError::InvalidSettings { .. })));

        let request = SettingsRequest {
            refresh_period_ms: Some(100),
            ..Default::default()
        };
        assert!(request.validate(3).is_ok());
    }

    #[test]
    fn test_boundaries_must_step_by_one() {
        assert!(validate_boundaries(&[0, 1, 2], 3).is_ok());
        assert!(validate_boundaries(&[0, 3, 3], 3).is_err());
        assert!(validate_boundaries(&[0, 3], 3).is_err());
    }

    #[test]
    fn test_largest_boundary_is_invalid() {
        let request = SettingsRequest {
            boundaries: Some(vec![0, 1, u32::MAX]),
            ..Default::default()
        };
        assert!(matches!(request.validate(3), Err(DomainError::InvalidSettings { .. })));
        assert!(validate_boundaries(&[u32::MAX, 0, 1], 3).is_err());
    }

    #[test]
    fn test_zero_counts_rejected() {
        let request = SettingsRequest {
            wedge_count: Some(0),
            ..Default::default()
        };
        assert!(request.validate(3).is_err());
    }
}
