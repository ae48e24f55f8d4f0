use super::SitacService;
use crate::common::ApplicationResult;
use crate::config::DisplayConfig;
use crate::domains::mobile::SimulationConfig;
use crate::domains::notifier::DynNotifier;
use crate::domains::settings::{SettingsApi, SettingsRequest};
use std::sync::Arc;
use tracing::{error, info};

/// Validates settings submissions and routes each changed value to where it
/// lives: the simulation for population and refresh period, the local
/// service for everything else.
pub struct SettingsService {
    api: Arc<dyn SettingsApi>,
    notifier: DynNotifier,
    current: SettingsRequest,
}

impl SettingsService {
    pub fn new(api: Arc<dyn SettingsApi>, notifier: DynNotifier, display: &DisplayConfig) -> Self {
        Self {
            api,
            notifier,
            current: SettingsRequest {
                population: None,
                refresh_period_ms: None,
                radius_m: Some(display.radius_m),
                band_count: Some(display.band_count),
                wedge_count: Some(display.wedge_count),
                zoom_percent: Some(display.zoom_percent),
                boundaries: Some(display.intervals.distribution()),
            },
        }
    }

    pub fn current(&self) -> &SettingsRequest {
        &self.current
    }

    /// Track the simulation's own view of the remote settings.
    pub fn sync_from_config(&mut self, config: &SimulationConfig) {
        self.current.population = Some(config.mobiles);
        self.current.refresh_period_ms = Some(config.update_period_ms);
    }

    /// Apply every changed field of `request`. Returns how many values changed.
    pub async fn apply(
        &mut self,
        service: &mut SitacService,
        request: SettingsRequest,
    ) -> ApplicationResult<usize> {
        let expected = service.density().intervals().distribution().len();
        if let Err(e) = request.validate(expected) {
            self.notifier.error(&e.to_string());
            return Err(e.into());
        }

        let mut changed = 0;

        if let Some(period) = changed_value(request.refresh_period_ms, self.current.refresh_period_ms) {
            self.remote(self.api.put_refresh_period(period).await)?;
            self.current.refresh_period_ms = Some(period);
            self.notifier.info(&format!("Refresh period set to {} ms", period));
            changed += 1;
        }
        if let Some(population) = changed_value(request.population, self.current.population) {
            self.remote(self.api.put_population(population).await)?;
            self.current.population = Some(population);
            self.notifier.info(&format!("Population set to {} mobiles", population));
            changed += 1;
        }

        if let Some(radius) = changed_value(request.radius_m, self.current.radius_m) {
            service.set_radius(radius);
            self.current.radius_m = Some(radius);
            self.notifier.info(&format!("Radius set to {} m", radius));
            changed += 1;
        }
        if let Some(bands) = changed_value(request.band_count, self.current.band_count) {
            service.set_band_count(bands);
            self.current.band_count = Some(bands);
            self.notifier.info(&format!("Band count set to {}", bands));
            changed += 1;
        }
        if let Some(wedges) = changed_value(request.wedge_count, self.current.wedge_count) {
            service.set_wedge_count(wedges);
            self.current.wedge_count = Some(wedges);
            self.notifier.info(&format!("Wedge count set to {}", wedges));
            changed += 1;
        }
        if let Some(zoom) = changed_value(request.zoom_percent, self.current.zoom_percent) {
            service.set_zoom_percent(zoom);
            self.current.zoom_percent = Some(zoom);
            self.notifier.info(&format!("Zoom set to {}%", zoom));
            changed += 1;
        }
        if let Some(boundaries) = changed_value(request.boundaries, self.current.boundaries.clone()) {
            if let Err(e) = service.set_distribution(&boundaries) {
                self.notifier.error(&e.to_string());
                return Err(e.into());
            }
            self.notifier.info(&format!("Density intervals set to {:?}", boundaries));
            self.current.boundaries = Some(boundaries);
            changed += 1;
        }

        info!("Applied {} settings change(s)", changed);
        Ok(changed)
    }

    fn remote(&self, result: ApplicationResult<()>) -> ApplicationResult<()> {
        if let Err(e) = &result {
            error!("Settings request failed: {}", e);
            self.notifier.error(&e.to_string());
        }
        result
    }
}

fn changed_value<T: PartialEq>(requested: Option<T>, current: Option<T>) -> Option<T> {
    match requested {
        Some(value) if current.as_ref() != Some(&value) => Some(value),
        _ => None,
    }
}
