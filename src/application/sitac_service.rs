use crate::common::{DomainResult, Envelope};
use crate::config::DisplayConfig;
use crate::domains::density::{BinCandidate, DensityChart, PolarGrid};
use crate::domains::display::geometry::zoom_ratio;
use crate::domains::display::{DisplayFilter, DisplayFrame, GeometryProjector, Selection};
use crate::domains::mobile::{
    EventType, MobileColor, MobileId, MobileShape, MobileStore, StoreNotification,
    SubscriptionRegistry,
};
use crate::domains::notifier::DynNotifier;
use tracing::{debug, error, info};

/// Context object wiring the mobile store to its two derivations.
///
/// Every envelope is applied to the store, fanned out to subscribers, and
/// then, unless suppressed, re-derived into a display frame and a density
/// frame before the call returns.
pub struct SitacService {
    store: MobileStore,
    subscriptions: SubscriptionRegistry,
    projector: GeometryProjector,
    filter: DisplayFilter,
    selection: Selection,
    density: DensityChart,
    frame: DisplayFrame,
    watching: bool,
    notifier: DynNotifier,
}

impl SitacService {
    pub fn new(display: &DisplayConfig, notifier: DynNotifier) -> Self {
        let ratio = zoom_ratio(display.zoom_percent);
        let grid = PolarGrid::new(display.radius_m, display.band_count, display.wedge_count)
            .with_zoom_ratio(ratio);
        Self {
            store: MobileStore::new(),
            subscriptions: SubscriptionRegistry::new(),
            projector: GeometryProjector::new(display.radius_m).with_zoom_ratio(ratio),
            filter: DisplayFilter::show_all(),
            selection: Selection::default(),
            density: DensityChart::new(grid, display.intervals.clone()),
            frame: DisplayFrame::default(),
            watching: true,
            notifier,
        }
    }

    pub fn store(&self) -> &MobileStore {
        &self.store
    }

    pub fn subscriptions_mut(&mut self) -> &mut SubscriptionRegistry {
        &mut self.subscriptions
    }

    pub fn display_frame(&self) -> &DisplayFrame {
        &self.frame
    }

    pub fn density(&self) -> &DensityChart {
        &self.density
    }

    pub fn projector(&self) -> &GeometryProjector {
        &self.projector
    }

    pub fn filter(&self) -> &DisplayFilter {
        &self.filter
    }

    pub fn selected(&self) -> Option<MobileId> {
        self.selection.selected()
    }

    pub fn is_watching(&self) -> bool {
        self.watching
    }

    pub fn notifier(&self) -> &DynNotifier {
        &self.notifier
    }

    /// Apply one envelope to completion. A failed envelope leaves the store
    /// and both frames as they were and is reported to the operator.
    pub fn handle_envelope(&mut self, envelope: &Envelope) -> DomainResult<Vec<StoreNotification>> {
        let notifications = match self.store.apply_envelope(envelope) {
            Ok(notifications) => notifications,
            Err(e) => {
                error!("Rejected {} envelope: {}", envelope.event_type, e);
                self.notifier.error(&e.to_string());
                return Err(e);
            }
        };

        for notification in &notifications {
            self.subscriptions.notify(notification, &self.store);
        }

        let kind = notifications.iter().find_map(|n| match n {
            StoreNotification::Mobiles(kind) => Some(*kind),
            StoreNotification::Config(_) => None,
        });
        if let Some(kind) = kind {
            if kind == EventType::MobilesDeleted {
                self.drop_stale_selection();
            }
            if kind.changes_membership() || self.watching {
                self.recompute();
            } else {
                debug!("Skipping recompute for {} while hidden", kind);
            }
        }
        Ok(notifications)
    }

    /// Re-derive the display frame, then bin the mobiles it shows in range.
    pub fn recompute(&mut self) {
        let mobiles = self.store.mobiles();
        self.frame = self
            .projector
            .project(mobiles, &self.filter, self.selection.selected());

        let candidates = mobiles
            .iter()
            .zip(&self.frame.mobiles)
            .filter(|(_, display)| display.is_eligible())
            .map(|(mobile, _)| BinCandidate::new(mobile.id, mobile.kinematics.x_m, mobile.kinematics.y_m))
            .collect();
        let density = self.density.recompute(candidates);
        debug!(
            "Recomputed {} mobiles, {} binned",
            mobiles.len(),
            density.total_count()
        );
    }

    /// Selecting the selected mobile again deselects it. The display readout
    /// and the density highlight follow the same selection. Ids absent from
    /// the store are ignored.
    pub fn select_mobile(&mut self, id: MobileId) -> Option<MobileId> {
        if !self.store.contains(id) {
            return self.selection.selected();
        }
        let selected = self.selection.toggle(id);
        match selected {
            Some(id) if self.density.highlighted() != Some(id) => {
                self.density.select_mobile(id);
            }
            Some(_) => {}
            None => self.density.clear_highlight(),
        }
        self.projector
            .reselect(&mut self.frame, self.store.mobiles(), selected);
        selected
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.density.clear_highlight();
        self.projector.reselect(&mut self.frame, self.store.mobiles(), None);
    }

    /// Becoming visible again catches up on any suppressed updates.
    pub fn set_watching(&mut self, watching: bool) {
        let resumed = watching && !self.watching;
        self.watching = watching;
        if resumed {
            self.recompute();
        }
    }

    pub fn set_zoom_percent(&mut self, zoom_percent: f64) {
        let ratio = zoom_ratio(zoom_percent);
        self.projector.zoom_ratio = ratio;
        self.density.set_zoom_ratio(ratio);
        self.recompute();
    }

    pub fn set_radius(&mut self, radius_m: f64) {
        self.projector.max_range_m = radius_m;
        self.density.set_radius(radius_m);
        self.recompute();
    }

    pub fn set_band_count(&mut self, band_count: usize) {
        self.density.set_band_count(band_count);
        self.recompute();
    }

    pub fn set_wedge_count(&mut self, wedge_count: usize) {
        self.density.set_wedge_count(wedge_count);
        self.recompute();
    }

    pub fn set_distribution(&mut self, boundaries: &[u32]) -> DomainResult<()> {
        self.density.set_distribution(boundaries)?;
        self.recompute();
        Ok(())
    }

    pub fn set_color_visible(&mut self, color: MobileColor, visible: bool) {
        self.filter.set_color(color, visible);
        self.recompute();
    }

    pub fn set_shape_visible(&mut self, shape: MobileShape, visible: bool) {
        self.filter.set_shape(shape, visible);
        self.recompute();
    }

    /// Forget the current run; the next envelope should be an initial load.
    pub fn reset(&mut self) {
        self.store.reset();
        self.selection.clear();
        self.density.clear_highlight();
        self.recompute();
        info!("Store reset, run {}", self.store.run_id());
    }

    fn drop_stale_selection(&mut self) {
        if let Some(id) = self.selection.selected() {
            if !self.store.contains(id) {
                debug!("Selected mobile {} was deleted", id);
                self.clear_selection();
            }
        }
    }
}
