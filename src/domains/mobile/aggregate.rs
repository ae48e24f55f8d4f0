use super::events::{ConfigNotification, EventType, SitacEvent, StoreNotification};
use super::patch::MobilePatch;
use crate::common::{AggregateRoot, DomainError, DomainResult, Envelope};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use uuid::Uuid;

pub type MobileId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobileShape {
    Circle,
    Square,
    Triangle,
    Diamond,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MobileColor {
    Blue,
    Violet,
    Red,
    Orange,
    Yellow,
    Green,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kinematics {
    pub x_m: f64,
    pub y_m: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading_rad: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation_rad: Option<f64>,
    #[serde(default, rename = "speedMS", skip_serializing_if = "Option::is_none")]
    pub speed_m_s: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spinning_speed_rad_s: Option<f64>,
}

impl Kinematics {
    pub fn at(x_m: f64, y_m: f64) -> Self {
        Self {
            x_m,
            y_m,
            z_m: None,
            heading_rad: None,
            orientation_rad: None,
            speed_m_s: None,
            spinning_speed_rad_s: None,
        }
    }
}

/// Auxiliary payload block. Every key is optional so the same type doubles as
/// its own partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraMobileData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data2: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data4: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data5: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data6: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data7: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data8: Option<bool>,
}

impl ExtraMobileData {
    pub fn merge(&mut self, patch: &ExtraMobileData) {
        if patch.data1.is_some() {
            self.data1 = patch.data1;
        }
        if patch.data2.is_some() {
            self.data2 = patch.data2;
        }
        if patch.data3.is_some() {
            self.data3 = patch.data3.clone();
        }
        if patch.data4.is_some() {
            self.data4 = patch.data4;
        }
        if patch.data5.is_some() {
            self.data5 = patch.data5;
        }
        if patch.data6.is_some() {
            self.data6 = patch.data6.clone();
        }
        if patch.data7.is_some() {
            self.data7 = patch.data7;
        }
        if patch.data8.is_some() {
            self.data8 = patch.data8;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mobile {
    pub id: MobileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<MobileShape>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<MobileColor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_timestamp_ms: Option<i64>,
    #[serde(default)]
    pub update_timestamp_ms: i64,
    pub kinematics: Kinematics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_mobile_data1: Option<ExtraMobileData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_mobile_data2: Option<ExtraMobileData>,
}

impl Mobile {
    pub fn new(id: MobileId, shape: MobileShape, color: MobileColor, kinematics: Kinematics) -> Self {
        Self {
            id,
            display_id: None,
            shape: Some(shape),
            color: Some(color),
            environment: None,
            creation_timestamp_ms: None,
            update_timestamp_ms: 0,
            kinematics,
            extra_mobile_data1: None,
            extra_mobile_data2: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub max_mobile_distance_from_center_m: f64,
    pub is_simulation_running: bool,
    pub update_period_ms: u64,
    pub mobiles: u64,
}

/// Canonical mobile population plus the latest simulation config.
///
/// The store is the only writer of the population. Consumers read it through
/// `mobiles()` after a notification and keep their derived state elsewhere.
#[derive(Debug, Clone)]
pub struct MobileStore {
    run_id: Uuid,
    aggregate_id: String,
    mobiles: Vec<Mobile>,
    config: Option<SimulationConfig>,
    version: u64,
}

impl Default for MobileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MobileStore {
    pub fn new() -> Self {
        let run_id = Uuid::new_v4();
        Self {
            run_id,
            aggregate_id: run_id.to_string(),
            mobiles: Vec::new(),
            config: None,
            version: 0,
        }
    }

    /// Drop all state and start a new run.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn mobiles(&self) -> &[Mobile] {
        &self.mobiles
    }

    pub fn config(&self) -> Option<&SimulationConfig> {
        self.config.as_ref()
    }

    pub fn len(&self) -> usize {
        self.mobiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mobiles.is_empty()
    }

    pub fn get(&self, id: MobileId) -> Option<&Mobile> {
        self.mobiles.iter().find(|m| m.id == id)
    }

    pub fn contains(&self, id: MobileId) -> bool {
        self.get(id).is_some()
    }

    /// Decode and apply one envelope. Nothing is changed if decoding or
    /// applying fails.
    pub fn apply_envelope(&mut self, envelope: &Envelope) -> DomainResult<Vec<StoreNotification>> {
        let event = SitacEvent::from_envelope(envelope)?;
        self.apply(&event)
    }

    fn index_map(&self) -> HashMap<MobileId, usize> {
        self.mobiles
            .iter()
            .enumerate()
            .map(|(index, mobile)| (mobile.id, index))
            .collect()
    }

    /// Merge a batch of partial mobiles. Existing ids are merged field by field,
    /// unknown ids are inserted. Every patch is staged first and the batch is
    /// committed only when all of them are valid.
    fn merge_patches(&mut self, patches: &[(MobileId, MobilePatch)]) -> DomainResult<()> {
        let index = self.index_map();
        let mut updates: Vec<(usize, Mobile)> = Vec::new();
        let mut inserts: Vec<Mobile> = Vec::new();

        for (id, patch) in patches {
            match index.get(id) {
                Some(&position) => {
                    let mut merged = self.mobiles[position].clone();
                    patch.apply_to(&mut merged);
                    updates.push((position, merged));
                }
                None => inserts.push(patch.to_mobile(*id)?),
            }
        }

        for (position, mobile) in updates {
            self.mobiles[position] = mobile;
        }
        self.mobiles.extend(inserts);
        Ok(())
    }

    fn replace_all(&mut self, config: &SimulationConfig, mobiles: &[Mobile]) -> DomainResult<()> {
        let mut seen = HashSet::with_capacity(mobiles.len());
        if let Some(duplicate) = mobiles.iter().find(|m| !seen.insert(m.id)) {
            return Err(DomainError::invalid_envelope(format!(
                "initial load lists mobile {} more than once",
                duplicate.id
            )));
        }
        self.mobiles = mobiles.to_vec();
        self.config = Some(config.clone());
        Ok(())
    }
}

impl AggregateRoot for MobileStore {
    type Event = SitacEvent;
    type Notification = StoreNotification;

    fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<Vec<Self::Notification>> {
        let notifications = match event {
            SitacEvent::InitialLoad { config, mobiles, .. } => {
                self.replace_all(config, mobiles)?;
                vec![
                    StoreNotification::Mobiles(EventType::InitialLoad),
                    StoreNotification::Config(ConfigNotification::Snapshot(config.clone())),
                ]
            }
            SitacEvent::MobilesUpdated { patches, .. } => match patches {
                Some(patches) => {
                    self.merge_patches(patches)?;
                    vec![StoreNotification::Mobiles(EventType::MobilesUpdated)]
                }
                None => Vec::new(),
            },
            SitacEvent::MobilesCreated { patches, .. } => match patches {
                Some(patches) => {
                    self.merge_patches(patches)?;
                    vec![
                        StoreNotification::Mobiles(EventType::MobilesCreated),
                        StoreNotification::Config(ConfigNotification::Refresh),
                    ]
                }
                None => Vec::new(),
            },
            SitacEvent::MobilesDeleted { ids, .. } => match ids {
                Some(ids) => {
                    self.mobiles.retain(|mobile| !ids.contains(&mobile.id));
                    vec![
                        StoreNotification::Mobiles(EventType::MobilesDeleted),
                        StoreNotification::Config(ConfigNotification::Refresh),
                    ]
                }
                None => Vec::new(),
            },
            SitacEvent::SimulationConfigUpdated { config, .. } => {
                self.config = Some(config.clone());
                vec![StoreNotification::Config(ConfigNotification::Snapshot(config.clone()))]
            }
        };

        self.version += 1;
        debug!(
            kind = %event.kind(),
            mobiles = self.mobiles.len(),
            version = self.version,
            "applied envelope"
        );
        Ok(notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: serde_json::Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    fn initial_load() -> Envelope {
        envelope(json!({
            "eventType": "INITIAL_LOAD",
            "timestampMs": 1,
            "config": {
                "centerX": 0.0, "centerY": 0.0, "maxMobileDistanceFromCenterM": 10000.0,
                "isSimulationRunning": true, "updatePeriodMs": 1000, "mobiles": 2
            },
            "mobiles": {
                "1": { "id": 1, "shape": "CIRCLE", "color": "BLUE", "updateTimestampMs": 1,
                       "kinematics": { "xM": 10.0, "yM": 20.0, "headingRad": 1.0 } },
                "2": { "id": 2, "shape": "SQUARE", "color": "RED", "updateTimestampMs": 1,
                       "kinematics": { "xM": -5.0, "yM": 3.0 } }
            }
        }))
    }

    #[test]
    fn test_failed_batch_leaves_store_untouched() {
        let mut store = MobileStore::new();
        store.apply_envelope(&initial_load()).unwrap();
        let before = store.mobiles().to_vec();

        // mobile 1 is a valid merge, mobile 9 cannot be created without a position
        let result = store.apply_envelope(&envelope(json!({
            "eventType": "MOBILES_UPDATED",
            "timestampMs": 2,
            "mobiles": {
                "1": { "kinematics": { "xM": 99.0 } },
                "9": { "shape": "CIRCLE" }
            }
        })));

        assert!(matches!(result, Err(DomainError::MalformedUpdate { .. })));
        assert_eq!(store.mobiles(), before.as_slice());
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_duplicate_ids_on_initial_load_are_rejected() {
        let mut store = MobileStore::new();
        let result = store.apply_envelope(&envelope(json!({
            "eventType": "INITIAL_LOAD",
            "timestampMs": 1,
            "config": {
                "centerX": 0.0, "centerY": 0.0, "maxMobileDistanceFromCenterM": 10000.0,
                "isSimulationRunning": true, "updatePeriodMs": 1000, "mobiles": 2
            },
            "mobiles": {
                "1": { "id": 4, "kinematics": { "xM": 0.0, "yM": 0.0 } },
                "2": { "id": 4, "kinematics": { "xM": 1.0, "yM": 1.0 } }
            }
        })));

        assert!(matches!(result, Err(DomainError::InvalidEnvelope { .. })));
        assert!(store.is_empty());
        assert!(store.config().is_none());
    }

    #[test]
    fn test_reset_starts_a_new_run() {
        let mut store = MobileStore::new();
        store.apply_envelope(&initial_load()).unwrap();
        let first_run = store.run_id();

        store.reset();

        assert!(store.is_empty());
        assert!(store.config().is_none());
        assert_eq!(store.version(), 0);
        assert_ne!(store.run_id(), first_run);
    }
}
