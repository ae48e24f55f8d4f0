use super::aggregate::{Mobile, MobileId, SimulationConfig};
use super::patch::{parse_mobile_id, MobilePatch};
use crate::common::{DomainError, DomainEvent, DomainResult, Envelope};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    InitialLoad,
    MobilesCreated,
    MobilesUpdated,
    MobilesDeleted,
    SimulationConfigUpdated,
}

impl EventType {
    pub const ALL: [EventType; 5] = [
        EventType::InitialLoad,
        EventType::MobilesCreated,
        EventType::MobilesUpdated,
        EventType::MobilesDeleted,
        EventType::SimulationConfigUpdated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::InitialLoad => "INITIAL_LOAD",
            EventType::MobilesCreated => "MOBILES_CREATED",
            EventType::MobilesUpdated => "MOBILES_UPDATED",
            EventType::MobilesDeleted => "MOBILES_DELETED",
            EventType::SimulationConfigUpdated => "SIMULATION_CONFIG_UPDATED",
        }
    }

    /// Kinds that change set membership. Derived views must follow them even
    /// while hidden.
    pub fn changes_membership(&self) -> bool {
        matches!(
            self,
            EventType::InitialLoad | EventType::MobilesCreated | EventType::MobilesDeleted
        )
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::InvalidEventKind { kind: s.to_string() })
    }
}

/// A decoded envelope. Payload maps that were absent on the wire stay `None`.
#[derive(Debug, Clone)]
pub enum SitacEvent {
    InitialLoad {
        config: SimulationConfig,
        mobiles: Vec<Mobile>,
        timestamp: DateTime<Utc>,
    },
    MobilesCreated {
        patches: Option<Vec<(MobileId, MobilePatch)>>,
        timestamp: DateTime<Utc>,
    },
    MobilesUpdated {
        patches: Option<Vec<(MobileId, MobilePatch)>>,
        timestamp: DateTime<Utc>,
    },
    MobilesDeleted {
        ids: Option<HashSet<MobileId>>,
        timestamp: DateTime<Utc>,
    },
    SimulationConfigUpdated {
        config: SimulationConfig,
        timestamp: DateTime<Utc>,
    },
}

impl SitacEvent {
    pub fn kind(&self) -> EventType {
        match self {
            SitacEvent::InitialLoad { .. } => EventType::InitialLoad,
            SitacEvent::MobilesCreated { .. } => EventType::MobilesCreated,
            SitacEvent::MobilesUpdated { .. } => EventType::MobilesUpdated,
            SitacEvent::MobilesDeleted { .. } => EventType::MobilesDeleted,
            SitacEvent::SimulationConfigUpdated { .. } => EventType::SimulationConfigUpdated,
        }
    }

    pub fn from_envelope(envelope: &Envelope) -> DomainResult<Self> {
        let kind: EventType = envelope.event_type.parse()?;
        let timestamp = envelope.occurred_at();

        let event = match kind {
            EventType::InitialLoad => {
                let (Some(config), Some(mobiles)) = (&envelope.config, &envelope.mobiles) else {
                    return Err(DomainError::invalid_envelope(
                        "initial load requires both config and mobiles",
                    ));
                };
                SitacEvent::InitialLoad {
                    config: decode_config(config)?,
                    mobiles: decode_mobiles(mobiles)?,
                    timestamp,
                }
            }
            EventType::MobilesCreated => SitacEvent::MobilesCreated {
                patches: envelope.mobiles.as_ref().map(decode_patches).transpose()?,
                timestamp,
            },
            EventType::MobilesUpdated => SitacEvent::MobilesUpdated {
                patches: envelope.mobiles.as_ref().map(decode_patches).transpose()?,
                timestamp,
            },
            EventType::MobilesDeleted => SitacEvent::MobilesDeleted {
                ids: envelope.mobiles.as_ref().map(decode_ids).transpose()?,
                timestamp,
            },
            EventType::SimulationConfigUpdated => {
                let config = envelope.config.as_ref().ok_or_else(|| {
                    DomainError::invalid_envelope("config update carries no config")
                })?;
                SitacEvent::SimulationConfigUpdated {
                    config: decode_config(config)?,
                    timestamp,
                }
            }
        };
        Ok(event)
    }
}

impl DomainEvent for SitacEvent {
    fn event_type(&self) -> &'static str {
        self.kind().as_str()
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SitacEvent::InitialLoad { timestamp, .. } => *timestamp,
            SitacEvent::MobilesCreated { timestamp, .. } => *timestamp,
            SitacEvent::MobilesUpdated { timestamp, .. } => *timestamp,
            SitacEvent::MobilesDeleted { timestamp, .. } => *timestamp,
            SitacEvent::SimulationConfigUpdated { timestamp, .. } => *timestamp,
        }
    }
}

fn decode_config(value: &Value) -> DomainResult<SimulationConfig> {
    SimulationConfig::deserialize(value)
        .map_err(|e| DomainError::invalid_envelope(format!("malformed config: {}", e)))
}

fn decode_mobiles(map: &Map<String, Value>) -> DomainResult<Vec<Mobile>> {
    map.iter()
        .map(|(key, value)| {
            Mobile::deserialize(value).map_err(|e| DomainError::malformed(key, e.to_string()))
        })
        .collect()
}

fn decode_patches(map: &Map<String, Value>) -> DomainResult<Vec<(MobileId, MobilePatch)>> {
    let mut seen = HashSet::with_capacity(map.len());
    let mut patches = Vec::with_capacity(map.len());
    for (key, value) in map {
        let (id, patch) = MobilePatch::parse(key, value)?;
        if !seen.insert(id) {
            return Err(DomainError::malformed(key, "id appears twice in the batch"));
        }
        patches.push((id, patch));
    }
    Ok(patches)
}

fn decode_ids(map: &Map<String, Value>) -> DomainResult<HashSet<MobileId>> {
    map.keys().map(|key| parse_mobile_id(key)).collect()
}

/// What subscribers are told after an envelope has been applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigNotification {
    /// A new config snapshot was received.
    Snapshot(SimulationConfig),
    /// Membership changed; derived counts should be refreshed from the store.
    Refresh,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StoreNotification {
    Mobiles(EventType),
    Config(ConfigNotification),
}
