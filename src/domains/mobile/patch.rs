use super::aggregate::{ExtraMobileData, Kinematics, Mobile, MobileColor, MobileId, MobileShape};
use crate::common::{DomainError, DomainResult};
use serde::Deserialize;
use serde_json::Value;

/// Partial kinematics: only the keys present on the wire are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KinematicsPatch {
    pub x_m: Option<f64>,
    pub y_m: Option<f64>,
    pub z_m: Option<f64>,
    pub heading_rad: Option<f64>,
    pub orientation_rad: Option<f64>,
    #[serde(rename = "speedMS")]
    pub speed_m_s: Option<f64>,
    pub spinning_speed_rad_s: Option<f64>,
}

impl KinematicsPatch {
    pub fn merge_into(&self, kinematics: &mut Kinematics) {
        if let Some(x_m) = self.x_m {
            kinematics.x_m = x_m;
        }
        if let Some(y_m) = self.y_m {
            kinematics.y_m = y_m;
        }
        if self.z_m.is_some() {
            kinematics.z_m = self.z_m;
        }
        if self.heading_rad.is_some() {
            kinematics.heading_rad = self.heading_rad;
        }
        if self.orientation_rad.is_some() {
            kinematics.orientation_rad = self.orientation_rad;
        }
        if self.speed_m_s.is_some() {
            kinematics.speed_m_s = self.speed_m_s;
        }
        if self.spinning_speed_rad_s.is_some() {
            kinematics.spinning_speed_rad_s = self.spinning_speed_rad_s;
        }
    }

    fn to_kinematics(&self) -> Option<Kinematics> {
        let mut kinematics = Kinematics::at(self.x_m?, self.y_m?);
        self.merge_into(&mut kinematics);
        Some(kinematics)
    }
}

/// Partial mobile carried by create and update envelopes.
///
/// Scalars overwrite, nested blocks merge key by key. A `null` on the wire is
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobilePatch {
    pub id: Option<MobileId>,
    pub display_id: Option<String>,
    pub shape: Option<MobileShape>,
    pub color: Option<MobileColor>,
    pub environment: Option<String>,
    pub creation_timestamp_ms: Option<i64>,
    pub update_timestamp_ms: Option<i64>,
    pub kinematics: Option<KinematicsPatch>,
    pub extra_mobile_data1: Option<ExtraMobileData>,
    pub extra_mobile_data2: Option<ExtraMobileData>,
}

impl MobilePatch {
    /// Decode one `id -> partial mobile` entry of an envelope payload.
    pub fn parse(key: &str, value: &Value) -> DomainResult<(MobileId, MobilePatch)> {
        let id = parse_mobile_id(key)?;
        let patch = MobilePatch::deserialize(value)
            .map_err(|e| DomainError::malformed(key, e.to_string()))?;
        if let Some(declared) = patch.id {
            if declared != id {
                return Err(DomainError::malformed(
                    key,
                    format!("payload declares id {}", declared),
                ));
            }
        }
        Ok((id, patch))
    }

    pub fn apply_to(&self, mobile: &mut Mobile) {
        if self.display_id.is_some() {
            mobile.display_id = self.display_id.clone();
        }
        if self.shape.is_some() {
            mobile.shape = self.shape;
        }
        if self.color.is_some() {
            mobile.color = self.color;
        }
        if self.environment.is_some() {
            mobile.environment = self.environment.clone();
        }
        if self.creation_timestamp_ms.is_some() {
            mobile.creation_timestamp_ms = self.creation_timestamp_ms;
        }
        if let Some(update_timestamp_ms) = self.update_timestamp_ms {
            mobile.update_timestamp_ms = update_timestamp_ms;
        }
        if let Some(kinematics) = &self.kinematics {
            kinematics.merge_into(&mut mobile.kinematics);
        }
        merge_extra(&mut mobile.extra_mobile_data1, &self.extra_mobile_data1);
        merge_extra(&mut mobile.extra_mobile_data2, &self.extra_mobile_data2);
    }

    /// Build a new mobile from a patch whose id is not in the store yet.
    pub fn to_mobile(&self, id: MobileId) -> DomainResult<Mobile> {
        let kinematics = self
            .kinematics
            .as_ref()
            .and_then(KinematicsPatch::to_kinematics)
            .ok_or_else(|| DomainError::malformed(id, "new mobile needs kinematics.xM and kinematics.yM"))?;

        Ok(Mobile {
            id,
            display_id: self.display_id.clone(),
            shape: self.shape,
            color: self.color,
            environment: self.environment.clone(),
            creation_timestamp_ms: self.creation_timestamp_ms,
            update_timestamp_ms: self.update_timestamp_ms.unwrap_or_default(),
            kinematics,
            extra_mobile_data1: self.extra_mobile_data1.clone(),
            extra_mobile_data2: self.extra_mobile_data2.clone(),
        })
    }
}

fn merge_extra(target: &mut Option<ExtraMobileData>, patch: &Option<ExtraMobileData>) {
    if let Some(patch) = patch {
        target.get_or_insert_with(ExtraMobileData::default).merge(patch);
    }
}

pub fn parse_mobile_id(key: &str) -> DomainResult<MobileId> {
    key.trim()
        .parse::<MobileId>()
        .map_err(|_| DomainError::malformed(key, "mobile key is not an integer id"))
}
