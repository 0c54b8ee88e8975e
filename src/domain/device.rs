use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Device tier, ordered from least to most capable
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DeviceTier {
    Entry,
    Standard,
    Premium,
}

/// A catalogue entry describing one kind of device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceModel {
    pub id: String,
    pub name: String,
    pub category: String,
    pub tier: DeviceTier,
    pub release_year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub successor_id: Option<String>,
    /// Unsupported models are always eligible for replacement
    pub supported: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitStatus {
    Available,
    Assigned,
    Reserved,
    InRepair,
    Retired,
}

/// A physical device held in inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceUnit {
    pub id: Uuid,
    pub model_id: String,
    pub serial: String,
    pub status: UnitStatus,
    pub acquired_at: DateTime<Utc>,
}

impl DeviceUnit {
    /// Age in whole years as of `now`
    pub fn age_years(&self, now: DateTime<Utc>) -> u32 {
        let mut years = now.year() - self.acquired_at.year();
        if (now.month(), now.day()) < (self.acquired_at.month(), self.acquired_at.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }
}

/// Association of a member with the unit they hold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDeviceLink {
    pub id: Uuid,
    pub user_id: String,
    pub unit_id: Uuid,
    pub model_id: String,
    pub linked_at: DateTime<Utc>,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn unit_acquired(y: i32, m: u32, d: u32) -> DeviceUnit {
        DeviceUnit {
            id: Uuid::new_v4(),
            model_id: "tab-1".to_string(),
            serial: "SN-1".to_string(),
            status: UnitStatus::Assigned,
            acquired_at: Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn age_counts_whole_years_only() {
        let now = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(unit_acquired(2023, 6, 1).age_years(now), 3);
        assert_eq!(unit_acquired(2023, 6, 2).age_years(now), 2);
        assert_eq!(unit_acquired(2027, 1, 1).age_years(now), 0);
    }

    #[test]
    fn tiers_are_ordered() {
        assert!(DeviceTier::Entry < DeviceTier::Standard);
        assert!(DeviceTier::Standard < DeviceTier::Premium);
        assert_eq!("PREMIUM".parse::<DeviceTier>().unwrap(), DeviceTier::Premium);
    }

    #[test]
    fn unit_status_round_trips_through_strings() {
        assert_eq!(UnitStatus::InRepair.to_string(), "in_repair");
        assert_eq!("in_repair".parse::<UnitStatus>().unwrap(), UnitStatus::InRepair);
        assert!("lost".parse::<UnitStatus>().is_err());
    }
}
