use parking_lot::RwLock;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::RepoError;
use crate::domain::{DeviceModel, DeviceUnit, UnitStatus, UserDeviceLink};

/// Device models, units and the member links between them
#[derive(Default)]
pub struct DeviceRepository {
    models: RwLock<BTreeMap<String, DeviceModel>>,
    units: RwLock<BTreeMap<Uuid, DeviceUnit>>,
    links: RwLock<BTreeMap<Uuid, UserDeviceLink>>,
}

impl DeviceRepository {
    pub fn insert_model(&self, model: DeviceModel) -> Result<(), RepoError> {
        let mut models = self.models.write();
        if models.contains_key(&model.id) {
            return Err(RepoError::conflict("device model", &model.id));
        }
        models.insert(model.id.clone(), model);
        Ok(())
    }

    pub fn list_models(&self) -> Vec<DeviceModel> {
        self.models.read().values().cloned().collect()
    }

    pub fn insert_unit(&self, unit: DeviceUnit) -> Result<(), RepoError> {
        if !self.models.read().contains_key(&unit.model_id) {
            return Err(RepoError::not_found("device model", &unit.model_id));
        }
        let mut units = self.units.write();
        if units.values().any(|u| u.serial == unit.serial) {
            return Err(RepoError::conflict("device unit serial", &unit.serial));
        }
        units.insert(unit.id, unit);
        Ok(())
    }

    pub fn find_unit(&self, id: Uuid) -> Option<DeviceUnit> {
        self.units.read().get(&id).cloned()
    }

    pub fn list_units(&self) -> Vec<DeviceUnit> {
        self.units.read().values().cloned().collect()
    }

    /// Set a unit's status without breaking its link state.
    ///
    /// `assigned` is only reachable through `link`. A linked unit may go to
    /// repair or retirement, which ends the link; any other change is refused.
    pub fn update_unit_status(&self, id: Uuid, status: UnitStatus) -> Result<DeviceUnit, RepoError> {
        let mut units = self.units.write();
        let mut links = self.links.write();

        let unit = units.get_mut(&id).ok_or_else(|| RepoError::not_found("device unit", id))?;
        if unit.status == status {
            return Ok(unit.clone());
        }
        let active_link = links.values_mut().find(|l| l.active && l.unit_id == id);

        match (status, active_link) {
            (UnitStatus::Assigned, _) => return Err(RepoError::conflict("device unit assignment", id)),
            (UnitStatus::InRepair | UnitStatus::Retired, Some(link)) => link.active = false,
            (UnitStatus::Available | UnitStatus::Reserved, Some(_)) => {
                return Err(RepoError::conflict("device unit assignment", id))
            }
            (_, None) => {}
        }
        unit.status = status;
        Ok(unit.clone())
    }

    /// Link a member to an available unit and mark it assigned.
    pub fn link(&self, user_id: &str, unit_id: Uuid, now: chrono::DateTime<chrono::Utc>) -> Result<UserDeviceLink, RepoError> {
        let mut units = self.units.write();
        let mut links = self.links.write();

        let unit = units
            .get_mut(&unit_id)
            .ok_or_else(|| RepoError::not_found("device unit", unit_id))?;
        if unit.status != UnitStatus::Available
            || links.values().any(|l| l.active && l.unit_id == unit_id)
        {
            return Err(RepoError::conflict("device unit assignment", unit_id));
        }

        unit.status = UnitStatus::Assigned;
        let link = UserDeviceLink {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            unit_id,
            model_id: unit.model_id.clone(),
            linked_at: now,
            active: true,
        };
        links.insert(link.id, link.clone());
        Ok(link)
    }

    /// Deactivate a link and return its unit to stock.
    pub fn unlink(&self, link_id: Uuid) -> Result<UserDeviceLink, RepoError> {
        let mut units = self.units.write();
        let mut links = self.links.write();

        let link = links
            .get_mut(&link_id)
            .filter(|l| l.active)
            .ok_or_else(|| RepoError::not_found("device link", link_id))?;
        link.active = false;
        if let Some(unit) = units.get_mut(&link.unit_id) {
            if unit.status == UnitStatus::Assigned {
                unit.status = UnitStatus::Available;
            }
        }
        Ok(link.clone())
    }

    pub fn list_links(&self) -> Vec<UserDeviceLink> {
        self.links.read().values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DeviceTier;
    use chrono::Utc;

    fn repo_with_unit() -> (DeviceRepository, Uuid) {
        let repo = DeviceRepository::default();
        repo.insert_model(DeviceModel {
            id: "tab-1".to_string(),
            name: "Tab 1".to_string(),
            category: "tablet".to_string(),
            tier: DeviceTier::Entry,
            release_year: 2022,
            successor_id: None,
            supported: true,
        })
        .unwrap();
        let unit = DeviceUnit {
            id: Uuid::new_v4(),
            model_id: "tab-1".to_string(),
            serial: "SN-001".to_string(),
            status: UnitStatus::Available,
            acquired_at: Utc::now(),
        };
        let id = unit.id;
        repo.insert_unit(unit).unwrap();
        (repo, id)
    }

    #[test]
    fn units_require_known_model_and_unique_serial() {
        let (repo, id) = repo_with_unit();
        let mut dup = repo.find_unit(id).unwrap();
        dup.id = Uuid::new_v4();
        assert_eq!(repo.insert_unit(dup.clone()), Err(RepoError::conflict("device unit serial", "SN-001")));

        dup.serial = "SN-002".to_string();
        dup.model_id = "ghost".to_string();
        assert_eq!(repo.insert_unit(dup), Err(RepoError::not_found("device model", "ghost")));
    }

    #[test]
    fn link_assigns_and_unlink_releases() {
        let (repo, unit_id) = repo_with_unit();
        let link = repo.link("amara", unit_id, Utc::now()).unwrap();
        assert_eq!(repo.find_unit(unit_id).unwrap().status, UnitStatus::Assigned);
        assert!(repo.link("kofi", unit_id, Utc::now()).is_err());

        repo.unlink(link.id).unwrap();
        assert_eq!(repo.find_unit(unit_id).unwrap().status, UnitStatus::Available);
        assert!(repo.unlink(link.id).is_err());
    }

    #[test]
    fn linked_unit_cannot_be_freed_by_status_change() {
        let (repo, unit_id) = repo_with_unit();
        repo.link("amara", unit_id, Utc::now()).unwrap();

        for status in [UnitStatus::Available, UnitStatus::Reserved] {
            assert_eq!(
                repo.update_unit_status(unit_id, status),
                Err(RepoError::conflict("device unit assignment", unit_id))
            );
        }
        assert_eq!(repo.find_unit(unit_id).unwrap().status, UnitStatus::Assigned);
        assert!(repo.list_links().iter().all(|l| l.active));
    }

    #[test]
    fn repair_ends_the_link_and_keeps_counts_consistent() {
        let (repo, unit_id) = repo_with_unit();
        repo.link("amara", unit_id, Utc::now()).unwrap();

        let unit = repo.update_unit_status(unit_id, UnitStatus::InRepair).unwrap();
        assert_eq!(unit.status, UnitStatus::InRepair);
        assert!(repo.list_links().iter().all(|l| !l.active));

        repo.update_unit_status(unit_id, UnitStatus::Available).unwrap();
        let link = repo.link("kofi", unit_id, Utc::now()).unwrap();
        assert!(link.active);
    }

    #[test]
    fn assigned_is_only_set_by_linking() {
        let (repo, unit_id) = repo_with_unit();
        assert!(matches!(
            repo.update_unit_status(unit_id, UnitStatus::Assigned),
            Err(RepoError::Conflict { .. })
        ));
    }
}
