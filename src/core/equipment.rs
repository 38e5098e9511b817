use crate::core::actor::Actor;
use crate::core::normalize::{normalize_asset_tag, normalize_person_name, normalize_room_code};
use crate::core::outcome::{Accepted, Outcome, Rejection};
use crate::core::validate::{validate_category, validate_equipment_name, validate_state};
use crate::db::equipment::{delete_equipment, get_equipment, list_equipment, update_equipment};
use crate::db::log::audit;
use crate::db::movements::list_movements;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::equipment::{Equipment, EquipmentPatch};
use crate::models::filters::{EquipmentFilter, MovementFilter};

/// Raw field edits as typed by a caller. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct EquipmentEdit {
    pub name: Option<String>,
    pub category: Option<String>,
    pub state: Option<String>,
    pub responsible: Option<String>,
    pub tag: Option<String>,
    pub clear_tag: bool,
}

/// Validate raw edits into the closed patch structure.
///
/// An empty `tag` is the same as `clear_tag`.
pub fn build_patch(edit: &EquipmentEdit) -> Result<EquipmentPatch, Rejection> {
    if edit.clear_tag && edit.tag.is_some() {
        return Err(Rejection::validation(
            "Use either a new tag or clear the tag, not both.",
        ));
    }

    let patch = EquipmentPatch {
        name: edit
            .name
            .as_deref()
            .map(validate_equipment_name)
            .transpose()?,
        category: edit.category.as_deref().map(validate_category).transpose()?,
        state: edit.state.as_deref().map(validate_state).transpose()?,
        responsible: edit.responsible.as_deref().map(normalize_person_name),
        tag: if edit.clear_tag {
            Some(None)
        } else {
            edit.tag.as_deref().map(|t| normalize_asset_tag(Some(t)))
        },
    };

    if patch.is_empty() {
        return Err(Rejection::validation("No fields to update."));
    }
    Ok(patch)
}

pub struct EquipmentLogic;

impl EquipmentLogic {
    pub fn update(pool: &mut DbPool, id: i64, edit: &EquipmentEdit) -> Outcome<Equipment> {
        let patch = build_patch(edit)?;
        update_equipment(&mut pool.conn, id, &patch)?;

        let item = get_equipment(&pool.conn, id)?
            .ok_or_else(|| Rejection::not_found(format!("Equipment #{id} not found.")))?;

        let message = format!("Updated equipment #{id} '{}'.", item.name);
        audit(&pool.conn, "equipment_update", &id.to_string(), &message);
        Ok(Accepted::new(item).with_message(message))
    }

    /// Hard delete; privileged. The movement history goes with the item.
    pub fn delete(pool: &mut DbPool, actor: &Actor, id: i64) -> Outcome<()> {
        actor.require_admin("delete equipment")?;

        let Some(item) = get_equipment(&pool.conn, id)? else {
            return Err(Rejection::not_found(format!("Equipment #{id} not found.")));
        };

        let history = list_movements(
            &pool.conn,
            &MovementFilter {
                equipment_id: Some(id),
                ..Default::default()
            },
        )?
        .len();

        if delete_equipment(&pool.conn, id)? == 0 {
            return Err(Rejection::not_found(format!("Equipment #{id} not found.")));
        }

        let message = format!(
            "Deleted equipment #{id} '{}' and {history} movement record(s).",
            item.name
        );
        audit(&pool.conn, "equipment_del", &id.to_string(), &message);
        Ok(Accepted::done().with_message(message))
    }

    pub fn get(pool: &DbPool, id: i64) -> AppResult<Option<Equipment>> {
        get_equipment(&pool.conn, id)
    }

    pub fn list(pool: &DbPool, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
        let filter = EquipmentFilter {
            room: filter
                .room
                .as_deref()
                .map(normalize_room_code)
                .filter(|r| !r.is_empty()),
            tag: normalize_asset_tag(filter.tag.as_deref()),
            ..filter.clone()
        };
        list_equipment(&pool.conn, &filter)
    }
}
