use crate::core::normalize::{
    normalize_asset_tag, normalize_person_name, normalize_room_code, optional_text,
};
use crate::core::outcome::{Accepted, Outcome, Rejection};
use crate::db::log::audit;
use crate::db::movements::{list_movements, relocate_equipment};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::models::filters::MovementFilter;
use crate::models::movement::{Movement, Relocation};
use chrono::NaiveDateTime;

pub struct RelocateLogic;

impl RelocateLogic {
    /// Move an item to another room and append its ledger entry.
    ///
    /// A destination is mandatory. Nothing is written when the destination
    /// is rejected or the item does not exist.
    pub fn relocate(
        pool: &mut DbPool,
        equipment_id: i64,
        destination: &str,
        reason: Option<&str>,
        responsible: Option<&str>,
        timestamp: NaiveDateTime,
        notes: Option<&str>,
    ) -> Outcome<Movement> {
        let destination_room = normalize_room_code(destination);
        if destination_room.is_empty() {
            return Err(Rejection::validation("A destination room is required."));
        }

        let req = Relocation {
            equipment_id,
            destination_room,
            reason: optional_text(reason),
            responsible: optional_text(responsible).map(|r| normalize_person_name(&r)),
            timestamp,
            notes: optional_text(notes),
        };

        let movement_id = relocate_equipment(&mut pool.conn, &req)?;

        let movement = list_movements(
            &pool.conn,
            &MovementFilter {
                equipment_id: Some(equipment_id),
                ..Default::default()
            },
        )?
        .into_iter()
        .find(|m| m.id == movement_id)
        .ok_or_else(|| Rejection::failure("Movement record missing after commit."))?;

        let message = format!(
            "Equipment #{equipment_id} moved from {} to {}.",
            movement.origin_room.as_deref().unwrap_or("(no room)"),
            movement.destination_room
        );
        audit(&pool.conn, "equipment_move", &equipment_id.to_string(), &message);

        Ok(Accepted::new(movement).with_message(message))
    }

    /// Ledger query; room and tag filters are normalized first.
    pub fn history(pool: &DbPool, filter: &MovementFilter) -> AppResult<Vec<Movement>> {
        let room = |r: &Option<String>| {
            r.as_deref()
                .map(normalize_room_code)
                .filter(|r| !r.is_empty())
        };
        let filter = MovementFilter {
            tag: normalize_asset_tag(filter.tag.as_deref()),
            origin_room: room(&filter.origin_room),
            destination_room: room(&filter.destination_room),
            ..filter.clone()
        };
        list_movements(&pool.conn, &filter)
    }
}
