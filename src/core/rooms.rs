use crate::core::normalize::{normalize_room_code, optional_text};
use crate::core::outcome::{Accepted, Outcome, Rejection};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::rooms::{get_room, list_rooms, upsert_room};
use crate::errors::AppResult;
use crate::models::room::{Room, RoomFields};

pub struct RoomLogic;

impl RoomLogic {
    /// Register a room or fill in its details. Fields left out keep their
    /// stored values.
    pub fn register(pool: &mut DbPool, code: &str, fields: &RoomFields) -> Outcome<Room> {
        let code = normalize_room_code(code);
        if code.is_empty() {
            return Err(Rejection::validation("A room code is required."));
        }

        let fields = RoomFields {
            name: optional_text(fields.name.as_deref()),
            building: optional_text(fields.building.as_deref()),
            floor: optional_text(fields.floor.as_deref()),
            notes: optional_text(fields.notes.as_deref()),
        };

        upsert_room(&pool.conn, &code, &fields)?;
        let room = get_room(&pool.conn, &code)?
            .ok_or_else(|| Rejection::failure(format!("Room {code} vanished after upsert.")))?;

        let message = format!("Room {} registered.", room.code);
        audit(&pool.conn, "room_upsert", &room.code, &message);
        Ok(Accepted::new(room).with_message(message))
    }

    pub fn list(pool: &DbPool) -> AppResult<Vec<Room>> {
        list_rooms(&pool.conn)
    }
}
