use crate::core::outcome::{Accepted, Outcome, Rejection};
use crate::core::validate::validate_equipment;
use crate::db::equipment::{insert_equipment, tag_exists};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::rooms::ensure_room;
use crate::db::txn::scoped;
use chrono::NaiveDateTime;

/// The sanctioned way to create equipment from untrusted input.
pub struct IntakeLogic;

impl IntakeLogic {
    /// Validate, check the tag, register the room and insert.
    ///
    /// Returns the new item's id. A tag taken by a concurrent session
    /// between the pre-check and the insert is reported as the same conflict.
    #[allow(clippy::too_many_arguments)]
    pub fn intake(
        pool: &mut DbPool,
        name: &str,
        category: &str,
        state: &str,
        room: &str,
        responsible: &str,
        registered_at: NaiveDateTime,
        tag: Option<&str>,
    ) -> Outcome<i64> {
        let record = validate_equipment(name, category, state, room, tag)?
            .into_record(responsible, registered_at);

        if let Some(tag) = &record.tag
            && tag_exists(&pool.conn, tag, None)?
        {
            return Err(Rejection::conflict(format!(
                "Asset tag '{tag}' is already assigned to another item."
            )));
        }

        let id = scoped(&mut pool.conn, "intake_equipment", |tx| {
            ensure_room(tx, &record.room)?;
            insert_equipment(tx, &record)
        })?;

        let message = format!(
            "Registered #{id} '{}' ({}) in {}{}.",
            record.name,
            record.category.to_db_str(),
            record.room,
            record
                .tag
                .as_deref()
                .map(|t| format!(" with tag {t}"))
                .unwrap_or_default()
        );
        audit(&pool.conn, "equipment_add", &id.to_string(), &message);

        Ok(Accepted::new(id).with_message(message))
    }
}
