use crate::core::actor::Actor;
use crate::core::normalize::{collapse_spaces, normalize_person_name, normalize_room_code};
use crate::core::outcome::{Accepted, Outcome, Rejection};
use crate::core::validate::validate_instructor_name;
use crate::db::key_events::{
    delete_key_event, get_key_event, insert_key_event, is_key_out, latest_for_room,
    list_key_events, outstanding_keys, summary,
};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::rooms::ensure_room;
use crate::db::txn::scoped;
use crate::errors::{AppError, AppResult};
use crate::models::filters::KeyEventFilter;
use crate::models::key_action::KeyAction;
use crate::models::key_event::{KeyEvent, KeySummary, OutstandingKey};
use crate::models::key_state::{DoubleCheckout, KeyState};
use crate::utils::date::format_timestamp;
use chrono::{Duration, NaiveDateTime};
use tracing::warn;

/// Current state of one room's key.
#[derive(Debug, Clone)]
pub struct KeyStatus {
    pub room: String,
    pub state: KeyState,
    pub latest: Option<KeyEvent>,
}

pub struct KeyLogic;

/// Canonical room for a key operation; a room is mandatory.
fn required_room(raw: &str) -> Result<String, Rejection> {
    let room = normalize_room_code(raw);
    if room.is_empty() {
        return Err(Rejection::validation("A room is required."));
    }
    Ok(room)
}

fn checked_holder(raw: &str) -> Result<String, Rejection> {
    validate_instructor_name(raw)?;
    Ok(normalize_person_name(raw))
}

impl KeyLogic {
    /// Record a delivery or a return for a room's key.
    ///
    /// The state check and the insert run in one IMMEDIATE transaction, so two
    /// sessions cannot both deliver the same key. A return without holder or
    /// area reuses those of the outstanding delivery.
    pub fn register(
        pool: &mut DbPool,
        holder: &str,
        area: &str,
        room: &str,
        action: KeyAction,
        timestamp: NaiveDateTime,
    ) -> Outcome<i64> {
        let room = required_room(room)?;
        let holder_given = !collapse_spaces(holder).is_empty();

        let holder = if holder_given || action.is_delivered() {
            Some(checked_holder(holder)?)
        } else {
            None
        };
        let area = collapse_spaces(area);

        let (id, holder, was_out) = scoped(&mut pool.conn, "register_key_event", |tx| {
            let latest = latest_for_room(tx, &room)?;

            // The machine only moves forward in time.
            if let Some(ev) = &latest
                && timestamp < ev.timestamp
            {
                return Err(AppError::Validation(format!(
                    "The timestamp {} is earlier than the last event for {room} ({}).",
                    format_timestamp(&timestamp),
                    ev.timestamp_str()
                )));
            }

            let state = KeyState::from_latest(latest.as_ref().map(|ev| ev.action));

            if let Err(DoubleCheckout) = state.apply(action) {
                let by = latest.as_ref().map(|ev| ev.holder.as_str()).unwrap_or("?");
                return Err(AppError::Conflict(format!(
                    "The key for {room} is already checked out (delivered to {by})."
                )));
            }

            let outstanding = latest.filter(|ev| ev.action.is_delivered());
            let holder = match (holder, &outstanding) {
                (Some(h), _) => h,
                (None, Some(ev)) => ev.holder.clone(),
                (None, None) => {
                    return Err(AppError::Validation(format!(
                        "The key for {room} is not out; a holder name is required."
                    )));
                }
            };
            let area = match (area.is_empty(), &outstanding) {
                (true, Some(ev)) if !action.is_delivered() => ev.area.clone(),
                _ => area,
            };

            ensure_room(tx, &room)?;
            let id = insert_key_event(tx, &holder, &area, &room, action, &timestamp)?;
            Ok((id, holder, state.is_out()))
        })?;

        let message = match action {
            KeyAction::Delivered => format!("Key for {room} delivered to {holder}."),
            KeyAction::Returned if was_out => format!("Key for {room} returned by {holder}."),
            KeyAction::Returned => {
                warn!(room = %room, "return recorded for a key that was not out");
                format!("Key for {room} returned by {holder} (it was not recorded as out).")
            }
        };

        let op = match action {
            KeyAction::Delivered => "key_deliver",
            KeyAction::Returned => "key_return",
        };
        audit(&pool.conn, op, &room, &message);

        Ok(Accepted::new(id).with_message(message))
    }

    pub fn is_key_out(pool: &DbPool, room: &str) -> AppResult<bool> {
        let room = normalize_room_code(room);
        if room.is_empty() {
            return Ok(false);
        }
        is_key_out(&pool.conn, &room)
    }

    pub fn status(pool: &DbPool, room: &str) -> Result<KeyStatus, Rejection> {
        let room = required_room(room)?;
        let latest = latest_for_room(&pool.conn, &room)?;
        let state = KeyState::from_latest(latest.as_ref().map(|ev| ev.action));
        Ok(KeyStatus {
            room,
            state,
            latest,
        })
    }

    /// Keys currently out, flagged overdue after `overdue_after_hours`.
    pub fn outstanding(
        pool: &DbPool,
        overdue_after_hours: i64,
        now: NaiveDateTime,
    ) -> AppResult<Vec<OutstandingKey>> {
        let limit = Duration::hours(overdue_after_hours.max(0));
        Ok(outstanding_keys(&pool.conn)?
            .into_iter()
            .map(|event| {
                let overdue = now - event.timestamp > limit;
                OutstandingKey { event, overdue }
            })
            .collect())
    }

    pub fn list(pool: &DbPool, filter: &KeyEventFilter) -> AppResult<Vec<KeyEvent>> {
        list_key_events(&pool.conn, &normalized(filter))
    }

    pub fn summary(pool: &DbPool, filter: &KeyEventFilter) -> AppResult<KeySummary> {
        summary(&pool.conn, &normalized(filter))
    }

    /// Hard delete of one key event; privileged.
    pub fn delete(pool: &mut DbPool, actor: &Actor, id: i64) -> Outcome<()> {
        actor.require_admin("delete key events")?;

        let Some(ev) = get_key_event(&pool.conn, id)? else {
            return Err(Rejection::not_found(format!("Key event #{id} not found.")));
        };

        delete_key_event(&pool.conn, id)?;

        let message = format!(
            "Deleted key event #{id} ({} {} by {}).",
            ev.room,
            ev.action.to_db_str(),
            ev.holder
        );
        audit(&pool.conn, "key_del", &id.to_string(), &message);
        Ok(Accepted::done().with_message(message))
    }
}

fn normalized(filter: &KeyEventFilter) -> KeyEventFilter {
    KeyEventFilter {
        room: filter
            .room
            .as_deref()
            .map(normalize_room_code)
            .filter(|r| !r.is_empty()),
        ..filter.clone()
    }
}
