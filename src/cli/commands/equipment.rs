use crate::cli::commands::{open_pool, report};
use crate::cli::parser::EquipmentCommand;
use crate::config::Config;
use crate::core::actor::Actor;
use crate::core::equipment::{EquipmentEdit, EquipmentLogic};
use crate::core::import::ImportLogic;
use crate::core::intake::IntakeLogic;
use crate::core::relocate::RelocateLogic;
use crate::core::validate::{validate_category, validate_state};
use crate::errors::AppResult;
use crate::import::{parse_delimiter, read_equipment_csv};
use crate::models::filters::{DateRange, EquipmentFilter, MovementFilter};
use crate::ui::messages::info;
use crate::utils::colors::colorize_state;
use crate::utils::date::{now, parse_range, timestamp_or_now};
use crate::utils::path::expand_tilde;
use crate::utils::table::{Column, Table, opt_cell};

fn range_of(period: &Option<String>) -> AppResult<DateRange> {
    match period.as_deref() {
        Some(p) => parse_range(p),
        None => Ok(DateRange::default()),
    }
}

pub fn handle(cmd: &EquipmentCommand, cfg: &Config, actor: &Actor) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;

    match cmd {
        EquipmentCommand::Add {
            name,
            category,
            state,
            room,
            responsible,
            tag,
            at,
        } => {
            let ts = timestamp_or_now(at.as_deref())?;
            report(IntakeLogic::intake(
                &mut pool,
                name,
                category,
                state,
                room,
                responsible,
                ts,
                tag.as_deref(),
            ))?;
        }

        EquipmentCommand::Update {
            id,
            name,
            category,
            state,
            responsible,
            tag,
            clear_tag,
        } => {
            let edit = EquipmentEdit {
                name: name.clone(),
                category: category.clone(),
                state: state.clone(),
                responsible: responsible.clone(),
                tag: tag.clone(),
                clear_tag: *clear_tag,
            };
            let item = report(EquipmentLogic::update(&mut pool, *id, &edit))?;
            println!(
                "   #{} {} [{}] {}",
                item.id,
                item.name,
                item.category.to_db_str(),
                colorize_state(item.state)
            );
        }

        EquipmentCommand::Del { id } => {
            report(EquipmentLogic::delete(&mut pool, actor, *id))?;
        }

        EquipmentCommand::List {
            room,
            category,
            state,
            tag,
            search,
            period,
        } => {
            let filter = EquipmentFilter {
                room: room.clone(),
                category: category.as_deref().map(validate_category).transpose()?,
                state: state.as_deref().map(validate_state).transpose()?,
                tag: tag.clone(),
                search: search.clone(),
                range: range_of(period)?,
            };

            let items = EquipmentLogic::list(&pool, &filter)?;
            if items.is_empty() {
                info("No equipment found.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 6),
                Column::new("TAG", 12),
                Column::new("NAME", 28),
                Column::new("TYPE", 12),
                Column::new("STATE", 9),
                Column::new("ROOM", 16),
                Column::new("RESPONSIBLE", 24),
                Column::new("REGISTERED", 19),
            ]);
            for e in &items {
                table.add_row(vec![
                    e.id.to_string(),
                    opt_cell(&e.tag),
                    e.name.clone(),
                    e.category.to_db_str().to_string(),
                    e.state.to_db_str().to_string(),
                    e.room.clone(),
                    e.responsible.clone(),
                    e.registered_at_str(),
                ]);
            }
            print!("{}", table.render());
        }

        EquipmentCommand::Move {
            id,
            destination,
            reason,
            responsible,
            notes,
            at,
        } => {
            let ts = timestamp_or_now(at.as_deref())?;
            report(RelocateLogic::relocate(
                &mut pool,
                *id,
                destination,
                reason.as_deref(),
                responsible.as_deref(),
                ts,
                notes.as_deref(),
            ))?;
        }

        EquipmentCommand::Import { file, delimiter } => {
            let path = expand_tilde(file);
            let rows = read_equipment_csv(&path, parse_delimiter(delimiter)?)?;
            info(format!("Read {} row(s) from {}", rows.len(), path.display()));
            report(ImportLogic::import(
                &mut pool,
                &rows,
                now(),
                &path.to_string_lossy(),
            ))?;
        }

        EquipmentCommand::History {
            id,
            tag,
            from,
            to,
            responsible,
            period,
        } => {
            let filter = MovementFilter {
                equipment_id: *id,
                tag: tag.clone(),
                origin_room: from.clone(),
                destination_room: to.clone(),
                responsible: responsible.clone(),
                range: range_of(period)?,
            };

            let moves = RelocateLogic::history(&pool, &filter)?;
            if moves.is_empty() {
                info("No movements found.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 6),
                Column::new("TIMESTAMP", 19),
                Column::new("ITEM", 6),
                Column::new("TAG", 12),
                Column::new("FROM", 16),
                Column::new("TO", 16),
                Column::new("REASON", 24),
                Column::new("RESPONSIBLE", 24),
            ]);
            for m in &moves {
                table.add_row(vec![
                    m.id.to_string(),
                    m.timestamp_str(),
                    m.equipment_id.to_string(),
                    opt_cell(&m.tag),
                    opt_cell(&m.origin_room),
                    m.destination_room.clone(),
                    opt_cell(&m.reason),
                    opt_cell(&m.responsible),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
