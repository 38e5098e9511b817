use crate::cli::commands::{open_pool, report};
use crate::cli::parser::{KeyCommand, KeyListArgs};
use crate::config::Config;
use crate::core::actor::Actor;
use crate::core::keys::KeyLogic;
use crate::errors::{AppError, AppResult};
use crate::models::filters::{DateRange, KeyEventFilter};
use crate::models::key_action::KeyAction;
use crate::ui::messages::info;
use crate::utils::colors::{RED, RESET, colorize_action, colorize_optional};
use crate::utils::date::{now, parse_range, timestamp_or_now};
use crate::utils::table::{Column, Table};

pub fn handle(cmd: &KeyCommand, cfg: &Config, actor: &Actor) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;

    match cmd {
        KeyCommand::Deliver {
            room,
            holder,
            area,
            at,
        } => {
            let ts = timestamp_or_now(at.as_deref())?;
            report(KeyLogic::register(
                &mut pool,
                holder,
                area,
                room,
                KeyAction::Delivered,
                ts,
            ))?;
        }

        KeyCommand::Return {
            room,
            holder,
            area,
            at,
        } => {
            let ts = timestamp_or_now(at.as_deref())?;
            report(KeyLogic::register(
                &mut pool,
                holder.as_deref().unwrap_or(""),
                area.as_deref().unwrap_or(""),
                room,
                KeyAction::Returned,
                ts,
            ))?;
        }

        KeyCommand::Status { room } => {
            let status = KeyLogic::status(&pool, room)?;
            println!("🔑 {}: {}", status.room, status.state.label());
            if let Some(ev) = status.latest {
                println!(
                    "   last: {} by {} ({}) at {}",
                    colorize_action(ev.action),
                    ev.holder,
                    colorize_optional(&ev.area),
                    ev.timestamp_str()
                );
            }
        }

        KeyCommand::Out => {
            let keys = KeyLogic::outstanding(&pool, cfg.overdue_after_hours, now())?;
            if keys.is_empty() {
                info("All keys are in.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ROOM", 16),
                Column::new("HOLDER", 28),
                Column::new("AREA", 20),
                Column::new("SINCE", 19),
                Column::new("OVERDUE", 7),
            ]);
            let mut overdue = 0;
            for k in &keys {
                if k.overdue {
                    overdue += 1;
                }
                table.add_row(vec![
                    k.event.room.clone(),
                    k.event.holder.clone(),
                    k.event.area.clone(),
                    k.event.timestamp_str(),
                    if k.overdue { "yes" } else { "" }.to_string(),
                ]);
            }
            print!("{}", table.render());
            if overdue > 0 {
                println!(
                    "{RED}{overdue} key(s) out longer than {}h{RESET}",
                    cfg.overdue_after_hours
                );
            }
        }

        KeyCommand::List { filter, summary } => {
            let filter = build_filter(filter)?;

            if *summary {
                let s = KeyLogic::summary(&pool, &filter)?;
                println!("Delivered:   {}", s.delivered);
                println!("Returned:    {}", s.returned);
                println!("Out now:     {}", s.outstanding);
                return Ok(());
            }

            let events = KeyLogic::list(&pool, &filter)?;
            if events.is_empty() {
                info("No key events found.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 6),
                Column::new("TIMESTAMP", 19),
                Column::new("ROOM", 16),
                Column::new("ACTION", 9),
                Column::new("HOLDER", 28),
                Column::new("AREA", 20),
            ]);
            for ev in &events {
                table.add_row(vec![
                    ev.id.to_string(),
                    ev.timestamp_str(),
                    ev.room.clone(),
                    ev.action.to_db_str().to_string(),
                    ev.holder.clone(),
                    ev.area.clone(),
                ]);
            }
            print!("{}", table.render());
        }

        KeyCommand::Del { id } => {
            report(KeyLogic::delete(&mut pool, actor, *id))?;
        }
    }

    Ok(())
}

fn build_filter(args: &KeyListArgs) -> AppResult<KeyEventFilter> {
    let action = match args.action.as_deref() {
        Some(a) => Some(KeyAction::from_label(a).ok_or_else(|| {
            AppError::Validation(format!("Invalid action '{a}'. Use delivered or returned."))
        })?),
        None => None,
    };
    let range = match args.period.as_deref() {
        Some(p) => parse_range(p)?,
        None => DateRange::default(),
    };

    Ok(KeyEventFilter {
        room: args.room.clone(),
        holder: args.holder.clone(),
        area: args.area.clone(),
        action,
        range,
    })
}
