use crate::cli::commands::{open_pool, report};
use crate::cli::parser::RoomCommand;
use crate::config::Config;
use crate::core::rooms::RoomLogic;
use crate::errors::AppResult;
use crate::models::room::RoomFields;
use crate::ui::messages::info;
use crate::utils::table::{Column, Table, opt_cell};

pub fn handle(cmd: &RoomCommand, cfg: &Config) -> AppResult<()> {
    let mut pool = open_pool(cfg)?;

    match cmd {
        RoomCommand::Add {
            code,
            name,
            building,
            floor,
            notes,
        } => {
            let fields = RoomFields {
                name: name.clone(),
                building: building.clone(),
                floor: floor.clone(),
                notes: notes.clone(),
            };
            report(RoomLogic::register(&mut pool, code, &fields))?;
        }

        RoomCommand::List => {
            let rooms = RoomLogic::list(&pool)?;
            if rooms.is_empty() {
                info("No rooms registered.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("CODE", 16),
                Column::new("NAME", 28),
                Column::new("BUILDING", 16),
                Column::new("FLOOR", 6),
                Column::new("NOTES", 30),
            ]);
            for r in &rooms {
                table.add_row(vec![
                    r.code.clone(),
                    opt_cell(&r.name),
                    opt_cell(&r.building),
                    opt_cell(&r.floor),
                    opt_cell(&r.notes),
                ]);
            }
            print!("{}", table.render());
        }
    }

    Ok(())
}
