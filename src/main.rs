//! rKeyTrack main entrypoint.

use rkeytrack::errors::AppError;
use rkeytrack::run;
use rkeytrack::ui::messages::{error, rejection};

fn main() {
    println!();
    match run() {
        Ok(()) => {}
        Err(AppError::Rejected(r)) => {
            rejection(&r);
            std::process::exit(1);
        }
        Err(e) => {
            error(format!("Error: {}", e));
            std::process::exit(1);
        }
    }
}
