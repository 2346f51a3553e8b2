mod cli;
mod commands;

use osm_cleaner::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
