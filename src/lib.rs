mod config;
mod cpu;
mod debugger;
mod file_loader;
mod instruction;
mod opcode;
mod process;
mod sign_extend;
mod state;
mod trap;
mod trap_vector;

pub use crate::config::Config;
pub use crate::state::{Condition, State};
use std::error::Error;
use std::fs::File;

pub fn run(config: Config) -> Result<(), Box<dyn Error>> {
    let mut state = State::new();
    let file = File::open(&config.filename)?;
    file_loader::load(&mut state, file)?;

    debugger::run(state)?;

    Ok(())
}
