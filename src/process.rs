use crate::cpu;
use crate::instruction::Instruction;
use crate::state::State;
use std::io::{self, Read, Write};

/// Reads the word at `pc`, advances `pc` past it, and returns the raw
/// instruction word. Does not check `halted` - callers gate that in `step`.
pub fn fetch(state: &mut State) -> u16 {
    let instruction = state.read_mem(state.pc);
    state.pc = state.pc.wrapping_add(1);
    instruction
}

/// Executes a single instruction if the machine isn't halted. A no-op on a
/// halted machine, so callers can call `step` in a loop without checking
/// `halted` themselves first.
pub fn step(state: &mut State, input: &mut dyn Read, output: &mut dyn Write) -> io::Result<()> {
    if state.halted {
        return Ok(());
    }

    let word = fetch(state);
    let instruction = Instruction::decode(word);
    cpu::execute(state, instruction, input, output)
}

/// Runs up to `steps` instructions, stopping early if the machine halts or
/// `pc` reaches `state.break_address`. `steps == -1` means run until halt
/// with no step limit. Any other negative value is rejected as a no-op,
/// since there's no sensible interpretation of "run negative steps".
pub fn run(
    state: &mut State,
    steps: i32,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> io::Result<()> {
    if steps < -1 {
        return Ok(());
    }

    let mut remaining = steps;

    loop {
        if state.halted {
            return Ok(());
        }
        if let Some(break_address) = state.break_address {
            if state.pc == break_address {
                return Ok(());
            }
        }
        if steps != -1 {
            if remaining == 0 {
                return Ok(());
            }
            remaining -= 1;
        }

        step(state, input, output)?;
    }
}
