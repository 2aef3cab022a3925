use crate::instruction::{Instruction, JsrTarget, Operand, Register};
use crate::state::State;
use crate::trap;
use std::io::{self, Read, Write};

/// Applies the effect of one decoded instruction to `state`. Every
/// PC-relative computation below uses `state.pc` as `fetch` leaves it -
/// already incremented past the instruction word - matching the LC-3's
/// documented post-increment addressing.
pub fn execute(
    state: &mut State,
    instruction: Instruction,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> io::Result<()> {
    match instruction {
        Instruction::Br { n, z, p, pc_offset } => {
            let taken = match state.cc {
                crate::state::Condition::N => n,
                crate::state::Condition::Z => z,
                crate::state::Condition::P => p,
            };
            if taken {
                state.pc = state.pc.wrapping_add(pc_offset);
            }
        }

        Instruction::Add { dr, sr1, operand } => {
            let rhs = resolve_operand(state, operand);
            let value = state.reg(sr1).wrapping_add(rhs);
            state.set_reg(dr, value);
            state.update_cc(value);
        }

        Instruction::And { dr, sr1, operand } => {
            let rhs = resolve_operand(state, operand);
            let value = state.reg(sr1) & rhs;
            state.set_reg(dr, value);
            state.update_cc(value);
        }

        Instruction::Not { dr, sr } => {
            let value = !state.reg(sr);
            state.set_reg(dr, value);
            state.update_cc(value);
        }

        Instruction::Ld { dr, pc_offset } => {
            let address = state.pc.wrapping_add(pc_offset);
            let value = state.read_mem(address);
            state.set_reg(dr, value);
            state.update_cc(value);
        }

        Instruction::Ldi { dr, pc_offset } => {
            let pointer = state.read_mem(state.pc.wrapping_add(pc_offset));
            let value = state.read_mem(pointer);
            state.set_reg(dr, value);
            state.update_cc(value);
        }

        Instruction::Ldr { dr, base, offset } => {
            let address = state.reg(base).wrapping_add(offset);
            let value = state.read_mem(address);
            state.set_reg(dr, value);
            state.update_cc(value);
        }

        Instruction::St { sr, pc_offset } => {
            let address = state.pc.wrapping_add(pc_offset);
            state.write_mem(address, state.reg(sr));
        }

        Instruction::Sti { sr, pc_offset } => {
            let pointer = state.read_mem(state.pc.wrapping_add(pc_offset));
            state.write_mem(pointer, state.reg(sr));
        }

        Instruction::Str { sr, base, offset } => {
            let address = state.reg(base).wrapping_add(offset);
            state.write_mem(address, state.reg(sr));
        }

        Instruction::Jmp { base } => {
            state.pc = state.reg(base);
        }

        Instruction::Jsr { target } => {
            let return_address = state.pc;
            state.pc = match target {
                JsrTarget::PcOffset(offset) => return_address.wrapping_add(offset),
                JsrTarget::Register(base) => state.reg(base),
            };
            state.set_reg(Register::R7, return_address);
        }

        Instruction::Lea { dr, pc_offset } => {
            let address = state.pc.wrapping_add(pc_offset);
            state.set_reg(dr, address);
            state.update_cc(address);
        }

        Instruction::Trap { vector } => {
            trap::execute(state, vector, input, output)?;
        }

        Instruction::Reserved => {}
    }

    Ok(())
}

fn resolve_operand(state: &State, operand: Operand) -> u16 {
    match operand {
        Operand::Register(r) => state.reg(r),
        Operand::Immediate(v) => v,
    }
}
