use crate::instruction::Register;
use crate::state::State;
use crate::trap_vector::TrapVector;
use std::io::{self, Read, Write};

/// Executes the service routine named by `vector` against the machine and
/// an abstract character I/O pair. `vector` is `None` for an undocumented
/// trap vector, which is a no-op (§4.6: unknown vectors never abort the
/// machine).
///
/// Reads that hit EOF or an I/O error degrade to a zero byte rather than
/// propagating: a guest program polling past the end of its input stream
/// must not be able to crash the simulator. Writes propagate I/O errors
/// (e.g. a broken output pipe) since there's nothing safe to paper over.
pub fn execute(
    state: &mut State,
    vector: Option<TrapVector>,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> io::Result<()> {
    match vector {
        Some(TrapVector::Getc) => {
            state.set_reg(Register::R0, read_char(input));
        }

        Some(TrapVector::Out) => {
            write_char(output, state.reg(Register::R0))?;
            output.flush()?;
        }

        Some(TrapVector::Puts) => {
            let mut address = state.reg(Register::R0);
            loop {
                let word = state.read_mem(address);
                if word == 0 {
                    break;
                }
                write_codepoint(output, word)?;
                address = address.wrapping_add(1);
            }
            output.flush()?;
        }

        Some(TrapVector::In) => {
            write!(output, "Input a character: ")?;
            output.flush()?;
            let c = read_char(input);
            write_char(output, c)?;
            output.flush()?;
            state.set_reg(Register::R0, c);
        }

        Some(TrapVector::Putsp) => {
            let mut address = state.reg(Register::R0);
            loop {
                let word = state.read_mem(address);
                if word == 0 {
                    break;
                }
                write_char(output, word & 0xFF)?;
                let high = (word >> 8) & 0xFF;
                if high != 0 {
                    write_char(output, high)?;
                }
                address = address.wrapping_add(1);
            }
            output.flush()?;
        }

        Some(TrapVector::Halt) => {
            state.halted = true;
            state.pc = state.pc.wrapping_sub(1);
        }

        None => {}
    }

    Ok(())
}

fn read_char(input: &mut dyn Read) -> u16 {
    let mut buffer = [0u8; 1];
    match input.read_exact(&mut buffer) {
        Ok(()) => u16::from(buffer[0]),
        Err(_) => 0,
    }
}

fn write_char(output: &mut dyn Write, value: u16) -> io::Result<()> {
    output.write_all(&[value as u8])
}

/// PUTS prints the *whole* 16-bit word as a codepoint, unlike OUT/PUTSP
/// which only ever see single bytes. Encodes it as UTF-8 when it names a
/// valid Unicode scalar value (the common case: ASCII and most LC-3
/// strings fit in the low byte anyway); a word in a surrogate range or
/// otherwise not a valid scalar value falls back to the replacement
/// character rather than silently truncating.
fn write_codepoint(output: &mut dyn Write, value: u16) -> io::Result<()> {
    let c = char::from_u32(u32::from(value)).unwrap_or(char::REPLACEMENT_CHARACTER);
    let mut buffer = [0u8; 4];
    output.write_all(c.encode_utf8(&mut buffer).as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn new_state() -> State {
        State::new()
    }

    #[test]
    fn getc_reads_one_byte_into_r0() {
        let mut state = new_state();
        let mut input = Cursor::new(vec![b'A']);
        let mut output = Vec::new();

        execute(&mut state, Some(TrapVector::Getc), &mut input, &mut output).unwrap();

        assert_eq!(state.reg(Register::R0), u16::from(b'A'));
        assert!(output.is_empty());
    }

    #[test]
    fn getc_at_eof_yields_zero_without_erroring() {
        let mut state = new_state();
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        execute(&mut state, Some(TrapVector::Getc), &mut input, &mut output).unwrap();

        assert_eq!(state.reg(Register::R0), 0);
    }

    #[test]
    fn out_writes_low_byte_of_r0() {
        let mut state = new_state();
        state.set_reg(Register::R0, 0x1F41); // 'A' with garbage in the high byte
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        execute(&mut state, Some(TrapVector::Out), &mut input, &mut output).unwrap();

        assert_eq!(output, vec![b'A']);
    }

    #[test]
    fn puts_prints_until_null_word() {
        let mut state = new_state();
        state.write_mem(0x4000, u16::from(b'H'));
        state.write_mem(0x4001, u16::from(b'i'));
        state.write_mem(0x4002, 0);
        state.set_reg(Register::R0, 0x4000);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        execute(&mut state, Some(TrapVector::Puts), &mut input, &mut output).unwrap();

        assert_eq!(output, b"Hi");
    }

    #[test]
    fn puts_emits_the_full_16_bit_codepoint_not_just_the_low_byte() {
        let mut state = new_state();
        state.write_mem(0x4000, 0x20AC); // EURO SIGN, high byte nonzero
        state.write_mem(0x4001, 0);
        state.set_reg(Register::R0, 0x4000);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        execute(&mut state, Some(TrapVector::Puts), &mut input, &mut output).unwrap();

        assert_eq!(output, "\u{20AC}".as_bytes());
    }

    #[test]
    fn in_prompts_reads_and_echoes() {
        let mut state = new_state();
        let mut input = Cursor::new(vec![b'Q']);
        let mut output = Vec::new();

        execute(&mut state, Some(TrapVector::In), &mut input, &mut output).unwrap();

        assert_eq!(state.reg(Register::R0), u16::from(b'Q'));
        assert_eq!(output, b"Input a character: Q");
    }

    #[test]
    fn putsp_prints_two_characters_per_word() {
        let mut state = new_state();
        state.write_mem(0x4000, (u16::from(b'b') << 8) | u16::from(b'a'));
        state.write_mem(0x4001, u16::from(b'c')); // odd trailing char, high byte 0
        state.write_mem(0x4002, 0);
        state.set_reg(Register::R0, 0x4000);
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        execute(&mut state, Some(TrapVector::Putsp), &mut input, &mut output).unwrap();

        assert_eq!(output, b"abc");
    }

    #[test]
    fn halt_sets_flag_and_rewinds_pc() {
        let mut state = new_state();
        state.pc = 0x3001;
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        execute(&mut state, Some(TrapVector::Halt), &mut input, &mut output).unwrap();

        assert!(state.halted);
        assert_eq!(state.pc, 0x3000);
    }

    #[test]
    fn unknown_vector_is_a_no_op() {
        let mut state = new_state();
        let before_pc = state.pc;
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();

        execute(&mut state, None, &mut input, &mut output).unwrap();

        assert_eq!(state.pc, before_pc);
        assert!(!state.halted);
        assert!(output.is_empty());
    }
}
