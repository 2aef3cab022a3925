mod disassemble;

use crate::debugger::disassemble::disassemble;
use crate::instruction::Register;
use crate::process;
use crate::state::State;
use lazy_static::lazy_static;
use regex::Regex;
use rustyline::error::ReadlineError;
use rustyline::Editor;
use std::io;

const BANNER: &str = "LC-3 simulator and debugger. Type \"help\" for a list of commands.";
const PROMPT: &str = "(lc-3) ";

lazy_static! {
    static ref STEP_REGEX: Regex = Regex::new(r"^step(\s+(-?\d+))?$").unwrap();
    static ref DUMP_REGEX: Regex =
        Regex::new(r"^dump\s+0x([0-9a-fA-F]{1,4})(\s+0x([0-9a-fA-F]{1,4}))?$").unwrap();
    static ref SETADDR_REGEX: Regex =
        Regex::new(r"^setaddr\s+0x([0-9a-fA-F]{1,4})\s+(-?\d+)$").unwrap();
    static ref SETREG_REGEX: Regex = Regex::new(r"^setreg\s+[Rr]?([0-7])\s+(-?\d+)$").unwrap();
}

/// Runs the interactive REPL until `quit` or EOF. Owns the machine and the
/// host's stdin/stdout for trap I/O; command line editing goes through its
/// own `rustyline` editor so a blocking GETC/IN doesn't fight the REPL's
/// own input.
pub fn run(mut state: State) -> io::Result<()> {
    println!("{}", BANNER);

    let mut rl = Editor::<()>::new();
    let mut last_command: Option<String> = None;

    loop {
        let readline = rl.readline(PROMPT);

        match readline {
            Ok(line) => {
                let line = line.trim();

                let command = if line.is_empty() {
                    match &last_command {
                        Some(previous) => previous.clone(),
                        None => continue,
                    }
                } else {
                    rl.add_history_entry(line);
                    line.to_string()
                };

                if !dispatch(&command, &mut state)? {
                    break;
                }

                last_command = Some(command);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Readline error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}

/// Executes one REPL command. Returns `Ok(false)` when the session should
/// end (`quit` or EOF), `Ok(true)` otherwise.
fn dispatch(command: &str, state: &mut State) -> io::Result<bool> {
    let mut stdin = io::stdin();
    let mut stdout = io::stdout();

    match command {
        "quit" | "q" => return Ok(false),

        "continue" | "c" => {
            process::run(state, -1, &mut stdin, &mut stdout)?;
        }

        "registers" | "regs" => print_registers(state),

        "help" | "h" => print_help(),

        "disassemble" => {
            let word = state.read_mem(state.pc);
            let opcode = crate::opcode::Opcode::from_instruction(word);
            println!("{:#06x}: [{:?}] {}", state.pc, opcode, disassemble(word));
        }

        line if STEP_REGEX.is_match(line) => {
            let captures = STEP_REGEX.captures(line).unwrap();
            let steps: i32 = match captures.get(2) {
                Some(n) => n.as_str().parse().unwrap_or(1),
                None => 1,
            };
            process::run(state, steps, &mut stdin, &mut stdout)?;
        }

        line if DUMP_REGEX.is_match(line) => {
            let captures = DUMP_REGEX.captures(line).unwrap();
            let start = u16::from_str_radix(&captures[1], 16).unwrap();
            let end = captures
                .get(3)
                .map(|m| u16::from_str_radix(m.as_str(), 16).unwrap())
                .unwrap_or(start);

            dump_memory(state, start, end);
        }

        line if SETADDR_REGEX.is_match(line) => {
            let captures = SETADDR_REGEX.captures(line).unwrap();
            let address = u16::from_str_radix(&captures[1], 16).unwrap();
            match captures[2].parse::<i16>() {
                Ok(value) => {
                    state.write_mem(address, value as u16);
                    println!("mem[{:#06x}] = {:#06x}", address, value as u16);
                }
                Err(_) => println!("Invalid value: \"{}\".", &captures[2]),
            }
        }

        line if SETREG_REGEX.is_match(line) => {
            let captures = SETREG_REGEX.captures(line).unwrap();
            let index: u16 = captures[1].parse().unwrap();
            match captures[2].parse::<i16>() {
                Ok(value) => {
                    let register = Register::from(index);
                    state.set_reg(register, value as u16);
                    println!("{:?} = {:#06x}", register, value as u16);
                }
                Err(_) => println!("Invalid value: \"{}\".", &captures[2]),
            }
        }

        other => {
            println!("Undefined command: \"{}\". Try \"help\".", other);
        }
    }

    Ok(true)
}

fn print_registers(state: &State) {
    println!("PC  = {:#06x} ({})", state.pc, state.pc as i16);
    let cc = state.cc as u16;
    println!("CC  = {:#06x} ({}) [{:?}]", cc, cc as i16, state.cc);
    for (index, value) in state.all_regs().iter().enumerate() {
        println!("R{} = {:#06x} ({})", index, value, *value as i16);
    }
}

fn dump_memory(state: &State, start: u16, end: u16) {
    let mut address = start;
    loop {
        let value = state.read_mem(address);
        println!("{:#06x}: {:#06x} ({})", address, value, value as i16);
        if address == end {
            break;
        }
        address = address.wrapping_add(1);
    }
}

fn print_help() {
    println!("step [n]               Step n instructions (default 1); n = -1 runs to halt.");
    println!("continue               Equivalent to step -1.");
    println!("quit                   Exit the debugger.");
    println!("registers              Print PC, CC, and R0-R7.");
    println!("dump START [END]       Print memory in [START, END]. e.g. dump 0x3000 0x3010");
    println!("setaddr ADDR VALUE     Write VALUE into memory at ADDR. e.g. setaddr 0x3000 42");
    println!("setreg Rn VALUE        Write VALUE into register n. e.g. setreg 0 42");
    println!("disassemble            Disassemble the instruction at PC.");
    println!("help                   Print this summary.");
}
