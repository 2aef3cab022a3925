use clap::{App, Arg};
use nix::sys::termios::{self, LocalFlags, SetArg, Termios};
use std::process;

fn main() {
    let app = App::new("lc3").arg(
        Arg::with_name("FILE")
            .help("Compiled LC-3 object file to load")
            .required(true)
            .index(1),
    );

    let matches = match app.get_matches_safe() {
        Ok(matches) => matches,
        Err(err) => {
            eprintln!("{}", err.message);
            process::exit(1);
        }
    };

    let filename = matches.value_of("FILE").unwrap().to_string();
    let _raw_mode = RawMode::enable();

    if let Err(e) = lc3::run(lc3::Config { filename }) {
        eprintln!("Application error: {}", e);
        process::exit(2);
    }
}

/// Puts stdin into raw mode (no line buffering, no local echo) for the
/// duration of the REPL session, restoring the prior settings on drop so a
/// crash or early return never leaves the terminal in a broken state.
struct RawMode {
    original: Termios,
}

impl RawMode {
    fn enable() -> Option<RawMode> {
        const STDIN_FILENO: i32 = 0;

        let original = termios::tcgetattr(STDIN_FILENO).ok()?;
        let mut raw = original.clone();
        raw.local_flags &= !(LocalFlags::ICANON | LocalFlags::ECHO);
        termios::tcsetattr(STDIN_FILENO, SetArg::TCSANOW, &raw).ok()?;

        Some(RawMode { original })
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        const STDIN_FILENO: i32 = 0;
        let _ = termios::tcsetattr(STDIN_FILENO, SetArg::TCSANOW, &self.original);
    }
}
