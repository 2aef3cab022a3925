/// Parsed CLI arguments. The REPL is the sole entry point, so there's no
/// debug/non-debug mode to select - just the object file to load.
#[derive(Debug, PartialEq)]
pub struct Config {
    pub filename: String,
}

impl Config {
    pub fn with(args: &[String]) -> Result<Self, &'static str> {
        if args.len() < 2 {
            return Err("not enough arguments");
        }

        Ok(Self {
            filename: args[1].clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_valid_arguments() {
        let args = [String::from("program_name"), String::from("filename")].to_vec();

        assert_eq!(
            Config::with(&args).unwrap().filename,
            String::from("filename")
        );
    }

    #[test]
    fn config_not_enough_arguments() {
        let args = [String::from("program_name")].to_vec();

        assert_eq!(Config::with(&args), Err("not enough arguments"));
    }
}
