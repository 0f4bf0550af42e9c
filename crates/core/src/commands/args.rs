//! Command arguments

use super::tokenizer::{self, TokenizeError};

/// Arguments of a command invocation
///
/// Index 0 is the command name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    argv: Vec<String>,
    /// Full command text
    command: String,
    /// Byte offset of the first argument after the name in `command`
    arg_s_offset: usize,
}

impl CommandArgs {
    pub(crate) fn from_parts(argv: Vec<String>, command: String, arg_s_offset: usize) -> Self {
        Self {
            argv,
            command,
            arg_s_offset,
        }
    }

    /// Build from an argument vector
    ///
    /// The command text is rebuilt by joining the arguments with spaces,
    /// quoting any argument that contains a space.
    pub fn from_argv<I, S>(argv: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();

        let mut command = String::new();
        let mut arg_s_offset = 0;
        for (i, arg) in argv.iter().enumerate() {
            if i > 0 {
                command.push(' ');
            }
            if i == 1 {
                arg_s_offset = command.len();
            }
            if arg.contains(' ') {
                command.push('"');
                command.push_str(arg);
                command.push('"');
            } else {
                command.push_str(arg);
            }
        }
        if argv.len() < 2 {
            arg_s_offset = command.len();
        }

        Self {
            argv,
            command,
            arg_s_offset,
        }
    }

    /// Tokenize a command line
    pub fn tokenize(text: &str) -> Result<Self, TokenizeError> {
        tokenizer::tokenize(text)
    }

    /// Number of arguments, including the command name
    pub fn arg_count(&self) -> usize {
        self.argv.len()
    }

    /// Argument by index (0 = command name)
    ///
    /// Returns an empty string if the index is out of bounds.
    pub fn arg(&self, index: usize) -> &str {
        self.argv.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Everything after the command name, as typed
    pub fn arg_s(&self) -> &str {
        self.command.get(self.arg_s_offset..).unwrap_or("")
    }

    /// The full command text
    pub fn command_string(&self) -> &str {
        &self.command
    }

    pub fn command_name(&self) -> &str {
        self.arg(0)
    }

    /// Find `name` among the arguments and return the one after it
    ///
    /// Matching ignores ASCII case. Returns `None` if the name is missing
    /// or is the last argument.
    pub fn find_arg(&self, name: &str) -> Option<&str> {
        let index = self
            .argv
            .iter()
            .skip(1)
            .position(|arg| arg.eq_ignore_ascii_case(name))?
            + 1;
        self.argv.get(index + 1).map(String::as_str)
    }

    /// Integer following `name`, or `default` if absent
    ///
    /// Unparseable values read as 0.
    pub fn find_arg_int(&self, name: &str, default: i32) -> i32 {
        match self.find_arg(name) {
            Some(value) => value.trim().parse().unwrap_or(0),
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argv() {
        let args = CommandArgs::from_argv(["say", "hello", "world"]);
        assert_eq!(args.arg_count(), 3);
        assert_eq!(args.command_name(), "say");
        assert_eq!(args.arg(1), "hello");
        assert_eq!(args.arg(999), "");
        assert_eq!(args.arg_s(), "hello world");
        assert_eq!(args.command_string(), "say hello world");
    }

    #[test]
    fn test_from_argv_quotes_spaces() {
        let args = CommandArgs::from_argv(["say", "hello world", "x"]);
        assert_eq!(args.arg_s(), "\"hello world\" x");
        assert_eq!(args.arg(1), "hello world");

        let alone = CommandArgs::from_argv(["status"]);
        assert_eq!(alone.arg_s(), "");
    }

    #[test]
    fn test_find_arg() {
        let args = CommandArgs::from_argv(["map", "-Port", "27015", "-bogus", "x", "-last"]);
        assert_eq!(args.find_arg("-port"), Some("27015"));
        assert_eq!(args.find_arg("-last"), None);
        assert_eq!(args.find_arg("map"), None);
        assert_eq!(args.find_arg_int("-port", 1), 27015);
        assert_eq!(args.find_arg_int("-bogus", 1), 0);
        assert_eq!(args.find_arg_int("-missing", 7), 7);
    }

    #[test]
    fn test_tokenize_matches_argv() {
        let args = CommandArgs::tokenize("say hello world").unwrap();
        assert_eq!(args, CommandArgs::from_argv(["say", "hello", "world"]));
    }
}
