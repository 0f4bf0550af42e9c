//! Console line tokenizer
//!
//! Splits a command line into arguments. Quoted strings form one argument
//! without their quotes, each character of the break set is an argument of
//! its own, and `//` starts a comment that runs to the end of the line.

use super::args::CommandArgs;

/// Size of the command buffer; the longest accepted line is one byte less
pub const COMMAND_MAX_LENGTH: usize = 512;

/// Most arguments kept from one line, command name included
pub const COMMAND_MAX_ARGC: usize = 64;

/// Characters that always form single-character arguments
pub const DEFAULT_BREAK_SET: &str = "{}()':";

/// Errors raised while tokenizing a line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// Line holds no arguments
    #[error("empty command")]
    Empty,

    /// Line does not fit the command buffer
    #[error("command is {len} bytes, longest accepted is {max}")]
    TooLong { len: usize, max: usize },
}

/// Tokenize with the default break set
pub fn tokenize(text: &str) -> Result<CommandArgs, TokenizeError> {
    tokenize_with(text, DEFAULT_BREAK_SET)
}

/// Tokenize with a custom break set
pub fn tokenize_with(text: &str, break_set: &str) -> Result<CommandArgs, TokenizeError> {
    let max = COMMAND_MAX_LENGTH - 1;
    if text.len() > max {
        tracing::warn!("Command overflows the tokenizer buffer, skipping");
        return Err(TokenizeError::TooLong {
            len: text.len(),
            max,
        });
    }

    let mut argv = Vec::new();
    let mut arg_s_offset = text.len();
    let mut rest = text;

    while argv.len() < COMMAND_MAX_ARGC {
        let Some((start, token, consumed)) = next_token(rest, break_set) else {
            break;
        };
        let offset = text.len() - rest.len();
        if argv.len() == 1 {
            arg_s_offset = offset + start;
        }
        argv.push(token);
        rest = &rest[consumed..];
    }

    if argv.is_empty() {
        return Err(TokenizeError::Empty);
    }
    Ok(CommandArgs::from_parts(argv, text.to_string(), arg_s_offset))
}

/// Find the next token in `input`
///
/// Returns the byte offset the token starts at (its opening quote for
/// quoted tokens), the token text, and the number of bytes consumed.
fn next_token(input: &str, break_set: &str) -> Option<(usize, String, usize)> {
    let start = input.len() - input.trim_start().len();
    let body = &input[start..];
    if body.is_empty() || body.starts_with("//") {
        return None;
    }

    let mut chars = body.char_indices();
    let (_, first) = chars.next()?;

    if first == '"' {
        return Some(match body[1..].find('"') {
            Some(end) => (start, body[1..1 + end].to_string(), start + end + 2),
            None => (start, body[1..].to_string(), input.len()),
        });
    }

    if break_set.contains(first) {
        let len = first.len_utf8();
        return Some((start, body[..len].to_string(), start + len));
    }

    let end = body
        .char_indices()
        .find(|(i, c)| {
            c.is_whitespace() || *c == '"' || break_set.contains(*c) || body[*i..].starts_with("//")
        })
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    Some((start, body[..end].to_string(), start + end))
}

/// Split a console line into individual commands
///
/// Commands are separated by `;` or newlines outside quotes. Comments are
/// dropped and empty commands skipped.
pub fn split_commands(line: &str) -> Vec<&str> {
    let mut commands = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;
    let mut skip_to_newline = false;

    for (i, c) in line.char_indices() {
        if skip_to_newline {
            if c == '\n' {
                skip_to_newline = false;
                start = i + 1;
            }
            continue;
        }
        match c {
            '"' => in_quotes = !in_quotes,
            '/' if !in_quotes && line[i..].starts_with("//") => {
                commands.push(&line[start..i]);
                skip_to_newline = true;
            }
            ';' | '\n' if !in_quotes || c == '\n' => {
                commands.push(&line[start..i]);
                start = i + 1;
                in_quotes = false;
            }
            _ => {}
        }
    }
    if !skip_to_newline {
        commands.push(&line[start..]);
    }

    commands
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_split() {
        let args = tokenize("  say   hello world ").unwrap();
        assert_eq!(args.argv(), ["say", "hello", "world"]);
        assert_eq!(args.arg_s(), "hello world ");
    }

    #[test]
    fn test_quoted_arguments() {
        let args = tokenize("say \"hello world\" again").unwrap();
        assert_eq!(args.argv(), ["say", "hello world", "again"]);
        assert_eq!(args.arg_s(), "\"hello world\" again");

        let unterminated = tokenize("say \"open ended").unwrap();
        assert_eq!(unterminated.arg(1), "open ended");
    }

    #[test]
    fn test_break_set() {
        let args = tokenize("bind x {a:b}").unwrap();
        assert_eq!(args.argv(), ["bind", "x", "{", "a", ":", "b", "}"]);

        let plain = tokenize_with("bind x {a:b}", "").unwrap();
        assert_eq!(plain.argv(), ["bind", "x", "{a:b}"]);
    }

    #[test]
    fn test_comments() {
        let args = tokenize("sv_gravity 400 // lower gravity").unwrap();
        assert_eq!(args.argv(), ["sv_gravity", "400"]);

        let quoted = tokenize("say \"http://example\"").unwrap();
        assert_eq!(quoted.arg(1), "http://example");

        assert_eq!(tokenize("// only a comment"), Err(TokenizeError::Empty));
    }

    #[test]
    fn test_empty_and_too_long() {
        assert_eq!(tokenize(""), Err(TokenizeError::Empty));
        assert_eq!(tokenize("   "), Err(TokenizeError::Empty));

        let long = "x".repeat(COMMAND_MAX_LENGTH);
        assert_eq!(
            tokenize(&long),
            Err(TokenizeError::TooLong {
                len: COMMAND_MAX_LENGTH,
                max: COMMAND_MAX_LENGTH - 1
            })
        );
        assert!(tokenize(&"x".repeat(COMMAND_MAX_LENGTH - 1)).is_ok());
    }

    #[test]
    fn test_argc_is_capped() {
        let line = (0..100).map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        assert_eq!(tokenize(&line).unwrap().arg_count(), COMMAND_MAX_ARGC);
    }

    #[test]
    fn test_single_token_has_empty_arg_s() {
        let args = tokenize("status").unwrap();
        assert_eq!(args.arg_count(), 1);
        assert_eq!(args.arg_s(), "");
        assert_eq!(args.command_string(), "status");
    }

    #[test]
    fn test_split_commands() {
        assert_eq!(
            split_commands("sv_cheats 1; say \"a;b\"\nstatus"),
            vec!["sv_cheats 1", "say \"a;b\"", "status"]
        );
        assert_eq!(split_commands("echo hi // trailing; ignored\nnext"), vec!["echo hi", "next"]);
        assert!(split_commands(" ; ;\n").is_empty());
    }
}
