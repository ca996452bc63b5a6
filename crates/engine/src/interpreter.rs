//! Shell command table and level-completion rules.
//!
//! ```text
//! tokens ──> handler (ls, cat, grep, ...) ──> Handled { output, check }
//!                                                  │
//!                                   completion rule for the command
//!                                                  │
//!                              fallback: trim(output) == solution
//! ```

use crate::catalog::{Catalog, Level};
use crate::levels::SECRET_KEY_VALUE;
use crate::session::Session;
use crate::vfs::VirtualFs;

pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[2J";
pub const ALL_LEVELS_COMPLETE: &str =
    "🏆 Congratulations! You have completed every level. Type 'levels' to review them.";

const SECRET_KEY_TOKEN: &str = "$SECRET_KEY";
const PERMITTED_FILE: &str = "secret.txt";

const HELP_TEXT: &str = "Available commands:
  ls [-a] [dir]        - List directory contents
  cat <file>           - Display file contents
  cd [dir]             - Change directory
  find [pattern]       - Find files
  grep <pattern> <file> - Search file contents
  strings <file>       - Print readable text in a file
  chmod <mode> <file>  - Change file permissions
  echo [text...]       - Print text or variables
  base64 -d <file>     - Decode base64 file contents
  pwd                  - Print working directory
  whoami               - Show current user
  hint                 - Get hint for current level
  status               - Show game status
  levels               - List all levels
  clear                - Clear terminal
  help                 - Show this help message

Use these commands to find passwords and complete levels!";

const FLAVOR: [&str; 5] = [
    "🎉 Excellent! Level completed!",
    "🚀 Great job! Moving to next challenge...",
    "💻 Hacking skills improving!",
    "🔓 Access granted to next level!",
    "⚡ Impressive terminal skills!",
];

/// Congratulation line appended when `level` is solved.
pub fn flavor_message(level: usize) -> &'static str {
    FLAVOR[level.min(FLAVOR.len() - 1)]
}

/// Result of running one command against a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub output: String,
    pub completed: bool,
}

/// Completion rule attached to a handler's output.
#[derive(Debug)]
enum Check {
    /// Only the generic fallback applies.
    Fallback,
    /// `cat`: output must equal the solution byte for byte.
    Exact,
    /// `grep`: output contains the solution; narrow to the matching line.
    MatchingLine,
    /// `strings`: output contains the solution; narrow to the solution itself.
    Substring,
    /// `echo $SECRET_KEY`: unconditional.
    Always,
    /// `base64 -d`: trimmed output equals the solution.
    Trimmed,
}

struct Handled {
    output: String,
    check: Check,
}

impl Handled {
    fn text(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            check: Check::Fallback,
        }
    }

    fn checked(output: impl Into<String>, check: Check) -> Self {
        Self {
            output: output.into(),
            check,
        }
    }
}

/// Commands answered without looking at level state. These keep working after the
/// last level is solved. Only a bare command word matches; `whoami x` goes through
/// the level command table.
pub fn always_available(
    tokens: &[String],
    session: &Session,
    catalog: &Catalog,
) -> Option<String> {
    let [command] = tokens else {
        return None;
    };
    let output = match command.as_str() {
        "clear" => CLEAR_SCREEN.to_string(),
        "help" => HELP_TEXT.to_string(),
        "levels" => catalog
            .iter()
            .map(|level| format!("Level {}: {}", level.index, level.title))
            .collect::<Vec<_>>()
            .join("\n"),
        "whoami" => session.user.clone(),
        "pwd" => format!("/home/{}", session.user),
        _ => return None,
    };
    Some(output)
}

/// Runs `tokens` against `level` and decides whether the level was solved.
pub fn process(
    tokens: &[String],
    session: &Session,
    level: &Level,
    total_levels: usize,
) -> Outcome {
    let Some((command, args)) = tokens.split_first() else {
        return Outcome {
            output: String::new(),
            completed: false,
        };
    };

    let handled = dispatch(command, args, session, level, total_levels);
    let mut outcome = judge(handled, &level.solution);
    if outcome.completed {
        outcome.output = format!("{}\n\n{}", outcome.output, flavor_message(level.index));
    }
    outcome
}

fn dispatch(
    command: &str,
    args: &[String],
    session: &Session,
    level: &Level,
    total_levels: usize,
) -> Handled {
    let fs = &session.fs;
    match command {
        "ls" => match args.first().map(String::as_str) {
            None => Handled::text(fs.list_visible(".")),
            Some("-a") => Handled::text(fs.list_all(args.get(1).map_or(".", String::as_str))),
            Some(dir) => Handled::text(fs.list_visible(dir)),
        },
        "cat" => cat(session, args),
        "cd" => match args.first().map(String::as_str) {
            None | Some("~") => Handled::text(""),
            Some(dir) => Handled::text(format!("cd: {dir}: No such directory")),
        },
        "find" => Handled::text(fs.find(args)),
        "grep" => match args {
            [pattern, path, ..] => {
                on_existing(fs, path, fs.grep(pattern, path), Check::MatchingLine)
            }
            _ => Handled::text("grep: usage: grep <pattern> <file>"),
        },
        "strings" => match args.first() {
            Some(path) => on_existing(fs, path, fs.extract_strings(path), Check::Substring),
            None => Handled::text("strings: missing file operand"),
        },
        "chmod" => match args {
            [_, path, ..] if path == PERMITTED_FILE => {
                Handled::text(format!("chmod: permissions of '{path}' updated"))
            }
            [_, path, ..] => Handled::text(format!(
                "chmod: cannot access '{path}': Operation not permitted"
            )),
            _ => Handled::text("chmod: missing operand"),
        },
        "echo" => match args {
            [only] if only == SECRET_KEY_TOKEN => Handled::checked(SECRET_KEY_VALUE, Check::Always),
            _ => Handled::text(args.join(" ")),
        },
        "base64" => match args {
            [flag, path, ..] if flag == "-d" => {
                on_existing(fs, path, fs.decode_base64(path), Check::Trimmed)
            }
            [flag] if flag == "-d" => Handled::text("base64: missing file operand"),
            [flag, ..] => Handled::text(format!("base64: invalid option -- '{flag}'")),
            [] => Handled::text("base64: usage: base64 -d <file>"),
        },
        "hint" => Handled::text(format!("💡 Hint: {}", level.hint)),
        "status" => Handled::text(status(session, level, total_levels)),
        other => Handled::text(format!("command not found: {other}")),
    }
}

/// Error text for a missing file is never judged against the solution.
fn on_existing(fs: &VirtualFs, path: &str, output: String, check: Check) -> Handled {
    if fs.read(path).is_some() {
        Handled::checked(output, check)
    } else {
        Handled::text(output)
    }
}

fn cat(session: &Session, args: &[String]) -> Handled {
    // `--` ends option parsing, so `cat -- -` reads the file named `-`.
    let path = match args {
        [marker, path, ..] if marker == "--" => path,
        [path, ..] => path,
        [] => return Handled::text("cat: missing filename"),
    };
    let resolved = path.strip_prefix("./").unwrap_or(path.as_str());
    match session.fs.read(resolved) {
        Some(content) => Handled::checked(content, Check::Exact),
        None => Handled::text(format!("cat: {path}: No such file or directory")),
    }
}

fn status(session: &Session, level: &Level, total_levels: usize) -> String {
    format!(
        "Current Level: {}\nUser: {}\nLevel Title: {}\nDescription: {}\nProgress: {}/{} levels completed",
        session.current_level,
        session.user,
        level.title,
        level.description,
        session.current_level,
        total_levels
    )
}

fn judge(handled: Handled, solution: &str) -> Outcome {
    let Handled { output, check } = handled;
    let (output, completed) = match check {
        Check::Fallback => (output, false),
        Check::Exact => {
            let done = output == solution;
            (output, done)
        }
        Check::MatchingLine => match output.lines().find(|line| line.contains(solution)) {
            Some(line) => (line.trim().to_string(), true),
            None => (output, false),
        },
        Check::Substring => match output.find(solution) {
            Some(start) => (output[start..start + solution.len()].to_string(), true),
            None => (output, false),
        },
        Check::Always => (output, true),
        Check::Trimmed => {
            let done = output.trim() == solution;
            (output, done)
        }
    };

    // Any command whose trimmed output is exactly the solution also counts,
    // including `echo <solution>`.
    let completed = completed || output.trim() == solution;
    Outcome { output, completed }
}
