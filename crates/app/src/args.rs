use std::fmt;
use std::path::{Path, PathBuf};

use quiz_core::model::{ChapterIndex, LevelNumber};

pub const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
pub const DEFAULT_QUESTIONS: &str = "questions.json";
pub const DEFAULT_EXPORT: &str = "c_quiz_export.json";
pub const DEFAULT_TOP: usize = 5;

#[derive(Debug)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingCommand,
    UnknownCommand(String),
    UnknownArg(String),
    UnexpectedArg { command: &'static str, arg: String },
    MissingArg { command: &'static str, what: &'static str },
    InvalidDbUrl { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidToggle { flag: &'static str, raw: String },
    InvalidChapter { raw: String },
    InvalidLevel { raw: String },
    ConfirmationRequired,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingCommand => write!(f, "no command given"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnexpectedArg { command, arg } => {
                write!(f, "unexpected argument for {command}: {arg}")
            }
            ArgsError::MissingArg { command, what } => write!(f, "{command} requires {what}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidToggle { flag, raw } => {
                write!(f, "invalid {flag} value: {raw} (expected on or off)")
            }
            ArgsError::InvalidChapter { raw } => {
                write!(f, "invalid chapter: {raw} (chapters are numbered from 1)")
            }
            ArgsError::InvalidLevel { raw } => write!(f, "invalid level: {raw} (expected 1-10)"),
            ArgsError::ConfirmationRequired => write!(
                f,
                "reset clears all progress; rerun with --yes or turn confirmation off with `settings --confirm off`"
            ),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Chapters,
    Play {
        chapter: ChapterIndex,
        level: LevelNumber,
    },
    Daily,
    Leaderboard {
        top: usize,
    },
    Export {
        path: PathBuf,
    },
    Import {
        path: PathBuf,
    },
    Settings {
        sound: Option<bool>,
        confirm: Option<bool>,
    },
    Reset {
        yes: bool,
    },
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub db_url: String,
    pub questions: PathBuf,
    pub seed: Option<u64>,
    pub command: Command,
}

/// Command-specific flags, checked against the command once it is known.
#[derive(Default)]
struct Flags {
    top: Option<usize>,
    sound: Option<bool>,
    confirm: Option<bool>,
    yes: bool,
    help: bool,
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  app [--db <sqlite_url>] [--questions <path>] [--seed <u64>] <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  chapters                          list chapters and unlocked levels");
    eprintln!("  play <chapter> <level>            play an unlocked level");
    eprintln!("  daily                             random chapter/level, unlocked if needed");
    eprintln!("  leaderboard [--top N]             best results (default {DEFAULT_TOP})");
    eprintln!("  export [path]                     write progress/leaderboard/settings");
    eprintln!("  import <path>                     restore an export document");
    eprintln!("  settings [--sound on|off] [--confirm on|off]");
    eprintln!("  reset [--yes]                     clear progress");
    eprintln!();
    eprintln!("While playing: type an option number, Enter for the next question, q to quit.");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --questions {DEFAULT_QUESTIONS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS, QUIZ_SEED, RUST_LOG");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_seed(raw: String, flag: &'static str) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn parse_toggle(raw: String, flag: &'static str) -> Result<bool, ArgsError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        _ => Err(ArgsError::InvalidToggle { flag, raw }),
    }
}

impl Args {
    /// Parse command-line arguments, falling back to `env` for unset options.
    pub fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut db_url =
            env("QUIZ_DB_URL").map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut questions =
            env("QUIZ_QUESTIONS").map_or_else(|| PathBuf::from(DEFAULT_QUESTIONS), PathBuf::from);
        let mut seed = env("QUIZ_SEED")
            .map(|raw| parse_seed(raw, "QUIZ_SEED"))
            .transpose()?;

        let mut flags = Flags::default();
        let mut positional = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--questions" => {
                    questions = PathBuf::from(require_value(&mut args, "--questions")?);
                }
                "--seed" => {
                    seed = Some(parse_seed(require_value(&mut args, "--seed")?, "--seed")?);
                }
                "--top" => {
                    let value = require_value(&mut args, "--top")?;
                    let top = value.trim().parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--top",
                        raw: value,
                    })?;
                    flags.top = Some(top);
                }
                "--sound" => {
                    flags.sound =
                        Some(parse_toggle(require_value(&mut args, "--sound")?, "--sound")?);
                }
                "--confirm" => {
                    flags.confirm =
                        Some(parse_toggle(require_value(&mut args, "--confirm")?, "--confirm")?);
                }
                "--yes" | "-y" => flags.yes = true,
                "--help" | "-h" => flags.help = true,
                _ if arg.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
                _ => positional.push(arg),
            }
        }

        let command = build_command(positional, flags)?;
        Ok(Self {
            db_url,
            questions,
            seed,
            command,
        })
    }
}

fn build_command(positional: Vec<String>, flags: Flags) -> Result<Command, ArgsError> {
    if flags.help {
        return Ok(Command::Help);
    }
    let mut positional = positional.into_iter();
    let name = positional.next().ok_or(ArgsError::MissingCommand)?;
    let mut rest: Vec<String> = positional.collect();

    let (command, label) = match name.as_str() {
        "help" => (Command::Help, "help"),
        "chapters" => (Command::Chapters, "chapters"),
        "daily" => (Command::Daily, "daily"),
        "play" => {
            if rest.len() < 2 {
                return Err(ArgsError::MissingArg {
                    command: "play",
                    what: "<chapter> <level>",
                });
            }
            let chapter = parse_chapter(&rest[0])?;
            let level = rest[1]
                .parse::<LevelNumber>()
                .map_err(|_| ArgsError::InvalidLevel {
                    raw: rest[1].clone(),
                })?;
            rest.drain(..2);
            (Command::Play { chapter, level }, "play")
        }
        "leaderboard" => (
            Command::Leaderboard {
                top: flags.top.unwrap_or(DEFAULT_TOP),
            },
            "leaderboard",
        ),
        "export" => {
            let path = if rest.is_empty() {
                PathBuf::from(DEFAULT_EXPORT)
            } else {
                PathBuf::from(rest.remove(0))
            };
            (Command::Export { path }, "export")
        }
        "import" => {
            if rest.is_empty() {
                return Err(ArgsError::MissingArg {
                    command: "import",
                    what: "<path>",
                });
            }
            let path = PathBuf::from(rest.remove(0));
            (Command::Import { path }, "import")
        }
        "settings" => (
            Command::Settings {
                sound: flags.sound,
                confirm: flags.confirm,
            },
            "settings",
        ),
        "reset" => (Command::Reset { yes: flags.yes }, "reset"),
        _ => return Err(ArgsError::UnknownCommand(name)),
    };

    if let Some(arg) = rest.into_iter().next() {
        return Err(ArgsError::UnexpectedArg {
            command: label,
            arg,
        });
    }
    if flags.top.is_some() && !matches!(command, Command::Leaderboard { .. }) {
        return Err(ArgsError::UnexpectedArg {
            command: label,
            arg: "--top".into(),
        });
    }
    if (flags.sound.is_some() || flags.confirm.is_some())
        && !matches!(command, Command::Settings { .. })
    {
        return Err(ArgsError::UnexpectedArg {
            command: label,
            arg: "--sound/--confirm".into(),
        });
    }
    Ok(command)
}

/// Chapters are shown 1-based on the command line.
fn parse_chapter(raw: &str) -> Result<ChapterIndex, ArgsError> {
    raw.trim()
        .parse::<u32>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .map(ChapterIndex::new)
        .ok_or_else(|| ArgsError::InvalidChapter {
            raw: raw.to_string(),
        })
}

pub fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file (and parent dirs) so `SQLite` can open it.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(|s| (*s).to_string()), |_| None)
    }

    #[test]
    fn defaults_apply_without_flags() {
        let args = parse(&["chapters"]).unwrap();
        assert_eq!(args.db_url, DEFAULT_DB_URL);
        assert_eq!(args.questions, PathBuf::from(DEFAULT_QUESTIONS));
        assert_eq!(args.seed, None);
        assert_eq!(args.command, Command::Chapters);
    }

    #[test]
    fn play_takes_one_based_chapter() {
        let args = parse(&["--seed", "7", "play", "2", "7"]).unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(
            args.command,
            Command::Play {
                chapter: ChapterIndex::new(1),
                level: LevelNumber::new(7).unwrap(),
            }
        );
    }

    #[test]
    fn play_rejects_chapter_zero_and_level_eleven() {
        assert!(matches!(
            parse(&["play", "0", "1"]),
            Err(ArgsError::InvalidChapter { .. })
        ));
        assert!(matches!(
            parse(&["play", "1", "11"]),
            Err(ArgsError::InvalidLevel { .. })
        ));
        assert!(matches!(
            parse(&["play", "1"]),
            Err(ArgsError::MissingArg { command: "play", .. })
        ));
    }

    #[test]
    fn env_fills_unset_options_and_flags_win() {
        let env = |key: &str| match key {
            "QUIZ_SEED" => Some("11".to_string()),
            "QUIZ_QUESTIONS" => Some("bank.json".to_string()),
            _ => None,
        };
        let args =
            Args::parse(["--questions", "other.json", "daily"].map(String::from), env).unwrap();
        assert_eq!(args.seed, Some(11));
        assert_eq!(args.questions, PathBuf::from("other.json"));
        assert_eq!(args.command, Command::Daily);
    }

    #[test]
    fn command_flags_are_scoped() {
        let args = parse(&["leaderboard", "--top", "3"]).unwrap();
        assert_eq!(args.command, Command::Leaderboard { top: 3 });

        let args = parse(&["settings", "--sound", "off"]).unwrap();
        assert_eq!(
            args.command,
            Command::Settings {
                sound: Some(false),
                confirm: None
            }
        );

        assert!(matches!(
            parse(&["chapters", "--top", "3"]),
            Err(ArgsError::UnexpectedArg { .. })
        ));
        assert!(matches!(
            parse(&["settings", "--sound", "loud"]),
            Err(ArgsError::InvalidToggle { .. })
        ));
    }

    #[test]
    fn export_defaults_path_and_import_requires_one() {
        assert_eq!(
            parse(&["export"]).unwrap().command,
            Command::Export {
                path: PathBuf::from(DEFAULT_EXPORT)
            }
        );
        assert!(matches!(
            parse(&["import"]),
            Err(ArgsError::MissingArg { command: "import", .. })
        ));
    }

    #[test]
    fn unknown_input_is_reported() {
        assert!(matches!(parse(&[]), Err(ArgsError::MissingCommand)));
        assert!(matches!(parse(&["shuffle"]), Err(ArgsError::UnknownCommand(_))));
        assert!(matches!(
            parse(&["chapters", "--verbose"]),
            Err(ArgsError::UnknownArg(_))
        ));
        assert_eq!(parse(&["-h"]).unwrap().command, Command::Help);
        assert_eq!(parse(&["play", "--help"]).unwrap().command, Command::Help);
    }

    #[test]
    fn memory_and_absolute_urls_pass_through() {
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
        assert_eq!(
            normalize_sqlite_url("sqlite:/tmp/quiz.db".into()),
            "sqlite:///tmp/quiz.db"
        );
        assert!(normalize_sqlite_url("quiz.db".into()).starts_with("sqlite://"));
    }
}
