use std::error::Error;
use std::path::Path;

use quiz_core::model::ProgressMap;
use services::{AppServices, Clock, QuestionBank};

mod args;
mod play;

use args::{Args, ArgsError, Command, prepare_sqlite_file, print_usage};

fn print_chapters(bank: &QuestionBank, progress: &ProgressMap) {
    if bank.chapters().is_empty() {
        println!("The question bank is empty.");
        return;
    }

    for chapter in bank.chapters() {
        let levels: Vec<String> = progress
            .unlocked_levels(chapter.index)
            .map(|level| format!("{level} ({})", level.difficulty()))
            .collect();
        if levels.is_empty() {
            println!("{:>3}. {}  [locked]", chapter.index.display_number(), chapter.title);
        } else {
            println!(
                "{:>3}. {}  levels: {}",
                chapter.index.display_number(),
                chapter.title,
                levels.join(", ")
            );
        }
    }
}

async fn run_command(app: &AppServices, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Help => print_usage(),
        Command::Chapters => {
            let progress = app.progress().load().await?;
            print_chapters(&app.bank(), &progress);
        }
        Command::Play { chapter, level } => {
            let sound = app.settings().load().await?.sound_enabled();
            let loop_svc = app.session_loop();
            let session = loop_svc.start_level(chapter, level).await?;
            play::run_session(&loop_svc, session, sound).await?;
        }
        Command::Daily => {
            let sound = app.settings().load().await?.sound_enabled();
            let loop_svc = app.session_loop();
            let session = loop_svc.start_daily().await?;
            println!(
                "Daily challenge: chapter {} level {}",
                session.chapter().display_number(),
                session.level()
            );
            play::run_session(&loop_svc, session, sound).await?;
        }
        Command::Leaderboard { top } => {
            let entries = app.leaderboard().top_n(top).await?;
            if entries.is_empty() {
                println!("No results yet.");
            }
            for (rank, entry) in entries.iter().enumerate() {
                println!(
                    "{:>3}. Ch {} L {}  {}/{}  {:>3}%  {}",
                    rank + 1,
                    entry.chapter.display_number(),
                    entry.level,
                    entry.correct,
                    entry.total,
                    entry.percent,
                    entry.recorded_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        Command::Export { path } => {
            let document = app.transfer().export_state().await?;
            std::fs::write(&path, document)?;
            println!("Exported to {}", path.display());
        }
        Command::Import { path } => {
            let text = std::fs::read_to_string(&path)?;
            let report = app.transfer().import_state(&text).await?;
            println!(
                "Imported {} document(s) from {} (progress: {}, leaderboard: {}, settings: {})",
                report.applied(),
                path.display(),
                yes_no(report.progress),
                yes_no(report.leaderboard),
                yes_no(report.settings)
            );
        }
        Command::Settings { sound, confirm } => {
            let settings = app.settings();
            if let Some(enabled) = sound {
                settings.set_sound(enabled).await?;
            }
            if let Some(enabled) = confirm {
                settings.set_confirm_destructive(enabled).await?;
            }
            let current = settings.load().await?;
            println!("sound:   {}", on_off(current.sound_enabled()));
            println!("confirm: {}", on_off(current.confirm_destructive()));
        }
        Command::Reset { yes } => {
            if app.settings().load().await?.confirm_destructive() && !yes {
                return Err(ArgsError::ConfirmationRequired.into());
            }
            app.progress().reset().await?;
            println!("Progress cleared.");
        }
    }
    Ok(())
}

fn on_off(value: bool) -> &'static str {
    if value { "on" } else { "off" }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn load_bank(path: &Path) -> Result<QuestionBank, Box<dyn Error>> {
    let bank = QuestionBank::load(path)?;
    log::info!(
        "loaded {} questions in {} chapters from {}",
        bank.len(),
        bank.chapter_count(),
        path.display()
    );
    Ok(bank)
}

async fn run() -> Result<(), Box<dyn Error>> {
    let parsed = Args::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .inspect_err(|_| print_usage())?;

    if parsed.command == Command::Help {
        print_usage();
        return Ok(());
    }

    let bank = load_bank(&parsed.questions)?;

    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let app =
        AppServices::new_sqlite(&parsed.db_url, Clock::default_clock(), bank, parsed.seed).await?;

    run_command(&app, parsed.command).await
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
