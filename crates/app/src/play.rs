use std::error::Error;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Interval, MissedTickBehavior};

use quiz_core::model::SessionOutcome;
use services::{
    AdvanceResult, AnswerFeedback, QuizSession, SessionError, SessionLoopService, TickOutcome,
};

/// Seconds left at which the countdown is printed.
const COUNTDOWN_MARKS: [u32; 3] = [10, 5, 3];

/// What the player typed at the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Quit,
    Next,
    Retry,
    Option(usize),
    Unknown,
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim() {
            "" => Input::Next,
            "q" | "Q" => Input::Quit,
            "r" | "R" => Input::Retry,
            other => other
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .map_or(Input::Unknown, Input::Option),
        }
    }
}

/// Terminal bell, the only sound a terminal has.
fn chime(sound: bool) {
    if sound {
        print!("\x07");
    }
}

fn ticker() -> Interval {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.reset();
    interval
}

fn show_question(session: &QuizSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    println!();
    println!(
        "Q {}/{}  ({}s)",
        session.current_index() + 1,
        session.total_questions(),
        session.seconds_left()
    );
    println!("{}", question.text());
    for (idx, option) in question.options().iter().enumerate() {
        println!("  {}. {option}", idx + 1);
    }
}

fn show_feedback(session: &QuizSession, feedback: AnswerFeedback) {
    let correct_text = session
        .current_question()
        .and_then(|q| q.options().get(feedback.correct_index))
        .map_or("", String::as_str);
    if feedback.correct {
        println!("Correct! +{} time bonus", feedback.time_bonus);
    } else {
        println!(
            "Wrong. The answer was {}. {correct_text}",
            feedback.correct_index + 1
        );
    }
    println!("(Enter for next)");
}

fn show_outcome(outcome: &SessionOutcome) {
    println!();
    println!(
        "Chapter {} level {} complete: {}/{} correct ({}%), time bonus {}",
        outcome.chapter().display_number(),
        outcome.level(),
        outcome.correct(),
        outcome.total(),
        outcome.percent(),
        outcome.time_bonus()
    );
    if let Some(unlock) = outcome.next_unlock().filter(|u| u.newly_unlocked) {
        println!(
            "Unlocked chapter {} level {}",
            unlock.chapter.display_number(),
            unlock.level
        );
    }
    println!("r + Enter to retry, Enter to finish");
}

/// Run one session (and any retries) against stdin.
///
/// Ticks come from a one-second interval raced against stdin. Quitting or
/// closing stdin abandons the active session without recording anything.
pub async fn run_session(
    loop_svc: &SessionLoopService,
    mut session: QuizSession,
    sound: bool,
) -> Result<(), Box<dyn Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = ticker();

    match session.outcome() {
        Some(outcome) => {
            println!("No questions for this level.");
            show_outcome(outcome);
        }
        None => show_question(&session),
    }

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let Some(token) = session.timer_token() else {
                    continue;
                };
                match session.tick(token) {
                    TickOutcome::Running { seconds_left }
                        if COUNTDOWN_MARKS.contains(&seconds_left) =>
                    {
                        println!("  {seconds_left}s left");
                    }
                    TickOutcome::Expired => {
                        chime(sound);
                        let answer = session
                            .current_question()
                            .map(|q| q.answer_index() + 1)
                            .unwrap_or_default();
                        println!("Time up. The answer was {answer}. (Enter for next)");
                    }
                    TickOutcome::Running { .. } | TickOutcome::Stale => {}
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    log::info!("stdin closed, leaving session");
                    return Ok(());
                };

                match (Input::parse(&line), session.is_complete()) {
                    (Input::Quit, _) => {
                        println!("Session abandoned.");
                        return Ok(());
                    }
                    (Input::Retry, true) => {
                        session = loop_svc.retry(&session).await?;
                        interval = ticker();
                        match session.outcome() {
                            Some(outcome) => show_outcome(outcome),
                            None => show_question(&session),
                        }
                    }
                    (_, true) => return Ok(()),
                    (Input::Next, false) => match loop_svc.advance(&mut session).await? {
                        AdvanceResult::Next(_) => {
                            interval = ticker();
                            show_question(&session);
                        }
                        AdvanceResult::Completed(outcome) => show_outcome(&outcome),
                    },
                    (Input::Option(selected), false) => match session.answer(selected) {
                        Ok(feedback) => {
                            if !feedback.correct {
                                chime(sound);
                            }
                            show_feedback(&session, feedback);
                        }
                        Err(
                            err @ (SessionError::AlreadyAnswered
                            | SessionError::TimeExpired
                            | SessionError::InvalidOption { .. }),
                        ) => println!("{err}"),
                        Err(err) => return Err(err.into()),
                    },
                    (Input::Retry | Input::Unknown, false) => {
                        println!("Type an option number, Enter for next, or q to quit.");
                    }
                }
            }
        }
    }
}
