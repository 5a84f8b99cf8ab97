// File: src/core/session.rs
use crate::core::types::Direction;
use crate::runtime::Runtime;
use std::time::{Duration, Instant};

pub const WELCOME: &str = "Welcome to the Derisian Translator!";
pub const MENU: &str = "Type '1' to translate English ➡️ Derisian\n\
                        Type '2' to translate Derisian ➡️ English\n\
                        Type 'q' to quit\n> ";
pub const FAREWELL: &str = "Goodbye! ✌️";
pub const INVALID_OPTION: &str = "Invalid option, try again.";

pub fn phrase_prompt(direction: Direction) -> String {
    format!("Enter {} word or phrase:\n> ", direction.source_language())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// A line the user submitted, echoed back.
    Input,
    Output,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub kind: LineKind,
    pub text: String,
}

impl Line {
    fn output(text: impl Into<String>) -> Self {
        Self { kind: LineKind::Output, text: text.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Choice,
    AwaitingPhrase(Direction),
}

/// What the front end should do after a submitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    /// The user quit; a reset is pending.
    Quit,
}

/// A reset scheduled by a quit command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReset {
    pub due: Instant,
}

/// The interactive menu loop, one submitted line at a time.
pub struct Session<R> {
    runtime: R,
    mode: Mode,
    transcript: Vec<Line>,
    reset_delay: Duration,
    pending_reset: Option<PendingReset>,
    generation: u64,
}

impl<R: Runtime> Session<R> {
    pub fn new(runtime: R, reset_delay: Duration) -> Self {
        Self {
            runtime,
            mode: Mode::Choice,
            transcript: initial_transcript(),
            reset_delay,
            pending_reset: None,
            generation: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn transcript(&self) -> &[Line] {
        &self.transcript
    }

    /// Bumped every time the session is reset; a front end compares it to
    /// know when to redraw from scratch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_reset(&self) -> Option<PendingReset> {
        self.pending_reset
    }

    pub fn submit(&mut self, input: &str) -> Step {
        // New input before the delay elapsed starts the next session now.
        self.reset_now();

        self.transcript.push(Line { kind: LineKind::Input, text: input.to_string() });

        match self.mode {
            Mode::Choice => self.handle_choice(input),
            Mode::AwaitingPhrase(direction) => {
                self.handle_phrase(input, direction);
                Step::Continue
            }
        }
    }

    fn handle_choice(&mut self, input: &str) -> Step {
        let choice = input.trim();
        let direction = match choice {
            "1" => Direction::EnglishToDerisian,
            "2" => Direction::DerisianToEnglish,
            q if q.eq_ignore_ascii_case("q") => {
                self.transcript.push(Line::output(FAREWELL));
                self.pending_reset = Some(PendingReset {
                    due: Instant::now() + self.reset_delay,
                });
                tracing::debug!(delay = ?self.reset_delay, "session reset scheduled");
                return Step::Quit;
            }
            _ => {
                self.transcript.push(Line::output(INVALID_OPTION));
                self.transcript.push(Line::output(MENU));
                return Step::Continue;
            }
        };

        self.transcript.push(Line::output(phrase_prompt(direction)));
        self.mode = Mode::AwaitingPhrase(direction);
        Step::Continue
    }

    fn handle_phrase(&mut self, phrase: &str, direction: Direction) {
        tracing::debug!(%direction, chars = phrase.chars().count(), "translating phrase");
        match self.runtime.translate(phrase, direction) {
            Ok(translated) => {
                self.transcript.push(Line::output(format!(
                    "{}: {}",
                    direction.output_label(),
                    translated
                )));
            }
            Err(err) => {
                if err.is_fatal() {
                    tracing::error!(error = %err, "translator runtime failed");
                } else {
                    tracing::warn!(error = %err, "translation request failed");
                }
                self.transcript.push(Line {
                    kind: LineKind::Error,
                    text: format!("Error: {err}"),
                });
            }
        }
        self.transcript.push(Line::output(MENU));
        self.mode = Mode::Choice;
    }

    /// Applies a pending reset whose deadline has passed. Returns whether a
    /// reset happened.
    pub fn poll_reset(&mut self, now: Instant) -> bool {
        match self.pending_reset {
            Some(pending) if now >= pending.due => {
                self.reset_now();
                true
            }
            _ => false,
        }
    }

    /// Drops a pending reset, leaving the farewell on screen.
    pub fn cancel_reset(&mut self) -> Option<PendingReset> {
        self.pending_reset.take()
    }

    /// Applies a pending reset immediately, if there is one.
    pub fn reset_now(&mut self) -> bool {
        if self.pending_reset.take().is_none() {
            return false;
        }
        self.transcript = initial_transcript();
        self.mode = Mode::Choice;
        self.generation += 1;
        tracing::info!(generation = self.generation, "session reset");
        true
    }
}

fn initial_transcript() -> Vec<Line> {
    vec![Line::output(WELCOME), Line::output(MENU)]
}
