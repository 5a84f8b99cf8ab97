// File: src/terminal.rs
use crate::config::TranslatorConfig;
use crate::core::session::{Line, LineKind, Session, Step};
use crate::error::{Result, TranslatorError};
use crate::gate::AccessGate;
use crate::runtime::{bootstrap, Runtime, RuntimeLoader};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Instant;

pub const PASSWORD_PROMPT: &str = "Enter password:";
pub const PASSWORD_REJECTED: &str = "Incorrect password. Please try again.";
pub const LOADING: &str = "Loading translator...";
pub const RECOVERY_PROMPT: &str = "Type 'r' to retry, 'l' to reload, or 'q' to quit.";

/// What the user picked after a fatal bootstrap error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    Retry,
    Reload,
    Quit,
}

impl Recovery {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "r" | "retry" => Some(Recovery::Retry),
            "l" | "reload" => Some(Recovery::Reload),
            "q" | "quit" => Some(Recovery::Quit),
            _ => None,
        }
    }
}

/// Line-oriented front end: access gate, bootstrap, then the session loop.
pub struct TerminalApp<O> {
    /// Lines read off the input by a background thread. The channel closes
    /// at end of input.
    lines: Receiver<io::Result<String>>,
    output: O,
    /// Attached to a real terminal. Controls the quit delay, screen clearing
    /// and echoing of input lines.
    interactive: bool,
    color: bool,
    gate: Option<AccessGate>,
}

impl<O: Write> TerminalApp<O> {
    pub fn new<I>(input: I, output: O, interactive: bool) -> Self
    where
        I: BufRead + Send + 'static,
    {
        Self {
            lines: spawn_reader(input),
            output,
            interactive,
            color: true,
            gate: None,
        }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    /// Runs until end of input or until the user quits after a fatal error.
    ///
    /// `setup` is called once up front and again on every reload; it
    /// supplies the configuration and a fresh runtime loader.
    pub fn run<L, S>(&mut self, mut setup: S) -> Result<()>
    where
        L: RuntimeLoader,
        S: FnMut() -> Result<(TranslatorConfig, L)>,
    {
        'reload: loop {
            let (config, mut loader) = setup()?;
            self.color = config.color;

            let gate = self
                .gate
                .get_or_insert_with(|| AccessGate::new(config.passphrase.clone()));
            if !gate.is_unlocked() && !self.unlock()? {
                return Ok(());
            }

            let policy = config.retry_policy();
            loop {
                self.plain(LOADING)?;
                let err = match bootstrap(&mut loader, &policy) {
                    Ok(runtime) => {
                        let session = Session::new(runtime, config.reset_delay());
                        return self.session_loop(session);
                    }
                    Err(err) => err,
                };

                tracing::error!(error = %err, "translator failed to start");
                match self.recover(&err)? {
                    Recovery::Retry => continue,
                    Recovery::Reload => continue 'reload,
                    Recovery::Quit => return Err(err),
                }
            }
        }
    }

    fn unlock(&mut self) -> Result<bool> {
        loop {
            self.plain(PASSWORD_PROMPT)?;
            let Some(attempt) = self.read_line()? else {
                return Ok(false);
            };
            let unlocked = self
                .gate
                .as_mut()
                .map_or(true, |gate| gate.try_unlock(&attempt));
            if unlocked {
                return Ok(true);
            }
            self.styled(LineKind::Error, PASSWORD_REJECTED, true)?;
        }
    }

    fn recover(&mut self, err: &TranslatorError) -> Result<Recovery> {
        self.styled(LineKind::Error, &format!("Failed to load translator: {err}"), true)?;
        loop {
            self.plain(RECOVERY_PROMPT)?;
            let Some(answer) = self.read_line()? else {
                return Ok(Recovery::Quit);
            };
            if let Some(choice) = Recovery::parse(&answer) {
                return Ok(choice);
            }
        }
    }

    fn session_loop<R: Runtime>(&mut self, mut session: Session<R>) -> Result<()> {
        let mut rendered = 0;
        let mut generation = session.generation();
        self.render(&session, &mut rendered, &mut generation)?;

        loop {
            let next = match session.pending_reset() {
                // Whichever comes first: the reset deadline or the next line.
                Some(pending) => {
                    let wait = pending.due.saturating_duration_since(Instant::now());
                    match self.lines.recv_timeout(wait) {
                        Ok(line) => Some(line?),
                        Err(RecvTimeoutError::Timeout) => {
                            session.poll_reset(Instant::now());
                            self.render(&session, &mut rendered, &mut generation)?;
                            continue;
                        }
                        Err(RecvTimeoutError::Disconnected) => None,
                    }
                }
                None => self.read_line()?,
            };

            let Some(line) = next else {
                if session.cancel_reset().is_some() {
                    tracing::debug!("input closed before the session reset");
                }
                return Ok(());
            };
            if line.trim().is_empty() {
                continue;
            }

            // Applies a pending reset before handling the line.
            let step = session.submit(&line);
            self.render(&session, &mut rendered, &mut generation)?;

            // Piped input has nobody to read the farewell; start over now.
            if step == Step::Quit && !self.interactive {
                session.reset_now();
                self.render(&session, &mut rendered, &mut generation)?;
            }
        }
    }

    /// Prints transcript lines added since the last call, or the whole
    /// transcript after a reset.
    fn render<R: Runtime>(
        &mut self,
        session: &Session<R>,
        rendered: &mut usize,
        generation: &mut u64,
    ) -> io::Result<()> {
        if session.generation() != *generation {
            *generation = session.generation();
            *rendered = 0;
            if self.interactive {
                queue!(self.output, Clear(ClearType::All), MoveTo(0, 0))?;
            } else {
                writeln!(self.output)?;
            }
        }

        let lines = session.transcript();
        for (i, line) in lines.iter().enumerate().skip(*rendered) {
            self.render_line(line, i > 0)?;
        }
        *rendered = lines.len();
        self.output.flush()
    }

    fn render_line(&mut self, line: &Line, separated: bool) -> io::Result<()> {
        match line.kind {
            // A terminal already shows what was typed.
            LineKind::Input if self.interactive => Ok(()),
            LineKind::Input => self.styled(LineKind::Input, &line.text, false),
            kind => self.styled(kind, &line.text, separated),
        }
    }

    fn plain(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{text}")?;
        self.output.flush()
    }

    fn styled(&mut self, kind: LineKind, text: &str, separated: bool) -> io::Result<()> {
        if separated {
            writeln!(self.output)?;
        }
        // Prompts leave the cursor on the same line.
        let newline = if text.ends_with("> ") { "" } else { "\n" };
        if self.color {
            let styled = match kind {
                LineKind::Output => text.green(),
                LineKind::Input => text.cyan(),
                LineKind::Error => text.red(),
            };
            write!(self.output, "{styled}{newline}")
        } else {
            write!(self.output, "{text}{newline}")
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        match self.lines.recv() {
            Ok(line) => line.map(Some),
            Err(_) => Ok(None),
        }
    }
}

/// Reads `input` line by line on its own thread. Bytes that are not valid
/// UTF-8 are replaced rather than rejected.
fn spawn_reader<I>(mut input: I) -> Receiver<io::Result<String>>
where
    I: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    while matches!(buf.last(), Some(b'\n' | b'\r')) {
                        buf.pop();
                    }
                    let line = String::from_utf8_lossy(&buf).into_owned();
                    if tx.send(Ok(line)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx.send(Err(err));
                    break;
                }
            }
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::Recovery;

    #[test]
    fn recovery_choices() {
        assert_eq!(Recovery::parse("R"), Some(Recovery::Retry));
        assert_eq!(Recovery::parse(" reload "), Some(Recovery::Reload));
        assert_eq!(Recovery::parse("q"), Some(Recovery::Quit));
        assert_eq!(Recovery::parse("maybe"), None);
    }
}
