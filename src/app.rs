//! Main application logic for CatShell
//!
//! Runs the shell headless: stdin lines drive pointer and keyboard input,
//! timers advance on wall-clock time, and state is printed as JSON on
//! request.

use anyhow::Result;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::error::ShellResult;
use crate::input::{InputCommand, HELP};
use crate::shell::auxiliary::ProcessLauncher;
use crate::shell::{ExitPrompt, NoticeLevel, PointerEvent, ShellController};
use crate::window::WindowId;

/// Longest the loop sleeps when no timer is pending
const IDLE_WAIT_MS: u64 = 250;

type LineSource = Arc<Mutex<Receiver<String>>>;

/// Forward stdin lines to a channel from a background thread
fn spawn_stdin_reader() -> ShellResult<LineSource> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
            debug!("Input reader finished");
        })?;
    Ok(Arc::new(Mutex::new(rx)))
}

/// Asks the exit question on stdout and reads the answer from the input channel
pub struct ConsolePrompt {
    lines: LineSource,
}

impl ConsolePrompt {
    pub fn new(lines: LineSource) -> Self {
        Self { lines }
    }
}

impl ExitPrompt for ConsolePrompt {
    fn confirm(&mut self, title: &str, message: &str) -> bool {
        println!("{}: {} [y/N]", title, message.replace('\n', " "));
        let _ = io::stdout().flush();

        match self.lines.lock().recv() {
            Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes" | "ok"),
            Err(_) => {
                // nobody left to answer
                info!("Input closed while asking to exit, accepting");
                true
            }
        }
    }
}

/// Main application state
pub struct Application {
    config: Arc<Config>,
    shell: ShellController,
    lines: LineSource,
    last_advance: Instant,
}

impl Application {
    /// Create a new application instance reading commands from stdin
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let lines = spawn_stdin_reader()?;
        Ok(Self::with_input(config, lines))
    }

    /// Create an application fed from an existing line channel
    pub fn with_input(config: Arc<Config>, lines: LineSource) -> Self {
        info!("Initializing {}", config.display.title);
        let shell = ShellController::new(
            config.clone(),
            Box::new(ProcessLauncher),
            Box::new(ConsolePrompt::new(lines.clone())),
        );

        Self {
            config,
            shell,
            lines,
            last_advance: Instant::now(),
        }
    }

    /// Run the event loop until the shell exits
    pub fn run(&mut self) -> Result<()> {
        info!(
            "Starting {} main loop ({}x{})",
            self.config.display.title, self.config.display.width, self.config.display.height
        );
        println!("{} ready. Type 'help' for commands.", self.config.display.title);

        while self.shell.is_running() {
            let wait = self
                .shell
                .next_timer_in()
                .unwrap_or(IDLE_WAIT_MS)
                .clamp(1, IDLE_WAIT_MS);
            let received = self.lines.lock().recv_timeout(Duration::from_millis(wait));
            self.pump_timers();

            match received {
                Ok(line) => self.handle_line(&line)?,
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    info!("Input closed, treating as a close request");
                    self.shell.confirm_exit();
                }
            }
            self.flush_notices();
        }

        info!("{} main loop ended", self.config.display.title);
        Ok(())
    }

    /// Execute one input line
    pub fn handle_line(&mut self, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }
        let command = match line.parse::<InputCommand>() {
            Ok(command) => command,
            Err(e) => {
                warn!("{}", e);
                println!("error: {}", e);
                return Ok(());
            }
        };
        debug!("Input: {:?}", command);

        match command {
            InputCommand::Press(p) => self.shell.handle_pointer(PointerEvent::Press(p)),
            InputCommand::Move(p) => self.shell.handle_pointer(PointerEvent::Motion(p)),
            InputCommand::Release(p) => self.shell.handle_pointer(PointerEvent::Release(p)),
            InputCommand::Click(p) => {
                self.shell.handle_pointer(PointerEvent::Press(p));
                self.shell.handle_pointer(PointerEvent::Release(p));
            }
            InputCommand::DoubleClick(p) => {
                self.shell.handle_pointer(PointerEvent::Press(p));
                self.shell.handle_pointer(PointerEvent::Release(p));
                self.shell.handle_pointer(PointerEvent::DoubleClick(p));
            }
            InputCommand::Type(text) => self.shell.type_text(&text),
            InputCommand::Menu => self.shell.toggle_start_menu(),
            InputCommand::Select(path) => {
                let labels: Vec<&str> = path.iter().map(String::as_str).collect();
                if !self.shell.select_menu_path(&labels) {
                    println!("no menu item '{}'", path.join("/"));
                }
            }
            InputCommand::Open(kind) => {
                if let Some(id) = self.shell.open_window(kind) {
                    println!("opened {}", id);
                }
            }
            InputCommand::Action(action) => self.shell.dispatch(action),
            InputCommand::Close(raw) => {
                if !self.shell.close_window(WindowId(raw)) {
                    println!("no window win-{}", raw);
                }
            }
            InputCommand::Wait(ms) => {
                thread::sleep(Duration::from_millis(ms));
                self.pump_timers();
            }
            InputCommand::State => println!("{}", self.state_json()?),
            InputCommand::Quit => {
                self.shell.confirm_exit();
            }
            InputCommand::Help => println!("{}", HELP),
        }
        Ok(())
    }

    /// Advance the shell's timers by the wall time since the last call
    fn pump_timers(&mut self) {
        let elapsed = self.last_advance.elapsed().as_millis() as u64;
        if elapsed > 0 {
            self.last_advance += Duration::from_millis(elapsed);
            self.shell.advance(elapsed);
        }
    }

    fn state_json(&self) -> ShellResult<String> {
        Ok(serde_json::to_string_pretty(&self.shell.snapshot())?)
    }

    fn flush_notices(&mut self) {
        for notice in self.shell.take_notices() {
            match notice.level {
                NoticeLevel::Info => info!("{}: {}", notice.title, notice.message),
                NoticeLevel::Error => warn!("{}: {}", notice.title, notice.message),
            }
            println!("[{:?}] {}: {}", notice.level, notice.title, notice.message);
        }
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        info!("Cleaning up {}", self.config.display.title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> (mpsc::Sender<String>, LineSource) {
        let (tx, rx) = mpsc::channel();
        (tx, Arc::new(Mutex::new(rx)))
    }

    #[test]
    fn console_prompt_reads_answer() {
        let (tx, lines) = channel();
        let mut prompt = ConsolePrompt::new(lines);
        tx.send("n".to_string()).unwrap();
        assert!(!prompt.confirm("Quit", "Sure?"));
        tx.send(" Yes ".to_string()).unwrap();
        assert!(prompt.confirm("Quit", "Sure?"));
    }

    #[test]
    fn console_prompt_accepts_when_input_closed() {
        let (tx, lines) = channel();
        drop(tx);
        let mut prompt = ConsolePrompt::new(lines);
        assert!(prompt.confirm("Quit", "Sure?"));
    }

    #[test]
    fn lines_drive_the_shell() {
        let (tx, lines) = channel();
        let mut app = Application::with_input(Arc::new(Config::default()), lines);

        app.handle_line("open notepad").unwrap();
        app.handle_line("open calc").unwrap();
        app.handle_line("bogus").unwrap();
        assert_eq!(app.shell.registry().len(), 2);

        let front = app.shell.registry().frontmost().unwrap();
        let title = app.shell.registry().get(front).unwrap().title().to_string();
        assert_eq!(title, "Calculator");

        app.handle_line(&format!("close {}", front)).unwrap();
        assert_eq!(app.shell.registry().len(), 1);

        let json = app.state_json().unwrap();
        assert!(json.contains("Untitled - Notepad"));

        tx.send("n".to_string()).unwrap();
        app.handle_line("quit").unwrap();
        assert!(app.shell.is_running());

        tx.send("y".to_string()).unwrap();
        app.handle_line("quit").unwrap();
        assert!(!app.shell.is_running());
        assert!(app.shell.registry().is_empty());
    }

    #[test]
    fn select_runs_menu_entry_on_next_tick() {
        let (_tx, lines) = channel();
        let mut app = Application::with_input(Arc::new(Config::default()), lines);
        app.handle_line("select Programs/Paint").unwrap();
        app.handle_line("select Programs/Calculator").unwrap();
        assert!(app.shell.registry().is_empty());
        assert!(!app.shell.start_menu().is_visible());

        app.shell.advance(10);
        let front = app.shell.registry().frontmost().unwrap();
        assert_eq!(app.shell.registry().get(front).unwrap().title(), "Calculator");
    }

    #[test]
    fn click_selects_desktop_icon_only_on_double() {
        let (_tx, lines) = channel();
        let mut app = Application::with_input(Arc::new(Config::default()), lines);
        app.handle_line("click 20 20").unwrap();
        assert!(app.shell.registry().is_empty());
        app.handle_line("dclick 20 20").unwrap();
        let front = app.shell.registry().frontmost().unwrap();
        assert_eq!(
            app.shell.registry().get(front).unwrap().title(),
            "Untitled - Notepad"
        );
        assert_eq!(app.shell.registry().len(), 1);
    }
}
