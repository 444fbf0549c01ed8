//! Out-of-process auxiliary demo
//!
//! The shell only ever asks three things of the child: is it alive, please
//! stop, and stop now. Shutdown is a two-phase protocol: a termination
//! request, a bounded wait, then a forced kill if the child is still
//! around.

use log::{debug, info, warn};
use std::io;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

use crate::config::AuxiliaryConfig;
use crate::error::{ShellError, ShellResult};

/// A running child process as seen by the shell
pub trait AuxiliaryChild {
    fn pid(&self) -> u32;

    /// Liveness check; reaps the child if it has exited
    fn is_alive(&mut self) -> bool;

    /// Ask the child to exit on its own
    fn request_terminate(&mut self) -> io::Result<()>;

    /// Force the child down
    fn kill(&mut self) -> io::Result<()>;
}

/// Starts the auxiliary child
pub trait AuxiliaryLauncher {
    fn launch(&mut self, config: &AuxiliaryConfig) -> ShellResult<Box<dyn AuxiliaryChild>>;
}

/// Lifecycle of the auxiliary process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuxState {
    NotStarted,
    Running,
    Terminating,
    Stopped,
}

/// How a shutdown ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// Nothing was running
    NotRunning,
    /// Exited within the grace period
    Graceful,
    /// Needed the forced kill
    Killed,
}

pub struct AuxiliaryHandle {
    config: AuxiliaryConfig,
    launcher: Box<dyn AuxiliaryLauncher>,
    child: Option<Box<dyn AuxiliaryChild>>,
    state: AuxState,
}

impl AuxiliaryHandle {
    pub fn new(config: AuxiliaryConfig, launcher: Box<dyn AuxiliaryLauncher>) -> Self {
        Self {
            config,
            launcher,
            child: None,
            state: AuxState::NotStarted,
        }
    }

    /// Current state, refreshed against the child's liveness
    pub fn state(&mut self) -> AuxState {
        if self.state == AuxState::Running {
            let alive = self.child.as_mut().is_some_and(|c| c.is_alive());
            if !alive {
                info!("Auxiliary process exited on its own");
                self.child = None;
                self.state = AuxState::Stopped;
            }
        }
        self.state
    }

    pub fn is_running(&mut self) -> bool {
        self.state() == AuxState::Running
    }

    /// Start the child. The caller checks `is_running` first.
    pub fn launch(&mut self) -> ShellResult<u32> {
        if self.is_running() {
            return Err(ShellError::AuxiliaryLaunch("already running".to_string()));
        }
        let child = self.launcher.launch(&self.config)?;
        let pid = child.pid();
        info!("Auxiliary process started with pid {}", pid);
        self.child = Some(child);
        self.state = AuxState::Running;
        Ok(pid)
    }

    /// Request termination, wait out the grace period, then force-kill.
    pub fn shutdown(&mut self) -> StopOutcome {
        if !self.is_running() {
            return StopOutcome::NotRunning;
        }
        let Some(mut child) = self.child.take() else {
            self.state = AuxState::Stopped;
            return StopOutcome::NotRunning;
        };

        self.state = AuxState::Terminating;
        info!("Terminating auxiliary process {}", child.pid());
        if let Err(e) = child.request_terminate() {
            warn!("Termination request failed: {}", e);
        }

        let poll = Duration::from_millis(self.config.poll_ms.max(1));
        let outcome = if wait_for_exit(child.as_mut(), Duration::from_millis(self.config.grace_ms), poll) {
            StopOutcome::Graceful
        } else {
            warn!("Auxiliary process did not terminate gracefully, killing");
            if let Err(e) = child.kill() {
                warn!("Forced kill failed: {}", e);
            }
            if !wait_for_exit(child.as_mut(), Duration::from_millis(self.config.kill_wait_ms), poll) {
                warn!("Auxiliary process {} still reported alive after kill", child.pid());
            }
            StopOutcome::Killed
        };

        self.state = AuxState::Stopped;
        info!("Auxiliary process stopped ({:?})", outcome);
        outcome
    }
}

/// Poll until the child exits or `limit` passes; true if it exited
fn wait_for_exit(child: &mut dyn AuxiliaryChild, limit: Duration, poll: Duration) -> bool {
    let deadline = Instant::now() + limit;
    loop {
        if !child.is_alive() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep(poll.min(deadline - now));
    }
}

/// Launches the configured program as a real child process
#[derive(Debug, Default)]
pub struct ProcessLauncher;

impl AuxiliaryLauncher for ProcessLauncher {
    fn launch(&mut self, config: &AuxiliaryConfig) -> ShellResult<Box<dyn AuxiliaryChild>> {
        debug!("Spawning {} {:?}", config.command, config.args);
        let child = Command::new(&config.command)
            .args(&config.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| ShellError::AuxiliaryLaunch(format!("{}: {}", config.command, e)))?;
        Ok(Box::new(ProcessChild { child }))
    }
}

struct ProcessChild {
    child: Child,
}

impl AuxiliaryChild for ProcessChild {
    fn pid(&self) -> u32 {
        self.child.id()
    }

    fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Send the platform's polite termination signal
    fn request_terminate(&mut self) -> io::Result<()> {
        let pid = Pid::from_u32(self.child.id());
        let mut system = System::new();
        system.refresh_processes_specifics(ProcessesToUpdate::Some(&[pid]), ProcessRefreshKind::new());

        let Some(process) = system.process(pid) else {
            debug!("Process {} already gone before termination request", pid);
            return Ok(());
        };
        match process.kill_with(Signal::Term) {
            Some(true) => Ok(()),
            Some(false) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("could not signal process {}", pid),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "graceful termination is not supported on this platform",
            )),
        }
    }

    fn kill(&mut self) -> io::Result<()> {
        match self.child.kill() {
            Ok(()) => Ok(()),
            // already exited
            Err(e) if e.kind() == io::ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory stand-ins for a child process

    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Observable state of a fake child
    #[derive(Debug, Default)]
    pub struct FakeProcess {
        pub alive: bool,
        pub honours_terminate: bool,
        pub terminate_requests: u32,
        pub kills: u32,
    }

    pub type Shared = Rc<RefCell<FakeProcess>>;

    pub struct FakeChild(pub Shared);

    impl AuxiliaryChild for FakeChild {
        fn pid(&self) -> u32 {
            4242
        }

        fn is_alive(&mut self) -> bool {
            self.0.borrow().alive
        }

        fn request_terminate(&mut self) -> io::Result<()> {
            let mut p = self.0.borrow_mut();
            p.terminate_requests += 1;
            if p.honours_terminate {
                p.alive = false;
            }
            Ok(())
        }

        fn kill(&mut self) -> io::Result<()> {
            let mut p = self.0.borrow_mut();
            p.kills += 1;
            p.alive = false;
            Ok(())
        }
    }

    /// Launcher handing out fake children; fails when `fail` is set
    #[derive(Default)]
    pub struct FakeLauncher {
        pub fail: bool,
        pub honours_terminate: bool,
        pub log: Rc<RefCell<Vec<Shared>>>,
    }

    impl FakeLauncher {
        pub fn graceful() -> Self {
            Self {
                honours_terminate: true,
                ..Self::default()
            }
        }
    }

    impl AuxiliaryLauncher for FakeLauncher {
        fn launch(&mut self, _config: &AuxiliaryConfig) -> ShellResult<Box<dyn AuxiliaryChild>> {
            if self.fail {
                return Err(ShellError::AuxiliaryLaunch("missing runtime".to_string()));
            }
            let shared = Rc::new(RefCell::new(FakeProcess {
                alive: true,
                honours_terminate: self.honours_terminate,
                ..FakeProcess::default()
            }));
            self.log.borrow_mut().push(shared.clone());
            Ok(Box::new(FakeChild(shared)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::*;
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn quick_config() -> AuxiliaryConfig {
        AuxiliaryConfig {
            grace_ms: 5,
            kill_wait_ms: 5,
            poll_ms: 1,
            ..AuxiliaryConfig::default()
        }
    }

    fn handle(launcher: FakeLauncher) -> (AuxiliaryHandle, Rc<RefCell<Vec<Shared>>>) {
        let log = launcher.log.clone();
        (AuxiliaryHandle::new(quick_config(), Box::new(launcher)), log)
    }

    #[test]
    fn starts_not_started() {
        let (mut aux, _) = handle(FakeLauncher::graceful());
        assert_eq!(aux.state(), AuxState::NotStarted);
        assert_eq!(aux.shutdown(), StopOutcome::NotRunning);
    }

    #[test]
    fn graceful_shutdown_skips_kill() {
        let (mut aux, log) = handle(FakeLauncher::graceful());
        aux.launch().unwrap();
        assert_eq!(aux.state(), AuxState::Running);
        assert_eq!(aux.shutdown(), StopOutcome::Graceful);
        assert_eq!(aux.state(), AuxState::Stopped);
        let p = log.borrow()[0].clone();
        assert_eq!(p.borrow().terminate_requests, 1);
        assert_eq!(p.borrow().kills, 0);
    }

    #[test]
    fn stubborn_child_is_killed_after_grace() {
        let (mut aux, log) = handle(FakeLauncher::default());
        aux.launch().unwrap();
        assert_eq!(aux.shutdown(), StopOutcome::Killed);
        let p = log.borrow()[0].clone();
        assert_eq!(p.borrow().terminate_requests, 1);
        assert_eq!(p.borrow().kills, 1);
        assert!(!p.borrow().alive);
    }

    #[test]
    fn relaunch_while_running_is_rejected() {
        let (mut aux, log) = handle(FakeLauncher::graceful());
        aux.launch().unwrap();
        assert!(aux.launch().is_err());
        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].borrow().alive);
    }

    #[test]
    fn exited_child_can_be_relaunched() {
        let (mut aux, log) = handle(FakeLauncher::graceful());
        aux.launch().unwrap();
        log.borrow()[0].borrow_mut().alive = false;
        assert_eq!(aux.state(), AuxState::Stopped);
        aux.launch().unwrap();
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn launch_failure_keeps_state() {
        let (mut aux, _) = handle(FakeLauncher {
            fail: true,
            ..FakeLauncher::default()
        });
        assert!(matches!(aux.launch(), Err(ShellError::AuxiliaryLaunch(_))));
        assert_eq!(aux.state(), AuxState::NotStarted);
    }

    #[cfg(unix)]
    #[test]
    fn real_process_terminates_gracefully() {
        let config = AuxiliaryConfig {
            command: "sleep".to_string(),
            args: vec!["30".to_string()],
            grace_ms: 2000,
            kill_wait_ms: 1000,
            poll_ms: 10,
            ..AuxiliaryConfig::default()
        };
        let mut aux = AuxiliaryHandle::new(config, Box::new(ProcessLauncher));
        aux.launch().unwrap();
        assert!(aux.is_running());
        assert_eq!(aux.shutdown(), StopOutcome::Graceful);
        assert!(!aux.is_running());
    }
}
