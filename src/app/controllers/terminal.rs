use tracing::{debug, info, warn};

use crate::app::infrastructure::error::{AppError, Result};
use crate::app::services::terminal::{PtyHandle, Screen, ShellProcess};

pub const DEFAULT_ROWS: u16 = 24;
pub const DEFAULT_COLS: u16 = 80;

const EXIT_NOTICE: &[u8] = b"\r\n[process exited]\r\n";

/// Visibility and shell lifecycle for the terminal pane.
///
/// The shell is started the first time the pane is shown and restarted on
/// the next show after it exits.
pub struct TerminalController<S = PtyHandle> {
    screen: Screen,
    shell: Option<S>,
    visible: bool,
    exited: bool,
    rows: u16,
    cols: u16,
}

impl<S: ShellProcess> TerminalController<S> {
    pub fn new(scrollback: usize) -> Self {
        Self {
            screen: Screen::new(DEFAULT_ROWS as usize, DEFAULT_COLS as usize, scrollback),
            shell: None,
            visible: false,
            exited: false,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_running(&self) -> bool {
        self.shell.is_some()
    }

    /// Show or hide the pane. Showing starts a shell with `spawn(rows, cols)`
    /// if none is running; if that fails the pane stays hidden.
    pub fn toggle<F>(&mut self, spawn: F) -> Result<bool>
    where
        F: FnOnce(u16, u16) -> Result<S>,
    {
        if self.visible {
            self.hide();
            return Ok(false);
        }

        if self.shell.is_none() {
            if self.exited {
                self.screen.clear();
                self.exited = false;
            }
            self.shell = Some(spawn(self.rows, self.cols)?);
        }
        self.visible = true;
        Ok(true)
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn on_output(&mut self, bytes: &[u8]) {
        self.screen.process(bytes);
    }

    pub fn on_exit(&mut self) {
        if self.shell.take().is_some() {
            info!("terminal shell exited");
        }
        self.exited = true;
        self.screen.process(EXIT_NOTICE);
    }

    /// Forward keyboard input. Dropped when no shell is running.
    pub fn send_input(&mut self, bytes: &[u8]) -> Result<()> {
        match self.shell.as_mut() {
            Some(shell) => shell.write(bytes),
            None => {
                debug!(len = bytes.len(), "dropping terminal input, no shell");
                Ok(())
            }
        }
    }

    pub fn resize(&mut self, rows: u16, cols: u16) -> Result<()> {
        let (rows, cols) = (rows.max(1), cols.max(1));
        if (rows, cols) == (self.rows, self.cols) {
            return Ok(());
        }
        self.rows = rows;
        self.cols = cols;
        self.screen.resize(rows as usize, cols as usize);
        if let Some(shell) = self.shell.as_mut() {
            shell.resize(rows, cols)?;
        }
        Ok(())
    }

    pub fn shutdown(&mut self) {
        if let Some(mut shell) = self.shell.take() {
            shell.kill();
        }
        self.visible = false;
    }
}

/// Try each shell in turn until one spawns. Returns the last error if none do.
pub fn spawn_first<S, F>(shells: &[String], mut spawn: F) -> Result<S>
where
    F: FnMut(&str) -> Result<S>,
{
    let mut last_err = None;
    for shell in shells {
        match spawn(shell) {
            Ok(process) => return Ok(process),
            Err(e) => {
                warn!(shell, "could not start shell: {e}");
                last_err = Some(e);
            }
        }
    }
    Err(last_err.unwrap_or_else(|| AppError::Terminal("no shell to start".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        written: Vec<u8>,
        sizes: Vec<(u16, u16)>,
        killed: bool,
    }

    struct FakeShell(Rc<RefCell<Log>>);

    impl ShellProcess for FakeShell {
        fn write(&mut self, bytes: &[u8]) -> Result<()> {
            self.0.borrow_mut().written.extend_from_slice(bytes);
            Ok(())
        }

        fn resize(&mut self, rows: u16, cols: u16) -> Result<()> {
            self.0.borrow_mut().sizes.push((rows, cols));
            Ok(())
        }

        fn kill(&mut self) {
            self.0.borrow_mut().killed = true;
        }
    }

    fn spawner(log: &Rc<RefCell<Log>>, count: &Rc<RefCell<usize>>) -> impl FnOnce(u16, u16) -> Result<FakeShell> {
        let log = log.clone();
        let count = count.clone();
        move |rows, cols| {
            assert_eq!((rows, cols), (DEFAULT_ROWS, DEFAULT_COLS));
            *count.borrow_mut() += 1;
            Ok(FakeShell(log))
        }
    }

    #[test]
    fn test_first_show_spawns_once() {
        let log = Rc::new(RefCell::new(Log::default()));
        let spawned = Rc::new(RefCell::new(0));
        let mut term: TerminalController<FakeShell> = TerminalController::new(100);
        assert!(!term.is_visible());

        assert!(term.toggle(spawner(&log, &spawned)).unwrap());
        assert!(!term.toggle(spawner(&log, &spawned)).unwrap());
        assert!(term.toggle(spawner(&log, &spawned)).unwrap());

        assert_eq!(*spawned.borrow(), 1);
        assert!(term.is_running());
    }

    #[test]
    fn test_spawn_failure_keeps_pane_hidden() {
        let mut term: TerminalController<FakeShell> = TerminalController::new(100);
        let err = term
            .toggle(|_, _| Err(AppError::Terminal("no pty".into())))
            .unwrap_err();
        assert!(matches!(err, AppError::Terminal(_)));
        assert!(!term.is_visible());
        assert!(!term.is_running());
    }

    #[test]
    fn test_exit_then_show_respawns_with_clean_screen() {
        let log = Rc::new(RefCell::new(Log::default()));
        let spawned = Rc::new(RefCell::new(0));
        let mut term: TerminalController<FakeShell> = TerminalController::new(100);
        term.toggle(spawner(&log, &spawned)).unwrap();
        term.on_output(b"$ exit\r\n");
        term.on_exit();
        assert!(!term.is_running());
        assert!(term.screen().render().text.contains("[process exited]"));

        term.hide();
        term.toggle(spawner(&log, &spawned)).unwrap();
        assert_eq!(*spawned.borrow(), 2);
        assert!(!term.screen().render().text.contains("[process exited]"));
    }

    #[test]
    fn test_input_reaches_shell() {
        let log = Rc::new(RefCell::new(Log::default()));
        let spawned = Rc::new(RefCell::new(0));
        let mut term: TerminalController<FakeShell> = TerminalController::new(100);

        // No shell yet: input is dropped without error
        term.send_input(b"lost").unwrap();

        term.toggle(spawner(&log, &spawned)).unwrap();
        term.send_input(b"ls\r").unwrap();
        assert_eq!(log.borrow().written, b"ls\r");
    }

    #[test]
    fn test_resize_forwards_only_changes() {
        let log = Rc::new(RefCell::new(Log::default()));
        let spawned = Rc::new(RefCell::new(0));
        let mut term: TerminalController<FakeShell> = TerminalController::new(100);
        term.toggle(spawner(&log, &spawned)).unwrap();

        term.resize(DEFAULT_ROWS, DEFAULT_COLS).unwrap();
        term.resize(10, 40).unwrap();
        term.resize(10, 40).unwrap();
        assert_eq!(log.borrow().sizes, vec![(10, 40)]);
        assert_eq!(term.screen().size(), (10, 40));
    }

    #[test]
    fn test_shutdown_kills_shell() {
        let log = Rc::new(RefCell::new(Log::default()));
        let spawned = Rc::new(RefCell::new(0));
        let mut term: TerminalController<FakeShell> = TerminalController::new(100);
        term.toggle(spawner(&log, &spawned)).unwrap();

        term.shutdown();
        assert!(log.borrow().killed);
        assert!(!term.is_running());
        assert!(!term.is_visible());
    }

    #[test]
    fn test_spawn_first_falls_back_to_next_shell() {
        let shells = vec!["/nonexistent/fish".to_string(), "/bin/sh".to_string()];
        let mut tried = Vec::new();
        let started = spawn_first(&shells, |shell| {
            tried.push(shell.to_string());
            if shell == "/bin/sh" {
                Ok(shell.to_string())
            } else {
                Err(AppError::Terminal(format!("cannot exec {shell}")))
            }
        })
        .unwrap();

        assert_eq!(started, "/bin/sh");
        assert_eq!(tried, shells);
    }

    #[test]
    fn test_spawn_first_returns_last_error() {
        let shells = vec!["/a".to_string(), "/b".to_string()];
        let err = spawn_first::<(), _>(&shells, |shell| Err(AppError::Terminal(shell.to_string())))
            .unwrap_err();
        assert!(matches!(err, AppError::Terminal(ref s) if s == "/b"));

        let err = spawn_first::<(), _>(&[], |_| Ok(())).unwrap_err();
        assert!(matches!(err, AppError::Terminal(_)));
    }
}
