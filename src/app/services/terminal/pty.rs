use std::io::{Read, Write};
use std::path::Path;
use std::thread;

use portable_pty::{Child, ChildKiller, CommandBuilder, MasterPty, PtySize, native_pty_system};
use tracing::{debug, info, warn};

use crate::app::infrastructure::error::{AppError, Result};

use super::ShellProcess;

/// Events from the PTY reader thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PtyEvent {
    Output(Vec<u8>),
    Exited,
}

/// A shell running on a pseudo-terminal.
///
/// Output is read on a background thread and handed to `on_event`;
/// writes and resizes happen on the caller's thread.
pub struct PtyHandle {
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    child: Box<dyn Child + Send + Sync>,
}

fn pty_size(rows: u16, cols: u16) -> PtySize {
    PtySize {
        rows,
        cols,
        pixel_width: 0,
        pixel_height: 0,
    }
}

impl PtyHandle {
    pub fn spawn<F>(shell: &str, cwd: Option<&Path>, rows: u16, cols: u16, on_event: F) -> Result<Self>
    where
        F: Fn(PtyEvent) + Send + 'static,
    {
        let pair = native_pty_system()
            .openpty(pty_size(rows, cols))
            .map_err(AppError::terminal)?;

        let mut cmd = CommandBuilder::new(shell);
        cmd.env("TERM", "xterm-256color");
        if let Some(dir) = cwd {
            cmd.cwd(dir);
        }

        let child = pair.slave.spawn_command(cmd).map_err(AppError::terminal)?;
        // The slave end belongs to the child now
        drop(pair.slave);

        let master = pair.master;
        let writer = master.take_writer().map_err(AppError::terminal)?;
        let mut reader = master.try_clone_reader().map_err(AppError::terminal)?;

        info!(shell, pid = ?child.process_id(), "spawned terminal shell");

        thread::Builder::new()
            .name("pty-reader".into())
            .spawn(move || {
                let mut buf = [0u8; 4096];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => on_event(PtyEvent::Output(buf[..n].to_vec())),
                        Err(e) => {
                            debug!("pty read ended: {e}");
                            break;
                        }
                    }
                }
                on_event(PtyEvent::Exited);
            })
            .map_err(AppError::from)?;

        Ok(Self { master, writer, child })
    }
}

impl ShellProcess for PtyHandle {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()?;
        Ok(())
    }

    fn resize(&mut self, rows: u16, cols: u16) -> Result<()> {
        self.master
            .resize(pty_size(rows, cols))
            .map_err(AppError::terminal)
    }

    fn kill(&mut self) {
        if let Ok(Some(status)) = self.child.try_wait() {
            debug!(?status, "shell already exited");
            return;
        }
        if let Err(e) = self.child.kill() {
            warn!("failed to kill terminal shell: {e}");
        }
        let _ = self.child.wait();
    }
}
