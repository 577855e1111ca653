//! Terminal pane backend: PTY process, screen model and key encoding.

pub mod keys;
pub mod pty;
pub mod screen;

pub use keys::{TermKey, encode_key};
pub use pty::{PtyEvent, PtyHandle};
pub use screen::{Rendered, Screen};

use crate::app::infrastructure::error::Result;

/// A running shell the terminal pane talks to.
pub trait ShellProcess {
    fn write(&mut self, bytes: &[u8]) -> Result<()>;
    fn resize(&mut self, rows: u16, cols: u16) -> Result<()>;
    fn kill(&mut self);
}
