#![forbid(unsafe_code)]

//! Raw-mode management for the controlling terminal (Unix).
//!
//! The engine itself is agnostic to terminal modes — it reads whatever byte
//! stream it is given. Interactive use, however, needs the kernel TTY out of
//! canonical mode so bytes arrive unbuffered and unechoed; [`RawModeGuard`]
//! does that switch and restores the original state on drop.

use std::fs::File;
use std::io;

use nix::sys::termios::{self, SetArg, Termios};

/// RAII guard over the controlling terminal's raw mode.
///
/// Construction snapshots the current termios settings before switching the
/// terminal into raw mode; dropping the guard puts the snapshot back. A
/// panicking application therefore still leaves the terminal usable, as long
/// as unwinding runs.
///
/// The guard opens `/dev/tty` itself and keeps the descriptor for its whole
/// lifetime.
pub struct RawModeGuard {
    original: Termios,
    tty: File,
}

impl RawModeGuard {
    /// Enter raw mode on the controlling terminal, returning a guard that
    /// restores the previous settings on drop.
    pub fn enter() -> io::Result<Self> {
        let tty = File::open("/dev/tty")?;

        let original = termios::tcgetattr(&tty).map_err(io::Error::other)?;

        let mut raw = original.clone();
        termios::cfmakeraw(&mut raw);
        termios::tcsetattr(&tty, SetArg::TCSAFLUSH, &raw).map_err(io::Error::other)?;

        Ok(Self { original, tty })
    }

    /// Current window size as `(columns, rows)`.
    pub fn size(&self) -> io::Result<(u16, u16)> {
        let ws = rustix::termios::tcgetwinsize(&self.tty).map_err(io::Error::other)?;
        Ok((ws.ws_col, ws.ws_row))
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        // Nothing sensible to do with a restore failure during teardown.
        let _ = termios::tcsetattr(&self.tty, SetArg::TCSAFLUSH, &self.original);
    }
}

/// Current window size of the controlling terminal as `(columns, rows)`,
/// without holding a guard open.
pub fn window_size() -> io::Result<(u16, u16)> {
    let tty = File::open("/dev/tty")?;
    let ws = rustix::termios::tcgetwinsize(&tty).map_err(io::Error::other)?;
    Ok((ws.ws_col, ws.ws_row))
}
