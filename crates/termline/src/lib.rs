#![forbid(unsafe_code)]

//! Terminal emulation core for interactive read-eval-print front ends.
//!
//! A [`Tty`] wraps a raw console byte stream and turns it into discrete,
//! meaningful chunks — completed lines, lone control bytes, well-formed
//! escape sequences — while echoing the user's edits back so the visible
//! line always matches the internal buffer. It is the minimal machinery for
//! a line-oriented interactive program, without a curses-style dependency.
//!
//! # Line editing
//!
//! The facilities are deliberately basic: type, backspace to the start of
//! the line, and move with the arrow keys:
//!
//! - **Left** / **Right** — move the cursor one cell; typed bytes insert at
//!   the cursor.
//! - **Down** — jump to the end of the line.
//! - **Up** — restore the previously entered line (single-entry history;
//!   pressing return saves the line if it starts with a printable byte).
//!
//! Control bytes such as `^C` and `^D` always arrive as their own chunk, so
//! callers can match them against the [`codes`] constants directly.
//!
//! # Example
//!
//! Read chunks in a loop, treating terminators as line boundaries:
//!
//! ```no_run
//! use std::io::{self, Read};
//!
//! let mut tty = termline::Tty::line(io::stdin(), io::stdout());
//!
//! let mut buf = [0u8; 128];
//! let mut line = Vec::new();
//! loop {
//!     let n = tty.read(&mut buf)?;
//!     if n == 0 {
//!         break;
//!     }
//!     match &buf[..n] {
//!         chunk if chunk == termline::codes::INTERRUPT => break,
//!         chunk if chunk == termline::codes::CARRIAGE_RETURN
//!             || chunk == termline::codes::NEW_LINE =>
//!         {
//!             println!("line: {:?}", String::from_utf8_lossy(&line));
//!             line.clear();
//!         }
//!         chunk => line.extend_from_slice(chunk),
//!     }
//! }
//! # Ok::<(), io::Error>(())
//! ```
//!
//! For the echo to make sense the kernel TTY must be in raw mode; on Unix,
//! [`RawModeGuard`](raw_mode::RawModeGuard) handles the switch and restores
//! the terminal on drop.

pub mod codes;
mod editor;
pub mod frame;
#[cfg(unix)]
pub mod raw_mode;
mod tty;

pub use frame::{BorderSet, Rect, Region};
#[cfg(unix)]
pub use raw_mode::RawModeGuard;
pub use tty::{
    CHUNK_QUEUE_DEPTH, FRAME_BUFFER_SIZE, LINE_BUFFER_SIZE, Mode, RAW_BUFFER_SIZE, Tty,
};
