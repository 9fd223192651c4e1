#![forbid(unsafe_code)]

//! Line-editing state machine.
//!
//! Turns a stream of console bytes into completed chunks while producing the
//! echo bytes that keep the visible line in sync with the in-flight buffer.
//!
//! # Design
//!
//! The editor is a per-byte state machine over four pieces of state:
//!
//! - `output` — the chunk being assembled. While an escape sequence is in
//!   progress, `output` holds the escape bytes instead (it then starts with
//!   ESC, which is also the dispatch predicate).
//! - `preescape` — the line contents saved at the moment an escape sequence
//!   began. Empty when no line preceded the escape.
//! - `last` — single-entry history. Only lines whose first byte is printable
//!   are retained.
//! - `linepos` — cursor offset into the logical line; `None` means the cursor
//!   is at the end and bytes append.
//!
//! The editor never performs I/O. Each byte fed in appends echo bytes and
//! zero or more completed chunks to a [`Step`]; the processing loop writes
//! the echo before delivering the chunks so that a full chunk queue can never
//! hold back the visible line.

use std::iter;
use std::mem;

use crate::codes;

/// CSI final bytes occupy `@` through `~`.
const FINAL_BYTES: std::ops::RangeInclusive<u8> = 0x40..=0x7E;

/// Echo bytes and completed chunks produced by feeding the editor.
#[derive(Debug, Default)]
pub(crate) struct Step {
    /// Bytes to write to the echo sink, in order.
    pub echo: Vec<u8>,
    /// Completed chunks, in emission order.
    pub chunks: Vec<Vec<u8>>,
}

impl Step {
    /// Reset both buffers; chunk capacity is retained across bytes.
    pub fn clear(&mut self) {
        self.echo.clear();
        self.chunks.clear();
    }
}

/// In-place line editor with single-entry history.
#[derive(Debug)]
pub(crate) struct LineEditor {
    output: Vec<u8>,
    preescape: Vec<u8>,
    last: Vec<u8>,
    linepos: Option<usize>,
    bsize: usize,
}

impl LineEditor {
    pub fn new(bsize: usize) -> Self {
        Self {
            output: Vec::with_capacity(bsize),
            preescape: Vec::new(),
            last: Vec::new(),
            linepos: None,
            bsize,
        }
    }

    /// Change the capacity hint used for fresh chunk buffers.
    pub fn set_buffer_size(&mut self, bsize: usize) {
        self.bsize = bsize;
    }

    /// Process one console byte.
    pub fn feed(&mut self, ch: u8, step: &mut Step) {
        if self.output.first() == Some(&codes::ESC) {
            self.escape_byte(ch, step);
        } else {
            self.plain_byte(ch, step);
        }
    }

    /// Flush the pending chunk, if any. Called when the console closes.
    pub fn flush(&mut self, step: &mut Step) {
        self.emit(step);
    }

    /// Process a byte outside of an escape sequence.
    ///
    /// ESC stashes the current line and opens an escape sequence. CR and LF
    /// terminate the line: the line chunk is emitted (and remembered, if it
    /// starts with a printable byte) followed by the terminator as its own
    /// chunk. The remaining low control bytes likewise emit the pending line
    /// and then themselves, so `^C` and `^D` are trivially recognizable.
    /// Backspace and DEL erase; everything else is inserted at the cursor.
    fn plain_byte(&mut self, ch: u8, step: &mut Step) {
        match ch {
            codes::ESC => {
                if !self.output.is_empty() {
                    self.preescape = mem::replace(&mut self.output, Vec::with_capacity(8));
                }
                self.output.push(codes::ESC);
            }
            codes::CR | codes::LF => {
                step.echo.extend_from_slice(b"\r\n");
                self.push_history();
                self.emit(step);
                step.chunks.push(vec![ch]);
            }
            codes::SOH..=codes::BEL
            | codes::VT
            | codes::FF
            | codes::SO..=codes::SUB
            | codes::FS..=codes::US => {
                self.emit(step);
                step.chunks.push(vec![ch]);
            }
            codes::BS | codes::DEL => {
                if self.output.is_empty() || self.linepos == Some(0) {
                    return;
                }
                if let Some(pos) = self.linepos {
                    // Shift the tail left on screen, blank the vacated cell,
                    // and step back over the re-rendered tail.
                    let delta = self.output.len() - pos;
                    step.echo.push(codes::BS);
                    step.echo.extend_from_slice(&self.output[pos..]);
                    step.echo.push(b' ');
                    step.echo.extend(iter::repeat_n(codes::BS, delta + 1));
                    self.output.remove(pos - 1);
                    self.linepos = Some(pos - 1);
                } else {
                    step.echo.extend_from_slice(&[codes::BS, b' ', codes::BS]);
                    self.output.pop();
                }
            }
            _ => {
                if let Some(pos) = self.linepos {
                    // Insert: render the new byte plus the shifted tail, then
                    // step back to just past the insertion point.
                    let delta = self.output.len() - pos;
                    step.echo.push(ch);
                    step.echo.extend_from_slice(&self.output[pos..]);
                    step.echo.extend(iter::repeat_n(codes::BS, delta));
                    self.output.insert(pos, ch);
                    self.linepos = Some(pos + 1);
                } else {
                    step.echo.push(ch);
                    self.output.push(ch);
                }
            }
        }
    }

    /// Process a byte while an escape sequence is in progress.
    ///
    /// A sequence that does not continue with `[` is aborted: the buffered
    /// ESC is echoed, the saved line is restored, and the byte is
    /// re-dispatched as plain input. Otherwise bytes accumulate until a final
    /// byte (`@`..`~`) resolves the sequence. Known finals are consumed
    /// invisibly; unknown ones are retained verbatim in the line.
    fn escape_byte(&mut self, ch: u8, step: &mut Step) {
        if self.output.len() == 1 {
            if ch == b'[' {
                self.output.push(ch);
            } else {
                step.echo.push(codes::ESC);
                self.restore_with_sequence();
                self.plain_byte(ch, step);
            }
            return;
        }

        self.output.push(ch);
        if !FINAL_BYTES.contains(&ch) {
            return;
        }

        match ch {
            b'A' => {
                self.history_prev(step);
                return;
            }
            b'B' => {
                // To end of line.
                if let Some(pos) = self.linepos.take() {
                    step.echo.extend_from_slice(&self.preescape[pos..]);
                }
            }
            b'C' => {
                // Right one cell. The terminal moves the cursor itself, so
                // the sequence is echoed through as-is.
                if !self.preescape.is_empty()
                    && let Some(pos) = self.linepos
                {
                    step.echo.extend_from_slice(&self.output);
                    let pos = pos + 1;
                    self.linepos = if pos == self.preescape.len() {
                        None
                    } else {
                        Some(pos)
                    };
                }
            }
            b'D' => {
                // Left one cell, saturating at the start of the line.
                if !self.preescape.is_empty() {
                    let pos = self.linepos.unwrap_or(self.preescape.len());
                    self.linepos = if pos > 0 {
                        step.echo.extend_from_slice(&self.output);
                        Some(pos - 1)
                    } else {
                        Some(pos)
                    };
                }
            }
            b'~' => {} // PageUp/PageDown family: consumed, no effect.
            _ => {
                // Unknown sequence: keep it in the line verbatim, unechoed.
                self.restore_with_sequence();
                return;
            }
        }

        // The sequence was recognized; it vanishes from the logical line.
        self.output = mem::take(&mut self.preescape);
    }

    /// Replace the current line with the remembered one.
    ///
    /// With no history this quietly cancels the escape and restores the
    /// saved line. Otherwise the echo backs the cursor up to the start of
    /// the line, renders the recalled line, and blanks whatever tail of the
    /// old line would otherwise be left dangling on screen.
    fn history_prev(&mut self, step: &mut Step) {
        if self.last.is_empty() {
            self.output = mem::take(&mut self.preescape);
            return;
        }

        let width = self.preescape.len();
        self.preescape.clear();
        let home = self.linepos.take().unwrap_or(width);

        self.output.clear();
        self.output.extend_from_slice(&self.last);

        step.echo.extend(iter::repeat_n(codes::BS, home));
        step.echo.extend_from_slice(&self.output);
        if width > self.output.len() {
            let delta = width - self.output.len();
            step.echo.extend(iter::repeat_n(b' ', delta));
            step.echo.extend(iter::repeat_n(codes::BS, delta));
        }
    }

    /// Remember the current line, unless it is empty or control-prefixed.
    fn push_history(&mut self) {
        match self.output.first() {
            Some(&b) if b >= 0x20 => {
                self.last.clear();
                self.last.extend_from_slice(&self.output);
            }
            _ => {}
        }
    }

    /// Merge any saved pre-escape line back in front of the escape bytes
    /// accumulated in `output`, leaving the escape machinery disengaged.
    fn restore_with_sequence(&mut self) {
        let mut merged = mem::take(&mut self.preescape);
        merged.append(&mut self.output);
        self.output = merged;
    }

    /// Emit the pending chunk, if any, and reset the line state.
    fn emit(&mut self, step: &mut Step) {
        if !self.preescape.is_empty() {
            self.restore_with_sequence();
        }
        if !self.output.is_empty() {
            let chunk = mem::replace(&mut self.output, Vec::with_capacity(self.bsize));
            step.chunks.push(chunk);
            self.linepos = None;
        }
    }
}
