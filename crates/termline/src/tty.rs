#![forbid(unsafe_code)]

//! TTY façade and processing thread.
//!
//! A [`Tty`] owns a dedicated thread that reads the console byte source,
//! drives the line editor, writes echo bytes, and delivers completed chunks
//! through a bounded channel. Consumers pull chunks with [`std::io::Read`];
//! settings changes rendezvous with the thread between console reads so the
//! editing state is never observed mid-dispatch.

use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::editor::{LineEditor, Step};
use crate::frame::Region;

// ── Defaults ─────────────────────────────────────────────────────────────

/// Chunk-queue depth for line- and raw-mode TTYs.
pub const CHUNK_QUEUE_DEPTH: usize = 32;
/// Default line-buffer capacity in Line mode.
pub const LINE_BUFFER_SIZE: usize = 32;
/// Default read-buffer size in Raw mode.
pub const RAW_BUFFER_SIZE: usize = 256;
/// Default line-buffer capacity in Frame mode.
pub const FRAME_BUFFER_SIZE: usize = 8;

/// Input-processing discipline of a [`Tty`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Reads pass through unprocessed, one chunk per console read.
    Raw,
    /// Line editing: chunks are lines, lone control bytes, and unrecognized
    /// escape sequences.
    Line,
    /// Line editing with synchronous chunk delivery, for screen-oriented
    /// applications that must consume every chunk before more input is
    /// processed.
    Frame,
}

// ── Echo slot ────────────────────────────────────────────────────────────

type Sink = Box<dyn Write + Send>;

/// Shared handle on the echo sink.
///
/// The processing thread echoes through it, consumer writes go through it,
/// and regions clone it to draw. The first write error clears the slot:
/// echo is disabled for the rest of the TTY's lifetime and later writes
/// report a broken pipe.
#[derive(Clone)]
pub(crate) struct EchoSlot(Arc<Mutex<Option<Sink>>>);

impl EchoSlot {
    fn new(sink: Option<Sink>) -> Self {
        Self(Arc::new(Mutex::new(sink)))
    }

    fn replace(&self, sink: Option<Sink>) {
        *self.lock() = sink;
    }

    pub(crate) fn is_present(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Sink>> {
        self.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Best-effort echo. Errors disable the sink and are not reported.
    pub(crate) fn echo(&self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        let mut slot = self.lock();
        if let Some(sink) = slot.as_mut()
            && sink.write_all(bytes).is_err()
        {
            tracing::debug!("echo write failed, disabling echo");
            *slot = None;
        }
    }

    /// Consumer-facing write: reports errors, and disables the sink on the
    /// first one so a broken console degrades to silence.
    fn write(&self, buf: &[u8]) -> io::Result<usize> {
        let mut slot = self.lock();
        let Some(sink) = slot.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "echo is disabled",
            ));
        };
        match sink.write(buf) {
            Ok(n) => Ok(n),
            Err(err) => {
                tracing::debug!(error = %err, "console write failed, disabling echo");
                *slot = None;
                Err(err)
            }
        }
    }

    fn flush(&self) -> io::Result<()> {
        let mut slot = self.lock();
        let Some(sink) = slot.as_mut() else {
            return Ok(());
        };
        match sink.flush() {
            Ok(()) => Ok(()),
            Err(err) => {
                *slot = None;
                Err(err)
            }
        }
    }

    /// Place the cursor at `(x, y)`, 0-indexed from the top-left corner.
    pub(crate) fn set_cursor(&self, x: u16, y: u16) {
        let mut seq = Vec::with_capacity(12);
        // Terminals are 1-based on the wire.
        let _ = write!(seq, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1);
        self.echo(&seq);
    }
}

// ── Settings rendezvous ──────────────────────────────────────────────────

enum Update {
    Echo(Option<Sink>),
    BufferSize(usize),
    Mode(Mode),
}

struct UpdateRequest {
    update: Update,
    done: SyncSender<()>,
}

// ── Failure slot ─────────────────────────────────────────────────────────

/// Terminal console error, recorded before the chunk channel closes and
/// re-materialized on every read that finds the channel drained.
type FailureSlot = Arc<Mutex<Option<(io::ErrorKind, String)>>>;

// ── TTY façade ───────────────────────────────────────────────────────────

/// A simple interface for reading edited input from a user over a raw
/// terminal connection.
///
/// Reads return one chunk at a time: a completed line (without its
/// terminator), a lone control byte such as [`codes::INTERRUPT`], or an
/// unrecognized escape sequence carried verbatim inside its line. In
/// [`Mode::Raw`], reads pass through unprocessed. All methods take `&self`
/// borrows through the trait impls on `&Tty`, so a shared reference can be
/// handed to multiple threads; concurrent readers interleave at chunk
/// granularity.
///
/// [`codes::INTERRUPT`]: crate::codes::INTERRUPT
pub struct Tty {
    reader: Mutex<ChunkReader>,
    echo: EchoSlot,
    update: SyncSender<UpdateRequest>,
    failure: FailureSlot,
}

struct ChunkReader {
    chunks: Receiver<Vec<u8>>,
    partial: Vec<u8>,
}

impl Tty {
    /// Create a line-editing TTY reading from `console` and echoing edits
    /// to `screen`.
    pub fn line<R, W>(console: R, screen: W) -> Tty
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        Self::spawn(
            console,
            Some(Box::new(screen)),
            Mode::Line,
            LINE_BUFFER_SIZE,
            CHUNK_QUEUE_DEPTH,
        )
    }

    /// Create a line-editing TTY with no echo, e.g. over a read-only source.
    /// Echo can be attached later with [`Tty::set_echo`].
    pub fn line_readonly<R>(console: R) -> Tty
    where
        R: Read + Send + 'static,
    {
        Self::spawn(console, None, Mode::Line, LINE_BUFFER_SIZE, CHUNK_QUEUE_DEPTH)
    }

    /// Create a TTY without line editing and with a larger read buffer, and
    /// with no echo. Each console read is delivered as one chunk.
    pub fn raw<R>(console: R) -> Tty
    where
        R: Read + Send + 'static,
    {
        Self::spawn(console, None, Mode::Raw, RAW_BUFFER_SIZE, CHUNK_QUEUE_DEPTH)
    }

    /// Create a screen-oriented TTY. Chunk delivery is synchronous: further
    /// input is not processed until the previous chunk has been read.
    ///
    /// The returned [`Region`] is a default 80×24 area at the origin. It has
    /// not been drawn, so its border, size, and position can still be
    /// adjusted first.
    pub fn frame<R, W>(console: R, screen: W) -> (Tty, Region)
    where
        R: Read + Send + 'static,
        W: Write + Send + 'static,
    {
        let tty = Self::spawn(console, Some(Box::new(screen)), Mode::Frame, FRAME_BUFFER_SIZE, 0);
        let region = Region::new(tty.echo.clone(), 80, 24, 0, 0);
        (tty, region)
    }

    fn spawn<R>(console: R, sink: Option<Sink>, mode: Mode, bsize: usize, depth: usize) -> Tty
    where
        R: Read + Send + 'static,
    {
        let (chunk_tx, chunk_rx) = mpsc::sync_channel(depth);
        let (update_tx, update_rx) = mpsc::sync_channel(0);
        let echo = EchoSlot::new(sink);
        let failure: FailureSlot = Arc::new(Mutex::new(None));

        let engine = Engine {
            console,
            echo: echo.clone(),
            chunks: chunk_tx,
            updates: update_rx,
            failure: failure.clone(),
            mode,
            bsize,
            editor: LineEditor::new(bsize),
        };
        thread::spawn(move || engine.run());

        Tty {
            reader: Mutex::new(ChunkReader {
                chunks: chunk_rx,
                partial: Vec::new(),
            }),
            echo,
            update: update_tx,
            failure,
        }
    }

    /// Redirect interactive echo to `screen`. Any echo write error disables
    /// echo for the remainder of the TTY's lifetime.
    pub fn set_echo<W>(&self, screen: W)
    where
        W: Write + Send + 'static,
    {
        self.send_update(Update::Echo(Some(Box::new(screen))));
    }

    /// Disable interactive echo.
    pub fn clear_echo(&self) {
        self.send_update(Update::Echo(None));
    }

    /// Set the initial line-buffer capacity. The buffer grows past this on
    /// long lines regardless; tuning it only reduces reallocation.
    pub fn set_line_buffer(&self, size: usize) {
        self.send_update(Update::BufferSize(size.max(1)));
    }

    /// Switch the input-processing mode.
    ///
    /// Switching suspends the state tracking of the old mode and resumes it
    /// on switching back; a line half-edited before a stretch of [`Mode::Raw`]
    /// is still pending afterwards. Chunk-delivery synchrony is fixed at
    /// construction and does not follow the mode.
    pub fn set_mode(&self, mode: Mode) {
        self.send_update(Update::Mode(mode));
    }

    /// Rendezvous with the processing thread: blocks until the mutation has
    /// been applied between two console reads. A no-op once the thread has
    /// shut down.
    fn send_update(&self, update: Update) {
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        let request = UpdateRequest {
            update,
            done: done_tx,
        };
        if self.update.send(request).is_ok() {
            let _ = done_rx.recv();
        }
    }

    pub(crate) fn echo_slot(&self) -> EchoSlot {
        self.echo.clone()
    }

    fn read_chunk(&self, buf: &mut [u8]) -> io::Result<usize> {
        let mut reader = self.reader.lock().unwrap_or_else(|e| e.into_inner());
        if reader.partial.is_empty() {
            match reader.chunks.recv() {
                Ok(chunk) => reader.partial = chunk,
                // Channel closed: the console is gone. Surface the stored
                // error, or clean end-of-stream.
                Err(_) => return self.stored_failure(),
            }
        }
        let n = buf.len().min(reader.partial.len());
        buf[..n].copy_from_slice(&reader.partial[..n]);
        reader.partial.drain(..n);
        Ok(n)
    }

    fn stored_failure(&self) -> io::Result<usize> {
        match &*self.failure.lock().unwrap_or_else(|e| e.into_inner()) {
            Some((kind, message)) => Err(io::Error::new(*kind, message.clone())),
            None => Ok(0),
        }
    }
}

/// Reads the next chunk. One chunk may span several reads when `buf` is
/// small, but bytes from two chunks are never combined, and the reader lock
/// keeps concurrent readers from splitting a chunk between them.
impl Read for &Tty {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_chunk(buf)
    }
}

impl Read for Tty {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_chunk(buf)
    }
}

/// Writes to the same sink that carries the interactive echo. Once echo is
/// disabled (explicitly, or by an earlier write failure) writes report a
/// broken pipe.
impl Write for &Tty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.echo.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.echo.flush()
    }
}

impl Write for Tty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.echo.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.echo.flush()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::EchoSlot;

    /// An echo slot with no sink attached, for geometry-only tests.
    pub(crate) fn detached_slot() -> EchoSlot {
        EchoSlot::new(None)
    }
}

// ── Processing thread ────────────────────────────────────────────────────

struct Engine<R> {
    console: R,
    echo: EchoSlot,
    chunks: SyncSender<Vec<u8>>,
    updates: Receiver<UpdateRequest>,
    failure: FailureSlot,
    mode: Mode,
    bsize: usize,
    editor: LineEditor,
}

impl<R: Read> Engine<R> {
    fn run(mut self) {
        tracing::debug!(mode = ?self.mode, bsize = self.bsize, "processing thread started");

        let mut buffer = vec![0u8; self.bsize];
        let mut step = Step::default();

        loop {
            self.apply_updates();
            if buffer.len() != self.bsize {
                buffer.resize(self.bsize, 0);
            }

            let n = match self.console.read(&mut buffer) {
                Ok(0) => {
                    tracing::debug!("console closed, shutting down");
                    self.finish(None, &mut step);
                    return;
                }
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    tracing::debug!(error = %err, "console read failed, shutting down");
                    self.finish(Some(err), &mut step);
                    return;
                }
            };

            // Settings changed mid-read still apply to these bytes: the
            // rendezvous sits between reads, never inside the dispatch.
            self.apply_updates();

            match self.mode {
                Mode::Raw => {
                    if self.chunks.send(buffer[..n].to_vec()).is_err() {
                        return;
                    }
                }
                Mode::Line | Mode::Frame => {
                    for &ch in &buffer[..n] {
                        step.clear();
                        self.editor.feed(ch, &mut step);
                        self.echo.echo(&step.echo);
                        for chunk in step.chunks.drain(..) {
                            if self.chunks.send(chunk).is_err() {
                                return;
                            }
                        }
                    }
                }
            }
        }
    }

    fn apply_updates(&mut self) {
        while let Ok(request) = self.updates.try_recv() {
            match request.update {
                Update::Echo(sink) => {
                    tracing::trace!(present = sink.is_some(), "echo sink replaced");
                    self.echo.replace(sink);
                }
                Update::BufferSize(size) => {
                    tracing::trace!(size, "buffer size changed");
                    self.bsize = size;
                    self.editor.set_buffer_size(size);
                }
                Update::Mode(mode) => {
                    tracing::trace!(?mode, "mode changed");
                    self.mode = mode;
                }
            }
            let _ = request.done.send(());
        }
    }

    /// Flush the pending chunk, record the failure, and let the chunk
    /// channel close by dropping its sender.
    fn finish(mut self, error: Option<io::Error>, step: &mut Step) {
        step.clear();
        self.editor.flush(step);
        for chunk in step.chunks.drain(..) {
            if self.chunks.send(chunk).is_err() {
                break;
            }
        }
        if let Some(err) = error {
            let mut slot = self.failure.lock().unwrap_or_else(|e| e.into_inner());
            *slot = Some((err.kind(), err.to_string()));
        }
    }
}
