#![forbid(unsafe_code)]

//! Interactive demo for the termline engine.
//!
//! The default mode is a small read-eval-print loop: type a line, press
//! return, and the demo reports what it read. Try pressing the up arrow on
//! the next line, editing the recalled text with the arrow keys, and
//! submitting it again. `--frame` draws a bordered region sized to the
//! window instead, redrawing whenever the window changes.

mod cli;

#[cfg(unix)]
fn main() {
    use termline::RawModeGuard;

    let opts = cli::Opts::parse();

    if opts.log {
        use tracing_subscriber::EnvFilter;
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let guard = match RawModeGuard::enter() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("failed to enter raw mode: {err}");
            std::process::exit(1);
        }
    };

    let result = if opts.frame {
        unix::frame_demo(&guard)
    } else {
        unix::line_demo()
    };

    // Restore the terminal before reporting anything.
    drop(guard);
    if let Err(err) = result {
        eprintln!("demo failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(unix))]
fn main() {
    eprintln!("termline-demo drives a Unix terminal and has no Windows port");
    std::process::exit(1);
}

#[cfg(unix)]
mod unix {
    use std::io::{self, Read, Write};

    use signal_hook::consts::signal::SIGWINCH;
    use signal_hook::iterator::Signals;
    use termline::raw_mode::{self, RawModeGuard};
    use termline::{BorderSet, Tty, codes};

    pub fn line_demo() -> io::Result<()> {
        let mut tty = Tty::line(io::stdin(), io::stdout());

        write!(tty, "> ")?;

        let mut buf = [0u8; 128];
        let mut line = Vec::new();
        loop {
            let n = tty.read(&mut buf)?;
            if n == 0 {
                return Ok(());
            }

            let chunk = &buf[..n];
            if chunk == b"quit" || chunk == codes::INTERRUPT || chunk == codes::END_OF_FILE {
                write!(tty, "Goodbye!\r\n")?;
                return Ok(());
            } else if chunk == codes::CARRIAGE_RETURN || chunk == codes::NEW_LINE {
                write!(tty, "read: {:?}\r\n> ", String::from_utf8_lossy(&line))?;
                line.clear();
            } else {
                line.extend_from_slice(chunk);
            }
        }
    }

    pub fn frame_demo(guard: &RawModeGuard) -> io::Result<()> {
        let (mut tty, mut region) = Tty::frame(io::stdin(), io::stdout());
        tty.clear();
        region.set_border(BorderSet::ASCII);

        if let Ok((cols, rows)) = guard.size()
            && cols > 0
            && rows > 0
        {
            region.set_size(cols, rows);
        }
        region.draw();

        // Track window-size changes from a dedicated signal thread; the
        // region redraws itself with the fresh dimensions.
        let mut signals = Signals::new([SIGWINCH]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let resize = std::thread::spawn(move || {
            for _ in signals.forever() {
                if let Ok((cols, rows)) = raw_mode::window_size()
                    && cols > 0
                    && rows > 0
                {
                    region.set_size(cols, rows);
                    region.draw();
                }
            }
        });

        let mut buf = [0u8; 128];
        loop {
            let n = tty.read(&mut buf)?;
            if n == 0 {
                break;
            }

            let chunk = &buf[..n];
            if chunk == b"quit" || chunk == codes::INTERRUPT || chunk == codes::END_OF_FILE {
                tty.clear();
                tty.set_cursor(0, 0);
                write!(tty, "Goodbye!\r\n")?;
                break;
            }
        }

        handle.close();
        let _ = resize.join();
        Ok(())
    }
}
