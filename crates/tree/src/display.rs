// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-place terminal redraw

use parking_lot::Mutex;
use std::io::{IsTerminal, Write};

/// Redraws rendered tree text over itself on a TTY.
///
/// Tracks how many lines the previous frame emitted; each redraw moves the
/// cursor up by that count, clears to end of display, and re-emits. When
/// the target is not a terminal (or live mode is off), redraws are
/// suppressed and only [`Display::finish`] writes a final static render.
pub struct Display {
    inner: Mutex<Inner>,
    live: bool,
}

struct Inner {
    writer: Box<dyn Write + Send>,
    frame_lines: usize,
}

impl Display {
    /// Display over stdout. Live redraw requires a terminal and no
    /// `final_only` override.
    pub fn stdout(final_only: bool) -> Self {
        let live = !final_only && std::io::stdout().is_terminal();
        Self::new(Box::new(std::io::stdout()), live)
    }

    pub fn new(writer: Box<dyn Write + Send>, live: bool) -> Self {
        Self {
            inner: Mutex::new(Inner {
                writer,
                frame_lines: 0,
            }),
            live,
        }
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Redraw the current frame in place. No-op when not live.
    pub fn redraw(&self, frame: &str) {
        if !self.live {
            return;
        }
        let mut inner = self.inner.lock();
        inner.draw(frame);
    }

    /// Emit the final frame. Live displays overwrite their last frame;
    /// static displays write their only output here.
    pub fn finish(&self, frame: &str) {
        let mut inner = self.inner.lock();
        if self.live {
            inner.draw(frame);
        } else {
            let _ = inner.writer.write_all(frame.as_bytes());
            let _ = inner.writer.flush();
        }
    }
}

impl Inner {
    fn draw(&mut self, frame: &str) {
        if self.frame_lines > 0 {
            let _ = write!(self.writer, "\r\x1b[{}A\x1b[J", self.frame_lines);
        }
        let _ = self.writer.write_all(frame.as_bytes());
        let _ = self.writer.flush();
        self.frame_lines = frame.bytes().filter(|&b| b == b'\n').count();
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
