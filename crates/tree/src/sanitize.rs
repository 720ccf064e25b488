// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Captured-output sanitization
//!
//! Child processes write progress bars, carriage returns, and cursor
//! movement. Splicing that raw into the tree would corrupt the in-place
//! redraw, so captured output replays against a small virtual line buffer:
//! `\r` returns to column zero, `ESC[A`/`ESC[B` move between lines,
//! `ESC[K`/`ESC[J` erase, and every other control sequence is dropped.
//! Color SGR (`ESC[...m`) survives as zero-width text so the final lines
//! keep their colors.

struct Cell {
    /// SGR sequences that precede this cell's character.
    prefix: String,
    ch: char,
}

struct Screen {
    lines: Vec<Vec<Cell>>,
    row: usize,
    col: usize,
    pending_sgr: String,
}

impl Screen {
    fn new() -> Self {
        Self {
            lines: vec![Vec::new()],
            row: 0,
            col: 0,
            pending_sgr: String::new(),
        }
    }

    fn put(&mut self, ch: char) {
        let prefix = std::mem::take(&mut self.pending_sgr);
        let line = &mut self.lines[self.row];
        while line.len() < self.col {
            line.push(Cell {
                prefix: String::new(),
                ch: ' ',
            });
        }
        let cell = Cell { prefix, ch };
        if self.col < line.len() {
            line[self.col] = cell;
        } else {
            line.push(cell);
        }
        self.col += 1;
    }

    fn newline(&mut self) {
        self.flush_sgr();
        self.row += 1;
        self.col = 0;
        if self.row == self.lines.len() {
            self.lines.push(Vec::new());
        }
    }

    fn cursor_up(&mut self, n: usize) {
        self.row = self.row.saturating_sub(n.max(1));
    }

    fn cursor_down(&mut self, n: usize) {
        for _ in 0..n.max(1) {
            if self.row + 1 == self.lines.len() {
                self.lines.push(Vec::new());
            }
            self.row += 1;
        }
    }

    fn erase_line(&mut self) {
        self.lines[self.row].truncate(self.col);
    }

    fn erase_below(&mut self) {
        self.erase_line();
        self.lines.truncate(self.row + 1);
    }

    /// Attach trailing SGR (usually a reset) to the current line so colors
    /// do not leak into the tree.
    fn flush_sgr(&mut self) {
        if self.pending_sgr.is_empty() {
            return;
        }
        let prefix = std::mem::take(&mut self.pending_sgr);
        self.lines[self.row].push(Cell { prefix, ch: '\0' });
    }

    fn into_lines(mut self) -> Vec<String> {
        self.flush_sgr();
        let mut out: Vec<String> = self
            .lines
            .into_iter()
            .map(|cells| {
                let mut line = String::new();
                for cell in cells {
                    line.push_str(&cell.prefix);
                    if cell.ch != '\0' {
                        line.push(cell.ch);
                    }
                }
                line.trim_end().to_string()
            })
            .collect();
        while out.last().is_some_and(|l| l.is_empty()) {
            out.pop();
        }
        out
    }
}

/// Replay `input` against a virtual line buffer, returning the lines a
/// terminal would finally show. Only color SGR survives as escape text.
pub fn sanitize_output(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut screen = Screen::new();
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\n' => {
                screen.newline();
                i += 1;
            }
            '\r' => {
                screen.col = 0;
                i += 1;
            }
            '\t' => {
                screen.put(' ');
                i += 1;
            }
            '\x1b' => {
                i = consume_escape(&chars, i, &mut screen);
            }
            c if c.is_control() => {
                i += 1;
            }
            c => {
                screen.put(c);
                i += 1;
            }
        }
    }

    screen.into_lines()
}

/// Consume one escape sequence starting at `start` (pointing at ESC) and
/// apply its effect. Returns the index just past the sequence.
fn consume_escape(chars: &[char], start: usize, screen: &mut Screen) -> usize {
    let mut i = start + 1;
    match chars.get(i) {
        Some('[') => {
            i += 1;
            let params_start = i;
            while i < chars.len() && !chars[i].is_ascii_alphabetic() {
                i += 1;
            }
            let Some(&letter) = chars.get(i) else {
                return chars.len();
            };
            let params: String = chars[params_start..i].iter().collect();
            let count = params.parse::<usize>().unwrap_or(1);
            match letter {
                'm' => {
                    let seq: String = chars[start..=i].iter().collect();
                    screen.pending_sgr.push_str(&seq);
                }
                'A' => screen.cursor_up(count),
                'B' => screen.cursor_down(count),
                'K' => screen.erase_line(),
                'J' => screen.erase_below(),
                'G' => screen.col = count.saturating_sub(1),
                _ => {}
            }
            i + 1
        }
        Some(']') => {
            // OSC: skip to BEL or ESC\
            while i < chars.len() {
                if chars[i] == '\x07' {
                    return i + 1;
                }
                if chars[i] == '\x1b' && chars.get(i + 1) == Some(&'\\') {
                    return i + 2;
                }
                i += 1;
            }
            chars.len()
        }
        Some(_) => i + 1,
        None => i,
    }
}

#[cfg(test)]
#[path = "sanitize_tests.rs"]
mod tests;
