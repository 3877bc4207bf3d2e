//! Blank-line spacing printed between stages

use std::io::{self, Write};
use tracing::trace;

/// How stage output is visually separated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// A third of the terminal height, nothing when stdout is not a terminal
    Terminal,
    /// A fixed number of blank lines
    Fixed(u16),
    Disabled,
}

impl Separator {
    /// Number of blank lines this separator emits right now
    pub fn line_count(&self) -> u16 {
        match self {
            Separator::Terminal => terminal_height().map(lines_for_height).unwrap_or(0),
            Separator::Fixed(n) => *n,
            Separator::Disabled => 0,
        }
    }

    pub fn emit<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let count = self.line_count();
        trace!(lines = count, "Emitting stage separator");
        for _ in 0..count {
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

pub fn lines_for_height(height: u16) -> u16 {
    height / 3
}

fn terminal_height() -> Option<u16> {
    if !atty::is(atty::Stream::Stdout) {
        return None;
    }
    crossterm::terminal::size().ok().map(|(_, rows)| rows)
}
