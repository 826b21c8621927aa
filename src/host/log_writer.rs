// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! `io::Write` adapter that turns command output into log lines

use std::io::{self, Write};
use tracing::info;

/// Buffers written bytes and emits each complete line through `tracing`.
/// A trailing partial line is emitted on flush or drop.
#[derive(Debug, Default)]
pub struct LogWriter {
    pending: Vec<u8>,
    #[cfg(test)]
    lines_emitted: usize,
}

impl LogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn lines_emitted(&self) -> usize {
        self.lines_emitted
    }

    fn emit(&mut self, line: &[u8]) {
        let line = String::from_utf8_lossy(line);
        let line = line.trim_end_matches('\r');
        info!(target: "clusterboot::command", "{}", line);
        #[cfg(test)]
        {
            self.lines_emitted += 1;
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);

        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line[..line.len() - 1]);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
