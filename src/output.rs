use std::io::{self, Write};

/// Destination for human-readable text: usage, diagnostics, solver
/// progress and cross-validation reports.
pub trait Output {
    fn emit(&self, text: &str);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Output for Silent {
    fn emit(&self, _text: &str) {}
}

/// Writes to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Stdout;

impl Output for Stdout {
    fn emit(&self, text: &str) {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if let Err(err) = handle.write_all(text.as_bytes()).and_then(|_| handle.flush()) {
            log::warn!("failed to write to stdout: {}", err);
        }
    }
}

impl<F: Fn(&str)> Output for F {
    fn emit(&self, text: &str) {
        self(text)
    }
}
