//! Redirectable output sink (spec.md §9): decoded-message text is
//! written through a small trait instead of directly to stdout, so
//! tests and embedders can capture it.

/// Receives one formatted line of decoded output at a time.
pub trait DecodedSink {
    fn write_line(&mut self, line: &str);
}

/// Writes every line to standard output.
#[derive(Debug, Default)]
pub struct StdoutSink;

impl DecodedSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Accumulates every line in memory, newline-joined; used by tests and
/// by the `-s` save-to-file option.
#[derive(Debug, Default)]
pub struct StringSink {
    buf: String,
}

impl StringSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }

    pub fn lines(&self) -> std::str::Lines<'_> {
        self.buf.lines()
    }
}

impl DecodedSink for StringSink {
    fn write_line(&mut self, line: &str) {
        self.buf.push_str(line);
        self.buf.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_sink_joins_with_newlines() {
        let mut sink = StringSink::new();
        sink.write_line("first");
        sink.write_line("second");
        assert_eq!(sink.as_str(), "first\nsecond\n");
        assert_eq!(sink.lines().count(), 2);
    }

    #[test]
    fn string_sink_starts_empty() {
        let sink = StringSink::new();
        assert_eq!(sink.as_str(), "");
    }
}
