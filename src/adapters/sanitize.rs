//! Log sanitization for patient data.
//!
//! Error messages can carry a PatientID or a raw blood pressure reading
//! (for example when a reading fails to split). This module redacts those
//! before a formatted log line reaches its sink:
//! - PatientID values
//! - quoted raw readings in parse errors
//! - bare "SYS/DIA" readings
//!
//! Lines longer than [`MAX_SANITIZE_BYTES`] are truncated first.

use regex::Regex;
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum number of bytes sanitized per line.
pub const MAX_SANITIZE_BYTES: usize = 16 * 1024;

static PATTERNS: OnceLock<Vec<Redaction>> = OnceLock::new();

struct Redaction {
    regex: Regex,
    replacement: &'static str,
}

fn patterns() -> &'static [Redaction] {
    PATTERNS.get_or_init(|| {
        [
            (
                r"(?i)\bpatient\s*id\b[\s:=#]*[A-Za-z0-9_-]+",
                "PatientID [REDACTED-ID]",
            ),
            (r#"(?i)\breading\s+"[^"]*""#, "reading [REDACTED-READING]"),
            (r"\b\d{2,3}\s*/\s*\d{2,3}\b", "[REDACTED-BP]"),
        ]
        .into_iter()
        .filter_map(|(pattern, replacement)| match Regex::new(pattern) {
            Ok(regex) => Some(Redaction { regex, replacement }),
            Err(e) => {
                eprintln!("sanitize: invalid pattern {pattern}: {e}");
                None
            }
        })
        .collect()
    })
}

fn truncate_to_char_boundary(input: &str, max_bytes: usize) -> (&str, bool) {
    if input.len() <= max_bytes {
        return (input, false);
    }
    let mut end = max_bytes;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Redact patient identifiers and raw readings from a string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    sanitize_with_limit(input, MAX_SANITIZE_BYTES)
}

fn sanitize_with_limit(input: &str, max_bytes: usize) -> String {
    let (prefix, truncated) = truncate_to_char_boundary(input, max_bytes);
    let mut result = prefix.to_string();
    for redaction in patterns() {
        if redaction.regex.is_match(&result) {
            result = redaction
                .regex
                .replace_all(&result, redaction.replacement)
                .into_owned();
        }
    }
    if truncated {
        result.push_str(" [TRUNCATED]");
    }
    result
}

/// A `tracing_subscriber` writer factory that sanitizes each formatted log
/// line before handing it to the inner writer.
#[derive(Debug, Clone)]
pub struct SanitizingMakeWriter<M> {
    inner: M,
}

impl<M> SanitizingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`SanitizingMakeWriter`].
pub struct SanitizingWriter<W: std::io::Write> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W: std::io::Write> SanitizingWriter<W> {
    fn write_sanitized(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(sanitize(&text).as_bytes())
    }

    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            self.write_sanitized(&line)?;
        }
        Ok(())
    }
}

impl<W: std::io::Write> std::io::Write for SanitizingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        // A formatter that never emits a newline must not grow the buffer forever.
        if self.buffer.len() > MAX_SANITIZE_BYTES * 2 {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
            self.inner.write_all(b"\n")?;
            return Ok(buf.len());
        }

        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let pending = std::mem::take(&mut self.buffer);
            self.write_sanitized(&pending)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for SanitizingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for SanitizingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = SanitizingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        SanitizingWriter {
            inner: self.inner.make_writer(),
            buffer: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_sanitize_patient_id() {
        let sanitized = sanitize("Duplicate PatientID 4711 in dataset");
        assert!(sanitized.contains("[REDACTED-ID]"));
        assert!(!sanitized.contains("4711"));
    }

    #[test]
    fn test_sanitize_blood_pressure_reading() {
        let sanitized = sanitize(r#"reading "11080" has no '/' separator"#);
        assert!(!sanitized.contains("11080"));

        let sanitized = sanitize("systolic peak near 120/80 mmHg");
        assert!(sanitized.contains("[REDACTED-BP]"));
    }

    #[test]
    fn test_plain_text_untouched() {
        let line = "Loaded 500 records from healthmonitoring.csv";
        assert_eq!(sanitize(line), line);
    }

    #[test]
    fn test_truncates_large_inputs() {
        let sanitized = sanitize_with_limit("0123456789abcdef", 4);
        assert_eq!(sanitized, "0123 [TRUNCATED]");
    }

    #[test]
    fn test_writer_sanitizes_per_line() {
        let mut sink = Vec::new();
        {
            let mut writer = SanitizingWriter {
                inner: &mut sink,
                buffer: Vec::new(),
            };
            writer
                .write_all(b"first PatientID=99\nsecond ")
                .expect("Should write");
            writer.write_all(b"line\n").expect("Should write");
        }
        let out = String::from_utf8(sink).expect("Should be utf8");
        assert_eq!(out, "first PatientID [REDACTED-ID]\nsecond line\n");
    }
}
