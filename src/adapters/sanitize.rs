//! Log sanitization: PII filtering applied to formatted log output.
//!
//! The primary protection is that patient answers are never passed to logging
//! calls; this writer is a defense-in-depth fallback that redacts common
//! identifier formats (emails, phone numbers, SSNs, UUIDs) before a line
//! reaches the sink.

use std::sync::OnceLock;

use regex::Regex;
use tracing_subscriber::fmt::MakeWriter;

struct PiiPattern {
    regex: Regex,
    replacement: &'static str,
}

static PII_PATTERNS: OnceLock<Vec<PiiPattern>> = OnceLock::new();

fn patterns() -> &'static [PiiPattern] {
    PII_PATTERNS.get_or_init(|| {
        let rules: [(&str, &str); 4] = [
            (
                r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
                "[REDACTED-UUID]",
            ),
            (r"\b\d{3}-\d{2}-\d{4}\b", "[REDACTED-SSN]"),
            (
                r"(?i)\b[a-z0-9][a-z0-9._%+-]*@[a-z0-9][a-z0-9.-]*\.[a-z]{2,}\b",
                "[REDACTED-EMAIL]",
            ),
            (
                r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b",
                "[REDACTED-PHONE]",
            ),
        ];

        rules
            .into_iter()
            .map(|(pattern, replacement)| PiiPattern {
                regex: Regex::new(pattern).expect("valid PII regex"),
                replacement,
            })
            .collect()
    })
}

/// Replace PII patterns in a string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    let mut result = std::borrow::Cow::Borrowed(input);
    for pattern in patterns() {
        if pattern.regex.is_match(&result) {
            result = std::borrow::Cow::Owned(
                pattern
                    .regex
                    .replace_all(&result, pattern.replacement)
                    .into_owned(),
            );
        }
    }
    result.into_owned()
}

/// A `tracing_subscriber` writer wrapper that sanitizes formatted log lines
/// before they are written to the underlying sink.
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

pub struct SanitizingWriter<W> {
    inner: W,
    buffer: Vec<u8>,
}

impl<W> SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn flush_lines(&mut self) -> std::io::Result<()> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let sanitized = sanitize(&String::from_utf8_lossy(&line));
            self.inner.write_all(sanitized.as_bytes())?;
        }
        Ok(())
    }
}

impl<W> std::io::Write for SanitizingWriter<W>
where
    W: std::io::Write,
{
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        self.flush_lines()?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_lines()?;
        if !self.buffer.is_empty() {
            let sanitized = sanitize(&String::from_utf8_lossy(&self.buffer));
            self.inner.write_all(sanitized.as_bytes())?;
            self.buffer.clear();
        }
        self.inner.flush()
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

    #[test]
    fn test_sanitize_uuid() {
        let out = sanitize("request 550e8400-e29b-41d4-a716-446655440000 done");
        assert!(out.contains("[REDACTED-UUID]"));
        assert!(!out.contains("550e8400"));
    }

    #[test]
    fn test_sanitize_ssn() {
        assert!(sanitize("SSN: 123-45-6789").contains("[REDACTED-SSN]"));
    }

    #[test]
    fn test_sanitize_email() {
        let out = sanitize("contact patient@clinic.org today");
        assert!(out.contains("[REDACTED-EMAIL]"));
        assert!(!out.contains("clinic.org"));
    }

    #[test]
    fn test_plain_text_untouched() {
        let input = "ranked 3 groups for request";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_writer_sanitizes_lines() {
        use std::io::Write;

        let mut sink: Vec<u8> = Vec::new();
        {
            let mut writer = SanitizingWriter {
                inner: &mut sink,
                buffer: Vec::new(),
            };
            writer
                .write_all(b"id 550e8400-e29b-41d4-a716-446655440000\npartial")
                .expect("write");
            writer.flush().expect("flush");
        }
        let output = String::from_utf8(sink).expect("utf8");
        assert!(output.contains("[REDACTED-UUID]"));
        assert!(output.ends_with("partial"));
    }
}
