//! JSON output adapter.

use anyhow::Result;
use ocular_qa_core::{ReportOutput, RunReport};
use std::io::{self, Write};
use std::sync::Mutex;

/// JSON output adapter.
///
/// Writes one report per line, or buffers reports and writes a single JSON
/// array on flush.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    array: Option<Mutex<Vec<RunReport>>>,
    pretty: bool,
}

impl JsonOutput {
    /// Creates a JSON Lines output writing to stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Box::new(io::stdout()))
    }

    /// Creates a JSON array output writing to stdout.
    #[must_use]
    pub fn stdout_array(pretty: bool) -> Self {
        Self::array(Box::new(io::stdout()), pretty)
    }

    /// Creates a JSON Lines output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            array: None,
            pretty: false,
        }
    }

    /// Creates a JSON array output writing to the given writer.
    #[must_use]
    pub fn array(writer: Box<dyn Write + Send>, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            array: Some(Mutex::new(Vec::new())),
            pretty,
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_line(&self, json: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ReportOutput for JsonOutput {
    fn write(&self, report: &RunReport) -> Result<()> {
        if let Some(array) = &self.array {
            array
                .lock()
                .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
                .push(report.clone());
            return Ok(());
        }
        self.write_line(&serde_json::to_string(report)?)
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        if let Some(array) = &self.array {
            let reports = std::mem::take(
                &mut *array
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
            );
            let json = if self.pretty {
                serde_json::to_string_pretty(&reports)?
            } else {
                serde_json::to_string(&reports)?
            };
            self.write_line(&json)?;
        }
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use ocular_qa_core::{Assessment, Disposition, OverallQuality};

    use super::*;

    #[derive(Clone, Default)]
    struct Shared(Arc<Mutex<Vec<u8>>>);

    impl Write for Shared {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Shared {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn report(source: &str) -> RunReport {
        RunReport::new(
            Assessment {
                source: source.to_string(),
                timestamp: "2024-03-05T14:07:09Z".to_string(),
                checks: vec![],
                overall: OverallQuality::Bad,
            },
            Disposition::rejected(),
        )
    }

    #[test]
    fn test_lines_written_immediately() {
        let sink = Shared::default();
        let output = JsonOutput::new(Box::new(sink.clone()));

        output.write(&report("a.jpg")).unwrap();
        output.write(&report("b.jpg")).unwrap();

        let text = sink.text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["source"], "a.jpg");
        assert_eq!(parsed["schema_version"], 1);
        assert_eq!(parsed["disposition"]["status"], "rejected");
    }

    #[test]
    fn test_array_written_on_flush() {
        let sink = Shared::default();
        let output = JsonOutput::array(Box::new(sink.clone()), false);

        output.write(&report("a.jpg")).unwrap();
        assert!(sink.text().is_empty());
        output.flush().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&sink.text()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_array() {
        let sink = Shared::default();
        let output = JsonOutput::array(Box::new(sink.clone()), true);
        output.flush().unwrap();
        assert_eq!(sink.text().trim(), "[]");
    }
}
