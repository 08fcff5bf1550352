//! JSON output format.

use std::io::Write;

use crate::{CandleRecord, FormatError, Formatter};

/// JSON formatter writing either one array or one object per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    lines: bool,
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a formatter that writes a single JSON array.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: false,
            pretty: false,
        }
    }

    /// Creates a formatter that writes one record per line (NDJSON).
    #[must_use]
    pub const fn ndjson() -> Self {
        Self {
            lines: true,
            pretty: false,
        }
    }

    /// Indents the array output. Ignored for NDJSON.
    #[must_use]
    pub const fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Formatter for JsonFormatter {
    fn write_candles<W: Write + Send>(
        &self,
        candles: &[CandleRecord],
        mut writer: W,
    ) -> Result<(), FormatError> {
        if self.lines {
            for candle in candles {
                serde_json::to_writer(&mut writer, candle)?;
                writeln!(writer)?;
            }
            return Ok(());
        }

        if self.pretty {
            serde_json::to_writer_pretty(&mut writer, candles)?;
        } else {
            serde_json::to_writer(&mut writer, candles)?;
        }
        writeln!(writer)?;
        Ok(())
    }
}
