use crate::domain::merged::MergedTransaction;
use crate::error::Result;
use std::io::{self, Write};

/// Writes merged transaction views as JSON lines.
pub struct MergedViewWriter<W: Write> {
    writer: W,
}

impl<W: Write> MergedViewWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn write(&mut self, view: &MergedTransaction) -> Result<()> {
        serde_json::to_writer(&mut self.writer, view).map_err(io::Error::from)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_all<'a>(
        &mut self,
        views: impl IntoIterator<Item = &'a MergedTransaction>,
    ) -> Result<()> {
        for view in views {
            self.write(view)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
