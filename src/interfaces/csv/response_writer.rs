use crate::domain::invocation::Response;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct ResponseRow<'a> {
    seq: usize,
    function: &'a str,
    status: u16,
    message: &'a str,
    payload: String,
}

/// Writes response envelopes as CSV rows: `seq,function,status,message,payload`.
pub struct ResponseWriter<W: Write> {
    writer: ::csv::Writer<W>,
}

impl<W: Write> ResponseWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: ::csv::Writer::from_writer(sink),
        }
    }

    /// Writes one row. The payload is written as (lossy) UTF-8 text, which
    /// covers the JSON records the registry returns.
    pub fn write_response(&mut self, seq: usize, function: &str, response: &Response) -> Result<()> {
        self.writer.serialize(ResponseRow {
            seq,
            function,
            status: response.status(),
            message: response.message(),
            payload: String::from_utf8_lossy(response.payload()).into_owned(),
        })?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
