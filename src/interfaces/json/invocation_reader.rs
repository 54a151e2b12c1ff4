use crate::domain::invocation::{Invocation, TransientMap};
use crate::error::{RegistryError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read};

/// One line of an invocation file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvocationRecord {
    /// MSP identifier of the submitting organisation.
    pub creator: Option<String>,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// JSON strings are taken as raw bytes; other values are re-serialised.
    #[serde(default)]
    pub transient: HashMap<String, Value>,
}

impl TryFrom<InvocationRecord> for Invocation {
    type Error = RegistryError;

    fn try_from(record: InvocationRecord) -> Result<Self> {
        let transient = record
            .transient
            .into_iter()
            .map(|(key, value)| -> Result<(String, Vec<u8>)> {
                let bytes = match value {
                    Value::String(raw) => raw.into_bytes(),
                    other => serde_json::to_vec(&other)?,
                };
                Ok((key, bytes))
            })
            .collect::<Result<TransientMap>>()?;

        Ok(Invocation {
            function: record.function,
            args: record.args,
            transient,
            creator_msp_id: record.creator,
        })
    }
}

/// Reads invocations from a JSON-lines source, one invocation per line.
///
/// Blank lines are skipped. A malformed line yields an error for that line
/// only; reading carries on with the next one.
pub struct InvocationReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> InvocationReader<R> {
    /// Creates a new `InvocationReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Returns an iterator that lazily reads and parses invocations.
    pub fn invocations(self) -> impl Iterator<Item = Result<Invocation>> {
        self.reader
            .lines()
            .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
            .map(|line| {
                let record: InvocationRecord = serde_json::from_str(&line?)?;
                Invocation::try_from(record)
            })
    }
}
