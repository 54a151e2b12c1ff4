use std::collections::HashMap;

/// Side-channel payload of an invocation: key to raw bytes.
pub type TransientMap = HashMap<String, Vec<u8>>;

/// Status codes of the platform response envelope.
pub const OK: u16 = 200;
pub const ERROR: u16 = 500;

/// A single call into the contract, as handed over by the platform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Invocation {
    pub function: String,
    /// Positional arguments; these are recorded on the public ledger.
    pub args: Vec<String>,
    /// Transient data; never recorded on the ledger.
    pub transient: TransientMap,
    /// MSP identifier the platform verified for the caller.
    pub creator_msp_id: Option<String>,
}

impl Invocation {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Default::default()
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_transient(mut self, key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.transient.insert(key.into(), value.into());
        self
    }

    pub fn as_creator(mut self, msp_id: impl Into<String>) -> Self {
        self.creator_msp_id = Some(msp_id.into());
        self
    }
}

/// Response envelope returned to the platform.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success { payload: Vec<u8> },
    Error { message: String },
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Response::Success { payload }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Response::Success { .. } => OK,
            Response::Error { .. } => ERROR,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Response::Success { .. })
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Response::Success { payload } => payload,
            Response::Error { .. } => &[],
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Response::Success { .. } => "",
            Response::Error { message } => message,
        }
    }
}
