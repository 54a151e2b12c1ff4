//! Shapes of the side-channel (transient) payloads accepted by the write operations.
//!
//! Transient data never lands on the public transaction record, which is why
//! the sensitive issuance terms travel this way instead of as positional
//! arguments. It is therefore not replayable from the ledger either.

use super::invocation::TransientMap;
use super::loan::{Loan, LoanPrivateInfo, LoanStatus};
use crate::error::{RegistryError, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Transient key carrying a [`LoanIssuance`].
pub const LOAN_KEY: &str = "loan";
/// Transient key carrying a [`StatusChange`].
pub const LOAN_STATUS_KEY: &str = "loan_status";

/// Input of `issueLoan`.
///
/// Absent fields default to empty/zero so that each one is reported by its
/// own validation message rather than as a decode failure.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanIssuance {
    #[serde(rename = "loanUID")]
    pub loan_uid: String,
    pub buyer: String,
    pub notary: String,
    pub start_date: String,
    pub end_date: String,
    pub loan_value: i64,
    pub currency: String,
    pub interest_rate: f64,
}

impl LoanIssuance {
    pub fn from_transient(transient: &TransientMap) -> Result<Self> {
        decode_transient(transient, LOAN_KEY)
    }

    /// Checks every field, reporting the first violation found.
    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.loan_uid, "The loan UID is a required field")?;
        require_non_empty(&self.buyer, "The buyer name is a required field")?;
        require_non_empty(&self.notary, "The notary name is a required field")?;
        require_non_empty(&self.start_date, "The start date is a required field")?;
        require_non_empty(&self.end_date, "The end date is a required field")?;
        if self.loan_value == 0 {
            return Err(invalid("The loan value is a required field"));
        }
        require_non_empty(&self.currency, "The currency is a required field")?;
        if self.interest_rate == 0.0 {
            return Err(invalid("The interest rate is a required field"));
        }
        if self.loan_value < 0 {
            return Err(invalid("The loan value must be positive"));
        }
        Ok(())
    }

    /// Builds the two records written at issuance. The loan starts `issued`.
    pub fn into_records(self, issuer: String) -> (Loan, LoanPrivateInfo) {
        let private = LoanPrivateInfo {
            loan_uid: self.loan_uid.clone(),
            loan_value: self.loan_value,
            currency: self.currency,
            interest_rate: self.interest_rate,
        };
        let loan = Loan {
            loan_uid: self.loan_uid,
            issuer,
            buyer: self.buyer,
            notary: self.notary,
            status: LoanStatus::Issued,
            start_date: self.start_date,
            end_date: self.end_date,
        };
        (loan, private)
    }
}

/// Input of `changeLoanStatus`. `status` stays a raw string until the
/// transition table has had a chance to reject it with its own message.
#[derive(Debug, Deserialize, PartialEq, Clone, Default)]
#[serde(default)]
pub struct StatusChange {
    #[serde(rename = "loanUID")]
    pub loan_uid: String,
    pub status: String,
}

impl StatusChange {
    pub fn from_transient(transient: &TransientMap) -> Result<Self> {
        decode_transient(transient, LOAN_STATUS_KEY)
    }

    pub fn validate(&self) -> Result<()> {
        require_non_empty(&self.loan_uid, "loan UID field must be a non-empty string")?;
        require_non_empty(&self.status, "loan status field must be a non-empty string")
    }
}

/// Fails if positional arguments were supplied to an operation that takes
/// all of its data from the transient map.
pub fn require_no_args(args: &[String]) -> Result<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(invalid(
            "Incorrect number of arguments. Private loan data must be passed in transient map.",
        ))
    }
}

fn decode_transient<T: DeserializeOwned>(transient: &TransientMap, key: &str) -> Result<T> {
    let raw = transient
        .get(key)
        .ok_or_else(|| invalid(&format!("{} must be a key in the transient map", key)))?;
    if raw.is_empty() {
        return Err(invalid(&format!(
            "{} value in the transient map must be a non-empty JSON string",
            key
        )));
    }
    serde_json::from_slice(raw).map_err(|_| {
        invalid(&format!(
            "Failed to decode JSON of: {}",
            String::from_utf8_lossy(raw)
        ))
    })
}

fn require_non_empty(value: &str, message: &str) -> Result<()> {
    if value.is_empty() {
        Err(invalid(message))
    } else {
        Ok(())
    }
}

fn invalid(message: &str) -> RegistryError {
    RegistryError::ValidationError(message.to_string())
}
