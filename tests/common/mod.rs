#![allow(dead_code)]

use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

pub const BANK: &str = "BankOrgMSP";
pub const NOTARY: &str = "NotaryOrgMSP";
pub const OTHER: &str = "OtherOrgMSP";

pub fn loan_terms(loan_uid: &str, notary: &str) -> Value {
    json!({
        "loanUID": loan_uid,
        "buyer": "b1",
        "notary": notary,
        "startDate": "01/01/2020",
        "endDate": "01/01/2040",
        "loanValue": 300000,
        "currency": "EUR",
        "interestRate": 0.02
    })
}

pub fn issue_loan(creator: &str, terms: Value) -> Value {
    json!({
        "creator": creator,
        "function": "issueLoan",
        "transient": { "loan": terms }
    })
}

pub fn change_status(creator: &str, loan_uid: &str, status: &str) -> Value {
    json!({
        "creator": creator,
        "function": "changeLoanStatus",
        "transient": { "loan_status": { "loanUID": loan_uid, "status": status } }
    })
}

pub fn read_loan(creator: &str, loan_uid: &str, collection: &str) -> Value {
    json!({
        "creator": creator,
        "function": "readLoan",
        "args": [loan_uid, collection]
    })
}

/// Writes one invocation per line into a temporary file.
pub fn invocation_file(invocations: &[Value]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for invocation in invocations {
        writeln!(file, "{}", invocation).unwrap();
    }
    file
}
