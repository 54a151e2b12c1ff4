use crate::error::{RegistryError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of a mortgage loan.
///
/// Stored as the lowercase literal (`"issued"`, `"active"`, ...) so records
/// stay compatible with data written by earlier versions of the contract.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Issued,
    Active,
    Inactive,
    Cancelled,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Issued,
        LoanStatus::Active,
        LoanStatus::Inactive,
        LoanStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Issued => "issued",
            LoanStatus::Active => "active",
            LoanStatus::Inactive => "inactive",
            LoanStatus::Cancelled => "cancelled",
        }
    }

    /// `cancelled` has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        *self == LoanStatus::Cancelled
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self> {
        LoanStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| RegistryError::ValidationError(format!("Unknown loan status: {}", s)))
    }
}

/// Which organisations may drive a given transition.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AuthorizedActors {
    Notary,
    NotaryOrIssuer,
}

/// One row of the transition table: the status a loan must be in, and who may move it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TransitionRule {
    pub from: LoanStatus,
    pub to: LoanStatus,
    pub actors: AuthorizedActors,
}

/// Looks up the rule for moving a loan into `to`.
///
/// Returns `None` for `issued`, which is only ever entered at issuance.
pub fn transition_rule(to: LoanStatus) -> Option<TransitionRule> {
    let (from, actors) = match to {
        LoanStatus::Issued => return None,
        LoanStatus::Active => (LoanStatus::Issued, AuthorizedActors::Notary),
        LoanStatus::Inactive => (LoanStatus::Active, AuthorizedActors::NotaryOrIssuer),
        LoanStatus::Cancelled => (LoanStatus::Inactive, AuthorizedActors::Notary),
    };
    Some(TransitionRule { from, to, actors })
}

/// Public facts about a mortgage loan, visible to every member of the channel.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(rename = "loanUID")]
    pub loan_uid: String,
    /// Bank that issued the loan.
    pub issuer: String,
    /// Opaque identifier (hash) of the borrower.
    pub buyer: String,
    pub notary: String,
    pub status: LoanStatus,
    pub start_date: String,
    pub end_date: String,
}

impl Loan {
    /// Moves the loan to the status named by `requested`, on behalf of `caller_org`.
    ///
    /// Checks run in a fixed order: the target must be a reachable status,
    /// the loan must currently sit in the rule's source status, and the
    /// caller must be one of the rule's actors. Nothing changes on failure.
    pub fn change_status(&mut self, requested: &str, caller_org: &str) -> Result<()> {
        let rule = requested
            .parse::<LoanStatus>()
            .ok()
            .and_then(transition_rule)
            .ok_or_else(|| {
                RegistryError::ValidationError(format!(
                    "New status must be 'active', 'inactive' or 'cancelled'. New status proposed is: {}",
                    requested
                ))
            })?;

        if self.status != rule.from {
            return Err(RegistryError::ConflictError(format!(
                "Only '{}' loan can be changed to '{}'. New status is: {}, but current status is: {}",
                rule.from, rule.to, rule.to, self.status
            )));
        }

        match rule.actors {
            AuthorizedActors::Notary if caller_org != self.notary => {
                return Err(RegistryError::AuthorizationError(format!(
                    "Only notary can change the status to '{}'. Transaction creator is: {}, but notary is: {}",
                    rule.to, caller_org, self.notary
                )));
            }
            AuthorizedActors::NotaryOrIssuer
                if caller_org != self.notary && caller_org != self.issuer =>
            {
                return Err(RegistryError::AuthorizationError(format!(
                    "Only notary or bank can change the status to '{}'. Transaction creator is: {}, but notary is: {} and bank is: {}",
                    rule.to, caller_org, self.notary, self.issuer
                )));
            }
            _ => {}
        }

        self.status = rule.to;
        Ok(())
    }
}

/// Financial terms of a loan, restricted to the issuing bank and the notary.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct LoanPrivateInfo {
    #[serde(rename = "loanUID")]
    pub loan_uid: String,
    pub loan_value: i64,
    pub currency: String,
    pub interest_rate: f64,
}
