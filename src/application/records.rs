use crate::domain::collection::{Collection, CollectionPolicy};
use crate::domain::loan::{Loan, LoanPrivateInfo};
use crate::domain::ports::{RecordStore, RecordWrite};
use crate::error::{RegistryError, Result};

/// Typed view of the loan collections on behalf of one caller.
///
/// Every access is checked against the collection policy for the caller's
/// MSP identity before it reaches the store.
pub struct LoanRecords<'a> {
    store: &'a dyn RecordStore,
    policy: &'a CollectionPolicy,
    caller_msp_id: Option<&'a str>,
}

impl<'a> LoanRecords<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        policy: &'a CollectionPolicy,
        caller_msp_id: Option<&'a str>,
    ) -> Self {
        Self {
            store,
            policy,
            caller_msp_id,
        }
    }

    /// Raw stored bytes under `loan_uid` in `collection`.
    pub async fn get_raw(&self, collection: Collection, loan_uid: &str) -> Result<Option<Vec<u8>>> {
        self.policy.check(collection, self.caller_msp_id)?;
        self.store.get(collection, loan_uid).await
    }

    pub async fn get_loan(&self, loan_uid: &str) -> Result<Option<Loan>> {
        match self.get_raw(Collection::Loans, loan_uid).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map(Some).map_err(|e| {
                RegistryError::StoreError(format!("Failed to decode loan {}: {}", loan_uid, e))
            }),
            None => Ok(None),
        }
    }

    /// Overwrites the public record of `loan`.
    pub async fn put_loan(&self, loan: &Loan) -> Result<()> {
        self.policy.check(Collection::Loans, self.caller_msp_id)?;
        let bytes = serde_json::to_vec(loan)?;
        self.store.put(Collection::Loans, &loan.loan_uid, bytes).await
    }

    /// Stores a newly issued loan and its private terms in one atomic batch,
    /// public record first.
    pub async fn insert_issued(&self, loan: &Loan, private: &LoanPrivateInfo) -> Result<()> {
        self.policy.check(Collection::Loans, self.caller_msp_id)?;
        self.policy
            .check(Collection::LoanPrivateInfo, self.caller_msp_id)?;
        let writes = vec![
            RecordWrite::new(Collection::Loans, &loan.loan_uid, serde_json::to_vec(loan)?),
            RecordWrite::new(
                Collection::LoanPrivateInfo,
                &private.loan_uid,
                serde_json::to_vec(private)?,
            ),
        ];
        self.store.write_batch(writes).await
    }
}
