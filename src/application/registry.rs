use super::records::LoanRecords;
use crate::domain::collection::{Collection, CollectionPolicy};
use crate::domain::identity::resolve_caller_org;
use crate::domain::input::{LoanIssuance, StatusChange, require_no_args};
use crate::domain::invocation::TransientMap;
use crate::domain::ports::RecordStoreBox;
use crate::error::{RegistryError, Result};
use tracing::{debug, info};

/// The mortgage loan registry: issues loans, moves them through their
/// lifecycle and reads them back.
///
/// Each operation is a single read-validate-write sequence against the
/// store. Ordering of concurrent invocations is left to the platform that
/// commits them, so nothing here locks.
pub struct LoanRegistry {
    store: RecordStoreBox,
    policy: CollectionPolicy,
}

impl LoanRegistry {
    /// Creates a registry over `store` with every collection open.
    pub fn new(store: RecordStoreBox) -> Self {
        Self {
            store,
            policy: CollectionPolicy::open(),
        }
    }

    pub fn with_policy(mut self, policy: CollectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn records<'a>(&'a self, caller_msp_id: Option<&'a str>) -> LoanRecords<'a> {
        LoanRecords::new(self.store.as_ref(), &self.policy, caller_msp_id)
    }

    /// Issues a new loan on behalf of the caller's organisation.
    ///
    /// All loan data comes from the `loan` key of `transient`; positional
    /// arguments are refused so the financial terms never reach the public
    /// transaction record. The public record and the private terms are
    /// written together or not at all.
    pub async fn issue_loan(
        &self,
        caller_msp_id: Option<&str>,
        args: &[String],
        transient: &TransientMap,
    ) -> Result<()> {
        require_no_args(args)?;
        let issuer = resolve_caller_org(caller_msp_id)?;

        let input = LoanIssuance::from_transient(transient)?;
        input.validate()?;

        let records = self.records(caller_msp_id);
        let existing = records
            .get_raw(Collection::Loans, &input.loan_uid)
            .await
            .map_err(|e| RegistryError::StoreError(format!("Failed to get loan: {}", e)))?;
        if existing.is_some() {
            return Err(RegistryError::ConflictError(format!(
                "This loan already exists: {}",
                input.loan_uid
            )));
        }

        let (loan, private) = input.into_records(issuer);
        records.insert_issued(&loan, &private).await?;

        info!(
            loan_uid = %loan.loan_uid,
            issuer = %loan.issuer,
            notary = %loan.notary,
            "loan issued"
        );
        Ok(())
    }

    /// Returns the raw record stored under `[loan_uid, collection_name]`.
    pub async fn read_loan(&self, caller_msp_id: Option<&str>, args: &[String]) -> Result<Vec<u8>> {
        let [loan_uid, collection_name] = args else {
            return Err(RegistryError::ValidationError(
                "Incorrect number of arguments. Expecting loan UID and private data collection"
                    .to_string(),
            ));
        };
        debug!(loan_uid = %loan_uid, collection = %collection_name, "reading loan");

        let collection = Collection::from_name(collection_name).ok_or_else(|| {
            RegistryError::StoreError(format!(
                "Failed to get state for loan {}: unknown collection {}",
                loan_uid, collection_name
            ))
        })?;

        self.records(caller_msp_id)
            .get_raw(collection, loan_uid)
            .await
            .map_err(|e| {
                RegistryError::StoreError(format!(
                    "Failed to get state for loan {}: {}",
                    loan_uid, e
                ))
            })?
            .ok_or_else(|| RegistryError::NotFoundError(loan_uid.clone()))
    }

    /// Moves a loan to the status given in the `loan_status` key of `transient`.
    pub async fn change_loan_status(
        &self,
        caller_msp_id: Option<&str>,
        args: &[String],
        transient: &TransientMap,
    ) -> Result<()> {
        require_no_args(args)?;
        let change = StatusChange::from_transient(transient)?;
        change.validate()?;
        let caller_org = resolve_caller_org(caller_msp_id)?;

        let records = self.records(caller_msp_id);
        let mut loan = records
            .get_loan(&change.loan_uid)
            .await
            .map_err(|e| RegistryError::StoreError(format!("Failed to get loan: {}", e)))?
            .ok_or_else(|| RegistryError::NotFoundError(change.loan_uid.clone()))?;

        let previous = loan.status;
        loan.change_status(&change.status, &caller_org)?;
        records.put_loan(&loan).await?;

        info!(
            loan_uid = %loan.loan_uid,
            caller = %caller_org,
            from = %previous,
            to = %loan.status,
            "loan status changed"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::input::{LOAN_KEY, LOAN_STATUS_KEY};
    use crate::domain::loan::{Loan, LoanStatus};
    use crate::infrastructure::in_memory::InMemoryRecordStore;

    const LOAN1: &str = r#"{"loanUID":"loan1","buyer":"b1","notary":"NotaryOrg","startDate":"01/01/2020","endDate":"01/01/2040","loanValue":300000,"currency":"EUR","interestRate":0.02}"#;

    fn registry() -> (LoanRegistry, InMemoryRecordStore) {
        let store = InMemoryRecordStore::new();
        (LoanRegistry::new(Box::new(store.clone())), store)
    }

    fn transient(key: &str, value: &str) -> TransientMap {
        TransientMap::from([(key.to_string(), value.as_bytes().to_vec())])
    }

    fn status(loan_uid: &str, status: &str) -> TransientMap {
        transient(
            LOAN_STATUS_KEY,
            &format!(r#"{{"loanUID":"{}","status":"{}"}}"#, loan_uid, status),
        )
    }

    fn read_args(loan_uid: &str, collection: Collection) -> Vec<String> {
        vec![loan_uid.to_string(), collection.name().to_string()]
    }

    async fn stored_loan(registry: &LoanRegistry, loan_uid: &str) -> Loan {
        let bytes = registry
            .read_loan(None, &read_args(loan_uid, Collection::Loans))
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_issue_then_read() {
        let (registry, _) = registry();
        registry
            .issue_loan(Some("BankOrgMSP"), &[], &transient(LOAN_KEY, LOAN1))
            .await
            .unwrap();

        let loan = stored_loan(&registry, "loan1").await;
        assert_eq!(loan.status, LoanStatus::Issued);
        assert_eq!(loan.issuer, "BankOrg");

        let private = registry
            .read_loan(None, &read_args("loan1", Collection::LoanPrivateInfo))
            .await
            .unwrap();
        let private: serde_json::Value = serde_json::from_slice(&private).unwrap();
        assert_eq!(private["loanValue"], 300000);
        assert_eq!(private["currency"], "EUR");
    }

    #[tokio::test]
    async fn test_interest_rate_survives_storage_unchanged() {
        let (registry, _) = registry();
        for (loan_uid, raw, expected) in [("tiny", "1e-30", 1e-30), ("huge", "1e30", 1e30)] {
            let payload = LOAN1
                .replace("loan1", loan_uid)
                .replace(r#""interestRate":0.02"#, &format!(r#""interestRate":{}"#, raw));
            registry
                .issue_loan(Some("BankOrgMSP"), &[], &transient(LOAN_KEY, &payload))
                .await
                .unwrap();

            let private = registry
                .read_loan(None, &read_args(loan_uid, Collection::LoanPrivateInfo))
                .await
                .unwrap();
            let private: serde_json::Value = serde_json::from_slice(&private).unwrap();
            assert_eq!(private["interestRate"].as_f64(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_duplicate_issue_is_a_conflict() {
        let (registry, _) = registry();
        registry
            .issue_loan(Some("BankOrgMSP"), &[], &transient(LOAN_KEY, LOAN1))
            .await
            .unwrap();

        let err = registry
            .issue_loan(Some("OtherBankMSP"), &[], &transient(LOAN_KEY, LOAN1))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ConflictError(_)));
        assert_eq!(err.to_string(), "This loan already exists: loan1");
        assert_eq!(stored_loan(&registry, "loan1").await.issuer, "BankOrg");
    }

    #[tokio::test]
    async fn test_issue_checks_args_before_identity() {
        let (registry, store) = registry();
        let err = registry
            .issue_loan(None, &["loan1".to_string()], &transient(LOAN_KEY, LOAN1))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ValidationError(_)));

        let err = registry
            .issue_loan(None, &[], &transient(LOAN_KEY, LOAN1))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::IdentityError));

        let err = registry
            .issue_loan(Some("MSP"), &[], &transient(LOAN_KEY, LOAN1))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::IdentityError));
        assert_eq!(store.len(Collection::Loans).await, 0);
    }

    #[tokio::test]
    async fn test_invalid_issuance_writes_nothing() {
        let (registry, store) = registry();
        let err = registry
            .issue_loan(
                Some("BankOrgMSP"),
                &[],
                &transient(LOAN_KEY, &LOAN1.replace("300000", "-300000")),
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "The loan value must be positive");
        assert_eq!(store.len(Collection::Loans).await, 0);
        assert_eq!(store.len(Collection::LoanPrivateInfo).await, 0);
    }

    #[tokio::test]
    async fn test_read_loan_errors() {
        let (registry, _) = registry();

        let err = registry
            .read_loan(None, &["loan1".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ValidationError(_)));

        let err = registry
            .read_loan(None, &read_args("missing", Collection::Loans))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFoundError(_)));
        assert_eq!(err.to_string(), "Loan does not exist: missing");

        let err = registry
            .read_loan(None, &["loan1".to_string(), "collectionCars".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::StoreError(_)));
        assert!(err.to_string().contains("loan1"));
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let (registry, _) = registry();
        registry
            .issue_loan(Some("BankOrgMSP"), &[], &transient(LOAN_KEY, LOAN1))
            .await
            .unwrap();

        for (caller, target) in [
            ("NotaryOrgMSP", "active"),
            ("BankOrgMSP", "inactive"),
            ("NotaryOrgMSP", "cancelled"),
        ] {
            registry
                .change_loan_status(Some(caller), &[], &status("loan1", target))
                .await
                .unwrap();
            assert_eq!(stored_loan(&registry, "loan1").await.status.as_str(), target);
        }

        let err = registry
            .change_loan_status(Some("NotaryOrgMSP"), &[], &status("loan1", "active"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::ConflictError(_)));
    }

    #[tokio::test]
    async fn test_status_change_only_touches_status() {
        let (registry, _) = registry();
        registry
            .issue_loan(Some("BankOrgMSP"), &[], &transient(LOAN_KEY, LOAN1))
            .await
            .unwrap();
        let before = stored_loan(&registry, "loan1").await;

        registry
            .change_loan_status(Some("NotaryOrgMSP"), &[], &status("loan1", "active"))
            .await
            .unwrap();

        let after = stored_loan(&registry, "loan1").await;
        assert_eq!(
            after,
            Loan {
                status: LoanStatus::Active,
                ..before
            }
        );
    }

    #[tokio::test]
    async fn test_change_status_of_unknown_loan() {
        let (registry, _) = registry();
        let err = registry
            .change_loan_status(Some("NotaryOrgMSP"), &[], &status("ghost", "active"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFoundError(_)));
        assert!(err.to_string().contains("ghost"));
    }

    #[tokio::test]
    async fn test_change_status_validates_payload_before_identity() {
        let (registry, _) = registry();
        let err = registry
            .change_loan_status(None, &[], &status("loan1", ""))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "loan status field must be a non-empty string"
        );

        let err = registry
            .change_loan_status(None, &[], &status("loan1", "active"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::IdentityError));
    }

    #[tokio::test]
    async fn test_private_collection_policy() {
        let store = InMemoryRecordStore::new();
        let policy = CollectionPolicy::open()
            .restrict(Collection::LoanPrivateInfo, ["BankOrgMSP", "NotaryOrgMSP"]);
        let registry = LoanRegistry::new(Box::new(store)).with_policy(policy);
        registry
            .issue_loan(Some("BankOrgMSP"), &[], &transient(LOAN_KEY, LOAN1))
            .await
            .unwrap();

        assert!(registry
            .read_loan(
                Some("NotaryOrgMSP"),
                &read_args("loan1", Collection::LoanPrivateInfo)
            )
            .await
            .is_ok());

        let err = registry
            .read_loan(
                Some("OtherOrgMSP"),
                &read_args("loan1", Collection::LoanPrivateInfo),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::StoreError(_)));
        assert!(err.to_string().starts_with("Failed to get state for loan loan1"));

        assert!(registry
            .read_loan(Some("OtherOrgMSP"), &read_args("loan1", Collection::Loans))
            .await
            .is_ok());
    }
}
