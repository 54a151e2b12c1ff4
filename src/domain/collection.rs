use crate::error::{RegistryError, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The named partitions of the shared store this contract writes to.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Collection {
    /// Public loan facts, readable by every member of the channel.
    Loans,
    /// Financial terms, restricted to the issuing bank and the notary.
    LoanPrivateInfo,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Loans, Collection::LoanPrivateInfo];

    pub fn name(&self) -> &'static str {
        match self {
            Collection::Loans => "collectionLoans",
            Collection::LoanPrivateInfo => "collectionLoanPrivateInfo",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Collection::ALL.into_iter().find(|c| c.name() == name)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One entry of a collection policy file.
#[derive(Debug, Deserialize, Clone)]
pub struct CollectionMembers {
    pub name: String,
    pub members: Vec<String>,
}

/// Which MSP identities may access each collection.
///
/// A collection without an entry is open to every caller.
#[derive(Debug, Default, Clone)]
pub struct CollectionPolicy {
    members: HashMap<Collection, HashSet<String>>,
}

impl CollectionPolicy {
    /// A policy under which every collection is open.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn restrict<I, S>(mut self, collection: Collection, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members
            .insert(collection, members.into_iter().map(Into::into).collect());
        self
    }

    /// Parses a JSON policy file: `[{"name": "collectionLoans", "members": ["Org1MSP"]}]`.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let entries: Vec<CollectionMembers> = serde_json::from_slice(bytes)?;
        entries.into_iter().try_fold(Self::open(), |policy, entry| {
            let collection = Collection::from_name(&entry.name).ok_or_else(|| {
                RegistryError::ValidationError(format!("Unknown collection: {}", entry.name))
            })?;
            Ok(policy.restrict(collection, entry.members))
        })
    }

    /// Fails with a `StoreError` unless `caller_msp_id` may access `collection`.
    pub fn check(&self, collection: Collection, caller_msp_id: Option<&str>) -> Result<()> {
        let Some(members) = self.members.get(&collection) else {
            return Ok(());
        };
        match caller_msp_id {
            Some(id) if members.contains(id) => Ok(()),
            _ => Err(RegistryError::StoreError(format!(
                "tx creator {} does not have access permission on collection {}",
                caller_msp_id.unwrap_or("<unknown>"),
                collection
            ))),
        }
    }
}
