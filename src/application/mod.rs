//! Application layer containing the loan lifecycle orchestration.
//!
//! [`registry::LoanRegistry`] implements the operations, [`records::LoanRecords`]
//! gives them a typed, policy-checked view of the store, and
//! [`dispatch::Dispatcher`] maps invocation names onto them.

pub mod dispatch;
pub mod records;
pub mod registry;
