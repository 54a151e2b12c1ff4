//! Domain types of the mortgage register: loans, their lifecycle, the
//! collections they live in, and the port through which they are stored.

pub mod collection;
pub mod identity;
pub mod input;
pub mod invocation;
pub mod loan;
pub mod ports;
