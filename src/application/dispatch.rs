use super::registry::LoanRegistry;
use crate::domain::invocation::{Invocation, Response};
use crate::error::{RegistryError, Result};
use tracing::{debug, warn};

/// Functions exposed to callers, by their invocation name.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Function {
    IssueLoan,
    ReadLoan,
    ChangeLoanStatus,
}

impl Function {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "issueLoan" => Some(Function::IssueLoan),
            "readLoan" => Some(Function::ReadLoan),
            "changeLoanStatus" => Some(Function::ChangeLoanStatus),
            _ => None,
        }
    }
}

/// Entry point for invocations: routes them to the registry and turns the
/// outcome into a response envelope. Errors never escape as anything but an
/// error response.
pub struct Dispatcher {
    registry: LoanRegistry,
}

impl Dispatcher {
    pub fn new(registry: LoanRegistry) -> Self {
        Self { registry }
    }

    /// Instantiation hook. The register needs no initial state.
    pub fn init(&self) -> Response {
        Response::success(Vec::new())
    }

    pub async fn invoke(&self, invocation: &Invocation) -> Response {
        debug!(function = %invocation.function, "invoke is running");
        match self.route(invocation).await {
            Ok(payload) => Response::success(payload),
            Err(e) => {
                if let RegistryError::UnknownFunction(name) = &e {
                    warn!(function = %name, "invoke did not find function");
                } else {
                    warn!(
                        function = %invocation.function,
                        caller = invocation.creator_msp_id.as_deref().unwrap_or("<unknown>"),
                        error = %e,
                        "invocation rejected"
                    );
                }
                Response::error(e.to_string())
            }
        }
    }

    async fn route(&self, invocation: &Invocation) -> Result<Vec<u8>> {
        let function = Function::from_name(&invocation.function)
            .ok_or_else(|| RegistryError::UnknownFunction(invocation.function.clone()))?;
        let caller = invocation.creator_msp_id.as_deref();
        let args = invocation.args.as_slice();

        match function {
            Function::IssueLoan => {
                self.registry
                    .issue_loan(caller, args, &invocation.transient)
                    .await?;
                Ok(Vec::new())
            }
            Function::ReadLoan => self.registry.read_loan(caller, args).await,
            Function::ChangeLoanStatus => {
                self.registry
                    .change_loan_status(caller, args, &invocation.transient)
                    .await?;
                Ok(Vec::new())
            }
        }
    }
}
