use crate::error::{RegistryError, Result};

/// Suffix the platform appends to every organisation name to form its MSP ID.
pub const MSP_SUFFIX: &str = "MSP";

/// Extracts the organisation name from an MSP identifier, e.g. `Org1` from `Org1MSP`.
pub fn org_name_from_msp_id(msp_id: &str) -> &str {
    msp_id.strip_suffix(MSP_SUFFIX).unwrap_or(msp_id)
}

/// Resolves the organisation name of the transaction creator.
///
/// `msp_id` is the identity the platform verified for the caller, if it
/// supplied one. An identity that names no organisation (blank, or the bare
/// suffix) is rejected.
pub fn resolve_caller_org(msp_id: Option<&str>) -> Result<String> {
    match msp_id.map(|id| org_name_from_msp_id(id.trim())) {
        Some(org) if !org.is_empty() => Ok(org.to_string()),
        _ => Err(RegistryError::IdentityError),
    }
}
