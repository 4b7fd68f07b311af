//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check addresses parse as 20-byte hex addresses
//! - Validate value ranges (timeouts > 0, chain id nonzero)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: PortalConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::PortalConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &PortalConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.chain.required_chain_id == 0 {
        errors.push(ValidationError {
            field: "chain.required_chain_id".to_string(),
            message: "must be nonzero".to_string(),
        });
    }
    if config.chain.effective_rpc_url().is_none() {
        errors.push(ValidationError {
            field: "chain.rpc_url".to_string(),
            message: "no RPC endpoint configured and chain id not in the static table"
                .to_string(),
        });
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "chain.rpc_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    if config.chain.receipt_poll_ms == 0 {
        errors.push(ValidationError {
            field: "chain.receipt_poll_ms".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    check_address(&mut errors, "token.contract_address", &config.token.contract_address);
    check_address(
        &mut errors,
        "token.destination_address",
        &config.token.destination_address,
    );

    if config.provider.base_url.is_empty() {
        errors.push(ValidationError {
            field: "provider.base_url".to_string(),
            message: "must be set".to_string(),
        });
    }
    if config.provider.app_id.is_empty() {
        errors.push(ValidationError {
            field: "provider.app_id".to_string(),
            message: "must be set".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.is_empty() {
        errors.push(ValidationError {
            field: field.to_string(),
            message: "must be set".to_string(),
        });
        return;
    }
    if value.parse::<Address>().is_err() {
        errors.push(ValidationError {
            field: field.to_string(),
            message: format!("'{}' is not a valid address", value),
        });
    }
}
