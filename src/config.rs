//! Injected configuration for the accounting core
//!
//! The source of truth for "which account plays which role" lives in host
//! configuration, never in code. Callers deserialize [`AccountingConfig`]
//! from whatever configuration layer they use and hand it to
//! [`AccountingCore`](crate::ledger::AccountingCore).

use std::collections::HashMap;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{AccountingError, AccountingResult};

/// Well-known ledger roles business workflows post against.
///
/// Workflow modules (invoicing, payments, credit notes) resolve these to
/// concrete account ids through [`AccountingConfig::default_account`]
/// instead of hardcoding ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultAccount {
    Cash,
    AccountsReceivable,
    AccountsPayable,
    ServiceRevenue,
    TaxPayable,
}

impl DefaultAccount {
    /// Configuration key for this role, as it appears in config files
    pub fn key(&self) -> &'static str {
        match self {
            DefaultAccount::Cash => "cash",
            DefaultAccount::AccountsReceivable => "accounts_receivable",
            DefaultAccount::AccountsPayable => "accounts_payable",
            DefaultAccount::ServiceRevenue => "service_revenue",
            DefaultAccount::TaxPayable => "tax_payable",
        }
    }
}

/// Configuration injected into the accounting core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingConfig {
    /// Mapping from well-known roles to account ids
    #[serde(default)]
    pub default_accounts: HashMap<DefaultAccount, Uuid>,
    /// Residual accepted when checking that a trial balance nets to zero.
    /// Covers reconciliation against externally rounded statements; a
    /// residual beyond it is treated as a data-integrity signal.
    #[serde(default = "default_balance_tolerance")]
    pub balance_tolerance: BigDecimal,
    /// Prefix for generated journal entry numbers
    #[serde(default = "default_entry_number_prefix")]
    pub entry_number_prefix: String,
}

fn default_balance_tolerance() -> BigDecimal {
    // 0.01 in minor units
    BigDecimal::new(1.into(), 2)
}

fn default_entry_number_prefix() -> String {
    "JE".to_string()
}

impl Default for AccountingConfig {
    fn default() -> Self {
        Self {
            default_accounts: HashMap::new(),
            balance_tolerance: default_balance_tolerance(),
            entry_number_prefix: default_entry_number_prefix(),
        }
    }
}

impl AccountingConfig {
    /// Resolve a well-known role to its configured account id
    pub fn default_account(&self, role: DefaultAccount) -> AccountingResult<Uuid> {
        self.default_accounts.get(&role).copied().ok_or_else(|| {
            AccountingError::Validation(format!(
                "no account configured for role '{}'",
                role.key()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_keep_the_compatibility_tolerance() {
        let config = AccountingConfig::default();
        assert_eq!(config.balance_tolerance, BigDecimal::new(1.into(), 2));
        assert_eq!(config.entry_number_prefix, "JE");
    }

    #[test]
    fn deserializes_role_mapping_from_json() {
        let cash_id = Uuid::new_v4();
        let raw = format!(
            r#"{{"default_accounts": {{"cash": "{cash_id}"}}, "balance_tolerance": "0.01"}}"#
        );
        let config: AccountingConfig = serde_json::from_str(&raw).unwrap();

        assert_eq!(
            config.default_account(DefaultAccount::Cash).unwrap(),
            cash_id
        );
        assert!(config
            .default_account(DefaultAccount::AccountsReceivable)
            .is_err());
    }
}
