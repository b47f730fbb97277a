//! Chart-of-accounts management

use std::collections::{HashSet, VecDeque};

use bigdecimal::BigDecimal;
use tracing::debug;
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation;

/// Specification for a new account
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub account_code: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub parent_account_id: Option<Uuid>,
    pub department_id: Option<Uuid>,
    pub opening_balance: BigDecimal,
}

impl NewAccount {
    /// A root account with a zero opening balance
    pub fn new(account_code: &str, account_name: &str, account_type: AccountType) -> Self {
        Self {
            account_code: account_code.to_string(),
            account_name: account_name.to_string(),
            account_type,
            parent_account_id: None,
            department_id: None,
            opening_balance: BigDecimal::from(0),
        }
    }

    pub fn with_parent(mut self, parent_account_id: Uuid) -> Self {
        self.parent_account_id = Some(parent_account_id);
        self
    }

    pub fn with_department(mut self, department_id: Uuid) -> Self {
        self.department_id = Some(department_id);
        self
    }

    pub fn with_opening_balance(mut self, opening_balance: BigDecimal) -> Self {
        self.opening_balance = opening_balance;
        self
    }
}

/// Partial update of account metadata.
///
/// `parent_account_id` and `department_id` are doubly optional: `None`
/// leaves the field alone, `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub account_code: Option<String>,
    pub account_name: Option<String>,
    pub account_type: Option<AccountType>,
    pub parent_account_id: Option<Option<Uuid>>,
    pub department_id: Option<Option<Uuid>>,
    pub opening_balance: Option<BigDecimal>,
}

/// Registry owning the chart-of-accounts tree: creation, update, hierarchy
/// validation, and deactivation
pub struct AccountRegistry<S: AccountingStorage> {
    pub(crate) storage: S,
}

impl<S: AccountingStorage> AccountRegistry<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a new account. The current balance starts at the opening
    /// balance.
    pub async fn create_account(&mut self, spec: NewAccount) -> AccountingResult<Account> {
        validation::validate_account_code(&spec.account_code)?;
        validation::validate_account_name(&spec.account_name)?;

        if self
            .storage
            .find_account_by_code(&spec.account_code)
            .await?
            .is_some()
        {
            return Err(AccountingError::DuplicateCode {
                code: spec.account_code,
            });
        }

        if let Some(parent_id) = spec.parent_account_id {
            let parent = self
                .storage
                .get_account(parent_id)
                .await?
                .ok_or(AccountingError::ParentNotFound { parent_id })?;
            if parent.account_type != spec.account_type {
                return Err(AccountingError::TypeMismatch {
                    child: spec.account_type,
                    parent: parent.account_type,
                });
            }
        }

        let now = chrono::Utc::now().naive_utc();
        let account = Account {
            id: Uuid::new_v4(),
            account_code: spec.account_code,
            account_name: spec.account_name,
            account_type: spec.account_type,
            parent_account_id: spec.parent_account_id,
            department_id: spec.department_id,
            is_active: true,
            current_balance: spec.opening_balance.clone(),
            opening_balance: spec.opening_balance,
            created_at: now,
            updated_at: now,
        };

        self.storage.insert_account(&account).await?;
        debug!(account_code = %account.account_code, account_id = %account.id, "account created");

        Ok(account)
    }

    /// Update account metadata.
    ///
    /// Changing the opening balance shifts the current balance by the same
    /// delta, preserving accumulated posting activity. Reparenting is
    /// checked against the hierarchy invariants: no self-parenting, no
    /// cycles, and no parent/child type mismatch.
    pub async fn update_account(
        &mut self,
        account_id: Uuid,
        patch: AccountPatch,
    ) -> AccountingResult<Account> {
        let mut account = self.get_account_required(account_id).await?;
        let now = chrono::Utc::now().naive_utc();

        if let Some(code) = patch.account_code {
            if code != account.account_code {
                validation::validate_account_code(&code)?;
                if self.storage.find_account_by_code(&code).await?.is_some() {
                    return Err(AccountingError::DuplicateCode { code });
                }
                account.account_code = code;
            }
        }

        if let Some(name) = patch.account_name {
            validation::validate_account_name(&name)?;
            account.account_name = name;
        }

        let new_type = patch.account_type.unwrap_or(account.account_type);
        if new_type != account.account_type {
            let children = self.storage.list_child_accounts(account_id).await?;
            if children
                .iter()
                .any(|c| c.is_active && c.account_type != new_type)
            {
                return Err(AccountingError::ChildTypeConflict { account_id });
            }
            account.account_type = new_type;
        }

        let new_parent = match patch.parent_account_id {
            Some(parent) => parent,
            None => account.parent_account_id,
        };
        if let Some(parent_id) = new_parent {
            if parent_id == account_id {
                return Err(AccountingError::SelfParent { account_id });
            }
            let parent = self
                .storage
                .get_account(parent_id)
                .await?
                .ok_or(AccountingError::ParentNotFound { parent_id })?;
            if self.is_descendant(account_id, parent_id).await? {
                return Err(AccountingError::CycleDetected {
                    account_id,
                    parent_id,
                });
            }
            if parent.account_type != new_type {
                return Err(AccountingError::TypeMismatch {
                    child: new_type,
                    parent: parent.account_type,
                });
            }
        }
        account.parent_account_id = new_parent;

        if let Some(department) = patch.department_id {
            account.department_id = department;
        }

        if let Some(opening) = patch.opening_balance {
            // shift the running balance by the same delta so accumulated
            // activity survives the restatement
            let delta = &opening - &account.opening_balance;
            account.current_balance += delta;
            account.opening_balance = opening;
        }

        account.updated_at = now;
        self.storage.update_account(&account).await?;
        debug!(account_code = %account.account_code, account_id = %account.id, "account updated");

        Ok(account)
    }

    /// Soft-delete an account. History is never removed: accounts with
    /// postings or active children stay active.
    pub async fn deactivate_account(&mut self, account_id: Uuid) -> AccountingResult<Account> {
        let mut account = self.get_account_required(account_id).await?;
        if !account.is_active {
            return Ok(account);
        }

        let children = self.storage.list_child_accounts(account_id).await?;
        if children.iter().any(|c| c.is_active) {
            return Err(AccountingError::HasActiveChildren { account_id });
        }
        if self.storage.account_has_postings(account_id).await? {
            return Err(AccountingError::HasPostings { account_id });
        }

        account.is_active = false;
        account.updated_at = chrono::Utc::now().naive_utc();
        self.storage.update_account(&account).await?;
        debug!(account_code = %account.account_code, account_id = %account.id, "account deactivated");

        Ok(account)
    }

    /// Whether `node_id` sits anywhere in the subtree under `ancestor_id`.
    ///
    /// Iterative breadth-first walk over child links. The visited set
    /// bounds the walk by the total node count even if stored links were
    /// ever corrupted into a cycle; the walk starts at the ancestor's
    /// children, so the relation is irreflexive.
    pub async fn is_descendant(
        &self,
        ancestor_id: Uuid,
        node_id: Uuid,
    ) -> AccountingResult<bool> {
        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut queue: VecDeque<Uuid> = VecDeque::new();
        queue.push_back(ancestor_id);
        visited.insert(ancestor_id);

        while let Some(current) = queue.pop_front() {
            for child in self.storage.list_child_accounts(current).await? {
                if child.id == node_id {
                    return Ok(true);
                }
                if visited.insert(child.id) {
                    queue.push_back(child.id);
                }
            }
        }

        Ok(false)
    }

    /// Get an account by id
    pub async fn get_account(&self, account_id: Uuid) -> AccountingResult<Option<Account>> {
        self.storage.get_account(account_id).await
    }

    /// Get an account by id, returning an error if not found
    pub async fn get_account_required(&self, account_id: Uuid) -> AccountingResult<Account> {
        self.storage
            .get_account(account_id)
            .await?
            .ok_or(AccountingError::AccountNotFound { account_id })
    }

    /// Look an account up by its business code
    pub async fn find_account_by_code(&self, code: &str) -> AccountingResult<Option<Account>> {
        self.storage.find_account_by_code(code).await
    }

    /// List accounts matching a filter
    pub async fn list_accounts(&self, filter: &AccountFilter) -> AccountingResult<Vec<Account>> {
        self.storage.list_accounts(filter).await
    }

    /// Direct children of an account
    pub async fn child_accounts(&self, parent_id: Uuid) -> AccountingResult<Vec<Account>> {
        self.storage.list_child_accounts(parent_id).await
    }
}
