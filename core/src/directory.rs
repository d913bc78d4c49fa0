//! Identity collaborator boundary.
//!
//! The engine never authenticates anyone. It records opaque owner
//! handles and asks a [`Directory`] for the identity facts it cannot
//! own: display names, department rosters with salaries, and optional
//! salary-linked account numbers.

use crate::types::{AccountNumber, Money, OwnerId};
use std::collections::HashMap;

/// One payable member of a department roster.
#[derive(Debug, Clone)]
pub struct RosterMember {
    pub owner: OwnerId,
    pub salary: Money,
}

pub trait Directory {
    /// Personal display name for an owner handle.
    fn display_name(&self, owner: &str) -> Option<String>;

    /// Active, approved members of a department.
    fn members_of(&self, department: &str) -> Vec<RosterMember>;

    /// The account number a member's salary is routed to, when one is
    /// designated.
    fn salary_account(&self, owner: &str) -> Option<AccountNumber>;
}

/// In-memory directory used by the runner and tests.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    names: HashMap<String, String>,
    rosters: HashMap<String, Vec<RosterMember>>,
    salary_accounts: HashMap<String, AccountNumber>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, owner: &str, name: &str) -> Self {
        self.names.insert(owner.to_string(), name.to_string());
        self
    }

    pub fn with_member(mut self, department: &str, owner: &str, salary: Money) -> Self {
        self.rosters
            .entry(department.to_string())
            .or_default()
            .push(RosterMember {
                owner: owner.to_string(),
                salary,
            });
        self
    }

    pub fn with_salary_account(mut self, owner: &str, number: &str) -> Self {
        self.salary_accounts
            .insert(owner.to_string(), number.to_string());
        self
    }
}

impl Directory for StaticDirectory {
    fn display_name(&self, owner: &str) -> Option<String> {
        self.names.get(owner).cloned()
    }

    fn members_of(&self, department: &str) -> Vec<RosterMember> {
        self.rosters.get(department).cloned().unwrap_or_default()
    }

    fn salary_account(&self, owner: &str) -> Option<AccountNumber> {
        self.salary_accounts.get(owner).cloned()
    }
}
