//! Payroll — batch salary settlement for government departments.
//!
//! Salaries are snapshotted at submission time into PayrollItems, so a
//! raise between submission and approval never changes what a pending
//! request pays. Settlement is fund-backed: approving a request debits
//! the government fund by the snapshotted total in the same
//! transaction that credits the employees.

use crate::{
    accounts::{open_or_fetch, Account},
    config::EconomyConfig,
    directory::Directory,
    engine::Economy,
    error::{EconomyError, EconomyResult},
    event::EconomyEvent,
    rng::EconomyRng,
    store::Txn,
    treasury::ensure_fund,
    types::{Money, PayrollStatus, TxKind},
};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct PayrollRequest {
    pub id: i64,
    pub department: String,
    pub total_amount: Money,
    pub status: PayrollStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayrollItem {
    pub id: i64,
    pub request_id: i64,
    pub owner: String,
    pub amount: Money,
}

impl Economy {
    /// Snapshot the department's current salaries into a pending
    /// request. Members without a payable salary are skipped; a
    /// department with nothing to pay is rejected outright.
    pub fn submit_payroll(
        &mut self,
        directory: &dyn Directory,
        department: &str,
    ) -> EconomyResult<PayrollRequest> {
        let members: Vec<_> = directory
            .members_of(department)
            .into_iter()
            .filter(|m| m.salary > 0.0)
            .collect();
        let total: Money = members.iter().map(|m| m.salary).sum();
        if members.is_empty() {
            return Err(EconomyError::EmptyPayroll {
                department: department.to_string(),
            });
        }

        let Self { store, clock, .. } = self;
        let now = clock.now();
        store.with_txn(|tx| {
            let request = tx.insert_payroll_request(department, total, now)?;
            for member in &members {
                tx.insert_payroll_item(request.id, &member.owner, member.salary)?;
            }
            tx.append_event(
                &EconomyEvent::PayrollSubmitted {
                    request_id: request.id,
                    department: department.to_string(),
                    total,
                },
                now,
            )?;
            log::info!(
                "Payroll for {department} submitted: {:.2} across {} members",
                total,
                members.len()
            );
            Ok(request)
        })
    }

    /// Approve or reject a pending request. Approval credits each
    /// item's salary account and debits the fund by the total;
    /// rejection has no monetary effect. Either way the decision is
    /// final.
    pub fn decide_payroll(
        &mut self,
        directory: &dyn Directory,
        request_id: i64,
        approve: bool,
    ) -> EconomyResult<PayrollRequest> {
        let Self {
            store,
            clock,
            config,
            accounts_rng,
            ..
        } = self;
        let now = clock.now();
        store.with_txn(|tx| {
            let request = tx
                .payroll_request_by_id(request_id)?
                .ok_or_else(|| anyhow::anyhow!("no payroll request {request_id}"))?;
            if request.status != PayrollStatus::Pending {
                return Err(EconomyError::AlreadyProcessed);
            }

            if !approve {
                tx.set_payroll_status(request.id, PayrollStatus::Rejected)?;
                tx.append_event(
                    &EconomyEvent::PayrollDecided {
                        request_id: request.id,
                        department: request.department.clone(),
                        approved: false,
                        total: request.total_amount,
                    },
                    now,
                )?;
                log::info!("Payroll {} for {} rejected", request.id, request.department);
                return Ok(PayrollRequest {
                    status: PayrollStatus::Rejected,
                    ..request
                });
            }

            let items = tx.items_for_request(request.id)?;
            for item in &items {
                let account =
                    salary_account_for(tx, accounts_rng, config, directory, &item.owner, now)?;
                tx.adjust_balance(account.id, item.amount)?;
                tx.append_entry(
                    account.id,
                    TxKind::Salary,
                    item.amount,
                    None,
                    &format!("Nómina: {}", request.department),
                    now,
                )?;
                tx.append_event(
                    &EconomyEvent::SalaryPaid {
                        owner: item.owner.clone(),
                        number: account.number.clone(),
                        amount: item.amount,
                        department: request.department.clone(),
                    },
                    now,
                )?;
            }
            ensure_fund(tx)?;
            tx.adjust_fund_balance(-request.total_amount)?;
            tx.set_payroll_status(request.id, PayrollStatus::Approved)?;
            tx.append_event(
                &EconomyEvent::PayrollDecided {
                    request_id: request.id,
                    department: request.department.clone(),
                    approved: true,
                    total: request.total_amount,
                },
                now,
            )?;
            log::info!(
                "Payroll {} for {} approved: {:.2} paid to {} members",
                request.id,
                request.department,
                request.total_amount,
                items.len()
            );
            Ok(PayrollRequest {
                status: PayrollStatus::Approved,
                ..request
            })
        })
    }

    pub fn pending_payrolls(&self) -> EconomyResult<Vec<PayrollRequest>> {
        self.store.view().pending_payroll_requests()
    }

    pub fn payroll_items(&self, request_id: i64) -> EconomyResult<Vec<PayrollItem>> {
        self.store.view().items_for_request(request_id)
    }
}

/// Where a member's salary lands: their designated salary account when
/// it exists, their personal account otherwise.
fn salary_account_for(
    tx: &Txn<'_>,
    rng: &mut EconomyRng,
    config: &EconomyConfig,
    directory: &dyn Directory,
    owner: &str,
    now: NaiveDateTime,
) -> EconomyResult<Account> {
    if let Some(number) = directory.salary_account(owner) {
        if let Some(account) = tx.account_by_number(&number)? {
            return Ok(account);
        }
        log::warn!("Salary account {number} for {owner} does not exist, using personal account");
    }
    open_or_fetch(tx, rng, config, owner, now)
}
