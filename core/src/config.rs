use crate::types::{LicenseKind, Money};
use serde::{Deserialize, Serialize};

/// Tunable constants of the economy. Defaults mirror the live portal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EconomyConfig {
    /// Amount credited to the borrower when a loan is issued.
    pub loan_principal: Money,
    /// Total the borrower owes (principal plus the built-in fee).
    pub loan_amount_due: Money,
    /// Days from issue to due date.
    pub loan_term_days: i64,
    /// Penalty fraction of the outstanding debt per full overdue interval.
    pub loan_penalty_rate: f64,
    /// Length of one overdue interval in days.
    pub loan_penalty_interval_days: i64,

    /// Days a savings deposit stays locked.
    pub savings_lock_days: i64,
    /// Interest fraction paid on withdrawal (0.04 = 4%).
    pub savings_interest: f64,

    /// Jackpot value a fresh round starts from, and the reset value
    /// after a win.
    pub lottery_seed_jackpot: Money,
    /// Price of one ticket.
    pub lottery_ticket_price: Money,
    /// Share of each ticket that grows the jackpot; the remainder is
    /// treasury income.
    pub lottery_jackpot_share: Money,

    /// Digits in a generated account number.
    pub account_number_len: usize,

    pub license_price_conducir: Money,
    pub license_price_armas: Money,
    pub license_price_caza: Money,
    pub license_price_pesca: Money,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            loan_principal: 5_500.0,
            loan_amount_due: 6_000.0,
            loan_term_days: 14,
            loan_penalty_rate: 0.01,
            loan_penalty_interval_days: 2,
            savings_lock_days: 30,
            savings_interest: 0.04,
            lottery_seed_jackpot: 50_000.0,
            lottery_ticket_price: 500.0,
            lottery_jackpot_share: 250.0,
            account_number_len: 10,
            license_price_conducir: 2_000.0,
            license_price_armas: 5_000.0,
            license_price_caza: 1_500.0,
            license_price_pesca: 1_000.0,
        }
    }
}

impl EconomyConfig {
    /// Load from a JSON file. The runner passes `--config <path>`;
    /// in tests, use EconomyConfig::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }

    pub fn license_price(&self, kind: LicenseKind) -> Money {
        match kind {
            LicenseKind::Conducir => self.license_price_conducir,
            LicenseKind::Armas => self.license_price_armas,
            LicenseKind::Caza => self.license_price_caza,
            LicenseKind::Pesca => self.license_price_pesca,
        }
    }
}
