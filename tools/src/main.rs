//! bank-runner: headless exerciser for the city economy.
//!
//! Two modes. The default drives a deterministic scripted town through
//! `--days` simulated days: accounts, transfers, a loan left to go
//! overdue, savings, lottery tickets, weekly payroll. Prints a closing
//! summary. With `--ipc-mode` it instead reads JSON commands from
//! stdin, one per line, and answers each with a JSON state line — the
//! surface the web portal and the chat bot drive the engine through.
//!
//! Usage:
//!   bank-runner --seed 42 --days 45 --db bank.db
//!   bank-runner --seed 42 --days 45 --config economy.json
//!   bank-runner --db bank.db --ipc-mode

use anyhow::{Context, Result};
use chrono::NaiveDate;
use hermes_core::{
    clock::Clock,
    config::EconomyConfig,
    directory::StaticDirectory,
    engine::Economy,
    notify::LogNotifier,
    types::{LicenseKind, SavingsStatus},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Advance {
        days: u64,
    },
    Command {
        cmd: String,
        payload: serde_json::Value,
    },
    Quit,
}

#[derive(serde::Serialize)]
struct PortalState {
    date: NaiveDate,
    accounts: i64,
    ledger_rows: i64,
    events: i64,
    fund_balance: f64,
    jackpot: f64,
    tickets_today: i64,
    pending_payrolls: Vec<hermes_core::payroll::PayrollRequest>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let days = parse_arg(&args, "--days", 45u64);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let start = match args.windows(2).find(|w| w[0] == "--start") {
        Some(w) => NaiveDate::parse_from_str(&w[1], "%Y-%m-%d")
            .context("--start must be YYYY-MM-DD")?,
        None => NaiveDate::from_ymd_opt(2025, 1, 1)
            .ok_or_else(|| anyhow::anyhow!("invalid default start date"))?,
    };
    let config = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => EconomyConfig::load(&w[1])?,
        None => EconomyConfig::default(),
    };

    if !ipc_mode {
        println!("Gobierno de San Andreas — bank-runner");
        println!("  seed:  {seed}");
        println!("  days:  {days}");
        println!("  db:    {db}");
        println!("  start: {start}");
        println!();
    }

    let mut economy = Economy::open(db, seed, Clock::fixed(start), config)?;
    let directory = StaticDirectory::new()
        .with_name("marcos", "Marcos Vega")
        .with_name("lucia", "Lucía Ortiz")
        .with_name("sofia", "Sofía Ramos")
        .with_name("dmendez", "Daniel Méndez")
        .with_member("Policía", "lucia", 1_200.0)
        .with_member("Policía", "dmendez", 950.0)
        .with_member("EMS", "sofia", 1_100.0);
    let notifier = LogNotifier;

    if ipc_mode {
        return run_ipc_loop(&mut economy, &directory, &notifier);
    }

    economy.adjust_fund(250_000.0, "Presupuesto inicial")?;

    for day in 0..days {
        // Daily engine maintenance, the part a scheduler would own.
        economy.accrue_overdue_penalties()?;
        economy.ensure_drawn()?;

        run_town_day(&mut economy, &directory, day)?;

        economy.dispatch_notifications(&notifier)?;
        economy.clock.advance_days(1);
    }

    print_summary(&mut economy, days)?;
    Ok(())
}

fn run_ipc_loop(
    economy: &mut Economy,
    directory: &StaticDirectory,
    notifier: &LogNotifier,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::Advance { days } => {
                for _ in 0..days {
                    economy.clock.advance_days(1);
                    economy.accrue_overdue_penalties()?;
                    economy.ensure_drawn()?;
                    economy.dispatch_notifications(notifier)?;
                }
                let state = build_portal_state(economy)?;
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            IpcCommand::GetState => {
                let state = build_portal_state(economy)?;
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
            IpcCommand::Command { cmd, payload } => {
                // Domain failures answer the caller; they never kill
                // the loop.
                if let Err(e) = handle_command(economy, directory, &cmd, payload) {
                    let err_json = serde_json::json!({ "error": e.to_string() });
                    writeln!(stdout, "{err_json}")?;
                    stdout.flush()?;
                    continue;
                }
                economy.dispatch_notifications(notifier)?;
                let state = build_portal_state(economy)?;
                writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn handle_command(
    economy: &mut Economy,
    directory: &StaticDirectory,
    cmd: &str,
    payload: serde_json::Value,
) -> Result<()> {
    let owner = payload["owner"].as_str().unwrap_or_default();
    match cmd {
        "transfer" => {
            let target = payload["target_number"].as_str().unwrap_or_default();
            let amount = payload["amount"].as_f64().unwrap_or(0.0);
            economy.transfer(owner, target, amount)?;
        }
        "adjust_account" => {
            let delta = payload["delta"].as_f64().unwrap_or(0.0);
            let reason = payload["reason"].as_str().unwrap_or("Ajuste");
            economy.adjust_account(owner, delta, reason)?;
        }
        "issue_loan" => {
            economy.issue_loan(owner)?;
        }
        "repay_loan" => {
            let amount = payload["amount"].as_f64().unwrap_or(0.0);
            economy.repay_loan(owner, amount)?;
        }
        "open_savings" => {
            let amount = payload["amount"].as_f64().unwrap_or(0.0);
            economy.open_savings(owner, amount)?;
        }
        "withdraw_savings" => {
            let savings_id = payload["savings_id"].as_i64().unwrap_or(0);
            economy.withdraw_savings(owner, savings_id)?;
        }
        "buy_ticket" => {
            let numbers = payload["numbers"].as_str().unwrap_or_default();
            economy.buy_ticket(owner, numbers)?;
        }
        "pay_fine" => {
            let amount = payload["amount"].as_f64().unwrap_or(0.0);
            let reason = payload["reason"].as_str().unwrap_or("Multa");
            economy.pay_fine(owner, amount, reason)?;
        }
        "adjust_fund" => {
            let delta = payload["delta"].as_f64().unwrap_or(0.0);
            let reason = payload["reason"].as_str().unwrap_or("Ajuste");
            economy.adjust_fund(delta, reason)?;
        }
        "submit_payroll" => {
            let department = payload["department"].as_str().unwrap_or_default();
            economy.submit_payroll(directory, department)?;
        }
        "decide_payroll" => {
            let request_id = payload["request_id"].as_i64().unwrap_or(0);
            let approve = payload["approve"].as_bool().unwrap_or(false);
            economy.decide_payroll(directory, request_id, approve)?;
        }
        _ => log::warn!("Unknown command: {cmd}"),
    }
    Ok(())
}

fn build_portal_state(economy: &mut Economy) -> Result<PortalState> {
    let lottery = economy.lottery()?;
    Ok(PortalState {
        date: economy.clock.today(),
        accounts: economy.account_count()?,
        ledger_rows: economy.ledger_count()?,
        events: economy.event_count()?,
        fund_balance: economy.fund_balance()?,
        jackpot: lottery.jackpot,
        tickets_today: lottery.tickets_today,
        pending_payrolls: economy.pending_payrolls()?,
    })
}

/// The scripted behavior of the town on one day.
fn run_town_day(economy: &mut Economy, directory: &StaticDirectory, day: u64) -> Result<()> {
    match day {
        0 => {
            economy.adjust_account("marcos", 3_000.0, "Saldo inicial")?;
            economy.adjust_account("lucia", 1_500.0, "Saldo inicial")?;
            economy.adjust_account("sofia", 800.0, "Saldo inicial")?;
        }
        1 => {
            let lucia = economy.account_for("lucia")?;
            economy.transfer("marcos", &lucia.number, 400.0)?;
        }
        2 => {
            // Marcos takes the loan and never repays; penalties start
            // accruing once the 14-day term lapses.
            economy.issue_loan("marcos")?;
            economy.open_savings("marcos", 2_000.0)?;
        }
        3 => {
            economy.pay_fine("lucia", 150.0, "Exceso de velocidad")?;
            economy.buy_license("marcos", LicenseKind::Conducir)?;
        }
        _ => {}
    }

    // Everyone plays the lottery twice a week.
    if day % 3 == 0 {
        for owner in ["marcos", "lucia", "sofia"] {
            if economy.account_for(owner)?.balance >= economy.config.lottery_ticket_price {
                let numbers = format!("{:05}", (day * 997 + owner.len() as u64 * 131) % 100_000);
                economy.buy_ticket(owner, &numbers)?;
            }
        }
    }

    // Weekly payroll: submitted and approved the same day.
    if day > 0 && day % 7 == 0 {
        for department in ["Policía", "EMS"] {
            let request = economy.submit_payroll(directory, department)?;
            economy.decide_payroll(directory, request.id, true)?;
        }
    }

    // The savings deposit from day 2 unlocks on day 32.
    if day == 34 {
        if let Some(savings) = economy
            .savings_for("marcos")?
            .into_iter()
            .find(|s| s.status == SavingsStatus::Active)
        {
            economy.withdraw_savings("marcos", savings.id)?;
        }
    }

    Ok(())
}

fn print_summary(economy: &mut Economy, days: u64) -> Result<()> {
    let lottery = economy.lottery()?;

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  days run:     {days}");
    println!("  final date:   {}", economy.clock.today());
    println!("  accounts:     {}", economy.account_count()?);
    println!("  ledger rows:  {}", economy.ledger_count()?);
    println!("  events:       {}", economy.event_count()?);
    println!("  fund balance: {:.2}", economy.fund_balance()?);
    println!("  jackpot:      {:.2}", lottery.jackpot);
    println!();
    println!("=== ACCOUNTS ===");
    for owner in ["marcos", "lucia", "sofia", "dmendez"] {
        match economy.find_owner_account(owner)? {
            Some(account) => println!(
                "  {:<8} {}  balance {:>10.2}",
                owner, account.number, account.balance
            ),
            None => println!("  {owner:<8} (no account)"),
        }
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
