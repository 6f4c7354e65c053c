//! Command-line front end: argument dispatch and plain-text rendering of reports.

pub mod output;

use std::path::PathBuf;
use std::str::FromStr;

use chrono::Local;
use rust_decimal::Decimal;

use crate::{
    config::ConfigManager,
    core::services::FinanceService,
    demo::generate_demo_wallets,
    errors::{CliError, FinanceError},
    ledger::{TransactionDraft, TransactionType, Wallet},
    storage::{JsonFileStore, WalletStore},
    utils::build_info,
    view::{AmountFormat, MonthlyReport, MonthlySummaryView, TransactionDisplay},
};

type CliResult<T> = Result<T, CliError>;

const USAGE: &str = "\
Usage: finance_tracker_cli [--data <path>] <command>

Commands:
  wallets                                      List wallets and balances
  report <year> <month>                        Monthly transactions, top expenses and totals
  add <wallet-id> <income|expense> <amount> <description...>
                                               Record a transaction
  new-wallet <name> [currency] [initial-balance]
                                               Create a wallet
  demo                                         Generate demo data into an empty store
  version                                      Print build information";

/// Runs the CLI against the process arguments.
pub fn run_cli() -> CliResult<()> {
    run_with_args(std::env::args().skip(1).collect())
}

pub fn run_with_args(args: Vec<String>) -> CliResult<()> {
    let mut args = args.into_iter();
    let mut data_override = None;
    let mut command = args.next();
    if command.as_deref() == Some("--data") {
        data_override = Some(PathBuf::from(
            args.next().ok_or_else(|| usage_error("--data needs a path"))?,
        ));
        command = args.next();
    }
    let command = command.ok_or_else(|| usage_error("missing command"))?;
    let rest: Vec<String> = args.collect();

    if command == "version" {
        println!("{}", build_info::current());
        return Ok(());
    }

    let manager = ConfigManager::new()?;
    let config = manager.load()?;
    let data_file = data_override.unwrap_or_else(|| manager.data_file(&config));
    let store = JsonFileStore::new(data_file);
    let mut service = FinanceService::with_wallets(store.load());
    let amounts = AmountFormat::for_locale(&config.locale);

    match command.as_str() {
        "wallets" => print_wallets(&service, &amounts),
        "report" => {
            let (year, month) = parse_period(&rest)?;
            print_report(&MonthlyReport::build(&service, year, month), &amounts);
        }
        "add" => {
            add_transaction(&mut service, &rest)?;
            save(&store, &service)?;
        }
        "new-wallet" => {
            let name = rest
                .first()
                .ok_or_else(|| usage_error("new-wallet needs a name"))?;
            let currency = rest
                .get(1)
                .cloned()
                .unwrap_or_else(|| config.default_currency.clone());
            let initial_balance = match rest.get(2) {
                Some(raw) => parse_amount(raw)?,
                None => Decimal::ZERO,
            };
            let id = service.next_wallet_id()?;
            service.add_wallet(Wallet::new(id, name.as_str(), currency, initial_balance))?;
            save(&store, &service)?;
            output::success(format!("Wallet `{name}` created with id {id}"));
        }
        "demo" => {
            if !service.wallets().is_empty() {
                output::warning("Data already present, demo generation skipped");
                return Ok(());
            }
            let wallets = generate_demo_wallets(&mut rand::thread_rng(), Local::now().naive_local());
            service.replace_wallets(wallets);
            save(&store, &service)?;
            output::success(format!(
                "Demo data generated for {} wallets",
                service.wallets().len()
            ));
        }
        other => return Err(usage_error(&format!("unknown command `{other}`"))),
    }
    Ok(())
}

fn usage_error(reason: &str) -> CliError {
    CliError::Input(format!("{reason}\n\n{USAGE}"))
}

fn save(store: &JsonFileStore, service: &FinanceService) -> CliResult<()> {
    store.save(service.wallets()).map_err(|err| {
        tracing::error!(error = %err, "failed to save data");
        CliError::from(err)
    })
}

fn parse_period(args: &[String]) -> CliResult<(i32, u32)> {
    let (Some(year), Some(month)) = (args.first(), args.get(1)) else {
        return Err(usage_error("report needs <year> <month>"));
    };
    let year = year
        .parse::<i32>()
        .map_err(|_| CliError::Input(format!("`{year}` is not a valid year")))?;
    let month = month
        .parse::<u32>()
        .ok()
        .filter(|month| (1..=12).contains(month))
        .ok_or_else(|| CliError::Input(format!("`{month}` is not a month between 1 and 12")))?;
    Ok((year, month))
}

fn parse_amount(raw: &str) -> CliResult<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|_| CliError::Input(format!("amount `{raw}` must be a number")))
}

fn add_transaction(service: &mut FinanceService, args: &[String]) -> CliResult<()> {
    if args.len() < 4 {
        return Err(usage_error(
            "add needs <wallet-id> <income|expense> <amount> <description>",
        ));
    }
    let wallet_id = args[0]
        .parse::<u32>()
        .map_err(|_| CliError::Input(format!("`{}` is not a wallet id", args[0])))?;
    let kind = TransactionType::from_str(&args[1])?;
    let draft = TransactionDraft {
        wallet_id,
        kind,
        amount: parse_amount(&args[2])?,
        description: args[3..].join(" "),
        date: Local::now().naive_local(),
    };
    let transaction = draft.validate(service.next_transaction_id()?)?;
    let id = transaction.id;

    let wallet_name = match service.wallet(wallet_id) {
        Some(wallet) => wallet.name.clone(),
        None => return Err(FinanceError::WalletNotFound(wallet_id).into()),
    };
    if !service.try_add_transaction(wallet_id, transaction) {
        return Err(CliError::Command(format!(
            "insufficient funds in wallet `{wallet_name}`"
        )));
    }
    let balance = service
        .wallet(wallet_id)
        .map(Wallet::current_balance)
        .unwrap_or_default();
    output::success(format!(
        "Transaction {id} added to `{wallet_name}`, balance {balance}"
    ));
    Ok(())
}

fn print_wallets(service: &FinanceService, amounts: &AmountFormat) {
    output::section("Wallets");
    if service.wallets().is_empty() {
        output::info("No wallets yet");
        return;
    }
    for wallet in service.wallets() {
        println!(
            "{:>4}  {:<20} {:>14} {:<4} ({} transactions)",
            wallet.id,
            wallet.name,
            amounts.format(wallet.current_balance()),
            wallet.currency,
            wallet.transaction_count()
        );
    }
    output::section("Totals by currency");
    for (currency, total) in service.total_balance_by_currency() {
        println!("{currency:<4} {:>14}", amounts.format(total));
    }
}

fn print_rows(rows: &[TransactionDisplay<'_>], amounts: &AmountFormat) {
    for row in rows {
        let txn = row.transaction;
        println!(
            "{}  {:<20} {:<8} {:>12}  {}",
            txn.date.format("%Y-%m-%d"),
            row.wallet_name,
            txn.kind,
            amounts.format(txn.amount),
            txn.description
        );
    }
}

fn print_report(report: &MonthlyReport<'_>, amounts: &AmountFormat) {
    output::section(format!("Transactions {}-{:02}", report.year, report.month));
    if report.is_empty() {
        output::info("No transactions for this month");
    } else {
        print_rows(&report.transactions, amounts);
    }

    output::section("Top expenses");
    print_rows(&report.top_expenses, amounts);

    let mut totals = MonthlySummaryView::new();
    totals.apply(report.summary);
    output::section("Summary");
    println!("Income:  {}", amounts.format(totals.income()));
    println!("Expense: {}", amounts.format(totals.expense()));
    println!("Balance: {}", amounts.format(totals.balance()));
}
