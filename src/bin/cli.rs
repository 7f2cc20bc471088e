use teller::{Account, AccountId, Ledger, Transaction, TransactionKind,
    backend::{AccountStore, JsonStore},
    client::{check_transaction, GatewayClient, Session, Teller},
    core::{open_account, Amount}};

use std::{io, path::PathBuf, time::Duration};
use anyhow::{bail, Context};
use colored::Colorize;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Base URL of the teller gateway
    #[clap(short, long, value_parser, default_value = "http://127.0.0.1:8080")]
    url: String,

    /// Operate on a local store file instead of the gateway
    #[clap(short, long, value_parser)]
    store: Option<PathBuf>,

    /// Gateway request timeout in seconds
    #[clap(long, value_parser, default_value_t = 30)]
    timeout: u64,

    /// Action to perform
    #[clap(subcommand)]
    action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Start an interactive ATM session
    Session {
        /// Account to log in as; asked for when omitted
        #[clap(value_parser)]
        username: Option<String>
    },
    /// Show the balance of an account
    Balance {
        #[clap(value_parser)]
        username: String
    },
    /// Withdraw an amount
    Withdraw(Transact),
    /// Deposit an amount
    Deposit(Transact),
    /// Open a new account (local store only)
    Open(Open),
    /// List all accounts with their balances (local store only)
    List
}

#[derive(Args, Debug)]
struct Transact {
    #[clap(value_parser)]
    username: String,

    #[clap(value_parser)]
    amount: Amount
}

impl Transact {
    fn run(&self, teller: &dyn Teller, kind: TransactionKind) -> anyhow::Result<()> {
        check_transaction(self.amount)?;
        let transaction = Transaction::new(self.username.as_str(), kind, self.amount);
        let balance = teller.transact(&transaction)?;
        println!("{} balance: {}", "TRANSACTION COMPLETE.".bold(), balance);
        return Ok(());
    }
}

#[derive(Args, Debug)]
struct Open {
    /// Identifier of the new account
    #[clap(value_parser)]
    username: String,

    /// Opening balance
    #[clap(short='b', long, value_parser, default_value_t = 0)]
    balance: Amount,

    /// Daily withdrawal limit
    #[clap(short='l', long, value_parser)]
    limit: Amount
}

fn print_balances(ledger: &Ledger<JsonStore>) -> anyhow::Result<()> {
    for key in ledger.store().keys()? {
        let id = AccountId::new(key);
        match ledger.account(&id) {
            Ok(account) => print_account(&id, &account),
            Err(err) => println!("{}: {}", id, err.to_string().bright_red())
        }
    }
    return Ok(());
}

fn print_account(id: &AccountId, account: &Account) {
    let balance = account.balance();
    let color = if balance < 0 {
        colored::ColoredString::bright_red
    } else if balance > 0 {
        colored::ColoredString::green
    } else {
        colored::ColoredString::normal
    };
    let fmt_balance = color(format!("{}", balance).white());
    println!("{}: {} (limit {}, withdrawn today {})", id, fmt_balance,
        account.withdrawal_limit(), account.amount_withdrawn_today());
}

fn open_local(path: &PathBuf) -> anyhow::Result<Ledger<JsonStore>> {
    let store = JsonStore::open(path)
        .with_context(|| format!("failed to open store {}", path.display()))?;
    Ok(Ledger::new(store))
}

fn run_teller(action: Subcommands, teller: &dyn Teller) -> anyhow::Result<()> {
    match action {
        Subcommands::Session { username } => {
            let stdin = io::stdin();
            Session::new(teller, stdin.lock(), io::stdout())
                .run(username.map(AccountId::new))?;
        },
        Subcommands::Balance { username } => {
            let balance = teller.balance(&AccountId::new(username))?;
            println!("YOUR BALANCE IS: {}", balance);
        },
        Subcommands::Withdraw(transact) => transact.run(teller, TransactionKind::Withdraw)?,
        Subcommands::Deposit(transact) => transact.run(teller, TransactionKind::Deposit)?,
        other => bail!("{:?} needs --store", other)
    }
    return Ok(());
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Cli::parse();

    let local = args.store.as_ref().map(open_local).transpose()?;

    match (args.action, local) {
        (Subcommands::Open(open), Some(ledger)) => {
            let account = Account::new(open.balance, open.limit);
            open_account(ledger.store(), &AccountId::new(open.username), &account)?;
            Ok(())
        },
        (Subcommands::List, Some(ledger)) => print_balances(&ledger),
        (action, Some(ledger)) => run_teller(action, &ledger),
        (action, None) => {
            let gateway = GatewayClient::new(&args.url, Duration::from_secs(args.timeout))?;
            run_teller(action, &gateway)
        }
    }
}
