use bankbook::{Account, AccountStore, AppConfig, Amount, Ledger, LedgerError};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use anyhow::Context;
use colored::Colorize;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(version, about, propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[clap(short, long, value_parser, default_value = AppConfig::DEFAULT_LOCATION)]
    config: PathBuf,

    /// Path to accounts file, overrides the configured one
    #[clap(short, long, value_parser)]
    store: Option<PathBuf>,

    /// Action to perform
    #[clap(subcommand)]
    action: Subcommands,
}

#[derive(Debug, Subcommand)]
enum Subcommands {
    /// Open a new account
    Create(Create),
    /// Deposit money into an account
    Deposit(Movement),
    /// Withdraw money from an account
    Withdraw(Movement),
    /// Display account details
    Show(Credentials),
    /// Change name, email or pin
    Update(Update),
    /// Close an account for good
    Delete(Delete),
}

#[derive(Args, Debug)]
struct Credentials {
    /// Account number, as printed on creation
    #[clap(short='a', long="account", value_parser)]
    accountno: String,

    #[clap(short='p', long, value_parser)]
    pin: String,
}

#[derive(Args, Debug)]
struct Create {
    #[clap(short='n', long, value_parser)]
    name: String,

    #[clap(long, value_parser)]
    age: u32,

    #[clap(short='e', long, value_parser)]
    email: String,

    /// Four digit pin
    #[clap(short='p', long, value_parser)]
    pin: String,
}

#[derive(Args, Debug)]
struct Movement {
    #[clap(flatten)]
    credentials: Credentials,

    #[clap(short='m', long, value_parser, allow_hyphen_values = true)]
    amount: Amount,
}

#[derive(Args, Debug)]
struct Update {
    #[clap(flatten)]
    credentials: Credentials,

    /// New name, kept as is when omitted
    #[clap(short='n', long, value_parser)]
    name: Option<String>,

    /// New email, kept as is when omitted
    #[clap(short='e', long, value_parser)]
    email: Option<String>,

    /// New four digit pin, kept as is when omitted
    #[clap(long, value_parser)]
    new_pin: Option<String>,
}

#[derive(Args, Debug)]
struct Delete {
    #[clap(flatten)]
    credentials: Credentials,

    /// Skip the confirmation prompt
    #[clap(short='y', long)]
    yes: bool,
}

impl Delete {
    fn confirmed(&self) -> anyhow::Result<bool> {
        if self.yes {
            return Ok(true);
        }
        print!("Delete account {} permanently? [y/N] ", self.credentials.accountno);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)
            .with_context(|| "failed to read confirmation")?;
        return Ok(answer.trim().eq_ignore_ascii_case("y"));
    }
}

/// Credentials are checked before anyone is asked to confirm.
fn delete_account<S: AccountStore>(
    ledger: &mut Ledger<S>,
    delete: &Delete,
    confirm: impl FnOnce(&Delete) -> anyhow::Result<bool>,
) -> anyhow::Result<Account> {
    let Credentials { accountno, pin } = &delete.credentials;
    if ledger.find_account(accountno, pin).is_none() {
        return Err(LedgerError::AccountNotFound.into());
    }
    let confirmed = confirm(delete)?;
    return Ok(ledger.delete_account(accountno, pin, confirmed)?);
}

fn print_account(account: &Account) {
    let balance = if account.balance > 0 {
        account.balance.to_string().green()
    } else {
        account.balance.to_string().normal()
    };
    println!("{}: {}", "Account".bold(), account.accountno);
    println!("{}: {}", "Name".bold(), account.name);
    println!("{}: {}", "Age".bold(), account.age);
    println!("{}: {}", "Email".bold(), account.email);
    println!("{}: {}", "Balance".bold(), balance);
}

fn run(args: Cli) -> anyhow::Result<()> {
    let mut config = AppConfig::read_or_default(&args.config)?;
    if let Some(path) = args.store {
        config.storage.path = path;
    }
    let mut ledger = config.open_ledger();

    match args.action {
        Subcommands::Create(create) => {
            let account = ledger.create_account(&create.name, create.age, &create.email, &create.pin)?;
            println!("{}", "Account created.".green());
            println!("Your account number is {}, please write it down.", account.accountno.as_str().bold());
        },
        Subcommands::Deposit(deposit) => {
            let Credentials { accountno, pin } = &deposit.credentials;
            let account = ledger.deposit(accountno, pin, deposit.amount)?;
            println!("Deposited {}. New balance: {}", deposit.amount, account.balance.to_string().green());
        },
        Subcommands::Withdraw(withdraw) => {
            let Credentials { accountno, pin } = &withdraw.credentials;
            let account = ledger.withdraw(accountno, pin, withdraw.amount)?;
            println!("Withdrew {}. Remaining balance: {}", withdraw.amount, account.balance);
        },
        Subcommands::Show(credentials) => {
            let account = ledger.find_account(&credentials.accountno, &credentials.pin)
                .ok_or(LedgerError::AccountNotFound)?;
            print_account(account);
        },
        Subcommands::Update(update) => {
            let Credentials { accountno, pin } = &update.credentials;
            let account = ledger.update_details(
                accountno, pin,
                update.name.as_deref(), update.email.as_deref(), update.new_pin.as_deref())?;
            println!("{}", "Account updated.".green());
            print_account(&account);
        },
        Subcommands::Delete(delete) => {
            delete_account(&mut ledger, &delete, Delete::confirmed)?;
            println!("{}", "Account deleted.".green());
        },
    }
    return Ok(());
}

fn main() {
    bankbook::logging::init();
    let args = Cli::parse();

    if let Err(err) = run(args) {
        eprintln!("{} {:#}", "error:".bright_red().bold(), err);
        std::process::exit(1);
    }
}


#[cfg(test)]
mod tests {
    use super::{delete_account, Cli, Credentials, Delete, Subcommands};
    use bankbook::{JsonStore, Ledger, LedgerError};
    use clap::{CommandFactory, Parser};
    use std::cell::Cell;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_amount() {
        let cli = Cli::try_parse_from([
            "bankbook-cli", "--store", "x.json", "withdraw", "-a", "ab1c2@3", "-p", "0042", "-m", "-5",
        ]).unwrap();

        match cli.action {
            Subcommands::Withdraw(movement) => {
                assert_eq!(movement.amount, -5);
                assert_eq!(movement.credentials.pin, "0042");
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn update_fields_are_optional() {
        let cli = Cli::try_parse_from([
            "bankbook-cli", "update", "--account", "ab1c2@3", "--pin", "0042", "--new-pin", "0007",
        ]).unwrap();

        match cli.action {
            Subcommands::Update(update) => {
                assert_eq!(update.name, None);
                assert_eq!(update.email, None);
                assert_eq!(update.new_pin.as_deref(), Some("0007"));
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    fn delete_request(accountno: &str, pin: &str) -> Delete {
        Delete {
            credentials: Credentials { accountno: accountno.to_owned(), pin: pin.to_owned() },
            yes: false,
        }
    }

    #[test]
    fn delete_checks_credentials_before_asking() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::open(JsonStore::new(dir.path().join("accounts.json")));
        let account = ledger.create_account("Bilbo", 111, "bilbo@shire.me", "0111").unwrap();
        let asked = Cell::new(0);

        let wrong_pin = delete_request(account.accountno.as_str(), "1110");
        let err = delete_account(&mut ledger, &wrong_pin, |_| {
            asked.set(asked.get() + 1);
            Ok(true)
        }).unwrap_err();
        assert!(matches!(err.downcast_ref::<LedgerError>(), Some(LedgerError::AccountNotFound)));
        assert_eq!(asked.get(), 0);
        assert_eq!(ledger.accounts().len(), 1);

        let declined = delete_request(account.accountno.as_str(), "0111");
        let err = delete_account(&mut ledger, &declined, |_| {
            asked.set(asked.get() + 1);
            Ok(false)
        }).unwrap_err();
        assert!(matches!(err.downcast_ref::<LedgerError>(), Some(LedgerError::NotConfirmed)));
        assert_eq!(asked.get(), 1);

        let removed = delete_account(&mut ledger, &declined, |_| Ok(true)).unwrap();
        assert_eq!(removed, account);
        assert!(ledger.accounts().is_empty());
    }
}
