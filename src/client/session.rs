use std::io::{BufRead, Write};

use anyhow::{bail, Context};

use crate::client::Teller;
use crate::core::{AccountId, Amount, Transaction, TransactionKind};

/// Notes the machine can dispense.
const DENOMINATIONS: [Amount; 2] = [20, 50];

/// Client-side sanity check before a transaction is sent.
pub fn check_transaction(amount: Amount) -> anyhow::Result<()> {
    if amount <= 0 || DENOMINATIONS.iter().all(|note| amount % note != 0) {
        bail!("the amount has to be a positive multiple of 20 or of 50, try again");
    }
    return Ok(());
}

enum Choice {
    Transact(TransactionKind),
    Balance,
    Exit
}

impl Choice {
    fn parse(input: &str) -> Option<Choice> {
        match input.trim().to_ascii_lowercase().as_str() {
            "b" => Some(Choice::Balance),
            "e" => Some(Choice::Exit),
            other => other.parse().ok().map(Choice::Transact)
        }
    }
}

/// Interactive ATM dialogue over any line-based input and output.
pub struct Session<'a, T: ?Sized, R, W> {
    teller: &'a T,
    input: R,
    output: W
}

impl<'a, T: Teller + ?Sized, R: BufRead, W: Write> Session<'a, T, R, W> {
    pub fn new(teller: &'a T, input: R, output: W) -> Self {
        Session { teller, input, output }
    }

    /// Runs until the user exits, declines to continue, or input ends.
    /// Fails only if the user cannot be verified or the terminal breaks.
    pub fn run(&mut self, username: Option<AccountId>) -> anyhow::Result<()> {
        writeln!(self.output, "WELCOME TO THE ATM.")?;
        let id = match username {
            Some(id) => id,
            None => match self.prompt("USERNAME: ")? {
                Some(name) if !name.trim().is_empty() => AccountId::new(name.trim()),
                _ => bail!("error parsing the username")
            }
        };
        self.teller.verify_user(&id)
            .with_context(|| format!("cannot verify user {}", id))?;

        loop {
            self.print_menu()?;
            let Some(line) = self.prompt("PLEASE CHOOSE YOUR ACTION: ")? else { break };

            match Choice::parse(&line) {
                Some(Choice::Exit) => {
                    writeln!(self.output, "BYE BYE")?;
                    break;
                },
                Some(Choice::Balance) => match self.teller.balance(&id) {
                    Ok(balance) => writeln!(self.output, "YOUR BALANCE IS: {}", balance)?,
                    Err(err) => {
                        writeln!(self.output, "error: {:#}", err)?;
                        continue;
                    }
                },
                Some(Choice::Transact(kind)) => {
                    let Some(line) = self.prompt("PLEASE ENTER THE AMOUNT: ")? else { break };
                    let Ok(amount) = line.trim().parse::<Amount>() else {
                        writeln!(self.output, "error incorrect amount")?;
                        continue;
                    };
                    if let Err(err) = check_transaction(amount) {
                        writeln!(self.output, "{}", err)?;
                        continue;
                    }
                    match self.teller.transact(&Transaction::new(id.clone(), kind, amount)) {
                        Ok(_) => writeln!(self.output, "TRANSACTION COMPLETE")?,
                        Err(err) => {
                            writeln!(self.output, "error: {:#}", err)?;
                            continue;
                        }
                    }
                },
                None => {
                    writeln!(self.output, "error incorrect choice")?;
                    continue;
                }
            }

            match self.prompt("WOULD YOU LIKE TO CONTINUE (Y/N): ")? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("y") => continue,
                _ => break
            }
        }
        return Ok(());
    }

    fn print_menu(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "1. W TO WITHDRAW AN AMOUNT")?;
        writeln!(self.output, "2. D TO DEPOSIT AN AMOUNT")?;
        writeln!(self.output, "3. B TO SEE YOUR BALANCE")?;
        writeln!(self.output, "4. E TO EXIT")?;
        return Ok(());
    }

    /// `None` once the input is exhausted.
    fn prompt(&mut self, question: &str) -> anyhow::Result<Option<String>> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        return Ok(Some(line));
    }
}
