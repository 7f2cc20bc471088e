use serde::{Serialize, Deserialize};

use crate::core::account_id::AccountId;
use crate::core::calendar::{self, Day};
use crate::core::error::{LedgerError, LedgerResult};
use crate::core::transaction::{Amount, TransactionKind};

/// Persisted state of one account.
///
/// Values of this type are only ever working copies: they are decoded at the
/// start of a store transaction, mutated, and encoded back before it commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    balance: Amount,
    /// Maximum total that may be withdrawn on a single day.
    withdrawal_limit: Amount,
    /// Total withdrawn on `last_withdrawal_day`.
    #[serde(default)]
    amount_withdrawn_today: Amount,
    /// Day of month of the last committed withdrawal.
    #[serde(default)]
    last_withdrawal_day: Option<Day>
}

impl Account {
    pub fn new(balance: Amount, withdrawal_limit: Amount) -> Account {
        Account {
            balance,
            withdrawal_limit,
            amount_withdrawn_today: 0,
            last_withdrawal_day: None
        }
    }

    /// Same account, with `amount` already withdrawn on `day`.
    pub fn with_withdrawn(self, amount: Amount, day: Day) -> Account {
        Account { amount_withdrawn_today: amount, last_withdrawal_day: Some(day), ..self }
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn withdrawal_limit(&self) -> Amount {
        self.withdrawal_limit
    }

    pub fn amount_withdrawn_today(&self) -> Amount {
        self.amount_withdrawn_today
    }

    pub fn last_withdrawal_day(&self) -> Option<Day> {
        self.last_withdrawal_day
    }

    pub fn apply(&mut self, id: &AccountId, kind: TransactionKind, amount: Amount, today: Day) -> LedgerResult<()> {
        match kind {
            TransactionKind::Deposit => self.deposit(id, amount),
            TransactionKind::Withdraw => self.withdraw(id, amount, today)
        }
    }

    /// Deposits are not subject to any limit.
    pub fn deposit(&mut self, id: &AccountId, amount: Amount) -> LedgerResult<()> {
        self.balance = self.balance.checked_add(amount)
            .ok_or_else(|| overflow(id, amount))?;
        return Ok(());
    }

    /// Applies the daily withdrawal policy. The account is left untouched
    /// when an error is returned.
    pub fn withdraw(&mut self, id: &AccountId, amount: Amount, today: Day) -> LedgerResult<()> {
        let insufficient = || LedgerError::InsufficientFunds {
            account: id.clone(),
            balance: self.balance,
            requested: amount
        };
        if self.balance <= 0 {
            return Err(insufficient());
        }
        let remaining = self.balance.checked_sub(amount)
            .ok_or_else(|| overflow(id, amount))?;
        if remaining < 0 {
            return Err(insufficient());
        }

        if self.last_withdrawal_day == Some(today) {
            let withdrawn = self.amount_withdrawn_today.checked_add(amount)
                .ok_or_else(|| overflow(id, amount))?;
            if withdrawn > self.withdrawal_limit {
                return Err(LedgerError::LimitExceeded {
                    limit: self.withdrawal_limit,
                    withdrawn_today: self.amount_withdrawn_today,
                    requested: amount
                });
            }
            self.balance = remaining;
            self.amount_withdrawn_today = withdrawn;
        } else {
            // first withdrawal of a new day; the previous day's total is dropped
            self.balance = remaining;
            self.amount_withdrawn_today = amount;
            self.last_withdrawal_day = Some(today);
        }
        return Ok(());
    }

    pub fn encode(&self) -> LedgerResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|err| LedgerError::StoreUnavailable(err.into()))
    }

    pub fn decode(id: &AccountId, bytes: &[u8]) -> LedgerResult<Account> {
        let corrupt = |reason: String| LedgerError::CorruptRecord { account: id.clone(), reason };

        let account: Account = serde_json::from_slice(bytes)
            .map_err(|err| corrupt(err.to_string()))?;
        if let Some(day) = account.last_withdrawal_day {
            if !calendar::is_valid_day(day) {
                return Err(corrupt(format!("day of month out of range: {}", day)));
            }
        }
        return Ok(account);
    }
}

fn overflow(id: &AccountId, amount: Amount) -> LedgerError {
    LedgerError::AmountOverflow { account: id.clone(), requested: amount }
}


#[cfg(test)]
mod tests {
    use crate::core::{Account, AccountId, LedgerError, TransactionKind};
    use rstest::{fixture, rstest};

    const TODAY: u32 = 14;

    #[fixture]
    fn bilbo() -> AccountId {
        AccountId::new("Bilbo")
    }

    #[rstest]
    fn limit_reached_exactly(bilbo: AccountId) {
        let mut account = Account::new(1000, 500).with_withdrawn(480, TODAY);

        let res = account.withdraw(&bilbo, 30, TODAY);
        assert!(matches!(res, Err(LedgerError::LimitExceeded { limit: 500, withdrawn_today: 480, requested: 30 })));
        assert_eq!(account, Account::new(1000, 500).with_withdrawn(480, TODAY));

        account.withdraw(&bilbo, 20, TODAY).unwrap();
        assert_eq!(account.balance(), 980);
        assert_eq!(account.amount_withdrawn_today(), 500);
        assert_eq!(account.last_withdrawal_day(), Some(TODAY));
    }

    #[rstest]
    fn new_day_resets_counter(bilbo: AccountId) {
        let mut account = Account::new(200, 500).with_withdrawn(9999, TODAY - 1);

        account.withdraw(&bilbo, 50, TODAY).unwrap();

        assert_eq!(account.balance(), 150);
        assert_eq!(account.amount_withdrawn_today(), 50);
        assert_eq!(account.last_withdrawal_day(), Some(TODAY));
    }

    #[rstest]
    fn first_ever_withdrawal(bilbo: AccountId) {
        let mut account = Account::new(100, 500);
        account.withdraw(&bilbo, 40, TODAY).unwrap();
        assert_eq!(account, Account::new(60, 500).with_withdrawn(40, TODAY));
    }

    #[rstest]
    #[case::empty(0, 20)]
    #[case::negative(-10, 20)]
    #[case::too_much(100, 120)]
    fn insufficient_funds(bilbo: AccountId, #[case] balance: i64, #[case] amount: i64) {
        let mut account = Account::new(balance, 500);
        let res = account.withdraw(&bilbo, amount, TODAY);
        assert!(matches!(res, Err(LedgerError::InsufficientFunds { .. })));
        assert_eq!(account, Account::new(balance, 500));
    }

    #[rstest]
    fn whole_balance_can_be_withdrawn(bilbo: AccountId) {
        let mut account = Account::new(100, 500);
        account.withdraw(&bilbo, 100, TODAY).unwrap();
        assert_eq!(account.balance(), 0);
    }

    #[rstest]
    fn funds_are_checked_before_limit(bilbo: AccountId) {
        let mut account = Account::new(10, 500).with_withdrawn(500, TODAY);
        let res = account.withdraw(&bilbo, 20, TODAY);
        assert!(matches!(res, Err(LedgerError::InsufficientFunds { .. })));
    }

    #[rstest]
    fn deposit_ignores_limit(bilbo: AccountId) {
        let mut account = Account::new(10, 0).with_withdrawn(9999, TODAY);
        account.apply(&bilbo, TransactionKind::Deposit, 5000, TODAY).unwrap();
        assert_eq!(account.balance(), 5010);
        assert_eq!(account.amount_withdrawn_today(), 9999);
    }

    #[rstest]
    fn deposit_overflow_is_rejected(bilbo: AccountId) {
        let mut account = Account::new(i64::MAX - 1, 0);
        let res = account.deposit(&bilbo, 2);
        assert!(matches!(res, Err(LedgerError::AmountOverflow { requested: 2, .. })));
        assert_eq!(account.balance(), i64::MAX - 1);
    }

    #[rstest]
    #[case::daily_counter(Account::new(100, i64::MAX).with_withdrawn(i64::MAX, TODAY), 20)]
    #[case::balance(Account::new(1, i64::MAX), i64::MIN)]
    fn withdraw_overflow_is_rejected(bilbo: AccountId, #[case] account: Account, #[case] amount: i64) {
        let mut working = account.clone();
        let res = working.withdraw(&bilbo, amount, TODAY);
        assert!(matches!(res, Err(LedgerError::AmountOverflow { requested, .. }) if requested == amount));
        assert_eq!(working, account);
    }

    #[rstest]
    fn encoding_round_trip(bilbo: AccountId) {
        let account = Account::new(i64::MAX, 700).with_withdrawn(260, 31);
        let decoded = Account::decode(&bilbo, &account.encode().unwrap()).unwrap();
        assert_eq!(decoded, account);
    }

    #[rstest]
    fn decodes_record_without_withdrawals(bilbo: AccountId) {
        let account = Account::decode(&bilbo, br#"{"balance": 40, "withdrawal_limit": 500}"#).unwrap();
        assert_eq!(account, Account::new(40, 500));
    }

    #[rstest]
    #[case::garbage(b"not json".as_slice())]
    #[case::wrong_type(br#"{"balance": "lots", "withdrawal_limit": 500}"#.as_slice())]
    #[case::bad_day(br#"{"balance": 1, "withdrawal_limit": 5, "amount_withdrawn_today": 0, "last_withdrawal_day": 32}"#.as_slice())]
    fn corrupt_records(bilbo: AccountId, #[case] bytes: &[u8]) {
        let res = Account::decode(&bilbo, bytes);
        assert!(matches!(res, Err(LedgerError::CorruptRecord { .. })));
    }
}
