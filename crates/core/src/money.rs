//! Account kinds, transaction kinds, and the balance arithmetic that ties
//! them together.
//!
//! Amounts are [`Decimal`] throughout so balance changes are exact. No lower
//! bound is placed on a balance: overdraft is a legitimate state.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Account kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Current,
    FixedDeposit,
    CreditCard,
}

impl AccountType {
    pub fn as_str(self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Current => "Current",
            AccountType::FixedDeposit => "FixedDeposit",
            AccountType::CreditCard => "CreditCard",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Savings" => Ok(AccountType::Savings),
            "Current" => Ok(AccountType::Current),
            "FixedDeposit" => Ok(AccountType::FixedDeposit),
            "CreditCard" => Ok(AccountType::CreditCard),
            other => Err(CoreError::Validation(format!(
                "Unknown account type '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for AccountType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Transaction kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }

    /// The signed change this kind of transaction applies to a balance.
    pub fn signed(self, amount: Decimal) -> Decimal {
        match self {
            TransactionType::Income => amount,
            TransactionType::Expense => -amount,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Income" => Ok(TransactionType::Income),
            "Expense" => Ok(TransactionType::Expense),
            other => Err(CoreError::Validation(format!(
                "Unknown transaction type '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for TransactionType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Balance adjustments
// ---------------------------------------------------------------------------

/// A signed change to one account's balance, applied by the persistence
/// layer in the same unit of work as the transaction row it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceAdjustment {
    pub account_id: DbId,
    pub delta: Decimal,
}

impl BalanceAdjustment {
    /// The adjustment produced by posting a transaction.
    pub fn posting(account_id: &str, kind: TransactionType, amount: Decimal) -> Self {
        Self {
            account_id: account_id.to_string(),
            delta: kind.signed(amount),
        }
    }

    /// The adjustment that undoes a previous posting.
    pub fn reversal(account_id: &str, kind: TransactionType, amount: Decimal) -> Self {
        Self {
            account_id: account_id.to_string(),
            delta: -kind.signed(amount),
        }
    }
}

/// Adjustments needed to move a posted transaction from its old shape to
/// its new one.
///
/// The old posting is reversed on the old account and the new posting is
/// applied on the new account. When both land on the same account they are
/// folded into one net adjustment, and a zero net change yields nothing.
pub fn repost(
    old_account: &str,
    old_kind: TransactionType,
    old_amount: Decimal,
    new_account: &str,
    new_kind: TransactionType,
    new_amount: Decimal,
) -> Vec<BalanceAdjustment> {
    let reversal = BalanceAdjustment::reversal(old_account, old_kind, old_amount);
    let posting = BalanceAdjustment::posting(new_account, new_kind, new_amount);

    if old_account == new_account {
        let net = reversal.delta + posting.delta;
        if net.is_zero() {
            return Vec::new();
        }
        return vec![BalanceAdjustment {
            account_id: old_account.to_string(),
            delta: net,
        }];
    }

    vec![reversal, posting]
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn income_adds_and_expense_subtracts() {
        assert_eq!(TransactionType::Income.signed(dec!(50.25)), dec!(50.25));
        assert_eq!(TransactionType::Expense.signed(dec!(50.25)), dec!(-50.25));
    }

    #[test]
    fn reversal_negates_posting() {
        let posting = BalanceAdjustment::posting("a", TransactionType::Expense, dec!(10));
        let reversal = BalanceAdjustment::reversal("a", TransactionType::Expense, dec!(10));
        assert_eq!(posting.delta + reversal.delta, Decimal::ZERO);
    }

    #[test]
    fn repost_same_account_nets_out() {
        let adjustments = repost(
            "a",
            TransactionType::Income,
            dec!(100),
            "a",
            TransactionType::Income,
            dec!(80),
        );
        assert_eq!(
            adjustments,
            vec![BalanceAdjustment {
                account_id: "a".into(),
                delta: dec!(-20),
            }]
        );
    }

    #[test]
    fn repost_kind_flip_moves_twice_the_amount() {
        let adjustments = repost(
            "a",
            TransactionType::Income,
            dec!(30),
            "a",
            TransactionType::Expense,
            dec!(30),
        );
        assert_eq!(adjustments[0].delta, dec!(-60));
    }

    #[test]
    fn repost_unchanged_is_empty() {
        let adjustments = repost(
            "a",
            TransactionType::Expense,
            dec!(5),
            "a",
            TransactionType::Expense,
            dec!(5),
        );
        assert!(adjustments.is_empty());
    }

    #[test]
    fn repost_across_accounts_touches_both() {
        let adjustments = repost(
            "a",
            TransactionType::Income,
            dec!(40),
            "b",
            TransactionType::Income,
            dec!(40),
        );
        assert_eq!(adjustments.len(), 2);
        assert_eq!(adjustments[0].account_id, "a");
        assert_eq!(adjustments[0].delta, dec!(-40));
        assert_eq!(adjustments[1].account_id, "b");
        assert_eq!(adjustments[1].delta, dec!(40));
    }

    #[test]
    fn account_type_parses_exact_names_only() {
        assert_eq!("FixedDeposit".parse::<AccountType>().ok(), Some(AccountType::FixedDeposit));
        assert!("savings".parse::<AccountType>().is_err());
    }

    #[test]
    fn unknown_transaction_type_is_a_validation_error() {
        assert_matches!("Expense".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert_matches!(
            "Refund".parse::<TransactionType>(),
            Err(CoreError::Validation(msg)) if msg.contains("Refund")
        );
    }
}
