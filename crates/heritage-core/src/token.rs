//! Fungible token access
//!
//! The registry moves value only through an [`AssetTransferAgent`]: it reads
//! allowances and balances and asks for a single `transfer_from` when a
//! testament is claimed. [`TokenLedger`] is an in-memory, multi-token book
//! implementing the agent, used by the host and in tests.

use crate::address::Address;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Token amount in base units
pub type Amount = u128;

/// Errors reported by a token agent. A failed transfer moves nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Unknown token: {0}")]
    UnknownToken(Address),

    #[error("Insufficient allowance: {available} available, {required} required")]
    InsufficientAllowance { available: Amount, required: Amount },

    #[error("Insufficient balance: {available} available, {required} required")]
    InsufficientBalance { available: Amount, required: Amount },

    #[error("Balance overflow")]
    Overflow,
}

/// Interface to a fungible token, keyed by token contract address.
pub trait AssetTransferAgent {
    /// Amount `spender` may move out of `owner`'s balance.
    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Amount;

    fn balance_of(&self, token: &Address, owner: &Address) -> Amount;

    /// Move `amount` from `owner` to `to`, spending `spender`'s allowance.
    ///
    /// Must be all-or-nothing.
    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError>;
}

/// Balances and allowances for a single token
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenBook {
    pub symbol: String,
    pub balances: BTreeMap<Address, Amount>,
    /// owner -> spender -> amount
    pub allowances: BTreeMap<Address, BTreeMap<Address, Amount>>,
}

impl TokenBook {
    fn balance(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(owner)
            .and_then(|spenders| spenders.get(spender))
            .copied()
            .unwrap_or(0)
    }
}

/// In-memory token ledger holding any number of tokens
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenLedger {
    pub tokens: BTreeMap<Address, TokenBook>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a token. Re-registering keeps existing balances.
    pub fn deploy(&mut self, token: Address, symbol: impl Into<String>) {
        let symbol = symbol.into();
        self.tokens
            .entry(token)
            .or_insert_with(|| TokenBook {
                symbol,
                ..TokenBook::default()
            });
    }

    pub fn has_token(&self, token: &Address) -> bool {
        self.tokens.contains_key(token)
    }

    /// Credit `amount` of `token` to `to`.
    pub fn mint(&mut self, token: &Address, to: &Address, amount: Amount) -> Result<(), TransferError> {
        let book = self.book_mut(token)?;
        let balance = book.balance(to);
        let credited = balance.checked_add(amount).ok_or(TransferError::Overflow)?;
        book.balances.insert(*to, credited);
        log::debug!("Minted {} of {} to {}", amount, token.short(), to.short());
        Ok(())
    }

    /// Set `spender`'s allowance on `owner`'s balance, replacing any previous value.
    pub fn approve(
        &mut self,
        token: &Address,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let book = self.book_mut(token)?;
        book.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, amount);
        log::debug!(
            "{} approved {} to spend {} of {}",
            owner.short(),
            spender.short(),
            amount,
            token.short()
        );
        Ok(())
    }

    fn book_mut(&mut self, token: &Address) -> Result<&mut TokenBook, TransferError> {
        self.tokens
            .get_mut(token)
            .ok_or(TransferError::UnknownToken(*token))
    }
}

impl AssetTransferAgent for TokenLedger {
    fn allowance(&self, token: &Address, owner: &Address, spender: &Address) -> Amount {
        self.tokens
            .get(token)
            .map(|book| book.allowance(owner, spender))
            .unwrap_or(0)
    }

    fn balance_of(&self, token: &Address, owner: &Address) -> Amount {
        self.tokens
            .get(token)
            .map(|book| book.balance(owner))
            .unwrap_or(0)
    }

    fn transfer_from(
        &mut self,
        token: &Address,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let book = self.book_mut(token)?;
        if amount == 0 {
            return Ok(());
        }

        // Check everything before touching any entry
        let allowed = book.allowance(owner, spender);
        if allowed < amount {
            return Err(TransferError::InsufficientAllowance {
                available: allowed,
                required: amount,
            });
        }
        let from_balance = book.balance(owner);
        if from_balance < amount {
            return Err(TransferError::InsufficientBalance {
                available: from_balance,
                required: amount,
            });
        }
        let to_balance = if owner == to {
            from_balance - amount
        } else {
            book.balance(to)
        };
        let credited = to_balance
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;

        book.balances.insert(*owner, from_balance - amount);
        book.balances.insert(*to, credited);
        book.allowances
            .entry(*owner)
            .or_default()
            .insert(*spender, allowed - amount);
        Ok(())
    }
}
