//! Per-user holdings of the two market assets.
//!
//! ## Policy notes
//!
//! Accounts are provisioned externally; no ledger operation creates an
//! account on lookup miss. Operations touching a missing account are
//! explicit, named no-ops ([`TransferOutcome::UnknownParty`],
//! [`CreditOutcome::UnknownUser`]) rather than errors, matching the
//! reference behavior. Holdings are signed and may go negative: no
//! non-negative-balance enforcement exists in the reference behavior
//! (implicit short positions are an open question, preserved as-is).

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::warn;

use crate::types::price::notional;
use crate::types::{Asset, UserId};

/// Holdings of the two recognized assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Balances {
    /// Traded-unit holding
    pub base: Decimal,
    /// Funding-currency holding
    pub quote: Decimal,
}

impl Balances {
    /// Create balances from the two amounts
    pub fn new(base: Decimal, quote: Decimal) -> Self {
        Self { base, quote }
    }

    /// Zero holdings for both assets
    pub fn zero() -> Self {
        Self::default()
    }

    /// Holding of the given asset
    pub fn get(&self, asset: Asset) -> Decimal {
        match asset {
            Asset::Base => self.base,
            Asset::Quote => self.quote,
        }
    }
}

/// Outcome of a trade settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    /// Both legs applied atomically
    Settled,
    /// Seller or buyer account does not exist; nothing was mutated
    UnknownParty,
}

/// Outcome of an external funding credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditOutcome {
    /// Amount added to the user's holding
    Credited,
    /// Account does not exist; nothing was mutated
    UnknownUser,
}

/// The balance ledger: user id -> holdings of the two assets.
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: HashMap<UserId, Balances>,
}

impl Ledger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger pre-provisioned with the given accounts
    pub fn with_accounts<I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = (UserId, Balances)>,
    {
        Self {
            accounts: accounts.into_iter().collect(),
        }
    }

    /// Provision (or replace) an account.
    ///
    /// This is the seam for the external system that owns account
    /// lifecycle; nothing inside the core calls it.
    pub fn provision(&mut self, user: UserId, balances: Balances) {
        self.accounts.insert(user, balances);
    }

    /// Check whether an account exists
    pub fn contains(&self, user: &UserId) -> bool {
        self.accounts.contains_key(user)
    }

    /// Number of provisioned accounts
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    /// Settle one trade between two accounts, atomically:
    ///
    /// - seller: base -= quantity, quote += quantity * price
    /// - buyer:  base += quantity, quote -= quantity * price
    ///
    /// `quantity` and `price` are fixed-point (scaled by 10^8); the
    /// funding-currency leg is computed exactly in `Decimal`, so the amount
    /// removed from the buyer always equals the amount added to the seller.
    ///
    /// If either account does not exist the whole operation is a no-op and
    /// returns [`TransferOutcome::UnknownParty`].
    pub fn transfer(
        &mut self,
        seller: &UserId,
        buyer: &UserId,
        quantity: u64,
        price: u64,
    ) -> TransferOutcome {
        if !self.accounts.contains_key(seller) || !self.accounts.contains_key(buyer) {
            warn!(%seller, %buyer, "settlement skipped: unknown party");
            return TransferOutcome::UnknownParty;
        }

        let qty = crate::types::price::fixed_to_decimal(quantity);
        let value = notional(price, quantity);

        // Both parties verified above; the four legs cannot partially apply.
        {
            let account = self.accounts.get_mut(seller).expect("seller verified");
            account.base -= qty;
            account.quote += value;
        }
        {
            let account = self.accounts.get_mut(buyer).expect("buyer verified");
            account.base += qty;
            account.quote -= value;
        }

        TransferOutcome::Settled
    }

    /// Holdings for a user.
    ///
    /// Unknown users get a zero-valued view over the two recognized assets;
    /// no account record is created.
    pub fn balance_of(&self, user: &UserId) -> Balances {
        self.accounts.get(user).copied().unwrap_or_else(Balances::zero)
    }

    /// Credit an external funding amount to a user's holding.
    ///
    /// Increment-only; unknown users are a named no-op.
    pub fn credit_external(&mut self, user: &UserId, asset: Asset, amount: Decimal) -> CreditOutcome {
        match self.accounts.get_mut(user) {
            Some(account) => {
                match asset {
                    Asset::Base => account.base += amount,
                    Asset::Quote => account.quote += amount,
                }
                CreditOutcome::Credited
            }
            None => {
                warn!(%user, "external credit skipped: unknown user");
                CreditOutcome::UnknownUser
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
