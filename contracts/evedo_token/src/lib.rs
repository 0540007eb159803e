#![cfg_attr(not(feature = "std"), no_std, no_main)]

/// EVEDO TOKEN
/// Fixed-supply fungible ledger sold through the exclusive sale.
/// The whole supply is minted to the deployer, who funds the sale from it.

pub mod constants {
    pub const TOKEN_NAME: &str = "Evedo Token";
    pub const TOKEN_SYMBOL: &str = "EVED";
    pub const TOKEN_DECIMALS: u8 = 18;
}

pub use self::evedo_token::{Error, EvedoToken, EvedoTokenRef};

#[ink::contract]
mod evedo_token {
    use crate::constants::*;
    use ink::prelude::string::{String, ToString};
    use ink::storage::Mapping;

    #[ink(storage)]
    pub struct EvedoToken {
        balances: Mapping<AccountId, Balance>,
        allowances: Mapping<(AccountId, AccountId), Balance>,
        total_supply: Balance,
    }

    #[ink(event)]
    pub struct Transfer {
        #[ink(topic)] from: Option<AccountId>,
        #[ink(topic)] to: Option<AccountId>,
        value: Balance,
    }

    #[ink(event)]
    pub struct Approval {
        #[ink(topic)] owner: AccountId,
        #[ink(topic)] spender: AccountId,
        value: Balance,
    }

    #[derive(Debug, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        InsufficientBalance,
        InsufficientAllowance,
        ZeroTransfer,
    }

    pub type Result<T> = core::result::Result<T, Error>;

    impl EvedoToken {
        #[ink(constructor)]
        pub fn new(total_supply: Balance) -> Self {
            let caller = Self::env().caller();
            let mut balances = Mapping::default();
            balances.insert(caller, &total_supply);

            Self::env().emit_event(Transfer {
                from: None,
                to: Some(caller),
                value: total_supply,
            });

            Self {
                balances,
                allowances: Mapping::default(),
                total_supply,
            }
        }

        // ERC-20 Standard Functions
        #[ink(message)]
        pub fn total_supply(&self) -> Balance {
            self.total_supply
        }

        #[ink(message)]
        pub fn balance_of(&self, owner: AccountId) -> Balance {
            self.balances.get(owner).unwrap_or(0)
        }

        #[ink(message)]
        pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Balance {
            self.allowances.get((owner, spender)).unwrap_or(0)
        }

        #[ink(message)]
        pub fn approve(&mut self, spender: AccountId, value: Balance) -> Result<()> {
            let owner = self.env().caller();
            self.allowances.insert((owner, spender), &value);
            self.env().emit_event(Approval { owner, spender, value });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, value: Balance) -> Result<()> {
            let from = self.env().caller();
            self.process_transfer(from, to, value)
        }

        #[ink(message)]
        pub fn transfer_from(&mut self, from: AccountId, to: AccountId, value: Balance) -> Result<()> {
            let caller = self.env().caller();
            let allowance = self.allowance(from, caller);
            if allowance < value {
                return Err(Error::InsufficientAllowance);
            }

            self.process_transfer(from, to, value)?;
            self.allowances.insert((from, caller), &(allowance - value));
            Ok(())
        }

        // Metadata
        #[ink(message)]
        pub fn token_name(&self) -> String {
            TOKEN_NAME.to_string()
        }

        #[ink(message)]
        pub fn token_symbol(&self) -> String {
            TOKEN_SYMBOL.to_string()
        }

        #[ink(message)]
        pub fn token_decimals(&self) -> u8 {
            TOKEN_DECIMALS
        }

        fn process_transfer(&mut self, from: AccountId, to: AccountId, value: Balance) -> Result<()> {
            if value == 0 {
                return Err(Error::ZeroTransfer);
            }

            let from_bal = self.balance_of(from);
            if from_bal < value {
                return Err(Error::InsufficientBalance);
            }

            // Debit before reading `to` so a self-transfer nets to zero
            self.balances.insert(from, &(from_bal - value));
            let to_bal = self.balance_of(to);
            self.balances.insert(to, &(to_bal + value));

            self.env().emit_event(Transfer { from: Some(from), to: Some(to), value });
            Ok(())
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================

}
