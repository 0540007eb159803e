#![cfg_attr(not(feature = "std"), no_std, no_main)]

/// EVEDO EXCLUSIVE SALE
/// Fixed-rate sale of EVED against the native currency.
/// Lifecycle: Open ⇄ Closed → Finalized (terminal, unsold EVED swept to the controller).

pub mod constants {
    /// Base units per whole coin, for both the native currency and EVED.
    pub const UNIT: u128 = 1_000_000_000_000_000_000;
    pub const NATIVE_DECIMALS: u8 = 18;
    pub const TOKEN_DECIMALS: u8 = 18;
    /// Token base units per native base unit on top of the rate.
    pub const DECIMALS_SCALE: u128 = 10u128.pow((TOKEN_DECIMALS - NATIVE_DECIMALS) as u32);

    /// 2000 coins.
    pub const DEFAULT_CAP: u128 = 2_000 * UNIT;
    pub const DEFAULT_RATE: u128 = 2_700;

    pub const ZERO_ACCOUNT: [u8; 32] = [0u8; 32];
}

pub use self::evedo_exclusive_sale::{Error, EvedoExclusiveSale, SaleState};

#[ink::contract]
mod evedo_exclusive_sale {
    use crate::constants::*;
    use ink::env::call::{build_call, ExecutionInput, Selector};
    use ink::env::DefaultEnvironment;

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct EvedoExclusiveSale {
        controller: AccountId,
        token: AccountId,
        rate: Balance,
        cap: Balance,
        total_raised: Balance,
        is_open: bool,
        is_finalized: bool,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    #[ink(event)]
    pub struct TokensPurchased {
        #[ink(topic)] buyer: AccountId,
        value: Balance,
        tokens: Balance,
    }

    #[ink(event)]
    pub struct Opened {
        #[ink(topic)] by: AccountId,
    }

    #[ink(event)]
    pub struct Closed {
        #[ink(topic)] by: AccountId,
    }

    #[ink(event)]
    pub struct Finalized {
        #[ink(topic)] by: AccountId,
        unsold_returned: Balance,
        total_raised: Balance,
    }

    // =========================================================================
    // ERRORS
    // =========================================================================

    #[derive(Debug, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum Error {
        InvalidConfiguration,
        ZeroContribution,
        SaleClosed,
        SaleFinalized,
        CapExceeded,
        TransferFailed,
        PayoutFailed,
        Unauthorized,
        AlreadyFinalized,
        Overflow,
    }

    pub type Result<T> = core::result::Result<T, Error>;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
    #[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
    pub enum SaleState {
        Open,
        Closed,
        Finalized,
    }

    // =========================================================================
    // TOKEN LEDGER
    // =========================================================================

    /// The two ledger operations the sale relies on. Transfers always debit
    /// the sale's own balance.
    pub trait TokenLedger {
        fn balance_of(&self, owner: AccountId) -> Result<Balance>;
        fn transfer(&mut self, to: AccountId, amount: Balance) -> Result<()>;
    }

    /// EVED ledger reached through cross-contract calls.
    pub struct TokenContract {
        address: AccountId,
    }

    impl TokenContract {
        pub fn new(address: AccountId) -> Self {
            Self { address }
        }
    }

    impl TokenLedger for TokenContract {
        fn balance_of(&self, owner: AccountId) -> Result<Balance> {
            let result = build_call::<DefaultEnvironment>()
                .call(self.address)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!("balance_of")))
                        .push_arg(owner)
                )
                .returns::<Balance>()
                .try_invoke();

            match result {
                Ok(Ok(balance)) => Ok(balance),
                _ => Err(Error::TransferFailed),
            }
        }

        fn transfer(&mut self, to: AccountId, amount: Balance) -> Result<()> {
            let result = build_call::<DefaultEnvironment>()
                .call(self.address)
                .exec_input(
                    ExecutionInput::new(Selector::new(ink::selector_bytes!("transfer")))
                        .push_arg(to)
                        .push_arg(amount)
                )
                .returns::<core::result::Result<(), evedo_token::Error>>()
                .try_invoke();

            match result {
                Ok(Ok(Ok(()))) => Ok(()),
                _ => Err(Error::TransferFailed),
            }
        }
    }

    impl EvedoExclusiveSale {
        #[ink(constructor)]
        pub fn new(rate: Balance, controller: AccountId, token: AccountId) -> Result<Self> {
            Self::with_cap(rate, controller, token, DEFAULT_CAP)
        }

        #[ink(constructor)]
        pub fn with_cap(
            rate: Balance,
            controller: AccountId,
            token: AccountId,
            cap: Balance,
        ) -> Result<Self> {
            let zero = AccountId::from(ZERO_ACCOUNT);
            if rate == 0 || cap == 0 || token == zero || controller == zero {
                return Err(Error::InvalidConfiguration);
            }
            // Every in-cap purchase must have a representable token amount
            cap.checked_mul(rate)
                .and_then(|tokens| tokens.checked_mul(DECIMALS_SCALE))
                .ok_or(Error::InvalidConfiguration)?;

            Ok(Self {
                controller,
                token,
                rate,
                cap,
                total_raised: 0,
                is_open: true,
                is_finalized: false,
            })
        }

        // =================================================================
        // PURCHASE
        // =================================================================

        /// Buys EVED with the attached value at the fixed rate.
        /// Returns the amount of EVED delivered to the caller.
        #[ink(message, payable)]
        pub fn buy(&mut self) -> Result<Balance> {
            let buyer = self.env().caller();
            let value = self.env().transferred_value();
            let mut ledger = TokenContract::new(self.token);
            self.purchase(&mut ledger, buyer, value)
        }

        fn purchase<L: TokenLedger>(
            &mut self,
            ledger: &mut L,
            buyer: AccountId,
            value: Balance,
        ) -> Result<Balance> {
            if value == 0 {
                return Err(Error::ZeroContribution);
            }

            match self.state() {
                SaleState::Finalized => return Err(Error::SaleFinalized),
                SaleState::Closed => return Err(Error::SaleClosed),
                SaleState::Open => {}
            }

            // Over-cap contributions are rejected whole, never truncated
            let raised = self
                .total_raised
                .checked_add(value)
                .ok_or(Error::CapExceeded)?;
            if raised > self.cap {
                return Err(Error::CapExceeded);
            }

            let tokens = self.quote(value)?;

            ledger.transfer(buyer, tokens)?;
            self.env()
                .transfer(self.controller, value)
                .map_err(|_| Error::PayoutFailed)?;

            self.total_raised = raised;

            self.env().emit_event(TokensPurchased { buyer, value, tokens });
            Ok(tokens)
        }

        // =================================================================
        // ADMINISTRATION
        // =================================================================

        #[ink(message)]
        pub fn open(&mut self) -> Result<()> {
            self.only_controller()?;
            if !self.is_open {
                self.is_open = true;
                self.env().emit_event(Opened { by: self.controller });
            }
            Ok(())
        }

        #[ink(message)]
        pub fn close(&mut self) -> Result<()> {
            self.only_controller()?;
            if self.is_open {
                self.is_open = false;
                self.env().emit_event(Closed { by: self.controller });
            }
            Ok(())
        }

        /// Ends the sale for good and returns every unsold EVED to the
        /// controller. Returns the amount swept.
        #[ink(message)]
        pub fn finalize(&mut self) -> Result<Balance> {
            let mut ledger = TokenContract::new(self.token);
            self.finalize_with(&mut ledger)
        }

        fn finalize_with<L: TokenLedger>(&mut self, ledger: &mut L) -> Result<Balance> {
            self.only_controller()?;
            if self.is_finalized {
                return Err(Error::AlreadyFinalized);
            }

            let unsold = ledger.balance_of(self.env().account_id())?;
            if unsold > 0 {
                ledger.transfer(self.controller, unsold)?;
            }

            self.is_finalized = true;

            self.env().emit_event(Finalized {
                by: self.controller,
                unsold_returned: unsold,
                total_raised: self.total_raised,
            });
            Ok(unsold)
        }

        fn only_controller(&self) -> Result<()> {
            if self.env().caller() != self.controller {
                return Err(Error::Unauthorized);
            }
            Ok(())
        }

        // =================================================================
        // VIEWS
        // =================================================================

        /// EVED base units bought by `value` native base units.
        #[ink(message)]
        pub fn quote(&self, value: Balance) -> Result<Balance> {
            value
                .checked_mul(self.rate)
                .and_then(|tokens| tokens.checked_mul(DECIMALS_SCALE))
                .ok_or(Error::Overflow)
        }

        #[ink(message)]
        pub fn state(&self) -> SaleState {
            if self.is_finalized {
                SaleState::Finalized
            } else if self.is_open {
                SaleState::Open
            } else {
                SaleState::Closed
            }
        }

        #[ink(message)]
        pub fn rate(&self) -> Balance {
            self.rate
        }

        #[ink(message)]
        pub fn cap(&self) -> Balance {
            self.cap
        }

        #[ink(message)]
        pub fn total_raised(&self) -> Balance {
            self.total_raised
        }

        #[ink(message)]
        pub fn remaining_cap(&self) -> Balance {
            self.cap.saturating_sub(self.total_raised)
        }

        #[ink(message)]
        pub fn controller(&self) -> AccountId {
            self.controller
        }

        #[ink(message)]
        pub fn token(&self) -> AccountId {
            self.token
        }

        #[ink(message)]
        pub fn is_open(&self) -> bool {
            self.is_open
        }

        #[ink(message)]
        pub fn is_finalized(&self) -> bool {
            self.is_finalized
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================

}
