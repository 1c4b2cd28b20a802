//! Token registry contract
//!
//! Authoritative mapping from token contract addresses to a unique ticker,
//! a display name, the token's smallest-unit base and the account that
//! registered it, plus a free-form metadata store per entry.
//!
//! Entries are unique by address and by ticker. They are kept in a dense
//! collection (see [`TokenRegistry::token_at`]); removing an entry moves the
//! last one into the freed position, so positions are not stable across
//! `unregister` while ids are.
//!
//! Registration costs a fee paid in the configured fee token. Collected fees
//! stay with the registry until the registry owner drains them.
//!
//! Every invocation runs as a single atomic step on the ledger, and every
//! operation validates all of its preconditions before its first write.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, token, Address, Bytes, Env, String,
    Vec,
};

mod events;
mod granularity;
mod storage;


/// 0.05 of a 7-decimal native asset.
pub const DEFAULT_FEE: i128 = 500_000;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenEntry {
    pub id: u32,
    pub address: Address,
    pub ticker: String,
    pub name: String,
    pub base: u128,
    pub owner: Address,
}

#[contracterror]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    NotAuthorized = 3,
    NotFound = 4,
    InsufficientFee = 5,
    EmptyTicker = 6,
    EmptyName = 7,
    AddressTaken = 8,
    TickerTaken = 9,
    InvalidFee = 10,
    InvalidBase = 11,
    Overflow = 12,
}

impl ContractError {
    /// Whether the error rejects the input of a registration.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFee
                | Self::EmptyTicker
                | Self::EmptyName
                | Self::AddressTaken
                | Self::TickerTaken
        )
    }
}

#[contract]
pub struct TokenRegistry;

#[contractimpl]
impl TokenRegistry {
    /// Initialize the registry with its owner and the token fees are paid in
    pub fn initialize(env: Env, owner: Address, fee_token: Address) -> Result<(), ContractError> {
        if storage::is_initialized(&env) {
            return Err(ContractError::AlreadyInitialized);
        }

        owner.require_auth();

        storage::set_owner(&env, &owner);
        storage::set_fee_token(&env, &fee_token);
        storage::set_fee(&env, DEFAULT_FEE);
        storage::set_balance(&env, 0);
        storage::extend_instance(&env);

        Ok(())
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Register a token on behalf of `caller`, who becomes the entry owner
    pub fn register(
        env: Env,
        caller: Address,
        address: Address,
        ticker: String,
        name: String,
        payment: i128,
    ) -> Result<u32, ContractError> {
        caller.require_auth();

        Self::register_entry(
            &env,
            &caller,
            address,
            ticker,
            name,
            caller.clone(),
            payment,
        )
    }

    /// Register a token paid for by `caller` but owned by `owner`
    pub fn register_as(
        env: Env,
        caller: Address,
        address: Address,
        ticker: String,
        name: String,
        owner: Address,
        payment: i128,
    ) -> Result<u32, ContractError> {
        caller.require_auth();

        Self::register_entry(&env, &caller, address, ticker, name, owner, payment)
    }

    /// Remove an entry. Fees are not refunded and metadata is left in place.
    pub fn unregister(env: Env, caller: Address, id: u32) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let entry = storage::get_entry(&env, id).ok_or(ContractError::NotFound)?;
        storage::remove_entry(&env, &entry)?;
        storage::extend_instance(&env);

        log!(&env, "unregistered token", entry.id);
        events::unregistered(&env, &entry);

        Ok(())
    }

    /// Point an entry at a new token contract and refresh its base
    pub fn update_token(
        env: Env,
        caller: Address,
        id: u32,
        new_address: Address,
    ) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        let mut entry = storage::get_entry(&env, id).ok_or(ContractError::NotFound)?;

        match storage::get_id_by_address(&env, &new_address) {
            Some(other) if other != id => return Err(ContractError::AddressTaken),
            _ => {}
        }

        let base = granularity::fetch_base(&env, &new_address)?;

        let old_address = entry.address.clone();
        entry.address = new_address;
        entry.base = base;

        if old_address != entry.address {
            storage::remove_address_index(&env, &old_address);
            storage::set_address_index(&env, &entry.address, id);
        }
        storage::set_entry(&env, &entry);
        storage::extend_instance(&env);

        events::token_updated(&env, id, old_address, &entry);

        Ok(())
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Set a metadata value. Allowed for the entry owner and the registry owner.
    pub fn set_meta(
        env: Env,
        caller: Address,
        id: u32,
        key: String,
        value: Bytes,
    ) -> Result<(), ContractError> {
        caller.require_auth();

        let entry = storage::get_entry(&env, id).ok_or(ContractError::NotFound)?;
        if caller != entry.owner && caller != storage::get_owner(&env)? {
            return Err(ContractError::NotAuthorized);
        }

        storage::set_meta(&env, id, &key, &value);
        storage::extend_instance(&env);

        events::meta_changed(&env, id, &key, &value);

        Ok(())
    }

    /// Get a metadata value, empty if the key was never set
    pub fn meta(env: Env, id: u32, key: String) -> Result<Bytes, ContractError> {
        Self::require_live(&env, id)?;

        Ok(storage::get_meta(&env, id, &key).unwrap_or(Bytes::new(&env)))
    }

    /// Get every metadata key set on an entry, in the order first set
    pub fn meta_keys(env: Env, id: u32) -> Result<Vec<String>, ContractError> {
        Self::require_live(&env, id)?;

        Ok(storage::get_meta_keys(&env, id))
    }

    // ========================================================================
    // Lookups
    // ========================================================================

    /// Get an entry by id
    pub fn token(env: Env, id: u32) -> Result<TokenEntry, ContractError> {
        storage::get_entry(&env, id).ok_or(ContractError::NotFound)
    }

    /// Get the entry registered for a token address
    pub fn from_address(env: Env, address: Address) -> Result<TokenEntry, ContractError> {
        let id = storage::get_id_by_address(&env, &address).ok_or(ContractError::NotFound)?;
        Self::token(env, id)
    }

    /// Get the entry registered under a ticker
    pub fn from_ticker(env: Env, ticker: String) -> Result<TokenEntry, ContractError> {
        let id = storage::get_id_by_ticker(&env, &ticker).ok_or(ContractError::NotFound)?;
        Self::token(env, id)
    }

    /// Get the entry at a position of the dense collection
    pub fn token_at(env: Env, index: u32) -> Result<TokenEntry, ContractError> {
        let id = storage::get_slot(&env, index).ok_or(ContractError::NotFound)?;
        Self::token(env, id)
    }

    /// Get the number of live entries
    pub fn token_count(env: Env) -> u32 {
        storage::get_count(&env)
    }

    // ========================================================================
    // Admin Functions
    // ========================================================================

    /// Change the registration fee. Zero disables the fee.
    pub fn set_fee(env: Env, caller: Address, new_fee: i128) -> Result<(), ContractError> {
        caller.require_auth();
        Self::require_owner(&env, &caller)?;

        if new_fee < 0 {
            return Err(ContractError::InvalidFee);
        }

        let old_fee = storage::get_fee(&env)?;
        storage::set_fee(&env, new_fee);
        storage::extend_instance(&env);

        events::fee_changed(&env, old_fee, new_fee);

        Ok(())
    }

    /// Send every collected fee to the registry owner
    pub fn drain(env: Env, caller: Address) -> Result<i128, ContractError> {
        caller.require_auth();
        let owner = Self::require_owner(&env, &caller)?;

        let fee_token = storage::get_fee_token(&env)?;
        let amount = storage::get_balance(&env);
        storage::set_balance(&env, 0);
        storage::extend_instance(&env);

        if amount > 0 {
            token::Client::new(&env, &fee_token).transfer(
                &env.current_contract_address(),
                &owner,
                &amount,
            );
        }

        log!(&env, "drained fees", amount);
        events::drained(&env, &owner, amount);

        Ok(amount)
    }

    /// Get the current registration fee
    pub fn fee(env: Env) -> Result<i128, ContractError> {
        storage::get_fee(&env)
    }

    /// Fees collected and not yet drained
    pub fn balance(env: Env) -> i128 {
        storage::get_balance(&env)
    }

    /// Get the registry owner
    pub fn owner(env: Env) -> Result<Address, ContractError> {
        storage::get_owner(&env)
    }

    /// Get the token fees are paid in
    pub fn fee_token(env: Env) -> Result<Address, ContractError> {
        storage::get_fee_token(&env)
    }

    // ========================================================================
    // Helper Functions
    // ========================================================================

    fn register_entry(
        env: &Env,
        caller: &Address,
        address: Address,
        ticker: String,
        name: String,
        owner: Address,
        payment: i128,
    ) -> Result<u32, ContractError> {
        let fee = storage::get_fee(env)?;

        if payment < fee || payment < 0 {
            return Err(ContractError::InsufficientFee);
        }
        if ticker.len() == 0 {
            return Err(ContractError::EmptyTicker);
        }
        if name.len() == 0 {
            return Err(ContractError::EmptyName);
        }
        if storage::get_id_by_address(env, &address).is_some() {
            return Err(ContractError::AddressTaken);
        }
        if storage::get_id_by_ticker(env, &ticker).is_some() {
            return Err(ContractError::TickerTaken);
        }

        let fee_token = storage::get_fee_token(env)?;
        let base = granularity::fetch_base(env, &address)?;
        let balance = storage::get_balance(env)
            .checked_add(payment)
            .ok_or(ContractError::Overflow)?;
        let id = storage::next_id(env)?;

        if payment > 0 {
            token::Client::new(env, &fee_token).transfer(
                caller,
                &env.current_contract_address(),
                &payment,
            );
        }

        let entry = TokenEntry {
            id,
            address,
            ticker,
            name,
            base,
            owner,
        };

        storage::insert_entry(env, &entry);
        storage::set_balance(env, balance);
        storage::extend_instance(env);

        log!(env, "registered token", entry.id, entry.base);
        events::registered(env, &entry, payment);

        Ok(entry.id)
    }

    fn require_owner(env: &Env, caller: &Address) -> Result<Address, ContractError> {
        let owner = storage::get_owner(env)?;

        if *caller != owner {
            return Err(ContractError::NotAuthorized);
        }

        Ok(owner)
    }

    fn require_live(env: &Env, id: u32) -> Result<(), ContractError> {
        if storage::get_entry(env, id).is_none() {
            return Err(ContractError::NotFound);
        }

        Ok(())
    }
}
