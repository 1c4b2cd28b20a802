use soroban_sdk::{contracttype, Address, Bytes, Env, IntoVal, String, TryFromVal, Val, Vec};

use crate::{ContractError, TokenEntry};

const DAY_IN_LEDGERS: u32 = 17280;

pub const INSTANCE_TTL_EXTEND: u32 = 30 * DAY_IN_LEDGERS;
pub const INSTANCE_TTL_THRESHOLD: u32 = INSTANCE_TTL_EXTEND - DAY_IN_LEDGERS;

pub const PERSISTENT_TTL_EXTEND: u32 = 120 * DAY_IN_LEDGERS;
pub const PERSISTENT_TTL_THRESHOLD: u32 = PERSISTENT_TTL_EXTEND - 20 * DAY_IN_LEDGERS;

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Owner,
    FeeToken,
    Fee,
    Balance,
    NextId,
    Count,
    /// Live entry by id.
    Entry(u32),
    /// Dense position -> id.
    Slot(u32),
    /// id -> dense position.
    Position(u32),
    AddressIndex(Address),
    TickerIndex(String),
    Meta(u32, String),
    MetaKeys(u32),
}

pub fn extend_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn extend_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

fn read_persistent<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: TryFromVal<Env, Val>,
{
    let value = env.storage().persistent().get(key);
    if value.is_some() {
        extend_persistent(env, key);
    }
    value
}

fn write_persistent<V>(env: &Env, key: &DataKey, value: &V)
where
    V: IntoVal<Env, Val>,
{
    env.storage().persistent().set(key, value);
    extend_persistent(env, key);
}

// ============================================================================
// Registry settings
// ============================================================================

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Owner)
}

pub fn get_owner(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&DataKey::Owner, owner);
}

pub fn get_fee_token(env: &Env) -> Result<Address, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::FeeToken)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_fee_token(env: &Env, fee_token: &Address) {
    env.storage().instance().set(&DataKey::FeeToken, fee_token);
}

pub fn get_fee(env: &Env) -> Result<i128, ContractError> {
    env.storage()
        .instance()
        .get(&DataKey::Fee)
        .ok_or(ContractError::NotInitialized)
}

pub fn set_fee(env: &Env, fee: i128) {
    env.storage().instance().set(&DataKey::Fee, &fee);
}

pub fn get_balance(env: &Env) -> i128 {
    env.storage().instance().get(&DataKey::Balance).unwrap_or(0)
}

pub fn set_balance(env: &Env, balance: i128) {
    env.storage().instance().set(&DataKey::Balance, &balance);
}

pub fn get_count(env: &Env) -> u32 {
    env.storage().instance().get(&DataKey::Count).unwrap_or(0)
}

fn set_count(env: &Env, count: u32) {
    env.storage().instance().set(&DataKey::Count, &count);
}

/// Hands out the next entry id. Ids are never reused.
pub fn next_id(env: &Env) -> Result<u32, ContractError> {
    let id: u32 = env.storage().instance().get(&DataKey::NextId).unwrap_or(0);
    let next = id.checked_add(1).ok_or(ContractError::Overflow)?;
    env.storage().instance().set(&DataKey::NextId, &next);
    Ok(id)
}

// ============================================================================
// Entries
// ============================================================================

pub fn get_entry(env: &Env, id: u32) -> Option<TokenEntry> {
    read_persistent(env, &DataKey::Entry(id))
}

pub fn set_entry(env: &Env, entry: &TokenEntry) {
    write_persistent(env, &DataKey::Entry(entry.id), entry);
}

pub fn get_slot(env: &Env, index: u32) -> Option<u32> {
    read_persistent(env, &DataKey::Slot(index))
}

/// Appends `entry` at the end of the dense collection and indexes it.
pub fn insert_entry(env: &Env, entry: &TokenEntry) {
    let slot = get_count(env);

    set_entry(env, entry);
    write_persistent(env, &DataKey::Slot(slot), &entry.id);
    write_persistent(env, &DataKey::Position(entry.id), &slot);
    set_address_index(env, &entry.address, entry.id);
    write_persistent(env, &DataKey::TickerIndex(entry.ticker.clone()), &entry.id);

    set_count(env, slot + 1);
}

/// Removes `entry` from the dense collection and both indexes. The entry in
/// the last slot is moved into the freed slot so that slots stay gapless.
pub fn remove_entry(env: &Env, entry: &TokenEntry) -> Result<(), ContractError> {
    let storage = env.storage().persistent();

    let slot: u32 = read_persistent(env, &DataKey::Position(entry.id))
        .ok_or(ContractError::NotFound)?;
    let last = get_count(env)
        .checked_sub(1)
        .ok_or(ContractError::NotFound)?;

    if slot != last {
        let moved: u32 =
            read_persistent(env, &DataKey::Slot(last)).ok_or(ContractError::NotFound)?;
        write_persistent(env, &DataKey::Slot(slot), &moved);
        write_persistent(env, &DataKey::Position(moved), &slot);
    }

    storage.remove(&DataKey::Slot(last));
    storage.remove(&DataKey::Position(entry.id));
    storage.remove(&DataKey::Entry(entry.id));
    storage.remove(&DataKey::AddressIndex(entry.address.clone()));
    storage.remove(&DataKey::TickerIndex(entry.ticker.clone()));

    set_count(env, last);
    Ok(())
}

// ============================================================================
// Indexes
// ============================================================================

pub fn get_id_by_address(env: &Env, address: &Address) -> Option<u32> {
    read_persistent(env, &DataKey::AddressIndex(address.clone()))
}

pub fn set_address_index(env: &Env, address: &Address, id: u32) {
    write_persistent(env, &DataKey::AddressIndex(address.clone()), &id);
}

pub fn remove_address_index(env: &Env, address: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::AddressIndex(address.clone()));
}

pub fn get_id_by_ticker(env: &Env, ticker: &String) -> Option<u32> {
    read_persistent(env, &DataKey::TickerIndex(ticker.clone()))
}

// ============================================================================
// Metadata
// ============================================================================

pub fn get_meta(env: &Env, id: u32, key: &String) -> Option<Bytes> {
    read_persistent(env, &DataKey::Meta(id, key.clone()))
}

pub fn get_meta_keys(env: &Env, id: u32) -> Vec<String> {
    read_persistent(env, &DataKey::MetaKeys(id)).unwrap_or(Vec::new(env))
}

/// Stores `value` under `(id, key)` and records `key` for enumeration.
pub fn set_meta(env: &Env, id: u32, key: &String, value: &Bytes) {
    let meta_key = DataKey::Meta(id, key.clone());

    if !env.storage().persistent().has(&meta_key) {
        let mut keys = get_meta_keys(env, id);
        keys.push_back(key.clone());
        write_persistent(env, &DataKey::MetaKeys(id), &keys);
    }

    write_persistent(env, &meta_key, value);
}
