use soroban_sdk::{contracttype, symbol_short, Address, Bytes, Env, String, Symbol};

use crate::TokenEntry;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegisteredEvent {
    pub id: u32,
    pub address: Address,
    pub name: String,
    pub owner: Address,
    pub payment: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenUpdatedEvent {
    pub old_address: Address,
    pub new_address: Address,
    pub base: u128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MetaChangedEvent {
    pub key: String,
    pub value: Bytes,
}

pub fn registered(env: &Env, entry: &TokenEntry, payment: i128) {
    env.events().publish(
        (symbol_short!("register"), entry.ticker.clone()),
        RegisteredEvent {
            id: entry.id,
            address: entry.address.clone(),
            name: entry.name.clone(),
            owner: entry.owner.clone(),
            payment,
        },
    );
}

pub fn unregistered(env: &Env, entry: &TokenEntry) {
    env.events().publish(
        (Symbol::new(env, "unregistered"), entry.ticker.clone()),
        entry.id,
    );
}

pub fn token_updated(env: &Env, id: u32, old_address: Address, entry: &TokenEntry) {
    env.events().publish(
        (symbol_short!("updated"), id),
        TokenUpdatedEvent {
            old_address,
            new_address: entry.address.clone(),
            base: entry.base,
        },
    );
}

pub fn meta_changed(env: &Env, id: u32, key: &String, value: &Bytes) {
    env.events().publish(
        (symbol_short!("meta"), id),
        MetaChangedEvent {
            key: key.clone(),
            value: value.clone(),
        },
    );
}

pub fn fee_changed(env: &Env, old_fee: i128, new_fee: i128) {
    env.events()
        .publish((Symbol::new(env, "fee_changed"),), (old_fee, new_fee));
}

pub fn drained(env: &Env, to: &Address, amount: i128) {
    env.events()
        .publish((symbol_short!("drained"), to.clone()), amount);
}
