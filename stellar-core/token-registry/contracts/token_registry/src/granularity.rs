use soroban_sdk::{contractclient, Address, Env};

use crate::ContractError;

/// The only capability the registry needs from a registered token. Any
/// contract implementing the standard token interface satisfies it.
#[allow(dead_code)]
#[contractclient(name = "GranularityClient")]
pub trait Granularity {
    fn decimals(env: Env) -> u32;
}

/// Reads the token's smallest-unit granularity as `10^decimals`.
pub fn fetch_base(env: &Env, address: &Address) -> Result<u128, ContractError> {
    let decimals = GranularityClient::new(env, address).decimals();

    10u128
        .checked_pow(decimals)
        .ok_or(ContractError::InvalidBase)
}
