// ink-staking/reward.rs - tiered reward accounting over vault balance and
// stake age. All amounts are u64 base units; UI conversion sits at the edge.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::constants::{
    INK_TOKEN_DECIMALS, REWARD_EPOCH_SECONDS, REWARD_RATE_HIGH, REWARD_RATE_LOW, REWARD_RATE_MID,
    VAULT_TIER_LOW_MAX, VAULT_TIER_MID_MAX,
};

/// Per-epoch reward rate for a vault balance, in base units.
///
/// Tiers are upper-inclusive, evaluated low to high: `(0, T1]` pays the low
/// rate, `(T1, T2]` the mid rate, and everything above `T2` the high rate.
/// A balance above the top tier's nominal ceiling still pays the high rate.
pub fn reward_rate(vault_balance: u64) -> u64 {
    if vault_balance <= VAULT_TIER_LOW_MAX {
        REWARD_RATE_LOW
    } else if vault_balance <= VAULT_TIER_MID_MAX {
        REWARD_RATE_MID
    } else {
        REWARD_RATE_HIGH
    }
}

/// Whole reward epochs elapsed since `staked_time`. A clock that reads
/// before the stake clamps to zero.
pub fn elapsed_epochs(staked_time: i64, now: i64) -> u64 {
    ((now - staked_time).max(0) / REWARD_EPOCH_SECONDS) as u64
}

/// Accrued reward in base units for one staked item.
pub fn accrued_reward(staked_time: i64, now: i64, vault_balance: u64) -> u64 {
    reward_rate(vault_balance).saturating_mul(elapsed_epochs(staked_time, now))
}

/// Scale a UI token amount to base units, rounded to the nearest unit.
pub fn ui_to_raw(ui_amount: f64) -> u64 {
    (ui_amount * INK_TOKEN_DECIMALS as f64).round() as u64
}

/// Base units to a UI token amount.
pub fn raw_to_ui(raw_amount: u64) -> f64 {
    raw_amount as f64 / INK_TOKEN_DECIMALS as f64
}

/// Current unix time in seconds.
pub fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}
