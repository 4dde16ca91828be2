// ink-staking/constants.rs

use std::time::Duration;

use solana_program::{pubkey, pubkey::Pubkey};

/// Anchor account and instruction data starts with an 8-byte discriminator.
pub const ANCHOR_DISCRIMINATOR_SIZE: usize = 8;

pub const STAKING_PROGRAM_ID: Pubkey = pubkey!("ATvVsqAYMsUccCqiJFXbDQ4JxPW3ZER8h5K4co7Cx1y");
pub const INK_TOKEN_MINT: Pubkey = pubkey!("JA552EChGJjhvMMcWrDjmqFqdNYPVFSDgumYUS3KRjvA");
pub const TOKEN_METADATA_PROGRAM_ID: Pubkey =
    pubkey!("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s");

pub const GLOBAL_AUTHORITY_SEED: &[u8] = b"global-authority";
/// Seed string for the per-user pool account (create-with-seed derivation,
/// not a program-derived address).
pub const USER_POOL_SEED: &str = "user-pool";
pub const METADATA_SEED: &[u8] = b"metadata";

pub const INK_TOKEN_DECIMALS: u64 = 1_000_000_000; // 1e9 base units per token

/// GlobalPool account: discriminator + super_admin + total_staked_count.
pub const GLOBAL_POOL_SIZE: usize = 8 + 32 + 8;
/// One staked slot record: mint + staked_time + lock_time + reward_amount.
pub const STAKED_DATA_SIZE: usize = 32 + 8 + 8 + 8;
pub const USER_POOL_CAPACITY: usize = 100;
/// UserPool account: discriminator + owner + staked_count + slot array.
/// Used both to size the created account and as the exact-size scan filter.
pub const USER_POOL_SIZE: usize = 8 + 32 + 8 + USER_POOL_CAPACITY * STAKED_DATA_SIZE;

/// Reward accrual is quantized in fixed epochs of this many seconds.
pub const REWARD_EPOCH_SECONDS: i64 = 600;

// Vault-balance tier bounds in base units. Tiers are upper-inclusive:
// (0, T1] earns the low rate, (T1, T2] the mid rate, above T2 the high
// rate, with T3 the top tier's nominal ceiling.
pub const VAULT_TIER_LOW_MAX: u64 = 15_000_000 * INK_TOKEN_DECIMALS;
pub const VAULT_TIER_MID_MAX: u64 = 30_000_000 * INK_TOKEN_DECIMALS;
pub const VAULT_TIER_HIGH_MAX: u64 = 50_000_000 * INK_TOKEN_DECIMALS;

// Per-epoch reward rates in base units (3.33 / 6.66 / 10 INK).
pub const REWARD_RATE_LOW: u64 = 3_330_000_000;
pub const REWARD_RATE_MID: u64 = 6_660_000_000;
pub const REWARD_RATE_HIGH: u64 = 10_000_000_000;

/// Transport-level retry count for raw transaction sends.
pub const SEND_RETRY_COUNT: usize = 3;

/// Poll cadence while waiting for a signature to finalize.
pub const CONFIRM_POLL_INTERVAL: Duration = Duration::from_millis(500);
