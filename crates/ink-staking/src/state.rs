// ink-staking/state.rs - typed views of the program's on-chain accounts.

use anchor_lang::prelude::borsh;
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::constants::{
    ANCHOR_DISCRIMINATOR_SIZE, GLOBAL_POOL_SIZE, STAKED_DATA_SIZE, USER_POOL_CAPACITY,
    USER_POOL_SIZE,
};
use crate::error::DecodeError;
use crate::instruction::anchor_discriminator;

/// Singleton pool state stored at the global authority PDA.
#[derive(Debug, Clone, PartialEq, Eq, AnchorSerialize, AnchorDeserialize)]
pub struct GlobalPool {
    pub super_admin: Pubkey,
    pub total_staked_count: u64,
}

impl GlobalPool {
    /// Decode from raw account data: discriminator check, then Borsh fields.
    pub fn from_account_data(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < GLOBAL_POOL_SIZE {
            return Err(DecodeError::TooShort {
                expected: GLOBAL_POOL_SIZE,
                got: data.len(),
            });
        }
        if data[..ANCHOR_DISCRIMINATOR_SIZE] != anchor_discriminator("account", "GlobalPool") {
            return Err(DecodeError::Discriminator);
        }
        let mut body = &data[ANCHOR_DISCRIMINATOR_SIZE..GLOBAL_POOL_SIZE];
        Self::deserialize(&mut body).map_err(|_| DecodeError::TooShort {
            expected: GLOBAL_POOL_SIZE,
            got: data.len(),
        })
    }
}

/// One staked NFT slot. `lock_time` and `reward_amount` are carried in the
/// wire record but unused by the deployed program; reward math reads only
/// `staked_time`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakedData {
    pub mint: Pubkey,
    pub staked_time: i64,
    pub lock_time: i64,
    pub reward_amount: u64,
}

impl StakedData {
    /// Decode one slot record.
    pub fn from_bytes(record: &[u8]) -> Result<Self, DecodeError> {
        if record.len() < STAKED_DATA_SIZE {
            return Err(DecodeError::TooShort {
                expected: STAKED_DATA_SIZE,
                got: record.len(),
            });
        }
        let mut mint = [0u8; 32];
        mint.copy_from_slice(&record[..32]);
        Ok(Self {
            mint: Pubkey::new_from_array(mint),
            staked_time: read_reversed_u64(record, 32) as i64,
            lock_time: read_reversed_u64(record, 40) as i64,
            reward_amount: read_reversed_u64(record, 48),
        })
    }

    /// Encode one slot record in the wire layout.
    pub fn to_bytes(&self) -> [u8; STAKED_DATA_SIZE] {
        let mut out = [0u8; STAKED_DATA_SIZE];
        out[..32].copy_from_slice(self.mint.as_ref());
        write_reversed_u64(&mut out, 32, self.staked_time as u64);
        write_reversed_u64(&mut out, 40, self.lock_time as u64);
        write_reversed_u64(&mut out, 48, self.reward_amount);
        out
    }
}

/// Per-user staking pool. `staking` holds the live slots, `[0, staked_count)`
/// of the fixed-capacity on-chain array; the rest of the account is padding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPool {
    pub owner: Pubkey,
    pub staked_count: u64,
    pub staking: Vec<StakedData>,
}

impl UserPool {
    /// Decode from raw account data.
    ///
    /// Layout: `[0, 8)` discriminator, `[8, 40)` owner, `[40, 48)` reversed
    /// staked_count, then slot records from offset 48. The discriminator is
    /// not validated, so a created-but-uninitialized (zeroed) pool decodes
    /// as an empty pool.
    pub fn from_account_data(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < USER_POOL_SIZE {
            return Err(DecodeError::TooShort {
                expected: USER_POOL_SIZE,
                got: data.len(),
            });
        }
        let mut owner = [0u8; 32];
        owner.copy_from_slice(&data[8..40]);
        let staked_count = read_reversed_u64(data, 40);
        if staked_count as usize > USER_POOL_CAPACITY {
            return Err(DecodeError::StakedCountOutOfRange {
                count: staked_count,
                capacity: USER_POOL_CAPACITY,
            });
        }
        let mut staking = Vec::with_capacity(staked_count as usize);
        for i in 0..staked_count as usize {
            let start = 48 + i * STAKED_DATA_SIZE;
            staking.push(StakedData::from_bytes(&data[start..start + STAKED_DATA_SIZE])?);
        }
        Ok(Self {
            owner: Pubkey::new_from_array(owner),
            staked_count,
            staking,
        })
    }

    /// The live slot for a mint, if currently staked.
    pub fn find_staked(&self, mint: &Pubkey) -> Option<&StakedData> {
        self.staking.iter().find(|slot| slot.mint == *mint)
    }
}

// Slot integers are stored byte-reversed relative to big-endian, which is
// plain little-endian; the reversal is kept explicit to match the layout
// the program writes.
fn read_reversed_u64(data: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&data[offset..offset + 8]);
    raw.reverse();
    u64::from_be_bytes(raw)
}

fn write_reversed_u64(data: &mut [u8], offset: usize, value: u64) {
    let mut raw = value.to_be_bytes();
    raw.reverse();
    data[offset..offset + 8].copy_from_slice(&raw);
}
