// ink-staking/error.rs

use solana_client::client_error::ClientError;
use solana_sdk::program_error::ProgramError;
use solana_sdk::pubkey::{Pubkey, PubkeyError};
use solana_sdk::signer::SignerError;
use thiserror::Error;

use crate::submit::BatchReport;

pub type Result<T> = std::result::Result<T, StakingClientError>;

/// Errors surfaced by the staking client.
#[derive(Debug, Error)]
pub enum StakingClientError {
    /// A seeded address could not be derived for the given owner.
    #[error("address derivation failed: {0}")]
    Derivation(#[from] PubkeyError),

    /// The NFT is held by neither the user nor the staking vault, so no
    /// stake instruction can be built for it.
    #[error("nft {mint} is held by neither the user nor the staking vault")]
    NftNotOwned { mint: Pubkey },

    #[error("rpc request failed: {0}")]
    Rpc(#[from] ClientError),

    #[error("account data did not decode: {0}")]
    Decode(#[from] DecodeError),

    #[error("signer rejected or failed: {0}")]
    Signer(#[from] SignerError),

    /// Account data at a token address did not unpack as an SPL token
    /// account.
    #[error("token account data is invalid: {0}")]
    InvalidTokenAccount(ProgramError),

    #[error("expected account {address} does not exist")]
    AccountMissing { address: Pubkey },

    /// A batch did not fully confirm. The report lists the terminal state of
    /// every transaction; the ones reported confirmed are final on-chain.
    #[error(
        "batch failed: {} of {} transactions confirmed",
        .report.confirmed().len(),
        .report.len()
    )]
    BatchFailed { report: BatchReport },
}

/// Structural failures when decoding raw account data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("account data too short: expected {expected} bytes, got {got}")]
    TooShort { expected: usize, got: usize },

    #[error("unexpected account discriminator")]
    Discriminator,

    #[error("staked_count {count} exceeds pool capacity {capacity}")]
    StakedCountOutOfRange { count: u64, capacity: usize },
}
