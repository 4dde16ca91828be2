// ink-staking/lib.rs - client SDK for the INK NFT staking program.
//
// Derives the program's deterministic addresses, builds and batches the
// stake, claim, and withdraw transaction flows, submits them through a
// caller-supplied wallet signer, and reads pool state and tiered rewards
// back off-chain.

pub mod batch;
pub mod client;
pub mod constants;
pub mod error;
pub mod instruction;
pub mod pda;
pub mod reward;
pub mod state;
pub mod submit;
pub mod token;
pub mod transaction;

pub use client::StakingClient;
pub use error::{DecodeError, Result, StakingClientError};
pub use state::{GlobalPool, StakedData, UserPool};
pub use submit::{BatchOutcome, BatchReport, SkipReason, TransactionResult, WalletSigner};
