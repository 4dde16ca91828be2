// ink-staking/client.rs - operation surface over a single RPC handle.

use log::info;
use solana_account_decoder::UiAccountEncoding;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::RpcFilterType;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

use crate::batch;
use crate::constants::{STAKING_PROGRAM_ID, USER_POOL_SIZE};
use crate::error::Result;
use crate::pda;
use crate::reward;
use crate::state::{GlobalPool, UserPool};
use crate::submit::{self, BatchOutcome, SkipReason, WalletSigner};
use crate::token;
use crate::transaction;

/// Client for the staking program. Owns the RPC connection; every protocol
/// address derives from the fixed constants.
pub struct StakingClient {
    rpc: RpcClient,
}

impl StakingClient {
    pub fn new(rpc_url: impl ToString) -> Self {
        Self {
            rpc: RpcClient::new(rpc_url.to_string()),
        }
    }

    pub fn with_rpc(rpc: RpcClient) -> Self {
        Self { rpc }
    }

    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Admin bootstrap: create the GlobalPool. One transaction.
    pub async fn initialize(
        &self,
        admin: &Pubkey,
        wallet: &dyn WalletSigner,
    ) -> Result<BatchOutcome> {
        if !wallet.is_available() {
            return Ok(BatchOutcome::Skipped(SkipReason::SignerUnavailable));
        }
        let lists = vec![transaction::build_initialize(admin)];
        self.submit_lists(admin, lists, wallet).await
    }

    /// Create and initialize the caller's user pool. Runs to finalized
    /// commitment, so a following stake can rely on the pool existing.
    pub async fn init_user_pool(
        &self,
        owner: &Pubkey,
        wallet: &dyn WalletSigner,
    ) -> Result<BatchOutcome> {
        if !wallet.is_available() {
            return Ok(BatchOutcome::Skipped(SkipReason::SignerUnavailable));
        }
        let lists = vec![transaction::build_init_user_pool(&self.rpc, owner).await?];
        self.submit_lists(owner, lists, wallet).await
    }

    /// Stake a set of NFTs, one transaction per mint, signed and submitted
    /// as one batch. When the caller has no pool yet, pool creation runs to
    /// completion first as its own batch.
    pub async fn stake_nfts(
        &self,
        owner: &Pubkey,
        mints: &[Pubkey],
        wallet: &dyn WalletSigner,
    ) -> Result<BatchOutcome> {
        if !wallet.is_available() {
            return Ok(BatchOutcome::Skipped(SkipReason::SignerUnavailable));
        }
        if mints.is_empty() {
            return Ok(BatchOutcome::Skipped(SkipReason::NoTransactions));
        }
        let user_pool = pda::user_pool_address(owner)?;
        if !token::account_exists(&self.rpc, &user_pool).await? {
            info!("no user pool for {owner}, creating it first");
            self.init_user_pool(owner, wallet).await?;
        }
        let mut lists = Vec::with_capacity(mints.len());
        for mint in mints {
            lists.push(transaction::build_stake(&self.rpc, owner, mint).await?);
        }
        self.submit_lists(owner, lists, wallet).await
    }

    /// Claim accrued INK for each staked mint, one transaction per mint.
    pub async fn claim_rewards(
        &self,
        owner: &Pubkey,
        mints: &[Pubkey],
        wallet: &dyn WalletSigner,
    ) -> Result<BatchOutcome> {
        if !wallet.is_available() {
            return Ok(BatchOutcome::Skipped(SkipReason::SignerUnavailable));
        }
        if mints.is_empty() {
            return Ok(BatchOutcome::Skipped(SkipReason::NoTransactions));
        }
        let mut lists = Vec::with_capacity(mints.len());
        for mint in mints {
            lists.push(transaction::build_claim(&self.rpc, owner, mint).await?);
        }
        self.submit_lists(owner, lists, wallet).await
    }

    /// Unstake each mint, returning the NFT and paying out its reward.
    pub async fn withdraw_nfts(
        &self,
        owner: &Pubkey,
        mints: &[Pubkey],
        wallet: &dyn WalletSigner,
    ) -> Result<BatchOutcome> {
        if !wallet.is_available() {
            return Ok(BatchOutcome::Skipped(SkipReason::SignerUnavailable));
        }
        if mints.is_empty() {
            return Ok(BatchOutcome::Skipped(SkipReason::NoTransactions));
        }
        let mut lists = Vec::with_capacity(mints.len());
        for mint in mints {
            lists.push(transaction::build_withdraw_nft(&self.rpc, owner, mint).await?);
        }
        self.submit_lists(owner, lists, wallet).await
    }

    /// Withdraw INK from the reward vault. `ui_amount` is in whole tokens.
    pub async fn withdraw_token(
        &self,
        owner: &Pubkey,
        ui_amount: f64,
        wallet: &dyn WalletSigner,
    ) -> Result<BatchOutcome> {
        if !wallet.is_available() {
            return Ok(BatchOutcome::Skipped(SkipReason::SignerUnavailable));
        }
        let lists = vec![transaction::build_withdraw_token(&self.rpc, owner, ui_amount).await?];
        self.submit_lists(owner, lists, wallet).await
    }

    async fn submit_lists(
        &self,
        fee_payer: &Pubkey,
        lists: Vec<Vec<Instruction>>,
        wallet: &dyn WalletSigner,
    ) -> Result<BatchOutcome> {
        let transactions = batch::assemble(&self.rpc, fee_payer, lists).await?;
        if transactions.is_empty() {
            return Ok(BatchOutcome::Skipped(SkipReason::NoTransactions));
        }
        let signatures = submit::submit_batch(&self.rpc, transactions, wallet).await?;
        Ok(BatchOutcome::Confirmed(signatures))
    }

    /// The GlobalPool, or `None` while the program is uninitialized.
    pub async fn global_pool(&self) -> Result<Option<GlobalPool>> {
        let (global_authority, _) = pda::global_authority();
        let response = self
            .rpc
            .get_account_with_commitment(&global_authority, CommitmentConfig::confirmed())
            .await?;
        match response.value {
            Some(account) => Ok(Some(GlobalPool::from_account_data(&account.data)?)),
            None => Ok(None),
        }
    }

    /// A user's pool, or `None` when it has not been created.
    pub async fn user_pool(&self, owner: &Pubkey) -> Result<Option<UserPool>> {
        let address = pda::user_pool_address(owner)?;
        let response = self
            .rpc
            .get_account_with_commitment(&address, CommitmentConfig::confirmed())
            .await?;
        match response.value {
            Some(account) => Ok(Some(UserPool::from_account_data(&account.data)?)),
            None => Ok(None),
        }
    }

    /// Scan every user pool of the program. Filters program accounts by the
    /// exact pool size and decodes the raw layout; a structural failure on
    /// any account fails the whole scan. An alternate RPC endpoint can take
    /// the scan load off the primary one.
    pub async fn scan_user_pools(&self, alternate_rpc: Option<&str>) -> Result<Vec<UserPool>> {
        let scan_rpc;
        let rpc = match alternate_rpc {
            Some(url) => {
                scan_rpc = RpcClient::new(url.to_string());
                &scan_rpc
            }
            None => &self.rpc,
        };
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![RpcFilterType::DataSize(USER_POOL_SIZE as u64)]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };
        let accounts = rpc
            .get_program_accounts_with_config(&STAKING_PROGRAM_ID, config)
            .await?;
        info!("scanned {} user pool accounts", accounts.len());
        accounts
            .iter()
            .map(|(_, account)| UserPool::from_account_data(&account.data).map_err(Into::into))
            .collect()
    }

    /// Raw INK balance of the reward vault.
    pub async fn reward_vault_balance(&self) -> Result<u64> {
        token::token_account_balance(&self.rpc, &pda::reward_vault_address()).await
    }

    /// Accrued reward in base units for one staked mint. `None` when the
    /// user has no pool; zero when the mint is not currently staked.
    pub async fn reward_for(&self, owner: &Pubkey, mint: &Pubkey) -> Result<Option<u64>> {
        let Some(pool) = self.user_pool(owner).await? else {
            return Ok(None);
        };
        let Some(slot) = pool.find_staked(mint) else {
            return Ok(Some(0));
        };
        let balance = self.reward_vault_balance().await?;
        Ok(Some(reward::accrued_reward(
            slot.staked_time,
            reward::unix_timestamp(),
            balance,
        )))
    }

    /// Total accrued reward across every staked item. The vault balance and
    /// clock are re-read per item rather than snapshotted once.
    pub async fn total_reward(&self, owner: &Pubkey) -> Result<Option<u64>> {
        let Some(pool) = self.user_pool(owner).await? else {
            return Ok(None);
        };
        let mut total: u64 = 0;
        for slot in &pool.staking {
            let balance = self.reward_vault_balance().await?;
            let now = reward::unix_timestamp();
            total = total.saturating_add(reward::accrued_reward(slot.staked_time, now, balance));
        }
        Ok(Some(total))
    }
}
