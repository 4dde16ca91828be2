// ink-staking/token.rs - SPL token account helpers: existence checks,
// associated-account provisioning, and NFT holder lookups.

use solana_account_decoder::UiAccountEncoding;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::program_pack::Pack;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::instruction::create_associated_token_account;
use spl_token::state::Account as TokenAccount;

use crate::error::{Result, StakingClientError};
use crate::pda;

/// Create instructions and resulting addresses for a set of associated
/// token accounts, in mint input order. Only missing accounts get a create
/// instruction; every address is listed.
#[derive(Debug, Default)]
pub struct ProvisionedAccounts {
    pub instructions: Vec<Instruction>,
    pub addresses: Vec<Pubkey>,
}

pub async fn account_exists(rpc: &RpcClient, address: &Pubkey) -> Result<bool> {
    let response = rpc
        .get_account_with_commitment(address, CommitmentConfig::confirmed())
        .await?;
    Ok(response.value.is_some())
}

/// Derive the associated token account for each mint and emit a create
/// instruction for each one that does not exist yet.
pub async fn ensure_token_accounts(
    rpc: &RpcClient,
    payer: &Pubkey,
    owner: &Pubkey,
    mints: &[Pubkey],
) -> Result<ProvisionedAccounts> {
    let mut provisioned = ProvisionedAccounts::default();
    for mint in mints {
        let address = pda::associated_token_address(owner, mint);
        if !account_exists(rpc, &address).await? {
            provisioned
                .instructions
                .push(create_associated_token_account(
                    payer,
                    owner,
                    mint,
                    &spl_token::id(),
                ));
        }
        provisioned.addresses.push(address);
    }
    Ok(provisioned)
}

/// Locate the token account currently holding an NFT and the wallet that
/// owns it. Filters the token program for accounts of the mint whose low
/// amount byte is one, which for an NFT supply means a balance of one.
pub async fn nft_holding_account(
    rpc: &RpcClient,
    mint: &Pubkey,
) -> Result<Option<(Pubkey, Pubkey)>> {
    let config = RpcProgramAccountsConfig {
        filters: Some(vec![
            RpcFilterType::DataSize(TokenAccount::LEN as u64),
            RpcFilterType::Memcmp(Memcmp::new_raw_bytes(0, mint.to_bytes().to_vec())),
            RpcFilterType::Memcmp(Memcmp::new_raw_bytes(64, vec![1])),
        ]),
        account_config: RpcAccountInfoConfig {
            encoding: Some(UiAccountEncoding::Base64),
            ..RpcAccountInfoConfig::default()
        },
        ..RpcProgramAccountsConfig::default()
    };
    let accounts = rpc
        .get_program_accounts_with_config(&spl_token::id(), config)
        .await?;
    match accounts.first() {
        Some((address, account)) => {
            let token_account = TokenAccount::unpack(&account.data)
                .map_err(StakingClientError::InvalidTokenAccount)?;
            Ok(Some((*address, token_account.owner)))
        }
        None => Ok(None),
    }
}

/// Raw balance of an SPL token account. The account must exist.
pub async fn token_account_balance(rpc: &RpcClient, address: &Pubkey) -> Result<u64> {
    let response = rpc
        .get_account_with_commitment(address, CommitmentConfig::confirmed())
        .await?;
    let account = response
        .value
        .ok_or(StakingClientError::AccountMissing { address: *address })?;
    let token_account =
        TokenAccount::unpack(&account.data).map_err(StakingClientError::InvalidTokenAccount)?;
    Ok(token_account.amount)
}
