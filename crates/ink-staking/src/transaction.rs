// ink-staking/transaction.rs - per-operation instruction builders. Each
// builder resolves addresses, reads the accounts it depends on, and returns
// the full instruction list for one logical operation.

use log::{debug, info};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_instruction;

use crate::constants::{INK_TOKEN_MINT, STAKING_PROGRAM_ID, USER_POOL_SEED, USER_POOL_SIZE};
use crate::error::{Result, StakingClientError};
use crate::instruction;
use crate::pda;
use crate::reward;
use crate::token;

/// Admin bootstrap: create the GlobalPool at the authority PDA.
pub fn build_initialize(admin: &Pubkey) -> Vec<Instruction> {
    let (global_authority, bump) = pda::global_authority();
    vec![instruction::initialize(admin, &global_authority, bump)]
}

/// Create the caller's pool account with the fixed seed, then hand it to the
/// program. The caller checks beforehand that the pool does not exist.
pub async fn build_init_user_pool(rpc: &RpcClient, owner: &Pubkey) -> Result<Vec<Instruction>> {
    let user_pool = pda::user_pool_address(owner)?;
    let lamports = rpc
        .get_minimum_balance_for_rent_exemption(USER_POOL_SIZE)
        .await?;
    info!("creating user pool {user_pool} for {owner}");
    Ok(vec![
        system_instruction::create_account_with_seed(
            owner,
            &user_pool,
            owner,
            USER_POOL_SEED,
            lamports,
            USER_POOL_SIZE as u64,
            &STAKING_PROGRAM_ID,
        ),
        instruction::initialize_user_pool(&user_pool, owner),
    ])
}

/// Stake one NFT: resolve the account actually holding it, provision the
/// vault-side token account, then emit the stake instruction.
pub async fn build_stake(
    rpc: &RpcClient,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<Vec<Instruction>> {
    let (global_authority, bump) = pda::global_authority();
    let user_pool = pda::user_pool_address(owner)?;

    let user_token_account = pda::associated_token_address(owner, mint);
    let user_account_exists = token::account_exists(rpc, &user_token_account).await?;
    let holding = if user_account_exists {
        None
    } else {
        token::nft_holding_account(rpc, mint).await?
    };
    let source = resolve_stake_source(
        user_token_account,
        user_account_exists,
        holding,
        owner,
        &global_authority,
        mint,
    )?;

    let vault =
        token::ensure_token_accounts(rpc, owner, &global_authority, std::slice::from_ref(mint))
            .await?;
    let metadata = pda::metadata_address(mint);
    debug!("staking {mint}: source {source}, vault {}", vault.addresses[0]);

    let mut instructions = vault.instructions;
    instructions.push(instruction::stake_nft_to_pool(
        owner,
        &global_authority,
        &user_pool,
        &source,
        &vault.addresses[0],
        mint,
        &metadata,
        bump,
    ));
    Ok(instructions)
}

/// Claim accrued INK for one staked NFT. Both the NFT and reward associated
/// accounts are provisioned; the claim itself only references the reward
/// account.
pub async fn build_claim(
    rpc: &RpcClient,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<Vec<Instruction>> {
    let (global_authority, bump) = pda::global_authority();
    let user_pool = pda::user_pool_address(owner)?;
    let reward_vault = pda::reward_vault_address();

    let user_accounts =
        token::ensure_token_accounts(rpc, owner, owner, &[*mint, INK_TOKEN_MINT]).await?;

    let mut instructions = user_accounts.instructions;
    instructions.push(instruction::claim_reward(
        owner,
        &global_authority,
        &user_pool,
        &reward_vault,
        &user_accounts.addresses[1],
        mint,
        bump,
    ));
    Ok(instructions)
}

/// Return one staked NFT to its owner, paying out its accrued reward in the
/// same instruction.
pub async fn build_withdraw_nft(
    rpc: &RpcClient,
    owner: &Pubkey,
    mint: &Pubkey,
) -> Result<Vec<Instruction>> {
    let (global_authority, bump) = pda::global_authority();
    let user_pool = pda::user_pool_address(owner)?;
    let reward_vault = pda::reward_vault_address();
    let dest_nft_account = pda::associated_token_address(&global_authority, mint);

    let user_accounts =
        token::ensure_token_accounts(rpc, owner, owner, &[*mint, INK_TOKEN_MINT]).await?;

    let mut instructions = user_accounts.instructions;
    instructions.push(instruction::withdraw_nft_from_pool(
        owner,
        &global_authority,
        &user_pool,
        &user_accounts.addresses[0],
        &dest_nft_account,
        &reward_vault,
        &user_accounts.addresses[1],
        mint,
        bump,
    ));
    Ok(instructions)
}

/// Withdraw INK from the reward vault. `ui_amount` is in whole tokens and
/// is scaled to base units here.
pub async fn build_withdraw_token(
    rpc: &RpcClient,
    owner: &Pubkey,
    ui_amount: f64,
) -> Result<Vec<Instruction>> {
    let (global_authority, bump) = pda::global_authority();
    let reward_vault = pda::reward_vault_address();
    let amount = reward::ui_to_raw(ui_amount);

    let user_accounts = token::ensure_token_accounts(rpc, owner, owner, &[INK_TOKEN_MINT]).await?;

    let mut instructions = user_accounts.instructions;
    instructions.push(instruction::withdraw_token(
        owner,
        &global_authority,
        &reward_vault,
        &user_accounts.addresses[0],
        bump,
        amount,
    ));
    Ok(instructions)
}

/// Decide which token account the stake instruction pulls the NFT from.
/// `holding` is the account currently holding the NFT and its owner, looked
/// up only when the user's associated account does not exist.
fn resolve_stake_source(
    user_token_account: Pubkey,
    user_account_exists: bool,
    holding: Option<(Pubkey, Pubkey)>,
    owner: &Pubkey,
    vault_authority: &Pubkey,
    mint: &Pubkey,
) -> Result<Pubkey> {
    if user_account_exists {
        return Ok(user_token_account);
    }
    match holding {
        Some((account, _)) if account == user_token_account => Ok(user_token_account),
        Some((account, holder)) if holder == *owner => Ok(account),
        // Vault-held means a previous stake already moved it; the associated
        // account stays the instruction's source.
        Some((_, holder)) if holder == *vault_authority => Ok(user_token_account),
        _ => Err(StakingClientError::NftNotOwned { mint: *mint }),
    }
}
