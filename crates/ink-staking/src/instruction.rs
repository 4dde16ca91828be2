// ink-staking/instruction.rs - encoders for the staking program's
// instructions. Account order and data layout follow the deployed program
// and cannot change independently of it.

use solana_sdk::hash;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_program, sysvar};

use crate::constants::{ANCHOR_DISCRIMINATOR_SIZE, STAKING_PROGRAM_ID};

/// Anchor-convention discriminator: the first 8 bytes of
/// sha256("<namespace>:<name>").
pub(crate) fn anchor_discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let digest = hash::hash(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest.to_bytes()[..ANCHOR_DISCRIMINATOR_SIZE]);
    out
}

fn sighash(name: &str) -> [u8; 8] {
    anchor_discriminator("global", name)
}

/// `initialize(global_bump)`: create the GlobalPool at the authority PDA.
pub fn initialize(admin: &Pubkey, global_authority: &Pubkey, global_bump: u8) -> Instruction {
    let mut data = sighash("initialize").to_vec();
    data.push(global_bump);
    Instruction {
        program_id: STAKING_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*admin, true),
            AccountMeta::new(*global_authority, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data,
    }
}

/// `initialize_user_pool()`: adopt a freshly created pool account for the
/// owner. The account itself is created by a preceding system instruction.
pub fn initialize_user_pool(user_pool: &Pubkey, owner: &Pubkey) -> Instruction {
    Instruction {
        program_id: STAKING_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*user_pool, false),
            AccountMeta::new(*owner, true),
        ],
        data: sighash("initialize_user_pool").to_vec(),
    }
}

/// `stake_nft_to_pool(global_bump)`: move one NFT from the user's token
/// account into the vault-side account and record the stake.
#[allow(clippy::too_many_arguments)]
pub fn stake_nft_to_pool(
    owner: &Pubkey,
    global_authority: &Pubkey,
    user_pool: &Pubkey,
    user_nft_account: &Pubkey,
    dest_nft_account: &Pubkey,
    nft_mint: &Pubkey,
    mint_metadata: &Pubkey,
    global_bump: u8,
) -> Instruction {
    let mut data = sighash("stake_nft_to_pool").to_vec();
    data.push(global_bump);
    Instruction {
        program_id: STAKING_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(*global_authority, false),
            AccountMeta::new(*user_pool, false),
            AccountMeta::new(*user_nft_account, false),
            AccountMeta::new(*dest_nft_account, false),
            AccountMeta::new_readonly(*nft_mint, false),
            AccountMeta::new_readonly(*mint_metadata, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data,
    }
}

/// `claim_reward(global_bump)`: pay accrued INK for one staked NFT out of
/// the reward vault.
pub fn claim_reward(
    owner: &Pubkey,
    global_authority: &Pubkey,
    user_pool: &Pubkey,
    reward_vault: &Pubkey,
    user_reward_account: &Pubkey,
    nft_mint: &Pubkey,
    global_bump: u8,
) -> Instruction {
    let mut data = sighash("claim_reward").to_vec();
    data.push(global_bump);
    Instruction {
        program_id: STAKING_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(*global_authority, false),
            AccountMeta::new(*user_pool, false),
            AccountMeta::new(*reward_vault, false),
            AccountMeta::new(*user_reward_account, false),
            AccountMeta::new_readonly(*nft_mint, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data,
    }
}

/// `withdraw_nft_from_pool(global_bump)`: return one NFT to the user and
/// pay out its accrued reward in the same instruction.
#[allow(clippy::too_many_arguments)]
pub fn withdraw_nft_from_pool(
    owner: &Pubkey,
    global_authority: &Pubkey,
    user_pool: &Pubkey,
    user_nft_account: &Pubkey,
    dest_nft_account: &Pubkey,
    reward_vault: &Pubkey,
    user_reward_account: &Pubkey,
    nft_mint: &Pubkey,
    global_bump: u8,
) -> Instruction {
    let mut data = sighash("withdraw_nft_from_pool").to_vec();
    data.push(global_bump);
    Instruction {
        program_id: STAKING_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(*global_authority, false),
            AccountMeta::new(*user_pool, false),
            AccountMeta::new(*user_nft_account, false),
            AccountMeta::new(*dest_nft_account, false),
            AccountMeta::new(*reward_vault, false),
            AccountMeta::new(*user_reward_account, false),
            AccountMeta::new_readonly(*nft_mint, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data,
    }
}

/// `withdraw_token(global_bump, amount)`: move INK out of the reward vault.
/// `amount` is in base units, encoded little-endian after the bump.
pub fn withdraw_token(
    owner: &Pubkey,
    global_authority: &Pubkey,
    reward_vault: &Pubkey,
    user_reward_account: &Pubkey,
    global_bump: u8,
    amount: u64,
) -> Instruction {
    let mut data = sighash("withdraw_token").to_vec();
    data.push(global_bump);
    data.extend_from_slice(&amount.to_le_bytes());
    Instruction {
        program_id: STAKING_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*owner, true),
            AccountMeta::new(*global_authority, false),
            AccountMeta::new(*reward_vault, false),
            AccountMeta::new(*user_reward_account, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminators_are_deterministic_and_distinct() {
        assert_eq!(sighash("initialize"), sighash("initialize"));
        let names = [
            "initialize",
            "initialize_user_pool",
            "stake_nft_to_pool",
            "claim_reward",
            "withdraw_nft_from_pool",
            "withdraw_token",
        ];
        for (i, a) in names.iter().enumerate() {
            for b in names.iter().skip(i + 1) {
                assert_ne!(sighash(a), sighash(b), "{a} vs {b}");
            }
        }
        assert_ne!(
            anchor_discriminator("global", "initialize"),
            anchor_discriminator("account", "initialize"),
        );
    }

    #[test]
    fn bump_follows_the_discriminator() {
        let admin = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let ix = initialize(&admin, &authority, 254);
        assert_eq!(ix.program_id, STAKING_PROGRAM_ID);
        assert_eq!(ix.data.len(), 9);
        assert_eq!(ix.data[..8], sighash("initialize"));
        assert_eq!(ix.data[8], 254);
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[2].pubkey, system_program::id());
        assert_eq!(ix.accounts[3].pubkey, sysvar::rent::id());
    }

    #[test]
    fn withdraw_token_encodes_amount_little_endian() {
        let owner = Pubkey::new_unique();
        let ix = withdraw_token(
            &owner,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            255,
            3_330_000_000,
        );
        assert_eq!(ix.data.len(), 17);
        assert_eq!(ix.data[8], 255);
        assert_eq!(ix.data[9..], 3_330_000_000u64.to_le_bytes());
        assert_eq!(ix.accounts.len(), 5);
        assert_eq!(ix.accounts[4].pubkey, spl_token::id());
    }

    #[test]
    fn stake_accounts_are_ordered_for_the_program() {
        let owner = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let source = Pubkey::new_unique();
        let vault = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let metadata = Pubkey::new_unique();
        let ix =
            stake_nft_to_pool(&owner, &authority, &pool, &source, &vault, &mint, &metadata, 250);
        let keys: Vec<Pubkey> = ix.accounts.iter().map(|meta| meta.pubkey).collect();
        assert_eq!(
            keys,
            vec![owner, authority, pool, source, vault, mint, metadata, spl_token::id()]
        );
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts.iter().skip(1).all(|meta| !meta.is_signer));
        assert!(ix.accounts[4].is_writable);
        assert!(!ix.accounts[5].is_writable);
    }

    #[test]
    fn claim_and_unstake_share_the_vault_accounts() {
        let owner = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let pool = Pubkey::new_unique();
        let vault = Pubkey::new_unique();
        let reward = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let claim = claim_reward(&owner, &authority, &pool, &vault, &reward, &mint, 251);
        assert_eq!(claim.accounts.len(), 7);
        assert_eq!(claim.accounts[3].pubkey, vault);
        assert_eq!(claim.accounts[4].pubkey, reward);

        let unstake = withdraw_nft_from_pool(
            &owner,
            &authority,
            &pool,
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            &vault,
            &reward,
            &mint,
            251,
        );
        assert_eq!(unstake.accounts.len(), 9);
        assert_eq!(unstake.accounts[5].pubkey, vault);
        assert_eq!(unstake.accounts[6].pubkey, reward);
        assert_eq!(unstake.data[..8], sighash("withdraw_nft_from_pool"));
    }
}
