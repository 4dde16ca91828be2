// ink-staking/pda.rs - deterministic addresses of the staking program.

use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

use crate::constants::{
    GLOBAL_AUTHORITY_SEED, INK_TOKEN_MINT, METADATA_SEED, STAKING_PROGRAM_ID,
    TOKEN_METADATA_PROGRAM_ID, USER_POOL_SEED,
};
use crate::error::Result;

/// Program authority PDA holding the GlobalPool state, with its bump.
/// The bump is passed back into every instruction that touches the pool.
pub fn global_authority() -> (Pubkey, u8) {
    Pubkey::find_program_address(&[GLOBAL_AUTHORITY_SEED], &STAKING_PROGRAM_ID)
}

/// Per-user pool account, derived from the owner with the fixed seed
/// string. A create-with-seed address, so the owner funds and creates it
/// directly rather than through a program signer.
pub fn user_pool_address(owner: &Pubkey) -> Result<Pubkey> {
    Ok(Pubkey::create_with_seed(
        owner,
        USER_POOL_SEED,
        &STAKING_PROGRAM_ID,
    )?)
}

pub fn associated_token_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Metaplex metadata PDA for a mint.
pub fn metadata_address(mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[
            METADATA_SEED,
            TOKEN_METADATA_PROGRAM_ID.as_ref(),
            mint.as_ref(),
        ],
        &TOKEN_METADATA_PROGRAM_ID,
    )
    .0
}

/// The reward vault: the global authority's associated INK token account.
pub fn reward_vault_address() -> Pubkey {
    associated_token_address(&global_authority().0, &INK_TOKEN_MINT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_authority_bump_is_canonical() {
        let (address, bump) = global_authority();
        let rebuilt =
            Pubkey::create_program_address(&[GLOBAL_AUTHORITY_SEED, &[bump]], &STAKING_PROGRAM_ID)
                .unwrap();
        assert_eq!(address, rebuilt);
    }

    #[test]
    fn user_pool_address_is_deterministic_per_owner() {
        let owner = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        assert_eq!(
            user_pool_address(&owner).unwrap(),
            user_pool_address(&owner).unwrap()
        );
        assert_ne!(
            user_pool_address(&owner).unwrap(),
            user_pool_address(&other).unwrap()
        );
    }

    #[test]
    fn metadata_address_depends_on_mint() {
        let mint = Pubkey::new_unique();
        let other = Pubkey::new_unique();
        assert_eq!(metadata_address(&mint), metadata_address(&mint));
        assert_ne!(metadata_address(&mint), metadata_address(&other));
    }

    #[test]
    fn reward_vault_is_the_authority_ata() {
        let (authority, _) = global_authority();
        assert_eq!(
            reward_vault_address(),
            associated_token_address(&authority, &INK_TOKEN_MINT)
        );
    }
}
