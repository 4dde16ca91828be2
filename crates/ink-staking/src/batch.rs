// ink-staking/batch.rs - batch assembly: one transaction per logical
// operation, one recent blockhash shared across the whole batch.

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::Transaction;

use crate::error::Result;

/// Wrap each non-empty instruction list into an unsigned transaction with
/// the shared fee payer and blockhash. Input order is preserved.
pub fn into_transactions(
    fee_payer: &Pubkey,
    lists: Vec<Vec<Instruction>>,
    recent_blockhash: Hash,
) -> Vec<Transaction> {
    lists
        .into_iter()
        .filter(|instructions| !instructions.is_empty())
        .map(|instructions| {
            let mut tx = Transaction::new_with_payer(&instructions, Some(fee_payer));
            tx.message.recent_blockhash = recent_blockhash;
            tx
        })
        .collect()
}

/// Fetch one confirmed blockhash and assemble the whole batch against it.
/// Skips the fetch entirely when there is nothing to assemble.
pub async fn assemble(
    rpc: &RpcClient,
    fee_payer: &Pubkey,
    lists: Vec<Vec<Instruction>>,
) -> Result<Vec<Transaction>> {
    if lists.iter().all(|instructions| instructions.is_empty()) {
        return Ok(Vec::new());
    }
    let (recent_blockhash, _) = rpc
        .get_latest_blockhash_with_commitment(CommitmentConfig::confirmed())
        .await?;
    Ok(into_transactions(fee_payer, lists, recent_blockhash))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker_instruction(program_id: Pubkey) -> Instruction {
        Instruction {
            program_id,
            accounts: vec![],
            data: vec![],
        }
    }

    #[test]
    fn batch_shares_payer_and_blockhash() {
        let fee_payer = Pubkey::new_unique();
        let blockhash = Hash::new_unique();
        let first = Pubkey::new_unique();
        let second = Pubkey::new_unique();
        let txs = into_transactions(
            &fee_payer,
            vec![
                vec![marker_instruction(first)],
                vec![marker_instruction(second), marker_instruction(second)],
            ],
            blockhash,
        );
        assert_eq!(txs.len(), 2);
        for tx in &txs {
            assert_eq!(tx.message.recent_blockhash, blockhash);
            assert_eq!(tx.message.account_keys[0], fee_payer);
        }
        assert_eq!(txs[0].message.instructions.len(), 1);
        assert_eq!(txs[1].message.instructions.len(), 2);
        assert!(txs[0].message.account_keys.contains(&first));
        assert!(txs[1].message.account_keys.contains(&second));
    }

    #[test]
    fn empty_lists_are_dropped() {
        let fee_payer = Pubkey::new_unique();
        let marked = Pubkey::new_unique();
        let txs = into_transactions(
            &fee_payer,
            vec![vec![], vec![marker_instruction(marked)], vec![]],
            Hash::default(),
        );
        assert_eq!(txs.len(), 1);
        assert!(txs[0].message.account_keys.contains(&marked));
    }

    #[test]
    fn no_instructions_means_no_transactions() {
        let txs = into_transactions(&Pubkey::new_unique(), vec![], Hash::default());
        assert!(txs.is_empty());
        let txs = into_transactions(&Pubkey::new_unique(), vec![vec![], vec![]], Hash::default());
        assert!(txs.is_empty());
    }
}
