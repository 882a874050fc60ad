use crate::application::handler::WalletHandler;
use crate::domain::account::AccountBalance;
use crate::domain::instruction::{Instruction, Submission};
use crate::domain::ports::{LedgerHandler, LedgerStateBox};
use crate::error::{OperationError, Result};
use crate::infrastructure::namespaced::NamespacedState;
use std::collections::BTreeSet;
use tokio::sync::Mutex;
use tracing::{dispatcher, warn};

/// An in-process stand-in for the transaction-processing runtime.
///
/// `LedgerEngine` owns the ledger state and feeds the handler submissions
/// one at a time. Each instruction only sees the addresses it declares,
/// the way a runtime restricts a transaction to its inputs and outputs.
/// Awaiting each submission before the next gives the ordering a real
/// runtime would impose on instructions that touch the same account.
pub struct LedgerEngine {
    handler: WalletHandler,
    state: LedgerStateBox,
    keys: Mutex<BTreeSet<String>>,
}

impl LedgerEngine {
    /// Creates a new `LedgerEngine` instance.
    ///
    /// # Arguments
    ///
    /// * `handler` - The handler instructions are routed to.
    /// * `state` - The backing ledger state.
    pub fn new(handler: WalletHandler, state: LedgerStateBox) -> Self {
        Self {
            handler,
            state,
            keys: Mutex::new(BTreeSet::new()),
        }
    }

    /// Applies one submission. A rejected instruction leaves state as it was.
    pub async fn process_submission(&self, submission: Submission) -> Result<()> {
        let Submission { signer, payload } = submission;
        let parsed = Instruction::parse(&payload);
        let namespace = self.handler.namespace();

        // An unparsable payload never reaches state.
        let scope = match &parsed {
            Ok(instruction) => instruction.addresses(&signer, namespace),
            Err(_) => vec![namespace.to_string()],
        };
        {
            let mut keys = self.keys.lock().await;
            keys.insert(signer.clone());
            if let Ok(instruction) = &parsed
                && let Some(to) = instruction.counterparty()
            {
                keys.insert(to.to_string());
            }
        }

        let state = NamespacedState::new(self.state.as_ref(), scope);
        self.handler.apply_parsed(parsed, &signer, &state).await
    }

    /// Consumes the engine and returns the balance of every account touched
    /// by a submission, ordered by key.
    ///
    /// An account whose stored value does not decode is logged and left out
    /// of the report.
    pub async fn into_results(self) -> Result<Vec<AccountBalance>> {
        let state = NamespacedState::new(
            self.state.as_ref(),
            vec![self.handler.namespace().to_string()],
        );
        let keys = self.keys.into_inner();
        let mut accounts = Vec::with_capacity(keys.len());
        for key in keys {
            let balance = match self.handler.balance(&state, &key).await {
                Ok(Some(balance)) => balance,
                Ok(None) => continue,
                Err(OperationError::CorruptBalance { address }) => {
                    dispatcher::with_default(self.handler.dispatch(), || {
                        warn!(%key, %address, "skipping account with corrupt stored balance")
                    });
                    continue;
                }
                Err(err) => return Err(err),
            };
            accounts.push(AccountBalance {
                address: self.handler.address_of(&key),
                key,
                balance,
            });
        }
        Ok(accounts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::Balance;
    use crate::domain::ports::LedgerState;
    use crate::infrastructure::in_memory::InMemoryLedgerState;
    use std::collections::HashMap;

    fn engine() -> LedgerEngine {
        LedgerEngine::new(
            WalletHandler::default(),
            Box::new(InMemoryLedgerState::new()),
        )
    }

    #[tokio::test]
    async fn test_engine_reports_touched_accounts() {
        let engine = engine();

        engine
            .process_submission(Submission::new("bob", "deposit,10"))
            .await
            .unwrap();
        engine
            .process_submission(Submission::new("alice", "deposit,100"))
            .await
            .unwrap();
        engine
            .process_submission(Submission::new("alice", "transfer,30,bob"))
            .await
            .unwrap();

        let results = engine.into_results().await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].key, "alice");
        assert_eq!(results[0].balance, Balance::new(70));
        assert_eq!(results[1].key, "bob");
        assert_eq!(results[1].balance, Balance::new(40));
        assert_eq!(results[1].address, WalletHandler::default().address_of("bob"));
    }

    #[tokio::test]
    async fn test_engine_skips_keys_without_accounts() {
        let engine = engine();

        engine
            .process_submission(Submission::new("alice", "deposit,5"))
            .await
            .unwrap();
        let err = engine
            .process_submission(Submission::new("alice", "transfer,5,carol"))
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::AccountNotFound { .. }));

        let results = engine.into_results().await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].key, "alice");
        assert_eq!(results[0].balance, Balance::new(5));
    }

    #[tokio::test]
    async fn test_engine_many_accounts() {
        let engine = engine();

        for i in 1..=100 {
            engine
                .process_submission(Submission::new(format!("key-{i}"), "deposit,1"))
                .await
                .unwrap();
        }

        let results = engine.into_results().await.unwrap();
        assert_eq!(results.len(), 100);
        for account in results {
            assert_eq!(account.balance, Balance::new(1));
        }
    }

    #[tokio::test]
    async fn test_engine_reports_around_corrupt_balance() {
        let handler = WalletHandler::default();
        let bob = handler.address_of("bob");
        let inner = InMemoryLedgerState::new();
        let engine = LedgerEngine::new(handler, Box::new(inner.clone()));

        for key in ["alice", "bob", "carol"] {
            engine
                .process_submission(Submission::new(key, "deposit,5"))
                .await
                .unwrap();
        }
        inner
            .set(HashMap::from([(bob, b"garbage".to_vec())]))
            .await
            .unwrap();

        let results = engine.into_results().await.unwrap();
        let keys: Vec<&str> = results.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["alice", "carol"]);
        assert!(results.iter().all(|a| a.balance == Balance::new(5)));
    }

    #[tokio::test]
    async fn test_engine_records_signer_of_rejected_payload() {
        let engine = engine();

        let err = engine
            .process_submission(Submission::new("alice", "deposit,+5"))
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::MalformedAmount(_)));
        engine
            .process_submission(Submission::new("alice", "deposit,5"))
            .await
            .unwrap();

        let results = engine.into_results().await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].balance, Balance::new(5));
    }
}
