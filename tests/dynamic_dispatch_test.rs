use simplewallet::application::handler::WalletHandler;
use simplewallet::domain::ports::{LedgerHandler, LedgerHandlerBox, LedgerState, LedgerStateBox};
use simplewallet::infrastructure::in_memory::InMemoryLedgerState;
use std::sync::Arc;

#[tokio::test]
async fn test_handler_and_state_as_trait_objects() {
    let handler: LedgerHandlerBox = Box::new(WalletHandler::default());
    let state: LedgerStateBox = Box::new(InMemoryLedgerState::new());

    assert_eq!(handler.family_name(), "simplewallet");
    assert_eq!(handler.family_version(), "1.0");

    // Verify Send + Sync by moving both into a spawned task
    let task = tokio::spawn(async move {
        handler
            .apply(b"deposit,10", "alice", state.as_ref())
            .await
            .unwrap();
        state.get(&[String::new()]).await.unwrap().len()
    });
    assert_eq!(task.await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_invocations_on_distinct_accounts() {
    let handler = Arc::new(WalletHandler::default());
    let state = InMemoryLedgerState::new();

    let mut tasks = Vec::new();
    for i in 0..32 {
        let handler = Arc::clone(&handler);
        let state = state.clone();
        tasks.push(tokio::spawn(async move {
            let key = format!("key-{i}");
            for _ in 0..10 {
                handler.apply(b"deposit,3", &key, &state).await.unwrap();
            }
            handler.apply(b"withdraw,5", &key, &state).await.unwrap();
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    for i in 0..32 {
        let balance = handler
            .balance(&state, &format!("key-{i}"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(balance.value(), 25);
    }
    assert_eq!(state.len().await, 32);
}
