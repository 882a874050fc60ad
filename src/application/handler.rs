use crate::domain::account::{Amount, Balance};
use crate::domain::address::{FAMILY_NAME, FAMILY_VERSION, derive_address, namespace_prefix};
use crate::domain::instruction::Instruction;
use crate::domain::ports::{LedgerHandler, LedgerState};
use crate::error::{AccountRole, OperationError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::instrument::WithSubscriber;
use tracing::{Dispatch, Instrument, debug, info, info_span, warn};

/// Applies `simplewallet` instructions to ledger state.
///
/// The handler keeps no per-instruction state: every call carries its own
/// [`Instruction`] through the routines below, so a single
/// handler can serve concurrent invocations without locking.
///
/// Diagnostics go to the [`Dispatch`] given at construction, never to the
/// process-wide default subscriber.
#[derive(Debug, Clone)]
pub struct WalletHandler {
    namespace: String,
    dispatch: Dispatch,
}

impl Default for WalletHandler {
    fn default() -> Self {
        Self::new(Dispatch::none())
    }
}

impl WalletHandler {
    pub fn new(dispatch: Dispatch) -> Self {
        Self {
            namespace: namespace_prefix(FAMILY_NAME),
            dispatch,
        }
    }

    /// Ledger address of the account owned by `key`.
    pub fn address_of(&self, key: &str) -> String {
        derive_address(key, &self.namespace)
    }

    /// Current balance of `key`, or `None` when it has no account yet.
    pub async fn balance(&self, state: &dyn LedgerState, key: &str) -> Result<Option<Balance>> {
        let address = self.address_of(key);
        let mut balances = read_balances(state, std::slice::from_ref(&address)).await?;
        Ok(balances.remove(&address))
    }

    /// Subscriber the handler logs to.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Applies an instruction the caller has already parsed from `signer`'s
    /// payload. A parse failure is rejected and logged the same way
    /// [`LedgerHandler::apply`] would.
    pub async fn apply_parsed(
        &self,
        parsed: Result<Instruction>,
        signer: &str,
        state: &dyn LedgerState,
    ) -> Result<()> {
        let dispatch = self.dispatch.clone();
        async move {
            let span = info_span!("apply", family = FAMILY_NAME, signer = %signer);
            let result = self
                .process(parsed, signer, state)
                .instrument(span.clone())
                .await;
            if let Err(err) = &result {
                span.in_scope(|| warn!(error = %err, "instruction rejected"));
            }
            result
        }
        .with_subscriber(dispatch)
        .await
    }

    async fn process(
        &self,
        parsed: Result<Instruction>,
        signer: &str,
        state: &dyn LedgerState,
    ) -> Result<()> {
        if signer.is_empty() {
            return Err(OperationError::MissingSigner);
        }

        let instruction = parsed?;
        debug!(
            operation = %instruction.operation(),
            amount = %instruction.amount(),
            "payload parsed"
        );

        match instruction {
            Instruction::Deposit { amount } => self.deposit(state, signer, amount).await,
            Instruction::Withdraw { amount } => self.withdraw(state, signer, amount).await,
            Instruction::Transfer { amount, to } => {
                self.transfer(state, signer, &to, amount).await
            }
        }
    }

    async fn deposit(&self, state: &dyn LedgerState, signer: &str, amount: Amount) -> Result<()> {
        let address = self.address_of(signer);
        let current = read_balances(state, std::slice::from_ref(&address))
            .await?
            .remove(&address);

        let current = current.unwrap_or_else(|| {
            debug!(%address, "no account yet, opening with zero balance");
            Balance::ZERO
        });
        let balance = current
            .checked_credit(amount)
            .ok_or_else(|| OperationError::BalanceOverflow {
                address: address.clone(),
            })?;

        state
            .set(HashMap::from([(address.clone(), balance.encode())]))
            .await?;
        info!(%address, %amount, %balance, "deposit committed");
        Ok(())
    }

    async fn withdraw(&self, state: &dyn LedgerState, signer: &str, amount: Amount) -> Result<()> {
        let address = self.address_of(signer);
        let current = read_balances(state, std::slice::from_ref(&address))
            .await?
            .remove(&address)
            .ok_or_else(|| OperationError::AccountNotFound {
                role: AccountRole::Debtor,
                address: address.clone(),
            })?;

        let balance = current
            .checked_debit(amount)
            .ok_or(OperationError::InsufficientFunds {
                available: current.value(),
                requested: amount.value(),
            })?;

        state
            .set(HashMap::from([(address.clone(), balance.encode())]))
            .await?;
        info!(%address, %amount, %balance, "withdrawal committed");
        Ok(())
    }

    async fn transfer(
        &self,
        state: &dyn LedgerState,
        signer: &str,
        counterparty: &str,
        amount: Amount,
    ) -> Result<()> {
        let from = self.address_of(signer);
        let to = self.address_of(counterparty);
        if from == to {
            return Err(OperationError::SelfTransfer);
        }

        // Both accounts are read in one call so the decision is made on a
        // single view of the pair.
        let mut balances = read_balances(state, &[from.clone(), to.clone()]).await?;
        let from_balance = balances
            .remove(&from)
            .ok_or_else(|| OperationError::AccountNotFound {
                role: AccountRole::Debtor,
                address: from.clone(),
            })?;
        let to_balance = balances
            .remove(&to)
            .ok_or_else(|| OperationError::AccountNotFound {
                role: AccountRole::Creditor,
                address: to.clone(),
            })?;

        let debited = from_balance
            .checked_debit(amount)
            .ok_or(OperationError::InsufficientFunds {
                available: from_balance.value(),
                requested: amount.value(),
            })?;
        let credited = to_balance
            .checked_credit(amount)
            .ok_or_else(|| OperationError::BalanceOverflow {
                address: to.clone(),
            })?;
        debug_assert_eq!(
            u128::from(from_balance.value()) + u128::from(to_balance.value()),
            u128::from(debited.value()) + u128::from(credited.value())
        );

        // One commit for both sides.
        state
            .set(HashMap::from([
                (from.clone(), debited.encode()),
                (to.clone(), credited.encode()),
            ]))
            .await?;
        info!(%from, %to, %amount, "transfer committed");
        Ok(())
    }
}

#[async_trait]
impl LedgerHandler for WalletHandler {
    fn family_name(&self) -> &str {
        FAMILY_NAME
    }

    fn family_version(&self) -> &str {
        FAMILY_VERSION
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn apply(&self, payload: &[u8], signer: &str, state: &dyn LedgerState) -> Result<()> {
        self.apply_parsed(Instruction::parse(payload), signer, state).await
    }
}

/// Reads and decodes the balances stored at `addresses`. Addresses without
/// an account are absent from the result.
async fn read_balances(
    state: &dyn LedgerState,
    addresses: &[String],
) -> Result<HashMap<String, Balance>> {
    state
        .get(addresses)
        .await?
        .into_iter()
        .map(|(address, bytes)| -> Result<(String, Balance)> {
            let balance = Balance::decode(&address, &bytes)?;
            Ok((address, balance))
        })
        .collect()
}
