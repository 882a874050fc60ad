use crate::domain::account::AccountBalance;
use crate::error::WalletError;
use std::io::Write;

/// Writes account balances as CSV with the header `key,address,balance`.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(
        &mut self,
        accounts: impl IntoIterator<Item = AccountBalance>,
    ) -> Result<(), WalletError> {
        for account in accounts {
            self.writer.serialize(account)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
