use crate::domain::instruction::{FIELD_DELIMITER, Submission};
use crate::error::WalletError;
use serde::Deserialize;
use std::io::Read;

/// One row of an instruction file.
///
/// `amount` is kept as text so that validating it stays the handler's job.
#[derive(Debug, Deserialize, PartialEq, Clone)]
pub struct SubmissionRecord {
    pub signer: String,
    pub operation: String,
    pub amount: String,
    #[serde(default)]
    pub to: Option<String>,
}

impl From<SubmissionRecord> for Submission {
    fn from(record: SubmissionRecord) -> Self {
        let mut payload = format!("{}{}{}", record.operation, FIELD_DELIMITER, record.amount);
        if let Some(to) = record.to {
            payload.push(FIELD_DELIMITER);
            payload.push_str(&to);
        }
        Submission::new(record.signer, payload)
    }
}

/// Reads signed instructions from a CSV source with the header
/// `signer, operation, amount, to`.
///
/// This reader wraps `csv::Reader` and provides an iterator over
/// `Result<Submission>`. It handles whitespace trimming and flexible record
/// lengths, so `to` may be left off for deposits and withdrawals.
pub struct InstructionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> InstructionReader<R> {
    /// Creates a new `InstructionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads submissions.
    pub fn submissions(self) -> impl Iterator<Item = Result<Submission, WalletError>> {
        self.reader
            .into_deserialize::<SubmissionRecord>()
            .map(|result| result.map(Submission::from).map_err(WalletError::from))
    }
}
