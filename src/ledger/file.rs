//! File service transactions, used to stage large contract bytecode.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::ledger::account::DEFAULT_AUTO_RENEW_PERIOD_SECS;
use crate::ledger::proto;
use crate::ledger::transaction::{Transaction, TransactionData};
use crate::ledger::transport::ApiMethod;
use crate::ledger::types::{FileId, LedgerError, LedgerResult};
use crate::ledger::wallet::PublicKey;

/// Largest content chunk sent in one create or append.
pub const FILE_CHUNK_BYTES: usize = 4096;

#[derive(Debug, Clone, Default)]
pub struct FileCreateData {
    keys: Vec<PublicKey>,
    contents: Vec<u8>,
    file_memo: String,
}

impl TransactionData for FileCreateData {
    const METHOD: ApiMethod = ApiMethod::CreateFile;

    fn validate(&self) -> LedgerResult<()> {
        check_chunk(&self.contents)
    }

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        let expiration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
            + DEFAULT_AUTO_RENEW_PERIOD_SECS;
        Ok(proto::transaction_body::Data::FileCreate(
            proto::FileCreateTransactionBody {
                expiration_time: Some(proto::Timestamp {
                    seconds: expiration,
                    nanos: 0,
                }),
                keys: Some(proto::KeyList {
                    keys: self.keys.iter().map(proto::Key::from).collect(),
                }),
                contents: self.contents.clone(),
                memo: self.file_memo.clone(),
            },
        ))
    }
}

pub type FileCreateTransaction = Transaction<FileCreateData>;

impl Transaction<FileCreateData> {
    /// Keys that must sign to modify or delete the file.
    pub fn keys(mut self, keys: Vec<PublicKey>) -> Self {
        self.data_mut().keys = keys;
        self
    }

    pub fn contents(mut self, contents: Vec<u8>) -> Self {
        self.data_mut().contents = contents;
        self
    }

    pub fn file_memo(mut self, memo: impl Into<String>) -> Self {
        self.data_mut().file_memo = memo.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileAppendData {
    file_id: Option<FileId>,
    contents: Vec<u8>,
}

impl TransactionData for FileAppendData {
    const METHOD: ApiMethod = ApiMethod::AppendFile;

    fn validate(&self) -> LedgerResult<()> {
        if self.file_id.is_none() {
            return Err(LedgerError::InvalidArgument(
                "file append requires a file id".to_string(),
            ));
        }
        check_chunk(&self.contents)
    }

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        Ok(proto::transaction_body::Data::FileAppend(
            proto::FileAppendTransactionBody {
                file_id: self.file_id.map(Into::into),
                contents: self.contents.clone(),
            },
        ))
    }
}

pub type FileAppendTransaction = Transaction<FileAppendData>;

impl Transaction<FileAppendData> {
    pub fn file_id(mut self, id: FileId) -> Self {
        self.data_mut().file_id = Some(id);
        self
    }

    pub fn contents(mut self, contents: Vec<u8>) -> Self {
        self.data_mut().contents = contents;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FileDeleteData {
    file_id: Option<FileId>,
}

impl TransactionData for FileDeleteData {
    const METHOD: ApiMethod = ApiMethod::DeleteFile;

    fn validate(&self) -> LedgerResult<()> {
        if self.file_id.is_none() {
            return Err(LedgerError::InvalidArgument(
                "file delete requires a file id".to_string(),
            ));
        }
        Ok(())
    }

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        Ok(proto::transaction_body::Data::FileDelete(
            proto::FileDeleteTransactionBody {
                file_id: self.file_id.map(Into::into),
            },
        ))
    }
}

pub type FileDeleteTransaction = Transaction<FileDeleteData>;

impl Transaction<FileDeleteData> {
    pub fn file_id(mut self, id: FileId) -> Self {
        self.data_mut().file_id = Some(id);
        self
    }
}

fn check_chunk(contents: &[u8]) -> LedgerResult<()> {
    if contents.len() > FILE_CHUNK_BYTES {
        return Err(LedgerError::InvalidArgument(format!(
            "file chunk is {} bytes, limit is {}",
            contents.len(),
            FILE_CHUNK_BYTES
        )));
    }
    Ok(())
}
