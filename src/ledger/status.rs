//! Network response codes.

use std::fmt;

/// A response code returned in prechecks and receipts.
///
/// Codes without a name here still round-trip; they display as `STATUS_<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

macro_rules! statuses {
    ($($name:ident = $code:literal,)*) => {
        impl Status {
            $(pub const $name: Status = Status($code);)*

            /// Symbolic name, if this code is one we know.
            pub fn name(&self) -> Option<&'static str> {
                match self.0 {
                    $($code => Some(stringify!($name)),)*
                    _ => None,
                }
            }
        }
    };
}

statuses! {
    OK = 0,
    INVALID_TRANSACTION = 1,
    PAYER_ACCOUNT_NOT_FOUND = 2,
    INVALID_NODE_ACCOUNT = 3,
    TRANSACTION_EXPIRED = 4,
    INVALID_TRANSACTION_START = 5,
    INVALID_TRANSACTION_DURATION = 6,
    INVALID_SIGNATURE = 7,
    MEMO_TOO_LONG = 8,
    INSUFFICIENT_TX_FEE = 9,
    INSUFFICIENT_PAYER_BALANCE = 10,
    DUPLICATE_TRANSACTION = 11,
    BUSY = 12,
    NOT_SUPPORTED = 13,
    INVALID_FILE_ID = 14,
    INVALID_ACCOUNT_ID = 15,
    INVALID_CONTRACT_ID = 16,
    INVALID_TRANSACTION_ID = 17,
    RECEIPT_NOT_FOUND = 18,
    RECORD_NOT_FOUND = 19,
    INVALID_SOLIDITY_ID = 20,
    UNKNOWN = 21,
    SUCCESS = 22,
    FAIL_INVALID = 23,
    FAIL_FEE = 24,
    FAIL_BALANCE = 25,
    KEY_REQUIRED = 26,
    BAD_ENCODING = 27,
    INSUFFICIENT_ACCOUNT_BALANCE = 28,
    INVALID_SOLIDITY_ADDRESS = 29,
    INSUFFICIENT_GAS = 30,
    CONTRACT_SIZE_LIMIT_EXCEEDED = 31,
    LOCAL_CALL_MODIFICATION_EXCEPTION = 32,
    CONTRACT_REVERT_EXECUTED = 33,
    CONTRACT_EXECUTION_EXCEPTION = 34,
    INVALID_TOPIC_ID = 150,
    INVALID_TOKEN_ID = 167,
}

impl Status {
    /// Precheck codes worth another attempt (possibly against another node).
    pub fn is_retryable_precheck(&self) -> bool {
        *self == Status::BUSY
    }

    /// Receipt-query outcomes meaning "not final yet, ask again".
    pub fn is_receipt_pending(&self) -> bool {
        matches!(*self, Status::BUSY | Status::UNKNOWN | Status::RECEIPT_NOT_FOUND)
    }
}

impl From<i32> for Status {
    fn from(code: i32) -> Self {
        Status(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "STATUS_{}", self.0),
        }
    }
}
