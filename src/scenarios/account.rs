//! Account creation helper.

use crate::ledger::account::UNLIMITED_TOKEN_ASSOCIATIONS;
use crate::ledger::{
    AccountCreateTransaction, AccountId, Client, Hbar, LedgerError, LedgerResult, PrivateKey,
    TransactionId, Transport,
};
use crate::scenarios::{report, ScenarioContext, ScenarioResult};

/// Create an account owned by `key` with `initial_balance`, accepting
/// unlimited automatic token associations. Blocks until the receipt is
/// final and returns the transaction id and the new account id.
///
/// Network failures (insufficient payer balance, invalid key, timeouts)
/// propagate unchanged. A negative balance fails before anything is sent.
pub async fn create_account<T: Transport>(
    key: &PrivateKey,
    initial_balance: Hbar,
    client: &Client<T>,
) -> LedgerResult<(TransactionId, AccountId)> {
    let response = AccountCreateTransaction::new()
        .initial_balance(initial_balance)
        .key(key.public_key())
        .max_automatic_token_associations(UNLIMITED_TOKEN_ASSOCIATIONS)
        .execute(client)
        .await?;
    let receipt = response.get_receipt(client).await?;
    let account_id = receipt
        .account_id
        .ok_or(LedgerError::MissingField("account_id"))?;

    tracing::info!(
        account_id = %account_id,
        transaction_id = %response.transaction_id,
        initial_balance = %initial_balance,
        "Account created"
    );
    Ok((response.transaction_id, account_id))
}

/// Outcome of the standalone account run.
#[derive(Debug, Clone)]
pub struct AccountOutcome {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
    pub public_key: String,
}

/// Generate a key, create an account for it, and print the links.
pub async fn run<T: Transport>(
    ctx: &ScenarioContext<T>,
    initial_balance: Hbar,
) -> ScenarioResult<AccountOutcome> {
    report::banner("Creating an account");

    let key = PrivateKey::generate_ecdsa();
    let public_key = key.public_key().to_string();
    report::step(&format!("Generated key, public key: {}", public_key));

    let (transaction_id, account_id) = create_account(&key, initial_balance, &ctx.client).await?;
    report::done(&format!("Account created: {}", account_id));
    report::link("account", &ctx.explorer.account(account_id));
    report::link("transaction", &ctx.explorer.transaction(&transaction_id));
    report::finale();

    Ok(AccountOutcome {
        transaction_id,
        account_id,
        public_key,
    })
}
