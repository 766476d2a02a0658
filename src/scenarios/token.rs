//! Token scenario: treasury account, NFT collection, mint.

use crate::ledger::{
    AccountId, Hbar, LedgerError, PrivateKey, Status, TokenCreateTransaction, TokenId,
    TokenMintTransaction, TokenSupplyType, TokenType, Transport,
};
use crate::scenarios::account::create_account;
use crate::scenarios::{report, ScenarioContext, ScenarioResult};

#[derive(Debug, Clone)]
pub struct TokenOutcome {
    pub treasury_id: AccountId,
    pub token_id: TokenId,
    pub mint_status: Status,
    pub serials: Vec<i64>,
}

pub async fn run<T: Transport>(ctx: &ScenarioContext<T>) -> ScenarioResult<TokenOutcome> {
    let client = &ctx.client;
    let settings = &ctx.config.token;

    report::banner("Creating and minting an NFT collection");

    let supply_key = PrivateKey::generate_ecdsa();
    let treasury_key = PrivateKey::generate_ecdsa();

    report::step("Creating treasury account");
    let (transaction_id, treasury_id) =
        create_account(&treasury_key, Hbar::new(settings.treasury_balance_hbar), client).await?;
    report::done(&format!("Treasury account created: {}", treasury_id));
    report::link("account", &ctx.explorer.account(treasury_id));
    report::link("transaction", &ctx.explorer.transaction(&transaction_id));

    report::step(&format!("Creating NFT collection {} ({})", settings.name, settings.symbol));
    let response = TokenCreateTransaction::new()
        .name(settings.name.clone())
        .symbol(settings.symbol.clone())
        .token_type(TokenType::NonFungibleUnique)
        .decimals(0)
        .initial_supply(0)
        .treasury_account_id(treasury_id)
        .supply_type(TokenSupplyType::Finite)
        .max_supply(settings.max_supply)
        .supply_key(supply_key.public_key())
        .freeze_with(client)?
        .sign(treasury_key)
        .execute(client)
        .await?;
    let receipt = response.get_receipt(client).await?;
    let token_id = receipt.token_id.ok_or(LedgerError::MissingField("token_id"))?;
    report::done(&format!("Token created: {}", token_id));
    report::link("token", &ctx.explorer.token(token_id));
    report::link("transaction", &ctx.explorer.transaction(&response.transaction_id));

    report::step(&format!("Minting {} NFTs", settings.metadata.len()));
    let response = TokenMintTransaction::new()
        .token_id(token_id)
        .metadata(settings.metadata.iter().map(|m| m.as_bytes().to_vec()))
        .freeze_with(client)?
        .sign(supply_key)
        .execute(client)
        .await?;
    let receipt = response.get_receipt(client).await?;
    report::done(&format!("Token minted: {}", receipt.status));
    report::link("transaction", &ctx.explorer.transaction(&response.transaction_id));
    for serial in &receipt.serial_numbers {
        report::link(&format!("NFT serial {}", serial), &ctx.explorer.nft(token_id, *serial));
    }
    report::finale();

    Ok(TokenOutcome {
        treasury_id,
        token_id,
        mint_status: receipt.status,
        serials: receipt.serial_numbers,
    })
}
