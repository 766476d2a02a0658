//! End-to-end scenario runs against the in-process network.

use std::io::Write;

use alloy::primitives::U256;

use hedera_starter::config::StarterConfig;
use hedera_starter::ledger::{
    ApiMethod, ContractCreateFlow, Hbar, PrivateKey, Status, TopicId,
};
use hedera_starter::LedgerError;
use hedera_starter::lifecycle::signals::HoldOutcome;
use hedera_starter::scenarios;

mod common;

fn quick_config() -> StarterConfig {
    let mut config = StarterConfig::default();
    config.delays.mirror_propagation_secs = 0;
    config.delays.subscription_hold_secs = 1;
    config
}

fn bytecode_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_consensus_scenario_receives_its_message() {
    let (network, ctx) = common::context(quick_config());

    let outcome = scenarios::consensus::run(&ctx).await.unwrap();

    assert_eq!(outcome.topic_id, TopicId::new(0, 0, 1001));
    assert_eq!(outcome.submit_status, Status::SUCCESS);
    assert_eq!(outcome.hold, HoldOutcome::Elapsed);
    assert_eq!(outcome.received.len(), 1);
    assert_eq!(outcome.received[0].contents, b"Hello, HCS!".to_vec());
    assert_eq!(outcome.received[0].sequence_number, 1);
    assert_eq!(network.topic_messages(1001), 1);

    // The scenario closes the client on its way out.
    assert!(ctx.client.is_closed());

    let submissions = network.submissions();
    let Some(hedera_starter::ledger::proto::transaction_body::Data::ConsensusCreateTopic(create)) =
        &submissions[0].body.data
    else {
        panic!("first transaction should create the topic");
    };
    assert_eq!(create.auto_renew_account, Some(common::OPERATOR_ACCOUNT.into()));
}

#[tokio::test]
async fn test_contract_scenario_inline_bytecode() {
    let file = bytecode_file("0x608060405234801561001057600080fd5b50\n");
    let mut config = quick_config();
    config.contract.bytecode_path = file.path().display().to_string();
    let (network, ctx) = common::context(config);

    let outcome = scenarios::contract::run(&ctx).await.unwrap();

    assert_eq!(outcome.initial_number, U256::from(111_111u64));
    assert_eq!(outcome.execute_status, Status::SUCCESS);
    assert_eq!(outcome.updated_number, U256::from(222_222u64));
    assert_eq!(
        ctx.explorer.contract(outcome.contract_id),
        format!("https://hashscan.io/testnet/contract/{}", outcome.contract_id)
    );

    let methods: Vec<ApiMethod> = network.submissions().iter().map(|s| s.method).collect();
    assert_eq!(methods, vec![ApiMethod::CreateContract, ApiMethod::ContractCall]);
    assert_eq!(network.file_count(), 0);
}

#[tokio::test]
async fn test_contract_scenario_large_bytecode_goes_through_a_file() {
    let file = bytecode_file(&"60".repeat(5_000));
    let mut config = quick_config();
    config.contract.bytecode_path = file.path().display().to_string();
    let (network, ctx) = common::context(config);

    let outcome = scenarios::contract::run(&ctx).await.unwrap();
    assert_eq!(outcome.updated_number, U256::from(222_222u64));

    let methods: Vec<ApiMethod> = network.submissions().iter().map(|s| s.method).collect();
    assert_eq!(
        methods,
        vec![
            ApiMethod::CreateFile,
            ApiMethod::AppendFile,
            ApiMethod::AppendFile,
            ApiMethod::CreateContract,
            ApiMethod::DeleteFile,
            ApiMethod::ContractCall,
        ]
    );
    assert_eq!(network.file_count(), 0);
}

#[tokio::test]
async fn test_reverted_deploy_still_deletes_the_bytecode_file() {
    let operator = PrivateKey::generate_ecdsa();
    let network = common::MockNetwork::new(&operator);
    let client = common::client(&network, &operator);

    // No constructor parameters, so the lookup contract's constructor reverts.
    let response = ContractCreateFlow::new()
        .bytecode(vec![0x60; 5_000])
        .gas(100_000)
        .execute(&client)
        .await
        .unwrap();
    let receipt = response.get_receipt(&client).await;

    assert!(matches!(
        receipt,
        Err(LedgerError::ReceiptStatus { status: Status::CONTRACT_REVERT_EXECUTED, .. })
    ));
    let methods: Vec<ApiMethod> = network.submissions().iter().map(|s| s.method).collect();
    assert_eq!(methods.last(), Some(&ApiMethod::DeleteFile));
    assert_eq!(network.file_count(), 0);
}

#[tokio::test]
async fn test_contract_scenario_missing_bytecode() {
    let mut config = quick_config();
    config.contract.bytecode_path = "/no/such/LookupContract.bin".to_string();
    let (network, ctx) = common::context(config);

    let result = scenarios::contract::run(&ctx).await;

    assert!(matches!(result, Err(scenarios::ScenarioError::Io { .. })));
    assert!(network.submissions().is_empty());
}

#[tokio::test]
async fn test_token_scenario_mints_every_metadata_entry() {
    let (network, ctx) = common::context(quick_config());

    let outcome = scenarios::token::run(&ctx).await.unwrap();

    assert_eq!(outcome.mint_status, Status::SUCCESS);
    assert_eq!(outcome.serials, vec![1, 2, 3, 4, 5]);
    assert_eq!(
        ctx.explorer.nft(outcome.token_id, 5),
        format!("https://hashscan.io/testnet/token/{}/5", outcome.token_id)
    );
    assert!(network.account_key(outcome.treasury_id).is_some());

    let submissions = network.submissions();
    let methods: Vec<ApiMethod> = submissions.iter().map(|s| s.method).collect();
    assert_eq!(
        methods,
        vec![ApiMethod::CreateAccount, ApiMethod::CreateToken, ApiMethod::MintToken]
    );
    // Token create carries operator + treasury, mint carries operator + supply key.
    assert_eq!(submissions[1].signers.len(), 2);
    assert_eq!(submissions[2].signers.len(), 2);
}

#[tokio::test]
async fn test_account_scenario() {
    let (network, ctx) = common::context(quick_config());

    let outcome = scenarios::account::run(&ctx, Hbar::new(2)).await.unwrap();

    assert!(outcome
        .public_key
        .starts_with("302d300706052a8648ce3d020106052b8104000a032200"));
    assert_eq!(network.submissions().len(), 1);
    assert_eq!(
        ctx.explorer.account(outcome.account_id),
        format!("https://hashscan.io/testnet/account/{}", outcome.account_id)
    );
}
