//! Account creation against the in-process network.

use hedera_starter::ledger::proto;
use hedera_starter::ledger::{
    AccountId, ApiMethod, Hbar, LedgerError, PrivateKey, Status, TokenCreateTransaction,
    TokenSupplyType, TokenType,
};
use hedera_starter::scenarios::account::create_account;

mod common;

use common::{MockNetwork, OPERATOR_ACCOUNT};

fn setup() -> (MockNetwork, PrivateKey, hedera_starter::Client<MockNetwork>) {
    let operator = PrivateKey::generate_ecdsa();
    let network = MockNetwork::new(&operator);
    let client = common::client(&network, &operator);
    (network, operator, client)
}

#[tokio::test]
async fn test_create_account_returns_ids() {
    let (network, operator, client) = setup();
    let key = PrivateKey::generate_ecdsa();

    let (transaction_id, account_id) = create_account(&key, Hbar::new(1), &client).await.unwrap();

    assert_eq!(transaction_id.account_id, OPERATOR_ACCOUNT);
    assert_eq!(account_id, AccountId::new(0, 0, 1001));
    assert!(!account_id.to_string().is_empty());
    assert!(!transaction_id.to_string().is_empty());
    assert_eq!(network.account_key(account_id), Some(key.public_key().to_bytes()));

    let submissions = network.submissions();
    assert_eq!(submissions.len(), 1);
    let submission = &submissions[0];
    assert_eq!(submission.method, ApiMethod::CreateAccount);
    assert_eq!(submission.precheck, Status::OK);
    assert_eq!(submission.signers, vec![operator.public_key().to_bytes()]);

    let Some(proto::transaction_body::Data::CryptoCreateAccount(body)) = &submission.body.data else {
        panic!("expected an account create body");
    };
    assert_eq!(body.initial_balance, 100_000_000);
    assert_eq!(body.max_automatic_token_associations, -1);
}

#[tokio::test]
async fn test_zero_balance_is_allowed() {
    let (_, _, client) = setup();
    let key = PrivateKey::generate_ecdsa();
    assert!(create_account(&key, Hbar::ZERO, &client).await.is_ok());
}

#[tokio::test]
async fn test_negative_balance_fails_before_sending() {
    let (network, _, client) = setup();
    let key = PrivateKey::generate_ecdsa();

    let result = create_account(&key, Hbar::new(-1), &client).await;

    assert!(matches!(result, Err(LedgerError::InvalidArgument(_))));
    assert!(network.submissions().is_empty());
}

#[tokio::test]
async fn test_receipt_is_polled_until_final() {
    let (network, _, client) = setup();
    let key = PrivateKey::generate_ecdsa();

    create_account(&key, Hbar::new(1), &client).await.unwrap();

    let receipt_queries = network
        .queries()
        .iter()
        .filter(|(_, method)| *method == ApiMethod::GetReceipt)
        .count();
    assert!(receipt_queries >= 2, "expected a pending poll, got {}", receipt_queries);
}

#[tokio::test]
async fn test_busy_node_is_retried_on_another_node() {
    let (network, _, client) = setup();
    network.inject_precheck(3, Status::BUSY, 1);

    let key = PrivateKey::generate_ecdsa();
    create_account(&key, Hbar::new(1), &client).await.unwrap();

    let submissions = network.submissions();
    assert_eq!(submissions.len(), 2);
    assert_eq!(submissions[0].node, AccountId::new(0, 0, 3));
    assert_eq!(submissions[0].precheck, Status::BUSY);
    assert_eq!(submissions[1].node, AccountId::new(0, 0, 4));
    assert_eq!(submissions[1].precheck, Status::OK);
    assert_eq!(submissions[0].transaction_id, submissions[1].transaction_id);
}

#[tokio::test]
async fn test_unreachable_node_is_skipped() {
    let (network, _, client) = setup();
    network.make_unreachable(3);

    let key = PrivateKey::generate_ecdsa();
    create_account(&key, Hbar::new(1), &client).await.unwrap();

    let submissions = network.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].node, AccountId::new(0, 0, 4));
}

#[tokio::test]
async fn test_busy_everywhere_exhausts_attempts() {
    let (network, _, client) = setup();
    for node in [3, 4, 5] {
        network.inject_precheck(node, Status::BUSY, 10);
    }

    let key = PrivateKey::generate_ecdsa();
    let result = create_account(&key, Hbar::new(1), &client).await;

    assert!(matches!(result, Err(LedgerError::AttemptsExhausted(5))));
    assert_eq!(network.submissions().len(), 5);
}

#[tokio::test]
async fn test_other_precheck_failures_surface_immediately() {
    let (network, _, client) = setup();
    network.inject_precheck(3, Status::INSUFFICIENT_PAYER_BALANCE, 1);

    let key = PrivateKey::generate_ecdsa();
    let result = create_account(&key, Hbar::new(1), &client).await;

    match result {
        Err(LedgerError::Precheck { status, .. }) => {
            assert_eq!(status, Status::INSUFFICIENT_PAYER_BALANCE)
        }
        other => panic!("expected precheck failure, got {:?}", other),
    }
    assert_eq!(network.submissions().len(), 1);
}

#[tokio::test]
async fn test_failed_receipt_surfaces_as_error() {
    let (network, _, client) = setup();
    network.fail_next_receipt(Status::INSUFFICIENT_PAYER_BALANCE);

    let key = PrivateKey::generate_ecdsa();
    let result = create_account(&key, Hbar::new(1_000), &client).await;

    match result {
        Err(LedgerError::ReceiptStatus { status, transaction_id }) => {
            assert_eq!(status, Status::INSUFFICIENT_PAYER_BALANCE);
            assert_eq!(transaction_id, network.submissions()[0].transaction_id);
        }
        other => panic!("expected receipt failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_closed_client_rejects_requests() {
    let (network, _, client) = setup();
    client.close();

    let key = PrivateKey::generate_ecdsa();
    let result = create_account(&key, Hbar::new(1), &client).await;

    assert!(matches!(result, Err(LedgerError::ClientClosed)));
    assert!(network.submissions().is_empty());
}

#[tokio::test]
async fn test_cosigner_signatures_are_attached() {
    let (network, operator, client) = setup();
    let treasury_key = PrivateKey::generate_ecdsa();
    let (_, treasury) = create_account(&treasury_key, Hbar::new(1), &client).await.unwrap();

    let supply_key = PrivateKey::generate_ecdsa();
    let create = || {
        TokenCreateTransaction::new()
            .name("CARBON OFFSETS")
            .symbol("CO2OFFS")
            .token_type(TokenType::NonFungibleUnique)
            .treasury_account_id(treasury)
            .supply_type(TokenSupplyType::Finite)
            .max_supply(10)
            .supply_key(supply_key.public_key())
    };

    // Without the treasury's signature the network rejects the create.
    let unsigned = create().execute(&client).await.unwrap();
    match unsigned.get_receipt(&client).await {
        Err(LedgerError::ReceiptStatus { status, .. }) => {
            assert_eq!(status, Status::INVALID_SIGNATURE)
        }
        other => panic!("expected INVALID_SIGNATURE, got {:?}", other),
    }

    let signed = create()
        .freeze_with(&client)
        .unwrap()
        .sign(treasury_key.clone())
        .execute(&client)
        .await
        .unwrap();
    let receipt = signed.get_receipt(&client).await.unwrap();
    assert!(receipt.token_id.is_some());

    let last = network.submissions().pop().unwrap();
    assert_eq!(
        last.signers,
        vec![
            operator.public_key().to_bytes(),
            treasury_key.public_key().to_bytes()
        ]
    );
}
