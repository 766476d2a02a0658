//! Topic subscriptions against the in-process network.

use std::time::Duration;

use chrono::TimeDelta;
use tokio::sync::mpsc;

use hedera_starter::ledger::{
    PrivateKey, TopicCreateTransaction, TopicId, TopicMessage, TopicMessageQuery,
    TopicMessageSubmitTransaction,
};
use hedera_starter::Client;

mod common;

use common::MockNetwork;

async fn topic_with_messages(client: &Client<MockNetwork>, messages: &[&str]) -> TopicId {
    let receipt = TopicCreateTransaction::new()
        .execute(client)
        .await
        .unwrap()
        .get_receipt(client)
        .await
        .unwrap();
    let topic_id = receipt.topic_id.unwrap();

    for message in messages {
        TopicMessageSubmitTransaction::new()
            .topic_id(topic_id)
            .message(message.as_bytes().to_vec())
            .execute(client)
            .await
            .unwrap()
            .get_receipt(client)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    topic_id
}

async fn collect(client: &Client<MockNetwork>, query: TopicMessageQuery, expected: usize) -> Vec<TopicMessage> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let subscription = query
        .subscribe(client, move |message| {
            let _ = tx.send(message);
        })
        .unwrap();

    let mut received = Vec::new();
    while received.len() < expected {
        let message = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("message within timeout")
            .expect("subscription still running");
        received.push(message);
    }
    subscription.abort();
    received
}

#[tokio::test]
async fn test_limit_ends_the_subscription() {
    let operator = PrivateKey::generate_ecdsa();
    let network = MockNetwork::new(&operator);
    let client = common::client(&network, &operator);
    let topic_id = topic_with_messages(&client, &["first", "second"]).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let subscription = TopicMessageQuery::new()
        .topic_id(topic_id)
        .limit(1)
        .subscribe(&client, move |message| {
            let _ = tx.send(message);
        })
        .unwrap();
    tokio::time::timeout(Duration::from_secs(5), subscription.join())
        .await
        .unwrap();

    let first = rx.recv().await.unwrap();
    assert_eq!(first.contents, b"first".to_vec());
    assert_eq!(first.sequence_number, 1);
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn test_start_time_skips_earlier_messages() {
    let operator = PrivateKey::generate_ecdsa();
    let network = MockNetwork::new(&operator);
    let client = common::client(&network, &operator);
    let topic_id = topic_with_messages(&client, &["first", "second", "third"]).await;

    let all = collect(&client, TopicMessageQuery::new().topic_id(topic_id), 3).await;
    let sequence: Vec<u64> = all.iter().map(|m| m.sequence_number).collect();
    assert_eq!(sequence, vec![1, 2, 3]);

    let after_first = all[0].consensus_timestamp + TimeDelta::nanoseconds(1);
    let rest = collect(
        &client,
        TopicMessageQuery::new().topic_id(topic_id).start_time(after_first),
        2,
    )
    .await;
    assert_eq!(rest[0].contents, b"second".to_vec());
    assert_eq!(rest[1].contents, b"third".to_vec());
}
