//! Consensus scenario: create a topic, subscribe, submit a message.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::ledger::{
    LedgerError, Status, TopicCreateTransaction, TopicId, TopicMessage, TopicMessageQuery,
    TopicMessageSubmitTransaction, Transport,
};
use crate::lifecycle::signals::{self, HoldOutcome};
use crate::scenarios::{report, ScenarioContext, ScenarioResult};

#[derive(Debug, Clone)]
pub struct ConsensusOutcome {
    pub topic_id: TopicId,
    pub submit_status: Status,
    /// Messages the subscription delivered before the client closed.
    pub received: Vec<TopicMessage>,
    pub hold: HoldOutcome,
}

pub async fn run<T: Transport>(ctx: &ScenarioContext<T>) -> ScenarioResult<ConsensusOutcome> {
    let client = &ctx.client;
    let settings = &ctx.config;

    report::banner("Creating, subscribing to, and submitting to a topic");

    report::step("Creating topic");
    let mut create = TopicCreateTransaction::new().auto_renew_account_id(client.operator_account_id());
    if !settings.consensus.topic_memo.is_empty() {
        create = create.topic_memo(settings.consensus.topic_memo.clone());
    }
    let response = create.execute(client).await?;
    let receipt = response.get_receipt(client).await?;
    let topic_id = receipt
        .topic_id
        .ok_or(LedgerError::MissingField("topic_id"))?;
    report::done(&format!("Topic created: {}", topic_id));
    report::link("topic", &ctx.explorer.topic(topic_id));
    report::link("transaction", &ctx.explorer.transaction(&response.transaction_id));

    let propagation = Duration::from_secs(settings.delays.mirror_propagation_secs);
    report::step(&format!(
        "Waiting {}s for the topic to reach the mirror node",
        propagation.as_secs()
    ));
    tokio::time::sleep(propagation).await;

    report::step("Subscribing to topic");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let subscription = TopicMessageQuery::new()
        .topic_id(topic_id)
        .subscribe(client, move |message| {
            report::message_received(&message);
            let _ = tx.send(message);
        })?;

    report::step(&format!("Submitting message: {}", settings.consensus.message));
    let response = TopicMessageSubmitTransaction::new()
        .topic_id(topic_id)
        .message(settings.consensus.message.clone())
        .execute(client)
        .await?;
    let receipt = response.get_receipt(client).await?;
    report::done(&format!(
        "Message submitted: {} (sequence {})",
        receipt.status, receipt.topic_sequence_number
    ));
    report::link("transaction", &ctx.explorer.transaction(&response.transaction_id));

    let hold = signals::hold(Duration::from_secs(settings.delays.subscription_hold_secs)).await;
    report::finale();

    client.close();
    subscription.join().await;

    let mut received = Vec::new();
    while let Ok(message) = rx.try_recv() {
        received.push(message);
    }
    tracing::info!(
        topic_id = %topic_id,
        received = received.len(),
        hold = ?hold,
        "Consensus scenario finished"
    );

    Ok(ConsensusOutcome {
        topic_id,
        submit_status: receipt.status,
        received,
        hold,
    })
}
