//! Console output for scenario runs.
//!
//! Human-facing lines go to stdout; diagnostics go through `tracing`.

use crate::ledger::TopicMessage;

pub fn banner(title: &str) {
    println!("\n🟠 {} 🟠", title);
}

pub fn step(text: &str) {
    println!("\n- {}", text);
}

pub fn done(text: &str) {
    println!("- {} ✅", text);
}

pub fn link(what: &str, url: &str) {
    println!("- See {} in network explorer: {} 🔗", what, url);
}

pub fn message_received(message: &TopicMessage) {
    println!(
        "- New message received: {} | {}",
        message.consensus_timestamp.to_rfc3339(),
        String::from_utf8_lossy(&message.contents)
    );
}

pub fn finale() {
    println!("\n- THE END ============================================================\n");
}
