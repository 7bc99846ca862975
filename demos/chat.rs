use anyhow::Context;
use group_chat::{Notification, TurnReport};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv_override().ok();
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let conversation_id = std::env::args()
        .nth(1)
        .context("usage: chat <conversation-id> [message]")?;
    let text = std::env::args().nth(2);

    let conversation = group_chat::join(&conversation_id);

    let mut notifications = conversation.subscribe();
    tokio::spawn(async move {
        while let Ok(notification) = notifications.recv().await {
            if let Notification::Message(message) = notification {
                let speaker = message.agent_id().unwrap_or("you").to_string();
                println!("[{}] {}", speaker, message.content());
            }
        }
    });

    let report: TurnReport = match text {
        Some(text) => conversation.send_message(&text).await?,
        None => conversation
            .request_turn(group_chat::types::TurnTrigger::UserMessage, None)
            .await?,
    };
    println!(
        "turn finished with {} message(s); state: {:?}",
        report.messages().len(),
        conversation.snapshot()
    );

    // Let auto-continued rounds stream for a while before exiting.
    tokio::time::sleep(std::time::Duration::from_secs(30)).await;
    Ok(())
}
