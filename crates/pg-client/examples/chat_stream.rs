use futures::StreamExt;
use pg_client::{
    CancellationToken, ChatInputMessage, ChatRequest, Client, OverflowPolicy, Model, StreamConfig,
};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔄 Prediction Guard Streaming Chat Example");
    println!("==========================================\n");

    let client = Client::from_env()?.with_stream_config(
        StreamConfig::default()
            .with_buffer_size(32)
            .with_overflow(OverflowPolicy::Block),
    );
    let ctx = CancellationToken::new();

    let request = ChatRequest::new(
        Model::NeuralChat7B,
        vec![
            ChatInputMessage::system("You are a creative writer."),
            ChatInputMessage::user("Write a very short story about a robot learning to dream."),
        ],
    )
    .with_max_tokens(300)
    .with_temperature(0.8);

    let mut stream = client.chat_sse(&ctx, &request).await?;

    // Ctrl-C cancels the stream
    let interrupt = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    print!("🤖 ");
    while let Some(event) = stream.next().await {
        match event {
            Ok(event) => {
                if let Some(error) = event.error {
                    println!("\n❌ Server error: {error}");
                    break;
                }
                for choice in event.choices {
                    if let Some(content) = choice.delta.content {
                        print!("{content}");
                        std::io::stdout().flush()?;
                    }
                }
            }
            Err(e) => {
                println!("\n❌ Stream error: {e}");
                break;
            }
        }
    }
    println!("\n✅ Stream completed");

    Ok(())
}
