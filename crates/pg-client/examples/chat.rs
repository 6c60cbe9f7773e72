use pg_client::{
    CancellationToken, ChatInputMessage, ChatRequest, Client, InputExtension, Model,
    OutputExtension, Pii, ReplaceMethod,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("💬 Prediction Guard Chat Example");
    println!("================================\n");

    let client = Client::from_env()?;

    // 1. Single prompt, cancelled if it takes longer than 30 seconds
    let ctx = CancellationToken::new();
    let deadline = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(30)).await;
        deadline.cancel();
    });

    let request = ChatRequest::new(Model::NeuralChat7B, "How do you feel about the world in general?")
        .with_max_tokens(1000)
        .with_temperature(0.1);

    let chat = client.chat(&ctx, &request).await?;
    println!("🤖 {}", chat.choices[0].message.content);

    // 2. Conversation with input and output checks
    let request = ChatRequest::new(
        Model::Hermes2ProMistral7B,
        vec![
            ChatInputMessage::system("You are a helpful assistant. Keep answers short."),
            ChatInputMessage::user("My name is Bill and my phone number is 954-123-4567."),
            ChatInputMessage::assistant("Nice to meet you."),
            ChatInputMessage::user("What is my name?"),
        ],
    )
    .with_max_tokens(200)
    .with_input_extension(InputExtension {
        block_prompt_injection: true,
        pii: Some(Pii::Replace),
        pii_replace_method: Some(ReplaceMethod::Mask),
    })
    .with_output_extension(OutputExtension {
        factuality: false,
        toxicity: true,
    });

    let chat = client.chat(&ctx, &request).await?;
    for choice in &chat.choices {
        println!("\n🤖 [{}] {}", choice.status, choice.message.content);
    }

    Ok(())
}
