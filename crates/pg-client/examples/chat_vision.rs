use pg_client::{CancellationToken, ChatVisionRequest, Client, ImageFile, ImageNetwork, Model};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🖼️ Prediction Guard Vision Example");
    println!("==================================\n");

    let client = Client::from_env()?;
    let ctx = CancellationToken::new();

    // Pass a local file path as the first argument, or fall back to a URL
    let request = match std::env::args().nth(1) {
        Some(path) => ChatVisionRequest::new(
            Model::Llava157BHf,
            "What is in this picture?",
            ImageFile::new(path)?,
        ),
        None => ChatVisionRequest::new(
            Model::Llava157BHf,
            "Is there a deer in this picture?",
            ImageNetwork::new("https://pbs.twimg.com/profile_images/1571574401107169282/ylAgz_f5_400x400.jpg")?,
        ),
    }
    .with_max_tokens(1000)
    .with_temperature(0.1);

    let chat = client.chat_vision(&ctx, &request).await?;
    println!("🤖 {}", chat.choices[0].message.content);

    Ok(())
}
