use pg_client::{
    CancellationToken, Client, Direction, EmbeddingInput, EmbeddingItem, ImageNetwork,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧮 Prediction Guard Embedding Example");
    println!("=====================================\n");

    let client = Client::from_env()?;
    let ctx = CancellationToken::new();

    // 1. Text with an image
    let image = ImageNetwork::new(
        "https://pbs.twimg.com/profile_images/1571574401107169282/ylAgz_f5_400x400.jpg",
    )?;
    let input = EmbeddingInput::Items(vec![
        EmbeddingItem::text("This is Bill Kennedy, a decent Go developer.").with_image(image),
    ]);

    let embedding = client
        .embedding(&ctx, "bridgetower-large-itm-mlm-itc", &input)
        .await?;
    for data in &embedding.data {
        println!("📐 item {}: {} dimensions", data.index, data.embedding.len());
    }

    // 2. Pre-tokenized input, truncated from the right if too long
    let input = EmbeddingInput::Tokens(vec![vec![0, 3293, 83, 10, 3034, 2]]);
    let embedding = client
        .embedding_with_truncate(&ctx, "multilingual-e5-large-instruct", &input, Direction::Right)
        .await?;
    println!("📐 tokens: {} dimensions", embedding.data[0].embedding.len());

    Ok(())
}
