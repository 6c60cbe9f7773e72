use pg_client::{CancellationToken, Client, RerankRequest, TokenizeRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📊 Prediction Guard Rerank and Tokenize Example");
    println!("===============================================\n");

    let client = Client::from_env()?;
    let ctx = CancellationToken::new();

    let request = RerankRequest::new(
        "bge-reranker-v2-m3",
        "What is Deep Learning?",
        ["Deep Learning is not pizza.", "Deep Learning is pizza."],
    )
    .with_return_documents(true);

    let rerank = client.rerank(&ctx, &request).await?;
    for result in &rerank.results {
        println!(
            "🏅 #{} score {:.4}: {}",
            result.index,
            result.relevance_score,
            result.text.as_deref().unwrap_or("")
        );
    }

    let request = TokenizeRequest::new(
        "Hermes-2-Pro-Mistral-7B",
        "how many tokens exist for this sentence.",
    );
    let tokens = client.tokenize(&ctx, &request).await?;
    println!("\n🔤 {} tokens", tokens.data.len());
    for token in &tokens.data {
        println!("  {:>6} [{}..{}] {:?}", token.id, token.start, token.stop, token.text);
    }

    Ok(())
}
