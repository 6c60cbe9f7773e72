use pg_client::{CancellationToken, Client, CompletionRequest, Model};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("✏️ Prediction Guard Completion Example");
    println!("======================================\n");

    let client = Client::from_env()?;
    let ctx = CancellationToken::new();

    let request = CompletionRequest::new(Model::NeuralChat7B, "Will I lose my hair")
        .with_max_tokens(1000)
        .with_temperature(0.1)
        .with_top_p(0.1);

    let completion = client.completions(&ctx, &request).await?;
    for choice in &completion.choices {
        println!("🤖 [{}] {}", choice.model, choice.text);
    }

    Ok(())
}
