use pg_client::{CancellationToken, Capability, Client};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔎 Prediction Guard Capability Example");
    println!("======================================\n");

    // Set PREDICTIONGUARD_API_KEY (and optionally PREDICTIONGUARD_URL) before running
    let client = Client::from_env()?;
    let ctx = CancellationToken::new();

    println!("💓 Health: {}", client.health_check(&ctx).await?);

    for capability in Capability::all() {
        let models = client.capability(&ctx, capability).await?;
        println!("\n📦 {capability}: {} model(s)", models.data.len());
        for model in &models.data {
            println!(
                "  - {} (context {}, owned by {})",
                model.id, model.max_context_length, model.owned_by
            );
        }
    }

    Ok(())
}
