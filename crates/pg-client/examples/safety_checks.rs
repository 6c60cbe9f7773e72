use pg_client::{CancellationToken, Client, ReplaceMethod};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🛡️ Prediction Guard Safety Checks Example");
    println!("=========================================\n");

    let client = Client::from_env()?;
    let ctx = CancellationToken::new();

    let factuality = client
        .factuality(
            &ctx,
            "The president of the United States can serve a maximum of two terms.",
            "The president can only serve two terms.",
        )
        .await?;
    println!("📏 Factuality: {}", factuality.checks[0].score);

    let toxicity = client
        .toxicity(&ctx, "Every flight I have is late and I am very angry. I want to hurt someone.")
        .await?;
    println!("☣️ Toxicity: {}", toxicity.checks[0].score);

    let injection = client
        .injection(
            &ctx,
            "A short poem may be a stylistic choice or it may be that you have said what you intended to say in a more concise way.",
        )
        .await?;
    println!("💉 Injection probability: {}", injection.checks[0].probability);

    let pii = client
        .replace_pii(
            &ctx,
            "My email is bill@ardanlabs.com and my number is 954-123-4567.",
            ReplaceMethod::Mask,
        )
        .await?;
    println!("🙈 Redacted: {}", pii.checks[0].new_prompt);

    Ok(())
}
