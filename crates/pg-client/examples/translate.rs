use pg_client::{CancellationToken, Client, Language};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🌍 Prediction Guard Translate Example");
    println!("=====================================\n");

    let client = Client::from_env()?;
    let ctx = CancellationToken::new();

    // Language codes parse from their ISO 639-3 form
    let target: Language = "spa".parse()?;

    let translation = client
        .translate(
            &ctx,
            "The rain in Spain stays mainly in the plain",
            Language::English,
            target,
            true,
        )
        .await?;

    println!(
        "🏆 {} ({}, score {:.3})",
        translation.best_translation, translation.best_translation_model, translation.score
    );
    for candidate in &translation.translations {
        println!("  - {}: {} [{}]", candidate.model, candidate.translation, candidate.status);
    }

    Ok(())
}
