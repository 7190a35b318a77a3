use anyhow::{Context, Result};
use health_insights_service::{
    GenerationParams, GroqGateway, ServiceConfig, tasks::pdf_extract::extract_text,
    tasks::translate_document,
};
use std::env;

const PREVIEW_CHARS: usize = 500;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <pdf_file_path> [language]", args[0]);
        eprintln!("Example: {} /path/to/lab-results.pdf German", args[0]);
        std::process::exit(1);
    }

    let pdf_path = &args[1];
    let language = args.get(2).map(String::as_str);

    let bytes = tokio::fs::read(pdf_path)
        .await
        .with_context(|| format!("Failed to read {}", pdf_path))?;
    let text = extract_text(&bytes)?;

    println!("Extracted {} characters from {}", text.chars().count(), pdf_path);
    println!("────────────────────────────────────");
    if text.chars().count() > PREVIEW_CHARS {
        let truncated: String = text.chars().take(PREVIEW_CHARS).collect();
        println!("{}...", truncated);
    } else {
        println!("{}", text);
    }
    println!();

    if text.trim().is_empty() {
        eprintln!("No extractable text; the service would answer 400 for this file");
        return Ok(());
    }

    let config = ServiceConfig::from_env();
    if config.api_key.is_none() {
        println!("GROQ_API_KEY not set, skipping translation");
        return Ok(());
    }

    let gateway = GroqGateway::new(config.base_url.clone(), config.api_key.clone());
    let params = GenerationParams::new(config.model.clone());
    let output = translate_document(&gateway, &params, &text, language).await?;

    println!("Formatted output ({}):", language.unwrap_or("original language"));
    println!("────────────────────────────────────");
    println!("{}", output);

    Ok(())
}
