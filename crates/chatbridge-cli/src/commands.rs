//! Subcommand implementations

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use chatbridge_core::ai::adapters::GoogleAdapter;
use chatbridge_core::ai::classify_provider;
use chatbridge_core::ai::images::image_attachment_from_path;
use chatbridge_core::{
    AiConfig, AiRouter, ChatMessage, GenerationOptions, ImageAttachment, MultimodalMessage, Role,
};

/// Everything `ask` needs from the command line
#[derive(Debug)]
pub struct AskRequest {
    pub model: String,
    pub prompt: String,
    pub images: Vec<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub stream: bool,
    pub verbose: bool,
}

pub fn classify(model: &str) -> Result<()> {
    let provider = classify_provider(model)?;
    println!("{} -> {}", model, provider.storage_key());
    Ok(())
}

pub fn models(config: &AiConfig, json: bool) -> Result<()> {
    let router = AiRouter::from_config(config)?;
    let catalog = router.available_models();

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    println!("Available models ({}):", catalog.len());
    for model in &catalog {
        let images = if model.supports_images { "images" } else { "text" };
        println!(
            "  {:<28} {:<7} max {:>6} tokens  ${}/token  {}",
            model.id,
            model.provider.to_string(),
            model.max_tokens,
            model.cost_per_token,
            images
        );
    }
    Ok(())
}

pub async fn ask(config: &AiConfig, request: AskRequest) -> Result<()> {
    let router = AiRouter::from_config(config)?;
    let options = GenerationOptions::default()
        .with_max_tokens(request.max_tokens)
        .with_temperature(request.temperature);

    if request.stream {
        if !request.images.is_empty() {
            tracing::warn!("Images are ignored when streaming");
        }
        let messages = [ChatMessage::user(request.prompt.as_str())];
        let mut stream = router
            .generate_stream_response(&messages, &request.model, options)
            .await?;

        let mut stdout = std::io::stdout();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            stdout.write_all(chunk.as_bytes())?;
            stdout.flush()?;
        }
        println!();
    } else if request.images.is_empty() {
        let messages = [ChatMessage::user(request.prompt.as_str())];
        let result = router
            .generate_response(&messages, &request.model, options)
            .await?;
        println!("{}", result.content);
    } else {
        let mut message = MultimodalMessage::new(Role::User, request.prompt.as_str());
        for source in &request.images {
            message = message.with_image(load_image(config, source).await?);
        }
        let result = router
            .generate_multimodal_response(&[message], &request.model, options)
            .await?;
        println!("{}", result.content);
    }

    if request.verbose {
        for record in router.usage_snapshot() {
            eprintln!(
                "[usage] {} {}: {} request(s), {} failure(s), {} tokens",
                record.provider, record.model, record.requests, record.failures, record.tokens
            );
        }
    }

    Ok(())
}

/// Read an image from a local path or an http(s) URL
async fn load_image(config: &AiConfig, source: &str) -> Result<ImageAttachment> {
    if source.starts_with("http://") || source.starts_with("https://") {
        let fetcher = GoogleAdapter::new(config)?;
        return fetcher
            .fetch_image_attachment(source, None)
            .await
            .with_context(|| format!("Failed to fetch image {}", source));
    }

    image_attachment_from_path(Path::new(source))
        .with_context(|| format!("Failed to load image {}", source))
}
