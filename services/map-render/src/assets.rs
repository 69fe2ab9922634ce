//! Startup loading of note icons from disk or over HTTP.

use std::time::Duration;

use anyhow::{Context, Result};
use renderer::NoteIcons;
use reqwest::Client;
use tracing::info;

use crate::config::{HttpConfig, SymbolsConfig};

/// Build the HTTP client used for icon downloads.
pub fn http_client(http: &HttpConfig) -> Result<Client> {
    Client::builder()
        .user_agent(http.user_agent.clone())
        .timeout(Duration::from_secs(http.timeout_secs))
        .build()
        .context("Failed to create HTTP client")
}

/// Fetch and decode both note icons.
pub async fn load_note_icons(symbols: &SymbolsConfig, client: &Client) -> Result<NoteIcons> {
    let open = fetch_bytes(&symbols.note_open, client).await?;
    let closed = fetch_bytes(&symbols.note_solved, client).await?;
    let icons = NoteIcons::from_bytes(&open, &closed)?;
    info!(
        open = %symbols.note_open,
        solved = %symbols.note_solved,
        "Loaded note icons"
    );
    Ok(icons)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch_bytes(source: &str, client: &Client) -> Result<Vec<u8>> {
    if is_remote(source) {
        let response = client
            .get(source)
            .send()
            .await
            .with_context(|| format!("Failed to request icon {}", source))?
            .error_for_status()
            .with_context(|| format!("Icon request to {} failed", source))?;
        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read icon body from {}", source))?;
        Ok(bytes.to_vec())
    } else {
        tokio::fs::read(source)
            .await
            .with_context(|| format!("Failed to read icon file {}", source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/icon.png"));
        assert!(is_remote("http://example.org/icon.png"));
        assert!(!is_remote("assets/http_icon.png"));
        assert!(!is_remote("/srv/icons/open.png"));
    }

    #[tokio::test]
    async fn test_missing_local_icon_fails() {
        let client = http_client(&HttpConfig::default()).unwrap();
        let symbols = SymbolsConfig {
            note_open: "/nonexistent/open.png".to_string(),
            note_solved: "/nonexistent/closed.png".to_string(),
        };
        let err = load_note_icons(&symbols, &client).await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/open.png"));
    }
}
