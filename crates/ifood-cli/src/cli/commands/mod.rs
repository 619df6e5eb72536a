pub mod auth;
pub mod browse;
pub mod config;

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};
use ifood_core::api::{ApiClient, ApiConfig};
use ifood_core::config::Config;
use ifood_core::core::SessionState;
use ifood_core::credentials::CredentialStore;

/// Wires the API client and the credential file into a fresh session.
fn session_state(config: &Config) -> Result<SessionState> {
    let api = ApiClient::new(ApiConfig::from_config(config).context("resolve API settings")?);
    Ok(SessionState::new(api, CredentialStore::default()))
}

/// Prints `message` and reads one trimmed line from stdin.
fn prompt(message: &str) -> Result<String> {
    Ok(prompt_line(message)?.trim().to_string())
}

/// Like [`prompt`] but only strips the line ending, so the answer can be
/// matched against display lines that start or end with blanks.
fn prompt_line(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut input)
        .context("read from stdin")?;
    if read == 0 {
        bail!("No input (stdin closed)");
    }
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn confirm(message: &str) -> Result<bool> {
    let answer = prompt(message)?;
    Ok(answer.eq_ignore_ascii_case("y"))
}
