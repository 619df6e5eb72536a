//! Login, logout and token refresh commands.

use anyhow::{Context, Result, bail};
use ifood_core::IfoodError;
use ifood_core::config::Config;
use ifood_core::core::SessionState;
use ifood_core::credentials::{CredentialStore, mask_token};

use super::{confirm, prompt, session_state};

const MAX_CODE_ATTEMPTS: usize = 3;

pub async fn login(config: &Config) -> Result<()> {
    let mut state = session_state(config)?;

    if let Ok(existing) = state.store().load() {
        println!(
            "Already logged in (token: {}).",
            mask_token(&existing.access_token)
        );
        if !confirm("Do you want to replace the existing credentials? [y/N] ")? {
            println!("Login cancelled.");
            return Ok(());
        }
    }

    interactive_login(&mut state).await
}

/// Email, code, authenticate, save. Used by `login` and by `browse`
/// when no usable session exists.
pub async fn interactive_login(state: &mut SessionState) -> Result<()> {
    let email = prompt("Let's login. Write your email: ")?;
    if email.is_empty() {
        bail!("Email cannot be empty");
    }

    state
        .begin_login(&email)
        .await
        .context("request one-time code")?;
    println!("Get the code in your email");

    let mut attempts = 0;
    let credentials = loop {
        attempts += 1;
        let code = prompt("Now, insert the code: ")?;
        match state.complete_login(&code).await {
            Ok(credentials) => break credentials,
            Err(IfoodError::InvalidCode) if attempts < MAX_CODE_ATTEMPTS => {
                println!("That code was not accepted. Try again.");
            }
            Err(err) => return Err(err).context("complete login"),
        }
    };

    println!(
        "✓ Logged in (token: {})",
        mask_token(&credentials.access_token)
    );
    println!("  Credentials saved to: {}", state.store().path().display());
    Ok(())
}

pub fn logout() -> Result<()> {
    let store = CredentialStore::default();
    if store.clear().context("remove credentials")? {
        println!("✓ Logged out (removed {}).", store.path().display());
    } else {
        println!("Not logged in (no credentials found).");
    }
    Ok(())
}

pub async fn refresh(config: &Config) -> Result<()> {
    let mut state = session_state(config)?;
    match state.resume().await {
        Ok(credentials) => {
            println!(
                "✓ Token refreshed (token: {})",
                mask_token(&credentials.access_token)
            );
            Ok(())
        }
        Err(err) if err.needs_login() => {
            bail!("{err}. Run 'ifood login' to sign in again.")
        }
        Err(err) => Err(err).context("refresh session"),
    }
}
