//! Address, home feed and merchant screens.

use anyhow::{Context, Result, bail};
use ifood_core::config::Config;
use ifood_core::core::{Line, LineHandle, SessionState};

use super::auth::interactive_login;
use super::{prompt_line, session_state};

const ADDRESS_HEADER: &str = "Choose your address:";
const HOME_HEADER: &str = "Feeling hungry? What do you want to eat?";
const MERCHANT_HEADER: &str = "Now it's time to pick a merchant! Go on!";
const RULE: &str = "----------------------------------------";

/// Prints the saved addresses and exits.
pub async fn addresses(config: &Config) -> Result<()> {
    let mut state = session_state(config)?;
    ensure_session(&mut state).await?;

    let lines = state.list_addresses().await.context("list addresses")?;
    render(ADDRESS_HEADER, &lines);
    if lines.is_empty() {
        println!("No addresses found.");
    }
    Ok(())
}

/// Address, then home feed card, then the merchants behind it.
pub async fn run(config: &Config) -> Result<()> {
    let mut state = session_state(config)?;
    ensure_session(&mut state).await?;

    let lines = state.list_addresses().await.context("list addresses")?;
    render(ADDRESS_HEADER, &lines);
    if lines.is_empty() {
        println!("No addresses found.");
        return Ok(());
    }

    let choice = prompt_line("> ")?;
    match pick(&lines, &choice) {
        Some(handle) => {
            state.select_address(handle)?;
        }
        None => {
            state.select_address_line(&choice);
        }
    }
    if state.navigator().selected_address().is_none() {
        bail!("No address matches '{choice}'");
    }

    let lines = state.home_feed().await.context("load home feed")?;
    render(HOME_HEADER, &lines);
    if lines.is_empty() {
        println!("Nothing on the menu here right now.");
        return Ok(());
    }

    let choice = prompt_line("> ")?;
    match pick(&lines, &choice) {
        Some(handle) => {
            state.select_home_card(handle)?;
        }
        None => {
            state.select_home_card_line(&choice);
        }
    }
    if state.navigator().selected_home_card_id().is_none() {
        bail!("No list matches '{choice}'");
    }

    let lines = state.list_merchants().await.context("list merchants")?;
    render(MERCHANT_HEADER, &lines);
    if lines.is_empty() {
        println!("No merchants found.");
    }
    Ok(())
}

/// Resumes the saved session, falling back to an interactive login.
async fn ensure_session(state: &mut SessionState) -> Result<()> {
    match state.resume().await {
        Ok(_) => Ok(()),
        Err(err) if err.needs_login() => {
            tracing::info!(error = %err, "no usable session, logging in");
            interactive_login(state).await
        }
        Err(err) => Err(err).context("resume session"),
    }
}

fn render(header: &str, lines: &[Line]) {
    println!("{header}");
    println!("{RULE}");
    for (n, line) in lines.iter().enumerate() {
        println!("{}. {}", n + 1, line.text);
    }
}

/// A 1-based number picks by position; anything else is matched as text.
fn pick(lines: &[Line], input: &str) -> Option<LineHandle> {
    let n = input.trim().parse::<usize>().ok()?;
    lines.get(n.checked_sub(1)?).map(|line| line.handle)
}
