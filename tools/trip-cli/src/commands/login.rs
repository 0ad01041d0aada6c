//! Sign in and out.

use anyhow::{bail, Context as _, Result};
use dialoguer::Password;
use trip_cache::CredentialStore;

use super::LoginArgs;
use crate::context::Context;

/// Store a bearer token for later commands.
pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let token = match args.token {
        Some(token) => token,
        None if ctx.output.is_json() => bail!("--token is required with --json"),
        None => Password::new()
            .with_prompt("API token")
            .interact()
            .context("Failed to read token")?,
    };

    let token = token.trim();
    if token.is_empty() {
        bail!("Token must not be empty");
    }

    let credentials = CredentialStore::new(ctx.cache()?);
    credentials.set_token(token)?;
    tracing::debug!(path = %ctx.config.storage_path().display(), "stored token");

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "authenticated": true }));
    } else {
        ctx.output.success("Logged in");
    }
    Ok(())
}

/// Forget the stored token.
pub async fn logout(ctx: &Context) -> Result<()> {
    let credentials = CredentialStore::new(ctx.cache()?);
    if !credentials.is_authenticated() {
        ctx.output.info("Not logged in");
        return Ok(());
    }

    credentials.clear()?;
    ctx.output.success("Logged out");
    Ok(())
}
