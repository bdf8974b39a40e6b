//! # Account Subcommands
//!
//! Sign-up, sign-in, and sign-out against the identity provider. A
//! successful sign-in is written to the session file; sign-out removes it.

use anyhow::{Context, Result};
use clap::Args;
use shiptrack_supabase::SignUpOutcome;

use crate::session::Session;
use crate::CliContext;

/// Email and password, shared by `signup` and `login`.
#[derive(Args, Debug)]
pub struct CredentialArgs {
    /// Account email address.
    #[arg(long)]
    pub email: String,
    /// Account password.
    #[arg(long, env = "SHIPTRACK_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Register a new account.
pub async fn run_signup(ctx: &CliContext, args: &CredentialArgs) -> Result<u8> {
    let client = ctx.auth_client()?;
    let outcome = client
        .sign_up(&args.email, &args.password)
        .await
        .context("sign-up failed")?;

    match outcome {
        SignUpOutcome::Session(auth) => {
            Session::from_auth(&auth, &args.email).save(&ctx.session_path)?;
            println!("OK: signed up and logged in as {}", args.email);
        }
        SignUpOutcome::ConfirmationRequired(_) => {
            println!(
                "Check your email ({}) for a confirmation link, then run `shiptrack login`.",
                args.email
            );
        }
    }
    Ok(0)
}

/// Sign in with email and password and save the session.
pub async fn run_login(ctx: &CliContext, args: &CredentialArgs) -> Result<u8> {
    let client = ctx.auth_client()?;
    let auth = match client.sign_in_with_password(&args.email, &args.password).await {
        Ok(auth) => auth,
        Err(e) if e.is_email_not_confirmed() => {
            eprintln!(
                "Email not confirmed. Open the confirmation link sent to {} and try again.",
                args.email
            );
            return Ok(1);
        }
        Err(e) => return Err(e).context("login failed"),
    };

    let session = Session::from_auth(&auth, &args.email);
    session.save(&ctx.session_path)?;
    println!(
        "OK: logged in as {}",
        session.email.as_deref().unwrap_or(&args.email)
    );
    Ok(0)
}

/// Revoke the session at the provider (best effort) and delete the file.
pub async fn run_logout(ctx: &CliContext) -> Result<u8> {
    let Some(session) = Session::load(&ctx.session_path)? else {
        println!("Not logged in.");
        return Ok(0);
    };

    match ctx.auth_client() {
        Ok(client) => {
            if let Err(e) = client.sign_out(&session.access_token).await {
                tracing::warn!(error = %e, "provider sign-out failed; removing local session anyway");
            }
        }
        Err(e) => tracing::warn!("skipping provider sign-out: {e:#}"),
    }

    Session::remove(&ctx.session_path)?;
    println!("OK: logged out");
    Ok(0)
}
