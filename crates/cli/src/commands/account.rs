//! Account and session commands.
//!
//! Each command opens the storage file, restores whatever session it holds,
//! applies one intent and exits. The session token written by `signup` or
//! `login` is picked up by later invocations until it expires.

use std::io::Write;

use eshop_pro_storefront::config::StorefrontConfig;
use eshop_pro_storefront::state::{AppState, Intent};

use super::CommandError;
use crate::render;

/// Create an account and sign in as it.
pub fn signup(config: &StorefrontConfig, email: String, password: String) -> Result<(), CommandError> {
    let mut state = AppState::from_config(config)?;
    state.dispatch(Intent::Signup { email, password })?;

    tracing::info!("Account created");
    render::session(&mut std::io::stdout().lock(), &state.snapshot().session)?;
    Ok(())
}

/// Sign in to an existing account.
pub fn login(config: &StorefrontConfig, email: String, password: String) -> Result<(), CommandError> {
    let mut state = AppState::from_config(config)?;
    state.dispatch(Intent::Login { email, password })?;

    render::session(&mut std::io::stdout().lock(), &state.snapshot().session)?;
    Ok(())
}

/// Sign out, discarding the stored session token.
pub fn logout(config: &StorefrontConfig) -> Result<(), CommandError> {
    let mut state = AppState::from_config(config)?;
    let was_signed_in = state.session().is_authenticated();
    state.dispatch(Intent::Logout)?;

    let mut out = std::io::stdout().lock();
    if was_signed_in {
        writeln!(out, "Signed out.")?;
    } else {
        writeln!(out, "Not signed in.")?;
    }
    Ok(())
}

/// Show the signed-in account, if any.
pub fn whoami(config: &StorefrontConfig) -> Result<(), CommandError> {
    let state = AppState::from_config(config)?;
    render::session(&mut std::io::stdout().lock(), &state.snapshot().session)?;
    Ok(())
}
