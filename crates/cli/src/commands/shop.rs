//! Interactive storefront.
//!
//! Reads one command per line, turns it into an intent, sends it to the
//! storefront runtime and redraws from the returned snapshot. A payment
//! settling in the background is announced as soon as it happens.

use std::io::Write;

use eshop_pro_core::{AttemptId, ProductId};
use eshop_pro_storefront::config::StorefrontConfig;
use eshop_pro_storefront::routes::View;
use eshop_pro_storefront::runtime;
use eshop_pro_storefront::services::checkout::CheckoutState;
use eshop_pro_storefront::state::{AppState, Intent};
use tokio::io::{AsyncBufReadExt, BufReader};

use super::CommandError;
use crate::render;

/// One parsed line of input.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Intent(Intent),
    Redraw,
    Help,
    Quit,
}

fn parse_id(arg: Option<&str>) -> Result<ProductId, String> {
    arg.ok_or_else(|| "missing product id".to_string())?
        .parse::<ProductId>()
        .map_err(|_| "product id must be a number".to_string())
}

fn parse_credentials(rest: &str) -> Result<(String, String), String> {
    let mut args = rest.split_whitespace();
    match (args.next(), args.next(), args.next()) {
        (Some(email), Some(password), None) => Ok((email.to_owned(), password.to_owned())),
        _ => Err("usage: <email> <password>".to_string()),
    }
}

fn parse(line: &str) -> Result<Action, String> {
    let line = line.trim();
    let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let mut args = rest.split_whitespace();

    let intent = match command.to_ascii_lowercase().as_str() {
        "" | "view" => return Ok(Action::Redraw),
        "help" | "?" => return Ok(Action::Help),
        "quit" | "exit" => return Ok(Action::Quit),
        "home" | "cart" | "checkout" | "auth" => Intent::Navigate(command.parse::<View>()?),
        "go" => Intent::Navigate(rest.parse::<View>()?),
        "show" => Intent::SelectProduct(parse_id(args.next())?),
        "close" => Intent::DismissProduct,
        "add" => Intent::AddItem(parse_id(args.next())?),
        "remove" => Intent::RemoveItem(parse_id(args.next())?),
        "qty" => {
            let product_id = parse_id(args.next())?;
            let quantity = args
                .next()
                .ok_or_else(|| "missing quantity".to_string())?
                .parse::<i64>()
                .map_err(|_| "quantity must be a whole number".to_string())?;
            Intent::SetQuantity {
                product_id,
                quantity,
            }
        }
        "category" => Intent::SetCategory(if rest.is_empty() { "All" } else { rest }.to_owned()),
        "search" => Intent::SetSearch(rest.to_owned()),
        "signup" => {
            let (email, password) = parse_credentials(rest)?;
            Intent::Signup { email, password }
        }
        "login" => {
            let (email, password) = parse_credentials(rest)?;
            Intent::Login { email, password }
        }
        "logout" => Intent::Logout,
        "pay" => Intent::Pay,
        other => return Err(format!("unknown command `{other}`, type `help`")),
    };

    Ok(Action::Intent(intent))
}

fn prompt() -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "> ")?;
    out.flush()
}

/// Run the interactive storefront until `quit` or end of input.
pub async fn run(config: &StorefrontConfig) -> Result<(), CommandError> {
    let state = AppState::from_config(config)?;
    let (handle, task) = runtime::spawn(state);

    let mut updates = handle.subscribe();
    let announcer = tokio::spawn(async move {
        let mut announced: Option<AttemptId> = None;
        while updates.changed().await.is_ok() {
            let checkout = updates.borrow_and_update().checkout;
            if let CheckoutState::Completed { confirmation } = checkout
                && announced != Some(confirmation.attempt)
            {
                announced = Some(confirmation.attempt);
                let mut out = std::io::stdout().lock();
                let _ = writeln!(
                    out,
                    "\nPayment successful! Order #{} for {} is confirmed.",
                    confirmation.attempt, confirmation.total
                );
            }
        }
    });

    {
        let mut out = std::io::stdout().lock();
        render::snapshot(&mut out, &handle.snapshot().await?)?;
        writeln!(out, "Type `help` for commands.")?;
    }
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let snapshot = match parse(&line) {
            Ok(Action::Quit) => break,
            Ok(Action::Help) => {
                render::help(&mut std::io::stdout().lock())?;
                prompt()?;
                continue;
            }
            Ok(Action::Redraw) => handle.snapshot().await?,
            Ok(Action::Intent(intent)) => {
                tracing::debug!(?intent, "Dispatching");
                match handle.dispatch(intent).await {
                    Ok(snapshot) => snapshot,
                    Err(e) => {
                        writeln!(std::io::stdout().lock(), "! {}", e.user_message())?;
                        handle.snapshot().await?
                    }
                }
            }
            Err(message) => {
                writeln!(std::io::stdout().lock(), "! {message}")?;
                prompt()?;
                continue;
            }
        };

        {
            let mut out = std::io::stdout().lock();
            writeln!(out)?;
            render::snapshot(&mut out, &snapshot)?;
        }
        prompt()?;
    }

    drop(handle);
    task.await?;
    announcer.await?;
    tracing::debug!("Shop session ended");
    Ok(())
}
