//! Plain-text rendering of storefront snapshots.

use std::io::{self, Write};

use eshop_pro_core::Product;
use eshop_pro_storefront::routes::View;
use eshop_pro_storefront::services::checkout::CheckoutState;
use eshop_pro_storefront::state::{SessionSnapshot, Snapshot};

/// Header line describing the session.
pub fn session(out: &mut impl Write, session: &SessionSnapshot) -> io::Result<()> {
    match (&session.email, &session.display_name) {
        (Some(email), Some(name)) => writeln!(out, "Hello, {name} ({email})"),
        _ => writeln!(out, "Not signed in."),
    }
}

pub fn products(out: &mut impl Write, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products match.");
    }
    for product in products {
        writeln!(
            out,
            "{:>3}  {:<40} {:>10}  {}",
            product.id, product.name, product.price.to_string(), product.category
        )?;
    }
    Ok(())
}

pub fn categories(out: &mut impl Write, categories: &[String]) -> io::Result<()> {
    for category in categories {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

fn product_detail(out: &mut impl Write, product: &Product) -> io::Result<()> {
    writeln!(out, "== {} ==", product.name)?;
    writeln!(out, "{} | {}", product.price, product.category)?;
    writeln!(out, "{}", product.description)?;
    writeln!(out, "(add {} to buy, close to go back)", product.id)
}

fn cart(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "== Cart ==")?;
    if snapshot.cart_lines.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }
    for line in &snapshot.cart_lines {
        writeln!(
            out,
            "{:>3}  {:<40} {:>4} x {:>10} = {:>10}",
            line.product_id,
            line.name,
            line.quantity,
            line.price_snapshot.to_string(),
            line.line_total().to_string()
        )?;
    }
    writeln!(
        out,
        "{} item(s), subtotal {}",
        snapshot.totals.item_count, snapshot.totals.subtotal
    )
}

fn checkout(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "== Checkout ==")?;
    match snapshot.checkout {
        CheckoutState::Idle => writeln!(
            out,
            "Order total {} for {} item(s). Type `pay` to place the order.",
            snapshot.totals.subtotal, snapshot.totals.item_count
        ),
        CheckoutState::Processing { total, .. } => {
            writeln!(out, "Processing payment of {total}...")
        }
        CheckoutState::Completed { confirmation } => writeln!(
            out,
            "Payment successful! Order #{} for {} is confirmed.",
            confirmation.attempt, confirmation.total
        ),
    }
}

fn auth(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "== Sign in ==")?;
    if let Some(message) = &snapshot.auth_error {
        writeln!(out, "! {message}")?;
    }
    writeln!(out, "login <email> <password>  or  signup <email> <password>")
}

fn home(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    writeln!(out, "== Products: {} ==", snapshot.category)?;
    if !snapshot.search.trim().is_empty() {
        writeln!(out, "Search: {}", snapshot.search.trim())?;
    }
    products(out, &snapshot.visible_products)
}

/// Render the whole screen for `snapshot`.
pub fn snapshot(out: &mut impl Write, snapshot: &Snapshot) -> io::Result<()> {
    session(out, &snapshot.session)?;
    writeln!(
        out,
        "Cart: {} item(s), {}",
        snapshot.totals.item_count, snapshot.totals.subtotal
    )?;
    writeln!(out)?;

    if let Some(product) = &snapshot.selected_product {
        return product_detail(out, product);
    }

    match snapshot.current_view {
        View::Home | View::ProductDetail(_) => home(out, snapshot),
        View::Cart => cart(out, snapshot),
        View::Checkout => checkout(out, snapshot),
        View::Auth => auth(out, snapshot),
    }
}

pub fn help(out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "\
Commands:
  home | cart | checkout | auth     go to a view
  show <id> | close                 open or close a product
  add <id>                          add one unit to the cart
  qty <id> <n> | remove <id>        change or drop a cart line
  category <name> | search <text>   filter products (category All shows everything)
  signup <email> <password>         create an account
  login <email> <password>          sign in
  logout                            sign out
  pay                               place the order (from checkout)
  view | help | quit"
    )
}
