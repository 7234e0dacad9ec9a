//! Catalog commands.

use eshop_pro_storefront::config::StorefrontConfig;
use eshop_pro_storefront::state::{AppState, Intent};

use super::CommandError;
use crate::render;

/// List products matching a category and search term.
pub fn products(config: &StorefrontConfig, category: String, search: String) -> Result<(), CommandError> {
    let mut state = AppState::from_config(config)?;
    state.dispatch(Intent::SetCategory(category))?;
    state.dispatch(Intent::SetSearch(search))?;

    let snapshot = state.snapshot();
    tracing::debug!(count = snapshot.visible_products.len(), "Listing products");
    render::products(&mut std::io::stdout().lock(), &snapshot.visible_products)?;
    Ok(())
}

/// List categories, starting with "All".
pub fn categories(config: &StorefrontConfig) -> Result<(), CommandError> {
    let state = AppState::from_config(config)?;
    render::categories(
        &mut std::io::stdout().lock(),
        state.catalog().list_categories(),
    )?;
    Ok(())
}
