//! E-Shop Pro storefront library.
//!
//! The storefront state core: a static catalog, a local key-value store, the
//! session store, the cart engine, the navigation guard and the checkout
//! simulator, tied together by [`state::AppState`] and driven asynchronously
//! by [`runtime`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod state;
