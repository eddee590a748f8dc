//! Fund share lifecycle tests
//!
//! These tests drive a deployed instance of the fund protocol over JSON-RPC:
//! fund setup, subscription rounds, and redemption rounds. They need a dev
//! chain that already hosts the deployment described by the address book, so
//! the live scenarios are `#[ignore]`d; run them explicitly with
//! `cargo test --test fund_shares -- --ignored`.

use std::sync::Once;
use tracing_subscriber::EnvFilter;

pub mod helpers;
pub mod redemption_tests;
pub mod setup_tests;

static INIT: Once = Once::new();

/// Initializes the global logger (only once).
pub fn init_logger() {
    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env()
            .add_directive("fund_harness=info".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init();
    });
}
