#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Flood hazard outlook verification server.

use fho_verify_server::ServerError;

#[actix_web::main]
async fn main() -> Result<(), ServerError> {
    fho_verify_server::run_server().await
}
