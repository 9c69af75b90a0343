#![deny(clippy::all)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::todo)]
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]

#[tokio::main]
async fn main() {
    app::run().await;
}


pub mod cfg {
    mod app_settings;
    mod database_settings;
    mod jwt_settings;
    mod server_settings;
    mod storage_settings;

    pub use app_settings::*;
    pub use database_settings::*;
    pub use jwt_settings::*;
    pub use server_settings::*;
    pub use storage_settings::*;
}

pub mod core {
    mod access;
    mod context;
    mod dbpool;

    pub use access::*;
    pub use context::*;
    pub use dbpool::*;
}

pub mod auth {
    pub mod jwt;

    mod password;

    pub use jwt::*;
    pub use password::*;
}

pub mod db {
    pub mod migrations;

    mod maintenance;
    mod meter_readings;
    mod notifications;
    mod payments;
    mod profiles;
    mod refresh_tokens;
    mod rooms;
    mod tenants;
    mod users;

    pub use maintenance::*;
    pub use meter_readings::*;
    pub use notifications::*;
    pub use payments::*;
    pub use profiles::*;
    pub use refresh_tokens::*;
    pub use rooms::*;
    pub use tenants::*;
    pub use users::*;
}

pub mod middleware {
    pub mod access;
    pub mod rate_limit;
}

pub mod routes {
    pub mod api;
    pub mod auth;
    pub mod health;
    pub mod notifications;
    pub mod owner;
    pub mod pages;
    pub mod tenant;
    pub mod uploads;
}

pub mod services {
    pub mod notifier;
    pub mod storage;
}

pub mod app {
    mod cli;
    mod router;
    mod server;

    pub use cli::*;
    pub use router::*;
    pub use server::*;
}
