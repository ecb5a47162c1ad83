//! Taproom Site Server
//!
//! Backend for a small pub marketing website with an admin back office.
//!
//! # Module structure
//!
//! ```text
//! site-server/src/
//! ├── core/     # config, state, server bootstrap
//! ├── auth/     # identity verification, sessions, route gate
//! ├── db/       # embedded SurrealDB, document store, repositories
//! ├── storage/  # uploaded media
//! ├── api/      # HTTP routes and handlers
//! └── utils/    # errors, logging, validation helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod storage;
pub mod utils;

// Re-export public types
pub use auth::{SessionService, SessionUser};
pub use core::{Config, Server, ServerState};
pub use db::DocumentStore;
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - tracing with a dedicated target
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::warn!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// Load .env and initialize logging
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    init_logger_with_file(log_level.as_deref(), None);
}

pub fn print_banner() {
    println!(
        r#"
  ______
 /_  __/___ _____  _________  ____  ____ ___
  / / / __ `/ __ \/ ___/ __ \/ __ \/ __ `__ \
 / / / /_/ / /_/ / /  / /_/ / /_/ / / / / / /
/_/  \__,_/ .___/_/   \____/\____/_/ /_/ /_/
         /_/
    "#
    );
}
