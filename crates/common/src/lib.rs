//! Common utilities and shared types for circles.
//!
//! This crate provides foundational components used across all circles crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULIDs, access tokens, invitation codes via [`IdGenerator`]
//! - **Storage**: Object storage backends for uploaded file bytes
//!
//! # Example
//!
//! ```no_run
//! use circles_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let code = id_gen.generate_invitation_code();
//!     println!("{} listening on {}", code, config.server.port);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use storage::{
    LocalStorage, NoOpStorage, StorageBackend, StorageConfig, StorageService, StoredObject,
    file_extension,
};
