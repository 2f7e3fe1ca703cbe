//! Configuration
//!
//! Application settings loaded from files and environment variables.

pub mod settings;

pub use settings::{
    CorsSettings, DatabaseSettings, JwtSettings, ServerSettings, Settings, MIN_JWT_SECRET_LENGTH,
};
