//! HTTP API for the blog list.
//!
//! CRUD on blogs, comments nested under a blog, user registration, token
//! login, and an aggregate statistics endpoint.
//!
//! # Authentication
//!
//! Creating and deleting blogs requires `Authorization: Bearer <token>`, where
//! the token comes from `POST /api/login`.
//!
//! # Architecture
//!
//! - **AppState**: shared document store, token service and configuration
//! - **Auth**: token service, bearer extractor, password hashing
//! - **Routes**: endpoint handlers grouped by resource

mod auth;
mod error;
mod routes;
mod state;

pub use self::auth::{hash_password, verify_password, AuthUser, Claims, JwtService};
pub use self::error::ApiError;
pub use self::routes::router;
pub use self::state::{AppState, Config};
