//! Catalog categories.
//!
//! A category is a `category` row plus at most one `category_description`
//! row. Updates write both inside one transaction and run through the
//! transforms and hooks registered on [`CategoryExtensions`].
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/categories/{uuid}` | Get a category with its description |
//! | PUT | `/api/admin/categories/{uuid}` | Partially update a category (basic auth) |

pub mod dtos;
pub mod extensions;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod schema;
pub mod services;

pub use extensions::CategoryExtensions;
pub use services::{CategoryService, PgCategoryStore};
