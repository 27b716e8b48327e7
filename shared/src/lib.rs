//! Types shared between the Aula client and anything else that speaks its API.
//!
//! - `models`: entity schemas returned by the REST API
//! - `protocol`: one request type per endpoint, with path, verb and response type
//! - `tenant`: hostname → tenant slug resolution
//! - `cart`: the client-only cart aggregate

pub mod cart;
pub mod models;
pub mod protocol;
pub mod tenant;

pub use cart::{Cart, CartItem};
pub use protocol::{ApiRequest, HttpMethod};
pub use tenant::resolve_tenant;

// =========================================================
// Constants
// =========================================================

pub const HEADER_TENANT_ID: &str = "X-Tenant-Id";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// Fallback tenant used on local hosts when no override is stored.
pub const DEFAULT_TENANT: &str = "demo";

/// Keys persisted in browser local storage.
pub mod storage_keys {
    pub const IS_AUTH: &str = "isAuth";
    pub const CART: &str = "cart";
    pub const TOKEN: &str = "token";
    pub const TENANT_ID: &str = "tenantId";
}
