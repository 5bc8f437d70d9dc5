//! Common types used across the application.

pub mod id;
pub mod money;
pub mod tenant;

pub use id::*;
pub use money::Currency;
pub use tenant::{SchemaName, TenantContext};
