//! Tenant context threaded through every ledger operation.
//!
//! Schema-per-tenant isolation is structural: each tenant's records live in
//! a dedicated storage namespace identified by `SchemaName`. Passing the
//! whole context as a typed value (instead of formatting schema strings at
//! call sites) makes cross-tenant leakage a visible type-level concern.

use serde::{Deserialize, Serialize};

use super::id::TenantId;

/// A storage namespace for one tenant (a database schema, a shard key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaName(String);

impl SchemaName {
    /// Creates a schema name. The name comes from the Tenant Schema Router,
    /// never from caller-side string formatting.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the schema name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SchemaName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity and storage namespace for one tenant.
///
/// Supplied by the Tenant Schema Router at the service boundary and passed
/// to every repository call. The ledger never resolves this itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantContext {
    /// The tenant this call operates on.
    pub tenant_id: TenantId,
    /// The tenant's storage namespace.
    pub schema: SchemaName,
}

impl TenantContext {
    /// Creates a new tenant context.
    #[must_use]
    pub const fn new(tenant_id: TenantId, schema: SchemaName) -> Self {
        Self { tenant_id, schema }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_name_display() {
        let schema = SchemaName::new("tenant_acme");
        assert_eq!(schema.to_string(), "tenant_acme");
        assert_eq!(schema.as_str(), "tenant_acme");
    }

    #[test]
    fn test_contexts_with_same_schema_are_equal() {
        let tenant = TenantId::new();
        let a = TenantContext::new(tenant, SchemaName::new("tenant_a"));
        let b = TenantContext::new(tenant, SchemaName::new("tenant_a"));
        assert_eq!(a, b);
    }
}
