use super::Error;

/// A session was requested for a tenant the store does not know about.
#[derive(Debug)]
pub(super) struct UnknownTenant {
    tenant_id: Box<str>,
}

impl std::error::Error for UnknownTenant {}

impl core::fmt::Display for UnknownTenant {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown tenant `{}`", self.tenant_id)
    }
}

impl Error {
    pub fn unknown_tenant(tenant_id: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownTenant(UnknownTenant {
            tenant_id: tenant_id.into().into(),
        }))
    }

    pub fn is_unknown_tenant(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownTenant(_))
    }
}
