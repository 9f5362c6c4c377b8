//! Permission filtering applied once, before records reach the table builder.

use crate::models::{IpAddress, IpRange, Prefix};
use std::collections::HashSet;

/// Permissions granted to the requesting user.
///
/// Codenames follow `<app>.<action>_<model>`, e.g. `ipam.view_prefix`.
/// An optional tenant constraint limits viewable records to those tenants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Permissions {
    granted: HashSet<String>,
    superuser: bool,
    tenants: Option<HashSet<String>>,
}

impl Permissions {
    pub fn new<I, S>(granted: I) -> Permissions
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Permissions {
            granted: granted.into_iter().map(Into::into).collect(),
            superuser: false,
            tenants: None,
        }
    }

    /// Every permission, no constraints.
    pub fn superuser() -> Permissions {
        Permissions {
            superuser: true,
            ..Default::default()
        }
    }

    /// Parse a comma separated list; `*` grants everything.
    pub fn parse(list: &str) -> Permissions {
        let granted: Vec<&str> = list.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        if granted.contains(&"*") {
            Permissions::superuser()
        } else {
            Permissions::new(granted)
        }
    }

    /// Restrict viewable records to the given tenants.
    pub fn with_tenants<I, S>(mut self, tenants: I) -> Permissions
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tenants = Some(tenants.into_iter().map(Into::into).collect());
        self
    }

    pub fn has(&self, permission: &str) -> bool {
        self.superuser || self.granted.contains(permission)
    }

    /// True if every permission in the list is granted.
    pub fn has_all<S: AsRef<str>>(&self, permissions: &[S]) -> bool {
        permissions.iter().all(|p| self.has(p.as_ref()))
    }

    fn tenant_allowed(&self, tenant: Option<&str>) -> bool {
        match (&self.tenants, tenant) {
            (None, _) => true,
            (Some(tenants), Some(tenant)) => tenants.contains(tenant),
            (Some(_), None) => false,
        }
    }
}

/// A record guarded by a view permission.
pub trait Restricted {
    /// Permission needed to view any record of this type.
    const VIEW_PERMISSION: &'static str;

    fn tenant(&self) -> Option<&str>;
}

impl Restricted for Prefix {
    const VIEW_PERMISSION: &'static str = "ipam.view_prefix";

    fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }
}

impl Restricted for IpAddress {
    const VIEW_PERMISSION: &'static str = "ipam.view_ipaddress";

    fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }
}

impl Restricted for IpRange {
    const VIEW_PERMISSION: &'static str = "ipam.view_iprange";

    fn tenant(&self) -> Option<&str> {
        self.tenant.as_deref()
    }
}

/// Keep only the records the user may view.
pub fn authorize<T: Restricted>(records: Vec<T>, permissions: &Permissions) -> Vec<T> {
    if !permissions.has(T::VIEW_PERMISSION) {
        log::warn!("Permission {} not granted, hiding {} records", T::VIEW_PERMISSION, records.len());
        return vec![];
    }
    let total = records.len();
    let viewable: Vec<T> = records
        .into_iter()
        .filter(|r| permissions.tenant_allowed(r.tenant()))
        .collect();
    if viewable.len() < total {
        log::debug!(
            "Tenant constraint hid {} of {} records needing {}",
            total - viewable.len(),
            total,
            T::VIEW_PERMISSION
        );
    }
    viewable
}
