use std::collections::BTreeSet;

/// Role granting tenant and user administration across all tenants.
pub const HOST_ADMINISTRATOR: &str = "HostAdministrator";

/// The authenticated identity behind one GraphQL request.
///
/// The hosting layer resolves it once per request and attaches it as request
/// data; every operation receives it explicitly.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Caller {
    pub user_id: Option<i32>,
    pub tenant_id: Option<i32>,
    roles: BTreeSet<String>,
}

impl Caller {
    pub fn user(user_id: i32) -> Self {
        Self {
            user_id: Some(user_id),
            tenant_id: None,
            roles: BTreeSet::new(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Host administrator without a tenant association.
    pub fn host_administrator(user_id: i32) -> Self {
        Self::user(user_id).with_role(HOST_ADMINISTRATOR)
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn with_tenant(mut self, tenant_id: i32) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }

    pub fn is_in_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }

    pub fn is_host_administrator(&self) -> bool {
        self.is_in_role(HOST_ADMINISTRATOR)
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.roles.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_roles_and_tenant() {
        let caller = Caller::user(7)
            .with_roles(["Editor", "Viewer"])
            .with_tenant(3);

        assert_eq!(caller.user_id, Some(7));
        assert_eq!(caller.tenant_id, Some(3));
        assert!(caller.is_in_role("Editor"));
        assert!(!caller.is_host_administrator());
        assert_eq!(caller.roles().collect::<Vec<_>>(), vec!["Editor", "Viewer"]);
    }

    #[test]
    fn anonymous_has_nothing() {
        let caller = Caller::anonymous();
        assert!(caller.is_anonymous());
        assert!(caller.tenant_id.is_none());
        assert_eq!(caller.roles().count(), 0);
    }

    #[test]
    fn host_administrator_role() {
        assert!(Caller::host_administrator(1).is_host_administrator());
    }
}
