use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{Tenant, TenantInput};

#[derive(Default)]
pub struct TenantMutation;

#[Object]
impl TenantMutation {
    /// Create a tenant. Requires the HostAdministrator role.
    async fn add_tenant(&self, ctx: &Context<'_>, tenant: TenantInput) -> Result<Tenant> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let tenant = context
            .tenant_service
            .save(&caller, tenant.into_create())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Tenant::from(tenant))
    }

    /// Overwrite an existing tenant. Requires the HostAdministrator role.
    async fn edit_tenant(&self, ctx: &Context<'_>, tenant: TenantInput) -> Result<Tenant> {
        let context = ctx.data::<GraphQLContext>()?;
        let caller = context.caller_for_request(ctx);
        let change = tenant.into_update().map_err(core_error_to_graphql_error)?;
        let tenant = context
            .tenant_service
            .save(&caller, change)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Tenant::from(tenant))
    }
}
