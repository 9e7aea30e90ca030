//! Department commands.

use civic_core::types::DbId;

use crate::context::{report, Context};
use crate::output;

pub async fn list(ctx: &Context) -> anyhow::Result<()> {
    let departments = ctx.client().departments().list().await.map_err(report)?;
    ctx.output
        .emit(&departments, || output::departments(&departments))
}

pub async fn officers(ctx: &Context, department_id: DbId) -> anyhow::Result<()> {
    ctx.require_admin()?;
    let officers = ctx
        .client()
        .departments()
        .admins(department_id)
        .await
        .map_err(report)?;
    ctx.output.emit(&officers, || output::officers(&officers))
}
