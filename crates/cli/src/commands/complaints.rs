//! Complaint commands.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use civic_client::TrackOutcome;
use civic_core::complaint::{
    Assignment, ComplaintStatus, FeedQuery, ImageAttachment, NewComplaint,
};
use civic_core::types::DbId;

use crate::context::{report, Context};
use crate::output;

pub async fn track(ctx: &Context, code: &str) -> anyhow::Result<()> {
    match ctx.client().complaints().track(code).await.map_err(report)? {
        TrackOutcome::Found(complaint) => {
            ctx.output
                .emit(&complaint, || output::complaint_detail(&complaint))
        }
        TrackOutcome::NotFound => {
            let code = code.trim().to_ascii_uppercase();
            ctx.output.emit(
                &serde_json::json!({ "complaint_id": code, "found": false }),
                || format!("No complaint found with ID {code}."),
            )
        }
    }
}

pub async fn feed(ctx: &Context, query: &FeedQuery) -> anyhow::Result<()> {
    let complaints = ctx
        .client()
        .complaints()
        .public_feed(query)
        .await
        .map_err(report)?;
    ctx.output
        .emit(&complaints, || output::complaint_table(&complaints))
}

pub async fn show(ctx: &Context, id: DbId) -> anyhow::Result<()> {
    let complaint = ctx.client().complaints().get(id).await.map_err(report)?;
    ctx.output
        .emit(&complaint, || output::complaint_detail(&complaint))
}

pub async fn upvote(ctx: &Context, id: DbId) -> anyhow::Result<()> {
    ctx.require_login()?;
    let result = ctx
        .client()
        .complaints()
        .toggle_upvote(id)
        .await
        .map_err(report)?;
    ctx.output.emit(&result, || {
        let verb = if result.upvoted { "Upvoted" } else { "Removed upvote from" };
        format!("{verb} complaint {id} ({} upvotes).", result.upvote_count)
    })
}

pub async fn submit(
    ctx: &Context,
    mut input: NewComplaint,
    images: &[PathBuf],
) -> anyhow::Result<()> {
    for path in images {
        input = input.with_image(read_image(path)?);
    }

    let submitted = ctx
        .client()
        .complaints()
        .submit(&input)
        .await
        .map_err(report)?;
    let complaint = &submitted.complaint;
    ctx.output.emit(complaint, || {
        format!(
            "{}\nComplaint ID: {}\nTrack it with `civic track {}`.",
            submitted
                .message
                .as_deref()
                .unwrap_or("Complaint submitted."),
            complaint.complaint_id,
            complaint.complaint_id
        )
    })
}

pub async fn list(ctx: &Context) -> anyhow::Result<()> {
    ctx.require_admin()?;
    let complaints = ctx.client().complaints().list().await.map_err(report)?;
    ctx.output
        .emit(&complaints, || output::complaint_table(&complaints))
}

pub async fn set_status(ctx: &Context, id: DbId, status: ComplaintStatus) -> anyhow::Result<()> {
    ctx.require_admin()?;
    let complaint = ctx
        .client()
        .complaints()
        .update_status(id, status)
        .await
        .map_err(report)?;
    ctx.output.emit(&complaint, || {
        format!("{} is now {}.", complaint.complaint_id, complaint.status)
    })
}

pub async fn assign(ctx: &Context, id: DbId, assignment: &Assignment) -> anyhow::Result<()> {
    ctx.require_admin()?;
    let complaint = ctx
        .client()
        .complaints()
        .assign(id, assignment)
        .await
        .map_err(report)?;
    ctx.output.emit(&complaint, || {
        format!("{} updated ({}).", complaint.complaint_id, complaint.status)
    })
}

fn read_image(path: &Path) -> anyhow::Result<ImageAttachment> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("Image path {} has no file name", path.display()))?;
    Ok(ImageAttachment::new(file_name, bytes))
}
