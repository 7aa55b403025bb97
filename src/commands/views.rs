use anyhow::Result;
use std::io::Write;

use crate::{
    http::CallContext,
    telegraph::{GetViewsRequest, TelegraphApi},
};

/// Print the view count of a page for the requested period
#[tracing::instrument(skip(api, ctx, out))]
pub async fn views<A: TelegraphApi, W: Write>(
    api: &A,
    ctx: &CallContext,
    out: &mut W,
    req: &GetViewsRequest,
) -> Result<u64> {
    let views = api.get_views(ctx, req).await?;
    writeln!(out, "{}", views.views)?;
    Ok(views.views)
}
