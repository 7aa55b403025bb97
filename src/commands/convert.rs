use anyhow::{Context, Result};
use log::{debug, info};
use std::io::Write;

use crate::{
    convert::{HtmlToPageOptions, html_to_page},
    http::CallContext,
    telegraph::{CreatePageRequest, Page, TelegraphApi},
};

/// Print the page an HTML document converts into, as JSON
#[tracing::instrument(skip(out, html, options))]
pub fn convert<W: Write>(out: &mut W, html: &str, options: &HtmlToPageOptions) -> Result<()> {
    let page = html_to_page(html, Some(options))?;
    let json = serde_json::to_string_pretty(&page).context("Failed to serialize page")?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Convert an HTML document and publish it as a new page
#[tracing::instrument(skip(api, ctx, out, html, token, options))]
pub async fn publish<A: TelegraphApi, W: Write>(
    api: &A,
    ctx: &CallContext,
    out: &mut W,
    html: &str,
    token: &str,
    options: &HtmlToPageOptions,
) -> Result<Page> {
    let converted = html_to_page(html, Some(options))?;
    if converted.title.is_empty() {
        anyhow::bail!("The document has no title: add a <title> element or pass --title");
    }
    debug!(
        "Publishing {:?} with {} top-level nodes",
        converted.title,
        converted.content.as_ref().map_or(0, Vec::len)
    );

    let req = CreatePageRequest {
        access_token: token.to_string(),
        title: converted.title,
        author_name: converted.author_name,
        author_url: converted.author_url,
        content: converted.content.unwrap_or_default(),
        return_content: false,
    };
    let page = api.create_page(ctx, &req).await?;

    info!("Published {}", page.path);
    writeln!(out, "{}", page.url)?;
    Ok(page)
}
