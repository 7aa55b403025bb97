use anyhow::Result;
use log::debug;
use std::io::Write;

use crate::{
    http::CallContext,
    telegraph::{GetPageRequest, Page, TelegraphApi},
};

/// Show a page, optionally followed by its text content
#[tracing::instrument(skip(api, ctx, out))]
pub async fn page<A: TelegraphApi, W: Write>(
    api: &A,
    ctx: &CallContext,
    out: &mut W,
    path: &str,
    with_content: bool,
) -> Result<Page> {
    let req = GetPageRequest {
        path: path.to_string(),
        return_content: with_content,
    };
    let page = api.get_page(ctx, &req).await?;
    debug!("Fetched page {:?}", page.path);

    writeln!(out, "Title: {}", page.title)?;
    writeln!(out, "URL: {}", page.url)?;
    if !page.author_name.is_empty() {
        writeln!(out, "Author: {}", page.author_name)?;
    }
    if !page.description.is_empty() {
        writeln!(out, "Description: {}", page.description)?;
    }
    writeln!(out, "Views: {}", page.views)?;

    if let Some(content) = page.content.as_ref().filter(|_| with_content) {
        writeln!(out)?;
        for node in content {
            writeln!(out, "{}", node.plain_text())?;
        }
    }
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::telegraph::MockTelegraphApi;
    use std::collections::HashMap;

    fn sample_page() -> Page {
        Page {
            path: "Sample-Page".to_string(),
            url: "https://telegra.ph/Sample-Page".to_string(),
            title: "Sample".to_string(),
            author_name: "Ann".to_string(),
            views: 12,
            content: Some(vec![
                Node::element_with("h3", HashMap::new(), vec![Node::text("Heading")]),
                Node::element_with(
                    "p",
                    HashMap::new(),
                    vec![
                        Node::text("Some "),
                        Node::element_with("strong", HashMap::new(), vec![Node::text("bold")]),
                    ],
                ),
            ]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_page_summary() {
        let mut api = MockTelegraphApi::new();
        api.expect_get_page()
            .withf(|_, req| req.path == "Sample-Page" && !req.return_content)
            .times(1)
            .returning(|_, _| {
                Ok(Page {
                    content: None,
                    ..sample_page()
                })
            });

        let mut out = Vec::new();
        page(&api, &CallContext::new(), &mut out, "Sample-Page", false)
            .await
            .unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Title: Sample\nURL: https://telegra.ph/Sample-Page\nAuthor: Ann\nViews: 12\n"
        );
    }

    #[tokio::test]
    async fn test_page_with_content() {
        let mut api = MockTelegraphApi::new();
        api.expect_get_page()
            .withf(|_, req| req.return_content)
            .returning(|_, _| Ok(sample_page()));

        let mut out = Vec::new();
        page(&api, &CallContext::new(), &mut out, "Sample-Page", true)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with("Views: 12\n\nHeading\nSome bold\n"));
    }

    #[tokio::test]
    async fn test_page_error_writes_nothing() {
        let mut api = MockTelegraphApi::new();
        api.expect_get_page()
            .returning(|_, _| Err(anyhow::anyhow!("boom")));

        let mut out = Vec::new();
        assert!(
            page(&api, &CallContext::new(), &mut out, "x", false)
                .await
                .is_err()
        );
        assert!(out.is_empty());
    }
}
