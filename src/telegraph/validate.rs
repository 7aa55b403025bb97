//! Request checks run before anything is sent over the wire.

use reqwest::Url;

use super::types::{
    ACCOUNT_FIELDS, CreateAccountRequest, CreatePageRequest, EditAccountInfoRequest,
    EditPageRequest, GetAccountInfoRequest, GetPageListRequest, GetPageRequest, GetViewsRequest,
};
use crate::error::ClientError;

const MAX_SHORT_NAME: usize = 32;
const MAX_AUTHOR_NAME: usize = 128;
const MAX_AUTHOR_URL: usize = 512;
const MAX_TITLE: usize = 256;
const MAX_PAGE_LIST_LIMIT: u32 = 200;

/// Schema check for a request kind.
pub trait Validate {
    fn validate(&self) -> Result<(), ClientError>;
}

fn invalid(msg: impl Into<String>) -> ClientError {
    ClientError::Validation(msg.into())
}

fn required(field: &str, value: &str) -> Result<(), ClientError> {
    if value.is_empty() {
        return Err(invalid(format!("{} is required", field)));
    }
    Ok(())
}

fn at_most(field: &str, value: &str, max: usize) -> Result<(), ClientError> {
    if value.chars().count() > max {
        return Err(invalid(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn in_range<T: PartialOrd + std::fmt::Display>(
    field: &str,
    value: Option<T>,
    min: T,
    max: T,
) -> Result<(), ClientError> {
    match value {
        Some(v) if v < min || v > max => Err(invalid(format!(
            "{} must be between {} and {}",
            field, min, max
        ))),
        _ => Ok(()),
    }
}

fn author(name: &str, url: &str) -> Result<(), ClientError> {
    at_most("author_name", name, MAX_AUTHOR_NAME)?;
    at_most("author_url", url, MAX_AUTHOR_URL)?;
    if !url.is_empty() && !is_valid_url(url) {
        return Err(invalid("author_url must be a valid URL"));
    }
    Ok(())
}

/// Accepts absolute http(s) URLs with a host.
pub fn is_valid_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().is_some_and(|h| !h.is_empty())
        }
        Err(_) => false,
    }
}

impl Validate for CreateAccountRequest {
    fn validate(&self) -> Result<(), ClientError> {
        required("short_name", &self.short_name)?;
        at_most("short_name", &self.short_name, MAX_SHORT_NAME)?;
        author(&self.author_name, &self.author_url)
    }
}

impl Validate for EditAccountInfoRequest {
    fn validate(&self) -> Result<(), ClientError> {
        required("access_token", &self.access_token)?;
        at_most("short_name", &self.short_name, MAX_SHORT_NAME)?;
        author(&self.author_name, &self.author_url)
    }
}

impl Validate for GetAccountInfoRequest {
    fn validate(&self) -> Result<(), ClientError> {
        required("access_token", &self.access_token)?;
        if let Some(field) = self
            .fields
            .iter()
            .find(|f| !ACCOUNT_FIELDS.contains(&f.as_str()))
        {
            return Err(invalid(format!("invalid field: {}", field)));
        }
        Ok(())
    }
}

fn page_fields(
    title: &str,
    author_name: &str,
    author_url: &str,
    empty: bool,
) -> Result<(), ClientError> {
    required("title", title)?;
    at_most("title", title, MAX_TITLE)?;
    author(author_name, author_url)?;
    if empty {
        return Err(invalid("content is required"));
    }
    Ok(())
}

impl Validate for CreatePageRequest {
    fn validate(&self) -> Result<(), ClientError> {
        required("access_token", &self.access_token)?;
        page_fields(
            &self.title,
            &self.author_name,
            &self.author_url,
            self.content.is_empty(),
        )
    }
}

impl Validate for EditPageRequest {
    fn validate(&self) -> Result<(), ClientError> {
        required("access_token", &self.access_token)?;
        required("path", &self.path)?;
        page_fields(
            &self.title,
            &self.author_name,
            &self.author_url,
            self.content.is_empty(),
        )
    }
}

impl Validate for GetPageRequest {
    fn validate(&self) -> Result<(), ClientError> {
        required("path", &self.path)
    }
}

impl Validate for GetPageListRequest {
    fn validate(&self) -> Result<(), ClientError> {
        required("access_token", &self.access_token)?;
        if self.limit > MAX_PAGE_LIST_LIMIT {
            return Err(invalid(format!(
                "limit must be between 0 and {}",
                MAX_PAGE_LIST_LIMIT
            )));
        }
        Ok(())
    }
}

impl Validate for GetViewsRequest {
    fn validate(&self) -> Result<(), ClientError> {
        required("path", &self.path)?;
        in_range("year", self.year, 2000, 2100)?;
        in_range("month", self.month, 1, 12)?;
        in_range("day", self.day, 1, 31)?;
        in_range("hour", self.hour, 0, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn message(result: Result<(), ClientError>) -> String {
        match result {
            Err(ClientError::Validation(msg)) => msg,
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_create_account_validation() {
        let valid = CreateAccountRequest {
            short_name: "Sandbox".to_string(),
            author_name: "Anonymous".to_string(),
            author_url: "https://example.com".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing = CreateAccountRequest::default();
        assert_eq!(message(missing.validate()), "short_name is required");

        let long = CreateAccountRequest {
            short_name: "x".repeat(33),
            ..Default::default()
        };
        assert_eq!(
            message(long.validate()),
            "short_name must be at most 32 characters"
        );

        let bad_url = CreateAccountRequest {
            short_name: "Sandbox".to_string(),
            author_url: "not-a-url".to_string(),
            ..Default::default()
        };
        assert_eq!(message(bad_url.validate()), "author_url must be a valid URL");
    }

    #[test]
    fn test_lengths_count_characters() {
        let req = CreateAccountRequest {
            short_name: "ж".repeat(32),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_edit_account_info_validation() {
        let req = EditAccountInfoRequest::default();
        assert_eq!(message(req.validate()), "access_token is required");

        let req = EditAccountInfoRequest {
            access_token: "token".to_string(),
            author_name: "a".repeat(129),
            ..Default::default()
        };
        assert_eq!(
            message(req.validate()),
            "author_name must be at most 128 characters"
        );

        let req = EditAccountInfoRequest {
            access_token: "token".to_string(),
            ..Default::default()
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_get_account_info_fields() {
        let req = GetAccountInfoRequest {
            access_token: "token".to_string(),
            fields: vec!["short_name".to_string(), "page_count".to_string()],
        };
        assert!(req.validate().is_ok());

        let req = GetAccountInfoRequest {
            access_token: "token".to_string(),
            fields: vec!["password".to_string()],
        };
        assert_eq!(message(req.validate()), "invalid field: password");
    }

    #[test]
    fn test_create_page_validation() {
        let valid = CreatePageRequest {
            access_token: "token".to_string(),
            title: "Title".to_string(),
            content: vec![Node::text("Hello")],
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let no_title = CreatePageRequest {
            title: String::new(),
            ..valid.clone()
        };
        assert_eq!(message(no_title.validate()), "title is required");

        let long_title = CreatePageRequest {
            title: "t".repeat(257),
            ..valid.clone()
        };
        assert_eq!(
            message(long_title.validate()),
            "title must be at most 256 characters"
        );

        let no_content = CreatePageRequest {
            content: Vec::new(),
            ..valid
        };
        assert_eq!(message(no_content.validate()), "content is required");
    }

    #[test]
    fn test_edit_page_requires_path() {
        let req = EditPageRequest {
            access_token: "token".to_string(),
            title: "Title".to_string(),
            content: vec![Node::text("x")],
            ..Default::default()
        };
        assert_eq!(message(req.validate()), "path is required");
    }

    #[test]
    fn test_get_page_list_limit() {
        let req = GetPageListRequest {
            access_token: "token".to_string(),
            offset: 0,
            limit: 201,
        };
        assert_eq!(message(req.validate()), "limit must be between 0 and 200");

        let req = GetPageListRequest {
            access_token: "token".to_string(),
            offset: 10,
            limit: 200,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_get_views_ranges() {
        let base = GetViewsRequest {
            path: "p".to_string(),
            ..Default::default()
        };
        assert!(base.validate().is_ok());

        let req = GetViewsRequest {
            year: Some(1999),
            ..base.clone()
        };
        assert_eq!(message(req.validate()), "year must be between 2000 and 2100");

        let req = GetViewsRequest {
            month: Some(13),
            ..base.clone()
        };
        assert_eq!(message(req.validate()), "month must be between 1 and 12");

        let req = GetViewsRequest {
            hour: Some(0),
            day: Some(31),
            ..base
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://example.com"));
        assert!(is_valid_url("http://example.com/path?q=1"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("https://"));
    }
}
