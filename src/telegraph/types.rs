use serde::{Deserialize, Serialize};

use crate::node::Node;

/// A Telegraph account.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Account {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub short_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_url: String,
    /// Only returned by `createAccount`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Only returned by `createAccount` and when requested explicitly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
}

/// A Telegraph page.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<Node>>,
    #[serde(default)]
    pub views: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub can_edit: Option<bool>,
}

/// One page of an account's page list.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct PageList {
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub pages: Vec<Page>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageViews {
    #[serde(default)]
    pub views: u64,
}

/// Account fields `getAccountInfo` can return.
pub const ACCOUNT_FIELDS: [&str; 5] = [
    "short_name",
    "author_name",
    "author_url",
    "auth_url",
    "page_count",
];

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateAccountRequest {
    /// 1-32 characters.
    pub short_name: String,
    /// 0-128 characters.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    /// 0-512 characters.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_url: String,
}

/// Only non-empty fields are changed.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct EditAccountInfoRequest {
    pub access_token: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub short_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_url: String,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GetAccountInfoRequest {
    pub access_token: String,
    /// Subset of [`ACCOUNT_FIELDS`]; the server default applies when empty.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct CreatePageRequest {
    pub access_token: String,
    /// 1-256 characters.
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_url: String,
    pub content: Vec<Node>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub return_content: bool,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct EditPageRequest {
    pub access_token: String,
    pub path: String,
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub author_url: String,
    pub content: Vec<Node>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub return_content: bool,
}

/// Sent as query parameters.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GetPageRequest {
    pub path: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub return_content: bool,
}

impl GetPageRequest {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("path", self.path.clone())];
        if self.return_content {
            query.push(("return_content", "true".to_string()));
        }
        query
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GetPageListRequest {
    pub access_token: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub offset: u32,
    /// 0-200; the server default (50) applies when 0.
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: u32,
}

/// Unset date parts widen the aggregation window.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct GetViewsRequest {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<u8>,
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}
