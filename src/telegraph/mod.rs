mod client;
mod types;
mod validate;

pub use client::{Telegraph, TelegraphApi};
#[cfg(test)]
pub use client::MockTelegraphApi;
pub use types::{
    ACCOUNT_FIELDS, Account, CreateAccountRequest, CreatePageRequest, EditAccountInfoRequest,
    EditPageRequest, GetAccountInfoRequest, GetPageListRequest, GetPageRequest, GetViewsRequest,
    Page, PageList, PageViews,
};
pub use validate::{Validate, is_valid_url};
