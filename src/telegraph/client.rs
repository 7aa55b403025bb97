use anyhow::Result;
use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    Account, CreateAccountRequest, CreatePageRequest, EditAccountInfoRequest, EditPageRequest,
    GetAccountInfoRequest, GetPageListRequest, GetPageRequest, GetViewsRequest, Page, PageList,
    PageViews,
};
use super::validate::Validate;
use crate::config::ClientConfig;
use crate::http::{CallContext, Dispatcher, encode_body, unify};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelegraphApi: Send + Sync {
    async fn create_account(&self, ctx: &CallContext, req: &CreateAccountRequest)
    -> Result<Account>;
    async fn edit_account_info(
        &self,
        ctx: &CallContext,
        req: &EditAccountInfoRequest,
    ) -> Result<Account>;
    async fn get_account_info(
        &self,
        ctx: &CallContext,
        req: &GetAccountInfoRequest,
    ) -> Result<Account>;
    async fn create_page(&self, ctx: &CallContext, req: &CreatePageRequest) -> Result<Page>;
    async fn edit_page(&self, ctx: &CallContext, req: &EditPageRequest) -> Result<Page>;
    async fn get_page(&self, ctx: &CallContext, req: &GetPageRequest) -> Result<Page>;
    async fn get_page_list(&self, ctx: &CallContext, req: &GetPageListRequest)
    -> Result<PageList>;
    async fn get_views(&self, ctx: &CallContext, req: &GetViewsRequest) -> Result<PageViews>;
}

/// Telegraph API client. Cheap to share behind an `Arc`; all calls go
/// through one dispatcher and therefore one rate budget.
pub struct Telegraph {
    dispatcher: Dispatcher,
}

impl Telegraph {
    #[tracing::instrument(skip(config))]
    pub fn new(config: ClientConfig) -> Result<Self> {
        let dispatcher = Dispatcher::new(&config)?;
        debug!("Telegraph client for {}", dispatcher.base_url());
        Ok(Self { dispatcher })
    }

    pub fn base_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    /// Validates `req`, sends it as a JSON body and unifies the answer.
    ///
    /// An `ok` envelope without a result yields `T::default()`.
    async fn post<R, T>(&self, ctx: &CallContext, path: &str, req: &R) -> Result<T>
    where
        R: Validate + Serialize + Sync,
        T: DeserializeOwned + Default,
    {
        req.validate()?;
        let body = encode_body(req)?;
        let raw = self
            .dispatcher
            .dispatch(ctx, Method::POST, path, &[], Some(body))
            .await?;
        Ok(unify::<T>(&raw)?.unwrap_or_default())
    }
}

#[async_trait]
impl TelegraphApi for Telegraph {
    #[tracing::instrument(skip(self, ctx, req))]
    async fn create_account(
        &self,
        ctx: &CallContext,
        req: &CreateAccountRequest,
    ) -> Result<Account> {
        self.post(ctx, "/createAccount", req).await
    }

    #[tracing::instrument(skip(self, ctx, req))]
    async fn edit_account_info(
        &self,
        ctx: &CallContext,
        req: &EditAccountInfoRequest,
    ) -> Result<Account> {
        self.post(ctx, "/editAccountInfo", req).await
    }

    #[tracing::instrument(skip(self, ctx, req))]
    async fn get_account_info(
        &self,
        ctx: &CallContext,
        req: &GetAccountInfoRequest,
    ) -> Result<Account> {
        self.post(ctx, "/getAccountInfo", req).await
    }

    #[tracing::instrument(skip(self, ctx, req))]
    async fn create_page(&self, ctx: &CallContext, req: &CreatePageRequest) -> Result<Page> {
        self.post(ctx, "/createPage", req).await
    }

    #[tracing::instrument(skip(self, ctx, req))]
    async fn edit_page(&self, ctx: &CallContext, req: &EditPageRequest) -> Result<Page> {
        self.post(ctx, "/editPage", req).await
    }

    #[tracing::instrument(skip(self, ctx, req))]
    async fn get_page(&self, ctx: &CallContext, req: &GetPageRequest) -> Result<Page> {
        req.validate()?;
        let raw = self
            .dispatcher
            .dispatch(ctx, Method::GET, "/getPage", &req.query(), None)
            .await?;
        Ok(unify::<Page>(&raw)?.unwrap_or_default())
    }

    #[tracing::instrument(skip(self, ctx, req))]
    async fn get_page_list(
        &self,
        ctx: &CallContext,
        req: &GetPageListRequest,
    ) -> Result<PageList> {
        self.post(ctx, "/getPageList", req).await
    }

    #[tracing::instrument(skip(self, ctx, req))]
    async fn get_views(&self, ctx: &CallContext, req: &GetViewsRequest) -> Result<PageViews> {
        self.post(ctx, "/getViews", req).await
    }
}
