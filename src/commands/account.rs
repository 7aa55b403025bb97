use anyhow::Result;
use log::info;
use std::io::Write;

use crate::{
    http::CallContext,
    telegraph::{Account, CreateAccountRequest, TelegraphApi},
};

/// Create an account and print its credentials
#[tracing::instrument(skip(api, ctx, out))]
pub async fn create_account<A: TelegraphApi, W: Write>(
    api: &A,
    ctx: &CallContext,
    out: &mut W,
    req: &CreateAccountRequest,
) -> Result<Account> {
    let account = api.create_account(ctx, req).await?;
    info!("Created account {}", account.short_name);

    writeln!(out, "Short name: {}", account.short_name)?;
    if let Some(token) = &account.access_token {
        writeln!(out, "Access token: {}", token)?;
    }
    if let Some(auth_url) = &account.auth_url {
        writeln!(out, "Auth URL: {}", auth_url)?;
    }
    Ok(account)
}
