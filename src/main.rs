use anyhow::{Context, Result};
use clap::Parser;
use log::debug;
use std::io::Write;
use std::path::{Path, PathBuf};
use telegraph::{
    CallContext, HtmlToPageOptions,
    commands::{self, ClientOptions, require_token},
    telegraph::{CreateAccountRequest, GetViewsRequest},
};

/// telegraph - Telegraph API client
///
/// Publish HTML documents to telegra.ph and inspect published pages.
///
/// The access token is read from --token or the TELEGRAPH_ACCESS_TOKEN
/// environment variable.
///
/// Examples:
///   telegraph convert post.html      # Print the page JSON for post.html
///   telegraph publish post.html      # Publish post.html and print its URL
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Telegraph API URL (defaults to https://api.telegra.ph)
    #[arg(long = "api-url", env = "TELEGRAPH_API_URL", value_name = "URL", global = true)]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout-secs", value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Maximum requests per second
    #[arg(long = "rate-limit", value_name = "N", global = true)]
    pub rate_limit: Option<u32>,

    /// Retries after the first attempt of each call
    #[arg(long = "max-retries", value_name = "N", global = true)]
    pub max_retries: Option<u32>,

    /// Account access token
    #[arg(
        long = "token",
        env = "TELEGRAPH_ACCESS_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub token: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Convert an HTML file and print the resulting page as JSON
    Convert(ConvertArgs),

    /// Convert an HTML file and publish it as a new page
    Publish(ConvertArgs),

    /// Show a published page
    Page(PageArgs),

    /// Show the view count of a page
    Views(ViewsArgs),

    /// Create a new account
    CreateAccount(CreateAccountArgs),
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// HTML file to convert
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Page title (overrides <title>)
    #[arg(long)]
    pub title: Option<String>,

    /// Author name (overrides <meta name="author">)
    #[arg(long = "author-name")]
    pub author_name: Option<String>,

    /// Author URL (overrides <meta name="url">)
    #[arg(long = "author-url")]
    pub author_url: Option<String>,

    /// Description (overrides <meta name="description">)
    #[arg(long)]
    pub description: Option<String>,
}

impl ConvertArgs {
    fn options(&self) -> HtmlToPageOptions {
        HtmlToPageOptions {
            title: self.title.clone(),
            author_name: self.author_name.clone(),
            author_url: self.author_url.clone(),
            description: self.description.clone(),
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct PageArgs {
    /// Page path, e.g. "Sample-Page-12-15"
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Also print the page text
    #[arg(long)]
    pub content: bool,
}

#[derive(clap::Args, Debug)]
pub struct ViewsArgs {
    #[arg(value_name = "PATH")]
    pub path: String,

    #[arg(long)]
    pub year: Option<u16>,

    #[arg(long)]
    pub month: Option<u8>,

    #[arg(long)]
    pub day: Option<u8>,

    #[arg(long)]
    pub hour: Option<u8>,
}

#[derive(clap::Args, Debug)]
pub struct CreateAccountArgs {
    /// Account name shown to the user, 1-32 characters
    #[arg(long = "short-name")]
    pub short_name: String,

    #[arg(long = "author-name")]
    pub author_name: Option<String>,

    #[arg(long = "author-url")]
    pub author_url: Option<String>,
}

fn read_html(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Context cancelled by Ctrl-C.
fn interruptible_context() -> CallContext {
    let ctx = CallContext::new();
    let token = ctx.token().clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupted, cancelling in-flight calls");
            token.cancel();
        }
    });
    ctx
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let options = ClientOptions {
        api_url: cli.api_url.clone(),
        timeout_secs: cli.timeout_secs,
        rate_limit: cli.rate_limit,
        max_retries: cli.max_retries,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Convert(args) => {
            let html = read_html(&args.file)?;
            commands::convert(&mut out, &html, &args.options())?;
        }
        Commands::Publish(args) => {
            let token = require_token(cli.token.as_deref())?;
            let html = read_html(&args.file)?;
            let api = options.build()?;
            let ctx = interruptible_context();
            commands::publish(&api, &ctx, &mut out, &html, token, &args.options()).await?;
        }
        Commands::Page(args) => {
            let api = options.build()?;
            let ctx = interruptible_context();
            commands::page(&api, &ctx, &mut out, &args.path, args.content).await?;
        }
        Commands::Views(args) => {
            let api = options.build()?;
            let ctx = interruptible_context();
            let req = GetViewsRequest {
                path: args.path,
                year: args.year,
                month: args.month,
                day: args.day,
                hour: args.hour,
            };
            commands::views(&api, &ctx, &mut out, &req).await?;
        }
        Commands::CreateAccount(args) => {
            let api = options.build()?;
            let ctx = interruptible_context();
            let req = CreateAccountRequest {
                short_name: args.short_name,
                author_name: args.author_name.unwrap_or_default(),
                author_url: args.author_url.unwrap_or_default(),
            };
            commands::create_account(&api, &ctx, &mut out, &req).await?;
        }
    }
    out.flush()?;
    Ok(())
}
