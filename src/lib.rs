pub mod commands;
pub mod config;
pub mod convert;
pub mod error;
pub mod http;
pub mod node;
pub mod telegraph;

pub use config::ClientConfig;
pub use convert::{HtmlToPageOptions, html_to_page};
pub use error::{ApiError, ClientError, ConvertError, Phase};
pub use http::CallContext;
pub use node::{Element, Node};
pub use telegraph::{Telegraph, TelegraphApi};
