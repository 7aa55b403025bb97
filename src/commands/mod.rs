pub mod config;
mod account;
mod convert;
mod page;
mod views;

pub use account::create_account;
pub use convert::{convert, publish};
pub use page::page;
pub use views::views;

pub use config::{ClientOptions, require_token};
