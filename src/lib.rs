pub mod aggregate;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod highlight;
pub mod loader;
pub mod output;
pub mod page;
pub mod proportion;
pub mod record;
pub mod server;
