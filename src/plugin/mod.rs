pub mod node;
pub mod proto;
pub mod registration;
pub mod server;

pub use server::Plugin;
