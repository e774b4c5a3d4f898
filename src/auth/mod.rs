mod client;
mod session;

pub use client::AuthClient;
pub use session::AuthSession;
