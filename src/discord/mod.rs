//! Discord login provider.
//!
//! [`DiscordAuthProvider`] implements the host contract for Discord's OAuth2
//! authorization-code flow; [`DiscordOAuthClient`] is its default wire
//! implementation. The two meet only at [`crate::gateway::OAuth2Gateway`],
//! so either side can be swapped out.

mod client;
mod provider;

pub use client::DiscordOAuthClient;
pub use provider::DiscordAuthProvider;
