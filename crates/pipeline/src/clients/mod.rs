//! HTTP clients for the hosted research collaborators.

mod firecrawl;
mod hn;
mod openrouter;
mod reducto;

use std::time::Duration;

pub use firecrawl::FirecrawlClient;
pub use hn::HnSearchClient;
pub use openrouter::OpenRouterClient;
pub use reducto::ReductoClient;

use crate::error::CollaboratorError;

fn http_client(timeout: Duration) -> Result<reqwest::Client, CollaboratorError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
