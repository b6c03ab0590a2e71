use std::io::Read;

use crate::error::FetchError;

/// Downloads the raw bytes behind a record's URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Blocking HTTP fetcher on top of a shared `ureq` agent.
///
/// Redirects are followed; only the library's default timeouts apply.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            agent: ureq::AgentBuilder::new().build(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.agent.get(url).call().map_err(classify)?;

        let mut bytes = Vec::new();
        response
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(FetchError::Body)?;
        Ok(bytes)
    }
}

/// Map a `ureq` failure onto the fetch taxonomy, singling out 403.
fn classify(err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::Status(code, _) => status_error(code),
        ureq::Error::Transport(transport) => FetchError::Transport(transport.to_string()),
    }
}

fn status_error(code: u16) -> FetchError {
    if code == 403 {
        FetchError::Forbidden
    } else {
        FetchError::Status { code }
    }
}
