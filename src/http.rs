use crate::Result;
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP client shared by all remote fetchers.
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(proxy: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT).timeout(timeout);

        if let Some(proxy) = proxy {
            tracing::debug!("routing requests through proxy {}", proxy);
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Client that ignores proxy settings from the environment.
    #[cfg(test)]
    pub(crate) fn direct(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).no_proxy().build()?,
        })
    }

    pub fn get_text(&self, url: &str) -> Result<String> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.text()?)
    }

    /// Downloads `url` into `dest`, returning the number of bytes written.
    pub fn download(&self, url: &str, dest: &Path) -> Result<usize> {
        tracing::debug!("downloading {} to {}", url, dest.display());
        let response = self.client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;

        fs::write(dest, &bytes)?;
        Ok(bytes.len())
    }
}
