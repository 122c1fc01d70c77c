//! HTTP access for tile downloads.
//!
//! The fetcher only needs a single GET operation, so it talks to an
//! [`HttpFetcherTrait`] object. [`HttpFetcher`] is the reqwest implementation;
//! tests plug in `MockFetcher`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{
	Client, Url,
	header::{HeaderMap, HeaderName, HeaderValue},
};
use std::{fmt::Debug, time::Duration};
use tilepack_core::Blob;

/// Status and body of a completed HTTP exchange.
///
/// Non-success statuses are returned as data; only transport faults are errors.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	pub status: u16,
	pub body: Blob,
}

impl HttpResponse {
	pub fn new(status: u16, body: Blob) -> HttpResponse {
		HttpResponse { status, body }
	}

	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

#[async_trait]
pub trait HttpFetcherTrait: Debug + Send + Sync {
	/// Performs a GET request. Returns `Err` for connection, TLS or body read failures.
	async fn get(&self, url: &Url) -> Result<HttpResponse>;
}

/// Client settings shared by every request of a download run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpOptions {
	pub timeout: Duration,
	pub user_agent: String,
	pub headers: Vec<(String, String)>,
}

#[derive(Debug)]
pub struct HttpFetcher {
	client: Client,
}

impl HttpFetcher {
	pub fn new(options: &HttpOptions) -> Result<HttpFetcher> {
		let mut headers = HeaderMap::new();
		for (name, value) in &options.headers {
			headers.insert(
				HeaderName::from_bytes(name.as_bytes()).with_context(|| format!("invalid header name '{name}'"))?,
				HeaderValue::from_str(value).with_context(|| format!("invalid value for header '{name}'"))?,
			);
		}

		let client = Client::builder()
			.timeout(options.timeout)
			.user_agent(options.user_agent.clone())
			.default_headers(headers)
			.gzip(true)
			.brotli(true)
			.deflate(true)
			.build()
			.context("Failed to build HTTP client")?;

		Ok(HttpFetcher { client })
	}
}

#[async_trait]
impl HttpFetcherTrait for HttpFetcher {
	async fn get(&self, url: &Url) -> Result<HttpResponse> {
		let response = self
			.client
			.get(url.clone())
			.send()
			.await
			.with_context(|| format!("GET {url}"))?;
		let status = response.status().as_u16();
		let bytes = response
			.bytes()
			.await
			.with_context(|| format!("reading body of {url}"))?;

		Ok(HttpResponse::new(status, Blob::from(bytes.to_vec())))
	}
}
