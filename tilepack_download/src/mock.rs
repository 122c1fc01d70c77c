//! A scripted [`HttpFetcherTrait`] for tests.

use crate::{HttpFetcherTrait, HttpResponse};
use anyhow::{Result, bail};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Url;
use std::{collections::HashMap, fmt};
use tilepack_core::Blob;

/// What the mock answers to one request.
#[derive(Clone, Debug)]
pub enum MockResponse {
	/// `200` with a valid 2000 byte PNG tile.
	Tile,
	/// `200` with the given body.
	Body(Blob),
	/// The given status with an empty body.
	Status(u16),
	/// The connection fails.
	TransportError,
	/// The request never completes.
	Hang,
}

type Responder = Box<dyn Fn(&Url, u32) -> MockResponse + Send + Sync>;

pub struct MockFetcher {
	responder: Responder,
	requests: Mutex<Vec<String>>,
}

impl MockFetcher {
	/// `responder` receives the URL and how often that URL was requested before.
	pub fn new<F>(responder: F) -> MockFetcher
	where
		F: Fn(&Url, u32) -> MockResponse + Send + Sync + 'static,
	{
		MockFetcher {
			responder: Box::new(responder),
			requests: Mutex::new(Vec::new()),
		}
	}

	pub fn always(response: MockResponse) -> MockFetcher {
		MockFetcher::new(move |_, _| response.clone())
	}

	pub fn request_count(&self) -> usize {
		self.requests.lock().len()
	}

	pub fn requested_urls(&self) -> Vec<String> {
		self.requests.lock().clone()
	}

	/// Number of requests per URL.
	pub fn requests_per_url(&self) -> HashMap<String, u32> {
		let mut counts = HashMap::new();
		for url in self.requests.lock().iter() {
			*counts.entry(url.clone()).or_insert(0) += 1;
		}
		counts
	}
}

impl fmt::Debug for MockFetcher {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MockFetcher")
			.field("requests", &self.request_count())
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl HttpFetcherTrait for MockFetcher {
	async fn get(&self, url: &Url) -> Result<HttpResponse> {
		let attempt = {
			let mut requests = self.requests.lock();
			let attempt = requests.iter().filter(|u| *u == url.as_str()).count() as u32;
			requests.push(url.to_string());
			attempt
		};

		match (self.responder)(url, attempt) {
			MockResponse::Tile => Ok(HttpResponse::new(200, png_tile(2000))),
			MockResponse::Body(blob) => Ok(HttpResponse::new(200, blob)),
			MockResponse::Status(status) => Ok(HttpResponse::new(status, Blob::new_empty())),
			MockResponse::TransportError => bail!("connection reset by peer"),
			MockResponse::Hang => std::future::pending().await,
		}
	}
}

/// A PNG signature padded to `size` bytes.
pub fn png_tile(size: usize) -> Blob {
	let mut data = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
	data.resize(size.max(data.len()), 0);
	Blob::from(data)
}
