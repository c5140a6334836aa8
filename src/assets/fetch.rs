use std::{future::Future, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    assets::decode::{DecodedImage, decode_image},
    entry::model::ShareableEntry,
    foundation::error::{CardError, CardResult},
};

/// Network seam: fetch the raw bytes behind an image URL.
///
/// Implementations report failures as [`CardError::Load`]; other error kinds are converted by
/// [`load_image`].
pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = CardResult<Vec<u8>>> + Send;
}

impl<F: ImageFetcher> ImageFetcher for Arc<F> {
    fn fetch(&self, url: &str) -> impl Future<Output = CardResult<Vec<u8>>> + Send {
        (**self).fetch(url)
    }
}

/// [`ImageFetcher`] backed by a `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> CardResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rndm-card/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }

    /// Use a preconfigured client (proxies, custom roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> CardResult<Vec<u8>> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CardError::load(url, format!("HTTP GET failed: {e}")))?;

        let status = res.status();
        if !status.is_success() {
            return Err(CardError::load(url, format!("HTTP {}", status.as_u16())));
        }

        let body = res
            .bytes()
            .await
            .map_err(|e| CardError::load(url, format!("failed to read response body: {e}")))?;
        Ok(body.to_vec())
    }
}

/// What to do when one of the card's images cannot be loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssetFailurePolicy {
    /// Fail the whole export with the load error.
    #[default]
    Abort,
    /// Drop the failed image and lay the card out as if it had never been set.
    Degrade,
}

/// Images decoded for one export.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardAssets {
    pub cover: Option<DecodedImage>,
    pub photo: Option<DecodedImage>,
}

/// Fetch and decode one image, bounded by `timeout`.
///
/// Must be polled inside a Tokio runtime with the time driver enabled (`enable_time` or
/// `enable_all`); the timeout panics without one.
#[tracing::instrument(level = "debug", skip(fetcher))]
pub async fn load_image<F: ImageFetcher>(
    fetcher: &F,
    url: &str,
    timeout: Duration,
) -> CardResult<DecodedImage> {
    let bytes = match tokio::time::timeout(timeout, fetcher.fetch(url)).await {
        Ok(res) => res.map_err(|e| {
            if e.is_load() {
                e
            } else {
                CardError::load(url, e.to_string())
            }
        })?,
        Err(_) => {
            return Err(CardError::load(
                url,
                format!("timed out after {} ms", timeout.as_millis()),
            ));
        }
    };
    tracing::debug!(bytes = bytes.len(), "fetched image");

    decode_image(&bytes).map_err(|e| CardError::load(url, format!("{e:#}")))
}

/// Load the entry's cover and photo concurrently.
///
/// Under [`AssetFailurePolicy::Abort`] the first failure is returned and the sibling fetch is
/// dropped. Under [`AssetFailurePolicy::Degrade`] both fetches run to completion and failed
/// images come back as `None`.
pub async fn load_card_assets<F: ImageFetcher>(
    fetcher: &F,
    entry: &ShareableEntry,
    timeout: Duration,
    policy: AssetFailurePolicy,
) -> CardResult<CardAssets> {
    let cover = load_optional(fetcher, entry.cover_url(), timeout);
    let photo = load_optional(fetcher, entry.photo_url(), timeout);

    match policy {
        AssetFailurePolicy::Abort => {
            let (cover, photo) = futures::future::try_join(cover, photo).await?;
            Ok(CardAssets { cover, photo })
        }
        AssetFailurePolicy::Degrade => {
            let (cover, photo) = futures::future::join(cover, photo).await;
            Ok(CardAssets {
                cover: degrade("cover", cover),
                photo: degrade("photo", photo),
            })
        }
    }
}

async fn load_optional<F: ImageFetcher>(
    fetcher: &F,
    url: Option<&str>,
    timeout: Duration,
) -> CardResult<Option<DecodedImage>> {
    match url {
        None => Ok(None),
        Some(url) => load_image(fetcher, url, timeout).await.map(Some),
    }
}

fn degrade(slot: &'static str, res: CardResult<Option<DecodedImage>>) -> Option<DecodedImage> {
    match res {
        Ok(img) => img,
        Err(e) => {
            tracing::warn!(slot, error = %e, "dropping image that failed to load");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
