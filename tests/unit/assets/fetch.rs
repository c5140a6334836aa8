use super::*;
use crate::{
    entry::model::ContentType,
    test_helpers::{GatedFetcher, MapFetcher, PendingFetcher, png_bytes},
};

const COVER: &str = "https://img.test/cover.png";
const PHOTO: &str = "https://img.test/photo.png";
const TIMEOUT: Duration = Duration::from_secs(5);

fn entry_with_both() -> ShareableEntry {
    ShareableEntry::new("Arrival", ContentType::Movie)
        .unwrap()
        .with_cover(COVER)
        .with_photo(PHOTO)
}

#[tokio::test]
async fn loads_and_decodes_both_images() {
    let fetcher = MapFetcher::default()
        .with(COVER, png_bytes(2, 3, [255, 0, 0, 255]))
        .with(PHOTO, png_bytes(4, 4, [0, 0, 255, 255]));

    let assets = load_card_assets(
        &fetcher,
        &entry_with_both(),
        TIMEOUT,
        AssetFailurePolicy::Abort,
    )
    .await
    .unwrap();

    let cover = assets.cover.unwrap();
    assert_eq!((cover.width, cover.height), (2, 3));
    let photo = assets.photo.unwrap();
    assert_eq!((photo.width, photo.height), (4, 4));

    let mut calls = fetcher.calls();
    calls.sort();
    assert_eq!(calls, vec![COVER.to_owned(), PHOTO.to_owned()]);
}

#[tokio::test]
async fn entry_without_urls_fetches_nothing() {
    let fetcher = MapFetcher::default();
    let entry = ShareableEntry::new("Quiet", ContentType::Book)
        .unwrap()
        .with_cover("  ");
    let assets = load_card_assets(&fetcher, &entry, TIMEOUT, AssetFailurePolicy::Abort)
        .await
        .unwrap();
    assert_eq!(assets, CardAssets::default());
    assert!(fetcher.calls().is_empty());
}

#[tokio::test]
async fn abort_policy_surfaces_load_error() {
    let fetcher = MapFetcher::default().with(PHOTO, png_bytes(1, 1, [0, 0, 0, 255]));
    let err = load_card_assets(
        &fetcher,
        &entry_with_both(),
        TIMEOUT,
        AssetFailurePolicy::Abort,
    )
    .await
    .unwrap_err();

    match err {
        CardError::Load { url, reason } => {
            assert_eq!(url, COVER);
            assert!(reason.contains("404"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn abort_policy_does_not_wait_for_sibling() {
    // The photo never arrives; the cover fails fast and must end the join.
    struct CoverFailsPhotoHangs;
    impl ImageFetcher for CoverFailsPhotoHangs {
        async fn fetch(&self, url: &str) -> CardResult<Vec<u8>> {
            if url == COVER {
                Err(CardError::load(url, "HTTP 500"))
            } else {
                std::future::pending().await
            }
        }
    }

    let res = tokio::time::timeout(
        Duration::from_secs(5),
        load_card_assets(
            &CoverFailsPhotoHangs,
            &entry_with_both(),
            Duration::from_secs(60),
            AssetFailurePolicy::Abort,
        ),
    )
    .await
    .expect("join should short-circuit");
    assert!(res.unwrap_err().is_load());
}

#[tokio::test]
async fn degrade_policy_drops_failed_image() {
    let fetcher = MapFetcher::default().with(PHOTO, png_bytes(1, 1, [0, 0, 0, 255]));
    let assets = load_card_assets(
        &fetcher,
        &entry_with_both(),
        TIMEOUT,
        AssetFailurePolicy::Degrade,
    )
    .await
    .unwrap();
    assert!(assets.cover.is_none());
    assert!(assets.photo.is_some());
}

#[tokio::test]
async fn undecodable_body_is_a_load_error() {
    let fetcher = MapFetcher::default().with(COVER, b"<html>oops</html>".to_vec());
    let err = load_image(&fetcher, COVER, TIMEOUT).await.unwrap_err();
    assert!(err.is_load(), "{err}");
    assert!(err.to_string().contains(COVER));
}

#[tokio::test]
async fn timeout_is_a_load_error() {
    let err = load_image(&PendingFetcher, COVER, Duration::from_millis(20))
        .await
        .unwrap_err();
    match err {
        CardError::Load { reason, .. } => assert!(reason.contains("timed out"), "{reason}"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn fetches_run_concurrently() {
    // Each fetch waits for the other to start; sequential awaits would never finish.
    struct Rendezvous {
        barrier: tokio::sync::Barrier,
        inner: MapFetcher,
    }
    impl ImageFetcher for Rendezvous {
        async fn fetch(&self, url: &str) -> CardResult<Vec<u8>> {
            self.barrier.wait().await;
            self.inner.fetch(url).await
        }
    }

    let fetcher = Rendezvous {
        barrier: tokio::sync::Barrier::new(2),
        inner: MapFetcher::default()
            .with(COVER, png_bytes(1, 1, [1, 1, 1, 255]))
            .with(PHOTO, png_bytes(1, 1, [2, 2, 2, 255])),
    };
    let assets = tokio::time::timeout(
        Duration::from_secs(5),
        load_card_assets(
            &fetcher,
            &entry_with_both(),
            TIMEOUT,
            AssetFailurePolicy::Abort,
        ),
    )
    .await
    .expect("fetches should overlap")
    .unwrap();
    assert!(assets.cover.is_some() && assets.photo.is_some());
}

#[tokio::test]
async fn shared_fetcher_waits_for_gate() {
    let fetcher = Arc::new(GatedFetcher::new(
        MapFetcher::default().with(COVER, png_bytes(1, 1, [1, 1, 1, 255])),
    ));
    let mut load = std::pin::pin!(load_image(&fetcher, COVER, TIMEOUT));

    assert!(futures::poll!(load.as_mut()).is_pending());
    fetcher.open();
    assert_eq!(load.await.unwrap().width, 1);
}

#[test]
fn runs_on_a_runtime_with_only_the_time_driver() {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();

    let fetcher = MapFetcher::default().with(COVER, png_bytes(3, 2, [1, 2, 3, 255]));
    let img = rt
        .block_on(load_image(&fetcher, COVER, TIMEOUT))
        .unwrap();
    assert_eq!((img.width, img.height), (3, 2));

    let err = rt
        .block_on(load_image(&PendingFetcher, COVER, Duration::from_millis(20)))
        .unwrap_err();
    assert!(err.is_load(), "{err}");
}
