use std::pin::pin;

use super::*;
use crate::{
    encode::sink::{DirSink, MemorySink},
    entry::model::ContentType,
    export::pipeline::render_card,
    test_helpers::{BlockTypesetter, GatedFetcher, MapFetcher, PendingFetcher, png_bytes},
};

const COVER: &str = "https://img.test/cover.png";
const PHOTO: &str = "https://img.test/photo.png";

fn entry() -> ShareableEntry {
    ShareableEntry::new("La Niña: Test!!", ContentType::Movie)
        .unwrap()
        .with_author("Someone")
        .with_cover(COVER)
        .with_photo(PHOTO)
        .with_description("A short description")
        .with_rating(3)
        .unwrap()
}

fn images() -> MapFetcher {
    MapFetcher::default()
        .with(COVER, png_bytes(4, 6, [20, 40, 160, 255]))
        .with(PHOTO, png_bytes(9, 6, [160, 120, 20, 255]))
}

fn exporter<F>(fetcher: F) -> Exporter<F, MemorySink, BlockTypesetter> {
    Exporter::new(fetcher, MemorySink::new(), BlockTypesetter)
}

#[tokio::test]
async fn export_saves_named_png() {
    let ex = exporter(images());
    let saved = ex.export(&entry()).await.unwrap();

    assert_eq!(saved.file_name, "la-ni-a-test-rndm.png");
    assert_eq!(saved.path, None);
    assert_eq!(ex.state(), ExportState::Idle);

    let files = ex.sink().files();
    assert_eq!(files.len(), 1);
    assert_eq!(saved.bytes_written, files[0].png.len());
    let img = image::load_from_memory(&files[0].png).unwrap();
    assert_eq!((img.width(), img.height()), (1080, 1080));
}

#[tokio::test]
async fn identical_inputs_give_identical_bytes() {
    let ex = exporter(images());
    ex.export(&entry()).await.unwrap();
    ex.export(&entry()).await.unwrap();

    let files = ex.sink().files();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0], files[1]);
}

#[tokio::test]
async fn cover_404_fails_without_saving() {
    let ex = exporter(MapFetcher::default().with(PHOTO, png_bytes(2, 2, [0, 0, 0, 255])));
    let err = ex.export(&entry()).await.unwrap_err();

    match err {
        CardError::Load { url, reason } => {
            assert_eq!(url, COVER);
            assert!(reason.contains("404"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(ex.sink().files().is_empty());
    assert_eq!(ex.state(), ExportState::Idle);
}

#[tokio::test]
async fn degrade_renders_photo_only_card() {
    let photo = png_bytes(9, 6, [160, 120, 20, 255]);
    let ex = exporter(MapFetcher::default().with(PHOTO, photo.clone())).with_opts(
        ExportOpts::default().with_asset_failure_policy(AssetFailurePolicy::Degrade),
    );
    ex.export(&entry()).await.unwrap();

    let mut without_cover = entry();
    without_cover.cover_image_url = None;
    let assets = CardAssets {
        cover: None,
        photo: Some(crate::assets::decode::decode_image(&photo).unwrap()),
    };
    let expected = render_card(
        &without_cover,
        &plan_layout(&without_cover),
        &assets,
        &CardTheme::default(),
        &BlockTypesetter,
    )
    .unwrap();

    let files = ex.sink().files();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0], expected);
}

#[tokio::test]
async fn degrade_with_all_images_failing_falls_back_to_text_card() {
    let ex = exporter(MapFetcher::default()).with_opts(
        ExportOpts::default().with_asset_failure_policy(AssetFailurePolicy::Degrade),
    );
    ex.export(&entry()).await.unwrap();

    let mut text_only = entry();
    text_only.cover_image_url = None;
    text_only.additional_image_url = None;
    let expected = render_card(
        &text_only,
        &plan_layout(&text_only),
        &CardAssets::default(),
        &CardTheme::default(),
        &BlockTypesetter,
    )
    .unwrap();
    assert_eq!(ex.sink().files()[0], expected);
}

#[tokio::test]
async fn fetch_timeout_is_a_load_error() {
    let ex = exporter(PendingFetcher)
        .with_opts(ExportOpts::default().with_fetch_timeout(Duration::from_millis(30)));
    let err = ex.export(&entry()).await.unwrap_err();

    match err {
        CardError::Load { reason, .. } => assert!(reason.contains("timed out"), "{reason}"),
        other => panic!("unexpected error: {other}"),
    }
    assert!(ex.sink().files().is_empty());
    assert_eq!(ex.state(), ExportState::Idle);
}

#[tokio::test]
async fn reentrant_export_is_rejected() {
    let ex = exporter(GatedFetcher::new(images()));
    let e = entry();

    let mut first = pin!(ex.export(&e));
    assert!(futures::poll!(first.as_mut()).is_pending());
    assert_eq!(ex.state(), ExportState::Loading);

    let err = ex.export(&e).await.unwrap_err();
    assert!(matches!(err, CardError::AlreadyInProgress), "{err}");

    ex.fetcher().open();
    first.await.unwrap();
    assert_eq!(ex.state(), ExportState::Idle);
    assert_eq!(ex.sink().files().len(), 1);
}

#[tokio::test]
async fn dropped_export_resets_state() {
    let ex = exporter(GatedFetcher::new(images()));
    let e = entry();
    {
        let mut fut = pin!(ex.export(&e));
        assert!(futures::poll!(fut.as_mut()).is_pending());
        assert_eq!(ex.state(), ExportState::Loading);
    }
    assert_eq!(ex.state(), ExportState::Idle);
}

#[tokio::test]
async fn cancellation_saves_nothing() {
    let ex = exporter(GatedFetcher::new(images()));
    let err = ex
        .export_until(&entry(), tokio::time::sleep(Duration::from_millis(20)))
        .await
        .unwrap_err();

    assert!(matches!(err, CardError::Cancelled), "{err}");
    assert!(ex.sink().files().is_empty());
    assert_eq!(ex.state(), ExportState::Idle);

    // The exporter is usable again afterwards.
    ex.fetcher().open();
    ex.export(&entry()).await.unwrap();
    assert_eq!(ex.sink().files().len(), 1);
}

#[tokio::test]
async fn cpu_steps_yield_so_export_can_stop_between_them() {
    let ex = exporter(images());
    let e = entry();
    {
        let mut fut = pin!(ex.export(&e));
        assert!(futures::poll!(fut.as_mut()).is_pending());
        assert_eq!(ex.state(), ExportState::Composing);
        assert!(futures::poll!(fut.as_mut()).is_pending());
        assert_eq!(ex.state(), ExportState::Encoding);
    }
    assert!(ex.sink().files().is_empty());
    assert_eq!(ex.state(), ExportState::Idle);
}

#[tokio::test]
async fn already_cancelled_export_never_fetches() {
    let ex = exporter(images());
    let err = ex
        .export_until(&entry(), std::future::ready(()))
        .await
        .unwrap_err();
    assert!(matches!(err, CardError::Cancelled));
    assert!(ex.fetcher().calls().is_empty());
    assert!(ex.sink().files().is_empty());
}

#[tokio::test]
async fn uncancelled_export_completes() {
    let ex = exporter(images());
    let saved = ex
        .export_until(&entry(), std::future::pending::<()>())
        .await
        .unwrap();
    assert_eq!(saved.file_name, "la-ni-a-test-rndm.png");
}

#[tokio::test]
async fn invalid_entry_is_rejected_before_fetching() {
    let ex = exporter(images());
    let mut bad = entry();
    bad.title = "  ".to_owned();

    let err = ex.export(&bad).await.unwrap_err();
    assert!(matches!(err, CardError::Validation(_)), "{err}");
    assert!(ex.fetcher().calls().is_empty());
    assert_eq!(ex.state(), ExportState::Idle);
}

#[tokio::test]
async fn text_only_entry_needs_no_network() {
    let ex = exporter(PendingFetcher);
    let e = ShareableEntry::new("Quiet Book", ContentType::Book).unwrap();
    let saved = ex.export(&e).await.unwrap();
    assert_eq!(saved.file_name, "quiet-book-rndm.png");
}

#[tokio::test]
async fn dir_sink_leaves_no_partial_file() {
    let tmp = tempfile::tempdir().unwrap();
    let ex = Exporter::new(images(), DirSink::new(tmp.path()), BlockTypesetter);
    let saved = ex.export(&entry()).await.unwrap();

    let path = saved.path.unwrap();
    assert_eq!(path, tmp.path().join("la-ni-a-test-rndm.png"));
    assert_eq!(std::fs::metadata(&path).unwrap().len() as usize, saved.bytes_written);

    let names: Vec<String> = std::fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["la-ni-a-test-rndm.png".to_owned()]);
}

#[test]
fn default_opts() {
    let opts = ExportOpts::default();
    assert_eq!(opts.fetch_timeout, Duration::from_secs(10));
    assert_eq!(opts.on_asset_failure, AssetFailurePolicy::Abort);
    assert_eq!(opts.theme, CardTheme::default());
}
