use std::{
    future::Future,
    sync::atomic::{AtomicU8, Ordering},
    time::Duration,
};

use crate::{
    assets::fetch::{AssetFailurePolicy, CardAssets, ImageFetcher, load_card_assets},
    compose::theme::CardTheme,
    encode::sink::{FileSink, SavedFile},
    entry::model::ShareableEntry,
    export::pipeline::{encode_card, render_frame},
    foundation::error::{CardError, CardResult},
    layout::planner::{CardLayout, plan_for, plan_layout},
    text::fonts::Typesetter,
};

/// Options for [`Exporter`].
#[derive(Clone, Debug, PartialEq)]
pub struct ExportOpts {
    /// Upper bound for each image fetch.
    pub fetch_timeout: Duration,
    /// Behavior when an image fails to load.
    pub on_asset_failure: AssetFailurePolicy,
    pub theme: CardTheme,
}

impl Default for ExportOpts {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(10),
            on_asset_failure: AssetFailurePolicy::Abort,
            theme: CardTheme::default(),
        }
    }
}

impl ExportOpts {
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_asset_failure_policy(mut self, policy: AssetFailurePolicy) -> Self {
        self.on_asset_failure = policy;
        self
    }

    pub fn with_theme(mut self, theme: CardTheme) -> Self {
        self.theme = theme;
        self
    }
}

/// Progress of the export currently running on an [`Exporter`].
///
/// Finished exports, successful or not, always land back on `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ExportState {
    Idle = 0,
    Loading = 1,
    Composing = 2,
    Encoding = 3,
}

impl ExportState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => ExportState::Loading,
            2 => ExportState::Composing,
            3 => ExportState::Encoding,
            _ => ExportState::Idle,
        }
    }
}

/// Turns entries into saved share cards, one at a time.
///
/// Exports must run inside a Tokio runtime with the time driver enabled (`enable_time` or
/// `enable_all`, which `#[tokio::main]` turns on). Compositing, rasterizing and PNG encoding
/// are CPU-bound and run inline on the exporting task; the export yields to the scheduler
/// between those steps, so cancellation is observed at step boundaries.
pub struct Exporter<F, S, T> {
    fetcher: F,
    sink: S,
    typesetter: T,
    opts: ExportOpts,
    state: AtomicU8,
}

impl<F, S, T> std::fmt::Debug for Exporter<F, S, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Exporter")
            .field("opts", &self.opts)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl<F, S, T> Exporter<F, S, T> {
    pub fn new(fetcher: F, sink: S, typesetter: T) -> Self {
        Self {
            fetcher,
            sink,
            typesetter,
            opts: ExportOpts::default(),
            state: AtomicU8::new(ExportState::Idle as u8),
        }
    }

    pub fn with_opts(mut self, opts: ExportOpts) -> Self {
        self.opts = opts;
        self
    }

    pub fn opts(&self) -> &ExportOpts {
        &self.opts
    }

    pub fn state(&self) -> ExportState {
        ExportState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<F, S, T> Exporter<F, S, T>
where
    F: ImageFetcher,
    S: FileSink,
    T: Typesetter,
{
    /// Render `entry` and hand the PNG to the sink.
    ///
    /// Fails with [`CardError::AlreadyInProgress`] while another export on this exporter is
    /// running. Nothing is saved unless every step succeeds.
    #[tracing::instrument(
        skip_all,
        fields(title = %entry.title, content_type = ?entry.content_type)
    )]
    pub async fn export(&self, entry: &ShareableEntry) -> CardResult<SavedFile> {
        let guard = InFlight::acquire(&self.state)?;
        let res = self.run(entry, &guard).await;
        match &res {
            Ok(saved) => tracing::debug!(
                file = %saved.file_name,
                bytes = saved.bytes_written,
                "export finished"
            ),
            Err(e) => tracing::warn!(error = %e, "export failed"),
        }
        res
    }

    /// [`Exporter::export`], abandoned as soon as `cancel` completes.
    ///
    /// A cancelled export drops its in-flight fetches, saves nothing and returns
    /// [`CardError::Cancelled`].
    pub async fn export_until<C>(
        &self,
        entry: &ShareableEntry,
        cancel: C,
    ) -> CardResult<SavedFile>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::debug!(title = %entry.title, "export cancelled");
                Err(CardError::Cancelled)
            }
            res = self.export(entry) => res,
        }
    }

    async fn run(&self, entry: &ShareableEntry, guard: &InFlight<'_>) -> CardResult<SavedFile> {
        entry.validate()?;
        let planned = plan_layout(entry);

        let assets = load_card_assets(
            &self.fetcher,
            entry,
            self.opts.fetch_timeout,
            self.opts.on_asset_failure,
        )
        .await?;
        let layout = replan_for_loaded(planned, &assets);

        guard.set(ExportState::Composing);
        tokio::task::yield_now().await;
        let frame = render_frame(
            entry,
            &layout,
            &assets,
            &self.opts.theme,
            &self.typesetter,
        )?;

        guard.set(ExportState::Encoding);
        tokio::task::yield_now().await;
        let card = encode_card(entry, &frame)?;
        self.sink.save(&card)
    }
}

/// Lay the card out again when a degraded load dropped an image the plan expected.
fn replan_for_loaded(planned: CardLayout, assets: &CardAssets) -> CardLayout {
    let has_cover = assets.cover.is_some();
    let has_photo = assets.photo.is_some();
    if planned.variant.has_cover() == has_cover && planned.variant.has_photo() == has_photo {
        return planned;
    }
    let layout = plan_for(has_cover, has_photo, planned.rating.is_some());
    tracing::warn!(
        planned = ?planned.variant,
        actual = ?layout.variant,
        "re-planned card without the images that failed to load"
    );
    layout
}

/// Marks an export as running; resets the exporter to `Idle` when dropped.
struct InFlight<'a> {
    state: &'a AtomicU8,
}

impl<'a> InFlight<'a> {
    fn acquire(state: &'a AtomicU8) -> CardResult<Self> {
        state
            .compare_exchange(
                ExportState::Idle as u8,
                ExportState::Loading as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map_err(|_| CardError::AlreadyInProgress)?;
        tracing::debug!(state = ?ExportState::Loading, "export state");
        Ok(Self { state })
    }

    fn set(&self, next: ExportState) {
        self.state.store(next as u8, Ordering::Release);
        tracing::debug!(state = ?next, "export state");
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.state.store(ExportState::Idle as u8, Ordering::Release);
        tracing::debug!(state = ?ExportState::Idle, "export state");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/exporter.rs"]
mod tests;
