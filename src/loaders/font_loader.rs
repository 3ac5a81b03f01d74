use anyhow::{anyhow, Result};
use futures::channel::oneshot;
use std::path::{Path, PathBuf};
use std::thread;

use super::typeface::Typeface;

/// Outcome of polling an in-flight font load
#[derive(Debug)]
pub enum FontPoll {
    Pending,
    Ready(Typeface),
    Failed(anyhow::Error),
}

/// Handle to a font being loaded off the render thread
#[derive(Debug)]
pub struct FontRequest {
    receiver: oneshot::Receiver<Result<Typeface>>,
}

impl FontRequest {
    pub fn from_receiver(receiver: oneshot::Receiver<Result<Typeface>>) -> Self {
        Self { receiver }
    }

    /// Non-blocking check. Once `Ready` or `Failed` has been returned the
    /// request is spent and further polls report `Failed`.
    pub fn poll(&mut self) -> FontPoll {
        match self.receiver.try_recv() {
            Ok(None) => FontPoll::Pending,
            Ok(Some(Ok(font))) => FontPoll::Ready(font),
            Ok(Some(Err(err))) => FontPoll::Failed(err),
            Err(oneshot::Canceled) => FontPoll::Failed(anyhow!("font loader dropped before answering")),
        }
    }
}

pub struct FontLoader;

impl FontLoader {
    /// Read and parse the typeface on a worker thread
    pub fn spawn(path: impl AsRef<Path>) -> FontRequest {
        let path: PathBuf = path.as_ref().to_path_buf();
        let (sender, receiver) = oneshot::channel();

        log::info!("Loading font {:?}", path);
        let spawned = thread::Builder::new()
            .name("font-loader".into())
            .spawn(move || {
                // The receiver may already be gone after teardown
                let _ = sender.send(Typeface::load(&path));
            });

        if let Err(err) = spawned {
            log::warn!("Could not start font loader thread: {err}");
        }
        FontRequest::from_receiver(receiver)
    }
}

/// Two-phase font state owned by a visual.
///
/// `Uninitialized -> Loading -> Ready | Failed`; only the transition into
/// `Ready` hands out the typeface, exactly once.
#[derive(Debug, Default)]
pub enum TextState {
    #[default]
    Uninitialized,
    Loading(FontRequest),
    Ready,
    Failed,
}

impl TextState {
    pub fn start(&mut self, request: FontRequest) {
        if matches!(self, TextState::Uninitialized) {
            *self = TextState::Loading(request);
        }
    }

    /// Advance a pending load. Returns the typeface on the frame it arrives.
    pub fn poll(&mut self) -> Option<Typeface> {
        let TextState::Loading(request) = self else {
            return None;
        };
        match request.poll() {
            FontPoll::Pending => None,
            FontPoll::Ready(font) => {
                log::info!(
                    "Font {:?} ready ({} glyphs)",
                    font.family_name(),
                    font.glyph_count()
                );
                *self = TextState::Ready;
                Some(font)
            }
            FontPoll::Failed(err) => {
                log::warn!("Font load failed, text will not be shown: {err:#}");
                *self = TextState::Failed;
                None
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TextState::Uninitialized => "uninitialized",
            TextState::Loading(_) => "loading",
            TextState::Ready => "ready",
            TextState::Failed => "failed",
        }
    }
}
