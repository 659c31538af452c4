//! Suspend-and-retry rendering over cached computations.
//!
//! A render pass reads computations through a [`RenderScope`]. Reading a
//! pending computation interrupts the pass with [`Interrupt::Suspended`] and
//! records the computation as a wake source. The enclosing
//! [`SuspenseBoundary`] paints its fallback, waits for every recorded
//! computation to settle and runs the pass again. Failures are not handled
//! here: they leave the boundary as-is and are turned into an error frame by
//! the nearest [`ErrorBoundary`].

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::cache::{Computation, FetchState};

/// Why a render pass stopped early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interrupt<E> {
    /// A read hit a pending computation; retry once it settles.
    Suspended,
    /// A read hit a failed computation.
    Failed(E),
}

/// Per-pass read context collecting the computations the pass is waiting on.
#[derive(Default)]
pub struct RenderScope {
    wake_sources: Vec<BoxFuture<'static, ()>>,
}

impl RenderScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unwrap a computation: its value, a suspension, or its error.
    pub fn read<T, E>(&mut self, computation: &Computation<T, E>) -> Result<Arc<T>, Interrupt<E>>
    where
        T: Send + Sync + 'static,
        E: Clone + Send + Sync + 'static,
    {
        match computation.state() {
            FetchState::Resolved(value) => Ok(value),
            FetchState::Failed(error) => Err(Interrupt::Failed(error)),
            FetchState::Pending => {
                self.wake_sources
                    .push(computation.clone().map(|_| ()).boxed());
                Err(Interrupt::Suspended)
            }
        }
    }

    pub fn wake_source_count(&self) -> usize {
        self.wake_sources.len()
    }

    async fn wait(self) {
        join_all(self.wake_sources).await;
    }
}

/// Why a boundary gave up on its content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError<E> {
    /// A computation read during the pass failed.
    #[error("{0}")]
    Failed(E),
    /// The pass suspended without reading anything pending, so nothing
    /// would ever wake it.
    #[error("render suspended without reading a pending computation")]
    Stalled,
}

/// One paint of a boundary's region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Fallback(String),
    Content(String),
    Error(String),
}

/// Somewhere frames are painted.
pub trait Surface {
    fn paint(&mut self, frame: Frame);
}

/// Keeps every painted frame in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    frames: Vec<Frame>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn last(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Surface for RecordingSurface {
    fn paint(&mut self, frame: Frame) {
        self.frames.push(frame);
    }
}

/// Region that shows a fallback while its content is suspended.
#[derive(Debug, Clone, Copy)]
pub struct SuspenseBoundary {
    name: &'static str,
}

impl SuspenseBoundary {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// Run `render` until it completes or fails.
    ///
    /// The fallback is painted once, on the first suspension. Later passes
    /// read the cache again and never restart a request themselves. A pass
    /// that suspends with no wake sources ends with [`RenderError::Stalled`].
    pub async fn render<S, E, F>(
        &self,
        surface: &mut S,
        fallback: &str,
        mut render: F,
    ) -> Result<(), RenderError<E>>
    where
        S: Surface + ?Sized,
        F: FnMut(&mut RenderScope) -> Result<String, Interrupt<E>>,
    {
        let mut fallback_shown = false;
        let mut pass = 0u32;

        loop {
            pass += 1;
            let mut scope = RenderScope::new();
            match render(&mut scope) {
                Ok(content) => {
                    trace!(
                        target = "folio::client::suspense",
                        boundary = self.name,
                        pass,
                        "render completed"
                    );
                    surface.paint(Frame::Content(content));
                    return Ok(());
                }
                Err(Interrupt::Failed(error)) => return Err(RenderError::Failed(error)),
                Err(Interrupt::Suspended) if scope.wake_source_count() == 0 => {
                    warn!(
                        target = "folio::client::suspense",
                        boundary = self.name,
                        pass,
                        "render suspended with nothing to wait on"
                    );
                    return Err(RenderError::Stalled);
                }
                Err(Interrupt::Suspended) => {
                    debug!(
                        target = "folio::client::suspense",
                        boundary = self.name,
                        pass,
                        waiting_on = scope.wake_source_count(),
                        "render suspended"
                    );
                    if !fallback_shown {
                        surface.paint(Frame::Fallback(fallback.to_string()));
                        fallback_shown = true;
                    }
                    scope.wait().await;
                }
            }
        }
    }
}

/// Turns an error escaping a subtree into an error frame.
#[derive(Debug, Clone, Copy)]
pub struct ErrorBoundary {
    title: &'static str,
}

impl ErrorBoundary {
    pub fn new(title: &'static str) -> Self {
        Self { title }
    }

    /// Paint an error frame for `result`'s error, handing the error back.
    pub fn catch<S, E>(&self, surface: &mut S, result: Result<(), E>) -> Option<E>
    where
        S: Surface + ?Sized,
        E: fmt::Display,
    {
        match result {
            Ok(()) => None,
            Err(error) => {
                surface.paint(Frame::Error(format!("{}: {error}", self.title)));
                Some(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::oneshot;

    use super::*;

    #[tokio::test]
    async fn resolved_read_renders_without_fallback() {
        let computation = Computation::<String, String>::resolved("ready".into());
        let mut surface = RecordingSurface::new();

        SuspenseBoundary::new("test")
            .render(&mut surface, "loading", |scope| {
                let value = scope.read(&computation)?;
                Ok(format!("value={value}"))
            })
            .await
            .expect("no failure");

        assert_eq!(surface.frames(), &[Frame::Content("value=ready".into())]);
    }

    #[tokio::test]
    async fn pending_read_paints_fallback_once_then_content() {
        let (tx, rx) = oneshot::channel::<String>();
        let computation =
            Computation::<String, String>::new(async move { rx.await.map_err(|e| e.to_string()) });
        let mut surface = RecordingSurface::new();

        let boundary = SuspenseBoundary::new("test");
        let render = boundary.render(&mut surface, "loading", |scope| {
            let value = scope.read(&computation)?;
            Ok(value.to_string())
        });
        let release = async {
            tokio::task::yield_now().await;
            tx.send("done".into()).expect("receiver alive");
        };
        let (result, ()) = tokio::join!(render, release);
        result.expect("no failure");

        assert_eq!(
            surface.frames(),
            &[
                Frame::Fallback("loading".into()),
                Frame::Content("done".into())
            ]
        );
    }

    #[tokio::test]
    async fn failure_propagates_to_error_boundary() {
        let computation = Computation::<String, String>::failed("Post with ID 9 not found".into());
        let mut surface = RecordingSurface::new();

        let result = SuspenseBoundary::new("test")
            .render(&mut surface, "loading", |scope| {
                scope.read(&computation).map(|value| value.to_string())
            })
            .await;

        let caught = ErrorBoundary::new("Something went wrong").catch(&mut surface, result);
        assert_eq!(
            caught,
            Some(RenderError::Failed("Post with ID 9 not found".to_string()))
        );
        assert_eq!(
            surface.last(),
            Some(&Frame::Error(
                "Something went wrong: Post with ID 9 not found".into()
            ))
        );
    }

    #[tokio::test]
    async fn suspension_without_pending_reads_is_reported() {
        let mut surface = RecordingSurface::new();

        let result = SuspenseBoundary::new("test")
            .render::<_, String, _>(&mut surface, "loading", |_scope| {
                Err(Interrupt::Suspended)
            })
            .await;

        assert_eq!(result, Err(RenderError::Stalled));
        assert!(surface.frames().is_empty());
    }
}
