//! Latest-wins sampling of a state stream

use futures::Stream;
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};

/// Extension trait adding [`Sample`] to any stream.
pub trait SampleExt: Stream {
    /// Emit at most one item per `period`, always the most recent one.
    ///
    /// The first item is emitted as soon as it arrives. Items that arrive
    /// while the period is running overwrite each other. When the inner stream
    /// ends, a pending item is flushed before the sampled stream ends.
    fn sample(self, period: Duration) -> Sample<Self>
    where
        Self: Sized,
    {
        Sample::new(self, period)
    }
}

impl<T: Stream> SampleExt for T {}

pin_project! {
    /// Stream returned by [`SampleExt::sample`].
    pub struct Sample<S: Stream> {
        #[pin]
        stream: S,
        interval: Interval,
        latest: Option<S::Item>,
        finished: bool,
    }
}

impl<S: Stream> Sample<S> {
    pub fn new(stream: S, period: Duration) -> Self {
        let mut interval = interval(period);
        // A slow consumer must not get a burst of catch-up emissions
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        Self { stream, interval, latest: None, finished: false }
    }
}

impl<S: Stream> Stream for Sample<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        while !*this.finished {
            match this.stream.as_mut().poll_next(cx) {
                Poll::Ready(Some(item)) => *this.latest = Some(item),
                Poll::Ready(None) => *this.finished = true,
                Poll::Pending => break,
            }
        }

        if *this.finished {
            return Poll::Ready(this.latest.take());
        }

        if this.latest.is_some() && this.interval.poll_tick(cx).is_ready() {
            return Poll::Ready(this.latest.take());
        }

        Poll::Pending
    }
}
