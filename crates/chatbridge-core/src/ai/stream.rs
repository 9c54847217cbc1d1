//! Incremental text streams
//!
//! A `TextStream` is lazy, single-pass and finite. It is fed by a producer
//! task through a bounded channel, so a slow consumer applies backpressure
//! to the provider connection. Dropping the stream stops the producer.
//!
//! States: `next()` yields `Some(Ok(chunk))` while text arrives, `None` once
//! the provider closes the stream, or one final `Some(Err(_))` when the
//! stream breaks. Text delivered before an error is a partial result.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;
use tokio::sync::mpsc;

use crate::error::{AiError, Result};

/// Producer half handed to the task reading from the provider
pub struct TextSink {
    tx: mpsc::Sender<Result<String>>,
}

impl TextSink {
    /// Send a chunk. Returns false once the consumer has gone away.
    pub async fn send(&self, chunk: String) -> bool {
        self.tx.send(Ok(chunk)).await.is_ok()
    }

    /// End the stream with an error
    pub async fn fail(self, error: AiError) {
        let _ = self.tx.send(Err(error)).await;
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half: a finite sequence of text fragments
pub struct TextStream {
    rx: mpsc::Receiver<Result<String>>,
    model: String,
    finished: bool,
}

impl TextStream {
    /// Create a connected sink/stream pair
    pub fn channel(model: impl Into<String>, capacity: usize) -> (TextSink, TextStream) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            TextSink { tx },
            TextStream {
                rx,
                model: model.into(),
                finished: false,
            },
        )
    }

    /// A stream that replays fixed items (useful for fakes and tests)
    pub fn from_items(model: impl Into<String>, items: Vec<Result<String>>) -> TextStream {
        let (tx, rx) = mpsc::channel(items.len().max(1));
        for item in items {
            // Capacity covers every item, so this cannot fail
            let _ = tx.try_send(item);
        }
        TextStream {
            rx,
            model: model.into(),
            finished: false,
        }
    }

    /// Model this stream was opened for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Next fragment: `Some(Ok)` value, `None` done, `Some(Err)` broken
    pub async fn next(&mut self) -> Option<Result<String>> {
        if self.finished {
            return None;
        }
        let item = self.rx.recv().await;
        self.observe(&item);
        item
    }

    /// Drain the stream into one string, failing if the stream broke
    pub async fn collect_text(mut self) -> Result<String> {
        let mut text = String::new();
        while let Some(chunk) = self.next().await {
            text.push_str(&chunk?);
        }
        Ok(text)
    }

    fn observe(&mut self, item: &Option<Result<String>>) {
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
            self.rx.close();
        }
    }
}

impl Stream for TextStream {
    type Item = Result<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            Poll::Ready(item) => {
                self.observe(&item);
                Poll::Ready(item)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl std::fmt::Debug for TextStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStream")
            .field("model", &self.model)
            .field("finished", &self.finished)
            .finish()
    }
}
