//! Counting adapter placed between a byte source and the upload call

use super::progress::ProgressSink;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

/// Read-only decorator that counts bytes as they pass through.
///
/// The reader borrows its source: dropping or closing it leaves the source
/// untouched, so the pipeline that opened the source stays responsible for
/// closing it. Every non-empty read is forwarded to the sink as a delta.
pub struct ProgressReader<'a, R: ?Sized, S> {
    inner: &'a mut R,
    total: Option<u64>,
    transferred: u64,
    sink: S,
    closed: bool,
}

impl<'a, R, S> ProgressReader<'a, R, S>
where
    R: AsyncRead + Unpin + ?Sized,
    S: ProgressSink,
{
    pub fn new(inner: &'a mut R, total: Option<u64>, sink: S) -> Self {
        Self {
            inner,
            total,
            transferred: 0,
            sink,
            closed: false,
        }
    }

    /// Bytes handed out so far
    pub fn transferred(&self) -> u64 {
        self.transferred
    }

    /// Size hint given at construction, if any
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Stop progress rendering.
    ///
    /// Does not read from or close the source. Calling it twice is a no-op.
    pub fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.sink.finish();
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<R, S> AsyncRead for ProgressReader<'_, R, S>
where
    R: AsyncRead + Unpin + ?Sized,
    S: ProgressSink + Unpin,
{
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();
        let poll = Pin::new(&mut *this.inner).poll_read(cx, buf);

        if let Poll::Ready(Ok(())) = poll {
            let delta = (buf.filled().len() - before) as u64;
            if delta > 0 {
                this.transferred += delta;
                if !this.closed {
                    this.sink.advance(delta);
                }
            }
        }

        poll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upload::progress::NoProgress;
    use tokio::io::AsyncReadExt;

    #[derive(Default)]
    struct RecordingSink {
        deltas: Vec<u64>,
        finished: usize,
    }

    impl ProgressSink for RecordingSink {
        fn advance(&mut self, delta: u64) {
            self.deltas.push(delta);
        }

        fn finish(&mut self) {
            self.finished += 1;
        }
    }

    /// Hands out at most `chunk` bytes per read.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl AsyncRead for Trickle {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            let this = self.get_mut();
            let end = (this.pos + this.chunk)
                .min(this.data.len())
                .min(this.pos + buf.remaining());
            buf.put_slice(&this.data[this.pos..end]);
            this.pos = end;
            Poll::Ready(Ok(()))
        }
    }

    /// Panics if anything touches it.
    struct Untouchable;

    impl AsyncRead for Untouchable {
        fn poll_read(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            panic!("source was read");
        }
    }

    #[tokio::test]
    async fn deltas_sum_to_source_length() {
        for chunk in [1, 3, 7, 64, 4096] {
            let mut source = Trickle {
                data: (0..1000u32).map(|i| i as u8).collect(),
                pos: 0,
                chunk,
            };
            let mut reader = ProgressReader::new(&mut source, Some(1000), RecordingSink::default());

            let mut out = Vec::new();
            reader.read_to_end(&mut out).await.unwrap();

            assert_eq!(out.len(), 1000);
            assert_eq!(reader.sink().deltas.iter().sum::<u64>(), 1000);
            assert!(reader.sink().deltas.iter().all(|&d| d > 0));
            assert_eq!(reader.transferred(), reader.total().unwrap());
        }
    }

    #[tokio::test]
    async fn unknown_total_still_counts() {
        let data = b"streamed without a size".to_vec();
        let mut source: &[u8] = &data;
        let mut reader = ProgressReader::new(&mut source, None, RecordingSink::default());

        let mut out = Vec::new();
        reader.read_to_end(&mut out).await.unwrap();

        assert_eq!(reader.total(), None);
        assert_eq!(reader.transferred(), data.len() as u64);
    }

    #[test]
    fn close_never_touches_the_source() {
        let mut source = Untouchable;
        let mut reader = ProgressReader::new(&mut source, None, RecordingSink::default());
        reader.close();
        reader.close();
        assert!(reader.is_closed());
        assert_eq!(reader.sink().finished, 1);
        assert!(reader.sink().deltas.is_empty());
    }

    #[tokio::test]
    async fn source_stays_usable_after_close() {
        let data = b"0123456789".to_vec();
        let mut source: &[u8] = &data;
        {
            let mut reader = ProgressReader::new(&mut source, Some(10), NoProgress);
            let mut head = [0u8; 4];
            reader.read_exact(&mut head).await.unwrap();
            reader.close();
            assert_eq!(reader.transferred(), 4);
        }

        let mut rest = Vec::new();
        source.read_to_end(&mut rest).await.unwrap();
        assert_eq!(rest, b"456789");
    }

    #[tokio::test]
    async fn reads_after_close_are_counted_but_not_reported() {
        let data = b"abcdef".to_vec();
        let mut source: &[u8] = &data;
        let mut reader = ProgressReader::new(&mut source, Some(6), RecordingSink::default());

        let mut head = [0u8; 2];
        reader.read_exact(&mut head).await.unwrap();
        reader.close();
        let mut rest = Vec::new();
        reader.read_to_end(&mut rest).await.unwrap();

        assert_eq!(reader.transferred(), 6);
        assert_eq!(reader.sink().deltas.iter().sum::<u64>(), 2);
    }
}
