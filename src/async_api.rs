use crate::frame::{Frame, FrameBuffer, ImageHandle};
use crate::rendering::{capture, EncodingOptions, Surface};
use crate::{Error, Result};
use std::sync::mpsc::{self, Sender};
use std::thread;
use tokio::sync::oneshot;

enum Command {
    Append(ImageHandle, oneshot::Sender<Result<()>>),
    Break(oneshot::Sender<()>),
    Snapshot(oneshot::Sender<Vec<Frame>>),
    Finish(oneshot::Sender<FrameBuffer>),
}

/// An async-friendly frame recorder backed by a dedicated worker thread.
///
/// The worker thread owns the `FrameBuffer`; every clone of the recorder sends
/// commands to it, so appends coming from concurrent capture tasks are applied
/// one at a time in arrival order. Layout should run on the buffer returned by
/// [`Recorder::finish`] or on a [`Recorder::snapshot`], never on a buffer that
/// is still being appended to.
#[derive(Clone)]
pub struct Recorder {
    cmd_tx: Sender<Command>,
}

impl Recorder {
    /// Spawn the worker thread with an empty buffer.
    pub fn new() -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<Command>();

        thread::spawn(move || {
            let mut buffer = FrameBuffer::new();

            // Command loop
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    Command::Append(image, resp) => {
                        let res = buffer.append(image);
                        let _ = resp.send(res);
                    }
                    Command::Break(resp) => {
                        buffer.append_break();
                        let _ = resp.send(());
                    }
                    Command::Snapshot(resp) => {
                        let _ = resp.send(buffer.snapshot().to_vec());
                    }
                    Command::Finish(resp) => {
                        let _ = resp.send(std::mem::take(&mut buffer));
                        break;
                    }
                }
            }
        });

        Self { cmd_tx }
    }

    /// Append an encoded image.
    pub async fn append(&self, image: ImageHandle) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Append(image, tx))
            .map_err(|_| Error::Closed)?;
        rx.await.map_err(|_| Error::Closed)?
    }

    /// Encode `surface` on the calling task, then append it.
    pub async fn capture<S: Surface + ?Sized>(&self, surface: &S, options: &EncodingOptions) -> Result<ImageHandle> {
        let image = capture(surface, options)?;
        self.append(image.clone()).await?;
        Ok(image)
    }

    /// Append a page break.
    pub async fn page_break(&self) -> Result<()> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(Command::Break(tx)).map_err(|_| Error::Closed)?;
        rx.await.map_err(|_| Error::Closed)
    }

    /// Copy of the frames recorded so far.
    pub async fn snapshot(&self) -> Result<Vec<Frame>> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(Command::Snapshot(tx)).map_err(|_| Error::Closed)?;
        rx.await.map_err(|_| Error::Closed)
    }

    /// Stop the worker and take the buffer. Other clones fail with
    /// [`Error::Closed`] afterwards.
    pub async fn finish(self) -> Result<FrameBuffer> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx.send(Command::Finish(tx)).map_err(|_| Error::Closed)?;
        rx.await.map_err(|_| Error::Closed)
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}
