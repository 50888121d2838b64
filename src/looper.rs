//! Looper thread: the host event loop around a [`SliderLoop`].
//!
//! One thread owns the controller. Input values, commands and timer fires
//! all reach it through this loop, so they never interleave. The pending
//! playback tick is the receive deadline: the loop waits on the command
//! channel until the tick is due and then delivers it. A due tick is
//! delivered before the next message, one per turn of the loop, so ticks
//! and messages take turns when both are ready.

use crate::builder::LooperBuilder;
use crate::core::{Clock, Command, DeadlineTimer, GrowthPolicy, Mode, SliderLoop, SystemClock};
use crate::{Error, Result};
use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

type ThreadLoop = SliderLoop<SystemClock, DeadlineTimer, Sender<f32>>;

/// Message sent to the looper thread.
pub(crate) enum LooperMessage {
    /// Value from the control source
    Input(f32),
    Command(Command),
    /// Reply once every earlier message has been handled
    Sync(Sender<()>),
    Shutdown,
}

/// Running looper and its output stream.
///
/// Dropping it stops the thread.
pub struct LooperThread {
    handle: LooperHandle,
    output: Receiver<f32>,
    thread_handle: Option<JoinHandle<()>>,
}

impl LooperThread {
    pub fn builder() -> LooperBuilder {
        LooperBuilder::default()
    }

    pub(crate) fn spawn(
        growth: GrowthPolicy,
        command_capacity: usize,
        thread_name: String,
    ) -> Result<Self> {
        let (command_tx, command_rx) = bounded(command_capacity);
        let (output_tx, output_rx) = unbounded();
        let mode = Arc::new(AtomicU8::new(Mode::Idle.as_u8()));

        let looper = SliderLoop::new(SystemClock::new(), DeadlineTimer::new(), output_tx)
            .with_growth(growth);
        let published = Arc::clone(&mode);

        let thread_handle = thread::Builder::new()
            .name(thread_name)
            .spawn(move || looper_loop(command_rx, looper, published))
            .map_err(Error::Spawn)?;

        Ok(Self {
            handle: LooperHandle {
                tx: command_tx,
                mode,
            },
            output: output_rx,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn handle(&self) -> LooperHandle {
        self.handle.clone()
    }

    /// Values emitted by playback, one per tick.
    pub fn output(&self) -> &Receiver<f32> {
        &self.output
    }

    pub fn mode(&self) -> Mode {
        self.handle.mode()
    }

    /// Stop the thread and wait for it to exit. Idempotent.
    pub fn shutdown(&mut self) {
        let _ = self.handle.tx.send(LooperMessage::Shutdown);

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for LooperThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Cloneable control handle for a [`LooperThread`].
///
/// Every method only queues a message; use [`sync`](Self::sync) to wait
/// until the thread has caught up.
#[derive(Clone)]
pub struct LooperHandle {
    tx: Sender<LooperMessage>,
    mode: Arc<AtomicU8>,
}

impl LooperHandle {
    fn send_message(&self, message: LooperMessage) -> Result<()> {
        self.tx.send(message).map_err(|_| Error::Disconnected)
    }

    pub fn input(&self, value: f32) -> Result<()> {
        self.send_message(LooperMessage::Input(value))
    }

    pub fn send(&self, command: Command) -> Result<()> {
        self.send_message(LooperMessage::Command(command))
    }

    pub fn record(&self) -> Result<()> {
        self.send(Command::Record)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(Command::Stop)
    }

    pub fn play(&self) -> Result<()> {
        self.send(Command::Play)
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> Result<()> {
        self.send(Command::Save(path.into()))
    }

    pub fn load(&self, path: impl Into<PathBuf>) -> Result<()> {
        self.send(Command::Load(path.into()))
    }

    /// Block until every message sent before this call has been handled.
    pub fn sync(&self) -> Result<()> {
        let (reply_tx, reply_rx) = bounded(1);
        self.send_message(LooperMessage::Sync(reply_tx))?;
        reply_rx.recv().map_err(|_| Error::Disconnected)
    }

    /// Mode as of the last handled message or tick.
    pub fn mode(&self) -> Mode {
        Mode::from_u8(self.mode.load(Ordering::Acquire))
    }
}

/// Looper thread main loop.
fn looper_loop(rx: Receiver<LooperMessage>, mut looper: ThreadLoop, mode: Arc<AtomicU8>) {
    tracing::debug!("Looper thread started");

    loop {
        // A due tick is delivered before the next message.
        if let Some(deadline) = looper.next_deadline() {
            if deadline <= looper.clock().now_ms() {
                looper.poll();
                publish_mode(&mode, &looper);
            }
        }

        let message = match looper.next_deadline() {
            Some(deadline) => {
                let at = looper.clock().instant_at(deadline);
                match rx.recv_deadline(at) {
                    Ok(message) => message,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(message) => message,
                Err(_) => break,
            },
        };

        match message {
            LooperMessage::Input(value) => looper.on_input(value),
            LooperMessage::Command(command) => {
                let name = command.to_string();
                if let Err(e) = looper.dispatch(command) {
                    tracing::error!("Command '{}' failed: {}", name, e);
                }
            }
            LooperMessage::Sync(reply) => {
                let _ = reply.send(());
            }
            LooperMessage::Shutdown => break,
        }
        publish_mode(&mode, &looper);
    }

    looper.stop();
    publish_mode(&mode, &looper);
    tracing::debug!("Looper thread shutting down");
}

fn publish_mode(mode: &AtomicU8, looper: &ThreadLoop) {
    mode.store(looper.mode().as_u8(), Ordering::Release);
}
