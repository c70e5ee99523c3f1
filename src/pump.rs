use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Where and how often a pump posts its tick event.
pub struct PumpConfig<E> {
    period: Duration,
    events: Sender<E>,
    event: E,
}

impl<E: Clone + Send + 'static> PumpConfig<E> {
    pub fn new(period: Duration, events: Sender<E>, event: E) -> Self {
        Self {
            period,
            events,
            event,
        }
    }

    /// Start a pump thread posting `event` every `period` until cancelled.
    pub fn spawn(&self) -> anyhow::Result<PumpHandle> {
        let (control, control_rx) = mpsc::channel();
        let period = self.period;
        let events = self.events.clone();
        let event = self.event.clone();

        let thread = thread::Builder::new()
            .name("pump".into())
            .spawn(move || pump_thread(period, control_rx, events, event))?;

        log::debug!("pump started, period {:?}", period);
        Ok(PumpHandle {
            control: Some(control),
            thread: Some(thread),
        })
    }
}

/// Owner of a running pump. Cancelling or dropping it stops the thread.
pub struct PumpHandle {
    control: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl PumpHandle {
    pub fn cancel(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Closing the control channel wakes the thread immediately.
        self.control.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("pump thread panicked");
            } else {
                log::debug!("pump stopped");
            }
        }
    }
}

impl Drop for PumpHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn pump_thread<E>(period: Duration, control: Receiver<()>, events: Sender<E>, event: E)
where
    E: Clone,
{
    loop {
        match control.recv_timeout(period) {
            Err(RecvTimeoutError::Timeout) => {
                if events.send(event.clone()).is_err() {
                    // Event loop is gone.
                    break;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}
