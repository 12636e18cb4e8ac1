use std::time::Duration;

use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel},
    task::JoinHandle,
    time::{self, Instant},
};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub epoch: u64,
}

/// Per-question countdown driver. Each `start` bumps the epoch and spawns a
/// fresh ticker; ticks from earlier epochs are dropped on receipt, so a
/// cancelled ticker can never act on a later question.
#[derive(Debug)]
pub struct QuestionTimer {
    period: Duration,
    epoch: u64,
    ticker_task: Option<JoinHandle<()>>,
    sender: UnboundedSender<Tick>,
    receiver: UnboundedReceiver<Tick>,
}

impl QuestionTimer {
    pub fn new(period: Duration) -> Self {
        let (sender, receiver) = unbounded_channel();
        Self {
            period,
            epoch: 0,
            ticker_task: None,
            sender,
            receiver,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_running(&self) -> bool {
        self.ticker_task.is_some()
    }

    pub fn start(&mut self) {
        self.cancel();
        self.epoch += 1;

        let epoch = self.epoch;
        let sender = self.sender.clone();
        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);

        debug!("Starting question timer, epoch {}", epoch);
        self.ticker_task = Some(tokio::spawn(async move {
            loop {
                ticker.tick().await;
                if sender.send(Tick { epoch }).is_err() {
                    break;
                }
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.ticker_task.take() {
            debug!("Cancelling question timer, epoch {}", self.epoch);
            task.abort();
        }
    }

    /// Next tick of the running ticker. Pending forever while stopped, which
    /// makes it safe to race against user input in `select!`.
    pub async fn tick(&mut self) -> Tick {
        loop {
            // The timer owns a sender, so the channel never closes.
            let Some(tick) = self.receiver.recv().await else {
                return std::future::pending().await;
            };

            if self.ticker_task.is_some() && tick.epoch == self.epoch {
                return tick;
            }
        }
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
