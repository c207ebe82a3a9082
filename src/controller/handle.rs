//! Cloneable front door to the timer event loop

use tokio::sync::{mpsc, oneshot};

use super::{Command, TimerEvent, TimerSnapshot};
use crate::{error::HandleError, state::TimerState, timer::TimerCategory};

/// Sends commands into the event loop and awaits their replies
#[derive(Debug, Clone)]
pub struct TimerHandle {
    events: mpsc::UnboundedSender<TimerEvent>,
}

impl TimerHandle {
    pub fn new(events: mpsc::UnboundedSender<TimerEvent>) -> Self {
        Self { events }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T, HandleError> {
        let (reply, response) = oneshot::channel();
        self.events
            .send(TimerEvent::Command(build(reply)))
            .map_err(|_| HandleError::LoopClosed)?;
        response.await.map_err(|_| HandleError::NoReply)
    }

    pub async fn start(&self, category: TimerCategory) -> Result<TimerState, HandleError> {
        Ok(self.request(|reply| Command::Start { category, reply }).await??)
    }

    pub async fn reset(&self) -> Result<(), HandleError> {
        Ok(self.request(|reply| Command::Reset { reply }).await??)
    }

    pub async fn scheduled_completion(&self) -> Result<Option<i64>, HandleError> {
        self.request(|reply| Command::ScheduledCompletion { reply }).await
    }

    pub async fn status(&self) -> Result<TimerSnapshot, HandleError> {
        self.request(|reply| Command::Status { reply }).await
    }

    /// Tell the loop the machine just resumed from suspend
    pub fn notify_resumed(&self) -> Result<(), HandleError> {
        self.events.send(TimerEvent::Resumed).map_err(|_| HandleError::LoopClosed)
    }
}
