use crate::Result;
use futures::future::LocalBoxFuture;
use std::collections::VecDeque;

/// A deferred operation over some state `S`.
pub type Command<S> = Box<dyn for<'a> FnOnce(&'a mut S) -> LocalBoxFuture<'a, Result<()>>>;

/// A FIFO queue of deferred operations.
///
/// Commands are executed one at a time in the order they were pushed, each one runs to completion
/// (including any awaiting it does) before the next one starts.
pub struct CommandQueue<S> {
    commands: VecDeque<Command<S>>,
}

impl<S> CommandQueue<S> {
    pub fn new() -> Self {
        Self {
            commands: VecDeque::new(),
        }
    }

    /// Record a command to be executed on the next [`CommandQueue::drain`].
    pub fn push<F>(&mut self, command: F)
    where
        F: for<'a> FnOnce(&'a mut S) -> LocalBoxFuture<'a, Result<()>> + 'static,
    {
        self.commands.push_back(Box::new(command));
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Execute every queued command in order against `state`.
    ///
    /// The queue is emptied before the first command runs. The first failing command stops the drain and
    /// its error is returned, the commands after it are dropped.
    pub async fn drain(&mut self, state: &mut S) -> Result<()> {
        let commands = std::mem::take(&mut self.commands);
        let total = commands.len();

        for (i, command) in commands.into_iter().enumerate() {
            if let Err(err) = command(&mut *state).await {
                log::debug!("command {} of {} failed: {}", i + 1, total, err);
                return Err(err);
            }
        }

        Ok(())
    }
}

impl<S> Default for CommandQueue<S> {
    fn default() -> Self {
        Self::new()
    }
}
