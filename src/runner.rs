//! Runtime driver for tools that can be cancelled from the keyboard.

use crate::output;
use std::fmt::Display;
use std::future::Future;
use std::io;

#[derive(Debug)]
pub enum Outcome<T> {
    Finished(T),
    Cancelled,
}

/// Drives `work` until it completes or `cancel` resolves.
///
/// The runtime is shut down in the background afterwards, so a blocking task
/// still parked on a terminal read does not keep the process alive.
pub fn run_cancellable<W, C>(work: W, cancel: C) -> io::Result<Outcome<W::Output>>
where
    W: Future,
    C: Future,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let outcome = runtime.block_on(async {
        tokio::select! {
            output = work => Outcome::Finished(output),
            _ = cancel => Outcome::Cancelled,
        }
    });

    runtime.shutdown_background();
    Ok(outcome)
}

/// Exit code and closing console text for `telegram-auth`.
pub fn auth_exit<E: Display>(outcome: &Outcome<Result<(), E>>) -> (u8, Option<String>) {
    match outcome {
        Outcome::Finished(Ok(())) => (0, None),
        Outcome::Finished(Err(e)) => (1, Some(output::auth_failure_report(e))),
        Outcome::Cancelled => (1, Some(output::AUTH_CANCELLED.to_string())),
    }
}
