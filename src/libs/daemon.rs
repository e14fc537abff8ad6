//! Background snapshot host.
//!
//! Runs the [`SnapshotScheduler`] next to whatever keeps the process busy (the
//! interactive shell, or just a signal wait) and flushes the board one last
//! time on shutdown.

use super::scheduler::{SchedulerHandle, SnapshotScheduler};
use super::store::{SaveOutcome, TaskStore};
use crate::libs::messages::Message;
use crate::{msg_debug, msg_error, msg_info, msg_warning};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Resolves when the process is asked to stop.
///
/// Listens for SIGTERM and SIGINT on unix and Ctrl+C on windows. On other
/// platforms it never resolves.
pub async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(_) => {
                msg_error!(Message::FailedToCreateSigtermHandler);
                return std::future::pending().await;
            }
        };
        let mut sigint = match signal(SignalKind::interrupt()) {
            Ok(sigint) => sigint,
            Err(_) => {
                msg_error!(Message::FailedToCreateSigintHandler);
                return std::future::pending().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => {
                msg_info!(Message::ReceivedSigterm);
            }
            _ = sigint.recv() => {
                msg_info!(Message::ReceivedSigint);
            }
        }
    }

    #[cfg(windows)]
    {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                msg_info!(Message::ReceivedCtrlC);
            }
            Err(e) => {
                msg_error!(Message::CtrlCListenFailed(e.to_string()));
                std::future::pending::<()>().await;
            }
        }
    }

    #[cfg(not(any(unix, windows)))]
    {
        msg_warning!(Message::SignalHandlingNotSupported);
        std::future::pending::<()>().await;
    }
}

/// Starts the scheduler for `store`, waits for `shutdown`, then stops it.
///
/// After the scheduler has exited the board gets a final save, so edits made
/// since the last cycle are not lost. A failing final save is reported but
/// does not turn into an error.
pub async fn run_until_shutdown<F>(store: Arc<TaskStore>, period: Duration, shutdown: F)
where
    F: Future<Output = ()>,
{
    let handle = start(Arc::clone(&store), period);

    shutdown.await;
    msg_debug!(Message::ShuttingDown);

    stop(handle).await;
    final_save(store).await;
}

fn start(store: Arc<TaskStore>, period: Duration) -> SchedulerHandle {
    msg_debug!(Message::SchedulerStarted(period.as_secs()));
    SnapshotScheduler::new(store, period).spawn()
}

async fn stop(handle: SchedulerHandle) {
    let stats = handle.shutdown().await;
    msg_debug!(Message::SchedulerStopped {
        cycles: stats.cycles,
        saves: stats.saves,
        failures: stats.failures,
    });
}

async fn final_save(store: Arc<TaskStore>) {
    match tokio::task::spawn_blocking(move || store.save()).await {
        Ok(Ok(SaveOutcome::Written { .. } | SaveOutcome::Clean | SaveOutcome::Detached)) => {}
        Ok(Err(e)) => msg_warning!(Message::FinalSaveFailed(e.to_string())),
        Err(e) => msg_error!(Message::FinalSaveFailed(e.to_string())),
    }
}
