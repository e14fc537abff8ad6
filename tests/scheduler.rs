#[cfg(test)]
mod tests {
    use kanbo::libs::scheduler::{CycleOutcome, SchedulerHandle, SchedulerState, SchedulerStats, SnapshotScheduler};
    use kanbo::libs::seed::Seed;
    use kanbo::libs::snapshot::SNAPSHOT_FILE_NAME;
    use kanbo::libs::store::TaskStore;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::TempDir;
    use test_context::{test_context, AsyncTestContext};
    use tokio::time::{self, Duration, Instant};

    const PERIOD: Duration = Duration::from_millis(20);
    const PATIENCE: Duration = Duration::from_secs(5);

    struct SchedulerTestContext {
        temp_dir: TempDir,
    }

    impl AsyncTestContext for SchedulerTestContext {
        async fn setup() -> Self {
            SchedulerTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    impl SchedulerTestContext {
        fn snapshot_path(&self) -> PathBuf {
            self.temp_dir.path().join(SNAPSHOT_FILE_NAME)
        }

        /// Store whose snapshot directory is blocked by a regular file.
        fn blocked_store(&self) -> (Arc<TaskStore>, PathBuf) {
            let blocker = self.temp_dir.path().join("blocked");
            fs::write(&blocker, b"").unwrap();
            let store = Arc::new(TaskStore::open(blocker.join(SNAPSHOT_FILE_NAME), Seed::Empty));
            (store, blocker)
        }
    }

    /// Polls `condition` until it holds or the test runs out of patience.
    async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + PATIENCE;
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            time::sleep(Duration::from_millis(5)).await;
        }
        condition()
    }

    async fn wait_for_stats(handle: &SchedulerHandle, check: impl Fn(SchedulerStats) -> bool) -> bool {
        eventually(|| check(handle.stats())).await
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_cycle_skips_clean_store(ctx: &mut SchedulerTestContext) {
        let store = Arc::new(TaskStore::open(ctx.snapshot_path(), Seed::Empty));
        let scheduler = SnapshotScheduler::new(Arc::clone(&store), PERIOD);

        assert_eq!(scheduler.run_cycle().await, CycleOutcome::Skipped);

        assert!(!ctx.snapshot_path().exists());
        assert_eq!(scheduler.stats().cycles, 1);
        assert_eq!(scheduler.stats().saves, 0);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_cycle_saves_dirty_store(ctx: &mut SchedulerTestContext) {
        let store = Arc::new(TaskStore::open(ctx.snapshot_path(), Seed::Empty));
        let scheduler = SnapshotScheduler::new(Arc::clone(&store), PERIOD);
        store.add("a", "", "todo");

        assert_eq!(scheduler.run_cycle().await, CycleOutcome::Saved);
        assert!(ctx.snapshot_path().exists());
        assert!(!store.is_dirty());

        assert_eq!(scheduler.run_cycle().await, CycleOutcome::Skipped);
        assert_eq!(
            scheduler.stats(),
            SchedulerStats {
                cycles: 2,
                saves: 1,
                failures: 0
            }
        );
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_failed_cycle_keeps_store_dirty(ctx: &mut SchedulerTestContext) {
        let (store, _) = ctx.blocked_store();
        let scheduler = SnapshotScheduler::new(Arc::clone(&store), PERIOD);
        store.add("a", "", "todo");

        assert_eq!(scheduler.run_cycle().await, CycleOutcome::Failed);
        assert_eq!(scheduler.run_cycle().await, CycleOutcome::Failed);

        assert!(store.is_dirty());
        assert_eq!(scheduler.stats().failures, 2);
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_loop_writes_changes_in_background(ctx: &mut SchedulerTestContext) {
        let store = Arc::new(TaskStore::open(ctx.snapshot_path(), Seed::Empty));
        let handle = SnapshotScheduler::new(Arc::clone(&store), PERIOD).spawn();

        store.add("a", "", "todo");
        assert!(eventually(|| !store.is_dirty()).await, "first change was never saved");
        assert!(ctx.snapshot_path().exists());

        store.add("b", "", "todo");
        assert!(eventually(|| !store.is_dirty()).await, "second change was never saved");

        let stats = handle.shutdown().await;
        assert!(stats.saves >= 2);
        assert_eq!(stats.failures, 0);

        let reopened = TaskStore::open(ctx.snapshot_path(), Seed::Sample);
        assert_eq!(reopened.list_all(), store.list_all());
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_loop_survives_failures_and_recovers(ctx: &mut SchedulerTestContext) {
        let (store, blocker) = ctx.blocked_store();
        store.add("a", "", "todo");
        let handle = SnapshotScheduler::new(Arc::clone(&store), PERIOD).spawn();

        assert!(wait_for_stats(&handle, |stats| stats.failures >= 2).await);
        assert!(!handle.is_finished());
        assert!(store.is_dirty());

        fs::remove_file(&blocker).unwrap();
        assert!(eventually(|| !store.is_dirty()).await, "store was never saved after the path cleared");
        assert!(blocker.join(SNAPSHOT_FILE_NAME).exists());

        let stats = handle.shutdown().await;
        assert!(stats.saves >= 1);
    }

    #[test_context(SchedulerTestContext)]
    #[tokio::test]
    async fn test_shutdown_stops_the_loop(ctx: &mut SchedulerTestContext) {
        let store = Arc::new(TaskStore::open(ctx.snapshot_path(), Seed::Empty));
        let handle = SnapshotScheduler::new(Arc::clone(&store), Duration::from_secs(3600)).spawn();

        // the first tick fires immediately
        assert!(wait_for_stats(&handle, |stats| stats.cycles >= 1).await);

        let started = Instant::now();
        let stats = handle.shutdown().await;
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(stats.cycles, 1);

        // nothing runs after shutdown
        store.add("late", "", "todo");
        time::sleep(PERIOD * 3).await;
        assert!(store.is_dirty());
        assert!(!ctx.snapshot_path().exists());
    }
}
