#[cfg(test)]
mod tests {
    use kanbo::commands::board::{execute, BoardCommand};
    use kanbo::commands::shell::{run_line, run_session, Flow};
    use kanbo::libs::seed::Seed;
    use kanbo::libs::snapshot::SNAPSHOT_FILE_NAME;
    use kanbo::libs::store::TaskStore;
    use std::io::Cursor;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ShellTestContext {
        _temp_dir: TempDir,
        store: TaskStore,
    }

    impl TestContext for ShellTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let store = TaskStore::open(temp_dir.path().join(SNAPSHOT_FILE_NAME), Seed::Empty);
            ShellTestContext { _temp_dir: temp_dir, store }
        }
    }

    impl ShellTestContext {
        fn titles(&self, column_id: &str) -> Vec<String> {
            self.store.column_tasks(column_id).into_iter().map(|task| task.title).collect()
        }
    }

    #[test_context(ShellTestContext)]
    #[test]
    fn test_add_joins_title_words(ctx: &mut ShellTestContext) {
        assert_eq!(run_line(&ctx.store, "add todo Write the docs -d for the shell"), Flow::Continue);

        let tasks = ctx.store.column_tasks("todo");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Write the docs");
        assert_eq!(tasks[0].description, "for the shell");
    }

    #[test_context(ShellTestContext)]
    #[test]
    fn test_move_accepts_negative_index(ctx: &mut ShellTestContext) {
        ctx.store.add("a", "", "todo");
        let b = ctx.store.add("b", "", "todo");

        run_line(&ctx.store, &format!("move {} todo -1", b.id));

        assert_eq!(ctx.titles("todo"), vec!["b", "a"]);
    }

    #[test_context(ShellTestContext)]
    #[test]
    fn test_edit_keeps_description_when_omitted(ctx: &mut ShellTestContext) {
        let task = ctx.store.add("old", "kept", "todo");

        run_line(&ctx.store, &format!("edit {} new title", task.id));

        let task = ctx.store.get(&task.id).unwrap();
        assert_eq!(task.title, "new title");
        assert_eq!(task.description, "kept");
    }

    #[test_context(ShellTestContext)]
    #[test]
    fn test_errors_do_not_end_the_session(ctx: &mut ShellTestContext) {
        assert_eq!(run_line(&ctx.store, "delete no-such-task"), Flow::Continue);
        assert_eq!(run_line(&ctx.store, "frobnicate"), Flow::Continue);
        assert_eq!(run_line(&ctx.store, "help"), Flow::Continue);
        assert_eq!(run_line(&ctx.store, "   "), Flow::Continue);
        assert!(ctx.store.is_empty());
    }

    #[test_context(ShellTestContext)]
    #[test]
    fn test_save_and_quit(ctx: &mut ShellTestContext) {
        ctx.store.add("a", "", "todo");

        assert_eq!(run_line(&ctx.store, "save"), Flow::Continue);
        assert!(!ctx.store.is_dirty());
        assert!(ctx.store.snapshot_path().unwrap().exists());

        assert_eq!(run_line(&ctx.store, "quit"), Flow::Quit);
        assert_eq!(run_line(&ctx.store, "exit"), Flow::Quit);
    }

    #[test_context(ShellTestContext)]
    #[test]
    fn test_session_runs_until_quit(ctx: &mut ShellTestContext) {
        let input = Cursor::new("add todo one\nadd todo two\nempty todo\nquit\nadd todo never\n");

        run_session(&ctx.store, input);

        assert!(ctx.titles("todo").is_empty());
        assert!(ctx.store.is_empty());
    }

    #[test_context(ShellTestContext)]
    #[test]
    fn test_session_ends_with_input(ctx: &mut ShellTestContext) {
        run_session(&ctx.store, Cursor::new("add doing one"));
        assert_eq!(ctx.titles("doing"), vec!["one"]);
    }

    #[test_context(ShellTestContext)]
    #[test]
    fn test_edit_with_description_replaces_it(ctx: &mut ShellTestContext) {
        let task = ctx.store.add("old", "notes", "todo");

        run_line(&ctx.store, &format!("edit {} new title -d fresh notes", task.id));
        let edited = ctx.store.get(&task.id).unwrap();
        assert_eq!(edited.title, "new title");
        assert_eq!(edited.description, "fresh notes");
    }

    #[test_context(ShellTestContext)]
    #[test]
    fn test_execute_reports_missing_task(ctx: &mut ShellTestContext) {
        let err = execute(&ctx.store, BoardCommand::Show { id: "missing".to_string() }).unwrap_err();
        assert!(err.to_string().contains("Task missing not found"));

        assert!(execute(&ctx.store, BoardCommand::List { json: true }).is_ok());
    }
}
