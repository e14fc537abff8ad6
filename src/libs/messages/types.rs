#[derive(Debug, Clone)]
pub enum Message {
    // === TASK MESSAGES ===
    TaskCreated { id: String, column: String },
    TaskUpdated(String),
    TaskMoved { id: String, column: String, index: i64 },
    TaskDeleted(String),
    TaskNotFound(String),

    // === COLUMN MESSAGES ===
    ColumnEmptied { column: String, removed: usize },
    ColumnAlreadyEmpty(String),

    // === BOARD MESSAGES ===
    BoardEmpty,
    BoardSaved(String),  // path
    BoardUnchanged,
    BoardNotPersisted,
    BoardSaveFailed(String),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigParseError,
    ConfigModuleStore,
    PromptSnapshotFile,
    PromptSaveInterval,
    PromptSeed,

    // === SHELL MESSAGES ===
    ShellWelcome,
    ShellGoodbye,
    ShellInputClosed,
    ShellReadFailed(String),
    ShellCommandError(String),

    // === SCHEDULER MESSAGES ===
    SchedulerStarted(u64), // seconds
    SchedulerStopped { cycles: u64, saves: u64, failures: u64 },
    ShuttingDown,
    ReceivedSigterm,
    ReceivedSigint,
    ReceivedCtrlC,
    CtrlCListenFailed(String),
    SignalHandlingNotSupported,
    FailedToCreateSigtermHandler,
    FailedToCreateSigintHandler,
    FinalSaveFailed(String),
}
