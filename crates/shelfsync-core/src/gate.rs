use shelfsync_config::SyncMode;

/// The kinds of mutating action the orchestrator can take against the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Add,
    Remove,
    CreateList,
}

impl ActionKind {
    pub fn past(&self) -> &'static str {
        match self {
            ActionKind::Add => "added",
            ActionKind::Remove => "deleted",
            ActionKind::CreateList => "created",
        }
    }

    pub fn gerund(&self) -> &'static str {
        match self {
            ActionKind::Add => "adding",
            ActionKind::Remove => "removing",
            ActionKind::CreateList => "creating",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Execute,
    LogOnly,
}

/// The single place mode semantics live. Every mutating call site in the
/// orchestrator consults this; dry-run is matched first so it wins over
/// add-only wherever both would suppress the same removal.
pub fn decide(mode: SyncMode, action: ActionKind) -> Decision {
    match mode {
        SyncMode::DryRun => Decision::LogOnly,
        SyncMode::AddOnly => match action {
            ActionKind::Remove => Decision::LogOnly,
            ActionKind::Add | ActionKind::CreateList => Decision::Execute,
        },
        SyncMode::Full => Decision::Execute,
    }
}
