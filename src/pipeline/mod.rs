mod commit;
mod debounce;

pub use commit::{
    build_update, ChangeSource, CommitPipeline, CommitPurpose, CommitTicket, PendingChange,
};
pub use debounce::Debouncer;
