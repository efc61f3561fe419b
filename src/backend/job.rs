use uuid::Uuid;

use super::{BackendReply, BackendRequest, BackendResult};
use crate::bulk::{BulkPlan, BulkReport};
use crate::model::AssetKind;
use crate::pipeline::CommitTicket;
use crate::selection::ScopeKey;

/// What an export's result should be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportAction {
    Save,
    CopySvg,
    CopyImage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTag {
    pub file_name: String,
    pub action: ExportAction,
    /// Set for per-item exports of a selection, which are announced once the
    /// whole batch has settled.
    pub batch: Option<Uuid>,
}

/// What a response is for. Every tag that mutates item state carries the
/// scope it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub enum JobTag {
    Groups(ScopeKey),
    Commit(CommitTicket),
    Colorful { scope: ScopeKey, greyscale: bool },
    SingleColorRevert(ScopeKey),
    Asset { url: String },
    Catalog(AssetKind),
    Export(ExportTag),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub tag: JobTag,
    pub request: BackendRequest,
}

/// A unit queued for the executor.
#[derive(Debug, Clone, PartialEq)]
pub enum Work {
    Single(Job),
    /// Fanned out concurrently and reported back once every request settled
    Batch(BulkPlan),
}

#[derive(Debug)]
pub enum Completion {
    Single {
        tag: JobTag,
        result: BackendResult<BackendReply>,
    },
    Batch(BulkReport),
}
