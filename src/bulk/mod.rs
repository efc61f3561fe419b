//! Multi-select operations.
//!
//! A bulk operation becomes one independent request per selected item (two
//! for an icon reset), each built with the folder recorded for that item. All
//! requests are fired together and awaited jointly. The batch is reported as a
//! whole: one failure makes the whole batch a failure for the user, while the
//! successes that already landed on the backend stay applied.

use futures::future::join_all;
use uuid::Uuid;

use crate::assets::AssetPaths;
use crate::backend::wire::{ColorfulBody, SingleColorBody, SingleColorRevertBody, UpdateColorBody};
use crate::backend::{BackendReply, BackendRequest, BackendResult, Transport, TransportFuture};
use crate::model::{
    AssetKind, FlagShape, GroupName, GroupTarget, HexColor, ItemRef, ORIGINAL_BLUE, ThemeMode,
};
use crate::notify::ToastLevel;
use crate::selection::SelectionSet;

#[derive(Debug, Clone, PartialEq)]
pub enum BulkOperation {
    /// Icons: one named group on every selected icon
    RecolorGroup { group: GroupName, color: HexColor },
    /// Single-color icons and flags
    RecolorWhole { color: HexColor },
    /// Colorful icons
    ConvertGreyscale,
    /// Colorful icons
    RevertColor,
    /// Icons (both fixed groups) and single-color icons
    ResetToOriginal,
}

impl BulkOperation {
    /// Whether this operation applies to items of `kind`
    pub fn supports(&self, kind: AssetKind) -> bool {
        match self {
            BulkOperation::RecolorGroup { .. } => kind == AssetKind::Icon,
            BulkOperation::RecolorWhole { .. } => {
                matches!(kind, AssetKind::SingleColorIcon | AssetKind::Flag)
            }
            BulkOperation::ConvertGreyscale | BulkOperation::RevertColor => {
                kind == AssetKind::ColorfulIcon
            }
            BulkOperation::ResetToOriginal => {
                matches!(kind, AssetKind::Icon | AssetKind::SingleColorIcon)
            }
        }
    }

    fn requests_for(&self, item: &ItemRef, mode: ThemeMode, shape: FlagShape) -> Vec<BackendRequest> {
        let file_name = AssetPaths::file_name(item, shape);
        let update = |group_id: &str, color: HexColor| {
            BackendRequest::UpdateColor(UpdateColorBody {
                icon_name: file_name.clone(),
                group_id: group_id.to_owned(),
                color,
                kind: item.kind.wire_type().to_owned(),
                folder: item.kind.has_folders().then(|| item.folder.as_str().to_owned()),
                mode: mode.as_str().to_owned(),
            })
        };

        match (self, item.kind) {
            (BulkOperation::RecolorGroup { group, color }, _) => vec![update(group.as_str(), *color)],
            (BulkOperation::RecolorWhole { color }, AssetKind::SingleColorIcon) => {
                vec![BackendRequest::SingleColorUpdate(SingleColorBody {
                    icon_name: file_name,
                    color: *color,
                    mode: mode.as_str().to_owned(),
                })]
            }
            (BulkOperation::RecolorWhole { color }, kind) => {
                vec![update(GroupTarget::WholeAsset.wire_id(kind), *color)]
            }
            (BulkOperation::ConvertGreyscale, _) => vec![BackendRequest::Greyscale(ColorfulBody {
                icon_name: item.name.clone(),
                folder: item.folder.as_str().to_owned(),
            })],
            (BulkOperation::RevertColor, _) => vec![BackendRequest::Revert(ColorfulBody {
                icon_name: item.name.clone(),
                folder: item.folder.as_str().to_owned(),
            })],
            (BulkOperation::ResetToOriginal, AssetKind::SingleColorIcon) => {
                vec![BackendRequest::SingleColorRevert(SingleColorRevertBody {
                    icon_name: file_name,
                    mode: mode.as_str().to_owned(),
                })]
            }
            // Icons carry two fixed groups: "Grey" back to the mode default and
            // "Color" back to the original blue.
            (BulkOperation::ResetToOriginal, _) => vec![
                update("Grey", mode.default_grey()),
                update("Color", ORIGINAL_BLUE),
            ],
        }
    }

    fn outcome_message(&self, kind: AssetKind, item_count: usize, failed: bool) -> String {
        let noun = kind.noun();
        match (self, failed) {
            (BulkOperation::RecolorGroup { .. } | BulkOperation::RecolorWhole { .. }, false) => {
                format!("Color applied to {item_count} {noun}!")
            }
            (BulkOperation::RecolorGroup { .. } | BulkOperation::RecolorWhole { .. }, true) => {
                format!("Failed to apply color to some {noun}")
            }
            (BulkOperation::ConvertGreyscale, false) => {
                format!("Converted {item_count} {noun} to greyscale!")
            }
            (BulkOperation::ConvertGreyscale, true) => {
                format!("Failed to convert some {noun} to greyscale")
            }
            (BulkOperation::RevertColor, false) => {
                format!("Reverted {item_count} {noun} to original colors!")
            }
            (BulkOperation::RevertColor, true) => {
                format!("Failed to revert some {noun} to original colors")
            }
            (BulkOperation::ResetToOriginal, false) => {
                format!("Reset {item_count} {noun} to original colors!")
            }
            (BulkOperation::ResetToOriginal, true) => {
                format!("Failed to reset some {noun} to original colors")
            }
        }
    }
}

/// Requests for one bulk operation, ready to be fanned out.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkPlan {
    pub id: Uuid,
    pub kind: AssetKind,
    pub operation: BulkOperation,
    pub item_count: usize,
    pub requests: Vec<BackendRequest>,
}

/// Plans `operation` over every item in `selection`.
///
/// Returns `None` when nothing is selected or the operation does not apply to
/// `kind`.
pub fn plan(
    operation: BulkOperation,
    kind: AssetKind,
    selection: &SelectionSet,
    mode: ThemeMode,
    shape: FlagShape,
) -> Option<BulkPlan> {
    if selection.is_empty() {
        return None;
    }
    if !operation.supports(kind) {
        log::warn!("{operation:?} does not apply to {}", kind.noun());
        return None;
    }

    let items = selection.items(kind);
    let requests = items
        .iter()
        .flat_map(|item| operation.requests_for(item, mode, shape))
        .collect();

    Some(BulkPlan {
        id: Uuid::new_v4(),
        kind,
        operation,
        item_count: items.len(),
        requests,
    })
}

/// Every request of a plan, already in flight.
pub struct InFlightBatch {
    plan: BulkPlan,
    pending: Vec<TransportFuture<BackendResult<BackendReply>>>,
}

/// Starts every request of `plan` at once.
pub fn fan_out(transport: &dyn Transport, plan: BulkPlan) -> InFlightBatch {
    log::info!(
        "Bulk {:?} over {} {} ({} requests, batch {})",
        plan.operation,
        plan.item_count,
        plan.kind.noun(),
        plan.requests.len(),
        plan.id
    );
    let pending = plan
        .requests
        .iter()
        .cloned()
        .map(|request| transport.send(request))
        .collect();
    InFlightBatch { plan, pending }
}

impl InFlightBatch {
    /// Waits for every request and summarizes the batch.
    pub async fn join(self) -> BulkReport {
        let InFlightBatch { plan, pending } = self;
        let outcomes = join_all(pending).await;

        let mut failures = 0;
        for (request, outcome) in plan.requests.iter().zip(&outcomes) {
            if let Err(err) = outcome {
                failures += 1;
                log::error!("Bulk request {} failed: {err}", request.describe());
            }
        }

        BulkReport {
            id: plan.id,
            kind: plan.kind,
            operation: plan.operation,
            item_count: plan.item_count,
            request_count: outcomes.len(),
            failures,
        }
    }
}

/// Settled batch. Which items failed is only logged.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkReport {
    pub id: Uuid,
    pub kind: AssetKind,
    pub operation: BulkOperation,
    pub item_count: usize,
    pub request_count: usize,
    pub failures: usize,
}

impl BulkReport {
    pub fn is_success(&self) -> bool {
        self.failures == 0
    }

    /// The single notification shown for the whole batch
    pub fn notification(&self) -> (ToastLevel, String) {
        let level = if self.is_success() {
            ToastLevel::Success
        } else {
            ToastLevel::Error
        };
        let message = self
            .operation
            .outcome_message(self.kind, self.item_count, !self.is_success());
        (level, message)
    }
}
