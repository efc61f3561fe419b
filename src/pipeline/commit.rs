use std::time::Duration;

use super::Debouncer;
use crate::assets::AssetPaths;
use crate::backend::BackendRequest;
use crate::backend::wire::{SingleColorBody, UpdateColorBody};
use crate::model::{AssetKind, FlagShape, GroupTarget, HexColor, ItemRef, ThemeMode};
use crate::selection::ScopeKey;

/// Who produced a color change. Continuous sources (picker drag, typed hex)
/// are debounced and stay quiet; discrete ones (palette click) commit at once
/// and report the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    Continuous,
    Discrete,
}

impl ChangeSource {
    pub fn notifies(self) -> bool {
        self == ChangeSource::Discrete
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPurpose {
    Recolor,
    /// Back to the original color; the override was already removed locally
    Reset,
}

/// A color waiting to be committed, bound to the scope and group that were
/// active when the user produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingChange {
    pub scope: ScopeKey,
    pub target: Option<GroupTarget>,
    pub color: HexColor,
}

/// Travels with an issued update and comes back with its response.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitTicket {
    pub seq: u64,
    pub scope: ScopeKey,
    pub target: GroupTarget,
    pub color: HexColor,
    pub notify: bool,
    pub purpose: CommitPurpose,
}

/// Debounces continuous color input and numbers the commits it lets through.
/// Each pipeline owns its timer, so independent pipelines never interfere.
#[derive(Debug, Clone)]
pub struct CommitPipeline {
    debouncer: Debouncer<PendingChange>,
    next_seq: u64,
}

impl CommitPipeline {
    pub fn new(window: Duration) -> Self {
        Self {
            debouncer: Debouncer::new(window),
            next_seq: 1,
        }
    }

    pub fn set_window(&mut self, window: Duration) {
        self.debouncer.set_window(window);
    }

    /// Routes a change by its source. Continuous changes restart the quiet
    /// window and return `None`; discrete changes cancel whatever was pending
    /// and come straight back to be committed.
    pub fn request(
        &mut self,
        change: PendingChange,
        source: ChangeSource,
        now: f64,
    ) -> Option<PendingChange> {
        match source {
            ChangeSource::Continuous => {
                if self.debouncer.schedule(change, now) {
                    log::trace!("Color change superseded a pending one");
                }
                None
            }
            ChangeSource::Discrete => {
                self.cancel();
                Some(change)
            }
        }
    }

    /// Returns the pending change once its quiet window has passed.
    pub fn poll(&mut self, now: f64) -> Option<PendingChange> {
        self.debouncer.poll(now)
    }

    pub fn cancel(&mut self) -> Option<PendingChange> {
        let dropped = self.debouncer.cancel();
        if let Some(change) = &dropped {
            log::debug!("Dropping pending color {} for {}", change.color, change.scope.name);
        }
        dropped
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn time_remaining(&self, now: f64) -> Option<Duration> {
        self.debouncer.time_remaining(now)
    }

    pub fn issue(
        &mut self,
        scope: ScopeKey,
        target: GroupTarget,
        color: HexColor,
        notify: bool,
        purpose: CommitPurpose,
    ) -> CommitTicket {
        let seq = self.next_seq;
        self.next_seq += 1;
        CommitTicket {
            seq,
            scope,
            target,
            color,
            notify,
            purpose,
        }
    }
}

/// Builds the backend update for recoloring `target` of `item`.
///
/// Flags and single-color icons are always recolored whole. Icons need a
/// target. Colorful icons cannot be recolored, only turned grey and back.
pub fn build_update(
    item: &ItemRef,
    target: &GroupTarget,
    color: HexColor,
    mode: ThemeMode,
    shape: FlagShape,
) -> Option<BackendRequest> {
    let file_name = AssetPaths::file_name(item, shape);
    match item.kind {
        AssetKind::Flag => Some(BackendRequest::UpdateColor(UpdateColorBody {
            icon_name: file_name,
            group_id: GroupTarget::WholeAsset.wire_id(item.kind).to_owned(),
            color,
            kind: item.kind.wire_type().to_owned(),
            folder: None,
            mode: mode.as_str().to_owned(),
        })),
        AssetKind::SingleColorIcon => Some(BackendRequest::SingleColorUpdate(SingleColorBody {
            icon_name: file_name,
            color,
            mode: mode.as_str().to_owned(),
        })),
        AssetKind::Icon => Some(BackendRequest::UpdateColor(UpdateColorBody {
            icon_name: file_name,
            group_id: target.wire_id(item.kind).to_owned(),
            color,
            kind: item.kind.wire_type().to_owned(),
            folder: Some(item.folder.as_str().to_owned()),
            mode: mode.as_str().to_owned(),
        })),
        AssetKind::ColorfulIcon => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Folder, ORIGINAL_BLUE};

    fn change(color: HexColor) -> PendingChange {
        let item = ItemRef::new("gear", AssetKind::Icon, Folder::Root);
        PendingChange {
            scope: ScopeKey::of(&item),
            target: Some(GroupTarget::named("Color")),
            color,
        }
    }

    #[test]
    fn test_discrete_change_cancels_pending_drag() {
        let mut pipeline = CommitPipeline::new(Duration::from_millis(500));
        assert!(pipeline.request(change(HexColor::from_rgb(1, 2, 3)), ChangeSource::Continuous, 0.0).is_none());
        assert!(pipeline.is_pending());

        let now = pipeline.request(change(ORIGINAL_BLUE), ChangeSource::Discrete, 0.1);
        assert_eq!(now.map(|c| c.color), Some(ORIGINAL_BLUE));
        assert!(!pipeline.is_pending());
        assert!(pipeline.poll(5.0).is_none());
    }

    #[test]
    fn test_flag_updates_use_whole_flag_sentinel() {
        let flag = ItemRef::new("France", AssetKind::Flag, Folder::Root);
        let request = build_update(
            &flag,
            &GroupTarget::WholeAsset,
            ORIGINAL_BLUE,
            ThemeMode::Light,
            FlagShape::Circle,
        );
        match request {
            Some(BackendRequest::UpdateColor(body)) => {
                assert_eq!(body.group_id, "entire_flag");
                assert_eq!(body.icon_name, "France_circle.svg");
                assert_eq!(body.kind, "flags");
            }
            other => panic!("unexpected request: {other:?}"),
        }
    }

    #[test]
    fn test_colorful_icons_cannot_be_recolored() {
        let item = ItemRef::new("sun", AssetKind::ColorfulIcon, Folder::Root);
        assert!(build_update(&item, &GroupTarget::WholeAsset, ORIGINAL_BLUE, ThemeMode::Light, FlagShape::Rectangle).is_none());
    }
}
