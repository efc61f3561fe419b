//! The editing session: which asset is open, which colors it carries, and
//! everything waiting on the backend.
//!
//! `EditorContext` composes the scope tracker, the group color store, the
//! commit pipeline and the bulk coordinator behind one set of operations. It
//! never performs I/O. Requests are queued as [`Work`] and collected with
//! [`EditorContext::take_work`]; their outcomes come back through
//! [`EditorContext::apply`]. Side effects only the UI can perform (decoding a
//! preview, writing a file, using the clipboard) are handed out as
//! [`UiEffect`]s.
//!
//! # Consistent clearing
//!
//! Every scope change (another item, another tab, another folder, leaving
//! multi-select) cancels the pending debounced commit and clears the group
//! colors in the same call, so no override is ever attributed to the wrong
//! item.
//!
//! # Example
//!
//! ```rust,no_run
//! use icon_manager::config::Settings;
//! use icon_manager::model::{AssetKind, Folder, GroupTarget, ItemRef};
//! use icon_manager::state::EditorContext;
//!
//! let mut context = EditorContext::new(&Settings::default());
//! context.select_item(ItemRef::new("gear", AssetKind::Icon, Folder::new("System")));
//! context.select_group(GroupTarget::named("Grey"));
//!
//! // Hand the queued requests to an executor
//! let work = context.take_work();
//! assert!(!work.is_empty());
//! ```

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use uuid::Uuid;

use super::group_colors::GroupColorStore;
use crate::assets::{AssetPaths, CacheBuster};
use crate::backend::wire::{ColorfulBody, SingleColorRevertBody};
use crate::backend::{
    BackendReply, BackendRequest, BackendResult, Completion, ExportAction, ExportTag, Job, JobTag,
    Work,
};
use crate::bulk::{self, BulkOperation, BulkPlan, BulkReport};
use crate::catalog::Catalog;
use crate::config::Settings;
use crate::error::BackendError;
use crate::export::{self, ExportFormat};
use crate::model::{
    AssetKind, FlagShape, Folder, GREY_LIGHT, GroupTarget, HexColor, ItemRef, ThemeMode,
};
use crate::notify::{Toast, Toasts};
use crate::pipeline::{
    ChangeSource, CommitPipeline, CommitPurpose, CommitTicket, PendingChange, build_update,
};
use crate::selection::{ScopeKey, ScopeTracker};

const GREYSCALE_DONE: &str = "Converted to greyscale";
const COLORS_REVERTED: &str = "Reverted to original colors";
const SINGLE_COLOR_REVERTED: &str = "Reverted to original color";

/// Work only the UI layer can carry out.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEffect {
    /// Bytes of the asset behind the current preview URL
    ShowAsset { url: String, bytes: Vec<u8> },
    /// The preview could not be loaded and should be hidden
    AssetFailed { url: String },
    /// An export to write out; `announce` is false for items of a batch,
    /// which is announced as a whole
    SaveFile {
        file_name: String,
        bytes: Vec<u8>,
        announce: bool,
    },
    CopyText(String),
    /// SVG markup to rasterize onto the clipboard
    CopyImage(String),
}

#[derive(Debug, Clone, Copy)]
struct ExportBatch {
    format: ExportFormat,
    total: usize,
    settled: usize,
    failed: usize,
}

pub struct EditorContext {
    paths: AssetPaths,
    mode: ThemeMode,
    /// Latest time seen, in seconds
    clock: f64,
    scope: ScopeTracker,
    colors: GroupColorStore,
    pipeline: CommitPipeline,
    cache_buster: CacheBuster,
    catalog: Catalog,
    toasts: Toasts,
    outbox: Vec<Work>,
    effects: Vec<UiEffect>,
    export_batches: HashMap<Uuid, ExportBatch>,
    in_flight: usize,
}

impl EditorContext {
    pub fn new(settings: &Settings) -> Self {
        Self {
            paths: AssetPaths::new(settings.backend_url.as_str()),
            mode: settings.mode(),
            clock: 0.0,
            scope: ScopeTracker::new(AssetKind::Icon),
            colors: GroupColorStore::new(),
            pipeline: CommitPipeline::new(settings.debounce_window()),
            cache_buster: CacheBuster::new(),
            catalog: Catalog::new(),
            toasts: Toasts::new(),
            outbox: Vec::new(),
            effects: Vec::new(),
            export_batches: HashMap::new(),
            in_flight: 0,
        }
    }

    pub fn paths(&self) -> &AssetPaths {
        &self.paths
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn scope(&self) -> &ScopeTracker {
        &self.scope
    }

    pub fn colors(&self) -> &GroupColorStore {
        &self.colors
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn toasts(&self) -> &Toasts {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut Toasts {
        &mut self.toasts
    }

    pub fn now(&self) -> f64 {
        self.clock
    }

    /// Whether any request is still outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    pub fn is_commit_pending(&self) -> bool {
        self.pipeline.is_pending()
    }

    pub fn set_debounce_window(&mut self, window: Duration) {
        self.pipeline.set_window(window);
    }

    /// Overrides currently visible on the active item
    pub fn applied_overrides(&self) -> BTreeMap<GroupTarget, HexColor> {
        self.colors.applied_overrides()
    }

    pub fn take_work(&mut self) -> Vec<Work> {
        std::mem::take(&mut self.outbox)
    }

    pub fn take_effects(&mut self) -> Vec<UiEffect> {
        std::mem::take(&mut self.effects)
    }

    /// Notifications raised since the last call, oldest first
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain()
    }

    /// Requests every listing. Failures leave the catalog empty.
    pub fn load_catalog(&mut self) {
        for kind in AssetKind::ALL {
            self.submit(JobTag::Catalog(kind), BackendRequest::Catalog(kind));
        }
    }

    /// Opens `item`, or toggles it in multi-select mode.
    ///
    /// Opening drops every color of the previous item, shows the item's
    /// preview and, for icons, asks for its group list.
    pub fn select_item(&mut self, item: ItemRef) {
        if self.scope.multi_select() {
            self.toggle_selection(item);
            return;
        }

        self.reset_item_state();
        if item.kind == AssetKind::Flag {
            self.pick_available_shape(&item.name);
        }
        let kind = item.kind;
        log::debug!("Selected {} {} in {}", kind.noun(), item.name, item.folder);
        self.scope.activate(item.clone());

        if matches!(kind, AssetKind::Flag | AssetKind::SingleColorIcon) {
            self.colors.select_group(GroupTarget::WholeAsset, self.mode);
        }
        self.refresh_preview();

        if kind == AssetKind::Icon {
            let request = BackendRequest::ListGroups {
                folder: item.folder.clone(),
                file_name: AssetPaths::file_name(&item, FlagShape::default()),
            };
            self.submit(JobTag::Groups(ScopeKey::of(&item)), request);
        }
    }

    /// Adds or removes `item` from the current selection. Single-color icons
    /// preview the first item still selected.
    pub fn toggle_selection(&mut self, item: ItemRef) -> bool {
        let selected = self.scope.toggle(&item);
        if self.scope.multi_select() && item.kind == AssetKind::SingleColorIcon {
            self.refresh_selection_preview();
        }
        selected
    }

    pub fn change_scope(&mut self, tab: AssetKind) {
        self.reset_item_state();
        self.scope.change_scope(tab);
    }

    pub fn open_folder(&mut self, folder: Option<Folder>) {
        self.reset_item_state();
        self.scope.open_folder(folder);
    }

    /// Entering or leaving multi-select closes the active item; leaving also
    /// empties every selection.
    pub fn set_multi_select(&mut self, on: bool) {
        if self.scope.multi_select() == on {
            return;
        }
        self.reset_item_state();
        self.scope.clear_active();
        self.scope.set_multi_select(on);
    }

    /// Switches the flag variant. Refused when the open country has no flag
    /// in that shape.
    pub fn set_flag_shape(&mut self, shape: FlagShape) -> bool {
        if self.scope.flag_shape() == shape {
            return true;
        }
        let active_flag = self
            .scope
            .active()
            .filter(|item| item.kind == AssetKind::Flag)
            .map(|item| item.name.clone());

        if let Some(country) = &active_flag {
            if !self.catalog.has_flag_shape(country, shape) {
                log::warn!("{country} has no {shape:?} flag");
                return false;
            }
        }
        self.scope.set_flag_shape(shape);
        if active_flag.is_some() {
            self.pipeline.cancel();
            self.refresh_preview();
        }
        true
    }

    /// Switches light/dark assets. Overrides belong to the other mode's files,
    /// so they are dropped with any pending commit.
    pub fn set_mode(&mut self, mode: ThemeMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        self.pipeline.cancel();
        self.colors.clear();
        if self.scope.active().is_some() {
            self.refresh_preview();
        } else if self.scope.multi_select() {
            self.refresh_selection_preview();
        }
    }

    /// Makes `target` the active group. Grey groups get the mode default and
    /// commit it straight away, without a notification.
    pub fn select_group(&mut self, target: GroupTarget) {
        let Some(color) = self.colors.select_group(target.clone(), self.mode) else {
            return;
        };
        if let Some(scope) = self.scope.scope_key() {
            let change = PendingChange {
                scope,
                target: Some(target),
                color,
            };
            self.commit(change, false);
        }
    }

    pub fn set_preview_color(&mut self, color: HexColor) {
        self.colors.set_preview_color(color);
    }

    /// Single entry point for persisting a color.
    ///
    /// The color is previewed at once. Continuous sources are debounced and
    /// committed quietly by [`EditorContext::tick`]; discrete sources commit
    /// immediately and report the outcome. Icons without an active group
    /// only preview.
    pub fn request_color_change(&mut self, color: HexColor, source: ChangeSource, now: f64) {
        self.advance(now);
        self.colors.set_preview_color(color);

        if self.scope.multi_select() {
            if source == ChangeSource::Discrete && self.scope.tab() == AssetKind::SingleColorIcon {
                self.apply_to_selected(BulkOperation::RecolorWhole { color });
            }
            return;
        }

        let Some(item) = self.scope.active() else {
            return;
        };
        let target = match item.kind {
            AssetKind::ColorfulIcon => return,
            AssetKind::Icon => match self.colors.active_group() {
                Some(target) => Some(target.clone()),
                None => return,
            },
            AssetKind::Flag | AssetKind::SingleColorIcon => Some(GroupTarget::WholeAsset),
        };
        let change = PendingChange {
            scope: ScopeKey::of(item),
            target,
            color,
        };
        if let Some(change) = self.pipeline.request(change, source, now) {
            self.commit(change, source.notifies());
        }
    }

    /// Advances time and commits a debounced color whose quiet window has
    /// passed. Returns how long until the next debounce deadline.
    pub fn tick(&mut self, now: f64) -> Option<Duration> {
        self.advance(now);
        if let Some(change) = self.pipeline.poll(now) {
            self.commit(change, false);
        }
        self.pipeline.time_remaining(now)
    }

    /// Puts the active item (or group) back to its original color.
    pub fn reset_color(&mut self) {
        let Some(item) = self.scope.active().cloned() else {
            self.toasts.error("No item selected");
            return;
        };
        self.pipeline.cancel();

        match item.kind {
            AssetKind::Flag => {
                self.colors.clear_group(&GroupTarget::WholeAsset);
                self.colors.set_preview_color(GREY_LIGHT);
                self.send_update(&item, GroupTarget::WholeAsset, GREY_LIGHT, true, CommitPurpose::Reset);
            }
            AssetKind::SingleColorIcon => {
                self.colors.clear_group(&GroupTarget::WholeAsset);
                let body = SingleColorRevertBody {
                    icon_name: AssetPaths::file_name(&item, self.scope.flag_shape()),
                    mode: self.mode.as_str().to_owned(),
                };
                self.submit(
                    JobTag::SingleColorRevert(ScopeKey::of(&item)),
                    BackendRequest::SingleColorRevert(body),
                );
            }
            AssetKind::Icon => {
                let Some(GroupTarget::Named(group)) = self.colors.active_group().cloned() else {
                    self.toasts.error("Select a group to reset");
                    return;
                };
                let original = group.original_color(self.mode);
                let target = GroupTarget::Named(group);
                self.colors.clear_group(&target);
                self.colors.set_preview_color(original);
                self.send_update(&item, target, original, true, CommitPurpose::Reset);
            }
            AssetKind::ColorfulIcon => self.revert_to_color(),
        }
    }

    pub fn convert_to_greyscale(&mut self) {
        self.submit_colorful(true);
    }

    pub fn revert_to_color(&mut self) {
        self.submit_colorful(false);
    }

    fn submit_colorful(&mut self, greyscale: bool) {
        let Some(item) = self
            .scope
            .active()
            .filter(|item| item.kind == AssetKind::ColorfulIcon)
            .cloned()
        else {
            log::warn!("Greyscale and revert only apply to an open colorful icon");
            return;
        };
        let body = ColorfulBody {
            icon_name: item.name.clone(),
            folder: item.folder.as_str().to_owned(),
        };
        let request = if greyscale {
            BackendRequest::Greyscale(body)
        } else {
            BackendRequest::Revert(body)
        };
        self.submit(
            JobTag::Colorful {
                scope: ScopeKey::of(&item),
                greyscale,
            },
            request,
        );
    }

    /// Fans `operation` out over the current selection. Returns whether a
    /// batch was queued.
    pub fn apply_to_selected(&mut self, operation: BulkOperation) -> bool {
        let kind = self.scope.tab();
        let selection = self.scope.current_selection();
        if selection.is_empty() {
            self.toasts.error("No items selected");
            return false;
        }
        match bulk::plan(operation, kind, selection, self.mode, self.scope.flag_shape()) {
            Some(plan) => {
                self.submit_batch(plan);
                true
            }
            None => false,
        }
    }

    pub fn export_current(&mut self, format: ExportFormat) {
        let Some(item) = self.scope.active().cloned() else {
            self.toasts.error("No item selected for download");
            return;
        };
        let (file_name, request) =
            export::single_request(&item, format, self.mode, self.scope.flag_shape());
        self.submit_export(file_name, ExportAction::Save, None, request);
    }

    /// Copies the active item's SVG markup as text.
    pub fn copy_svg(&mut self) {
        self.request_markup(ExportAction::CopySvg);
    }

    /// Copies the active item as a raster image.
    pub fn copy_image(&mut self) {
        self.request_markup(ExportAction::CopyImage);
    }

    fn request_markup(&mut self, action: ExportAction) {
        let Some(item) = self.scope.active().cloned() else {
            self.toasts.error("No image selected for copy");
            return;
        };
        let body = export::export_body(&item, self.mode, self.scope.flag_shape());
        let file_name = body.icon_name.clone();
        self.submit_export(file_name, action, None, BackendRequest::ExportSvgMarkup(body));
    }

    /// One export per selected item, each with the folder recorded for it.
    pub fn export_selected(&mut self, format: ExportFormat) {
        let kind = self.scope.tab();
        let items = self.scope.current_selection().items(kind);
        if items.is_empty() {
            self.toasts.error("No items selected for export");
            return;
        }
        let id = Uuid::new_v4();
        self.export_batches.insert(
            id,
            ExportBatch {
                format,
                total: items.len(),
                settled: 0,
                failed: 0,
            },
        );
        for item in &items {
            let (file_name, request) =
                export::single_request(item, format, self.mode, self.scope.flag_shape());
            self.submit_export(file_name, ExportAction::Save, Some(id), request);
        }
    }

    /// The whole selection as one archive.
    pub fn export_selected_zip(&mut self, format: ExportFormat) {
        let kind = self.scope.tab();
        let browsing = self
            .scope
            .folder()
            .map(|folder| folder.as_str().to_owned())
            .unwrap_or_else(|| Folder::Root.as_str().to_owned());
        let zip = export::zip_request(
            kind,
            self.scope.current_selection(),
            &browsing,
            format,
            self.mode,
        );
        match zip {
            Some((file_name, request)) => {
                self.submit_export(file_name, ExportAction::Save, None, request)
            }
            None => self.toasts.error("No items selected for export"),
        }
    }

    pub fn apply_all(&mut self, completions: impl IntoIterator<Item = Completion>, now: f64) {
        for completion in completions {
            self.apply(completion, now);
        }
    }

    /// Folds one backend outcome into the session. Outcomes for an item that
    /// is no longer open are discarded.
    pub fn apply(&mut self, completion: Completion, now: f64) {
        self.advance(now);
        self.in_flight = self.in_flight.saturating_sub(1);

        match completion {
            Completion::Batch(report) => self.settle_batch(report),
            Completion::Single { tag, result } => match tag {
                JobTag::Groups(key) => self.apply_groups(key, result),
                JobTag::Commit(ticket) => self.apply_commit(ticket, result),
                JobTag::Colorful { scope, greyscale } => self.apply_colorful(scope, greyscale, result),
                JobTag::SingleColorRevert(scope) => self.apply_single_color_revert(scope, result),
                JobTag::Asset { url } => self.apply_asset(url, result),
                JobTag::Catalog(kind) => match result {
                    Ok(BackendReply::Catalog(listing)) => self.catalog.set(kind, listing),
                    Ok(_) => log::error!("Unexpected reply to the {} listing", kind.noun()),
                    Err(err) => log::error!("Failed to load {}: {err}", kind.noun()),
                },
                JobTag::Export(tag) => self.apply_export(tag, result),
            },
        }
    }

    fn apply_groups(&mut self, key: ScopeKey, result: BackendResult<BackendReply>) {
        match result {
            Ok(BackendReply::Groups(groups)) => {
                let count = groups.len();
                if self.scope.accept_groups(&key, groups) {
                    log::debug!("{} has {count} groups", key.name);
                } else {
                    log::debug!("Discarding group list for {}, no longer open", key.name);
                }
            }
            Ok(_) => log::error!("Unexpected reply to the group list of {}", key.name),
            Err(err) => log::error!("Failed to load groups for {}/{}: {err}", key.folder, key.name),
        }
    }

    fn apply_commit(&mut self, ticket: CommitTicket, result: BackendResult<BackendReply>) {
        let current = self.scope.is_current(&ticket.scope);
        match result {
            Ok(_) => {
                if current {
                    if ticket.purpose == CommitPurpose::Recolor {
                        self.colors.confirm(&ticket.target, ticket.color);
                    }
                    self.refresh_preview();
                } else {
                    log::debug!(
                        "Commit #{} for {} landed after it was closed",
                        ticket.seq,
                        ticket.scope.name
                    );
                }
                if ticket.notify {
                    let message = match ticket.purpose {
                        CommitPurpose::Recolor => "Color updated".to_owned(),
                        CommitPurpose::Reset if ticket.target == GroupTarget::WholeAsset => {
                            "Color reset to default".to_owned()
                        }
                        CommitPurpose::Reset => format!("Color reset to original ({})", ticket.color),
                    };
                    self.toasts.success(message);
                }
            }
            Err(err) => {
                log::error!(
                    "Commit #{} of {} to {} [{}] failed: {err}",
                    ticket.seq,
                    ticket.color,
                    ticket.scope.name,
                    ticket.target
                );
                if current && ticket.purpose == CommitPurpose::Recolor {
                    self.colors.mark_failed(&ticket.target, ticket.color);
                }
                if ticket.notify {
                    let message = match ticket.purpose {
                        CommitPurpose::Recolor => "Failed to update color.",
                        CommitPurpose::Reset => "Failed to reset color",
                    };
                    self.toasts.error(message);
                }
            }
        }
    }

    fn apply_colorful(&mut self, scope: ScopeKey, greyscale: bool, result: BackendResult<BackendReply>) {
        let expected = if greyscale { GREYSCALE_DONE } else { COLORS_REVERTED };
        match expect_status(result, expected) {
            Ok(()) => {
                if self.scope.is_current(&scope) {
                    self.scope.set_greyscale(greyscale);
                    self.refresh_preview();
                }
                let message = if greyscale {
                    "Icon converted to greyscale!"
                } else {
                    "Icon reverted to original colors!"
                };
                self.toasts.success(message);
            }
            Err(err) => {
                log::error!("Colorful update of {} failed: {err}", scope.name);
                let message = if greyscale {
                    "Failed to convert to greyscale"
                } else {
                    "Failed to revert to original colors"
                };
                self.toasts.error(message);
            }
        }
    }

    fn apply_single_color_revert(&mut self, scope: ScopeKey, result: BackendResult<BackendReply>) {
        match expect_status(result, SINGLE_COLOR_REVERTED) {
            Ok(()) => {
                if self.scope.is_current(&scope) {
                    self.refresh_preview();
                }
                self.toasts.success("Icon reverted to original color!");
            }
            Err(err) => {
                log::error!("Reverting {} failed: {err}", scope.name);
                self.toasts.error("Failed to revert to original color");
            }
        }
    }

    fn apply_asset(&mut self, url: String, result: BackendResult<BackendReply>) {
        if self.scope.preview_url() != Some(url.as_str()) {
            log::debug!("Discarding asset {url}, preview moved on");
            return;
        }
        match result {
            Ok(BackendReply::Bytes(bytes)) => self.effects.push(UiEffect::ShowAsset { url, bytes }),
            Ok(_) => {
                log::error!("Unexpected reply loading {url}");
                self.effects.push(UiEffect::AssetFailed { url });
            }
            Err(err) => {
                log::error!("Failed to load {url}: {err}");
                self.effects.push(UiEffect::AssetFailed { url });
            }
        }
    }

    fn apply_export(&mut self, tag: ExportTag, result: BackendResult<BackendReply>) {
        let outcome = match (tag.action, result) {
            (ExportAction::Save, Ok(BackendReply::Bytes(bytes))) => {
                self.effects.push(UiEffect::SaveFile {
                    file_name: tag.file_name.clone(),
                    bytes,
                    announce: tag.batch.is_none(),
                });
                Ok(())
            }
            (ExportAction::CopySvg, Ok(BackendReply::SvgMarkup(markup))) => {
                self.effects.push(UiEffect::CopyText(markup));
                Ok(())
            }
            (ExportAction::CopyImage, Ok(BackendReply::SvgMarkup(markup))) => {
                self.effects.push(UiEffect::CopyImage(markup));
                Ok(())
            }
            (_, Ok(_)) => Err(BackendError::UnexpectedReply("export payload")),
            (_, Err(err)) => Err(err),
        };
        if let Err(err) = &outcome {
            log::error!("Export of {} failed: {err}", tag.file_name);
        }

        if let Some(id) = tag.batch {
            self.settle_export(id, outcome.is_ok());
            return;
        }
        match (tag.action, outcome) {
            // Saving is reported by the UI once the file is written
            (ExportAction::Save, Ok(())) => {}
            (ExportAction::Save, Err(_)) => {
                self.toasts.error(export::download_message(&tag.file_name, false))
            }
            (ExportAction::CopySvg, Ok(())) => self.toasts.success("SVG copied to clipboard!"),
            (ExportAction::CopySvg, Err(_)) => self.toasts.error("Failed to copy SVG"),
            // The clipboard write itself is reported by the UI
            (ExportAction::CopyImage, Ok(())) => {}
            (ExportAction::CopyImage, Err(_)) => self.toasts.error("Failed to copy as image"),
        }
    }

    fn settle_export(&mut self, id: Uuid, ok: bool) {
        let Some(batch) = self.export_batches.get_mut(&id) else {
            log::warn!("Export batch {id} is unknown");
            return;
        };
        batch.settled += 1;
        if !ok {
            batch.failed += 1;
        }
        if batch.settled < batch.total {
            return;
        }
        let batch = *batch;
        self.export_batches.remove(&id);
        let label = batch.format.label();
        if batch.failed == 0 {
            self.toasts
                .success(format!("{} {label}s downloaded successfully!", batch.total));
        } else {
            self.toasts.error(format!("Failed to download {label}s"));
        }
    }

    fn settle_batch(&mut self, report: BulkReport) {
        log::info!(
            "Batch {} settled: {}/{} requests failed",
            report.id,
            report.failures,
            report.request_count
        );
        self.scope.selections_mut().get_mut(report.kind).refresh();
        if self.scope.multi_select() && self.scope.tab() == report.kind {
            self.refresh_selection_preview();
        }
        let (level, message) = report.notification();
        self.toasts.push(level, message);
    }

    /// Records `change` as the group's pending override and sends it.
    fn commit(&mut self, change: PendingChange, notify: bool) {
        if !self.scope.is_current(&change.scope) {
            log::debug!("Dropping color for {}, no longer open", change.scope.name);
            return;
        }
        let Some(item) = self.scope.active().cloned() else {
            return;
        };
        let target = match (item.kind, change.target) {
            (AssetKind::Icon, Some(target)) => target,
            (AssetKind::Icon, None) | (AssetKind::ColorfulIcon, _) => return,
            _ => GroupTarget::WholeAsset,
        };
        self.colors.record_committed(target.clone(), change.color);
        self.send_update(&item, target, change.color, notify, CommitPurpose::Recolor);
    }

    fn send_update(
        &mut self,
        item: &ItemRef,
        target: GroupTarget,
        color: HexColor,
        notify: bool,
        purpose: CommitPurpose,
    ) {
        let Some(request) = build_update(item, &target, color, self.mode, self.scope.flag_shape())
        else {
            log::warn!("{} cannot be recolored", item.name);
            return;
        };
        let ticket = self
            .pipeline
            .issue(ScopeKey::of(item), target, color, notify, purpose);
        log::debug!("Commit #{} issued: {}", ticket.seq, request.describe());
        self.submit(JobTag::Commit(ticket), request);
    }

    fn submit(&mut self, tag: JobTag, request: BackendRequest) {
        self.in_flight += 1;
        self.outbox.push(Work::Single(Job { tag, request }));
    }

    fn submit_batch(&mut self, plan: BulkPlan) {
        self.in_flight += 1;
        self.outbox.push(Work::Batch(plan));
    }

    fn submit_export(
        &mut self,
        file_name: String,
        action: ExportAction,
        batch: Option<Uuid>,
        request: BackendRequest,
    ) {
        let tag = ExportTag {
            file_name,
            action,
            batch,
        };
        self.submit(JobTag::Export(tag), request);
    }

    fn reset_item_state(&mut self) {
        self.pipeline.cancel();
        self.colors.clear();
    }

    fn advance(&mut self, now: f64) {
        self.clock = self.clock.max(now);
    }

    fn pick_available_shape(&mut self, country: &str) {
        let shape = self.scope.flag_shape();
        if self.catalog.has_flag_shape(country, shape) {
            return;
        }
        let other = match shape {
            FlagShape::Rectangle => FlagShape::Circle,
            FlagShape::Circle => FlagShape::Rectangle,
        };
        if self.catalog.has_flag_shape(country, other) {
            self.scope.set_flag_shape(other);
        }
    }

    /// Points the preview at a fresh, cache-busted URL for the active item.
    fn refresh_preview(&mut self) {
        let Some(item) = self.scope.active().cloned() else {
            return;
        };
        self.preview(&item);
    }

    /// Previews the first selected item, or nothing once the selection is empty.
    fn refresh_selection_preview(&mut self) {
        let kind = self.scope.tab();
        let selection = self.scope.current_selection();
        let first = selection
            .first()
            .map(|name| ItemRef::new(name, kind, selection.folder_of(name)));
        match first {
            Some(item) => self.preview(&item),
            None => self.scope.set_preview_url(None),
        }
    }

    fn preview(&mut self, item: &ItemRef) {
        let url = self.paths.asset_url(item, self.mode, self.scope.flag_shape());
        let url = self.cache_buster.bust(&url, (self.clock * 1000.0) as u64);
        self.scope.set_preview_url(Some(url.clone()));
        self.submit(JobTag::Asset { url: url.clone() }, BackendRequest::FetchAsset { url });
    }
}

fn expect_status(result: BackendResult<BackendReply>, expected: &str) -> BackendResult<()> {
    match result? {
        BackendReply::Status(status) if status == expected => Ok(()),
        BackendReply::Status(status) => Err(BackendError::UnexpectedStatus {
            expected: expected.to_owned(),
            actual: status,
        }),
        _ => Err(BackendError::UnexpectedReply("status")),
    }
}
