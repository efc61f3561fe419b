use std::sync::Arc;

use futures::executor::block_on;
use parking_lot::Mutex;

use icon_manager::BackendError;
use icon_manager::backend::{
    BackendReply, BackendRequest, BackendResult, Completion, Transport, TransportFuture, Work,
    boxed,
};
use icon_manager::bulk::{self, BulkOperation, BulkPlan};
use icon_manager::config::Settings;
use icon_manager::model::{
    AssetKind, FlagShape, Folder, GREY_LIGHT, GroupName, HexColor, ItemRef, ORIGINAL_BLUE,
    ThemeMode,
};
use icon_manager::notify::ToastLevel;
use icon_manager::pipeline::ChangeSource;
use icon_manager::selection::SelectionSet;
use icon_manager::state::EditorContext;

/// Records every request and rejects those naming `fail_on`.
#[derive(Clone, Default)]
struct MockTransport {
    sent: Arc<Mutex<Vec<BackendRequest>>>,
    fail_on: Option<String>,
}

impl MockTransport {
    fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_owned()),
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<BackendRequest> {
        self.sent.lock().clone()
    }
}

fn icon_name(request: &BackendRequest) -> String {
    match request {
        BackendRequest::UpdateColor(body) => body.icon_name.clone(),
        BackendRequest::SingleColorUpdate(body) => body.icon_name.clone(),
        BackendRequest::SingleColorRevert(body) => body.icon_name.clone(),
        BackendRequest::Greyscale(body) | BackendRequest::Revert(body) => body.icon_name.clone(),
        other => other.describe(),
    }
}

impl Transport for MockTransport {
    fn send(&self, request: BackendRequest) -> TransportFuture<BackendResult<BackendReply>> {
        let name = icon_name(&request);
        self.sent.lock().push(request);
        let fail = self.fail_on.as_deref().is_some_and(|fail| name.starts_with(fail));
        boxed(async move {
            if fail {
                Err(BackendError::Rejected(format!("500: cannot recolor {name}")))
            } else {
                Ok(BackendReply::Status("success".to_owned()))
            }
        })
    }
}

// Selection of icons spread over several folders
fn mixed_selection() -> SelectionSet {
    let mut selection = SelectionSet::new();
    selection.toggle("gear", Folder::new("System"));
    selection.toggle("cloud", Folder::new("Weather"));
    selection.toggle("home", Folder::new("Navigation"));
    selection
}

fn recolor_plan(selection: &SelectionSet) -> BulkPlan {
    bulk::plan(
        BulkOperation::RecolorGroup {
            group: GroupName::new("Color"),
            color: ORIGINAL_BLUE,
        },
        AssetKind::Icon,
        selection,
        ThemeMode::Light,
        FlagShape::Rectangle,
    )
    .unwrap()
}

// Multi-select context on the icon tab with `items` selected
fn selecting(items: &[(&str, &str)]) -> EditorContext {
    let mut context = EditorContext::new(&Settings::default());
    context.set_multi_select(true);
    for (name, folder) in items {
        context.select_item(ItemRef::new(*name, AssetKind::Icon, Folder::new(*folder)));
    }
    context.take_work();
    context
}

fn only_batch(work: Vec<Work>) -> BulkPlan {
    let mut batches: Vec<BulkPlan> = work
        .into_iter()
        .filter_map(|work| match work {
            Work::Batch(plan) => Some(plan),
            Work::Single(_) => None,
        })
        .collect();
    assert_eq!(batches.len(), 1);
    batches.remove(0)
}

#[test]
fn test_fan_out_sends_one_request_per_item_with_its_folder() {
    let selection = mixed_selection();
    let transport = MockTransport::default();

    let report = block_on(bulk::fan_out(&transport, recolor_plan(&selection)).join());

    let sent = transport.sent();
    assert_eq!(sent.len(), 3);
    assert_eq!(report.request_count, 3);
    assert_eq!(report.item_count, 3);
    assert!(report.is_success());

    let expected = [("gear.svg", "System"), ("cloud.svg", "Weather"), ("home.svg", "Navigation")];
    for (request, (name, folder)) in sent.iter().zip(expected) {
        match request {
            BackendRequest::UpdateColor(body) => {
                assert_eq!(body.icon_name, name);
                assert_eq!(body.folder.as_deref(), Some(folder));
                assert_eq!(body.group_id, "Color");
                assert_eq!(body.color, ORIGINAL_BLUE);
            }
            other => panic!("unexpected request {other:?}"),
        }
    }
}

#[test]
fn test_icon_reset_sends_both_fixed_groups() {
    let selection = mixed_selection();
    let plan = bulk::plan(
        BulkOperation::ResetToOriginal,
        AssetKind::Icon,
        &selection,
        ThemeMode::Light,
        FlagShape::Rectangle,
    )
    .unwrap();

    assert_eq!(plan.requests.len(), 6);
    let groups: Vec<(String, HexColor)> = plan
        .requests
        .iter()
        .filter_map(|request| match request {
            BackendRequest::UpdateColor(body) => Some((body.group_id.clone(), body.color)),
            _ => None,
        })
        .collect();
    assert_eq!(groups[0], ("Grey".to_owned(), GREY_LIGHT));
    assert_eq!(groups[1], ("Color".to_owned(), ORIGINAL_BLUE));
}

#[test]
fn test_single_color_bulk_uses_dedicated_routes() {
    let mut selection = SelectionSet::new();
    selection.toggle("arrow", Folder::Root);
    selection.toggle("check", Folder::Root);

    let recolor = bulk::plan(
        BulkOperation::RecolorWhole { color: ORIGINAL_BLUE },
        AssetKind::SingleColorIcon,
        &selection,
        ThemeMode::Dark,
        FlagShape::Rectangle,
    )
    .unwrap();
    assert!(recolor
        .requests
        .iter()
        .all(|request| matches!(request, BackendRequest::SingleColorUpdate(_))));

    let reset = bulk::plan(
        BulkOperation::ResetToOriginal,
        AssetKind::SingleColorIcon,
        &selection,
        ThemeMode::Dark,
        FlagShape::Rectangle,
    )
    .unwrap();
    assert_eq!(reset.requests.len(), 2);
    assert!(reset
        .requests
        .iter()
        .all(|request| matches!(request, BackendRequest::SingleColorRevert(_))));
}

#[test]
fn test_flags_recolor_whole_with_sentinel() {
    let mut selection = SelectionSet::new();
    selection.toggle("France", Folder::Root);
    let plan = bulk::plan(
        BulkOperation::RecolorWhole { color: GREY_LIGHT },
        AssetKind::Flag,
        &selection,
        ThemeMode::Light,
        FlagShape::Circle,
    )
    .unwrap();

    match &plan.requests[0] {
        BackendRequest::UpdateColor(body) => {
            assert_eq!(body.group_id, "entire_flag");
            assert_eq!(body.folder, None);
        }
        other => panic!("unexpected request {other:?}"),
    }
}

#[test]
fn test_unsupported_or_empty_plans_are_refused() {
    let selection = mixed_selection();
    let greyscale_icons = bulk::plan(
        BulkOperation::ConvertGreyscale,
        AssetKind::Icon,
        &selection,
        ThemeMode::Light,
        FlagShape::Rectangle,
    );
    assert!(greyscale_icons.is_none());

    let empty = bulk::plan(
        BulkOperation::RevertColor,
        AssetKind::ColorfulIcon,
        &SelectionSet::new(),
        ThemeMode::Light,
        FlagShape::Rectangle,
    );
    assert!(empty.is_none());
}

#[test]
fn test_partial_failure_reports_once_and_refreshes_selection() {
    let mut context = selecting(&[("gear", "System"), ("cloud", "Weather"), ("home", "Navigation")]);
    let revision = context.scope().current_selection().revision();

    assert!(context.apply_to_selected(BulkOperation::RecolorGroup {
        group: GroupName::new("Color"),
        color: ORIGINAL_BLUE,
    }));
    let plan = only_batch(context.take_work());
    assert!(context.is_busy());

    let transport = MockTransport::failing_on("cloud");
    let report = block_on(bulk::fan_out(&transport, plan).join());
    assert_eq!(report.failures, 1);
    // Successes are not rolled back
    assert_eq!(transport.sent().len(), 3);

    context.apply(Completion::Batch(report), 2.0);

    assert_eq!(context.toasts().len(), 1);
    let toast = context.toasts().last().unwrap();
    assert_eq!(toast.level, ToastLevel::Error);
    assert_eq!(toast.message, "Failed to apply color to some icons");
    assert!(context.scope().current_selection().revision() > revision);
    assert_eq!(context.scope().current_selection().len(), 3);
}

#[test]
fn test_successful_batch_reports_count() {
    let mut context = selecting(&[("gear", "System"), ("home", "Navigation")]);
    context.apply_to_selected(BulkOperation::ResetToOriginal);
    let plan = only_batch(context.take_work());

    let report = block_on(bulk::fan_out(&MockTransport::default(), plan).join());
    assert_eq!(report.request_count, 4);
    context.apply(Completion::Batch(report), 1.0);

    let toast = context.toasts().last().unwrap();
    assert_eq!(toast.level, ToastLevel::Success);
    assert_eq!(toast.message, "Reset 2 icons to original colors!");
}

#[test]
fn test_empty_selection_is_reported() {
    let mut context = selecting(&[]);
    assert!(!context.apply_to_selected(BulkOperation::ResetToOriginal));
    assert!(context.take_work().is_empty());
    assert_eq!(context.toasts().last().unwrap().message, "No items selected");
}

#[test]
fn test_palette_click_applies_to_single_color_selection() {
    let mut context = EditorContext::new(&Settings::default());
    context.change_scope(AssetKind::SingleColorIcon);
    context.set_multi_select(true);
    context.select_item(ItemRef::new("arrow", AssetKind::SingleColorIcon, Folder::Root));
    context.select_item(ItemRef::new("check", AssetKind::SingleColorIcon, Folder::Root));
    context.take_work();

    // Dragging only previews
    context.request_color_change(GREY_LIGHT, ChangeSource::Continuous, 1.0);
    context.tick(5.0);
    assert!(context.take_work().is_empty());

    context.request_color_change(ORIGINAL_BLUE, ChangeSource::Discrete, 6.0);
    let plan = only_batch(context.take_work());
    assert_eq!(plan.operation, BulkOperation::RecolorWhole { color: ORIGINAL_BLUE });
    assert_eq!(plan.requests.len(), 2);
}
