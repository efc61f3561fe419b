use icon_manager::backend::{BackendReply, BackendRequest, Completion, JobTag, Work};
use icon_manager::config::Settings;
use icon_manager::model::{AssetKind, FlagShape, Folder, GroupName, GroupTarget, ItemRef, ORIGINAL_BLUE};
use icon_manager::pipeline::ChangeSource;
use icon_manager::selection::ScopeKey;
use icon_manager::state::EditorContext;

fn icon(name: &str, folder: &str) -> ItemRef {
    ItemRef::new(name, AssetKind::Icon, Folder::new(folder))
}

// Context with `item` open and a recolor of its "Color" group debouncing
fn with_pending_color(item: ItemRef) -> EditorContext {
    let mut context = EditorContext::new(&Settings::default());
    context.select_item(item);
    context.select_group(GroupTarget::named("Grey"));
    context.select_group(GroupTarget::named("Color"));
    context.request_color_change(ORIGINAL_BLUE, ChangeSource::Continuous, 1.0);
    context.take_work();
    assert!(!context.colors().is_empty());
    assert!(context.is_commit_pending());
    context
}

fn assert_item_state_cleared(context: &EditorContext) {
    assert!(context.colors().is_empty());
    assert_eq!(context.colors().preview_color(), None);
    assert_eq!(context.colors().active_group(), None);
    assert!(context.applied_overrides().is_empty());
    assert!(!context.is_commit_pending());
}

fn asset_urls(work: &[Work]) -> Vec<String> {
    work.iter()
        .filter_map(|work| match work {
            Work::Single(job) => match &job.request {
                BackendRequest::FetchAsset { url } => Some(url.clone()),
                _ => None,
            },
            Work::Batch(_) => None,
        })
        .collect()
}

#[test]
fn test_selecting_another_item_clears_state() {
    let mut context = with_pending_color(icon("gear", "System"));
    context.select_item(icon("cloud", "Weather"));
    assert_item_state_cleared(&context);

    // The debounced color never lands on the new item
    context.tick(10.0);
    assert!(context.colors().is_empty());
}

#[test]
fn test_switching_tab_clears_state() {
    let mut context = with_pending_color(icon("gear", "System"));
    context.change_scope(AssetKind::Flag);
    assert_item_state_cleared(&context);
    assert_eq!(context.scope().active(), None);
    assert_eq!(context.scope().folder(), None);
    assert_eq!(context.scope().preview_url(), None);
}

#[test]
fn test_opening_folder_clears_state() {
    let mut context = with_pending_color(icon("gear", "System"));
    context.open_folder(Some(Folder::new("Weather")));
    assert_item_state_cleared(&context);
    assert_eq!(context.scope().active(), None);
}

#[test]
fn test_leaving_multi_select_clears_selection() {
    let mut context = EditorContext::new(&Settings::default());
    context.set_multi_select(true);
    context.select_item(icon("gear", "System"));
    context.select_item(icon("cloud", "Weather"));
    assert_eq!(context.scope().current_selection().len(), 2);

    context.set_multi_select(false);
    assert!(context.scope().selections().is_all_empty());
    assert_item_state_cleared(&context);
}

#[test]
fn test_entering_multi_select_closes_active_item() {
    let mut context = with_pending_color(icon("gear", "System"));
    context.set_multi_select(true);
    assert_eq!(context.scope().active(), None);
    assert_item_state_cleared(&context);
}

#[test]
fn test_switching_tab_clears_selections() {
    let mut context = EditorContext::new(&Settings::default());
    context.set_multi_select(true);
    context.select_item(icon("gear", "System"));
    context.change_scope(AssetKind::SingleColorIcon);
    assert!(context.scope().selections().is_all_empty());
}

#[test]
fn test_stale_group_list_is_discarded() {
    let gear = icon("gear", "System");
    let cloud = icon("cloud", "Weather");
    let mut context = EditorContext::new(&Settings::default());
    context.select_item(gear.clone());
    context.select_item(cloud.clone());
    context.take_work();

    context.apply(
        Completion::Single {
            tag: JobTag::Groups(ScopeKey::of(&gear)),
            result: Ok(BackendReply::Groups(vec![GroupName::new("Grey")])),
        },
        1.0,
    );
    assert!(context.scope().groups().is_empty());

    context.apply(
        Completion::Single {
            tag: JobTag::Groups(ScopeKey::of(&cloud)),
            result: Ok(BackendReply::Groups(vec![GroupName::new("Color")])),
        },
        1.1,
    );
    assert_eq!(context.scope().groups(), &[GroupName::new("Color")]);
}

#[test]
fn test_same_name_in_another_folder_is_another_scope() {
    let system = icon("gear", "System");
    let tools = icon("gear", "Tools");
    let mut context = EditorContext::new(&Settings::default());
    context.select_item(system.clone());
    context.select_item(tools);
    context.take_work();

    context.apply(
        Completion::Single {
            tag: JobTag::Groups(ScopeKey::of(&system)),
            result: Ok(BackendReply::Groups(vec![GroupName::new("Grey")])),
        },
        1.0,
    );
    assert!(context.scope().groups().is_empty());
}

#[test]
fn test_preview_urls_are_cache_busted() {
    let gear = icon("gear", "System");
    let mut context = EditorContext::new(&Settings::default());
    context.select_item(gear.clone());
    let first = asset_urls(&context.take_work());
    context.select_item(gear);
    let second = asset_urls(&context.take_work());

    assert_eq!(first.len(), 1);
    assert_eq!(second.len(), 1);
    assert!(first[0].starts_with("http://localhost:8000/static-icons-light/System/gear.svg?t="));
    assert_ne!(first[0], second[0]);
    assert_eq!(context.scope().preview_url(), Some(second[0].as_str()));
}

#[test]
fn test_late_asset_for_old_preview_is_ignored() {
    let mut context = EditorContext::new(&Settings::default());
    context.select_item(icon("gear", "System"));
    let old = asset_urls(&context.take_work()).remove(0);
    context.select_item(icon("cloud", "Weather"));
    context.take_work();

    context.apply(
        Completion::Single {
            tag: JobTag::Asset { url: old.clone() },
            result: Ok(BackendReply::Bytes(vec![1, 2, 3])),
        },
        1.0,
    );
    assert!(context.take_effects().is_empty());
}

#[test]
fn test_flag_selection_targets_whole_asset() {
    let mut context = EditorContext::new(&Settings::default());
    context.change_scope(AssetKind::Flag);
    context.select_item(ItemRef::new("France", AssetKind::Flag, Folder::Root));

    assert_eq!(context.colors().active_group(), Some(&GroupTarget::WholeAsset));
    assert_eq!(context.scope().flag_shape(), FlagShape::Rectangle);
    let urls = asset_urls(&context.take_work());
    assert!(urls[0].contains("/flags/"));
}
