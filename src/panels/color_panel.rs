use egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::IconManagerApp;
use crate::bulk::BulkOperation;
use crate::components::Swatch;
use crate::export::ExportFormat;
use crate::model::{AssetKind, GroupName, GroupTarget, HexColor, PALETTE};
use crate::pipeline::ChangeSource;
use crate::state::CommitStatus;
use crate::util::time::current_time_secs;

/// Groups offered for bulk icon recolors, which target fixed names
const BULK_GROUPS: [&str; 2] = ["Grey", "Color"];

pub fn color_panel(app: &mut IconManagerApp, ctx: &egui::Context) {
    egui::SidePanel::right("color_panel")
        .resizable(true)
        .default_width(260.0)
        .show(ctx, |ui| {
            if app.context.scope().multi_select() {
                bulk_controls(app, ui);
            } else if app.context.scope().active().is_some() {
                item_controls(app, ui);
            } else {
                ui.heading("Color");
                ui.weak("Select an item to recolor it");
            }
        });
}

fn item_controls(app: &mut IconManagerApp, ui: &mut egui::Ui) {
    let Some(item) = app.context.scope().active().cloned() else {
        return;
    };
    ui.heading(&item.name);
    if item.kind.has_folders() {
        ui.weak(item.folder.as_str());
    }
    ui.separator();

    match item.kind {
        AssetKind::Icon => group_list(app, ui),
        AssetKind::ColorfulIcon => {
            let greyscale = app.context.scope().is_greyscale();
            ui.horizontal(|ui| {
                if ui.add_enabled(!greyscale, egui::Button::new("Convert to greyscale")).clicked() {
                    app.context.convert_to_greyscale();
                }
                if ui.add_enabled(greyscale, egui::Button::new("Revert to color")).clicked() {
                    app.context.revert_to_color();
                }
            });
        }
        AssetKind::SingleColorIcon | AssetKind::Flag => {}
    }

    if item.kind != AssetKind::ColorfulIcon {
        ui.separator();
        color_inputs(app, ui);
        if ui.button("Reset to original").clicked() {
            app.context.reset_color();
        }
    }

    ui.separator();
    ui.strong("Export");
    ui.horizontal_wrapped(|ui| {
        if ui.button("Download SVG").clicked() {
            app.context.export_current(ExportFormat::Svg);
        }
        if ui.button("Download PNG").clicked() {
            app.context.export_current(ExportFormat::Png);
        }
        if ui.button("Copy SVG").clicked() {
            app.context.copy_svg();
        }
        if ui.button("Copy image").clicked() {
            app.context.copy_image();
        }
    });
}

fn group_list(app: &mut IconManagerApp, ui: &mut egui::Ui) {
    ui.strong("Groups");
    let groups = app.context.scope().groups().to_vec();
    if groups.is_empty() {
        ui.weak("No groups");
        return;
    }
    let active = app.context.colors().active_group().cloned();
    let overrides = app.context.applied_overrides();

    for group in groups {
        let target = GroupTarget::Named(group.clone());
        ui.horizontal(|ui| {
            if let Some(color) = overrides.get(&target) {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 2.0, color.to_color32());
            }
            let selected = active.as_ref() == Some(&target);
            if ui.selectable_label(selected, group.as_str()).clicked() && !selected {
                app.context.select_group(target.clone());
            }
            match app.context.colors().get(&target).map(|entry| entry.status) {
                Some(CommitStatus::Pending) => {
                    ui.spinner();
                }
                Some(CommitStatus::Failed) => {
                    ui.colored_label(egui::Color32::from_rgb(218, 54, 51), "failed");
                }
                Some(CommitStatus::Confirmed) | None => {}
            }
        });
    }
}

/// Picker and hex field (continuous) plus palette swatches (discrete).
fn color_inputs(app: &mut IconManagerApp, ui: &mut egui::Ui) {
    let now = current_time_secs();
    let current = app
        .context
        .colors()
        .preview_color()
        .unwrap_or_else(|| app.context.colors().current_color());

    ui.horizontal(|ui| {
        let mut picked = current.to_color32();
        if color_edit_button_srgba(ui, &mut picked, Alpha::Opaque).changed() {
            let color = HexColor::from_color32(picked);
            app.ui.hex_input = color.to_string();
            app.context.request_color_change(color, ChangeSource::Continuous, now);
        }

        let response = ui.add(
            egui::TextEdit::singleline(&mut app.ui.hex_input)
                .desired_width(80.0)
                .hint_text(current.to_string()),
        );
        if response.changed() {
            if let Some(color) = HexColor::parse(&app.ui.hex_input) {
                app.context.request_color_change(color, ChangeSource::Continuous, now);
            }
        }
    });

    ui.horizontal_wrapped(|ui| {
        for (label, color) in PALETTE {
            if Swatch::new(color, label, color == current).show(ui).clicked() {
                app.ui.hex_input = color.to_string();
                app.context.request_color_change(color, ChangeSource::Discrete, now);
            }
        }
    });
}

fn bulk_controls(app: &mut IconManagerApp, ui: &mut egui::Ui) {
    let tab = app.context.scope().tab();
    let count = app.context.scope().current_selection().len();
    ui.heading(format!("{count} {} selected", tab.noun()));
    ui.separator();

    let color = app.context.colors().current_color();
    match tab {
        AssetKind::Icon => {
            ui.horizontal(|ui| {
                ui.label("Group");
                for name in BULK_GROUPS {
                    let group = GroupName::new(name);
                    let selected = app.ui.bulk_group == group;
                    if ui.selectable_label(selected, name).clicked() {
                        app.ui.bulk_group = group;
                    }
                }
            });
            color_inputs(app, ui);
            let color = app.context.colors().current_color();
            if ui.button(format!("Apply {color} to {count}")).clicked() {
                let group = app.ui.bulk_group.clone();
                app.context.apply_to_selected(BulkOperation::RecolorGroup { group, color });
            }
            if ui.button("Reset to original").clicked() {
                app.context.apply_to_selected(BulkOperation::ResetToOriginal);
            }
        }
        AssetKind::SingleColorIcon => {
            color_inputs(app, ui);
            if ui.button(format!("Apply {color} to {count}")).clicked() {
                app.context.apply_to_selected(BulkOperation::RecolorWhole { color });
            }
            if ui.button("Reset to original").clicked() {
                app.context.apply_to_selected(BulkOperation::ResetToOriginal);
            }
        }
        AssetKind::Flag => {
            color_inputs(app, ui);
            if ui.button(format!("Apply {color} to {count}")).clicked() {
                app.context.apply_to_selected(BulkOperation::RecolorWhole { color });
            }
        }
        AssetKind::ColorfulIcon => {
            if ui.button("Convert to greyscale").clicked() {
                app.context.apply_to_selected(BulkOperation::ConvertGreyscale);
            }
            if ui.button("Revert to color").clicked() {
                app.context.apply_to_selected(BulkOperation::RevertColor);
            }
        }
    }

    ui.separator();
    ui.strong("Export selection");
    ui.horizontal_wrapped(|ui| {
        for format in [ExportFormat::Svg, ExportFormat::Png] {
            if ui.button(format!("{}s", format.label())).clicked() {
                app.context.export_selected(format);
            }
            if ui.button(format!("ZIP ({})", format.label())).clicked() {
                app.context.export_selected_zip(format);
            }
        }
    });
}
