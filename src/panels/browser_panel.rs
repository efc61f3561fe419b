use crate::IconManagerApp;
use crate::model::{AssetKind, FlagShape, ThemeMode};

pub fn browser_panel(app: &mut IconManagerApp, ctx: &egui::Context) {
    egui::SidePanel::left("browser_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Icon Manager");
                if app.context.is_busy() {
                    ui.spinner();
                }
            });

            let mut dark = app.context.mode().is_dark();
            if ui.checkbox(&mut dark, "Dark mode").changed() {
                app.set_mode(ctx, ThemeMode::from_dark(dark));
            }
            ui.separator();

            let tab = app.context.scope().tab();
            ui.horizontal_wrapped(|ui| {
                for kind in AssetKind::ALL {
                    if ui.selectable_label(tab == kind, kind.label()).clicked() && tab != kind {
                        log::info!("Switched to {}", kind.label());
                        app.context.change_scope(kind);
                        app.ui.search.clear();
                    }
                }
            });

            let mut multi = app.context.scope().multi_select();
            if ui.checkbox(&mut multi, "Multi-select").changed() {
                app.context.set_multi_select(multi);
            }

            if tab == AssetKind::Flag {
                let mut shape = app.context.scope().flag_shape();
                ui.horizontal(|ui| {
                    ui.radio_value(&mut shape, FlagShape::Rectangle, "Rectangle");
                    ui.radio_value(&mut shape, FlagShape::Circle, "Circle");
                });
                if shape != app.context.scope().flag_shape() && !app.context.set_flag_shape(shape) {
                    app.context
                        .toasts_mut()
                        .info(format!("No {shape:?} variant for this flag"));
                }
            }

            ui.add(egui::TextEdit::singleline(&mut app.ui.search).hint_text("Search"));
            ui.separator();

            let folder = app.context.scope().folder().cloned();
            if tab.has_folders() {
                if let Some(open) = &folder {
                    ui.horizontal(|ui| {
                        if ui.button("⬅ Folders").clicked() {
                            app.context.open_folder(None);
                        }
                        ui.strong(open.as_str());
                    });
                } else if app.ui.search.trim().is_empty() {
                    let folders = app.context.catalog().folders(tab);
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        for entry in folders {
                            if ui.selectable_label(false, format!("📁 {entry}")).clicked() {
                                app.context.open_folder(Some(entry));
                            }
                        }
                    });
                    return;
                }
            }

            let entries = app
                .context
                .catalog()
                .entries(tab, folder.as_ref(), &app.ui.search);
            if entries.is_empty() {
                ui.weak("Nothing here");
                return;
            }

            egui::ScrollArea::vertical().show(ui, |ui| {
                for item in entries {
                    let scope = app.context.scope();
                    let selected = if scope.multi_select() {
                        scope.selections().get(item.kind).contains(&item.name)
                    } else {
                        scope.active() == Some(&item)
                    };
                    let label = if folder.is_none() && tab.has_folders() {
                        format!("{}  ({})", item.name, item.folder)
                    } else {
                        item.name.clone()
                    };
                    if ui.selectable_label(selected, label).clicked() {
                        app.context.select_item(item);
                    }
                }
            });
        });
}
