use crate::IconManagerApp;
use crate::model::{AssetKind, GroupTarget};
use crate::state::reapply;

pub fn preview_panel(app: &mut IconManagerApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let url = app.context.scope().preview_url().map(str::to_owned);
        let Some(url) = url else {
            ui.centered_and_justified(|ui| {
                ui.weak("Nothing to preview");
            });
            return;
        };

        // The previous texture stays up until the refreshed asset arrives
        let loading = !app.preview.is_showing(Some(url.as_str()));
        ui.horizontal(|ui| {
            match app.context.scope().active() {
                Some(item) => ui.strong(format!("{} ({})", item.name, item.kind.label())),
                None => ui.strong(format!(
                    "First of {} selected",
                    app.context.scope().current_selection().len()
                )),
            };
            if loading {
                ui.spinner();
            }
        });
        overrides_summary(app, ui);
        ui.separator();

        match app.preview.texture() {
            Some(texture) => {
                let available = ui.available_size();
                let size = texture.size_vec2();
                let scale = (available.x / size.x).min(available.y / size.y).min(1.0);
                ui.centered_and_justified(|ui| {
                    ui.image((texture.id(), size * scale));
                });
            }
            None if loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            None => {
                ui.weak("Preview unavailable");
            }
        }
    });
}

/// Colors each group of the open icon will be drawn with.
fn overrides_summary(app: &IconManagerApp, ui: &mut egui::Ui) {
    let Some(item) = app.context.scope().active() else {
        return;
    };
    let overrides = app.context.applied_overrides();

    if item.kind == AssetKind::Icon {
        let groups = reapply(app.context.scope().groups(), &overrides);
        ui.horizontal_wrapped(|ui| {
            for (group, color) in groups {
                let status = app
                    .context
                    .colors()
                    .get(&GroupTarget::Named(group.clone()))
                    .map(|entry| format!(" {:?}", entry.status))
                    .unwrap_or_default();
                match color {
                    Some(color) => ui.colored_label(
                        color.to_color32(),
                        format!("{group}: {color}{status}"),
                    ),
                    None => ui.weak(format!("{group}: original")),
                };
            }
        });
    } else if let Some(color) = overrides.get(&GroupTarget::WholeAsset) {
        ui.colored_label(color.to_color32(), format!("Color: {color}"));
    }
}
