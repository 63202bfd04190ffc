use crate::state::AppState;
use egui::Context as EguiContext;
use flyview_input::CursorMode;
use glam::Vec3;

fn drag_vec3(ui: &mut egui::Ui, label: &str, value: &mut Vec3, speed: f64) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(&mut value.x).prefix("X: ").speed(speed));
        ui.add(egui::DragValue::new(&mut value.y).prefix("Y: ").speed(speed));
        ui.add(egui::DragValue::new(&mut value.z).prefix("Z: ").speed(speed));
    });
}

fn drag_f32(ui: &mut egui::Ui, label: &str, value: &mut f32, speed: f64) {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(egui::DragValue::new(value).speed(speed));
    });
}

/// Settings panel: cube transforms, camera fields and the reset buttons.
pub fn draw_settings(state: &mut AppState, ctx: &EguiContext) {
    if !state.show_settings {
        return;
    }

    egui::Window::new("Settings")
        .default_width(320.0)
        .show(ctx, |ui| {
            ui.heading("Cubes");
            for (i, cube) in state.scene.cubes_mut().iter_mut().enumerate() {
                ui.push_id(i, |ui| {
                    egui::CollapsingHeader::new(format!("Transform {i}")).show(ui, |ui| {
                        drag_vec3(ui, "Position", &mut cube.position, 0.05);
                        drag_vec3(ui, "Rotation", &mut cube.rotation, 1.0);
                        drag_vec3(ui, "Scale", &mut cube.scale, 0.05);
                    });
                });
            }
            if ui.button("Reset Cubes").clicked() {
                state.reset_cubes();
            }

            ui.separator();
            ui.heading("Camera");
            let cam = &mut state.camera;
            ui.checkbox(&mut cam.orbiting, "Orbit");
            ui.horizontal(|ui| {
                ui.label("Orbit Speed");
                ui.add(
                    egui::DragValue::new(&mut cam.orbit_speed)
                        .speed(0.05)
                        .range(0.0..=10.0),
                );
            });
            drag_vec3(ui, "Position", &mut cam.position, 0.05);
            drag_vec3(ui, "Target", &mut cam.target, 0.05);
            ui.checkbox(&mut cam.orthographic, "Orthographic");
            if cam.orthographic {
                drag_f32(ui, "Ortho Size", &mut cam.ortho_size, 0.05);
            } else {
                drag_f32(ui, "FOV", &mut cam.fov, 0.05);
            }
            drag_f32(ui, "Near Plane", &mut cam.near, 0.05);
            drag_f32(ui, "Far Plane", &mut cam.far, 0.05);
            if ui.button("Reset").clicked() {
                state.reset_camera();
            }

            ui.separator();
            let mode = match state.controls.mode() {
                CursorMode::Free => "free",
                CursorMode::Captured => "captured",
            };
            ui.label(format!(
                "Yaw {:.1}  Pitch {:.1}  Cursor: {mode}",
                state.controls.yaw, state.controls.pitch
            ));
            ui.small("F1: Toggle Settings | RMB: Look | WASD: Move | E/Q: Up/Down");
        });
}
