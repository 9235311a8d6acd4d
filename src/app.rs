use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;

use crate::clicker::BackendFactory;
use crate::controller::{Controller, Notice, NoticeLevel};
use crate::hotkey::start_hotkey_listener;
use crate::settings::{ClickKind, ClickLimit, MouseButton, Settings};

const DEFAULT_LIMIT: u64 = 100;

pub struct AutoClickerApp {
    controller: Controller,
    notices: VecDeque<Notice>,
    /// Remembered while "Infinite" is selected so switching back keeps the number.
    limit_input: u64,
}

impl AutoClickerApp {
    pub fn new(
        ctx: &egui::Context,
        settings: Settings,
        factory: Option<BackendFactory>,
        startup_notices: Vec<Notice>,
    ) -> Self {
        let repaint = ctx.clone();
        let controller = Controller::new(settings, factory, Arc::new(move || repaint.request_repaint()));

        let s = controller.settings();
        start_hotkey_listener(s.hotkey.clone(), s.stop_key.clone(), controller.sender());
        let limit_input = match s.limit {
            ClickLimit::Bounded(n) => n,
            ClickLimit::Infinite => DEFAULT_LIMIT,
        };

        Self { controller, notices: startup_notices.into(), limit_input }
    }

    fn start(&mut self) {
        if let Err(e) = self.controller.start() {
            self.notices.push_back(Notice::from(&e));
        }
    }

    fn settings_grid(&mut self, ui: &mut egui::Ui) {
        let running = self.controller.is_running();
        let mut s = self.controller.settings().clone();
        let mut limited = matches!(s.limit, ClickLimit::Bounded(_));

        egui::Grid::new("main_grid").num_columns(2).min_col_width(90.0).show(ui, |ui| {
            ui.label("Status");
            ui.horizontal(|ui| {
                let color = if running { egui::Color32::GREEN } else { egui::Color32::DARK_RED };
                ui.label(egui::RichText::new("●").color(color));
                ui.label(self.controller.status().label());
            });
            ui.end_row();

            ui.label("Total clicks");
            ui.monospace(self.controller.clicks().to_string());
            ui.end_row();

            ui.add_enabled_ui(!running, |ui| ui.label("Clicks/sec"));
            ui.add_enabled(!running, egui::DragValue::new(&mut s.cps).speed(0.1).range(0.0..=100.0).max_decimals(1));
            ui.end_row();

            ui.add_enabled_ui(!running, |ui| ui.label("Count"));
            ui.add_enabled_ui(!running, |ui| {
                ui.horizontal(|ui| {
                    ui.radio_value(&mut limited, false, "Infinite");
                    ui.radio_value(&mut limited, true, "Limited");
                    ui.add_enabled(limited, egui::DragValue::new(&mut self.limit_input).range(0..=999_999));
                });
            });
            ui.end_row();

            ui.add_enabled_ui(!running, |ui| ui.label("Button"));
            ui.add_enabled_ui(!running, |ui| {
                ui.horizontal(|ui| {
                    for b in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
                        ui.radio_value(&mut s.button, b, b.label());
                    }
                });
            });
            ui.end_row();

            ui.add_enabled_ui(!running, |ui| ui.label("Click type"));
            ui.add_enabled_ui(!running, |ui| {
                ui.horizontal(|ui| {
                    ui.radio_value(&mut s.kind, ClickKind::Single, "Single");
                    ui.radio_value(&mut s.kind, ClickKind::Double, "Double");
                });
            });
            ui.end_row();
        });

        s.limit = if limited { ClickLimit::Bounded(self.limit_input) } else { ClickLimit::Infinite };
        if &s != self.controller.settings() {
            if let Some(dst) = self.controller.settings_mut() {
                *dst = s;
            }
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui) {
        let running = self.controller.is_running();
        ui.horizontal(|ui| {
            if ui.add_enabled(!running, egui::Button::new("Start Clicking")).clicked() {
                self.start();
            }
            if ui.add_enabled(running, egui::Button::new("Stop Clicking")).clicked() {
                self.controller.stop();
            }
        });

        if !self.controller.has_backend() {
            ui.colored_label(egui::Color32::RED, "Input simulation unavailable");
        }
        let s = self.controller.settings();
        ui.small(format!(
            "Position the mouse, then press {} to start/stop or {} to stop.\nMove the mouse into a screen corner to abort.",
            s.hotkey, s.stop_key
        ));
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notices.front() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                match notice.level {
                    NoticeLevel::Info => ui.label(notice.message.as_str()),
                    NoticeLevel::Error => ui.colored_label(egui::Color32::RED, notice.message.as_str()),
                };
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.notices.pop_front();
        }
    }
}

impl eframe::App for AutoClickerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.notices.extend(self.controller.poll());

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = egui::vec2(6.0, 4.0);
        style.spacing.button_padding = egui::vec2(6.0, 4.0);
        ctx.set_style(style);

        let blocked = !self.notices.is_empty();
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                ui.heading("Auto Clicker");
                ui.add_space(6.0);
                self.settings_grid(ui);
                ui.add_space(8.0);
                self.controls(ui);
            });
        });
        self.show_notice(ctx);

        if self.controller.is_running() {
            ctx.request_repaint_after(Duration::from_millis(80));
        }
    }
}
