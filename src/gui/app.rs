use eframe::egui;
use foodee::{AppConfig, AppContext, AppController, MessageId, NoticeKind};

#[path = "app_analysis.rs"]
mod app_analysis;

const ACCENT: egui::Color32 = egui::Color32::from_rgb(66, 94, 121);

pub struct FoodeeApp {
    controller: AppController,
    config: AppConfig,
}

impl FoodeeApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig, context: AppContext) -> Self {
        Self {
            controller: AppController::new(context),
            config,
        }
    }

    fn text(&self, id: MessageId) -> String {
        self.controller.messages().get(id).to_string()
    }

    fn accent_button(&self, id: MessageId) -> egui::Button<'static> {
        egui::Button::new(egui::RichText::new(self.text(id)).color(egui::Color32::WHITE))
            .fill(ACCENT)
            .min_size(egui::vec2(140.0, 36.0))
    }

    fn render_file_selection(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.add(self.accent_button(MessageId::BrowseButton)).clicked() {
                self.browse_files();
            }

            let selected = self
                .controller
                .selected_file()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            ui.label(selected);
        });

        ui.add_space(10.0);
    }

    fn render_analysis(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let analyze = self.accent_button(MessageId::AnalyzeButton);
            if ui.add_enabled(self.controller.can_analyze(), analyze).clicked() {
                self.start_analysis();
            }

            ui.label(self.text(MessageId::ScannedObjectLabel));
            let scanned = self.controller.session().detected_label().unwrap_or_default();
            ui.label(egui::RichText::new(scanned).strong());

            let show_recipe = self.accent_button(MessageId::ShowRecipeButton);
            if ui
                .add_enabled(self.controller.can_show_recipes(), show_recipe)
                .clicked()
            {
                self.controller.show_recipes();
            }
        });

        ui.add_space(10.0);
    }

    fn render_recipe(&mut self, ui: &mut egui::Ui) {
        ui.separator();

        ui.horizontal(|ui| {
            let previous = egui::Button::new(self.text(MessageId::PreviousRecipeButton));
            if ui
                .add_enabled(self.controller.can_navigate_previous(), previous)
                .clicked()
            {
                self.controller.show_previous();
            }

            let title = self
                .controller
                .current_recipe()
                .map(|r| r.title.clone())
                .unwrap_or_default();
            ui.heading(title);

            let next = egui::Button::new(self.text(MessageId::NextRecipeButton));
            if ui.add_enabled(self.controller.can_navigate_next(), next).clicked() {
                self.controller.show_next();
            }
        });

        let Some(recipe) = self.controller.current_recipe() else {
            return;
        };
        let ingredients_heading = self.text(MessageId::IngredientsHeading);
        let instructions_heading = self.text(MessageId::InstructionsHeading);

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(2, |columns| {
                columns[0].label(egui::RichText::new(ingredients_heading).strong());
                columns[0].label(recipe.ingredients_summary.as_str());
                columns[1].label(egui::RichText::new(instructions_heading).strong());
                columns[1].label(recipe.instructions.as_str());
            });
        });
    }

    fn render_tips(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label(self.controller.current_tip());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.add(self.accent_button(MessageId::NextTipButton)).clicked() {
                    self.controller.next_tip();
                }
            });
        });
    }

    fn render_loading(&self, ctx: &egui::Context) {
        if !self.controller.is_loading() {
            return;
        }

        egui::Window::new("loading")
            .title_bar(false)
            .resizable(false)
            .collapsible(false)
            .fixed_size([200.0, 200.0])
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    ui.add(egui::Spinner::new().size(64.0));
                    ui.add_space(10.0);
                    ui.label(self.text(MessageId::LoadingCaption));
                });
            });
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.controller.notice().cloned() else {
            return;
        };

        let title = self.text(notice.title());
        let body = self.text(notice.message);
        let ok = self.text(MessageId::OkButton);
        let color = match notice.kind {
            NoticeKind::Warning => egui::Color32::from_rgb(230, 160, 20),
            NoticeKind::Failure => egui::Color32::RED,
        };

        let mut acknowledged = false;
        let response = egui::Modal::new(egui::Id::new("notice")).show(ctx, |ui| {
            ui.set_min_width(320.0);
            ui.heading(egui::RichText::new(title).color(color));
            ui.add_space(8.0);
            ui.label(body);
            if let Some(detail) = &notice.detail {
                ui.add_space(4.0);
                ui.label(egui::RichText::new(detail).small().weak());
            }
            ui.add_space(12.0);
            if ui.button(ok).clicked() {
                acknowledged = true;
            }
        });

        if acknowledged || response.should_close() {
            self.controller.dismiss_notice();
        }
    }
}

impl eframe::App for FoodeeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for the analysis outcome from the background thread
        self.check_analysis();

        egui::TopBottomPanel::bottom("tips")
            .min_height(48.0)
            .show(ctx, |ui| self.render_tips(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_file_selection(ui);
            self.render_analysis(ui);
            self.render_recipe(ui);
        });

        self.render_loading(ctx);
        self.render_notice(ctx);

        // Keep polling while the worker runs
        if self.controller.is_loading() {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
    }
}
