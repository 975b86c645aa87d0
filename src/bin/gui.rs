#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use std::{env, fs, path::Path};
use toc_calculator::{
    config,
    currency::{CurrencyFormatter, FormattedResult},
    form::{TocForm, FIELDS},
    i18n::{self, keys},
    logger,
};

fn main() -> Result<(), eframe::Error> {
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/da-dk/en-us/ko-kr)
    let mut cli_lang: Option<String> = None;
    let mut verbose = false;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if a == "--lang" || a == "-L" {
            if i + 1 < args.len() {
                cli_lang = Some(args[i + 1].clone());
                i += 1;
            }
        } else if a == "--verbose" || a == "-v" {
            verbose = true;
        }
        i += 1;
    }
    logger::init_logger(verbose);

    let mut viewport = egui::ViewportBuilder::default().with_inner_size(egui::vec2(760.0, 640.0));
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = match config::load_or_default() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("config load failed, using defaults: {e}");
            config::Config::default()
        }
    };
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "TOC Calculator",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                tracing::debug!("font fallback not applied: {e}");
            }
            Box::new(GuiApp::new(app_cfg.clone()))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    // 기본 글꼴 뒤에 붙여 한글 글리프만 보충한다
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .push(font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .push(font_name);
    ctx.set_fonts(fonts);
}

/// 한국어 언어팩 표시용 보조 폰트를 찾는다.
/// 1) assets/fonts/malgun.ttf
/// 2) Windows 시스템 폰트(맑은 고딕/굴림)
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let asset_path = Path::new("assets/fonts/malgun.ttf");
    if asset_path.exists() {
        let bytes = fs::read(asset_path).map_err(|e| format!("Failed to read font file: {e}"))?;
        apply_font_bytes(ctx, bytes, "korean_font");
        return Ok(());
    }
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for cand in ["malgun.ttf", "gulim.ttc"] {
            let p = fonts.join(cand);
            if p.exists() {
                let bytes = fs::read(&p)
                    .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
                apply_font_bytes(ctx, bytes, "korean_font");
                return Ok(());
            }
        }
    }
    Err("no fallback font found".into())
}

fn label_with_tip(ui: &mut egui::Ui, text: &str, tip: Option<&str>) -> egui::Response {
    let resp = ui.label(text);
    match tip {
        Some(tip) => resp.on_hover_text(tip),
        None => resp,
    }
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    form: TocForm,
    lang_input: String,
    lang_save_status: Option<String>,
    show_settings_modal: bool,
    show_help_modal: bool,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        tracing::info!(language = %lang_code, "gui started");
        Self {
            lang_input: config.language.clone(),
            config,
            tr,
            form: TocForm::new(),
            lang_save_status: None,
            show_settings_modal: false,
            show_help_modal: false,
        }
    }

    fn submit(&mut self) {
        match self.form.submit() {
            Ok(b) => tracing::debug!(total = b.result.total_annual_cost, "gui submit"),
            Err(e) => tracing::debug!("gui submit rejected: {e}"),
        }
    }

    fn ui_form(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.heading(tr.t(keys::FORM_HEADING));
        ui.add_space(8.0);
        let mut submit = false;
        egui::Frame::group(ui.style()).show(ui, |ui| {
            egui::Grid::new("toc_grid")
                .num_columns(3)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for spec in FIELDS.iter() {
                        let hint = spec.range_hint(&tr);
                        label_with_tip(ui, &spec.label(&tr), hint.as_deref());
                        let resp = ui.add(
                            egui::TextEdit::singleline(self.form.raw.get_mut(spec.id))
                                .desired_width(160.0),
                        );
                        if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            submit = true;
                        }
                        match self.form.error().and_then(|e| e.for_field(spec.id)) {
                            Some(err) => {
                                ui.colored_label(ui.visuals().error_fg_color, err.localized(&tr));
                            }
                            None => {
                                ui.label("");
                            }
                        }
                        ui.end_row();
                    }
                });
        });
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button(tr.t(keys::FORM_SUBMIT)).clicked() {
                submit = true;
            }
            if ui.button(tr.t(keys::FORM_RESET)).clicked() {
                self.form.reset();
            }
        });
        if submit {
            self.submit();
        }
    }

    fn ui_results(&self, ui: &mut egui::Ui) {
        let (Some(input), Some(b)) = (self.form.input(), self.form.breakdown()) else {
            return;
        };
        let tr = &self.tr;
        let currency = &self.config.currency;
        ui.add_space(12.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.strong(tr.t(keys::RESULT_HEADING));
            if !b.result.is_finite() {
                ui.colored_label(ui.visuals().error_fg_color, tr.t(keys::ERROR_NON_FINITE_RESULT));
                return;
            }
            let formatted = FormattedResult::new(&b.result, currency);
            ui.label(format!(
                "{} {}",
                tr.t(keys::RESULT_TOTAL_ANNUAL_COST),
                formatted.total_annual_cost
            ));
            ui.label(format!(
                "{} {}",
                tr.t(keys::RESULT_COST_PER_HOUR),
                formatted.cost_per_hour
            ));
            if input.operating_hours <= 0.0 {
                ui.small(tr.t(keys::RESULT_HOURS_NOTE));
            }
            egui::CollapsingHeader::new(tr.t(keys::RESULT_BREAKDOWN))
                .id_source("toc_breakdown")
                .show(ui, |ui| {
                    egui::Grid::new("toc_breakdown_grid")
                        .num_columns(2)
                        .show(ui, |ui| {
                            for (key, amount) in [
                                (keys::RESULT_RESIDUAL_AMOUNT, b.residual_amount),
                                (keys::RESULT_DEPRECIATION, b.depreciation),
                                (keys::RESULT_AVERAGE_CAPITAL, b.average_capital),
                                (keys::RESULT_INTEREST_COST, b.interest_cost),
                            ] {
                                ui.label(tr.t(key));
                                ui.label(currency.format_amount(amount));
                                ui.end_row();
                            }
                        });
                });
        });
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let tr = self.tr.clone();

        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(tr.t(keys::APP_TITLE));
                ui.separator();
                if ui.button(tr.t(keys::SETTINGS_LANGUAGE)).clicked() {
                    self.show_settings_modal = true;
                }
                if ui.button(tr.t(keys::ABOUT_TITLE)).clicked() {
                    self.show_help_modal = true;
                }
            });
        });

        // 설정 모달
        if self.show_settings_modal {
            let mut apply = false;
            egui::Window::new(tr.t(keys::SETTINGS_LANGUAGE))
                .collapsible(false)
                .resizable(false)
                .open(&mut self.show_settings_modal)
                .show(ctx, |ui| {
                    egui::ComboBox::from_id_source("lang_choice")
                        .selected_text(&self.lang_input)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(
                                &mut self.lang_input,
                                "auto".into(),
                                tr.t(keys::SETTINGS_LANGUAGE_AUTO),
                            );
                            ui.selectable_value(&mut self.lang_input, "da-dk".into(), "Dansk");
                            ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                            ui.selectable_value(&mut self.lang_input, "ko-kr".into(), "한국어");
                        });
                    if ui.button(tr.t(keys::SETTINGS_SAVE)).clicked() {
                        apply = true;
                    }
                    if let Some(msg) = &self.lang_save_status {
                        ui.label(msg);
                    }
                });
            if apply {
                self.apply_language();
            }
        }

        // 도움말 모달
        if self.show_help_modal {
            egui::Window::new(tr.t(keys::ABOUT_TITLE))
                .collapsible(false)
                .resizable(true)
                .open(&mut self.show_help_modal)
                .show(ctx, |ui| {
                    ui.label(tr.t(keys::ABOUT_BODY));
                    ui.label(format!("v{}", env!("CARGO_PKG_VERSION")));
                });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.ui_form(ui);
                self.ui_results(ui);
            });
        });
    }
}

impl GuiApp {
    /// 선택한 언어로 번역기를 바꾸고 설정을 저장한다.
    fn apply_language(&mut self) {
        self.config.language = self.lang_input.clone();
        let resolved = i18n::resolve_language(&self.config.language, None);
        self.tr = i18n::Translator::new_with_pack(&resolved, self.config.language_pack_dir.as_deref());
        self.lang_save_status = Some(match self.config.save() {
            Ok(()) => self.tr.t(keys::SETTINGS_SAVED),
            Err(e) => format!("{}: {e}", self.tr.t(keys::ERROR_PREFIX)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toc_calculator::form::FieldId;

    fn fill(app: &mut GuiApp, values: [&str; 6]) {
        for (id, v) in FieldId::ALL.into_iter().zip(values) {
            app.form.raw.set(id, v);
        }
    }

    #[test]
    fn submit_fills_result() {
        let mut app = GuiApp::new(config::Config::default());
        fill(&mut app, ["100000", "5", "2000", "5000", "3000", "20"]);
        app.submit();
        let b = app.form.breakdown().expect("result after submit");
        assert!((b.result.total_annual_cost - 27_000.0).abs() < 1e-9);
        assert!((b.result.cost_per_hour - 13.5).abs() < 1e-9);
    }

    #[test]
    fn invalid_submit_clears_previous_result() {
        let mut app = GuiApp::new(config::Config::default());
        fill(&mut app, ["100000", "5", "2000", "5000", "3000", "20"]);
        app.submit();
        app.form.raw.set(FieldId::ResidualValue, "120");
        app.submit();
        assert!(app.form.breakdown().is_none());
        let err = app.form.error().expect("validation error");
        assert!(err.for_field(FieldId::ResidualValue).is_some());
    }

    #[test]
    fn explicit_language_uses_that_pack() {
        let mut cfg = config::Config::default();
        cfg.language = "en-us".into();
        let app = GuiApp::new(cfg);
        assert_eq!(app.tr.language_code(), "en-us");
    }
}
