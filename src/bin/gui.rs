#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{env, fs, path::Path, path::PathBuf};
use motor_derating_toolbox::{
    app, config,
    derating::{DeratingResult, Pipeline},
    format::{format_field_with, FRACTION_DECIMALS},
    i18n, logging,
    loader::SheetRanges,
    session::Session,
};

const BLUE: egui::Color32 = egui::Color32::from_rgb(0x28, 0x82, 0xc7);
const ORANGE: egui::Color32 = egui::Color32::from_rgb(0xe9, 0x83, 0x00);

fn main() -> Result<(), eframe::Error> {
    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en-us/ko-kr/es-mx)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }
    logging::init_logging(false);

    let mut viewport = egui::ViewportBuilder::default()
        .with_title("Motor Derating Toolbox")
        .with_inner_size(egui::vec2(1180.0, 760.0));
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let mut app_cfg = config::load_or_default().unwrap_or_default();
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }
    eframe::run_native(
        "Motor Derating Toolbox",
        options,
        Box::new(move |cc| {
            if let Err(e) = setup_fonts(&cc.egui_ctx) {
                tracing::warn!("font setup: {e}");
            }
            Box::new(GuiApp::new(app_cfg))
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../icon.png"];
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

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
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

/// 한글 언어팩을 표시하기 위한 대체 폰트를 등록한다.
/// 1) assets/fonts/ 의 폰트
/// 2) 시스템 폰트(Windows 맑은 고딕, Linux Noto CJK)
/// 모두 없으면 기본 폰트를 유지하고 Err를 돌려준다.
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates = vec![
        PathBuf::from("assets/fonts/malgun.ttf"),
        PathBuf::from("assets/fonts/NotoSansKR-Regular.ttf"),
    ];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.extend(["malgun.ttf", "gulim.ttc"].iter().map(|f| fonts.join(f)));
    }
    candidates.push(PathBuf::from(
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ));
    candidates.push(PathBuf::from(
        "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    ));

    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font file ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "cjk_font");
            return Ok(());
        }
    }
    Err("CJK font not found; Korean labels may not render.".into())
}

/// 한 블록(파란/주황)의 입력과 마지막 결과.
#[derive(Debug, Default)]
struct PipelineForm {
    hp_text: String,
    env_text: String,
    result: DeratingResult,
}

struct GuiApp {
    config: config::Config,
    tr: i18n::Translator,
    session: Session,
    lang_input: String,
    source_input: String,
    sheet_input: String,
    ambient: PipelineForm,
    altitude: PipelineForm,
    error_modal: Option<(String, String)>,
    show_formula_modal: bool,
    show_settings_modal: bool,
    settings_status: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config) -> Self {
        let session = app::open_session(&config);
        Self::with_session(config, session)
    }

    fn with_session(config: config::Config, session: Session) -> Self {
        let lang_code = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang_code, config.language_pack_dir.as_deref());
        tracing::debug!(lang = %lang_code, "GUI language resolved");
        Self {
            lang_input: config.language.clone(),
            source_input: config.data_source.path.display().to_string(),
            sheet_input: config.data_source.sheet.clone(),
            config,
            tr,
            session,
            ambient: PipelineForm::default(),
            altitude: PipelineForm::default(),
            error_modal: None,
            show_formula_modal: false,
            show_settings_modal: false,
            settings_status: None,
        }
    }

    fn txt(&self, key: &str, default: &str) -> String {
        self.tr.lookup(key).unwrap_or_else(|| default.to_string())
    }

    fn form(&self, pipeline: Pipeline) -> &PipelineForm {
        match pipeline {
            Pipeline::Ambient => &self.ambient,
            Pipeline::Altitude => &self.altitude,
        }
    }

    fn form_mut(&mut self, pipeline: Pipeline) -> &mut PipelineForm {
        match pipeline {
            Pipeline::Ambient => &mut self.ambient,
            Pipeline::Altitude => &mut self.altitude,
        }
    }

    /// 입력을 검증하고 계산한다. 검증 실패 시 오류 창만 띄우고 이전 결과를 유지한다.
    fn calculate(&mut self, pipeline: Pipeline) {
        let form = self.form(pipeline);
        match self.session.calculate(pipeline, &form.hp_text, &form.env_text) {
            Ok(result) => self.form_mut(pipeline).result = result,
            Err(err) => {
                let title = self.txt("gui.error.invalid_input", "Invalid input");
                self.error_modal = Some((title, err.to_string()));
            }
        }
    }

    /// 입력된 경로/시트로 기준표를 다시 읽는다.
    fn load_tables(&mut self) {
        self.config.data_source.path = PathBuf::from(self.source_input.trim());
        self.config.data_source.sheet = self.sheet_input.trim().to_string();
        match self.session.reload(&self.config.data_source.to_source()) {
            Ok(()) => {
                if let Err(e) = self.config.save() {
                    tracing::warn!(error = %e, "config save failed");
                }
            }
            Err(err) => {
                let title = self.txt("gui.error.title", "Error");
                self.error_modal = Some((title, err.to_string()));
            }
        }
    }

    fn clear_all(&mut self) {
        self.ambient = PipelineForm::default();
        self.altitude = PipelineForm::default();
    }

    fn pick_workbook(&mut self, folder: bool) {
        let dialog = FileDialog::new().set_title(self.txt("gui.source.pick_title", "Select workbook"));
        let picked = if folder {
            dialog.pick_folder()
        } else {
            dialog
                .add_filter("Excel", &["xlsx", "xlsm", "xlsb", "xls", "ods"])
                .add_filter("CSV", &["csv"])
                .add_filter("All files", &["*"])
                .pick_file()
        };
        if let Some(path) = picked {
            self.source_input = path.display().to_string();
        }
    }

    fn ui_source_bar(&mut self, ui: &mut egui::Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.strong(self.txt("gui.source.heading", "Source (workbook)"));
            egui::Grid::new("source_grid")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label(self.txt("gui.source.file", "File:"));
                    ui.horizontal(|ui| {
                        ui.add(egui::TextEdit::singleline(&mut self.source_input).desired_width(560.0));
                        if ui.button(self.txt("gui.source.browse", "Change…")).clicked() {
                            self.pick_workbook(false);
                        }
                        if ui.button(self.txt("gui.source.browse_folder", "Folder…")).clicked() {
                            self.pick_workbook(true);
                        }
                    });
                    ui.end_row();

                    ui.label(self.txt("gui.source.sheet", "Sheet:"));
                    ui.horizontal(|ui| {
                        ui.add(egui::TextEdit::singleline(&mut self.sheet_input).desired_width(200.0));
                        if ui.button(self.txt("gui.source.load", "Load tables")).clicked() {
                            self.load_tables();
                        }
                        if ui.button(self.txt("gui.source.clear", "Clear all")).clicked() {
                            self.clear_all();
                        }
                        if ui.button(self.txt("gui.formula.button", "Show formulas")).clicked() {
                            self.show_formula_modal = true;
                        }
                    });
                    ui.end_row();
                });
            ui.small(self.session.status().message(&self.tr));
        });
    }

    fn ui_pipeline_card(&mut self, ui: &mut egui::Ui, pipeline: Pipeline) {
        let (color, title, hp_label, env_label, button) = match pipeline {
            Pipeline::Ambient => (
                BLUE,
                self.txt("gui.ambient.title", "BLUE: Ambient temperature"),
                self.txt("gui.ambient.hp", "HP (I2):"),
                self.txt("gui.ambient.env", "Ambient °C (Q2):"),
                self.txt("gui.ambient.calc", "Calculate BLUE"),
            ),
            Pipeline::Altitude => (
                ORANGE,
                self.txt("gui.altitude.title", "ORANGE: Altitude"),
                self.txt("gui.altitude.hp", "Base HP (I8):"),
                self.txt("gui.altitude.env", "FASL/MASL (Q8):"),
                self.txt("gui.altitude.calc", "Calculate ORANGE"),
            ),
        };
        let sections = result_sections(&self.tr, pipeline, &self.form(pipeline).result, self.session.ranges());

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(2.0, color))
            .show(ui, |ui| {
                ui.label(egui::RichText::new(title).strong().color(color));
                let mut clicked = false;
                {
                    let form = self.form_mut(pipeline);
                    egui::Grid::new((pipeline_id(pipeline), "inputs"))
                        .num_columns(2)
                        .spacing([8.0, 6.0])
                        .show(ui, |ui| {
                            ui.label(hp_label);
                            ui.add(egui::TextEdit::singleline(&mut form.hp_text).desired_width(120.0));
                            ui.end_row();
                            ui.label(env_label);
                            ui.add(egui::TextEdit::singleline(&mut form.env_text).desired_width(120.0));
                            ui.end_row();
                        });
                    if ui.button(button).clicked() {
                        clicked = true;
                    }
                }
                if clicked {
                    self.calculate(pipeline);
                }
                ui.separator();
                for (idx, (heading, rows)) in sections.iter().enumerate() {
                    ui.strong(heading);
                    egui::Grid::new((pipeline_id(pipeline), idx))
                        .num_columns(2)
                        .spacing([8.0, 4.0])
                        .striped(true)
                        .show(ui, |ui| {
                            for (label, value) in rows {
                                ui.label(label);
                                let mut shown = value.as_str();
                                ui.add(egui::TextEdit::singleline(&mut shown).desired_width(140.0));
                                ui.end_row();
                            }
                        });
                    ui.add_space(4.0);
                }
            });
    }
}

fn pipeline_id(pipeline: Pipeline) -> &'static str {
    match pipeline {
        Pipeline::Ambient => "ambient",
        Pipeline::Altitude => "altitude",
    }
}

/// 결과 필드를 (구역 제목, [(라벨, 값)]) 목록으로 만든다. 라벨에는 원래 워크시트의 셀 이름을 쓴다.
fn result_sections(
    tr: &i18n::Translator,
    pipeline: Pipeline,
    r: &DeratingResult,
    ranges: &SheetRanges,
) -> Vec<(String, Vec<(String, String)>)> {
    let txt = |key: &str, default: &str| tr.lookup(key).unwrap_or_else(|| default.to_string());
    let load = format_field_with(r.load_fraction, FRACTION_DECIMALS);
    match pipeline {
        Pipeline::Ambient => vec![
            (
                txt("gui.section.base", "Base rating"),
                vec![
                    ("HP (I2):".into(), r.base_hp.to_string()),
                    ("kW (I3=I2/1.341):".into(), r.base_kw.to_string()),
                    ("W (I4=kW*1000):".into(), r.base_w.to_string()),
                ],
            ),
            (
                txt("gui.section.rating_50hz", "50 Hz rating"),
                vec![
                    ("Required HP (L2=I2*1.15):".into(), r.required_hp.to_string()),
                    ("NEMA HP (L3):".into(), r.required_size.to_string()),
                ],
            ),
            (
                txt("gui.section.new_rating", "Load % / New rating"),
                vec![
                    ("Ambient (Q2):".into(), r.environment.to_string()),
                    (format!("U2=VLOOKUP({})/100:", ranges.ambient), load),
                    ("HP (Y2=I2/U2):".into(), r.corrected_hp.to_string()),
                    ("kW (Y3=Y2/1.341):".into(), r.corrected_kw.to_string()),
                    ("W (Y4=kW*1000):".into(), r.corrected_w.to_string()),
                    ("NEMA HP (Y2):".into(), r.corrected_size.to_string()),
                ],
            ),
        ],
        Pipeline::Altitude => {
            let chain = r.tolerances.unwrap_or_default();
            vec![
                (
                    txt("gui.section.base", "Base rating"),
                    vec![
                        ("HP (I8):".into(), r.base_hp.to_string()),
                        ("kW (I9=I8/1.341):".into(), r.base_kw.to_string()),
                        ("W (I10=kW*1000):".into(), r.base_w.to_string()),
                        ("Required HP (L8=I8*1.15):".into(), r.required_hp.to_string()),
                        ("NEMA HP (L9):".into(), r.required_size.to_string()),
                    ],
                ),
                (
                    txt("gui.section.new_rating", "Load % / New rating"),
                    vec![
                        (format!("U8=VLOOKUP({})/100:", ranges.altitude), load),
                        ("HP (Y8=I8/U8):".into(), r.corrected_hp.to_string()),
                        ("kW (Y8/1.341):".into(), r.corrected_kw.to_string()),
                        ("W ((Y8/1.341)*1000):".into(), r.corrected_w.to_string()),
                        ("NEMA HP (Y8):".into(), r.corrected_size.to_string()),
                    ],
                ),
                (
                    txt("gui.section.tolerances", "Tolerances"),
                    vec![
                        ("EC: AB8=Y8*0.94:".into(), chain.tolerance_hp.to_string()),
                        ("NEMA(AB8):".into(), chain.tolerance_size.to_string()),
                        ("50Hz: AE8=Y8*1.15:".into(), chain.rating_50hz_hp.to_string()),
                        ("NEMA(AE8):".into(), chain.rating_50hz_size.to_string()),
                        ("EC+50Hz: AH8=AE8*0.94:".into(), chain.tolerance_50hz_hp.to_string()),
                        ("NEMA(AH8):".into(), chain.tolerance_50hz_size.to_string()),
                    ],
                ),
            ]
        }
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 상단 바
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(self.txt("gui.nav.app_title", "Motor Derating Toolbox"));
                ui.separator();
                if ui.button(self.txt("gui.settings.title", "Settings")).clicked() {
                    self.show_settings_modal = true;
                }
            });
        });

        // 입력 오류/로딩 오류 창
        if let Some((title, message)) = self.error_modal.clone() {
            let mut open = true;
            let mut dismissed = false;
            egui::Window::new(title)
                .collapsible(false)
                .resizable(false)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(message);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            if !open || dismissed {
                self.error_modal = None;
            }
        }

        if self.show_formula_modal {
            let formulas = self.tr.formulas();
            egui::Window::new(self.txt("gui.formula.title", "Formulas"))
                .collapsible(true)
                .resizable(true)
                .open(&mut self.show_formula_modal)
                .show(ctx, |ui| {
                    ui.monospace(formulas);
                });
        }

        // 설정 모달
        if self.show_settings_modal {
            let mut open = true;
            let mut save_clicked = false;
            let title = self.txt("gui.settings.title", "Settings");
            let lang_label = self.txt("gui.settings.lang", "Language");
            let auto_label = self.txt("gui.settings.lang_auto", "System");
            let save_label = self.txt("gui.settings.save", "Save settings");
            egui::Window::new(title)
                .collapsible(false)
                .resizable(true)
                .open(&mut open)
                .show(ctx, |ui| {
                    ui.label(lang_label);
                    egui::ComboBox::from_id_source("lang_choice")
                        .selected_text(&self.lang_input)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.lang_input, "auto".into(), auto_label);
                            ui.selectable_value(&mut self.lang_input, "en-us".into(), "English (US)");
                            ui.selectable_value(&mut self.lang_input, "ko-kr".into(), "한국어");
                            ui.selectable_value(&mut self.lang_input, "es-mx".into(), "Español");
                        });
                    if ui.button(save_label).clicked() {
                        save_clicked = true;
                    }
                    if let Some(msg) = &self.settings_status {
                        ui.label(msg);
                    }
                });
            if save_clicked {
                self.config.language = self.lang_input.clone();
                // 즉시 번역기 반영
                let resolved = i18n::resolve_language(&self.config.language, None);
                self.tr = i18n::Translator::new_with_pack(&resolved, self.config.language_pack_dir.as_deref());
                self.settings_status = Some(match self.config.save() {
                    Ok(()) => self.txt("gui.settings.saved", "Saved."),
                    Err(e) => format!("Save error: {e}"),
                });
            }
            self.show_settings_modal = open;
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    self.ui_source_bar(ui);
                    ui.add_space(8.0);
                    ui.columns(2, |cols| {
                        self.ui_pipeline_card(&mut cols[0], Pipeline::Ambient);
                        self.ui_pipeline_card(&mut cols[1], Pipeline::Altitude);
                    });
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use motor_derating_toolbox::reference_data::{LookupTable, ReferenceData, StandardSizeList};

    fn offline_config() -> config::Config {
        let mut cfg = config::Config::default();
        cfg.data_source.preload = false;
        cfg.language = "en-us".into();
        cfg
    }

    fn app_with_tables() -> GuiApp {
        let data = ReferenceData {
            ambient: LookupTable::from_pairs([(40.0, 100.0), (50.0, 80.0)]),
            altitude: LookupTable::from_pairs([(1000.0, 100.0)]),
            standard_sizes: StandardSizeList::default(),
        };
        GuiApp::with_session(offline_config(), Session::with_data(data, SheetRanges::default()))
    }

    #[test]
    fn calculate_fills_ambient_result() {
        let mut app = app_with_tables();
        app.ambient.hp_text = "10".into();
        app.ambient.env_text = "50".into();
        app.calculate(Pipeline::Ambient);
        assert!(app.error_modal.is_none());
        assert_eq!(app.ambient.result.corrected_hp.to_string(), "12.5");
        assert_eq!(app.ambient.result.corrected_size.to_string(), "15");
    }

    #[test]
    fn invalid_input_keeps_previous_result() {
        let mut app = app_with_tables();
        app.altitude.hp_text = "100".into();
        app.altitude.env_text = "1000".into();
        app.calculate(Pipeline::Altitude);
        let before = app.altitude.result;

        app.altitude.hp_text = "abc".into();
        app.calculate(Pipeline::Altitude);
        assert!(app.error_modal.is_some());
        assert_eq!(app.altitude.result, before);
    }

    #[test]
    fn clear_all_blanks_both_blocks() {
        let mut app = app_with_tables();
        app.ambient.hp_text = "10".into();
        app.calculate(Pipeline::Ambient);
        app.clear_all();
        assert!(app.ambient.hp_text.is_empty());
        assert!(app.ambient.result.base_hp.is_blank());
        assert!(app.altitude.result.corrected_hp.is_blank());
    }

    #[test]
    fn blank_altitude_result_renders_spaces() {
        let tr = i18n::Translator::new("en-us");
        let sections = result_sections(
            &tr,
            Pipeline::Altitude,
            &DeratingResult::default(),
            &SheetRanges::default(),
        );
        assert_eq!(sections.len(), 3);
        assert!(sections
            .iter()
            .flat_map(|(_, rows)| rows.iter())
            .all(|(_, value)| value == " "));
        assert!(sections[1].1[0].0.contains("R3:S14"));
    }
}
