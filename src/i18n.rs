use std::collections::HashMap;
use std::fs;
use std::path::Path;
use sys_locale::get_locale;

/// 문자열 키를 모아두는 네임스페이스.
pub mod keys {
    pub const ERROR_PREFIX: &str = "general.error_prefix";
    pub const APP_EXIT: &str = "general.app_exit";

    pub const MAIN_MENU_TITLE: &str = "main_menu.title";
    pub const MAIN_MENU_AMBIENT: &str = "main_menu.ambient";
    pub const MAIN_MENU_ALTITUDE: &str = "main_menu.altitude";
    pub const MAIN_MENU_UNIT_CONVERSION: &str = "main_menu.unit_conversion";
    pub const MAIN_MENU_LOAD_TABLES: &str = "main_menu.load_tables";
    pub const MAIN_MENU_FORMULAS: &str = "main_menu.formulas";
    pub const MAIN_MENU_SETTINGS: &str = "main_menu.settings";
    pub const MAIN_MENU_EXIT: &str = "main_menu.exit";
    pub const PROMPT_MENU_SELECT: &str = "prompt.menu_select";
    pub const INVALID_SELECTION_RETRY: &str = "error.invalid_selection_retry";

    pub const AMBIENT_HEADING: &str = "ambient.heading";
    pub const ALTITUDE_HEADING: &str = "altitude.heading";
    pub const PROMPT_BASE_HP: &str = "prompt.base_hp";
    pub const PROMPT_AMBIENT: &str = "prompt.ambient";
    pub const PROMPT_ALTITUDE: &str = "prompt.altitude";
    pub const NOTE_BLANK_INPUT: &str = "note.blank_input";

    pub const RESULT_BASE: &str = "result.base";
    pub const RESULT_REQUIRED: &str = "result.required";
    pub const RESULT_ENVIRONMENT: &str = "result.environment";
    pub const RESULT_LOAD: &str = "result.load";
    pub const RESULT_CORRECTED: &str = "result.corrected";
    pub const RESULT_TOLERANCE: &str = "result.tolerance";
    pub const RESULT_RATING_50HZ: &str = "result.rating_50hz";
    pub const RESULT_TOLERANCE_50HZ: &str = "result.tolerance_50hz";

    pub const UNIT_CONVERSION_HEADING: &str = "unit_conversion.heading";
    pub const UNIT_CONVERSION_PROMPT_VALUE: &str = "unit_conversion.prompt_value";
    pub const UNIT_CONVERSION_PROMPT_FROM_UNIT: &str = "unit_conversion.prompt_from_unit";
    pub const UNIT_CONVERSION_PROMPT_TO_UNIT: &str = "unit_conversion.prompt_to_unit";
    pub const UNIT_CONVERSION_RESULT: &str = "unit_conversion.result";

    pub const LOAD_HEADING: &str = "load.heading";
    pub const LOAD_PROMPT_PATH: &str = "load.prompt_path";
    pub const LOAD_PROMPT_SHEET: &str = "load.prompt_sheet";
    pub const LOAD_FAILED: &str = "load.failed";
    pub const STATUS_NOT_LOADED: &str = "status.not_loaded";
    pub const STATUS_LOADED: &str = "status.loaded";
    pub const STATUS_LOAD_FAILED: &str = "status.load_failed";

    pub const FORMULAS_TEXT: &str = "formulas.text";

    pub const SETTINGS_HEADING: &str = "settings.heading";
    pub const SETTINGS_CURRENT_LANGUAGE: &str = "settings.current_language";
    pub const SETTINGS_OPTIONS: &str = "settings.options";
    pub const SETTINGS_PROMPT_CHANGE: &str = "settings.prompt_change";
    pub const SETTINGS_INVALID: &str = "settings.invalid";
    pub const SETTINGS_SAVED: &str = "settings.saved";

    pub const ERROR_INVALID_NUMBER: &str = "error.invalid_number";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Ko,
    En,
    Es,
}

impl Language {
    fn from_code(code: &str) -> Self {
        let c = code.to_lowercase();
        if c.starts_with("ko") {
            Language::Ko
        } else if c.starts_with("es") {
            Language::Es
        } else {
            Language::En
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Language::Ko => "ko",
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

/// 런타임 언어 번들을 제공한다.
#[derive(Debug, Clone)]
pub struct Translator {
    lang: Language,
    overrides: Option<HashMap<String, String>>,
}

impl Translator {
    /// 언어 코드에 따라 번역기를 생성한다. 알 수 없는 코드는 en으로 폴백한다.
    pub fn new(lang_code: &str) -> Self {
        Self {
            lang: Language::from_code(lang_code),
            overrides: None,
        }
    }

    /// 언어 코드 + 언어팩 디렉터리(locales/ 등)를 받아서 번역기를 생성한다.
    /// 디렉터리가 없거나 파일이 없으면 내장 언어팩을 사용한다.
    pub fn new_with_pack(lang_code: &str, pack_dir: Option<&str>) -> Self {
        let overrides = pack_dir
            .and_then(|dir| load_overrides(dir, lang_code))
            .or_else(|| load_overrides("locales", lang_code))
            .or_else(|| built_in_pack(lang_code));
        Self {
            lang: Language::from_code(lang_code),
            overrides,
        }
    }

    pub fn language(&self) -> Language {
        self.lang
    }

    pub fn language_code(&self) -> &'static str {
        self.lang.as_code()
    }

    /// 키를 조회해 문자열을 반환한다. 언어팩에 없으면 None.
    pub fn lookup(&self, key: &str) -> Option<String> {
        self.overrides.as_ref().and_then(|m| m.get(key).cloned())
    }

    /// 번역을 가져온다. 언어팩 → 내장 문자열 → 영어 순으로 찾는다.
    pub fn t(&self, key: &str) -> String {
        if let Some(v) = self.lookup(key) {
            return v;
        }
        let built_in = match self.lang {
            Language::Ko => ko(key).or_else(|| en(key)),
            Language::En | Language::Es => en(key),
        };
        built_in.unwrap_or(key).to_string()
    }

    /// 번역 문자열의 `{name}` 자리에 값을 채운다.
    pub fn tf(&self, key: &str, vars: &[(&str, String)]) -> String {
        fill_template(&self.t(key), vars)
    }

    /// 수식 설명 문구. 언어팩에 `formulas.text`가 있으면 그것을 쓴다.
    pub fn formulas(&self) -> String {
        self.lookup(keys::FORMULAS_TEXT)
            .unwrap_or_else(|| FORMULAS_DEFAULT.to_string())
    }
}

/// `{name}` 자리표시자를 치환한다.
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> String {
    let mut out = template.to_string();
    for (k, v) in vars {
        out = out.replace(&format!("{{{k}}}"), v);
    }
    out
}

/// CLI 플래그/설정/시스템 순으로 언어 코드를 결정한다.
pub fn resolve_language(cli_arg: &str, config_lang: Option<&str>) -> String {
    normalize_lang(cli_arg)
        .or_else(|| config_lang.and_then(normalize_lang))
        .or_else(detect_system_language)
        .unwrap_or_else(|| "en-us".to_string())
}

fn normalize_lang(code: &str) -> Option<String> {
    let c = code.trim().to_lowercase();
    match c.as_str() {
        "ko" | "ko-kr" => Some("ko-kr".into()),
        "en" | "en-us" | "en-uk" => Some("en-us".into()),
        "es" | "es-mx" | "es-es" => Some("es-mx".into()),
        "auto" | "" => None,
        other if other.starts_with("ko") => Some("ko-kr".into()),
        other if other.starts_with("en") => Some("en-us".into()),
        other if other.starts_with("es") => Some("es-mx".into()),
        _ => None,
    }
}

fn normalize_locale_string(loc: &str) -> Option<String> {
    let lang = loc
        .split(['.', '_', '-'])
        .next()
        .unwrap_or_default()
        .to_lowercase();
    match lang.as_str() {
        "ko" => Some("ko-kr".into()),
        "en" => Some("en-us".into()),
        "es" => Some("es-mx".into()),
        _ => None,
    }
}

/// 시스템 로케일에서 언어를 추정한다.
pub fn detect_system_language() -> Option<String> {
    if let Some(lang) = get_locale().as_deref().and_then(normalize_locale_string) {
        return Some(lang);
    }
    ["LANG", "LC_ALL"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find_map(|v| normalize_locale_string(&v))
}

/// TOML 기반 언어팩을 로드한다. 형식: key = "value" 로 구성된 플랫 맵 또는 중첩 테이블.
fn load_overrides(dir: &str, lang: &str) -> Option<HashMap<String, String>> {
    let try_load = |code: &str| -> Option<HashMap<String, String>> {
        let path = Path::new(dir).join(format!("{code}.toml"));
        let content = fs::read_to_string(path).ok()?;
        parse_toml_to_map(&content)
    };

    // 1) full code (e.g., es-mx)
    if let Some(map) = try_load(lang) {
        return Some(map);
    }
    // 2) base code (e.g., es)
    if let Some((base, _)) = lang.split_once(['-', '_']) {
        if let Some(map) = try_load(base) {
            return Some(map);
        }
    }
    None
}

fn parse_toml_to_map(src: &str) -> Option<HashMap<String, String>> {
    let value: toml::Value = toml::from_str(src).ok()?;
    let table = value.as_table()?;
    let mut map = HashMap::new();

    fn walk(prefix: &str, val: &toml::Value, out: &mut HashMap<String, String>) {
        match val {
            toml::Value::String(s) => {
                out.insert(prefix.to_string(), s.to_string());
            }
            toml::Value::Table(t) => {
                for (k, v) in t {
                    let key = if prefix.is_empty() {
                        k.clone()
                    } else {
                        format!("{prefix}.{k}")
                    };
                    walk(&key, v, out);
                }
            }
            _ => {}
        }
    }

    for (k, v) in table {
        walk(k, v, &mut map);
    }

    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// 내장 언어팩(파일이 없어도 동작하도록 빌드 시 포함).
fn built_in_pack(lang: &str) -> Option<HashMap<String, String>> {
    match lang.to_lowercase().as_str() {
        "en-us" | "en" => parse_toml_to_map(include_str!("../locales/en-us.toml")),
        "ko-kr" | "ko" => parse_toml_to_map(include_str!("../locales/ko-kr.toml")),
        "es-mx" | "es" => parse_toml_to_map(include_str!("../locales/es-mx.toml")),
        _ => None,
    }
}

fn ko(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "오류",
        APP_EXIT => "프로그램을 종료합니다.",
        MAIN_MENU_TITLE => "\n=== Motor Derating Toolbox ===",
        MAIN_MENU_AMBIENT => "1) 주위온도 보정 (파란 블록)",
        MAIN_MENU_ALTITUDE => "2) 고도 보정 (주황 블록)",
        MAIN_MENU_UNIT_CONVERSION => "3) 동력 단위 변환",
        MAIN_MENU_LOAD_TABLES => "4) 기준표 불러오기",
        MAIN_MENU_FORMULAS => "5) 수식 보기",
        MAIN_MENU_SETTINGS => "6) 설정",
        MAIN_MENU_EXIT => "0) 종료",
        PROMPT_MENU_SELECT => "메뉴 선택: ",
        INVALID_SELECTION_RETRY => "잘못된 입력입니다. 다시 선택하세요.",
        AMBIENT_HEADING => "\n-- 주위온도 보정 --",
        ALTITUDE_HEADING => "\n-- 고도 보정 --",
        PROMPT_BASE_HP => "기준 마력 [HP]: ",
        PROMPT_AMBIENT => "주위온도 [°C]: ",
        PROMPT_ALTITUDE => "고도 [FASL/MASL]: ",
        NOTE_BLANK_INPUT => "빈 칸은 값 없음으로 처리합니다.",
        RESULT_BASE => "기준 정격: {hp} HP, {kw} kW, {w} W",
        RESULT_REQUIRED => "50 Hz 정격: 요구 {hp} HP, NEMA {size}",
        RESULT_ENVIRONMENT => "환경값: {value}",
        RESULT_LOAD => "부하율: {fraction}",
        RESULT_CORRECTED => "보정 정격: {hp} HP, {kw} kW, {w} W, NEMA {size}",
        RESULT_TOLERANCE => "허용오차(EC): {hp} HP, NEMA {size}",
        RESULT_RATING_50HZ => "50 Hz 정격: {hp} HP, NEMA {size}",
        RESULT_TOLERANCE_50HZ => "허용오차(EC+50Hz): {hp} HP, NEMA {size}",
        UNIT_CONVERSION_HEADING => "\n-- 동력 단위 변환 (hp, kW, W) --",
        UNIT_CONVERSION_PROMPT_VALUE => "값 입력: ",
        UNIT_CONVERSION_PROMPT_FROM_UNIT => "입력 단위(ex: hp): ",
        UNIT_CONVERSION_PROMPT_TO_UNIT => "변환 단위(ex: kW): ",
        UNIT_CONVERSION_RESULT => "변환 결과: {value} {unit}",
        LOAD_HEADING => "\n-- 기준표 불러오기 --",
        LOAD_PROMPT_PATH => "워크북 경로(엔터=현재값 {path}): ",
        LOAD_PROMPT_SHEET => "시트 이름(엔터=현재값 {sheet}): ",
        LOAD_FAILED => "불러오지 못했습니다. 기본 용량 목록과 빈 표를 사용합니다.",
        STATUS_NOT_LOADED => "기준표를 불러오지 않았습니다",
        STATUS_LOADED => "불러옴: {summary}",
        STATUS_LOAD_FAILED => "불러오지 못함: {error}",
        SETTINGS_HEADING => "\n-- 설정 --",
        SETTINGS_CURRENT_LANGUAGE => "현재 언어: {lang}",
        SETTINGS_OPTIONS => "1) 자동  2) English  3) 한국어  4) Español",
        SETTINGS_PROMPT_CHANGE => "변경할 번호(취소하려면 엔터): ",
        SETTINGS_INVALID => "잘못된 입력이므로 변경하지 않습니다.",
        SETTINGS_SAVED => "언어가 {lang} 로 설정되었습니다.",
        ERROR_INVALID_NUMBER => "숫자를 입력하세요.",
        _ => return None,
    })
}

fn en(key: &str) -> Option<&'static str> {
    use keys::*;
    Some(match key {
        ERROR_PREFIX => "Error",
        APP_EXIT => "Exiting application.",
        MAIN_MENU_TITLE => "\n=== Motor Derating Toolbox ===",
        MAIN_MENU_AMBIENT => "1) Ambient temperature derating (blue block)",
        MAIN_MENU_ALTITUDE => "2) Altitude derating (orange block)",
        MAIN_MENU_UNIT_CONVERSION => "3) Power unit conversion",
        MAIN_MENU_LOAD_TABLES => "4) Load reference tables",
        MAIN_MENU_FORMULAS => "5) Show formulas",
        MAIN_MENU_SETTINGS => "6) Settings",
        MAIN_MENU_EXIT => "0) Exit",
        PROMPT_MENU_SELECT => "Select menu: ",
        INVALID_SELECTION_RETRY => "Invalid input. Please choose again.",
        AMBIENT_HEADING => "\n-- Ambient temperature derating --",
        ALTITUDE_HEADING => "\n-- Altitude derating --",
        PROMPT_BASE_HP => "Base rating [HP]: ",
        PROMPT_AMBIENT => "Ambient temperature [°C]: ",
        PROMPT_ALTITUDE => "Altitude [FASL/MASL]: ",
        NOTE_BLANK_INPUT => "Leave a field empty to mean 'no value'.",
        RESULT_BASE => "Base rating: {hp} HP, {kw} kW, {w} W",
        RESULT_REQUIRED => "50 Hz rating: required {hp} HP, NEMA {size}",
        RESULT_ENVIRONMENT => "Environment value: {value}",
        RESULT_LOAD => "Load fraction: {fraction}",
        RESULT_CORRECTED => "New rating: {hp} HP, {kw} kW, {w} W, NEMA {size}",
        RESULT_TOLERANCE => "Tolerance (EC): {hp} HP, NEMA {size}",
        RESULT_RATING_50HZ => "50 Hz rating: {hp} HP, NEMA {size}",
        RESULT_TOLERANCE_50HZ => "Tolerance (EC+50Hz): {hp} HP, NEMA {size}",
        UNIT_CONVERSION_HEADING => "\n-- Power unit conversion (hp, kW, W) --",
        UNIT_CONVERSION_PROMPT_VALUE => "Value: ",
        UNIT_CONVERSION_PROMPT_FROM_UNIT => "From unit (ex: hp): ",
        UNIT_CONVERSION_PROMPT_TO_UNIT => "To unit (ex: kW): ",
        UNIT_CONVERSION_RESULT => "Result: {value} {unit}",
        LOAD_HEADING => "\n-- Load reference tables --",
        LOAD_PROMPT_PATH => "Workbook path (Enter keeps {path}): ",
        LOAD_PROMPT_SHEET => "Sheet name (Enter keeps {sheet}): ",
        LOAD_FAILED => "Load failed. Using the default size list and empty tables.",
        STATUS_NOT_LOADED => "Tables not loaded",
        STATUS_LOADED => "Loaded: {summary}",
        STATUS_LOAD_FAILED => "Could not load: {error}",
        SETTINGS_HEADING => "\n-- Settings --",
        SETTINGS_CURRENT_LANGUAGE => "Current language: {lang}",
        SETTINGS_OPTIONS => "1) Auto  2) English  3) 한국어  4) Español",
        SETTINGS_PROMPT_CHANGE => "Number to change (Enter to cancel): ",
        SETTINGS_INVALID => "Invalid input; keeping current setting.",
        SETTINGS_SAVED => "Language set to {lang}.",
        ERROR_INVALID_NUMBER => "Please enter a number.",
        _ => return None,
    })
}

/// 수식 설명 기본 문구.
pub const FORMULAS_DEFAULT: &str = "\
Blue block (ambient):
  I3 = I2 / 1.341
  I4 = I3 * 1000
  L2 = I2 * 1.15
  L3 = NEMA(L2)
  U2 = VLOOKUP(Q2, A4:B22) / 100
  Y2 = I2 / U2
  Y3 = Y2 / 1.341
  Y4 = Y3 * 1000

Orange block (altitude):
  I9 = I8 / 1.341
  I10 = I9 * 1000
  L8 = I8 * 1.15
  L9 = NEMA(L8)
  U8 = VLOOKUP(Q8, R3:S14) / 100
  Y8 = I8 / U8
  AB8 = Y8 * 0.94
  AE8 = Y8 * 1.15
  AH8 = AE8 * 0.94

NEMA(x): smallest standard size (H3:H30) >= x; exact match only for VLOOKUP.";
