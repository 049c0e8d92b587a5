use std::io::{self, Write};
use std::path::PathBuf;

use crate::app::AppError;
use crate::config::Config;
use crate::conversion;
use crate::derating::{DeratingResult, Pipeline};
use crate::format::{format_field_with, format_number, FRACTION_DECIMALS};
use crate::i18n::{self, keys, Translator};
use crate::session::Session;

/// 메인 메뉴 선택지를 표현한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Ambient,
    Altitude,
    UnitConversion,
    LoadTables,
    Formulas,
    Settings,
    Exit,
}

/// 메인 메뉴를 표시하고 선택값을 반환한다.
pub fn main_menu(tr: &Translator) -> Result<MenuChoice, AppError> {
    for key in [
        keys::MAIN_MENU_TITLE,
        keys::MAIN_MENU_AMBIENT,
        keys::MAIN_MENU_ALTITUDE,
        keys::MAIN_MENU_UNIT_CONVERSION,
        keys::MAIN_MENU_LOAD_TABLES,
        keys::MAIN_MENU_FORMULAS,
        keys::MAIN_MENU_SETTINGS,
        keys::MAIN_MENU_EXIT,
    ] {
        println!("{}", tr.t(key));
    }
    loop {
        let sel = read_line(&tr.t(keys::PROMPT_MENU_SELECT))?;
        // 표준입력이 닫히면(EOF) 종료로 처리
        if sel.is_empty() {
            return Ok(MenuChoice::Exit);
        }
        match sel.trim() {
            "1" => return Ok(MenuChoice::Ambient),
            "2" => return Ok(MenuChoice::Altitude),
            "3" => return Ok(MenuChoice::UnitConversion),
            "4" => return Ok(MenuChoice::LoadTables),
            "5" => return Ok(MenuChoice::Formulas),
            "6" => return Ok(MenuChoice::Settings),
            "0" => return Ok(MenuChoice::Exit),
            _ => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

/// 보정 계산 메뉴를 처리한다. 숫자가 아닌 입력은 오류만 보여주고 계산하지 않는다.
pub fn handle_derating(
    tr: &Translator,
    session: &Session,
    pipeline: Pipeline,
) -> Result<(), AppError> {
    let (heading, env_prompt) = match pipeline {
        Pipeline::Ambient => (keys::AMBIENT_HEADING, keys::PROMPT_AMBIENT),
        Pipeline::Altitude => (keys::ALTITUDE_HEADING, keys::PROMPT_ALTITUDE),
    };
    println!("{}", tr.t(heading));
    println!("{}", tr.t(keys::NOTE_BLANK_INPUT));
    let hp_text = read_line(&tr.t(keys::PROMPT_BASE_HP))?;
    let env_text = read_line(&tr.t(env_prompt))?;
    match session.calculate(pipeline, &hp_text, &env_text) {
        Ok(result) => print_result(tr, &result),
        Err(err) => println!("{}: {err}", tr.t(keys::ERROR_PREFIX)),
    }
    Ok(())
}

/// 계산 결과를 화면 줄 단위 문자열로 만든다.
pub fn result_lines(tr: &Translator, result: &DeratingResult) -> Vec<String> {
    let mut lines = vec![
        tr.tf(
            keys::RESULT_BASE,
            &[
                ("hp", result.base_hp.to_string()),
                ("kw", result.base_kw.to_string()),
                ("w", result.base_w.to_string()),
            ],
        ),
        tr.tf(
            keys::RESULT_REQUIRED,
            &[
                ("hp", result.required_hp.to_string()),
                ("size", result.required_size.to_string()),
            ],
        ),
        tr.tf(
            keys::RESULT_ENVIRONMENT,
            &[("value", result.environment.to_string())],
        ),
        tr.tf(
            keys::RESULT_LOAD,
            &[(
                "fraction",
                format_field_with(result.load_fraction, FRACTION_DECIMALS),
            )],
        ),
        tr.tf(
            keys::RESULT_CORRECTED,
            &[
                ("hp", result.corrected_hp.to_string()),
                ("kw", result.corrected_kw.to_string()),
                ("w", result.corrected_w.to_string()),
                ("size", result.corrected_size.to_string()),
            ],
        ),
    ];
    if let Some(chain) = &result.tolerances {
        for (key, hp, size) in [
            (keys::RESULT_TOLERANCE, chain.tolerance_hp, chain.tolerance_size),
            (keys::RESULT_RATING_50HZ, chain.rating_50hz_hp, chain.rating_50hz_size),
            (
                keys::RESULT_TOLERANCE_50HZ,
                chain.tolerance_50hz_hp,
                chain.tolerance_50hz_size,
            ),
        ] {
            lines.push(tr.tf(key, &[("hp", hp.to_string()), ("size", size.to_string())]));
        }
    }
    lines
}

pub fn print_result(tr: &Translator, result: &DeratingResult) {
    for line in result_lines(tr, result) {
        println!("{line}");
    }
}

/// 동력 단위 변환 메뉴를 처리한다.
pub fn handle_unit_conversion(tr: &Translator) -> Result<(), AppError> {
    println!("{}", tr.t(keys::UNIT_CONVERSION_HEADING));
    let value = read_f64(tr, &tr.t(keys::UNIT_CONVERSION_PROMPT_VALUE))?;
    let from_unit = read_line(&tr.t(keys::UNIT_CONVERSION_PROMPT_FROM_UNIT))?;
    let to_unit = read_line(&tr.t(keys::UNIT_CONVERSION_PROMPT_TO_UNIT))?;
    let result = conversion::convert_power_str(value, from_unit.trim(), to_unit.trim())?;
    println!(
        "{}",
        tr.tf(
            keys::UNIT_CONVERSION_RESULT,
            &[
                ("value", format_number(result, 4)),
                (
                    "unit",
                    conversion::parse_power_unit(&to_unit)?.symbol().to_string(),
                ),
            ],
        )
    );
    Ok(())
}

/// 기준표 불러오기 메뉴를 처리한다. 입력한 경로/시트는 설정에 반영한다.
pub fn handle_load_tables(
    tr: &Translator,
    cfg: &mut Config,
    session: &mut Session,
) -> Result<(), AppError> {
    println!("{}", tr.t(keys::LOAD_HEADING));
    let path = read_line(&tr.tf(
        keys::LOAD_PROMPT_PATH,
        &[("path", cfg.data_source.path.display().to_string())],
    ))?;
    if !path.trim().is_empty() {
        cfg.data_source.path = PathBuf::from(path.trim());
    }
    let sheet = read_line(&tr.tf(
        keys::LOAD_PROMPT_SHEET,
        &[("sheet", cfg.data_source.sheet.clone())],
    ))?;
    if !sheet.trim().is_empty() {
        cfg.data_source.sheet = sheet.trim().to_string();
    }
    if session.reload(&cfg.data_source.to_source()).is_err() {
        println!("{}", tr.t(keys::LOAD_FAILED));
    }
    println!("{}", session.status().message(tr));
    Ok(())
}

/// 설정 메뉴를 처리한다. 언어를 바꾸면 번역기도 즉시 교체한다.
pub fn handle_settings(tr: &mut Translator, cfg: &mut Config) -> Result<(), AppError> {
    println!("{}", tr.t(keys::SETTINGS_HEADING));
    println!(
        "{}",
        tr.tf(
            keys::SETTINGS_CURRENT_LANGUAGE,
            &[("lang", cfg.language.clone())],
        )
    );
    println!("{}", tr.t(keys::SETTINGS_OPTIONS));
    let sel = read_line(&tr.t(keys::SETTINGS_PROMPT_CHANGE))?;
    if sel.trim().is_empty() {
        return Ok(());
    }
    let lang = match sel.trim() {
        "1" => "auto",
        "2" => "en-us",
        "3" => "ko-kr",
        "4" => "es-mx",
        _ => {
            println!("{}", tr.t(keys::SETTINGS_INVALID));
            return Ok(());
        }
    };
    cfg.language = lang.to_string();
    let resolved = i18n::resolve_language(lang, None);
    *tr = Translator::new_with_pack(&resolved, cfg.language_pack_dir.as_deref());
    println!(
        "{}",
        tr.tf(keys::SETTINGS_SAVED, &[("lang", cfg.language.clone())])
    );
    Ok(())
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf)?;
    Ok(buf)
}

fn read_f64(tr: &Translator, prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        if s.is_empty() {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derating::{run_pipeline, CalculationInput};
    use crate::reference_data::{LookupTable, ReferenceData};

    fn data() -> ReferenceData {
        ReferenceData {
            ambient: LookupTable::from_pairs([(50.0, 80.0)]),
            altitude: LookupTable::from_pairs([(1000.0, 100.0)]),
            ..ReferenceData::default()
        }
    }

    #[test]
    fn ambient_result_has_no_tolerance_lines() {
        let tr = Translator::new("en-us");
        let input = CalculationInput {
            base_hp: Some(10.0),
            env_value: Some(50.0),
        };
        let lines = result_lines(&tr, &run_pipeline(Pipeline::Ambient, input, &data()));
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "Load fraction: 0.8");
        assert_eq!(lines[4], "New rating: 12.5 HP, 9.32 kW, 9321.4 W, NEMA 15");
    }

    #[test]
    fn altitude_result_lists_tolerances() {
        let tr = Translator::new("en-us");
        let input = CalculationInput {
            base_hp: Some(100.0),
            env_value: Some(1000.0),
        };
        let lines = result_lines(&tr, &run_pipeline(Pipeline::Altitude, input, &data()));
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[5], "Tolerance (EC): 94 HP, NEMA 100");
        assert_eq!(lines[7], "Tolerance (EC+50Hz): 108.1 HP, NEMA 125");
    }
}
