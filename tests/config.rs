//! 설정 파일 저장/로드 테스트.
use std::fs;

use motor_derating_toolbox::{
    config::{load_from, Config, DEFAULT_SHEET},
    loader::SheetRange,
};

#[test]
fn config_round_trips_through_toml() {
    let path = std::env::temp_dir().join(format!("motor_derating_cfg_{}.toml", std::process::id()));
    let mut cfg = Config::default();
    cfg.language = "es-mx".into();
    cfg.data_source.path = "tables/book".into();
    cfg.data_source.sheet = "Hoja1".into();
    cfg.data_source.preload = false;
    cfg.ranges.altitude = SheetRange::parse("R3:S20").unwrap();
    cfg.save_to(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"R3:S20\""));

    let loaded = load_from(&path).unwrap();
    assert_eq!(loaded.language, "es-mx");
    assert_eq!(loaded.data_source.sheet, "Hoja1");
    assert!(!loaded.data_source.preload);
    assert_eq!(loaded.ranges.altitude.to_string(), "R3:S20");
    assert_eq!(loaded.ranges.ambient.to_string(), "A4:B22");
    let _ = fs::remove_file(path);
}

#[test]
fn partial_config_fills_defaults() {
    let cfg: Config = toml::from_str("language = \"ko-kr\"\n").unwrap();
    assert_eq!(cfg.language, "ko-kr");
    assert_eq!(cfg.data_source.sheet, DEFAULT_SHEET);
    assert!(cfg.data_source.preload);
    assert_eq!(cfg.ranges.sizes.to_string(), "H3:H30");
}

#[test]
fn malformed_range_is_a_config_error() {
    let src = "[ranges]\nambient = \"B22:A4\"\naltitude = \"R3:S14\"\nsizes = \"H3:H30\"\n";
    assert!(toml::from_str::<Config>(src).is_err());
}

#[test]
fn blank_sheet_name_uses_default_sheet() {
    let mut cfg = Config::default();
    cfg.data_source.sheet = "  ".into();
    assert_eq!(cfg.data_source.to_source().sheet, DEFAULT_SHEET);
}
