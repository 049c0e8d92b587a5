//! CSV 워크북 로딩과 세션 재로딩 테스트.
use std::fs;
use std::path::{Path, PathBuf};

use motor_derating_toolbox::{
    derating::Pipeline,
    i18n::Translator,
    loader::{load_reference_data, DataSource, LoadError, SheetRange, SheetRanges},
    reference_data::DEFAULT_STANDARD_SIZES,
    session::{LoadStatus, Session},
};

/// 테스트마다 고유한 임시 디렉터리.
fn temp_workbook(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "motor_derating_{name}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

/// 작은 시트: A1:B5 주위온도, D1:E3 고도, G1:G4 표준 용량.
const SMALL_SHEET: &str = "\
temp,pct,,alt,pct,,size
30,100,,1000,100,,5
40,100,,2000,95,,10
50,80,,,,,20
55,n/a,,,,,
";

fn small_ranges() -> SheetRanges {
    SheetRanges {
        ambient: SheetRange::parse("A1:B5").unwrap(),
        altitude: SheetRange::parse("D1:E3").unwrap(),
        sizes: SheetRange::parse("G1:G5").unwrap(),
    }
}

#[test]
fn reads_tables_from_sheet_directory() {
    let dir = temp_workbook("dir");
    fs::write(dir.join("cm electrico.csv"), SMALL_SHEET).unwrap();
    let source = DataSource {
        path: dir.clone(),
        sheet: "cm electrico".into(),
    };
    let data = load_reference_data(&source, &small_ranges()).unwrap();
    // 머리글 행과 숫자가 아닌 행은 건너뛴다.
    assert_eq!(data.ambient.len(), 3);
    assert_eq!(data.ambient.percentage(50.0), Some(80.0));
    assert_eq!(data.ambient.percentage(55.0), None);
    assert_eq!(data.altitude.len(), 2);
    assert_eq!(data.standard_sizes.as_slice(), &[5.0, 10.0, 20.0]);
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn sheet_name_falls_back_to_case_insensitive_match() {
    let dir = temp_workbook("case");
    fs::write(dir.join("CM Electrico.csv"), SMALL_SHEET).unwrap();
    let source = DataSource {
        path: dir.clone(),
        sheet: "cm electrico".into(),
    };
    assert!(load_reference_data(&source, &small_ranges()).is_ok());
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn single_csv_file_is_the_sheet() {
    let dir = temp_workbook("file");
    let file = dir.join("tables.csv");
    fs::write(&file, SMALL_SHEET).unwrap();
    let source = DataSource {
        path: file,
        sheet: "ignored".into(),
    };
    let data = load_reference_data(&source, &small_ranges()).unwrap();
    assert_eq!(data.altitude.percentage(2000.0), Some(95.0));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn missing_source_and_sheet_are_reported() {
    let dir = temp_workbook("missing");
    let missing = DataSource {
        path: dir.join("nope"),
        sheet: "cm electrico".into(),
    };
    assert!(matches!(
        load_reference_data(&missing, &small_ranges()),
        Err(LoadError::SourceNotFound(_))
    ));

    fs::write(dir.join("other.csv"), SMALL_SHEET).unwrap();
    let wrong_sheet = DataSource {
        path: dir.clone(),
        sheet: "cm electrico".into(),
    };
    match load_reference_data(&wrong_sheet, &small_ranges()) {
        Err(LoadError::SheetNotFound { sheet, available }) => {
            assert_eq!(sheet, "cm electrico");
            assert_eq!(available, vec!["other".to_string()]);
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn sheet_without_numeric_rows_is_rejected() {
    let dir = temp_workbook("empty");
    fs::write(dir.join("s.csv"), "a,b\nx,y\n").unwrap();
    let source = DataSource {
        path: dir.clone(),
        sheet: "s".into(),
    };
    assert!(matches!(
        load_reference_data(&source, &small_ranges()),
        Err(LoadError::NoUsableRows(_))
    ));
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn empty_size_column_uses_default_list() {
    let dir = temp_workbook("sizes");
    fs::write(dir.join("s.csv"), "30,100\n40,90\n").unwrap();
    let source = DataSource {
        path: dir.clone(),
        sheet: "s".into(),
    };
    let data = load_reference_data(&source, &small_ranges()).unwrap();
    assert!(data.altitude.is_empty());
    assert_eq!(data.standard_sizes.as_slice(), &DEFAULT_STANDARD_SIZES[..]);
    let _ = fs::remove_dir_all(dir);
}

fn fixture_workbook() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/reference_tables.xlsx")
}

#[test]
fn reads_default_ranges_from_excel_workbook() {
    // 시트 "CM Electrico": A4:B7 주위온도, R3:S4 고도, H3:H5 표준 용량.
    let source = DataSource {
        path: fixture_workbook(),
        sheet: "cm electrico".into(),
    };
    let data = load_reference_data(&source, &SheetRanges::default()).unwrap();
    assert_eq!(data.ambient.len(), 3);
    assert_eq!(data.ambient.percentage(50.0), Some(80.0));
    assert_eq!(data.altitude.len(), 2);
    assert_eq!(data.altitude.percentage(2000.0), Some(95.0));
    assert_eq!(data.standard_sizes.as_slice(), &[5.0, 10.0, 20.0]);
}

#[test]
fn excel_workbook_reports_missing_sheet() {
    let source = DataSource {
        path: fixture_workbook(),
        sheet: "hoja1".into(),
    };
    match load_reference_data(&source, &SheetRanges::default()) {
        Err(LoadError::SheetNotFound { sheet, available }) => {
            assert_eq!(sheet, "hoja1");
            assert_eq!(available, vec!["Resumen".to_string(), "CM Electrico".to_string()]);
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

#[test]
fn excel_sheet_without_table_rows_is_rejected() {
    let source = DataSource {
        path: fixture_workbook(),
        sheet: "Resumen".into(),
    };
    assert!(matches!(
        load_reference_data(&source, &SheetRanges::default()),
        Err(LoadError::NoUsableRows(_))
    ));
}

#[test]
fn failed_reload_switches_session_to_fallback() {
    let dir = temp_workbook("session");
    fs::write(dir.join("cm electrico.csv"), SMALL_SHEET).unwrap();
    let mut session = Session::new(small_ranges());
    assert_eq!(session.status(), &LoadStatus::NotLoaded);

    let good = DataSource {
        path: dir.clone(),
        sheet: "cm electrico".into(),
    };
    session.reload(&good).unwrap();
    let en = Translator::new("en-us");
    assert_eq!(
        session.status().message(&en),
        "Loaded: A1:B5(3), D1:E3(2), sizes(3)"
    );
    let before = session.snapshot();
    let r = session.calculate(Pipeline::Ambient, "10", "50").unwrap();
    assert_eq!(r.corrected_size.to_string(), "20");

    let bad = DataSource {
        path: dir.join("gone"),
        sheet: "cm electrico".into(),
    };
    assert!(session.reload(&bad).is_err());
    assert!(matches!(session.status(), LoadStatus::Fallback(_)));
    assert!(session.status().message(&en).starts_with("Could not load: "));
    assert!(session.data().ambient.is_empty());
    assert_eq!(session.data().standard_sizes.len(), 28);
    // 이전 스냅샷은 그대로 남는다.
    assert_eq!(before.ambient.len(), 3);

    let r = session.calculate(Pipeline::Ambient, "10", "50").unwrap();
    assert!(r.corrected_hp.is_blank());
    assert_eq!(r.required_size.to_string(), "15");
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn status_line_follows_language() {
    let session = Session::default();
    assert_eq!(
        session.status().message(&Translator::new("en-us")),
        "Tables not loaded"
    );
    assert_eq!(
        session.status().message(&Translator::new_with_pack("es-mx", None)),
        "Tablas no cargadas"
    );

    let failed = LoadStatus::Fallback("gone".into());
    assert_eq!(
        failed.message(&Translator::new_with_pack("es-mx", None)),
        "No se pudo cargar: gone"
    );
    assert_eq!(failed.message(&Translator::new("ko-kr")), "불러오지 못함: gone");
}
