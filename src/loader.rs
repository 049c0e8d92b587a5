//! 워크북에서 부하율 조회표와 표준 용량 목록을 읽는다.
//!
//! 워크북은 다음 중 하나다.
//! - Excel 파일(`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`). 시트는 이름으로 찾는다
//! - `<시트명>.csv` 파일을 담은 디렉터리
//! - CSV 파일 하나(그 자체가 시트)
//!
//! 셀 주소는 스프레드시트와 같다. 열은 `A`, `R`, `AB`처럼 문자로, 행은 1부터 센다.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::reference_data::{LookupTable, ReferenceData, StandardSizeList};

/// 셀 범위 문자열 해석 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("잘못된 셀 주소: '{0}'")]
    InvalidCell(String),
    #[error("잘못된 범위: '{0}' (예: A4:B22)")]
    InvalidRange(String),
}

/// 기준 데이터 로딩 오류.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("파일을 찾을 수 없습니다: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("시트 '{sheet}'가 없습니다. 시트 목록: {available:?}")]
    SheetNotFound {
        sheet: String,
        available: Vec<String>,
    },
    #[error("시트 '{0}'에서 사용할 수 있는 행이 없습니다")]
    NoUsableRows(String),
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV 읽기 오류: {0}")]
    Csv(#[from] csv::Error),
    #[error("워크북 읽기 오류: {0}")]
    Workbook(#[from] calamine::Error),
}

/// Excel 계열로 취급하는 확장자.
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// `A4:B22` 형태의 직사각형 셀 범위. 열 번호는 0부터, 행 번호는 1부터다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SheetRange {
    pub first_col: usize,
    pub last_col: usize,
    pub first_row: usize,
    pub last_row: usize,
}

impl SheetRange {
    pub const fn new(first_col: usize, first_row: usize, last_col: usize, last_row: usize) -> Self {
        Self {
            first_col,
            last_col,
            first_row,
            last_row,
        }
    }

    /// `A4:B22` 또는 `H3:H30`을 해석한다. 시작이 끝보다 크면 오류.
    pub fn parse(s: &str) -> Result<Self, RangeError> {
        let (start, end) = s
            .trim()
            .split_once(':')
            .ok_or_else(|| RangeError::InvalidRange(s.to_string()))?;
        let (first_col, first_row) = parse_cell(start)?;
        let (last_col, last_row) = parse_cell(end)?;
        if first_col > last_col || first_row > last_row {
            return Err(RangeError::InvalidRange(s.to_string()));
        }
        Ok(Self::new(first_col, first_row, last_col, last_row))
    }

    /// 범위의 행 번호. 시트에 실제로 있는 행(`height`)까지만 돈다.
    fn rows_within(&self, height: usize) -> std::ops::RangeInclusive<usize> {
        self.first_row..=self.last_row.min(height)
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}:{}{}",
            column_name(self.first_col),
            self.first_row,
            column_name(self.last_col),
            self.last_row
        )
    }
}

impl TryFrom<String> for SheetRange {
    type Error = RangeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SheetRange::parse(&value)
    }
}

impl From<SheetRange> for String {
    fn from(value: SheetRange) -> Self {
        value.to_string()
    }
}

/// 셀 주소 `AB12` → (열 번호 0부터, 행 번호 1부터)
fn parse_cell(cell: &str) -> Result<(usize, usize), RangeError> {
    let cell = cell.trim();
    let invalid = || RangeError::InvalidCell(cell.to_string());
    let split = cell
        .find(|c: char| c.is_ascii_digit())
        .ok_or_else(invalid)?;
    let (letters, digits) = cell.split_at(split);
    if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(invalid());
    }
    let col = letters
        .chars()
        .try_fold(0usize, |acc, c| {
            acc.checked_mul(26)?
                .checked_add(c.to_ascii_uppercase() as usize - 'A' as usize + 1)
        })
        .ok_or_else(invalid)?
        - 1;
    let row: usize = digits.parse().map_err(|_| invalid())?;
    if row == 0 {
        return Err(invalid());
    }
    Ok((col, row))
}

/// 열 번호(0부터)를 `A`, `Z`, `AA` 형태로 바꾼다.
pub fn column_name(mut col: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// 워크시트에서 읽을 세 범위.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRanges {
    /// 주위온도 → 부하율. 첫 열이 키, 마지막 열이 값
    pub ambient: SheetRange,
    /// 고도 → 부하율
    pub altitude: SheetRange,
    /// 표준 용량. 첫 열만 사용
    pub sizes: SheetRange,
}

impl Default for SheetRanges {
    fn default() -> Self {
        Self {
            // A4:B22
            ambient: SheetRange::new(0, 4, 1, 22),
            // R3:S14
            altitude: SheetRange::new(17, 3, 18, 14),
            // H3:H30
            sizes: SheetRange::new(7, 3, 7, 30),
        }
    }
}

/// 데이터 위치: 워크북 경로와 시트 이름.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSource {
    pub path: PathBuf,
    pub sheet: String,
}

/// 시트 한 장을 메모리에 올린 것. 행 단위 문자열 셀.
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    rows: Vec<Vec<String>>,
}

impl Sheet {
    /// CSV 본문으로부터 시트를 만든다. 머리글 행은 없다고 가정한다.
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, LoadError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(|c| c.to_string()).collect());
        }
        Ok(Self { rows })
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let file = fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Excel 시트 범위로부터 시트를 만든다. 범위가 A1에서 시작하지 않아도 셀 주소는 그대로 유지된다.
    pub fn from_range(range: &Range<Data>) -> Self {
        let (row0, col0) = range
            .start()
            .map(|(r, c)| (r as usize, c as usize))
            .unwrap_or_default();
        let mut rows: Vec<Vec<String>> = Vec::new();
        for (r, c, value) in range.used_cells() {
            let (row, col) = (row0 + r, col0 + c);
            if rows.len() <= row {
                rows.resize_with(row + 1, Vec::new);
            }
            let cells = &mut rows[row];
            if cells.len() <= col {
                cells.resize(col + 1, String::new());
            }
            cells[col] = cell_text(value);
        }
        Self { rows }
    }

    /// 시트의 행 수.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// (행 1부터, 열 0부터) 위치의 셀 문자열.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row.checked_sub(1)?)
            .and_then(|r| r.get(col))
            .map(String::as_str)
    }

    /// 셀을 숫자로 읽는다. 비었거나 숫자가 아니면 `None`.
    pub fn number(&self, row: usize, col: usize) -> Option<f64> {
        let text = self.cell(row, col)?.trim();
        if text.is_empty() {
            return None;
        }
        text.parse::<f64>().ok().filter(|v| !v.is_nan())
    }
}

/// 수식 셀은 저장된 계산값을 쓴다.
fn cell_text(value: &Data) -> String {
    match value {
        Data::String(s) => s.clone(),
        Data::Empty | Data::Error(_) | Data::Bool(_) => String::new(),
        other => other.as_f64().map(|v| v.to_string()).unwrap_or_default(),
    }
}

/// 두 열(키, 값)을 조회표로 읽는다. 어느 한쪽이라도 숫자가 아닌 행은 건너뛴다.
pub fn read_lookup_table(sheet: &Sheet, range: SheetRange) -> LookupTable {
    LookupTable::from_pairs(range.rows_within(sheet.height()).filter_map(|row| {
        let key = sheet.number(row, range.first_col)?;
        let value = sheet.number(row, range.last_col)?;
        Some((key, value))
    }))
}

/// 한 열을 표준 용량 목록으로 읽는다. 쓸 만한 값이 없으면 기본 목록.
pub fn read_standard_sizes(sheet: &Sheet, range: SheetRange) -> StandardSizeList {
    let values = range
        .rows_within(sheet.height())
        .filter_map(|row| sheet.number(row, range.first_col));
    StandardSizeList::new(values).unwrap_or_default()
}

/// 시트 이름을 고른다. 정확히 같은 이름이 없으면 대소문자를 무시하고 다시 찾는다.
fn match_sheet_name<'a>(available: &'a [String], wanted: &str) -> Option<&'a str> {
    let wanted = wanted.trim();
    available
        .iter()
        .find(|name| name.as_str() == wanted)
        .or_else(|| available.iter().find(|name| name.to_lowercase() == wanted.to_lowercase()))
        .map(String::as_str)
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| WORKBOOK_EXTENSIONS.iter().any(|w| e.eq_ignore_ascii_case(w)))
}

/// CSV 경로와 시트 이름으로 시트 파일을 찾는다.
///
/// 경로가 파일이면 그 파일이 곧 시트다. 디렉터리면 `<시트>.csv`를 찾는다.
pub fn resolve_sheet(source: &DataSource) -> Result<PathBuf, LoadError> {
    let path = &source.path;
    if !path.exists() {
        return Err(LoadError::SourceNotFound(path.clone()));
    }
    if path.is_file() {
        return Ok(path.clone());
    }

    let mut available = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry_path = entry?.path();
        let is_csv = entry_path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        if let Some(stem) = entry_path.file_stem().and_then(|s| s.to_str()) {
            available.push(stem.to_string());
        }
    }
    available.sort();

    match match_sheet_name(&available, &source.sheet) {
        Some(name) => Ok(path.join(format!("{name}.csv"))),
        None => Err(LoadError::SheetNotFound {
            sheet: source.sheet.trim().to_string(),
            available,
        }),
    }
}

/// Excel 워크북에서 이름으로 시트를 찾아 읽는다.
pub fn read_workbook_sheet(path: &Path, sheet: &str) -> Result<Sheet, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let available = workbook.sheet_names();
    let name = match_sheet_name(&available, sheet)
        .map(str::to_string)
        .ok_or_else(|| LoadError::SheetNotFound {
            sheet: sheet.trim().to_string(),
            available: available.clone(),
        })?;
    debug!(path = %path.display(), sheet = %name, "reading workbook sheet");
    let range = workbook.worksheet_range(&name)?;
    Ok(Sheet::from_range(&range))
}

/// 데이터 위치가 가리키는 시트를 연다. Excel 파일이면 워크북에서, 아니면 CSV에서 읽는다.
pub fn open_sheet(source: &DataSource) -> Result<Sheet, LoadError> {
    let path = &source.path;
    if !path.exists() {
        return Err(LoadError::SourceNotFound(path.clone()));
    }
    if path.is_file() && is_workbook(path) {
        return read_workbook_sheet(path, &source.sheet);
    }
    let sheet_path = resolve_sheet(source)?;
    debug!(path = %sheet_path.display(), "reading sheet");
    Sheet::from_path(&sheet_path)
}

/// 워크북에서 기준 데이터 전체를 읽는다.
///
/// 두 조회표가 모두 비어 있으면 [`LoadError::NoUsableRows`].
pub fn load_reference_data(
    source: &DataSource,
    ranges: &SheetRanges,
) -> Result<ReferenceData, LoadError> {
    let sheet = open_sheet(source)?;

    let ambient = read_lookup_table(&sheet, ranges.ambient);
    let altitude = read_lookup_table(&sheet, ranges.altitude);
    if ambient.is_empty() && altitude.is_empty() {
        return Err(LoadError::NoUsableRows(source.sheet.clone()));
    }
    let standard_sizes = read_standard_sizes(&sheet, ranges.sizes);

    info!(
        ambient = ambient.len(),
        altitude = altitude.len(),
        sizes = standard_sizes.len(),
        "reference data loaded"
    );
    Ok(ReferenceData {
        ambient,
        altitude,
        standard_sizes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_column_range() {
        let r = SheetRange::parse("A4:B22").unwrap();
        assert_eq!(r, SheetRange::new(0, 4, 1, 22));
        assert_eq!(r.to_string(), "A4:B22");
    }

    #[test]
    fn parses_multi_letter_columns() {
        assert_eq!(parse_cell("AB8").unwrap(), (27, 8));
        assert_eq!(parse_cell("r3").unwrap(), (17, 3));
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
    }

    #[test]
    fn rejects_malformed_ranges() {
        assert!(SheetRange::parse("A4").is_err());
        assert!(SheetRange::parse("4A:B2").is_err());
        assert!(SheetRange::parse("A0:B2").is_err());
        assert!(SheetRange::parse("B22:A4").is_err());
    }

    #[test]
    fn overlong_column_is_an_error_not_a_panic() {
        assert_eq!(
            SheetRange::parse("AAAAAAAAAAAAAAA1:B2"),
            Err(RangeError::InvalidCell("AAAAAAAAAAAAAAA1".into()))
        );
        let src = "[ranges]\nambient = \"AAAAAAAAAAAAAAA1:B2\"\naltitude = \"R3:S14\"\nsizes = \"H3:H30\"\n";
        assert!(toml::from_str::<crate::config::Config>(src).is_err());
    }

    #[test]
    fn huge_row_bound_stops_at_sheet_end() {
        let range = SheetRange::parse("A1:B4000000000").unwrap();
        let sheet = Sheet::from_reader("30,100\n40,90\n".as_bytes()).unwrap();
        assert_eq!(range.rows_within(sheet.height()).count(), 2);
        let table = read_lookup_table(&sheet, range);
        assert_eq!(table.len(), 2);
        assert_eq!(table.percentage(40.0), Some(90.0));
    }

    #[test]
    fn sheet_name_match_prefers_exact_case() {
        let names = vec!["CM Electrico".to_string(), "cm electrico".to_string()];
        assert_eq!(match_sheet_name(&names, "cm electrico"), Some("cm electrico"));
        assert_eq!(match_sheet_name(&names[..1], "cm electrico"), Some("CM Electrico"));
        assert_eq!(match_sheet_name(&names, "hoja1"), None);
    }

    #[test]
    fn default_ranges_match_worksheet_layout() {
        let r = SheetRanges::default();
        assert_eq!(r.ambient.to_string(), "A4:B22");
        assert_eq!(r.altitude.to_string(), "R3:S14");
        assert_eq!(r.sizes.to_string(), "H3:H30");
    }
}
