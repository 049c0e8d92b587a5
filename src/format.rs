//! 계산 결과를 화면 문자열로 바꾸는 규칙.

use crate::derating::Field;

/// Blank 필드의 표시 문자열. "0"과 구별되도록 공백 한 칸을 쓴다.
pub const BLANK: &str = " ";

/// 일반 필드의 소수 자릿수
pub const DEFAULT_DECIMALS: usize = 2;
/// 부하율 필드의 소수 자릿수
pub const FRACTION_DECIMALS: usize = 3;

/// 소수 `decimals` 자리로 반올림한 뒤 끝의 0과 소수점을 지운다.
///
/// `7.50` → `7.5`, `12.00` → `12`
pub fn format_number(value: f64, decimals: usize) -> String {
    let s = format!("{value:.decimals$}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// 필드를 기본 자릿수로 표시한다.
pub fn format_field(field: Field) -> String {
    format_field_with(field, DEFAULT_DECIMALS)
}

pub fn format_field_with(field: Field, decimals: usize) -> String {
    match field {
        Field::Number(v) => format_number(v, decimals),
        Field::Blank => BLANK.to_string(),
    }
}
