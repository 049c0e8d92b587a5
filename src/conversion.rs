use thiserror::Error;

use crate::units::{convert_power, PowerUnit};

/// 단위 변환 시 발생 가능한 오류.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// 알 수 없는 단위 문자열
    #[error("알 수 없는 단위: {0}")]
    UnknownUnit(String),
}

/// 문자열로 전달된 단위명을 enum으로 변환한 뒤 지정된 단위로 환산한다.
///
/// 단위 문자열은 `hp`, `kW`, `W` 등을 사용할 수 있다. 대소문자는 구분하지 않는다.
pub fn convert_power_str(
    value: f64,
    from_unit_str: &str,
    to_unit_str: &str,
) -> Result<f64, ConversionError> {
    let from = parse_power_unit(from_unit_str)?;
    let to = parse_power_unit(to_unit_str)?;
    Ok(convert_power(value, from, to))
}

/// 단위 문자열을 [`PowerUnit`]으로 해석한다.
pub fn parse_power_unit(s: &str) -> Result<PowerUnit, ConversionError> {
    match s.trim().to_lowercase().as_str() {
        "hp" | "horsepower" => Ok(PowerUnit::Horsepower),
        "kw" | "kilowatt" => Ok(PowerUnit::Kilowatt),
        "w" | "watt" => Ok(PowerUnit::Watt),
        _ => Err(ConversionError::UnknownUnit(s.to_string())),
    }
}
