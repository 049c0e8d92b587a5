//! 화면 입력 문자열을 숫자로 해석한다.
//!
//! 빈 칸은 오류가 아니라 "값 없음"이다. 숫자가 아닌 문자열은 계산 전에 오류로 돌려준다.

use thiserror::Error;

use crate::derating::{CalculationInput, Pipeline};

/// 입력 검증 오류.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// 숫자로 해석할 수 없는 문자열
    #[error("{field} 값은 숫자여야 합니다: '{text}'")]
    NotNumeric { field: &'static str, text: String },
    /// inf, NaN 등 유한하지 않은 값
    #[error("{field} 값이 유한한 숫자가 아닙니다: '{text}'")]
    NotFinite { field: &'static str, text: String },
}

impl InputError {
    /// 오류가 난 입력 칸 이름.
    pub fn field(&self) -> &'static str {
        match self {
            InputError::NotNumeric { field, .. } | InputError::NotFinite { field, .. } => field,
        }
    }
}

/// 입력 칸 하나를 해석한다. 공백뿐이면 `Ok(None)`.
pub fn parse_optional(field: &'static str, text: &str) -> Result<Option<f64>, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let value: f64 = trimmed.parse().map_err(|_| InputError::NotNumeric {
        field,
        text: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(InputError::NotFinite {
            field,
            text: trimmed.to_string(),
        });
    }
    Ok(Some(value))
}

/// 입력 칸 이름. 오류 메시지에 쓴다.
pub fn field_names(pipeline: Pipeline) -> (&'static str, &'static str) {
    match pipeline {
        Pipeline::Ambient => ("HP (I2)", "Ambient °C (Q2)"),
        Pipeline::Altitude => ("HP (I8)", "FASL/MASL (Q8)"),
    }
}

/// 기준 마력·환경값 문자열 두 개를 계산 입력으로 만든다.
///
/// 마력 칸을 먼저 검사하므로 둘 다 잘못되면 마력 칸 오류가 반환된다.
pub fn parse_calculation_input(
    pipeline: Pipeline,
    hp_text: &str,
    env_text: &str,
) -> Result<CalculationInput, InputError> {
    let (hp_field, env_field) = field_names(pipeline);
    let base_hp = parse_optional(hp_field, hp_text)?;
    let env_value = parse_optional(env_field, env_text)?;
    Ok(CalculationInput { base_hp, env_value })
}
