use std::fmt;

use crate::derating::Field;
use crate::format::format_number;
use crate::reference_data::StandardSizeList;

/// 목록이 비어 있을 때의 초과 표기.
const FALLBACK_OVERFLOW_TEXT: &str = ">800 HP";

/// 표준 용량 선정 결과.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StandardSize {
    /// 입력이 없거나 0 이하
    #[default]
    Blank,
    /// 목표값 이상인 가장 작은 표준 용량
    Size(f64),
    /// 목록 최댓값을 넘어섬. 값은 목록의 최댓값
    Exceeds(f64),
}

impl StandardSize {
    pub fn is_blank(&self) -> bool {
        matches!(self, StandardSize::Blank)
    }

    pub fn size(&self) -> Option<f64> {
        match self {
            StandardSize::Size(s) => Some(*s),
            _ => None,
        }
    }
}

impl fmt::Display for StandardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StandardSize::Blank => f.write_str(crate::format::BLANK),
            StandardSize::Size(s) => f.write_str(&format_number(*s, 2)),
            StandardSize::Exceeds(max) if max.is_finite() => {
                write!(f, ">{} HP", format_number(max.trunc(), 0))
            }
            StandardSize::Exceeds(_) => f.write_str(FALLBACK_OVERFLOW_TEXT),
        }
    }
}

/// 목표 마력 이상인 가장 작은 표준 용량을 고른다.
///
/// 목표와 같은 용량이 있으면 그 용량을 그대로 고른다. 최댓값과 같아도 초과가 아니다.
pub fn select_standard_size(target: Field, sizes: &StandardSizeList) -> StandardSize {
    let target = match target {
        Field::Number(v) if v > 0.0 => v,
        _ => return StandardSize::Blank,
    };
    match sizes.as_slice().iter().find(|s| target <= **s) {
        Some(s) => StandardSize::Size(*s),
        None => StandardSize::Exceeds(sizes.max().unwrap_or(f64::NAN)),
    }
}
