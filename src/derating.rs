//! 환경 조건(주위온도·고도)에 따른 모터 용량 보정 계산.
//!
//! 두 계산 흐름이 같은 기준 데이터와 표준 용량 선정을 공유한다.
//! - 주위온도(Ambient): 기준 마력 → 50 Hz 요구 마력 → 부하율 조회 → 보정 마력
//! - 고도(Altitude): 위와 같고, 보정 마력에서 허용오차 3단계를 추가로 계산
//!
//! 입력이 비었거나 조회에 실패한 필드와 그 하위 필드는 모두 Blank가 된다.

use std::fmt;

use tracing::debug;

use crate::format::format_field;
use crate::reference_data::{lookup_fraction, LookupTable, ReferenceData, StandardSizeList};
use crate::standard_size::{select_standard_size, StandardSize};
use crate::units::{to_kilowatts, to_watts};

/// 50 Hz 운전 여유율 (15%)
pub const SAFETY_MARGIN: f64 = 1.15;
/// 효율(EC) 허용오차 (6% 감액)
pub const TOLERANCE_FACTOR: f64 = 0.94;

/// 숫자 또는 Blank. Blank는 0이나 값 없음과 구별되는 "결과 없음" 표시다.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Field {
    Number(f64),
    #[default]
    Blank,
}

impl Field {
    pub fn number(&self) -> Option<f64> {
        match self {
            Field::Number(v) => Some(*v),
            Field::Blank => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Field::Blank)
    }

    /// 값이 있을 때만 `f`를 적용한다.
    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Field {
        match self {
            Field::Number(v) => Field::Number(f(v)),
            Field::Blank => Field::Blank,
        }
    }
}

impl From<Option<f64>> for Field {
    fn from(value: Option<f64>) -> Self {
        value.map(Field::Number).unwrap_or(Field::Blank)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_field(*self))
    }
}

/// 계산 흐름 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pipeline {
    /// 주위온도(°C) 기준. 워크시트의 파란 블록
    Ambient,
    /// 고도(FASL/MASL) 기준. 워크시트의 주황 블록
    Altitude,
}

impl Pipeline {
    /// 이 흐름이 사용하는 조회표.
    pub fn table<'a>(&self, data: &'a ReferenceData) -> &'a LookupTable {
        match self {
            Pipeline::Ambient => &data.ambient,
            Pipeline::Altitude => &data.altitude,
        }
    }

    pub fn has_tolerance_chain(&self) -> bool {
        matches!(self, Pipeline::Altitude)
    }
}

/// 한 번의 계산 입력.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalculationInput {
    /// 명판 마력(HP). 없으면 0과 같이 취급한다
    pub base_hp: Option<f64>,
    /// 주위온도 또는 고도
    pub env_value: Option<f64>,
}

/// 고도 흐름에서만 계산하는 허용오차 필드.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ToleranceChain {
    /// 효율 허용오차: 보정 마력 × 0.94
    pub tolerance_hp: Field,
    pub tolerance_size: StandardSize,
    /// 50 Hz 정격: 보정 마력 × 1.15
    pub rating_50hz_hp: Field,
    pub rating_50hz_size: StandardSize,
    /// 효율 허용오차 + 50 Hz: 50 Hz 정격 × 0.94
    pub tolerance_50hz_hp: Field,
    pub tolerance_50hz_size: StandardSize,
}

/// 계산 결과 레코드. 모든 필드는 매 호출마다 새로 계산된다.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeratingResult {
    pub base_hp: Field,
    pub base_kw: Field,
    pub base_w: Field,
    /// 입력된 환경값 표시용
    pub environment: Field,
    /// 50 Hz 요구 마력: 기준 마력 × 1.15
    pub required_hp: Field,
    pub required_size: StandardSize,
    /// 부하율(0~1)
    pub load_fraction: Field,
    /// 보정 마력: 기준 마력 / 부하율
    pub corrected_hp: Field,
    pub corrected_kw: Field,
    pub corrected_w: Field,
    pub corrected_size: StandardSize,
    /// 주위온도 흐름에서는 `None`
    pub tolerances: Option<ToleranceChain>,
}

/// 지정한 흐름으로 보정 계산을 수행한다.
pub fn run_pipeline(
    pipeline: Pipeline,
    input: CalculationInput,
    data: &ReferenceData,
) -> DeratingResult {
    let result = derate(
        input,
        pipeline.table(data),
        &data.standard_sizes,
        pipeline.has_tolerance_chain(),
    );
    debug!(
        ?pipeline,
        base_hp = ?input.base_hp,
        env_value = ?input.env_value,
        corrected_hp = ?result.corrected_hp.number(),
        "derating pipeline evaluated"
    );
    result
}

/// 조회표와 용량 목록을 직접 받아 계산한다.
pub fn derate(
    input: CalculationInput,
    table: &LookupTable,
    sizes: &StandardSizeList,
    with_tolerances: bool,
) -> DeratingResult {
    let base = match input.base_hp {
        Some(hp) if hp != 0.0 => Field::Number(hp),
        _ => Field::Blank,
    };

    let required_hp = base.map(|hp| hp * SAFETY_MARGIN);
    let load_fraction = lookup_fraction(input.env_value, table);

    // 부하율 0은 조회 실패와 같이 취급한다.
    let corrected_hp = match (base, load_fraction) {
        (Field::Number(hp), Field::Number(frac)) if frac != 0.0 => Field::Number(hp / frac),
        _ => Field::Blank,
    };

    let tolerances = with_tolerances.then(|| tolerance_chain(corrected_hp, sizes));

    DeratingResult {
        base_hp: base,
        base_kw: base.map(to_kilowatts),
        base_w: base.map(to_watts),
        environment: input.env_value.into(),
        required_hp,
        required_size: select_standard_size(required_hp, sizes),
        load_fraction,
        corrected_hp,
        corrected_kw: corrected_hp.map(to_kilowatts),
        corrected_w: corrected_hp.map(to_watts),
        corrected_size: select_standard_size(corrected_hp, sizes),
        tolerances,
    }
}

fn tolerance_chain(corrected_hp: Field, sizes: &StandardSizeList) -> ToleranceChain {
    let tolerance_hp = corrected_hp.map(|hp| hp * TOLERANCE_FACTOR);
    let rating_50hz_hp = corrected_hp.map(|hp| hp * SAFETY_MARGIN);
    let tolerance_50hz_hp = rating_50hz_hp.map(|hp| hp * TOLERANCE_FACTOR);
    ToleranceChain {
        tolerance_hp,
        tolerance_size: select_standard_size(tolerance_hp, sizes),
        rating_50hz_hp,
        rating_50hz_size: select_standard_size(rating_50hz_hp, sizes),
        tolerance_50hz_hp,
        tolerance_50hz_size: select_standard_size(tolerance_50hz_hp, sizes),
    }
}
