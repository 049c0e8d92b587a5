//! 부하 보정표와 표준 모터 용량 목록을 보관한다.
//!
//! 두 값 모두 한 번 만들어지면 바뀌지 않는다. 재로딩 시에는 새 값으로 통째로 교체한다.

use std::collections::HashMap;

use crate::derating::Field;

/// 표준 용량 목록을 읽지 못했을 때 쓰는 기본 NEMA 용량(HP). 오름차순 28개.
pub const DEFAULT_STANDARD_SIZES: [f64; 28] = [
    1.0, 1.5, 2.0, 3.0, 5.0, 7.5, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0, 60.0, 75.0, 100.0,
    125.0, 150.0, 200.0, 250.0, 300.0, 350.0, 400.0, 450.0, 500.0, 600.0, 700.0, 800.0,
];

/// 환경값(주위온도·고도) → 부하율(%) 정확 일치 조회표.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    entries: HashMap<u64, f64>,
}

// -0.0과 0.0은 같은 키로 취급한다.
fn key_bits(key: f64) -> u64 {
    if key == 0.0 {
        0.0_f64.to_bits()
    } else {
        key.to_bits()
    }
}

impl LookupTable {
    /// (키, 백분율) 쌍으로 조회표를 만든다. 같은 키가 반복되면 마지막 값이 남고 NaN 키는 버린다.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let entries = pairs
            .into_iter()
            .filter(|(k, _)| !k.is_nan())
            .map(|(k, v)| (key_bits(k), v))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 키와 정확히 일치하는 백분율을 반환한다.
    pub fn percentage(&self, key: f64) -> Option<f64> {
        self.entries.get(&key_bits(key)).copied()
    }
}

/// 오름차순·중복 없는 표준 모터 용량 목록.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardSizeList {
    sizes: Vec<f64>,
}

impl StandardSizeList {
    /// 값을 정렬하고 중복을 제거해 목록을 만든다. 양수가 아닌 값과 NaN은 버린다.
    /// 남는 값이 없으면 `None`.
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut sizes: Vec<f64> = values.into_iter().filter(|v| *v > 0.0).collect();
        sizes.sort_by(f64::total_cmp);
        sizes.dedup();
        if sizes.is_empty() {
            None
        } else {
            Some(Self { sizes })
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.sizes
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// 목록의 최댓값.
    pub fn max(&self) -> Option<f64> {
        self.sizes.last().copied()
    }
}

impl Default for StandardSizeList {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_STANDARD_SIZES.to_vec(),
        }
    }
}

/// 계산에 필요한 기준 데이터 전체.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    /// 주위온도(°C) → 부하율(%)
    pub ambient: LookupTable,
    /// 고도(FASL/MASL) → 부하율(%)
    pub altitude: LookupTable,
    pub standard_sizes: StandardSizeList,
}

impl ReferenceData {
    /// 로딩 실패 시 사용하는 값: 기본 용량 목록과 빈 조회표 두 개.
    pub fn fallback() -> Self {
        Self::default()
    }
}

/// 환경값으로 부하율을 조회해 분수(0~1)로 반환한다.
///
/// 키가 없거나 표에 정확히 같은 키가 없으면 Blank. 근사·보간은 하지 않는다.
pub fn lookup_fraction(key: Option<f64>, table: &LookupTable) -> Field {
    key.and_then(|k| table.percentage(k))
        .map(|pct| Field::Number(pct / 100.0))
        .unwrap_or(Field::Blank)
}
