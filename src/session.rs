use std::sync::Arc;

use tracing::warn;

use crate::derating::{run_pipeline, DeratingResult, Pipeline};
use crate::i18n::{keys, Translator};
use crate::input::{parse_calculation_input, InputError};
use crate::loader::{load_reference_data, DataSource, LoadError, SheetRanges};
use crate::reference_data::ReferenceData;

/// 마지막 로딩 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// 아직 로딩하지 않음
    NotLoaded,
    /// 성공. 범위별 행 수 요약([`load_summary`])을 담는다
    Loaded(String),
    /// 실패하여 기본값 사용 중. 오류 문구를 담는다
    Fallback(String),
}

impl LoadStatus {
    /// 현재 언어로 된 상태줄 문구.
    pub fn message(&self, tr: &Translator) -> String {
        match self {
            LoadStatus::NotLoaded => tr.t(keys::STATUS_NOT_LOADED),
            LoadStatus::Loaded(summary) => {
                tr.tf(keys::STATUS_LOADED, &[("summary", summary.clone())])
            }
            LoadStatus::Fallback(error) => {
                tr.tf(keys::STATUS_LOAD_FAILED, &[("error", error.clone())])
            }
        }
    }
}

/// 기준 데이터와 로딩 상태를 보관하는 계산 세션.
///
/// 재로딩은 새 [`ReferenceData`]를 만들어 통째로 바꿔 끼운다. 이전 스냅샷을
/// [`Session::snapshot`]으로 받아 둔 쪽은 계속 옛 데이터를 본다.
#[derive(Debug, Clone)]
pub struct Session {
    data: Arc<ReferenceData>,
    ranges: SheetRanges,
    status: LoadStatus,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SheetRanges::default())
    }
}

impl Session {
    /// 기본 용량 목록과 빈 조회표로 시작한다.
    pub fn new(ranges: SheetRanges) -> Self {
        Self {
            data: Arc::new(ReferenceData::fallback()),
            ranges,
            status: LoadStatus::NotLoaded,
        }
    }

    /// 이미 준비된 데이터로 세션을 만든다.
    pub fn with_data(data: ReferenceData, ranges: SheetRanges) -> Self {
        Self {
            data: Arc::new(data),
            ranges,
            status: LoadStatus::NotLoaded,
        }
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn snapshot(&self) -> Arc<ReferenceData> {
        Arc::clone(&self.data)
    }

    pub fn ranges(&self) -> &SheetRanges {
        &self.ranges
    }

    pub fn set_ranges(&mut self, ranges: SheetRanges) {
        self.ranges = ranges;
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// 워크북에서 기준 데이터를 다시 읽는다.
    ///
    /// 실패해도 멈추지 않는다. 기본 용량 목록과 빈 조회표로 바꾸고 오류를 돌려준다.
    pub fn reload(&mut self, source: &DataSource) -> Result<(), LoadError> {
        match load_reference_data(source, &self.ranges) {
            Ok(data) => {
                self.status = LoadStatus::Loaded(load_summary(&data, &self.ranges));
                self.data = Arc::new(data);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "reference data load failed, using defaults");
                self.status = LoadStatus::Fallback(err.to_string());
                self.data = Arc::new(ReferenceData::fallback());
                Err(err)
            }
        }
    }

    /// 입력 문자열을 검증한 뒤 계산한다. 검증에 실패하면 계산하지 않는다.
    pub fn calculate(
        &self,
        pipeline: Pipeline,
        hp_text: &str,
        env_text: &str,
    ) -> Result<DeratingResult, InputError> {
        let input = parse_calculation_input(pipeline, hp_text, env_text)?;
        Ok(run_pipeline(pipeline, input, &self.data))
    }
}

/// 범위별로 읽은 행 수. `A4:B22(19), R3:S14(12), sizes(28)`
pub fn load_summary(data: &ReferenceData, ranges: &SheetRanges) -> String {
    format!(
        "{}({}), {}({}), sizes({})",
        ranges.ambient,
        data.ambient.len(),
        ranges.altitude,
        data.altitude.len(),
        data.standard_sizes.len()
    )
}
