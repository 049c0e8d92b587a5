//! 모터 용량 보정(주위온도·고도) 계산 로직을 라이브러리로 분리하여 CLI와 GUI가 함께 쓴다.

pub mod app;
pub mod config;
pub mod conversion;
pub mod derating;
pub mod format;
pub mod i18n;
pub mod input;
pub mod loader;
pub mod logging;
pub mod reference_data;
pub mod session;
pub mod standard_size;
pub mod ui_cli;
pub mod units;
