use thiserror::Error;
use tracing::info;

use crate::config::Config;
use crate::conversion;
use crate::derating::Pipeline;
use crate::i18n::{self, Translator};
use crate::input::InputError;
use crate::loader::LoadError;
use crate::session::Session;
use crate::ui_cli;
use crate::ui_cli::MenuChoice;

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] crate::config::ConfigError),
    /// 단위 변환 오류
    #[error("단위 변환 오류: {0}")]
    Conversion(#[from] conversion::ConversionError),
    /// 입력 검증 오류
    #[error("입력 오류: {0}")]
    Input(#[from] InputError),
    /// 기준 데이터 로딩 오류
    #[error("기준표 로딩 오류: {0}")]
    Load(#[from] LoadError),
}

/// 설정에 지정된 워크북을 미리 읽어 세션을 만든다. 실패하면 기본값으로 시작한다.
pub fn open_session(config: &Config) -> Session {
    let mut session = Session::new(config.ranges);
    if config.data_source.preload {
        // 시작 시 로딩 실패는 상태줄에만 남긴다.
        if session.reload(&config.data_source.to_source()).is_ok() {
            info!(status = ?session.status(), "preloaded reference data");
        }
    }
    session
}

/// CLI 애플리케이션의 메인 루프를 실행한다.
pub fn run(config: &mut Config, tr: &mut Translator) -> Result<(), AppError> {
    let mut session = open_session(config);
    println!("{}", session.status().message(tr));
    loop {
        match ui_cli::main_menu(tr)? {
            MenuChoice::Ambient => ui_cli::handle_derating(tr, &session, Pipeline::Ambient)?,
            MenuChoice::Altitude => ui_cli::handle_derating(tr, &session, Pipeline::Altitude)?,
            MenuChoice::UnitConversion => ui_cli::handle_unit_conversion(tr)?,
            MenuChoice::LoadTables => {
                ui_cli::handle_load_tables(tr, config, &mut session)?;
                config.save()?;
            }
            MenuChoice::Formulas => println!("{}", tr.formulas()),
            MenuChoice::Settings => {
                ui_cli::handle_settings(tr, config)?;
                config.save()?;
            }
            MenuChoice::Exit => {
                config.save()?;
                println!("{}", tr.t(i18n::keys::APP_EXIT));
                break;
            }
        }
    }
    Ok(())
}
