use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::loader::{DataSource, SheetRanges};

const CONFIG_FILE: &str = "config.toml";

/// 기본 시트 이름. 원본 워크북의 계산 시트.
pub const DEFAULT_SHEET: &str = "cm electrico";

/// 기준 데이터 위치 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// 워크북 경로(CSV 시트 디렉터리 또는 CSV 파일)
    pub path: PathBuf,
    pub sheet: String,
    /// 시작할 때 자동으로 읽을지 여부
    #[serde(default = "default_true")]
    pub preload: bool,
}

fn default_true() -> bool {
    true
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("workbook"),
            sheet: DEFAULT_SHEET.to_string(),
            preload: true,
        }
    }
}

impl DataSourceConfig {
    pub fn to_source(&self) -> DataSource {
        let sheet = if self.sheet.trim().is_empty() {
            DEFAULT_SHEET.to_string()
        } else {
            self.sheet.trim().to_string()
        };
        DataSource {
            path: self.path.clone(),
            sheet,
        }
    }
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 언어 코드(auto/en-us/ko-kr/es-mx)
    #[serde(default = "default_language")]
    pub language: String,
    /// 외부 언어팩 디렉터리
    #[serde(default)]
    pub language_pack_dir: Option<String>,
    #[serde(default)]
    pub data_source: DataSourceConfig,
    #[serde(default)]
    pub ranges: SheetRanges,
}

fn default_language() -> String {
    "auto".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: default_language(),
            language_pack_dir: None,
            data_source: DataSourceConfig::default(),
            ranges: SheetRanges::default(),
        }
    }
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 파일 입출력 오류
    #[error("파일 입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// TOML 역직렬화 오류
    #[error("설정 파싱 오류: {0}")]
    Serde(#[from] toml::de::Error),
    /// TOML 직렬화 오류
    #[error("설정 직렬화 오류: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// config.toml을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default() -> Result<Config, ConfigError> {
    load_from(Path::new(CONFIG_FILE))
}

/// 지정한 경로에서 설정을 읽는다. 파일이 없으면 기본값을 그 경로에 저장한다.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg: Config = toml::from_str(&content)?;
        Ok(cfg)
    } else {
        let cfg = Config::default();
        cfg.save_to(path)?;
        Ok(cfg)
    }
}

impl Config {
    /// 설정을 config.toml에 저장한다.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Path::new(CONFIG_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
