use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use motor_derating_toolbox::{
    app::{self, AppError},
    config,
    derating::Pipeline,
    i18n::{self, keys, Translator},
    logging, ui_cli,
};

/// 모터 용량 보정 계산기 (CLI).
#[derive(Debug, Parser)]
#[command(name = "motor_derating_toolbox_cli", version)]
struct Cli {
    /// 언어 코드: auto, en-us, ko-kr, es-mx
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// 워크북 경로(설정값 대신 사용)
    #[arg(long)]
    source: Option<PathBuf>,
    /// 시트 이름(설정값 대신 사용)
    #[arg(long)]
    sheet: Option<String>,
    /// 계산 과정 debug 로그 출력
    #[arg(short, long)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// 한 번 계산하고 결과를 출력한다
    Calc {
        #[arg(long, value_enum, default_value_t = PipelineArg::Ambient)]
        pipeline: PipelineArg,
        /// 기준 마력 [HP]
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        hp: String,
        /// 주위온도 [°C] 또는 고도 [FASL/MASL]
        #[arg(long, default_value = "", allow_hyphen_values = true)]
        env: String,
    },
    /// 수식 목록을 출력한다
    Formulas,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PipelineArg {
    Ambient,
    Altitude,
}

impl From<PipelineArg> for Pipeline {
    fn from(value: PipelineArg) -> Self {
        match value {
            PipelineArg::Ambient => Pipeline::Ambient,
            PipelineArg::Altitude => Pipeline::Altitude,
        }
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);
    let mut cfg = config::load_or_default().unwrap_or_else(|err| {
        tracing::warn!(error = %err, "config.toml could not be read, using defaults");
        config::Config::default()
    });
    let resolved = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let mut tr = Translator::new_with_pack(&resolved, cfg.language_pack_dir.as_deref());
    if let Err(err) = try_run(cli, &mut cfg, &mut tr) {
        eprintln!("{}: {err}", tr.t(keys::ERROR_PREFIX));
        std::process::exit(1);
    }
}

fn try_run(cli: Cli, cfg: &mut config::Config, tr: &mut Translator) -> Result<(), AppError> {
    if let Some(path) = cli.source {
        cfg.data_source.path = path;
    }
    if let Some(sheet) = cli.sheet {
        cfg.data_source.sheet = sheet;
    }
    match cli.command {
        Some(Command::Calc { pipeline, hp, env }) => {
            let session = app::open_session(cfg);
            eprintln!("{}", session.status().message(tr));
            let result = session.calculate(pipeline.into(), &hp, &env)?;
            ui_cli::print_result(tr, &result);
            Ok(())
        }
        Some(Command::Formulas) => {
            println!("{}", tr.formulas());
            Ok(())
        }
        None => app::run(cfg, tr),
    }
}
