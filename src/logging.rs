use tracing::Level;
use tracing_subscriber::{prelude::*, EnvFilter};

/// 전역 tracing 구독자를 설치한다.
///
/// `RUST_LOG`가 있으면 그것을 따르고, 없으면 info 수준으로 출력한다.
/// `verbose`이면 이 크레이트의 debug 이벤트(계산 흐름별 로그)까지 출력한다.
pub fn init_logging(verbose: bool) {
    let mut filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());
    if verbose {
        if let Ok(directive) = "motor_derating_toolbox=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    // 테스트 등에서 이미 설치된 경우는 그대로 둔다.
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
