use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 로그 구독자를 초기화한다. 결과 출력과 섞이지 않도록 stderr로 보낸다.
/// `RUST_LOG`가 있으면 그 값을 우선한다.
pub fn init_logger(verbose: bool) {
    let default_filter = if verbose {
        "toc_calculator=debug,info"
    } else {
        "toc_calculator=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    // 테스트 등에서 이미 설정된 경우 무시한다
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
