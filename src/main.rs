use clap::Parser;
use toc_calculator::form::{FieldId, RawForm};
use toc_calculator::{app, config, i18n, logger};

/// 설비 총소유비용(TOC) 계산기 CLI.
#[derive(Debug, Parser)]
#[command(name = "toc_calculator_cli", version, about)]
struct Cli {
    /// 언어 (auto, da-dk, en-us, ko-kr)
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// 설정 파일 경로
    #[arg(long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
    /// 디버그 로그 출력
    #[arg(short, long)]
    verbose: bool,
    /// 한 번 계산 모드에서 JSON으로 출력
    #[arg(long)]
    json: bool,
    #[arg(long, allow_hyphen_values = true)]
    purchase_price: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    interest_rate: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    operating_hours: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    service_costs: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    insurance: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    residual_value: Option<String>,
}

impl Cli {
    /// 값 인자가 하나라도 있으면 한 번 계산 모드로 본다.
    fn one_shot_form(&self) -> Option<RawForm> {
        app::one_shot_form([
            (FieldId::PurchasePrice, self.purchase_price.as_deref()),
            (FieldId::InterestRate, self.interest_rate.as_deref()),
            (FieldId::OperatingHours, self.operating_hours.as_deref()),
            (FieldId::ServiceCosts, self.service_costs.as_deref()),
            (FieldId::Insurance, self.insurance.as_deref()),
            (FieldId::ResidualValue, self.residual_value.as_deref()),
        ])
    }
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 CLI 애플리케이션을 실행한다.
fn main() {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);
    if let Err(err) = try_run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(err.exit_code());
    }
}

fn try_run(cli: &Cli) -> Result<(), app::AppError> {
    let mut cfg = config::load_from(&cli.config)?;
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    tracing::debug!(language = %lang, "language resolved");
    let mut tr = i18n::Translator::new_with_pack(&lang, cfg.language_pack_dir.as_deref());

    match cli.one_shot_form() {
        Some(form) => {
            let out = app::run_once(&form, &cfg, &tr, cli.json)?;
            println!("{out}");
        }
        None => app::run(&mut cfg, &mut tr)?,
    }
    Ok(())
}
