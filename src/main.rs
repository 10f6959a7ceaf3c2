use std::fs;
use std::io::{self, Write};
use std::process;
use std::sync::Arc;

use clap::{ArgAction, Parser};
use tracing::Level;

use page_translator::core::{
    format_output_path, print_error_message, print_info_message, read_input, InputTarget,
};
use page_translator::env::{self, core::LogLevel, core::NoColor, EnvVar};
use page_translator::parsers::html::{get_title, load_document, serialize_document};
use page_translator::relay::{self, CommandSurface, HostOutcome};
use page_translator::translation::{
    ConfigManager, HttpTranslator, RunReport, TranslationConfig, TranslationError,
    TranslationResult,
};

/// Translate the visible text of a web page in place
///
/// Text is sent in batches to a translation backend and written back into the
/// original text nodes; markup, scripts, styles and code blocks are left alone.
#[derive(Parser, Debug)]
#[command(name = "page-translator", version)]
#[command(after_help = "EXAMPLES:
    page-translator -t fr page.html -o page.fr.html
    page-translator -t hi https://example.com -o '%title%.%lang%.html'
    cat page.html | page-translator -t de - > page.de.html")]
struct Cli {
    /// Page to translate: a local file, an http(s) URL, or - for stdin
    #[arg(value_name = "TARGET", required_unless_present_any = ["generate_config", "list_env"])]
    target: Option<String>,

    /// Target language code
    #[arg(short = 't', long, value_name = "CODE")]
    target_lang: Option<String>,

    /// Source language code
    #[arg(short = 's', long, value_name = "CODE")]
    source_lang: Option<String>,

    /// Translation backend endpoint
    #[arg(short = 'a', long, value_name = "URL")]
    api_url: Option<String>,

    /// Number of text fragments per backend request
    #[arg(short = 'b', long, value_name = "N")]
    batch_size: Option<usize>,

    /// Charset of the input document (also used for the output)
    #[arg(short = 'E', long, value_name = "CHARSET")]
    encoding: Option<String>,

    /// Output file; supports %title%, %lang% and %timestamp% [default: stdout]
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<String>,

    /// Configuration file (TOML, or JSON by extension)
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<String>,

    /// Backend request timeout in seconds, 0 disables it
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Write an example configuration file and exit
    #[arg(long, value_name = "PATH")]
    generate_config: Option<String>,

    /// List supported environment variables and exit
    #[arg(long)]
    list_env: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(cli) {
        print_error_message(&format!("Error: {}", e));
        process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => LogLevel::get()
                .ok()
                .and_then(|level| level.parse().ok())
                .unwrap_or(Level::INFO),
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_ansi(!NoColor::get_or_default(false))
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> TranslationResult<()> {
    if let Some(path) = &cli.generate_config {
        ConfigManager::generate_example_config(path)?;
        print_info_message(&format!("Example configuration written to {}", path));
        return Ok(());
    }

    if cli.list_env {
        print!("{}", env::generate_env_docs());
        return Ok(());
    }

    let target = cli
        .target
        .as_deref()
        .ok_or_else(|| TranslationError::InvalidInput("TARGET is required".to_string()))?;
    let input = InputTarget::parse(target)?;
    // 在读取页面之前拒绝浏览器内部页面
    CommandSurface::check_page(&input.location())?;

    let config = load_config(&cli)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let local = tokio::task::LocalSet::new();
    local.block_on(&runtime, translate(input, config, cli))
}

/// 配置文件和环境变量之上再叠加命令行参数
fn load_config(cli: &Cli) -> TranslationResult<TranslationConfig> {
    let manager = match &cli.config {
        Some(path) => ConfigManager::from_file(path)?,
        None => ConfigManager::new()?,
    };
    let mut config = manager.into_config();

    if let Some(target_lang) = &cli.target_lang {
        config.target_lang = target_lang.clone();
    }
    if let Some(source_lang) = &cli.source_lang {
        config.source_lang = source_lang.clone();
    }
    if let Some(api_url) = &cli.api_url {
        config.api_url = api_url.clone();
    }
    if let Some(batch_size) = cli.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }

    config.validate()?;
    Ok(config)
}

async fn translate(input: InputTarget, config: TranslationConfig, cli: Cli) -> TranslationResult<()> {
    let source = read_input(&input).await?;
    let declared = cli.encoding.as_deref().or(source.charset.as_deref());
    let (dom, charset) = load_document(&source.data, declared)?;
    let title = get_title(&dom.document);

    let translator = Arc::new(HttpTranslator::from_config(&config)?);
    let HostOutcome { dom, reports } = relay::run_page_translation(
        dom,
        &source.location,
        &config.target_lang,
        config.batch_size,
        translator,
    )
    .await?;

    for report in &reports {
        print_summary(report);
    }

    let output = serialize_document(&dom, &charset)?;
    write_output(cli.output.as_deref(), title.as_deref(), &config.target_lang, &output)
}

fn print_summary(report: &RunReport) {
    print_info_message(&format!(
        "Translated {}/{} text fragments in {} batches ({} failed)",
        report.fragments_substituted(),
        report.fragments_selected,
        report.outcomes.len(),
        report.batches_failed()
    ));

    for failure in report.failures() {
        if let Some(error) = failure.error() {
            print_error_message(&format!("  batch {}: {}", failure.batch_id(), error));
        }
    }
}

fn write_output(
    destination: Option<&str>,
    title: Option<&str>,
    target_lang: &str,
    data: &[u8],
) -> TranslationResult<()> {
    match destination {
        None | Some("-") => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
        Some(path) => {
            let path = format_output_path(path, title, target_lang);
            fs::write(&path, data)?;
            tracing::info!("已写入 {}", path);
        }
    }

    Ok(())
}
