use std::path::PathBuf;

use clap::Parser;
use log::{error, info, LevelFilter};
use travelbook_merge::{parse_tz_offset, MergeConfig, MergePipeline, OutputTarget};

#[derive(Parser, Debug)]
#[command(
    name = "travelbook-merge",
    version = env!("CARGO_PKG_VERSION"),
    about = "Merge Travelbook 5FRT logs into a single GPX track",
    long_about = None,
)]
struct Cli {
    /// Входные логи (.log); каждый становится отдельным сегментом
    #[arg(required = true, num_args = 1..)]
    inputs: Vec<PathBuf>,
    /// Выходной GPX-файл, `-` для stdout
    #[arg(short, long, default_value = "-")]
    output: OutputTarget,
    /// Имя трека
    #[arg(short = 'n', long, default_value = "")]
    track_name: String,
    /// Описание трека
    #[arg(short = 'd', long, default_value = "")]
    track_desc: String,
    /// Смещение часового пояса устройства, часы (2, -5, UTC+3)
    #[arg(
        short = 't',
        long,
        default_value = "0",
        value_parser = parse_tz_offset,
        allow_hyphen_values = true
    )]
    tz_offset: i32,
    /// Печатать заголовки логов в JSON (stderr)
    #[arg(long)]
    dump_header: bool,
    /// Тихий режим (только ошибки)
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
    /// Подробный вывод
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    // Логи идут в stderr, stdout может быть занят GPX
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .parse_default_env()
        .init();

    let config = MergeConfig {
        inputs: cli.inputs,
        output: cli.output,
        track_name: cli.track_name,
        track_description: cli.track_desc,
        tz_offset_hours: cli.tz_offset,
        dump_header: cli.dump_header,
    };

    let pipeline = match MergePipeline::new(config) {
        Ok(p) => p,
        Err(e) => {
            error!("{e}");
            std::process::exit(1);
        }
    };

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Inputs        : {}", pipeline.config().inputs.len());
    info!("  Output        : {}", pipeline.config().output);
    info!("  TZ offset     : {:+}h", pipeline.config().tz_offset_hours);
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    match pipeline.run() {
        Ok(summary) => info!("\n{summary}"),
        Err(e) => {
            error!("Merge failed: {e}");
            if e.is_data_error() {
                error!("The input file is damaged or is not a 5FRT log");
            }
            std::process::exit(1);
        }
    }
}
