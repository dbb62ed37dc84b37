//! CLI definition and dispatch.

use clap::{Args, Parser, Subcommand};
use std::fmt::Write as _;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::adapters::cached_data_port::CachedDataPort;
use crate::adapters::csv_adapter::{export_file_name, write_csv, CsvAdapter};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::dashboard::{
    build_dashboard, confidence_label, fetch_news, forecast_label, load_series, Dashboard,
    DashboardRequest,
};
use crate::domain::error::TickerdashError;
use crate::domain::news::NewsArticle;
use crate::domain::period::Period;
use crate::domain::settings::{DataSource, Settings};
use crate::domain::summary::{format_volume, Direction};
use crate::ports::data_port::DataPort;
use crate::ports::news_port::NewsPort;

#[derive(Parser, Debug)]
#[command(name = "tickerdash", about = "Single-ticker stock dashboard with a trend forecast")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where prices and news come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Read `<SYMBOL>.csv` files from this directory instead of the network
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the dashboard as text
    Show {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        period: Option<String>,
        #[arg(long)]
        rows: Option<usize>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print the next-close forecast and confidence
    Predict {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        period: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Write the price history as CSV
    Export {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        period: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// List recent news headlines
    News {
        #[arg(long)]
        symbol: String,
        #[arg(long)]
        limit: Option<usize>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Start the web dashboard
    Serve {
        #[command(flatten)]
        source: SourceArgs,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Show {
            symbol,
            period,
            rows,
            source,
        } => run_show(&symbol, period.as_deref(), rows, &source),
        Command::Predict {
            symbol,
            period,
            source,
        } => run_predict(&symbol, period.as_deref(), &source),
        Command::Export {
            symbol,
            period,
            output,
            source,
        } => run_export(&symbol, period.as_deref(), output, &source),
        Command::News {
            symbol,
            limit,
            source,
        } => run_news(&symbol, limit, &source),
        Command::Serve { source } => run_serve(&source),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(&e)
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, TickerdashError> {
    FileConfigAdapter::from_file(path).map_err(|e| TickerdashError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Settings from the optional config file, with `--data-dir` forcing CSV.
pub fn load_settings(source: &SourceArgs) -> Result<Settings, TickerdashError> {
    let config = match &source.config {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_config(path)?
        }
        None => FileConfigAdapter::empty(),
    };
    let mut settings = Settings::from_config(&config)?;
    if let Some(dir) = &source.data_dir {
        settings.source = DataSource::Csv(dir.clone());
    }
    Ok(settings)
}

pub struct Ports {
    pub data: Arc<CachedDataPort>,
    pub news: Arc<dyn NewsPort + Send + Sync>,
}

pub fn build_ports(settings: &Settings) -> Result<Ports, TickerdashError> {
    let (data, news): (Box<dyn DataPort + Send + Sync>, Arc<dyn NewsPort + Send + Sync>) =
        match &settings.source {
            DataSource::Csv(dir) => (
                Box::new(CsvAdapter::new(dir.clone())),
                Arc::new(CsvAdapter::new(dir.clone())),
            ),
            DataSource::Yahoo => yahoo_ports(settings)?,
        };
    Ok(Ports {
        data: Arc::new(CachedDataPort::new(data, settings.cache_ttl)),
        news,
    })
}

#[cfg(feature = "yahoo")]
fn yahoo_ports(
    settings: &Settings,
) -> Result<(Box<dyn DataPort + Send + Sync>, Arc<dyn NewsPort + Send + Sync>), TickerdashError> {
    let adapter = crate::adapters::yahoo_adapter::YahooAdapter::from_settings(settings)?;
    Ok((Box::new(adapter.clone()), Arc::new(adapter)))
}

#[cfg(not(feature = "yahoo"))]
fn yahoo_ports(
    _settings: &Settings,
) -> Result<(Box<dyn DataPort + Send + Sync>, Arc<dyn NewsPort + Send + Sync>), TickerdashError> {
    Err(TickerdashError::ConfigInvalid {
        section: "data".into(),
        key: "source".into(),
        reason: "built without the yahoo feature; use source = csv or --data-dir".into(),
    })
}

fn resolve_request(
    settings: &Settings,
    symbol: &str,
    period: Option<&str>,
) -> Result<DashboardRequest, TickerdashError> {
    let period = match period {
        Some(p) => p.parse::<Period>()?,
        None => settings.defaults.period,
    };
    Ok(DashboardRequest::new(symbol, period, settings.defaults.theme))
}

fn run_show(
    symbol: &str,
    period: Option<&str>,
    rows: Option<usize>,
    source: &SourceArgs,
) -> Result<(), TickerdashError> {
    let settings = load_settings(source)?;
    let ports = build_ports(&settings)?;
    let request = resolve_request(&settings, symbol, period)?;
    let mut options = settings.dashboard_options();
    if let Some(rows) = rows {
        options.recent_rows = rows;
    }
    let dashboard = build_dashboard(ports.data.as_ref(), ports.news.as_ref(), &request, &options)?;
    print!("{}", format_dashboard(&dashboard));
    Ok(())
}

fn run_predict(
    symbol: &str,
    period: Option<&str>,
    source: &SourceArgs,
) -> Result<(), TickerdashError> {
    let settings = load_settings(source)?;
    let ports = build_ports(&settings)?;
    let request = resolve_request(&settings, symbol, period)?;
    let mut options = settings.dashboard_options();
    options.news_limit = 0;
    let dashboard = build_dashboard(ports.data.as_ref(), ports.news.as_ref(), &request, &options)?;
    println!("{}", forecast_label(dashboard.forecast));
    println!("{}", confidence_label(dashboard.confidence));
    Ok(())
}

fn run_export(
    symbol: &str,
    period: Option<&str>,
    output: Option<PathBuf>,
    source: &SourceArgs,
) -> Result<(), TickerdashError> {
    let settings = load_settings(source)?;
    let ports = build_ports(&settings)?;
    let request = resolve_request(&settings, symbol, period)?;
    let series = load_series(ports.data.as_ref(), &request.symbol, request.period)?;

    let path = output.unwrap_or_else(|| PathBuf::from(export_file_name(series.symbol())));
    let file = File::create(&path)?;
    write_csv(series.bars(), BufWriter::new(file))?;
    eprintln!("Wrote {} rows to {}", series.bars().len(), path.display());
    Ok(())
}

fn run_news(symbol: &str, limit: Option<usize>, source: &SourceArgs) -> Result<(), TickerdashError> {
    let settings = load_settings(source)?;
    let ports = build_ports(&settings)?;
    let symbol = crate::domain::dashboard::normalize_symbol(symbol)?;
    let limit = limit.unwrap_or(settings.news_limit);
    let articles = fetch_news(ports.news.as_ref(), &symbol, limit);
    print!("{}", format_news(&articles));
    Ok(())
}

fn run_serve(source: &SourceArgs) -> Result<(), TickerdashError> {
    #[cfg(feature = "web")]
    {
        let settings = load_settings(source)?;
        let ports = build_ports(&settings)?;
        eprintln!("Starting web server on {}", settings.listen);
        let state = crate::adapters::web::AppState {
            data: ports.data,
            news: ports.news,
            settings,
        };
        tokio::runtime::Runtime::new()?.block_on(crate::adapters::web::serve(state))
    }

    #[cfg(not(feature = "web"))]
    {
        let _ = source;
        Err(TickerdashError::ConfigInvalid {
            section: "web".into(),
            key: "listen".into(),
            reason: "built without the web feature".into(),
        })
    }
}

pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let s = &dashboard.summary;
    let direction = match s.direction() {
        Direction::Up => "up",
        Direction::Down => "down",
    };
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", dashboard.symbol(), dashboard.request.period);
    let _ = writeln!(out, "Close:   ${:.2}  ({:+.2}, {})", s.close, s.delta, direction);
    let _ = writeln!(out, "Open:    ${:.2}", s.open);
    let _ = writeln!(out, "High:    ${:.2}", s.high);
    let _ = writeln!(out, "Volume:  {}", format_volume(s.volume));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", forecast_label(dashboard.forecast));
    let _ = writeln!(out, "{}", confidence_label(dashboard.confidence));
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>14} {:>10} {:>10}",
        "Date",
        "Open",
        "High",
        "Low",
        "Close",
        "Volume",
        dashboard.chart.sma.indicator_type.column(),
        dashboard.chart.ema.indicator_type.column(),
    );
    let optional = |v: Option<f64>| v.map(|v| format!("{:.2}", v)).unwrap_or_default();
    for row in &dashboard.recent {
        let _ = writeln!(
            out,
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14} {:>10} {:>10}",
            row.bar.date.format("%Y-%m-%d"),
            row.bar.open,
            row.bar.high,
            row.bar.low,
            row.bar.close,
            format_volume(row.bar.volume),
            optional(row.sma),
            optional(row.ema),
        );
    }
    let _ = writeln!(out);
    out.push_str(&format_news(&dashboard.news));
    out
}

pub fn format_news(articles: &[NewsArticle]) -> String {
    let mut out = String::from("Latest News\n");
    if articles.is_empty() {
        out.push_str("No recent news available.\n");
        return out;
    }
    for article in articles {
        let _ = write!(out, "- {}", article.display_title());
        if !article.display_publisher().is_empty() {
            let _ = write!(out, " ({})", article.display_publisher());
        }
        let _ = writeln!(out, "\n  {}", article.display_link());
    }
    out
}
