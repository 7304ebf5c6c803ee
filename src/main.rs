// ==========================================
// 管件报价系统 - 命令行入口
// ==========================================
// 职责: 目录查询 / 重新加载 / 报价导出与回读
// 输出: 查询结果写到 stdout（JSON 或 CSV），日志写到 stderr
// ==========================================

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;

use pipe_quote::domain::{
    ComplexFilter, ExportRequest, LineSelection, QuoteLine, SimpleFilter, TubeFilter,
};
use pipe_quote::i18n::{current_locale, resolve_locale, set_locale, t, t_with_args};
use pipe_quote::{logging, AppState, ComplexFittingKind, ItemType, SimpleFittingKind};

#[derive(Parser)]
#[command(name = "pipe-quote")]
#[command(about = "Catalogo tubi e raccordi, calcolo ed esportazione offerte")]
#[command(version)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true, env = "PIPE_QUOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Message language (it / en)
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog sources and print segment counts
    Reload,

    /// List configured finishes
    Finishes,

    /// Query tubes
    Tubes {
        #[arg(long)]
        finish: Option<String>,
        #[arg(long)]
        nd: Option<String>,
        /// Write CSV instead of JSON
        #[arg(long)]
        csv: bool,
    },

    /// Query simple fittings (elbows, end caps, ferrules, clamps)
    Simple {
        /// Fitting type label, e.g. "Clamps"
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        finish: Option<String>,
        #[arg(long)]
        nd: Option<String>,
        #[arg(long)]
        csv: bool,
    },

    /// Query tees and reducers
    Complex {
        /// Fitting type label, e.g. "Tees"
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        finish: Option<String>,
        #[arg(long)]
        od1: Option<String>,
        #[arg(long)]
        od2: Option<String>,
        #[arg(long)]
        csv: bool,
    },

    /// Size options for an item type (ND list, or OD1 -> OD2 for tees and reducers)
    Sizes {
        /// Item type label, e.g. "Tubes" or "Conc. Reducers"
        #[arg(long = "type")]
        item_type: String,
        #[arg(long)]
        finish: Option<String>,
    },

    /// Build a quote line from a catalog selection and print it as JSON
    Line {
        #[arg(long = "type")]
        item_type: String,
        #[arg(long)]
        finish: Option<String>,
        #[arg(long)]
        nd: Option<String>,
        #[arg(long)]
        od1: Option<String>,
        #[arg(long)]
        od2: Option<String>,
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,
        /// Alloy surcharge in €/kg (tubes only)
        #[arg(long)]
        alloy: Option<f64>,
    },

    /// Suggested discount for a set of quote lines (tiered on the pre-discount total)
    Suggest {
        /// JSON file: an array of quote lines, or a full export request
        #[arg(long)]
        lines: PathBuf,
    },

    /// Export a quotation workbook
    #[command(after_help = "\
Examples:
  pipe-quote export --lines lines.json
  pipe-quote export --lines request.json --discount 10 --transport 5 --locale en --out offer.xlsx
  pipe-quote export --lines lines.json --suggested-discount")]
    Export {
        /// JSON file: an array of quote lines, or a full export request
        #[arg(long)]
        lines: PathBuf,
        #[arg(long, conflicts_with = "suggested_discount")]
        discount: Option<f64>,
        /// Apply the tiered suggested discount
        #[arg(long)]
        suggested_discount: bool,
        #[arg(long)]
        transport: Option<f64>,
        /// Workbook language (it / en)
        #[arg(long)]
        locale: Option<String>,
        #[arg(long)]
        request_ref: Option<String>,
        #[arg(long)]
        customer: Option<String>,
        #[arg(long)]
        site: Option<String>,
        /// Output file (default: Offerta_<date>.xlsx)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Read a previously exported quotation back into quote lines
    Import {
        /// Exported .xlsx file
        input: PathBuf,
    },
}

fn main() -> ExitCode {
    logging::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "命令执行失败");
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let state = AppState::new(cli.config.as_deref())?;
    set_locale(resolve_locale(cli.lang.as_deref(), &state.config.default_locale));
    tracing::debug!(locale = %current_locale(), "消息语言");

    match cli.command {
        Commands::Reload => {
            // AppState 启动时已读取源文件
            let summary = state.catalog_api.summary();
            eprintln!("{}", t("cli.catalog_reloaded"));
            print_json(&summary)
        }
        Commands::Finishes => print_json(&state.catalog_api.list_finishes()),
        Commands::Tubes { finish, nd, csv } => {
            let items = state.catalog_api.list_tubes(&TubeFilter { finish, nd });
            print_rows(&items, csv)
        }
        Commands::Simple {
            kind,
            finish,
            nd,
            csv,
        } => {
            let kind = kind.as_deref().map(parse_simple_kind).transpose()?;
            let items = state
                .catalog_api
                .list_simple_fittings(&SimpleFilter { kind, finish, nd });
            print_rows(&items, csv)
        }
        Commands::Complex {
            kind,
            finish,
            od1,
            od2,
            csv,
        } => {
            let kind = kind.as_deref().map(parse_complex_kind).transpose()?;
            let items = state.catalog_api.list_complex_fittings(&ComplexFilter {
                kind,
                finish,
                od1,
                od2,
            });
            print_rows(&items, csv)
        }
        Commands::Sizes { item_type, finish } => match parse_item_type(&item_type)? {
            ItemType::Complex(kind) => {
                print_json(&state.catalog_api.od_options(kind, finish.as_deref()))
            }
            other => print_json(&state.catalog_api.nd_options(other, finish.as_deref())?),
        },
        Commands::Line {
            item_type,
            finish,
            nd,
            od1,
            od2,
            quantity,
            alloy,
        } => {
            let selection = LineSelection {
                item_type: Some(parse_item_type(&item_type)?),
                finish,
                nd,
                od1,
                od2,
                quantity,
                alloy_surcharge_per_kg: alloy,
            };
            let line = state
                .quote_api
                .line_from_selection(&state.catalog_api, &selection)?;
            let preview = state.quote_api.preview(&line);
            print_json(&serde_json::json!({ "line": line, "preview": preview }))
        }
        Commands::Suggest { lines } => {
            let request = read_request(&lines)?;
            print_json(&state.quote_api.suggest_discount(&request.lines))
        }
        Commands::Export {
            lines,
            discount,
            suggested_discount,
            transport,
            locale,
            request_ref,
            customer,
            site,
            out,
        } => {
            let mut request = read_request(&lines)?;
            if let Some(d) = discount {
                request.discount_percent = d;
            }
            if suggested_discount {
                let suggestion = state.quote_api.suggest_discount(&request.lines);
                tracing::info!(
                    offer_total = suggestion.offer_total,
                    discount = suggestion.discount_percent,
                    "使用建议折扣"
                );
                request.discount_percent = suggestion.discount_percent;
            }
            if let Some(tp) = transport {
                request.transport_percent = tp;
            }
            if locale.is_some() {
                request.locale = locale;
            }
            if request_ref.is_some() {
                request.meta.request_ref = request_ref;
            }
            if customer.is_some() {
                request.meta.customer = customer;
            }
            if site.is_some() {
                request.meta.site = site;
            }

            let exported = state.quote_api.export(&request)?;
            let path = out.unwrap_or_else(|| PathBuf::from(&exported.file_name));
            std::fs::write(&path, &exported.bytes)
                .with_context(|| format!("写入失败: {}", path.display()))?;

            let path_text = path.display().to_string();
            eprintln!(
                "{}",
                t_with_args("cli.quote_exported", &[("path", path_text.as_str())])
            );
            print_json(&exported.totals)
        }
        Commands::Import { input } => {
            let bytes = std::fs::read(&input)
                .with_context(|| format!("读取失败: {}", input.display()))?;
            let quote = state.quote_api.import(&bytes)?;

            let count = quote.lines.len().to_string();
            eprintln!(
                "{}",
                t_with_args("cli.quote_imported", &[("count", count.as_str())])
            );
            print_json(&quote)
        }
    }
}

/// 读取导出请求（行数组或完整请求对象）
fn read_request(path: &Path) -> anyhow::Result<ExportRequest> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("读取失败: {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&raw).with_context(|| format!("JSON 格式错误: {}", path.display()))?;

    if value.is_array() {
        let lines: Vec<QuoteLine> = serde_json::from_value(value)
            .with_context(|| format!("报价行格式错误: {}", path.display()))?;
        return Ok(ExportRequest {
            lines,
            ..Default::default()
        });
    }
    serde_json::from_value(value).with_context(|| format!("请求格式错误: {}", path.display()))
}

fn parse_item_type(label: &str) -> anyhow::Result<ItemType> {
    match ItemType::from_label(label) {
        Some(item_type) => Ok(item_type),
        None => bail!("未知物料类型: {}", label),
    }
}

fn parse_simple_kind(label: &str) -> anyhow::Result<SimpleFittingKind> {
    SimpleFittingKind::from_label(label)
        .with_context(|| format!("未知简单管件类型: {}", label))
}

fn parse_complex_kind(label: &str) -> anyhow::Result<ComplexFittingKind> {
    ComplexFittingKind::from_label(label)
        .with_context(|| format!("未知三通/异径管类型: {}", label))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn print_rows<T: Serialize>(rows: &[T], csv: bool) -> anyhow::Result<()> {
    if !csv {
        return print_json(rows);
    }
    let mut writer = csv::Writer::from_writer(io::stdout().lock());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
