use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use sociograph::chart::{self, ChartConfig, ChartKind};
use sociograph::csv_reader;
use sociograph::normalize::{normalize, GroupedCounts};
use sociograph::parser::parse_predicates;
use sociograph::select::select;
use sociograph::story;
use sociograph::table::Table;
use sociograph::tidy::to_tidy;
use sociograph::RenderOptions;

#[derive(Parser, Debug)]
#[command(name = "sociograph")]
#[command(about = "Render survey data narratives from CSV cross-tabulations", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the gender-and-loneliness narrative: one PNG per panel plus report.md
    Story {
        /// Directory holding the happiness and life-satisfaction CSV exports
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        #[arg(long, default_value = "out")]
        out_dir: PathBuf,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
    },
    /// Run the pipeline once over an arbitrary CSV and render a single chart
    Chart {
        /// Input CSV file, or "-" for stdin
        #[arg(long)]
        input: PathBuf,
        /// Encoding label for non-UTF-8 input (e.g. "iso-8859-1")
        #[arg(long)]
        encoding: Option<String>,
        /// Row filter, e.g. '"Country name" == "United States" & year in 2010..2024'
        #[arg(long)]
        filter: Option<String>,
        /// Group column: x values for line charts, bar series for bar charts
        #[arg(long)]
        x: String,
        /// Value columns
        #[arg(long, required = true, num_args = 1..)]
        y: Vec<String>,
        #[arg(long, value_enum, default_value = "line")]
        kind: KindArg,
        /// Divide each value column by the total column, scaled to 100
        #[arg(long)]
        percent: bool,
        /// Total column used with --percent
        #[arg(long, default_value = "Total")]
        total: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        x_label: Option<String>,
        #[arg(long)]
        y_label: Option<String>,
        /// Also write the tidy records as JSON
        #[arg(long)]
        dump_records: Option<PathBuf>,
        /// Output PNG path
        #[arg(short, long)]
        output: PathBuf,
        #[arg(long, default_value_t = 800)]
        width: u32,
        #[arg(long, default_value_t = 600)]
        height: u32,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Line,
    Bar,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Story {
            data_dir,
            out_dir,
            width,
            height,
        } => {
            let options = RenderOptions { width, height };
            let panels = story::build_story(&data_dir, &options)
                .context("Failed to build the narrative")?;
            story::write_story(&out_dir, &panels).context("Failed to write the narrative")?;
            println!(
                "Wrote {} panels and report.md to {}",
                panels.len(),
                out_dir.display()
            );
            Ok(())
        }
        Command::Chart {
            input,
            encoding,
            filter,
            x,
            y,
            kind,
            percent,
            total,
            title,
            x_label,
            y_label,
            dump_records,
            output,
            width,
            height,
        } => {
            let table = if input.as_os_str() == "-" {
                csv_reader::read_reader(std::io::stdin().lock(), encoding.as_deref())
                    .context("Failed to read CSV from stdin")?
            } else {
                csv_reader::read_path(&input, encoding.as_deref())
                    .with_context(|| format!("Failed to read {}", input.display()))?
            };
            let table = apply_filter(table, filter.as_deref())?;

            let value_cols: Vec<&str> = y.iter().map(String::as_str).collect();
            let records = if percent {
                let counts = GroupedCounts::new(table, &x, &value_cols, &total)
                    .context("Failed to validate grouped counts")?;
                let normalized = normalize(&counts);
                to_tidy(&normalized.table, &x, &value_cols)?
            } else {
                to_tidy(&table, &x, &value_cols)?
            };

            if let Some(path) = dump_records {
                let json = serde_json::to_string_pretty(&records)?;
                fs::write(&path, json)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }

            let config = ChartConfig {
                kind: match kind {
                    KindArg::Line => ChartKind::Line,
                    KindArg::Bar => ChartKind::GroupedBar,
                },
                title,
                x_label,
                y_label,
            };
            let png = chart::render(&records, &config, &RenderOptions { width, height })
                .context("Failed to render chart")?;
            fs::write(&output, &png)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            Ok(())
        }
    }
}

fn apply_filter(table: Table, filter: Option<&str>) -> Result<Table> {
    let Some(expr) = filter else {
        return Ok(table);
    };
    match parse_predicates(expr) {
        Ok((remaining, predicates)) => {
            if !remaining.trim().is_empty() {
                anyhow::bail!("unparsed filter input: '{}'", remaining);
            }
            Ok(select(&table, &predicates)?)
        }
        Err(e) => anyhow::bail!("filter parse error: {:?}", e),
    }
}
