use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use epistolary::export::ConversationExport;
use epistolary::logging;
use epistolary::stats_builder::{self, AggregatorOptions, SharePolarity, UnknownActorPolicy};

#[derive(Parser)]
#[command(name = "report", version)]
#[command(about = "Output general stats about a message correspondence", long_about = None)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Input message JSON file
    filename: PathBuf,

    /// Count messages that carry a share payload as shares (default counts messages without one)
    #[arg(long)]
    fix_share_polarity: bool,

    /// Fail when a reaction comes from a participant with no entry yet
    #[arg(long)]
    strict_actors: bool,

    /// Also append logs to <DIR>/report.log
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

impl Cli {
    fn aggregator_options(&self) -> AggregatorOptions {
        AggregatorOptions {
            share_polarity: if self.fix_share_polarity {
                SharePolarity::Corrected
            } else {
                SharePolarity::Legacy
            },
            unknown_actors: if self.strict_actors {
                UnknownActorPolicy::Reject
            } else {
                UnknownActorPolicy::Create
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_dir.as_deref(), &cli.filename)?;

    let export = ConversationExport::load_from_file(&cli.filename)?;
    let report = stats_builder::build_report(&export, &cli.aggregator_options())?;

    println!("{}", report.to_pretty_json()?);

    Ok(())
}
