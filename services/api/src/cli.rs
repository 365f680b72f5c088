use crate::commands::{
    run_lots_assess, run_tax_classify, run_ttb_report, ClassifyArgs, LotsAssessArgs,
    TtbReportArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use vinecrest::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "vinecrest",
    about = "Lot readiness scoring and TTB wine-premises reporting",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score lots against the bottling gates
    Lots {
        #[command(subcommand)]
        command: LotsCommand,
    },
    /// TTB Form 5120.17 reporting helpers
    Ttb {
        #[command(subcommand)]
        command: TtbCommand,
    },
}

#[derive(Subcommand, Debug)]
enum LotsCommand {
    /// Print readiness score, breakdown, and blockers for each lot in a JSON file
    Assess(LotsAssessArgs),
}

#[derive(Subcommand, Debug)]
enum TtbCommand {
    /// Build a report from a ledger CSV export
    Report(TtbReportArgs),
    /// Show the tax class for a wine type and alcohol reading
    Classify(ClassifyArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Lots {
            command: LotsCommand::Assess(args),
        } => run_lots_assess(args),
        Command::Ttb {
            command: TtbCommand::Report(args),
        } => run_ttb_report(args),
        Command::Ttb {
            command: TtbCommand::Classify(args),
        } => run_tax_classify(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["vinecrest"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn ttb_report_requires_period_bounds() {
        let error = Cli::try_parse_from(["vinecrest", "ttb", "report", "--ledger", "x.csv"])
            .expect_err("missing period");
        assert_eq!(error.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn classify_parses_wine_type_alias() {
        let cli = Cli::try_parse_from([
            "vinecrest",
            "ttb",
            "classify",
            "--wine-type",
            "cider",
            "--alcohol",
            "6.5",
        ])
        .expect("parse");
        match cli.command {
            Some(Command::Ttb {
                command: TtbCommand::Classify(args),
            }) => {
                assert_eq!(args.wine_type, vinecrest::workflows::ttb::WineType::HardCider);
                assert_eq!(args.alcohol, Some(6.5));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
