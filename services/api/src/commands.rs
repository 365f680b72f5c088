use chrono::{DateTime, NaiveDate, Utc};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;
use vinecrest::config::AppConfig;
use vinecrest::error::AppError;
use vinecrest::workflows::production::{
    aging_start_date, compute_aging_months, Lot, OwnerId, ReadinessEngine,
};
use vinecrest::workflows::ttb::{
    determine_tax_class, generate_report, LedgerImporter, ReportPeriod, ReportServiceError,
    ReportRow, SectionRows, TaxClass, TtbReport, WineType, TAX_CLASS_RULES_VERSION,
};

#[derive(Args, Debug)]
pub(crate) struct LotsAssessArgs {
    /// JSON file holding an array of lots
    #[arg(long)]
    pub(crate) lots: PathBuf,
    /// Evaluation date for aging (YYYY-MM-DD, defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) as_of: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub(crate) struct TtbReportArgs {
    /// Ledger CSV export (Date, Lot, Type, Gallons, Tax Class, Wine Type, Alcohol %)
    #[arg(long)]
    pub(crate) ledger: PathBuf,
    /// First day of the reporting period (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) period_start: NaiveDate,
    /// Last day of the reporting period (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) period_end: NaiveDate,
    /// Account the ledger belongs to
    #[arg(long, default_value = "local")]
    pub(crate) owner: String,
    /// Print the report as JSON instead of a grid
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Wine style (still, sparkling_bf, sparkling_bp, artificially_carbonated, hard_cider)
    #[arg(long, value_parser = crate::infra::parse_wine_type)]
    pub(crate) wine_type: WineType,
    /// Alcohol by volume; omit when unmeasured
    #[arg(long)]
    pub(crate) alcohol: Option<f64>,
}

pub(crate) fn run_lots_assess(args: LotsAssessArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let engine = ReadinessEngine::new(config.readiness_config());

    let raw = std::fs::read_to_string(&args.lots)?;
    let lots: Vec<Lot> = serde_json::from_str(&raw).map_err(|err| {
        AppError::Input(format!("{} is not a lot list: {err}", args.lots.display()))
    })?;

    let now = match args.as_of {
        Some(date) => date.and_hms_opt(12, 0, 0).map(|dt| dt.and_utc()).ok_or_else(|| {
            AppError::Input(format!("cannot evaluate aging as of {date}"))
        })?,
        None => Utc::now(),
    };

    print!("{}", render_assessment(&engine, &lots, now));
    Ok(())
}

pub(crate) fn run_ttb_report(args: TtbReportArgs) -> Result<(), AppError> {
    let owner = OwnerId(args.owner);
    let period =
        ReportPeriod::new(args.period_start, args.period_end).map_err(ReportServiceError::from)?;
    let ledger = LedgerImporter::from_path(&args.ledger, &owner)?;
    let report = generate_report(&owner, period, &ledger, Utc::now());

    if args.json {
        let body = serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::Input(format!("report could not be encoded: {err}")))?;
        println!("{body}");
    } else {
        print!("{}", render_report(&report, ledger.len()));
    }
    Ok(())
}

pub(crate) fn run_tax_classify(args: ClassifyArgs) -> Result<(), AppError> {
    println!("{}", render_classification(args.wine_type, args.alcohol));
    Ok(())
}

fn render_assessment(engine: &ReadinessEngine, lots: &[Lot], now: DateTime<Utc>) -> String {
    let mut out = String::new();
    if lots.is_empty() {
        out.push_str("No lots to assess.\n");
        return out;
    }

    for lot in lots {
        let explanation = engine.explain(lot);
        let aging = aging_start_date(lot);
        let name = if lot.has_name() {
            lot.name.as_str()
        } else {
            "(unnamed)"
        };

        let _ = writeln!(out, "{} [{}] - {}", name, lot.id, lot.status.label());
        let _ = writeln!(
            out,
            "  Score {}/100 | eligible: {} | nearly ready: {}",
            explanation.score,
            yes_no(explanation.eligible),
            yes_no(explanation.nearly_ready)
        );
        if aging.is_unknown {
            let _ = writeln!(out, "  Aging: unknown (no start date on record)");
        } else {
            let _ = writeln!(
                out,
                "  Aging: {} months ({})",
                compute_aging_months(lot, now),
                aging.source.label()
            );
        }
        for line in &explanation.breakdown {
            let _ = writeln!(out, "    {line}");
        }
        for blocker in &explanation.blockers {
            match &blocker.action {
                Some(action) => {
                    let _ = writeln!(
                        out,
                        "  ! {} -> {} ({})",
                        blocker.message, action.label, action.path
                    );
                }
                None => {
                    let _ = writeln!(out, "  ! {}", blocker.message);
                }
            }
        }
        out.push('\n');
    }

    out
}

fn render_report(report: &TtbReport, transaction_count: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "TTB Form 5120.17 | {} to {} | {} transactions | rules v{}",
        report.period_start, report.period_end, transaction_count, report.rules_version
    );

    render_section(&mut out, "Part I, Section A: Bulk wines", &report.bulk);
    render_section(&mut out, "Part I, Section B: Bottled wines", &report.bottled);

    let _ = writeln!(out, "\nOn hand at end of period");
    let _ = writeln!(
        out,
        "  Bulk {:.2} gal | Bottled {:.2} gal",
        report.summary.total_bulk_on_hand, report.summary.total_bottled_on_hand
    );
    for (class, summary) in &report.summary.by_tax_class {
        if summary.bulk_on_hand == 0.0 && summary.bottled_on_hand == 0.0 {
            continue;
        }
        let _ = writeln!(
            out,
            "  - {}: bulk {:.2} | bottled {:.2}",
            class.label(),
            summary.bulk_on_hand,
            summary.bottled_on_hand
        );
    }

    out
}

fn render_section(out: &mut String, title: &str, rows: &SectionRows) {
    let _ = writeln!(out, "\n{title}");
    let mut header = format!("{:>4}  {:<38}", "Line", "Description");
    for class in TaxClass::ordered() {
        let _ = write!(header, "{:>10}", column(class));
    }
    let _ = write!(header, "{:>11}", "Total");
    let _ = writeln!(out, "{header}");

    for row in rows.additions.iter().chain(rows.removals.iter()) {
        render_row(out, row);
    }
}

fn render_row(out: &mut String, row: &ReportRow) {
    let mut line = format!("{:>4}  {:<38}", row.line, row.label);
    for class in TaxClass::ordered() {
        let _ = write!(line, "{:>10.2}", row.value(class));
    }
    let _ = write!(line, "{:>11.2}", row.total);
    let _ = writeln!(out, "{line}");
}

fn column(class: TaxClass) -> &'static str {
    match class {
        TaxClass::TableWine16 => "<=16%",
        TaxClass::TableWine21 => "16-21%",
        TaxClass::TableWine24 => "21-24%",
        TaxClass::ArtificiallyCarbonated => "Carb",
        TaxClass::SparklingBf => "Spk BF",
        TaxClass::SparklingBp => "Spk BP",
        TaxClass::HardCider => "Cider",
    }
}

fn render_classification(wine_type: WineType, alcohol: Option<f64>) -> String {
    let class = determine_tax_class(wine_type, alcohol);
    let reading = match alcohol {
        Some(pct) if pct > 0.0 => format!("{pct:.1}%"),
        _ => "unmeasured".to_string(),
    };
    format!(
        "{} ({}) for {:?} at {} [rules v{}]",
        class.key(),
        class.label(),
        wine_type,
        reading,
        TAX_CLASS_RULES_VERSION
    )
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
