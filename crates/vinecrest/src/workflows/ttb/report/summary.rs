use super::super::tax_class::{TaxClass, TAX_CLASS_RULES_VERSION};
use super::super::transactions::{Direction, Section, Transaction};
use super::lines::{self, LineRole, LineSpec};
use super::views::{
    zero_values, ClassValues, ReportId, ReportRow, ReportSummary, SectionRows, TaxClassSummary,
    TtbReport,
};
use crate::workflows::production::domain::OwnerId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Inclusive reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ReportError> {
        if start > end {
            return Err(ReportError::InvalidPeriod { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("report period starts {start} after it ends {end}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
}

#[derive(Debug)]
struct Account {
    opening: ClassValues,
    lines: HashMap<(Direction, u8), ClassValues>,
}

impl Account {
    fn new() -> Self {
        Self {
            opening: zero_values(),
            lines: HashMap::new(),
        }
    }

    fn movement(&self, direction: Direction, line: u8) -> ClassValues {
        self.lines
            .get(&(direction, line))
            .cloned()
            .unwrap_or_else(zero_values)
    }
}

/// Roll the ledger into the Form 5120.17 grid.
///
/// Postings dated before the period form the opening balance; postings inside
/// the period fill the movement lines; later postings are ignored.
pub fn generate_report(
    owner: &OwnerId,
    period: ReportPeriod,
    ledger: &[Transaction],
    generated_at: DateTime<Utc>,
) -> TtbReport {
    let mut bulk = Account::new();
    let mut bottled = Account::new();

    for transaction in ledger.iter().filter(|t| &t.owner == owner) {
        if transaction.date > period.end() {
            continue;
        }
        let in_period = transaction.date >= period.start();

        for posting in transaction.kind.postings() {
            let account = match posting.section {
                Section::Bulk => &mut bulk,
                Section::Bottled => &mut bottled,
            };

            if in_period {
                let values = account
                    .lines
                    .entry((posting.direction, posting.line))
                    .or_insert_with(zero_values);
                *values.entry(transaction.tax_class).or_insert(0.0) += transaction.gallons;
            } else {
                let signed = match posting.direction {
                    Direction::Addition => transaction.gallons,
                    Direction::Removal => -transaction.gallons,
                };
                *account
                    .opening
                    .entry(transaction.tax_class)
                    .or_insert(0.0) += signed;
            }
        }
    }

    let (bulk_rows, bulk_end) = section_rows(Section::Bulk, &bulk);
    let (bottled_rows, bottled_end) = section_rows(Section::Bottled, &bottled);

    let bulk_produced = sum_lines(&bulk, lines::BULK_PRODUCTION_LINES);
    let bottled_produced = sum_lines(&bottled, lines::BOTTLED_PRODUCTION_LINES);

    let by_tax_class: BTreeMap<TaxClass, TaxClassSummary> = TaxClass::ordered()
        .into_iter()
        .map(|class| {
            (
                class,
                TaxClassSummary {
                    bulk_produced: round(value(&bulk_produced, class)),
                    bulk_on_hand: round(value(&bulk_end, class)),
                    bottled_produced: round(value(&bottled_produced, class)),
                    bottled_on_hand: round(value(&bottled_end, class)),
                },
            )
        })
        .collect();

    // Totals add the rounded class figures so they match the grid's Total column.
    let summary = ReportSummary {
        total_bulk_produced: class_total(&by_tax_class, |class| class.bulk_produced),
        total_bulk_on_hand: end_balance_total(&bulk_rows),
        total_bottled_produced: class_total(&by_tax_class, |class| class.bottled_produced),
        total_bottled_on_hand: end_balance_total(&bottled_rows),
        by_tax_class,
    };

    TtbReport {
        id: ReportId::for_period(owner, period.start(), period.end()),
        owner: owner.clone(),
        period_start: period.start(),
        period_end: period.end(),
        generated_at,
        rules_version: TAX_CLASS_RULES_VERSION,
        bulk: bulk_rows,
        bottled: bottled_rows,
        summary,
    }
}

/// Build both sides of a section; returns the rows and the unrounded end balance.
fn section_rows(section: Section, account: &Account) -> (SectionRows, ClassValues) {
    let mut additions_total = zero_values();
    let mut additions = Vec::new();
    for spec in lines::schema(section, Direction::Addition) {
        let values = match spec.role {
            LineRole::Opening => account.opening.clone(),
            LineRole::Movement => account.movement(Direction::Addition, spec.line),
            LineRole::Total => additions_total.clone(),
            LineRole::EndBalance => zero_values(),
        };
        if matches!(spec.role, LineRole::Opening | LineRole::Movement) {
            accumulate(&mut additions_total, &values);
        }
        additions.push(row(spec, values));
    }

    let mut removed = zero_values();
    let mut end_balance = zero_values();
    let mut removals = Vec::new();
    for spec in lines::schema(section, Direction::Removal) {
        let values = match spec.role {
            LineRole::Movement => {
                let values = account.movement(Direction::Removal, spec.line);
                accumulate(&mut removed, &values);
                values
            }
            LineRole::EndBalance => {
                end_balance = difference(&additions_total, &removed);
                end_balance.clone()
            }
            LineRole::Total => {
                let mut total = removed.clone();
                accumulate(&mut total, &end_balance);
                total
            }
            LineRole::Opening => zero_values(),
        };
        removals.push(row(spec, values));
    }

    (
        SectionRows {
            additions,
            removals,
        },
        end_balance,
    )
}

fn row(spec: &LineSpec, values: ClassValues) -> ReportRow {
    let values: ClassValues = values
        .into_iter()
        .map(|(class, gallons)| (class, round(gallons)))
        .collect();
    let total = round(values.values().sum());
    ReportRow {
        line: spec.line.to_string(),
        label: spec.label.to_string(),
        values,
        total,
        is_total: spec.role == LineRole::Total,
        is_end_balance: spec.role == LineRole::EndBalance,
    }
}

fn class_total(
    by_tax_class: &BTreeMap<TaxClass, TaxClassSummary>,
    pick: impl Fn(&TaxClassSummary) -> f64,
) -> f64 {
    round(by_tax_class.values().map(pick).sum())
}

fn end_balance_total(rows: &SectionRows) -> f64 {
    rows.end_balance().map(|row| row.total).unwrap_or(0.0)
}

fn sum_lines(account: &Account, line_numbers: &[u8]) -> ClassValues {
    let mut values = zero_values();
    for line in line_numbers {
        accumulate(&mut values, &account.movement(Direction::Addition, *line));
    }
    values
}

fn accumulate(into: &mut ClassValues, from: &ClassValues) {
    for (class, gallons) in from {
        *into.entry(*class).or_insert(0.0) += gallons;
    }
}

fn difference(left: &ClassValues, right: &ClassValues) -> ClassValues {
    TaxClass::ordered()
        .into_iter()
        .map(|class| (class, value(left, class) - value(right, class)))
        .collect()
}

fn value(values: &ClassValues, class: TaxClass) -> f64 {
    values.get(&class).copied().unwrap_or(0.0)
}

fn round(gallons: f64) -> f64 {
    let rounded = (gallons * 100.0).round() / 100.0;
    // Avoid rendering "-0.00" cells.
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
