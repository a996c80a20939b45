use crate::infra::{parse_quarter, sample_assignments, sample_scorecard, sample_tables};
use clap::Args;
use sales_incentive::error::AppError;
use sales_incentive::facts::Quarter;
use sales_incentive::scoring::{
    KpiWeights, ScoringEngine, ScoringObserver, TracingObserver, WeightRegistry,
};
use sales_incentive::{telemetry, AppConfig, CohortReport, ScoringRun};
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Quarter to score (1-4 or Q1-Q4). Defaults to INCENTIVE_QUARTER.
    #[arg(long, value_parser = parse_quarter)]
    pub(crate) quarter: Option<Quarter>,
    /// Number of representatives listed as top and bottom performers.
    #[arg(long, default_value_t = 5)]
    pub(crate) top: usize,
    /// Print the full report as JSON instead of the text summary.
    #[arg(long)]
    pub(crate) json: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            quarter: None,
            top: 5,
            json: false,
        }
    }
}

#[derive(Args, Debug, Default)]
pub(crate) struct WeightsArgs {
    /// Preview KPI weight overrides, e.g. "sales_volume=50,distribution=25".
    #[arg(long)]
    pub(crate) kpi_weights: Option<String>,
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let quarter = args.quarter.unwrap_or(config.quarter);
    tracing::info!(
        environment = config.environment.label(),
        %quarter,
        bonus_threshold = config.engine.bonus_threshold,
        "configuration loaded"
    );
    let observer: Arc<dyn ScoringObserver> = Arc::new(TracingObserver);

    let tables = sample_tables();
    let summary = tables.summary();
    tracing::info!(
        representatives = summary.representative_count,
        managers = summary.manager_count,
        product_groups = summary.product_group_count,
        target_rows = summary.target_rows,
        "sample cohort loaded"
    );
    let assignments = sample_assignments(&tables);

    let engine = ScoringEngine::from_config(&config.engine, &sample_scorecard(), observer.as_ref());
    let bonus_threshold = engine.bonus_threshold();
    let run = ScoringRun::new(Arc::new(tables), Arc::new(assignments), Arc::new(engine));

    let scores = run.execute(quarter, Arc::clone(&observer)).await;
    let report = CohortReport::build(quarter, &scores, bonus_threshold, args.top, observer.as_ref());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &report)?;
        writeln!(out)?;
    } else {
        render_report(&mut out, &report)?;
    }
    Ok(())
}

pub(crate) fn run_weights(args: WeightsArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    tracing::info!(
        environment = config.environment.label(),
        "configuration loaded"
    );

    let mut kpi = config.engine.kpi_weights.clone();
    if let Some(raw) = args.kpi_weights {
        let overrides = KpiWeights::parse_overrides(&raw)?;
        kpi = kpi.with_overrides(&overrides)?;
    }

    let registry = WeightRegistry::new(kpi, config.engine.default_product_weight)
        .with_scorecard(&sample_scorecard(), &TracingObserver);

    let stdout = io::stdout();
    render_weights(&mut stdout.lock(), &registry)
}

fn render_report(out: &mut impl Write, report: &CohortReport) -> Result<(), AppError> {
    let stats = &report.statistics;

    writeln!(out, "Sales incentive report for {}", report.quarter)?;
    writeln!(
        out,
        "Representatives scored: {} | Bonus threshold: {:.1}",
        stats.count, report.bonus_threshold
    )?;
    writeln!(
        out,
        "Eligible for bonus: {} ({:.1}%)",
        stats.eligible_count, stats.eligible_rate
    )?;
    writeln!(
        out,
        "Scores: mean {:.2} | median {:.2} | min {:.2} | max {:.2} | std dev {:.2}",
        stats.mean, stats.median, stats.min, stats.max, stats.std_dev
    )?;

    writeln!(out, "\nRepresentatives")?;
    for entry in &report.representatives {
        let score = &entry.score;
        writeln!(
            out,
            "  {:<8} {:<10} {:<14} total {:>6.2}  {}",
            score.representative, score.manager, score.region, score.total_score, entry.tier_label
        )?;
    }

    writeln!(out, "\nManagers")?;
    for manager in &report.managers {
        writeln!(
            out,
            "  {:<10} avg {:>6.2} | {}/{} eligible ({:.1}%) | {}",
            manager.manager,
            manager.average_score,
            manager.eligible_count,
            manager.representative_count,
            manager.eligible_rate,
            manager.rating_label
        )?;
    }

    writeln!(out, "\nTop performers")?;
    for ranked in &report.top_performers {
        writeln!(
            out,
            "  {}. {} ({}) {:.2}",
            ranked.rank, ranked.representative, ranked.manager, ranked.total_score
        )?;
    }

    writeln!(out, "\nBottom performers")?;
    for ranked in &report.bottom_performers {
        writeln!(
            out,
            "  {}. {} ({}) {:.2}",
            ranked.rank, ranked.representative, ranked.manager, ranked.total_score
        )?;
    }

    writeln!(out, "\nProduct groups")?;
    for product in &report.products {
        writeln!(
            out,
            "  {:<8} target {:>10.0} | actual {:>10.0} | {:.1}%",
            product.product_group, product.total_target, product.total_actual, product.achievement_pct
        )?;
    }

    if report.bonus_roster.is_empty() {
        writeln!(out, "\nBonus roster: none")?;
    } else {
        writeln!(out, "\nBonus roster")?;
        for ranked in &report.bonus_roster {
            writeln!(
                out,
                "  {}. {} {:.2}",
                ranked.rank, ranked.representative, ranked.total_score
            )?;
        }
    }

    Ok(())
}

fn render_weights(out: &mut impl Write, registry: &WeightRegistry) -> Result<(), AppError> {
    writeln!(out, "KPI weights (total {:.1})", registry.kpi().total())?;
    for weight in registry.kpi().iter() {
        writeln!(
            out,
            "  {:<18} {:>5.1}  band {:.2}-{:.2}",
            weight.category().label(),
            weight.weight(),
            weight.min_threshold(),
            weight.max_threshold()
        )?;
    }

    writeln!(out, "\nProduct group weights")?;
    for product in registry.product_groups() {
        writeln!(out, "  {:<8} {:>5.1}", product.group, product.weight)?;
    }
    writeln!(
        out,
        "  (unlisted groups use {:.1})",
        registry.default_product_weight()
    )?;
    Ok(())
}
