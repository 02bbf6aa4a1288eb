use crate::cli::ModelArgs;
use crate::infra::{load_predictor, parse_date};
use chrono::{Local, NaiveDate};
use clap::Args;
use restaurant_grade::error::AppError;
use restaurant_grade::messaging::Role;
use restaurant_grade::prediction::{
    write_batch_csv, BatchPrediction, GradePredictor, PredictionOutcome, PredictionRequest,
};
use restaurant_grade::report::RoleContext;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Inspections covering a pre-permit visit, a cycle visit, a clean
/// re-inspection and a row with values the encoders have never seen.
const SAMPLE_INSPECTIONS: &str = "\
INSPECTION TYPE,CRITICAL FLAG,VIOLATION CODE,SCORE,inspection_year,inspection_month,inspection_day_of_week
Pre-permit (Operational) / Initial Inspection,Critical,08A,25,2024,6,1
Cycle Inspection / Initial Inspection,Critical,06C,18,2024,7,4
Cycle Inspection / Re-inspection,Not Applicable,10D,12,2024,7,0
Administrative Miscellaneous / Second Compliance Inspection,Critical,11B,15,2024,7,2
";

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Audience for the messages: customer, owner or authority
    #[arg(long)]
    pub(crate) role: Role,
    #[arg(long)]
    pub(crate) inspection_type: String,
    #[arg(long)]
    pub(crate) critical_flag: String,
    #[arg(long)]
    pub(crate) violation_code: String,
    /// Inspection score (0-100)
    #[arg(long)]
    pub(crate) score: i32,
    /// Inspection date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Restaurant name for owner reports
    #[arg(long)]
    pub(crate) restaurant_name: Option<String>,
    /// Location for authority reports
    #[arg(long)]
    pub(crate) location: Option<String>,
    /// Cuisine for authority reports
    #[arg(long)]
    pub(crate) cuisine: Option<String>,
    /// Write the CSV report to this path
    #[arg(long)]
    pub(crate) csv_out: Option<PathBuf>,
    /// Write the PDF report to this path
    #[arg(long)]
    pub(crate) pdf_out: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

impl PredictArgs {
    fn context(&self) -> RoleContext {
        let mut context = RoleContext::defaults_for(self.role);
        match &mut context {
            RoleContext::Customer => {}
            RoleContext::Owner { restaurant_name } => {
                if let Some(name) = &self.restaurant_name {
                    *restaurant_name = name.clone();
                }
            }
            RoleContext::Authority { location, cuisine } => {
                if let Some(value) = &self.location {
                    *location = value.clone();
                }
                if let Some(value) = &self.cuisine {
                    *cuisine = value.clone();
                }
            }
        }
        context
    }

    fn request(&self) -> PredictionRequest {
        PredictionRequest {
            context: self.context(),
            inspection_type: self.inspection_type.clone(),
            critical_flag: self.critical_flag.clone(),
            violation_code: self.violation_code.clone(),
            score: self.score,
            inspection_date: self.date,
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// Inspection CSV to score
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Destination CSV (defaults to stdout)
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Also save the scored sample rows as CSV
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) model: ModelArgs,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let predictor = load_predictor(&args.model)?;
    let today = Local::now().date_naive();
    let outcome = predictor.evaluate(args.request(), today)?;
    print_outcome(&outcome);

    if let Some(path) = &args.csv_out {
        write_file(path, &outcome.result.to_csv()?)?;
        println!("CSV report saved to {}", path.display());
    }
    if let Some(path) = &args.pdf_out {
        write_file(path, &outcome.result.to_pdf()?)?;
        println!("PDF report saved to {}", path.display());
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let predictor = load_predictor(&args.model)?;
    let input = BufReader::new(File::open(&args.input)?);
    let predictions = predictor.predict_batch(input)?;

    match &args.output {
        Some(path) => {
            write_batch_csv(BufWriter::new(File::create(path)?), &predictions)?;
            eprintln!(
                "{} predictions saved to {}",
                predictions.len(),
                path.display()
            );
        }
        None => write_batch_csv(io::stdout().lock(), &predictions)?,
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let predictor = load_predictor(&args.model)?;
    let predictions = score_samples(&predictor)?;

    println!("Restaurant grade demo");
    for (index, prediction) in predictions.iter().enumerate() {
        println!(
            "\n#{} {} | {} | {} | score {} -> grade {}",
            index + 1,
            prediction.inspection_type,
            prediction.critical_flag,
            prediction.violation_code,
            prediction.score,
            prediction.predicted_grade
        );
        println!("  Customer:  {}", prediction.customer_message);
        println!("  Owner:     {}", prediction.owner_recommendation);
        println!("  Authority: {}", prediction.authority_action);
    }

    if let Some(path) = &args.output {
        write_batch_csv(BufWriter::new(File::create(path)?), &predictions)?;
        println!("\nPredictions saved to {}", path.display());
    }
    Ok(())
}

fn score_samples(predictor: &GradePredictor) -> Result<Vec<BatchPrediction>, AppError> {
    Ok(predictor.predict_batch(SAMPLE_INSPECTIONS.as_bytes())?)
}

fn print_outcome(outcome: &PredictionOutcome) {
    let view = outcome.view();
    println!("{} view", view.role);
    println!(
        "  Predicted grade: {} ({})",
        view.predicted_grade, view.grade_label
    );
    println!("  Summary: {}", view.summary);
    println!("  Guidance: {}", view.guidance);
    println!(
        "  Inspection: {}-{:02}, day of week {}",
        view.inspection_year, view.inspection_month, view.inspection_day_of_week
    );
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    Ok(())
}
