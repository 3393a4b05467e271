use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use reqflow_rs::adk::input::StdinCollector;
use reqflow_rs::adk::model;
use reqflow_rs::reqflow::config::EngineConfig;
use reqflow_rs::reqflow::pipeline::Pipeline;
use reqflow_rs::reqflow::types::AssessmentKind;
use reqflow_rs::reqflow::workflow::state::WorkflowState;

use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Turn a rough idea into requirements and a pitch", long_about = None)]
struct Args {
    /// The problem to solve
    #[arg(long)]
    problem: String,

    /// Who has the problem
    #[arg(long)]
    persona: String,

    /// The proposed solution
    #[arg(long)]
    solution: String,

    /// Maximum number of interview personas
    #[arg(short, long)]
    k: Option<usize>,

    /// The model to use
    #[arg(short, long)]
    model: Option<String>,

    /// Engine configuration file (YAML)
    #[arg(short, long)]
    config: Option<String>,

    /// Global step ceiling
    #[arg(long)]
    max_steps: Option<usize>,

    /// Print the final state as JSON
    #[arg(long)]
    json: bool,
}

fn print_report(state: &WorkflowState) {
    println!("\n==================== Requirements ====================\n");
    println!("{}", state.requirements_doc);

    if let Some(analysis) = &state.environment_analysis {
        println!("\n================ External environment ================\n");
        println!("{}", analysis.to_prompt_text());
    }

    println!("\n===================== Assessments ====================\n");
    for kind in AssessmentKind::ALL {
        match state.assessment(kind) {
            Some(a) => println!(
                "{}: {} - {}",
                kind,
                if a.verdict { "OK" } else { "NG" },
                a.reason
            ),
            None => println!("{}: not assessed", kind),
        }
    }

    println!("\n======================== Pitch =======================\n");
    println!("{}", state.pitch_document);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => EngineConfig::default(),
    };
    if let Some(k) = args.k {
        config.persona_count = k;
    }
    if let Some(name) = args.model {
        config.model.name = name;
    }
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }

    let model = model::from_provider(config.model.provider.as_deref(), &config.model.name)?;
    let pipeline = Pipeline::new(model, Arc::new(StdinCollector), &config)?;

    let report = pipeline
        .run(&args.problem, &args.persona, &args.solution)
        .await?;
    log::info!(
        "Run {} finished after {} steps",
        report.run_id,
        report.steps()
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.state)?);
    } else {
        print_report(&report.state);
    }

    Ok(())
}
