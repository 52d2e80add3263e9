// file: src/main.rs
// description: commandline application entry point with the metadata wizard
// reference: application bootstrap and orchestration

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use dsp_drafter::pipeline::STDIN_IDENTIFIER;
use dsp_drafter::utils::logging::{
    format_error, format_heading, format_info, format_prompt, format_step, format_success,
    format_warning,
};
use dsp_drafter::{
    Config, DataClassification, DspProcessor, InfrastructureType, ProjectMetadata, ProjectRequest,
    RetrievalMode,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "dsp_drafter")]
#[command(version)]
#[command(
    about = "Drafts Data Security Plans from a project summary and previously approved plans",
    long_about = None
)]
struct Cli {
    /// Summary file, project folder under the projects directory, or `-` for stdin
    #[arg(value_name = "PROJECT")]
    project: Option<String>,

    #[arg(long, value_name = "PROJECT", conflicts_with = "project")]
    summary: Option<String>,

    /// Output directory (default: <projects_dir>/<project name>)
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Walk through the project metadata before drafting
    #[arg(short, long, action = ArgAction::SetTrue)]
    interactive: bool,

    #[command(flatten)]
    metadata: MetadataArgs,

    #[arg(long, value_enum)]
    retrieval: Option<RetrievalMode>,

    #[arg(long, value_name = "NUM")]
    workers: Option<usize>,

    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(clap::Args, Debug, Default)]
struct MetadataArgs {
    #[arg(long)]
    project_name: Option<String>,

    /// Principal Investigator
    #[arg(long)]
    pi: Option<String>,

    /// Unit Information Security Lead
    #[arg(long)]
    uisl: Option<String>,

    #[arg(long)]
    department: Option<String>,

    #[arg(long, value_enum)]
    classification: Option<DataClassification>,

    /// Project involves Controlled Unclassified Information
    #[arg(long, action = ArgAction::SetTrue)]
    cui: bool,

    #[arg(long)]
    provider: Option<String>,

    #[arg(long, value_enum)]
    infrastructure: Option<InfrastructureType>,

    #[arg(long)]
    os: Option<String>,

    #[arg(long)]
    transfer_method: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    retention_date: Option<String>,

    #[arg(long)]
    destruction_method: Option<String>,
}

impl MetadataArgs {
    fn is_empty(&self) -> bool {
        self.project_name.is_none()
            && self.pi.is_none()
            && self.uisl.is_none()
            && self.department.is_none()
            && self.classification.is_none()
            && !self.cui
            && self.provider.is_none()
            && self.infrastructure.is_none()
            && self.os.is_none()
            && self.transfer_method.is_none()
            && self.retention_date.is_none()
            && self.destruction_method.is_none()
    }

    fn apply(&self, metadata: &mut ProjectMetadata) {
        let text_fields = [
            (&self.project_name, &mut metadata.project_name),
            (&self.pi, &mut metadata.pi_name),
            (&self.uisl, &mut metadata.uisl_name),
            (&self.department, &mut metadata.department),
            (&self.provider, &mut metadata.data_provider),
            (&self.os, &mut metadata.os_type),
            (&self.transfer_method, &mut metadata.transfer_method),
            (&self.retention_date, &mut metadata.retention_date),
            (&self.destruction_method, &mut metadata.destruction_method),
        ];
        for (value, field) in text_fields {
            if let Some(value) = value {
                *field = value.clone();
            }
        }

        if let Some(classification) = self.classification {
            metadata.classification = classification;
        }
        if let Some(infrastructure) = self.infrastructure {
            metadata.infrastructure = infrastructure;
        }
        if self.cui {
            metadata.is_cui = true;
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if !cli.color {
        colored::control::set_override(false);
    }
    dsp_drafter::utils::logging::init_logger(cli.color, cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{}", format_error(&format!("{:#}", e)));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let identifier = cli.project.clone().or_else(|| cli.summary.clone());

    if identifier.is_none() && !cli.interactive {
        bail!("Provide a project summary (path, project folder or `-`) or use --interactive");
    }
    if cli.interactive && identifier.as_deref() == Some(STDIN_IDENTIFIER) {
        bail!("--interactive reads answers from stdin, so the summary cannot come from `-`");
    }

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(workers) = cli.workers {
        config.pipeline.parallel_workers = workers;
    }
    if let Some(retrieval) = cli.retrieval {
        config.pipeline.retrieval = retrieval;
    }
    config.validate().context("Invalid configuration")?;

    let total_steps = if cli.interactive { 3 } else { 2 };
    let mut step = 1;

    println!("{}", format_step(step, total_steps, "Loading knowledge base"));
    // example extraction is blocking work
    let processor = tokio::task::spawn_blocking(move || DspProcessor::from_config(config))
        .await
        .context("Knowledge base loading was interrupted")?
        .context("Failed to initialize the drafter")?
        .with_progress(true, cli.color);

    if processor.knowledge().is_empty() {
        println!(
            "{}",
            format_warning("No example DSPs found; drafts will rely on the summary alone")
        );
    }

    let metadata = if cli.interactive {
        step += 1;
        println!("{}", format_step(step, total_steps, "Project details"));

        let mut prefill = ProjectMetadata::default();
        if let Some(identifier) = identifier.as_deref() {
            let summary = processor
                .get_project_summary(identifier)
                .await
                .context("Failed to read project summary")?;

            println!("{}", format_info("Extracting project details from the summary"));
            let partial = processor.generator().extract_metadata(&summary).await;
            if partial.is_empty() {
                println!(
                    "{}",
                    format_warning("No details could be extracted; starting from defaults")
                );
            }
            prefill = ProjectMetadata::from_partial(partial, prefill);
        }
        cli.metadata.apply(&mut prefill);

        let stdin = io::stdin();
        let mut wizard = Wizard::new(stdin.lock(), io::stdout());
        Some(wizard.run(prefill).context("Metadata wizard failed")?)
    } else if !cli.metadata.is_empty() {
        let mut metadata = ProjectMetadata::default();
        cli.metadata.apply(&mut metadata);
        Some(metadata)
    } else {
        None
    };

    step += 1;
    println!("{}", format_step(step, total_steps, "Drafting sections"));

    let request = ProjectRequest {
        identifier,
        metadata,
        output_dir: cli.output,
    };

    let artifacts = processor
        .process_project(&request)
        .await
        .context("DSP generation failed")?;

    let stats = &artifacts.stats;
    info!(
        "Drafted {} sections ({} failed) in {:.2}s, {:.1} sections/min",
        stats.sections_generated + stats.sections_failed,
        stats.sections_failed,
        stats.duration.as_secs_f64(),
        stats.sections_per_minute()
    );

    if stats.sections_failed > 0 {
        println!(
            "{}",
            format_warning(&format!(
                "{} sections contain [[ERROR]] placeholders and need manual drafting",
                stats.sections_failed
            ))
        );
    }
    if artifacts.pdf_path.is_none() {
        warn!("PDF conversion unavailable; the HTML report is the final document");
    }

    println!("{}", format_info(&format!("Log: {}", artifacts.log_path.display())));
    println!(
        "{}",
        format_info(&format!("Markdown: {}", artifacts.markdown_path.display()))
    );
    println!(
        "{}",
        format_success(&format!(
            "DSP for {} saved to {}",
            artifacts.project_name,
            artifacts.final_artifact().display()
        ))
    );

    Ok(())
}

/// Line-based questionnaire. An empty answer keeps the pre-filled value.
struct Wizard<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Wizard<R, W> {
    fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn run(&mut self, prefill: ProjectMetadata) -> Result<ProjectMetadata> {
        let mut metadata = prefill;

        writeln!(self.output, "{}", format_heading("Project Identity"))?;
        metadata.project_name = self.ask_text("Project Name", &metadata.project_name)?;
        metadata.pi_name = self.ask_text("PI Name", &metadata.pi_name)?;
        metadata.uisl_name = self.ask_text("UISL Name", &metadata.uisl_name)?;
        metadata.department = self.ask_text("Department", &metadata.department)?;

        writeln!(self.output, "{}", format_heading("Data Sensitivity"))?;
        metadata.classification = self.ask_choice(
            "Data Classification",
            &DataClassification::ALL,
            metadata.classification,
            |c| c.label(),
        )?;
        metadata.is_cui = self.ask_bool("Involves CUI?", metadata.is_cui)?;
        metadata.data_provider = self.ask_text("Data Provider", &metadata.data_provider)?;

        writeln!(self.output, "{}", format_heading("Infrastructure"))?;
        metadata.infrastructure = self.ask_choice(
            "Infrastructure",
            &InfrastructureType::ALL,
            metadata.infrastructure,
            |i| i.label(),
        )?;
        metadata.os_type = self.ask_text("Operating System", &metadata.os_type)?;
        metadata.transfer_method = self.ask_text("Transfer Method", &metadata.transfer_method)?;

        writeln!(self.output, "{}", format_heading("Lifecycle"))?;
        metadata.retention_date =
            self.ask_text("Retention Date (YYYY-MM-DD)", &metadata.retention_date)?;
        metadata.destruction_method =
            self.ask_text("Destruction Method", &metadata.destruction_method)?;

        Ok(metadata)
    }

    fn read_answer(&mut self, question: &str, default: &str) -> Result<String> {
        write!(self.output, "{}", format_prompt(question, default))?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    fn ask_text(&mut self, question: &str, default: &str) -> Result<String> {
        let answer = self.read_answer(question, default)?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }

    fn ask_bool(&mut self, question: &str, default: bool) -> Result<bool> {
        loop {
            let answer = self.read_answer(question, if default { "y" } else { "n" })?;
            match answer.to_ascii_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "{}", format_warning("Please answer y or n"))?,
            }
        }
    }

    /// Accepts the option number or its label.
    fn ask_choice<T: Copy + PartialEq>(
        &mut self,
        question: &str,
        options: &[T],
        default: T,
        label: impl Fn(&T) -> &'static str,
    ) -> Result<T> {
        for (number, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}. {}", number + 1, label(option))?;
        }

        loop {
            let answer = self.read_answer(question, label(&default))?;
            if answer.is_empty() {
                return Ok(default);
            }

            let by_number = answer
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|index| options.get(index).copied());
            let by_label = options
                .iter()
                .find(|option| label(option).eq_ignore_ascii_case(&answer))
                .copied();

            match by_number.or(by_label) {
                Some(choice) => return Ok(choice),
                None => writeln!(
                    self.output,
                    "{}",
                    format_warning(&format!("Choose 1-{}", options.len()))
                )?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_wizard(answers: &str, prefill: ProjectMetadata) -> ProjectMetadata {
        let mut output = Vec::new();
        let mut wizard = Wizard::new(Cursor::new(answers.to_string()), &mut output);
        wizard.run(prefill).unwrap()
    }

    #[test]
    fn test_wizard_keeps_prefill_on_empty_answers() {
        let prefill = ProjectMetadata {
            pi_name: "Dr. Vega".to_string(),
            ..ProjectMetadata::default()
        };

        let metadata = run_wizard(&"\n".repeat(12), prefill.clone());
        assert_eq!(metadata, prefill);
    }

    #[test]
    fn test_wizard_reads_answers() {
        let answers = "Nebula\nDr. Vega\n\n\n3\nmaybe\ny\nNIH\nAir-Gapped Server\n\nUSB\n2031-06-30\n\n";
        let metadata = run_wizard(answers, ProjectMetadata::default());

        assert_eq!(metadata.project_name, "Nebula");
        assert_eq!(metadata.pi_name, "Dr. Vega");
        assert_eq!(metadata.uisl_name, "Unknown UISL");
        assert_eq!(metadata.classification, DataClassification::Hipaa);
        assert!(metadata.is_cui);
        assert_eq!(metadata.data_provider, "NIH");
        assert_eq!(metadata.infrastructure, InfrastructureType::AirGap);
        assert_eq!(metadata.os_type, "Linux");
        assert_eq!(metadata.transfer_method, "USB");
        assert_eq!(metadata.retention_date, "2031-06-30");
        assert_eq!(metadata.destruction_method, "DoD Wipe");
    }

    #[test]
    fn test_invalid_choice_asks_again() {
        let answers = "\n\n\n\n9\n1\n\n\n\n\n\n\n\n";
        let metadata = run_wizard(answers, ProjectMetadata::default());

        assert_eq!(metadata.classification, DataClassification::P3);
    }

    #[test]
    fn test_metadata_flags_override_defaults() {
        let cli = Cli::parse_from([
            "dsp_drafter",
            "Nebula",
            "--pi",
            "Dr. Vega",
            "--classification",
            "export-controlled",
            "--infrastructure",
            "air-gap",
            "--cui",
        ]);
        assert_eq!(cli.project.as_deref(), Some("Nebula"));
        assert!(!cli.metadata.is_empty());

        let mut metadata = ProjectMetadata::default();
        cli.metadata.apply(&mut metadata);

        assert_eq!(metadata.pi_name, "Dr. Vega");
        assert_eq!(metadata.classification, DataClassification::ExportControlled);
        assert_eq!(metadata.infrastructure, InfrastructureType::AirGap);
        assert!(metadata.is_cui);
        assert_eq!(metadata.project_name, "My Research Project");
    }

    #[test]
    fn test_summary_flag_conflicts_with_positional() {
        let parsed = Cli::try_parse_from(["dsp_drafter", "Nebula", "--summary", "Other"]);
        assert!(parsed.is_err());
    }
}
