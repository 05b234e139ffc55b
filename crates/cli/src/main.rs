use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use jobs::{JobKind, JobSpec, JobsRuntime};
use screenplay::{
    providers::mock::MockAnalyzer, AnalyzerService, ElementCategory, ScriptUpload,
};
use storyboard::{
    indicator_offset, resolve_drop, Bounds, FlowAxis, Point, ShotBoard, ShotId,
};
use training::ResultSet;

mod sample;
mod session;

use session::Session;

#[derive(Parser)]
#[command(name = "plotboard")]
#[command(about = "Plotboard CLI - storyboard preproduction against a mocked AI backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the upload -> analysis -> training -> shots flow end to end
    Flow {
        /// Script file to upload (only its name and size are read)
        script: Option<PathBuf>,

        /// Milliseconds per simulated job
        #[arg(long, default_value = "400")]
        job_ms: u64,

        /// Seed for the training simulation
        #[arg(long, default_value = "7")]
        seed: u64,
    },

    /// Drive the storyboard editor: generate, drag-reorder, sketch, undo
    Board {
        /// Milliseconds per simulated job
        #[arg(long, default_value = "250")]
        job_ms: u64,
    },

    /// Validate a script upload and print the extracted elements as JSON
    Analyze {
        /// Script file to analyze
        file: PathBuf,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Flow {
            script,
            job_ms,
            seed,
        } => flow_command(script, job_ms, seed),
        Commands::Board { job_ms } => board_command(job_ms),
        Commands::Analyze { file, output } => analyze_command(file, output),
    }
}

fn flow_command(script: Option<PathBuf>, job_ms: u64, seed: u64) -> Result<()> {
    let job_duration = Duration::from_millis(job_ms);
    let mut session = Session::new(JobsRuntime::start(2), job_duration, seed);

    println!("== Projects ==");
    for project in sample::recent_projects() {
        println!("  {}", project.title);
    }

    println!("\n== Script Upload ==");
    let (file_name, size_bytes) = match &script {
        Some(path) => {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("script.txt")
                .to_string();
            let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(18_000);
            (name, size)
        }
        None => ("harbor_stacks.fountain".to_string(), 18_000),
    };
    let upload = match ScriptUpload::validate(&file_name, size_bytes) {
        Ok(upload) => upload,
        Err(notice) => {
            // Inline, dismissible: the flow just stops here.
            println!("  upload rejected: {notice}");
            return Ok(());
        }
    };
    session.jobs().enqueue(JobSpec {
        subject_id: upload.file_name.clone(),
        kind: JobKind::Upload,
        duration: job_duration,
    });
    session.await_jobs(1, Duration::from_secs(30));
    let percent = session.upload_progress.unwrap_or_default() * 100.0;
    println!(
        "  uploaded {} ({} KiB) - {percent:.0}%",
        upload.file_name,
        upload.size_bytes / 1024
    );

    println!("\n== Script Analysis ==");
    let service = AnalyzerService::new(Arc::new(MockAnalyzer::new()));
    let mut report = service.analyze(&upload)?;
    println!("  {}", report.script_title);
    for category in [
        ElementCategory::Character,
        ElementCategory::Location,
        ElementCategory::Style,
    ] {
        println!("  {category}s:");
        for element in report.by_category(category) {
            let mark = if element.selected { "x" } else { " " };
            println!("    [{mark}] {} - {}", element.name, element.description);
        }
    }
    // Pull one deselected element into the training set, as a user would.
    if let Some(id) = report
        .elements
        .iter()
        .find(|e| !e.selected)
        .map(|e| e.id)
    {
        report.toggle(id);
    }
    session.report = Some(report);

    println!("\n== Training ({:?}) ==", session.config.model);
    session.run.start();
    let mut last_bucket = 0;
    while session.run.is_active() {
        session.tick_training();
        let bucket = (session.run.progress() / 20.0) as u32;
        if bucket > last_bucket {
            last_bucket = bucket;
            println!(
                "  {:>3.0}%  {} (~{}s left)",
                session.run.progress(),
                session.run.current_task(),
                session.run.estimated_secs()
            );
        }
        std::thread::sleep(Duration::from_millis(25));
    }
    println!("  {}", session.run.current_task());

    println!("\n== Results Approval ==");
    let selected = session
        .report
        .as_ref()
        .map(|r| r.selected())
        .unwrap_or_default();
    session.results = ResultSet::from_elements(&selected);
    let confident: Vec<_> = session
        .results
        .records()
        .iter()
        .filter(|r| r.confidence >= 0.80)
        .map(|r| r.id)
        .collect();
    session.results.approve_many(&confident);
    for record in session.results.records() {
        let mark = if record.approved { "approved" } else { "rejected" };
        println!(
            "  {:>8}  {} ({}, {:.0}% confidence)",
            mark,
            record.name,
            record.category,
            record.confidence * 100.0
        );
    }
    println!(
        "  {} of {} approved",
        session.results.approved_count(),
        session.results.len()
    );

    println!("\n== Project Shots ==");
    let prompts: Vec<String> = selected
        .iter()
        .filter(|e| e.category == ElementCategory::Character)
        .take(2)
        .map(|character| format!("{} under the Harbor Stacks at night", character.name))
        .collect();
    let mut queued = 0;
    for prompt in &prompts {
        let improved = Session::improve_prompt(prompt);
        match session.generate_shot(&improved, "EXT. HARBOR STACKS - NIGHT") {
            Ok(_) => queued += 1,
            Err(notice) => println!("  notice: {notice}"),
        }
    }
    session.await_jobs(queued, Duration::from_secs(30));
    println!("{}", render_list(&session.board));
    println!("  timeline: {}", render_timeline(&session.board));

    info!("flow completed");
    Ok(())
}

fn board_command(job_ms: u64) -> Result<()> {
    let job_duration = Duration::from_millis(job_ms);
    let mut session = Session::new(JobsRuntime::start(2), job_duration, 7);

    // Two observers of the same board, standing in for the two views.
    let list_view = session.board.subscribe();
    let timeline_view = session.board.subscribe();

    session.seed_shots(sample::sample_shots());
    println!("== Storyboard ==");
    println!("{}", render_list(&session.board));
    println!("  timeline: {}", render_timeline(&session.board));

    // An empty prompt never creates a shot.
    if let Err(notice) = session.generate_shot("  ", "EXT. HARBOR STACKS - NIGHT") {
        println!("\n  notice: {notice}");
    }

    let prompt = Session::improve_prompt("Juno cuts the engine and drifts the last hundred meters");
    println!("\n  generating: {prompt}");
    let generated = session.generate_shot(&prompt, "EXT. HARBOR STACKS - NIGHT")?;

    // Drag the new shot toward the top of the list while its render is
    // still in flight; the completion defers until pointer-up.
    let card_bounds = |index: usize| Bounds::new(0.0, index as f32 * 90.0, 240.0, 80.0);
    let target = session.board.shots()[1].id;
    let mut drag = session.begin_drag(generated);
    drag.hover(resolve_drop(
        FlowAxis::Vertical,
        Point::new(120.0, card_bounds(1).y + 8.0),
        target,
        card_bounds(1),
    ));
    session.await_jobs(1, Duration::from_secs(30));
    println!(
        "  render finished mid-drag; {} mutation(s) held back",
        session.deferred_commands()
    );
    session.finish_drag(drag);
    println!("\n== After list drag ==");
    println!("{}", render_list(&session.board));

    // Same shot dragged on the horizontal timeline, to the far end.
    let ids: Vec<ShotId> = session.board.shots().iter().map(|s| s.id).collect();
    let cell_bounds = |index: usize| Bounds::new(index as f32 * 120.0, 0.0, 100.0, 48.0);
    let container = Bounds::new(0.0, 0.0, 1200.0, 48.0);
    let last_index = ids.len() - 1;
    let last_cell = cell_bounds(last_index);
    let intent = resolve_drop(
        FlowAxis::Horizontal,
        Point::new(last_cell.center_x() + 30.0, 20.0),
        ids[last_index],
        last_cell,
    );
    println!(
        "\n  insertion line at x = {}",
        indicator_offset(last_cell, container, intent.before)
    );
    let mut drag = session.begin_drag(generated);
    drag.hover(intent);
    session.finish_drag(drag);
    println!("== After timeline drag ==");
    println!("  timeline: {}", render_timeline(&session.board));

    // Delete degrades silently for ids that are already gone.
    let doomed = session.board.shots()[2].id;
    session.board.remove(doomed);
    session.board.remove(doomed);
    println!("\n== After delete ==");
    println!("{}", render_list(&session.board));

    // Sketch pass over the generated shot, then exercise the history.
    if let Some(thumbnail) = session
        .board
        .get(generated)
        .and_then(|s| s.thumbnail.clone())
    {
        session.surface.load_reference(&thumbnail);
    }
    session.surface.begin_stroke(40.0, 60.0);
    session.surface.stroke_to(180.0, 90.0);
    session.surface.end_stroke();
    session.surface.begin_stroke(200.0, 120.0);
    session.surface.stroke_to(260.0, 150.0);
    session.surface.end_stroke();
    session.surface.undo()?;
    session.surface.redo()?;
    session.surface.clear();
    session.surface.undo()?;
    let history = session.surface.history();
    println!(
        "\n== Sketch history ==\n  {} snapshot(s), cursor {:?}, undo possible: {}",
        history.len(),
        history.cursor(),
        history.can_undo()
    );

    // Simulated AI edit replaces the thumbnail on completion.
    session.request_ai_edit(generated, "add rain streaks and a cold rim light")?;
    session.await_jobs(1, Duration::from_secs(30));
    if let Some(shot) = session.board.get(generated) {
        println!("\n  edited thumbnail: {:?}", shot.thumbnail);
    }

    // Quick action with second thoughts: an upscale canceled mid-run.
    let upscale = session.jobs().enqueue(JobSpec {
        subject_id: generated.to_string(),
        kind: JobKind::Upscale,
        duration: job_duration,
    });
    session.jobs().cancel(upscale);
    session.await_jobs(1, Duration::from_secs(30));
    println!("  upscale {upscale} canceled before it finished");

    println!(
        "\n  list view saw {} event(s); timeline view saw {}",
        list_view.try_iter().count(),
        timeline_view.try_iter().count()
    );
    info!("board demo completed");
    Ok(())
}

fn analyze_command(file: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let metadata =
        std::fs::metadata(&file).with_context(|| format!("read {}", file.display()))?;
    let name = file.file_name().and_then(|n| n.to_str()).unwrap_or_default();

    let upload = match ScriptUpload::validate(name, metadata.len()) {
        Ok(upload) => upload,
        Err(notice) => {
            println!("upload rejected: {notice}");
            return Ok(());
        }
    };

    let service = AnalyzerService::new(Arc::new(MockAnalyzer::new()));
    let report = service.analyze(&upload)?;
    let payload = serde_json::json!({
        "file": upload.file_name,
        "analyzed_at": chrono::Utc::now().to_rfc3339(),
        "title": report.script_title,
        "elements": report.elements,
    });

    if let Some(path) = output {
        std::fs::write(&path, serde_json::to_string_pretty(&payload)?)?;
        info!("analysis written to {:?}", path);
    } else {
        println!("{}", serde_json::to_string_pretty(&payload)?);
    }
    Ok(())
}

fn render_list(board: &ShotBoard) -> String {
    board
        .shots()
        .iter()
        .map(|shot| {
            format!(
                "  #{:<2} [{:^10}] {}",
                shot.number,
                shot.status.as_str(),
                shot.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_timeline(board: &ShotBoard) -> String {
    board
        .shots()
        .iter()
        .map(|shot| format!("[ Shot {} ]", shot.number))
        .collect()
}
