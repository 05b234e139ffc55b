use std::time::Duration;

use canvas::Surface;
use jobs::{JobEvent, JobId, JobKind, JobSpec, JobStatus, JobsHandle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use screenplay::AnalysisReport;
use storyboard::{
    BoardCommand, DragSession, Shot, ShotBoard, ShotId, ShotStatus, UpdateQueue,
};
use thiserror::Error;
use tracing::{debug, warn};
use training::{ResultSet, TrainingConfig, TrainingRun};

/// Blocking notices shown to the user before an operation starts.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("please enter a shot description")]
    MissingPrompt,
    #[error("please enter edit instructions")]
    MissingInstructions,
}

const PROMPT_SUFFIXES: &[&str] = &[
    "cinematic lighting, shallow depth of field",
    "high detail, filmic grain",
    "dramatic composition, strong silhouettes",
    "moody atmosphere, practical light sources",
    "character focus, expressive faces",
];

const CANVAS_WIDTH: u32 = 400;
const CANVAS_HEIGHT: u32 = 300;

/// One editing session's entire state, owned explicitly by the entry point
/// rather than living at module scope. Every board mutation, user gesture
/// or job completion alike, goes through the update queue, so in-flight
/// drags are never interrupted.
pub struct Session {
    pub board: ShotBoard,
    pub surface: Surface,
    pub report: Option<AnalysisReport>,
    pub config: TrainingConfig,
    pub run: TrainingRun,
    pub results: ResultSet,
    pub upload_progress: Option<f32>,
    queue: UpdateQueue,
    jobs: JobsHandle,
    job_duration: Duration,
    rng: StdRng,
}

impl Session {
    pub fn new(jobs: JobsHandle, job_duration: Duration, seed: u64) -> Self {
        Self {
            board: ShotBoard::new(),
            surface: Surface::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            report: None,
            config: TrainingConfig::default(),
            run: TrainingRun::new(),
            results: ResultSet::new(),
            upload_progress: None,
            queue: UpdateQueue::new(),
            jobs,
            job_duration,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn jobs(&self) -> &JobsHandle {
        &self.jobs
    }

    pub fn seed_shots(&mut self, shots: Vec<Shot>) {
        for shot in shots {
            self.board.append(shot);
        }
    }

    /// Create a shot from a prompt and kick off its simulated render.
    /// An empty prompt is a blocking notice, not a shot.
    pub fn generate_shot(&mut self, prompt: &str, scene: &str) -> Result<ShotId, SessionError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(SessionError::MissingPrompt);
        }

        let shot = Shot::new(prompt, prompt, scene);
        let id = shot.id;
        self.submit(BoardCommand::Append(shot));
        self.submit(BoardCommand::SetStatus {
            id,
            status: ShotStatus::Generating,
        });
        self.jobs.enqueue(JobSpec {
            subject_id: id.to_string(),
            kind: JobKind::ShotRender,
            duration: self.job_duration,
        });
        Ok(id)
    }

    /// Queue a simulated AI edit against an existing shot.
    pub fn request_ai_edit(
        &mut self,
        shot: ShotId,
        instructions: &str,
    ) -> Result<JobId, SessionError> {
        if instructions.trim().is_empty() {
            return Err(SessionError::MissingInstructions);
        }
        Ok(self.jobs.enqueue(JobSpec {
            subject_id: shot.to_string(),
            kind: JobKind::AiEdit,
            duration: self.job_duration,
        }))
    }

    /// Append a canned cinematic suffix, chosen deterministically from the
    /// prompt itself so the CLI stays reproducible.
    pub fn improve_prompt(prompt: &str) -> String {
        let mut hash: u32 = 0x811c_9dc5;
        for byte in prompt.bytes() {
            hash ^= u32::from(byte);
            hash = hash.wrapping_mul(0x0100_0193);
        }
        let suffix = PROMPT_SUFFIXES[hash as usize % PROMPT_SUFFIXES.len()];
        format!("{}, {}", prompt.trim(), suffix)
    }

    /// Pointer-down on a card: board mutations defer until the drag ends.
    pub fn begin_drag(&mut self, dragged: ShotId) -> DragSession {
        self.queue.hold();
        DragSession::begin(dragged)
    }

    /// Pointer-up: apply the drop (if any), then drain everything that
    /// arrived mid-drag. Returns how many deferred commands applied.
    pub fn finish_drag(&mut self, drag: DragSession) -> usize {
        if let Some((dragged, intent)) = drag.finish() {
            self.board.move_shot(dragged, intent.target, intent.before);
        }
        self.queue.release(&mut self.board)
    }

    pub fn deferred_commands(&self) -> usize {
        self.queue.pending()
    }

    /// Advance the training simulation one tick.
    pub fn tick_training(&mut self) -> bool {
        self.run.tick(&mut self.rng)
    }

    /// Route one job event back into session state.
    pub fn handle_event(&mut self, event: &JobEvent) {
        match (&event.kind, &event.status) {
            (JobKind::ShotRender, JobStatus::Done) => {
                if let Some(id) = parse_shot_id(&event.subject_id) {
                    self.submit(BoardCommand::SetStatus {
                        id,
                        status: ShotStatus::Completed,
                    });
                    self.submit(BoardCommand::SetThumbnail {
                        id,
                        thumbnail: format!("https://picsum.photos/seed/{id}/200/120"),
                    });
                }
            }
            (JobKind::AiEdit, JobStatus::Done) => {
                if let Some(id) = parse_shot_id(&event.subject_id) {
                    self.submit(BoardCommand::SetThumbnail {
                        id,
                        thumbnail: format!("https://picsum.photos/seed/{id}-edit/200/120"),
                    });
                }
            }
            (JobKind::Upload, JobStatus::Progress(p)) => {
                self.upload_progress = Some(*p);
            }
            (JobKind::Upload, JobStatus::Done) => {
                self.upload_progress = Some(1.0);
            }
            (_, JobStatus::Canceled) => {
                debug!(job = %event.id, kind = ?event.kind, "job canceled");
            }
            _ => {}
        }
    }

    /// Block until `count` jobs have finished (done, failed, or canceled),
    /// routing every event through the session. Returns how many finished
    /// before the timeout.
    pub fn await_jobs(&mut self, count: usize, timeout: Duration) -> usize {
        let rx = self.jobs.rx_events.clone();
        let deadline = std::time::Instant::now() + timeout;
        let mut finished = 0;
        while finished < count {
            let Some(remaining) = deadline.checked_duration_since(std::time::Instant::now())
            else {
                warn!("timed out waiting for simulated jobs");
                break;
            };
            let Ok(event) = rx.recv_timeout(remaining) else {
                warn!("timed out waiting for simulated jobs");
                break;
            };
            if matches!(
                event.status,
                JobStatus::Done | JobStatus::Failed(_) | JobStatus::Canceled
            ) {
                finished += 1;
            }
            self.handle_event(&event);
        }
        finished
    }

    fn submit(&mut self, command: BoardCommand) {
        if let Err(err) = self.queue.submit(&mut self.board, command) {
            // Stale transitions degrade to a warning, like every not-found path.
            warn!(%err, "board command rejected");
        }
    }
}

fn parse_shot_id(subject: &str) -> Option<ShotId> {
    subject.parse::<u64>().ok().map(ShotId)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobs::JobsRuntime;

    fn session(job_ms: u64) -> Session {
        Session::new(JobsRuntime::start(2), Duration::from_millis(job_ms), 7)
    }

    #[test]
    fn empty_prompt_is_a_blocking_notice() {
        let mut session = session(10);
        let err = session.generate_shot("   ", "INT. TEST - DAY").unwrap_err();
        assert!(matches!(err, SessionError::MissingPrompt));
        assert!(session.board.is_empty());
    }

    #[test]
    fn generated_shot_completes_with_a_thumbnail() {
        let mut session = session(30);
        let id = session
            .generate_shot("Juno drifts into the stacks", "EXT. HARBOR - NIGHT")
            .unwrap();
        assert_eq!(session.board.get(id).unwrap().status, ShotStatus::Generating);

        let finished = session.await_jobs(1, Duration::from_secs(5));
        assert_eq!(finished, 1);
        let shot = session.board.get(id).unwrap();
        assert_eq!(shot.status, ShotStatus::Completed);
        assert!(shot.thumbnail.is_some());
    }

    #[test]
    fn completion_mid_drag_is_deferred() {
        let mut session = session(30);
        let anchor = session
            .generate_shot("anchor shot", "EXT. HARBOR - NIGHT")
            .unwrap();
        let other = session
            .generate_shot("second shot", "EXT. HARBOR - NIGHT")
            .unwrap();

        let drag = session.begin_drag(other);
        session.await_jobs(2, Duration::from_secs(5));
        // Both completions arrived during the drag; nothing applied yet.
        assert!(session.deferred_commands() > 0);
        assert_eq!(
            session.board.get(anchor).unwrap().status,
            ShotStatus::Generating
        );

        let applied = session.finish_drag(drag);
        assert!(applied >= 2);
        assert_eq!(
            session.board.get(anchor).unwrap().status,
            ShotStatus::Completed
        );
    }

    #[test]
    fn improve_prompt_is_deterministic() {
        let a = Session::improve_prompt("a lone skiff");
        let b = Session::improve_prompt("a lone skiff");
        assert_eq!(a, b);
        assert!(a.starts_with("a lone skiff, "));
    }
}
