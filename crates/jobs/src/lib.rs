//! Simulated asynchronous job runtime.
//!
//! Every "AI" operation in the app (rendering a shot, applying an edit,
//! uploading a script) is a timer dressed up as work. Jobs run on worker
//! threads that sleep in small slices and emit status events over a
//! channel, so callers integrate exactly as they would against a real
//! backend: enqueue, watch events, mutate state on completion. Cancellation
//! is honored between sleep slices.

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// How finely a sleeping job checks for cancellation.
const SLICE: Duration = Duration::from_millis(20);
/// Progress events per job, roughly.
const PROGRESS_TICKS: u32 = 4;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job runtime stopped")]
    Stopped,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    ShotRender,
    AiEdit,
    Upscale,
    Refine,
    Variations,
    Upload,
    Analysis,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSpec {
    /// Caller-side id the completion should be routed back to (a shot id,
    /// an upload name, ...). Opaque to the runtime.
    pub subject_id: String,
    pub kind: JobKind,
    pub duration: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum JobStatus {
    Pending,
    Running,
    Progress(f32),
    Done,
    Failed(String),
    Canceled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobEvent {
    pub id: JobId,
    pub subject_id: String,
    pub kind: JobKind,
    pub status: JobStatus,
}

#[derive(Clone)]
pub struct JobsHandle {
    tx_submit: Sender<(JobId, JobSpec)>,
    tx_cancel: Sender<JobId>,
    pub rx_events: Receiver<JobEvent>,
}

impl JobsHandle {
    pub fn enqueue(&self, spec: JobSpec) -> JobId {
        let id = JobId::new();
        let _ = self.tx_submit.send((id, spec));
        id
    }

    pub fn cancel(&self, job_id: JobId) {
        let _ = self.tx_cancel.send(job_id);
    }
}

pub struct JobsRuntime;

impl JobsRuntime {
    pub fn start(num_workers: usize) -> JobsHandle {
        let (tx_submit, rx_submit) = unbounded::<(JobId, JobSpec)>();
        let (tx_cancel, rx_cancel) = unbounded::<JobId>();
        let (tx_events, rx_events) = unbounded::<JobEvent>();
        let queue: Arc<Mutex<VecDeque<(JobId, JobSpec)>>> = Arc::new(Mutex::new(VecDeque::new()));
        let canceled: Arc<Mutex<HashSet<JobId>>> = Arc::new(Mutex::new(HashSet::new()));

        // Feeder thread: accepts submissions and cancellations.
        {
            let queue = queue.clone();
            let canceled = canceled.clone();
            let tx_events = tx_events.clone();
            thread::spawn(move || loop {
                select! {
                    recv(rx_submit) -> msg => {
                        if let Ok((id, spec)) = msg {
                            // A cancel can outrun its submission.
                            if canceled.lock().remove(&id) {
                                let _ = tx_events.send(JobEvent {
                                    id,
                                    subject_id: spec.subject_id,
                                    kind: spec.kind,
                                    status: JobStatus::Canceled,
                                });
                                continue;
                            }
                            queue.lock().push_back((id, spec.clone()));
                            let _ = tx_events.send(JobEvent {
                                id,
                                subject_id: spec.subject_id,
                                kind: spec.kind,
                                status: JobStatus::Pending,
                            });
                        } else {
                            break;
                        }
                    }
                    recv(rx_cancel) -> msg => {
                        if let Ok(id) = msg {
                            canceled.lock().insert(id);
                        } else {
                            break;
                        }
                    }
                    default(Duration::from_millis(10)) => {}
                }
            });
        }

        for _ in 0..num_workers.max(1) {
            let queue = queue.clone();
            let canceled = canceled.clone();
            let tx_events = tx_events.clone();
            thread::spawn(move || loop {
                let next = queue.lock().pop_front();
                let Some((id, spec)) = next else {
                    thread::sleep(Duration::from_millis(10));
                    continue;
                };

                if canceled.lock().remove(&id) {
                    let _ = tx_events.send(JobEvent {
                        id,
                        subject_id: spec.subject_id,
                        kind: spec.kind,
                        status: JobStatus::Canceled,
                    });
                    continue;
                }

                debug!(job = %id, kind = ?spec.kind, "job running");
                let _ = tx_events.send(JobEvent {
                    id,
                    subject_id: spec.subject_id.clone(),
                    kind: spec.kind,
                    status: JobStatus::Running,
                });

                match simulate(id, &spec, &canceled, &tx_events) {
                    Outcome::Finished => {
                        let _ = tx_events.send(JobEvent {
                            id,
                            subject_id: spec.subject_id,
                            kind: spec.kind,
                            status: JobStatus::Done,
                        });
                    }
                    Outcome::Canceled => {
                        debug!(job = %id, "job canceled mid-run");
                        let _ = tx_events.send(JobEvent {
                            id,
                            subject_id: spec.subject_id,
                            kind: spec.kind,
                            status: JobStatus::Canceled,
                        });
                    }
                }
            });
        }

        JobsHandle {
            tx_submit,
            tx_cancel,
            rx_events,
        }
    }
}

enum Outcome {
    Finished,
    Canceled,
}

/// Sleep out the job's duration in slices, checking the cancel set between
/// slices and emitting coarse progress along the way.
fn simulate(
    id: JobId,
    spec: &JobSpec,
    canceled: &Mutex<HashSet<JobId>>,
    tx_events: &Sender<JobEvent>,
) -> Outcome {
    let total = spec.duration;
    let slices = (total.as_millis() / SLICE.as_millis()).max(1) as u32;
    let progress_every = (slices / PROGRESS_TICKS).max(1);

    for slice in 0..slices {
        thread::sleep(total / slices);
        if canceled.lock().remove(&id) {
            return Outcome::Canceled;
        }
        if slice % progress_every == progress_every - 1 && slice + 1 < slices {
            let _ = tx_events.send(JobEvent {
                id,
                subject_id: spec.subject_id.clone(),
                kind: spec.kind,
                status: JobStatus::Progress((slice + 1) as f32 / slices as f32),
            });
        }
    }
    Outcome::Finished
}
