use crate::archive::{pack_archive, ArchiveArtifact, ZipArchiveBuilder};
use crate::error::{PackError, Result};
use crate::formats::MediaType;
use crate::logger;
use crate::processing::{convert_image, ConvertOptions};
use crate::sizing::{plan_size, SizePlan};
use crate::store::{ImageStore, TrackedImage};
use crate::{verbose, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Instant, SystemTime};
use tokio::task::{Id, JoinError, JoinSet};

/// One archive entry: the original name with either the untouched original bytes or
/// a freshly encoded payload of the same media type.
#[derive(Debug, Clone)]
pub struct ConversionResult {
    pub name: String,
    pub media_type: MediaType,
    pub payload: Arc<[u8]>,
    pub plan: SizePlan,
}

#[derive(Debug)]
pub struct ConversionFailure {
    pub name: String,
    pub error: PackError,
}

/// Everything a batch run produced. Results and failures are sorted by name.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub results: Vec<ConversionResult>,
    pub failures: Vec<ConversionFailure>,
}

impl BatchOutcome {
    pub fn resized_count(&self) -> usize {
        self.results.iter().filter(|r| r.plan.needs_resize).count()
    }

    pub fn passed_through_count(&self) -> usize {
        self.results.len() - self.resized_count()
    }
}

/// Runs the resize decision and conversion for every active image of a snapshot.
///
/// Conversions needing a resize are fanned out onto tokio's blocking pool with no
/// concurrency cap and joined before `convert` returns. A failing image is logged
/// and reported in [`BatchOutcome::failures`]; the rest of the batch carries on.
/// Only one run may be in flight per converter.
pub struct BatchConverter {
    options: ConvertOptions,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on every exit path of a run.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl BatchConverter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn begin_run(&self) -> Result<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PackError::BatchInProgress)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    pub async fn convert(&self, snapshot: Vec<TrackedImage>) -> Result<BatchOutcome> {
        let _guard = self.begin_run()?;

        let images: Vec<TrackedImage> = snapshot.into_iter().filter(|i| i.active).collect();
        let mut outcome = BatchOutcome::default();
        if images.is_empty() {
            return Ok(outcome);
        }

        let ceiling = self.options.ceiling();
        let progress = logger::progress_bar(images.len() as u64);
        let mut tasks: JoinSet<Result<ConversionResult>> = JoinSet::new();
        let mut pending = HashMap::new();

        for image in images {
            let plan = match plan_size(image.width, image.height, ceiling) {
                Ok(plan) => plan,
                Err(error) => {
                    warn!("Skipping {}: {}", image.name, error);
                    outcome.failures.push(ConversionFailure {
                        name: image.name,
                        error,
                    });
                    progress.inc(1);
                    continue;
                }
            };

            if !plan.needs_resize {
                verbose!(
                    "{} is already {}x{}, packing original bytes",
                    image.name,
                    plan.width,
                    plan.height
                );
                outcome.results.push(ConversionResult {
                    name: image.name,
                    media_type: image.media_type,
                    payload: image.bytes,
                    plan,
                });
                progress.inc(1);
                continue;
            }

            verbose!(
                "{}: {}x{} -> {}x{}",
                image.name,
                image.width,
                image.height,
                plan.width,
                plan.height
            );

            let name = image.name.clone();
            let options = self.options.clone();
            let handle = tasks.spawn_blocking(move || {
                let payload = convert_image(&image, &plan, &options)?;
                Ok(ConversionResult {
                    name: image.name,
                    media_type: image.media_type,
                    payload: payload.into(),
                    plan,
                })
            });
            pending.insert(handle.id(), name);
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            record_joined(&mut outcome, &mut pending, joined);
            progress.inc(1);
        }

        progress.finish_and_clear();

        outcome.results.sort_by(|a, b| a.name.cmp(&b.name));
        outcome.failures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(outcome)
    }
}

type Joined = std::result::Result<(Id, Result<ConversionResult>), JoinError>;

/// Files one finished task under results or failures. A panicked or cancelled task
/// becomes a `TaskFailed` failure under the name it was spawned for.
fn record_joined(outcome: &mut BatchOutcome, pending: &mut HashMap<Id, String>, joined: Joined) {
    match joined {
        Ok((id, Ok(result))) => {
            pending.remove(&id);
            outcome.results.push(result);
        }
        Ok((id, Err(error))) => {
            let name = pending.remove(&id).unwrap_or_default();
            warn!("Leaving {} out of the archive: {}", name, error);
            outcome.failures.push(ConversionFailure { name, error });
        }
        Err(join_error) => {
            let name = pending.remove(&join_error.id()).unwrap_or_default();
            warn!("Leaving {} out of the archive: {}", name, join_error);
            outcome.failures.push(ConversionFailure {
                name,
                error: PackError::TaskFailed(join_error.to_string()),
            });
        }
    }
}

/// A finished batch run: the conversion outcome and, when at least one image
/// survived, the archive built from it.
#[derive(Debug)]
pub struct PackReport {
    pub outcome: BatchOutcome,
    pub artifact: Option<ArchiveArtifact>,
}

/// Snapshot the active images of `store`, convert them and zip the results.
///
/// Returns `Ok(None)` without doing any work when nothing is active.
pub async fn run_batch(
    store: &ImageStore,
    converter: &BatchConverter,
) -> Result<Option<PackReport>> {
    let snapshot = store.snapshot();
    if snapshot.is_empty() {
        verbose!("No active images, nothing to pack");
        return Ok(None);
    }

    let start_time = Instant::now();
    let outcome = converter.convert(snapshot).await?;

    let artifact = if outcome.results.is_empty() {
        None
    } else {
        let bytes = pack_archive(&outcome.results, ZipArchiveBuilder::new())?;
        Some(ArchiveArtifact::new(bytes, SystemTime::now()))
    };

    verbose!(
        "Batch of {} image(s) finished in {:?}",
        outcome.results.len() + outcome.failures.len(),
        start_time.elapsed()
    );

    Ok(Some(PackReport { outcome, artifact }))
}
