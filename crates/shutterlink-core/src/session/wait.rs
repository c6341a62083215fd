// ── Wait scheduler ──
//
// Every wait iteration checks controller liveness and drains pending
// events before it evaluates anything, so conditions always see the
// freshest state.

use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexSet;
use shutterlink_api::Transport;
use tokio::time::{Instant, sleep};
use tracing::debug;

use super::Session;
use crate::error::CoreError;
use crate::model::{CameraKey, CameraRecord, CameraStatus, PhotoKey, PhotoRecord};
use crate::resolve;
use crate::store::StateStore;

/// Outcome of a per-camera wait.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WaitReport {
    /// Cameras whose condition became true, in the order they did.
    pub satisfied: Vec<CameraKey>,
    /// Cameras that disconnected or vanished before satisfying it.
    pub dropped: Vec<CameraKey>,
    /// Number of drain-and-evaluate rounds taken.
    pub rounds: u32,
}

impl<T: Transport + Send> Session<T> {
    // ── Timed waits ──────────────────────────────────────────────────

    /// Sleep for `duration` while keeping the store current.
    pub async fn wait(&mut self, duration: Duration) -> Result<(), CoreError> {
        self.wait_until(Instant::now() + duration).await
    }

    /// Sleep until `deadline` while keeping the store current.
    ///
    /// Sleeps in coarse steps while far from the deadline and fine steps
    /// near it. Events are drained on every step, including when the
    /// deadline has already passed.
    pub async fn wait_until(&mut self, deadline: Instant) -> Result<(), CoreError> {
        self.ensure_running()?;
        let result = self.run_deadline_wait(deadline).await;
        self.settle(result)
    }

    async fn run_deadline_wait(&mut self, deadline: Instant) -> Result<(), CoreError> {
        loop {
            self.check_alive()?;
            self.apply_pending_events()?;

            let now = Instant::now();
            if now >= deadline {
                return Ok(());
            }
            sleep(self.config.deadline_step(deadline - now)).await;
        }
    }

    // ── Condition waits ──────────────────────────────────────────────

    /// Block until `condition` holds for every camera targeted at call
    /// time.
    ///
    /// Pending events are drained before the targets are resolved. A
    /// camera leaves the wait when its condition holds, or when it is no
    /// longer connected (it is then reported as dropped rather than
    /// waited on forever). Returns once no camera is left.
    pub async fn wait_for_cameras<F>(&mut self, condition: F) -> Result<WaitReport, CoreError>
    where
        F: FnMut(&CameraRecord) -> bool + Send,
    {
        self.wait_for_cameras_with(|_, _| condition).await
    }

    /// Like [`Session::wait_for_cameras`], but the condition is built from
    /// the store and targets as they stand after the first drain.
    async fn wait_for_cameras_with<B, F>(&mut self, build: B) -> Result<WaitReport, CoreError>
    where
        B: FnOnce(&StateStore, &[CameraKey]) -> F + Send,
        F: FnMut(&CameraRecord) -> bool + Send,
    {
        self.ensure_running()?;
        let result = self.run_camera_wait(build).await;
        self.settle(result)
    }

    async fn run_camera_wait<B, F>(&mut self, build: B) -> Result<WaitReport, CoreError>
    where
        B: FnOnce(&StateStore, &[CameraKey]) -> F + Send,
        F: FnMut(&CameraRecord) -> bool + Send,
    {
        self.check_alive()?;
        self.apply_pending_events()?;

        let targets = resolve::target_cameras(&self.store, &self.selection);
        let mut condition = build(&self.store, &targets);
        let mut pending: IndexSet<CameraKey> = targets.into_iter().collect();
        let mut report = WaitReport::default();

        loop {
            report.rounds += 1;

            let mut still_pending = IndexSet::with_capacity(pending.len());
            for key in pending.drain(..) {
                match self.store.camera(&key) {
                    Ok(camera) if camera.is_connected() => {
                        if condition(camera) {
                            report.satisfied.push(key);
                        } else {
                            still_pending.insert(key);
                        }
                    }
                    _ => {
                        debug!(camera = %key, "camera dropped out of wait");
                        report.dropped.push(key);
                    }
                }
            }
            pending = still_pending;

            if pending.is_empty() {
                return Ok(report);
            }
            sleep(self.config.poll_interval).await;

            self.check_alive()?;
            self.apply_pending_events()?;
        }
    }

    /// Wait until live view is enabled on every selected camera.
    pub async fn wait_for_liveview_enabled(&mut self) -> Result<WaitReport, CoreError> {
        self.wait_for_cameras(CameraRecord::liveview_enabled).await
    }

    /// Wait until every selected camera is `Ready` with a live-view frame
    /// counter more than `frame_slack` past its value when the wait began.
    pub async fn wait_for_liveview_frame(&mut self) -> Result<WaitReport, CoreError> {
        let slack = self.config.frame_slack;
        self.wait_for_cameras_with(move |store, targets| {
            let baselines: HashMap<CameraKey, u64> = targets
                .iter()
                .filter_map(|key| {
                    let frame = store.camera(key).ok()?.liveview_frame_num().unwrap_or(0);
                    Some((key.clone(), frame))
                })
                .collect();

            move |camera: &CameraRecord| {
                let baseline = baselines.get(camera.key()).copied().unwrap_or(0);
                camera.status() == CameraStatus::Ready
                    && camera
                        .liveview_frame_num()
                        .is_some_and(|frame| frame > baseline.saturating_add(slack))
            }
        })
        .await
    }

    /// Wait until every selected camera reports `status`.
    ///
    /// Waiting for a disconnected status completes at once: cameras that
    /// disconnect leave the wait as dropped.
    pub async fn wait_for_status(&mut self, status: CameraStatus) -> Result<WaitReport, CoreError> {
        self.wait_for_cameras(move |camera| camera.status() == status)
            .await
    }

    // ── Photo waits ──────────────────────────────────────────────────

    /// Block until some photo satisfies `condition` and return its key.
    ///
    /// Photos are checked in first-seen order after every drain. Only a
    /// lost controller ends the wait without a match.
    pub async fn wait_for_photo<F>(&mut self, condition: F) -> Result<PhotoKey, CoreError>
    where
        F: FnMut(&PhotoRecord) -> bool + Send,
    {
        self.ensure_running()?;
        let result = self.run_photo_wait(condition).await;
        self.settle(result)
    }

    async fn run_photo_wait<F>(&mut self, mut condition: F) -> Result<PhotoKey, CoreError>
    where
        F: FnMut(&PhotoRecord) -> bool + Send,
    {
        loop {
            self.check_alive()?;
            self.apply_pending_events()?;

            if let Some(photo) = self.store.photos().find(|photo| condition(photo)) {
                return Ok(photo.key().clone());
            }
            sleep(self.config.poll_interval).await;
        }
    }
}
