/* winnability.rs
 *
 * Copyright 2026 emviolet
 *
 * This program is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * This program is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with this program.  If not, see <https://www.gnu.org/licenses/>.
 *
 * SPDX-License-Identifier: GPL-3.0-or-later
 */

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::engine::search::{check_solvable, SearchLimits, SearchResult};
use crate::engine::status_text::{build_check_status, FALLBACK_MESSAGE, FALLBACK_TITLE};
use crate::game::{deal, variant_for_id, Snapshot, SnapshotError, VariantRules};

const WORKER_THREAD_NAME: &str = "solvability-check";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub game: String,
    pub snapshot: Snapshot,
    pub limits: SearchLimits,
    #[serde(default)]
    pub request_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub request_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckResponse {
    fn success(request_id: u64, result: SearchResult) -> Self {
        Self {
            request_id,
            result: Some(result),
            error: None,
        }
    }

    fn failure(request_id: u64, error: impl ToString) -> Self {
        Self {
            request_id,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

pub fn run_check(request: &CheckRequest) -> CheckResponse {
    let Some(rules) = variant_for_id(&request.game) else {
        let error = SnapshotError::UnknownGame(request.game.clone());
        return CheckResponse::failure(request.request_id, error);
    };
    match request.snapshot.to_state(rules) {
        Ok(state) => CheckResponse::success(
            request.request_id,
            check_solvable(&state, rules, &request.limits),
        ),
        Err(err) => {
            debug!(request_id = request.request_id, error = %err, "rejected snapshot");
            CheckResponse::failure(request.request_id, err)
        }
    }
}

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("failed to start the check worker: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("check worker channel disconnected")]
    Disconnected,
}

#[derive(Debug)]
pub struct CheckWorker {
    requests: Option<mpsc::Sender<CheckRequest>>,
    responses: mpsc::Receiver<CheckResponse>,
    join: Option<JoinHandle<()>>,
}

impl CheckWorker {
    pub fn spawn() -> Result<Self, WorkerError> {
        Self::spawn_with(|requests, responses| {
            for request in requests {
                if responses.send(run_check(&request)).is_err() {
                    break;
                }
            }
        })
    }

    fn spawn_with<S>(serve: S) -> Result<Self, WorkerError>
    where
        S: FnOnce(mpsc::Receiver<CheckRequest>, mpsc::Sender<CheckResponse>) + Send + 'static,
    {
        let (request_tx, request_rx) = mpsc::channel::<CheckRequest>();
        let (response_tx, response_rx) = mpsc::channel::<CheckResponse>();
        let join = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_string())
            .spawn(move || serve(request_rx, response_tx))?;
        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            join: Some(join),
        })
    }

    pub fn post(&self, request: CheckRequest) -> Result<(), WorkerError> {
        let requests = self.requests.as_ref().ok_or(WorkerError::Disconnected)?;
        requests
            .send(request)
            .map_err(|_| WorkerError::Disconnected)
    }

    pub fn try_recv(&self) -> Result<Option<CheckResponse>, WorkerError> {
        match self.responses.try_recv() {
            Ok(response) => Ok(Some(response)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<CheckResponse>, WorkerError> {
        match self.responses.recv_timeout(timeout) {
            Ok(response) => Ok(Some(response)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }
}

impl Drop for CheckWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop.
        self.requests.take();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// What the host UI should show: a busy modal while an inline check runs, then
/// the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub title: String,
    pub message: String,
    pub busy: bool,
}

pub trait FeedbackSink {
    fn show(&mut self, feedback: Feedback);
}

impl FeedbackSink for Vec<Feedback> {
    fn show(&mut self, feedback: Feedback) {
        self.push(feedback);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFeedback;

impl FeedbackSink for TracingFeedback {
    fn show(&mut self, feedback: Feedback) {
        if feedback.busy {
            warn!(title = %feedback.title, "{}", feedback.message);
        } else {
            info!(title = %feedback.title, "{}", feedback.message);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Posted to the worker; collect with [`CheckClient::poll`] or [`CheckClient::wait`].
    Pending(u64),
    /// Ran inline because the worker was unavailable.
    Completed(CheckResponse),
}

pub struct CheckClient<F> {
    worker: Option<CheckWorker>,
    feedback: F,
    next_request_id: u64,
    latest_request_id: Option<u64>,
    pending: Option<CheckRequest>,
}

impl<F: FeedbackSink> CheckClient<F> {
    pub fn new(feedback: F) -> Self {
        let worker = match CheckWorker::spawn() {
            Ok(worker) => Some(worker),
            Err(err) => {
                warn!(error = %err, "check worker unavailable; checks will run inline");
                None
            }
        };
        Self::with_worker(worker, feedback)
    }

    pub fn without_worker(feedback: F) -> Self {
        Self::with_worker(None, feedback)
    }

    fn with_worker(worker: Option<CheckWorker>, feedback: F) -> Self {
        Self {
            worker,
            feedback,
            next_request_id: 0,
            latest_request_id: None,
            pending: None,
        }
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn has_worker(&self) -> bool {
        self.worker.is_some()
    }

    pub fn latest_request_id(&self) -> Option<u64> {
        self.latest_request_id
    }

    pub fn is_current(&self, request_id: u64) -> bool {
        self.latest_request_id == Some(request_id)
    }

    pub fn submit(&mut self, game: &str, snapshot: Snapshot, limits: SearchLimits) -> Submission {
        self.next_request_id += 1;
        let request = CheckRequest {
            game: game.to_string(),
            snapshot,
            limits,
            request_id: self.next_request_id,
        };
        self.latest_request_id = Some(request.request_id);
        self.pending = Some(request.clone());

        let posted = match &self.worker {
            Some(worker) => worker.post(request.clone()),
            None => Err(WorkerError::Disconnected),
        };
        match posted {
            Ok(()) => Submission::Pending(request.request_id),
            Err(err) => {
                if self.worker.is_some() {
                    warn!(request_id = request.request_id, error = %err, "posting check failed");
                }
                self.pending = None;
                Submission::Completed(self.run_inline(request))
            }
        }
    }

    /// Latest reply if the worker has one ready. Stale replies are discarded.
    pub fn poll(&mut self) -> Option<CheckResponse> {
        loop {
            let received = self.worker.as_ref()?.try_recv();
            match received {
                Ok(Some(response)) => {
                    if let Some(response) = self.accept(response) {
                        return Some(response);
                    }
                }
                Ok(None) => return None,
                Err(err) => return self.recover(err),
            }
        }
    }

    pub fn wait(&mut self, timeout: Duration) -> Option<CheckResponse> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let received = self.worker.as_ref()?.recv_timeout(remaining);
            match received {
                Ok(Some(response)) => {
                    if let Some(response) = self.accept(response) {
                        return Some(response);
                    }
                }
                Ok(None) => return None,
                Err(err) => return self.recover(err),
            }
        }
    }

    fn accept(&mut self, response: CheckResponse) -> Option<CheckResponse> {
        if !self.is_current(response.request_id) {
            debug!(
                request_id = response.request_id,
                latest = ?self.latest_request_id,
                "dropping stale check response"
            );
            return None;
        }
        self.pending = None;
        Some(response)
    }

    fn recover(&mut self, err: WorkerError) -> Option<CheckResponse> {
        warn!(error = %err, "check worker lost");
        self.worker = None;
        let request = self.pending.take()?;
        Some(self.run_inline(request))
    }

    fn run_inline(&mut self, request: CheckRequest) -> CheckResponse {
        self.worker = None;
        self.feedback.show(Feedback {
            title: FALLBACK_TITLE.to_string(),
            message: FALLBACK_MESSAGE.to_string(),
            busy: true,
        });
        let request = CheckRequest {
            limits: request.limits.for_fallback(),
            ..request
        };
        let response = run_check(&request);
        let message = match (&response.result, &response.error) {
            (Some(result), _) => build_check_status(result),
            (None, Some(error)) => format!("Check failed: {error}"),
            (None, None) => String::new(),
        };
        self.feedback.show(Feedback {
            title: FALLBACK_TITLE.to_string(),
            message,
            busy: false,
        });
        response
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvableSeed {
    pub seed: u64,
    pub attempts: u32,
    pub result: SearchResult,
}

pub fn default_find_attempts() -> u32 {
    thread::available_parallelism()
        .map(|n| (n.get() * 6).clamp(16, 128) as u32)
        .unwrap_or(48)
}

/// Deals seeds from `start_seed` upward across all cores and returns the first
/// one whose check proves a solution.
pub fn find_solvable_seed_parallel(
    rules: &VariantRules,
    start_seed: u64,
    attempts: u32,
    limits: SearchLimits,
) -> Option<SolvableSeed> {
    if attempts == 0 {
        return None;
    }

    let worker_count = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(attempts as usize)
        .max(1);

    let next_index = Arc::new(AtomicU32::new(0));
    let stop = Arc::new(AtomicBool::new(false));
    let (sender, receiver) = mpsc::channel::<SolvableSeed>();

    for _ in 0..worker_count {
        let next_index = Arc::clone(&next_index);
        let stop = Arc::clone(&stop);
        let sender = sender.clone();
        let rules = *rules;
        thread::spawn(move || loop {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            let index = next_index.fetch_add(1, Ordering::Relaxed);
            if index >= attempts {
                break;
            }

            let seed = start_seed.wrapping_add(u64::from(index));
            let result = check_solvable(&deal(&rules, seed), &rules, &limits);
            if result.solved {
                if !stop.swap(true, Ordering::Relaxed) {
                    let _ = sender.send(SolvableSeed {
                        seed,
                        attempts: index + 1,
                        result,
                    });
                }
                break;
            }
        });
    }

    drop(sender);
    receiver.recv().ok()
}
