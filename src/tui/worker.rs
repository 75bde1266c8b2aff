//! Background worker for service calls.
//!
//! HTTP calls run on their own thread so the TUI main loop keeps drawing
//! while a request is in flight. Results come back over an mpsc channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::api::{HealthResponse, RecommendRequest};
use crate::client::RecommendationApi;
use crate::domain::ScoredDoctor;

/// Progress updates for a recommendation request.
#[derive(Debug, Clone)]
pub enum RecommendationProgress {
    /// Request is on the wire
    Sending,
    /// Ranked doctors returned by the service
    Complete(Vec<ScoredDoctor>),
    /// Display text for a failed request
    Error(String),
}

/// Result of polling the service's liveness and health routes.
#[derive(Debug, Clone)]
pub struct ServiceProbe {
    pub liveness: Result<String, String>,
    pub health: Result<HealthResponse, String>,
}

/// Handle to a running worker.
pub struct WorkerHandle<T> {
    /// Receiver for worker messages
    pub rx: Receiver<T>,
    _handle: JoinHandle<()>,
}

impl<T> WorkerHandle<T> {
    /// Try to receive the next message (non-blocking).
    #[must_use]
    pub fn try_recv(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

/// Worker that talks to the recommendation service off the UI thread.
pub struct RecommendationWorker;

impl RecommendationWorker {
    /// Spawn a recommendation request.
    pub fn spawn<A>(api: Arc<A>, request: RecommendRequest) -> WorkerHandle<RecommendationProgress>
    where
        A: RecommendationApi + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            Self::run_request(api.as_ref(), &request, &tx);
        });

        WorkerHandle {
            rx,
            _handle: handle,
        }
    }

    /// Spawn a liveness and health probe.
    pub fn probe<A>(api: Arc<A>) -> WorkerHandle<ServiceProbe>
    where
        A: RecommendationApi + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            let _ = tx.send(Self::run_probe(api.as_ref()));
        });

        WorkerHandle {
            rx,
            _handle: handle,
        }
    }

    fn run_request<A>(api: &A, request: &RecommendRequest, tx: &Sender<RecommendationProgress>)
    where
        A: RecommendationApi + ?Sized,
    {
        let _ = tx.send(RecommendationProgress::Sending);

        match api.recommend(request) {
            Ok(doctors) => {
                tracing::info!(returned = doctors.len(), "Recommendations received");
                let _ = tx.send(RecommendationProgress::Complete(doctors));
            }
            Err(e) => {
                tracing::warn!("Recommendation request failed: {e}");
                let _ = tx.send(RecommendationProgress::Error(e.to_string()));
            }
        }
    }

    fn run_probe<A>(api: &A) -> ServiceProbe
    where
        A: RecommendationApi + ?Sized,
    {
        ServiceProbe {
            liveness: api.root().map(|r| r.message).map_err(|e| e.to_string()),
            health: api.health().map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::api::RootResponse;
    use crate::client::ClientError;
    use crate::domain::DoctorId;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// In-memory service: returns `reply` and records requests.
    pub(crate) struct StubApi {
        pub reply: Result<Vec<ScoredDoctor>, String>,
        pub requests: Mutex<Vec<RecommendRequest>>,
    }

    impl StubApi {
        pub(crate) fn answering(reply: Result<Vec<ScoredDoctor>, String>) -> Self {
            Self {
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl RecommendationApi for StubApi {
        fn root(&self) -> Result<RootResponse, ClientError> {
            Ok(RootResponse {
                message: "up".into(),
            })
        }

        fn health(&self) -> Result<HealthResponse, ClientError> {
            Err(ClientError::Api("health unavailable".into()))
        }

        fn recommend(&self, request: &RecommendRequest) -> Result<Vec<ScoredDoctor>, ClientError> {
            if let Ok(mut seen) = self.requests.lock() {
                seen.push(request.clone());
            }
            self.reply.clone().map_err(ClientError::Api)
        }
    }

    pub(crate) fn scored(id: i64, name: &str, success_rate: f64, score: f64) -> ScoredDoctor {
        ScoredDoctor {
            doctor_id: DoctorId::Numeric(id),
            doctor_name: name.into(),
            specialty: "Cardiology".into(),
            years_experience: 10.0,
            rating: 4.5,
            success_rate,
            score,
        }
    }

    /// Block until the worker sends a message matching `done`.
    pub(crate) fn wait_for<T>(handle: &WorkerHandle<T>, done: impl Fn(&T) -> bool) -> Vec<T> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut seen = Vec::new();
        while Instant::now() < deadline {
            if let Ok(msg) = handle.rx.recv_timeout(Duration::from_millis(50)) {
                let finished = done(&msg);
                seen.push(msg);
                if finished {
                    break;
                }
            }
        }
        seen
    }

    fn request() -> RecommendRequest {
        RecommendRequest {
            age: 35,
            gender: 0,
            location: "Lahore".into(),
            chronic_conditions: "Diabetes".into(),
            top_n: 2,
        }
    }

    #[test]
    fn test_request_reports_sending_then_complete() {
        let api = Arc::new(StubApi::answering(Ok(vec![scored(1, "Dr. A", 0.9, 0.8)])));
        let handle = RecommendationWorker::spawn(api.clone(), request());

        let msgs = wait_for(&handle, |m| !matches!(m, RecommendationProgress::Sending));
        assert!(matches!(msgs[0], RecommendationProgress::Sending));
        match msgs.last() {
            Some(RecommendationProgress::Complete(doctors)) => assert_eq!(doctors.len(), 1),
            other => panic!("unexpected message {other:?}"),
        }
        assert_eq!(api.requests.lock().unwrap()[0], request());
    }

    #[test]
    fn test_request_error_carries_display_text() {
        let api = Arc::new(StubApi::answering(Err("model exploded".into())));
        let handle = RecommendationWorker::spawn(api, request());

        let msgs = wait_for(&handle, |m| matches!(m, RecommendationProgress::Error(_)));
        match msgs.last() {
            Some(RecommendationProgress::Error(text)) => assert_eq!(text, "model exploded"),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_probe_collects_both_routes() {
        let api = Arc::new(StubApi::answering(Ok(Vec::new())));
        let handle = RecommendationWorker::probe(api);

        let msgs = wait_for(&handle, |_| true);
        let probe = msgs.last().expect("probe result");
        assert_eq!(probe.liveness.as_deref(), Ok("up"));
        assert_eq!(probe.health.as_ref().unwrap_err(), "health unavailable");
    }
}
