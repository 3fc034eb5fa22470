use std::sync::Arc;

use tokio::sync::mpsc::{Receiver, UnboundedSender};
use tokio_util::sync::CancellationToken;

use crate::error::EstimationError;

use super::{EstimationOutcome, EstimationRequest, PoseEstimator};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Serve estimation requests one at a time until cancelled or until the
/// scheduler drops its sender.
///
/// The estimator runs on a blocking thread; this task only moves frames in
/// and skeletons out. Every request gets exactly one outcome unless the
/// worker is cancelled first, in which case the in-flight result is dropped.
pub async fn estimation_worker(
    estimator: Arc<dyn PoseEstimator>,
    mut requests: Receiver<EstimationRequest>,
    outcomes: UnboundedSender<EstimationOutcome>,
    cancel_token: CancellationToken,
) {
    loop {
        let request = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            request = requests.recv() => match request {
                Some(request) => request,
                None => break,
            },
        };

        let EstimationRequest {
            session_id,
            sequence,
            frame,
            dispatched_at,
        } = request;

        let job = tokio::task::spawn_blocking({
            let estimator = Arc::clone(&estimator);
            move || estimator.estimate(&frame)
        });

        let result = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_debug!("discarding in-flight estimation #{sequence}");
                break;
            }
            joined = job => joined
                .unwrap_or_else(|err| Err(EstimationError::Worker(err.to_string()))),
        };

        log_debug!(
            "estimation #{sequence} finished {}ms after dispatch",
            dispatched_at.elapsed().as_millis()
        );

        let outcome = EstimationOutcome {
            session_id,
            sequence,
            result,
        };
        if outcomes.send(outcome).is_err() {
            break;
        }
    }

    log_info!("estimation worker shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::Frame;
    use crate::pose::Skeleton;
    use image::RgbImage;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::mpsc;
    use tokio::time::Instant;
    use uuid::Uuid;

    struct Flaky {
        calls: AtomicU64,
    }

    impl PoseEstimator for Flaky {
        fn is_ready(&self) -> bool {
            true
        }

        fn estimate(&self, _frame: &Frame) -> Result<Vec<Skeleton>, EstimationError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
                Ok(Vec::new())
            } else {
                Err(EstimationError::Backend("gpu lost".into()))
            }
        }
    }

    fn request(session_id: Uuid, sequence: u64) -> EstimationRequest {
        EstimationRequest {
            session_id,
            sequence,
            frame: Frame::new(RgbImage::new(2, 2)),
            dispatched_at: Instant::now(),
        }
    }

    #[tokio::test]
    async fn every_request_gets_an_outcome_in_order() {
        let (req_tx, req_rx) = mpsc::channel(4);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let estimator = Arc::new(Flaky {
            calls: AtomicU64::new(0),
        });
        let worker = tokio::spawn(estimation_worker(
            estimator,
            req_rx,
            out_tx,
            CancellationToken::new(),
        ));

        let session_id = Uuid::new_v4();
        for sequence in 0..4 {
            req_tx.send(request(session_id, sequence)).await.unwrap();
        }
        drop(req_tx);

        let mut seen = Vec::new();
        while let Some(outcome) = out_rx.recv().await {
            assert_eq!(outcome.session_id, session_id);
            seen.push((outcome.sequence, outcome.result.is_ok()));
        }
        worker.await.unwrap();

        assert_eq!(seen, vec![(0, true), (1, false), (2, true), (3, false)]);
    }

    #[tokio::test]
    async fn cancellation_stops_the_worker() {
        let (_req_tx, req_rx) = mpsc::channel(1);
        let (out_tx, mut out_rx) = mpsc::unbounded_channel();
        let token = CancellationToken::new();
        let worker = tokio::spawn(estimation_worker(
            Arc::new(Flaky {
                calls: AtomicU64::new(0),
            }),
            req_rx,
            out_tx,
            token.clone(),
        ));

        token.cancel();
        worker.await.unwrap();
        assert!(out_rx.recv().await.is_none());
    }
}
