use chrono::Utc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;

use crate::estimation::EstimationOutcome;
use crate::pose::classify;
use crate::session::SessionController;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_warn};

/// Classify and log each estimation outcome in arrival order until
/// cancelled or until the worker hangs up.
pub async fn result_consumer(
    session: SessionController,
    mut outcomes: UnboundedReceiver<EstimationOutcome>,
    cancel_token: CancellationToken,
) {
    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel_token.cancelled() => break,
            outcome = outcomes.recv() => match outcome {
                Some(outcome) => outcome,
                None => break,
            },
        };
        apply_outcome(&session, outcome).await;
    }
}

/// Returns how many entries were appended. Estimation failures and results
/// for a session that is no longer active append nothing.
pub async fn apply_outcome(session: &SessionController, outcome: EstimationOutcome) -> usize {
    let EstimationOutcome {
        session_id,
        sequence,
        result,
    } = outcome;

    let skeletons = match result {
        Ok(skeletons) => skeletons,
        Err(err) => {
            log_warn!("pose estimation #{sequence} failed: {err}");
            return 0;
        }
    };

    let mut logged = 0;
    for skeleton in skeletons {
        let classification = classify(&skeleton);
        if let Err(err) = session
            .log_pose_for(
                session_id,
                classification.pose_name(),
                classification.confidence,
                Utc::now(),
            )
            .await
        {
            log_debug!("dropping estimation #{sequence}: {err}");
            break;
        }
        logged += 1;
    }
    logged
}
