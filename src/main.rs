use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use ayursutra_lib::{
    init_logging, EstimationError, Frame, MonitorSettings, PoseEstimator, PoseMonitor,
    SettingsStore, SharedFrameSource, Skeleton,
};
use image::RgbImage;
use log::info;

const SETTINGS_ENV: &str = "AYURSUTRA_SETTINGS";
const MODEL_WARMUP: Duration = Duration::from_millis(300);
const SESSION_LENGTH: Duration = Duration::from_secs(3);
const FRAMES_PER_POSE: usize = 6;

const MOUNTAIN: [[f32; 3]; 17] = [
    [200.0, 60.0, 0.9],
    [205.0, 55.0, 0.9],
    [195.0, 55.0, 0.9],
    [210.0, 58.0, 0.9],
    [190.0, 58.0, 0.9],
    [230.0, 120.0, 0.9],
    [170.0, 120.0, 0.9],
    [235.0, 190.0, 0.9],
    [165.0, 190.0, 0.9],
    [238.0, 250.0, 0.9],
    [162.0, 250.0, 0.9],
    [225.0, 260.0, 0.9],
    [175.0, 260.0, 0.9],
    [226.0, 370.0, 0.9],
    [174.0, 370.0, 0.9],
    [227.0, 480.0, 0.9],
    [173.0, 480.0, 0.9],
];

const DOWNWARD_DOG: [[f32; 3]; 17] = [
    [120.0, 330.0, 0.9],
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0],
    [0.0, 0.0, 0.0],
    [150.0, 300.0, 0.9],
    [150.0, 305.0, 0.9],
    [120.0, 350.0, 0.9],
    [120.0, 355.0, 0.9],
    [100.0, 400.0, 0.9],
    [100.0, 405.0, 0.9],
    [250.0, 150.0, 0.9],
    [250.0, 155.0, 0.9],
    [300.0, 275.0, 0.9],
    [300.0, 280.0, 0.9],
    [350.0, 400.0, 0.9],
    [350.0, 405.0, 0.9],
];

/// Stands in for a real pose model: becomes ready after a short warm-up and
/// then walks through a fixed routine, a few frames per pose.
struct ScriptedEstimator {
    ready: AtomicBool,
    calls: AtomicUsize,
    routine: Vec<Skeleton>,
}

impl ScriptedEstimator {
    fn new() -> Result<Self> {
        let mut tree = MOUNTAIN;
        tree[13] = [300.0, 330.0, 0.9];
        tree[15] = [230.0, 350.0, 0.9];

        let mut wobbly = MOUNTAIN;
        wobbly[15][2] = 0.1;
        wobbly[16][2] = 0.1;

        let routine = [MOUNTAIN, tree, DOWNWARD_DOG, wobbly]
            .iter()
            .map(|rows| Skeleton::from_rows(rows))
            .collect::<Result<Vec<_>, _>>()
            .context("canned routine is malformed")?;

        Ok(Self {
            ready: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            routine,
        })
    }
}

impl PoseEstimator for ScriptedEstimator {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn estimate(&self, _frame: &Frame) -> Result<Vec<Skeleton>, EstimationError> {
        if !self.is_ready() {
            return Err(EstimationError::NotReady);
        }
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        // Rough cost of a real inference pass.
        std::thread::sleep(Duration::from_millis(20));
        let pose = (call / FRAMES_PER_POSE) % self.routine.len();
        Ok(vec![self.routine[pose].clone()])
    }
}

fn load_settings() -> Result<MonitorSettings> {
    match std::env::var_os(SETTINGS_ENV) {
        Some(path) => {
            let store = SettingsStore::new(PathBuf::from(path))?;
            Ok(store.settings())
        }
        None => Ok(MonitorSettings::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    info!("Ayursutra demo starting up...");

    let settings = load_settings()?;
    let estimator = Arc::new(ScriptedEstimator::new()?);
    let frames = SharedFrameSource::new();
    frames.publish(RgbImage::new(640, 480));

    let monitor = PoseMonitor::new(estimator.clone(), Arc::new(frames), &settings);

    let mut live = monitor.subscribe_live_pose();
    tokio::spawn(async move {
        let mut last = String::new();
        while live.changed().await.is_ok() {
            let pose = live.borrow_and_update().clone();
            if pose.pose_name != last {
                info!("Now holding {} ({:.0}%)", pose.pose_name, pose.confidence * 100.0);
                last = pose.pose_name;
            }
        }
    });

    let session_id = monitor.start("demo-practitioner").await?;
    info!("Session {session_id} running for {SESSION_LENGTH:?}");

    tokio::time::sleep(MODEL_WARMUP).await;
    estimator.ready.store(true, Ordering::Release);
    info!("Pose model ready");

    tokio::time::sleep(SESSION_LENGTH).await;
    let report = monitor.stop().await?;

    println!("{}", report.to_json()?);
    Ok(())
}
