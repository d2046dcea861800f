use {
    anyhow::{Context, Result},
    base::{Tensor, Vec3},
    pose::{FrameOutcome, Lifter, Pipeline, PipelineConfig, PoseError, TargetSkeleton, JOINT_COUNT, LIFTER_SHAPE},
    serde::Deserialize,
    std::{env, fs, path::Path},
};

const DEFAULT_REPLAY_PATH: &str = "data/replay.json";

/// A recorded session: detector output per tick plus what the lifter returned.
#[derive(Debug, Deserialize)]
struct Replay {
    #[serde(default)]
    config: Option<PipelineConfig>,
    skeleton: TargetSkeleton,
    /// `null` entries are ticks where the camera had no new frame.
    frames: Vec<Option<RecordedFrame>>,
}

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    detector: RecordedTensor,
    #[serde(default)]
    lifted: Option<Vec<[f32; 3]>>,
}

#[derive(Debug, Deserialize)]
struct RecordedTensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl RecordedTensor {
    fn to_tensor(&self) -> Result<Tensor<f32>> {
        Tensor::new(self.shape.clone(), self.data.clone())
            .with_context(|| format!("recorded tensor {:?}", self.shape))
    }
}

/// Plays back recorded lifter outputs in place of a live model.
struct ReplayLifter {
    next: Option<Vec<[f32; 3]>>,
}

impl Lifter for ReplayLifter {
    fn lift(&mut self, _input: &Tensor<f32>) -> Result<Tensor<f32>, PoseError> {
        let joints = self
            .next
            .take()
            .ok_or_else(|| PoseError::Lifter("no recorded lifter output for this frame".to_string()))?;
        let data = joints.iter().flatten().copied().collect();
        Ok(Tensor::new(LIFTER_SHAPE.to_vec(), data)?)
    }
}

fn load_replay(path: &Path) -> Result<Replay> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

struct Summary {
    committed: usize,
    held: usize,
    skipped: usize,
}

fn run(replay: &Replay, config: &PipelineConfig) -> Result<(Pipeline, Summary)> {
    let mut pipeline = Pipeline::new(config, &replay.skeleton.rest_pose())
        .context("building pipeline")?;
    let mut lifter = ReplayLifter { next: None };
    let mut summary = Summary {
        committed: 0,
        held: 0,
        skipped: 0,
    };

    for (index, frame) in replay.frames.iter().enumerate() {
        let detector = match frame {
            Some(frame) => {
                lifter.next = frame.lifted.clone();
                Some(frame.detector.to_tensor()?)
            }
            None => None,
        };

        match pipeline.process(detector.as_ref(), &mut lifter) {
            FrameOutcome::Committed => summary.committed += 1,
            FrameOutcome::Held(_) => summary.held += 1,
            FrameOutcome::Skipped => summary.skipped += 1,
        }

        if let Some(joints) = pipeline.committed() {
            println!("{index:5} {}", format_joints(joints));
        }
    }

    Ok((pipeline, summary))
}

fn format_joints(joints: &[Vec3<f32>]) -> String {
    joints
        .iter()
        .take(JOINT_COUNT)
        .map(|j| format!("{:.3},{:.3},{:.3}", j.x, j.y, j.z))
        .collect::<Vec<_>>()
        .join(" ")
}

fn main() -> Result<()> {
    base::init_stdout_logger(base::level_from_env("POSE_LOG", base::default_level()));

    let mut args = env::args().skip(1);
    let replay_path = args.next().unwrap_or_else(|| DEFAULT_REPLAY_PATH.to_string());
    let replay = load_replay(Path::new(&replay_path))?;

    let config = match args.next() {
        Some(path) => PipelineConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => replay.config.clone().unwrap_or_default(),
    };

    log::info!("replaying {} ticks from {}", replay.frames.len(), replay_path);
    let (pipeline, summary) = run(&replay, &config)?;
    log::info!(
        "done: {} committed, {} held, {} skipped, {} frames processed",
        summary.committed,
        summary.held,
        summary.skipped,
        pipeline.frames_processed()
    );
    if let Some(targets) = pipeline.rig_targets() {
        log::info!("final rig targets: {:?}", targets);
    }
    Ok(())
}
