//! Headless viewing sessions
//!
//! A session mounts the viewer on a virtual surface, replays a script of
//! pointer and selection events at fixed times, and samples the composed
//! transform at a fixed frame rate.

use anyhow::{Context, Result};
use badge_core::events::{Event, Surface, SurfaceId};
use badge_core::geometry::Rect;
use badge_scene::{AssetSource, EmptySource, GltfSource};
use badge_viewer::{BadgeCatalog, BadgeViewer, ViewerConfig};
use clap::Args;
use serde::Serialize;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

const SURFACE: SurfaceId = SurfaceId(1);

/// `badge simulate` options
#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Catalog index of the badge shown first
    #[arg(short, long, default_value_t = 0)]
    pub badge: usize,

    /// Session length in milliseconds
    #[arg(short, long, default_value_t = 3000)]
    pub duration_ms: u64,

    /// Frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Surface width in pixels
    #[arg(long, default_value_t = 800.0)]
    pub width: f32,

    /// Surface height in pixels
    #[arg(long, default_value_t = 600.0)]
    pub height: f32,

    /// Pointer move at `<ms>:<x>,<y>` (surface pixels), repeatable
    #[arg(long = "pointer", value_name = "MS:X,Y")]
    pub pointers: Vec<PointerCue>,

    /// Pointer leaves the surface at `<ms>`, repeatable
    #[arg(long = "leave", value_name = "MS")]
    pub leaves: Vec<u64>,

    /// Select another badge at `<ms>:<index>`, repeatable
    #[arg(long = "switch", value_name = "MS:INDEX")]
    pub switches: Vec<SwitchCue>,

    /// Print every n-th frame (the last frame is always printed)
    #[arg(long, default_value_t = 6)]
    pub every: u64,

    /// Emit JSON lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Skip model loading and animate placeholders
    #[arg(long)]
    pub no_assets: bool,
}

/// Pointer move scheduled in a session
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerCue {
    pub at_ms: u64,
    pub x: f32,
    pub y: f32,
}

impl FromStr for PointerCue {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (at, position) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <ms>:<x>,<y>, got '{s}'"))?;
        let (x, y) = position
            .split_once(',')
            .ok_or_else(|| format!("expected <x>,<y> after ':', got '{position}'"))?;
        Ok(Self {
            at_ms: parse_field(at, "time")?,
            x: parse_field(x, "x")?,
            y: parse_field(y, "y")?,
        })
    }
}

/// Badge switch scheduled in a session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwitchCue {
    pub at_ms: u64,
    pub index: usize,
}

impl FromStr for SwitchCue {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (at, index) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <ms>:<index>, got '{s}'"))?;
        Ok(Self {
            at_ms: parse_field(at, "time")?,
            index: parse_field(index, "index")?,
        })
    }
}

fn parse_field<T: FromStr>(raw: &str, what: &str) -> std::result::Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("invalid {what} '{}'", raw.trim()))
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum ScriptAction {
    Pointer { x: f32, y: f32 },
    Leave,
    Switch(usize),
}

/// Script entries ordered by time; entries at the same time keep argument
/// order within their kind.
fn script(args: &SimulateArgs) -> Vec<(u64, ScriptAction)> {
    let mut entries: Vec<(u64, ScriptAction)> = args
        .switches
        .iter()
        .map(|cue| (cue.at_ms, ScriptAction::Switch(cue.index)))
        .chain(
            args.pointers
                .iter()
                .map(|cue| (cue.at_ms, ScriptAction::Pointer { x: cue.x, y: cue.y })),
        )
        .chain(args.leaves.iter().map(|at| (*at, ScriptAction::Leave)))
        .collect();
    entries.sort_by_key(|(at, _)| *at);
    entries
}

/// One sampled frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub t_ms: f64,
    pub index: usize,
    pub badge: String,
    pub phase: &'static str,
    pub rotation_y: f32,
    pub rotation_z: f32,
    pub scale: f32,
    pub has_scene: bool,
}

/// Run a session and collect the sampled frames
pub fn run<S: AssetSource>(
    args: &SimulateArgs,
    config: ViewerConfig,
    catalog: BadgeCatalog,
    source: S,
) -> Result<Vec<FrameRecord>> {
    if args.fps == 0 {
        anyhow::bail!("--fps must be at least 1");
    }

    let surface = Rc::new(Surface::new(SURFACE, Rect::new(0.0, 0.0, args.width, args.height)));
    let mut viewer = BadgeViewer::with_selection(config, catalog, source, surface, args.badge)
        .with_context(|| format!("Failed to start viewer on --badge {}", args.badge))?;

    let frame_ms = 1000.0 / f64::from(args.fps);
    let dt = (frame_ms / 1000.0) as f32;
    let total_frames = (args.duration_ms as f64 / frame_ms).ceil() as u64;
    let every = args.every.max(1);

    let script = script(args);
    let mut next = 0;
    let mut records = Vec::new();

    for frame in 1..=total_frames {
        let t_ms = frame as f64 * frame_ms;

        while let Some((at, action)) = script.get(next).copied() {
            if at as f64 > t_ms {
                break;
            }
            next += 1;
            apply(&mut viewer, at, action)?;
        }

        let Some(sample) = viewer.frame(dt) else {
            continue;
        };
        if frame % every == 0 || frame == total_frames {
            records.push(FrameRecord {
                frame,
                t_ms,
                index: sample.index,
                badge: sample.badge.display_name.clone(),
                phase: sample.phase.as_str(),
                rotation_y: sample.transform.rotation_y,
                rotation_z: sample.transform.rotation_z,
                scale: sample.transform.scale.x,
                has_scene: sample.scene.is_some(),
            });
        }
    }

    tracing::info!(
        frames = total_frames,
        sampled = records.len(),
        loads = viewer.assets().load_count(),
        "simulation finished"
    );
    Ok(records)
}

fn apply<S: AssetSource>(viewer: &mut BadgeViewer<S>, at: u64, action: ScriptAction) -> Result<()> {
    match action {
        ScriptAction::Pointer { x, y } => {
            let handled = viewer.dispatch(&Event::pointer_move(SURFACE, x, y).with_timestamp(at));
            tracing::debug!(at, x, y, handled, "pointer move");
        }
        ScriptAction::Leave => {
            let handled = viewer.dispatch(&Event::pointer_leave(SURFACE).with_timestamp(at));
            tracing::debug!(at, handled, "pointer leave");
        }
        ScriptAction::Switch(index) => {
            let switched = viewer
                .select(index)
                .with_context(|| format!("Invalid --switch {at}:{index}"))?;
            tracing::debug!(at, index, switched, "switch badge");
        }
    }
    Ok(())
}

/// Run a session against the configured asset root and print it
pub fn execute(
    args: &SimulateArgs,
    config: ViewerConfig,
    catalog: BadgeCatalog,
    asset_root: &Path,
) -> Result<()> {
    let source: Box<dyn AssetSource> = if args.no_assets {
        Box::new(EmptySource)
    } else {
        Box::new(GltfSource::new(asset_root))
    };

    let records = run(args, config, catalog, source)?;
    for record in &records {
        if args.json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!(
                "{:>5}  {:>8.1}ms  {:<10} {:<12} yaw {:>+8.4}  tilt {:>+8.4}{}",
                record.frame,
                record.t_ms,
                record.badge,
                record.phase,
                record.rotation_y,
                record.rotation_z,
                if record.has_scene { "" } else { "  (placeholder)" }
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use badge_scene::{MemorySource, SceneGraph};
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        args: SimulateArgs,
    }

    fn parse(argv: &[&str]) -> SimulateArgs {
        Harness::parse_from(std::iter::once("simulate").chain(argv.iter().copied())).args
    }

    fn session(argv: &[&str]) -> Vec<FrameRecord> {
        run(
            &parse(argv),
            ViewerConfig::default(),
            BadgeCatalog::default_badges(),
            EmptySource,
        )
        .unwrap()
    }

    #[test]
    fn test_cue_parsing() {
        assert_eq!(
            "1200:400,300".parse::<PointerCue>().unwrap(),
            PointerCue {
                at_ms: 1200,
                x: 400.0,
                y: 300.0,
            }
        );
        assert_eq!(
            "2500:3".parse::<SwitchCue>().unwrap(),
            SwitchCue { at_ms: 2500, index: 3 }
        );
        assert!("1200".parse::<PointerCue>().is_err());
        assert!("abc:1,2".parse::<PointerCue>().is_err());
        assert!("10:x".parse::<SwitchCue>().is_err());
    }

    #[test]
    fn test_script_is_time_ordered() {
        let args = parse(&["--pointer", "900:1,1", "--leave", "300", "--switch", "600:2"]);
        let times: Vec<u64> = script(&args).iter().map(|(at, _)| *at).collect();
        assert_eq!(times, [300, 600, 900]);
    }

    #[test]
    fn test_session_samples_frames() {
        let records = session(&["--duration-ms", "1000", "--every", "10"]);
        assert_eq!(records.len(), 6);
        assert_eq!(records[0].phase, "pre-entrance");
        assert_eq!(records[0].rotation_y, std::f32::consts::PI);
        assert_eq!(records.last().unwrap().phase, "entered");
        assert_eq!(records.last().unwrap().scale, 0.5);
    }

    #[test]
    fn test_pointer_before_entrance_has_no_effect() {
        let records = session(&["--duration-ms", "400", "--every", "1", "--pointer", "100:800,0"]);
        assert!(records.iter().all(|r| r.rotation_z == 0.0));
    }

    #[test]
    fn test_pointer_after_entrance_tilts() {
        let records = session(&["--duration-ms", "5000", "--pointer", "1000:800,0"]);
        let last = records.last().unwrap();
        assert!((last.rotation_z - 0.15).abs() < 1e-3, "{last:?}");
        assert!((last.rotation_y - 0.20).abs() < 1e-3, "{last:?}");
    }

    #[test]
    fn test_switch_restarts_entrance() {
        let records = session(&["--duration-ms", "2100", "--every", "1", "--switch", "2000:5"]);
        let last = records.last().unwrap();
        assert_eq!(last.badge, "Wellbeing");
        assert_eq!(last.phase, "pre-entrance");
        assert_eq!(last.rotation_y, std::f32::consts::PI);
    }

    #[test]
    fn test_initial_badge_is_the_only_load() {
        let source = BadgeCatalog::default_badges()
            .iter()
            .fold(MemorySource::new(), |source, entry| {
                source.with(entry.asset_path.clone(), SceneGraph::default())
            });
        let surface = Rc::new(Surface::new(SURFACE, Rect::new(0.0, 0.0, 800.0, 600.0)));
        let viewer = BadgeViewer::with_selection(
            ViewerConfig::default(),
            BadgeCatalog::default_badges(),
            source,
            surface,
            4,
        )
        .unwrap();
        assert_eq!(viewer.assets().load_count(), 1);

        let records = session(&["--badge", "4", "--duration-ms", "100"]);
        assert!(records.iter().all(|r| r.index == 4 && r.badge == "Travel"));
    }

    #[test]
    fn test_bad_badge_index_is_error() {
        let result = run(
            &parse(&["--badge", "6"]),
            ViewerConfig::default(),
            BadgeCatalog::default_badges(),
            EmptySource,
        );
        assert!(result.unwrap_err().to_string().contains("--badge 6"));
    }

    #[test]
    fn test_bad_switch_index_is_error() {
        let result = run(
            &parse(&["--switch", "100:9"]),
            ViewerConfig::default(),
            BadgeCatalog::default_badges(),
            EmptySource,
        );
        assert!(result.is_err());
    }
}
