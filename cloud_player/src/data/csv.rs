//! CSV frame decoder: raw depth-video records → FrameSequence.
//!
//! One record per line, comma-separated, no header:
//! `step,r,g,b,x,y,z,col,row`. A line whose first field is not an integer
//! terminates ingestion: a blank line is the normal trailer of a recording,
//! any other unparsable lead field marks the load as truncated. Frames
//! sealed before the abort are kept either way.

use crate::config::LoaderConfig;
use crate::data::model::{Frame, FrameSequence, LoadOutcome, LoadStatus, Point};

/// Source coordinates divide by 200 to reach world units; z flips to match
/// the camera-facing convention.
const POSITION_SCALE: f32 = 200.0;

/// Channels below this raw value get boosted.
const COLOR_FLOOR: f32 = 200.0;
const COLOR_BOOST: f32 = 50.0;

/// Source pixel coordinates are decimated in blocks of this size.
const DECIMATION_BLOCK: i64 = 4;

/// The eight fields following `step` in one record.
struct RawSample {
    r: f32,
    g: f32,
    b: f32,
    x: f32,
    y: f32,
    z: f32,
    col: i64,
    row: i64,
}

/// Decode an ordered stream of raw records into a dense frame sequence.
///
/// A forward jump in `step` seals the in-progress frame and fills the gap
/// with empty frames, so every step in `[0, max_step]` has exactly one
/// entry. Hitting `debug_max_step` stops the load before sealing that step.
pub fn parse_frames<'a, I>(lines: I, config: &LoaderConfig) -> LoadOutcome
where
    I: IntoIterator<Item = &'a str>,
{
    let mut frames: Vec<Frame> = Vec::new();
    let mut current = Frame::new(0);
    let mut status = LoadStatus::Complete;
    let mut saw_record = false;
    let mut cut = false;

    for line in lines {
        let mut fields = line.split(',');
        let lead = fields.next().unwrap_or("").trim();
        let Ok(step) = lead.parse::<usize>() else {
            // Trailer sentinel: blank is the normal end of a recording,
            // anything else is a malformed row and marks the truncation.
            if !lead.is_empty() {
                status = LoadStatus::Truncated;
            }
            break;
        };
        saw_record = true;

        if step > current.step {
            let sealed = std::mem::replace(&mut current, Frame::new(step));
            let gap_start = sealed.step + 1;
            frames.push(sealed);
            for gap in gap_start..step {
                frames.push(Frame::new(gap));
            }
        }

        let Some(raw) = parse_sample(fields) else {
            // Malformed trailing fields drop the record, not the load.
            continue;
        };

        // Decimation: keep a regular sparse subgrid of the source pixels.
        if (raw.col / DECIMATION_BLOCK) % config.resolution_ratio != 0
            || (raw.row / DECIMATION_BLOCK) % config.resolution_ratio != 0
        {
            continue;
        }

        // Checked after decimation: only a surviving record of the cutoff
        // step stops the load.
        if config.debug_max_step == Some(step) {
            cut = true;
            break;
        }

        // Spatial trim, in source units before scaling.
        if raw.x.abs() > config.trim_limit || raw.y.abs() > config.trim_limit {
            continue;
        }

        current.points.push(Point {
            position: [
                raw.x / POSITION_SCALE,
                raw.y / POSITION_SCALE,
                -(raw.z / POSITION_SCALE),
            ],
            color: [
                floor_boost(raw.r) / 255.0,
                floor_boost(raw.g) / 255.0,
                floor_boost(raw.b) / 255.0,
            ],
        });
    }

    if saw_record && !cut {
        frames.push(current);
    }

    let max_step = frames.last().map(|f| f.step).unwrap_or(0);
    LoadOutcome {
        sequence: FrameSequence { frames, max_step },
        status,
    }
}

fn parse_sample<'a>(fields: impl Iterator<Item = &'a str>) -> Option<RawSample> {
    let fields: Vec<&str> = fields.take(8).map(str::trim).collect();
    if fields.len() != 8 {
        return None;
    }
    Some(RawSample {
        r: fields[0].parse().ok()?,
        g: fields[1].parse().ok()?,
        b: fields[2].parse().ok()?,
        x: fields[3].parse().ok()?,
        y: fields[4].parse().ok()?,
        z: fields[5].parse().ok()?,
        col: fields[6].parse().ok()?,
        row: fields[7].parse().ok()?,
    })
}

/// Non-linear brightening: dim channels get +50, bright ones pass through.
/// Inputs stay within `[0, 255]`, so the boost cannot overflow (180 → 230,
/// 240 → 240); no re-clamp is applied.
fn floor_boost(channel: f32) -> f32 {
    if channel < COLOR_FLOOR {
        channel + COLOR_BOOST
    } else {
        channel
    }
}
