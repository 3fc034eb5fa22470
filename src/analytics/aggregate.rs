use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::pose::UNKNOWN_POSE;
use crate::session::LogEntry;

use super::config::AggregationConfig;
use super::holds::{group_holds, longest_hold_secs};
use super::narrative::{compose, Narrative, HOLD_FEEDBACK};

/// Per-pose totals over a whole session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseStat {
    pub pose_name: String,
    pub frame_count: usize,
    /// `frame_count / assumed_frame_rate`. Not measured wall-clock time.
    pub estimated_seconds: f64,
    pub avg_confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPose {
    #[serde(flatten)]
    pub stat: PoseStat,
    /// Longest contiguous run of this pose, from entry timestamps.
    pub longest_hold_seconds: f64,
    pub feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    pub total_frames: usize,
    pub avg_confidence: f64,
    /// Every pose seen, `Unknown` included, longest first.
    pub pose_stats: Vec<PoseStat>,
    pub top_poses: Vec<TopPose>,
    pub narrative: Narrative,
}

#[derive(Default)]
struct Tally {
    frames: usize,
    confidence_sum: f64,
}

/// Derive session statistics from a log. `None` for an empty log.
pub fn compute_metrics(entries: &[LogEntry], config: &AggregationConfig) -> Option<SessionMetrics> {
    if entries.is_empty() {
        return None;
    }

    let total_frames = entries.len();
    let avg_confidence = entries
        .iter()
        .map(|e| f64::from(e.confidence))
        .sum::<f64>()
        / total_frames as f64;

    // First-appearance order, so equal durations keep a stable ranking.
    let mut order: Vec<&str> = Vec::new();
    let mut tallies: HashMap<&str, Tally> = HashMap::new();
    for entry in entries {
        let tally = tallies.entry(entry.pose_name.as_str()).or_insert_with(|| {
            order.push(entry.pose_name.as_str());
            Tally::default()
        });
        tally.frames += 1;
        tally.confidence_sum += f64::from(entry.confidence);
    }

    let mut pose_stats: Vec<PoseStat> = order
        .into_iter()
        .map(|name| {
            let tally = &tallies[name];
            PoseStat {
                pose_name: name.to_string(),
                frame_count: tally.frames,
                estimated_seconds: tally.frames as f64 / config.assumed_frame_rate,
                avg_confidence: tally.confidence_sum / tally.frames as f64,
            }
        })
        .collect();
    pose_stats.sort_by(|a, b| b.estimated_seconds.total_cmp(&a.estimated_seconds));

    let recognised: Vec<&PoseStat> = pose_stats
        .iter()
        .filter(|stat| stat.pose_name != UNKNOWN_POSE)
        .collect();

    let holds = group_holds(entries);
    let top_poses = recognised
        .iter()
        .take(config.top_pose_count)
        .map(|stat| TopPose {
            stat: (*stat).clone(),
            longest_hold_seconds: longest_hold_secs(&holds, &stat.pose_name),
            feedback: HOLD_FEEDBACK.to_string(),
        })
        .collect();

    let narrative = compose(recognised.first().copied(), recognised.last().copied());

    Some(SessionMetrics {
        total_frames,
        avg_confidence,
        pose_stats,
        top_poses,
        narrative,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};

    fn log(poses: &[(&str, f32, usize)]) -> Vec<LogEntry> {
        let base = DateTime::parse_from_rfc3339("2025-03-01T07:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let mut entries = Vec::new();
        for &(name, confidence, count) in poses {
            for _ in 0..count {
                let at = base + Duration::milliseconds(100 * entries.len() as i64);
                entries.push(LogEntry {
                    pose_name: name.into(),
                    confidence,
                    timestamp: at,
                });
            }
        }
        entries
    }

    #[test]
    fn empty_log_has_no_metrics() {
        assert!(compute_metrics(&[], &AggregationConfig::default()).is_none());
    }

    #[test]
    fn groups_are_counted_and_ranked() {
        let entries = log(&[
            ("Unknown", 0.0, 90),
            ("Tadasana", 0.9, 60),
            ("Savasana", 0.9, 15),
            ("Vrikshasana", 0.85, 30),
            ("Phalakasana", 0.8, 6),
        ]);
        let metrics = compute_metrics(&entries, &AggregationConfig::default()).unwrap();

        assert_eq!(metrics.total_frames, 201);
        let total: usize = metrics.pose_stats.iter().map(|s| s.frame_count).sum();
        assert_eq!(total, 201);

        let ranked: Vec<&str> = metrics
            .pose_stats
            .iter()
            .map(|s| s.pose_name.as_str())
            .collect();
        assert_eq!(
            ranked,
            vec!["Unknown", "Tadasana", "Vrikshasana", "Savasana", "Phalakasana"]
        );
        assert!((metrics.pose_stats[1].estimated_seconds - 2.0).abs() < 1e-9);

        let top: Vec<&str> = metrics
            .top_poses
            .iter()
            .map(|t| t.stat.pose_name.as_str())
            .collect();
        assert_eq!(top, vec!["Tadasana", "Vrikshasana", "Savasana"]);
        // 60 entries 100ms apart span 5.9s of wall clock.
        assert!((metrics.top_poses[0].longest_hold_seconds - 5.9).abs() < 1e-9);

        assert!(metrics.narrative.strength.contains("Tadasana"));
        assert!(metrics.narrative.strength.contains("2.0s"));
        assert!(metrics.narrative.growth.starts_with("Phalakasana"));
    }

    #[test]
    fn average_confidence_is_the_plain_mean() {
        let entries = log(&[("Tadasana", 0.9, 3), ("Unknown", 0.0, 1), ("Savasana", 0.5, 1)]);
        let metrics = compute_metrics(&entries, &AggregationConfig::default()).unwrap();
        let expected = (0.9f32 as f64 * 3.0 + 0.5f32 as f64) / 5.0;
        assert!((metrics.avg_confidence - expected).abs() < 1e-9);

        let tadasana = &metrics.pose_stats[0];
        assert_eq!(tadasana.pose_name, "Tadasana");
        assert!((tadasana.avg_confidence - 0.9f32 as f64).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_first_appearance_order() {
        let entries = log(&[("Savasana", 0.9, 5), ("Tadasana", 0.9, 5)]);
        let metrics = compute_metrics(&entries, &AggregationConfig::default()).unwrap();
        assert_eq!(metrics.pose_stats[0].pose_name, "Savasana");
        assert!(metrics.narrative.growth.starts_with("Tadasana"));
    }

    #[test]
    fn only_unknown_degrades_to_neutral_narrative() {
        let entries = log(&[("Unknown", 0.0, 10)]);
        let metrics = compute_metrics(&entries, &AggregationConfig::default()).unwrap();
        assert!(metrics.top_poses.is_empty());
        assert_eq!(metrics.avg_confidence, 0.0);
        assert!(!metrics.narrative.strength.contains("Unknown"));
    }

    #[test]
    fn frame_rate_is_configurable() {
        let entries = log(&[("Tadasana", 0.9, 30)]);
        let config = AggregationConfig {
            assumed_frame_rate: 10.0,
            ..AggregationConfig::default()
        };
        let metrics = compute_metrics(&entries, &config).unwrap();
        assert!((metrics.pose_stats[0].estimated_seconds - 3.0).abs() < 1e-9);
    }
}
