// src/data.rs
use crate::config::default_session_name;
use crate::error::{Result, SmootherError};
use crate::landmarks::{frame_from_records, frame_to_records, Frame, LandmarkRecord};
use crate::pipeline::{Observation, SmoothedFrame};
use csv::Writer;
use serde::{Deserialize, Serialize};
use tracing::info;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

/// One line of detector output: `{"timestamp": 33.3, "poses": [[{x,y,z}, ..]], "faces": [..]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub timestamp: f64,
    #[serde(default)]
    pub poses: Vec<Vec<LandmarkRecord>>,
    #[serde(default)]
    pub faces: Vec<Vec<LandmarkRecord>>,
}

impl From<ObservationRecord> for Observation {
    fn from(record: ObservationRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            poses: frame_from_records(&record.poses),
            faces: frame_from_records(&record.faces),
        }
    }
}

impl From<&SmoothedFrame> for ObservationRecord {
    fn from(frame: &SmoothedFrame) -> Self {
        Self {
            timestamp: frame.timestamp,
            poses: frame_to_records(&frame.poses),
            faces: frame_to_records(&frame.faces),
        }
    }
}

/// Reads JSON Lines detector output. Blank lines are ignored.
pub fn read_observations<R: BufRead>(reader: R) -> Result<Vec<Observation>> {
    let mut observations = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: ObservationRecord = serde_json::from_str(&line)
            .map_err(|source| SmootherError::MalformedObservation { line: index + 1, source })?;
        observations.push(record.into());
    }
    Ok(observations)
}

#[derive(Debug, Serialize)]
struct LandmarkRow<'a> {
    timestamp: f64,
    frame: usize,
    stream: &'a str,
    entity: usize,
    point: usize,
    raw_x: f64,
    raw_y: f64,
    raw_z: f64,
    smoothed_x: f64,
    smoothed_y: f64,
    smoothed_z: f64,
}

/// Collects raw and smoothed frames for a session and writes them out.
pub struct DataExporter {
    output_dir: PathBuf,
    session_name: String,
    frames: Vec<(Observation, SmoothedFrame)>,
}

impl DataExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name: session_name.unwrap_or_else(default_session_name),
            frames: Vec::new(),
        }
    }

    pub fn add_frame(&mut self, raw: Observation, smoothed: SmoothedFrame) {
        self.frames.push((raw, smoothed));
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    /// Writes one row per (frame, stream, entity, point).
    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self.session_dir().join("smoothed_landmarks.csv");
        std::fs::create_dir_all(self.session_dir())?;

        let mut writer = Writer::from_writer(File::create(&csv_path)?);
        for (index, (raw, smoothed)) in self.frames.iter().enumerate() {
            for (stream, raw_frame, smoothed_frame) in [
                ("pose", &raw.poses, &smoothed.poses),
                ("face", &raw.faces, &smoothed.faces),
            ] {
                Self::write_rows(&mut writer, index, smoothed.timestamp, stream, raw_frame, smoothed_frame)?;
            }
        }
        writer.flush()?;

        info!(path = %csv_path.display(), frames = self.frames.len(), "Exported CSV");
        Ok(csv_path)
    }

    fn write_rows<W: Write>(
        writer: &mut Writer<W>,
        frame: usize,
        timestamp: f64,
        stream: &str,
        raw: &Frame,
        smoothed: &Frame,
    ) -> Result<()> {
        for (entity, (raw_set, smoothed_set)) in raw.iter().zip(smoothed).enumerate() {
            for (point, (r, s)) in raw_set.iter().zip(smoothed_set).enumerate() {
                writer.serialize(LandmarkRow {
                    timestamp,
                    frame,
                    stream,
                    entity,
                    point,
                    raw_x: r.x,
                    raw_y: r.y,
                    raw_z: r.z,
                    smoothed_x: s.x,
                    smoothed_y: s.y,
                    smoothed_z: s.z,
                })?;
            }
        }
        Ok(())
    }

    /// Writes smoothed frames in the same JSON Lines layout the input uses.
    pub fn export_jsonl(&self) -> Result<PathBuf> {
        let jsonl_path = self.session_dir().join("smoothed_landmarks.jsonl");
        std::fs::create_dir_all(self.session_dir())?;

        let mut writer = BufWriter::new(File::create(&jsonl_path)?);
        for (_, smoothed) in &self.frames {
            serde_json::to_writer(&mut writer, &ObservationRecord::from(smoothed))?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        info!(path = %jsonl_path.display(), "Exported JSON Lines");
        Ok(jsonl_path)
    }
}
