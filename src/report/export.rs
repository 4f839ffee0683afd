use super::{FlightSummary, ReportError};
use crate::config::PhysicalConfig;
use crate::models::{Sample, SimulationResult};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
struct TrajectoryRow {
    #[serde(rename = "t (s)")]
    t: f64,
    #[serde(rename = "y (m)")]
    y: f64,
    #[serde(rename = "vy (m/s)")]
    vy: f64,
    #[serde(rename = "x (m)")]
    x: f64,
    #[serde(rename = "vx (m/s)")]
    vx: f64,
    #[serde(rename = "speed (m/s)")]
    speed: f64,
}

impl From<&Sample> for TrajectoryRow {
    fn from(sample: &Sample) -> Self {
        let s = &sample.state;
        Self {
            t: sample.t,
            y: s.y,
            vy: s.y_dot,
            x: s.x,
            vx: s.x_dot,
            speed: s.speed(),
        }
    }
}

/// One row per sample, with a header line.
pub fn write_csv<W: Write>(result: &SimulationResult, writer: W) -> Result<(), ReportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for sample in result.samples() {
        csv.serialize(TrajectoryRow::from(sample))?;
    }
    csv.flush()?;
    Ok(())
}

/// Markdown report of the parameters and derived figures of one run.
pub fn write_markdown<W: Write>(
    config: &PhysicalConfig,
    summary: &FlightSummary,
    mut writer: W,
) -> Result<(), ReportError> {
    writeln!(writer, "# Recovery Descent Report")?;
    writeln!(writer)?;
    if !summary.landed {
        writeln!(
            writer,
            "> **Unfinished descent:** the time horizon ran out at {:.2} s before ground contact.",
            summary.flight_time
        )?;
        writeln!(writer)?;
    }

    writeln!(writer, "## Parameters")?;
    writeln!(writer, "- **Mass**: {:.2} kg", config.mass)?;
    writeln!(writer, "- **Apogee**: {:.2} m", config.apogee)?;
    writeln!(writer, "- **Drogue deployment altitude**: {:.2} m", config.drogue_altitude)?;
    writeln!(writer, "- **Reefing deployment altitude**: {:.2} m", config.reefing_altitude)?;
    writeln!(writer, "- **Main deployment altitude**: {:.2} m", config.main_altitude)?;
    writeln!(writer)?;

    writeln!(writer, "## Results")?;
    writeln!(writer, "- **Flight time**: {:.2} s", summary.flight_time)?;
    writeln!(writer, "- **Maximum altitude**: {:.2} m", summary.max_altitude)?;
    writeln!(writer, "- **Maximum speed**: {:.2} m/s", summary.max_speed)?;
    writeln!(writer, "- **Horizontal displacement**: {:.2} m", summary.horizontal_displacement)?;
    writeln!(writer)?;

    writeln!(writer, "### Impact velocity")?;
    writeln!(writer, "- **Magnitude**: {:.2} m/s", summary.impact_speed)?;
    writeln!(writer, "- **Vertical**: {:.2} m/s", summary.impact_vertical_velocity)?;
    writeln!(writer, "- **Horizontal**: {:.2} m/s", summary.impact_horizontal_velocity)?;
    writeln!(writer, "- **Direction**: {:.1}° from horizontal", summary.impact_angle)?;
    writeln!(writer)?;

    writeln!(writer, "## Deployments")?;
    if summary.deployments.is_empty() {
        writeln!(writer, "No parachute deployments recorded")?;
    }
    for event in &summary.deployments {
        writeln!(
            writer,
            "- {}: {:.2} s (vy = {:.2} m/s)",
            event.stage, event.t, event.vertical_velocity
        )?;
    }

    writer.flush()?;
    Ok(())
}
