//! Human-readable and JSON renderings of a `StressReport`.

use crate::pipeline::StressReport;
use std::fmt;

/// Output format of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl StressReport {
    pub fn render(&self, format: ReportFormat) -> Result<String, serde_json::Error> {
        match format {
            ReportFormat::Text => Ok(self.to_string()),
            ReportFormat::Json => serde_json::to_string_pretty(self),
        }
    }
}

impl fmt::Display for StressReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = &self.assessment;
        let w = &self.conditions.weather;
        writeln!(f, "=== Plant Water Stress Report ===")?;
        writeln!(f, "Backend                : {}", self.backend)?;
        writeln!(f, "Plant Validation       : {}", self.validation)?;
        writeln!(
            f,
            "Weather                : {}, {}°C, {}% humidity",
            w.description, w.temperature_c, w.humidity_pct
        )?;
        writeln!(f, "RGVI Score             : {:.2}", self.vegetation.rgvi)?;
        writeln!(f, "Vegetation Stress      : {:.2}", a.vegetation_stress)?;
        writeln!(f, "Weather Stress         : {:.2}", a.weather_stress)?;
        writeln!(f, "Combined Stress        : {:.2}", a.combined_stress)?;
        writeln!(f, "Water Deficit Index    : {:.2}", a.water_deficit_index)?;
        writeln!(f, "Confidence Score       : {:.2}", self.vegetation.confidence)?;
        writeln!(
            f,
            "Estimated Irrigation   : {:.2} liters ({} plant)",
            a.irrigation_liters, a.plant_size
        )?;
        writeln!(f, "Self-rated Accuracy    : {}", self.self_rated_confidence)?;
        writeln!(f, "Soil Type              : {}", self.conditions.soil)?;
        writeln!(f, "Status                 : {}", a.status)?;
        writeln!(f)?;
        writeln!(f, "Expert Summary:")?;
        write!(f, "{}", self.expert_summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::stress::{PlantSize, StressAssessment, WeatherReading};
    use crate::core_modules::vegetation::VegetationReading;
    use crate::pipeline::{GrowingConditions, RemoteText};
    use crate::reasoning::SelfRatedConfidence;

    fn sample_report() -> StressReport {
        let weather = WeatherReading {
            description: "overcast".into(),
            temperature_c: 33.0,
            humidity_pct: 35.0,
        };
        let vegetation = VegetationReading {
            rgvi: 0.2,
            confidence: 0.75,
        };
        StressReport {
            backend: "local".into(),
            validation: RemoteText::Reply("Yes".into()),
            assessment: StressAssessment::evaluate(vegetation.rgvi, &weather, "Sandy", PlantSize::Small),
            conditions: GrowingConditions {
                weather,
                soil: "Sandy".into(),
            },
            vegetation,
            expert_summary: RemoteText::Failed("request failed: connection refused".into()),
            self_rated_confidence: SelfRatedConfidence::Indeterminate,
        }
    }

    #[test]
    fn text_report_lists_metrics_and_inline_errors() {
        let text = sample_report().render(ReportFormat::Text).unwrap();
        assert!(text.starts_with("=== Plant Water Stress Report ==="));
        assert!(text.contains("RGVI Score             : 0.20"));
        assert!(text.contains("Confidence Score       : 0.75"));
        assert!(text.contains("Soil Type              : Sandy"));
        assert!(text.contains("Self-rated Accuracy    : Could not determine"));
        assert!(text.contains("(small plant)"));
        assert!(text.ends_with("Error: request failed: connection refused"));
    }

    #[test]
    fn json_report_is_structured() {
        let json = sample_report().render(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["backend"], "local");
        assert_eq!(value["assessment"]["soil"], "sandy");
        assert_eq!(value["assessment"]["plant_size"], "small");
        assert_eq!(value["validation"]["kind"], "reply");
        assert_eq!(value["expert_summary"]["kind"], "failed");
        assert_eq!(value["self_rated_confidence"]["kind"], "indeterminate");
        assert_eq!(value["conditions"]["weather"]["temperature_c"], 33.0);
    }
}
