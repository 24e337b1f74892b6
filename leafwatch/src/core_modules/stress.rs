// THEORY:
// The environmental stress model is the second half of the scoring core. It blends
// what the image says (vegetation index) with what the grower says (temperature,
// humidity, soil) into one water stress score in [0, 1], then derives everything
// the report needs from that score.
//
// Key principles:
// 1.  **Inversion**: a high vegetation index means a healthy plant, so vegetation
//     stress is the normalized index flipped: 1 − (rgvi + 1) / 2.
// 2.  **Distance from ideal**: weather stress measures how far the conditions sit
//     from 25 °C and 65 % relative humidity. Temperature deviation is scaled by
//     20 °C and humidity deviation by 50 points; the two are averaged and capped.
// 3.  **Equal blend, then soil**: vegetation and weather contribute 50/50, and the
//     soil's drainage category scales the blend. Fast-draining sand makes things
//     worse, loam makes them better. The product is clamped back into [0, 1].
// 4.  **Fixed buckets**: status thresholds (0.3, 0.6) and plant water volumes are
//     constants of the model, not configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type StressScore = f64;

const IDEAL_TEMPERATURE_C: f64 = 25.0;
const TEMPERATURE_TOLERANCE_C: f64 = 20.0;
const IDEAL_HUMIDITY_PCT: f64 = 65.0;
const HUMIDITY_TOLERANCE_PCT: f64 = 50.0;

const VEGETATION_WEIGHT: f64 = 0.5;
const WEATHER_WEIGHT: f64 = 0.5;

const LOW_STRESS_CEILING: StressScore = 0.3;
const MODERATE_STRESS_CEILING: StressScore = 0.6;

/// Liters of water per unit of stress are doubled on top of the size base volume.
const IRRIGATION_FACTOR: f64 = 2.0;

/// Observed growing conditions, as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReading {
    /// Free-text description, e.g. "clear sky". Only used in prompts and reports.
    pub description: String,
    pub temperature_c: f64,
    pub humidity_pct: f64,
}

/// Soil drainage category, recognised by substring in a free-text description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Sandy,
    Clay,
    Loam,
    Other,
}

impl SoilType {
    /// Case-insensitive substring match. Order matters: "sandy clay" is sandy.
    pub fn from_description(description: &str) -> Self {
        let lowered = description.to_lowercase();
        if lowered.contains("sandy") {
            SoilType::Sandy
        } else if lowered.contains("clay") {
            SoilType::Clay
        } else if lowered.contains("loam") {
            SoilType::Loam
        } else {
            SoilType::Other
        }
    }

    /// Multiplier applied to the blended stress.
    pub fn modifier(self) -> f64 {
        match self {
            SoilType::Sandy => 1.2,
            SoilType::Clay => 1.1,
            SoilType::Loam => 0.9,
            SoilType::Other => 1.0,
        }
    }
}

/// Shorthand for `SoilType::from_description(text).modifier()`.
pub fn soil_modifier(description: &str) -> f64 {
    SoilType::from_description(description).modifier()
}

/// Plant size class, used only to pick an irrigation base volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl PlantSize {
    /// Base water volume in liters.
    pub fn base_water_liters(self) -> f64 {
        match self {
            PlantSize::Small => 0.5,
            PlantSize::Medium => 1.5,
            PlantSize::Large => 3.0,
        }
    }

    /// Parses a size name; anything unrecognised is `Medium`.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for PlantSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "small" => Ok(PlantSize::Small),
            "medium" => Ok(PlantSize::Medium),
            "large" => Ok(PlantSize::Large),
            other => Err(format!("unknown plant size '{other}'")),
        }
    }
}

impl fmt::Display for PlantSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlantSize::Small => "small",
            PlantSize::Medium => "medium",
            PlantSize::Large => "large",
        };
        f.write_str(name)
    }
}

/// Categorical reading of a stress score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StressStatus {
    Low,
    Moderate,
    High,
}

impl StressStatus {
    pub fn from_score(score: StressScore) -> Self {
        if score < LOW_STRESS_CEILING {
            StressStatus::Low
        } else if score < MODERATE_STRESS_CEILING {
            StressStatus::Moderate
        } else {
            StressStatus::High
        }
    }

    /// Full interpretation sentence shown in reports and prompts.
    pub fn interpretation(self) -> &'static str {
        match self {
            StressStatus::Low => "Low water stress – plant looks healthy.",
            StressStatus::Moderate => "Moderate water stress – some irrigation may help.",
            StressStatus::High => "High water stress – urgent watering required.",
        }
    }
}

impl fmt::Display for StressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.interpretation())
    }
}

/// Everything the stress model derives from one vegetation index and one set of conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StressAssessment {
    pub vegetation_stress: StressScore,
    pub weather_stress: StressScore,
    pub soil: SoilType,
    pub combined_stress: StressScore,
    /// Water deficit index: the combined stress rounded to two decimals.
    pub water_deficit_index: f64,
    pub irrigation_liters: f64,
    pub plant_size: PlantSize,
    pub status: StressStatus,
}

impl StressAssessment {
    pub fn evaluate(
        rgvi: f64,
        weather: &WeatherReading,
        soil_description: &str,
        plant_size: PlantSize,
    ) -> Self {
        let soil = SoilType::from_description(soil_description);
        let vegetation_stress = vegetation_stress(rgvi);
        let weather_stress = compute_weather_stress(weather.temperature_c, weather.humidity_pct);
        let combined = blend(vegetation_stress, weather_stress, soil.modifier());
        Self {
            vegetation_stress,
            weather_stress,
            soil,
            combined_stress: combined,
            water_deficit_index: water_deficit_index(combined),
            irrigation_liters: irrigation_recommendation(combined, plant_size),
            plant_size,
            status: StressStatus::from_score(combined),
        }
    }
}

/// Vegetation stress from a vegetation index: healthy (+1) maps to 0, dead (−1) to 1.
pub fn vegetation_stress(rgvi: f64) -> StressScore {
    1.0 - ((rgvi + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Weather stress from temperature (°C) and relative humidity (%), in [0, 1].
pub fn compute_weather_stress(temperature_c: f64, humidity_pct: f64) -> StressScore {
    let temperature_stress = ((temperature_c - IDEAL_TEMPERATURE_C).abs() / TEMPERATURE_TOLERANCE_C).max(0.0);
    let humidity_stress = ((humidity_pct - IDEAL_HUMIDITY_PCT).abs() / HUMIDITY_TOLERANCE_PCT).max(0.0);
    ((temperature_stress + humidity_stress) / 2.0).min(1.0)
}

fn blend(vegetation_stress: StressScore, weather_stress: StressScore, soil_modifier: f64) -> StressScore {
    let blended = (VEGETATION_WEIGHT * vegetation_stress + WEATHER_WEIGHT * weather_stress).clamp(0.0, 1.0);
    (blended * soil_modifier).clamp(0.0, 1.0)
}

/// Combined stress for a vegetation index, weather, and soil description. Always in [0, 1].
pub fn combined_stress(rgvi: f64, temperature_c: f64, humidity_pct: f64, soil_description: &str) -> StressScore {
    blend(
        vegetation_stress(rgvi),
        compute_weather_stress(temperature_c, humidity_pct),
        soil_modifier(soil_description),
    )
}

pub fn water_deficit_index(stress: StressScore) -> f64 {
    round2(stress)
}

/// Irrigation need in liters: base volume for the size × stress × 2.
pub fn irrigation_recommendation(stress: StressScore, plant_size: PlantSize) -> f64 {
    round2(plant_size.base_water_liters() * stress * IRRIGATION_FACTOR)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(temperature_c: f64, humidity_pct: f64) -> WeatherReading {
        WeatherReading {
            description: "clear sky".into(),
            temperature_c,
            humidity_pct,
        }
    }

    #[test]
    fn weather_stress_is_zero_at_ideal_point() {
        assert_eq!(compute_weather_stress(25.0, 65.0), 0.0);
    }

    #[test]
    fn weather_stress_grows_with_deviation_either_way() {
        let mut last = 0.0;
        for delta in [1.0, 5.0, 10.0, 15.0] {
            let hot = compute_weather_stress(25.0 + delta, 65.0);
            let cold = compute_weather_stress(25.0 - delta, 65.0);
            assert_eq!(hot, cold);
            assert!(hot > last);
            last = hot;
        }
        assert!(compute_weather_stress(25.0, 80.0) > compute_weather_stress(25.0, 70.0));
        assert!(compute_weather_stress(25.0, 40.0) > compute_weather_stress(25.0, 60.0));
    }

    #[test]
    fn weather_stress_caps_at_one() {
        assert_eq!(compute_weather_stress(60.0, 0.0), 1.0);
        assert_eq!(compute_weather_stress(-40.0, 150.0), 1.0);
    }

    #[test]
    fn soil_modifier_is_case_insensitive() {
        assert_eq!(soil_modifier("SANDY"), 1.2);
        assert_eq!(soil_modifier("Heavy Clay"), 1.1);
        assert_eq!(soil_modifier("loamy"), 0.9);
        assert_eq!(soil_modifier("peat"), 1.0);
        assert_eq!(soil_modifier(""), 1.0);
    }

    #[test]
    fn soil_match_prefers_sandy_over_clay() {
        assert_eq!(SoilType::from_description("sandy clay"), SoilType::Sandy);
    }

    #[test]
    fn combined_stress_stays_in_unit_interval() {
        for rgvi in [-1.0, -0.5, 0.0, 0.5, 1.0] {
            for temperature in [-30.0, 0.0, 25.0, 45.0, 70.0] {
                for humidity in [0.0, 30.0, 65.0, 100.0] {
                    for soil in ["sandy", "clay", "loam", "rock"] {
                        let score = combined_stress(rgvi, temperature, humidity, soil);
                        assert!((0.0..=1.0).contains(&score), "{rgvi} {temperature} {humidity} {soil} -> {score}");
                    }
                }
            }
        }
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(StressStatus::from_score(0.0), StressStatus::Low);
        assert_eq!(StressStatus::from_score(0.29), StressStatus::Low);
        assert_eq!(StressStatus::from_score(0.3), StressStatus::Moderate);
        assert_eq!(StressStatus::from_score(0.59), StressStatus::Moderate);
        assert_eq!(StressStatus::from_score(0.6), StressStatus::High);
        assert_eq!(StressStatus::from_score(1.0), StressStatus::High);
    }

    #[test]
    fn irrigation_is_zero_without_stress_and_linear_in_it() {
        assert_eq!(irrigation_recommendation(0.0, PlantSize::Small), 0.0);
        assert_eq!(irrigation_recommendation(0.5, PlantSize::Small), 0.5);
        assert_eq!(irrigation_recommendation(1.0, PlantSize::Small), 1.0);
        assert_eq!(irrigation_recommendation(0.25, PlantSize::Medium), 0.75);
        assert_eq!(irrigation_recommendation(0.5, PlantSize::Medium), 1.5);
        assert_eq!(irrigation_recommendation(0.5, PlantSize::Large), 3.0);
    }

    #[test]
    fn unknown_plant_size_defaults_to_medium() {
        assert_eq!(PlantSize::from_name_or_default("gigantic"), PlantSize::Medium);
        assert_eq!(PlantSize::from_name_or_default(" Large "), PlantSize::Large);
    }

    #[test]
    fn water_deficit_index_rounds_to_two_places() {
        assert_eq!(water_deficit_index(0.4567), 0.46);
        assert_eq!(water_deficit_index(0.0), 0.0);
    }

    #[test]
    fn healthy_plant_in_ideal_conditions_is_low_stress() {
        let assessment = StressAssessment::evaluate(1.0, &weather(25.0, 65.0), "loam", PlantSize::Medium);
        assert!(assessment.combined_stress.abs() < 1e-9);
        assert_eq!(assessment.status, StressStatus::Low);
        assert_eq!(assessment.irrigation_liters, 0.0);
    }

    #[test]
    fn dead_plant_in_heatwave_on_sand_is_high_stress() {
        let assessment = StressAssessment::evaluate(-1.0, &weather(45.0, 10.0), "sandy", PlantSize::Medium);
        assert_eq!(assessment.combined_stress, 1.0);
        assert_eq!(assessment.status, StressStatus::High);
        assert_eq!(assessment.water_deficit_index, 1.0);
        assert_eq!(assessment.irrigation_liters, 3.0);
    }

    #[test]
    fn status_sentences() {
        assert!(StressStatus::Low.to_string().starts_with("Low water stress"));
        assert!(StressStatus::High.to_string().starts_with("High water stress"));
    }
}
