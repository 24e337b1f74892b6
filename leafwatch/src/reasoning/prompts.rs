//! Prompt text sent to the remote models.

use crate::core_modules::stress::{StressAssessment, WeatherReading};
use crate::core_modules::vegetation::VegetationReading;

pub const VALIDATION_PROMPT: &str = "Does this image show a single plant? Reply only 'Yes' or 'No'. \
If yes, does the plant look wilted or drought-stressed?";

pub const SCENE_DESCRIPTION_PROMPT: &str = "You are an expert in image analysis of land and vegetation. \
Describe in detail what you see in this image: terrain type, human structures, land use, \
and any other features.";

/// Everything the explanation prompt embeds.
pub struct SummaryContext<'a> {
    pub validation: &'a str,
    pub vegetation: &'a VegetationReading,
    pub weather: &'a WeatherReading,
    pub soil_description: &'a str,
    pub assessment: &'a StressAssessment,
}

pub fn summary_prompt(ctx: &SummaryContext<'_>) -> String {
    format!(
        "You are an agricultural expert analyzing a SINGLE PLANT.\n\
\n\
- Vision model says: {validation}\n\
- RGVI Score: {rgvi:.2} (-1 unhealthy, 1 healthy)\n\
- Weather: {description}, {temperature}°C, {humidity}% humidity\n\
- Soil type: {soil}\n\
- Combined water stress score (0 healthy → 1 very stressed): {combined:.2}\n\
- Water Deficit Index (0 none → 1 severe): {wdi}\n\
- Confidence in vegetation reading: {confidence:.2}\n\
- Estimated irrigation need: {irrigation} liters ({size} plant)\n\
- Final interpretation: {status}\n\
\n\
Explain in 3-5 sentences WHY this plant has this water stress level,\n\
mention how weather, soil, and vegetation index contribute,\n\
and give a short irrigation recommendation.\n",
        validation = ctx.validation,
        rgvi = ctx.vegetation.rgvi,
        description = ctx.weather.description,
        temperature = ctx.weather.temperature_c,
        humidity = ctx.weather.humidity_pct,
        soil = ctx.soil_description,
        combined = ctx.assessment.combined_stress,
        wdi = ctx.assessment.water_deficit_index,
        confidence = ctx.vegetation.confidence,
        irrigation = ctx.assessment.irrigation_liters,
        size = ctx.assessment.plant_size,
        status = ctx.assessment.status,
    )
}

pub fn self_rating_prompt(summary: &str) -> String {
    format!(
        "You are an expert agronomist.\n\
You just gave this plant water stress analysis:\n\
\n\
\"\"\"{summary}\"\"\"\n\
\n\
On a scale of 0 to 100, how confident are you that this diagnosis and irrigation \
recommendation is correct?\n\
Reply with ONLY the number (0 to 100) without any explanation.\n"
    )
}
