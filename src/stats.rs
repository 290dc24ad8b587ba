use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

#[cfg(test)]
use anyhow::{anyhow, bail};
#[cfg(test)]
use jsonschema::{Draft, JSONSchema};
#[cfg(test)]
use std::path::Path;

/// Report printed for one conversation, keyed by participant display name.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub participants: IndexMap<String, ParticipantStats>,
}

/// Per-participant counters and the averages derived from them.
///
/// Averages are `NaN` when their denominator is zero and serialize as `null`.
/// Whole-valued averages serialize without a fraction (`6`, not `6.0`).
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStats {
    pub count: u64,
    pub length_sum: u64,
    #[serde(serialize_with = "serialize_average")]
    pub length_ave: f64,
    pub english_count: u64,
    #[serde(serialize_with = "serialize_average")]
    pub english_percentage: f64,
    pub smile_count: u64,
    pub shares_count: u64,
    /// Reactions this participant left on other messages.
    pub like_count: u64,
    pub reaction_time_count: u64,
    pub reaction_time_sum_ms: i64,
    #[serde(serialize_with = "serialize_average")]
    pub reaction_time_ave_ms: f64,
    /// Human readable `reaction_time_ave_ms`.
    pub reaction_time_ave: Option<String>,
}

/// Largest magnitude below which every whole `f64` is an exact integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

fn serialize_average<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

impl ParticipantStats {
    /// Fills the average fields from the running sums.
    pub fn derive_averages(&mut self) {
        let count = self.count as f64;
        self.length_ave = self.length_sum as f64 / count;
        self.reaction_time_ave_ms = self.reaction_time_sum_ms as f64 / self.reaction_time_count as f64;
        self.reaction_time_ave = crate::timefmt::humanize_duration_ms(self.reaction_time_ave_ms);
        self.english_percentage = self.english_count as f64 / count;
    }
}

impl Report {
    /// Pretty JSON with two-space indentation.
    pub fn to_pretty_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    pub fn total_count(&self) -> u64 {
        self.participants.values().map(|p| p.count).sum()
    }

    #[cfg(test)]
    /// Validate report JSON against the JSON schema
    pub fn validate_with_schema(report_json: &serde_json::Value, schema: &JSONSchema) -> Result<()> {
        match schema.validate(report_json) {
            Ok(_) => Ok(()),
            Err(errors) => {
                let error_messages: Vec<String> = errors
                    .map(|e| format!("  - {}: {}", e.instance_path, e))
                    .collect();
                bail!("Report validation failed:\n{}", error_messages.join("\n"))
            }
        }
    }

    #[cfg(test)]
    /// Load and compile the JSON schema
    pub fn load_schema(schema_path: &Path) -> Result<JSONSchema> {
        let schema_content = std::fs::read_to_string(schema_path)
            .with_context(|| format!("Failed to read schema file: {}", schema_path.display()))?;

        let schema_json: serde_json::Value =
            serde_json::from_str(&schema_content).with_context(|| {
                format!(
                    "Failed to parse schema JSON from: {}",
                    schema_path.display()
                )
            })?;

        JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(&schema_json)
            .map_err(|e| anyhow!("Failed to compile JSON schema: {}", e))
    }
}
