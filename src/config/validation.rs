//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::EngineConfig;

/// Test age beyond which a configured limit is almost certainly a mistake, days.
const SUSPICIOUS_TEST_AGE_DAYS: u32 = 1825;

/// Weight ceiling beyond any wireline or coiled-tubing unit, lbs.
const SUSPICIOUS_MAX_WEIGHT_LBS: f64 = 200_000.0;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Complete set of valid dotted key paths for `EngineConfig`.
///
/// Maintained by hand; a new field in `engine_config.rs` must be added here.
pub fn known_config_keys() -> HashSet<&'static str> {
    [
        // [verification]
        "verification",
        "verification.strict_mode",
        "verification.check_pressure_ratings",
        "verification.check_test_dates",
        "verification.max_test_age_days",
        // [toolstring]
        "toolstring",
        "toolstring.max_weight_lbs",
        // [catalog]
        "catalog",
        "catalog.path",
    ]
    .into_iter()
    .collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// A table `{ a = { b = 1, c = 2 } }` yields `["a", "a.b", "a.c"]`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

/// Closest known key within edit distance 3. Ties resolve alphabetically.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|k| (levenshtein(unknown, k), *k))
        .filter(|(dist, _)| *dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// Never fails on unknown keys; parse errors are left to serde.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let Ok(value) = raw_toml.parse::<toml::Value>() else {
        return Vec::new();
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

/// Returns (errors, warnings). Errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(config: &EngineConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let age = config.verification.max_test_age_days;
    if age == 0 {
        errors.push("verification.max_test_age_days = 0 must be > 0".to_string());
    } else if age > SUSPICIOUS_TEST_AGE_DAYS {
        warnings.push(ValidationWarning {
            field: "verification.max_test_age_days".to_string(),
            message: format!(
                "max_test_age_days = {age} exceeds {SUSPICIOUS_TEST_AGE_DAYS} days; stale barrier tests will pass"
            ),
            suggestion: None,
        });
    }

    let weight = config.toolstring.max_weight_lbs;
    if !weight.is_finite() || weight <= 0.0 {
        errors.push(format!("toolstring.max_weight_lbs = {weight} must be a finite value > 0"));
    } else if weight > SUSPICIOUS_MAX_WEIGHT_LBS {
        warnings.push(ValidationWarning {
            field: "toolstring.max_weight_lbs".to_string(),
            message: format!(
                "max_weight_lbs = {weight:.0} is above typical conveyance limits ({SUSPICIOUS_MAX_WEIGHT_LBS:.0} lbs)"
            ),
            suggestion: None,
        });
    }

    if !config.verification.strict_mode {
        warnings.push(ValidationWarning {
            field: "verification.strict_mode".to_string(),
            message: "strict_mode = false: barriers of unknown status will not be reported".to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================
