use serde::{self, Deserialize, Deserializer, Serializer};
use std::time::Duration;

/// Converts a float amount of seconds into a [`Duration`].
///
/// Negative, NaN and infinite values are rejected with a readable message.
pub fn duration_from_secs<E: serde::de::Error>(secs: f64) -> Result<Duration, E> {
    Duration::try_from_secs_f64(secs)
        .map_err(|e| E::custom(format!("invalid duration of {secs} seconds: {e}")))
}

pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(duration.as_secs_f64())
}

/// Deserialize a seconds value like `2.5` into a [`Duration`].
pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    duration_from_secs(secs)
}
