use serde_json::Value;

/// Extract the volume reading from a state snapshot.
///
/// Returns `None` unless `volume` is a JSON number. Fractional values are
/// rounded to the nearest integer.
pub fn volume_from_snapshot(snapshot: &Value) -> Option<i64> {
    let volume = snapshot.get("volume")?;
    if let Some(v) = volume.as_i64() {
        return Some(v);
    }

    volume
        .as_f64()
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i64)
}
