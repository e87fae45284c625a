// Unless explicitly stated otherwise all files in this repository are licensed under the Apache License Version 2.0.

//! Duration encoding for the wire schema.

/// Converts milliseconds to the `HH:MM:SS.mmm` timespan string the track
/// endpoint accepts. Negative input counts as zero.
///
/// Hours wrap modulo 24: there is no day component, so a duration of a full
/// day formats the same as zero. Kept for compatibility with the ingestion
/// schema as deployed.
pub fn format_ms(milliseconds: i64) -> String {
    let total = milliseconds.max(0);

    let millis = total % 1000;
    let seconds = (total / 1000) % 60;
    let minutes = (total / 60_000) % 60;
    let hours = (total / 3_600_000) % 24;

    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}
