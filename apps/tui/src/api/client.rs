use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::domain::{GateEvent, MoonReading, PositionReading};

/// Shown when the phase payload reports a failure without a message.
pub const FALLBACK_UPSTREAM_MSG: &str = "Unknown error occurred while fetching moon data";

/// The one user-facing message for transport and decoding failures.
/// Deliberately does not say which of the requests failed.
pub const NETWORK_FAILURE_MSG: &str =
    "Failed to fetch moon data. Please check your connection and try again.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{0}")]
    Upstream(String),
}

impl FetchError {
    /// User-facing message. The full error stays on stderr only.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(_) => NETWORK_FAILURE_MSG.to_string(),
            Self::Upstream(msg) => msg.clone(),
        }
    }
}

/// Element of the `/moonphases` array.
#[derive(Debug, Deserialize)]
pub struct PhaseRow {
    #[serde(rename = "Error")]
    pub error: i64,
    #[serde(rename = "ErrorMsg", default)]
    pub error_msg: Option<String>,
    #[serde(rename = "Phase", default)]
    pub phase: String,
    #[serde(rename = "Illumination", default)]
    pub illumination: f64,
    #[serde(rename = "Moon", default)]
    pub moon: Vec<String>,
}

/// Payload of `/data?count=N`. `next_gates` arrives as
/// `[[iso_timestamp, gate_name], ...]`.
#[derive(Debug, Deserialize)]
pub struct PositionPayload {
    pub gate: String,
    pub zodiac_sign: String,
    pub degree: f64,
    #[serde(default)]
    pub next_gates: Vec<(String, String)>,
}

/// Element of the `/gates` array.
#[derive(Debug, Clone, Deserialize)]
pub struct GateInfo {
    pub name: String,
    pub tooltip: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// One fetch cycle: the phase and position requests run
    /// concurrently and both must succeed. First-failure-wins: as soon
    /// as either request errors the other is dropped and that error is
    /// reported. The caller never sees a partial pair.
    pub async fn fetch_cycle(
        &self,
        desired_count: u32,
    ) -> Result<(MoonReading, PositionReading), FetchError> {
        let (moon, position) =
            tokio::try_join!(self.fetch_phases(), self.fetch_position(desired_count))?;

        Ok((moon, position))
    }

    async fn fetch_phases(&self) -> Result<MoonReading, FetchError> {
        let rows: Vec<PhaseRow> = self
            .http
            .get(format!("{}/moonphases", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        moon_reading_from_rows(rows)
    }

    /// `count` is pre-clamped by the preference store; the server is
    /// still allowed to return fewer entries.
    async fn fetch_position(&self, count: u32) -> Result<PositionReading, FetchError> {
        let payload: PositionPayload = self
            .http
            .get(format!("{}/data", self.base_url))
            .query(&[("count", count)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(position_reading_from_payload(payload))
    }

    pub async fn fetch_gate_index(&self) -> Result<Vec<GateInfo>, FetchError> {
        let gates: Vec<GateInfo> = self
            .http
            .get(format!("{}/gates", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(gates)
    }
}

fn moon_reading_from_rows(mut rows: Vec<PhaseRow>) -> Result<MoonReading, FetchError> {
    if rows.is_empty() {
        return Err(FetchError::Upstream(FALLBACK_UPSTREAM_MSG.to_string()));
    }

    let row = rows.remove(0);
    if row.error != 0 {
        let msg = row
            .error_msg
            .filter(|msg| !msg.is_empty())
            .unwrap_or_else(|| FALLBACK_UPSTREAM_MSG.to_string());
        return Err(FetchError::Upstream(msg));
    }

    Ok(MoonReading {
        phase_name: row.phase,
        illumination: row.illumination,
        moon_names: row.moon,
    })
}

fn position_reading_from_payload(payload: PositionPayload) -> PositionReading {
    PositionReading {
        gate: payload.gate,
        zodiac_sign: payload.zodiac_sign,
        degree: payload.degree,
        upcoming: payload
            .next_gates
            .into_iter()
            .map(|(at, gate)| GateEvent { at, gate })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_phase_payload() {
        let rows: Vec<PhaseRow> = match serde_json::from_str(
            r#"[{"Error":0,"Phase":"Full Moon","Illumination":0.98,"Moon":["Full Flower Moon"]}]"#,
        ) {
            Ok(rows) => rows,
            Err(e) => panic!("decode failed: {e}"),
        };

        let reading = match moon_reading_from_rows(rows) {
            Ok(reading) => reading,
            Err(e) => panic!("expected a reading, got {e}"),
        };
        assert_eq!(reading.phase_name, "Full Moon");
        assert_eq!(crate::domain::format_illumination(reading.illumination), "98.0%");
        assert_eq!(reading.moon_names, vec!["Full Flower Moon".to_string()]);
    }

    #[test]
    fn decodes_position_payload_preserving_order() {
        let payload: PositionPayload = match serde_json::from_str(
            r#"{"gate":"17","zodiac_sign":"Scorpio","degree":12.5,
                "next_gates":[["2024-06-01T10:00:00Z","18"],["2024-06-03T04:00:00Z","19"]]}"#,
        ) {
            Ok(payload) => payload,
            Err(e) => panic!("decode failed: {e}"),
        };

        let reading = position_reading_from_payload(payload);
        assert_eq!(
            crate::domain::format_position(&reading.gate, &reading.zodiac_sign, reading.degree),
            "17 - Scorpio 12.5°"
        );
        assert_eq!(reading.next_gate().map(|g| g.gate.as_str()), Some("18"));
        assert_eq!(reading.next_gate().map(|g| g.at.as_str()), Some("2024-06-01T10:00:00Z"));
        assert_eq!(reading.later_gates().len(), 1);
        assert_eq!(reading.later_gates()[0].gate, "19");
    }

    #[test]
    fn missing_next_gates_decodes_as_empty() {
        let payload: PositionPayload = match serde_json::from_str(
            r#"{"gate":"3","zodiac_sign":"Leo","degree":2.0}"#,
        ) {
            Ok(payload) => payload,
            Err(e) => panic!("decode failed: {e}"),
        };
        assert!(position_reading_from_payload(payload).upcoming.is_empty());
    }

    #[test]
    fn empty_phase_array_is_an_upstream_error() {
        let err = match moon_reading_from_rows(vec![]) {
            Err(err) => err,
            Ok(_) => panic!("expected an error"),
        };
        assert_eq!(err.user_message(), FALLBACK_UPSTREAM_MSG);
    }

    #[test]
    fn error_sentinel_surfaces_payload_message() {
        let rows: Vec<PhaseRow> = match serde_json::from_str(
            r#"[{"Error":1,"ErrorMsg":"ephemeris offline"}]"#,
        ) {
            Ok(rows) => rows,
            Err(e) => panic!("decode failed: {e}"),
        };
        let err = match moon_reading_from_rows(rows) {
            Err(err) => err,
            Ok(_) => panic!("expected an error"),
        };
        assert_eq!(err.user_message(), "ephemeris offline");
    }

    #[test]
    fn error_sentinel_without_message_uses_fallback() {
        let rows: Vec<PhaseRow> =
            match serde_json::from_str(r#"[{"Error":1,"ErrorMsg":""}]"#) {
                Ok(rows) => rows,
                Err(e) => panic!("decode failed: {e}"),
            };
        let err = match moon_reading_from_rows(rows) {
            Err(err) => err,
            Ok(_) => panic!("expected an error"),
        };
        assert_eq!(err.user_message(), FALLBACK_UPSTREAM_MSG);
    }

    #[tokio::test]
    async fn transport_failure_collapses_to_generic_message() {
        // Port 9 (discard) refuses connections on loopback
        let client = match ApiClient::new("http://127.0.0.1:9") {
            Ok(client) => client,
            Err(e) => panic!("client build failed: {e}"),
        };
        let err = match client.fetch_cycle(5).await {
            Err(err) => err,
            Ok(_) => panic!("expected a transport failure"),
        };
        assert_eq!(err.user_message(), NETWORK_FAILURE_MSG);
    }
}
