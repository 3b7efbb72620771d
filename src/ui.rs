//! What the host page shows next to the canvas
//!
//! Pure mapping from simulation state to status text, style categories and
//! the transmission report; the wasm entry point copies these into the DOM.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::sim::{SimulationState, Stage};

/// Semantic category of the status line, used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCategory {
    Idle,
    Encoding,
    Transmitting,
    Decoding,
    Complete,
}

impl StatusCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCategory::Idle => "idle",
            StatusCategory::Encoding => "encoding",
            StatusCategory::Transmitting => "transmitting",
            StatusCategory::Decoding => "decoding",
            StatusCategory::Complete => "complete",
        }
    }

    /// Class list for the status element
    pub fn css_class(&self) -> &'static str {
        match self {
            StatusCategory::Idle => "text-sm text-gray-400",
            StatusCategory::Encoding => "text-sm text-yellow-400",
            StatusCategory::Transmitting => "text-sm text-red-400",
            StatusCategory::Decoding => "text-sm text-blue-400",
            StatusCategory::Complete => "text-sm text-green-400",
        }
    }
}

/// Status line for a stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusLine {
    pub text: &'static str,
    pub category: StatusCategory,
}

impl StatusLine {
    pub fn for_stage(stage: Stage) -> Self {
        let (text, category) = match stage {
            Stage::Idle => ("Waiting for input", StatusCategory::Idle),
            Stage::Encoding => ("Encoding data...", StatusCategory::Encoding),
            Stage::RisingBits => ("Sending data up the tower...", StatusCategory::Transmitting),
            Stage::LaserBeam => (
                "Transmitting over the laser beam...",
                StatusCategory::Transmitting,
            ),
            Stage::DescendingBits => (
                "Receiving data at the receiver tower...",
                StatusCategory::Transmitting,
            ),
            Stage::Decoding => ("Decoding data...", StatusCategory::Decoding),
            Stage::Complete => ("Data transmitted successfully!", StatusCategory::Complete),
        };
        Self { text, category }
    }
}

/// Link indicator next to the status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// Nothing sent yet (or reset)
    Ready,
    /// Transmission in flight
    Connecting,
    /// Last transmission completed
    Connected,
}

impl ConnectionStatus {
    pub fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::Idle => ConnectionStatus::Ready,
            Stage::Complete => ConnectionStatus::Connected,
            _ => ConnectionStatus::Connecting,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Ready => "Ready to connect",
            ConnectionStatus::Connecting => "Connecting...",
            ConnectionStatus::Connected => "Connected",
        }
    }

    /// Class list for the indicator dot
    pub fn dot_class(&self) -> &'static str {
        match self {
            ConnectionStatus::Ready | ConnectionStatus::Connected => {
                "w-3 h-3 rounded-full bg-green-500 animate-pulse"
            }
            ConnectionStatus::Connecting => "w-3 h-3 rounded-full bg-yellow-500 animate-pulse",
        }
    }
}

/// Placeholder shown for a message that has not arrived
pub const NO_MESSAGE: &str = "-";

/// Summary of the current (or last) transmission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionReport {
    pub original: String,
    /// Space-separated 8-bit groups
    pub binary: String,
    pub decoded: Option<String>,
    pub bit_count: usize,
    pub elapsed_ms: Option<f64>,
}

impl TransmissionReport {
    pub fn from_state(state: &SimulationState) -> Self {
        Self {
            original: state.message.clone(),
            binary: codec::format_binary(&state.payload),
            decoded: state.decoded.clone(),
            bit_count: state.bit_count(),
            elapsed_ms: state.elapsed_ms,
        }
    }

    /// Received text, or the placeholder
    pub fn received_text(&self) -> &str {
        self.decoded.as_deref().unwrap_or(NO_MESSAGE)
    }

    /// Elapsed time as shown by the host ("0ms" before completion)
    pub fn elapsed_text(&self) -> String {
        format!("{}ms", self.elapsed_ms.unwrap_or(0.0).round() as u64)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_categories() {
        assert_eq!(StatusLine::for_stage(Stage::Idle).category, StatusCategory::Idle);
        assert_eq!(
            StatusLine::for_stage(Stage::Encoding).category,
            StatusCategory::Encoding
        );
        for stage in [Stage::RisingBits, Stage::LaserBeam, Stage::DescendingBits] {
            assert_eq!(
                StatusLine::for_stage(stage).category,
                StatusCategory::Transmitting
            );
        }
        assert_eq!(
            StatusLine::for_stage(Stage::Decoding).category,
            StatusCategory::Decoding
        );
        assert_eq!(
            StatusLine::for_stage(Stage::Complete).category,
            StatusCategory::Complete
        );
    }

    #[test]
    fn test_connection_status() {
        assert_eq!(ConnectionStatus::for_stage(Stage::Idle), ConnectionStatus::Ready);
        assert_eq!(
            ConnectionStatus::for_stage(Stage::LaserBeam),
            ConnectionStatus::Connecting
        );
        assert_eq!(
            ConnectionStatus::for_stage(Stage::Complete),
            ConnectionStatus::Connected
        );
    }

    #[test]
    fn test_report_for_hi() {
        let mut state = SimulationState::new(5.0);
        state.message = "Hi".to_string();
        state.payload = codec::encode("Hi");

        let report = TransmissionReport::from_state(&state);
        assert_eq!(report.binary, "01001000 01101001");
        assert_eq!(report.bit_count, 16);
        assert_eq!(report.received_text(), "-");
        assert_eq!(report.elapsed_text(), "0ms");

        state.decoded = Some("Hi".to_string());
        state.elapsed_ms = Some(5123.6);
        let report = TransmissionReport::from_state(&state);
        assert_eq!(report.received_text(), "Hi");
        assert_eq!(report.elapsed_text(), "5124ms");
    }

    #[test]
    fn test_report_json() {
        let report = TransmissionReport::from_state(&SimulationState::default());
        let json = report.to_json().unwrap();
        let parsed: TransmissionReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
        assert!(json.contains("\"bit_count\": 0"));
    }
}
