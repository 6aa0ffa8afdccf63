// ── Security classification ──
//
// Collapses a scan result's free-form capability string (e.g.
// `[WPA2-PSK-CCMP][RSN-PSK+SAE-CCMP][ESS]`) into one class of a closed set.
// The class is half of the key that deduplicates scan results into entries.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Security class of a wireless network, derived from its advertised
/// capabilities.
///
/// Unrecognized or empty capability strings classify as [`Open`](Self::Open).
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SecurityClass {
    #[default]
    Open,
    Wep,
    Psk,
    Eap,
    EapSuiteB,
    Owe,
    Sae,
}

impl SecurityClass {
    /// Classify a capability string.
    ///
    /// The string is split into tokens on bracket, dash, plus, slash, comma
    /// and whitespace boundaries. Each token maps to at most one class and
    /// the highest-precedence class seen wins. Pure and total.
    pub fn from_capabilities(capabilities: &str) -> Self {
        capabilities
            .split(is_token_separator)
            .filter_map(Self::from_token)
            .max_by_key(|class| class.precedence())
            .unwrap_or_default()
    }

    /// Map a single capability token. Matching is ASCII case-insensitive.
    fn from_token(token: &str) -> Option<Self> {
        if token.is_empty() {
            return None;
        }
        match token.to_ascii_uppercase().as_str() {
            "WEP" => Some(Self::Wep),
            "SAE" => Some(Self::Sae),
            "PSK" => Some(Self::Psk),
            "EAP_SUITE_B_192" => Some(Self::EapSuiteB),
            "EAP" => Some(Self::Eap),
            "OWE" | "OWE_TRANSITION" => Some(Self::Owe),
            _ => None,
        }
    }

    /// Tie-break order when a capability string advertises several
    /// key-management schemes (e.g. PSK+SAE transition mode reports SAE).
    fn precedence(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Owe => 1,
            Self::Eap => 2,
            Self::EapSuiteB => 3,
            Self::Psk => 4,
            Self::Sae => 5,
            Self::Wep => 6,
        }
    }

    /// Whether joining a network of this class needs a credential.
    pub fn requires_credentials(self) -> bool {
        !matches!(self, Self::Open | Self::Owe)
    }
}

fn is_token_separator(c: char) -> bool {
    matches!(c, '[' | ']' | '-' | '+' | '/' | ',') || c.is_whitespace()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn empty_and_unknown_strings_are_open() {
        assert_eq!(SecurityClass::from_capabilities(""), SecurityClass::Open);
        assert_eq!(SecurityClass::from_capabilities("[ESS]"), SecurityClass::Open);
        assert_eq!(
            SecurityClass::from_capabilities("[IBSS][WPS]"),
            SecurityClass::Open
        );
        assert_eq!(
            SecurityClass::from_capabilities("garbage ][ -- ++"),
            SecurityClass::Open
        );
    }

    #[test]
    fn bare_tokens_classify() {
        assert_eq!(SecurityClass::from_capabilities("EAP"), SecurityClass::Eap);
        assert_eq!(SecurityClass::from_capabilities("WEP"), SecurityClass::Wep);
        assert_eq!(SecurityClass::from_capabilities("psk"), SecurityClass::Psk);
    }

    #[test]
    fn bracketed_capabilities_classify() {
        let cases = [
            ("[WEP][ESS]", SecurityClass::Wep),
            ("[WPA-PSK-TKIP+CCMP][ESS]", SecurityClass::Psk),
            ("[WPA2-PSK-CCMP][RSN-PSK-CCMP][ESS][WPS]", SecurityClass::Psk),
            ("[RSN-SAE-CCMP][ESS]", SecurityClass::Sae),
            ("[WPA2-EAP-CCMP][ESS]", SecurityClass::Eap),
            ("[RSN-EAP_SUITE_B_192-GCMP-256][ESS]", SecurityClass::EapSuiteB),
            ("[RSN-OWE-CCMP][ESS]", SecurityClass::Owe),
            ("[RSN-FT/SAE-CCMP][ESS]", SecurityClass::Sae),
        ];
        for (caps, expected) in cases {
            assert_eq!(SecurityClass::from_capabilities(caps), expected, "{caps}");
        }
    }

    #[test]
    fn transition_mode_prefers_stronger_class() {
        assert_eq!(
            SecurityClass::from_capabilities("[RSN-PSK+SAE-CCMP][ESS]"),
            SecurityClass::Sae
        );
        assert_eq!(
            SecurityClass::from_capabilities("[RSN-EAP+EAP_SUITE_B_192-GCMP]"),
            SecurityClass::EapSuiteB
        );
    }

    #[test]
    fn substrings_do_not_match() {
        // Only whole tokens count.
        assert_eq!(SecurityClass::from_capabilities("[PSKX]"), SecurityClass::Open);
        assert_eq!(SecurityClass::from_capabilities("[XEAP]"), SecurityClass::Open);
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for class in SecurityClass::iter() {
            let code = class.to_string();
            assert_eq!(SecurityClass::from_str(&code).unwrap(), class);
        }
        assert_eq!(SecurityClass::EapSuiteB.to_string(), "eap-suite-b");
        assert_eq!(SecurityClass::from_str("PSK").unwrap(), SecurityClass::Psk);
    }

    #[test]
    fn credentials_requirement() {
        assert!(!SecurityClass::Open.requires_credentials());
        assert!(!SecurityClass::Owe.requires_credentials());
        assert!(SecurityClass::Psk.requires_credentials());
        assert!(SecurityClass::EapSuiteB.requires_credentials());
    }
}
