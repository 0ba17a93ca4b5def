//! Card type rules.
//!
//! A [`CardTypeRule`] describes one card network: the prefix pattern its
//! numbers start with, the lengths it issues, the CVC lengths it prints and
//! whether its numbers carry a Luhn check digit. Rules are compiled once and
//! shared by every registry that holds them.

use crate::error::RuleError;
use regex::Regex;
use std::fmt;

/// Built-in card type identifiers.
pub mod types {
    /// Visa Electron (debit).
    pub const VISA_ELECTRON: &str = "visaelectron";
    /// Maestro (debit).
    pub const MAESTRO: &str = "maestro";
    /// Forbrugsforeningen (Danish debit).
    pub const FORBRUGSFORENINGEN: &str = "forbrugsforeningen";
    /// Dankort (Danish debit).
    pub const DANKORT: &str = "dankort";
    /// Elo (Brazil).
    pub const ELO: &str = "elo";
    /// Hipercard (Brazil).
    pub const HIPERCARD: &str = "hipercard";
    /// Visa.
    pub const VISA: &str = "visa";
    /// Mastercard.
    pub const MASTERCARD: &str = "mastercard";
    /// American Express.
    pub const AMEX: &str = "amex";
    /// Diners Club.
    pub const DINERS_CLUB: &str = "dinersclub";
    /// Discover.
    pub const DISCOVER: &str = "discover";
    /// UnionPay.
    pub const UNIONPAY: &str = "unionpay";
    /// JCB.
    pub const JCB: &str = "jcb";
}

/// Static description of a built-in rule, compiled into a [`CardTypeRule`].
pub(crate) struct BuiltinRule {
    pub card_type: &'static str,
    pub pattern: &'static str,
    pub lengths: &'static [usize],
    pub cvc_lengths: &'static [usize],
    pub luhn: bool,
}

/// The built-in rule table, in evaluation order.
///
/// Debit rules come first since their prefixes are narrower than the credit
/// rules they overlap. Elo and Hipercard issue from BINs inside the Visa,
/// Mastercard, Discover, UnionPay and Diners ranges, so they sit between the
/// debit block and the broad credit rules.
pub(crate) const BUILTIN_RULES: &[BuiltinRule] = &[
    // Debit cards
    BuiltinRule {
        card_type: types::VISA_ELECTRON,
        pattern: r"^4(026|17500|405|508|844|91[37])",
        lengths: &[16],
        cvc_lengths: &[3],
        luhn: true,
    },
    BuiltinRule {
        card_type: types::MAESTRO,
        pattern: r"^(5(018|0[23]|[68])|6(304|39|7))",
        lengths: &[12, 13, 14, 15, 16, 17, 18, 19],
        cvc_lengths: &[3],
        luhn: true,
    },
    BuiltinRule {
        card_type: types::FORBRUGSFORENINGEN,
        pattern: r"^600",
        lengths: &[16],
        cvc_lengths: &[3],
        luhn: true,
    },
    BuiltinRule {
        card_type: types::DANKORT,
        pattern: r"^5019",
        lengths: &[16],
        cvc_lengths: &[3],
        luhn: true,
    },
    // Issuer-specific credit cards
    BuiltinRule {
        card_type: types::ELO,
        pattern: concat!(
            r"^(4011(78|79)|43(1274|8935)|45(1416|7393|763(1|2))",
            r"|50(4175|6699|67[0-7][0-9]|9000)|627780|63(6297|6368)",
            r"|650(03([^4])|04([0-9])|05(0|1)|4(0[5-9]|3[0-9]|8[5-9]|9[0-9])",
            r"|5([0-2][0-9]|3[0-8])|9([2-6][0-9]|7[0-8])|541|700|720|901)",
            r"|651652|655000|655021)",
        ),
        lengths: &[16],
        cvc_lengths: &[3],
        luhn: true,
    },
    BuiltinRule {
        card_type: types::HIPERCARD,
        // 60xx except 6011
        pattern: r"^(384100|384140|384160|606282|637095|637568|60([02-9]|1[02-9]))",
        lengths: &[14, 15, 16, 17, 18, 19],
        cvc_lengths: &[3],
        luhn: true,
    },
    // Credit cards
    BuiltinRule {
        card_type: types::VISA,
        pattern: r"^4",
        lengths: &[13, 16, 19],
        cvc_lengths: &[3],
        luhn: true,
    },
    BuiltinRule {
        card_type: types::MASTERCARD,
        // 51-55 (and 50), 2221-2720
        pattern: r"^(5[0-5]|222[1-9]|22[3-9][0-9]|2[3-6][0-9]{2}|27[01][0-9]|2720)",
        lengths: &[16],
        cvc_lengths: &[3],
        luhn: true,
    },
    BuiltinRule {
        card_type: types::AMEX,
        pattern: r"^3[47]",
        lengths: &[15],
        cvc_lengths: &[3, 4],
        luhn: true,
    },
    BuiltinRule {
        card_type: types::DINERS_CLUB,
        pattern: r"^3[0689]",
        lengths: &[14],
        cvc_lengths: &[3],
        luhn: true,
    },
    BuiltinRule {
        card_type: types::DISCOVER,
        pattern: r"^6([045]|22)",
        lengths: &[16],
        cvc_lengths: &[3],
        luhn: true,
    },
    BuiltinRule {
        card_type: types::UNIONPAY,
        pattern: r"^(62|88)",
        lengths: &[16, 17, 18, 19],
        cvc_lengths: &[3],
        luhn: false,
    },
    BuiltinRule {
        card_type: types::JCB,
        pattern: r"^35",
        lengths: &[16],
        cvc_lengths: &[3],
        luhn: true,
    },
];

/// A compiled card type rule.
///
/// # Example
///
/// ```
/// use cardcheck::rule::{CardTypeRule, RuleConfig};
///
/// let rule = CardTypeRule::compile(&RuleConfig::new("testcard", "^123456", [16])).unwrap();
/// assert!(rule.matches("1234567891234567"));
/// assert!(rule.is_valid_length(16));
/// assert!(rule.is_valid_cvc_length(3));
/// ```
#[derive(Clone)]
pub struct CardTypeRule {
    card_type: String,
    pattern: Regex,
    lengths: Vec<usize>,
    cvc_lengths: Vec<usize>,
    luhn: bool,
}

impl CardTypeRule {
    /// Compiles a rule from its configuration form.
    ///
    /// Patterns are anchored at the start of the number; a pattern without
    /// a leading `^` is wrapped as `^(?:pattern)`.
    pub fn compile(config: &RuleConfig) -> Result<Self, RuleError> {
        if config.card_type.is_empty() {
            return Err(RuleError::EmptyType);
        }
        if config.lengths.is_empty() {
            return Err(RuleError::NoLengths(config.card_type.clone()));
        }
        if config.cvc_lengths.is_empty() {
            return Err(RuleError::NoCvcLengths(config.card_type.clone()));
        }

        let source = if config.pattern.starts_with('^') {
            config.pattern.clone()
        } else {
            format!("^(?:{})", config.pattern)
        };
        let pattern = Regex::new(&source).map_err(|source| RuleError::InvalidPattern {
            card_type: config.card_type.clone(),
            source,
        })?;

        Ok(Self {
            card_type: config.card_type.clone(),
            pattern,
            lengths: config.lengths.clone(),
            cvc_lengths: config.cvc_lengths.clone(),
            luhn: config.luhn,
        })
    }

    pub(crate) fn from_builtin(rule: &BuiltinRule) -> Result<Self, RuleError> {
        Self::compile(&RuleConfig {
            card_type: rule.card_type.to_string(),
            pattern: rule.pattern.to_string(),
            lengths: rule.lengths.to_vec(),
            cvc_lengths: rule.cvc_lengths.to_vec(),
            luhn: rule.luhn,
        })
    }

    /// Returns the type identifier.
    #[inline]
    pub fn card_type(&self) -> &str {
        &self.card_type
    }

    /// Returns the prefix pattern source.
    #[inline]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the accepted card lengths.
    #[inline]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Returns the accepted CVC lengths.
    #[inline]
    pub fn cvc_lengths(&self) -> &[usize] {
        &self.cvc_lengths
    }

    /// Returns true if numbers of this type carry a Luhn check digit.
    #[inline]
    pub fn requires_luhn(&self) -> bool {
        self.luhn
    }

    /// Returns true if the cleaned number starts with this type's prefix.
    #[inline]
    pub fn matches(&self, number: &str) -> bool {
        self.pattern.is_match(number)
    }

    /// Returns true if the given digit count is issued by this type.
    #[inline]
    pub fn is_valid_length(&self, length: usize) -> bool {
        self.lengths.contains(&length)
    }

    /// Returns true if the given CVC length is printed by this type.
    #[inline]
    pub fn is_valid_cvc_length(&self, length: usize) -> bool {
        self.cvc_lengths.contains(&length)
    }

    /// Returns the configuration form of this rule.
    pub fn to_config(&self) -> RuleConfig {
        RuleConfig {
            card_type: self.card_type.clone(),
            pattern: self.pattern.as_str().to_string(),
            lengths: self.lengths.clone(),
            cvc_lengths: self.cvc_lengths.clone(),
            luhn: self.luhn,
        }
    }
}

impl fmt::Debug for CardTypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardTypeRule")
            .field("card_type", &self.card_type)
            .field("pattern", &self.pattern.as_str())
            .field("lengths", &self.lengths)
            .field("cvc_lengths", &self.cvc_lengths)
            .field("luhn", &self.luhn)
            .finish()
    }
}

/// Uncompiled rule definition, as supplied by configuration.
///
/// With the `json` feature this deserializes from
/// `{"type", "pattern", "length", "cvcLength", "luhn"}`; `cvcLength`
/// defaults to `[3]` and `luhn` to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleConfig {
    /// Type identifier.
    #[cfg_attr(feature = "json", serde(rename = "type"))]
    pub card_type: String,
    /// Prefix pattern (regular expression).
    pub pattern: String,
    /// Accepted card lengths.
    #[cfg_attr(feature = "json", serde(rename = "length"))]
    pub lengths: Vec<usize>,
    /// Accepted CVC lengths.
    #[cfg_attr(
        feature = "json",
        serde(rename = "cvcLength", default = "default_cvc_lengths")
    )]
    pub cvc_lengths: Vec<usize>,
    /// Whether the Luhn check applies.
    #[cfg_attr(feature = "json", serde(default = "default_luhn"))]
    pub luhn: bool,
}

#[cfg(feature = "json")]
fn default_cvc_lengths() -> Vec<usize> {
    vec![3]
}

#[cfg(feature = "json")]
fn default_luhn() -> bool {
    true
}

impl RuleConfig {
    /// Creates a config with 3-digit CVCs and the Luhn check enabled.
    pub fn new(
        card_type: impl Into<String>,
        pattern: impl Into<String>,
        lengths: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            card_type: card_type.into(),
            pattern: pattern.into(),
            lengths: lengths.into_iter().collect(),
            cvc_lengths: vec![3],
            luhn: true,
        }
    }

    /// Builder method to set the CVC lengths.
    pub fn cvc_lengths(mut self, lengths: impl IntoIterator<Item = usize>) -> Self {
        self.cvc_lengths = lengths.into_iter().collect();
        self
    }

    /// Builder method to enable or disable the Luhn check.
    pub fn luhn(mut self, luhn: bool) -> Self {
        self.luhn = luhn;
        self
    }
}

#[cfg(feature = "json")]
impl RuleConfig {
    /// Parses rule configs from JSON: a single object or an array of them.
    pub fn from_json_str(json: &str) -> Result<Vec<Self>, RuleError> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(RuleConfig),
            Many(Vec<RuleConfig>),
        }

        Ok(match serde_json::from_str(json)? {
            OneOrMany::One(config) => vec![config],
            OneOrMany::Many(configs) => configs,
        })
    }

    /// Reads rule configs from a JSON file.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Vec<Self>, RuleError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_compile() {
        for builtin in BUILTIN_RULES {
            let rule = CardTypeRule::from_builtin(builtin).unwrap();
            assert_eq!(rule.card_type(), builtin.card_type);
        }
    }

    #[test]
    fn test_builtin_type_ids_unique() {
        for (i, a) in BUILTIN_RULES.iter().enumerate() {
            for b in &BUILTIN_RULES[i + 1..] {
                assert_ne!(a.card_type, b.card_type);
            }
        }
    }

    #[test]
    fn test_pattern_is_prefix_anchored() {
        let rule = CardTypeRule::compile(&RuleConfig::new("test", "4", [16])).unwrap();
        assert_eq!(rule.pattern(), "^(?:4)");
        assert!(rule.matches("4111111111111111"));
        assert!(!rule.matches("1411111111111111"));
    }

    #[test]
    fn test_anchored_pattern_kept() {
        let rule = CardTypeRule::compile(&RuleConfig::new("test", "^3[47]", [15])).unwrap();
        assert_eq!(rule.pattern(), "^3[47]");
    }

    #[test]
    fn test_lengths() {
        let rule = CardTypeRule::compile(
            &RuleConfig::new("amexlike", "^3[47]", [15]).cvc_lengths([3, 4]),
        )
        .unwrap();
        assert!(rule.is_valid_length(15));
        assert!(!rule.is_valid_length(14));
        assert!(!rule.is_valid_length(16));
        assert!(rule.is_valid_cvc_length(3));
        assert!(rule.is_valid_cvc_length(4));
        assert!(!rule.is_valid_cvc_length(5));
    }

    #[test]
    fn test_compile_errors() {
        assert!(matches!(
            CardTypeRule::compile(&RuleConfig::new("", "^4", [16])),
            Err(RuleError::EmptyType)
        ));
        assert!(matches!(
            CardTypeRule::compile(&RuleConfig::new("bad", "^(4", [16])),
            Err(RuleError::InvalidPattern { .. })
        ));
        assert!(matches!(
            CardTypeRule::compile(&RuleConfig::new("bad", "^4", [])),
            Err(RuleError::NoLengths(_))
        ));
        assert!(matches!(
            CardTypeRule::compile(&RuleConfig::new("bad", "^4", [16]).cvc_lengths([])),
            Err(RuleError::NoCvcLengths(_))
        ));
    }

    #[test]
    fn test_to_config_round_trip() {
        let config = RuleConfig::new("test", "^9", [16]).luhn(false);
        let rule = CardTypeRule::compile(&config).unwrap();
        assert_eq!(rule.to_config(), config);
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_config_from_json() {
        let configs = RuleConfig::from_json_str(
            r#"{"type": "testCard", "pattern": "^(123456|456789)", "length": [16], "luhn": false}"#,
        )
        .unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].card_type, "testCard");
        assert_eq!(configs[0].cvc_lengths, vec![3]);
        assert!(!configs[0].luhn);

        let configs = RuleConfig::from_json_str(
            r#"[{"type": "a", "pattern": "^1", "length": [16]},
                {"type": "b", "pattern": "^2", "length": [15], "cvcLength": [4]}]"#,
        )
        .unwrap();
        assert_eq!(configs.len(), 2);
        assert!(configs[0].luhn);
        assert_eq!(configs[1].cvc_lengths, vec![4]);
    }

    #[test]
    fn test_rule_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<CardTypeRule>();
    }
}
