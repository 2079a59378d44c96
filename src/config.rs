// 6.0 config.rs: display currency and the tolerance bands, all in one place.
// 6.1 currency is a label only. nothing is ever converted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

// Display currency for amounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Lkr,
    Usd,
    Eur,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Lkr => "₨.",
            Currency::Usd => "$",
            Currency::Eur => "€",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Lkr => "LKR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "LKR" => Some(Currency::Lkr),
            "USD" => Some(Currency::Usd),
            "EUR" => Some(Currency::Eur),
            _ => None,
        }
    }
}

/** 6.2: tolerance bands. defaults reproduce the reference rounding behavior exactly */
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tolerances {
    // balances and remainders inside +/- dust count as zero
    pub dust: Decimal,
    // how far the payer total may drift from the entry amount at admission
    pub payer_total: Decimal,
    // residuals at or below this are left alone
    pub correction_floor: Decimal,
    // residuals at or above this are treated as bad data and left alone too
    pub correction_ceiling: Decimal,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            dust: dec!(0.01),
            payer_total: dec!(0.01),
            correction_floor: dec!(0.001),
            correction_ceiling: dec!(1),
        }
    }
}

impl Tolerances {
    // true when a balance sum residual should be folded into the largest balance
    pub fn should_correct(&self, residual: Decimal) -> bool {
        let magnitude = residual.abs();
        magnitude > self.correction_floor && magnitude < self.correction_ceiling
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub currency: Currency,
    #[serde(default)]
    pub tolerances: Tolerances,
}

impl LedgerConfig {
    pub fn usd() -> Self {
        Self {
            currency: Currency::Usd,
            ..Self::default()
        }
    }

    pub fn eur() -> Self {
        Self {
            currency: Currency::Eur,
            ..Self::default()
        }
    }

    // Validate the configuration for internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.tolerances;

        if t.dust <= Decimal::ZERO || t.dust >= Decimal::ONE {
            return Err(ConfigError::InvalidDust(t.dust));
        }

        if t.payer_total < Decimal::ZERO {
            return Err(ConfigError::InvalidPayerTolerance(t.payer_total));
        }

        if t.correction_floor < Decimal::ZERO || t.correction_floor >= t.correction_ceiling {
            return Err(ConfigError::InvalidCorrectionBand {
                floor: t.correction_floor,
                ceiling: t.correction_ceiling,
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Dust tolerance must be in (0, 1), got {0}")]
    InvalidDust(Decimal),

    #[error("Payer total tolerance must not be negative, got {0}")]
    InvalidPayerTolerance(Decimal),

    #[error("Correction band is empty: floor {floor}, ceiling {ceiling}")]
    InvalidCorrectionBand { floor: Decimal, ceiling: Decimal },
}
