//! SecureBank Advisory - stateless informational tools
//!
//! Interest estimates, indicative exchange rates, loan products, and
//! appointment scheduling. None of this touches the ledger or its
//! invariants; exchange rates are indicative mock data, not market data.

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use securebank_types::Amount;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for advisory operations
pub type Result<T> = std::result::Result<T, AdvisoryError>;

/// Advisory error types
#[derive(Debug, Clone, Error)]
pub enum AdvisoryError {
    /// Principal must be positive
    #[error("Invalid principal: must be greater than zero")]
    InvalidPrincipal,

    /// Annual rate outside the accepted band
    #[error("Invalid interest rate {rate}: must be between 0% and 50%")]
    InvalidRate { rate: f64 },

    /// Period outside the accepted band
    #[error("Invalid period of {days} days: must be between 1 and 3650")]
    InvalidPeriod { days: u32 },

    /// Currency not on the supported list
    #[error("Unsupported currency: {currency}")]
    UnsupportedCurrency { currency: String },

    /// Malformed or missing field
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    /// Appointment date already passed
    #[error("Appointment date {date} is in the past")]
    DateInPast { date: NaiveDate },
}

impl AdvisoryError {
    fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Interest
// ---------------------------------------------------------------------------

/// Longest supported interest period, ten years
pub const MAX_INTEREST_DAYS: u32 = 3650;

/// Highest supported annual rate, percent
pub const MAX_INTEREST_RATE: f64 = 50.0;

/// A simple-interest estimate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterestQuote {
    /// Principal the estimate was computed on
    pub principal: Amount,
    /// Annual rate in percent
    pub annual_rate_percent: f64,
    /// Period in days
    pub days: u32,
    /// Interest earned over the period, rounded to minor units
    pub interest_earned: Amount,
    /// Principal plus interest
    pub final_balance: Amount,
    /// Yield scaled to a full year, percent
    pub annualized_yield_percent: f64,
}

/// Estimate simple interest earned on a deposit
///
/// Accepts a principal above zero, a rate between 0 and 50 percent, and a
/// period of 1 to 3650 days. The result is an estimate: interest is computed
/// in floating point and rounded to the nearest minor unit at the end.
pub fn interest_earned(principal: Amount, annual_rate_percent: f64, days: u32) -> Result<InterestQuote> {
    if principal.is_zero() {
        return Err(AdvisoryError::InvalidPrincipal);
    }
    if !(0.0..=MAX_INTEREST_RATE).contains(&annual_rate_percent) {
        return Err(AdvisoryError::InvalidRate {
            rate: annual_rate_percent,
        });
    }
    if days == 0 || days > MAX_INTEREST_DAYS {
        return Err(AdvisoryError::InvalidPeriod { days });
    }

    let daily_rate = annual_rate_percent / 100.0 / 365.0;
    let interest_minor = (principal.minor() as f64 * daily_rate * days as f64).round() as u64;
    let interest = Amount::from_minor(interest_minor);
    let final_balance = Amount::from_minor(principal.minor().saturating_add(interest_minor));
    let annualized = (interest_minor as f64 / principal.minor() as f64) * (365.0 / days as f64) * 100.0;

    Ok(InterestQuote {
        principal,
        annual_rate_percent,
        days,
        interest_earned: interest,
        final_balance,
        annualized_yield_percent: annualized,
    })
}

// ---------------------------------------------------------------------------
// Exchange rates
// ---------------------------------------------------------------------------

/// Currencies the exchange desk quotes
pub const SUPPORTED_CURRENCIES: [&str; 10] = [
    "USD", "EUR", "GBP", "CAD", "AUD", "JPY", "CHF", "CNY", "INR", "MXN",
];

/// One quoted rate against the base currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rate {
    /// ISO currency code
    pub code: String,
    /// Units of this currency per one unit of the base
    pub rate: f64,
}

/// A sheet of indicative exchange rates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateSheet {
    /// Base currency of the sheet
    pub base: String,
    /// Quoted rates, excluding the base itself
    pub rates: Vec<Rate>,
    /// When the sheet was produced
    pub as_of: DateTime<Utc>,
    /// Rates are indicative, not executable
    pub indicative: bool,
}

/// Produce an indicative rate sheet against the given base currency
///
/// The rates are mock data drawn from plausible bands; the `indicative` flag
/// on the sheet is always set.
pub fn exchange_rates(base: &str) -> Result<RateSheet> {
    if !SUPPORTED_CURRENCIES.contains(&base) {
        return Err(AdvisoryError::UnsupportedCurrency {
            currency: base.to_string(),
        });
    }

    let bands: [(&str, f64, f64); 9] = [
        ("EUR", 0.82, 0.88),
        ("GBP", 0.70, 0.76),
        ("CAD", 1.20, 1.30),
        ("AUD", 1.30, 1.40),
        ("JPY", 105.0, 115.0),
        ("CHF", 0.88, 0.96),
        ("CNY", 6.20, 6.70),
        ("INR", 72.0, 76.0),
        ("MXN", 18.0, 22.0),
    ];

    let mut rng = rand::thread_rng();
    let rates = bands
        .iter()
        .filter(|(code, _, _)| *code != base)
        .map(|(code, lo, hi)| Rate {
            code: (*code).to_string(),
            rate: rng.gen_range(*lo..*hi),
        })
        .collect();

    Ok(RateSheet {
        base: base.to_string(),
        rates,
        as_of: Utc::now(),
        indicative: true,
    })
}

// ---------------------------------------------------------------------------
// Loans & investment
// ---------------------------------------------------------------------------

/// A loan product on offer
#[derive(Debug, Clone, Serialize)]
pub struct LoanProduct {
    /// Product name
    pub name: &'static str,
    /// Annual rate in percent
    pub annual_rate_percent: f64,
}

/// The current loan catalogue
pub fn loan_products() -> Vec<LoanProduct> {
    vec![
        LoanProduct {
            name: "Home Loan",
            annual_rate_percent: 5.0,
        },
        LoanProduct {
            name: "Car Loan",
            annual_rate_percent: 7.0,
        },
        LoanProduct {
            name: "Personal Loan",
            annual_rate_percent: 10.0,
        },
    ]
}

/// Generic diversification guidance
pub fn investment_advice() -> &'static str {
    "Consider diversifying into mutual funds, ETFs, and fixed deposits."
}

// ---------------------------------------------------------------------------
// Appointments
// ---------------------------------------------------------------------------

/// A confirmed appointment with a banking specialist
#[derive(Debug, Clone, Serialize)]
pub struct Appointment {
    /// Confirmation id, `APT` plus five digits
    pub id: String,
    /// What the appointment is for
    pub service_type: String,
    /// Which specialist will attend
    pub specialist: &'static str,
    /// Scheduled date
    pub date: NaiveDate,
    /// Scheduled time, as requested
    pub time: String,
    /// Fixed slot length
    pub duration_minutes: u32,
}

fn specialist_for(service_type: &str) -> &'static str {
    match service_type.to_ascii_lowercase().as_str() {
        "loan_service" => "Senior Loan Officer",
        "investment_service" => "Investment Advisor",
        "account_service" => "Account Manager",
        "business_banking" => "Business Banking Specialist",
        _ => "Customer Service Representative",
    }
}

/// Book an appointment with the matching specialist
pub fn schedule_appointment(service_type: &str, date: NaiveDate, time: &str) -> Result<Appointment> {
    if service_type.trim().is_empty() {
        return Err(AdvisoryError::invalid_input("service_type", "must not be empty"));
    }
    if time.trim().is_empty() {
        return Err(AdvisoryError::invalid_input("time", "must not be empty"));
    }
    if date < Utc::now().date_naive() {
        return Err(AdvisoryError::DateInPast { date });
    }

    let id = format!("APT{}", rand::thread_rng().gen_range(10000..=99999));
    Ok(Appointment {
        id,
        service_type: service_type.to_string(),
        specialist: specialist_for(service_type),
        date,
        time: time.trim().to_string(),
        duration_minutes: 30,
    })
}
