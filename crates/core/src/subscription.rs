//! Subscription plan rules and payment labelling.
//!
//! Plan types are free text. The billing period is derived from keywords in
//! the label; anything unrecognized is treated as a monthly plan.

use chrono::{Days, NaiveDate};

/// Length of a plan whose label mentions "year" or "annual".
pub const YEARLY_PERIOD_DAYS: u64 = 365;
/// Length of a plan whose label mentions "week".
pub const WEEKLY_PERIOD_DAYS: u64 = 7;
/// Length of every other plan.
pub const DEFAULT_PERIOD_DAYS: u64 = 30;

/// Payment methods offered on the subscribe form.
pub const PAYMENT_METHODS: &[&str] = &["Credit Card", "Debit Card", "PayPal", "Bank Transfer"];

/// Number of days a plan of the given type lasts.
pub fn plan_period_days(plan_type: &str) -> u64 {
    let plan = plan_type.to_lowercase();
    if plan.contains("year") || plan.contains("annual") {
        YEARLY_PERIOD_DAYS
    } else if plan.contains("week") {
        WEEKLY_PERIOD_DAYS
    } else {
        DEFAULT_PERIOD_DAYS
    }
}

/// End date of a plan starting on `start`.
pub fn plan_end_date(start: NaiveDate, plan_type: &str) -> NaiveDate {
    start
        .checked_add_days(Days::new(plan_period_days(plan_type)))
        .unwrap_or(NaiveDate::MAX)
}

/// Validate a payment method against [`PAYMENT_METHODS`].
pub fn validate_payment_method(method: &str) -> Result<(), String> {
    if PAYMENT_METHODS.contains(&method) {
        Ok(())
    } else {
        Err(format!(
            "Payment method must be one of: {}",
            PAYMENT_METHODS.join(", ")
        ))
    }
}

/// Purpose text recorded on the payment row of a subscription.
pub fn subscription_purpose(platform_name: &str, plan_type: &str) -> String {
    format!("Subscription to {platform_name} ({plan_type})")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn period_from_plan_keywords() {
        assert_eq!(plan_period_days("Yearly Premium"), 365);
        assert_eq!(plan_period_days("annual"), 365);
        assert_eq!(plan_period_days("Weekly pass"), 7);
        assert_eq!(plan_period_days("Monthly"), 30);
        assert_eq!(plan_period_days("Basic"), 30);
    }

    #[test]
    fn end_date_adds_period() {
        assert_eq!(plan_end_date(date(2026, 1, 1), "Monthly"), date(2026, 1, 31));
        assert_eq!(plan_end_date(date(2026, 1, 1), "Yearly"), date(2027, 1, 1));
    }

    #[test]
    fn payment_methods_are_closed() {
        assert!(validate_payment_method("PayPal").is_ok());
        assert!(validate_payment_method("Cash").is_err());
    }

    #[test]
    fn purpose_names_platform_and_plan() {
        assert_eq!(
            subscription_purpose("Netflix", "Monthly"),
            "Subscription to Netflix (Monthly)"
        );
    }
}
