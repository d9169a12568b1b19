//! Back-office coupon form.
//!
//! Carries the raw values an admin typed in the create and edit screens,
//! turns them into a `CouponDraft` and hydrates the edit screen from a
//! stored coupon.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::domain::coupon::{
    draft::{check_amount, check_locale},
    Coupon, CouponCode, CouponDraft, CouponEffect, CouponRuleCollection,
    MAX_SHORT_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH, UNLIMITED_USAGE,
};
use crate::domain::foundation::{CouponId, Lang, ValidationError};

/// Where the browser goes after a successful submission when the form
/// does not say otherwise. `{id}` is replaced by the coupon id.
pub const DEFAULT_SUCCESS_URL: &str = "/admin/coupon/read/{id}";

/// The submitted form broke one or more field rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", summarize(.violations))]
pub struct FormValidationError {
    pub violations: Vec<ValidationError>,
}

fn summarize(violations: &[ValidationError]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw coupon form values, named as the back-office screens post them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CouponForm {
    pub code: String,
    pub title: String,
    pub amount: String,
    pub effect: String,
    pub short_description: String,
    pub description: String,
    #[serde(deserialize_with = "checkbox")]
    pub is_enabled: bool,
    pub expiration_date: String,
    #[serde(deserialize_with = "checkbox")]
    pub is_available_on_special_offers: bool,
    #[serde(deserialize_with = "checkbox")]
    pub is_cumulative: bool,
    #[serde(deserialize_with = "checkbox")]
    pub is_removing_postage: bool,
    pub max_usage: String,
    pub locale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
}

/// HTML checkboxes are absent when unticked and carry a truthy value otherwise.
fn checkbox<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        raw.as_deref().map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("on" | "true" | "1" | "yes")
    ))
}

impl CouponForm {
    /// Hydrates the edit screen from a stored coupon.
    pub fn from_coupon(coupon: &Coupon, lang: Lang) -> Self {
        Self {
            code: coupon.code().to_string(),
            title: coupon.title().to_string(),
            amount: coupon.amount().normalize().to_string(),
            effect: coupon.effect().to_string(),
            short_description: coupon.short_description().to_string(),
            description: coupon.description().to_string(),
            is_enabled: coupon.is_enabled(),
            expiration_date: lang.format_date(coupon.expiration_date()),
            is_available_on_special_offers: coupon.is_available_on_special_offers(),
            is_cumulative: coupon.is_cumulative(),
            is_removing_postage: coupon.is_removing_postage(),
            max_usage: coupon.max_usage().to_string(),
            locale: coupon.locale().to_string(),
            success_url: None,
        }
    }

    /// Checks every field and builds the draft.
    ///
    /// All violations are collected, not only the first one. Dates are read
    /// in `lang`'s format. The rule collection is always empty.
    pub fn validate(&self, lang: Lang) -> Result<CouponDraft, FormValidationError> {
        let mut violations = Vec::new();

        let code = CouponCode::try_new(&self.code)
            .map_err(|e| violations.push(e))
            .ok();

        let title = self.title.trim();
        if title.is_empty() {
            violations.push(ValidationError::empty_field("title"));
        } else if title.chars().count() > MAX_TITLE_LENGTH {
            violations.push(ValidationError::too_long(
                "title",
                MAX_TITLE_LENGTH,
                title.chars().count(),
            ));
        }

        let amount = parse_amount(&self.amount)
            .map_err(|e| violations.push(e))
            .ok();

        let effect = CouponEffect::from_str(&self.effect)
            .map_err(|e| violations.push(e))
            .ok();

        if let Some(amount) = amount {
            let effect = effect.unwrap_or(CouponEffect::RemoveXAmount);
            if let Some(violation) = check_amount(effect, amount) {
                violations.push(violation);
            }
        }

        let short_len = self.short_description.chars().count();
        if short_len > MAX_SHORT_DESCRIPTION_LENGTH {
            violations.push(ValidationError::too_long(
                "shortDescription",
                MAX_SHORT_DESCRIPTION_LENGTH,
                short_len,
            ));
        }

        let expiration_date = lang
            .parse_date("expirationDate", &self.expiration_date)
            .map_err(|e| violations.push(e))
            .ok();

        let max_usage = parse_max_usage(&self.max_usage)
            .map_err(|e| violations.push(e))
            .ok();

        let locale = self.locale.trim();
        violations.extend(check_locale("locale", locale));

        match (code, amount, effect, expiration_date, max_usage) {
            (Some(code), Some(amount), Some(effect), Some(expiration_date), Some(max_usage))
                if violations.is_empty() =>
            {
                Ok(CouponDraft {
                    code,
                    title: title.to_string(),
                    amount,
                    effect,
                    short_description: self.short_description.clone(),
                    description: self.description.clone(),
                    is_enabled: self.is_enabled,
                    expiration_date,
                    is_available_on_special_offers: self.is_available_on_special_offers,
                    is_cumulative: self.is_cumulative,
                    is_removing_postage: self.is_removing_postage,
                    max_usage,
                    rules: CouponRuleCollection::empty(),
                    locale: locale.to_string(),
                })
            }
            _ => Err(FormValidationError { violations }),
        }
    }

    /// URL to redirect to after a successful submission.
    ///
    /// Only site-relative URLs are honoured; anything else falls back to
    /// the coupon's read screen.
    pub fn success_url_for(&self, id: &CouponId) -> String {
        let template = self
            .success_url
            .as_deref()
            .map(str::trim)
            .filter(|url| is_site_relative(url))
            .unwrap_or(DEFAULT_SUCCESS_URL);

        template.replace("{id}", &id.to_string())
    }
}

fn is_site_relative(url: &str) -> bool {
    url.starts_with('/') && !url.starts_with("//") && !url.contains('\\')
}

fn parse_amount(raw: &str) -> Result<Decimal, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::empty_field("amount"));
    }
    Decimal::from_str(&raw.replace(',', "."))
        .map_err(|_| ValidationError::invalid_format("amount", "must be a number"))
}

fn parse_max_usage(raw: &str) -> Result<i32, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::empty_field("maxUsage"));
    }
    let value: i32 = raw
        .parse()
        .map_err(|_| ValidationError::invalid_format("maxUsage", "must be a whole number"))?;
    if value < UNLIMITED_USAGE {
        return Err(ValidationError::out_of_range(
            "maxUsage",
            UNLIMITED_USAGE,
            i32::MAX,
            value,
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coupon::draft::test_support::draft;
    use chrono::Datelike;

    fn valid_form() -> CouponForm {
        CouponForm {
            code: "spring-10".to_string(),
            title: "Spring sale".to_string(),
            amount: "10".to_string(),
            effect: "remove_x_percent".to_string(),
            short_description: "Ten percent off".to_string(),
            description: String::new(),
            is_enabled: true,
            expiration_date: "12/24/2031".to_string(),
            is_available_on_special_offers: false,
            is_cumulative: true,
            is_removing_postage: false,
            max_usage: "-1".to_string(),
            locale: "en_US".to_string(),
            success_url: None,
        }
    }

    fn fields(err: &FormValidationError) -> Vec<String> {
        err.violations.iter().map(|v| v.field().to_string()).collect()
    }

    #[test]
    fn valid_form_builds_draft() {
        let d = valid_form().validate(Lang::EnUs).unwrap();

        assert_eq!(d.code.as_str(), "SPRING-10");
        assert_eq!(d.amount, Decimal::from(10));
        assert_eq!(d.effect, CouponEffect::RemoveXPercent);
        assert_eq!(d.expiration_date.as_datetime().month(), 12);
        assert_eq!(d.max_usage, UNLIMITED_USAGE);
        assert!(d.rules.is_empty());
        assert!(d.validate().is_ok());
    }

    #[test]
    fn date_is_read_in_lang_format() {
        let mut form = valid_form();
        form.expiration_date = "03/04/2031".to_string();

        let en = form.validate(Lang::EnUs).unwrap();
        let fr = form.validate(Lang::FrFr).unwrap();

        assert_eq!(en.expiration_date.as_datetime().month(), 3);
        assert_eq!(fr.expiration_date.as_datetime().month(), 4);
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let err = CouponForm::default().validate(Lang::EnUs).unwrap_err();
        assert_eq!(
            fields(&err),
            ["code", "title", "amount", "effect", "expirationDate", "maxUsage", "locale"]
        );
    }

    #[test]
    fn percent_amount_over_hundred_is_rejected() {
        let mut form = valid_form();
        form.amount = "150".to_string();
        let err = form.validate(Lang::EnUs).unwrap_err();
        assert_eq!(fields(&err), ["amount"]);
    }

    #[test]
    fn amount_beyond_stored_precision_is_rejected() {
        let mut form = valid_form();
        form.effect = "remove_x_amount".to_string();

        form.amount = "1.23456".to_string();
        assert_eq!(fields(&form.validate(Lang::EnUs).unwrap_err()), ["amount"]);

        form.amount = "1000000000".to_string();
        assert_eq!(fields(&form.validate(Lang::EnUs).unwrap_err()), ["amount"]);

        form.amount = "99999999,9999".to_string();
        assert!(form.validate(Lang::EnUs).is_ok());
    }

    #[test]
    fn malformed_locale_is_rejected() {
        let mut form = valid_form();
        form.locale = "en_US_POSIX_TOO_LONG".to_string();
        let err = form.validate(Lang::EnUs).unwrap_err();
        assert_eq!(fields(&err), ["locale"]);
    }

    #[test]
    fn comma_decimal_separator_is_accepted() {
        let mut form = valid_form();
        form.effect = "remove_x_amount".to_string();
        form.amount = "12,50".to_string();
        assert_eq!(form.validate(Lang::EnUs).unwrap().amount, Decimal::new(1250, 2));
    }

    #[test]
    fn malformed_values_are_reported_per_field() {
        let mut form = valid_form();
        form.code = "TEN OFF".to_string();
        form.amount = "ten".to_string();
        form.effect = "free".to_string();
        form.expiration_date = "2031-12-24".to_string();
        form.max_usage = "-5".to_string();

        let err = form.validate(Lang::EnUs).unwrap_err();
        assert_eq!(
            fields(&err),
            ["code", "amount", "effect", "expirationDate", "maxUsage"]
        );
        assert!(err.to_string().contains("Field 'code' has invalid format"));
    }

    #[test]
    fn checkboxes_deserialize_from_urlencoded_values() {
        let form: CouponForm = serde_json::from_value(serde_json::json!({
            "isEnabled": "on",
            "isCumulative": "1",
            "isRemovingPostage": "off",
            "shortDescription": "short",
            "successUrl": "/admin/coupon"
        }))
        .unwrap();

        assert!(form.is_enabled);
        assert!(form.is_cumulative);
        assert!(!form.is_removing_postage);
        assert!(!form.is_available_on_special_offers);
        assert_eq!(form.short_description, "short");
        assert_eq!(form.success_url.as_deref(), Some("/admin/coupon"));
    }

    #[test]
    fn from_coupon_round_trips_through_validate() {
        let coupon = Coupon::new(CouponId::new(), draft("SPRING")).unwrap();
        let form = CouponForm::from_coupon(&coupon, Lang::DeDe);

        assert_eq!(form.code, "SPRING");
        assert_eq!(form.amount, "10");
        assert_eq!(form.max_usage, "-1");
        assert!(form.expiration_date.contains('.'));

        let d = form.validate(Lang::DeDe).unwrap();
        assert_eq!(d.code, *coupon.code());
        assert_eq!(d.expiration_date.date(), coupon.expiration_date().date());
    }

    #[test]
    fn success_url_defaults_to_read_screen() {
        let id = CouponId::new();
        assert_eq!(
            valid_form().success_url_for(&id),
            format!("/admin/coupon/read/{}", id)
        );
    }

    #[test]
    fn success_url_replaces_id_placeholder() {
        let id = CouponId::new();
        let mut form = valid_form();
        form.success_url = Some("/admin/coupon/update/{id}".to_string());
        assert_eq!(form.success_url_for(&id), format!("/admin/coupon/update/{}", id));
    }

    #[test]
    fn off_site_success_url_is_ignored() {
        let id = CouponId::new();
        let mut form = valid_form();
        for url in ["https://evil.example/", "//evil.example", "/\\evil.example", ""] {
            form.success_url = Some(url.to_string());
            assert_eq!(
                form.success_url_for(&id),
                format!("/admin/coupon/read/{}", id)
            );
        }
    }
}
