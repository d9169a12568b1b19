//! Coupon aggregate entity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{CouponCode, CouponDraft, CouponEffect, CouponRuleCollection, UNLIMITED_USAGE};
use crate::domain::foundation::{CouponId, DomainError, Timestamp};

/// Coupon aggregate - a discount customers redeem with a code.
///
/// # Invariants
///
/// - `code` is a valid `CouponCode` (uniqueness is enforced by the repository)
/// - `title` is non-blank and at most 255 characters
/// - `amount` is positive, and at most 100 for percentage effects
/// - `max_usage` is `-1` (unlimited) or non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    id: CouponId,
    draft: CouponDraft,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Coupon {
    /// Create a new coupon from a draft.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` family if the draft breaks an invariant
    pub fn new(id: CouponId, draft: CouponDraft) -> Result<Self, DomainError> {
        draft.validate()?;

        let now = Timestamp::now();
        Ok(Self {
            id,
            draft: normalize(draft),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitute a coupon from persistence (no validation).
    pub fn reconstitute(
        id: CouponId,
        draft: CouponDraft,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            draft,
            created_at,
            updated_at,
        }
    }

    /// Replaces every editable field with the draft's values.
    ///
    /// The coupon is left untouched when the draft is invalid.
    pub fn apply(&mut self, draft: CouponDraft) -> Result<(), DomainError> {
        draft.validate()?;

        self.draft = normalize(draft);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &CouponId {
        &self.id
    }

    pub fn code(&self) -> &CouponCode {
        &self.draft.code
    }

    pub fn title(&self) -> &str {
        &self.draft.title
    }

    pub fn amount(&self) -> Decimal {
        self.draft.amount
    }

    pub fn effect(&self) -> CouponEffect {
        self.draft.effect
    }

    pub fn short_description(&self) -> &str {
        &self.draft.short_description
    }

    pub fn description(&self) -> &str {
        &self.draft.description
    }

    pub fn is_enabled(&self) -> bool {
        self.draft.is_enabled
    }

    pub fn expiration_date(&self) -> &Timestamp {
        &self.draft.expiration_date
    }

    pub fn is_available_on_special_offers(&self) -> bool {
        self.draft.is_available_on_special_offers
    }

    pub fn is_cumulative(&self) -> bool {
        self.draft.is_cumulative
    }

    pub fn is_removing_postage(&self) -> bool {
        self.draft.is_removing_postage
    }

    pub fn max_usage(&self) -> i32 {
        self.draft.max_usage
    }

    pub fn rules(&self) -> &CouponRuleCollection {
        &self.draft.rules
    }

    pub fn locale(&self) -> &str {
        &self.draft.locale
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Returns the editable fields as a draft.
    pub fn draft(&self) -> &CouponDraft {
        &self.draft
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns true once `now` is past the expiration date.
    pub fn is_expired(&self, now: &Timestamp) -> bool {
        now.is_after(&self.draft.expiration_date)
    }

    pub fn has_unlimited_usage(&self) -> bool {
        self.draft.max_usage == UNLIMITED_USAGE
    }
}

fn normalize(mut draft: CouponDraft) -> CouponDraft {
    draft.title = draft.title.trim().to_string();
    draft.locale = draft.locale.trim().to_string();
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coupon::draft::test_support::draft;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn new_coupon_keeps_draft_values() {
        let coupon = Coupon::new(CouponId::new(), draft("spring")).unwrap();

        assert_eq!(coupon.code().as_str(), "SPRING");
        assert_eq!(coupon.title(), "Ten percent off");
        assert_eq!(coupon.effect(), CouponEffect::RemoveXPercent);
        assert!(coupon.rules().is_empty());
        assert_eq!(coupon.created_at(), coupon.updated_at());
    }

    #[test]
    fn new_coupon_trims_title() {
        let mut d = draft("SPRING");
        d.title = "  Spring  ".to_string();
        let coupon = Coupon::new(CouponId::new(), d).unwrap();
        assert_eq!(coupon.title(), "Spring");
    }

    #[test]
    fn new_rejects_invalid_draft() {
        let mut d = draft("SPRING");
        d.title = String::new();

        let err = Coupon::new(CouponId::new(), d).unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyField);
        assert_eq!(err.details.get("field"), Some(&"title".to_string()));
    }

    #[test]
    fn apply_replaces_editable_fields() {
        let mut coupon = Coupon::new(CouponId::new(), draft("SPRING")).unwrap();
        let id = *coupon.id();
        let created_at = *coupon.created_at();

        let mut d = draft("SUMMER");
        d.effect = CouponEffect::RemoveXAmount;
        d.amount = Decimal::new(2500, 2);
        d.is_enabled = false;
        coupon.apply(d).unwrap();

        assert_eq!(coupon.id(), &id);
        assert_eq!(coupon.created_at(), &created_at);
        assert_eq!(coupon.code().as_str(), "SUMMER");
        assert_eq!(coupon.amount(), Decimal::new(2500, 2));
        assert!(!coupon.is_enabled());
        assert!(!coupon.updated_at().is_before(&created_at));
    }

    #[test]
    fn apply_leaves_coupon_untouched_on_invalid_draft() {
        let mut coupon = Coupon::new(CouponId::new(), draft("SPRING")).unwrap();
        let before = coupon.clone();

        let mut d = draft("SUMMER");
        d.amount = Decimal::ZERO;
        assert!(coupon.apply(d).is_err());
        assert_eq!(coupon, before);
    }

    #[test]
    fn expiration_and_usage_queries() {
        let mut d = draft("SPRING");
        d.expiration_date = Timestamp::now().add_days(-1);
        let coupon = Coupon::new(CouponId::new(), d).unwrap();

        assert!(coupon.is_expired(&Timestamp::now()));
        assert!(coupon.has_unlimited_usage());
    }
}
