//! HTTP handlers for the coupon back-office screens.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Form, Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::application::{
    CouponForm, CreateCouponCommand, CreateCouponHandler, FormValidationError, GetCouponHandler,
    GetCouponQuery, ListCouponsHandler, ListCouponsQuery, UpdateCouponCommand,
    UpdateCouponHandler,
};
use crate::domain::coupon::{Coupon, CouponError};
use crate::domain::foundation::{
    AdminPermission, AuthenticatedUser, CommandMetadata, CouponId, DomainError, Lang, Timestamp,
};
use crate::ports::{AdminAction, AdminLogEntry, AdminLogWriter};

use super::dto::{
    CouponFormView, CouponListView, CouponReadView, ErrorResponse, FieldViolation, LangQuery,
    ListCouponsParams,
};

/// General error shown when the submitted values were rejected.
pub const INPUT_ERROR_MESSAGE: &str = "Please check your input:";

/// General error shown for every other failure.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Sorry, an error occurred:";

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

/// Screen defaults that do not come from the request.
#[derive(Debug, Clone, Copy)]
pub struct CouponScreenSettings {
    /// Language used when the request carries no valid `lang` parameter.
    pub default_lang: Lang,
    /// Months between today and the expiration date proposed on the create screen.
    pub default_expiration_months: u32,
}

impl Default for CouponScreenSettings {
    fn default() -> Self {
        Self {
            default_lang: Lang::EnUs,
            default_expiration_months: 2,
        }
    }
}

#[derive(Clone)]
pub struct CouponHandlers {
    create_handler: Arc<CreateCouponHandler>,
    update_handler: Arc<UpdateCouponHandler>,
    get_handler: Arc<GetCouponHandler>,
    list_handler: Arc<ListCouponsHandler>,
    admin_log: Arc<dyn AdminLogWriter>,
    settings: CouponScreenSettings,
}

impl CouponHandlers {
    pub fn new(
        create_handler: Arc<CreateCouponHandler>,
        update_handler: Arc<UpdateCouponHandler>,
        get_handler: Arc<GetCouponHandler>,
        list_handler: Arc<ListCouponsHandler>,
        admin_log: Arc<dyn AdminLogWriter>,
        settings: CouponScreenSettings,
    ) -> Self {
        Self {
            create_handler,
            update_handler,
            get_handler,
            list_handler,
            admin_log,
            settings,
        }
    }

    fn lang(&self, requested: Option<&str>) -> Lang {
        requested
            .and_then(Lang::from_code)
            .unwrap_or(self.settings.default_lang)
    }

    fn default_date(&self, lang: Lang) -> String {
        let date = Timestamp::now().add_months(self.settings.default_expiration_months);
        lang.format_date(&date)
    }

    /// Appends the audit line for a successful change.
    ///
    /// The change is already committed, so a failing write only warns.
    async fn log_admin_action(&self, user: &AuthenticatedUser, action: AdminAction, coupon: &Coupon) {
        let verb = match action {
            AdminAction::Create => "created",
            AdminAction::Update => "updated",
        };
        let entry = AdminLogEntry::new(
            user.id.clone(),
            "coupon",
            action,
            format!("Coupon {} (ID {}) {}", coupon.title(), coupon.id(), verb),
        )
        .with_resource_id(coupon.id().to_string());

        if let Err(e) = self.admin_log.append(entry).await {
            tracing::warn!(
                coupon_id = %coupon.id(),
                error = %e,
                "Failed to write admin log"
            );
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /admin/coupon - Coupon list
pub async fn browse_coupons(
    State(handlers): State<CouponHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListCouponsParams>,
) -> Response {
    if let Err(e) = user.authorize(AdminPermission::CouponView) {
        return forbidden(e);
    }

    let lang = handlers.lang(params.lang.as_deref());
    let query = ListCouponsQuery {
        page: params.page,
        per_page: params.per_page,
        enabled: params.enabled,
    };

    match handlers.list_handler.handle(query).await {
        Ok(list) => (StatusCode::OK, Json(CouponListView::new(list, lang))).into_response(),
        Err(e) => handle_coupon_error(e),
    }
}

/// GET /admin/coupon/create - Empty create screen
pub async fn create_form(
    State(handlers): State<CouponHandlers>,
    RequireAuth(user): RequireAuth,
    Query(query): Query<LangQuery>,
) -> Response {
    if let Err(e) = user.authorize(AdminPermission::CouponCreate) {
        return forbidden(e);
    }

    let lang = handlers.lang(query.lang.as_deref());
    let form = CouponForm {
        locale: lang.code().to_string(),
        ..CouponForm::default()
    };
    let view = CouponFormView::create(lang, form, handlers.default_date(lang));

    (StatusCode::OK, Json(view)).into_response()
}

/// POST /admin/coupon/create - Create a coupon from the submitted form
pub async fn create_coupon(
    State(handlers): State<CouponHandlers>,
    RequireAuth(user): RequireAuth,
    request: Request,
) -> Response {
    if let Err(e) = user.authorize(AdminPermission::CouponCreate) {
        return forbidden(e);
    }

    let (query, headers, form) = match read_submission(request).await {
        Ok(submission) => submission,
        Err(response) => return response,
    };

    let lang = handlers.lang(query.lang.as_deref());
    let view = CouponFormView::create(lang, form.clone(), handlers.default_date(lang));

    let draft = match form.validate(lang) {
        Ok(draft) => draft,
        Err(e) => return submission_failed(Submission::Creation, view, e.into()),
    };

    let metadata = command_metadata(&user, &headers);
    match handlers
        .create_handler
        .handle(CreateCouponCommand { draft }, metadata)
        .await
    {
        Ok(result) => {
            handlers
                .log_admin_action(&user, AdminAction::Create, &result.coupon)
                .await;
            Redirect::to(&form.success_url_for(result.coupon.id())).into_response()
        }
        Err(e) => submission_failed(Submission::Creation, view, e.into()),
    }
}

/// GET /admin/coupon/update/:id - Edit screen hydrated from the stored coupon
pub async fn update_form(
    State(handlers): State<CouponHandlers>,
    RequireAuth(user): RequireAuth,
    Path(coupon_id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Response {
    if let Err(e) = user.authorize(AdminPermission::CouponUpdate) {
        return forbidden(e);
    }

    let coupon_id = match parse_coupon_id(&coupon_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let lang = handlers.lang(query.lang.as_deref());
    match handlers.get_handler.handle(GetCouponQuery { coupon_id }).await {
        Ok(coupon) => {
            let form = CouponForm::from_coupon(&coupon, lang);
            let view = CouponFormView::update(lang, coupon_id.to_string(), form);
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(e) => handle_coupon_error(e),
    }
}

/// POST /admin/coupon/update/:id - Apply the submitted form to a coupon
pub async fn update_coupon(
    State(handlers): State<CouponHandlers>,
    RequireAuth(user): RequireAuth,
    Path(coupon_id): Path<String>,
    request: Request,
) -> Response {
    if let Err(e) = user.authorize(AdminPermission::CouponUpdate) {
        return forbidden(e);
    }

    let coupon_id = match parse_coupon_id(&coupon_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    // Unknown coupons are a 404 whatever was submitted
    if let Err(e) = handlers.update_handler.ensure_exists(coupon_id).await {
        return handle_coupon_error(e);
    }

    let (query, headers, form) = match read_submission(request).await {
        Ok(submission) => submission,
        Err(response) => return response,
    };

    let lang = handlers.lang(query.lang.as_deref());
    let view = CouponFormView::update(lang, coupon_id.to_string(), form.clone());

    let draft = match form.validate(lang) {
        Ok(draft) => draft,
        Err(e) => return submission_failed(Submission::Update, view, e.into()),
    };

    let metadata = command_metadata(&user, &headers);
    match handlers
        .update_handler
        .handle(UpdateCouponCommand { coupon_id, draft }, metadata)
        .await
    {
        Ok(result) => {
            handlers
                .log_admin_action(&user, AdminAction::Update, &result.coupon)
                .await;
            Redirect::to(&form.success_url_for(result.coupon.id())).into_response()
        }
        Err(e @ CouponError::NotFound(_)) => handle_coupon_error(e),
        Err(e) => submission_failed(Submission::Update, view, e.into()),
    }
}

/// GET /admin/coupon/read/:id - Coupon detail
pub async fn read_coupon(
    State(handlers): State<CouponHandlers>,
    RequireAuth(user): RequireAuth,
    Path(coupon_id): Path<String>,
    Query(query): Query<LangQuery>,
) -> Response {
    if let Err(e) = user.authorize(AdminPermission::CouponRead) {
        return forbidden(e);
    }

    let coupon_id = match parse_coupon_id(&coupon_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let lang = handlers.lang(query.lang.as_deref());
    match handlers.get_handler.handle(GetCouponQuery { coupon_id }).await {
        Ok(coupon) => (StatusCode::OK, Json(CouponReadView::new(&coupon, lang))).into_response(),
        Err(e) => handle_coupon_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Submission failures
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Submission {
    Creation,
    Update,
}

impl Submission {
    fn as_str(&self) -> &'static str {
        match self {
            Submission::Creation => "creation",
            Submission::Update => "update",
        }
    }
}

/// Why a create or update submission did not go through.
#[derive(Debug)]
enum SubmissionError {
    Form(FormValidationError),
    Coupon(CouponError),
}

impl From<FormValidationError> for SubmissionError {
    fn from(err: FormValidationError) -> Self {
        SubmissionError::Form(err)
    }
}

impl From<CouponError> for SubmissionError {
    fn from(err: CouponError) -> Self {
        SubmissionError::Coupon(err)
    }
}

impl SubmissionError {
    fn is_input_error(&self) -> bool {
        match self {
            SubmissionError::Form(_) => true,
            SubmissionError::Coupon(e) => e.is_input_error(),
        }
    }

    fn violations(&self) -> Vec<FieldViolation> {
        match self {
            SubmissionError::Form(e) => e.violations.iter().map(FieldViolation::from).collect(),
            SubmissionError::Coupon(CouponError::ValidationFailed { field, message }) => {
                vec![FieldViolation {
                    field: field.clone(),
                    message: message.clone(),
                }]
            }
            SubmissionError::Coupon(e @ CouponError::CodeAlreadyExists(_)) => {
                vec![FieldViolation {
                    field: "code".to_string(),
                    message: e.message(),
                }]
            }
            SubmissionError::Coupon(_) => Vec::new(),
        }
    }
}

impl std::fmt::Display for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionError::Form(e) => write!(f, "{}", e),
            SubmissionError::Coupon(e) => write!(f, "{}", e),
        }
    }
}

/// Re-renders the form with the submitted values and what went wrong.
fn submission_failed(
    submission: Submission,
    view: CouponFormView,
    error: SubmissionError,
) -> Response {
    let (status, general_error) = if error.is_input_error() {
        (StatusCode::BAD_REQUEST, INPUT_ERROR_MESSAGE)
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED_ERROR_MESSAGE)
    };

    tracing::error!(
        "Error during Coupon {} process : {}. Exception was {}",
        submission.as_str(),
        general_error,
        error
    );

    let view = view.with_error(general_error, error.violations());
    (status, Json(view)).into_response()
}

// ════════════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════════════

/// Pulls the `lang` parameter, headers and form out of a submission.
///
/// Only called once the user is authorized, so a forbidden post is
/// never parsed.
async fn read_submission(
    request: Request,
) -> Result<(LangQuery, HeaderMap, CouponForm), Response> {
    let Query(query) =
        Query::<LangQuery>::try_from_uri(request.uri()).map_err(IntoResponse::into_response)?;
    let headers = request.headers().clone();
    let Form(form) = Form::<CouponForm>::from_request(request, &())
        .await
        .map_err(IntoResponse::into_response)?;

    Ok((query, headers, form))
}

fn command_metadata(user: &AuthenticatedUser, headers: &HeaderMap) -> CommandMetadata {
    let metadata = CommandMetadata::new(user.id.clone());
    match headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        Some(request_id) => metadata.with_correlation_id(request_id),
        None => metadata,
    }
}

fn parse_coupon_id(raw: &str) -> Result<CouponId, Response> {
    raw.parse::<CouponId>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid coupon ID")),
        )
            .into_response()
    })
}

fn forbidden(error: DomainError) -> Response {
    let details = serde_json::to_value(&error.details).unwrap_or(serde_json::Value::Null);
    (
        StatusCode::FORBIDDEN,
        Json(ErrorResponse::forbidden(error.message).with_details(details)),
    )
        .into_response()
}

fn handle_coupon_error(error: CouponError) -> Response {
    match error {
        CouponError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Coupon", &id.to_string())),
        )
            .into_response(),
        CouponError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::forbidden("Permission denied")),
        )
            .into_response(),
        e @ (CouponError::ValidationFailed { .. } | CouponError::CodeAlreadyExists(_)) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(e.message())),
        )
            .into_response(),
        CouponError::Infrastructure(msg) => {
            tracing::error!("Coupon request failed: {}", msg);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response()
        }
    }
}
