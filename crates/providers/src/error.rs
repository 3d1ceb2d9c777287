use actix_web::HttpResponse;

/// Malformed query input, rejected before any upstream call
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Date not in `YYYY-MM-DD` form
    #[error("Invalid {field} format: {value:?}. Expected YYYY-MM-DD.")]
    InvalidDate {
        /// Query parameter name
        field: &'static str,
        /// Value received
        value: String,
    },

    /// End date not after start date
    #[error("end_date must be after start_date.")]
    InvalidWindow,

    /// Facility id is not a non-negative integer
    #[error(
        "campground_id must be an integer-compatible string (recreation area / facility id). Got {value:?}."
    )]
    InvalidFacilityId {
        /// Value received
        value: String,
    },
}

/// Provider name that did not resolve to exactly one provider
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// Nothing matched
    #[error("Unknown provider: '{input}'")]
    UnknownProvider {
        /// Text the caller sent
        input: String,
        /// Every canonical key, sorted
        providers: Vec<String>,
    },

    /// More than one provider matched
    #[error("Ambiguous provider: '{input}'")]
    AmbiguousProvider {
        /// Text the caller sent
        input: String,
        /// Matched canonical keys, sorted and deduplicated
        matches: Vec<String>,
    },
}

/// Failure raised by a provider's search capability
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Upstream provider error while searching {provider_label}: {message}")]
pub struct UpstreamProviderError {
    /// Label of the provider that failed
    pub provider_label: String,
    /// Upstream failure text
    pub message: String,
}

/// Everything an availability query can fail with
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    /// Bad dates or facility id
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Provider could not be resolved
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Upstream search failed
    #[error(transparent)]
    Upstream(#[from] UpstreamProviderError),
}

impl actix_web::ResponseError for AvailabilityError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AvailabilityError::Validation(_) | AvailabilityError::Resolve(_) => {
                StatusCode::BAD_REQUEST
            }
            AvailabilityError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AvailabilityError::Validation(e) => HttpResponse::BadRequest().json(serde_json::json!({
                "detail": e.to_string()
            })),
            AvailabilityError::Resolve(e) => match e {
                ResolveError::UnknownProvider { providers, .. } => {
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": e.to_string(),
                        "message": "Supported providers are listed in the 'providers' field.",
                        "providers": providers
                    }))
                }
                ResolveError::AmbiguousProvider { matches, .. } => {
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": e.to_string(),
                        "message": "Your provider matched multiple options. Please be more specific.",
                        "matches": matches
                    }))
                }
            },
            AvailabilityError::Upstream(e) => HttpResponse::BadGateway().json(serde_json::json!({
                "detail": e.to_string()
            })),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;
    use actix_web::http::StatusCode;

    #[test]
    fn test_messages() {
        let e = ValidationError::InvalidDate {
            field: "start_date",
            value: "2025-13-01".into(),
        };
        assert_eq!(
            e.to_string(),
            "Invalid start_date format: \"2025-13-01\". Expected YYYY-MM-DD."
        );

        let e = ResolveError::AmbiguousProvider {
            input: "parks".into(),
            matches: vec![],
        };
        assert_eq!(e.to_string(), "Ambiguous provider: 'parks'");

        let e = UpstreamProviderError {
            provider_label: "Ohio State Parks".into(),
            message: "HTTP 500 - boom".into(),
        };
        assert_eq!(
            e.to_string(),
            "Upstream provider error while searching Ohio State Parks: HTTP 500 - boom"
        );
    }

    #[test]
    fn test_status_codes() {
        let validation = AvailabilityError::from(ValidationError::InvalidWindow);
        let unknown = AvailabilityError::from(ResolveError::UnknownProvider {
            input: "zzz".into(),
            providers: vec![],
        });
        let upstream = AvailabilityError::from(UpstreamProviderError {
            provider_label: "x".into(),
            message: "y".into(),
        });

        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(unknown.error_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(upstream.error_response().status(), StatusCode::BAD_GATEWAY);
    }
}
