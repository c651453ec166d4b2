//! Member pages. Every backend call here is scoped to the session's user id.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use tracing::instrument;

use clearpath_core::CourseId;

use crate::backend::{BackendError, Certificate, Enrollment, EnrollmentStatus, Quiz};
use crate::components::UserView;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireUser;
use crate::state::AppState;

/// Enrollment row for templates.
#[derive(Debug, Clone)]
pub struct EnrollmentView {
    pub course_id: String,
    pub course_title: String,
    pub status: &'static str,
    pub progress: u8,
    pub enrolled_on: String,
    pub completed: bool,
}

impl From<&Enrollment> for EnrollmentView {
    fn from(enrollment: &Enrollment) -> Self {
        Self {
            course_id: enrollment.course_id.to_string(),
            course_title: enrollment.course_title.clone(),
            status: enrollment.status.label(),
            progress: enrollment.progress.min(100),
            enrolled_on: enrollment
                .enrolled_at
                .map(|at| at.format("%b %-d, %Y").to_string())
                .unwrap_or_default(),
            completed: enrollment.status == EnrollmentStatus::Completed,
        }
    }
}

/// Certificate view for templates.
#[derive(Debug, Clone)]
pub struct CertificateView {
    pub id: String,
    pub course_title: String,
    pub issued_on: String,
    pub download_url: Option<String>,
}

impl From<&Certificate> for CertificateView {
    fn from(certificate: &Certificate) -> Self {
        Self {
            id: certificate.id.clone(),
            course_title: certificate.course_title.clone(),
            issued_on: certificate.issued_at.format("%B %-d, %Y").to_string(),
            download_url: certificate.certificate_url.clone(),
        }
    }
}

/// Enrollments page template.
#[derive(Template, WebTemplate)]
#[template(path = "member/enrollments.html")]
pub struct EnrollmentsTemplate {
    pub user: Option<UserView>,
    pub enrollments: Vec<EnrollmentView>,
    pub error: Option<String>,
}

/// Certificate page template. `certificate` is `None` when none was issued.
#[derive(Template, WebTemplate)]
#[template(path = "member/certificate.html")]
pub struct CertificateTemplate {
    pub user: Option<UserView>,
    pub course_id: String,
    pub certificate: Option<CertificateView>,
}

/// Quiz page template.
#[derive(Template, WebTemplate)]
#[template(path = "member/quiz.html")]
pub struct QuizTemplate {
    pub user: Option<UserView>,
    pub quiz: Quiz,
}

/// Build the member router. Callers wrap it in a `MEMBER` guard.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/member/enrollments", get(enrollments))
        .route("/member/courses/{id}/certificate", get(certificate))
        .route("/member/courses/{id}/quiz", get(quiz))
}

fn parse_course_id(raw: &str) -> Result<CourseId, AppError> {
    CourseId::parse(raw).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// The current member's enrollments.
///
/// GET /member/enrollments
#[instrument(skip(user, state), fields(user_id = %user.user_id))]
async fn enrollments(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let (enrollments, error) = match state.backend().list_enrollments(&user.user_id).await {
        Ok(enrollments) => (enrollments.iter().map(EnrollmentView::from).collect(), None),
        Err(e) => {
            tracing::error!("Failed to fetch enrollments: {e}");
            (
                Vec::new(),
                Some("Your enrollments could not be loaded right now.".to_string()),
            )
        }
    };

    EnrollmentsTemplate {
        user: Some(UserView::from(&user)),
        enrollments,
        error,
    }
}

/// The current member's certificate for one course.
///
/// GET /member/courses/{id}/certificate
#[instrument(skip(user, state), fields(user_id = %user.user_id))]
async fn certificate(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<CertificateTemplate, AppError> {
    let course_id = parse_course_id(&id)?;

    let certificate = match state
        .backend()
        .get_certificate(&user.user_id, &course_id)
        .await
    {
        Ok(certificate) => Some(CertificateView::from(&certificate)),
        // Not earned yet
        Err(BackendError::NotFound(_)) => None,
        Err(e) => return Err(e.into()),
    };

    Ok(CertificateTemplate {
        user: Some(UserView::from(&user)),
        course_id: course_id.into_inner(),
        certificate,
    })
}

/// Quiz for a course, read-only.
///
/// GET /member/courses/{id}/quiz
#[instrument(skip(user, state))]
async fn quiz(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<QuizTemplate, AppError> {
    let course_id = parse_course_id(&id)?;
    let quiz = state.backend().get_quiz(&course_id).await?;

    Ok(QuizTemplate {
        user: Some(UserView::from(&user)),
        quiz,
    })
}
