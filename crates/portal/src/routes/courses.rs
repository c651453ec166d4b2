//! Public course catalog.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::get,
};
use tracing::instrument;

use clearpath_core::{CourseId, Page, PageRequest};

use crate::backend::Course;
use crate::components::UserView;
use crate::error::AppError;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::state::AppState;

/// Course view for templates.
#[derive(Debug, Clone)]
pub struct CourseView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub age_group: String,
    pub duration: String,
}

/// Format a duration in minutes as "1 h 30 min".
fn format_duration(minutes: Option<u32>) -> String {
    match minutes {
        None | Some(0) => String::new(),
        Some(m) if m < 60 => format!("{m} min"),
        Some(m) if m % 60 == 0 => format!("{} h", m / 60),
        Some(m) => format!("{} h {} min", m / 60, m % 60),
    }
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            title: course.title.clone(),
            description: course.description.clone().unwrap_or_default(),
            category: course.category.clone().unwrap_or_default(),
            age_group: course.age_group.clone().unwrap_or_default(),
            duration: format_duration(course.duration_minutes),
        }
    }
}

/// Catalog page template.
#[derive(Template, WebTemplate)]
#[template(path = "courses/index.html")]
pub struct CoursesIndexTemplate {
    pub user: Option<UserView>,
    pub page: Page<CourseView>,
    pub error: Option<String>,
}

/// Course detail template.
#[derive(Template, WebTemplate)]
#[template(path = "courses/show.html")]
pub struct CourseShowTemplate {
    pub user: Option<UserView>,
    pub course: CourseView,
}

/// Build the catalog router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/courses", get(index))
        .route("/courses/{id}", get(show))
}

/// Course catalog. Only published courses are listed.
///
/// GET /courses?page=2
#[instrument(skip(user, state))]
async fn index(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Query(query): Query<PageRequest>,
) -> impl IntoResponse {
    let (courses, error) = match state.backend().list_courses().await {
        Ok(courses) => (
            courses
                .iter()
                .filter(|c| c.published)
                .map(CourseView::from)
                .collect(),
            None,
        ),
        Err(e) => {
            tracing::error!("Failed to fetch courses: {e}");
            (
                Vec::new(),
                Some("Courses could not be loaded right now.".to_string()),
            )
        }
    };

    CoursesIndexTemplate {
        user: UserView::from_optional(user.as_ref()),
        page: Page::paginate(courses, query, state.config().page_size),
        error,
    }
}

/// Course detail.
///
/// GET /courses/{id}
#[instrument(skip(user, state))]
async fn show(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<CourseShowTemplate, AppError> {
    let id = CourseId::parse(&id).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let course = state.backend().get_course(&id).await?;

    Ok(CourseShowTemplate {
        user: UserView::from_optional(user.as_ref()),
        course: CourseView::from(&course),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(None), "");
        assert_eq!(format_duration(Some(0)), "");
        assert_eq!(format_duration(Some(45)), "45 min");
        assert_eq!(format_duration(Some(120)), "2 h");
        assert_eq!(format_duration(Some(90)), "1 h 30 min");
    }
}
