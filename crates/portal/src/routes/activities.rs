//! Public activity listing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use tracing::instrument;

use clearpath_core::{Page, PageRequest};

use crate::backend::Activity;
use crate::components::UserView;
use crate::filters;
use crate::middleware::OptionalUser;
use crate::state::AppState;

/// Activity view for templates.
#[derive(Debug, Clone)]
pub struct ActivityView {
    pub title: String,
    pub description: String,
    pub location: String,
    pub when: String,
}

/// Format an activity's schedule, e.g. "Mar 4, 2026 18:00 – 20:00".
pub(crate) fn format_schedule(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> String {
    match (starts_at, ends_at) {
        (Some(start), Some(end)) if start.date_naive() == end.date_naive() => format!(
            "{} – {}",
            start.format("%b %-d, %Y %H:%M"),
            end.format("%H:%M")
        ),
        (Some(start), Some(end)) => format!(
            "{} – {}",
            start.format("%b %-d, %Y %H:%M"),
            end.format("%b %-d, %Y %H:%M")
        ),
        (Some(start), None) => start.format("%b %-d, %Y %H:%M").to_string(),
        (None, _) => "Date to be announced".to_string(),
    }
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        Self {
            title: activity.title.clone(),
            description: activity.description.clone().unwrap_or_default(),
            location: activity.location.clone().unwrap_or_default(),
            when: format_schedule(activity.starts_at, activity.ends_at),
        }
    }
}

/// Activity listing template.
#[derive(Template, WebTemplate)]
#[template(path = "activities/index.html")]
pub struct ActivitiesIndexTemplate {
    pub user: Option<UserView>,
    pub page: Page<ActivityView>,
    pub error: Option<String>,
}

/// Build the activities router.
pub fn router() -> Router<AppState> {
    Router::new().route("/activities", get(index))
}

/// Activity listing, soonest first.
///
/// GET /activities?page=1
#[instrument(skip(user, state))]
async fn index(
    OptionalUser(user): OptionalUser,
    State(state): State<AppState>,
    Query(query): Query<PageRequest>,
) -> impl IntoResponse {
    let (activities, error) = match state.backend().list_activities().await {
        Ok(mut activities) => {
            // Undated activities sort last
            activities.sort_by_key(|a| (a.starts_at.is_none(), a.starts_at));
            (activities.iter().map(ActivityView::from).collect(), None)
        }
        Err(e) => {
            tracing::error!("Failed to fetch activities: {e}");
            (
                Vec::new(),
                Some("Activities could not be loaded right now.".to_string()),
            )
        }
    };

    ActivitiesIndexTemplate {
        user: UserView::from_optional(user.as_ref()),
        page: Page::paginate(activities, query, state.config().page_size),
        error,
    }
}
