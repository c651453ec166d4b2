//! Role dashboards.
//!
//! Each dashboard lives in its own router so it can be wrapped in the guard
//! for exactly one role. All four render the same template with a
//! role-specific selection of panels.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Router, extract::State, routing::get};
use tracing::instrument;

use clearpath_core::{Role, SessionIdentity};

use crate::backend::{Activity, BackendError, Course};
use crate::components::UserView;
use crate::filters;
use crate::middleware::RequireUser;
use crate::routes::activities::ActivityView;
use crate::state::AppState;

/// Number of upcoming activities shown on a dashboard.
const UPCOMING_LIMIT: usize = 5;

/// Headline number on a dashboard.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

/// Course row in the dashboard table.
#[derive(Debug, Clone)]
pub struct CourseRow {
    pub id: String,
    pub title: String,
    pub category: String,
    pub published: bool,
}

impl From<&Course> for CourseRow {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.to_string(),
            title: course.title.clone(),
            category: course.category.clone().unwrap_or_default(),
            published: course.published,
        }
    }
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub user: Option<UserView>,
    pub title: &'static str,
    pub stats: Vec<StatCard>,
    pub courses: Vec<CourseRow>,
    pub activities: Vec<ActivityView>,
    pub errors: Vec<String>,
}

/// Panels a dashboard shows.
#[derive(Debug, Clone, Copy)]
struct Panels {
    course_table: bool,
    activity_list: bool,
}

/// The staff dashboards. Members have no dashboard; their home is the
/// enrollments page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dashboard {
    Admin,
    Manager,
    Consultant,
    Staff,
}

impl Dashboard {
    pub const ALL: [Self; 4] = [Self::Admin, Self::Manager, Self::Consultant, Self::Staff];

    /// The only role allowed to open this dashboard.
    #[must_use]
    pub const fn role(self) -> Role {
        match self {
            Self::Admin => Role::Admin,
            Self::Manager => Role::Manager,
            Self::Consultant => Role::Consultant,
            Self::Staff => Role::Staff,
        }
    }

    /// Route path, which is also the role's home page.
    #[must_use]
    pub const fn path(self) -> &'static str {
        self.role().home_path()
    }

    const fn title(self) -> &'static str {
        match self {
            Self::Admin => "Administration",
            Self::Manager => "Program management",
            Self::Consultant => "Consultant desk",
            Self::Staff => "Staff workspace",
        }
    }

    const fn panels(self) -> Panels {
        match self {
            Self::Admin | Self::Manager => Panels {
                course_table: true,
                activity_list: true,
            },
            Self::Consultant => Panels {
                course_table: false,
                activity_list: true,
            },
            Self::Staff => Panels {
                course_table: true,
                activity_list: false,
            },
        }
    }
}

/// Router serving one dashboard. Callers wrap it in the guard for
/// [`Dashboard::role`].
pub fn router(dashboard: Dashboard) -> Router<AppState> {
    Router::new().route(
        dashboard.path(),
        get(move |user: RequireUser, state: State<AppState>| show(dashboard, user, state)),
    )
}

/// Dashboard page.
///
/// GET /admin, /manager, /consultant, /staff
#[instrument(skip(user, state), fields(role = %user.role))]
async fn show(
    dashboard: Dashboard,
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
) -> DashboardTemplate {
    let backend = state.backend();
    let (courses, activities) = tokio::join!(backend.list_courses(), backend.list_activities());
    build_dashboard(dashboard, &user, courses, activities)
}

fn build_dashboard(
    dashboard: Dashboard,
    user: &SessionIdentity,
    courses: Result<Vec<Course>, BackendError>,
    activities: Result<Vec<Activity>, BackendError>,
) -> DashboardTemplate {
    let panels = dashboard.panels();
    let mut stats = Vec::new();
    let mut errors = Vec::new();

    let courses = courses.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch courses: {e}");
        errors.push("Course data is unavailable.".to_string());
        Vec::new()
    });
    let mut activities = activities.unwrap_or_else(|e| {
        tracing::error!("Failed to fetch activities: {e}");
        errors.push("Activity data is unavailable.".to_string());
        Vec::new()
    });

    let published = courses.iter().filter(|c| c.published).count();
    stats.push(StatCard {
        label: "Courses",
        value: courses.len().to_string(),
    });
    stats.push(StatCard {
        label: "Published",
        value: published.to_string(),
    });
    stats.push(StatCard {
        label: "Activities",
        value: activities.len().to_string(),
    });

    activities.sort_by_key(|a| (a.starts_at.is_none(), a.starts_at));

    DashboardTemplate {
        user: Some(UserView::from(user)),
        title: dashboard.title(),
        stats,
        courses: if panels.course_table {
            courses.iter().map(CourseRow::from).collect()
        } else {
            Vec::new()
        },
        activities: if panels.activity_list {
            activities
                .iter()
                .take(UPCOMING_LIMIT)
                .map(ActivityView::from)
                .collect()
        } else {
            Vec::new()
        },
        errors,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clearpath_core::{CourseId, UserId};

    fn identity(role: Role) -> SessionIdentity {
        SessionIdentity::new(role, UserId::parse("u-1").unwrap())
    }

    fn course(id: &str, published: bool) -> Course {
        Course {
            id: CourseId::parse(id).unwrap(),
            title: format!("Course {id}"),
            description: None,
            category: Some("Awareness".to_string()),
            age_group: None,
            duration_minutes: None,
            published,
        }
    }

    fn activity(id: &str) -> Activity {
        Activity {
            id: id.to_string(),
            title: format!("Activity {id}"),
            description: None,
            location: None,
            starts_at: None,
            ends_at: None,
        }
    }

    #[test]
    fn test_every_staff_role_has_exactly_one_dashboard() {
        let roles: Vec<Role> = Dashboard::ALL.iter().map(|d| d.role()).collect();
        for role in Role::ALL {
            let expected = usize::from(role != Role::Member);
            assert_eq!(roles.iter().filter(|r| **r == role).count(), expected, "{role}");
        }
        for dashboard in Dashboard::ALL {
            assert_eq!(dashboard.path(), dashboard.role().home_path());
        }
    }

    #[test]
    fn test_admin_dashboard_shows_everything() {
        let dashboard = build_dashboard(
            Dashboard::Admin,
            &identity(Role::Admin),
            Ok(vec![course("a", true), course("b", false)]),
            Ok(vec![activity("x")]),
        );

        assert_eq!(dashboard.title, "Administration");
        assert_eq!(dashboard.courses.len(), 2);
        assert_eq!(dashboard.activities.len(), 1);
        let values: Vec<_> = dashboard.stats.iter().map(|s| s.value.as_str()).collect();
        assert_eq!(values, vec!["2", "1", "1"]);
        assert!(dashboard.errors.is_empty());
    }

    #[test]
    fn test_consultant_dashboard_has_no_course_table() {
        let dashboard = build_dashboard(
            Dashboard::Consultant,
            &identity(Role::Consultant),
            Ok(vec![course("a", true)]),
            Ok((0..8).map(|i| activity(&i.to_string())).collect()),
        );

        assert!(dashboard.courses.is_empty());
        assert_eq!(dashboard.activities.len(), UPCOMING_LIMIT);
    }

    #[test]
    fn test_backend_failure_is_reported_inline() {
        let dashboard = build_dashboard(
            Dashboard::Staff,
            &identity(Role::Staff),
            Err(BackendError::Unauthorized),
            Ok(Vec::new()),
        );

        assert_eq!(dashboard.errors, vec!["Course data is unavailable.".to_string()]);
        assert!(dashboard.courses.is_empty());
    }
}
