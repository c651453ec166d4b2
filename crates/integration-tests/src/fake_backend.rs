//! In-process stand-in for the platform REST API.
//!
//! Serves fixed data under `/api/` with the same paths, JSON shapes and
//! status codes the portal's backend client expects.

use axum::{
    Json, Router,
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

use crate::PASSWORD;

/// Member that owns the fixture enrollments and certificate.
pub const MEMBER_ID: &str = "m-100";

/// Users known to the fake backend: (username, user id, role).
pub const USERS: &[(&str, &str, &str)] = &[
    ("admin", "u-admin", "ADMIN"),
    ("manager", "u-manager", "MANAGER"),
    ("consultant", "u-consultant", "CONSULTANT"),
    ("staff", "u-staff", "STAFF"),
    ("member", MEMBER_ID, "MEMBER"),
];

/// Start the fake backend and return its API base URL.
pub async fn spawn() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake backend");
    let addr = listener.local_addr().expect("Failed to read backend address");
    tokio::spawn(async move {
        axum::serve(listener, router())
            .await
            .expect("Fake backend error");
    });
    Url::parse(&format!("http://{addr}/api/")).expect("valid URL")
}

fn router() -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/courses", get(courses))
        .route("/api/courses/{id}", get(course))
        .route("/api/courses/{id}/quiz", get(quiz))
        .route("/api/activities", get(activities))
        .route("/api/members/{id}/enrollments", get(enrollments))
        .route("/api/certificates", get(certificate))
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn login(Json(credentials): Json<Credentials>) -> Response {
    let user = USERS
        .iter()
        .find(|(name, _, _)| *name == credentials.username);

    match user {
        Some((name, id, role)) if credentials.password == PASSWORD => Json(json!({
            "userId": id,
            "role": role,
            "displayName": name,
        }))
        .into_response(),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid credentials" })),
        )
            .into_response(),
    }
}

fn course_fixtures() -> Vec<Value> {
    vec![
        json!({
            "id": "c-1",
            "title": "Saying No With Confidence",
            "description": "Refusal skills for teenagers facing peer pressure.",
            "category": "Awareness",
            "ageGroup": "Teens",
            "durationMinutes": 90,
            "published": true,
        }),
        json!({
            "id": "c-2",
            "title": "Talking With Your Kids",
            "description": "A course for parents on starting honest conversations.",
            "category": "Parents",
            "durationMinutes": 45,
        }),
        json!({
            "id": "c-3",
            "title": "Unreleased Draft Course",
            "published": false,
        }),
    ]
}

async fn courses() -> Json<Vec<Value>> {
    Json(course_fixtures())
}

async fn course(Path(id): Path<String>) -> Response {
    course_fixtures()
        .into_iter()
        .find(|c| c["id"] == id.as_str())
        .map_or_else(
            || StatusCode::NOT_FOUND.into_response(),
            |c| Json(c).into_response(),
        )
}

async fn quiz(Path(id): Path<String>) -> Response {
    if id != "c-1" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "id": "q-1",
        "courseId": "c-1",
        "title": "Refusal Skills Check",
        "questions": [
            {
                "id": "q-1-1",
                "text": "Which response sets a clear boundary?",
                "options": ["Maybe later", "No thanks, I'm good", "I'll think about it"],
            }
        ],
    }))
    .into_response()
}

async fn activities() -> Json<Value> {
    Json(json!([
        {
            "id": "a-2",
            "title": "Community Walk",
            "location": "Riverside Park",
        },
        {
            "id": "a-1",
            "title": "Parent Evening",
            "description": "Open Q&A with a prevention counsellor.",
            "location": "Library Hall",
            "startsAt": "2026-11-04T18:00:00Z",
            "endsAt": "2026-11-04T20:00:00Z",
        },
    ]))
}

async fn enrollments(Path(id): Path<String>) -> Json<Value> {
    if id != MEMBER_ID {
        return Json(json!([]));
    }
    Json(json!([
        {
            "id": "e-1",
            "courseId": "c-1",
            "courseTitle": "Saying No With Confidence",
            "status": "COMPLETED",
            "progress": 100,
            "enrolledAt": "2026-09-01T10:00:00Z",
        },
        {
            "id": "e-2",
            "courseId": "c-2",
            "courseTitle": "Talking With Your Kids",
            "status": "IN_PROGRESS",
            "progress": 40,
        },
    ]))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CertificateQuery {
    member_id: String,
    course_id: String,
}

async fn certificate(Query(query): Query<CertificateQuery>) -> Response {
    if query.member_id != MEMBER_ID || query.course_id != "c-1" {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "id": "CERT-0001",
        "memberId": MEMBER_ID,
        "courseId": "c-1",
        "courseTitle": "Saying No With Confidence",
        "issuedAt": "2026-09-20T12:00:00Z",
        "certificateUrl": "https://files.clearpath.test/certificates/CERT-0001.pdf",
    }))
    .into_response()
}
