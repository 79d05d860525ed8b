//! Drives `ApiClient` against an in-process stub of the HR backend.

use std::collections::HashMap;
use std::sync::Mutex;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use chrono::NaiveDate;
use serde_json::{Value, json};

use hrm_portal::api::attendance::ClockIn;
use hrm_portal::api::call_data::Saved;
use hrm_portal::auth::{Session, SessionContext};
use hrm_portal::leave::{LeaveField, LeaveForm};
use hrm_portal::model::call_data::{CallDataInput, CallMetrics};
use hrm_portal::model::leave_request::LeaveType;
use hrm_portal::{ApiClient, ClientError, Config};

/// Requests the stub saw, as `(method path, json body)`.
#[derive(Default)]
struct Recorded(Mutex<Vec<(String, Value)>>);

impl Recorded {
    fn push(&self, req: &HttpRequest, body: &[u8]) {
        let body = serde_json::from_slice(body).unwrap_or(Value::Null);
        self.0
            .lock()
            .unwrap()
            .push((format!("{} {}", req.method(), req.path()), body));
    }

    fn all(&self) -> Vec<(String, Value)> {
        self.0.lock().unwrap().clone()
    }
}

async fn spawn_backend<F>(configure: F) -> String
where
    F: Fn(&mut web::ServiceConfig) + Clone + Send + 'static,
{
    let server = HttpServer::new(move || App::new().configure(configure.clone()))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{addr}")
}

fn client(base_url: String, session: SessionContext) -> ApiClient {
    let config = Config {
        api_base_url: base_url,
        api_timeout_secs: 5,
        session_file: ".unused-session.json".into(),
        log_dir: "logs".into(),
    };
    ApiClient::new(&config, session).unwrap()
}

fn employee_json(role: &str) -> Value {
    json!({
        "_id": "e1",
        "name": "Jane Roe",
        "email": "jane@company.com",
        "department": "Sales",
        "role": role,
    })
}

fn logged_in(role: &str) -> SessionContext {
    let ctx = SessionContext::in_memory();
    ctx.set(Session {
        token: "tok-123".into(),
        employee: serde_json::from_value(employee_json(role)).unwrap(),
    })
    .unwrap();
    ctx
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[actix_web::test]
async fn login_keeps_the_token_for_later_calls() {
    let base = spawn_backend(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/api/auth/login",
            web::post().to(|body: web::Json<Value>| async move {
                if body["email"] == "jane@company.com" && body["password"] == "secret1" {
                    HttpResponse::Ok().json(json!({
                        "success": true,
                        "message": "Login successful",
                        "token": "tok-123",
                        "employee": employee_json("employee"),
                    }))
                } else {
                    HttpResponse::BadRequest()
                        .json(json!({ "success": false, "message": "Invalid credentials" }))
                }
            }),
        )
        .route(
            "/api/employees/me",
            web::get().to(|req: HttpRequest| async move {
                let auth = req
                    .headers()
                    .get("Authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                if auth == "Bearer tok-123" {
                    HttpResponse::Ok().json(json!({ "success": true, "employee": employee_json("employee") }))
                } else {
                    HttpResponse::Unauthorized().json(json!({ "message": "No token" }))
                }
            }),
        );
    })
    .await;

    let session = SessionContext::in_memory();
    let api = client(base, session.clone());

    let err = api.login("jane@company.com", "wrong").await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: 400, ref message, .. } if message == "Invalid credentials"));
    assert!(!session.is_logged_in());

    let logged = api.login("jane@company.com", "secret1").await.unwrap();
    assert_eq!(logged.token, "tok-123");
    assert_eq!(session.token().as_deref(), Some("tok-123"));

    let me = api.my_profile().await.unwrap();
    assert_eq!(me.name, "Jane Roe");
}

#[actix_web::test]
async fn admin_login_refuses_employees() {
    let base = spawn_backend(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/api/auth/login",
            web::post().to(|| async {
                HttpResponse::Ok().json(json!({
                    "success": true,
                    "token": "tok-123",
                    "employee": employee_json("employee"),
                }))
            }),
        );
    })
    .await;

    let session = SessionContext::in_memory();
    let api = client(base, session.clone());

    let err = api.login_admin("jane@company.com", "secret1").await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
    assert!(!session.is_logged_in());
}

#[actix_web::test]
async fn unauthorized_response_logs_out() {
    let base = spawn_backend(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/api/leaves/my",
            web::get().to(|| async {
                HttpResponse::Unauthorized().json(json!({ "message": "Token expired" }))
            }),
        );
    })
    .await;

    let session = logged_in("employee");
    let api = client(base, session.clone());

    let err = api.my_leaves().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(!session.is_logged_in());

    // Nothing leaves the client once logged out.
    assert!(matches!(api.my_leaves().await, Err(ClientError::NotLoggedIn)));
}

#[actix_web::test]
async fn unsuccessful_envelope_is_rejected() {
    let base = spawn_backend(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/api/holidays",
            web::get().to(|| async {
                HttpResponse::Ok().json(json!({ "success": false, "message": "Database unavailable" }))
            }),
        );
    })
    .await;

    let api = client(base, logged_in("employee"));
    let err = api.holidays().await.unwrap_err();
    assert!(matches!(err, ClientError::Rejected(ref m) if m == "Database unavailable"));
}

#[actix_web::test]
async fn employees_cannot_reach_admin_endpoints() {
    let recorded = web::Data::new(Recorded::default());
    let data = recorded.clone();
    let base = spawn_backend(move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(data.clone()).default_service(web::to(
            |req: HttpRequest, body: web::Bytes, rec: web::Data<Recorded>| async move {
                rec.push(&req, &body);
                HttpResponse::Ok().json(json!({ "success": true }))
            },
        ));
    })
    .await;

    let api = client(base, logged_in("employee"));
    assert!(matches!(api.list_employees().await, Err(ClientError::Forbidden(_))));
    assert!(matches!(api.approve_leave("l1").await, Err(ClientError::Forbidden(_))));
    assert!(matches!(api.delete_holiday("h1").await, Err(ClientError::Forbidden(_))));
    assert!(recorded.all().is_empty());
}

#[actix_web::test]
async fn invalid_leave_form_is_never_sent() {
    let recorded = web::Data::new(Recorded::default());
    let data = recorded.clone();
    let base = spawn_backend(move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(data.clone()).route(
            "/api/leaves",
            web::post().to(
                |req: HttpRequest, body: web::Bytes, rec: web::Data<Recorded>| async move {
                    rec.push(&req, &body);
                    HttpResponse::Created().json(json!({
                        "success": true,
                        "leave": {
                            "_id": "l1",
                            "type": "Vacation",
                            "startDate": "2024-03-04",
                            "endDate": "2024-03-06",
                            "reason": "family trip to the coast",
                            "status": "Pending",
                        },
                    }))
                },
            ),
        );
    })
    .await;

    let api = client(base, logged_in("employee"));
    let today = day(2024, 3, 1);

    let mut form = LeaveForm::new();
    form.set_start_date(Some(day(2024, 3, 4)));
    form.set_end_date(Some(day(2024, 3, 6)));
    form.set_reason("short");

    match api.submit_leave(&form, today).await {
        Err(ClientError::Invalid(errors)) => {
            assert!(errors.get(LeaveField::Type).is_some());
            assert!(errors.get(LeaveField::Reason).is_some());
        }
        other => panic!("expected validation errors, got {other:?}"),
    }
    assert!(recorded.all().is_empty());

    form.set_leave_type(Some(LeaveType::Vacation));
    form.set_reason("family trip to the coast");
    let created = api.submit_leave(&form, today).await.unwrap().unwrap();
    assert_eq!(created.id, "l1");
    assert_eq!(created.total_days(), 3.0);

    let sent = recorded.all();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "POST /api/leaves");
    assert_eq!(
        sent[0].1,
        json!({
            "type": "Vacation",
            "startDate": "2024-03-04",
            "endDate": "2024-03-06",
            "reason": "family trip to the coast",
            "isHalfDay": false,
        })
    );
}

fn call_backend(existing: bool, recorded: web::Data<Recorded>) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(recorded.clone())
            .route(
                "/api/calls/all",
                web::get().to(
                    move |req: HttpRequest, query: web::Query<HashMap<String, String>>, rec: web::Data<Recorded>| async move {
                        rec.push(&req, &serde_json::to_vec(&query.into_inner()).unwrap());
                        let records = if existing {
                            json!([{
                                "_id": "c9",
                                "employee": { "_id": "e7", "name": "Sam Caller" },
                                "date": "2024-03-04T00:00:00.000Z",
                                "visitedToday": 1,
                                "interestedStudents": 1,
                                "totalCallTime": 10,
                                "totalCalls": 10,
                                "performanceScore": 73.0,
                            }])
                        } else {
                            json!([])
                        };
                        HttpResponse::Ok().json(json!({ "success": true, "callDataRecords": records }))
                    },
                ),
            )
            .route(
                "/api/calls",
                web::post().to(
                    |req: HttpRequest, body: web::Bytes, rec: web::Data<Recorded>| async move {
                        rec.push(&req, &body);
                        HttpResponse::Created().json(json!({ "success": true }))
                    },
                ),
            )
            .route(
                "/api/calls/{id}",
                web::put().to(
                    |req: HttpRequest, body: web::Bytes, rec: web::Data<Recorded>| async move {
                        rec.push(&req, &body);
                        HttpResponse::Ok().json(json!({ "success": true }))
                    },
                ),
            );
    }
}

fn numbers() -> CallDataInput {
    CallDataInput {
        metrics: CallMetrics {
            visited_today: 2,
            interested_students: 3,
            total_call_time: 120,
            total_calls: 40,
        },
        notes: "good day".into(),
        ..Default::default()
    }
}

#[actix_web::test]
async fn admin_entry_updates_an_existing_day() {
    let recorded = web::Data::new(Recorded::default());
    let base = spawn_backend(call_backend(true, recorded.clone())).await;
    let api = client(base, logged_in("admin"));

    let saved = api
        .save_call_data_for("e7", day(2024, 3, 4), &numbers())
        .await
        .unwrap();
    assert!(matches!(saved, Saved::Updated(_)));

    let sent = recorded.all();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, "GET /api/calls/all");
    assert_eq!(sent[0].1, json!({ "employee": "e7", "date": "2024-03-04", "limit": "1" }));
    assert_eq!(sent[1].0, "PUT /api/calls/c9");
    assert_eq!(
        sent[1].1,
        json!({
            "visitedToday": 2,
            "interestedStudents": 3,
            "totalCallTime": 120,
            "totalCalls": 40,
            "notes": "good day",
        })
    );
}

#[actix_web::test]
async fn admin_entry_creates_a_missing_day() {
    let recorded = web::Data::new(Recorded::default());
    let base = spawn_backend(call_backend(false, recorded.clone())).await;
    let api = client(base, logged_in("admin"));

    let saved = api
        .save_call_data_for("e7", day(2024, 3, 4), &numbers())
        .await
        .unwrap();
    assert!(matches!(saved, Saved::Created(_)));

    let sent = recorded.all();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1].0, "POST /api/calls");
    assert_eq!(sent[1].1["employee"], "e7");
    assert_eq!(sent[1].1["date"], "2024-03-04");
    assert_eq!(sent[1].1["totalCalls"], 40);
}

#[actix_web::test]
async fn monthly_summary_totals_an_employee() {
    let recorded = web::Data::new(Recorded::default());
    let base = spawn_backend(call_backend(true, recorded.clone())).await;
    let api = client(base, logged_in("admin"));

    let summary = api
        .monthly_call_summary(Some("e7"), 3, 2024, day(2024, 3, 10))
        .await.unwrap();
    assert_eq!(summary.total_days_tracked, 1);
    assert_eq!(summary.total_calls, 10);
    assert_eq!(summary.average_performance_score, 73.0);
    assert_eq!(
        recorded.all()[0].1,
        json!({ "employee": "e7", "month": "3", "year": "2024" })
    );
}

#[actix_web::test]
async fn caller_data_is_closed_after_clock_out() {
    let recorded = web::Data::new(Recorded::default());
    let data = recorded.clone();
    let base = spawn_backend(move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(data.clone())
            .route(
                "/api/attendance/today",
                web::get().to(|| async {
                    HttpResponse::Ok().json(json!({
                        "success": true,
                        "attendance": {
                            "_id": "a1",
                            "date": "2024-03-04",
                            "clockIn": "2024-03-04T09:00:00Z",
                            "clockOut": "2024-03-04T17:00:00Z",
                            "totalHours": 8.0,
                        },
                    }))
                }),
            )
            .default_service(web::to(
                |req: HttpRequest, body: web::Bytes, rec: web::Data<Recorded>| async move {
                    rec.push(&req, &body);
                    HttpResponse::Ok().json(json!({ "success": true }))
                },
            ));
    })
    .await;

    let api = client(base, logged_in("employee"));
    let err = api.save_my_call_data(&numbers(), day(2024, 3, 4)).await.unwrap_err();
    assert!(matches!(err, ClientError::Forbidden(_)));
    assert!(recorded.all().is_empty());
}

#[actix_web::test]
async fn second_clock_in_returns_the_existing_record() {
    let base = spawn_backend(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/api/attendance/clock-in",
            web::post().to(|| async {
                HttpResponse::BadRequest().json(json!({
                    "success": false,
                    "message": "Already clocked in today",
                    "code": "ALREADY_CLOCKED_IN",
                    "existingRecord": {
                        "_id": "a1",
                        "date": "2024-03-04",
                        "clockIn": "2024-03-04T09:00:00Z",
                        "canClockOut": true,
                    },
                }))
            }),
        );
    })
    .await;

    let api = client(base, logged_in("employee"));
    match api.clock_in().await.unwrap() {
        ClockIn::AlreadyClockedIn(record) => {
            assert_eq!(record.id, "a1");
            assert_eq!(record.can_clock_out, Some(true));
            assert!(record.clock_out.is_none());
        }
        other => panic!("expected the existing record, got {other:?}"),
    }
}

#[actix_web::test]
async fn payslip_download_returns_raw_bytes() {
    let base = spawn_backend(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/api/payslips/download/{id}",
            web::get().to(|path: web::Path<String>| async move {
                if path.into_inner() == "p1" {
                    HttpResponse::Ok()
                        .content_type("application/pdf")
                        .body(&b"%PDF-1.4 payslip"[..])
                } else {
                    HttpResponse::NotFound().json(json!({ "message": "Payslip not found" }))
                }
            }),
        );
    })
    .await;

    let api = client(base, logged_in("employee"));
    assert_eq!(api.download_payslip("p1").await.unwrap(), b"%PDF-1.4 payslip");

    let err = api.download_payslip("nope").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

fn own_call_backend(
    existing_today: bool,
    recorded: web::Data<Recorded>,
) -> impl Fn(&mut web::ServiceConfig) + Clone + Send + 'static {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(recorded.clone())
            .route(
                "/api/attendance/today",
                web::get().to(|| async {
                    HttpResponse::Ok().json(json!({
                        "success": true,
                        "attendance": {
                            "_id": "a1",
                            "date": "2024-03-04",
                            "clockIn": "2024-03-04T09:00:00Z",
                        },
                    }))
                }),
            )
            .route(
                "/api/calls/today",
                web::get().to(move || async move {
                    let record = existing_today.then(|| {
                        json!({
                            "_id": "c3",
                            "date": "2024-03-04",
                            "visitedToday": 1,
                            "interestedStudents": 0,
                            "totalCallTime": 30,
                            "totalCalls": 12,
                        })
                    });
                    HttpResponse::Ok().json(json!({ "success": true, "callData": record }))
                }),
            )
            .route(
                "/api/calls",
                web::post().to(
                    |req: HttpRequest, body: web::Bytes, rec: web::Data<Recorded>| async move {
                        rec.push(&req, &body);
                        HttpResponse::Created().json(json!({ "success": true }))
                    },
                ),
            )
            .route(
                "/api/calls/{id}",
                web::put().to(
                    |req: HttpRequest, body: web::Bytes, rec: web::Data<Recorded>| async move {
                        rec.push(&req, &body);
                        HttpResponse::Ok().json(json!({ "success": true }))
                    },
                ),
            );
    }
}

#[actix_web::test]
async fn own_entry_updates_todays_record() {
    let recorded = web::Data::new(Recorded::default());
    let base = spawn_backend(own_call_backend(true, recorded.clone())).await;
    let api = client(base, logged_in("employee"));

    let saved = api.save_my_call_data(&numbers(), day(2024, 3, 4)).await.unwrap();
    assert!(matches!(saved, Saved::Updated(_)));

    let sent = recorded.all();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "PUT /api/calls/c3");
    assert_eq!(
        sent[0].1,
        json!({
            "visitedToday": 2,
            "interestedStudents": 3,
            "totalCallTime": 120,
            "totalCalls": 40,
            "notes": "good day",
        })
    );
}

#[actix_web::test]
async fn own_entry_creates_todays_record() {
    let recorded = web::Data::new(Recorded::default());
    let base = spawn_backend(own_call_backend(false, recorded.clone())).await;
    let api = client(base, logged_in("employee"));

    let saved = api.save_my_call_data(&numbers(), day(2024, 3, 4)).await.unwrap();
    assert!(matches!(saved, Saved::Created(_)));

    let sent = recorded.all();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "POST /api/calls");
    assert!(sent[0].1.get("employee").is_none());
    assert!(sent[0].1.get("date").is_none());
    assert_eq!(sent[0].1["totalCalls"], 40);
}

#[actix_web::test]
async fn own_summary_covers_an_earlier_month() {
    let base = spawn_backend(|cfg: &mut web::ServiceConfig| {
        cfg.route(
            "/api/calls/my",
            web::get().to(|query: web::Query<HashMap<String, String>>| async move {
                let limit: usize = query
                    .get("limit")
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(10);
                // Newest first, one record a day from 2024-02-01 to 2024-03-10.
                let records: Vec<Value> = day(2024, 2, 1)
                    .iter_days()
                    .take_while(|d| *d <= day(2024, 3, 10))
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .take(limit)
                    .map(|d| {
                        json!({
                            "_id": format!("c-{d}"),
                            "date": d.format("%Y-%m-%d").to_string(),
                            "totalCalls": 1,
                        })
                    })
                    .collect();
                HttpResponse::Ok().json(json!({ "success": true, "callDataRecords": records }))
            }),
        );
    })
    .await;

    let api = client(base, logged_in("employee"));
    let february = api
        .monthly_call_summary(None, 2, 2024, day(2024, 3, 10))
        .await
        .unwrap();
    assert_eq!(february.total_days_tracked, 29);
    assert_eq!(february.total_calls, 29);
}
