//! End-to-end academic flow: roster setup, mark entry with validation,
//! grade rules, computed reports, and printable documents.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;

struct Cohort {
    exam_id: i64,
    class_id: i64,
    arabic_cfg: i64,
    math_cfg: i64,
    students: Vec<i64>,
}

/// One exam, one class, two compulsory subjects (100 marks each, pass at
/// 33), three students, and a standard grade ladder.
async fn setup_cohort(app: &TestApp) -> Cohort {
    let (_, year) = app
        .post(
            "/api/v1/academic-years",
            json!({"year": "2025", "is_active": true}),
        )
        .await;
    let year_id = year["id"].as_i64().unwrap();

    let (_, exam) = app
        .post(
            "/api/v1/exams",
            json!({
                "name": "First Terminal",
                "academic_year_id": year_id,
                "start_date": "2025-06-01",
            }),
        )
        .await;
    let exam_id = exam["id"].as_i64().unwrap();

    let (_, class) = app
        .post(
            "/api/v1/class-configs",
            json!({
                "class_name": "Class Five",
                "section": "A",
                "academic_year_id": year_id,
            }),
        )
        .await;
    let class_id = class["id"].as_i64().unwrap();

    let mut students = Vec::new();
    for (name, roll) in [("Rahim", 1), ("Karim", 2), ("Salma", 3)] {
        let (status, student) = app
            .post(
                "/api/v1/students",
                json!({
                    "name": name,
                    "roll_no": roll,
                    "class_config_id": class_id,
                    "academic_year_id": year_id,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        students.push(student["id"].as_i64().unwrap());
    }

    let mut configs = Vec::new();
    for subject in ["Arabic", "Mathematics"] {
        let (status, cfg) = app
            .post(
                "/api/v1/subject-mark-configs",
                json!({
                    "exam_id": exam_id,
                    "class_config_id": class_id,
                    "subject_name": subject,
                    "max_mark": "100",
                    "pass_mark": "33",
                    "is_compulsory": true,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        configs.push(cfg["id"].as_i64().unwrap());
    }

    for (grade, min, max, point) in [
        ("A+", "80", "100", "5.00"),
        ("A", "70", "79.99", "4.00"),
        ("B", "60", "69.99", "3.50"),
        ("C", "33", "59.99", "2.00"),
        ("F", "0", "32.99", "0.00"),
    ] {
        let (status, _) = app
            .post(
                "/api/v1/graderules",
                json!({
                    "grade_name": grade,
                    "min_mark": min,
                    "max_mark": max,
                    "grade_point": point,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    Cohort {
        exam_id,
        class_id,
        arabic_cfg: configs[0],
        math_cfg: configs[1],
        students,
    }
}

async fn enter_mark(app: &TestApp, cohort: &Cohort, student: i64, cfg: i64, mark: &str) {
    let (status, _) = app
        .post(
            "/api/v1/subject-marks",
            json!({
                "exam_id": cohort.exam_id,
                "student_id": student,
                "subject_config_id": cfg,
                "obtained_mark": mark,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

fn report_uri(path: &str, cohort: &Cohort) -> String {
    format!(
        "/api/v1/reports/{path}?exam_id={}&class_config_id={}",
        cohort.exam_id, cohort.class_id
    )
}

#[tokio::test]
async fn mark_above_configured_maximum_is_rejected() {
    let app = TestApp::spawn().await;
    let cohort = setup_cohort(&app).await;

    let (status, body) = app
        .post(
            "/api/v1/subject-marks",
            json!({
                "exam_id": cohort.exam_id,
                "student_id": cohort.students[0],
                "subject_config_id": cohort.arabic_cfg,
                "obtained_mark": "105",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("between 0 and"));
}

#[tokio::test]
async fn second_mark_for_the_same_subject_is_a_conflict() {
    let app = TestApp::spawn().await;
    let cohort = setup_cohort(&app).await;
    let rahim = cohort.students[0];

    enter_mark(&app, &cohort, rahim, cohort.arabic_cfg, "85").await;

    let mark_body = |cfg: i64, mark: &str| {
        json!({
            "exam_id": cohort.exam_id,
            "student_id": rahim,
            "subject_config_id": cfg,
            "obtained_mark": mark,
        })
    };

    // Posting the pair again is rejected.
    let (status, body) = app
        .post("/api/v1/subject-marks", mark_body(cohort.arabic_cfg, "90"))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("already exists"));

    // So is updating another mark onto the occupied pair.
    let (status, math_mark) = app
        .post("/api/v1/subject-marks", mark_body(cohort.math_cfg, "75"))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let math_id = math_mark["id"].as_i64().unwrap();

    let (status, _) = app
        .put(
            &format!("/api/v1/subject-marks/{math_id}"),
            mark_body(cohort.arabic_cfg, "75"),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Updating a mark in place keeps its own slot.
    let (status, updated) = app
        .put(
            &format!("/api/v1/subject-marks/{math_id}"),
            mark_body(cohort.math_cfg, "80"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["obtained_mark"], "80");
}

#[tokio::test]
async fn overlapping_grade_band_is_rejected() {
    let app = TestApp::spawn().await;
    let _cohort = setup_cohort(&app).await;

    let (status, body) = app
        .post(
            "/api/v1/graderules",
            json!({
                "grade_name": "A-",
                "min_mark": "75",
                "max_mark": "85",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("overlaps"));
}

#[tokio::test]
async fn result_sheet_computes_totals_grades_and_merit() {
    let app = TestApp::spawn().await;
    let cohort = setup_cohort(&app).await;
    let [rahim, karim, salma] = [cohort.students[0], cohort.students[1], cohort.students[2]];

    // Rahim: 85 + 75 = 160 (80.00%, A+). Karim: 70 + 20 = fails math.
    // Salma: 60 + 60 = 120 (60.00%, B).
    enter_mark(&app, &cohort, rahim, cohort.arabic_cfg, "85").await;
    enter_mark(&app, &cohort, rahim, cohort.math_cfg, "75").await;
    enter_mark(&app, &cohort, karim, cohort.arabic_cfg, "70").await;
    enter_mark(&app, &cohort, karim, cohort.math_cfg, "20").await;
    enter_mark(&app, &cohort, salma, cohort.arabic_cfg, "60").await;
    enter_mark(&app, &cohort, salma, cohort.math_cfg, "60").await;

    let (status, sheet) = app.get(&report_uri("result-sheet", &cohort)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = sheet["results"].as_array().unwrap();
    assert_eq!(rows.len(), 3);

    // Rows come back in roll order.
    assert_eq!(rows[0]["name"], "Rahim");
    assert_eq!(rows[0]["total_obtained"], "160");
    assert_eq!(rows[0]["percentage"], "80.00");
    assert_eq!(rows[0]["grade"], "A+");
    assert_eq!(rows[0]["failed"], false);
    assert_eq!(rows[0]["merit_position"], 1);

    assert_eq!(rows[1]["name"], "Karim");
    assert_eq!(rows[1]["failed"], true);
    assert_eq!(rows[1]["grade"], "Fail");

    assert_eq!(rows[2]["name"], "Salma");
    assert_eq!(rows[2]["grade"], "B");
    assert_eq!(rows[2]["merit_position"], 2);
}

#[tokio::test]
async fn merit_list_is_ordered_by_rank() {
    let app = TestApp::spawn().await;
    let cohort = setup_cohort(&app).await;
    enter_mark(&app, &cohort, cohort.students[0], cohort.arabic_cfg, "40").await;
    enter_mark(&app, &cohort, cohort.students[1], cohort.arabic_cfg, "90").await;
    enter_mark(&app, &cohort, cohort.students[2], cohort.arabic_cfg, "65").await;

    let (status, sheet) = app.get(&report_uri("merit-list", &cohort)).await;
    assert_eq!(status, StatusCode::OK);
    let positions: Vec<i64> = sheet["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["merit_position"].as_i64().unwrap())
        .collect();
    assert_eq!(positions, vec![1, 2, 3]);
    assert_eq!(sheet["results"][0]["name"], "Karim");
}

#[tokio::test]
async fn mark_sheet_returns_single_student_breakdown() {
    let app = TestApp::spawn().await;
    let cohort = setup_cohort(&app).await;
    enter_mark(&app, &cohort, cohort.students[0], cohort.arabic_cfg, "85").await;

    let uri = format!(
        "/api/v1/reports/mark-sheet/{}?exam_id={}&class_config_id={}",
        cohort.students[0], cohort.exam_id, cohort.class_id
    );
    let (status, sheet) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sheet["name"], "Rahim");
    assert_eq!(sheet["subjects"].as_array().unwrap().len(), 2);

    // Unknown student is a 404.
    let uri = format!(
        "/api/v1/reports/mark-sheet/9999?exam_id={}&class_config_id={}",
        cohort.exam_id, cohort.class_id
    );
    let (status, _) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reports_on_unknown_cohort_are_404() {
    let app = TestApp::spawn().await;
    let _ = setup_cohort(&app).await;

    let (status, _) = app
        .get("/api/v1/reports/result-sheet?exam_id=999&class_config_id=1")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn behavior_sheet_totals_marks_per_student() {
    let app = TestApp::spawn().await;
    let cohort = setup_cohort(&app).await;

    let (_, mark_type) = app
        .post(
            "/api/v1/mark-types",
            json!({"name": "Discipline", "max_mark": "10"}),
        )
        .await;
    let type_id = mark_type["id"].as_i64().unwrap();

    // Over-max behavior mark is rejected.
    let (status, _) = app
        .post(
            "/api/v1/behavior-marks",
            json!({
                "student_id": cohort.students[0],
                "exam_id": cohort.exam_id,
                "mark_type_id": type_id,
                "mark": "11",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/v1/behavior-marks",
            json!({
                "student_id": cohort.students[0],
                "exam_id": cohort.exam_id,
                "mark_type_id": type_id,
                "mark": "8",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, sheet) = app.get(&report_uri("behavior-sheet", &cohort)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = sheet["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["total"], "8");
    // Students without marks get zero.
    assert_eq!(rows[1]["total"], "0");
}

#[tokio::test]
async fn print_endpoints_render_html() {
    let app = TestApp::spawn().await;
    let cohort = setup_cohort(&app).await;
    enter_mark(&app, &cohort, cohort.students[0], cohort.arabic_cfg, "85").await;

    for path in [
        "result-sheet/print",
        "merit-list/print",
        "admit-cards/print",
        "seat-plan/print",
    ] {
        let (status, html) = app.get_text(&report_uri(path, &cohort)).await;
        assert_eq!(status, StatusCode::OK, "{path} failed");
        assert!(html.starts_with("<!DOCTYPE html>"), "{path} is not html");
        assert!(html.contains("First Terminal"), "{path} missing exam name");
    }

    let (_, admit) = app.get_text(&report_uri("admit-cards/print", &cohort)).await;
    assert_eq!(admit.matches("Admit Card</h3>").count(), 3);
    assert!(admit.contains("2025"));
}

#[tokio::test]
async fn duplicate_roll_in_class_is_a_conflict() {
    let app = TestApp::spawn().await;
    let cohort = setup_cohort(&app).await;

    let (_, year) = app.get("/api/v1/academic-years").await;
    let year_id = year["results"][0]["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/api/v1/students",
            json!({
                "name": "Duplicate Roll",
                "roll_no": 1,
                "class_config_id": cohort.class_id,
                "academic_year_id": year_id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["message"].as_str().unwrap().contains("Roll number"));
}
