use recruitsim::config::AppConfig;
use recruitsim::server::routes::route_request;

fn json(body: &str) -> serde_json::Value {
    serde_json::from_str(body).expect("response should be valid json")
}

#[test]
fn health_endpoint_returns_ok_json() {
    let response = route_request("GET", "/api/health", "", &AppConfig::default());
    assert_eq!(response.status_code, 200);
    assert_eq!(response.content_type, "application/json");
    assert_eq!(json(&response.body)["status"], "ok");
}

#[test]
fn simulate_endpoint_is_reproducible_and_omits_samples_by_default() {
    let body = r#"{
        "scenario": {"recruitment_budget": 300000, "target_timeline_weeks": 12, "quality_threshold": 0.8},
        "iterations": 1000,
        "seed": 7
    }"#;
    let config = AppConfig::default();
    let first = route_request("POST", "/api/simulate", body, &config);
    let second = route_request("POST", "/api/simulate", body, &config);
    assert_eq!(first.status_code, 200);
    assert_eq!(first.body, second.body);

    let payload = json(&first.body);
    assert_eq!(payload["engine"], "monte_carlo_v1");
    assert_eq!(payload["result"]["seed"], 7);
    assert_eq!(payload["result"]["iterations"], 1000);
    assert_eq!(payload["result"]["outcomes"]["hires"].as_array().map(Vec::len), Some(0));
    let stats = &payload["result"]["statistics"];
    assert!(stats["p10_hires"].as_f64() <= stats["p50_hires"].as_f64());
    assert!(stats["p50_hires"].as_f64() <= stats["p90_hires"].as_f64());
}

#[test]
fn simulate_endpoint_can_include_samples() {
    let body = r#"{
        "scenario": {"recruitment_budget": 200000, "target_timeline_weeks": 8, "quality_threshold": 0.7},
        "iterations": 25,
        "seed": 1,
        "include_outcomes": true
    }"#;
    let response = route_request("POST", "/api/simulate", body, &AppConfig::default());
    let payload = json(&response.body);
    assert_eq!(payload["result"]["outcomes"]["hires"].as_array().map(Vec::len), Some(25));
}

#[test]
fn invalid_scenario_is_bad_request() {
    let body = r#"{"scenario": {"recruitment_budget": 300000, "target_timeline_weeks": 12, "quality_threshold": 1.5}}"#;
    let response = route_request("POST", "/api/simulate", body, &AppConfig::default());
    assert_eq!(response.status_code, 400);
    let payload = json(&response.body);
    assert_eq!(payload["status"], "error");
    assert!(payload["message"].as_str().is_some());
}

#[test]
fn malformed_json_is_bad_request() {
    let response = route_request("POST", "/api/risk", "{not json", &AppConfig::default());
    assert_eq!(response.status_code, 400);
}

#[test]
fn unknown_route_is_not_found() {
    let response = route_request("GET", "/api/nope", "", &AppConfig::default());
    assert_eq!(response.status_code, 404);
    let response = route_request("GET", "/api/simulate", "", &AppConfig::default());
    assert_eq!(response.status_code, 404);
}

#[test]
fn sensitivity_endpoint_lists_five_variables() {
    let body = r#"{"scenario": {"id": "s-1", "recruitment_budget": 300000, "target_timeline_weeks": 12, "quality_threshold": 0.75}}"#;
    let response = route_request("POST", "/api/sensitivity", body, &AppConfig::default());
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["scenario_id"], "s-1");
    assert_eq!(payload["variables"].as_array().map(Vec::len), Some(5));
}

#[test]
fn optimize_endpoint_accepts_empty_body() {
    let response = route_request("POST", "/api/optimize", "", &AppConfig::default());
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["engine"], "pareto_v1");
    assert!(!payload["optimization"]["pareto_front"]
        .as_array()
        .expect("front should be an array")
        .is_empty());
}

#[test]
fn optimize_endpoint_rejects_oversized_grid() {
    let response = route_request(
        "POST",
        "/api/optimize",
        r#"{"grid":{"step":0.000001}}"#,
        &AppConfig::default(),
    );
    assert_eq!(response.status_code, 400);
    assert!(json(&response.body)["message"]
        .as_str()
        .is_some_and(|message| message.contains("step")));

    let constrained = route_request(
        "POST",
        "/api/optimize",
        r#"{"grid":{"capacity":1.0}}"#,
        &AppConfig::default(),
    );
    assert_eq!(constrained.status_code, 200);
}

#[test]
fn generate_endpoint_echoes_seed_and_caps_count() {
    let body = r#"{"count": 4, "seed": 99, "available_zones": ["north", "south"]}"#;
    let response = route_request("POST", "/api/scenarios/generate", body, &AppConfig::default());
    assert_eq!(response.status_code, 200);
    let payload = json(&response.body);
    assert_eq!(payload["seed"], 99);
    assert_eq!(payload["scenarios"].as_array().map(Vec::len), Some(4));

    let too_many = route_request(
        "POST",
        "/api/scenarios/generate",
        r#"{"count": 5000}"#,
        &AppConfig::default(),
    );
    assert_eq!(too_many.status_code, 400);
}

#[test]
fn compare_endpoint_ranks_scenarios() {
    let body = r#"{
        "scenarios": [
            {"id": "low", "recruitment_budget": 150000, "target_timeline_weeks": 12, "quality_threshold": 0.9},
            {"id": "high", "recruitment_budget": 450000, "target_timeline_weeks": 12, "quality_threshold": 0.7}
        ],
        "iterations": 500,
        "seed": 5
    }"#;
    let response = route_request("POST", "/api/scenarios/compare", body, &AppConfig::default());
    assert_eq!(response.status_code, 200);
    let ranking = json(&response.body)["comparison"]["ranking"].clone();
    assert_eq!(ranking[0]["scenario_id"], "high");
    assert_eq!(ranking[0]["rank"], 1);
    assert_eq!(ranking[1]["rank"], 2);
}

#[test]
fn compare_endpoint_rejects_empty_list() {
    let response = route_request(
        "POST",
        "/api/scenarios/compare",
        r#"{"scenarios": []}"#,
        &AppConfig::default(),
    );
    assert_eq!(response.status_code, 400);
}

#[test]
fn risk_endpoint_reads_typed_service_history() {
    let body = r#"{
        "base": {
            "metrics": [{"zone_id": "north", "open_positions": 4}, {"zone_id": "south", "open_positions": 3}],
            "services": [
                {"id": "a", "scheduled_at": "2024-01-05T09:00:00"},
                {"id": "b", "fecha_hora_cita": "2024-02-11T14:30:00"},
                {"id": "c", "scheduled_at": "2024-02-12T10:00:00"}
            ]
        },
        "scenarios": [
            {"recruitment_budget": 200000, "target_timeline_weeks": 8, "quality_threshold": 0.7},
            {"recruitment_budget": 400000, "target_timeline_weeks": 16, "quality_threshold": 0.8}
        ]
    }"#;
    let response = route_request("POST", "/api/risk", body, &AppConfig::default());
    assert_eq!(response.status_code, 200);
    let risk = json(&response.body)["risk"].clone();
    assert_eq!(risk["market_history_sufficient"], true);
    assert_eq!(risk["history_months"], 2);
    assert_eq!(risk["open_positions"], 7);
    assert!(["low", "medium", "high"].contains(&risk["level"].as_str().unwrap_or("")));
}
