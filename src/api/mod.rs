pub mod employee;
pub mod leave_request;
pub mod me;
pub mod report;

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use crate::auth::password::hash_password;
    use crate::config::Config;
    use crate::leave::LeaveService;
    use crate::routes;
    use crate::store::MemoryStore;

    fn test_config() -> Config {
        Config {
            server_addr: "127.0.0.1:0".into(),
            database_url: "memory".into(),
            jwt_secret: "test-secret".into(),
            access_token_ttl: 3600,
            admin_username: "admin".into(),
            admin_password_hash: hash_password("admin-pass").unwrap(),
            rate_login_per_min: 10_000,
            rate_protected_per_min: 10_000,
            api_prefix: "/api".into(),
            log_level: "info".into(),
            run_migrations: false,
        }
    }

    fn request(method: &str, uri: &str, token: Option<&str>) -> test::TestRequest {
        let req = match method {
            "POST" => test::TestRequest::post(),
            "PUT" => test::TestRequest::put(),
            "PATCH" => test::TestRequest::patch(),
            "DELETE" => test::TestRequest::delete(),
            _ => test::TestRequest::get(),
        }
        .uri(uri)
        .peer_addr("127.0.0.1:40000".parse().unwrap());

        match token {
            Some(t) => req.insert_header(("Authorization", format!("Bearer {t}"))),
            None => req,
        }
    }

    #[actix_web::test]
    async fn leave_lifecycle_over_http() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(LeaveService::new(MemoryStore::new())))
                .app_data(web::Data::new(config.clone()))
                .configure(|cfg| routes::configure::<MemoryStore>(cfg, &config)),
        )
        .await;

        // admin login
        let resp: Value = test::call_and_read_body_json(
            &app,
            request("POST", "/auth/login", None)
                .set_json(json!({"username": "admin", "password": "admin-pass"}))
                .to_request(),
        )
        .await;
        let admin = resp["access_token"].as_str().unwrap().to_string();

        // add employee
        let resp = test::call_service(
            &app,
            request("POST", "/api/employees", Some(&admin))
                .set_json(json!({
                    "name": "Hina", "gender": "Female", "age": 34,
                    "position": "Accountant", "department": "Finance",
                    "phone": "+923004445556", "email": "hina@company.com",
                    "status": "Active"
                }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let employee_id = created["employee"]["id"].as_u64().unwrap();
        let username = created["credential"]["username"].as_str().unwrap().to_string();
        let password = created["credential"]["password"].as_str().unwrap().to_string();
        assert_eq!(username, format!("user{employee_id}"));

        // employee login
        let resp: Value = test::call_and_read_body_json(
            &app,
            request("POST", "/auth/login", None)
                .set_json(json!({"username": username, "password": password}))
                .to_request(),
        )
        .await;
        let employee = resp["access_token"].as_str().unwrap().to_string();

        // apply
        let resp = test::call_service(
            &app,
            request("POST", "/api/me/leaves", Some(&employee))
                .set_json(json!({"start_date": "2024-01-01", "end_date": "2024-01-05", "reason": "Family"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let leave: Value = test::read_body_json(resp).await;
        assert_eq!(leave["status"], "Pending");
        assert_eq!(leave["remaining_days"], 15);
        let leave_id = leave["id"].as_u64().unwrap();

        // over-budget apply
        let resp = test::call_service(
            &app,
            request("POST", "/api/me/leaves", Some(&employee))
                .set_json(json!({"start_date": "2024-02-01", "end_date": "2024-02-20", "reason": "Trip"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "InsufficientBalance");
        assert_eq!(body["requested"], 20);
        assert_eq!(body["available"], 15);

        // approve, then approve again
        let approve = format!("/api/leaves/{leave_id}/approve");
        let resp = test::call_service(&app, request("PUT", &approve, Some(&admin)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let resp = test::call_service(&app, request("PUT", &approve, Some(&admin)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["current"], "Approved");

        // reports
        let overdue: Value = test::call_and_read_body_json(
            &app,
            request("GET", "/api/reports/overdue?on=2024-01-10", Some(&admin)).to_request(),
        )
        .await;
        assert_eq!(overdue.as_array().unwrap().len(), 1);

        let balance: Value = test::call_and_read_body_json(
            &app,
            request("GET", &format!("/api/employees/{employee_id}/balance"), Some(&admin)).to_request(),
        )
        .await;
        assert_eq!(balance["leave_balance"], 15);

        let notice: Value = test::call_and_read_body_json(
            &app,
            request("GET", "/api/me/notification", Some(&employee)).to_request(),
        )
        .await;
        assert_eq!(notice["return_on"], "2024-01-06");
    }

    #[actix_web::test]
    async fn routes_are_guarded_by_token_and_role() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(LeaveService::new(MemoryStore::new())))
                .app_data(web::Data::new(config.clone()))
                .configure(|cfg| routes::configure::<MemoryStore>(cfg, &config)),
        )
        .await;

        let resp = test::call_service(&app, request("GET", "/api/employees", None).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = test::call_service(
            &app,
            request("POST", "/auth/login", None)
                .set_json(json!({"username": "admin", "password": "nope"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp: Value = test::call_and_read_body_json(
            &app,
            request("POST", "/auth/login", None)
                .set_json(json!({"username": "admin", "password": "admin-pass"}))
                .to_request(),
        )
        .await;
        let admin = resp["access_token"].as_str().unwrap().to_string();

        // admin has no employee profile
        let resp = test::call_service(&app, request("GET", "/api/me", Some(&admin)).to_request()).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = test::call_service(
            &app,
            request("GET", "/api/employees/99/balance", Some(&admin)).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = test::call_service(
            &app,
            request("PATCH", "/api/employees/99", Some(&admin))
                .set_json(json!({}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn malformed_report_date_is_rejected() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(LeaveService::new(MemoryStore::new())))
                .app_data(web::Data::new(config.clone()))
                .configure(|cfg| routes::configure::<MemoryStore>(cfg, &config)),
        )
        .await;

        let resp: Value = test::call_and_read_body_json(
            &app,
            request("POST", "/auth/login", None)
                .set_json(json!({"username": "admin", "password": "admin-pass"}))
                .to_request(),
        )
        .await;
        let admin = resp["access_token"].as_str().unwrap().to_string();

        for uri in ["/api/reports/overdue?on=2024-1-10", "/api/reports/present?on=2024-01-5"] {
            let resp = test::call_service(&app, request("GET", uri, Some(&admin)).to_request()).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "InvalidDateFormat");
        }

        let resp = test::call_service(
            &app,
            request("GET", "/api/reports/overdue?on=2024-01-10", Some(&admin)).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
