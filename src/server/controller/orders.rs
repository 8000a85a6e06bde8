use actix_web::{web, Responder};
use log::{debug, error};
use crate::server::controller::error::CustomError;
use crate::server::database::orders;
use crate::server::database::pool::DbClient;
use crate::server::state::AppState;

/// list every row of the orders table
pub(crate) async fn list_orders<M: DbClient>(
    data: web::Data<AppState<M>>,
) -> Result<impl Responder, CustomError> {
    match orders::list_orders(data.get_db_read_pool(), data.query_timeout()).await {
        Ok(records) => {
            debug!("list_orders returned {} rows", records.len());
            Ok(web::Json(records))
        }
        Err(e) => {
            error!("list_orders failed, {}", e);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::server::app_config;
    use crate::server::database::connection::mock::{MockClient, MockDb};
    use crate::server::database::pool::Pool;
    use crate::server::model::order::{ColumnValue, Record};
    use crate::server::state::AppState;
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App};
    use serde_json::{json, Value};
    use std::time::Duration;

    const QUERY_TIMEOUT: Duration = Duration::from_secs(1);

    fn order(id: i64, item: &str) -> Record {
        [
            ("id", ColumnValue::Int(id)),
            ("item", ColumnValue::Text(item.to_string())),
        ]
        .into_iter()
        .collect()
    }

    fn state(db: &MockDb, query_timeout: Duration) -> web::Data<AppState<MockClient>> {
        let pool = Pool::new("read", db.clone(), 2, Duration::from_millis(50));
        web::Data::new(AppState::new(pool, query_timeout))
    }

    #[actix_web::test]
    async fn empty_table_returns_empty_array() {
        let db = MockDb::default();
        let app = test::init_service(App::new().configure(app_config(state(&db, QUERY_TIMEOUT)))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(CONTENT_TYPE).unwrap().to_str().unwrap(),
            "application/json"
        );
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([]));
    }

    #[actix_web::test]
    async fn every_row_is_returned() {
        let db = MockDb::with_rows(vec![order(1, "A"), order(2, "B")]);
        let app = test::init_service(App::new().configure(app_config(state(&db, QUERY_TIMEOUT)))).await;

        let body: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/orders").to_request(),
        )
        .await;

        let rows = body.as_array().expect("body should be an array");
        assert_eq!(rows.len(), 2);
        assert!(rows.contains(&json!({"id": 1, "item": "A"})));
        assert!(rows.contains(&json!({"id": 2, "item": "B"})));
        assert_eq!(db.statements(), vec!["SELECT * FROM orders".to_string()]);
    }

    #[actix_web::test]
    async fn request_parameters_are_ignored() {
        let db = MockDb::with_rows(vec![order(1, "A"), order(2, "B"), order(3, "C")]);
        let app = test::init_service(App::new().configure(app_config(state(&db, QUERY_TIMEOUT)))).await;

        let plain: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get().uri("/orders").to_request(),
        )
        .await;
        let decorated: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri("/orders?page=2&page_size=1&item=B")
                .insert_header(("X-Filter", "item=B"))
                .to_request(),
        )
        .await;

        assert_eq!(plain, decorated);
        assert_eq!(plain.as_array().map(Vec::len), Some(3));
    }

    #[actix_web::test]
    async fn unreachable_database_is_a_server_error() {
        let db = MockDb::default();
        db.set_unreachable(true);
        let app = test::init_service(App::new().configure(app_config(state(&db, QUERY_TIMEOUT)))).await;

        for _ in 0..3 {
            let resp = test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({"error": "database error"}));
        }

        // recovers once the database is back
        db.set_unreachable(false);
        let resp = test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unresponsive_database_is_a_server_error() {
        let db = MockDb::with_rows(vec![order(1, "A")]);
        db.set_connect_latency(Duration::from_secs(5));
        let app = test::init_service(App::new().configure(app_config(state(&db, QUERY_TIMEOUT)))).await;

        let resp = actix_web::rt::time::timeout(
            Duration::from_secs(1),
            test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()),
        )
        .await
        .expect("request should not hang on connect");
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn slow_query_is_a_gateway_timeout() {
        let db = MockDb::with_rows(vec![order(1, "A")]);
        db.set_latency(Duration::from_millis(200));
        let app = test::init_service(
            App::new().configure(app_config(state(&db, Duration::from_millis(20)))),
        )
        .await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()).await;
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[actix_web::test]
    async fn only_get_is_routed() {
        let db = MockDb::default();
        let app = test::init_service(App::new().configure(app_config(state(&db, QUERY_TIMEOUT)))).await;

        let resp = test::call_service(&app, test::TestRequest::post().uri("/orders").to_request()).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(db.statements().is_empty());
    }
}
