//! End-to-end transcoding tests over a real listener.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use restgate::binding::{Binding, HttpRule};
use restgate::config::GatewayConfig;
use restgate::dispatch::{Backend, Dispatcher, GatewayServer};
use restgate::envelope::Reply;
use restgate::headers::PropagatedHeaders;
use restgate::status::{RpcCode, RpcError};

/// Scripted user service standing in for the RPC side.
struct UserBackend;

#[async_trait]
impl Backend for UserBackend {
    async fn invoke(
        &self,
        operation: &str,
        request: Value,
        headers: &PropagatedHeaders,
    ) -> Result<Reply, RpcError> {
        match operation {
            "GetUser" => {
                let id = request["id"].as_str().unwrap_or_default();
                if id == "42" {
                    Ok(Reply::new(json!({"id": id})))
                } else {
                    Err(RpcError::new(RpcCode::NotFound, "(10409)user not found"))
                }
            }
            "Login" => Ok(Reply::with_token(
                json!({"account": request["account"]}),
                "fresh-token",
            )),
            "WhoAmI" => Ok(Reply::new(json!({
                "project": headers.value("paasport-project-name"),
                "device_id": headers.value("paasport-device-id"),
            }))),
            _ => Err(RpcError::new(RpcCode::Unimplemented, "boom")),
        }
    }
}

async fn start_gateway() -> String {
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(UserBackend), "gateway"));
    dispatcher
        .register([
            Binding::from_rule("GetUser", &HttpRule::get("/users/{id}").version("/a1")).unwrap(),
            Binding::from_rule("Login", &HttpRule::post("/login").version("/a1")).unwrap(),
            Binding::from_rule("WhoAmI", &HttpRule::get("/whoami").version("/a1")).unwrap(),
            Binding::from_rule("Broken", &HttpRule::get("/broken").version("/a1")).unwrap(),
        ])
        .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = GatewayServer::new(GatewayConfig::default(), dispatcher);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    format!("http://{addr}")
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_success_onebox_envelope() {
    let base = start_gateway().await;
    let res = client()
        .get(format!("{base}/a1/users/42?onebox=1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json; charset=utf-8"
    );
    assert_eq!(
        res.text().await.unwrap(),
        r#"{"errCode":0,"errMessage":"SUCCESS","status":200,"data":{"id":"42"},"request_id":"","request_method":"","success":true}"#
    );
}

#[tokio::test]
async fn test_success_flat_is_raw_payload() {
    let base = start_gateway().await;
    let res = client()
        .get(format!("{base}/a1/users/42"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), r#"{"id":"42"}"#);
}

#[tokio::test]
async fn test_backend_error_flat_at_mapped_status() {
    let base = start_gateway().await;
    let res = client()
        .get(format!("{base}/a1/users/7"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(
        res.text().await.unwrap(),
        r#"{"code":5,"err_code":10409,"message":"(10409)user not found","request_id":"","request_method":""}"#
    );
}

#[tokio::test]
async fn test_unparseable_error_rewritten_onebox() {
    let base = start_gateway().await;
    let res = client()
        .get(format!("{base}/a1/broken?onebox=1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["errCode"], 10408);
    assert_eq!(body["errMessage"], "(10408)boom");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_ihc_forces_200() {
    let base = start_gateway().await;
    let res = client()
        .get(format!("{base}/a1/users/7?ihc=1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["err_code"], 10409);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let base = start_gateway().await;
    let res = client()
        .get(format!("{base}/a1/nothing/here"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["err_code"], 10409);
}

#[tokio::test]
async fn test_unsupported_verb_skips_backend() {
    let base = start_gateway().await;
    let res = client()
        .post(format!("{base}/a1/users/42"))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 501);
}

#[tokio::test]
async fn test_token_refresh_updates_response_headers() {
    let base = start_gateway().await;
    let res = client()
        .post(format!("{base}/a1/login"))
        .header("content-type", "application/json")
        .body(r#"{"account":"ada"}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers().get("x-auth-token").unwrap(), "fresh-token");
    assert_eq!(res.headers().get("authorization").unwrap(), "fresh-token");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["account"], "ada");
}

#[tokio::test]
async fn test_header_guard_output_reaches_backend() {
    let base = start_gateway().await;
    let res = client()
        .get(format!("{base}/a1/whoami"))
        .header("paasport-device-name", "foo")
        .header("paasport-project-name", "spoofed")
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    // Identity is stamped server-side; device id derives from device name.
    assert_eq!(body["project"], "gateway");
    assert_eq!(body["device_id"], "acbd18db4cc2f85cedef654fccc4a4d8");
}

#[tokio::test]
async fn test_trace_id_echoed_on_response() {
    let base = start_gateway().await;
    let res = client()
        .get(format!("{base}/a1/users/42?onebox=1"))
        .header("paasport-trace-id", "trace-7")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers().get("paasport-trace-id").unwrap(), "trace-7");
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["request_id"], "trace-7");
}
