use std::net::SocketAddr;

use axum::{routing::get, Extension, Router};
use tower_signed_cookies::{
    CookieAttributes, CookieSession, CookieSessionConfig, CookieSessionLayer, Expiry,
};

async fn index(Extension(cookies): Extension<CookieSession>) -> String {
    let n: usize = cookies
        .get("n")
        .and_then(|value| value.parse().ok())
        .unwrap_or(0);
    cookies
        .set_with(
            "n",
            (n + 1).to_string(),
            CookieAttributes::default().with_expiry(Expiry::ONE_HOUR),
        )
        .expect("cookie set succeeds");
    format!("n={n}")
}

#[tokio::main]
async fn main() {
    let config = CookieSessionConfig::new("s3cret")
        // Default: no prefix
        .with_prefix("demo_")
        // Default: "localhost" (omits the domain attribute)
        .with_server_name("localhost");
    let cookie_layer = CookieSessionLayer::new(config);

    let app = Router::new().route("/", get(index)).layer(cookie_layer);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("tcp listener binds successfully");
    let local_addr = listener.local_addr().expect("local address is available");
    println!("listening at http://{local_addr}");

    axum::serve(listener, app)
        .await
        .expect("server runs successfully");
}
