use http::{Response, StatusCode};
use http_body_util::BodyExt;
use micro_stream::body::StreamBody;
use micro_stream::stream::{BodyStream, CallbackStream, StringStream};
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

fn render_page(name: &str) -> String {
    info!(name, "rendering page");
    format!("<h1>Hello {name}!</h1>\r\n")
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::TRACE).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    // never read, so the page is never rendered
    let mut skipped = CallbackStream::infallible(|| render_page("nobody"));
    skipped.close();

    let deferred = StreamBody::new(CallbackStream::infallible(|| render_page("world")));
    let response = Response::builder().status(StatusCode::OK).body(deferred).unwrap();

    match response.into_body().collect().await {
        Ok(collected) => info!(body = ?collected.to_bytes(), "deferred body sent"),
        Err(e) => error!(cause = %e, "deferred body failed"),
    }

    let mut buffered = StringStream::new("Hello World!\r\n");
    info!(size = ?buffered.size(), metadata = ?buffered.metadata(), "string body");
    info!(body = %buffered.to_string_lossy(), "string body sent");
}
