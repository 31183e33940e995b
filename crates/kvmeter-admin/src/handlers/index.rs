use axum::response::{Html, IntoResponse};

const INDEX_PAGE: &str = r#"<html>
<head><title>kvmeter exporter</title></head>
<body>
<h1>kvmeter exporter</h1>
<p><a href='/metrics'>Metrics</a></p>
</body>
</html>"#;

pub async fn index() -> impl IntoResponse {
    Html(INDEX_PAGE)
}
