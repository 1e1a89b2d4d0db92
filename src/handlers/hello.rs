pub async fn hello() -> &'static str {
    "groups service is running"
}
