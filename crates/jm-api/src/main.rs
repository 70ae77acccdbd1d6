use jm_api::error::ApiError;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    jm_api::run().await
}
