use catalog_scan_lambda::adapters::dynamodb::DynamoDbTableScanner;
use catalog_scan_lambda::config::table_name_from_env;
use catalog_scan_lambda::handlers::catalog::handle_catalog_event;
use catalog_scan_lambda::runtime::envelope::ApiGatewayResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

async fn handle_request(
    scanner: &DynamoDbTableScanner,
    event: LambdaEvent<Value>,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_catalog_event(event.payload, scanner))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let scanner = DynamoDbTableScanner::new(
        aws_sdk_dynamodb::Client::new(&aws_config),
        table_name_from_env(),
    );
    let scanner = &scanner;

    lambda_runtime::run(service_fn(move |event| handle_request(scanner, event))).await
}
