use std::collections::HashMap;

use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::AttributeValue;

use crate::adapters::table_scan::TableScanner;
use crate::runtime::item::{parse_number, Item, ItemValue};

/// DynamoDB-backed scanner. Built once per process and shared by every
/// invocation; it holds no per-request state.
#[derive(Debug, Clone)]
pub struct DynamoDbTableScanner {
    client: aws_sdk_dynamodb::Client,
    table_name: String,
}

impl DynamoDbTableScanner {
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

impl TableScanner for DynamoDbTableScanner {
    fn table_name(&self) -> &str {
        &self.table_name
    }

    fn scan_items(&self) -> Result<Vec<Item>, String> {
        let client = self.client.clone();
        let table_name = self.table_name.clone();

        // Single Scan request; continuation keys are not followed.
        let output = tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .scan()
                    .table_name(table_name)
                    .send()
                    .await
                    .map_err(|error| describe_sdk_error("Scan", &error))
            })
        })?;

        output
            .items
            .unwrap_or_default()
            .into_iter()
            .map(item_from_attributes)
            .collect()
    }
}

/// Renders an SDK failure as a single message line.
///
/// Service errors read `An error occurred (<code>) when calling the <op>
/// operation: <message>`; transport failures fall back to the full error
/// context chain.
pub fn describe_sdk_error<E>(operation: &str, error: &E) -> String
where
    E: ProvideErrorMetadata + std::error::Error,
{
    match error.code() {
        Some(code) => format!(
            "An error occurred ({code}) when calling the {operation} operation: {}",
            error.message().unwrap_or_default()
        ),
        None => DisplayErrorContext(error).to_string(),
    }
}

pub fn item_from_attributes(attributes: HashMap<String, AttributeValue>) -> Result<Item, String> {
    attributes
        .into_iter()
        .map(|(name, value)| {
            let converted = value_from_attribute(&name, value)?;
            Ok((name, converted))
        })
        .collect()
}

fn value_from_attribute(field: &str, value: AttributeValue) -> Result<ItemValue, String> {
    let converted = match value {
        AttributeValue::S(text) => ItemValue::String(text),
        AttributeValue::N(raw) => ItemValue::Number(parse_number(&raw)?),
        AttributeValue::Bool(flag) => ItemValue::Bool(flag),
        AttributeValue::Null(_) => ItemValue::Null,
        AttributeValue::B(blob) => ItemValue::Binary(blob.into_inner()),
        AttributeValue::L(values) => ItemValue::List(
            values
                .into_iter()
                .map(|entry| value_from_attribute(field, entry))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::M(fields) => ItemValue::Map(item_from_attributes(fields)?),
        AttributeValue::Ss(values) => ItemValue::StringSet(values),
        AttributeValue::Ns(values) => ItemValue::NumberSet(
            values
                .iter()
                .map(|raw| parse_number(raw))
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::Bs(values) => {
            ItemValue::BinarySet(values.into_iter().map(Blob::into_inner).collect())
        }
        _ => return Err(format!("unsupported attribute type in field '{field}'")),
    };
    Ok(converted)
}
