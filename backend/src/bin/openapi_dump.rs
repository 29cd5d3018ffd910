//! Print the OpenAPI document as JSON.

use utoipa::OpenApi;
use wicket_backend::ApiDoc;

fn main() {
    println!("{}", ApiDoc::openapi().to_json().unwrap());
}
