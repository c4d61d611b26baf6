pub mod runtime;
pub mod to_dotenv;
pub mod to_js;
pub mod to_json;
